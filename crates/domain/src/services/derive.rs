//! Derived performance metrics for a raw reading.
//!
//! Formulas (see DESIGN.md for the policy decisions):
//! - efficiency_percent: electrical output over incident solar power on the
//!   panel surface, `power_kw * 1000 / (irradiance * panel_area) * 100`.
//! - performance_ratio: actual output over the irradiance-normalized rated
//!   output, `power_kw / (rated_capacity_kw * irradiance / 1000)`.
//! - data_quality_score: fraction of recognized measurement fields present.

use crate::models::reading::SubmitReadingRequest;

/// Standard test condition irradiance in W/m², the reference for rated capacity.
const STC_IRRADIANCE_W_M2: f64 = 1000.0;

/// Irradiance below this produces no meaningful expectation; derived ratios
/// are left unknown rather than computed from noise.
const MIN_DERIVABLE_IRRADIANCE_W_M2: f64 = 5.0;

/// Metrics derived from one reading given the device's specs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedMetrics {
    pub efficiency_percent: Option<f64>,
    pub performance_ratio: Option<f64>,
    pub data_quality_score: f64,
}

/// Computes derived metrics for a raw payload. Metrics whose inputs are
/// unknown stay `None`; they are never substituted with zero.
pub fn derive_metrics(
    payload: &SubmitReadingRequest,
    rated_capacity_kw: Option<f64>,
    panel_area_m2: Option<f64>,
) -> DerivedMetrics {
    let irradiance = payload
        .solar_irradiance
        .filter(|g| *g >= MIN_DERIVABLE_IRRADIANCE_W_M2);

    let efficiency_percent = match (payload.power_output_kw, irradiance, panel_area_m2) {
        (Some(power_kw), Some(g), Some(area)) if area > 0.0 => {
            let incident_kw = g * area / 1000.0;
            Some(((power_kw / incident_kw) * 100.0).clamp(0.0, 100.0))
        }
        _ => None,
    };

    let performance_ratio = match (payload.power_output_kw, irradiance, rated_capacity_kw) {
        (Some(power_kw), Some(g), Some(capacity)) if capacity > 0.0 => {
            let expected_kw = capacity * g / STC_IRRADIANCE_W_M2;
            Some((power_kw / expected_kw).clamp(0.0, 2.0))
        }
        _ => None,
    };

    let present = payload.present_field_count();
    let data_quality_score = present as f64 / SubmitReadingRequest::MEASUREMENT_FIELD_COUNT as f64;

    DerivedMetrics {
        efficiency_percent,
        performance_ratio,
        data_quality_score,
    }
}

/// Expected power output in kW given irradiance and rated capacity, or None
/// when no meaningful expectation exists.
pub fn expected_power_kw(rated_capacity_kw: Option<f64>, irradiance: Option<f64>) -> Option<f64> {
    match (rated_capacity_kw, irradiance) {
        (Some(capacity), Some(g))
            if capacity > 0.0 && g >= MIN_DERIVABLE_IRRADIANCE_W_M2 =>
        {
            Some(capacity * g / STC_IRRADIANCE_W_M2)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(power: Option<f64>, irradiance: Option<f64>) -> SubmitReadingRequest {
        SubmitReadingRequest {
            device_id: "PV-001".to_string(),
            timestamp: None,
            solar_irradiance: irradiance,
            ambient_temperature: None,
            panel_temperature: None,
            humidity: None,
            wind_speed: None,
            power_output_kw: power,
            voltage: None,
            current: None,
            frequency: None,
        }
    }

    #[test]
    fn test_efficiency_from_power_irradiance_area() {
        // 1000 W/m² over 20 m² = 20 kW incident; 4 kW out = 20 %
        let metrics = derive_metrics(&payload(Some(4.0), Some(1000.0)), None, Some(20.0));
        let eff = metrics.efficiency_percent.unwrap();
        assert!((eff - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_efficiency_unknown_without_inputs() {
        assert!(derive_metrics(&payload(Some(4.0), None), None, Some(20.0))
            .efficiency_percent
            .is_none());
        assert!(derive_metrics(&payload(None, Some(800.0)), None, Some(20.0))
            .efficiency_percent
            .is_none());
        assert!(derive_metrics(&payload(Some(4.0), Some(800.0)), None, None)
            .efficiency_percent
            .is_none());
    }

    #[test]
    fn test_performance_ratio_against_rated_capacity() {
        // 5 kW rated at 800 W/m² expects 4 kW; 3 kW actual = 0.75
        let metrics = derive_metrics(&payload(Some(3.0), Some(800.0)), Some(5.0), None);
        let pr = metrics.performance_ratio.unwrap();
        assert!((pr - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_performance_ratio_clamped() {
        let metrics = derive_metrics(&payload(Some(50.0), Some(100.0)), Some(5.0), None);
        assert_eq!(metrics.performance_ratio, Some(2.0));
    }

    #[test]
    fn test_no_derivation_at_night() {
        // Near-zero irradiance produces no expectation, not a division blowup
        let metrics = derive_metrics(&payload(Some(0.0), Some(0.0)), Some(5.0), Some(20.0));
        assert!(metrics.efficiency_percent.is_none());
        assert!(metrics.performance_ratio.is_none());
    }

    #[test]
    fn test_data_quality_score_reflects_missing_fields() {
        let full = SubmitReadingRequest {
            device_id: "PV-001".to_string(),
            timestamp: None,
            solar_irradiance: Some(800.0),
            ambient_temperature: Some(25.0),
            panel_temperature: Some(40.0),
            humidity: Some(50.0),
            wind_speed: Some(2.0),
            power_output_kw: Some(3.0),
            voltage: Some(230.0),
            current: Some(13.0),
            frequency: Some(50.0),
        };
        assert_eq!(derive_metrics(&full, None, None).data_quality_score, 1.0);

        let partial = payload(Some(3.0), Some(800.0));
        let score = derive_metrics(&partial, None, None).data_quality_score;
        assert!((score - 2.0 / 9.0).abs() < 1e-9);

        let empty = payload(None, None);
        assert_eq!(derive_metrics(&empty, None, None).data_quality_score, 0.0);
    }

    #[test]
    fn test_expected_power() {
        assert_eq!(expected_power_kw(Some(5.0), Some(1000.0)), Some(5.0));
        assert_eq!(expected_power_kw(Some(5.0), Some(500.0)), Some(2.5));
        assert_eq!(expected_power_kw(None, Some(500.0)), None);
        assert_eq!(expected_power_kw(Some(5.0), Some(0.0)), None);
    }
}
