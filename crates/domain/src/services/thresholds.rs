//! Threshold rule evaluation.
//!
//! Takes one normalized reading plus the device's recent irradiance history
//! and the configured thresholds, and produces breach/clear events. The
//! caller (ingestion pipeline) turns breaches into alert upserts and clears
//! into resolutions; this module has no storage knowledge.

use crate::models::alert::{AlertMetric, AlertSeverity};
use crate::models::system_config::AlertThresholds;
use crate::services::derive::{expected_power_kw, DerivedMetrics};

/// Multiplier over the configured power-drop percent at which the breach
/// escalates from WARN to CRITICAL.
const POWER_DROP_CRITICAL_FACTOR: f64 = 1.5;

/// The outcome of evaluating one rule against one reading.
#[derive(Debug, Clone, PartialEq)]
pub enum ThresholdEvent {
    /// The rule condition is met: upsert an active alert for this metric.
    Breach {
        metric: AlertMetric,
        severity: AlertSeverity,
        value: f64,
        threshold: f64,
        message: String,
    },
    /// The clear condition is met: resolve any active alert for this metric.
    Clear { metric: AlertMetric },
}

/// The measured values a rule evaluation needs, already normalized.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReadingSample {
    pub solar_irradiance: Option<f64>,
    pub panel_temperature: Option<f64>,
    pub power_output_kw: Option<f64>,
}

/// Evaluates all threshold rules against one reading.
///
/// `prior_irradiance` is the device's most recent irradiance values, newest
/// first, excluding the current reading; it drives the consecutive-duration
/// condition of the low-irradiance rule. Rules whose inputs are unknown
/// produce no event: an unknown value neither breaches nor clears.
pub fn evaluate(
    sample: ReadingSample,
    derived: &DerivedMetrics,
    rated_capacity_kw: Option<f64>,
    prior_irradiance: &[f64],
    thresholds: &AlertThresholds,
) -> Vec<ThresholdEvent> {
    let mut events = Vec::new();

    if let Some(event) = high_temperature(sample.panel_temperature, thresholds) {
        events.push(event);
    }
    if let Some(event) = low_irradiance(sample.solar_irradiance, prior_irradiance, thresholds) {
        events.push(event);
    }
    if let Some(event) = power_drop(sample, rated_capacity_kw, thresholds) {
        events.push(event);
    }
    if let Some(event) = low_efficiency(derived.efficiency_percent, thresholds) {
        events.push(event);
    }

    events
}

fn high_temperature(
    panel_temperature: Option<f64>,
    thresholds: &AlertThresholds,
) -> Option<ThresholdEvent> {
    let temp = panel_temperature?;
    if temp > thresholds.high_temp {
        Some(ThresholdEvent::Breach {
            metric: AlertMetric::Temperature,
            severity: AlertSeverity::Critical,
            value: temp,
            threshold: thresholds.high_temp,
            message: format!(
                "Panel temperature {:.1} °C exceeds threshold {:.1} °C",
                temp, thresholds.high_temp
            ),
        })
    } else {
        Some(ThresholdEvent::Clear {
            metric: AlertMetric::Temperature,
        })
    }
}

fn low_irradiance(
    solar_irradiance: Option<f64>,
    prior_irradiance: &[f64],
    thresholds: &AlertThresholds,
) -> Option<ThresholdEvent> {
    let irradiance = solar_irradiance?;
    if irradiance >= thresholds.low_irradiance {
        return Some(ThresholdEvent::Clear {
            metric: AlertMetric::Irradiance,
        });
    }

    // Current reading is below the floor; alert only once the streak reaches
    // the configured consecutive duration.
    let needed_prior = thresholds.low_irradiance_duration.saturating_sub(1) as usize;
    let streak_reached = prior_irradiance
        .iter()
        .take(needed_prior)
        .filter(|g| **g < thresholds.low_irradiance)
        .count()
        >= needed_prior;

    if streak_reached {
        Some(ThresholdEvent::Breach {
            metric: AlertMetric::Irradiance,
            severity: AlertSeverity::Warn,
            value: irradiance,
            threshold: thresholds.low_irradiance,
            message: format!(
                "Irradiance {:.0} W/m² below {:.0} W/m² for {} consecutive readings",
                irradiance, thresholds.low_irradiance, thresholds.low_irradiance_duration
            ),
        })
    } else {
        None
    }
}

fn power_drop(
    sample: ReadingSample,
    rated_capacity_kw: Option<f64>,
    thresholds: &AlertThresholds,
) -> Option<ThresholdEvent> {
    let power = sample.power_output_kw?;
    // No meaningful expectation below the irradiance floor (night, heavy
    // overcast); skip rather than clear so a daytime breach is not wiped
    // out by darkness.
    let irradiance = sample.solar_irradiance.filter(|g| *g >= thresholds.low_irradiance)?;
    let expected = expected_power_kw(rated_capacity_kw, Some(irradiance))?;

    let deficit_percent = ((expected - power) / expected * 100.0).max(0.0);
    if deficit_percent >= thresholds.power_drop_percent * POWER_DROP_CRITICAL_FACTOR {
        Some(ThresholdEvent::Breach {
            metric: AlertMetric::PowerOutput,
            severity: AlertSeverity::Critical,
            value: power,
            threshold: expected,
            message: format!(
                "Power output {:.2} kW is {:.0}% below expected {:.2} kW",
                power, deficit_percent, expected
            ),
        })
    } else if deficit_percent >= thresholds.power_drop_percent {
        Some(ThresholdEvent::Breach {
            metric: AlertMetric::PowerOutput,
            severity: AlertSeverity::Warn,
            value: power,
            threshold: expected,
            message: format!(
                "Power output {:.2} kW is {:.0}% below expected {:.2} kW",
                power, deficit_percent, expected
            ),
        })
    } else {
        Some(ThresholdEvent::Clear {
            metric: AlertMetric::PowerOutput,
        })
    }
}

fn low_efficiency(
    efficiency_percent: Option<f64>,
    thresholds: &AlertThresholds,
) -> Option<ThresholdEvent> {
    let efficiency = efficiency_percent?;
    if efficiency < thresholds.low_efficiency {
        Some(ThresholdEvent::Breach {
            metric: AlertMetric::Efficiency,
            severity: AlertSeverity::Warn,
            value: efficiency,
            threshold: thresholds.low_efficiency,
            message: format!(
                "Efficiency {:.1}% below threshold {:.1}%",
                efficiency, thresholds.low_efficiency
            ),
        })
    } else {
        Some(ThresholdEvent::Clear {
            metric: AlertMetric::Efficiency,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn thresholds() -> AlertThresholds {
        AlertThresholds::default()
    }

    fn no_derived() -> DerivedMetrics {
        DerivedMetrics {
            efficiency_percent: None,
            performance_ratio: None,
            data_quality_score: 1.0,
        }
    }

    fn find_breach(events: &[ThresholdEvent], metric: AlertMetric) -> Option<&ThresholdEvent> {
        events.iter().find(|e| match e {
            ThresholdEvent::Breach { metric: m, .. } => *m == metric,
            _ => false,
        })
    }

    fn has_clear(events: &[ThresholdEvent], metric: AlertMetric) -> bool {
        events.iter().any(|e| match e {
            ThresholdEvent::Clear { metric: m } => *m == metric,
            _ => false,
        })
    }

    #[test]
    fn test_high_temperature_breach_is_critical() {
        let sample = ReadingSample {
            panel_temperature: Some(81.2),
            ..Default::default()
        };
        let events = evaluate(sample, &no_derived(), None, &[], &thresholds());
        match find_breach(&events, AlertMetric::Temperature) {
            Some(ThresholdEvent::Breach {
                severity,
                value,
                threshold,
                ..
            }) => {
                assert_eq!(*severity, AlertSeverity::Critical);
                assert_eq!(*value, 81.2);
                assert_eq!(*threshold, 75.0);
            }
            other => panic!("Expected temperature breach, got {:?}", other),
        }
    }

    #[test]
    fn test_temperature_below_ceiling_clears() {
        let sample = ReadingSample {
            panel_temperature: Some(60.0),
            ..Default::default()
        };
        let events = evaluate(sample, &no_derived(), None, &[], &thresholds());
        assert!(has_clear(&events, AlertMetric::Temperature));
        assert!(find_breach(&events, AlertMetric::Temperature).is_none());
    }

    #[test]
    fn test_unknown_temperature_produces_no_event() {
        let events = evaluate(
            ReadingSample::default(),
            &no_derived(),
            None,
            &[],
            &thresholds(),
        );
        assert!(events.is_empty());
    }

    #[test]
    fn test_low_irradiance_requires_consecutive_streak() {
        let sample = ReadingSample {
            solar_irradiance: Some(20.0),
            ..Default::default()
        };

        // Default duration is 3: two prior low readings complete the streak
        let events = evaluate(sample, &no_derived(), None, &[30.0, 10.0], &thresholds());
        assert!(find_breach(&events, AlertMetric::Irradiance).is_some());

        // Only one prior low reading: streak not reached, no event either way
        let events = evaluate(sample, &no_derived(), None, &[30.0], &thresholds());
        assert!(find_breach(&events, AlertMetric::Irradiance).is_none());
        assert!(!has_clear(&events, AlertMetric::Irradiance));

        // A prior reading above the floor breaks the streak
        let events = evaluate(sample, &no_derived(), None, &[300.0, 10.0], &thresholds());
        assert!(find_breach(&events, AlertMetric::Irradiance).is_none());
    }

    #[test]
    fn test_irradiance_recovery_clears() {
        let sample = ReadingSample {
            solar_irradiance: Some(400.0),
            ..Default::default()
        };
        let events = evaluate(sample, &no_derived(), None, &[10.0, 10.0], &thresholds());
        assert!(has_clear(&events, AlertMetric::Irradiance));
    }

    #[test]
    fn test_power_drop_warn_and_critical_by_magnitude() {
        // 5 kW rated at 1000 W/m² expects 5 kW
        let warn_sample = ReadingSample {
            solar_irradiance: Some(1000.0),
            power_output_kw: Some(2.5), // 50% deficit, >= 40%
            ..Default::default()
        };
        let events = evaluate(warn_sample, &no_derived(), Some(5.0), &[], &thresholds());
        match find_breach(&events, AlertMetric::PowerOutput) {
            Some(ThresholdEvent::Breach { severity, .. }) => {
                assert_eq!(*severity, AlertSeverity::Warn)
            }
            other => panic!("Expected power breach, got {:?}", other),
        }

        let critical_sample = ReadingSample {
            solar_irradiance: Some(1000.0),
            power_output_kw: Some(1.0), // 80% deficit, >= 60% (1.5 × 40%)
            ..Default::default()
        };
        let events = evaluate(critical_sample, &no_derived(), Some(5.0), &[], &thresholds());
        match find_breach(&events, AlertMetric::PowerOutput) {
            Some(ThresholdEvent::Breach { severity, .. }) => {
                assert_eq!(*severity, AlertSeverity::Critical)
            }
            other => panic!("Expected power breach, got {:?}", other),
        }
    }

    #[test]
    fn test_power_drop_within_expectation_clears() {
        let sample = ReadingSample {
            solar_irradiance: Some(1000.0),
            power_output_kw: Some(4.5),
            ..Default::default()
        };
        let events = evaluate(sample, &no_derived(), Some(5.0), &[], &thresholds());
        assert!(has_clear(&events, AlertMetric::PowerOutput));
    }

    #[test]
    fn test_power_drop_not_evaluated_in_darkness() {
        // Below the irradiance floor there is no expectation; a zero output
        // at night neither breaches nor clears
        let sample = ReadingSample {
            solar_irradiance: Some(0.0),
            power_output_kw: Some(0.0),
            ..Default::default()
        };
        let events = evaluate(sample, &no_derived(), Some(5.0), &[], &thresholds());
        assert!(find_breach(&events, AlertMetric::PowerOutput).is_none());
        assert!(!has_clear(&events, AlertMetric::PowerOutput));
    }

    #[test]
    fn test_low_efficiency_breach_and_clear() {
        let derived = DerivedMetrics {
            efficiency_percent: Some(6.0),
            performance_ratio: None,
            data_quality_score: 1.0,
        };
        let events = evaluate(ReadingSample::default(), &derived, None, &[], &thresholds());
        match find_breach(&events, AlertMetric::Efficiency) {
            Some(ThresholdEvent::Breach {
                severity, value, ..
            }) => {
                assert_eq!(*severity, AlertSeverity::Warn);
                assert_eq!(*value, 6.0);
            }
            other => panic!("Expected efficiency breach, got {:?}", other),
        }

        let derived = DerivedMetrics {
            efficiency_percent: Some(18.0),
            performance_ratio: None,
            data_quality_score: 1.0,
        };
        let events = evaluate(ReadingSample::default(), &derived, None, &[], &thresholds());
        assert!(has_clear(&events, AlertMetric::Efficiency));
    }
}
