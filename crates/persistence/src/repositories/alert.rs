//! Alert repository.

use chrono::NaiveDate;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::entities::AlertEntity;

const ALERT_COLUMNS: &str = r#"
    id, device_id, metric, severity, value, threshold, message, status,
    acknowledged_by, acknowledged_at, resolved_at, context, raised_at, last_observed_at
"#;

/// Parameters for upserting the active alert of a (device, metric) pair.
#[derive(Debug, Clone)]
pub struct AlertUpsert {
    pub device_id: String,
    pub metric: String,
    pub severity: String,
    pub value: f64,
    pub threshold: f64,
    pub message: String,
    pub context: Option<serde_json::Value>,
}

/// One row of a severity breakdown query.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SeverityCountRow {
    pub device_id: Option<String>,
    pub severity: String,
    pub count: i64,
}

/// Repository for alert ledger operations.
#[derive(Clone)]
pub struct AlertRepository {
    pool: PgPool,
}

impl AlertRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Upsert the active alert for a (device, metric) pair inside the
    /// ingestion transaction. At most one active row per pair exists, backed
    /// by a partial unique index; a repeat breach refreshes the existing row
    /// instead of stacking a duplicate.
    ///
    /// Returns the row and whether it was newly created. `xmax = 0` holds
    /// only for rows inserted by the current transaction.
    pub async fn upsert_active(
        &self,
        conn: &mut PgConnection,
        upsert: &AlertUpsert,
    ) -> Result<(AlertEntity, bool), sqlx::Error> {
        #[derive(sqlx::FromRow)]
        struct Row {
            #[sqlx(flatten)]
            alert: AlertEntity,
            inserted: bool,
        }

        let row = sqlx::query_as::<_, Row>(&format!(
            r#"
            INSERT INTO alerts (device_id, metric, severity, value, threshold, message, status, context)
            VALUES ($1, $2, $3, $4, $5, $6, 'active', $7)
            ON CONFLICT (device_id, metric) WHERE status = 'active'
            DO UPDATE SET
                severity = EXCLUDED.severity,
                value = EXCLUDED.value,
                threshold = EXCLUDED.threshold,
                message = EXCLUDED.message,
                context = EXCLUDED.context,
                last_observed_at = NOW()
            RETURNING {ALERT_COLUMNS}, (xmax = 0) AS inserted
            "#
        ))
        .bind(&upsert.device_id)
        .bind(&upsert.metric)
        .bind(&upsert.severity)
        .bind(upsert.value)
        .bind(upsert.threshold)
        .bind(&upsert.message)
        .bind(&upsert.context)
        .fetch_one(&mut *conn)
        .await?;
        Ok((row.alert, row.inserted))
    }

    /// Resolve the non-terminal alert for a (device, metric) pair inside the
    /// ingestion transaction. Returns the resolved row if one existed.
    pub async fn resolve_for_metric(
        &self,
        conn: &mut PgConnection,
        device_id: &str,
        metric: &str,
    ) -> Result<Option<AlertEntity>, sqlx::Error> {
        sqlx::query_as::<_, AlertEntity>(&format!(
            r#"
            UPDATE alerts
            SET status = 'resolved', resolved_at = NOW()
            WHERE device_id = $1 AND metric = $2 AND status IN ('active', 'acknowledged')
            RETURNING {ALERT_COLUMNS}
            "#
        ))
        .bind(device_id)
        .bind(metric)
        .fetch_optional(&mut *conn)
        .await
    }

    /// Get an alert by ID.
    pub async fn get(&self, id: Uuid) -> Result<Option<AlertEntity>, sqlx::Error> {
        sqlx::query_as::<_, AlertEntity>(&format!(
            "SELECT {ALERT_COLUMNS} FROM alerts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// List non-terminal alerts (active and acknowledged), newest first.
    pub async fn list_open(&self) -> Result<Vec<AlertEntity>, sqlx::Error> {
        sqlx::query_as::<_, AlertEntity>(&format!(
            r#"
            SELECT {ALERT_COLUMNS}
            FROM alerts
            WHERE status IN ('active', 'acknowledged')
            ORDER BY raised_at DESC
            "#
        ))
        .fetch_all(&self.pool)
        .await
    }

    /// Acknowledge an alert. Guarded by the current status so a concurrent
    /// transition loses cleanly; returns None when the row was not in the
    /// active state anymore.
    pub async fn acknowledge(
        &self,
        id: Uuid,
        acknowledged_by: Option<&str>,
    ) -> Result<Option<AlertEntity>, sqlx::Error> {
        sqlx::query_as::<_, AlertEntity>(&format!(
            r#"
            UPDATE alerts
            SET status = 'acknowledged', acknowledged_by = $2, acknowledged_at = NOW()
            WHERE id = $1 AND status = 'active'
            RETURNING {ALERT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(acknowledged_by)
        .fetch_optional(&self.pool)
        .await
    }

    /// Active alert counts per device and severity, for the status surface.
    pub async fn active_counts_by_device(&self) -> Result<Vec<SeverityCountRow>, sqlx::Error> {
        sqlx::query_as::<_, SeverityCountRow>(
            r#"
            SELECT device_id, severity, COUNT(*) AS count
            FROM alerts
            WHERE status = 'active'
            GROUP BY device_id, severity
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    /// Alert counts per device and severity raised inside a date window,
    /// for report aggregation. The window is [start, end] in UTC days.
    pub async fn counts_raised_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<SeverityCountRow>, sqlx::Error> {
        sqlx::query_as::<_, SeverityCountRow>(
            r#"
            SELECT device_id, severity, COUNT(*) AS count
            FROM alerts
            WHERE raised_at >= $1::date
              AND raised_at < $2::date + INTERVAL '1 day'
            GROUP BY device_id, severity
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await
    }

    /// Number of alerts raised for a device on one UTC day.
    pub async fn count_raised_on(
        &self,
        device_id: &str,
        day: NaiveDate,
    ) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM alerts
            WHERE device_id = $1
              AND raised_at >= $2::date
              AND raised_at < $2::date + INTERVAL '1 day'
            "#,
        )
        .bind(device_id)
        .bind(day)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }
}
