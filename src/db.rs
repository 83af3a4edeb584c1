use crate::models::{DeliveryStatus, ReminderTask};
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};

/// The two store calls the dispatcher makes. Fronted by a trait so the
/// batch logic is testable against an in-memory store.
#[async_trait]
pub trait ReminderStore: Send + Sync {
    async fn fetch_pending_reminders(&self) -> Result<Vec<ReminderTask>>;

    async fn mark_delivery(
        &self,
        task_id: i64,
        recipient_email: &str,
        status: DeliveryStatus,
        error_message: Option<&str>,
    ) -> Result<()>;
}

#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub async fn new(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await
            .context("Failed to connect to Postgres")?;
        Ok(Self { pool })
    }

    /// Setup is complete once at least one administrator account exists.
    pub async fn count_admin_accounts(&self) -> Result<i64> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM crm.sales WHERE administrator")
                .fetch_one(&self.pool)
                .await
                .context("Failed to count administrator accounts")?;
        Ok(count)
    }
}

#[async_trait]
impl ReminderStore for Database {
    async fn fetch_pending_reminders(&self) -> Result<Vec<ReminderTask>> {
        let tasks = sqlx::query_as::<_, ReminderTask>(
            "SELECT id, contact_id, type, text, due_date, sales_id, reminder_hours_before,
                    sales_email, sales_name, contact_name, company_name, hours_until_due
             FROM crm.tasks_pending_reminders",
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch pending reminders")?;

        Ok(tasks)
    }

    async fn mark_delivery(
        &self,
        task_id: i64,
        recipient_email: &str,
        status: DeliveryStatus,
        error_message: Option<&str>,
    ) -> Result<()> {
        // The store procedure owns idempotency and uniqueness of log rows.
        sqlx::query("SELECT crm.mark_reminder_sent($1, $2, $3, $4)")
            .bind(task_id)
            .bind(recipient_email)
            .bind(status.as_str())
            .bind(error_message)
            .execute(&self.pool)
            .await
            .with_context(|| format!("Failed to record delivery for task {}", task_id))?;
        Ok(())
    }
}
