use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// First-run state of the deployment, recomputed on every request from the
/// count of administrator accounts. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BootstrapStatus {
    #[serde(rename = "setupRequired")]
    pub setup_required: bool,
}

/// One row of the pending-reminders view. The view owns the "is this due
/// for a reminder now" filter; the dispatcher only reads the projection.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ReminderTask {
    pub id: i64,
    pub contact_id: i64,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub task_type: String,
    pub text: String,
    pub due_date: DateTime<Utc>,
    pub sales_id: i64,
    pub reminder_hours_before: i32,
    pub sales_email: String,
    pub sales_name: String,
    pub contact_name: String,
    pub company_name: Option<String>,
    pub hours_until_due: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    Sent,
    Failed,
}

impl DeliveryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryStatus::Sent => "sent",
            DeliveryStatus::Failed => "failed",
        }
    }
}

/// Per-task result in the aggregate report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskOutcome {
    pub task_id: i64,
    pub status: DeliveryStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Aggregate outcome of one dispatcher invocation. The empty-batch form
/// keeps the short `{message, count}` wire shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DispatchReport {
    Empty {
        message: String,
        count: usize,
    },
    Processed {
        message: String,
        total: usize,
        sent: usize,
        failed: usize,
        results: Vec<TaskOutcome>,
    },
}

impl DispatchReport {
    pub fn empty() -> Self {
        DispatchReport::Empty {
            message: "No reminders to send".to_string(),
            count: 0,
        }
    }

    pub fn from_outcomes(results: Vec<TaskOutcome>) -> Self {
        let sent = results
            .iter()
            .filter(|r| r.status == DeliveryStatus::Sent)
            .count();
        let failed = results
            .iter()
            .filter(|r| r.status == DeliveryStatus::Failed)
            .count();
        DispatchReport::Processed {
            message: "Reminder processing complete".to_string(),
            total: results.len(),
            sent,
            failed,
            results,
        }
    }

    pub fn total(&self) -> usize {
        match self {
            DispatchReport::Empty { count, .. } => *count,
            DispatchReport::Processed { total, .. } => *total,
        }
    }

    pub fn sent(&self) -> usize {
        match self {
            DispatchReport::Empty { .. } => 0,
            DispatchReport::Processed { sent, .. } => *sent,
        }
    }

    pub fn failed(&self) -> usize {
        match self {
            DispatchReport::Empty { .. } => 0,
            DispatchReport::Processed { failed, .. } => *failed,
        }
    }

    pub fn results(&self) -> &[TaskOutcome] {
        match self {
            DispatchReport::Empty { .. } => &[],
            DispatchReport::Processed { results, .. } => results,
        }
    }
}
