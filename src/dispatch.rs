//! Reminder batch job: one invocation fetches every pending task, fans out
//! one email per task, records each attempt, and aggregates a report.

use crate::db::ReminderStore;
use crate::email::{Mailer, OutboundEmail};
use crate::models::{DeliveryStatus, DispatchReport, ReminderTask, TaskOutcome};
use crate::template;
use anyhow::Result;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

pub struct Dispatcher {
    store: Arc<dyn ReminderStore>,
    mailer: Arc<dyn Mailer>,
    from_email: String,
    app_url: String,
    // Caps concurrent sends to stay inside the email provider's rate limit.
    send_permits: Semaphore,
}

impl Dispatcher {
    pub fn new(
        store: Arc<dyn ReminderStore>,
        mailer: Arc<dyn Mailer>,
        from_email: String,
        app_url: String,
        max_concurrent_sends: usize,
    ) -> Self {
        Self {
            store,
            mailer,
            from_email,
            app_url,
            send_permits: Semaphore::new(max_concurrent_sends.max(1)),
        }
    }

    /// Runs one batch. Only a failure of the initial fetch is an error;
    /// per-task failures are recorded and reported in-band.
    pub async fn run(&self) -> Result<DispatchReport> {
        let tasks = self.store.fetch_pending_reminders().await?;

        if tasks.is_empty() {
            return Ok(DispatchReport::empty());
        }

        info!(count = tasks.len(), "found tasks needing reminders");

        // Full fan-out/fan-in: every task runs concurrently and the
        // invocation waits for all of them to settle.
        let outcomes =
            futures::future::join_all(tasks.into_iter().map(|task| self.process_task(task)))
                .await;

        let report = DispatchReport::from_outcomes(outcomes);
        info!(
            total = report.total(),
            sent = report.sent(),
            failed = report.failed(),
            "reminder processing complete"
        );
        Ok(report)
    }

    /// One task's unit of work. Never fails the batch: any error ends up as
    /// a failed outcome and a failed delivery-log row.
    async fn process_task(&self, task: ReminderTask) -> TaskOutcome {
        // The semaphore is never closed, so acquire only fails if it were.
        let _permit = self.send_permits.acquire().await.ok();

        match self.send_reminder(&task).await {
            Ok(()) => {
                info!(task_id = task.id, email = %task.sales_email, "reminder sent");
                TaskOutcome {
                    task_id: task.id,
                    status: DeliveryStatus::Sent,
                    email: Some(task.sales_email),
                    error: None,
                }
            }
            Err(e) => {
                let message = format!("{:#}", e);
                error!(task_id = task.id, error = %message, "failed to send reminder");
                if let Err(log_err) = self
                    .store
                    .mark_delivery(
                        task.id,
                        &task.sales_email,
                        DeliveryStatus::Failed,
                        Some(&message),
                    )
                    .await
                {
                    warn!(task_id = task.id, error = %format!("{:#}", log_err), "failed to record failed delivery");
                }
                TaskOutcome {
                    task_id: task.id,
                    status: DeliveryStatus::Failed,
                    email: None,
                    error: Some(message),
                }
            }
        }
    }

    async fn send_reminder(&self, task: &ReminderTask) -> Result<()> {
        let email = OutboundEmail {
            from: self.from_email.clone(),
            to: task.sales_email.clone(),
            subject: template::subject(task),
            html: template::reminder_html(task, &self.app_url),
        };

        self.mailer.send(&email).await?;

        // Recording the sent row is part of the task's success path; if it
        // fails the task counts as failed and the next run may resend.
        self.store
            .mark_delivery(task.id, &task.sales_email, DeliveryStatus::Sent, None)
            .await?;

        Ok(())
    }
}
