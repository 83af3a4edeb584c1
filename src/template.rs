//! Pure rendering of the reminder email: subject line, time-until-due
//! phrasing, and the HTML body.

use crate::models::ReminderTask;
use chrono::{DateTime, Utc};

const SUBJECT_TEXT_LIMIT: usize = 50;

/// Human-readable time until the task is due. Hour granularity below a
/// day, day granularity (rounded) at or above, with noun agreement
/// following the rounded magnitude.
pub fn time_until_due(hours_until_due: f64) -> String {
    let hours = hours_until_due.round();
    if hours < 24.0 {
        let hours = hours as i64;
        format!("{} hour{}", hours, if hours == 1 { "" } else { "s" })
    } else {
        let days = (hours / 24.0).round() as i64;
        format!("{} day{}", days, if days == 1 { "" } else { "s" })
    }
}

/// Task text as it appears in the subject: at most 50 characters, with an
/// ellipsis only when something was actually cut.
pub fn truncate_for_subject(text: &str) -> String {
    if text.chars().count() > SUBJECT_TEXT_LIMIT {
        let head: String = text.chars().take(SUBJECT_TEXT_LIMIT).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}

pub fn subject(task: &ReminderTask) -> String {
    format!(
        "⏰ Task due {}: {}",
        time_until_due(task.hours_until_due),
        truncate_for_subject(&task.text)
    )
}

pub fn due_date_long(due_date: &DateTime<Utc>) -> String {
    due_date.format("%A, %B %-d, %Y at %I:%M %p").to_string()
}

pub fn reminder_html(task: &ReminderTask, app_url: &str) -> String {
    let time_until = time_until_due(task.hours_until_due);
    let due_formatted = due_date_long(&task.due_date);
    let task_url = format!("{}/contacts/{}", app_url, task.contact_id);
    let settings_url = format!("{}/settings", app_url);

    let company_row = match task.company_name.as_deref() {
        Some(company) if !company.is_empty() => format!(
            r#"
    <div style="margin-bottom: 8px;">
      <span style="color: #666; font-size: 14px;">Company:</span>
      <strong style="margin-left: 8px;">{}</strong>
    </div>
"#,
            company
        ),
        _ => String::new(),
    };

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>Task Reminder</title>
</head>
<body style="font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, 'Helvetica Neue', Arial, sans-serif; line-height: 1.6; color: #333; max-width: 600px; margin: 0 auto; padding: 20px;">
  <div style="background-color: #f8f9fa; border-radius: 8px; padding: 24px; margin-bottom: 24px;">
    <h2 style="margin-top: 0; color: #1a1a1a;">📋 Task Reminder</h2>
    <p style="font-size: 16px; margin-bottom: 8px;">Hi {sales_name},</p>
    <p style="font-size: 16px;">You have a task due in <strong>{time_until}</strong>:</p>
  </div>

  <div style="background-color: white; border: 1px solid #e0e0e0; border-radius: 8px; padding: 20px; margin-bottom: 24px;">
    <div style="display: flex; align-items: center; margin-bottom: 12px;">
      <span style="background-color: #f0f0f0; padding: 4px 12px; border-radius: 4px; font-size: 14px; font-weight: 500;">{task_type}</span>
    </div>

    <h3 style="margin-top: 0; margin-bottom: 12px; color: #1a1a1a;">{text}</h3>

    <div style="margin-bottom: 8px;">
      <span style="color: #666; font-size: 14px;">Contact:</span>
      <strong style="margin-left: 8px;">{contact_name}</strong>
    </div>
{company_row}
    <div style="margin-bottom: 16px;">
      <span style="color: #666; font-size: 14px;">Due:</span>
      <strong style="margin-left: 8px; color: #d32f2f;">{due_formatted}</strong>
    </div>

    <a href="{task_url}" style="display: inline-block; background-color: #2563eb; color: white; text-decoration: none; padding: 12px 24px; border-radius: 6px; font-weight: 500; margin-top: 8px;">View Task</a>
  </div>

  <div style="text-align: center; color: #666; font-size: 14px; border-top: 1px solid #e0e0e0; padding-top: 16px;">
    <p>This is an automated reminder from Atomic CRM</p>
    <p style="margin-top: 8px;">
      <a href="{settings_url}" style="color: #2563eb; text-decoration: none;">Manage Notification Preferences</a>
    </p>
  </div>
</body>
</html>"#,
        sales_name = task.sales_name,
        time_until = time_until,
        task_type = task.task_type,
        text = task.text,
        contact_name = task.contact_name,
        company_row = company_row,
        due_formatted = due_formatted,
        task_url = task_url,
        settings_url = settings_url,
    )
}
