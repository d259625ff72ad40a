use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use super::services::{global_unpaid_reminder, REMINDER_SUBJECT};
use crate::notify::Notifier;
use crate::state::AppState;
use crate::store::{StoreError, Table};

#[derive(Debug, Clone, PartialEq)]
pub enum ReminderOutcome {
    /// Nothing unpaid; no notification sent.
    NothingUnpaid,
    Published { reminders: usize },
    /// The report was built but the notification could not be sent.
    PublishFailed { reminders: usize, error: String },
}

/// Scan for unpaid shares and send one notification listing them all.
///
/// Table failures are returned. A publish failure is logged and reported in
/// the outcome.
pub async fn run_reminder(
    table: &dyn Table,
    notifier: &dyn Notifier,
) -> Result<ReminderOutcome, StoreError> {
    info!("running bill reminder job");
    let report = global_unpaid_reminder(table).await?;

    if report.is_empty() {
        info!("no unpaid shares, skipping publish");
        return Ok(ReminderOutcome::NothingUnpaid);
    }

    let reminders = report.lines.len();
    match notifier.publish(&report.message(), REMINDER_SUBJECT).await {
        Ok(()) => {
            info!(reminders, total_owed = report.total_owed, "reminder published");
            Ok(ReminderOutcome::Published { reminders })
        }
        Err(e) => {
            warn!(error = %e, reminders, "reminder publish failed");
            Ok(ReminderOutcome::PublishFailed {
                reminders,
                error: e.to_string(),
            })
        }
    }
}

/// Runs the reminder every `every`, starting one period from now.
pub fn spawn_schedule(state: AppState, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            if let Err(e) = run_reminder(state.table.as_ref(), state.notifier.as_ref()).await {
                error!(error = %e, "scheduled reminder failed");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bills::{repo::create_bill, repo_types::{NewBill, Share}};
    use crate::notify::testing::RecordingNotifier;
    use crate::store::MemoryTable;

    async fn seed(table: &MemoryTable, id: &str, shares: &[(&str, f64, &str)]) {
        create_bill(
            table,
            "g",
            id,
            "alice",
            NewBill {
                description: "Rent".into(),
                amount: 0.0,
                due_date: None,
                shares: Some(
                    shares
                        .iter()
                        .map(|(u, a, s)| Share {
                            user_id: u.to_string(),
                            amount: *a,
                            status: Some(s.to_string()),
                        })
                        .collect(),
                ),
            },
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn nothing_unpaid_does_not_publish() {
        let table = MemoryTable::new();
        seed(&table, "b1", &[("u", 5.0, "paid"), ("v", 5.0, "PAID")]).await;
        let notifier = RecordingNotifier::default();

        let outcome = run_reminder(&table, &notifier).await.unwrap();
        assert_eq!(outcome, ReminderOutcome::NothingUnpaid);
        assert!(notifier.published().await.is_empty());
    }

    #[tokio::test]
    async fn empty_table_does_not_publish() {
        let notifier = RecordingNotifier::default();
        let outcome = run_reminder(&MemoryTable::new(), &notifier).await.unwrap();
        assert_eq!(outcome, ReminderOutcome::NothingUnpaid);
        assert!(notifier.published().await.is_empty());
    }

    #[tokio::test]
    async fn unpaid_shares_publish_once() {
        let table = MemoryTable::new();
        seed(&table, "b1", &[("u", 10.0, "pending"), ("v", 5.0, "Paid")]).await;
        seed(&table, "b2", &[("w", 2.0, "pending")]).await;
        let notifier = RecordingNotifier::default();

        let outcome = run_reminder(&table, &notifier).await.unwrap();
        assert_eq!(outcome, ReminderOutcome::Published { reminders: 2 });

        let published = notifier.published().await;
        assert_eq!(published.len(), 1);
        let (message, subject) = &published[0];
        assert_eq!(subject, REMINDER_SUBJECT);
        assert!(message.contains("There are 2 unpaid shares (approx total $12)."));
        assert!(message.contains(r#"u owes $10 for "Rent" in group g (bill b1), due N/A"#));
        assert!(!message.contains("v owes"));
    }

    #[tokio::test]
    async fn publish_failure_is_reported_not_raised() {
        let table = MemoryTable::new();
        seed(&table, "b1", &[("u", 1.0, "pending")]).await;
        let notifier = RecordingNotifier::failing();

        let outcome = run_reminder(&table, &notifier).await.unwrap();
        assert!(matches!(
            outcome,
            ReminderOutcome::PublishFailed { reminders: 1, .. }
        ));
    }
}
