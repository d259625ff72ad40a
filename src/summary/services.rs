//! Read-only reports over every bill in the table.
//!
//! Both reports scan all bill records; there is no index by user or by paid
//! status. Note the two differ on what counts as paid: the per-user summary
//! matches `"paid"` exactly, the reminder report ignores case. That
//! difference is existing behaviour and is kept on purpose.

use serde::Serialize;

use crate::bills::{
    repo::scan_all_bills,
    repo_types::{Bill, PAID},
};
use crate::store::{StoreError, Table};

pub const REMINDER_SUBJECT: &str = "Housemate bill reminder";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryLine {
    pub group_id: String,
    pub bill_id: String,
    pub description: String,
    pub amount: f64,
    pub due_date: Option<String>,
    pub my_amount: f64,
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub user_id: String,
    pub total_owed: f64,
    pub bills: Vec<SummaryLine>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReminderReport {
    pub lines: Vec<String>,
    pub total_owed: f64,
}

impl ReminderReport {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Body of the single reminder notification.
    pub fn message(&self) -> String {
        format!(
            "{REMINDER_SUBJECT}\n\nThere are {} unpaid shares (approx total ${}).\n\nDetails:\n{}",
            self.lines.len(),
            self.total_owed,
            self.lines.join("\n")
        )
    }
}

/// What `user_id` still owes, one line per bill whose share is not exactly
/// `"paid"`.
pub fn summarize_for_user(bills: &[Bill], user_id: &str) -> UserSummary {
    let mut total_owed = 0.0;
    let mut lines = Vec::new();
    for bill in bills {
        let Some(share) = bill.share_of(user_id) else {
            continue;
        };
        if share.status.as_deref() == Some(PAID) {
            continue;
        }
        total_owed += share.amount;
        lines.push(SummaryLine {
            group_id: bill.group_id.clone(),
            bill_id: bill.bill_id.clone(),
            description: bill.description.clone(),
            amount: bill.amount,
            due_date: bill.due_date.clone(),
            my_amount: share.amount,
            status: share.status.clone(),
        });
    }
    UserSummary {
        user_id: user_id.to_string(),
        total_owed,
        bills: lines,
    }
}

/// Every share whose status is not "paid" in any casing, across all users.
pub fn unpaid_report(bills: &[Bill]) -> ReminderReport {
    let mut report = ReminderReport::default();
    for bill in bills {
        let description = if bill.description.is_empty() {
            "Unnamed bill"
        } else {
            bill.description.as_str()
        };
        let due = bill
            .due_date
            .as_deref()
            .filter(|d| !d.is_empty())
            .unwrap_or("N/A");
        for share in &bill.shares {
            if share
                .status
                .as_deref()
                .is_some_and(|s| s.to_lowercase() == PAID)
            {
                continue;
            }
            let user_id = if share.user_id.is_empty() {
                "unknown-user"
            } else {
                share.user_id.as_str()
            };
            report.total_owed += share.amount;
            report.lines.push(format!(
                "{user_id} owes ${} for \"{description}\" in group {} (bill {}), due {due}",
                share.amount, bill.group_id, bill.bill_id
            ));
        }
    }
    report
}

pub async fn summary_for_user(table: &dyn Table, user_id: &str) -> Result<UserSummary, StoreError> {
    let bills = scan_all_bills(table).await?;
    Ok(summarize_for_user(&bills, user_id))
}

pub async fn global_unpaid_reminder(table: &dyn Table) -> Result<ReminderReport, StoreError> {
    let bills = scan_all_bills(table).await?;
    Ok(unpaid_report(&bills))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bills::repo_types::Share;
    use time::OffsetDateTime;

    fn bill(group: &str, id: &str, desc: &str, due: Option<&str>, shares: &[(&str, f64, &str)]) -> Bill {
        Bill {
            group_id: group.into(),
            bill_id: id.into(),
            description: desc.into(),
            amount: shares.iter().map(|s| s.1).sum(),
            due_date: due.map(str::to_string),
            created_by: "alice".into(),
            created_at: OffsetDateTime::UNIX_EPOCH,
            shares: shares
                .iter()
                .map(|(u, a, s)| Share {
                    user_id: u.to_string(),
                    amount: *a,
                    status: Some(s.to_string()),
                })
                .collect(),
        }
    }

    #[test]
    fn summary_counts_only_unpaid_shares_of_user() {
        let bills = vec![
            bill("g", "b1", "Rent", Some("2026-11-01"), &[("u", 10.0, "pending"), ("v", 3.0, "pending")]),
            bill("g", "b2", "Power", None, &[("u", 5.0, "paid")]),
            bill("h", "b3", "Gas", None, &[("v", 7.0, "pending")]),
        ];
        let s = summarize_for_user(&bills, "u");
        assert_eq!(s.user_id, "u");
        assert_eq!(s.total_owed, 10.0);
        assert_eq!(
            s.bills,
            vec![SummaryLine {
                group_id: "g".into(),
                bill_id: "b1".into(),
                description: "Rent".into(),
                amount: 13.0,
                due_date: Some("2026-11-01".into()),
                my_amount: 10.0,
                status: Some("pending".into()),
            }]
        );
    }

    #[test]
    fn summary_paid_match_is_case_sensitive() {
        let bills = vec![bill("g", "b1", "Rent", None, &[("u", 4.0, "Paid")])];
        let s = summarize_for_user(&bills, "u");
        assert_eq!(s.total_owed, 4.0);
        assert_eq!(s.bills[0].status.as_deref(), Some("Paid"));
    }

    #[test]
    fn share_without_status_is_unpaid_and_reported_as_null() {
        let mut b = bill("g", "b1", "Rent", Some(""), &[("u", 6.0, "pending")]);
        b.shares[0].status = None;
        let bills = vec![b];

        let s = summarize_for_user(&bills, "u");
        assert_eq!(s.total_owed, 6.0);
        assert_eq!(s.bills[0].status, None);
        assert_eq!(serde_json::to_value(&s).unwrap()["bills"][0]["status"], serde_json::Value::Null);

        let r = unpaid_report(&bills);
        assert_eq!(
            r.lines,
            vec![r#"u owes $6 for "Rent" in group g (bill b1), due N/A"#.to_string()]
        );
    }

    #[test]
    fn reminder_ignores_paid_in_any_case() {
        let bills = vec![bill(
            "g",
            "b1",
            "Rent",
            None,
            &[("a", 10.0, "pending"), ("b", 20.0, "Paid"), ("c", 30.0, "PAID")],
        )];
        let r = unpaid_report(&bills);
        assert_eq!(r.total_owed, 10.0);
        assert_eq!(
            r.lines,
            vec![r#"a owes $10 for "Rent" in group g (bill b1), due N/A"#.to_string()]
        );
    }

    #[test]
    fn reminder_line_fallbacks() {
        let bills = vec![bill("g", "b1", "", Some("2026-12-24"), &[("", 2.5, "")])];
        let r = unpaid_report(&bills);
        assert_eq!(
            r.lines,
            vec![r#"unknown-user owes $2.5 for "Unnamed bill" in group g (bill b1), due 2026-12-24"#
                .to_string()]
        );
    }

    #[test]
    fn reminder_message_layout() {
        let r = ReminderReport {
            lines: vec!["line one".into(), "line two".into()],
            total_owed: 12.5,
        };
        assert_eq!(
            r.message(),
            "Housemate bill reminder\n\nThere are 2 unpaid shares (approx total $12.5).\n\nDetails:\nline one\nline two"
        );
        assert!(ReminderReport::default().is_empty());
    }
}
