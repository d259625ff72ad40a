use anyhow::Context;
use async_trait::async_trait;
use aws_sdk_sns::Client;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, warn};

/// Outbound notification channel for reminders.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn subscribe_email(&self, email: &str) -> anyhow::Result<()>;
    async fn publish(&self, message: &str, subject: &str) -> anyhow::Result<()>;
}

#[derive(Clone)]
pub struct SnsNotifier {
    client: Client,
    topic_arn: Option<String>,
}

impl SnsNotifier {
    pub fn new(client: Client, topic_arn: Option<String>) -> Self {
        Self { client, topic_arn }
    }
}

#[async_trait]
impl Notifier for SnsNotifier {
    async fn subscribe_email(&self, email: &str) -> anyhow::Result<()> {
        let Some(topic_arn) = &self.topic_arn else {
            warn!("SNS_TOPIC_ARN not set, skipping subscription");
            return Ok(());
        };
        info!(%email, %topic_arn, "subscribing email to reminder topic");
        self.client
            .subscribe()
            .topic_arn(topic_arn)
            .protocol("email")
            .endpoint(email)
            .return_subscription_arn(true)
            .send()
            .await
            .context("sns subscribe")?;
        Ok(())
    }

    async fn publish(&self, message: &str, subject: &str) -> anyhow::Result<()> {
        let Some(topic_arn) = &self.topic_arn else {
            warn!("SNS_TOPIC_ARN not set, skipping publish");
            return Ok(());
        };
        info!(%topic_arn, "publishing reminder");
        self.client
            .publish()
            .topic_arn(topic_arn)
            .subject(subject)
            .message(message)
            .send()
            .await
            .context("sns publish")?;
        Ok(())
    }
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Subscribes `email` to reminders. Never fails: problems are logged and the
/// caller carries on.
pub async fn subscribe_best_effort(notifier: &dyn Notifier, email: Option<&str>) {
    let Some(email) = email.map(str::trim).filter(|e| !e.is_empty()) else {
        warn!("no email provided, skipping subscription");
        return;
    };
    if !is_valid_email(email) {
        warn!(%email, "invalid email, skipping subscription");
        return;
    }
    if let Err(e) = notifier.subscribe_email(email).await {
        warn!(error = %e, %email, "email subscription failed (non-fatal)");
    }
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use tokio::sync::Mutex;

    /// Captures calls instead of sending anything. `failing()` makes every
    /// call return an error after recording it.
    #[derive(Default)]
    pub struct RecordingNotifier {
        fail: bool,
        subscribed: Mutex<Vec<String>>,
        published: Mutex<Vec<(String, String)>>,
    }

    impl RecordingNotifier {
        pub fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        pub async fn subscribed(&self) -> Vec<String> {
            self.subscribed.lock().await.clone()
        }

        pub async fn published(&self) -> Vec<(String, String)> {
            self.published.lock().await.clone()
        }
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn subscribe_email(&self, email: &str) -> anyhow::Result<()> {
            self.subscribed.lock().await.push(email.to_string());
            if self.fail {
                anyhow::bail!("subscribe refused");
            }
            Ok(())
        }

        async fn publish(&self, message: &str, subject: &str) -> anyhow::Result<()> {
            self.published
                .lock()
                .await
                .push((message.to_string(), subject.to_string()));
            if self.fail {
                anyhow::bail!("publish refused");
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::RecordingNotifier;
    use super::*;

    #[test]
    fn test_is_valid_email() {
        assert!(is_valid_email("a@b.co"));
        assert!(!is_valid_email("no-at-sign"));
        assert!(!is_valid_email("two words@b.co"));
    }

    #[tokio::test]
    async fn best_effort_swallows_failures() {
        let n = RecordingNotifier::failing();
        subscribe_best_effort(&n, Some("x@example.com")).await;
        assert_eq!(n.subscribed().await, vec!["x@example.com".to_string()]);
    }

    #[tokio::test]
    async fn best_effort_skips_missing_or_invalid_email() {
        let n = RecordingNotifier::default();
        subscribe_best_effort(&n, None).await;
        subscribe_best_effort(&n, Some("   ")).await;
        subscribe_best_effort(&n, Some("nope")).await;
        assert!(n.subscribed().await.is_empty());
    }
}
