use crate::config::{AppConfig, AwsConfig};
use crate::notify::{Notifier, SnsNotifier};
use crate::store::{DynamoTable, MemoryTable, Table};
use aws_config::{BehaviorVersion, SdkConfig};
use aws_credential_types::Credentials;
use aws_sdk_dynamodb::config::Region;
use std::sync::Arc;
use tracing::{info, warn};

/// Shared handles, built once at startup and cloned into every request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub table: Arc<dyn Table>,
    pub notifier: Arc<dyn Notifier>,
}

async fn load_aws(cfg: &AwsConfig) -> SdkConfig {
    let mut loader =
        aws_config::defaults(BehaviorVersion::latest()).region(Region::new(cfg.region.clone()));
    if let Some(endpoint) = &cfg.endpoint_url {
        loader = loader.endpoint_url(endpoint);
        if let (Some(access_key), Some(secret_key)) = (&cfg.access_key, &cfg.secret_key) {
            loader = loader.credentials_provider(Credentials::new(
                access_key, secret_key, None, None, "static",
            ));
        }
    }
    loader.load().await
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let shared = load_aws(&config.aws).await;

        let table = match std::env::var("STORE_BACKEND").as_deref() {
            Ok("memory") => {
                warn!("using in-memory table; data is lost on exit");
                Arc::new(MemoryTable::new()) as Arc<dyn Table>
            }
            _ => Arc::new(DynamoTable::new(
                aws_sdk_dynamodb::Client::new(&shared),
                config.table_name.clone(),
            )) as Arc<dyn Table>,
        };

        let notifier = Arc::new(SnsNotifier::new(
            aws_sdk_sns::Client::new(&shared),
            config.sns_topic_arn.clone(),
        )) as Arc<dyn Notifier>;

        if config.jwt.is_none() {
            warn!("JWT_SECRET not set, every request runs as the stub user");
        }
        info!(table = %config.table_name, "state initialised");

        Ok(Self::from_parts(config, table, notifier))
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        table: Arc<dyn Table>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            config,
            table,
            notifier,
        }
    }

    #[cfg(test)]
    pub fn fake() -> Self {
        Self::fake_with_notifier(Arc::new(crate::notify::testing::RecordingNotifier::default()))
    }

    /// In-memory table, stub-user auth, and the given notifier.
    #[cfg(test)]
    pub fn fake_with_notifier(notifier: Arc<dyn Notifier>) -> Self {
        let config = Arc::new(AppConfig {
            table_name: "test".into(),
            sns_topic_arn: None,
            aws: AwsConfig {
                region: "us-east-1".into(),
                endpoint_url: None,
                access_key: None,
                secret_key: None,
            },
            jwt: None,
            reminder_interval_secs: None,
        });
        Self::from_parts(config, Arc::new(MemoryTable::new()), notifier)
    }
}
