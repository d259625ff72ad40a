use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AwsConfig {
    pub region: String,
    /// Local DynamoDB / LocalStack endpoint. Static credentials are used when set.
    pub endpoint_url: Option<String>,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub table_name: String,
    pub sns_topic_arn: Option<String>,
    pub aws: AwsConfig,
    /// `None` runs the API in stub-user mode.
    pub jwt: Option<JwtConfig>,
    pub reminder_interval_secs: Option<u64>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let table_name = std::env::var("TABLE_NAME").unwrap_or_else(|_| "roomsplit".into());
        let sns_topic_arn = non_empty_var("SNS_TOPIC_ARN");
        let aws = AwsConfig {
            region: std::env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".into()),
            endpoint_url: non_empty_var("AWS_ENDPOINT_URL"),
            access_key: non_empty_var("AWS_ACCESS_KEY_ID"),
            secret_key: non_empty_var("AWS_SECRET_ACCESS_KEY"),
        };
        let jwt = non_empty_var("JWT_SECRET").map(|secret| JwtConfig {
            secret,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "billsplit".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "billsplit-users".into()),
        });
        let reminder_interval_secs = std::env::var("REMINDER_INTERVAL_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|secs| *secs > 0);
        Ok(Self {
            table_name,
            sns_topic_arn,
            aws,
            jwt,
            reminder_interval_secs,
        })
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
