use serde::Deserialize;
use serde_json::Value;

use super::repo_types::Share;

/// `amount` is kept loose so that a non-numeric value is a 400, not a
/// deserialization rejection.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateBillRequest {
    pub description: Option<String>,
    pub amount: Option<Value>,
    pub due_date: Option<String>,
    pub shares: Option<Vec<Share>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateShareRequest {
    pub status: Option<String>,
}
