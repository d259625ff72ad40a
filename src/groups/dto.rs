use serde::{Deserialize, Serialize};

use super::repo_types::{Group, Role};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateGroupRequest {
    pub name: Option<String>,
}

/// Body of `POST /groups/:group_id/join`. Any field left out is taken from the
/// caller's identity.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct JoinGroupRequest {
    pub user_id: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GroupListItem {
    #[serde(flatten)]
    pub group: Group,
    pub role: Role,
}
