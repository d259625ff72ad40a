use serde::{Deserialize, Serialize};

use crate::groups::repo_types::Identity;

/// JWT payload issued by the identity provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,    // user ID
    pub exp: usize,     // expires at (unix timestamp)
    pub iss: String,    // issuer
    pub aud: String,    // audience
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub preferred_username: Option<String>,
    #[serde(default, rename = "cognito:username")]
    pub cognito_username: Option<String>,
}

/// The caller of a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    pub user_id: String,
    pub email: Option<String>,
    pub name: String,
}

impl CurrentUser {
    /// Used when no token verification is configured.
    pub fn stub() -> Self {
        Self {
            user_id: "dummy-user".into(),
            email: Some("dummy@example.com".into()),
            name: "Anthony (Stub Mode)".into(),
        }
    }

    pub fn identity(&self) -> Identity {
        Identity {
            user_id: self.user_id.clone(),
            email: self.email.clone(),
            name: Some(self.name.clone()),
        }
    }
}

impl From<Claims> for CurrentUser {
    fn from(c: Claims) -> Self {
        let name = c
            .preferred_username
            .or(c.name)
            .or(c.cognito_username)
            .or_else(|| c.email.clone())
            .unwrap_or_else(|| "Unknown User".into());
        Self {
            user_id: c.sub,
            email: c.email,
            name,
        }
    }
}
