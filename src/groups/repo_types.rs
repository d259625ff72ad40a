use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::store::{
    keys::{group_id_from_pk, group_key},
    StoreError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Owner,
    Member,
}

/// Who is acting: the creator of a group, or someone joining one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: String,
    pub email: Option<String>,
    pub name: Option<String>,
}

/// Input to `add_member`. `role` falls back to `Role::Member`.
#[derive(Debug, Clone)]
pub struct NewMember {
    pub identity: Identity,
    pub role: Option<Role>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub user_id: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub role: Role,
    #[serde(with = "time::serde::rfc3339")]
    pub joined_at: OffsetDateTime,
}

impl Member {
    pub fn new(identity: &Identity, role: Role, joined_at: OffsetDateTime) -> Self {
        Self {
            user_id: identity.user_id.clone(),
            email: identity.email.clone(),
            name: identity.name.clone(),
            role,
            joined_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub group_id: String,
    pub name: String,
    pub created_by: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub members: Vec<Member>,
}

impl Group {
    pub fn role_of(&self, user_id: &str) -> Option<Role> {
        self.members
            .iter()
            .find(|m| m.user_id == user_id)
            .map(|m| m.role)
    }
}

/// Group details record as laid out in the table.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupItem {
    #[serde(rename = "PK")]
    pub pk: String,
    #[serde(rename = "SK")]
    pub sk: String,
    pub name: String,
    pub created_by: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(default)]
    pub members: Vec<Member>,
}

impl From<&Group> for GroupItem {
    fn from(g: &Group) -> Self {
        let key = group_key(&g.group_id);
        Self {
            pk: key.pk,
            sk: key.sk,
            name: g.name.clone(),
            created_by: g.created_by.clone(),
            created_at: g.created_at,
            members: g.members.clone(),
        }
    }
}

impl TryFrom<GroupItem> for Group {
    type Error = StoreError;

    fn try_from(item: GroupItem) -> Result<Self, Self::Error> {
        let group_id = group_id_from_pk(&item.pk)
            .ok_or_else(|| StoreError::Malformed(format!("not a group partition: {}", item.pk)))?
            .to_string();
        Ok(Self {
            group_id,
            name: item.name,
            created_by: item.created_by,
            created_at: item.created_at,
            members: item.members,
        })
    }
}
