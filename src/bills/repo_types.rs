use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::store::{
    keys::{bill_id_from_sk, bill_key, group_id_from_pk},
    StoreError,
};

pub const PAID: &str = "paid";

/// One user's portion of a bill. A missing status is kept missing and
/// counts as unpaid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Share {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    pub group_id: String,
    pub bill_id: String,
    pub description: String,
    pub amount: f64,
    pub due_date: Option<String>,
    pub created_by: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub shares: Vec<Share>,
}

impl Bill {
    pub fn share_of(&self, user_id: &str) -> Option<&Share> {
        self.shares.iter().find(|s| s.user_id == user_id)
    }
}

/// Input to `create_bill`. Missing `shares` means none.
#[derive(Debug, Clone)]
pub struct NewBill {
    pub description: String,
    pub amount: f64,
    pub due_date: Option<String>,
    pub shares: Option<Vec<Share>>,
}

/// Bill record as laid out in the table.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillItem {
    #[serde(rename = "PK")]
    pub pk: String,
    #[serde(rename = "SK")]
    pub sk: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub due_date: Option<String>,
    pub created_by: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(default)]
    pub shares: Vec<Share>,
}

impl From<&Bill> for BillItem {
    fn from(b: &Bill) -> Self {
        let key = bill_key(&b.group_id, &b.bill_id);
        Self {
            pk: key.pk,
            sk: key.sk,
            description: b.description.clone(),
            amount: b.amount,
            due_date: b.due_date.clone(),
            created_by: b.created_by.clone(),
            created_at: b.created_at,
            shares: b.shares.clone(),
        }
    }
}

impl TryFrom<BillItem> for Bill {
    type Error = StoreError;

    fn try_from(item: BillItem) -> Result<Self, Self::Error> {
        let group_id = group_id_from_pk(&item.pk)
            .ok_or_else(|| StoreError::Malformed(format!("not a group partition: {}", item.pk)))?
            .to_string();
        let bill_id = bill_id_from_sk(&item.sk)
            .ok_or_else(|| StoreError::Malformed(format!("not a bill sort key: {}", item.sk)))?
            .to_string();
        Ok(Self {
            group_id,
            bill_id,
            description: item.description,
            amount: item.amount,
            due_date: item.due_date,
            created_by: item.created_by,
            created_at: item.created_at,
            shares: item.shares,
        })
    }
}
