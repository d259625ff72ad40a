//! Composite key layout of the single table.
//!
//! A group's details record and all of its bills share the partition
//! `GROUP#<groupId>`; the sort key tells them apart.

pub const PK_ATTR: &str = "PK";
pub const SK_ATTR: &str = "SK";

pub const GROUP_PREFIX: &str = "GROUP#";
pub const BILL_PREFIX: &str = "BILL#";
pub const DETAILS_SK: &str = "DETAILS";

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Key {
    pub pk: String,
    pub sk: String,
}

pub fn group_partition(group_id: &str) -> String {
    format!("{GROUP_PREFIX}{group_id}")
}

pub fn group_key(group_id: &str) -> Key {
    Key {
        pk: group_partition(group_id),
        sk: DETAILS_SK.to_string(),
    }
}

pub fn bill_key(group_id: &str, bill_id: &str) -> Key {
    Key {
        pk: group_partition(group_id),
        sk: format!("{BILL_PREFIX}{bill_id}"),
    }
}

/// Recovers the group id from a partition value.
pub fn group_id_from_pk(pk: &str) -> Option<&str> {
    pk.strip_prefix(GROUP_PREFIX)
}

/// Recovers the bill id from a bill sort key.
pub fn bill_id_from_sk(sk: &str) -> Option<&str> {
    sk.strip_prefix(BILL_PREFIX)
}
