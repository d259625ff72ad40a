use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

use super::error::StoreError;
use super::keys::{Key, PK_ATTR, SK_ATTR};

/// One stored record, including its `PK` / `SK` attributes.
pub type Item = Map<String, Value>;

/// Sort-key predicate applied during a full scan.
#[derive(Debug, Clone, Copy)]
pub enum SortFilter<'a> {
    Equals(&'a str),
    BeginsWith(&'a str),
}

impl SortFilter<'_> {
    pub fn matches(&self, sk: &str) -> bool {
        match self {
            SortFilter::Equals(v) => sk == *v,
            SortFilter::BeginsWith(p) => sk.starts_with(p),
        }
    }
}

/// Sets `list[index].field = value`, provided that element's `match_field`
/// still equals `match_value`.
#[derive(Debug, Clone)]
pub struct ElementUpdate<'a> {
    pub list: &'a str,
    pub index: usize,
    pub match_field: &'a str,
    pub match_value: &'a str,
    pub field: &'a str,
    pub value: Value,
}

/// The single key-value table both groups and bills live in.
#[async_trait]
pub trait Table: Send + Sync {
    async fn get(&self, key: &Key) -> Result<Option<Item>, StoreError>;

    /// Writes `item` only if nothing occupies its key yet.
    async fn put_new(&self, item: Item) -> Result<Item, StoreError>;

    /// Atomically appends to a list attribute of an existing record, creating
    /// the list if absent. `None` when the record does not exist.
    async fn append_to_list(
        &self,
        key: &Key,
        attr: &str,
        values: Vec<Value>,
    ) -> Result<Option<Item>, StoreError>;

    /// Targeted update of one list element. `None` when the record is missing
    /// or the guard on the element fails.
    async fn update_list_element(
        &self,
        key: &Key,
        update: ElementUpdate<'_>,
    ) -> Result<Option<Item>, StoreError>;

    /// All records of a partition whose sort key starts with `sk_prefix`, in
    /// sort-key order.
    async fn query_prefix(&self, pk: &str, sk_prefix: &str) -> Result<Vec<Item>, StoreError>;

    async fn scan(&self, filter: SortFilter<'_>) -> Result<Vec<Item>, StoreError>;
}

pub fn to_item<T: Serialize>(record: &T) -> Result<Item, StoreError> {
    match serde_json::to_value(record)? {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::Malformed(format!(
            "record serialized to non-object {other}"
        ))),
    }
}

pub fn from_item<T: DeserializeOwned>(item: Item) -> Result<T, StoreError> {
    Ok(serde_json::from_value(Value::Object(item))?)
}

pub fn key_of(item: &Item) -> Result<Key, StoreError> {
    let attr = |name: &str| {
        item.get(name)
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| StoreError::Malformed(format!("missing {name}")))
    };
    Ok(Key {
        pk: attr(PK_ATTR)?,
        sk: attr(SK_ATTR)?,
    })
}
