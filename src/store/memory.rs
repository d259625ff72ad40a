use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use super::error::StoreError;
use super::keys::Key;
use super::table::{key_of, ElementUpdate, Item, SortFilter, Table};

/// Process-local table. Used for `STORE_BACKEND=memory` and by the tests.
#[derive(Default)]
pub struct MemoryTable {
    items: RwLock<BTreeMap<Key, Item>>,
}

impl MemoryTable {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Table for MemoryTable {
    async fn get(&self, key: &Key) -> Result<Option<Item>, StoreError> {
        Ok(self.items.read().await.get(key).cloned())
    }

    async fn put_new(&self, item: Item) -> Result<Item, StoreError> {
        let key = key_of(&item)?;
        let mut items = self.items.write().await;
        if items.contains_key(&key) {
            return Err(StoreError::AlreadyExists {
                pk: key.pk,
                sk: key.sk,
            });
        }
        items.insert(key, item.clone());
        Ok(item)
    }

    async fn append_to_list(
        &self,
        key: &Key,
        attr: &str,
        values: Vec<Value>,
    ) -> Result<Option<Item>, StoreError> {
        let mut items = self.items.write().await;
        let Some(item) = items.get_mut(key) else {
            return Ok(None);
        };
        let list = item
            .entry(attr.to_string())
            .or_insert_with(|| Value::Array(Vec::new()));
        match list {
            Value::Array(existing) => existing.extend(values),
            _ => {
                return Err(StoreError::Malformed(format!(
                    "{attr} on {}/{} is not a list",
                    key.pk, key.sk
                )))
            }
        }
        Ok(Some(item.clone()))
    }

    async fn update_list_element(
        &self,
        key: &Key,
        update: ElementUpdate<'_>,
    ) -> Result<Option<Item>, StoreError> {
        let mut items = self.items.write().await;
        let Some(item) = items.get_mut(key) else {
            return Ok(None);
        };
        let element = item
            .get_mut(update.list)
            .and_then(Value::as_array_mut)
            .and_then(|list| list.get_mut(update.index))
            .and_then(Value::as_object_mut);
        let Some(element) = element else {
            return Ok(None);
        };
        if element.get(update.match_field).and_then(Value::as_str) != Some(update.match_value) {
            return Ok(None);
        }
        element.insert(update.field.to_string(), update.value);
        Ok(Some(item.clone()))
    }

    async fn query_prefix(&self, pk: &str, sk_prefix: &str) -> Result<Vec<Item>, StoreError> {
        Ok(self
            .items
            .read()
            .await
            .iter()
            .filter(|(k, _)| k.pk == pk && k.sk.starts_with(sk_prefix))
            .map(|(_, item)| item.clone())
            .collect())
    }

    async fn scan(&self, filter: SortFilter<'_>) -> Result<Vec<Item>, StoreError> {
        Ok(self
            .items
            .read()
            .await
            .iter()
            .filter(|(k, _)| filter.matches(&k.sk))
            .map(|(_, item)| item.clone())
            .collect())
    }
}
