use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::{
    error::{DisplayErrorContext, SdkError},
    types::{AttributeValue, ReturnValue},
    Client,
};
use serde_dynamo::aws_sdk_dynamodb_1::{from_item, to_attribute_value, to_item};
use serde_json::Value;
use tracing::debug;

use super::error::StoreError;
use super::keys::{Key, PK_ATTR, SK_ATTR};
use super::table::{key_of, ElementUpdate, Item, SortFilter, Table};

type AwsItem = HashMap<String, AttributeValue>;

const PUT_NEW_CONDITION: &str = "attribute_not_exists(PK) AND attribute_not_exists(SK)";
const APPEND_UPDATE: &str = "SET #list = list_append(if_not_exists(#list, :empty), :values)";
const APPEND_CONDITION: &str = "attribute_exists(PK)";
const QUERY_PREFIX_CONDITION: &str = "PK = :pk AND begins_with(SK, :prefix)";

/// Update and condition expressions for writing `#field` of element `index`
/// of `#list`, only while that element's `#match` still equals `:match`.
fn element_update_expressions(index: usize) -> (String, String) {
    (
        format!("SET #list[{index}].#field = :value"),
        format!("#list[{index}].#match = :match"),
    )
}

/// Filter expression and `:sk` operand for a sort-key scan.
fn scan_filter<'a>(filter: SortFilter<'a>) -> (&'static str, &'a str) {
    match filter {
        SortFilter::Equals(v) => ("SK = :sk", v),
        SortFilter::BeginsWith(p) => ("begins_with(SK, :sk)", p),
    }
}

/// DynamoDB-backed table with `PK` (hash) / `SK` (range) string keys.
#[derive(Clone)]
pub struct DynamoTable {
    client: Client,
    table_name: String,
}

impl DynamoTable {
    pub fn new(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }
}

fn unavailable<E, R>(op: &str, err: SdkError<E, R>) -> StoreError
where
    E: std::error::Error + 'static,
    R: std::fmt::Debug,
{
    StoreError::Unavailable(format!("dynamodb {op}: {}", DisplayErrorContext(&err)))
}

fn encode(item: &Item) -> Result<AwsItem, StoreError> {
    to_item(item).map_err(|e| StoreError::Malformed(e.to_string()))
}

fn encode_value(value: &Value) -> Result<AttributeValue, StoreError> {
    to_attribute_value(value).map_err(|e| StoreError::Malformed(e.to_string()))
}

fn decode(item: AwsItem) -> Result<Item, StoreError> {
    from_item(item).map_err(|e| StoreError::Malformed(e.to_string()))
}

fn decode_all(items: Vec<AwsItem>) -> Result<Vec<Item>, StoreError> {
    items.into_iter().map(decode).collect()
}

#[async_trait]
impl Table for DynamoTable {
    async fn get(&self, key: &Key) -> Result<Option<Item>, StoreError> {
        let out = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key(PK_ATTR, AttributeValue::S(key.pk.clone()))
            .key(SK_ATTR, AttributeValue::S(key.sk.clone()))
            .send()
            .await
            .map_err(|e| unavailable("get_item", e))?;
        out.item.map(decode).transpose()
    }

    async fn put_new(&self, item: Item) -> Result<Item, StoreError> {
        let key = key_of(&item)?;
        let result = self
            .client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(encode(&item)?))
            .condition_expression(PUT_NEW_CONDITION)
            .send()
            .await;
        match result {
            Ok(_) => Ok(item),
            Err(err)
                if err
                    .as_service_error()
                    .is_some_and(|e| e.is_conditional_check_failed_exception()) =>
            {
                debug!(pk = %key.pk, sk = %key.sk, "conditional put lost");
                Err(StoreError::AlreadyExists {
                    pk: key.pk,
                    sk: key.sk,
                })
            }
            Err(err) => Err(unavailable("put_item", err)),
        }
    }

    async fn append_to_list(
        &self,
        key: &Key,
        attr: &str,
        values: Vec<Value>,
    ) -> Result<Option<Item>, StoreError> {
        let values = values
            .iter()
            .map(encode_value)
            .collect::<Result<Vec<_>, _>>()?;
        let result = self
            .client
            .update_item()
            .table_name(&self.table_name)
            .key(PK_ATTR, AttributeValue::S(key.pk.clone()))
            .key(SK_ATTR, AttributeValue::S(key.sk.clone()))
            .update_expression(APPEND_UPDATE)
            .condition_expression(APPEND_CONDITION)
            .expression_attribute_names("#list", attr)
            .expression_attribute_values(":empty", AttributeValue::L(Vec::new()))
            .expression_attribute_values(":values", AttributeValue::L(values))
            .return_values(ReturnValue::AllNew)
            .send()
            .await;
        match result {
            Ok(out) => out.attributes.map(decode).transpose(),
            Err(err)
                if err
                    .as_service_error()
                    .is_some_and(|e| e.is_conditional_check_failed_exception()) =>
            {
                Ok(None)
            }
            Err(err) => Err(unavailable("update_item", err)),
        }
    }

    async fn update_list_element(
        &self,
        key: &Key,
        update: ElementUpdate<'_>,
    ) -> Result<Option<Item>, StoreError> {
        let index = update.index;
        let (update_expression, condition) = element_update_expressions(index);
        let result = self
            .client
            .update_item()
            .table_name(&self.table_name)
            .key(PK_ATTR, AttributeValue::S(key.pk.clone()))
            .key(SK_ATTR, AttributeValue::S(key.sk.clone()))
            .update_expression(update_expression)
            .condition_expression(condition)
            .expression_attribute_names("#list", update.list)
            .expression_attribute_names("#field", update.field)
            .expression_attribute_names("#match", update.match_field)
            .expression_attribute_values(":value", encode_value(&update.value)?)
            .expression_attribute_values(":match", AttributeValue::S(update.match_value.to_string()))
            .return_values(ReturnValue::AllNew)
            .send()
            .await;
        match result {
            Ok(out) => out.attributes.map(decode).transpose(),
            Err(err)
                if err
                    .as_service_error()
                    .is_some_and(|e| e.is_conditional_check_failed_exception()) =>
            {
                debug!(pk = %key.pk, sk = %key.sk, index, "element guard failed");
                Ok(None)
            }
            Err(err) => Err(unavailable("update_item", err)),
        }
    }

    async fn query_prefix(&self, pk: &str, sk_prefix: &str) -> Result<Vec<Item>, StoreError> {
        let items = self
            .client
            .query()
            .table_name(&self.table_name)
            .key_condition_expression(QUERY_PREFIX_CONDITION)
            .expression_attribute_values(":pk", AttributeValue::S(pk.to_string()))
            .expression_attribute_values(":prefix", AttributeValue::S(sk_prefix.to_string()))
            .into_paginator()
            .items()
            .send()
            .try_collect()
            .await
            .map_err(|e| unavailable("query", e))?;
        decode_all(items)
    }

    async fn scan(&self, filter: SortFilter<'_>) -> Result<Vec<Item>, StoreError> {
        let (expression, operand) = scan_filter(filter);
        let items = self
            .client
            .scan()
            .table_name(&self.table_name)
            .filter_expression(expression)
            .expression_attribute_values(":sk", AttributeValue::S(operand.to_string()))
            .into_paginator()
            .items()
            .send()
            .try_collect()
            .await
            .map_err(|e| unavailable("scan", e))?;
        debug!(count = items.len(), "scan complete");
        decode_all(items)
    }
}
