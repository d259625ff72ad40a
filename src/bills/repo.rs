use serde_json::Value;
use time::OffsetDateTime;
use tracing::debug;

use super::repo_types::{Bill, BillItem, NewBill};
use crate::store::{
    keys::{bill_key, group_partition, BILL_PREFIX},
    table::{from_item, to_item, ElementUpdate, Item, SortFilter},
    StoreError, Table,
};

const SHARES_ATTR: &str = "shares";

fn decode(item: Item) -> Result<Bill, StoreError> {
    from_item::<BillItem>(item)?.try_into()
}

/// Store a new bill. Fails with `AlreadyExists` on an id collision. An empty
/// due date is stored as none.
pub async fn create_bill(
    table: &dyn Table,
    group_id: &str,
    bill_id: &str,
    created_by: &str,
    input: NewBill,
) -> Result<Bill, StoreError> {
    let bill = Bill {
        group_id: group_id.to_string(),
        bill_id: bill_id.to_string(),
        description: input.description,
        amount: input.amount,
        due_date: input.due_date.filter(|d| !d.is_empty()),
        created_by: created_by.to_string(),
        created_at: OffsetDateTime::now_utc(),
        shares: input.shares.unwrap_or_default(),
    };
    table.put_new(to_item(&BillItem::from(&bill))?).await?;
    debug!(%group_id, %bill_id, shares = bill.shares.len(), "bill created");
    Ok(bill)
}

pub async fn get_bill(
    table: &dyn Table,
    group_id: &str,
    bill_id: &str,
) -> Result<Option<Bill>, StoreError> {
    table
        .get(&bill_key(group_id, bill_id))
        .await?
        .map(decode)
        .transpose()
}

/// Bills of one group in bill-id order.
pub async fn list_bills_for_group(
    table: &dyn Table,
    group_id: &str,
) -> Result<Vec<Bill>, StoreError> {
    table
        .query_prefix(&group_partition(group_id), BILL_PREFIX)
        .await?
        .into_iter()
        .map(decode)
        .collect()
}

/// Every bill in the table, across all groups. Full scan.
pub async fn scan_all_bills(table: &dyn Table) -> Result<Vec<Bill>, StoreError> {
    table
        .scan(SortFilter::BeginsWith(BILL_PREFIX))
        .await?
        .into_iter()
        .map(decode)
        .collect()
}

/// Set the status of `user_id`'s share, leaving its amount and every other
/// share alone.
///
/// The bill is read only to find the share's position; the write touches that
/// single element and is guarded on its `userId`, so concurrent updates of
/// different shares do not overwrite each other. `None` if the bill or the
/// share does not exist.
pub async fn update_share_status(
    table: &dyn Table,
    group_id: &str,
    bill_id: &str,
    user_id: &str,
    status: &str,
) -> Result<Option<Bill>, StoreError> {
    let Some(bill) = get_bill(table, group_id, bill_id).await? else {
        return Ok(None);
    };
    let Some(index) = bill.shares.iter().position(|s| s.user_id == user_id) else {
        debug!(%group_id, %bill_id, %user_id, "no share for user");
        return Ok(None);
    };

    let update = ElementUpdate {
        list: SHARES_ATTR,
        index,
        match_field: "userId",
        match_value: user_id,
        field: "status",
        value: Value::String(status.to_string()),
    };
    table
        .update_list_element(&bill_key(group_id, bill_id), update)
        .await?
        .map(decode)
        .transpose()
}
