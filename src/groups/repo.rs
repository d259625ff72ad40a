use time::OffsetDateTime;
use tracing::{debug, warn};

use super::repo_types::{Group, GroupItem, Identity, Member, NewMember, Role};
use crate::store::{
    keys::{group_key, DETAILS_SK},
    table::{from_item, to_item, Item, SortFilter},
    StoreError, Table,
};

const MEMBERS_ATTR: &str = "members";

fn decode(item: Item) -> Result<Group, StoreError> {
    from_item::<GroupItem>(item)?.try_into()
}

/// Create a group with `creator` as its sole owner. Fails with
/// `AlreadyExists` if the id is taken; the existing group is left untouched.
pub async fn create_group(
    table: &dyn Table,
    group_id: &str,
    creator: &Identity,
    name: &str,
) -> Result<Group, StoreError> {
    let now = OffsetDateTime::now_utc();
    let group = Group {
        group_id: group_id.to_string(),
        name: name.to_string(),
        created_by: creator.user_id.clone(),
        created_at: now,
        members: vec![Member::new(creator, Role::Owner, now)],
    };
    table.put_new(to_item(&GroupItem::from(&group))?).await?;
    debug!(%group_id, created_by = %group.created_by, "group created");
    Ok(group)
}

pub async fn get_group(table: &dyn Table, group_id: &str) -> Result<Option<Group>, StoreError> {
    table.get(&group_key(group_id)).await?.map(decode).transpose()
}

/// Every group `user_id` belongs to, paired with their role in it.
///
/// Scans all group records; fine while groups are few, a member-id index is
/// needed beyond that. Records that do not decode as a group are logged and
/// skipped.
pub async fn list_groups_for_user(
    table: &dyn Table,
    user_id: &str,
) -> Result<Vec<(Group, Role)>, StoreError> {
    let items = table.scan(SortFilter::Equals(DETAILS_SK)).await?;
    let mut out = Vec::new();
    for item in items {
        let group = match decode(item) {
            Ok(group) => group,
            Err(e) => {
                warn!(error = %e, "skipping undecodable group record");
                continue;
            }
        };
        if group.members.iter().any(|m| m.user_id == user_id) {
            let role = group.role_of(user_id).unwrap_or(Role::Member);
            out.push((group, role));
        }
    }
    Ok(out)
}

/// Append a member with a single atomic list append. `None` if the group does
/// not exist. Joining twice yields two entries.
pub async fn add_member(
    table: &dyn Table,
    group_id: &str,
    member: NewMember,
) -> Result<Option<Group>, StoreError> {
    let member = Member::new(
        &member.identity,
        member.role.unwrap_or(Role::Member),
        OffsetDateTime::now_utc(),
    );
    let value = serde_json::to_value(&member)?;
    let updated = table
        .append_to_list(&group_key(group_id), MEMBERS_ATTR, vec![value])
        .await?;
    updated.map(decode).transpose()
}
