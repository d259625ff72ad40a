use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use super::{
    dto::{CreateGroupRequest, GroupListItem, JoinGroupRequest},
    repo,
    repo_types::{Group, Identity, NewMember},
};
use crate::{
    auth::AuthUser,
    error::{api_error, store_failure, ApiError},
    extract::LenientJson,
    notify::subscribe_best_effort,
    state::AppState,
};

pub fn group_routes() -> Router<AppState> {
    Router::new()
        .route("/groups", get(list_groups).post(create_group))
        .route("/groups/:group_id", get(get_group))
        .route("/groups/:group_id/join", post(join_group))
}

#[instrument(skip_all, fields(user_id = %user.user_id))]
pub async fn list_groups(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<GroupListItem>>, ApiError> {
    let groups = repo::list_groups_for_user(state.table.as_ref(), &user.user_id)
        .await
        .map_err(|e| store_failure(e, "Error listing groups"))?;
    Ok(Json(
        groups
            .into_iter()
            .map(|(group, role)| GroupListItem { group, role })
            .collect(),
    ))
}

#[instrument(skip_all, fields(user_id = %user.user_id))]
pub async fn create_group(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    LenientJson(body): LenientJson<CreateGroupRequest>,
) -> Result<(StatusCode, Json<Group>), ApiError> {
    let Some(name) = body.name.filter(|n| !n.trim().is_empty()) else {
        return Err(api_error(StatusCode::BAD_REQUEST, "name is required"));
    };

    let group_id = format!("grp-{}", Uuid::new_v4());
    let group = repo::create_group(state.table.as_ref(), &group_id, &user.identity(), &name)
        .await
        .map_err(|e| store_failure(e, "Error creating group"))?;

    info!(%group_id, "group created");
    Ok((StatusCode::CREATED, Json(group)))
}

#[instrument(skip(state, _user))]
pub async fn get_group(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Path(group_id): Path<String>,
) -> Result<Json<Group>, ApiError> {
    repo::get_group(state.table.as_ref(), &group_id)
        .await
        .map_err(|e| store_failure(e, "Error getting group"))?
        .map(Json)
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, "Group not found"))
}

/// Adds the member, then subscribes their email to reminders. A failed
/// subscription does not undo or fail the join.
#[instrument(skip(state, user, body), fields(caller = %user.user_id))]
pub async fn join_group(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(group_id): Path<String>,
    LenientJson(body): LenientJson<JoinGroupRequest>,
) -> Result<Json<Group>, ApiError> {
    let identity = Identity {
        user_id: body.user_id.unwrap_or_else(|| user.user_id.clone()),
        email: body.email.or_else(|| user.email.clone()),
        name: body.name.or_else(|| Some(user.name.clone())),
    };
    let email = identity.email.clone();

    let updated = repo::add_member(
        state.table.as_ref(),
        &group_id,
        NewMember {
            identity,
            role: None,
        },
    )
    .await
    .map_err(|e| store_failure(e, "Error joining group"))?
    .ok_or_else(|| api_error(StatusCode::NOT_FOUND, "Group not found"))?;

    subscribe_best_effort(state.notifier.as_ref(), email.as_deref()).await;

    info!(%group_id, members = updated.members.len(), "member joined");
    Ok(Json(updated))
}
