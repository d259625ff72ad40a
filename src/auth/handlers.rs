use axum::{routing::get, Json, Router};
use tracing::instrument;

use super::{claims::CurrentUser, extractors::AuthUser};
use crate::state::AppState;

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

#[instrument(skip_all, fields(user_id = %user.user_id))]
pub async fn get_me(AuthUser(user): AuthUser) -> Json<CurrentUser> {
    Json(user)
}
