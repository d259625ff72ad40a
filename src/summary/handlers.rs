use axum::{extract::State, routing::get, Json, Router};
use tracing::instrument;

use super::services::{summary_for_user, UserSummary};
use crate::{
    auth::AuthUser,
    error::{store_failure, ApiError},
    state::AppState,
};

pub fn summary_routes() -> Router<AppState> {
    Router::new().route("/me/summary", get(get_summary))
}

#[instrument(skip_all, fields(user_id = %user.user_id))]
pub async fn get_summary(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<UserSummary>, ApiError> {
    summary_for_user(state.table.as_ref(), &user.user_id)
        .await
        .map(Json)
        .map_err(|e| store_failure(e, "Error getting summary"))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::{json, Value};

    use crate::{app::testing::call, state::AppState};

    #[tokio::test]
    async fn summary_lists_only_unpaid_shares_of_caller() {
        let state = AppState::fake();
        for (desc, status) in [("Rent", "pending"), ("Power", "paid")] {
            let (created, _) = call(
                state.clone(),
                Method::POST,
                "/groups/grp-1/bills",
                json!({
                    "description": desc,
                    "amount": 20,
                    "shares": [{ "userId": "dummy-user", "amount": 10, "status": status }]
                }),
            )
            .await;
            assert_eq!(created, StatusCode::CREATED);
        }

        let (status, summary) = call(state, Method::GET, "/me/summary", Value::Null).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(summary["userId"], "dummy-user");
        assert_eq!(summary["totalOwed"], 10.0);
        assert_eq!(summary["bills"].as_array().unwrap().len(), 1);
        assert_eq!(summary["bills"][0]["description"], "Rent");
        assert_eq!(summary["bills"][0]["myAmount"], 10.0);
    }
}
