use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use serde_json::Value;
use tracing::{info, instrument};
use uuid::Uuid;

use super::{
    dto::{CreateBillRequest, UpdateShareRequest},
    repo,
    repo_types::{Bill, NewBill},
};
use crate::{
    auth::AuthUser,
    error::{api_error, store_failure, ApiError},
    extract::LenientJson,
    state::AppState,
};

pub fn bill_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/groups/:group_id/bills",
            get(list_bills).post(create_bill),
        )
        .route("/groups/:group_id/bills/:bill_id", get(get_bill))
        .route(
            "/groups/:group_id/bills/:bill_id/shares/:user_id",
            patch(update_share),
        )
}

#[instrument(skip(state, user, body), fields(user_id = %user.user_id))]
pub async fn create_bill(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(group_id): Path<String>,
    LenientJson(body): LenientJson<CreateBillRequest>,
) -> Result<(StatusCode, Json<Bill>), ApiError> {
    let description = body.description.filter(|d| !d.is_empty());
    let amount = body.amount.as_ref().and_then(Value::as_f64);
    let (Some(description), Some(amount)) = (description, amount) else {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            "description and numeric amount are required",
        ));
    };

    let bill_id = format!("bill-{}", Uuid::new_v4());
    let bill = repo::create_bill(
        state.table.as_ref(),
        &group_id,
        &bill_id,
        &user.user_id,
        NewBill {
            description,
            amount,
            due_date: body.due_date,
            shares: body.shares,
        },
    )
    .await
    .map_err(|e| store_failure(e, "Error creating bill"))?;

    info!(%bill_id, amount, "bill created");
    Ok((StatusCode::CREATED, Json(bill)))
}

#[instrument(skip(state, _user))]
pub async fn list_bills(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Path(group_id): Path<String>,
) -> Result<Json<Vec<Bill>>, ApiError> {
    repo::list_bills_for_group(state.table.as_ref(), &group_id)
        .await
        .map(Json)
        .map_err(|e| store_failure(e, "Error listing bills"))
}

#[instrument(skip(state, _user))]
pub async fn get_bill(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Path((group_id, bill_id)): Path<(String, String)>,
) -> Result<Json<Bill>, ApiError> {
    repo::get_bill(state.table.as_ref(), &group_id, &bill_id)
        .await
        .map_err(|e| store_failure(e, "Error getting bill"))?
        .map(Json)
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, "Bill not found"))
}

#[instrument(skip(state, _user, body))]
pub async fn update_share(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Path((group_id, bill_id, user_id)): Path<(String, String, String)>,
    LenientJson(body): LenientJson<UpdateShareRequest>,
) -> Result<Json<Bill>, ApiError> {
    let Some(status) = body.status.filter(|s| !s.is_empty()) else {
        return Err(api_error(StatusCode::BAD_REQUEST, "status is required"));
    };

    let bill = repo::update_share_status(
        state.table.as_ref(),
        &group_id,
        &bill_id,
        &user_id,
        &status,
    )
    .await
    .map_err(|e| store_failure(e, "Error updating share status"))?
    .ok_or_else(|| api_error(StatusCode::NOT_FOUND, "Bill or share not found"))?;

    info!(%status, "share status updated");
    Ok(Json(bill))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::{json, Value};

    use crate::{app::testing::call, state::AppState};

    async fn create(state: &AppState, body: Value) -> (StatusCode, Value) {
        call(state.clone(), Method::POST, "/groups/grp-1/bills", body).await
    }

    #[tokio::test]
    async fn create_list_get_and_pay() {
        let state = AppState::fake();
        let (status, bill) = create(
            &state,
            json!({
                "description": "Electricity",
                "amount": 15,
                "dueDate": "2026-11-01",
                "shares": [
                    { "userId": "u1", "amount": 10, "status": "pending" },
                    { "userId": "u2", "amount": 5, "status": "paid" }
                ]
            }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(bill["createdBy"], "dummy-user");
        let bill_id = bill["billId"].as_str().unwrap().to_string();
        assert!(bill_id.starts_with("bill-"));

        let (status, listed) =
            call(state.clone(), Method::GET, "/groups/grp-1/bills", Value::Null).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listed.as_array().unwrap().len(), 1);

        let share_uri = format!("/groups/grp-1/bills/{bill_id}/shares/u1");
        let (status, updated) =
            call(state.clone(), Method::PATCH, &share_uri, json!({ "status": "paid" })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["shares"][0]["status"], "paid");
        assert_eq!(updated["shares"][0]["amount"], 10.0);

        let (status, fetched) = call(
            state,
            Method::GET,
            &format!("/groups/grp-1/bills/{bill_id}"),
            Value::Null,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["shares"][1]["status"], "paid");
        assert_eq!(fetched["shares"][1]["amount"], 5.0);
    }

    #[tokio::test]
    async fn create_validates_description_and_amount() {
        let state = AppState::fake();
        let (status, body) = create(&state, json!({ "description": "x", "amount": "12" })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "description and numeric amount are required");

        let (status, _) = create(&state, json!({ "amount": 12 })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn share_update_errors() {
        let state = AppState::fake();
        let (status, _) = call(
            state.clone(),
            Method::PATCH,
            "/groups/grp-1/bills/bill-x/shares/u1",
            json!({}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = call(
            state.clone(),
            Method::PATCH,
            "/groups/grp-1/bills/bill-x/shares/u1",
            json!({ "status": "paid" }),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Bill or share not found");

        let (status, _) = call(state, Method::GET, "/groups/grp-1/bills/bill-x", Value::Null).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn blank_due_date_and_missing_status_stay_unset() {
        let state = AppState::fake();
        let (status, bill) = create(
            &state,
            json!({
                "description": "Rent",
                "amount": 5,
                "dueDate": "",
                "shares": [{ "userId": "u", "amount": 5 }]
            }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(bill["dueDate"], Value::Null);
        assert!(bill["shares"][0].get("status").is_none());

        let report = crate::summary::services::global_unpaid_reminder(state.table.as_ref())
            .await
            .unwrap();
        assert!(report.lines[0].ends_with("due N/A"));

        let share_uri = format!("/groups/grp-1/bills/{}/shares/u", bill["billId"].as_str().unwrap());
        let (status, updated) =
            call(state, Method::PATCH, &share_uri, json!({ "status": "paid" })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["shares"][0]["status"], "paid");
    }
}
