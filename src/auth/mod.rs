use crate::state::AppState;
use axum::Router;

pub mod claims;
pub(crate) mod extractors;
pub mod handlers;

pub use extractors::AuthUser;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::me_routes())
}
