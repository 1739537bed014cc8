use axum::{extract::State, response::Html, Extension};

use crate::middleware::RequestId;
use crate::views;

use super::{AppState, PageError};

pub(super) async fn index(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Html<String>, PageError> {
    let products = promos_db::list_products(&state.pool)
        .await
        .map_err(|e| PageError::internal(&req_id, state.debug, e))?;

    Ok(Html(views::products_page(&products).into_string()))
}
