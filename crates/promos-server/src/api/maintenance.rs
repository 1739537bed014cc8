use axum::{extract::State, response::Redirect, Extension};

use crate::middleware::RequestId;

use super::{AppState, PageError};

/// Deletes every product and promotion, then sends the browser home.
pub(super) async fn clear_db(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Redirect, PageError> {
    promos_db::clear_all(&state.pool)
        .await
        .map_err(|e| PageError::internal(&req_id, state.debug, e))?;

    Ok(Redirect::to("/"))
}
