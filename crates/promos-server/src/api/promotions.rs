use std::collections::HashMap;

use axum::{
    body::Bytes,
    extract::{FromRequest, Multipart, Query, Request, State},
    http::{header::CONTENT_TYPE, HeaderMap},
    response::{Html, IntoResponse, Redirect, Response},
    Extension, Json,
};
use chrono::NaiveDate;
use promos_db::PromotionWithProductRow;
use serde::Serialize;
use serde_json::Value;

use crate::middleware::RequestId;
use crate::views;

use super::{AppState, PageError, UploadError};

#[derive(Debug, Serialize)]
pub(super) struct ProductItem {
    id: i64,
    name: String,
    description: Option<String>,
    price: f64,
    currency: String,
}

#[derive(Debug, Serialize)]
pub(super) struct PromotionItem {
    discount: f64,
    shipping_discount: f64,
    valid_from: Option<NaiveDate>,
    valid_until: Option<NaiveDate>,
    product: ProductItem,
}

impl From<PromotionWithProductRow> for PromotionItem {
    fn from(row: PromotionWithProductRow) -> Self {
        Self {
            discount: row.discount,
            shipping_discount: row.shipping_discount,
            valid_from: row.valid_from,
            valid_until: row.valid_until,
            product: ProductItem {
                id: row.product_id,
                name: row.product_name,
                description: row.product_description,
                price: row.product_price,
                currency: row.product_currency,
            },
        }
    }
}

/// `?json` (with or without a value, repeated or not) switches the listing
/// to JSON.
fn wants_json(query: &HashMap<String, String>) -> bool {
    query.contains_key("json")
}

/// Reads a string field from a remote-upload body. A body that is not a JSON
/// object has no fields.
fn body_field<'a>(body: &'a Value, key: &str) -> Option<&'a str> {
    body.get(key).and_then(Value::as_str)
}

pub(super) async fn list_promotions(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Response, PageError> {
    let rows = promos_db::list_promotions(&state.pool)
        .await
        .map_err(|e| PageError::internal(&req_id, state.debug, e))?;

    if wants_json(&query) {
        let data: Vec<PromotionItem> = rows.into_iter().map(PromotionItem::from).collect();
        return Ok(Json(data).into_response());
    }

    Ok(Html(views::promotions_page(&rows).into_string()).into_response())
}

pub(super) async fn upload_form(State(state): State<AppState>) -> Html<String> {
    Html(views::upload_page(&state.parsers.extensions()).into_string())
}

/// Accepts either a multipart upload with a `file` part or a JSON body
/// naming a remote file to fetch.
pub(super) async fn upload_promotions(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    request: Request,
) -> Response {
    if is_multipart(request.headers()) {
        upload_file(&state, &req_id, request).await.into_response()
    } else {
        upload_from_url(&state, &req_id, request).await
    }
}

fn is_multipart(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("multipart/form-data"))
}

async fn upload_file(
    state: &AppState,
    req_id: &RequestId,
    request: Request,
) -> Result<Redirect, PageError> {
    let mut multipart = Multipart::from_request(request, state)
        .await
        .map_err(|e| PageError::internal(req_id, state.debug, e))?;

    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| PageError::internal(req_id, state.debug, e))?
    {
        if field.name() == Some("file") {
            let file_name = field.file_name().map(ToOwned::to_owned);
            let data = field
                .bytes()
                .await
                .map_err(|e| PageError::internal(req_id, state.debug, e))?;
            upload = Some((file_name, data));
            break;
        }
    }

    let Some((file_name, data)) = upload else {
        return Err(PageError::internal(
            req_id,
            state.debug,
            anyhow::anyhow!("multipart upload has no `file` part"),
        ));
    };

    let summary = promos_ingest::load_promotions_file(
        &state.pool,
        &state.parsers,
        file_name.as_deref(),
        None,
        &data,
    )
    .await
    .map_err(|e| PageError::internal(req_id, state.debug, e))?;

    tracing::info!(
        request_id = %req_id.0,
        file_name = file_name.as_deref().unwrap_or_default(),
        loaded = summary.loaded,
        skipped = summary.skipped,
        "promotions file uploaded"
    );
    Ok(Redirect::to("/promotions"))
}

async fn upload_from_url(state: &AppState, req_id: &RequestId, request: Request) -> Response {
    let body = match Bytes::from_request(request, state).await {
        Ok(body) => body,
        Err(e) => return PageError::internal(req_id, state.debug, e).into_response(),
    };

    let params: Value = match serde_json::from_slice(&body) {
        Ok(params) => params,
        Err(e) => return PageError::internal(req_id, state.debug, e).into_response(),
    };

    let Some(file_url) = body_field(&params, "fileURL") else {
        return UploadError::new("missing fileURL").into_response();
    };
    let Some(file_type) = body_field(&params, "fileType") else {
        return UploadError::new("missing fileType").into_response();
    };

    let data = match state.fetcher.fetch(file_url).await {
        Ok(data) => data,
        Err(e) => {
            tracing::error!(request_id = %req_id.0, error = %e, "remote promotions fetch failed");
            return UploadError::new(e.to_string()).into_response();
        }
    };

    match promos_ingest::load_promotions_file(
        &state.pool,
        &state.parsers,
        None,
        Some(file_type),
        &data,
    )
    .await
    {
        Ok(summary) => {
            tracing::info!(
                request_id = %req_id.0,
                file_url = %file_url,
                file_type = %file_type,
                loaded = summary.loaded,
                skipped = summary.skipped,
                "remote promotions file ingested"
            );
            Redirect::to("/promotions").into_response()
        }
        Err(e) => PageError::internal(req_id, state.debug, e).into_response(),
    }
}
