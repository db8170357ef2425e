use axum::{
    extract::Extension,
    http::{Method, StatusCode, Uri, header},
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use super::pool::HttpPool;
use super::protocol::CONTENT_TYPE_OCTET_STREAM;
use crate::group::GroupRegistry;

pub async fn handle_peer_request(
    Extension(pool): Extension<Arc<HttpPool>>,
    Extension(groups): Extension<Arc<GroupRegistry>>,
    method: Method,
    uri: Uri,
) -> Response {
    tracing::info!("[Server {}] {} {}", pool.self_addr(), method, uri.path());

    match pool.serve(uri.path(), &groups).await {
        Ok(view) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, CONTENT_TYPE_OCTET_STREAM)],
            view.to_bytes(),
        )
            .into_response(),
        Err(e) => {
            tracing::warn!(
                "[Server {}] Rejected {} {}: {}",
                pool.self_addr(),
                method,
                uri.path(),
                e
            );
            e.into_response()
        }
    }
}
