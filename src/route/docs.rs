use std::sync::Arc;

use aide::openapi::OpenApi;
use axum::{response::IntoResponse, routing::get, Extension, Router};

use crate::extract::Json;

/// Serves the generated document. Expects the [`OpenApi`] as an extension.
pub fn routes() -> Router {
	Router::new().route("/api.json", get(serve_docs))
}

async fn serve_docs(Extension(api): Extension<Arc<OpenApi>>) -> impl IntoResponse {
	Json(api.as_ref()).into_response()
}
