use aide::axum::{routing::get_with, ApiRouter};
use axum::extract::State;
use chrono::{DateTime, Utc};
use macros::route;
use schemars::JsonSchema;
use serde::Serialize;

use crate::{extract::Json, openapi::tag, AppState, Database};

#[derive(Serialize, JsonSchema)]
pub struct Health {
	pub status: &'static str,
	pub timestamp: DateTime<Utc>,
	pub version: &'static str,
}

#[derive(Serialize, JsonSchema)]
pub struct Status {
	/// Whether the database answered.
	pub connected: bool,
	pub database: &'static str,
}

/// Routes for `/health`.
pub fn routes() -> ApiRouter<AppState> {
	ApiRouter::new().api_route("/health", get_with(health, health_docs))
}

/// Routes for `/api/status`.
pub fn api_routes() -> ApiRouter<AppState> {
	ApiRouter::new().api_route("/status", get_with(status, status_docs))
}

/// Health check
/// Answers without touching the database.
#[route(tag = tag::HEALTH)]
pub async fn health() -> Json<Health> {
	Json(Health {
		status: "ok",
		timestamp: Utc::now(),
		version: env!("CARGO_PKG_VERSION"),
	})
}

/// Database status
/// Reports whether a round trip to the database succeeds.
#[route(tag = tag::HEALTH)]
pub async fn status(State(database): State<Database>) -> Json<Status> {
	let connected = match sqlx::query("SELECT 1").execute(&database).await {
		Ok(..) => true,
		Err(error) => {
			tracing::warn!(%error, "database status check failed");
			false
		}
	};

	Json(Status {
		connected,
		database: "sqlite",
	})
}
