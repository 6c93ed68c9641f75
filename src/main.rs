#![warn(clippy::pedantic)]

mod config;
mod error;
mod extract;
mod mail;
mod notify;
mod openapi;
mod route;
mod setup;
mod token;

use std::{str::FromStr, sync::Arc};

use aide::{axum::ApiRouter, openapi::OpenApi};
use argon2::Argon2;
use axum::{
	extract::Request,
	http::{HeaderName, HeaderValue},
	Extension, Router, ServiceExt,
};
use clap::Parser;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tower::Layer;
use tower_http::{
	compression::CompressionLayer,
	cors::{AllowOrigin, Any, CorsLayer},
	normalize_path::NormalizePathLayer,
	request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
	services::ServeDir,
	trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub use error::Error;

use crate::{
	config::{Cli, Command, Config},
	mail::Mailer,
	notify::{Broadcast, Publisher},
	route::upload::Uploads,
};

pub type Database = sqlx::SqlitePool;
pub type AppState = State;

/// The shared application state.
///
/// Handlers pull out the parts they need with `State<T>`, so every field
/// must have a distinct type.
#[derive(Clone, axum::extract::FromRef)]
pub struct State {
	pub database: Database,
	pub hasher: Argon2<'static>,
	pub keys: token::Keys,
	/// Where profile updates are announced.
	pub publisher: Arc<dyn Publisher>,
	/// The channel WebSocket clients subscribe to.
	pub events: Broadcast,
	/// Absent when SMTP is not configured.
	pub mailer: Option<Mailer>,
	pub uploads: Uploads,
}

/// Builds the application router, with the generated API document served under `/docs`.
pub fn app(state: State) -> Router {
	let mut api = OpenApi::default();
	let request_id = HeaderName::from_static("x-request-id");
	let uploads = ServeDir::new(&state.uploads.0);

	ApiRouter::new()
		.nest(
			"/api/admin",
			route::auth::routes().merge(route::profile::admin_routes()),
		)
		.nest(
			"/api",
			route::profile::routes().merge(route::health::api_routes()),
		)
		.nest("/api/about", route::about::routes())
		.nest("/api/posts", route::post::routes())
		.nest("/api/messages", route::message::routes())
		.merge(route::health::routes())
		.finish_api_with(&mut api, openapi::docs)
		.nest(
			"/api",
			route::upload::routes().merge(route::events::routes()),
		)
		.nest_service("/uploads", uploads)
		.with_state(state)
		.nest("/docs", route::docs::routes())
		.layer(Extension(Arc::new(api)))
		.layer(CompressionLayer::new())
		.layer(PropagateRequestIdLayer::new(request_id.clone()))
		.layer(TraceLayer::new_for_http())
		.layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
}

/// Allows any origin unless specific origins are configured.
fn cors(origins: &[String]) -> CorsLayer {
	let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

	if origins.is_empty() {
		return layer.allow_origin(Any);
	}

	let origins = origins
		.iter()
		.filter_map(|origin| match HeaderValue::from_str(origin.trim()) {
			Ok(value) => Some(value),
			Err(..) => {
				tracing::warn!(origin, "ignoring invalid allowed origin");
				None
			}
		})
		.collect::<Vec<_>>();

	layer.allow_origin(AllowOrigin::list(origins))
}

async fn connect(url: &str) -> anyhow::Result<Database> {
	let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
	let database = SqlitePoolOptions::new().connect_with(options).await?;

	sqlx::migrate!().run(&database).await?;

	Ok(database)
}

async fn serve(config: Config, database: Database) -> anyhow::Result<()> {
	let mailer = Mailer::from_config(&config)?;

	if mailer.is_none() {
		tracing::info!("smtp is not configured, contact notifications are disabled");
	}

	tokio::fs::create_dir_all(&config.uploads_dir).await?;

	let events = Broadcast::default();
	let state = State {
		database,
		hasher: Argon2::default(),
		keys: token::Keys::new(config.jwt_secret.as_bytes()),
		publisher: Arc::new(events.clone()),
		events,
		mailer,
		uploads: Uploads(config.uploads_dir.clone()),
	};

	let app = app(state).layer(cors(&config.allowed_origins));
	let app = NormalizePathLayer::trim_trailing_slash().layer(app);

	let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;

	tracing::info!("listening on {}", listener.local_addr()?);

	axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
		.with_graceful_shutdown(shutdown_signal())
		.await?;

	Ok(())
}

async fn shutdown_signal() {
	if let Err(error) = tokio::signal::ctrl_c().await {
		tracing::error!(%error, "failed to listen for shutdown signal");
	}

	tracing::info!("shutting down");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	dotenvy::dotenv().ok();

	tracing_subscriber::registry()
		.with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
		.with(tracing_subscriber::fmt::layer().with_ansi(true))
		.init();

	let cli = Cli::parse();
	let database = connect(&cli.config.database_url).await?;

	match cli.command.unwrap_or(Command::Serve) {
		Command::Serve => serve(cli.config, database).await,
		Command::CreateAdmin {
			username,
			email,
			password,
		} => setup::create_admin(&database, &username, &email, &password)
			.await
			.map(drop),
		Command::ResetPassword { email, password } => {
			setup::reset_password(&database, &email, &password).await
		}
	}
}
