use std::borrow::Cow;

use aide::axum::{
	routing::{get_with, post_with},
	ApiRouter,
};
use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use crate::{error, AppState};

pub mod model;
pub mod route;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("message not found")]
	UnknownMessage(Uuid),
}

/// Routes mounted under `/api/messages`.
pub fn routes() -> ApiRouter<AppState> {
	use route::*;

	ApiRouter::new()
		.api_route(
			"/",
			get_with(get_messages, get_messages_docs)
				.post_with(create_message, create_message_docs),
		)
		.api_route(
			"/:id",
			get_with(get_message, get_message_docs).delete_with(delete_message, delete_message_docs),
		)
		.api_route("/:id/star", post_with(toggle_star, toggle_star_docs))
		.api_route("/:id/read", post_with(mark_read, mark_read_docs))
		.api_route("/:id/reply", post_with(add_reply, add_reply_docs))
}

impl error::ErrorShape for Error {
	fn status(&self) -> StatusCode {
		match self {
			Self::UnknownMessage(..) => StatusCode::NOT_FOUND,
		}
	}

	fn errors(&self) -> Vec<error::Message<'_>> {
		match self {
			Self::UnknownMessage(message) => vec![error::Message {
				content: "unknown_message".into(),
				field: None,
				details: Some(Cow::Owned({
					let mut map = error::Map::new();
					map.insert("message".into(), json!(message));
					map
				})),
			}],
		}
	}
}

#[cfg(test)]
mod test {
	use uuid::Uuid;

	use crate::{config::Config, mail::Mailer, test::*, State};

	async fn send(app: &TestServer, name: &str) -> Value {
		let response = app
			.post("/api/messages")
			.json(&json!({
				"name": name,
				"email": "ana@x.com",
				"message": "hi",
			}))
			.await;

		assert_eq!(response.status_code(), 201);
		response.json::<Value>()
	}

	#[sqlx::test]
	async fn test_reply_marks_message_read(pool: Database) {
		let app = app(pool);
		let token = register(&app).await;

		let message = send(&app, "Ana").await;

		assert_eq!(message["starred"], false);
		assert_eq!(message["read"], false);
		assert_eq!(message["replies"], json!([]));

		let id = message["id"].as_str().unwrap();
		let response = app
			.post(&format!("/api/messages/{id}/reply"))
			.add_header(AUTHORIZATION, bearer(&token))
			.json(&json!({ "reply": "thanks!" }))
			.await;

		assert_eq!(response.status_code(), 200);

		let message = response.json::<Value>();

		assert_eq!(message["read"], true);
		assert_eq!(message["replies"].as_array().unwrap().len(), 1);
		assert_eq!(message["replies"][0]["content"], "thanks!");
	}

	#[sqlx::test]
	async fn test_failed_notification_still_stores_message(pool: Database) {
		let config = Config {
			database_url: "sqlite::memory:".into(),
			jwt_secret: TEST_SECRET.into(),
			host: "127.0.0.1".into(),
			port: 10000,
			allowed_origins: Vec::new(),
			uploads_dir: std::env::temp_dir(),
			smtp_host: Some("127.0.0.1.invalid".into()),
			smtp_username: Some("site@example.com".into()),
			smtp_password: Some("password".into()),
			notify_email: None,
		};

		let mailer = Mailer::from_config(&config).unwrap();

		assert!(mailer.is_some());

		let app = app_with_state(State {
			mailer,
			..state(pool.clone())
		});

		let message = send(&app, "Ana").await;

		let stored = sqlx::query_scalar::<_, String>("SELECT name FROM message")
			.fetch_all(&pool)
			.await
			.unwrap();

		assert_eq!(stored, ["Ana"]);
		assert_eq!(message["name"], "Ana");
	}

	#[sqlx::test]
	async fn test_reply_and_read_require_token(pool: Database) {
		let app = app(pool);
		let id = send(&app, "Ana").await["id"].as_str().unwrap().to_owned();

		let response = app
			.post(&format!("/api/messages/{id}/reply"))
			.json(&json!({ "reply": "thanks!" }))
			.await;

		assert_eq!(response.status_code(), 401);

		let response = app.post(&format!("/api/messages/{id}/read")).await;

		assert_eq!(response.status_code(), 401);
	}

	#[sqlx::test]
	async fn test_mark_read(pool: Database) {
		let app = app(pool);
		let token = register(&app).await;
		let id = send(&app, "Ana").await["id"].as_str().unwrap().to_owned();

		let response = app
			.post(&format!("/api/messages/{id}/read"))
			.add_header(AUTHORIZATION, bearer(&token))
			.await;

		assert_eq!(response.status_code(), 200);
		assert_eq!(response.json::<Value>()["read"], true);
		assert_eq!(response.json::<Value>()["replies"], json!([]));
	}

	#[sqlx::test]
	async fn test_star_toggles(pool: Database) {
		let app = app(pool);
		let id = send(&app, "Ana").await["id"].as_str().unwrap().to_owned();
		let path = format!("/api/messages/{id}/star");

		assert_eq!(app.post(&path).await.json::<Value>()["starred"], true);
		assert_eq!(app.post(&path).await.json::<Value>()["starred"], false);
	}

	#[sqlx::test]
	async fn test_list_is_newest_first(pool: Database) {
		let app = app(pool);

		send(&app, "First").await;
		send(&app, "Second").await;

		let messages = app.get("/api/messages").await.json::<Vec<Value>>();

		assert_eq!(messages.len(), 2);
		assert_eq!(messages[0]["name"], "Second");
		assert_eq!(messages[1]["name"], "First");
	}

	#[sqlx::test]
	async fn test_invalid_email_is_rejected(pool: Database) {
		let app = app(pool);

		let response = app
			.post("/api/messages")
			.json(&json!({ "name": "Ana", "email": "ana", "message": "hi" }))
			.await;

		assert_eq!(response.status_code(), 400);
		assert_eq!(response.json::<Value>()["errors"][0]["field"], "email");
	}

	#[sqlx::test]
	async fn test_delete(pool: Database) {
		let app = app(pool);
		let id = send(&app, "Ana").await["id"].as_str().unwrap().to_owned();

		let response = app.delete(&format!("/api/messages/{id}")).await;

		assert_eq!(response.status_code(), 200);

		let response = app.get(&format!("/api/messages/{id}")).await;

		assert_eq!(response.status_code(), 404);

		let response = app.delete(&format!("/api/messages/{id}")).await;

		assert_eq!(response.status_code(), 404);
	}

	#[sqlx::test]
	async fn test_unknown_message_is_not_found(pool: Database) {
		let app = app(pool);
		let token = register(&app).await;
		let id = Uuid::now_v7();

		let response = app.post(&format!("/api/messages/{id}/star")).await;

		assert_eq!(response.status_code(), 404);

		let response = app
			.post(&format!("/api/messages/{id}/reply"))
			.add_header(AUTHORIZATION, bearer(&token))
			.json(&json!({ "reply": "anyone?" }))
			.await;

		assert_eq!(response.status_code(), 404);
		assert_eq!(
			response.json::<Value>()["errors"][0]["details"]["message"],
			id.to_string()
		);
	}
}
