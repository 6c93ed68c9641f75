use aide::axum::{
	routing::{get_with, post_with},
	ApiRouter,
};
use axum::http::StatusCode;

use crate::{error, AppState};

pub mod model;
pub mod route;

/// An error that can occur during authentication.
///
/// Note that the messages are presented to the client, so they should not contain
/// sensitive information. Unknown emails and wrong passwords share one message,
/// as do expired and malformed tokens.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("invalid credentials")]
	InvalidCredentials,
	#[error("password hashing error")]
	Argon(#[from] argon2::Error),
	#[error("token signing error")]
	Token(#[from] jsonwebtoken::errors::Error),
	#[error("no authentication token, access denied")]
	NoToken,
	#[error("token is invalid or expired")]
	InvalidToken,
	#[error("admin account already exists")]
	AdminExists,
}

/// Routes mounted under `/api/admin`.
pub fn routes() -> ApiRouter<AppState> {
	use route::*;

	ApiRouter::new()
		.api_route("/register", post_with(register, register_docs))
		.api_route("/login", post_with(login, login_docs))
		.api_route("/dashboard", get_with(dashboard, dashboard_docs))
}

impl error::ErrorShape for Error {
	fn status(&self) -> StatusCode {
		match self {
			Self::InvalidCredentials | Self::NoToken | Self::InvalidToken => {
				StatusCode::UNAUTHORIZED
			}
			Self::Argon(..) | Self::Token(..) => StatusCode::INTERNAL_SERVER_ERROR,
			Self::AdminExists => StatusCode::CONFLICT,
		}
	}
}

#[cfg(test)]
mod test {
	use chrono::{Duration, Utc};
	use uuid::Uuid;

	use crate::{
		test::*,
		token::{Claims, Keys},
	};

	#[sqlx::test]
	async fn test_signup_flow(pool: Database) {
		let app = app(pool);

		let response = app
			.post("/api/admin/register")
			.json(&json!({
				"username": "ana",
				"email": "ana@example.com",
				"password": "hunter2hunter",
			}))
			.await;

		assert_eq!(response.status_code(), 201);
		assert!(response.json::<Value>()["token"].is_string());

		let response = app
			.post("/api/admin/login")
			.json(&json!({
				"email": "ana@example.com",
				"password": "hunter2hunter",
			}))
			.await;

		assert_eq!(response.status_code(), 200);

		let token = response.json::<Value>()["token"]
			.as_str()
			.unwrap()
			.to_owned();

		let response = app
			.get("/api/admin/dashboard")
			.add_header(AUTHORIZATION, bearer(&token))
			.await;

		assert_eq!(response.status_code(), 200);
		assert_eq!(response.json::<Value>()["totalPosts"], 0);
	}

	#[sqlx::test]
	async fn test_login_sets_last_login(pool: Database) {
		let app = app(pool.clone());

		register(&app).await;

		let before = sqlx::query_scalar::<_, Option<String>>("SELECT last_login FROM admin")
			.fetch_one(&pool)
			.await
			.unwrap();

		assert!(before.is_none());

		login(&app).await;

		let after = sqlx::query_scalar::<_, Option<String>>("SELECT last_login FROM admin")
			.fetch_one(&pool)
			.await
			.unwrap();

		assert!(after.is_some());
	}

	#[sqlx::test]
	async fn test_second_register_conflicts(pool: Database) {
		let app = app(pool);

		register(&app).await;

		let response = app
			.post("/api/admin/register")
			.json(&json!({
				"username": "mallory",
				"email": "mallory@example.com",
				"password": "hunter2hunter",
			}))
			.await;

		assert_eq!(response.status_code(), 409);
	}

	#[sqlx::test]
	async fn test_login_failures_are_indistinguishable(pool: Database) {
		let app = app(pool);

		register(&app).await;

		let wrong_password = app
			.post("/api/admin/login")
			.json(&json!({ "email": ADMIN_EMAIL, "password": "not the password" }))
			.await;

		let unknown_email = app
			.post("/api/admin/login")
			.json(&json!({ "email": "nobody@example.com", "password": ADMIN_PASSWORD }))
			.await;

		assert_eq!(wrong_password.status_code(), 401);
		assert_eq!(unknown_email.status_code(), 401);
		assert_eq!(
			wrong_password.json::<Value>(),
			unknown_email.json::<Value>()
		);
		assert_eq!(
			wrong_password.json::<Value>()["message"],
			"invalid credentials"
		);
	}

	#[sqlx::test]
	async fn test_malformed_login_email_is_unauthorized(pool: Database) {
		let app = app(pool);

		register(&app).await;

		let response = app
			.post("/api/admin/login")
			.json(&json!({ "email": "not an email", "password": ADMIN_PASSWORD }))
			.await;

		assert_eq!(response.status_code(), 401);
		assert_eq!(response.json::<Value>()["message"], "invalid credentials");
	}

	#[sqlx::test]
	async fn test_username_may_contain_spaces(pool: Database) {
		let app = app(pool.clone());

		let response = app
			.post("/api/admin/register")
			.json(&json!({
				"username": "   ",
				"email": "ana@example.com",
				"password": "hunter2hunter",
			}))
			.await;

		assert_eq!(response.status_code(), 400);
		assert_eq!(response.json::<Value>()["errors"][0]["field"], "username");

		let response = app
			.post("/api/admin/register")
			.json(&json!({
				"username": " Ana María ",
				"email": "ana@example.com",
				"password": "hunter2hunter",
			}))
			.await;

		assert_eq!(response.status_code(), 201);

		let username = sqlx::query_scalar::<_, String>("SELECT username FROM admin")
			.fetch_one(&pool)
			.await
			.unwrap();

		assert_eq!(username, "Ana María");

		let token = response.json::<Value>()["token"]
			.as_str()
			.unwrap()
			.to_owned();

		let response = app
			.get("/api/admin/dashboard")
			.add_header(AUTHORIZATION, bearer(&token))
			.await;

		assert_eq!(response.status_code(), 200);
	}

	#[sqlx::test]
	async fn test_token_failures_are_indistinguishable(pool: Database) {
		let app = app(pool);
		let id = register_id(&app).await;

		let keys = Keys::new(TEST_SECRET.as_bytes());
		let issued = Utc::now() - Duration::days(30);
		let expired = keys
			.sign(&Claims {
				id,
				iat: issued.timestamp(),
				exp: (issued + Duration::days(7)).timestamp(),
			})
			.unwrap();

		let forged = Keys::new(b"another secret").issue(id).unwrap();

		let mut bodies = Vec::new();

		for token in [expired.as_str(), forged.as_str(), "garbage"] {
			let response = app
				.get("/api/admin/dashboard")
				.add_header(AUTHORIZATION, bearer(token))
				.await;

			assert_eq!(response.status_code(), 401);
			bodies.push(response.json::<Value>());
		}

		assert_eq!(bodies[0], bodies[1]);
		assert_eq!(bodies[1], bodies[2]);
	}

	#[sqlx::test]
	async fn test_token_for_missing_admin_is_rejected(pool: Database) {
		let app = app(pool);
		let token = Keys::new(TEST_SECRET.as_bytes())
			.issue(Uuid::now_v7())
			.unwrap();

		let response = app
			.get("/api/admin/dashboard")
			.add_header(AUTHORIZATION, bearer(&token))
			.await;

		assert_eq!(response.status_code(), 401);
	}

	#[sqlx::test]
	async fn test_missing_token_is_rejected(pool: Database) {
		let app = app(pool);

		let response = app.get("/api/admin/dashboard").await;

		assert_eq!(response.status_code(), 401);
		assert_eq!(
			response.json::<Value>()["message"],
			"no authentication token, access denied"
		);
	}
}
