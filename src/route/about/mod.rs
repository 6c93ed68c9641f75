use aide::axum::{routing::get_with, ApiRouter};
use axum::http::StatusCode;

use crate::{error, AppState};

pub mod model;
pub mod route;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("about section already exists")]
	AlreadyExists,
}

/// Routes mounted under `/api/about`.
pub fn routes() -> ApiRouter<AppState> {
	use route::*;

	ApiRouter::new().api_route(
		"/",
		get_with(get_about, get_about_docs)
			.post_with(create_about, create_about_docs)
			.put_with(update_about, update_about_docs),
	)
}

impl error::ErrorShape for Error {
	fn status(&self) -> StatusCode {
		match self {
			Self::AlreadyExists => StatusCode::CONFLICT,
		}
	}
}

#[cfg(test)]
mod test {
	use crate::test::*;

	fn about() -> Value {
		json!({
			"title": "Hi, I'm Ana",
			"description": "I build web things.",
			"skills": ["Rust", "TypeScript"],
			"experience": [{
				"title": "Engineer",
				"company": "Acme",
				"period": "2021 - 2024",
				"description": "Shipped things.",
			}],
		})
	}

	#[sqlx::test]
	async fn test_placeholder_is_created_once(pool: Database) {
		let app = app(pool.clone());

		let first = app.get("/api/about").await;
		let second = app.get("/api/about").await;

		assert_eq!(first.status_code(), 200);
		assert_eq!(first.json::<Value>()["title"], "Welcome to my portfolio");
		assert_eq!(first.json::<Value>(), second.json::<Value>());

		let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM about")
			.fetch_one(&pool)
			.await
			.unwrap();

		assert_eq!(count, 1);
	}

	#[sqlx::test]
	async fn test_second_create_conflicts(pool: Database) {
		let app = app(pool);
		let token = register(&app).await;

		let response = app
			.post("/api/about")
			.add_header(AUTHORIZATION, bearer(&token))
			.json(&about())
			.await;

		assert_eq!(response.status_code(), 201);
		assert_eq!(response.json::<Value>()["skills"], json!(["Rust", "TypeScript"]));

		let response = app
			.post("/api/about")
			.add_header(AUTHORIZATION, bearer(&token))
			.json(&about())
			.await;

		assert_eq!(response.status_code(), 409);
	}

	#[sqlx::test]
	async fn test_update_replaces_everything(pool: Database) {
		let app = app(pool);
		let token = register(&app).await;

		app.get("/api/about").await;

		let response = app
			.put("/api/about")
			.add_header(AUTHORIZATION, bearer(&token))
			.json(&about())
			.await;

		assert_eq!(response.status_code(), 200);

		let about = app.get("/api/about").await.json::<Value>();

		assert_eq!(about["title"], "Hi, I'm Ana");
		assert_eq!(about["skills"], json!(["Rust", "TypeScript"]));
		assert_eq!(about["experience"][0]["company"], "Acme");
		assert_eq!(about["experience"].as_array().unwrap().len(), 1);
	}

	#[sqlx::test]
	async fn test_update_requires_complete_object(pool: Database) {
		let app = app(pool);
		let token = register(&app).await;

		let response = app
			.put("/api/about")
			.add_header(AUTHORIZATION, bearer(&token))
			.json(&json!({ "title": "Only a title" }))
			.await;

		assert_eq!(response.status_code(), 400);

		let mut invalid = about();
		invalid["skills"] = json!(["Rust", " "]);

		let response = app
			.put("/api/about")
			.add_header(AUTHORIZATION, bearer(&token))
			.json(&invalid)
			.await;

		assert_eq!(response.status_code(), 400);
	}

	#[sqlx::test]
	async fn test_update_requires_token(pool: Database) {
		let app = app(pool);

		let response = app.put("/api/about").json(&about()).await;

		assert_eq!(response.status_code(), 401);
	}
}
