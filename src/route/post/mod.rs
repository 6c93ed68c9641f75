use std::borrow::Cow;

use aide::axum::{
	routing::{delete_with, get_with, post_with},
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
	#[error("post not found")]
	UnknownPost(Uuid),
	#[error("content is required for blog posts")]
	MissingContent,
}

/// Routes mounted under `/api/posts`.
pub fn routes() -> ApiRouter<AppState> {
	use route::*;

	ApiRouter::new()
		.api_route(
			"/",
			get_with(get_posts, get_posts_docs).post_with(create_post, create_post_docs),
		)
		.api_route(
			"/:id",
			get_with(get_post, get_post_docs)
				.put_with(update_post, update_post_docs)
				.delete_with(delete_post, delete_post_docs),
		)
		.api_route("/:id/like", post_with(toggle_like, toggle_like_docs))
		.api_route("/:id/comments", post_with(add_comment, add_comment_docs))
		.api_route(
			"/:id/comments/:comment_id",
			delete_with(delete_comment, delete_comment_docs),
		)
}

impl error::ErrorShape for Error {
	fn status(&self) -> StatusCode {
		match self {
			Self::UnknownPost(..) => StatusCode::NOT_FOUND,
			Self::MissingContent => StatusCode::BAD_REQUEST,
		}
	}

	fn errors(&self) -> Vec<error::Message<'_>> {
		match self {
			Self::UnknownPost(post) => vec![error::Message {
				content: "unknown_post".into(),
				field: None,
				details: Some(Cow::Owned({
					let mut map = error::Map::new();
					map.insert("post".into(), json!(post));
					map
				})),
			}],
			Self::MissingContent => vec![error::Message {
				content: self.to_string().into(),
				field: Some("content".into()),
				details: None,
			}],
		}
	}
}

#[cfg(test)]
mod test {
	use uuid::Uuid;

	use crate::test::*;

	fn post(category: &str) -> Value {
		json!({
			"title": format!("A {category} post"),
			"description": "Short summary",
			"imageUrl": "/uploads/cover.png",
			"category": category,
		})
	}

	async fn create(app: &TestServer, body: &Value) -> Value {
		let response = app.post("/api/posts").json(body).await;

		assert_eq!(response.status_code(), 201);
		response.json::<Value>()
	}

	#[sqlx::test]
	async fn test_blog_post_requires_content(pool: Database) {
		let app = app(pool);

		let response = app.post("/api/posts").json(&post("blog")).await;

		assert_eq!(response.status_code(), 400);
		assert_eq!(
			response.json::<Value>()["message"],
			"content is required for blog posts"
		);

		let mut body = post("blog");
		body["content"] = json!("# Hello\n\nFirst article.");

		let created = create(&app, &body).await;

		assert_eq!(created["likes"], json!([]));
		assert_eq!(created["comments"], json!([]));
		assert_eq!(created["content"], "# Hello\n\nFirst article.");
	}

	#[sqlx::test]
	async fn test_list_filters_by_category_newest_first(pool: Database) {
		let app = app(pool);

		let first = create(&app, &post("feed")).await;
		create(&app, &post("gallery")).await;
		let second = create(&app, &post("feed")).await;

		let posts = app
			.get("/api/posts")
			.add_query_param("category", "feed")
			.await
			.json::<Vec<Value>>();

		assert_eq!(posts.len(), 2);
		assert_eq!(posts[0]["id"], second["id"]);
		assert_eq!(posts[1]["id"], first["id"]);

		let posts = app.get("/api/posts").await.json::<Vec<Value>>();

		assert_eq!(posts.len(), 3);
	}

	#[sqlx::test]
	async fn test_like_toggles(pool: Database) {
		let app = app(pool);
		let id = create(&app, &post("gallery")).await["id"]
			.as_str()
			.unwrap()
			.to_owned();

		let path = format!("/api/posts/{id}/like");
		let like = json!({ "email": "visitor@example.com" });

		let response = app.post(&path).json(&like).await.json::<Value>();

		assert_eq!(response, json!({ "liked": true, "likesCount": 1 }));

		app.post(&path)
			.json(&json!({ "email": "other@example.com" }))
			.await;

		let response = app.post(&path).json(&like).await.json::<Value>();

		assert_eq!(response, json!({ "liked": false, "likesCount": 1 }));

		let post = app.get(&format!("/api/posts/{id}")).await.json::<Value>();

		assert_eq!(post["likes"], json!(["other@example.com"]));
	}

	#[sqlx::test]
	async fn test_comments_can_be_added_and_removed(pool: Database) {
		let app = app(pool);
		let id = create(&app, &post("feed")).await["id"]
			.as_str()
			.unwrap()
			.to_owned();

		let response = app
			.post(&format!("/api/posts/{id}/comments"))
			.json(&json!({
				"name": "Ana",
				"email": "ana@example.com",
				"content": "Nice shot",
			}))
			.await;

		assert_eq!(response.status_code(), 201);

		let comment = response.json::<Value>();

		assert_eq!(comment["user"]["name"], "Ana");
		assert_eq!(comment["content"], "Nice shot");

		let post = app.get(&format!("/api/posts/{id}")).await.json::<Value>();

		assert_eq!(post["comments"].as_array().unwrap().len(), 1);
		assert_eq!(post["comments"][0]["id"], comment["id"]);

		let comment_id = comment["id"].as_str().unwrap();
		let response = app
			.delete(&format!("/api/posts/{id}/comments/{comment_id}"))
			.await;

		assert_eq!(response.status_code(), 200);

		let post = app.get(&format!("/api/posts/{id}")).await.json::<Value>();

		assert_eq!(post["comments"], json!([]));
	}

	#[sqlx::test]
	async fn test_deleting_unknown_comment_is_a_no_op(pool: Database) {
		let app = app(pool);
		let id = create(&app, &post("feed")).await["id"]
			.as_str()
			.unwrap()
			.to_owned();

		app.post(&format!("/api/posts/{id}/comments"))
			.json(&json!({
				"name": "Ana",
				"email": "ana@example.com",
				"content": "Still here",
			}))
			.await;

		let response = app
			.delete(&format!("/api/posts/{id}/comments/{}", Uuid::now_v7()))
			.await;

		assert_eq!(response.status_code(), 200);

		let post = app.get(&format!("/api/posts/{id}")).await.json::<Value>();

		assert_eq!(post["comments"][0]["content"], "Still here");
	}

	#[sqlx::test]
	async fn test_update_keeps_likes(pool: Database) {
		let app = app(pool);
		let id = create(&app, &post("gallery")).await["id"]
			.as_str()
			.unwrap()
			.to_owned();

		app.post(&format!("/api/posts/{id}/like"))
			.json(&json!({ "email": "visitor@example.com" }))
			.await;

		let mut body = post("gallery");
		body["title"] = json!("Renamed");

		let response = app.put(&format!("/api/posts/{id}")).json(&body).await;

		assert_eq!(response.status_code(), 200);
		assert_eq!(response.json::<Value>()["title"], "Renamed");
		assert_eq!(response.json::<Value>()["likes"], json!(["visitor@example.com"]));

		body["category"] = json!("blog");

		let response = app.put(&format!("/api/posts/{id}")).json(&body).await;

		assert_eq!(response.status_code(), 400);
	}

	#[sqlx::test]
	async fn test_unknown_post_is_not_found(pool: Database) {
		let app = app(pool);
		let id = Uuid::now_v7();

		let response = app.get(&format!("/api/posts/{id}")).await;

		assert_eq!(response.status_code(), 404);
		assert_eq!(response.json::<Value>()["message"], "post not found");
		assert_eq!(
			response.json::<Value>()["errors"][0]["details"]["post"],
			id.to_string()
		);

		let response = app
			.post(&format!("/api/posts/{id}/like"))
			.json(&json!({ "email": "visitor@example.com" }))
			.await;

		assert_eq!(response.status_code(), 404);

		let response = app
			.delete(&format!("/api/posts/{id}/comments/{}", Uuid::now_v7()))
			.await;

		assert_eq!(response.status_code(), 404);

		let response = app.delete(&format!("/api/posts/{id}")).await;

		assert_eq!(response.status_code(), 404);
	}

	#[sqlx::test]
	async fn test_malformed_id_is_bad_request(pool: Database) {
		let app = app(pool);

		let response = app.get("/api/posts/not-a-uuid").await;

		assert_eq!(response.status_code(), 400);
	}
}
