use axum::{extract::State, http::StatusCode};
use chrono::Utc;
use macros::route;
use sqlx::types::Json as SqlJson;
use uuid::Uuid;

use crate::{
	error::Error as AppError,
	extract::{Json, Path, Query},
	openapi::tag,
	Database,
};

use super::{model, Error};

/// Get all posts
/// Returns every post, newest first, optionally limited to one category.
#[route(tag = tag::POST)]
pub async fn get_posts(
	State(database): State<Database>,
	Query(input): Query<model::ListPostsInput>,
) -> Result<Json<Vec<model::Post>>, AppError> {
	let posts = sqlx::query_as::<_, model::Post>(
		r#"
			SELECT * FROM post
			WHERE ?1 IS NULL OR category = ?1
			ORDER BY created_at DESC, id DESC
		"#,
	)
	.bind(input.category)
	.fetch_all(&database)
	.await?;

	Ok(Json(posts))
}

/// Get single post
/// Returns a single post by its unique id.
#[route(tag = tag::POST)]
pub async fn get_post(
	State(database): State<Database>,
	Path(model::IdInput { id }): Path<model::IdInput>,
) -> Result<Json<model::Post>, AppError> {
	let post = sqlx::query_as::<_, model::Post>("SELECT * FROM post WHERE id = ?1")
		.bind(id)
		.fetch_optional(&database)
		.await?;

	Ok(Json(post.ok_or(Error::UnknownPost(id))?))
}

/// Create post
/// Creates a new post with no likes or comments. Blog posts require `content`.
#[route(tag = tag::POST, response(status = 201, description = "Post created.", shape = "Json<model::Post>"))]
pub async fn create_post(
	State(database): State<Database>,
	Json(input): Json<model::CreatePostInput>,
) -> Result<(StatusCode, Json<model::Post>), AppError> {
	input.check_content()?;

	let now = Utc::now();
	let post = sqlx::query_as::<_, model::Post>(
		r#"
			INSERT INTO post (id, title, description, image_url, category, content, created_at, updated_at)
			VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
			RETURNING *
		"#,
	)
	.bind(Uuid::now_v7())
	.bind(&input.title)
	.bind(&input.description)
	.bind(&input.image_url)
	.bind(input.category)
	.bind(&input.content)
	.bind(now)
	.fetch_one(&database)
	.await?;

	tracing::info!(post = %post.id, category = ?post.category, "post created");

	Ok((StatusCode::CREATED, Json(post)))
}

/// Update post
/// Replaces the editable fields of a post, re-running validation. Likes and comments are kept.
#[route(tag = tag::POST)]
pub async fn update_post(
	State(database): State<Database>,
	Path(model::IdInput { id }): Path<model::IdInput>,
	Json(input): Json<model::CreatePostInput>,
) -> Result<Json<model::Post>, AppError> {
	input.check_content()?;

	let post = sqlx::query_as::<_, model::Post>(
		r#"
			UPDATE post
			SET title = ?1, description = ?2, image_url = ?3, category = ?4, content = ?5, updated_at = ?6
			WHERE id = ?7
			RETURNING *
		"#,
	)
	.bind(&input.title)
	.bind(&input.description)
	.bind(&input.image_url)
	.bind(input.category)
	.bind(&input.content)
	.bind(Utc::now())
	.bind(id)
	.fetch_optional(&database)
	.await?;

	Ok(Json(post.ok_or(Error::UnknownPost(id))?))
}

/// Delete post
/// Deletes a post together with its likes and comments.
#[route(tag = tag::POST)]
pub async fn delete_post(
	State(database): State<Database>,
	Path(model::IdInput { id }): Path<model::IdInput>,
) -> Result<Json<model::Deleted>, AppError> {
	let result = sqlx::query("DELETE FROM post WHERE id = ?1")
		.bind(id)
		.execute(&database)
		.await?;

	if result.rows_affected() == 0 {
		return Err(Error::UnknownPost(id).into());
	}

	Ok(Json(model::Deleted::new("Post deleted successfully")))
}

/// Like or unlike post
/// Adds the email to the post's likes, or removes it if it is already there.
/// The email is taken at face value.
#[route(tag = tag::POST)]
pub async fn toggle_like(
	State(database): State<Database>,
	Path(model::IdInput { id }): Path<model::IdInput>,
	Json(input): Json<model::LikeInput>,
) -> Result<Json<model::LikeResponse>, AppError> {
	let likes = sqlx::query_scalar::<_, SqlJson<Vec<String>>>(
		r#"
			UPDATE post
			SET likes = CASE
				WHEN EXISTS (SELECT 1 FROM json_each(post.likes) WHERE json_each.value = ?1)
				THEN (
					SELECT json_group_array(json_each.value)
					FROM json_each(post.likes)
					WHERE json_each.value != ?1
				)
				ELSE json_insert(post.likes, '$[#]', ?1)
			END
			WHERE id = ?2
			RETURNING likes
		"#,
	)
	.bind(&input.email)
	.bind(id)
	.fetch_optional(&database)
	.await?;

	let SqlJson(likes) = likes.ok_or(Error::UnknownPost(id))?;

	Ok(Json(model::LikeResponse {
		liked: likes.contains(&input.email),
		likes_count: likes.len(),
	}))
}

/// Add comment
/// Appends a comment to a post on behalf of the named visitor.
#[route(tag = tag::POST, response(status = 201, description = "Comment added.", shape = "Json<model::Comment>"))]
pub async fn add_comment(
	State(database): State<Database>,
	Path(model::IdInput { id }): Path<model::IdInput>,
	Json(input): Json<model::CommentInput>,
) -> Result<(StatusCode, Json<model::Comment>), AppError> {
	let comment = model::Comment {
		id: Uuid::now_v7(),
		user: model::Visitor {
			name: input.name,
			email: input.email,
		},
		content: input.content,
		created_at: Utc::now(),
	};

	let result =
		sqlx::query("UPDATE post SET comments = json_insert(comments, '$[#]', json(?1)) WHERE id = ?2")
			.bind(SqlJson(&comment))
			.bind(id)
			.execute(&database)
			.await?;

	if result.rows_affected() == 0 {
		return Err(Error::UnknownPost(id).into());
	}

	Ok((StatusCode::CREATED, Json(comment)))
}

/// Delete comment
/// Removes a comment from a post. Removing a comment that does not exist succeeds.
#[route(tag = tag::POST)]
pub async fn delete_comment(
	State(database): State<Database>,
	Path(model::CommentPath { id, comment_id }): Path<model::CommentPath>,
) -> Result<Json<model::Deleted>, AppError> {
	let result = sqlx::query(
		r#"
			UPDATE post
			SET comments = (
				SELECT json_group_array(json(json_each.value))
				FROM json_each(post.comments)
				WHERE json_extract(json_each.value, '$.id') != ?1
			)
			WHERE id = ?2
		"#,
	)
	.bind(comment_id.to_string())
	.bind(id)
	.execute(&database)
	.await?;

	if result.rows_affected() == 0 {
		return Err(Error::UnknownPost(id).into());
	}

	Ok(Json(model::Deleted::new("Comment deleted successfully")))
}
