use axum::{extract::State, http::StatusCode};
use chrono::Utc;
use macros::route;
use sqlx::types::Json as SqlJson;
use uuid::Uuid;

use crate::{
	error::Error as AppError,
	extract::{Json, Path, Session},
	mail::Mailer,
	openapi::tag,
	Database,
};

use super::{model, Error};

/// Get all messages
/// Returns every contact message, newest first.
#[route(tag = tag::MESSAGE)]
pub async fn get_messages(
	State(database): State<Database>,
) -> Result<Json<Vec<model::Message>>, AppError> {
	let messages = sqlx::query_as::<_, model::Message>(
		"SELECT * FROM message ORDER BY created_at DESC, id DESC",
	)
	.fetch_all(&database)
	.await?;

	Ok(Json(messages))
}

/// Get single message
#[route(tag = tag::MESSAGE)]
pub async fn get_message(
	State(database): State<Database>,
	Path(model::IdInput { id }): Path<model::IdInput>,
) -> Result<Json<model::Message>, AppError> {
	let message = sqlx::query_as::<_, model::Message>("SELECT * FROM message WHERE id = ?1")
		.bind(id)
		.fetch_optional(&database)
		.await?;

	Ok(Json(message.ok_or(Error::UnknownMessage(id))?))
}

/// Send message
/// Stores a contact message and notifies the site owner by email.
/// The notification is sent in the background and never affects the response.
#[route(tag = tag::MESSAGE, response(status = 201, description = "Message stored.", shape = "Json<model::Message>"))]
pub async fn create_message(
	State(database): State<Database>,
	State(mailer): State<Option<Mailer>>,
	Json(input): Json<model::CreateMessageInput>,
) -> Result<(StatusCode, Json<model::Message>), AppError> {
	let message = sqlx::query_as::<_, model::Message>(
		r#"
			INSERT INTO message (id, name, email, message, created_at)
			VALUES (?1, ?2, ?3, ?4, ?5)
			RETURNING *
		"#,
	)
	.bind(Uuid::now_v7())
	.bind(&input.name)
	.bind(input.email.trim())
	.bind(&input.message)
	.bind(Utc::now())
	.fetch_one(&database)
	.await?;

	tracing::info!(message = %message.id, "contact message received");

	if let Some(mailer) = mailer {
		let notice = message.clone();

		tokio::spawn(async move {
			if let Err(error) = mailer.send_contact_notice(&notice).await {
				tracing::warn!(message = %notice.id, %error, "failed to send contact notification");
			}
		});
	}

	Ok((StatusCode::CREATED, Json(message)))
}

/// Delete message
#[route(tag = tag::MESSAGE)]
pub async fn delete_message(
	State(database): State<Database>,
	Path(model::IdInput { id }): Path<model::IdInput>,
) -> Result<Json<model::Deleted>, AppError> {
	let result = sqlx::query("DELETE FROM message WHERE id = ?1")
		.bind(id)
		.execute(&database)
		.await?;

	if result.rows_affected() == 0 {
		return Err(Error::UnknownMessage(id).into());
	}

	Ok(Json(model::Deleted::new("Message deleted successfully")))
}

/// Star or unstar message
/// Flips the starred flag of a message.
#[route(tag = tag::MESSAGE)]
pub async fn toggle_star(
	State(database): State<Database>,
	Path(model::IdInput { id }): Path<model::IdInput>,
) -> Result<Json<model::Message>, AppError> {
	let message = sqlx::query_as::<_, model::Message>(
		"UPDATE message SET starred = NOT starred WHERE id = ?1 RETURNING *",
	)
	.bind(id)
	.fetch_optional(&database)
	.await?;

	Ok(Json(message.ok_or(Error::UnknownMessage(id))?))
}

/// Mark message as read
#[route(tag = tag::MESSAGE)]
pub async fn mark_read(
	State(database): State<Database>,
	_session: Session,
	Path(model::IdInput { id }): Path<model::IdInput>,
) -> Result<Json<model::Message>, AppError> {
	let message = sqlx::query_as::<_, model::Message>(
		"UPDATE message SET read = TRUE WHERE id = ?1 RETURNING *",
	)
	.bind(id)
	.fetch_optional(&database)
	.await?;

	Ok(Json(message.ok_or(Error::UnknownMessage(id))?))
}

/// Reply to message
/// Appends a reply to the message and marks it as read.
#[route(tag = tag::MESSAGE)]
pub async fn add_reply(
	State(database): State<Database>,
	_session: Session,
	Path(model::IdInput { id }): Path<model::IdInput>,
	Json(input): Json<model::ReplyInput>,
) -> Result<Json<model::Message>, AppError> {
	let reply = model::Reply {
		id: Uuid::now_v7(),
		content: input.reply,
		created_at: Utc::now(),
	};

	let message = sqlx::query_as::<_, model::Message>(
		r#"
			UPDATE message
			SET replies = json_insert(replies, '$[#]', json(?1)), read = TRUE
			WHERE id = ?2
			RETURNING *
		"#,
	)
	.bind(SqlJson(&reply))
	.bind(id)
	.fetch_optional(&database)
	.await?;

	Ok(Json(message.ok_or(Error::UnknownMessage(id))?))
}
