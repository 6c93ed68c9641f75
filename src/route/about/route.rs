use axum::{extract::State, http::StatusCode};
use chrono::Utc;
use macros::route;
use sqlx::types::Json as SqlJson;

use crate::{
	error::Error as AppError,
	extract::{Json, Session},
	openapi::tag,
	Database,
};

use super::{model, Error};

/// Inserts the singleton row, leaving an existing one untouched.
///
/// Returns `false` if the row already existed.
async fn insert(database: &Database, input: &model::CreateAboutInput) -> Result<bool, sqlx::Error> {
	let result = sqlx::query(
		r#"
			INSERT INTO about (id, title, description, skills, experience, created_at, updated_at)
			VALUES (1, ?1, ?2, ?3, ?4, ?5, ?5)
			ON CONFLICT (id) DO NOTHING
		"#,
	)
	.bind(&input.title)
	.bind(&input.description)
	.bind(SqlJson(&input.skills))
	.bind(SqlJson(&input.experience))
	.bind(Utc::now())
	.execute(database)
	.await?;

	Ok(result.rows_affected() == 1)
}

async fn fetch(database: &Database) -> Result<model::About, sqlx::Error> {
	sqlx::query_as::<_, model::About>("SELECT * FROM about WHERE id = 1")
		.fetch_one(database)
		.await
}

/// Get about
/// Returns the about section, filling it with placeholder content on first access.
#[route(tag = tag::ABOUT)]
pub async fn get_about(State(database): State<Database>) -> Result<Json<model::About>, AppError> {
	if insert(&database, &model::CreateAboutInput::default()).await? {
		tracing::info!("created placeholder about section");
	}

	Ok(Json(fetch(&database).await?))
}

/// Create about
/// Creates the about section. Fails if it already exists.
#[route(tag = tag::ABOUT, response(status = 201, description = "About section created.", shape = "Json<model::About>"))]
pub async fn create_about(
	State(database): State<Database>,
	_session: Session,
	Json(input): Json<model::CreateAboutInput>,
) -> Result<(StatusCode, Json<model::About>), AppError> {
	if !insert(&database, &input).await? {
		return Err(Error::AlreadyExists.into());
	}

	Ok((StatusCode::CREATED, Json(fetch(&database).await?)))
}

/// Update about
/// Replaces the whole about section, creating it if needed.
#[route(tag = tag::ABOUT)]
pub async fn update_about(
	State(database): State<Database>,
	_session: Session,
	Json(input): Json<model::CreateAboutInput>,
) -> Result<Json<model::About>, AppError> {
	let about = sqlx::query_as::<_, model::About>(
		r#"
			INSERT INTO about (id, title, description, skills, experience, created_at, updated_at)
			VALUES (1, ?1, ?2, ?3, ?4, ?5, ?5)
			ON CONFLICT (id) DO UPDATE SET
				title = excluded.title,
				description = excluded.description,
				skills = excluded.skills,
				experience = excluded.experience,
				updated_at = excluded.updated_at
			RETURNING *
		"#,
	)
	.bind(&input.title)
	.bind(&input.description)
	.bind(SqlJson(&input.skills))
	.bind(SqlJson(&input.experience))
	.bind(Utc::now())
	.fetch_one(&database)
	.await?;

	Ok(Json(about))
}
