use argon2::Argon2;
use axum::{extract::State, http::StatusCode};
use chrono::Utc;
use macros::route;
use uuid::Uuid;

use crate::{
	error::Error as AppError,
	extract::{Json, Session},
	openapi::tag,
	route::{message, post},
	AppState, Database,
};

use super::{model, Error};

pub const KEY_LENGTH: usize = 32;

/// Hashes a password with Argon2, using the admin's id as a salt.
pub fn hash_password(
	hasher: &Argon2,
	password: &str,
	id: &Uuid,
) -> Result<[u8; KEY_LENGTH], argon2::Error> {
	let mut hash = [0; KEY_LENGTH];

	hasher.hash_password_into(password.as_bytes(), id.as_bytes(), &mut hash)?;
	Ok(hash)
}

/// Inserts the admin unless an account already exists.
///
/// Returns `false` when an admin was already present.
pub async fn insert_admin(
	database: &Database,
	hasher: &Argon2<'_>,
	id: Uuid,
	username: &str,
	email: &str,
	password: &str,
) -> Result<bool, AppError> {
	let hashed = hash_password(hasher, password, &id).map_err(Error::Argon)?;

	let result = sqlx::query(
		r#"
			INSERT INTO admin (id, username, email, password, created_at)
			SELECT ?1, ?2, ?3, ?4, ?5
			WHERE NOT EXISTS (SELECT 1 FROM admin)
		"#,
	)
	.bind(id)
	.bind(username.trim())
	.bind(email.trim().to_lowercase())
	.bind(&hashed[..])
	.bind(Utc::now())
	.execute(database)
	.await?;

	Ok(result.rows_affected() == 1)
}

/// Register admin
/// Creates the one admin account and returns a token for it. Fails once an admin exists.
#[route(tag = tag::AUTH, response(status = 201, description = "Admin created.", shape = "Json<model::RegisterResponse>"))]
pub async fn register(
	State(state): State<AppState>,
	Json(input): Json<model::RegisterInput>,
) -> Result<(StatusCode, Json<model::RegisterResponse>), AppError> {
	let id = Uuid::now_v7();

	if !insert_admin(
		&state.database,
		&state.hasher,
		id,
		&input.username,
		&input.email,
		&input.password,
	)
	.await?
	{
		return Err(Error::AdminExists.into());
	}

	tracing::info!(admin = %id, "admin registered");

	let token = state.keys.issue(id).map_err(Error::Token)?;

	Ok((
		StatusCode::CREATED,
		Json(model::RegisterResponse {
			message: "Admin account created successfully".into(),
			token,
		}),
	))
}

/// Log in
/// Verifies the admin's credentials and returns a token valid for seven days.
#[route(tag = tag::AUTH, response(status = 200, description = "Logged in successfully.", shape = "Json<model::TokenResponse>"))]
pub async fn login(
	State(state): State<AppState>,
	Json(input): Json<model::LoginInput>,
) -> Result<Json<model::TokenResponse>, AppError> {
	let admin = sqlx::query_as::<_, model::Admin>("SELECT * FROM admin WHERE email = ?1")
		.bind(input.email.trim().to_lowercase())
		.fetch_optional(&state.database)
		.await?;

	let Some(admin) = admin else {
		return Err(Error::InvalidCredentials.into());
	};

	let hashed = hash_password(&state.hasher, &input.password, &admin.id).map_err(Error::Argon)?;

	if admin.password != hashed {
		return Err(Error::InvalidCredentials.into());
	}

	sqlx::query("UPDATE admin SET last_login = ?1 WHERE id = ?2")
		.bind(Utc::now())
		.bind(admin.id)
		.execute(&state.database)
		.await?;

	let token = state.keys.issue(admin.id).map_err(Error::Token)?;

	tracing::info!(admin = %admin.id, "admin logged in");

	Ok(Json(model::TokenResponse { token }))
}

/// Get dashboard
/// Returns post and message counts along with the five newest of each.
#[route(tag = tag::AUTH)]
pub async fn dashboard(
	State(database): State<Database>,
	_session: Session,
) -> Result<Json<model::Dashboard>, AppError> {
	let total_posts = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM post")
		.fetch_one(&database)
		.await?;

	let total_messages = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM message")
		.fetch_one(&database)
		.await?;

	let recent_posts = sqlx::query_as::<_, post::model::Post>(
		"SELECT * FROM post ORDER BY created_at DESC, id DESC LIMIT 5",
	)
	.fetch_all(&database)
	.await?;

	let recent_messages = sqlx::query_as::<_, message::model::Message>(
		"SELECT * FROM message ORDER BY created_at DESC, id DESC LIMIT 5",
	)
	.fetch_all(&database)
	.await?;

	Ok(Json(model::Dashboard {
		total_posts,
		total_messages,
		recent_posts,
		recent_messages,
	}))
}
