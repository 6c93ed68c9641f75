use std::sync::Arc;

use axum::extract::State;
use chrono::Utc;
use macros::route;
use sqlx::types::Json as SqlJson;

use crate::{
	error::Error,
	extract::{Json, Session},
	notify::{Event, Publisher},
	openapi::tag,
	Database,
};

use super::model;

/// Inserts the default profile unless one already exists.
async fn insert_default(database: &Database) -> Result<(), sqlx::Error> {
	let profile = model::AdminProfile::default();

	sqlx::query(
		r#"
			INSERT INTO admin_profile
				(id, name, email, bio, profile_image, social_links, home_page_content, created_at, updated_at)
			VALUES (1, ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
			ON CONFLICT (id) DO NOTHING
		"#,
	)
	.bind(&profile.name)
	.bind(&profile.email)
	.bind(&profile.bio)
	.bind(&profile.profile_image)
	.bind(SqlJson(&profile.social_links))
	.bind(SqlJson(&profile.home_page_content))
	.bind(profile.created_at)
	.execute(database)
	.await?;

	Ok(())
}

/// Returns the singleton profile, creating it first if needed.
pub async fn fetch(database: &Database) -> Result<model::AdminProfile, sqlx::Error> {
	insert_default(database).await?;

	sqlx::query_as::<_, model::AdminProfile>("SELECT * FROM admin_profile WHERE id = 1")
		.fetch_one(database)
		.await
}

/// Get profile
/// Returns the public part of the site owner's profile.
#[route(tag = tag::PROFILE)]
pub async fn get_profile(
	State(database): State<Database>,
) -> Result<Json<model::PublicProfile>, Error> {
	Ok(Json(fetch(&database).await?.into()))
}

/// Get admin profile
/// Returns the full profile of the site owner.
#[route(tag = tag::PROFILE)]
pub async fn get_admin_profile(
	State(database): State<Database>,
	_session: Session,
) -> Result<Json<model::AdminProfile>, Error> {
	Ok(Json(fetch(&database).await?))
}

/// Update profile
/// Applies the supplied fields to the profile and pushes the result to connected clients.
/// Absent fields keep their value; `socialLinks` and `homePageContent` are replaced whole.
#[route(tag = tag::PROFILE)]
pub async fn update_profile(
	State(database): State<Database>,
	State(publisher): State<Arc<dyn Publisher>>,
	session: Session,
	Json(input): Json<model::UpdateAdminProfileInput>,
) -> Result<Json<model::AdminProfile>, Error> {
	insert_default(&database).await?;

	let profile = sqlx::query_as::<_, model::AdminProfile>(
		r#"
			UPDATE admin_profile
			SET
				name = COALESCE(?1, name),
				email = COALESCE(?2, email),
				bio = COALESCE(?3, bio),
				profile_image = COALESCE(?4, profile_image),
				social_links = COALESCE(?5, social_links),
				home_page_content = COALESCE(?6, home_page_content),
				updated_at = ?7
			WHERE id = 1
			RETURNING *
		"#,
	)
	.bind(input.name.map(|name| name.trim().to_owned()))
	.bind(input.email.map(|email| email.trim().to_lowercase()))
	.bind(input.bio.map(|bio| bio.trim().to_owned()))
	.bind(input.profile_image)
	.bind(input.social_links.map(SqlJson))
	.bind(input.home_page_content.map(SqlJson))
	.bind(Utc::now())
	.fetch_one(&database)
	.await?;

	tracing::info!(admin = %session.admin.id, "profile updated");

	publisher.publish(Event::ProfileUpdated(profile.clone().into()));

	Ok(Json(profile))
}
