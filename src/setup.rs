//! Admin account maintenance, run from the command line.

use anyhow::{bail, Context};
use argon2::Argon2;
use uuid::Uuid;

use crate::{
	route::auth::{model::Admin, route},
	Database,
};

pub async fn create_admin(
	database: &Database,
	username: &str,
	email: &str,
	password: &str,
) -> anyhow::Result<Uuid> {
	let id = Uuid::now_v7();

	if !route::insert_admin(database, &Argon2::default(), id, username, email, password).await? {
		bail!("an admin account already exists");
	}

	tracing::info!(admin = %id, username, "admin created");

	Ok(id)
}

pub async fn reset_password(database: &Database, email: &str, password: &str) -> anyhow::Result<()> {
	let admin = sqlx::query_as::<_, Admin>("SELECT * FROM admin WHERE email = ?1")
		.bind(email.trim().to_lowercase())
		.fetch_optional(database)
		.await?
		.with_context(|| format!("no admin with email {email}"))?;

	let hashed = route::hash_password(&Argon2::default(), password, &admin.id)
		.context("failed to hash password")?;

	sqlx::query("UPDATE admin SET password = ?1 WHERE id = ?2")
		.bind(&hashed[..])
		.bind(admin.id)
		.execute(database)
		.await?;

	tracing::info!(admin = %admin.id, "password reset");

	Ok(())
}
