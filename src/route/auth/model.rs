use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::route::{message, model::validate_not_blank, post};

/// The site administrator. Only one account is ever registered.
#[derive(Debug, Serialize, JsonSchema, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Admin {
	/// The unique identifier of the admin.
	pub id: Uuid,
	/// The display name of the admin.
	pub username: String,
	/// The login address.
	#[serde(skip_serializing)]
	pub email: String,
	/// Argon2 hash, salted with `id`.
	#[serde(skip)]
	pub password: Vec<u8>,
	/// The last successful login.
	pub last_login: Option<DateTime<Utc>>,
	/// The creation time of the account.
	pub created_at: DateTime<Utc>,
}

#[derive(Deserialize, Validate, JsonSchema)]
pub struct LoginInput {
	/// Not checked for shape, so a malformed address fails like any unknown one.
	#[validate(length(min = 1, max = 256))]
	pub email: String,
	#[validate(length(min = 1, max = 128))]
	pub password: String,
}

#[derive(Deserialize, Validate, JsonSchema)]
pub struct RegisterInput {
	#[validate(length(min = 1, max = 64), custom(function = "validate_not_blank"))]
	pub username: String,
	#[validate(email)]
	pub email: String,
	#[validate(length(min = 8, max = 128))]
	pub password: String,
}

/// A signed bearer token for the admin-only routes.
#[derive(Serialize, JsonSchema)]
pub struct TokenResponse {
	pub token: String,
}

#[derive(Serialize, JsonSchema)]
pub struct RegisterResponse {
	pub message: String,
	pub token: String,
}

/// Aggregate counts for the admin dashboard.
#[derive(Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
	pub total_posts: i64,
	pub total_messages: i64,
	/// The five newest posts.
	pub recent_posts: Vec<post::model::Post>,
	/// The five newest messages.
	pub recent_messages: Vec<message::model::Message>,
}
