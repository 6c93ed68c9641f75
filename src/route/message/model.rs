pub use crate::route::model::{Deleted, IdInput};

use chrono::{DateTime, Utc};
use macros::model;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// An admin's reply to a contact message.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
	pub id: Uuid,
	pub content: String,
	pub created_at: DateTime<Utc>,
}

/// A message sent through the contact form.
#[model(create)]
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema, Validate, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Message {
	#[serde(skip_deserializing)]
	pub id: Uuid,
	/// The sender's name.
	#[validate(length(min = 1, max = 128))]
	pub name: String,
	/// Where replies should go.
	#[validate(email)]
	pub email: String,
	#[validate(length(min = 1, max = 8192))]
	pub message: String,
	#[serde(skip_deserializing)]
	pub starred: bool,
	#[serde(skip_deserializing)]
	pub read: bool,
	/// Replies, oldest first.
	#[serde(skip_deserializing)]
	#[sqlx(json)]
	pub replies: Vec<Reply>,
	#[serde(skip_deserializing)]
	pub created_at: DateTime<Utc>,
}

#[derive(Deserialize, Validate, JsonSchema)]
pub struct ReplyInput {
	/// The reply text.
	#[validate(length(min = 1, max = 8192))]
	pub reply: String,
}
