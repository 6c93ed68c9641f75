pub use crate::route::model::{Deleted, IdInput};

use chrono::{DateTime, Utc};
use macros::model;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// What kind of content a post is.
#[derive(
	Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, JsonSchema, sqlx::Type,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Category {
	Gallery,
	Blog,
	Feed,
}

/// An anonymous visitor, identified only by the name and email they supply.
///
/// Nothing about a visitor is verified.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct Visitor {
	pub name: String,
	pub email: String,
}

/// A comment left on a post by a visitor.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
	pub id: Uuid,
	pub user: Visitor,
	pub content: String,
	pub created_at: DateTime<Utc>,
}

/// A gallery image, blog article or feed item.
#[model(create)]
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema, Validate, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Post {
	/// The unique identifier of the post.
	#[serde(skip_deserializing)]
	pub id: Uuid,
	/// The title of the post.
	#[validate(length(min = 1, max = 256))]
	pub title: String,
	/// A short summary shown in listings.
	#[validate(length(min = 1))]
	pub description: String,
	/// Path or URL of the cover image.
	#[validate(length(min = 1))]
	pub image_url: String,
	pub category: Category,
	/// The article body in Markdown. Required for blog posts.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub content: Option<String>,
	/// Emails of the visitors who liked the post.
	#[serde(skip_deserializing)]
	#[sqlx(json)]
	pub likes: Vec<String>,
	/// Comments, oldest first.
	#[serde(skip_deserializing)]
	#[sqlx(json)]
	pub comments: Vec<Comment>,
	/// The creation time of the post.
	#[serde(skip_deserializing)]
	pub created_at: DateTime<Utc>,
	/// The last time the post was edited.
	#[serde(skip_deserializing)]
	pub updated_at: DateTime<Utc>,
}

impl CreatePostInput {
	/// Blog posts must carry a non-blank body.
	pub fn check_content(&self) -> Result<(), super::Error> {
		let has_content = self
			.content
			.as_deref()
			.is_some_and(|content| !content.trim().is_empty());

		if self.category == Category::Blog && !has_content {
			return Err(super::Error::MissingContent);
		}

		Ok(())
	}
}

#[derive(Deserialize, Validate, JsonSchema)]
pub struct ListPostsInput {
	/// Only return posts of this category.
	pub category: Option<Category>,
}

#[derive(Deserialize, Validate, JsonSchema)]
pub struct CommentPath {
	pub id: Uuid,
	pub comment_id: Uuid,
}

#[derive(Deserialize, Validate, JsonSchema)]
pub struct LikeInput {
	/// The visitor's email. Liking again with the same email removes the like.
	#[validate(email)]
	pub email: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LikeResponse {
	/// Whether the email is now in the like set.
	pub liked: bool,
	pub likes_count: usize,
}

/// A new comment. The name and email become the comment's [`Visitor`].
#[derive(Deserialize, Validate, JsonSchema)]
pub struct CommentInput {
	#[validate(length(min = 1, max = 128))]
	pub name: String,
	#[validate(email)]
	pub email: String,
	#[validate(length(min = 1, max = 4096))]
	pub content: String,
}
