use chrono::{DateTime, Utc};
use macros::model;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::route::model::validate_not_blank;

/// Links shown in the site footer and contact section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(default)]
pub struct SocialLinks {
	pub github: String,
	pub linkedin: String,
	pub twitter: String,
	pub email: String,
}

/// Text shown in the hero section of the home page.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(default)]
pub struct HomePageContent {
	pub title: String,
	pub subtitle: String,
	pub description: String,
}

impl Default for HomePageContent {
	fn default() -> Self {
		Self {
			title: "Full Stack Developer".into(),
			subtitle: "Creating modern web applications".into(),
			description: "Welcome to my portfolio".into(),
		}
	}
}

/// The site owner's profile. Exactly one row exists, created on first access.
///
/// The generated `UpdateAdminProfileInput` is a per-field patch: every key present
/// replaces the stored value, and `socialLinks` / `homePageContent` are replaced
/// as whole objects.
#[model(update)]
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema, Validate, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AdminProfile {
	/// The display name. Stored trimmed.
	#[validate(length(min = 1, max = 128), custom(function = "validate_not_blank"))]
	pub name: String,
	/// The contact address of the site owner.
	#[validate(email)]
	pub email: String,
	/// A short biography. Stored trimmed.
	pub bio: String,
	/// Path or URL of the profile picture.
	pub profile_image: String,
	#[sqlx(json)]
	pub social_links: SocialLinks,
	#[sqlx(json)]
	pub home_page_content: HomePageContent,
	#[serde(skip_deserializing)]
	pub created_at: DateTime<Utc>,
	#[serde(skip_deserializing)]
	pub updated_at: DateTime<Utc>,
}

impl Default for AdminProfile {
	fn default() -> Self {
		let now = Utc::now();

		Self {
			name: "Admin".into(),
			email: "admin@example.com".into(),
			bio: String::new(),
			profile_image: String::new(),
			social_links: SocialLinks::default(),
			home_page_content: HomePageContent::default(),
			created_at: now,
			updated_at: now,
		}
	}
}

/// The part of the profile visitors are allowed to see.
#[derive(Debug, Clone, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublicProfile {
	pub name: String,
	pub bio: String,
	pub profile_image: String,
	pub social_links: SocialLinks,
	pub home_page_content: HomePageContent,
}

impl From<AdminProfile> for PublicProfile {
	fn from(profile: AdminProfile) -> Self {
		Self {
			name: profile.name,
			bio: profile.bio,
			profile_image: profile.profile_image,
			social_links: profile.social_links,
			home_page_content: profile.home_page_content,
		}
	}
}
