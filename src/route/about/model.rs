use chrono::{DateTime, Utc};
use macros::model;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

fn validate_skills(skills: &[String]) -> Result<(), ValidationError> {
	if skills.iter().any(|skill| skill.trim().is_empty()) {
		return Err(ValidationError::new("skills must not be empty"));
	}

	Ok(())
}

/// A single entry of the work history.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema, Validate)]
pub struct Experience {
	#[validate(length(min = 1))]
	pub title: String,
	#[validate(length(min = 1))]
	pub company: String,
	/// Free-form period, e.g. `2023 - Present`.
	#[validate(length(min = 1))]
	pub period: String,
	#[validate(length(min = 1))]
	pub description: String,
}

/// The "about me" section. A single row exists.
#[model(create)]
#[derive(Debug, Deserialize, Serialize, JsonSchema, Validate, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct About {
	#[validate(length(min = 1, max = 256))]
	pub title: String,
	#[validate(length(min = 1))]
	pub description: String,
	/// Skills in display order.
	#[sqlx(json)]
	#[validate(custom(function = "validate_skills"))]
	pub skills: Vec<String>,
	/// Work history in display order.
	#[sqlx(json)]
	#[validate(nested)]
	pub experience: Vec<Experience>,
	#[serde(skip_deserializing)]
	pub created_at: DateTime<Utc>,
	#[serde(skip_deserializing)]
	pub updated_at: DateTime<Utc>,
}

impl Default for CreateAboutInput {
	/// Placeholder content used until the admin writes their own.
	fn default() -> Self {
		Self {
			title: "Welcome to my portfolio".into(),
			description: "This is a brief description about me.".into(),
			skills: vec!["Web Development".into()],
			experience: vec![Experience {
				title: "Developer".into(),
				company: "Company Name".into(),
				period: "2023 - Present".into(),
				description: "Working as a developer.".into(),
			}],
		}
	}
}
