use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Rejects strings that are empty once surrounding whitespace is removed.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
	if value.trim().is_empty() {
		return Err(ValidationError::new("blank").with_message("must not be blank".into()));
	}

	Ok(())
}

#[derive(Deserialize, Validate, JsonSchema)]
pub struct IdInput {
	pub id: Uuid,
}

/// Acknowledges a deletion.
#[derive(Serialize, JsonSchema)]
pub struct Deleted {
	pub message: &'static str,
}

impl Deleted {
	pub const fn new(message: &'static str) -> Self {
		Self { message }
	}
}
