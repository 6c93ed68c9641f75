use std::borrow::Cow;

use axum::{
	body::Body,
	extract::rejection::{JsonRejection, PathRejection, QueryRejection},
	http::{Response, StatusCode},
	response::IntoResponse,
};
use schemars::JsonSchema;
use serde::Serialize;

use crate::route::{about, auth, message, post, upload};

pub type Map = serde_json::Map<String, serde_json::Value>;

/// A single client-facing error message.
#[derive(Debug, Serialize, JsonSchema)]
pub struct Message<'a> {
	/// A description of the error.
	pub content: Cow<'a, str>,
	/// The input field that caused the error, if any.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub field: Option<Cow<'a, str>>,
	/// Extra structured information about the error.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub details: Option<Cow<'a, Map>>,
}

impl<'a> Message<'a> {
	pub fn new(content: impl Into<Cow<'a, str>>) -> Self {
		Self {
			content: content.into(),
			field: None,
			details: None,
		}
	}
}

/// The body of every error response.
#[derive(Debug, Serialize, JsonSchema)]
pub struct ErrorResponse<'a> {
	/// A human-readable summary, safe to show to the user as-is.
	pub message: Cow<'a, str>,
	pub errors: Vec<Message<'a>>,
}

/// Implemented by the error type of each route module so the
/// crate-level [`Error`] can render it.
pub trait ErrorShape: std::error::Error {
	fn status(&self) -> StatusCode;

	fn errors(&self) -> Vec<Message<'_>> {
		vec![Message::new(self.to_string())]
	}
}

/// Error type for the application.
///
/// Route-specific errors are converted into this type with `?`, which
/// then decides on the status code and the response body.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("validation error: {0}")]
	Validation(#[from] validator::ValidationErrors),
	#[error("{}", .0.body_text())]
	Json(#[from] JsonRejection),
	#[error("{}", .0.body_text())]
	Query(#[from] QueryRejection),
	#[error("{}", .0.body_text())]
	Path(#[from] PathRejection),
	#[error(transparent)]
	Auth(#[from] auth::Error),
	#[error(transparent)]
	About(#[from] about::Error),
	#[error(transparent)]
	Post(#[from] post::Error),
	#[error(transparent)]
	Message(#[from] message::Error),
	#[error(transparent)]
	Upload(#[from] upload::Error),
	#[error("database error: {0}")]
	Database(#[from] sqlx::Error),
}

impl Error {
	fn shape(&self) -> Option<&dyn ErrorShape> {
		match self {
			Self::Auth(error) => Some(error as &dyn ErrorShape),
			Self::About(error) => Some(error as &dyn ErrorShape),
			Self::Post(error) => Some(error as &dyn ErrorShape),
			Self::Message(error) => Some(error as &dyn ErrorShape),
			Self::Upload(error) => Some(error as &dyn ErrorShape),
			_ => None,
		}
	}

	pub fn status(&self) -> StatusCode {
		match self {
			Self::Validation(..) | Self::Json(..) | Self::Query(..) | Self::Path(..) => {
				StatusCode::BAD_REQUEST
			}
			Self::Database(..) => StatusCode::INTERNAL_SERVER_ERROR,
			_ => self
				.shape()
				.map_or(StatusCode::INTERNAL_SERVER_ERROR, ErrorShape::status),
		}
	}

	fn errors(&self) -> Vec<Message<'_>> {
		match self {
			Self::Validation(errors) => {
				let mut messages = errors
					.field_errors()
					.into_iter()
					.flat_map(|(field, errors)| {
						errors.iter().map(move |error| Message {
							content: error
								.message
								.clone()
								.unwrap_or_else(|| error.code.clone()),
							field: Some(field.to_string().into()),
							details: None,
						})
					})
					.collect::<Vec<_>>();

				messages.sort_by(|a, b| a.field.cmp(&b.field));
				messages
			}
			_ => self
				.shape()
				.map_or_else(|| vec![Message::new(self.to_string())], ErrorShape::errors),
		}
	}

	/// The top-level message: the first field error for validation failures,
	/// otherwise the error's own display text.
	fn message(&self, errors: &[Message<'_>]) -> String {
		match (self, errors.first()) {
			(Self::Validation(..), Some(Message {
				content,
				field: Some(field),
				..
			})) => format!("{field}: {content}"),
			_ => self.to_string(),
		}
	}
}

impl IntoResponse for Error {
	fn into_response(self) -> Response<Body> {
		let status = self.status();

		if status.is_server_error() {
			tracing::error!(error = %self, "request failed");
		} else {
			tracing::debug!(error = %self, %status, "request rejected");
		}

		let errors = self.errors();
		let message = self.message(&errors);

		(
			status,
			axum::Json(ErrorResponse {
				message: message.into(),
				errors,
			}),
		)
			.into_response()
	}
}

impl aide::OperationOutput for Error {
	type Inner = Self;
}
