use std::path::{Path, PathBuf};

use axum::{
	extract::{
		multipart::{MultipartError, MultipartRejection},
		Multipart, State,
	},
	http::StatusCode,
	routing::post,
	Router,
};
use schemars::JsonSchema;
use serde::Serialize;
use uuid::Uuid;

use crate::{error, extract::Json, AppState};

/// The multipart field holding the file.
pub const FIELD_NAME: &str = "image";

/// Directory uploaded files are written to, served under `/uploads`.
#[derive(Debug, Clone)]
pub struct Uploads(pub PathBuf);

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("no file uploaded")]
	MissingFile,
	#[error("only image files are allowed")]
	NotAnImage,
	#[error("{}", .0.body_text())]
	Rejected(#[from] MultipartRejection),
	#[error("{}", .0.body_text())]
	Multipart(#[from] MultipartError),
	#[error("failed to store file")]
	Io(#[from] std::io::Error),
}

#[derive(Serialize, JsonSchema)]
pub struct UploadResponse {
	/// Where the stored file can be fetched from.
	pub url: String,
}

pub fn routes() -> Router<AppState> {
	Router::new().route("/upload", post(upload))
}

/// A fresh file name that keeps the original extension, if it has a sane one.
fn stored_name(original: Option<&str>) -> String {
	let extension = original
		.and_then(|name| Path::new(name).extension())
		.and_then(|extension| extension.to_str())
		.filter(|extension| {
			!extension.is_empty()
				&& extension.len() <= 8
				&& extension.chars().all(|c| c.is_ascii_alphanumeric())
		})
		.map(str::to_ascii_lowercase);

	match extension {
		Some(extension) => format!("{}.{extension}", Uuid::now_v7()),
		None => Uuid::now_v7().to_string(),
	}
}

async fn upload(
	State(Uploads(directory)): State<Uploads>,
	multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, error::Error> {
	let mut multipart = multipart.map_err(Error::from)?;

	while let Some(field) = multipart.next_field().await.map_err(Error::from)? {
		if field.name() != Some(FIELD_NAME) {
			continue;
		}

		let is_image = field
			.content_type()
			.is_some_and(|content_type| content_type.starts_with("image/"));

		if !is_image {
			return Err(Error::NotAnImage.into());
		}

		let name = stored_name(field.file_name());
		let bytes = field.bytes().await.map_err(Error::from)?;

		tokio::fs::create_dir_all(&directory)
			.await
			.map_err(Error::from)?;
		tokio::fs::write(directory.join(&name), &bytes)
			.await
			.map_err(Error::from)?;

		tracing::info!(file = %name, size = bytes.len(), "stored upload");

		return Ok(Json(UploadResponse {
			url: format!("/uploads/{name}"),
		}));
	}

	Err(Error::MissingFile.into())
}

impl error::ErrorShape for Error {
	fn status(&self) -> StatusCode {
		match self {
			Self::MissingFile | Self::NotAnImage => StatusCode::BAD_REQUEST,
			Self::Rejected(rejection) => rejection.status(),
			Self::Multipart(error) => error.status(),
			Self::Io(..) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}
}
