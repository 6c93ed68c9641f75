use aide::OperationInput;
use axum::{
	extract::{FromRef, FromRequestParts},
	http::{header, request},
};

use crate::{error::Error, openapi::SECURITY_SCHEME_BEARER, route::auth, token, Database};

pub const AUTHORIZATION_PREFIX: &str = "Bearer ";

/// Extracts the authenticated admin from a bearer token.
///
/// If the header is missing, a [`auth::Error::NoToken`] is returned.
/// If the token is malformed, expired, signed with another key, or names an
/// admin that no longer exists, a [`auth::Error::InvalidToken`] is returned.
///
/// ```rust
/// async fn route(session: Session) {
///   println!("{:?}", session.admin);
/// }
/// ```
#[derive(Debug)]
pub struct Session {
	pub admin: auth::model::Admin,
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for Session
where
	Database: FromRef<S>,
	token::Keys: FromRef<S>,
	S: Sync + Send,
{
	type Rejection = Error;

	async fn from_request_parts(
		parts: &mut request::Parts,
		state: &S,
	) -> Result<Self, Self::Rejection> {
		let header = parts
			.headers
			.get(header::AUTHORIZATION)
			.ok_or(auth::Error::NoToken)?;

		let token = header
			.to_str()
			.ok()
			.and_then(|value| value.strip_prefix(AUTHORIZATION_PREFIX))
			.map(str::trim)
			.filter(|token| !token.is_empty())
			.ok_or(auth::Error::NoToken)?;

		let keys = token::Keys::from_ref(state);
		let claims = keys.verify(token).map_err(|error| {
			tracing::debug!(%error, "rejected bearer token");
			auth::Error::InvalidToken
		})?;

		let database = Database::from_ref(state);
		let admin = sqlx::query_as::<_, auth::model::Admin>("SELECT * FROM admin WHERE id = ?1")
			.bind(claims.id)
			.fetch_optional(&database)
			.await?;

		let admin = admin.ok_or(auth::Error::InvalidToken)?;

		Ok(Session { admin })
	}
}

impl OperationInput for Session {
	/// Operation input for the session extractor.
	///
	/// This adds a bearer token requirement to the `OpenAPI` operation.
	fn operation_input(_ctx: &mut aide::gen::GenContext, operation: &mut aide::openapi::Operation) {
		operation.security.push(
			[(SECURITY_SCHEME_BEARER.to_string(), Vec::new())]
				.into_iter()
				.collect(),
		);
	}
}
