use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How long an issued token stays valid, in days.
pub const TOKEN_LIFETIME_DAYS: i64 = 7;

/// The token payload. Only the admin id is carried; there are no roles.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
	pub id: Uuid,
	pub iat: i64,
	pub exp: i64,
}

/// HMAC keys used to sign and verify admin tokens.
#[derive(Clone)]
pub struct Keys {
	encoding: EncodingKey,
	decoding: DecodingKey,
}

impl Keys {
	pub fn new(secret: &[u8]) -> Self {
		Self {
			encoding: EncodingKey::from_secret(secret),
			decoding: DecodingKey::from_secret(secret),
		}
	}

	/// Signs a token for the admin that expires after [`TOKEN_LIFETIME_DAYS`].
	pub fn issue(&self, admin_id: Uuid) -> Result<String, jsonwebtoken::errors::Error> {
		let now = Utc::now();

		self.sign(&Claims {
			id: admin_id,
			iat: now.timestamp(),
			exp: (now + Duration::days(TOKEN_LIFETIME_DAYS)).timestamp(),
		})
	}

	pub fn sign(&self, claims: &Claims) -> Result<String, jsonwebtoken::errors::Error> {
		jsonwebtoken::encode(&Header::default(), claims, &self.encoding)
	}

	/// Verifies the signature and expiry of a token, returning its claims.
	pub fn verify(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
		let validation = Validation::default();

		jsonwebtoken::decode::<Claims>(token, &self.decoding, &validation).map(|data| data.claims)
	}
}
