use std::borrow::Cow;

use aide::{
	openapi::{SecurityScheme, Tag},
	transform::TransformOpenApi,
};

use crate::{error, extract::Json};

/// Name of the bearer token scheme required by admin routes.
pub const SECURITY_SCHEME_BEARER: &str = "Bearer";

pub mod tag {
	pub const AUTH: &str = "Auth";
	pub const PROFILE: &str = "Profile";
	pub const ABOUT: &str = "About";
	pub const POST: &str = "Post";
	pub const MESSAGE: &str = "Message";
	pub const HEALTH: &str = "Health";
}

fn tag(name: &str, description: &str) -> Tag {
	Tag {
		name: name.into(),
		description: Some(description.into()),
		..Default::default()
	}
}

pub fn docs(api: TransformOpenApi) -> TransformOpenApi {
	api.title("Portfolio API")
		.summary("Content and contact API for a personal portfolio site")
		.tag(tag(tag::AUTH, "Admin authentication and dashboard"))
		.tag(tag(tag::PROFILE, "Site owner profile"))
		.tag(tag(tag::ABOUT, "About section"))
		.tag(tag(tag::POST, "Gallery, blog and feed posts"))
		.tag(tag(tag::MESSAGE, "Contact messages"))
		.tag(tag(tag::HEALTH, "Operational checks"))
		.security_scheme(
			SECURITY_SCHEME_BEARER,
			SecurityScheme::Http {
				scheme: "bearer".into(),
				bearer_format: Some("JWT".into()),
				description: Some("A token returned by login or register".into()),
				extensions: Default::default(),
			},
		)
		.default_response_with::<Json<error::ErrorResponse>, _>(|res| {
			res.example(error::ErrorResponse {
				message: "error message".into(),
				errors: vec![error::Message {
					content: "error message".into(),
					field: Some("optional field".into()),
					details: Some(Cow::Owned({
						let mut map = error::Map::new();
						map.insert("key".into(), serde_json::json!("value"));
						map
					})),
				}],
			})
		})
}
