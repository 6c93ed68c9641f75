use aide::axum::{routing::get_with, ApiRouter};

use crate::AppState;

pub mod model;
pub mod route;

/// Public profile routes, mounted under `/api`.
pub fn routes() -> ApiRouter<AppState> {
	use route::*;

	ApiRouter::new().api_route("/profile", get_with(get_profile, get_profile_docs))
}

/// Admin-only profile routes, mounted under `/api/admin`.
pub fn admin_routes() -> ApiRouter<AppState> {
	use route::*;

	ApiRouter::new().api_route(
		"/profile",
		get_with(get_admin_profile, get_admin_profile_docs)
			.put_with(update_profile, update_profile_docs),
	)
}
