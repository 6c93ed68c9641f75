mod model;
mod route;

use proc_macro::TokenStream;

/// Generates an `aide` documentation function for the handler, named after it with a `_docs` suffix.
///
/// The first line of the doc comment becomes the operation summary and the remaining
/// lines become its description.
#[proc_macro_attribute]
pub fn route(args: TokenStream, input: TokenStream) -> TokenStream {
	route::from_input(args, input)
}

/// Generates request input structs from a persisted model.
///
/// `#[model(create)]` emits `Create{Model}Input` and `#[model(update)]` emits
/// `Update{Model}Input` where every field is wrapped in an [`Option`]. Fields marked
/// `#[serde(skip)]` or `#[serde(skip_deserializing)]` are server-owned and left out.
/// `sqlx` attributes and the `FromRow` derive stay on the model only.
#[proc_macro_attribute]
pub fn model(args: TokenStream, input: TokenStream) -> TokenStream {
	model::from_input(args, input)
}
