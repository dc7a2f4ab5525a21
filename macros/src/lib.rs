mod model;
mod route;

use proc_macro::TokenStream;

/// Creates a new documentation function for the route, named after the original function with the suffix `_docs`.
/// The first doc line becomes the operation summary; any following lines become the description.
#[proc_macro_attribute]
pub fn route(args: TokenStream, input: TokenStream) -> TokenStream {
	route::from_input(args, input)
}

/// Creates a `XInput` struct for the model, carrying the request payload for create and update.
/// Fields with #[serde(skip_deserializing)] or #[serde(skip)] are omitted; all other fields
/// are included verbatim (including attributes), so validation rules and serde defaults apply
/// to the input exactly as they do to the model.
#[proc_macro_attribute]
pub fn model(_args: TokenStream, input: TokenStream) -> TokenStream {
	model::from_input(input)
}
