use aide::{
	openapi::{SecurityScheme, Tag},
	transform::TransformOpenApi,
};
use serde_json::json;

use crate::{error::ErrorBody, extract::Json};

pub const SECURITY_SCHEME_BEARER: &str = "Bearer";

pub mod tag {
	pub const BLOG: &str = "Blogs";
	pub const ADMIN: &str = "Admin";
}

pub fn docs(api: TransformOpenApi) -> TransformOpenApi {
	api.title("Engivora API")
		.summary("Content service for the Engivora student platform")
		.description(include_str!("../README.md"))
		.tag(Tag {
			name: tag::BLOG.into(),
			description: Some("Public blog posts".into()),
			..Default::default()
		})
		.tag(Tag {
			name: tag::ADMIN.into(),
			description: Some("Admin blog management".into()),
			..Default::default()
		})
		.security_scheme(
			SECURITY_SCHEME_BEARER,
			SecurityScheme::Http {
				scheme: "bearer".into(),
				bearer_format: Some("JWT".into()),
				description: Some("A bearer token issued by the platform".into()),
				extensions: Default::default(),
			},
		)
		.default_response_with::<Json<ErrorBody>, _>(|res| {
			res.example(ErrorBody {
				error: "error message".into(),
				details: Some(json!({ "field": ["what went wrong"] })),
			})
		})
}
