use aide::axum::{
	routing::{get_with, post_with},
	ApiRouter,
};
use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use crate::{error, AppState};

pub mod model;
pub mod route;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Blog not found")]
	UnknownBlog(Uuid),
	#[error("A blog with this title already exists")]
	DuplicateSlug(String),
}

pub type RouteError = error::RouteError<Error>;

pub fn routes() -> ApiRouter<AppState> {
	use route::*;

	ApiRouter::new()
		.api_route(
			"/",
			get_with(list_blogs, list_blogs_docs).post_with(create_blog, create_blog_docs),
		)
		.api_route("/sync", post_with(sync_blogs, sync_blogs_docs))
		.api_route(
			"/:id",
			aide::axum::routing::put_with(update_blog, update_blog_docs)
				.delete_with(delete_blog, delete_blog_docs),
		)
}

impl error::ErrorShape for Error {
	fn status(&self) -> StatusCode {
		match self {
			Self::UnknownBlog(..) => StatusCode::NOT_FOUND,
			Self::DuplicateSlug(..) => StatusCode::CONFLICT,
		}
	}

	fn message(&self) -> String {
		self.to_string()
	}

	fn details(&self) -> Option<serde_json::Value> {
		match self {
			Self::UnknownBlog(id) => Some(json!({ "id": id })),
			Self::DuplicateSlug(slug) => Some(json!({ "slug": slug })),
		}
	}
}

#[cfg(test)]
mod test {
	use crate::test::*;

	fn admin_body(title: &str, status: &str) -> serde_json::Value {
		json!({
			"title": title,
			"content": "A full writeup of the robotics curriculum, covering sensors, actuators and the control loop basics.",
			"tags": ["robotics"],
			"status": status,
		})
	}

	#[tokio::test]
	async fn test_list_requires_auth() {
		let app = app(memory());

		let response = app.get("/api/admin/blogs").await;

		assert_eq!(response.status_code(), 401);
		assert_eq!(
			response.json::<serde_json::Value>()["error"],
			"Authorization header missing or invalid"
		);
	}

	#[tokio::test]
	async fn test_list_rejects_non_admin_tokens() {
		let app = app(memory());
		let (name, value) = bearer(&token(None));

		let response = app.get("/api/admin/blogs").add_header(name, value).await;

		assert_eq!(response.status_code(), 401);
	}

	#[tokio::test]
	async fn test_published_create_mirrors_to_public() {
		let app = app(memory());
		let (name, value) = bearer(&token(Some("admin")));

		let response = app
			.post("/api/admin/blogs")
			.add_header(name, value)
			.json(&admin_body("Intro to Robotics", "published"))
			.await;

		assert_eq!(response.status_code(), 201);
		assert_eq!(
			response.json::<serde_json::Value>()["data"]["slug"],
			"intro-to-robotics"
		);

		// the mirror ran before the response resolved
		let response = app.get("/api/blogs?search=robotics").await;
		let body = response.json::<serde_json::Value>();

		assert_eq!(body["data"].as_array().unwrap().len(), 1);
		assert_eq!(body["data"][0]["slug"], "intro-to-robotics");
		assert_eq!(body["data"][0]["published"], true);
	}

	#[tokio::test]
	async fn test_duplicate_title_conflicts() {
		let app = app(memory());

		let (name, value) = bearer(&token(Some("admin")));
		app.post("/api/admin/blogs")
			.add_header(name, value)
			.json(&admin_body("Intro to Robotics", "draft"))
			.await;

		let (name, value) = bearer(&token(Some("admin")));
		let response = app
			.post("/api/admin/blogs")
			.add_header(name, value)
			.json(&admin_body("Intro to Robotics", "draft"))
			.await;

		assert_eq!(response.status_code(), 409);

		// no second record was created
		let (name, value) = bearer(&token(Some("admin")));
		let response = app.get("/api/admin/blogs").add_header(name, value).await;

		assert_eq!(
			response.json::<serde_json::Value>()["pagination"]["totalItems"],
			1
		);
	}

	#[tokio::test]
	async fn test_list_sends_no_cache_headers() {
		let app = app(memory());
		let (name, value) = bearer(&token(Some("admin")));

		let response = app.get("/api/admin/blogs").add_header(name, value).await;

		assert_eq!(response.status_code(), 200);
		assert_eq!(
			response.header("cache-control"),
			"no-store, no-cache, must-revalidate"
		);
	}

	#[tokio::test]
	async fn test_update_stamps_published_date_once() {
		let app = app(memory());

		let (name, value) = bearer(&token(Some("admin")));
		let response = app
			.post("/api/admin/blogs")
			.add_header(name, value)
			.json(&admin_body("Intro to Robotics", "draft"))
			.await;
		let body = response.json::<serde_json::Value>();
		let id = body["data"]["id"].as_str().unwrap().to_owned();

		assert!(body["data"]["published_date"].is_null());

		let (name, value) = bearer(&token(Some("admin")));
		let response = app
			.put(&format!("/api/admin/blogs/{id}"))
			.add_header(name, value)
			.json(&admin_body("Intro to Robotics", "published"))
			.await;
		let stamped = response.json::<serde_json::Value>()["data"]["published_date"].clone();

		assert!(!stamped.is_null());

		let (name, value) = bearer(&token(Some("admin")));
		let response = app
			.put(&format!("/api/admin/blogs/{id}"))
			.add_header(name, value)
			.json(&admin_body("Intro to Robotics", "published"))
			.await;

		assert_eq!(
			response.json::<serde_json::Value>()["data"]["published_date"],
			stamped
		);
	}

	#[tokio::test]
	async fn test_update_regenerates_slug_and_resyncs() {
		let app = app(memory());

		let (name, value) = bearer(&token(Some("admin")));
		let response = app
			.post("/api/admin/blogs")
			.add_header(name, value)
			.json(&admin_body("Intro to Robotics", "published"))
			.await;
		let id = response.json::<serde_json::Value>()["data"]["id"]
			.as_str()
			.unwrap()
			.to_owned();

		let (name, value) = bearer(&token(Some("admin")));
		let response = app
			.put(&format!("/api/admin/blogs/{id}"))
			.add_header(name, value)
			.json(&admin_body("Advanced Robotics Programming", "published"))
			.await;

		assert_eq!(response.status_code(), 200);
		assert_eq!(
			response.json::<serde_json::Value>()["data"]["slug"],
			"advanced-robotics-programming"
		);

		// the public counterpart follows the rename
		let response = app.get("/api/blogs?search=advanced").await;

		assert_eq!(
			response.json::<serde_json::Value>()["data"][0]["slug"],
			"advanced-robotics-programming"
		);
	}

	#[tokio::test]
	async fn test_delete_cascades_to_public() {
		let app = app(memory());

		let (name, value) = bearer(&token(Some("admin")));
		let response = app
			.post("/api/admin/blogs")
			.add_header(name, value)
			.json(&admin_body("Intro to Robotics", "published"))
			.await;
		let id = response.json::<serde_json::Value>()["data"]["id"]
			.as_str()
			.unwrap()
			.to_owned();

		let (name, value) = bearer(&token(Some("admin")));
		let response = app
			.delete(&format!("/api/admin/blogs/{id}"))
			.add_header(name, value)
			.await;

		assert_eq!(response.status_code(), 200);

		let response = app.get("/api/blogs?search=robotics").await;

		assert_eq!(
			response.json::<serde_json::Value>()["data"].as_array().unwrap().len(),
			0
		);
	}

	#[tokio::test]
	async fn test_delete_unknown_id_is_404() {
		let app = app(memory());
		let (name, value) = bearer(&token(Some("admin")));

		let response = app
			.delete(&format!("/api/admin/blogs/{}", uuid::Uuid::new_v4()))
			.add_header(name, value)
			.await;

		assert_eq!(response.status_code(), 404);
	}
}
