use aide::axum::{routing::get_with, ApiRouter};
use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use crate::{error, AppState};

pub mod model;
pub mod route;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Blog post not found")]
	UnknownBlog(Uuid),
}

pub type RouteError = error::RouteError<Error>;

pub fn routes() -> ApiRouter<AppState> {
	use route::*;

	ApiRouter::new()
		.api_route(
			"/",
			get_with(list_blogs, list_blogs_docs)
				.post_with(create_blog, create_blog_docs)
				.put_with(update_blog, update_blog_docs)
				.delete_with(delete_blog, delete_blog_docs),
		)
		.api_route("/:id", get_with(get_blog, get_blog_docs))
}

impl error::ErrorShape for Error {
	fn status(&self) -> StatusCode {
		match self {
			Self::UnknownBlog(..) => StatusCode::NOT_FOUND,
		}
	}

	fn message(&self) -> String {
		self.to_string()
	}

	fn details(&self) -> Option<serde_json::Value> {
		match self {
			Self::UnknownBlog(id) => Some(json!({ "id": id })),
		}
	}
}

#[cfg(test)]
mod test {
	use crate::test::*;

	fn blog_body(title: &str) -> serde_json::Value {
		json!({
			"title": title,
			"summary": "How the robotics club got started and what we build.",
			"content": "We started the robotics club with three members and a single soldering iron, and grew from there into a full workshop.",
			"category": "technology",
			"tags": ["robotics", "club"],
		})
	}

	#[tokio::test]
	async fn test_create_requires_auth() {
		let app = app(memory());

		let response = app.post("/api/blogs").json(&blog_body("Intro to Robotics")).await;

		assert_eq!(response.status_code(), 401);
		assert_eq!(
			response.json::<serde_json::Value>()["error"],
			"Authorization header missing or invalid"
		);
	}

	#[tokio::test]
	async fn test_create_and_search() {
		let app = app(memory());
		let (name, value) = bearer(&token(None));

		let response = app
			.post("/api/blogs")
			.add_header(name, value)
			.json(&blog_body("Intro to Robotics"))
			.await;

		assert_eq!(response.status_code(), 201);

		let body = response.json::<serde_json::Value>();

		assert_eq!(body["data"]["slug"], "intro-to-robotics");
		assert_eq!(body["data"]["views"], 0);

		let response = app.get("/api/blogs?search=robotics").await;
		let body = response.json::<serde_json::Value>();

		assert_eq!(response.status_code(), 200);
		assert_eq!(body["data"].as_array().unwrap().len(), 1);
		assert_eq!(body["pagination"]["totalItems"], 1);
	}

	#[tokio::test]
	async fn test_duplicate_titles_get_suffixed_slugs() {
		let app = app(memory());

		for expected in ["intro-to-robotics", "intro-to-robotics-1"] {
			let (name, value) = bearer(&token(None));
			let response = app
				.post("/api/blogs")
				.add_header(name, value)
				.json(&blog_body("Intro to Robotics"))
				.await;

			assert_eq!(response.status_code(), 201);
			assert_eq!(response.json::<serde_json::Value>()["data"]["slug"], expected);
		}
	}

	#[tokio::test]
	async fn test_validation_failure_lists_fields() {
		let app = app(memory());
		let (name, value) = bearer(&token(None));

		let response = app
			.post("/api/blogs")
			.add_header(name, value)
			.json(&json!({
				"title": "hi",
				"summary": "short",
				"content": "too short",
				"category": "technology",
			}))
			.await;

		assert_eq!(response.status_code(), 400);

		let body = response.json::<serde_json::Value>();

		assert_eq!(body["error"], "Validation failed");
		assert!(body["details"]["title"].is_array());
	}

	#[tokio::test]
	async fn test_get_by_id_counts_views() {
		let app = app(memory());
		let (name, value) = bearer(&token(None));

		let response = app
			.post("/api/blogs")
			.add_header(name, value)
			.json(&blog_body("Counting Views Today"))
			.await;
		let id = response.json::<serde_json::Value>()["data"]["id"]
			.as_str()
			.unwrap()
			.to_owned();

		app.get(&format!("/api/blogs/{id}")).await;
		let response = app.get(&format!("/api/blogs/{id}")).await;

		assert_eq!(response.status_code(), 200);
		assert_eq!(response.json::<serde_json::Value>()["data"]["views"], 2);
	}

	#[tokio::test]
	async fn test_update_regenerates_slug() {
		let app = app(memory());
		let (name, value) = bearer(&token(None));

		let response = app
			.post("/api/blogs")
			.add_header(name, value)
			.json(&blog_body("Intro to Robotics"))
			.await;
		let id = response.json::<serde_json::Value>()["data"]["id"]
			.as_str()
			.unwrap()
			.to_owned();

		let mut body = blog_body("Advanced Robotics Instead");
		body["id"] = json!(id);

		let (name, value) = bearer(&token(None));
		let response = app.put("/api/blogs").add_header(name, value).json(&body).await;

		assert_eq!(response.status_code(), 200);
		assert_eq!(
			response.json::<serde_json::Value>()["data"]["slug"],
			"advanced-robotics-instead"
		);
	}

	#[tokio::test]
	async fn test_delete_then_404() {
		let app = app(memory());
		let (name, value) = bearer(&token(None));

		let response = app
			.post("/api/blogs")
			.add_header(name, value)
			.json(&blog_body("A Short Lived Post"))
			.await;
		let id = response.json::<serde_json::Value>()["data"]["id"]
			.as_str()
			.unwrap()
			.to_owned();

		let (name, value) = bearer(&token(None));
		let response = app
			.delete(&format!("/api/blogs?id={id}"))
			.add_header(name, value)
			.await;

		assert_eq!(response.status_code(), 200);

		let response = app.get(&format!("/api/blogs/{id}")).await;

		assert_eq!(response.status_code(), 404);
		assert_eq!(response.json::<serde_json::Value>()["error"], "Blog post not found");
	}

	#[tokio::test]
	async fn test_pagination_envelope() {
		let app = app(memory());

		for i in 0..25 {
			let (name, value) = bearer(&token(None));
			app.post("/api/blogs")
				.add_header(name, value)
				.json(&blog_body(&format!("Generated Post Number {i}")))
				.await;
		}

		let response = app.get("/api/blogs?page=2&limit=10").await;
		let body = response.json::<serde_json::Value>();

		assert_eq!(body["data"].as_array().unwrap().len(), 10);
		assert_eq!(body["pagination"]["totalPages"], 3);
		assert_eq!(body["pagination"]["hasNext"], true);
		assert_eq!(body["pagination"]["hasPrev"], true);
	}
}
