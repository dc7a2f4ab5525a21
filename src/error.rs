use axum::{
	body::Body,
	extract::rejection::{JsonRejection, PathRejection, QueryRejection},
	http::{Response, StatusCode},
	response::IntoResponse,
	Json,
};
use schemars::JsonSchema;
use serde::Serialize;
use serde_json::{json, Value};

use crate::extract::AuthError;
use crate::store::StoreError;

/// The uniform wire shape of every error response.
#[derive(Debug, Serialize, JsonSchema)]
pub struct ErrorBody {
	pub error: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub details: Option<Value>,
}

/// Implemented by per-route error enums so [`RouteError`] can render them.
///
/// Messages and details are presented to the client, so they must not
/// contain sensitive information.
pub trait ErrorShape {
	fn status(&self) -> StatusCode;
	fn message(&self) -> String;

	fn details(&self) -> Option<Value> {
		None
	}

	fn body(&self) -> ErrorBody {
		ErrorBody {
			error: self.message(),
			details: self.details(),
		}
	}
}

/// Cross-cutting failures shared by every route: extraction, validation,
/// authentication and storage.
///
/// The Display output can contain internals; it is logged, never sent to
/// the client.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
	#[error("validation error: {0}")]
	Validation(#[from] validator::ValidationErrors),
	#[error("json error: {0}")]
	Json(#[from] JsonRejection),
	#[error("query error: {0}")]
	Query(#[from] QueryRejection),
	#[error("path error: {0}")]
	Path(#[from] PathRejection),
	#[error("auth error: {0}")]
	Auth(#[from] AuthError),
	#[error("store error: {0}")]
	Store(#[from] StoreError),
}

/// Flattens validator output into a `{field: [messages]}` object.
fn validation_details(errors: &validator::ValidationErrors) -> Value {
	let fields = errors
		.field_errors()
		.into_iter()
		.map(|(field, errors)| {
			let messages = errors
				.iter()
				.map(|error| {
					error
						.message
						.as_ref()
						.map_or_else(|| error.code.to_string(), ToString::to_string)
				})
				.collect::<Vec<_>>();

			(field.to_string(), json!(messages))
		})
		.collect::<serde_json::Map<_, _>>();

	Value::Object(fields)
}

impl AppError {
	pub fn status(&self) -> StatusCode {
		match self {
			Self::Validation(..) | Self::Json(..) | Self::Query(..) | Self::Path(..) => {
				StatusCode::BAD_REQUEST
			}
			Self::Auth(error) => error.status(),
			Self::Store(..) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}

	pub fn body(&self) -> ErrorBody {
		let (error, details) = match self {
			Self::Validation(errors) => (
				"Validation failed".to_string(),
				Some(validation_details(errors)),
			),
			Self::Json(..) => ("Invalid JSON payload".to_string(), None),
			Self::Query(..) => ("Invalid query parameters".to_string(), None),
			Self::Path(..) => ("Invalid path parameters".to_string(), None),
			Self::Auth(error) => (error.to_string(), None),
			Self::Store(..) => ("Internal server error".to_string(), None),
		};

		ErrorBody { error, details }
	}
}

impl IntoResponse for AppError {
	fn into_response(self) -> Response<Body> {
		let status = self.status();

		if status.is_server_error() {
			tracing::error!(error = %self, "request failed");
		}

		(status, Json(self.body())).into_response()
	}
}

impl aide::OperationOutput for AppError {
	type Inner = ErrorBody;
}

/// Error type for route handlers: either a route-specific error or one of
/// the cross-cutting [`AppError`] cases. Converts from [`StoreError`] so
/// handlers can use `?` on store calls directly.
#[derive(Debug)]
pub enum RouteError<E> {
	App(AppError),
	Route(E),
}

impl<E: ErrorShape> From<E> for RouteError<E> {
	fn from(error: E) -> Self {
		Self::Route(error)
	}
}

impl<E> From<AppError> for RouteError<E> {
	fn from(error: AppError) -> Self {
		Self::App(error)
	}
}

impl<E> From<StoreError> for RouteError<E> {
	fn from(error: StoreError) -> Self {
		Self::App(AppError::Store(error))
	}
}

impl<E> From<AuthError> for RouteError<E> {
	fn from(error: AuthError) -> Self {
		Self::App(AppError::Auth(error))
	}
}

impl<E: ErrorShape> IntoResponse for RouteError<E> {
	fn into_response(self) -> Response<Body> {
		match self {
			Self::App(error) => error.into_response(),
			Self::Route(error) => (error.status(), Json(error.body())).into_response(),
		}
	}
}

impl<E: ErrorShape> aide::OperationOutput for RouteError<E> {
	type Inner = ErrorBody;
}

#[cfg(test)]
mod test {
	use super::*;
	use validator::Validate;

	#[derive(Validate)]
	struct Form {
		#[validate(length(min = 5, message = "too short"))]
		title: String,
	}

	#[test]
	fn test_validation_details_per_field() {
		let errors = Form {
			title: "hi".into(),
		}
		.validate()
		.unwrap_err();

		let error = AppError::Validation(errors);
		let body = error.body();

		assert_eq!(error.status(), StatusCode::BAD_REQUEST);
		assert_eq!(body.error, "Validation failed");
		assert_eq!(body.details.unwrap()["title"], json!(["too short"]));
	}
}
