use std::sync::Arc;

use aide::OperationInput;
use axum::{
	extract::{FromRef, FromRequestParts},
	http::{header, request, StatusCode},
};
use jsonwebtoken::{DecodingKey, Validation};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppError;

pub const AUTHORIZATION_PREFIX: &str = "Bearer ";

/// An error that can occur while authenticating a request.
///
/// Note that the messages are presented to the client, so they must not
/// contain sensitive information or token contents.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
	#[error("Authorization header missing or invalid")]
	MissingHeader,
	#[error("Invalid or expired token")]
	InvalidToken,
	#[error("Admin access required")]
	NotAdmin,
	#[error("Server configuration error")]
	MissingSecret,
}

impl AuthError {
	pub fn status(&self) -> StatusCode {
		match self {
			Self::MissingHeader | Self::InvalidToken | Self::NotAdmin => {
				StatusCode::UNAUTHORIZED
			}
			Self::MissingSecret => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}
}

/// Verification key material for bearer tokens, shared through application
/// state.
///
/// The secret is optional so a misconfigured deployment fails each
/// authenticated request with an explicit configuration error instead of
/// silently bypassing auth.
#[derive(Clone)]
pub struct AuthKeys {
	decoding: Option<Arc<DecodingKey>>,
}

impl AuthKeys {
	pub fn new(secret: Option<&str>) -> Self {
		Self {
			decoding: secret.map(|secret| Arc::new(DecodingKey::from_secret(secret.as_bytes()))),
		}
	}
}

#[derive(Debug, Deserialize)]
struct Claims {
	sub: String,
	#[serde(default)]
	role: Option<String>,
	#[allow(dead_code)]
	exp: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
	User,
	Admin,
}

/// The authenticated caller, extracted from the `Authorization: Bearer`
/// header.
///
/// ```rust
/// async fn route(identity: Identity) {
///   println!("{:?}", identity.user_id);
/// }
/// ```
#[derive(Debug)]
pub struct Identity {
	pub user_id: Uuid,
	pub role: Role,
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for Identity
where
	AuthKeys: FromRef<S>,
	S: Sync + Send,
{
	type Rejection = AppError;

	async fn from_request_parts(
		parts: &mut request::Parts,
		state: &S,
	) -> Result<Self, Self::Rejection> {
		let header = parts
			.headers
			.get(header::AUTHORIZATION)
			.ok_or(AuthError::MissingHeader)?;

		let header = header.to_str().map_err(|_| AuthError::MissingHeader)?;

		let token = header
			.strip_prefix(AUTHORIZATION_PREFIX)
			.ok_or(AuthError::MissingHeader)?;

		let keys = AuthKeys::from_ref(state);
		let decoding = keys.decoding.ok_or(AuthError::MissingSecret)?;

		let claims =
			jsonwebtoken::decode::<Claims>(token, &decoding, &Validation::default())
				.map_err(|_| AuthError::InvalidToken)?
				.claims;

		let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidToken)?;
		let role = match claims.role.as_deref() {
			Some("admin") => Role::Admin,
			_ => Role::User,
		};

		Ok(Self { user_id, role })
	}
}

impl OperationInput for Identity {
	/// Adds the bearer token requirement to the `OpenAPI` operation.
	fn operation_input(_ctx: &mut aide::gen::GenContext, operation: &mut aide::openapi::Operation) {
		operation.security.extend([[(
			crate::openapi::SECURITY_SCHEME_BEARER.to_string(),
			Vec::new(),
		)]
		.into_iter()
		.collect()]);
	}
}

/// An [`Identity`] that has the admin role; everything else is rejected.
#[derive(Debug)]
pub struct Admin(pub Identity);

#[axum::async_trait]
impl<S> FromRequestParts<S> for Admin
where
	AuthKeys: FromRef<S>,
	S: Sync + Send,
{
	type Rejection = AppError;

	async fn from_request_parts(
		parts: &mut request::Parts,
		state: &S,
	) -> Result<Self, Self::Rejection> {
		let identity = Identity::from_request_parts(parts, state).await?;

		if identity.role != Role::Admin {
			return Err(AuthError::NotAdmin.into());
		}

		Ok(Self(identity))
	}
}

impl OperationInput for Admin {
	fn operation_input(ctx: &mut aide::gen::GenContext, operation: &mut aide::openapi::Operation) {
		Identity::operation_input(ctx, operation);
	}
}

#[cfg(test)]
mod test {
	use crate::extract::AuthKeys;
	use crate::test::*;

	#[tokio::test]
	async fn test_missing_secret_is_a_configuration_error() {
		let app = app_with_keys(memory(), AuthKeys::new(None));
		let (name, value) = bearer(&token(Some("admin")));

		let response = app.get("/api/admin/blogs").add_header(name, value).await;

		assert_eq!(response.status_code(), 500);
		assert_eq!(
			response.json::<serde_json::Value>()["error"],
			"Server configuration error"
		);
	}

	#[tokio::test]
	async fn test_expired_token_is_rejected() {
		let app = app(memory());
		let expired = chrono::Utc::now().timestamp() - 3600;
		let (name, value) = bearer(&token_with_exp(Some("admin"), expired));

		let response = app.get("/api/admin/blogs").add_header(name, value).await;

		assert_eq!(response.status_code(), 401);
		assert_eq!(
			response.json::<serde_json::Value>()["error"],
			"Invalid or expired token"
		);
	}

	#[tokio::test]
	async fn test_garbage_token_is_rejected() {
		let app = app(memory());
		let (name, value) = bearer("not-a-token");

		let response = app.get("/api/admin/blogs").add_header(name, value).await;

		assert_eq!(response.status_code(), 401);
		assert_eq!(
			response.json::<serde_json::Value>()["error"],
			"Invalid or expired token"
		);
	}

	#[tokio::test]
	async fn test_non_bearer_scheme_is_rejected() {
		let app = app(memory());

		let response = app
			.get("/api/admin/blogs")
			.add_header(
				axum::http::header::AUTHORIZATION,
				axum::http::HeaderValue::from_static("Basic dXNlcjpwYXNz"),
			)
			.await;

		assert_eq!(response.status_code(), 401);
		assert_eq!(
			response.json::<serde_json::Value>()["error"],
			"Authorization header missing or invalid"
		);
	}
}
