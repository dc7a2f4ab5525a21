pub use axum_test::TestServer;
pub use serde_json::json;

use std::sync::Arc;

use axum::http::{header, HeaderName, HeaderValue};
use chrono::Utc;
use jsonwebtoken::{EncodingKey, Header};
use serde::Serialize;
use uuid::Uuid;

use crate::extract::AuthKeys;
use crate::store::{memory::MemoryStore, Store};
use crate::sync;

pub const SECRET: &str = "engivora-test-secret";

pub fn memory() -> Store {
	Arc::new(MemoryStore::default())
}

/// Spins up the full router over the given store, with the reconciler
/// running and a known signing secret.
pub fn app(store: Store) -> TestServer {
	app_with_keys(store, AuthKeys::new(Some(SECRET)))
}

pub fn app_with_keys(store: Store, auth: AuthKeys) -> TestServer {
	let (sync, jobs) = sync::Handle::new(store.clone());

	sync::reconciler::spawn(sync.engine().clone(), jobs);

	TestServer::new(crate::app(crate::State { store, auth, sync })).unwrap()
}

#[derive(Serialize)]
struct Claims {
	sub: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	role: Option<&'static str>,
	exp: i64,
}

/// Mints a bearer token signed with [`SECRET`]; pass `Some("admin")` for the
/// admin role.
pub fn token(role: Option<&'static str>) -> String {
	token_with_exp(role, (Utc::now() + chrono::Duration::hours(1)).timestamp())
}

pub fn token_with_exp(role: Option<&'static str>, exp: i64) -> String {
	let claims = Claims {
		sub: Uuid::new_v4().to_string(),
		role,
		exp,
	};

	jsonwebtoken::encode(
		&Header::default(),
		&claims,
		&EncodingKey::from_secret(SECRET.as_bytes()),
	)
	.unwrap()
}

pub fn bearer(token: &str) -> (HeaderName, HeaderValue) {
	(
		header::AUTHORIZATION,
		HeaderValue::try_from(format!("Bearer {token}")).unwrap(),
	)
}
