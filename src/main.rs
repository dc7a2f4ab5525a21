#![warn(clippy::pedantic)]

mod config;
mod error;
mod extract;
mod model;
mod openapi;
mod ratelimit;
mod route;
mod slug;
mod store;
mod sync;
#[cfg(test)]
mod test;

use std::net::SocketAddr;
use std::sync::Arc;

use aide::openapi::OpenApi;
use axum::{Extension, Router};
use tower::ServiceBuilder;
use tower_governor::GovernorLayer;
use tower_http::{
	compression::CompressionLayer,
	cors::CorsLayer,
	request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
	trace::TraceLayer,
};
use tracing_subscriber::EnvFilter;

use extract::AuthKeys;
use store::{postgres::PgStore, Store};

pub type AppState = State;

/// The shared application state.
///
/// This should contain all shared dependencies that handlers need to access:
/// the content store, the token verification keys and the sync handle. It is
/// constructed once at startup and injected everywhere, so tests can swap in
/// an in-memory store.
#[derive(Clone, axum::extract::FromRef)]
pub struct State {
	pub store: Store,
	pub auth: AuthKeys,
	pub sync: sync::Handle,
}

/// Builds the application router; shared by `main` and the test harness.
fn app(state: State) -> Router {
	let mut api = OpenApi::default();

	aide::axum::ApiRouter::new()
		.nest("/api/blogs", route::blog::routes())
		.nest("/api/admin/blogs", route::admin::routes())
		.nest("/docs", route::docs::routes())
		.finish_api_with(&mut api, openapi::docs)
		.layer(Extension(Arc::new(api)))
		.layer(
			ServiceBuilder::new()
				.layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
				.layer(TraceLayer::new_for_http())
				.layer(PropagateRequestIdLayer::x_request_id())
				.layer(CorsLayer::permissive())
				.layer(CompressionLayer::new()),
		)
		.with_state(state)
}

#[tokio::main]
async fn main() {
	dotenvy::dotenv().ok();

	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
		.init();

	let config = config::Config::from_env().expect("invalid configuration");

	let store = PgStore::connect(&config.database_url)
		.await
		.expect("failed to connect to database");

	store.migrate().await.expect("failed to run migrations");

	let store: Store = Arc::new(store);
	let (sync, jobs) = sync::Handle::new(store.clone());

	sync::reconciler::spawn(sync.engine().clone(), jobs);

	let state = State {
		store,
		auth: AuthKeys::new(config.jwt_secret.as_deref()),
		sync,
	};

	let governor = ratelimit::default();
	ratelimit::cleanup_old_limits(&[&governor]);

	let app = app(state).layer(GovernorLayer { config: governor });

	let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port))
		.await
		.expect("failed to bind to port");

	tracing::info!("listening on port {}", config.port);

	axum::serve(
		listener,
		app.into_make_service_with_connect_info::<SocketAddr>(),
	)
	.await
	.unwrap();
}
