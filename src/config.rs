use std::env;

/// Process configuration, read once at startup.
///
/// `jwt_secret` is allowed to be absent so the service can still serve
/// public reads; authenticated routes then fail with an explicit
/// configuration error instead of a silent bypass.
#[derive(Debug)]
pub struct Config {
	pub database_url: String,
	pub jwt_secret: Option<String>,
	pub port: u16,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("{0} must be set")]
	MissingVar(&'static str),
	#[error("{0} must be a number")]
	InvalidPort(&'static str),
}

impl Config {
	pub fn from_env() -> Result<Self, ConfigError> {
		let database_url =
			env::var("DATABASE_URL").map_err(|_| ConfigError::MissingVar("DATABASE_URL"))?;

		let jwt_secret = env::var("JWT_SECRET").ok().filter(|s| !s.is_empty());

		if jwt_secret.is_none() {
			tracing::warn!("JWT_SECRET is not set; authenticated routes will fail");
		}

		let port = match env::var("PORT") {
			Ok(port) => port.parse().map_err(|_| ConfigError::InvalidPort("PORT"))?,
			Err(_) => 3000,
		};

		Ok(Self {
			database_url,
			jwt_secret,
			port,
		})
	}
}
