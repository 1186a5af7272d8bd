//! Endpoint configuration resolved once at startup.

/// Base URL used when no override is provided.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Where the dashboard fetches its data from.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
	/// Backend base URL, without a trailing slash.
	pub base_url: String,
}

impl Config {
	/// Resolve the configuration for this build. A WASM bundle has no process
	/// environment at runtime, so the `DEEP_LYNX_URL` override is read at
	/// compile time.
	pub fn from_env() -> Self {
		Self::with_base_url(option_env!("DEEP_LYNX_URL").unwrap_or(DEFAULT_BASE_URL))
	}

	/// Build a configuration for an explicit base URL.
	pub fn with_base_url(base_url: &str) -> Self {
		Self {
			base_url: base_url.trim_end_matches('/').to_string(),
		}
	}
}

impl Default for Config {
	fn default() -> Self {
		Self::with_base_url(DEFAULT_BASE_URL)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn default_points_at_local_backend() {
		assert_eq!(Config::default().base_url, "http://localhost:5000");
	}

	#[test]
	fn trailing_slashes_are_trimmed() {
		let config = Config::with_base_url("http://deep-lynx.example:5000///");
		assert_eq!(config.base_url, "http://deep-lynx.example:5000");
	}
}
