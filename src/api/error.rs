//! Fetch error taxonomy.

use thiserror::Error;

/// A failed request to the backend. The display string is what the error
/// banner shows, so `Status` renders only the server-provided detail.
#[derive(Debug, Error)]
pub enum FetchError {
	/// The request never produced a response.
	#[error("{0}")]
	Transport(String),

	/// The backend answered with a non-2xx status.
	#[error("{detail}")]
	Status {
		/// HTTP status code.
		status: u16,
		/// Server `detail` field when present, else the status reason.
		detail: String,
	},

	/// The response body could not be interpreted.
	#[error("malformed response: {0}")]
	Decode(String),
}

impl From<reqwest::Error> for FetchError {
	fn from(err: reqwest::Error) -> Self {
		if err.is_decode() {
			FetchError::Decode(err.to_string())
		} else {
			FetchError::Transport(err.to_string())
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn status_errors_display_only_the_detail() {
		let err = FetchError::Status {
			status: 500,
			detail: "db down".into(),
		};
		assert_eq!(err.to_string(), "db down");
	}

	#[test]
	fn decode_errors_are_labelled() {
		assert_eq!(
			FetchError::Decode("bad json".into()).to_string(),
			"malformed response: bad json"
		);
	}
}
