//! Error taxonomy shared by both gateways and the naming pass.
//!
//! Every variant is terminal for the current run: nothing retries, and no
//! partial manifest is produced once one of these is raised.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The remote service rejected the request (4xx)
    #[error("Client error {0}")]
    Client(u16),
    /// The remote service failed (5xx)
    #[error("Server error {0}")]
    Server(u16),
    /// A successful HTTP status carrying an application-level error object
    #[error("API error: {0}")]
    Api(String),
    /// A creation timestamp that does not map to a calendar date
    #[error("Malformed timestamp {0}")]
    Format(i64),
    #[error("Request failed")]
    Transport(#[from] reqwest::Error),
    #[error("Unexpected response body: {0}")]
    Decode(String),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_kind() {
        assert_eq!(Error::Client(404).to_string(), "Client error 404");
        assert_eq!(Error::Server(502).to_string(), "Server error 502");
        assert_eq!(
            Error::Api("Access denied".to_string()).to_string(),
            "API error: Access denied"
        );
        assert_eq!(
            Error::Format(i64::MAX).to_string(),
            format!("Malformed timestamp {}", i64::MAX)
        );
    }
}
