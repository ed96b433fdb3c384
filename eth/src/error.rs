use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum RPCError {
    #[error("Invalid RPC endpoint {0}: {1}")]
    InvalidEndpoint(String, String),
    #[error("Resource not found on request: {0}")]
    NotFoundError(String),
    #[error("Error sending request: {0}")]
    RequestError(String),
    #[error("UnknownError for request: {0}")]
    UnknownError(String),
}
