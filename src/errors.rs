use crate::types::ApiError;
use rocket::http::Status;
use rocket::request::Request;
use rocket::response::{self, status, Responder};
use rocket::serde::json::Json;
use thiserror::Error;

/// Request-scoped failures, each mapped to an HTTP status plus a JSON
/// error body. Nothing here is fatal to the listener.
#[derive(Debug, Error)]
pub enum HookError {
    /// Required fields absent (or unparseable JSON) in the event payload.
    #[error("invalid hook payload: {0}")]
    MalformedPayload(String),

    /// The request body could not be read.
    #[error("failed to read request body: {0}")]
    Body(String),

    /// No registry entry matches the normalized repository key.
    #[error("repository {0} is not configured")]
    UnknownRepository(String),

    /// The entry requires a signature but the header was absent.
    #[error("missing signature header")]
    MissingSignature,

    /// The provided signature did not match the computed one.
    #[error("signature mismatch")]
    SignatureMismatch,

    /// The registry file could not be read or parsed.
    #[error("failed to load repository registry: {0}")]
    Registry(String),
}

impl HookError {
    pub fn status(&self) -> Status {
        match self {
            HookError::MalformedPayload(_) | HookError::Body(_) => Status::BadRequest,
            HookError::UnknownRepository(_) => Status::NotFound,
            HookError::MissingSignature | HookError::SignatureMismatch => Status::Forbidden,
            HookError::Registry(_) => Status::InternalServerError,
        }
    }
}

impl<'r> Responder<'r, 'static> for HookError {
    fn respond_to(self, request: &'r Request<'_>) -> response::Result<'static> {
        let body = Json(ApiError {
            error: self.to_string(),
        });
        status::Custom(self.status(), body).respond_to(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_match_taxonomy() {
        assert_eq!(
            HookError::MalformedPayload("x".into()).status(),
            Status::BadRequest
        );
        assert_eq!(
            HookError::UnknownRepository("o/r".into()).status(),
            Status::NotFound
        );
        assert_eq!(HookError::MissingSignature.status(), Status::Forbidden);
        assert_eq!(HookError::SignatureMismatch.status(), Status::Forbidden);
        assert_eq!(
            HookError::Registry("io".into()).status(),
            Status::InternalServerError
        );
    }
}
