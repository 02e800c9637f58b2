use actix_web::http::header::ContentType;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

use rollcall_core::{StoreError, ValidationError};

/// Every way a request can fail once it reached a handler.
///
/// Responses are plain text. Store failures keep their detail out of the body;
/// the handler logs it instead.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("missing access token")]
    MissingToken,

    #[error("invalid access token")]
    InvalidToken,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("internal server error")]
    Store(#[from] StoreError),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingToken => StatusCode::UNAUTHORIZED,
            ApiError::InvalidToken => StatusCode::FORBIDDEN,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .content_type(ContentType::plaintext())
            .body(self.to_string())
    }
}
