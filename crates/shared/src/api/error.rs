use std::fmt;

use http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

#[cfg(feature = "backend")]
mod backend {
    use axum::{
        extract::rejection::{FormRejection, JsonRejection, PathRejection, QueryRejection},
        response::{IntoResponse, Response},
        Json,
    };

    use super::ServerError;

    // Render ServerError into a `{"error": ...}` response
    impl IntoResponse for ServerError {
        fn into_response(self) -> Response {
            (self.code(), Json(self.body())).into_response()
        }
    }

    macro_rules! rejection_into_validation {
        ($($rejection:ty),* $(,)?) => {
            $(
                impl From<$rejection> for ServerError {
                    fn from(rejection: $rejection) -> Self {
                        ServerError::validation(rejection.body_text())
                    }
                }
            )*
        };
    }

    rejection_into_validation!(FormRejection, JsonRejection, QueryRejection, PathRejection);
}

/// Body of every error response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServerError {
    /// A required field is missing or the request couldn't be decoded
    #[error("{message}")]
    Validation { message: String },
    /// The referenced record doesn't exist
    #[error("{message}")]
    NotFound { message: String },
    /// Anything that went wrong while talking to the store or parsing stored
    /// values. The underlying cause is logged, never returned
    #[error("{message}")]
    Persistence { message: String },
}

impl ServerError {
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation { message: message.into() }
    }

    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound { message: message.into() }
    }

    pub fn persistence<S: Into<String>>(message: S) -> Self {
        Self::Persistence { message: message.into() }
    }

    pub fn code(&self) -> StatusCode {
        match self {
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Persistence { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Validation { message }
            | Self::NotFound { message }
            | Self::Persistence { message } => message,
        }
    }

    pub fn body(&self) -> ErrorBody {
        ErrorBody { error: self.message().to_owned() }
    }
}

pub trait ServerErrorContext<T> {
    /// Logs the error and swaps it for a [`ServerError::Persistence`] carrying
    /// `message`
    fn or_persistence(self, message: &str) -> Result<T, ServerError>;
}

impl<T, E: fmt::Debug> ServerErrorContext<T> for Result<T, E> {
    #[track_caller]
    fn or_persistence(self, message: &str) -> Result<T, ServerError> {
        self.map_err(|err| {
            error!(?err, "{message}");
            ServerError::persistence(message)
        })
    }
}
