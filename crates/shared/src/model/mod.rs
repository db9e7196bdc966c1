mod user;
pub use user::*;

mod exercise;
pub use exercise::*;

mod filter;
pub use filter::*;

use crate::api::error::ServerError;

/// Checks a request payload, turning it into the type the handlers work with
pub trait ValidateModel {
    type Valid;

    fn validate(self) -> Result<Self::Valid, ServerError>;
}
