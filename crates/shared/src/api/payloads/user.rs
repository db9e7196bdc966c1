use serde::{Deserialize, Serialize};

use crate::{
    api::error::ServerError,
    model::{NewUser, ValidateModel},
};

pub const USERNAME_REQUIRED: &str = "Username is required";

/// Body of `POST /api/users`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewUserPayload {
    #[serde(default)]
    pub username: Option<String>,
}

impl NewUserPayload {
    pub fn new<T: Into<String>>(username: T) -> Self {
        Self { username: Some(username.into()) }
    }
}

impl ValidateModel for NewUserPayload {
    type Valid = NewUser;

    fn validate(self) -> Result<NewUser, ServerError> {
        match self.username {
            Some(username) if !username.is_empty() => Ok(NewUser::new(username)),
            _ => Err(ServerError::validation(USERNAME_REQUIRED)),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_missing_or_empty_username() {
        let expected = Err(ServerError::validation(USERNAME_REQUIRED));
        assert_eq!(NewUserPayload::default().validate(), expected);
        assert_eq!(NewUserPayload::new("").validate(), expected);
    }

    #[test]
    fn test_username_is_kept_verbatim() {
        let new_user = NewUserPayload::new(" fcc_test ").validate().unwrap();
        assert_eq!(new_user.username, " fcc_test ");
    }
}
