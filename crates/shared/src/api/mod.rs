use const_format::concatcp;
pub mod error;
pub mod payloads;

pub const API_BASE_PATH: &str = "/api/";

/// Name of the path parameter holding a user id
pub const USER_ID_PARAM: &str = "_id";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Object {
    Users,
    UserExercises,
    UserLogs,
}

impl Object {
    /// Route pattern in the form the router expects (`:_id` placeholders)
    pub const fn path(&self) -> &str {
        use Object::*;
        match self {
            Users => concatcp!(API_BASE_PATH, "users"),
            UserExercises => concatcp!(API_BASE_PATH, "users/:", USER_ID_PARAM, "/exercises"),
            UserLogs => concatcp!(API_BASE_PATH, "users/:", USER_ID_PARAM, "/logs"),
        }
    }

    /// Concrete path for the given user id
    pub fn path_for<T: std::fmt::Display>(&self, user_id: T) -> String {
        self.path()
            .replace(concatcp!(":", USER_ID_PARAM), &user_id.to_string())
    }
}

#[cfg(test)]
mod test {
    use super::Object;

    #[test]
    fn test_paths() {
        assert_eq!(Object::Users.path(), "/api/users");
        assert_eq!(Object::UserExercises.path(), "/api/users/:_id/exercises");
        assert_eq!(Object::UserLogs.path(), "/api/users/:_id/logs");
    }

    #[test]
    fn test_path_for() {
        assert_eq!(Object::UserLogs.path_for("abc"), "/api/users/abc/logs");
        assert_eq!(Object::Users.path_for("abc"), "/api/users");
    }
}
