//! User credential record

/// Username that carries the administrator role
pub const ADMIN_USERNAME: &str = "admin";

/// A username/password pair as stored in the users file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub username: String,
    /// Stored in clear text, as the file format requires
    pub password: String,
}

impl UserRecord {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// The seeded administrator account
    pub fn admin(password: impl Into<String>) -> Self {
        Self::new(ADMIN_USERNAME, password)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_record() {
        let admin = UserRecord::admin("password");
        assert_eq!(admin, UserRecord::new(ADMIN_USERNAME, "password"));
    }
}
