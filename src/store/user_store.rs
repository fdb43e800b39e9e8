//! Credential storage backed by the users file.
//!
//! Loading is best-effort: lines that do not decode are logged and skipped.
//! Registration only ever appends.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::codec::{DELIMITER, LineRecord, validate_field};
use crate::domain::{Session, UserRecord};
use crate::error::{AuthFailure, Result, TaskTrackError};
use crate::store::LineFile;

/// Users file wrapper.
#[derive(Debug, Clone)]
pub struct UserStore {
    file: LineFile,
}

impl UserStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            file: LineFile::new(path),
        }
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Create the users file seeded with the admin account if it is missing.
    pub fn bootstrap(&self, admin_password: &str) -> Result<bool> {
        let seed = format!("{}\n", UserRecord::admin(admin_password).encode());
        self.file.ensure_exists(&seed)
    }

    /// Every decodable user line, in file order.
    pub fn load_records(&self) -> Result<Vec<UserRecord>> {
        let mut records = Vec::new();
        for line in self.file.read_lines()? {
            match line.text().and_then(|text| UserRecord::decode(text).map_err(|e| e.at_line(line.number))) {
                Ok(record) => records.push(record),
                Err(e) => log::warn!("Ignoring invalid user data in {}: {}", self.path().display(), e),
            }
        }
        log::debug!("Loaded {} users from {}", records.len(), self.path().display());
        Ok(records)
    }

    /// Username to password. A repeated username keeps its last password.
    pub fn load(&self) -> Result<HashMap<String, String>> {
        Ok(self
            .load_records()?
            .into_iter()
            .map(|r| (r.username, r.password))
            .collect())
    }

    /// The first field of every non-blank line, including lines that fail to decode.
    fn taken_names(&self) -> Result<HashSet<String>> {
        Ok(self
            .file
            .read_lines()?
            .iter()
            .filter_map(|line| line.leading_field(DELIMITER as u8))
            .map(|name| name.trim().to_string())
            .collect())
    }

    pub fn count(&self) -> Result<usize> {
        Ok(self.load()?.len())
    }

    /// Exact, case-sensitive credential check.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<bool> {
        Ok(self.load()?.get(username).is_some_and(|stored| stored == password))
    }

    /// Check credentials and open a session.
    pub fn login(&self, username: &str, password: &str) -> Result<Session> {
        let users = self.load()?;
        match users.get(username) {
            None => {
                log::info!("Login refused for unknown user '{}'", username);
                Err(TaskTrackError::Authentication(AuthFailure::UnknownUser))
            }
            Some(stored) if stored != password => {
                log::info!("Login refused for '{}': wrong password", username);
                Err(TaskTrackError::Authentication(AuthFailure::WrongPassword))
            }
            Some(_) => {
                let session = Session::new(username);
                log::info!("User '{}' logged in as {:?}", username, session.role());
                Ok(session)
            }
        }
    }

    /// Register a new user. Inputs are trimmed before any check.
    pub fn register(&self, username: &str, password: &str, confirm: &str) -> Result<UserRecord> {
        let username = username.trim();
        let password = password.trim();
        let confirm = confirm.trim();

        if username.is_empty() {
            return Err(TaskTrackError::Validation("username cannot be empty".to_string()));
        }
        if password.is_empty() || password != confirm {
            return Err(TaskTrackError::Validation(
                "passwords do not match or are empty".to_string(),
            ));
        }
        validate_field("username", username)?;
        validate_field("password", password)?;

        if self.taken_names()?.contains(username) {
            return Err(TaskTrackError::DuplicateUser(username.to_string()));
        }

        let record = UserRecord::new(username, password);
        self.file.append_line(&record.encode())?;
        log::info!("Registered user '{}'", username);
        Ok(record)
    }
}
