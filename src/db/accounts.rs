use crate::config::AdminConfig;
use crate::db::file;
use crate::error::CardError;
use crate::types::{AuthResult, Session};
use argon2::Argon2;
use argon2::password_hash::{
    PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng,
};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use subtle::ConstantTimeEq;
use tracing::{debug, info, warn};

/// Registered usernames mapped to Argon2id PHC hash strings.
///
/// The administrator from configuration is checked before this map on every
/// login and is never stored in it.
pub struct AccountStore {
    path: PathBuf,
    accounts: BTreeMap<String, String>,
    admin: AdminConfig,
}

impl AccountStore {
    pub fn open(path: impl Into<PathBuf>, admin: AdminConfig) -> Self {
        let path = path.into();
        let accounts = Self::load(&path).unwrap_or_else(|e| {
            warn!(path = %path.display(), error = %e, "failed to load user data; starting empty");
            BTreeMap::new()
        });
        info!(path = %path.display(), count = accounts.len(), "account store opened");
        Self {
            path,
            accounts,
            admin,
        }
    }

    pub fn load(path: &Path) -> Result<BTreeMap<String, String>, CardError> {
        Ok(file::read_json(path)?.unwrap_or_default())
    }

    pub fn contains(&self, username: &str) -> bool {
        self.accounts.contains_key(username)
    }

    /// Whether `username` is unavailable for registration.
    pub fn is_taken(&self, username: &str) -> bool {
        self.accounts.contains_key(username) || username == self.admin.username
    }

    /// Register a new account. `Ok(false)` leaves the store untouched when
    /// the username is taken, including by the administrator.
    pub fn register(&mut self, username: &str, password: &str) -> Result<bool, CardError> {
        if self.is_taken(username) {
            debug!(username, "registration rejected: username exists");
            return Ok(false);
        }
        self.insert_hashed(username, hash_password(password)?)
    }

    /// Insert an already computed PHC hash. The taken check is repeated here
    /// because the hash is usually computed without holding the store lock.
    pub fn insert_hashed(&mut self, username: &str, hash: String) -> Result<bool, CardError> {
        if self.is_taken(username) {
            debug!(username, "registration rejected: username exists");
            return Ok(false);
        }

        self.accounts.insert(username.to_string(), hash);
        if let Err(e) = file::write_json(&self.path, &self.accounts) {
            self.accounts.remove(username);
            return Err(e);
        }
        info!(username, "account registered");
        Ok(true)
    }

    pub fn authenticate(&self, username: &str, password: &str) -> AuthResult {
        self.login_check(username, password).finish(password)
    }

    /// Everything a login needs from the store. Hash verification happens
    /// later in [`LoginCheck::finish`], which does not borrow the store.
    pub fn login_check(&self, username: &str, password: &str) -> LoginCheck {
        if self.is_admin(username, password) {
            return LoginCheck::Admin(Session::admin(username));
        }
        match self.accounts.get(username) {
            Some(hash) => LoginCheck::Verify {
                username: username.to_string(),
                hash: hash.clone(),
            },
            None => LoginCheck::Unknown {
                username: username.to_string(),
            },
        }
    }

    /// Remove the backing file and forget every account.
    pub fn delete_all(&mut self) -> Result<bool, CardError> {
        let removed = file::remove(&self.path)?;
        self.accounts.clear();
        if removed {
            info!(path = %self.path.display(), "user data deleted");
        } else {
            warn!(path = %self.path.display(), "user data file does not exist");
        }
        Ok(removed)
    }

    fn is_admin(&self, username: &str, password: &str) -> bool {
        let user_ok = username.as_bytes().ct_eq(self.admin.username.as_bytes());
        let pass_ok = password.as_bytes().ct_eq(self.admin.password.as_bytes());
        bool::from(user_ok & pass_ok)
    }
}

/// Outcome of the lock-held half of a login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginCheck {
    Admin(Session),
    Verify { username: String, hash: String },
    Unknown { username: String },
}

impl LoginCheck {
    /// Complete the login. Runs the Argon2 verifier for stored accounts, so
    /// async callers should run this on a blocking thread.
    pub fn finish(self, password: &str) -> AuthResult {
        match self {
            LoginCheck::Admin(session) => {
                info!(username = %session.username, "administrator logged in");
                AuthResult::Authenticated(session)
            }
            LoginCheck::Verify { username, hash } if verify_password(password, &hash) => {
                info!(username = %username, "user logged in");
                AuthResult::Authenticated(Session::user(username))
            }
            LoginCheck::Verify { username, .. } | LoginCheck::Unknown { username } => {
                debug!(username = %username, "login failed");
                AuthResult::Failed
            }
        }
    }
}

/// Argon2id PHC string with a fresh random salt. CPU bound.
pub fn hash_password(password: &str) -> Result<String, CardError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| CardError::PasswordHash(e.to_string()))
}

fn verify_password(password: &str, stored: &str) -> bool {
    match PasswordHash::new(stored) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            warn!(error = %e, "stored password hash is malformed");
            false
        }
    }
}
