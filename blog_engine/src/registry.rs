//! Blog Engine: User Registry and Session
//!
//! Owns the user set, the user id counter and the single active session.
//! The current actor is the only authorization gate for mutations.

use std::fmt;

use tracing::{debug, info, warn};

use crate::credential::{CredentialScheme, ReversedStride};
use crate::domain::{User, UserId};
use crate::error::{ApplyError, AuthError, RegisterError};

pub struct Registry {
    users: Vec<User>,
    next_id: u64,
    current: Option<UserId>,
    scheme: Box<dyn CredentialScheme>,
}

impl Registry {
    /// Empty registry using the default [`ReversedStride`] scheme.
    pub fn new() -> Self {
        Self::with_scheme(Box::new(ReversedStride))
    }

    pub fn with_scheme(scheme: Box<dyn CredentialScheme>) -> Self {
        Self {
            users: Vec::new(),
            next_id: 1,
            current: None,
            scheme,
        }
    }

    /// Add a new user. Usernames are compared exactly, case included.
    /// Leaves the current session untouched.
    pub fn register(&mut self, username: &str, password: &str) -> Result<User, RegisterError> {
        if self.find_by_username(username).is_some() {
            debug!(username, "registration rejected: username taken");
            return Err(RegisterError::AlreadyExists {
                username: username.to_string(),
            });
        }

        let user = User {
            id: UserId(self.next_id),
            username: username.to_string(),
            credential: self.scheme.derive(password),
        };
        self.next_id += 1;
        self.users.push(user.clone());

        info!(user_id = %user.id, username, "user registered");
        Ok(user)
    }

    /// Verify credentials and make the user the current actor.
    pub fn authenticate(&mut self, username: &str, password: &str) -> Result<User, AuthError> {
        let user = self
            .users
            .iter()
            .find(|u| u.username == username && self.scheme.verify(&u.credential, password))
            .cloned();

        match user {
            Some(user) => {
                self.current = Some(user.id);
                info!(user_id = %user.id, username, "user logged in");
                Ok(user)
            }
            None => {
                warn!(username, "authentication failed");
                Err(AuthError::InvalidCredentials)
            }
        }
    }

    /// Clear the session. Returns whether anyone was logged in.
    pub fn logout(&mut self) -> bool {
        match self.current.take() {
            Some(id) => {
                info!(user_id = %id, "user logged out");
                true
            }
            None => false,
        }
    }

    /// `None` means nobody is authenticated.
    pub fn current_actor(&self) -> Option<&User> {
        self.current.and_then(|id| self.user(id))
    }

    pub fn current_id(&self) -> Option<UserId> {
        self.current
    }

    pub fn user(&self, id: UserId) -> Option<&User> {
        // ids are dense from 1, so the id is the position plus one
        let index = usize::try_from(id.0.checked_sub(1)?).ok()?;
        self.users.get(index).filter(|u| u.id == id)
    }

    pub fn find_by_username(&self, username: &str) -> Option<&User> {
        self.users.iter().find(|u| u.username == username)
    }

    /// All users in id order.
    pub fn users(&self) -> impl Iterator<Item = &User> {
        self.users.iter()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn next_id(&self) -> UserId {
        UserId(self.next_id)
    }

    // ── Replay hooks ───────────────────────────────────────────────

    pub(crate) fn restore_user(&mut self, user: User) -> Result<(), ApplyError> {
        let expected = self.next_id();
        if user.id != expected {
            return Err(ApplyError::UserIdMismatch {
                expected,
                got: user.id,
            });
        }
        if self.find_by_username(&user.username).is_some() {
            return Err(ApplyError::DuplicateUsername(user.username));
        }
        self.next_id += 1;
        self.users.push(user);
        Ok(())
    }

    pub(crate) fn restore_session(&mut self, id: Option<UserId>) -> Result<(), ApplyError> {
        if let Some(id) = id {
            if self.user(id).is_none() {
                return Err(ApplyError::UnknownUser(id));
            }
        }
        self.current = id;
        Ok(())
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("users", &self.users)
            .field("next_id", &self.next_id)
            .field("current", &self.current)
            .finish_non_exhaustive()
    }
}
