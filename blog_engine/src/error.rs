//! Typed outcomes for every fallible blog operation.
//!
//! Each operation gets its own enum so callers match only on the cases
//! that operation can produce. [`ErrorKind`] flattens them for rendering.

use thiserror::Error;

use crate::domain::{PostId, UserId};

/// The complete failure taxonomy, independent of operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    AlreadyExists,
    InvalidCredentials,
    Unauthenticated,
    Forbidden,
    NotFound,
    /// Declined by the caller. Nothing happened.
    NotConfirmed,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegisterError {
    #[error("user with username {username} already exists")]
    AlreadyExists { username: String },
}

/// Unknown username and wrong password are deliberately the same variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("username and/or password is incorrect")]
    InvalidCredentials,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CreateError {
    #[error("you must be logged in to perform this action")]
    Unauthenticated,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("post {0} does not exist")]
    NotFound(PostId),
    #[error("you must be logged in to perform this action")]
    Unauthenticated,
    #[error("you do not have permission to edit post {0}")]
    Forbidden(PostId),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeleteError {
    #[error("post {0} does not exist")]
    NotFound(PostId),
    #[error("you must be logged in to perform this action")]
    Unauthenticated,
    #[error("you do not have permission to delete post {0}")]
    Forbidden(PostId),
    #[error("deletion of post {0} was not confirmed")]
    NotConfirmed(PostId),
}

/// A recorded event could not be applied to the current state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApplyError {
    #[error("sequence violation: expected {expected}, got {got}")]
    Sequence { expected: u64, got: u64 },
    #[error("unsupported journal schema version {0}")]
    SchemaVersion(u32),
    #[error("user id mismatch: expected {expected}, event carries {got}")]
    UserIdMismatch { expected: UserId, got: UserId },
    #[error("post id mismatch: expected {expected}, event carries {got}")]
    PostIdMismatch { expected: PostId, got: PostId },
    #[error("username {0} already registered")]
    DuplicateUsername(String),
    #[error("unknown user {0}")]
    UnknownUser(UserId),
    #[error("unknown post {0}")]
    UnknownPost(PostId),
}

impl RegisterError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::AlreadyExists { .. } => ErrorKind::AlreadyExists,
        }
    }
}

impl AuthError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::InvalidCredentials
    }
}

impl CreateError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Unauthenticated
    }
}

impl EditError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Unauthenticated => ErrorKind::Unauthenticated,
            Self::Forbidden(_) => ErrorKind::Forbidden,
        }
    }
}

impl DeleteError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Unauthenticated => ErrorKind::Unauthenticated,
            Self::Forbidden(_) => ErrorKind::Forbidden,
            Self::NotConfirmed(_) => ErrorKind::NotConfirmed,
        }
    }
}

/// Ownership checks shared by edit and delete.
impl From<EditError> for DeleteError {
    fn from(err: EditError) -> Self {
        match err {
            EditError::NotFound(id) => Self::NotFound(id),
            EditError::Unauthenticated => Self::Unauthenticated,
            EditError::Forbidden(id) => Self::Forbidden(id),
        }
    }
}
