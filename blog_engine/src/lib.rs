#![forbid(unsafe_code)]

//! In-memory blog kernel: users, a single active session and
//! author-owned posts.
//!
//! [`engine::BlogEngine`] is the entry point. The shell-facing contract is
//! register, authenticate, logout, current_actor, create, list, get,
//! edit and delete; everything else supports that surface.

pub mod credential;
pub mod domain;
pub mod error;
pub mod registry;
pub mod posts;
pub mod events;
mod transitions;
pub mod invariants;
pub mod hashing;
pub mod engine;

pub use credential::{Credential, CredentialScheme, ReversedStride};
pub use domain::{Post, PostId, PostView, User, UserId};
pub use engine::BlogEngine;
pub use error::{AuthError, CreateError, DeleteError, EditError, ErrorKind, RegisterError};
pub use posts::FieldEdit;
