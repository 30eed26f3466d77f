//! Blog Engine: Credential Derivation
//!
//! The stored credential is the submitted password reversed with every
//! second character dropped. This is not a hash. It is kept bit-for-bit
//! so existing credentials keep verifying.

use serde::{Deserialize, Serialize};

/// A derived credential. Never the raw password.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credential(String);

impl Credential {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for Credential {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

// Credentials stay out of logs and debug dumps.
impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential(..)")
    }
}

/// Turns a password into a storable credential and checks guesses.
pub trait CredentialScheme: Send + Sync {
    fn derive(&self, password: &str) -> Credential;

    fn verify(&self, stored: &Credential, guess: &str) -> bool {
        self.derive(guess) == *stored
    }
}

/// Walk the password backwards from its last character, keeping every
/// second `char`.
pub fn reversed_stride(password: &str) -> String {
    password.chars().rev().step_by(2).collect()
}

/// Default scheme, see [`reversed_stride`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ReversedStride;

impl CredentialScheme for ReversedStride {
    fn derive(&self, password: &str) -> Credential {
        Credential(reversed_stride(password))
    }
}
