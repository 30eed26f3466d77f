//! Blog Engine: Core Domain Types
//!
//! Pure data. Identity assignment happens in the registry and the post
//! store, never here.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::credential::Credential;

// ── Identifiers ────────────────────────────────────────────────────

/// User identifier. Dense, starting at 1, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

/// Post identifier. Independent counter from [`UserId`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ── Entities ───────────────────────────────────────────────────────

/// A registered account. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub credential: Credential,
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.username)
    }
}

/// A post owned by exactly one author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub body: String,
    pub author: UserId,
}

impl Post {
    pub fn is_authored_by(&self, user: &User) -> bool {
        self.author == user.id
    }

    /// Human-readable rendering with the author's name resolved.
    pub fn render(&self, author: &User) -> String {
        PostView { post: self, author }.to_string()
    }
}

/// Borrowed pairing of a post and its author, for display.
#[derive(Debug, Clone, Copy)]
pub struct PostView<'a> {
    pub post: &'a Post,
    pub author: &'a User,
}

impl fmt::Display for PostView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} - {}", self.post.id, title_case(&self.post.title))?;
        writeln!(f, "By: {}", self.author)?;
        write!(f, "{}", self.post.body)
    }
}

/// Uppercase the first letter of every word, lowercase the rest.
/// A word starts at any cased letter not preceded by another cased
/// letter, so digits and CJK characters end a word.
pub fn title_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut prev_cased = false;
    for ch in input.chars() {
        let cased = ch.is_lowercase() || ch.is_uppercase();
        if !cased {
            out.push(ch);
        } else if prev_cased {
            out.extend(ch.to_lowercase());
        } else {
            out.extend(ch.to_uppercase());
        }
        prev_cased = cased;
    }
    out
}
