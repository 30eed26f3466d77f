//! Blog Engine: Invariant Checks
//!
//! Returns the first violation found instead of panicking, so callers
//! decide whether a broken state is fatal.

use std::collections::BTreeSet;

use thiserror::Error;

use crate::domain::{PostId, UserId};
use crate::engine::BlogEngine;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("[INVARIANT:unique_username] username {0:?} is registered more than once")]
    DuplicateUsername(String),
    #[error("[INVARIANT:dense_user_ids] user at position {position} has id {id}")]
    UserIdGap { position: usize, id: UserId },
    #[error("[INVARIANT:post_id_order] post {id} does not follow post {previous}")]
    PostIdOrder { previous: PostId, id: PostId },
    #[error("[INVARIANT:post_id_counter] post {id} is not below next id {next}")]
    PostIdAhead { id: PostId, next: PostId },
    #[error("[INVARIANT:author_exists] post {post} references unknown author {author}")]
    OrphanedPost { post: PostId, author: UserId },
    #[error("[INVARIANT:current_actor_exists] current actor {0} is not registered")]
    UnknownActor(UserId),
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Run every check. `Ok(())` if all pass.
pub fn try_validate_invariants(blog: &BlogEngine) -> Result<(), InvariantViolation> {
    check_unique_usernames(blog)?;
    check_dense_user_ids(blog)?;
    check_post_id_order(blog)?;
    check_authors_exist(blog)?;
    check_current_actor(blog)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Individual checks (private)
// ---------------------------------------------------------------------------

fn check_unique_usernames(blog: &BlogEngine) -> Result<(), InvariantViolation> {
    let mut seen = BTreeSet::new();
    for user in blog.registry().users() {
        if !seen.insert(user.username.as_str()) {
            return Err(InvariantViolation::DuplicateUsername(user.username.clone()));
        }
    }
    Ok(())
}

/// User ids are 1..=n in registration order and the counter sits at n + 1.
fn check_dense_user_ids(blog: &BlogEngine) -> Result<(), InvariantViolation> {
    let registry = blog.registry();
    for (position, user) in registry.users().enumerate() {
        if user.id.0 != position as u64 + 1 {
            return Err(InvariantViolation::UserIdGap {
                position,
                id: user.id,
            });
        }
    }
    if registry.next_id().0 != registry.len() as u64 + 1 {
        return Err(InvariantViolation::UserIdGap {
            position: registry.len(),
            id: registry.next_id(),
        });
    }
    Ok(())
}

/// Deletion leaves gaps, so post ids are only required to increase.
fn check_post_id_order(blog: &BlogEngine) -> Result<(), InvariantViolation> {
    let posts = blog.posts();
    let next = posts.next_id();
    let mut previous: Option<PostId> = None;
    for post in posts.list() {
        if let Some(prev) = previous {
            if post.id <= prev {
                return Err(InvariantViolation::PostIdOrder {
                    previous: prev,
                    id: post.id,
                });
            }
        }
        if post.id >= next {
            return Err(InvariantViolation::PostIdAhead { id: post.id, next });
        }
        previous = Some(post.id);
    }
    Ok(())
}

fn check_authors_exist(blog: &BlogEngine) -> Result<(), InvariantViolation> {
    for post in blog.posts().list() {
        if blog.registry().user(post.author).is_none() {
            return Err(InvariantViolation::OrphanedPost {
                post: post.id,
                author: post.author,
            });
        }
    }
    Ok(())
}

fn check_current_actor(blog: &BlogEngine) -> Result<(), InvariantViolation> {
    match blog.registry().current_id() {
        Some(id) if blog.registry().user(id).is_none() => Err(InvariantViolation::UnknownActor(id)),
        _ => Ok(()),
    }
}
