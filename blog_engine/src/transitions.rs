//! Blog Engine: Journal Transitions
//!
//! Applies a recorded event directly to the registry and post store,
//! bypassing credential derivation and authorization: the event already
//! describes an outcome those checks allowed.
//!
//! Every handler validates before it mutates.

use crate::domain::{Post, User};
use crate::error::ApplyError;
use crate::events::{BlogEvent, EventEnvelope, Journal, SCHEMA_VERSION};
use crate::posts::PostStore;
use crate::registry::Registry;

// ---------------------------------------------------------------------------
// Public dispatcher
// ---------------------------------------------------------------------------

pub(crate) fn apply_event(
    registry: &mut Registry,
    posts: &mut PostStore,
    journal: &Journal,
    envelope: &EventEnvelope,
) -> Result<(), ApplyError> {
    if envelope.schema_version != SCHEMA_VERSION {
        return Err(ApplyError::SchemaVersion(envelope.schema_version));
    }

    let expected = journal.last_sequence() + 1;
    if envelope.sequence != expected {
        return Err(ApplyError::Sequence {
            expected,
            got: envelope.sequence,
        });
    }

    match &envelope.event {
        BlogEvent::UserRegistered {
            user_id,
            username,
            credential,
        } => registry.restore_user(User {
            id: *user_id,
            username: username.clone(),
            credential: credential.clone(),
        }),
        BlogEvent::LoggedIn { user_id } => registry.restore_session(Some(*user_id)),
        BlogEvent::LoggedOut => registry.restore_session(None),
        BlogEvent::PostCreated {
            post_id,
            author,
            title,
            body,
        } => {
            if registry.user(*author).is_none() {
                return Err(ApplyError::UnknownUser(*author));
            }
            posts.restore_post(Post {
                id: *post_id,
                title: title.clone(),
                body: body.clone(),
                author: *author,
            })
        }
        BlogEvent::PostEdited {
            post_id,
            title,
            body,
        } => posts.restore_edit(*post_id, title.clone(), body.clone()),
        BlogEvent::PostDeleted { post_id } => posts.restore_delete(*post_id),
    }
}
