//! Blog Engine: Facade
//!
//! Composes the registry, the post store and the journal. The current
//! actor is read from the registry on every mutating call, so callers
//! never pass identities around.
//!
//! Each successful mutation:
//!   1. is applied to the owning component
//!   2. is recorded in the journal
//!   3. is followed by an invariant check (debug builds)
//!
//! Failed calls touch neither the state nor the journal.

use tracing::debug;

use crate::credential::CredentialScheme;
use crate::domain::{Post, PostId, PostView, User};
use crate::error::{ApplyError, AuthError, CreateError, DeleteError, EditError, RegisterError};
use crate::events::{BlogEvent, EventEnvelope, Journal};
use crate::invariants::try_validate_invariants;
use crate::posts::{FieldEdit, PostStore};
use crate::registry::Registry;
use crate::transitions;

#[derive(Debug, Default)]
pub struct BlogEngine {
    registry: Registry,
    posts: PostStore,
    journal: Journal,
}

impl BlogEngine {
    /// Empty blog using the default [`ReversedStride`](crate::ReversedStride) scheme.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty blog deriving and verifying credentials with `scheme`.
    pub fn with_scheme(scheme: Box<dyn CredentialScheme>) -> Self {
        Self {
            registry: Registry::with_scheme(scheme),
            posts: PostStore::new(),
            journal: Journal::new(),
        }
    }

    // ── Registry ───────────────────────────────────────────────────

    /// Create an account. Does not log it in.
    pub fn register(&mut self, username: &str, password: &str) -> Result<User, RegisterError> {
        let user = self.registry.register(username, password)?;
        self.journal.record(BlogEvent::UserRegistered {
            user_id: user.id,
            username: user.username.clone(),
            credential: user.credential.clone(),
        });
        self.check("register");
        Ok(user)
    }

    /// Make `username` the current actor. A failure leaves any existing
    /// session in place and does not say which part was wrong.
    pub fn authenticate(&mut self, username: &str, password: &str) -> Result<User, AuthError> {
        let user = self.registry.authenticate(username, password)?;
        self.journal.record(BlogEvent::LoggedIn { user_id: user.id });
        self.check("authenticate");
        Ok(user)
    }

    /// Always succeeds. Returns whether a session was actually cleared.
    pub fn logout(&mut self) -> bool {
        let cleared = self.registry.logout();
        if cleared {
            self.journal.record(BlogEvent::LoggedOut);
        }
        cleared
    }

    pub fn current_actor(&self) -> Option<&User> {
        self.registry.current_actor()
    }

    // ── Posts ──────────────────────────────────────────────────────

    /// New post authored by the current actor.
    pub fn create_post(&mut self, title: &str, body: &str) -> Result<Post, CreateError> {
        let post = self
            .posts
            .create(self.registry.current_actor(), title, body)?;
        self.journal.record(BlogEvent::PostCreated {
            post_id: post.id,
            author: post.author,
            title: post.title.clone(),
            body: post.body.clone(),
        });
        self.check("create_post");
        Ok(post)
    }

    /// Every post in creation order. Needs no session.
    pub fn list_posts(&self) -> &[Post] {
        debug!(count = self.posts.len(), "listing posts");
        self.posts.list()
    }

    pub fn get_post(&self, id: PostId) -> Option<&Post> {
        let post = self.posts.get(id);
        debug!(post_id = %id, found = post.is_some(), "post lookup");
        post
    }

    /// The post paired with its author, ready for display.
    pub fn view(&self, id: PostId) -> Option<PostView<'_>> {
        let post = self.posts.get(id)?;
        self.view_of(post)
    }

    /// Every post with its author, in creation order.
    pub fn views(&self) -> impl Iterator<Item = PostView<'_>> {
        self.posts.list().iter().filter_map(|p| self.view_of(p))
    }

    /// Whether the current actor may edit or delete `id`, without
    /// touching anything.
    pub fn check_access(&self, id: PostId) -> Result<&Post, EditError> {
        self.posts.check_access(id, self.registry.current_actor())
    }

    /// Edit a post the current actor authored. See [`PostStore::edit`].
    pub fn edit_post(
        &mut self,
        id: PostId,
        title: FieldEdit,
        body: FieldEdit,
    ) -> Result<Post, EditError> {
        let post = self
            .posts
            .edit(id, self.registry.current_actor(), title, body)?;
        self.journal.record(BlogEvent::PostEdited {
            post_id: post.id,
            title: post.title.clone(),
            body: post.body.clone(),
        });
        self.check("edit_post");
        Ok(post)
    }

    /// Delete a post the current actor authored. See [`PostStore::delete`].
    pub fn delete_post(&mut self, id: PostId, confirmed: bool) -> Result<Post, DeleteError> {
        let post = self
            .posts
            .delete(id, self.registry.current_actor(), confirmed)?;
        self.journal.record(BlogEvent::PostDeleted { post_id: post.id });
        self.check("delete_post");
        Ok(post)
    }

    // ── Journal ────────────────────────────────────────────────────

    /// Re-apply a recorded event. Enforces schema version, strict
    /// sequence and the ids this engine would assign next.
    pub fn apply_event(&mut self, envelope: &EventEnvelope) -> Result<(), ApplyError> {
        transitions::apply_event(&mut self.registry, &mut self.posts, &self.journal, envelope)?;
        self.journal.push(envelope.clone());
        self.check("apply_event");
        Ok(())
    }

    /// Apply events in order, stopping at the first rejection. Events
    /// before the rejected one stay applied.
    pub fn apply_sequence(&mut self, events: &[EventEnvelope]) -> Result<(), ApplyError> {
        for event in events {
            self.apply_event(event)?;
        }
        Ok(())
    }

    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn posts(&self) -> &PostStore {
        &self.posts
    }

    fn view_of<'a>(&'a self, post: &'a Post) -> Option<PostView<'a>> {
        let author = self.registry.user(post.author)?;
        Some(PostView { post, author })
    }

    fn check(&self, operation: &str) {
        if cfg!(debug_assertions) {
            let outcome = try_validate_invariants(self);
            debug_assert!(
                outcome.is_ok(),
                "invariant violation after {operation}: {outcome:?}"
            );
        }
    }
}
