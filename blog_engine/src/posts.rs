//! Blog Engine: Post Store
//!
//! Owns the post sequence and the post id counter. Mutations are
//! author-only. Checks run in a fixed order: existence, then session,
//! then ownership, then (for delete) confirmation.

use tracing::{debug, info, warn};

use crate::domain::{Post, PostId, User, UserId};
use crate::error::{ApplyError, CreateError, DeleteError, EditError};

/// Input word that leaves a field unchanged during an edit.
pub const SKIP_SENTINEL: &str = "skip";

/// Per-field edit instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldEdit {
    Keep,
    Replace(String),
}

impl FieldEdit {
    /// `"skip"` keeps the field, anything else replaces it.
    pub fn from_input(input: &str) -> Self {
        Self::from_input_with(input, SKIP_SENTINEL)
    }

    pub fn from_input_with(input: &str, skip_word: &str) -> Self {
        if input == skip_word {
            Self::Keep
        } else {
            Self::Replace(input.to_string())
        }
    }

    fn apply_to(self, field: &mut String) {
        if let Self::Replace(value) = self {
            *field = value;
        }
    }
}

#[derive(Debug)]
pub struct PostStore {
    posts: Vec<Post>,
    next_id: u64,
}

impl PostStore {
    pub fn new() -> Self {
        Self {
            posts: Vec::new(),
            next_id: 1,
        }
    }

    /// Append a post authored by `actor`.
    pub fn create(
        &mut self,
        actor: Option<&User>,
        title: &str,
        body: &str,
    ) -> Result<Post, CreateError> {
        let author = actor.ok_or(CreateError::Unauthenticated)?;
        let post = Post {
            id: self.take_id(),
            title: title.to_string(),
            body: body.to_string(),
            author: author.id,
        };
        self.posts.push(post.clone());
        info!(post_id = %post.id, user_id = %author.id, "post created");
        Ok(post)
    }

    /// All posts in creation order.
    pub fn list(&self) -> &[Post] {
        &self.posts
    }

    /// Lookup by id. Deleted ids are never found again.
    pub fn get(&self, id: PostId) -> Option<&Post> {
        self.posts.iter().find(|p| p.id == id)
    }

    pub fn by_author(&self, author: UserId) -> impl Iterator<Item = &Post> {
        self.posts.iter().filter(move |p| p.author == author)
    }

    /// Apply both field edits to `id` as one step.
    ///
    /// Errors, in precedence order: `NotFound`, `Unauthenticated`,
    /// `Forbidden`. On error nothing changes.
    pub fn edit(
        &mut self,
        id: PostId,
        actor: Option<&User>,
        title: FieldEdit,
        body: FieldEdit,
    ) -> Result<Post, EditError> {
        let index = self.authorize(id, actor)?;
        let post = &mut self.posts[index];
        title.apply_to(&mut post.title);
        body.apply_to(&mut post.body);
        info!(post_id = %id, "post edited");
        Ok(post.clone())
    }

    /// Remove `id` and return it. Checked like [`edit`](Self::edit), then
    /// an unconfirmed request fails with `NotConfirmed` and changes nothing.
    pub fn delete(
        &mut self,
        id: PostId,
        actor: Option<&User>,
        confirmed: bool,
    ) -> Result<Post, DeleteError> {
        let index = self.authorize(id, actor)?;
        if !confirmed {
            debug!(post_id = %id, "deletion declined");
            return Err(DeleteError::NotConfirmed(id));
        }
        let post = self.posts.remove(index);
        info!(post_id = %id, "post deleted");
        Ok(post)
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    /// Id the next created post will get.
    pub fn next_id(&self) -> PostId {
        PostId(self.next_id)
    }

    /// The post if `actor` may edit or delete it, with the same error
    /// precedence as [`edit`](Self::edit).
    pub fn check_access(&self, id: PostId, actor: Option<&User>) -> Result<&Post, EditError> {
        let index = self.authorize(id, actor)?;
        Ok(&self.posts[index])
    }

    /// Position of `id` if `actor` may mutate it.
    fn authorize(&self, id: PostId, actor: Option<&User>) -> Result<usize, EditError> {
        let index = self
            .posts
            .iter()
            .position(|p| p.id == id)
            .ok_or(EditError::NotFound(id))?;
        let actor = actor.ok_or(EditError::Unauthenticated)?;
        if !self.posts[index].is_authored_by(actor) {
            warn!(post_id = %id, user_id = %actor.id, "mutation forbidden: not the author");
            return Err(EditError::Forbidden(id));
        }
        Ok(index)
    }

    fn take_id(&mut self) -> PostId {
        let id = self.next_id();
        self.next_id = id.0 + 1;
        id
    }

    // ── Replay hooks ───────────────────────────────────────────────

    pub(crate) fn restore_post(&mut self, post: Post) -> Result<(), ApplyError> {
        let expected = self.next_id();
        if post.id != expected {
            return Err(ApplyError::PostIdMismatch {
                expected,
                got: post.id,
            });
        }
        self.take_id();
        self.posts.push(post);
        Ok(())
    }

    pub(crate) fn restore_edit(
        &mut self,
        id: PostId,
        title: String,
        body: String,
    ) -> Result<(), ApplyError> {
        let post = self
            .posts
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(ApplyError::UnknownPost(id))?;
        post.title = title;
        post.body = body;
        Ok(())
    }

    pub(crate) fn restore_delete(&mut self, id: PostId) -> Result<(), ApplyError> {
        let index = self
            .posts
            .iter()
            .position(|p| p.id == id)
            .ok_or(ApplyError::UnknownPost(id))?;
        self.posts.remove(index);
        Ok(())
    }
}

impl Default for PostStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credential::{CredentialScheme, ReversedStride};

    fn user(id: u64, name: &str) -> User {
        User {
            id: UserId(id),
            username: name.to_string(),
            credential: ReversedStride.derive("pw"),
        }
    }

    #[test]
    fn test_create_requires_actor() {
        let mut store = PostStore::new();
        assert_eq!(store.create(None, "T", "B"), Err(CreateError::Unauthenticated));
        assert!(store.is_empty());
        assert_eq!(store.next_id(), PostId(1));
    }

    #[test]
    fn test_create_appends_in_order() {
        let alice = user(1, "alice");
        let mut store = PostStore::new();
        let first = store.create(Some(&alice), "one", "b").unwrap();
        let second = store.create(Some(&alice), "two", "b").unwrap();
        assert_eq!(first.id, PostId(1));
        assert_eq!(second.id, PostId(2));
        assert_eq!(first.author, alice.id);
        let titles: Vec<_> = store.list().iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, ["one", "two"]);
    }

    #[test]
    fn test_list_and_get_on_empty_store() {
        let store = PostStore::new();
        assert!(store.list().is_empty());
        assert!(store.get(PostId(1)).is_none());
    }

    #[test]
    fn test_edit_missing_post_reported_before_session() {
        let mut store = PostStore::new();
        let err = store
            .edit(PostId(9), None, FieldEdit::Keep, FieldEdit::Keep)
            .unwrap_err();
        assert_eq!(err, EditError::NotFound(PostId(9)));
    }

    #[test]
    fn test_edit_unauthenticated_before_forbidden() {
        let alice = user(1, "alice");
        let mut store = PostStore::new();
        store.create(Some(&alice), "T", "B").unwrap();
        let err = store
            .edit(PostId(1), None, FieldEdit::Keep, FieldEdit::Keep)
            .unwrap_err();
        assert_eq!(err, EditError::Unauthenticated);
    }

    #[test]
    fn test_edit_by_non_author_forbidden() {
        let alice = user(1, "alice");
        let bob = user(2, "bob");
        let mut store = PostStore::new();
        store.create(Some(&alice), "T", "B").unwrap();
        let err = store
            .edit(
                PostId(1),
                Some(&bob),
                FieldEdit::Replace("T2".to_string()),
                FieldEdit::Keep,
            )
            .unwrap_err();
        assert_eq!(err, EditError::Forbidden(PostId(1)));
        assert_eq!(store.get(PostId(1)).unwrap().title, "T");
    }

    #[test]
    fn test_edit_same_name_different_id_forbidden() {
        let alice = user(1, "alice");
        let lookalike = user(5, "alice");
        let mut store = PostStore::new();
        store.create(Some(&alice), "T", "B").unwrap();
        let err = store
            .edit(PostId(1), Some(&lookalike), FieldEdit::Keep, FieldEdit::Keep)
            .unwrap_err();
        assert_eq!(err, EditError::Forbidden(PostId(1)));
    }

    #[test]
    fn test_edit_fields_independently() {
        let alice = user(1, "alice");
        let mut store = PostStore::new();
        store.create(Some(&alice), "T", "B").unwrap();

        let post = store
            .edit(
                PostId(1),
                Some(&alice),
                FieldEdit::from_input("skip"),
                FieldEdit::from_input("new body"),
            )
            .unwrap();
        assert_eq!(post.title, "T");
        assert_eq!(post.body, "new body");

        let post = store
            .edit(
                PostId(1),
                Some(&alice),
                FieldEdit::from_input("new title"),
                FieldEdit::from_input("skip"),
            )
            .unwrap();
        assert_eq!(post.title, "new title");
        assert_eq!(post.body, "new body");
        assert_eq!(post.author, alice.id);
        assert_eq!(post.id, PostId(1));
    }

    #[test]
    fn test_sentinel_is_exact() {
        assert_eq!(FieldEdit::from_input("skip"), FieldEdit::Keep);
        assert_eq!(FieldEdit::from_input("Skip"), FieldEdit::Replace("Skip".to_string()));
        assert_eq!(FieldEdit::from_input(""), FieldEdit::Replace(String::new()));
        assert_eq!(FieldEdit::from_input_with("-", "-"), FieldEdit::Keep);
    }

    #[test]
    fn test_delete_precedence() {
        let alice = user(1, "alice");
        let bob = user(2, "bob");
        let mut store = PostStore::new();
        store.create(Some(&alice), "T", "B").unwrap();

        assert_eq!(store.delete(PostId(2), None, true), Err(DeleteError::NotFound(PostId(2))));
        assert_eq!(store.delete(PostId(1), None, true), Err(DeleteError::Unauthenticated));
        assert_eq!(
            store.delete(PostId(1), Some(&bob), false),
            Err(DeleteError::Forbidden(PostId(1)))
        );
        assert_eq!(
            store.delete(PostId(1), Some(&alice), false),
            Err(DeleteError::NotConfirmed(PostId(1)))
        );
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_declined_delete_keeps_post_intact() {
        let alice = user(1, "alice");
        let mut store = PostStore::new();
        let created = store.create(Some(&alice), "T", "B").unwrap();
        let _ = store.delete(created.id, Some(&alice), false);
        assert_eq!(store.get(created.id), Some(&created));
    }

    #[test]
    fn test_delete_returns_removed_post() {
        let alice = user(1, "alice");
        let mut store = PostStore::new();
        let created = store.create(Some(&alice), "T", "B").unwrap();
        let removed = store.delete(created.id, Some(&alice), true).unwrap();
        assert_eq!(removed, created);
        assert!(store.get(created.id).is_none());
    }

    #[test]
    fn test_ids_not_reused_after_delete() {
        let alice = user(1, "alice");
        let mut store = PostStore::new();
        let first = store.create(Some(&alice), "a", "b").unwrap();
        store.create(Some(&alice), "c", "d").unwrap();
        store.delete(first.id, Some(&alice), true).unwrap();
        let third = store.create(Some(&alice), "e", "f").unwrap();
        assert_eq!(third.id, PostId(3));
    }

    #[test]
    fn test_by_author() {
        let alice = user(1, "alice");
        let bob = user(2, "bob");
        let mut store = PostStore::new();
        store.create(Some(&alice), "a", "b").unwrap();
        store.create(Some(&bob), "c", "d").unwrap();
        store.create(Some(&alice), "e", "f").unwrap();
        let ids: Vec<_> = store.by_author(alice.id).map(|p| p.id).collect();
        assert_eq!(ids, [PostId(1), PostId(3)]);
    }
}
