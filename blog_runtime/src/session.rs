//! Thread-safe handle around a single blog engine.
//!
//! One mutex per engine serializes every call, so each operation stays
//! atomic when the engine is shared between threads. There is still one
//! session per engine: whoever authenticates last is the current actor
//! for every caller.
//!
//! A poisoned lock is recovered. Engine operations validate before they
//! mutate, so a panic in another holder cannot leave partial state.

use std::sync::{Mutex, MutexGuard, PoisonError};

use blog_engine::engine::BlogEngine;
use blog_engine::error::{AuthError, CreateError, DeleteError, EditError, RegisterError};
use blog_engine::hashing::canonical_hash;
use blog_engine::{FieldEdit, Post, PostId, User};

#[derive(Debug, Default)]
pub struct SharedBlog {
    inner: Mutex<BlogEngine>,
}

impl SharedBlog {
    pub fn new(engine: BlogEngine) -> Self {
        Self {
            inner: Mutex::new(engine),
        }
    }

    /// Run `f` with exclusive access. Several calls inside one closure
    /// are observed as a single step by other threads.
    pub fn with<T>(&self, f: impl FnOnce(&mut BlogEngine) -> T) -> T {
        f(&mut *self.lock())
    }

    pub fn register(&self, username: &str, password: &str) -> Result<User, RegisterError> {
        self.lock().register(username, password)
    }

    pub fn authenticate(&self, username: &str, password: &str) -> Result<User, AuthError> {
        self.lock().authenticate(username, password)
    }

    pub fn logout(&self) -> bool {
        self.lock().logout()
    }

    pub fn current_actor(&self) -> Option<User> {
        self.lock().current_actor().cloned()
    }

    pub fn create_post(&self, title: &str, body: &str) -> Result<Post, CreateError> {
        self.lock().create_post(title, body)
    }

    pub fn list_posts(&self) -> Vec<Post> {
        self.lock().list_posts().to_vec()
    }

    pub fn get_post(&self, id: PostId) -> Option<Post> {
        self.lock().get_post(id).cloned()
    }

    pub fn edit_post(
        &self,
        id: PostId,
        title: FieldEdit,
        body: FieldEdit,
    ) -> Result<Post, EditError> {
        self.lock().edit_post(id, title, body)
    }

    pub fn delete_post(&self, id: PostId, confirmed: bool) -> Result<Post, DeleteError> {
        self.lock().delete_post(id, confirmed)
    }

    pub fn current_hash(&self) -> String {
        canonical_hash(&self.lock())
    }

    pub fn into_inner(self) -> BlogEngine {
        self.inner.into_inner().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock(&self) -> MutexGuard<'_, BlogEngine> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
