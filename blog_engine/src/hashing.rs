//! Blog Engine: Canonical State Fingerprint
//!
//! Deterministic serialization + SHA-256. Two engines with the same
//! users, posts, session and id counters hash identically, whatever
//! path led there.
//!
//! Rules:
//!   - Users in id order, posts in sequence order
//!   - Fixed field order in every object
//!   - Compact UTF-8 JSON, no whitespace
//!   - The journal is not part of the state

use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use crate::engine::BlogEngine;
use crate::events::SCHEMA_VERSION;

/// Canonical serialization of the engine state to UTF-8 JSON bytes.
pub fn canonical_serialize(blog: &BlogEngine) -> Vec<u8> {
    build_canonical_value(blog).to_string().into_bytes()
}

/// SHA-256 of [`canonical_serialize`]. Lowercase hex string.
pub fn canonical_hash(blog: &BlogEngine) -> String {
    let digest = Sha256::digest(canonical_serialize(blog));
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Field order: schema_version, users, posts, current_actor,
///              next_user_id, next_post_id
fn build_canonical_value(blog: &BlogEngine) -> Value {
    let registry = blog.registry();
    let posts = blog.posts();

    let users: Vec<Value> = registry
        .users()
        .map(|u| {
            let mut m = Map::new();
            m.insert("id".to_string(), Value::from(u.id.0));
            m.insert("username".to_string(), Value::String(u.username.clone()));
            m.insert(
                "credential".to_string(),
                Value::String(u.credential.as_str().to_string()),
            );
            Value::Object(m)
        })
        .collect();

    let post_list: Vec<Value> = posts
        .list()
        .iter()
        .map(|p| {
            let mut m = Map::new();
            m.insert("id".to_string(), Value::from(p.id.0));
            m.insert("author".to_string(), Value::from(p.author.0));
            m.insert("title".to_string(), Value::String(p.title.clone()));
            m.insert("body".to_string(), Value::String(p.body.clone()));
            Value::Object(m)
        })
        .collect();

    let mut root = Map::new();
    root.insert("schema_version".to_string(), Value::from(SCHEMA_VERSION));
    root.insert("users".to_string(), Value::Array(users));
    root.insert("posts".to_string(), Value::Array(post_list));
    root.insert(
        "current_actor".to_string(),
        registry
            .current_id()
            .map_or(Value::Null, |id| Value::from(id.0)),
    );
    root.insert("next_user_id".to_string(), Value::from(registry.next_id().0));
    root.insert("next_post_id".to_string(), Value::from(posts.next_id().0));

    Value::Object(root)
}
