//! End-to-end behaviour of the blog engine through its public surface.
//!
//! Every failing call is checked against the canonical hash to prove it
//! left no trace in the state.

use blog_engine::engine::BlogEngine;
use blog_engine::hashing::canonical_hash;
use blog_engine::invariants::try_validate_invariants;
use blog_engine::{
    AuthError, CreateError, DeleteError, EditError, ErrorKind, FieldEdit, PostId, RegisterError,
    UserId,
};

fn blog_with_alice_and_bob() -> BlogEngine {
    let mut blog = BlogEngine::new();
    blog.register("alice", "pw1").expect("register alice");
    blog.register("bob", "pw2").expect("register bob");
    blog
}

#[test]
fn alice_post_cannot_be_edited_by_bob() {
    let mut blog = blog_with_alice_and_bob();
    let alice = blog.authenticate("alice", "pw1").expect("alice logs in");
    let post = blog.create_post("T", "B").expect("alice posts");
    assert_eq!(post.id, PostId(1));
    assert_eq!(post.author, alice.id);

    assert!(blog.logout());
    blog.authenticate("bob", "pw2").expect("bob logs in");

    let before = canonical_hash(&blog);
    let err = blog
        .edit_post(
            PostId(1),
            FieldEdit::from_input("T2"),
            FieldEdit::from_input("skip"),
        )
        .unwrap_err();
    assert_eq!(err, EditError::Forbidden(PostId(1)));
    assert_eq!(err.kind(), ErrorKind::Forbidden);
    assert_eq!(blog.get_post(PostId(1)).map(|p| p.title.as_str()), Some("T"));
    assert_eq!(canonical_hash(&blog), before);
}

#[test]
fn duplicate_registration_leaves_registry_unchanged() {
    let mut blog = blog_with_alice_and_bob();
    let before = canonical_hash(&blog);
    let err = blog.register("alice", "different").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AlreadyExists);
    assert!(matches!(err, RegisterError::AlreadyExists { .. }));
    assert_eq!(blog.registry().len(), 2);
    assert_eq!(canonical_hash(&blog), before);
}

#[test]
fn registered_users_get_distinct_increasing_ids() {
    let blog = blog_with_alice_and_bob();
    let ids: Vec<UserId> = blog.registry().users().map(|u| u.id).collect();
    assert_eq!(ids, [UserId(1), UserId(2)]);
}

#[test]
fn failed_authentication_is_uniform_and_side_effect_free() {
    let mut blog = blog_with_alice_and_bob();
    let before = canonical_hash(&blog);
    assert_eq!(blog.authenticate("alice", "pw2"), Err(AuthError::InvalidCredentials));
    assert_eq!(blog.authenticate("carol", "pw1"), Err(AuthError::InvalidCredentials));
    assert!(blog.current_actor().is_none());
    assert_eq!(canonical_hash(&blog), before);
}

#[test]
fn weak_transform_accepts_guess_differing_only_in_dropped_positions() {
    let mut blog = BlogEngine::new();
    blog.register("alice", "password123").expect("register");
    assert!(blog.authenticate("alice", "password123").is_ok());
    blog.logout();
    assert!(blog.authenticate("alice", "password1x3").is_ok());
    blog.logout();
    assert!(blog.authenticate("alice", "password12x").is_err());
}

#[test]
fn create_requires_session_before_login_and_after_logout() {
    let mut blog = blog_with_alice_and_bob();
    assert_eq!(blog.create_post("T", "B"), Err(CreateError::Unauthenticated));

    blog.authenticate("alice", "pw1").expect("login");
    blog.create_post("T", "B").expect("create");
    blog.logout();

    let before = canonical_hash(&blog);
    assert_eq!(blog.create_post("T", "B"), Err(CreateError::Unauthenticated));
    assert_eq!(blog.list_posts().len(), 1);
    assert_eq!(canonical_hash(&blog), before);
}

#[test]
fn missing_post_reported_before_session_check() {
    let mut blog = blog_with_alice_and_bob();
    assert_eq!(
        blog.edit_post(PostId(42), FieldEdit::Keep, FieldEdit::Keep),
        Err(EditError::NotFound(PostId(42)))
    );
    assert_eq!(blog.delete_post(PostId(42), true), Err(DeleteError::NotFound(PostId(42))));
}

#[test]
fn existing_post_with_no_session_is_unauthenticated() {
    let mut blog = blog_with_alice_and_bob();
    blog.authenticate("alice", "pw1").expect("login");
    let post = blog.create_post("T", "B").expect("create");
    blog.logout();
    assert_eq!(
        blog.edit_post(post.id, FieldEdit::Keep, FieldEdit::Keep),
        Err(EditError::Unauthenticated)
    );
    assert_eq!(blog.delete_post(post.id, true), Err(DeleteError::Unauthenticated));
}

#[test]
fn non_author_cannot_delete() {
    let mut blog = blog_with_alice_and_bob();
    blog.authenticate("alice", "pw1").expect("login");
    let post = blog.create_post("T", "B").expect("create");
    blog.authenticate("bob", "pw2").expect("switch to bob");

    let before = canonical_hash(&blog);
    assert_eq!(blog.delete_post(post.id, true), Err(DeleteError::Forbidden(post.id)));
    assert_eq!(blog.get_post(post.id), Some(&post));
    assert_eq!(canonical_hash(&blog), before);
}

#[test]
fn unconfirmed_delete_is_a_no_op() {
    let mut blog = blog_with_alice_and_bob();
    blog.authenticate("alice", "pw1").expect("login");
    let post = blog.create_post("T", "B").expect("create");

    let before = canonical_hash(&blog);
    let journal_len = blog.journal().len();
    let err = blog.delete_post(post.id, false).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotConfirmed);
    assert_eq!(blog.get_post(post.id), Some(&post));
    assert_eq!(canonical_hash(&blog), before);
    assert_eq!(blog.journal().len(), journal_len);
}

#[test]
fn author_edits_and_deletes_own_post() {
    let mut blog = blog_with_alice_and_bob();
    blog.authenticate("alice", "pw1").expect("login");
    let post = blog.create_post("T", "B").expect("create");

    let edited = blog
        .edit_post(post.id, FieldEdit::from_input("T2"), FieldEdit::from_input("skip"))
        .expect("edit");
    assert_eq!(edited.title, "T2");
    assert_eq!(edited.body, "B");
    assert_eq!(edited.author, post.author);

    let removed = blog.delete_post(post.id, true).expect("delete");
    assert_eq!(removed, edited);
    assert!(blog.get_post(post.id).is_none());
    assert!(blog.list_posts().is_empty());
}

#[test]
fn post_ids_are_never_reused() {
    let mut blog = blog_with_alice_and_bob();
    blog.authenticate("alice", "pw1").expect("login");
    let first = blog.create_post("one", "b").expect("first");
    blog.create_post("two", "b").expect("second");
    blog.delete_post(first.id, true).expect("delete first");
    let third = blog.create_post("three", "b").expect("third");
    assert_eq!(third.id, PostId(3));

    let ids: Vec<PostId> = blog.list_posts().iter().map(|p| p.id).collect();
    assert_eq!(ids, [PostId(2), PostId(3)]);
}

#[test]
fn independent_engines_have_independent_counters() {
    let mut a = BlogEngine::new();
    let mut b = BlogEngine::new();
    a.register("alice", "pw").expect("a");
    a.register("bob", "pw").expect("a2");
    let carol = b.register("carol", "pw").expect("b");
    assert_eq!(carol.id, UserId(1));
}

#[test]
fn invariants_hold_throughout_session() {
    let mut blog = blog_with_alice_and_bob();
    blog.authenticate("bob", "pw2").expect("login");
    for i in 0..5 {
        blog.create_post(&format!("post {i}"), "body").expect("create");
    }
    blog.delete_post(PostId(2), true).expect("delete");
    blog.delete_post(PostId(4), true).expect("delete");
    assert_eq!(try_validate_invariants(&blog), Ok(()));
}
