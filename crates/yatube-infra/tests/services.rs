//! Resource service scenarios over the in-memory store.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;
use yatube_core::domain::{Follow, Group, User};
use yatube_core::error::RepoError;
use yatube_core::pagination::{Listing, Pagination};
use yatube_core::ports::{BaseRepository, FollowRepository, Repositories};
use yatube_core::services::{PostQuery, Services};
use yatube_core::{Actor, DomainError};
use yatube_infra::InMemoryStore;
use yatube_shared::dto::{CommentRequest, FollowRequest, PostRequest};

struct Fixture {
    repos: Repositories,
    services: Services,
}

/// Follow store whose existence check always misses, the way it does for a
/// request racing an identical one. Only the store's unique pair stops it.
struct StaleExistsCheck(Arc<dyn FollowRepository>);

#[async_trait]
impl BaseRepository<Follow, Uuid> for StaleExistsCheck {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Follow>, RepoError> {
        self.0.find_by_id(id).await
    }

    async fn insert(&self, follow: Follow) -> Result<Follow, RepoError> {
        self.0.insert(follow).await
    }

    async fn update(&self, follow: Follow) -> Result<Follow, RepoError> {
        self.0.update(follow).await
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.0.delete(id).await
    }
}

#[async_trait]
impl FollowRepository for StaleExistsCheck {
    async fn list_for_user(
        &self,
        user_id: Uuid,
        search: Option<&str>,
    ) -> Result<Vec<Follow>, RepoError> {
        self.0.list_for_user(user_id, search).await
    }

    async fn find_for_user(&self, user_id: Uuid, id: Uuid) -> Result<Option<Follow>, RepoError> {
        self.0.find_for_user(user_id, id).await
    }

    async fn exists(&self, _user_id: Uuid, _following_id: Uuid) -> Result<bool, RepoError> {
        Ok(false)
    }
}

impl Fixture {
    fn new() -> Self {
        Self::over(InMemoryStore::new().repositories())
    }

    /// Services whose duplicate-follow check never sees the existing row.
    fn racing() -> Self {
        let mut repos = InMemoryStore::new().repositories();
        repos.follows = Arc::new(StaleExistsCheck(repos.follows.clone()));
        Self::over(repos)
    }

    fn over(repos: Repositories) -> Self {
        let services = Services::new(&repos, Pagination::default());
        Self { repos, services }
    }

    async fn user(&self, username: &str) -> Actor {
        let user = User::new(
            username.to_string(),
            format!("{username}@example.com"),
            "not-a-real-hash".to_string(),
            String::new(),
            String::new(),
        );
        let user = self.repos.users.insert(user).await.unwrap();
        Actor::new(user.id, user.username)
    }

    async fn group(&self, slug: &str) -> Group {
        let group = Group::new(slug.to_uppercase(), slug.to_string(), String::new());
        self.repos.groups.insert(group).await.unwrap()
    }
}

fn post_text(text: &str) -> PostRequest {
    PostRequest {
        text: Some(text.to_string()),
        ..Default::default()
    }
}

fn comment_text(text: &str) -> CommentRequest {
    CommentRequest {
        text: Some(text.to_string()),
    }
}

fn follow(username: &str) -> FollowRequest {
    FollowRequest {
        following: Some(username.to_string()),
    }
}

fn results<T>(listing: &Listing<T>) -> &[T] {
    match listing {
        Listing::All(items) => items,
        Listing::Page { results, .. } => results,
    }
}

fn field_error(err: &DomainError, field: &str) -> Vec<String> {
    match err {
        DomainError::Validation(errors) => errors.messages(field).to_vec(),
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_post_lifecycle_keeps_author_and_pub_date() {
    let fx = Fixture::new();
    let alice = fx.user("alice").await;
    let bob = fx.user("bob").await;

    let created = fx
        .services
        .posts
        .create(Some(&alice), post_text("hello"))
        .await
        .unwrap();
    assert_eq!(created.author, "alice");
    assert_eq!(created.group, None);

    let stored = fx.repos.posts.find_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(stored.author_id, alice.user_id);

    let denied = fx
        .services
        .posts
        .update(Some(&bob), created.id, post_text("hijacked"), false)
        .await;
    assert!(matches!(denied, Err(DomainError::PermissionDenied)));
    let unchanged = fx.repos.posts.find_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(unchanged.text, "hello");

    let updated = fx
        .services
        .posts
        .update(Some(&alice), created.id, post_text("hello, world"), false)
        .await
        .unwrap();
    assert_eq!(updated.text, "hello, world");
    assert_eq!(updated.author, "alice");
    assert_eq!(updated.pub_date, created.pub_date);
}

#[tokio::test]
async fn test_anonymous_create_is_rejected_and_nothing_stored() {
    let fx = Fixture::new();
    let alice = fx.user("alice").await;
    let post = fx
        .services
        .posts
        .create(Some(&alice), post_text("hello"))
        .await
        .unwrap();

    let result = fx.services.posts.create(None, post_text("anon")).await;
    assert!(matches!(result, Err(DomainError::NotAuthenticated)));

    let result = fx
        .services
        .comments
        .create(None, post.id, comment_text("anon"))
        .await;
    assert!(matches!(result, Err(DomainError::NotAuthenticated)));

    let listing = fx.services.posts.list(None, PostQuery::default()).await.unwrap();
    assert_eq!(results(&listing).len(), 1);
    assert!(fx.services.comments.list(None, post.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_post_requires_text_and_existing_group() {
    let fx = Fixture::new();
    let alice = fx.user("alice").await;

    let err = fx
        .services
        .posts
        .create(Some(&alice), PostRequest::default())
        .await
        .unwrap_err();
    assert_eq!(field_error(&err, "text"), vec!["This field is required."]);

    let missing = Uuid::new_v4();
    let err = fx
        .services
        .posts
        .create(
            Some(&alice),
            PostRequest {
                group: Some(Some(missing)),
                ..post_text("with group")
            },
        )
        .await
        .unwrap_err();
    assert_eq!(
        field_error(&err, "group"),
        vec![format!("Invalid pk \"{missing}\" - object does not exist.")]
    );

    let cats = fx.group("cats").await;
    let post = fx
        .services
        .posts
        .create(
            Some(&alice),
            PostRequest {
                group: Some(Some(cats.id)),
                ..post_text("with group")
            },
        )
        .await
        .unwrap();
    assert_eq!(post.group, Some(cats.id));
}

#[tokio::test]
async fn test_partial_update_leaves_other_fields() {
    let fx = Fixture::new();
    let alice = fx.user("alice").await;
    let cats = fx.group("cats").await;
    let post = fx
        .services
        .posts
        .create(
            Some(&alice),
            PostRequest {
                group: Some(Some(cats.id)),
                ..post_text("hello")
            },
        )
        .await
        .unwrap();

    let patched = fx
        .services
        .posts
        .update(
            Some(&alice),
            post.id,
            PostRequest {
                image: Some(Some("posts/cat.png".to_string())),
                ..Default::default()
            },
            true,
        )
        .await
        .unwrap();
    assert_eq!(patched.text, "hello");
    assert_eq!(patched.group, Some(cats.id));
    assert_eq!(patched.image.as_deref(), Some("posts/cat.png"));

    let detached = fx
        .services
        .posts
        .update(
            Some(&alice),
            post.id,
            PostRequest {
                group: Some(None),
                ..Default::default()
            },
            true,
        )
        .await
        .unwrap();
    assert_eq!(detached.group, None);

    let err = fx
        .services
        .posts
        .update(Some(&alice), post.id, PostRequest::default(), false)
        .await
        .unwrap_err();
    assert!(!field_error(&err, "text").is_empty());
}

#[tokio::test]
async fn test_delete_by_non_author_is_denied() {
    let fx = Fixture::new();
    let alice = fx.user("alice").await;
    let bob = fx.user("bob").await;
    let post = fx
        .services
        .posts
        .create(Some(&alice), post_text("hello"))
        .await
        .unwrap();

    let denied = fx.services.posts.delete(Some(&bob), post.id).await;
    assert!(matches!(denied, Err(DomainError::PermissionDenied)));
    let anon = fx.services.posts.delete(None, post.id).await;
    assert!(matches!(anon, Err(DomainError::NotAuthenticated)));
    assert!(fx.services.posts.retrieve(None, post.id).await.is_ok());

    fx.services.posts.delete(Some(&alice), post.id).await.unwrap();
    let gone = fx.services.posts.retrieve(None, post.id).await;
    assert!(matches!(gone, Err(DomainError::NotFound { .. })));
}

#[tokio::test]
async fn test_post_listing_filters_and_paginates() {
    let fx = Fixture::new();
    let alice = fx.user("alice").await;
    let bob = fx.user("bob").await;
    for (actor, text) in [
        (&alice, "Rust is fun"),
        (&bob, "rust and tokio"),
        (&alice, "Gardening notes"),
    ] {
        fx.services
            .posts
            .create(Some(actor), post_text(text))
            .await
            .unwrap();
    }

    let all = fx.services.posts.list(None, PostQuery::default()).await.unwrap();
    assert!(matches!(all, Listing::All(ref items) if items.len() == 3));

    let search = fx
        .services
        .posts
        .list(
            None,
            PostQuery {
                search: Some("RUST".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(results(&search).len(), 2);

    let by_author = fx
        .services
        .posts
        .list(
            None,
            PostQuery {
                author: Some("alice".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(results(&by_author).iter().all(|p| p.author == "alice"));
    assert_eq!(results(&by_author).len(), 2);

    let page = fx
        .services
        .posts
        .list(
            None,
            PostQuery {
                limit: Some("2".to_string()),
                offset: Some("1".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    match page {
        Listing::Page {
            count,
            request,
            results,
        } => {
            assert_eq!(count, 3);
            assert_eq!(request.limit, 2);
            assert_eq!(results.len(), 2);
            assert_eq!(results[0].text, "rust and tokio");
        }
        other => panic!("expected a page, got {other:?}"),
    }
}

#[tokio::test]
async fn test_comments_of_missing_post_are_not_found() {
    let fx = Fixture::new();
    let alice = fx.user("alice").await;
    let missing = Uuid::new_v4();

    let list = fx.services.comments.list(None, missing).await;
    assert!(matches!(
        list,
        Err(DomainError::NotFound {
            entity_type: "post",
            ..
        })
    ));

    // Missing parent wins over missing credentials and bad payloads.
    let anon = fx
        .services
        .comments
        .create(None, missing, CommentRequest::default())
        .await;
    assert!(matches!(anon, Err(DomainError::NotFound { .. })));

    let create = fx
        .services
        .comments
        .create(Some(&alice), missing, CommentRequest::default())
        .await;
    assert!(matches!(create, Err(DomainError::NotFound { .. })));
}

#[tokio::test]
async fn test_comment_ownership_and_scoping() {
    let fx = Fixture::new();
    let alice = fx.user("alice").await;
    let bob = fx.user("bob").await;
    let post = fx
        .services
        .posts
        .create(Some(&alice), post_text("hello"))
        .await
        .unwrap();
    let other_post = fx
        .services
        .posts
        .create(Some(&alice), post_text("another"))
        .await
        .unwrap();

    let comment = fx
        .services
        .comments
        .create(Some(&bob), post.id, comment_text("nice"))
        .await
        .unwrap();
    assert_eq!(comment.author, "bob");
    assert_eq!(comment.post, post.id);

    // The post author does not own the comment.
    let denied = fx
        .services
        .comments
        .update(Some(&alice), post.id, comment.id, comment_text("edited"), true)
        .await;
    assert!(matches!(denied, Err(DomainError::PermissionDenied)));

    // A comment is only reachable under its own post.
    let elsewhere = fx
        .services
        .comments
        .retrieve(None, other_post.id, comment.id)
        .await;
    assert!(matches!(elsewhere, Err(DomainError::NotFound { .. })));

    let edited = fx
        .services
        .comments
        .update(Some(&bob), post.id, comment.id, comment_text("edited"), false)
        .await
        .unwrap();
    assert_eq!(edited.text, "edited");
    assert_eq!(edited.created, comment.created);

    fx.services
        .comments
        .delete(Some(&bob), post.id, comment.id)
        .await
        .unwrap();
    assert!(fx.services.comments.list(None, post.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_follow_scenario() {
    let fx = Fixture::new();
    let alice = fx.user("alice").await;
    fx.user("bob").await;

    let created = fx
        .services
        .follows
        .create(Some(&alice), follow("bob"))
        .await
        .unwrap();
    assert_eq!(created.user, "alice");
    assert_eq!(created.following, "bob");

    let err = fx
        .services
        .follows
        .create(Some(&alice), follow("bob"))
        .await
        .unwrap_err();
    assert_eq!(
        field_error(&err, "following"),
        vec!["You are already following this user."]
    );

    let err = fx
        .services
        .follows
        .create(Some(&alice), follow("alice"))
        .await
        .unwrap_err();
    assert_eq!(
        field_error(&err, "following"),
        vec!["You cannot follow yourself."]
    );

    let err = fx
        .services
        .follows
        .create(Some(&alice), follow("nobody"))
        .await
        .unwrap_err();
    assert_eq!(
        field_error(&err, "following"),
        vec!["Object with username=nobody does not exist."]
    );

    let follows = fx.services.follows.list(Some(&alice), None).await.unwrap();
    assert_eq!(follows, vec![created]);
}

#[tokio::test]
async fn test_duplicate_follow_past_exists_check_is_conflict() {
    let fx = Fixture::racing();
    let alice = fx.user("alice").await;
    fx.user("bob").await;

    fx.services
        .follows
        .create(Some(&alice), follow("bob"))
        .await
        .unwrap();
    let err = fx
        .services
        .follows
        .create(Some(&alice), follow("bob"))
        .await
        .unwrap_err();

    assert!(
        matches!(&err, DomainError::Conflict(msg) if msg == Follow::ALREADY_FOLLOWING),
        "got {err:?}"
    );
    let stored = fx.repos.follows.list_for_user(alice.user_id, None).await.unwrap();
    assert_eq!(stored.len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_duplicate_follows_persist_once() {
    let fx = Fixture::racing();
    let alice = fx.user("alice").await;
    fx.user("bob").await;

    let spawn_follow = || {
        let follows = fx.services.follows.clone();
        let actor = alice.clone();
        tokio::spawn(async move { follows.create(Some(&actor), follow("bob")).await })
    };
    let (first, second) = tokio::join!(spawn_follow(), spawn_follow());
    let outcomes = [first.unwrap(), second.unwrap()];

    assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
    assert_eq!(
        outcomes
            .iter()
            .filter(|r| matches!(r, Err(DomainError::Conflict(_))))
            .count(),
        1
    );
    let stored = fx.repos.follows.list_for_user(alice.user_id, None).await.unwrap();
    assert_eq!(stored.len(), 1);
}

#[tokio::test]
async fn test_follow_by_deleted_user_is_not_a_duplicate() {
    let fx = Fixture::new();
    let alice = fx.user("alice").await;
    fx.user("bob").await;
    fx.repos.users.delete(alice.user_id).await.unwrap();

    let err = fx
        .services
        .follows
        .create(Some(&alice), follow("bob"))
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::Internal(_)), "got {err:?}");
}

#[tokio::test]
async fn test_follows_are_private_to_their_owner() {
    let fx = Fixture::new();
    let alice = fx.user("alice").await;
    let bob = fx.user("bob").await;
    fx.user("carol").await;

    let own = fx
        .services
        .follows
        .create(Some(&alice), follow("carol"))
        .await
        .unwrap();

    assert!(fx.services.follows.list(Some(&bob), None).await.unwrap().is_empty());
    let peek = fx.services.follows.retrieve(Some(&bob), own.id).await;
    assert!(matches!(peek, Err(DomainError::NotFound { .. })));
    let steal = fx.services.follows.delete(Some(&bob), own.id).await;
    assert!(matches!(steal, Err(DomainError::NotFound { .. })));
    let anon = fx.services.follows.list(None, None).await;
    assert!(matches!(anon, Err(DomainError::NotAuthenticated)));

    let searched = fx
        .services
        .follows
        .list(Some(&alice), Some("CAR"))
        .await
        .unwrap();
    assert_eq!(searched.len(), 1);
    assert!(fx
        .services
        .follows
        .list(Some(&alice), Some("bob"))
        .await
        .unwrap()
        .is_empty());

    fx.services.follows.delete(Some(&alice), own.id).await.unwrap();
    assert!(fx.services.follows.list(Some(&alice), None).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_groups_are_readable_by_anyone() {
    let fx = Fixture::new();
    let cats = fx.group("cats").await;
    fx.group("dogs").await;

    let groups = fx.services.groups.list(None).await.unwrap();
    assert_eq!(groups.len(), 2);

    let one = fx.services.groups.retrieve(None, cats.id).await.unwrap();
    assert_eq!(one.slug, "cats");

    let missing = fx.services.groups.retrieve(None, Uuid::new_v4()).await;
    assert!(matches!(missing, Err(DomainError::NotFound { .. })));
}

#[tokio::test]
async fn test_registration_validation() {
    let fx = Fixture::new();
    fx.user("alice").await;

    let err = fx
        .services
        .users
        .parse(yatube_shared::dto::RegisterUserRequest {
            username: "alice".to_string(),
            password: "short".to_string(),
            email: "nope".to_string(),
            ..Default::default()
        })
        .await
        .unwrap_err();

    assert_eq!(
        field_error(&err, "username"),
        vec!["A user with that username already exists."]
    );
    assert_eq!(field_error(&err, "password").len(), 1);
    assert_eq!(field_error(&err, "email").len(), 1);
}
