//! Access policy - who may read or mutate what.
//!
//! Pure predicates over an optional [`Actor`] and a resource. Services call the
//! `require_*`/`authorize_*` helpers, which turn a denied predicate into the
//! right [`DomainError`]: anonymous callers get `NotAuthenticated`, authenticated
//! non-owners get `PermissionDenied`.

use uuid::Uuid;

use crate::domain::{Comment, Follow, Group, Post};
use crate::error::DomainError;

/// The identity resolved from request credentials.
///
/// Resolved once per request and passed explicitly into every service call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub user_id: Uuid,
    pub username: String,
}

impl Actor {
    pub fn new(user_id: Uuid, username: impl Into<String>) -> Self {
        Self {
            user_id,
            username: username.into(),
        }
    }
}

/// A resource guarded by the access policy.
pub trait Protected {
    fn readable_by(&self, actor: Option<&Actor>) -> bool;
    fn mutable_by(&self, actor: Option<&Actor>) -> bool;
}

fn is_actor(actor: Option<&Actor>, user_id: Uuid) -> bool {
    actor.is_some_and(|a| a.user_id == user_id)
}

impl Protected for Group {
    fn readable_by(&self, _actor: Option<&Actor>) -> bool {
        true
    }

    fn mutable_by(&self, _actor: Option<&Actor>) -> bool {
        false
    }
}

impl Protected for Post {
    fn readable_by(&self, _actor: Option<&Actor>) -> bool {
        true
    }

    fn mutable_by(&self, actor: Option<&Actor>) -> bool {
        is_actor(actor, self.author_id)
    }
}

impl Protected for Comment {
    fn readable_by(&self, _actor: Option<&Actor>) -> bool {
        true
    }

    fn mutable_by(&self, actor: Option<&Actor>) -> bool {
        is_actor(actor, self.author_id)
    }
}

impl Protected for Follow {
    fn readable_by(&self, actor: Option<&Actor>) -> bool {
        is_actor(actor, self.user_id)
    }

    fn mutable_by(&self, actor: Option<&Actor>) -> bool {
        is_actor(actor, self.user_id)
    }
}

pub fn can_read<R: Protected>(actor: Option<&Actor>, resource: &R) -> bool {
    resource.readable_by(actor)
}

pub fn can_mutate<R: Protected>(actor: Option<&Actor>, resource: &R) -> bool {
    resource.mutable_by(actor)
}

/// Creation and private collections require an authenticated actor.
pub fn require_actor(actor: Option<&Actor>) -> Result<&Actor, DomainError> {
    actor.ok_or(DomainError::NotAuthenticated)
}

pub fn authorize_read<R: Protected>(
    actor: Option<&Actor>,
    resource: &R,
) -> Result<(), DomainError> {
    if can_read(actor, resource) {
        Ok(())
    } else if actor.is_none() {
        Err(DomainError::NotAuthenticated)
    } else {
        Err(DomainError::PermissionDenied)
    }
}

pub fn authorize_mutation<'a, R: Protected>(
    actor: Option<&'a Actor>,
    resource: &R,
) -> Result<&'a Actor, DomainError> {
    let actor = require_actor(actor)?;
    if can_mutate(Some(actor), resource) {
        Ok(actor)
    } else {
        tracing::debug!(actor = %actor.username, "Mutation denied: not the owner");
        Err(DomainError::PermissionDenied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PostChanges;

    fn post_by(author: &Actor) -> Post {
        Post::new(
            author.user_id,
            PostChanges {
                text: Some("hello".into()),
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_anyone_reads_posts() {
        let author = Actor::new(Uuid::new_v4(), "alice");
        let post = post_by(&author);
        assert!(can_read(None, &post));
        assert!(can_read(Some(&Actor::new(Uuid::new_v4(), "bob")), &post));
    }

    #[test]
    fn test_only_author_mutates_post() {
        let author = Actor::new(Uuid::new_v4(), "alice");
        let other = Actor::new(Uuid::new_v4(), "bob");
        let post = post_by(&author);

        assert!(can_mutate(Some(&author), &post));
        assert!(!can_mutate(Some(&other), &post));
        assert!(!can_mutate(None, &post));
    }

    #[test]
    fn test_authorize_mutation_errors() {
        let author = Actor::new(Uuid::new_v4(), "alice");
        let other = Actor::new(Uuid::new_v4(), "bob");
        let post = post_by(&author);

        assert!(matches!(
            authorize_mutation(None, &post),
            Err(DomainError::NotAuthenticated)
        ));
        assert!(matches!(
            authorize_mutation(Some(&other), &post),
            Err(DomainError::PermissionDenied)
        ));
        assert_eq!(authorize_mutation(Some(&author), &post).unwrap(), &author);
    }

    #[test]
    fn test_follow_is_private_to_owner() {
        let owner = Actor::new(Uuid::new_v4(), "alice");
        let other = Actor::new(Uuid::new_v4(), "bob");
        let follow = Follow::new(owner.user_id, other.user_id).unwrap();

        assert!(can_read(Some(&owner), &follow));
        assert!(!can_read(Some(&other), &follow));
        assert!(!can_read(None, &follow));
        assert!(matches!(
            authorize_read(Some(&other), &follow),
            Err(DomainError::PermissionDenied)
        ));
    }

    #[test]
    fn test_groups_are_read_only() {
        let group = Group::new("Rust".into(), "rust".into(), String::new());
        let actor = Actor::new(Uuid::new_v4(), "alice");
        assert!(can_read(None, &group));
        assert!(!can_mutate(Some(&actor), &group));
    }
}
