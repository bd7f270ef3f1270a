use std::sync::Arc;

use yatube_shared::dto::{FollowRequest, FollowResponse};

use super::{REQUIRED, username_of};
use crate::domain::{Follow, User};
use crate::error::{DomainError, FieldErrors};
use crate::policy::Actor;
use crate::ports::{FollowRepository, UserRepository};

/// Follow payloads: only `following` (a username) is writable; `user` is the actor.
#[derive(Clone)]
pub struct FollowSerializer {
    users: Arc<dyn UserRepository>,
    follows: Arc<dyn FollowRepository>,
}

impl FollowSerializer {
    pub fn new(users: Arc<dyn UserRepository>, follows: Arc<dyn FollowRepository>) -> Self {
        Self { users, follows }
    }

    /// Resolve and validate the user to follow.
    ///
    /// Checks run in order and stop at the first failure: the username must
    /// exist, must not be the actor, and must not already be followed. The
    /// duplicate check is only a fast path; the store's unique constraint is
    /// what holds under concurrent requests.
    pub async fn parse(&self, actor: &Actor, input: FollowRequest) -> Result<User, DomainError> {
        let username = match input.following.filter(|u| !u.trim().is_empty()) {
            Some(username) => username,
            None => return Err(FieldErrors::single("following", REQUIRED).into()),
        };

        let following = self.users.find_by_username(&username).await?.ok_or_else(|| {
            FieldErrors::single(
                "following",
                format!("Object with username={} does not exist.", username),
            )
        })?;

        if following.id == actor.user_id {
            return Err(FieldErrors::single("following", Follow::SELF_FOLLOW).into());
        }

        if self.follows.exists(actor.user_id, following.id).await? {
            return Err(FieldErrors::single("following", Follow::ALREADY_FOLLOWING).into());
        }

        Ok(following)
    }

    pub async fn render(&self, follow: Follow) -> Result<FollowResponse, DomainError> {
        let mut rendered = self.render_many(vec![follow]).await?;
        rendered
            .pop()
            .ok_or_else(|| DomainError::Internal("follow lost while rendering".into()))
    }

    pub async fn render_many(
        &self,
        follows: Vec<Follow>,
    ) -> Result<Vec<FollowResponse>, DomainError> {
        let ids: Vec<_> = follows
            .iter()
            .flat_map(|f| [f.user_id, f.following_id])
            .collect();
        let names = self.users.usernames(&ids).await?;

        follows
            .into_iter()
            .map(|f| {
                Ok(FollowResponse {
                    id: f.id,
                    user: username_of(&names, f.user_id)?,
                    following: username_of(&names, f.following_id)?,
                })
            })
            .collect()
    }
}
