use std::sync::Arc;

use uuid::Uuid;
use yatube_shared::dto::{FollowRequest, FollowResponse};

use super::vanished;
use crate::domain::Follow;
use crate::error::{DomainError, RepoError};
use crate::policy::{self, Actor};
use crate::ports::{FollowRepository, Repositories};
use crate::serializers::FollowSerializer;

/// The caller's own follow relationships. Every operation requires an actor,
/// and only follows owned by that actor are ever visible.
#[derive(Clone)]
pub struct FollowService {
    follows: Arc<dyn FollowRepository>,
    serializer: FollowSerializer,
}

impl FollowService {
    pub fn new(repos: &Repositories) -> Self {
        Self {
            follows: repos.follows.clone(),
            serializer: FollowSerializer::new(repos.users.clone(), repos.follows.clone()),
        }
    }

    pub async fn list(
        &self,
        actor: Option<&Actor>,
        search: Option<&str>,
    ) -> Result<Vec<FollowResponse>, DomainError> {
        let actor = policy::require_actor(actor)?;
        let search = search.filter(|s| !s.trim().is_empty());

        let follows = self.follows.list_for_user(actor.user_id, search).await?;
        self.serializer.render_many(follows).await
    }

    pub async fn retrieve(
        &self,
        actor: Option<&Actor>,
        id: Uuid,
    ) -> Result<FollowResponse, DomainError> {
        let actor = policy::require_actor(actor)?;
        let follow = self.find_owned(actor, id).await?;
        self.serializer.render(follow).await
    }

    pub async fn create(
        &self,
        actor: Option<&Actor>,
        input: FollowRequest,
    ) -> Result<FollowResponse, DomainError> {
        let actor = policy::require_actor(actor)?;
        let following = self.serializer.parse(actor, input).await?;
        let follow = Follow::new(actor.user_id, following.id)?;

        // The unique (user, following) constraint is the authority; a racing
        // duplicate that slipped past the serializer's check lands here.
        let follow = self.follows.insert(follow).await.map_err(|err| match err {
            RepoError::Constraint(_) => {
                tracing::warn!(
                    user = %actor.username,
                    following = %following.username,
                    "Concurrent duplicate follow rejected by store"
                );
                DomainError::Conflict(Follow::ALREADY_FOLLOWING.to_string())
            }
            other => other.into(),
        })?;
        tracing::info!(
            follow_id = %follow.id,
            user = %actor.username,
            following = %following.username,
            "Follow created"
        );

        self.serializer.render(follow).await
    }

    pub async fn delete(&self, actor: Option<&Actor>, id: Uuid) -> Result<(), DomainError> {
        let actor = policy::require_actor(actor)?;
        let follow = self.find_owned(actor, id).await?;
        policy::authorize_mutation(Some(actor), &follow)?;

        self.follows.delete(id).await.map_err(vanished("follow", id))?;
        tracing::info!(follow_id = %id, user = %actor.username, "Follow deleted");
        Ok(())
    }

    /// Follows of other users are reported as missing, not forbidden.
    async fn find_owned(&self, actor: &Actor, id: Uuid) -> Result<Follow, DomainError> {
        self.follows
            .find_for_user(actor.user_id, id)
            .await?
            .ok_or_else(|| DomainError::not_found("follow", id))
    }
}
