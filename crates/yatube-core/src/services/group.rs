use std::sync::Arc;

use uuid::Uuid;
use yatube_shared::dto::GroupResponse;

use crate::error::DomainError;
use crate::policy::{self, Actor};
use crate::ports::{GroupRepository, Repositories};
use crate::serializers::GroupSerializer;

/// Read-only group listing and lookup.
#[derive(Clone)]
pub struct GroupService {
    groups: Arc<dyn GroupRepository>,
    serializer: GroupSerializer,
}

impl GroupService {
    pub fn new(repos: &Repositories) -> Self {
        Self {
            groups: repos.groups.clone(),
            serializer: GroupSerializer,
        }
    }

    pub async fn list(&self, _actor: Option<&Actor>) -> Result<Vec<GroupResponse>, DomainError> {
        let groups = self.groups.list_groups().await?;
        Ok(groups.into_iter().map(|g| self.serializer.render(g)).collect())
    }

    pub async fn retrieve(
        &self,
        actor: Option<&Actor>,
        id: Uuid,
    ) -> Result<GroupResponse, DomainError> {
        let group = self
            .groups
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("group", id))?;
        policy::authorize_read(actor, &group)?;
        Ok(self.serializer.render(group))
    }
}
