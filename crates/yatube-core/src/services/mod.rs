//! Resource services - the transport-independent half of each resource handler.
//!
//! Every operation runs the same pipeline and stops at the first failure:
//! resolve path-scoped parents, check the access policy, validate through the
//! serializer, then touch the store. Nothing is persisted unless every earlier
//! stage passed.

mod comment;
mod follow;
mod group;
mod post;

use uuid::Uuid;

use crate::error::{DomainError, RepoError};
use crate::pagination::Pagination;
use crate::ports::Repositories;
use crate::serializers::UserSerializer;

pub use comment::CommentService;
pub use follow::FollowService;
pub use group::GroupService;
pub use post::{PostQuery, PostService};

/// All resource services, wired to one set of repositories.
#[derive(Clone)]
pub struct Services {
    pub posts: PostService,
    pub comments: CommentService,
    pub follows: FollowService,
    pub groups: GroupService,
    pub users: UserSerializer,
}

impl Services {
    pub fn new(repos: &Repositories, pagination: Pagination) -> Self {
        Self {
            posts: PostService::new(repos, pagination),
            comments: CommentService::new(repos),
            follows: FollowService::new(repos),
            groups: GroupService::new(repos),
            users: UserSerializer::new(repos.users.clone()),
        }
    }
}

/// Map a store `NotFound` (row deleted under us) to a domain `NotFound`.
fn vanished(entity_type: &'static str, id: Uuid) -> impl FnOnce(RepoError) -> DomainError {
    move |err| match err {
        RepoError::NotFound => DomainError::not_found(entity_type, id),
        other => other.into(),
    }
}
