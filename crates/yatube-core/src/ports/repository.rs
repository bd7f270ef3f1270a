use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Comment, Follow, Group, Post, User};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Insert a new entity. Uniqueness violations surface as [`RepoError::Constraint`],
    /// dangling foreign keys as [`RepoError::MissingReference`].
    async fn insert(&self, entity: T) -> Result<T, RepoError>;

    /// Overwrite an existing entity. [`RepoError::NotFound`] if it is gone.
    async fn update(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;

    /// Batch id → username lookup used when rendering authors.
    async fn usernames(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, String>, RepoError>;
}

/// Group repository. Groups are read-only through the API.
#[async_trait]
pub trait GroupRepository: BaseRepository<Group, Uuid> {
    /// All groups ordered by title.
    async fn list_groups(&self) -> Result<Vec<Group>, RepoError>;
}

/// Typed filter for post listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostFilter {
    /// Free-text search over post text and author username.
    pub search: Option<String>,
    /// Exact author username.
    pub author_username: Option<String>,
    pub limit: Option<u64>,
    pub offset: u64,
}

/// One slice of a listing plus the total number of matches.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
}

/// Post repository.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// Posts ordered by `pub_date`, then id.
    async fn list_posts(&self, filter: &PostFilter) -> Result<Page<Post>, RepoError>;
}

/// Comment repository. Comments are always addressed through their post.
#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, Uuid> {
    /// Comments of a post ordered by creation time.
    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError>;

    async fn find_in_post(&self, post_id: Uuid, id: Uuid) -> Result<Option<Comment>, RepoError>;
}

/// Follow repository. The store must keep `(user_id, following_id)` unique.
#[async_trait]
pub trait FollowRepository: BaseRepository<Follow, Uuid> {
    /// Follows owned by `user_id`, optionally filtered by followed-username search.
    async fn list_for_user(
        &self,
        user_id: Uuid,
        search: Option<&str>,
    ) -> Result<Vec<Follow>, RepoError>;

    async fn find_for_user(&self, user_id: Uuid, id: Uuid) -> Result<Option<Follow>, RepoError>;

    async fn exists(&self, user_id: Uuid, following_id: Uuid) -> Result<bool, RepoError>;
}

/// One handle per entity store, built by whichever backend is active.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub groups: Arc<dyn GroupRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub follows: Arc<dyn FollowRepository>,
}

/// Split a search query into lowercase terms on whitespace and commas.
///
/// Every term has to match for a record to be included.
pub fn search_terms(query: &str) -> Vec<String> {
    query
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|term| !term.is_empty())
        .map(str::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_terms() {
        assert_eq!(search_terms("  Hello, world  rust"), vec!["hello", "world", "rust"]);
        assert!(search_terms(" , ").is_empty());
    }
}
