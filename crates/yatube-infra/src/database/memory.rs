//! In-memory entity store - used when no database is configured, and in tests.
//!
//! All five tables live behind one async `RwLock`, so every write (including
//! its uniqueness and reference checks) is atomic with respect to other writes.
//! Data is lost on process restart.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use yatube_core::domain::{Comment, Follow, Group, Post, User};
use yatube_core::error::RepoError;
use yatube_core::ports::{
    BaseRepository, CommentRepository, FollowRepository, GroupRepository, Page, PostFilter,
    PostRepository, Repositories, UserRepository, search_terms,
};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    groups: HashMap<Uuid, Group>,
    posts: HashMap<Uuid, Post>,
    comments: HashMap<Uuid, Comment>,
    follows: HashMap<Uuid, Follow>,
}

type Shared = Arc<RwLock<Tables>>;

fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

impl Tables {
    fn username(&self, user_id: Uuid) -> &str {
        self.users
            .get(&user_id)
            .map(|u| u.username.as_str())
            .unwrap_or_default()
    }

    fn username_taken(&self, user: &User) -> bool {
        self.users
            .values()
            .any(|u| u.id != user.id && u.username == user.username)
    }

    fn slug_taken(&self, group: &Group) -> bool {
        self.groups
            .values()
            .any(|g| g.id != group.id && g.slug == group.slug)
    }

    fn check_post_refs(&self, post: &Post) -> Result<(), RepoError> {
        if !self.users.contains_key(&post.author_id) {
            return Err(RepoError::MissingReference("post author does not exist".into()));
        }
        if let Some(group_id) = post.group_id {
            if !self.groups.contains_key(&group_id) {
                return Err(RepoError::MissingReference("post group does not exist".into()));
            }
        }
        Ok(())
    }

    fn check_comment_refs(&self, comment: &Comment) -> Result<(), RepoError> {
        if !self.posts.contains_key(&comment.post_id) {
            return Err(RepoError::MissingReference("comment post does not exist".into()));
        }
        if !self.users.contains_key(&comment.author_id) {
            return Err(RepoError::MissingReference("comment author does not exist".into()));
        }
        Ok(())
    }

    fn delete_post_cascade(&mut self, post_id: Uuid) {
        self.posts.remove(&post_id);
        self.comments.retain(|_, c| c.post_id != post_id);
    }
}

/// The in-memory backend. Cheap to clone; clones share the same tables.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Shared,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Repository handles over this store.
    pub fn repositories(&self) -> Repositories {
        Repositories {
            users: Arc::new(InMemoryUserRepository {
                tables: self.tables.clone(),
            }),
            groups: Arc::new(InMemoryGroupRepository {
                tables: self.tables.clone(),
            }),
            posts: Arc::new(InMemoryPostRepository {
                tables: self.tables.clone(),
            }),
            comments: Arc::new(InMemoryCommentRepository {
                tables: self.tables.clone(),
            }),
            follows: Arc::new(InMemoryFollowRepository {
                tables: self.tables.clone(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

pub struct InMemoryUserRepository {
    tables: Shared,
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn insert(&self, user: User) -> Result<User, RepoError> {
        let mut tables = self.tables.write().await;
        if tables.users.contains_key(&user.id) || tables.username_taken(&user) {
            return Err(RepoError::Constraint("username already exists".into()));
        }
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, user: User) -> Result<User, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&user.id) {
            return Err(RepoError::NotFound);
        }
        if tables.username_taken(&user) {
            return Err(RepoError::Constraint("username already exists".into()));
        }
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        if tables.users.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }
        let owned: Vec<Uuid> = tables
            .posts
            .values()
            .filter(|p| p.author_id == id)
            .map(|p| p.id)
            .collect();
        for post_id in owned {
            tables.delete_post_cascade(post_id);
        }
        tables.comments.retain(|_, c| c.author_id != id);
        tables
            .follows
            .retain(|_, f| f.user_id != id && f.following_id != id);
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn usernames(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, String>, RepoError> {
        let tables = self.tables.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| tables.users.get(id).map(|u| (*id, u.username.clone())))
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Groups
// ---------------------------------------------------------------------------

pub struct InMemoryGroupRepository {
    tables: Shared,
}

#[async_trait]
impl BaseRepository<Group, Uuid> for InMemoryGroupRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Group>, RepoError> {
        Ok(self.tables.read().await.groups.get(&id).cloned())
    }

    async fn insert(&self, group: Group) -> Result<Group, RepoError> {
        let mut tables = self.tables.write().await;
        if tables.groups.contains_key(&group.id) || tables.slug_taken(&group) {
            return Err(RepoError::Constraint("group slug already exists".into()));
        }
        tables.groups.insert(group.id, group.clone());
        Ok(group)
    }

    async fn update(&self, group: Group) -> Result<Group, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.groups.contains_key(&group.id) {
            return Err(RepoError::NotFound);
        }
        if tables.slug_taken(&group) {
            return Err(RepoError::Constraint("group slug already exists".into()));
        }
        tables.groups.insert(group.id, group.clone());
        Ok(group)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        if tables.groups.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }
        for post in tables.posts.values_mut() {
            if post.group_id == Some(id) {
                post.group_id = None;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl GroupRepository for InMemoryGroupRepository {
    async fn list_groups(&self) -> Result<Vec<Group>, RepoError> {
        let tables = self.tables.read().await;
        let mut groups: Vec<Group> = tables.groups.values().cloned().collect();
        groups.sort_by(|a, b| a.title.cmp(&b.title).then(a.id.cmp(&b.id)));
        Ok(groups)
    }
}

// ---------------------------------------------------------------------------
// Posts
// ---------------------------------------------------------------------------

pub struct InMemoryPostRepository {
    tables: Shared,
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.tables.read().await.posts.get(&id).cloned())
    }

    async fn insert(&self, post: Post) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;
        if tables.posts.contains_key(&post.id) {
            return Err(RepoError::Constraint("post already exists".into()));
        }
        tables.check_post_refs(&post)?;
        tables.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn update(&self, post: Post) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.posts.contains_key(&post.id) {
            return Err(RepoError::NotFound);
        }
        tables.check_post_refs(&post)?;
        tables.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.posts.contains_key(&id) {
            return Err(RepoError::NotFound);
        }
        tables.delete_post_cascade(id);
        Ok(())
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn list_posts(&self, filter: &PostFilter) -> Result<Page<Post>, RepoError> {
        let tables = self.tables.read().await;
        let terms = filter.search.as_deref().map(search_terms).unwrap_or_default();

        let mut matched: Vec<&Post> = tables
            .posts
            .values()
            .filter(|post| {
                filter
                    .author_username
                    .as_deref()
                    .is_none_or(|name| tables.username(post.author_id) == name)
            })
            .filter(|post| {
                terms.iter().all(|term| {
                    contains_ci(&post.text, term)
                        || contains_ci(tables.username(post.author_id), term)
                })
            })
            .collect();
        matched.sort_by(|a, b| a.pub_date.cmp(&b.pub_date).then(a.id.cmp(&b.id)));

        let total = matched.len() as u64;
        let offset = usize::try_from(filter.offset).unwrap_or(usize::MAX);
        let limit = filter
            .limit
            .map_or(usize::MAX, |l| usize::try_from(l).unwrap_or(usize::MAX));
        let items = matched
            .into_iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect();

        Ok(Page { items, total })
    }
}

// ---------------------------------------------------------------------------
// Comments
// ---------------------------------------------------------------------------

pub struct InMemoryCommentRepository {
    tables: Shared,
}

#[async_trait]
impl BaseRepository<Comment, Uuid> for InMemoryCommentRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, RepoError> {
        Ok(self.tables.read().await.comments.get(&id).cloned())
    }

    async fn insert(&self, comment: Comment) -> Result<Comment, RepoError> {
        let mut tables = self.tables.write().await;
        if tables.comments.contains_key(&comment.id) {
            return Err(RepoError::Constraint("comment already exists".into()));
        }
        tables.check_comment_refs(&comment)?;
        tables.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn update(&self, comment: Comment) -> Result<Comment, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.comments.contains_key(&comment.id) {
            return Err(RepoError::NotFound);
        }
        tables.check_comment_refs(&comment)?;
        tables.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables
            .comments
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl CommentRepository for InMemoryCommentRepository {
    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let tables = self.tables.read().await;
        let mut comments: Vec<Comment> = tables
            .comments
            .values()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| a.created.cmp(&b.created).then(a.id.cmp(&b.id)));
        Ok(comments)
    }

    async fn find_in_post(&self, post_id: Uuid, id: Uuid) -> Result<Option<Comment>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .comments
            .get(&id)
            .filter(|c| c.post_id == post_id)
            .cloned())
    }
}

// ---------------------------------------------------------------------------
// Follows
// ---------------------------------------------------------------------------

pub struct InMemoryFollowRepository {
    tables: Shared,
}

#[async_trait]
impl BaseRepository<Follow, Uuid> for InMemoryFollowRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Follow>, RepoError> {
        Ok(self.tables.read().await.follows.get(&id).cloned())
    }

    async fn insert(&self, follow: Follow) -> Result<Follow, RepoError> {
        let mut tables = self.tables.write().await;
        // Unique (user_id, following_id), checked under the write lock.
        let duplicate = tables.follows.values().any(|f| {
            f.id == follow.id
                || (f.user_id == follow.user_id && f.following_id == follow.following_id)
        });
        if duplicate {
            return Err(RepoError::Constraint(
                "follows_user_following_key violated".into(),
            ));
        }
        if !tables.users.contains_key(&follow.user_id)
            || !tables.users.contains_key(&follow.following_id)
        {
            return Err(RepoError::MissingReference("follow user does not exist".into()));
        }
        tables.follows.insert(follow.id, follow.clone());
        Ok(follow)
    }

    async fn update(&self, _follow: Follow) -> Result<Follow, RepoError> {
        Err(RepoError::Query("follows are immutable".into()))
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables
            .follows
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl FollowRepository for InMemoryFollowRepository {
    async fn list_for_user(
        &self,
        user_id: Uuid,
        search: Option<&str>,
    ) -> Result<Vec<Follow>, RepoError> {
        let tables = self.tables.read().await;
        let terms = search.map(search_terms).unwrap_or_default();

        let mut follows: Vec<Follow> = tables
            .follows
            .values()
            .filter(|f| f.user_id == user_id)
            .filter(|f| {
                let name = tables.username(f.following_id);
                terms.iter().all(|term| contains_ci(name, term))
            })
            .cloned()
            .collect();
        follows.sort_by(|a, b| a.created.cmp(&b.created).then(a.id.cmp(&b.id)));
        Ok(follows)
    }

    async fn find_for_user(&self, user_id: Uuid, id: Uuid) -> Result<Option<Follow>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .follows
            .get(&id)
            .filter(|f| f.user_id == user_id)
            .cloned())
    }

    async fn exists(&self, user_id: Uuid, following_id: Uuid) -> Result<bool, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .follows
            .values()
            .any(|f| f.user_id == user_id && f.following_id == following_id))
    }
}
