//! PostgreSQL repository implementations.

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Func, IntoColumnRef, LikeExpr, SimpleExpr};
use sea_orm::{
    ColumnTrait, Condition, EntityTrait, JoinType, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, RelationTrait,
};
use uuid::Uuid;

use yatube_core::domain::{Comment, Follow, Group, Post, User};
use yatube_core::error::RepoError;
use yatube_core::ports::{
    CommentRepository, FollowRepository, GroupRepository, Page, PostFilter, PostRepository,
    Repositories, UserRepository, search_terms,
};

use super::entity::comment::{self, Entity as CommentEntity};
use super::entity::follow::{self, Entity as FollowEntity};
use super::entity::group::{self, Entity as GroupEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, map_db_err};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL group repository.
pub type PostgresGroupRepository = PostgresBaseRepository<GroupEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// PostgreSQL comment repository.
pub type PostgresCommentRepository = PostgresBaseRepository<CommentEntity>;

/// PostgreSQL follow repository.
pub type PostgresFollowRepository = PostgresBaseRepository<FollowEntity>;

/// Repository handles over one connection pool.
pub fn postgres_repositories(db: &sea_orm::DbConn) -> Repositories {
    Repositories {
        users: std::sync::Arc::new(PostgresUserRepository::new(db.clone())),
        groups: std::sync::Arc::new(PostgresGroupRepository::new(db.clone())),
        posts: std::sync::Arc::new(PostgresPostRepository::new(db.clone())),
        comments: std::sync::Arc::new(PostgresCommentRepository::new(db.clone())),
        follows: std::sync::Arc::new(PostgresFollowRepository::new(db.clone())),
    }
}

/// Case-insensitive substring match. LIKE wildcards in `term` are matched literally.
fn icontains<C: IntoColumnRef>(column: C, term: &str) -> SimpleExpr {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    Expr::expr(Func::lower(Expr::col(column)))
        .like(LikeExpr::new(format!("%{}%", escaped.to_lowercase())).escape('\\'))
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(username = %username, "Finding user by username");

        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn usernames(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, String>, RepoError> {
        let mut unique = ids.to_vec();
        unique.sort_unstable();
        unique.dedup();
        if unique.is_empty() {
            return Ok(HashMap::new());
        }

        let users = UserEntity::find()
            .filter(user::Column::Id.is_in(unique))
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(users.into_iter().map(|u| (u.id, u.username)).collect())
    }
}

#[async_trait]
impl GroupRepository for PostgresGroupRepository {
    async fn list_groups(&self) -> Result<Vec<Group>, RepoError> {
        let result = GroupEntity::find()
            .order_by_asc(group::Column::Title)
            .order_by_asc(group::Column::Id)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn list_posts(&self, filter: &PostFilter) -> Result<Page<Post>, RepoError> {
        let mut query =
            PostEntity::find().join(JoinType::InnerJoin, post::Relation::Author.def());

        for term in filter.search.as_deref().map(search_terms).unwrap_or_default() {
            query = query.filter(
                Condition::any()
                    .add(icontains((post::Entity, post::Column::Text), &term))
                    .add(icontains((user::Entity, user::Column::Username), &term)),
            );
        }
        if let Some(author) = filter.author_username.as_deref() {
            query = query.filter(user::Column::Username.eq(author));
        }

        let total = query.clone().count(&self.db).await.map_err(map_db_err)?;

        let result = query
            .order_by_asc(post::Column::PubDate)
            .order_by_asc(post::Column::Id)
            .offset(filter.offset)
            .limit(filter.limit)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(Page {
            items: result.into_iter().map(Into::into).collect(),
            total,
        })
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let result = CommentEntity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .order_by_asc(comment::Column::Created)
            .order_by_asc(comment::Column::Id)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_in_post(&self, post_id: Uuid, id: Uuid) -> Result<Option<Comment>, RepoError> {
        let result = CommentEntity::find_by_id(id)
            .filter(comment::Column::PostId.eq(post_id))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }
}

#[async_trait]
impl FollowRepository for PostgresFollowRepository {
    async fn list_for_user(
        &self,
        user_id: Uuid,
        search: Option<&str>,
    ) -> Result<Vec<Follow>, RepoError> {
        let mut query = FollowEntity::find()
            .join(JoinType::InnerJoin, follow::Relation::Following.def())
            .filter(follow::Column::UserId.eq(user_id));

        for term in search.map(search_terms).unwrap_or_default() {
            query = query.filter(icontains((user::Entity, user::Column::Username), &term));
        }

        let result = query
            .order_by_asc(follow::Column::Created)
            .order_by_asc(follow::Column::Id)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_for_user(&self, user_id: Uuid, id: Uuid) -> Result<Option<Follow>, RepoError> {
        let result = FollowEntity::find_by_id(id)
            .filter(follow::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn exists(&self, user_id: Uuid, following_id: Uuid) -> Result<bool, RepoError> {
        let count = FollowEntity::find()
            .filter(follow::Column::UserId.eq(user_id))
            .filter(follow::Column::FollowingId.eq(following_id))
            .count(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(count > 0)
    }
}
