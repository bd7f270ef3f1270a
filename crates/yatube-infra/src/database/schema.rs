//! Table bootstrap for PostgreSQL.

use sea_orm::sea_query::Index;
use sea_orm::{ConnectionTrait, DbConn, DbErr, EntityTrait, Schema};

use super::entity::{comment, follow, group, post, user};

/// Unique index backing the one-follow-per-pair rule.
pub const FOLLOW_PAIR_INDEX: &str = "follows_user_following_key";

async fn create_table<E>(db: &DbConn, schema: &Schema, entity: E) -> Result<(), DbErr>
where
    E: EntityTrait,
{
    let mut stmt = schema.create_table_from_entity(entity);
    stmt.if_not_exists();

    let backend = db.get_database_backend();
    db.execute(backend.build(&stmt)).await?;
    tracing::debug!(table = %entity.table_name(), "Table ensured");
    Ok(())
}

/// Create all tables and indexes that do not exist yet.
///
/// Tables are created parents first so the foreign keys resolve.
pub async fn ensure_schema(db: &DbConn) -> Result<(), DbErr> {
    let schema = Schema::new(db.get_database_backend());

    create_table(db, &schema, user::Entity).await?;
    create_table(db, &schema, group::Entity).await?;
    create_table(db, &schema, post::Entity).await?;
    create_table(db, &schema, comment::Entity).await?;
    create_table(db, &schema, follow::Entity).await?;

    let index = Index::create()
        .name(FOLLOW_PAIR_INDEX)
        .table(follow::Entity)
        .col(follow::Column::UserId)
        .col(follow::Column::FollowingId)
        .unique()
        .if_not_exists()
        .to_owned();
    let backend = db.get_database_backend();
    db.execute(backend.build(&index)).await?;

    tracing::info!("Database schema ensured");
    Ok(())
}
