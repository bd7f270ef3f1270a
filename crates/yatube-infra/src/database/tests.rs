use std::collections::BTreeMap;

use sea_orm::{DatabaseBackend, DbErr, MockDatabase, MockExecResult, Value};
use uuid::Uuid;

use yatube_core::domain::{Group, Post, User};
use yatube_core::error::RepoError;
use yatube_core::ports::{BaseRepository, FollowRepository, GroupRepository, UserRepository};

use super::entity::{group, post, user};
use super::postgres_base::map_db_err;
use super::postgres_repo::{
    PostgresFollowRepository, PostgresGroupRepository, PostgresPostRepository,
    PostgresUserRepository,
};

fn user_model(username: &str) -> user::Model {
    user::Model {
        id: Uuid::new_v4(),
        username: username.to_owned(),
        email: format!("{username}@example.com"),
        password_hash: "hash".to_owned(),
        first_name: String::new(),
        last_name: String::new(),
        date_joined: chrono::Utc::now().into(),
    }
}

#[tokio::test]
async fn test_find_post_by_id() {
    let post_id = Uuid::new_v4();
    let author_id = Uuid::new_v4();
    let now = chrono::Utc::now();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![post::Model {
            id: post_id,
            author_id,
            text: "Test Post".to_owned(),
            image: None,
            pub_date: now.into(),
            group_id: None,
        }]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let result: Option<Post> = repo.find_by_id(post_id).await.unwrap();

    let post = result.unwrap();
    assert_eq!(post.text, "Test Post");
    assert_eq!(post.id, post_id);
    assert_eq!(post.author_id, author_id);
    assert!(post.group_id.is_none());
}

#[tokio::test]
async fn test_find_user_by_username() {
    let model = user_model("alice");
    let id = model.id;
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![model]])
        .into_connection();

    let repo = PostgresUserRepository::new(db);
    let user: User = repo.find_by_username("alice").await.unwrap().unwrap();

    assert_eq!(user.id, id);
    assert_eq!(user.username, "alice");
}

#[tokio::test]
async fn test_usernames_without_ids_skips_query() {
    // No results are queued, so any query would fail.
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let repo = PostgresUserRepository::new(db);

    let names = repo.usernames(&[]).await.unwrap();
    assert!(names.is_empty());
}

#[tokio::test]
async fn test_usernames_maps_ids() {
    let alice = user_model("alice");
    let bob = user_model("bob");
    let (alice_id, bob_id) = (alice.id, bob.id);
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![alice, bob]])
        .into_connection();

    let repo = PostgresUserRepository::new(db);
    let names = repo.usernames(&[alice_id, bob_id, alice_id]).await.unwrap();

    assert_eq!(names.len(), 2);
    assert_eq!(names[&alice_id], "alice");
    assert_eq!(names[&bob_id], "bob");
}

#[tokio::test]
async fn test_list_groups() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![group::Model {
            id: Uuid::new_v4(),
            title: "Cats".to_owned(),
            slug: "cats".to_owned(),
            description: "All about cats".to_owned(),
        }]])
        .into_connection();

    let repo = PostgresGroupRepository::new(db);
    let groups: Vec<Group> = repo.list_groups().await.unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].slug, "cats");
}

#[tokio::test]
async fn test_follow_exists_counts_rows() {
    let row = BTreeMap::from([("num_items", Value::BigInt(Some(1)))]);
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![row]])
        .into_connection();

    let repo = PostgresFollowRepository::new(db);
    assert!(repo.exists(Uuid::new_v4(), Uuid::new_v4()).await.unwrap());
}

#[tokio::test]
async fn test_delete_missing_row_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        }])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let result = BaseRepository::<Post, Uuid>::delete(&repo, Uuid::new_v4()).await;

    assert!(matches!(result, Err(RepoError::NotFound)));
}

#[test]
fn test_map_db_err() {
    assert!(matches!(
        map_db_err(DbErr::RecordNotUpdated),
        RepoError::NotFound
    ));
    assert!(matches!(
        map_db_err(DbErr::Custom("boom".to_owned())),
        RepoError::Query(msg) if msg.contains("boom")
    ));
}
