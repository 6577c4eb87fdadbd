use blogdesk_core::db::open_db_in_memory;
use blogdesk_core::{
    CommentDraft, CommentService, PostDraft, PostService, ServiceError, Session, SignupRequest,
    SqliteCommentRepository, SqlitePostRepository, SqliteUserRepository, UserService, UserUpdate,
};
use rusqlite::Connection;

fn user_service(conn: &Connection) -> UserService<SqliteUserRepository<'_>> {
    UserService::new(SqliteUserRepository::try_new(conn).unwrap())
}

fn post_service(conn: &Connection) -> PostService<SqlitePostRepository<'_>> {
    PostService::new(SqlitePostRepository::try_new(conn).unwrap())
}

fn comment_service(
    conn: &Connection,
) -> CommentService<SqliteCommentRepository<'_>, SqlitePostRepository<'_>> {
    CommentService::new(
        SqliteCommentRepository::try_new(conn).unwrap(),
        SqlitePostRepository::try_new(conn).unwrap(),
    )
}

fn signup(name: &str, email: &str, username: &str, password: &str) -> SignupRequest {
    SignupRequest {
        name: name.to_string(),
        email: email.to_string(),
        username: username.to_string(),
        password: password.to_string(),
    }
}

fn login(conn: &Connection, email: &str, username: &str) -> Session {
    let users = user_service(conn);
    users
        .signup(&signup(username, email, username, "pw"))
        .unwrap();
    users.authenticate(username, "pw").unwrap()
}

#[test]
fn alice_lifecycle_example() {
    let conn = open_db_in_memory().unwrap();
    let users = user_service(&conn);

    let alice = users
        .signup(&signup("Alice", "a@x.com", "alice", "pw"))
        .unwrap();
    assert_eq!(alice.id, 1);

    let err = users
        .signup(&signup("Alice Two", "a@x.com", "alice2", "pw2"))
        .unwrap_err();
    assert!(matches!(err, ServiceError::EmailTaken(ref email) if email == "a@x.com"));

    let loaded = users.get_user(1).unwrap();
    assert_eq!(loaded.name, "Alice");
    assert_eq!(loaded.email, "a@x.com");
    assert_eq!(loaded.username, "alice");

    let removed = users.delete_user(1).unwrap();
    assert_eq!(removed.id, 1);
    assert!(users.get_user(1).unwrap_err().is_not_found());
}

#[test]
fn signup_stores_hash_not_plaintext() {
    let conn = open_db_in_memory().unwrap();
    let users = user_service(&conn);
    let alice = users
        .signup(&signup("Alice", "a@x.com", "alice", "s3cret"))
        .unwrap();

    let stored: String = conn
        .query_row(
            "SELECT password_hash FROM users WHERE id = ?1;",
            [alice.id],
            |row| row.get(0),
        )
        .unwrap();
    assert_ne!(stored, "s3cret");
    assert!(stored.starts_with("$argon2"));
}

#[test]
fn signup_rejects_taken_username_and_blank_password() {
    let conn = open_db_in_memory().unwrap();
    let users = user_service(&conn);
    users
        .signup(&signup("Alice", "a@x.com", "alice", "pw"))
        .unwrap();

    let err = users
        .signup(&signup("Other", "o@x.com", "alice", "pw"))
        .unwrap_err();
    assert!(matches!(err, ServiceError::UsernameTaken(_)));

    let err = users
        .signup(&signup("Other", "o@x.com", "other", ""))
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
}

#[test]
fn authenticate_accepts_only_matching_credentials() {
    let conn = open_db_in_memory().unwrap();
    let users = user_service(&conn);
    let alice = users
        .signup(&signup("Alice", "a@x.com", "alice", "pw"))
        .unwrap();

    let session = users.authenticate("alice", "pw").unwrap();
    assert_eq!(session.user_id(), alice.id);
    assert_eq!(session.username(), "alice");

    assert!(matches!(
        users.authenticate("alice", "nope"),
        Err(ServiceError::InvalidCredentials)
    ));
    assert!(matches!(
        users.authenticate("ghost", "pw"),
        Err(ServiceError::InvalidCredentials)
    ));
}

#[test]
fn update_user_returns_previous_snapshot_and_keeps_password_when_omitted() {
    let conn = open_db_in_memory().unwrap();
    let users = user_service(&conn);
    let alice = users
        .signup(&signup("Alice", "a@x.com", "alice", "pw"))
        .unwrap();

    let previous = users
        .update_user(
            alice.id,
            &UserUpdate {
                name: "Alicia".to_string(),
                email: "alicia@x.com".to_string(),
                username: "alicia".to_string(),
                password: None,
            },
        )
        .unwrap();
    assert_eq!(previous.name, "Alice");
    assert_eq!(users.get_user(alice.id).unwrap().name, "Alicia");
    users.authenticate("alicia", "pw").unwrap();

    users
        .update_user(
            alice.id,
            &UserUpdate {
                name: "Alicia".to_string(),
                email: "alicia@x.com".to_string(),
                username: "alicia".to_string(),
                password: Some("new-pw".to_string()),
            },
        )
        .unwrap();
    assert!(users.authenticate("alicia", "pw").is_err());
    users.authenticate("alicia", "new-pw").unwrap();
}

#[test]
fn update_and_delete_of_missing_user_fail_with_not_found() {
    let conn = open_db_in_memory().unwrap();
    let users = user_service(&conn);
    let update = UserUpdate {
        name: "X".to_string(),
        email: "x@x.com".to_string(),
        username: "x".to_string(),
        password: None,
    };

    assert!(matches!(
        users.update_user(77, &update),
        Err(ServiceError::NotFound { entity: "user", .. })
    ));
    assert!(matches!(
        users.delete_user(77),
        Err(ServiceError::NotFound { entity: "user", .. })
    ));
}

#[test]
fn post_title_is_unique_across_users() {
    let conn = open_db_in_memory().unwrap();
    let alice = login(&conn, "a@x.com", "alice");
    let bob = login(&conn, "b@x.com", "bob");
    let posts = post_service(&conn);

    let created = posts
        .create_post(&alice, &PostDraft::new("Hello", "world"))
        .unwrap();
    assert_eq!(created.user_id, alice.user_id());
    assert_eq!(posts.get_post(created.id).unwrap().title, "Hello");

    let err = posts
        .create_post(&bob, &PostDraft::new("Hello", "again"))
        .unwrap_err();
    assert!(matches!(err, ServiceError::TitleTaken(ref t) if t == "Hello"));
}

#[test]
fn post_update_to_taken_title_is_title_taken() {
    let conn = open_db_in_memory().unwrap();
    let alice = login(&conn, "a@x.com", "alice");
    let posts = post_service(&conn);
    posts
        .create_post(&alice, &PostDraft::new("One", "x"))
        .unwrap();
    let two = posts
        .create_post(&alice, &PostDraft::new("Two", "y"))
        .unwrap();

    let err = posts
        .update_post(&alice, two.id, &PostDraft::new("One", "y"))
        .unwrap_err();
    assert!(matches!(err, ServiceError::TitleTaken(ref t) if t == "One"));
    assert_eq!(posts.get_post(two.id).unwrap().title, "Two");
}

#[test]
fn post_update_is_owner_only_and_returns_previous() {
    let conn = open_db_in_memory().unwrap();
    let alice = login(&conn, "a@x.com", "alice");
    let bob = login(&conn, "b@x.com", "bob");
    let posts = post_service(&conn);
    let post = posts
        .create_post(&alice, &PostDraft::new("Draft", "v1"))
        .unwrap();

    let err = posts
        .update_post(&bob, post.id, &PostDraft::new("Hijack", "x"))
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotOwner { entity: "post", .. }));

    let previous = posts
        .update_post(&alice, post.id, &PostDraft::new("Final", "v2").published(true))
        .unwrap();
    assert_eq!(previous.title, "Draft");
    let current = posts.get_post(post.id).unwrap();
    assert_eq!(current.title, "Final");
    assert!(current.is_published);
    assert!(current.published_at.is_some());

    assert!(matches!(
        posts.update_post(&alice, 999, &PostDraft::new("Nope", "x")),
        Err(ServiceError::NotFound { entity: "post", .. })
    ));
}

#[test]
fn post_delete_then_get_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let alice = login(&conn, "a@x.com", "alice");
    let posts = post_service(&conn);
    let post = posts
        .create_post(&alice, &PostDraft::new("Temp", "x"))
        .unwrap();

    assert_eq!(posts.list_posts_by_user(alice.user_id()).unwrap().len(), 1);
    posts.delete_post(&alice, post.id).unwrap();
    assert!(posts.get_post(post.id).unwrap_err().is_not_found());
    assert!(posts.get_post_by_title("Temp").unwrap_err().is_not_found());
}

#[test]
fn second_comment_for_same_pair_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let alice = login(&conn, "a@x.com", "alice");
    let bob = login(&conn, "b@x.com", "bob");
    let post = post_service(&conn)
        .create_post(&alice, &PostDraft::new("Hello", "world"))
        .unwrap();
    let comments = comment_service(&conn);

    let first = comments
        .create_comment(&bob, post.id, &CommentDraft::new("first!"))
        .unwrap();
    assert_eq!(first.user_id, bob.user_id());

    let err = comments
        .create_comment(&bob, post.id, &CommentDraft::new("second"))
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::CommentExists { user_id, post_id }
            if user_id == bob.user_id() && post_id == post.id
    ));

    comments
        .create_comment(&alice, post.id, &CommentDraft::new("thanks"))
        .unwrap();
    assert_eq!(comments.list_comments_by_post(post.id).unwrap().len(), 2);
    assert_eq!(comments.list_comments_by_user(bob.user_id()).unwrap().len(), 1);
    assert_eq!(
        comments
            .get_comment_for_post(bob.user_id(), post.id)
            .unwrap()
            .id,
        first.id
    );
}

#[test]
fn comment_on_missing_post_is_post_not_found() {
    let conn = open_db_in_memory().unwrap();
    let alice = login(&conn, "a@x.com", "alice");
    let comments = comment_service(&conn);

    assert!(matches!(
        comments.create_comment(&alice, 404, &CommentDraft::new("hi")),
        Err(ServiceError::PostNotFound(404))
    ));
    assert!(matches!(
        comments.list_comments_by_post(404),
        Err(ServiceError::PostNotFound(404))
    ));
}

#[test]
fn comment_update_and_delete_follow_ownership() {
    let conn = open_db_in_memory().unwrap();
    let alice = login(&conn, "a@x.com", "alice");
    let bob = login(&conn, "b@x.com", "bob");
    let post = post_service(&conn)
        .create_post(&alice, &PostDraft::new("Hello", "world"))
        .unwrap();
    let comments = comment_service(&conn);
    let comment = comments
        .create_comment(&bob, post.id, &CommentDraft::new("v1"))
        .unwrap();

    assert!(matches!(
        comments.delete_comment(&alice, comment.id),
        Err(ServiceError::NotOwner { entity: "comment", .. })
    ));

    let previous = comments
        .update_comment(&bob, comment.id, &CommentDraft::new("v2"))
        .unwrap();
    assert_eq!(previous.content, "v1");
    assert_eq!(comments.get_comment(comment.id).unwrap().content, "v2");

    comments.delete_comment(&bob, comment.id).unwrap();
    assert!(comments.get_comment(comment.id).unwrap_err().is_not_found());
    assert!(matches!(
        comments.update_comment(&bob, comment.id, &CommentDraft::new("v3")),
        Err(ServiceError::NotFound { entity: "comment", .. })
    ));
}

#[test]
fn deleting_user_removes_their_posts() {
    let conn = open_db_in_memory().unwrap();
    let alice = login(&conn, "a@x.com", "alice");
    let posts = post_service(&conn);
    let post = posts
        .create_post(&alice, &PostDraft::new("Mine", "x"))
        .unwrap();

    user_service(&conn).delete_user(alice.user_id()).unwrap();
    assert!(posts.get_post(post.id).unwrap_err().is_not_found());
}
