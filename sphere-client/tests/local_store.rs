use std::path::PathBuf;

use tempfile::TempDir;
use uuid::Uuid;

use sphere_client::{Backend, ClientError, Session, SphereClient};
use sphere_core::upload::UploadKind;
use sphere_core::{CreateComment, CreatePost, UpdateCommentEmoji, UpdatePost};

fn store_path(dir: &TempDir) -> PathBuf {
    dir.path().join("sphere.json")
}

fn sample_post() -> CreatePost {
    CreatePost {
        title: "Local post".to_string(),
        content: "Content long enough to pass validation".to_string(),
        tags: vec!["Local".to_string(), "local".to_string(), "rust".to_string()],
        image_url: None,
        video_url: None,
    }
}

async fn client_with_user(dir: &TempDir, username: &str) -> SphereClient {
    let mut client =
        SphereClient::new(Backend::Local(store_path(dir))).expect("local store must open");
    client
        .login_offline(username)
        .await
        .expect("offline login must succeed");
    client
}

#[tokio::test]
async fn fresh_store_is_seeded_with_a_demo_post() {
    let dir = tempfile::tempdir().expect("tempdir must be created");
    let client = SphereClient::new(Backend::Local(store_path(&dir))).expect("must open");

    let posts = client.list_posts(None).await.expect("list must succeed");
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].author.username, "demo");
    assert!(posts[0].likes.is_empty());
}

#[tokio::test]
async fn create_like_unlike_round_trip() {
    let dir = tempfile::tempdir().expect("tempdir must be created");
    let mut client = client_with_user(&dir, "alice").await;
    let me = client.session().expect("session must be set").user.clone();

    let post = client
        .create_post(sample_post())
        .await
        .expect("create must succeed");
    assert_eq!(post.author, me);
    assert_eq!(post.tags, vec!["local".to_string(), "rust".to_string()]);

    let liked = client
        .toggle_post_like(post.id)
        .await
        .expect("like must succeed");
    assert_eq!(liked.likes.len(), 1);
    assert_eq!(liked.likes[0].user, me.id);
    assert_eq!(liked.updated_at, post.updated_at);

    let unliked = client
        .toggle_post_like(post.id)
        .await
        .expect("unlike must succeed");
    assert!(unliked.likes.is_empty());
}

#[tokio::test]
async fn comment_likes_are_per_user() {
    let dir = tempfile::tempdir().expect("tempdir must be created");
    let mut alice = client_with_user(&dir, "alice").await;
    let mut bob = client_with_user(&dir, "bob").await;

    let post = alice
        .create_post(sample_post())
        .await
        .expect("create post must succeed");
    let comment = alice
        .create_comment(CreateComment {
            content: "First!".to_string(),
            post_id: post.id,
            emoji: None,
        })
        .await
        .expect("create comment must succeed");

    alice
        .toggle_comment_like(comment.id)
        .await
        .expect("alice like must succeed");
    let both = bob
        .toggle_comment_like(comment.id)
        .await
        .expect("bob like must succeed");
    assert_eq!(both.likes.len(), 2);

    let after = alice
        .toggle_comment_like(comment.id)
        .await
        .expect("alice unlike must succeed");
    assert_eq!(after.likes.len(), 1);
    let bob_id = bob.session().expect("bob session").user.id;
    assert_eq!(after.likes[0].user, bob_id);
}

#[tokio::test]
async fn emoji_filter_matches_exactly_and_all_disables_it() {
    let dir = tempfile::tempdir().expect("tempdir must be created");
    let mut client = client_with_user(&dir, "alice").await;

    let post = client
        .create_post(sample_post())
        .await
        .expect("create post must succeed");
    client
        .create_comment(CreateComment {
            content: "default emoji".to_string(),
            post_id: post.id,
            emoji: None,
        })
        .await
        .expect("comment must be created");
    client
        .create_comment(CreateComment {
            content: "fire".to_string(),
            post_id: post.id,
            emoji: Some("🔥".to_string()),
        })
        .await
        .expect("comment must be created");

    let fire = client
        .list_comments(post.id, Some("🔥"))
        .await
        .expect("list must succeed");
    assert_eq!(fire.len(), 1);
    assert_eq!(fire[0].emoji, "🔥");

    let all = client
        .list_comments(post.id, Some("all"))
        .await
        .expect("list must succeed");
    assert_eq!(all.len(), 2);

    let unfiltered = client
        .list_comments(post.id, None)
        .await
        .expect("list must succeed");
    assert_eq!(unfiltered.len(), 2);
}

#[tokio::test]
async fn non_owner_mutation_is_rejected_as_unauthorized() {
    let dir = tempfile::tempdir().expect("tempdir must be created");
    let mut alice = client_with_user(&dir, "alice").await;
    let mut bob = client_with_user(&dir, "bob").await;

    let post = alice
        .create_post(sample_post())
        .await
        .expect("create must succeed");

    let err = bob
        .update_post(
            post.id,
            UpdatePost {
                title: Some("Hijacked".to_string()),
                ..UpdatePost::default()
            },
        )
        .await
        .expect_err("non-owner update must fail");

    match err {
        ClientError::Api(failure) => {
            assert_eq!(failure.status, 401);
            assert_eq!(failure.code, "unauthorized");
        }
        other => panic!("expected api failure, got {other:?}"),
    }

    // Токен Боба действителен, запрещена только чужая операция:
    // сессия остаётся и продолжает работать.
    assert!(bob.session().is_some());
    let mine = bob.my_posts().await.expect("bob session must still work");
    assert!(mine.is_empty());
}

#[tokio::test]
async fn protected_operation_without_session_fails_fast() {
    let dir = tempfile::tempdir().expect("tempdir must be created");
    let mut client =
        SphereClient::new(Backend::Local(store_path(&dir))).expect("local store must open");

    let err = client
        .create_post(sample_post())
        .await
        .expect_err("create without session must fail");
    assert!(matches!(err, ClientError::MissingSession));
}

#[tokio::test]
async fn forged_session_is_unauthenticated() {
    let dir = tempfile::tempdir().expect("tempdir must be created");
    let mut client =
        SphereClient::new(Backend::Local(store_path(&dir))).expect("local store must open");
    client.set_session(Session {
        token: format!("local-{}", Uuid::new_v4()),
        user: sphere_core::Author {
            id: Uuid::new_v4(),
            username: "ghost".to_string(),
        },
    });

    let err = client
        .create_post(sample_post())
        .await
        .expect_err("forged session must fail");
    assert_eq!(err.api_code(), Some("unauthenticated"));

    // Непризнанную сессию клиент сбрасывает сам.
    assert!(client.session().is_none());
}

#[tokio::test]
async fn auth_routes_are_not_served_locally() {
    let dir = tempfile::tempdir().expect("tempdir must be created");
    let mut client =
        SphereClient::new(Backend::Local(store_path(&dir))).expect("local store must open");

    let register = client.register("alice", "secret1").await;
    assert_eq!(
        register.expect_err("register must fail").api_code(),
        Some("not_found")
    );

    let login = client.login("alice", "secret1").await;
    assert_eq!(
        login.expect_err("login must fail").api_code(),
        Some("not_found")
    );
}

#[tokio::test]
async fn content_and_identity_survive_reopen() {
    let dir = tempfile::tempdir().expect("tempdir must be created");
    let post_id;
    let alice_id;
    {
        let mut client = client_with_user(&dir, "alice").await;
        alice_id = client.session().expect("session must be set").user.id;
        let post = client
            .create_post(sample_post())
            .await
            .expect("create must succeed");
        client
            .toggle_post_like(post.id)
            .await
            .expect("like must succeed");
        post_id = post.id;
    }

    let mut client = client_with_user(&dir, "alice").await;
    assert_eq!(
        client.session().expect("session must be set").user.id,
        alice_id
    );

    let post = client.get_post(post_id).await.expect("post must survive");
    assert_eq!(post.likes.len(), 1);
    assert_eq!(post.likes[0].user, alice_id);

    let mine = client.my_posts().await.expect("my posts must succeed");
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].id, post_id);
}

#[tokio::test]
async fn deleting_a_post_keeps_its_comments() {
    let dir = tempfile::tempdir().expect("tempdir must be created");
    let mut client = client_with_user(&dir, "alice").await;

    let post = client
        .create_post(sample_post())
        .await
        .expect("create must succeed");
    client
        .create_comment(CreateComment {
            content: "Orphan to be".to_string(),
            post_id: post.id,
            emoji: None,
        })
        .await
        .expect("comment must be created");

    let removed = client
        .delete_post(post.id)
        .await
        .expect("delete must succeed");
    assert_eq!(removed.message, "Post removed");

    let err = client.get_post(post.id).await.expect_err("post is gone");
    assert_eq!(err.api_code(), Some("not_found"));

    let orphans = client
        .list_comments(post.id, None)
        .await
        .expect("list must succeed");
    assert_eq!(orphans.len(), 1);
}

#[tokio::test]
async fn upload_returns_placeholder_url_without_storing_bytes() {
    let dir = tempfile::tempdir().expect("tempdir must be created");
    let mut client = client_with_user(&dir, "alice").await;

    let response = client
        .upload(
            UploadKind::Image,
            "my photo (1).png",
            "image/png",
            vec![0u8; 128],
        )
        .await
        .expect("upload must succeed");
    assert_eq!(response.filename, "my photo (1).png");
    assert!(response.stored_as.ends_with("my_photo__1_.png"));
    assert!(response.url.starts_with("https://"));
    assert_eq!(response.size, 128);

    let rejected = client
        .upload(UploadKind::Image, "clip.mp4", "video/mp4", vec![0u8; 128])
        .await
        .expect_err("wrong mime must fail");
    assert_eq!(rejected.api_code(), Some("validation_error"));
}

#[tokio::test]
async fn validation_reports_every_broken_field() {
    let dir = tempfile::tempdir().expect("tempdir must be created");
    let mut client = client_with_user(&dir, "alice").await;

    let err = client
        .create_post(CreatePost {
            title: String::new(),
            content: "short".to_string(),
            tags: Vec::new(),
            image_url: Some("not-a-url".to_string()),
            video_url: None,
        })
        .await
        .expect_err("invalid post must fail");

    match err {
        ClientError::Api(failure) => {
            assert_eq!(failure.status, 400);
            assert_eq!(failure.code, "validation_error");
            assert_eq!(failure.violations.len(), 3);
        }
        other => panic!("expected api failure, got {other:?}"),
    }
}

#[tokio::test]
async fn updating_with_empty_url_clears_media() {
    let dir = tempfile::tempdir().expect("tempdir must be created");
    let mut client = client_with_user(&dir, "alice").await;

    let post = client
        .create_post(CreatePost {
            image_url: Some("https://example.com/cover.png".to_string()),
            ..sample_post()
        })
        .await
        .expect("create must succeed");
    assert!(post.image_url.is_some());

    let updated = client
        .update_post(
            post.id,
            UpdatePost {
                image_url: Some(String::new()),
                ..UpdatePost::default()
            },
        )
        .await
        .expect("update must succeed");
    assert!(updated.image_url.is_none());
    assert!(updated.updated_at > post.updated_at);
}

#[tokio::test]
async fn emoji_update_only_touches_emoji() {
    let dir = tempfile::tempdir().expect("tempdir must be created");
    let mut client = client_with_user(&dir, "alice").await;

    let post = client
        .create_post(sample_post())
        .await
        .expect("create must succeed");
    let comment = client
        .create_comment(CreateComment {
            content: "Keep me".to_string(),
            post_id: post.id,
            emoji: None,
        })
        .await
        .expect("comment must be created");
    assert_eq!(comment.emoji, sphere_core::DEFAULT_EMOJI);

    let updated = client
        .update_comment_emoji(
            comment.id,
            UpdateCommentEmoji {
                emoji: "🔥".to_string(),
            },
        )
        .await
        .expect("emoji update must succeed");
    assert_eq!(updated.emoji, "🔥");
    assert_eq!(updated.content, "Keep me");
}
