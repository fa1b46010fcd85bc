use crate::common::{create_client, listing_page, profile_page, thread_page};
use forum_sentry::forum::{Field, LocateError};
use forum_sentry::SentryError;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_html(server: &MockServer, page_path: &str, user: Option<&str>, body: String) {
    let mut mock = Mock::given(method("GET")).and(path(page_path));
    if let Some(user) = user {
        mock = mock.and(query_param("u", user));
    }
    mock.respond_with(
        ResponseTemplate::new(200)
            .set_body_string(body)
            .insert_header("content-type", "text/html"),
    )
    .mount(server)
    .await;
}

#[tokio::test]
async fn test_full_profile_over_http() {
    let mock_server = MockServer::start().await;

    mount_html(&mock_server, "/member.php", Some("3"), profile_page("Kalcor", "12,345")).await;
    mount_html(
        &mock_server,
        "/search.php",
        Some("3"),
        listing_page("showthread.php?t=9#post123", "SA-MP 0.3.7"),
    )
    .await;
    mount_html(
        &mock_server,
        "/showthread.php",
        None,
        thread_page("123", "1,024", "Released."),
    )
    .await;

    let client = create_client(&mock_server.uri(), true);
    let url = client.profile_url("3").unwrap();
    let snapshot = client.fetch_user_profile(url.as_str()).await.unwrap();

    assert_eq!(snapshot.user_name, "Kalcor");
    assert_eq!(snapshot.join_date.as_deref(), Some("04-01-2006"));
    assert_eq!(snapshot.total_posts, Some(12345));
    assert_eq!(snapshot.reputation, Some(1024));
    assert_eq!(
        snapshot.bio_text.as_deref(),
        Some("San Andreas Multiplayer\nlead developer")
    );

    let authors: Vec<&str> = snapshot
        .visitor_messages
        .iter()
        .map(|m| m.author.as_str())
        .collect();
    assert_eq!(authors, vec!["Y_Less", "Mike"]);
    assert_eq!(snapshot.visitor_messages[0].body, "Nice release!");
    assert!(snapshot.is_complete(), "{:?}", snapshot.field_errors);
}

#[tokio::test]
async fn test_reputation_failure_does_not_affect_other_fields() {
    let mock_server = MockServer::start().await;

    mount_html(&mock_server, "/member.php", Some("3"), profile_page("Kalcor", "500")).await;
    mount_html(
        &mock_server,
        "/search.php",
        Some("3"),
        listing_page("showthread.php?t=9#post123", "SA-MP 0.3.7"),
    )
    .await;
    // Thread page exists but the post table carries another id.
    mount_html(
        &mock_server,
        "/showthread.php",
        None,
        thread_page("77", "1,024", "Released."),
    )
    .await;

    let client = create_client(&mock_server.uri(), true);
    let url = client.profile_url("3").unwrap();
    let snapshot = client.fetch_user_profile(url.as_str()).await.unwrap();

    assert_eq!(snapshot.total_posts, Some(500));
    assert_eq!(snapshot.reputation, None);
    assert_eq!(snapshot.field_errors.len(), 1);
    assert_eq!(snapshot.field_errors[0].field(), Field::Reputation);
    assert_eq!(snapshot.visitor_messages.len(), 2);
}

#[tokio::test]
async fn test_server_error_on_profile_is_fatal() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/member.php"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let client = create_client(&mock_server.uri(), true);
    let url = client.profile_url("3").unwrap();
    let err = client.fetch_user_profile(url.as_str()).await.unwrap_err();

    match err {
        SentryError::Fetch { stage, source } => {
            assert_eq!(stage, "fetching user profile page");
            assert!(source.to_string().contains("500"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_non_profile_page_is_fatal() {
    let mock_server = MockServer::start().await;

    mount_html(
        &mock_server,
        "/member.php",
        None,
        "<html><body><div class=\"error\">Invalid User specified.</div></body></html>".to_string(),
    )
    .await;

    let client = create_client(&mock_server.uri(), true);
    let url = client.profile_url("999999").unwrap();
    let err = client.fetch_user_profile(url.as_str()).await.unwrap_err();

    assert!(matches!(err, SentryError::IdentityNotFound { .. }));
}

#[tokio::test]
async fn test_latest_post_over_http() {
    let mock_server = MockServer::start().await;

    mount_html(
        &mock_server,
        "/search.php",
        Some("3"),
        listing_page("showthread.php?t=9#post123", " SA-MP 0.3.7 released "),
    )
    .await;
    mount_html(
        &mock_server,
        "/showthread.php",
        None,
        thread_page("123", "10", "\n  Download it from the usual place.\n"),
    )
    .await;

    let client = create_client(&mock_server.uri(), false);
    let post = client.fetch_latest_post("3").await.unwrap();

    assert_eq!(post.title, "SA-MP 0.3.7 released");
    assert_eq!(post.body, "Download it from the usual place.");
}

#[tokio::test]
async fn test_latest_post_thread_unreachable() {
    let mock_server = MockServer::start().await;

    mount_html(
        &mock_server,
        "/search.php",
        Some("3"),
        listing_page("showthread.php?t=9#post123", "SA-MP 0.3.7"),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/showthread.php"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let client = create_client(&mock_server.uri(), false);
    let err = client.fetch_latest_post("3").await.unwrap_err();

    assert!(matches!(
        err,
        LocateError::Fetch {
            stage: "fetching user's latest post",
            ..
        }
    ));
}
