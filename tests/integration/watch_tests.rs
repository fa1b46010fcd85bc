use crate::common::{create_client, profile_page};
use forum_sentry::{start_polling, PollState};
use std::time::Duration;
use tokio::sync::mpsc;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const INTERVAL: Duration = Duration::from_millis(100);

async fn mount_profile(server: &MockServer, user_id: &str, total_posts: &str) {
    Mock::given(method("GET"))
        .and(path("/member.php"))
        .and(query_param("u", user_id))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(profile_page("Kalcor", total_posts))
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_polling_reports_increase_once() {
    let mock_server = MockServer::start().await;
    mount_profile(&mock_server, "3", "500").await;

    let client = create_client(&mock_server.uri(), false);
    let (tx, mut rx) = mpsc::unbounded_channel();
    let handle = start_polling(client, "3", INTERVAL, move || {
        let tx = tx.clone();
        async move {
            let _ = tx.send(());
        }
    })
    .expect("Failed to start polling");

    // Baseline and a few unchanged polls never notify.
    tokio::time::sleep(INTERVAL * 4).await;
    assert!(rx.try_recv().is_err());

    mock_server.reset().await;
    mount_profile(&mock_server, "3", "501").await;

    tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("no notification for the new post")
        .expect("channel closed");

    tokio::time::sleep(INTERVAL * 4).await;
    assert!(rx.try_recv().is_err(), "notified twice for one post");

    let detector = handle.stop().await.expect("poller panicked");
    assert_eq!(
        detector.state(),
        PollState::Stopped {
            last_known_posts: Some(501)
        }
    );
}

#[tokio::test]
async fn test_unreachable_forum_keeps_polling() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let client = create_client(&mock_server.uri(), false);
    let handle = start_polling(client, "3", INTERVAL, || async {}).unwrap();

    tokio::time::sleep(INTERVAL * 4).await;
    assert!(!handle.is_finished());

    let requests = mock_server.received_requests().await.unwrap_or_default();
    assert!(requests.len() >= 2, "only {} polls", requests.len());

    let detector = handle.stop().await.unwrap();
    assert_eq!(
        detector.state(),
        PollState::Stopped {
            last_known_posts: None
        }
    );
}

#[tokio::test]
async fn test_detectors_are_isolated() {
    let mock_server = MockServer::start().await;
    mount_profile(&mock_server, "3", "500").await;
    mount_profile(&mock_server, "4", "20").await;

    let client = create_client(&mock_server.uri(), false);
    let (tx, mut rx) = mpsc::unbounded_channel();

    let mut handles = Vec::new();
    for user_id in ["3", "4"] {
        let tx = tx.clone();
        let handle = start_polling(client.clone(), user_id, INTERVAL, move || {
            let tx = tx.clone();
            async move {
                let _ = tx.send(user_id);
            }
        })
        .unwrap();
        handles.push(handle);
    }

    tokio::time::sleep(INTERVAL * 3).await;

    mock_server.reset().await;
    mount_profile(&mock_server, "3", "500").await;
    mount_profile(&mock_server, "4", "21").await;

    let notified = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("no notification")
        .expect("channel closed");
    assert_eq!(notified, "4");

    for handle in handles {
        let detector = handle.stop().await.unwrap();
        let expected = if detector.user_id() == "4" { 21 } else { 500 };
        assert_eq!(detector.state().last_known_posts(), Some(expected));
    }
    assert!(rx.try_recv().is_err());
}
