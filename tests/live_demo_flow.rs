//! End-to-end tests for the live demo session and the broadcast channel.

use std::time::Duration;

use futures_util::StreamExt;
use reqwest::StatusCode;
use serde_json::Value;

mod common;

#[tokio::test]
async fn live_demo_lifecycle_over_http() {
    let base = common::spawn_bridge().await;
    let client = common::client();

    // Initially inactive.
    let state: Value = client
        .get(format!("{base}/api/teacher/live-demo/state"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(state["active"], false);

    // Update before start is a client error and must not mutate anything.
    let res = client
        .post(format!("{base}/api/teacher/live-demo/update"))
        .json(&serde_json::json!({"code": "print(1)"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "No active live demo");

    // Start.
    let res = client
        .post(format!("{base}/api/teacher/live-demo/start"))
        .json(&serde_json::json!({"title": "Intro", "language": "python"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["state"]["active"], true);
    assert_eq!(body["state"]["title"], "Intro");
    assert_eq!(body["state"]["language"], "python");
    assert_eq!(body["state"]["code"], "");
    assert_eq!(body["state"]["viewerCount"], 0);
    assert!(body["state"]["startedAt"].is_string());

    // Update while active.
    let res = client
        .post(format!("{base}/api/teacher/live-demo/update"))
        .json(&serde_json::json!({"code": "x = 1"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let state: Value = client
        .get(format!("{base}/api/teacher/live-demo/state"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(state["code"], "x = 1");

    // Stop twice: both succeed.
    for _ in 0..2 {
        let res = client
            .post(format!("{base}/api/teacher/live-demo/stop"))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = res.json().await.unwrap();
        assert_eq!(body["success"], true);
    }

    let state: Value = client
        .get(format!("{base}/api/teacher/live-demo/state"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(state["active"], false);
}

/// Read from an SSE byte stream until the buffer contains `needle`.
async fn read_until(
    stream: &mut (impl futures_util::Stream<Item = reqwest::Result<bytes::Bytes>> + Unpin),
    buffer: &mut String,
    needle: &str,
) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while !buffer.contains(needle) {
            let chunk = stream
                .next()
                .await
                .expect("event stream ended early")
                .expect("event stream errored");
            buffer.push_str(std::str::from_utf8(&chunk).unwrap());
        }
    })
    .await
    .unwrap_or_else(|_| panic!("timed out waiting for {needle}; got: {buffer}"));
}

#[tokio::test]
async fn subscribers_receive_events_in_publish_order() {
    let base = common::spawn_bridge().await;
    let client = common::client();

    let res = client
        .get(format!("{base}/api/events"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.headers().get("content-type").unwrap(),
        "text/event-stream"
    );
    let mut stream = res.bytes_stream();
    let mut buffer = String::new();

    // recipientCount reflects the open subscription.
    let body: Value = client
        .post(format!("{base}/api/teacher/broadcast"))
        .json(&serde_json::json!({"message": "hello", "type": "info"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["recipientCount"], 1);
    read_until(&mut stream, &mut buffer, "teacherBroadcast").await;
    assert!(buffer.contains("\"message\":\"hello\""));

    // Live demo transitions arrive as events, in order.
    client
        .post(format!("{base}/api/teacher/live-demo/start"))
        .json(&serde_json::json!({"title": "Loops", "language": "python"}))
        .send()
        .await
        .unwrap();
    client
        .post(format!("{base}/api/teacher/live-demo/update"))
        .json(&serde_json::json!({"code": "for i in range(3):"}))
        .send()
        .await
        .unwrap();
    client
        .post(format!("{base}/api/teacher/live-demo/stop"))
        .send()
        .await
        .unwrap();

    read_until(&mut stream, &mut buffer, "liveDemoStop").await;
    let start_at = buffer.find("liveDemoStart").expect("missing start event");
    let update_at = buffer.find("liveDemoUpdate").expect("missing update event");
    let stop_at = buffer.find("liveDemoStop").unwrap();
    assert!(start_at < update_at && update_at < stop_at);
    assert!(buffer.contains("\"title\":\"Loops\""));
    assert!(buffer.contains("\"code\":\"for i in range(3):\""));
}

#[tokio::test]
async fn disconnected_subscriber_is_pruned() {
    let base = common::spawn_bridge().await;
    let client = common::client();

    let res = client
        .get(format!("{base}/api/events"))
        .send()
        .await
        .unwrap();
    drop(res); // Client goes away without unsubscribing.

    // Give the connection teardown a moment to propagate.
    tokio::time::sleep(Duration::from_millis(100)).await;

    // The first publish after the disconnect prunes the dead stream, so the
    // count settles at zero (either immediately or on the next publish).
    let mut last_count = -1;
    for _ in 0..2 {
        let body: Value = client
            .post(format!("{base}/api/teacher/broadcast"))
            .json(&serde_json::json!({"message": "ping", "type": "info"}))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        last_count = body["recipientCount"].as_i64().unwrap();
    }
    assert_eq!(last_count, 0);
}
