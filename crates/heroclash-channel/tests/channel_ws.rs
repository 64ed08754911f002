//! Duel channel tests against an in-process WebSocket server.
//!
//! The server side speaks real tungstenite, so these cover the handshake
//! header, the subscribe frames on the wire, and teardown in both
//! directions.

use std::sync::{Arc, Mutex};

use futures::{SinkExt, StreamExt};
use heroclash_api::{ApiClient, ClientConfig, ClientError, Credentials};
use heroclash_channel::{CONNECT_FAILED_MESSAGE, DuelEvent, open_duel_channel};
use serde_json::json;
use tokio::net::TcpListener;
use tokio_tungstenite::accept_hdr_async;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};

struct DuelServer {
    config: ClientConfig,
    auth_header: Arc<Mutex<Option<String>>>,
    subscribe_frames: Arc<Mutex<Vec<String>>>,
}

/// One-connection server: capture the handshake auth header, read the two
/// subscribe frames, send `pushes`, then either close or wait for the
/// client to close.
async fn spawn_duel_server(pushes: Vec<String>, close_after_pushes: bool) -> DuelServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");

    let auth_header: Arc<Mutex<Option<String>>> = Arc::new(Mutex::new(None));
    let subscribe_frames: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let auth_capture = auth_header.clone();
    let frame_capture = subscribe_frames.clone();

    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.expect("accept");
        let callback =
            move |request: &Request, response: Response| -> Result<Response, ErrorResponse> {
                *auth_capture.lock().unwrap() = request
                    .headers()
                    .get("Authorization")
                    .and_then(|value| value.to_str().ok())
                    .map(ToString::to_string);
                Ok(response)
            };
        let mut ws = accept_hdr_async(stream, callback).await.expect("handshake");

        for _ in 0..2 {
            match ws.next().await {
                Some(Ok(Message::Text(text))) => {
                    frame_capture.lock().unwrap().push(text.to_string());
                }
                other => panic!("expected subscribe frame, got {other:?}"),
            }
        }
        for push in pushes {
            ws.send(Message::text(push)).await.expect("push frame");
        }
        if close_after_pushes {
            let _ = ws.close(None).await;
            return;
        }
        while let Some(frame) = ws.next().await {
            match frame {
                Ok(Message::Close(_)) | Err(_) => break,
                Ok(_) => continue,
            }
        }
    });

    let mut config = ClientConfig::default();
    config.channel_url = format!("ws://{addr}");
    DuelServer {
        config,
        auth_header,
        subscribe_frames,
    }
}

fn hero_json(name: &str) -> serde_json::Value {
    json!({
        "name": name,
        "hp": 250,
        "mana": 80,
        "attack": 14,
        "defense": 9,
        "attackDamage": 30,
        "attackSpeed": 1.2,
        "mainElement": "water",
        "abilities": ["splash"]
    })
}

fn progress_push(session_id: &str, hero1: &str, hero2: &str) -> String {
    json!({
        "topic": format!("duel-progress/{session_id}"),
        "body": json!({ "hero1": hero_json(hero1), "hero2": hero_json(hero2) }).to_string()
    })
    .to_string()
}

fn result_push(session_id: &str, outcome: &str) -> String {
    json!({
        "topic": format!("duel-result/{session_id}"),
        "body": outcome
    })
    .to_string()
}

#[tokio::test(flavor = "current_thread")]
async fn handshake_carries_bearer_token_and_subscribes_both_topics() {
    let server = spawn_duel_server(vec![progress_push("g7", "vex", "mora")], false).await;
    let credentials = Credentials::new("tok-77", "ada");

    // The channel opens off the same configuration the REST client runs with.
    let api = ApiClient::new(server.config.clone()).expect("api client");
    let mut channel = open_duel_channel(api.config(), "g7", &credentials)
        .await
        .expect("open channel");
    let mut events = channel.take_events().expect("event stream");

    // Once a push arrives the server has read everything we sent first.
    match events.next().await {
        Some(Ok(DuelEvent::Progress(update))) => {
            assert_eq!(update.hero1.name, "vex");
            assert_eq!(update.hero2.name, "mora");
        }
        other => panic!("expected progress, got {other:?}"),
    }

    assert_eq!(
        server.auth_header.lock().unwrap().as_deref(),
        Some("Bearer tok-77")
    );
    assert_eq!(
        server.subscribe_frames.lock().unwrap().clone(),
        vec![
            "{\"action\":\"subscribe\",\"topic\":\"duel-progress/g7\"}".to_string(),
            "{\"action\":\"subscribe\",\"topic\":\"duel-result/g7\"}".to_string(),
        ]
    );
    channel.close().await;
}

#[tokio::test(flavor = "current_thread")]
async fn pushes_arrive_in_order_and_result_body_is_verbatim() {
    let server = spawn_duel_server(
        vec![
            progress_push("g1", "vex", "mora"),
            result_push("g1", "vex wins the duel"),
        ],
        false,
    )
    .await;

    let mut channel = open_duel_channel(&server.config, "g1", &Credentials::new("tok", "ada"))
        .await
        .expect("open channel");
    let mut events = channel.take_events().expect("event stream");

    assert!(matches!(
        events.next().await,
        Some(Ok(DuelEvent::Progress(_)))
    ));
    assert_eq!(
        events.next().await,
        Some(Ok(DuelEvent::Result("vex wins the duel".to_string())))
    );
    channel.close().await;
}

#[tokio::test(flavor = "current_thread")]
async fn frames_for_other_sessions_are_skipped() {
    let server = spawn_duel_server(
        vec![
            progress_push("g9", "someone", "else"),
            result_push("g1", "done"),
        ],
        false,
    )
    .await;

    let mut channel = open_duel_channel(&server.config, "g1", &Credentials::new("tok", "ada"))
        .await
        .expect("open channel");
    let mut events = channel.take_events().expect("event stream");

    // The g9 progress frame is dropped, so the first event is the result.
    assert_eq!(
        events.next().await,
        Some(Ok(DuelEvent::Result("done".to_string())))
    );
    channel.close().await;
}

#[tokio::test(flavor = "current_thread")]
async fn server_close_ends_the_stream() {
    let server = spawn_duel_server(vec![progress_push("g1", "vex", "mora")], true).await;

    let mut channel = open_duel_channel(&server.config, "g1", &Credentials::new("tok", "ada"))
        .await
        .expect("open channel");
    let mut events = channel.take_events().expect("event stream");

    assert!(matches!(
        events.next().await,
        Some(Ok(DuelEvent::Progress(_)))
    ));
    assert_eq!(events.next().await, None);

    // Closing after the server already went away stays quiet.
    channel.close().await;
}

#[tokio::test(flavor = "current_thread")]
async fn connection_refused_maps_to_connection_error() {
    // Bind then drop to get a port nothing listens on.
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);

    let mut config = ClientConfig::default();
    config.channel_url = format!("ws://{addr}");

    let error = open_duel_channel(&config, "g1", &Credentials::new("tok", "ada"))
        .await
        .expect_err("connect should fail");
    match error {
        ClientError::Connection(err) => assert_eq!(err.info.message, CONNECT_FAILED_MESSAGE),
        other => panic!("expected connection error, got {other:?}"),
    }
}
