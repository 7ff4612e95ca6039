//! Integration tests driving the canvas server end to end over HTTP and
//! WebSocket, with the router mounted on an in-process listener.

use std::{sync::Arc, time::Duration};

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async, tungstenite::protocol::Message,
};

use pixelgrid::{
    common::time::SystemClock,
    domain::{Canvas, TokenClaims, User, UserId, Username},
    infrastructure::{
        repository::{InMemoryCanvasRepository, InMemoryUserRepository},
        store::InMemoryCanvasStore,
        token::StaticTokenVerifier,
        update_pusher::WebSocketUpdatePusher,
    },
    ui::{router, state::AppState},
    usecase::{
        AuthenticateConnectionUseCase, ConnectViewerUseCase, DisconnectViewerUseCase,
        GetCanvasStateUseCase, GetLeaderboardUseCase, PlacePixelUseCase,
    },
};

type WsClient = WebSocketStream<MaybeTlsStream<TcpStream>>;

const READ_TIMEOUT: Duration = Duration::from_secs(5);

fn test_user(id: &str, name: &str, is_admin: bool) -> User {
    User::new(
        UserId::new(id.to_string()).unwrap(),
        Username::new(name.to_string()).unwrap(),
        is_admin,
    )
}

/// Start a server on an ephemeral port with users alice, bob and an
/// admin, keyed by tokens `tok-alice`, `tok-bob`, `tok-root`.
///
/// Returns the HTTP base URL and the WebSocket URL.
async fn spawn_test_server() -> (String, String) {
    let alice = test_user("alice", "Alice", false);
    let bob = test_user("bob", "Bob", false);
    let root = test_user("root", "Root", true);

    let verifier = StaticTokenVerifier::new()
        .with_token(
            "tok-alice",
            TokenClaims {
                user_id: alice.id.clone(),
                username: alice.username.clone(),
            },
        )
        .with_token(
            "tok-bob",
            TokenClaims {
                user_id: bob.id.clone(),
                username: bob.username.clone(),
            },
        )
        .with_token(
            "tok-root",
            TokenClaims {
                user_id: root.id.clone(),
                username: root.username.clone(),
            },
        );

    let canvas_repository = Arc::new(InMemoryCanvasRepository::new(Canvas::new()));
    let user_repository = Arc::new(InMemoryUserRepository::with_users(vec![alice, bob, root]));
    let token_verifier = Arc::new(verifier);
    let pusher = Arc::new(WebSocketUpdatePusher::new());
    let store = Arc::new(InMemoryCanvasStore::new());
    let clock = Arc::new(SystemClock);

    let state = Arc::new(AppState {
        place_pixel_usecase: Arc::new(PlacePixelUseCase::new(
            canvas_repository.clone(),
            user_repository.clone(),
            pusher.clone(),
            store,
            clock.clone(),
        )),
        connect_viewer_usecase: Arc::new(ConnectViewerUseCase::new(pusher.clone())),
        authenticate_connection_usecase: Arc::new(AuthenticateConnectionUseCase::new(
            token_verifier.clone(),
            pusher.clone(),
        )),
        disconnect_viewer_usecase: Arc::new(DisconnectViewerUseCase::new(pusher.clone())),
        get_canvas_state_usecase: Arc::new(GetCanvasStateUseCase::new(canvas_repository)),
        get_leaderboard_usecase: Arc::new(GetLeaderboardUseCase::new(user_repository, clock)),
        token_verifier,
    });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router(state)).await.unwrap();
    });

    (
        format!("http://{}", addr),
        format!("ws://{}/ws", addr),
    )
}

/// Connect a WebSocket viewer and give the server time to register it
async fn connect_viewer(ws_url: &str) -> WsClient {
    let (ws, _) = connect_async(ws_url).await.expect("Failed to connect");
    tokio::time::sleep(Duration::from_millis(100)).await;
    ws
}

/// Read the next text frame, failing the test on timeout
async fn next_text(ws: &mut WsClient) -> serde_json::Value {
    loop {
        let message = tokio::time::timeout(READ_TIMEOUT, ws.next())
            .await
            .expect("Timed out waiting for WebSocket message")
            .expect("Connection closed")
            .expect("WebSocket read error");
        if let Message::Text(text) = message {
            return serde_json::from_str(&text).expect("Message is not JSON");
        }
    }
}

async fn place(
    client: &reqwest::Client,
    base_url: &str,
    token: &str,
    x: u32,
    y: u32,
    color: u8,
) -> reqwest::Response {
    client
        .post(format!("{}/api/pixels", base_url))
        .bearer_auth(token)
        .json(&serde_json::json!({"x": x, "y": y, "color": color}))
        .send()
        .await
        .expect("Request failed")
}

#[tokio::test]
async fn test_placement_commits_and_broadcasts() {
    // テスト項目: 配置がコミットされ、全ビューアへ配信され、キャンバスに反映される
    // given (前提条件): ビューアが 1 つ接続している
    let (base_url, ws_url) = spawn_test_server().await;
    let client = reqwest::Client::new();
    let mut viewer = connect_viewer(&ws_url).await;

    // when (操作): alice が (10, 20) に色 5 を置く
    let response = place(&client, &base_url, "tok-alice", 10, 20, 5).await;

    // then (期待する結果): 200 が返り、PIXEL_UPDATE が届き、キャンバスが更新される
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["x"], 10);
    assert_eq!(body["y"], 20);
    assert_eq!(body["color"], 5);

    let update = next_text(&mut viewer).await;
    assert_eq!(update["type"], "PIXEL_UPDATE");
    assert_eq!(update["payload"]["x"], 10);
    assert_eq!(update["payload"]["y"], 20);
    assert_eq!(update["payload"]["color"], 5);

    let canvas: serde_json::Value = client
        .get(format!("{}/api/canvas", base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(canvas["width"], 150);
    assert_eq!(canvas["height"], 150);
    let pixels = canvas["pixels"].as_array().unwrap();
    assert_eq!(pixels[(20 * 150 + 10) as usize], 5);
}

#[tokio::test]
async fn test_cooldown_rejects_rapid_second_placement() {
    // テスト項目: クールダウン中の 2 回目の配置が 429 で拒否される
    // given (前提条件): alice が直前に 1 回置いている
    let (base_url, _ws_url) = spawn_test_server().await;
    let client = reqwest::Client::new();
    let first = place(&client, &base_url, "tok-alice", 0, 0, 1).await;
    assert_eq!(first.status(), 200);

    // when (操作): すぐにもう 1 回置く
    let second = place(&client, &base_url, "tok-alice", 1, 0, 2).await;

    // then (期待する結果): 429 と残り秒数が返り、キャンバスは変わらない
    assert_eq!(second.status(), 429);
    let body: serde_json::Value = second.json().await.unwrap();
    let remaining = body["remainingSeconds"].as_u64().unwrap();
    assert!(remaining >= 1 && remaining <= 10);

    let canvas: serde_json::Value = client
        .get(format!("{}/api/canvas", base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let pixels = canvas["pixels"].as_array().unwrap();
    assert_eq!(pixels[1], 0);
}

#[tokio::test]
async fn test_admin_bypasses_cooldown() {
    // テスト項目: 管理者は連続配置してもクールダウンに掛からない
    // given (前提条件):
    let (base_url, _ws_url) = spawn_test_server().await;
    let client = reqwest::Client::new();

    // when (操作): admin が立て続けに 3 回置く
    for i in 0..3u32 {
        let response = place(&client, &base_url, "tok-root", i, 0, 7).await;
        // then (期待する結果): すべてコミットされる
        assert_eq!(response.status(), 200);
    }
}

#[tokio::test]
async fn test_invalid_color_and_coords_rejected() {
    // テスト項目: 範囲外の色・座標は 400 で拒否され、状態は変わらない
    // given (前提条件):
    let (base_url, _ws_url) = spawn_test_server().await;
    let client = reqwest::Client::new();

    // when (操作) / then (期待する結果):
    let bad_color = place(&client, &base_url, "tok-alice", 0, 0, 70).await;
    assert_eq!(bad_color.status(), 400);

    let off_grid = place(&client, &base_url, "tok-alice", 150, 0, 1).await;
    assert_eq!(off_grid.status(), 400);

    // 拒否された配置はクールダウンを開始しない
    let valid = place(&client, &base_url, "tok-alice", 0, 0, 1).await;
    assert_eq!(valid.status(), 200);
}

#[tokio::test]
async fn test_missing_or_invalid_token_unauthorized() {
    // テスト項目: トークン無し・不正トークンの配置は 401 で拒否される
    // given (前提条件):
    let (base_url, _ws_url) = spawn_test_server().await;
    let client = reqwest::Client::new();

    // when (操作) / then (期待する結果):
    let no_token = client
        .post(format!("{}/api/pixels", base_url))
        .json(&serde_json::json!({"x": 0, "y": 0, "color": 1}))
        .send()
        .await
        .unwrap();
    assert_eq!(no_token.status(), 401);

    let bad_token = place(&client, &base_url, "tok-unknown", 0, 0, 1).await;
    assert_eq!(bad_token.status(), 401);
}

#[tokio::test]
async fn test_concurrent_users_on_disjoint_cells() {
    // テスト項目: 別ユーザーの別セルへの配置は両方コミットされ、両方配信される
    // given (前提条件): ビューアが 1 つ接続している
    let (base_url, ws_url) = spawn_test_server().await;
    let client = reqwest::Client::new();
    let mut viewer = connect_viewer(&ws_url).await;

    // when (操作): alice と bob がそれぞれ別のセルに置く
    let alice = place(&client, &base_url, "tok-alice", 5, 5, 10).await;
    let bob = place(&client, &base_url, "tok-bob", 6, 6, 20).await;

    // then (期待する結果): 両方 200 で、ビューアに 2 件の PIXEL_UPDATE が届く
    assert_eq!(alice.status(), 200);
    assert_eq!(bob.status(), 200);

    let first = next_text(&mut viewer).await;
    let second = next_text(&mut viewer).await;
    assert_eq!(first["payload"]["x"], 5);
    assert_eq!(first["payload"]["color"], 10);
    assert_eq!(second["payload"]["x"], 6);
    assert_eq!(second["payload"]["color"], 20);
}

#[tokio::test]
async fn test_auth_success_over_websocket() {
    // テスト項目: 有効なトークンの AUTH に AUTH_SUCCESS が返る
    // given (前提条件):
    let (_base_url, ws_url) = spawn_test_server().await;
    let mut viewer = connect_viewer(&ws_url).await;

    // when (操作):
    viewer
        .send(Message::Text(
            r#"{"type":"AUTH","token":"tok-alice"}"#.into(),
        ))
        .await
        .unwrap();

    // then (期待する結果):
    let reply = next_text(&mut viewer).await;
    assert_eq!(reply["type"], "AUTH_SUCCESS");
    assert_eq!(reply["payload"]["username"], "Alice");
}

#[tokio::test]
async fn test_unauthenticated_viewer_still_receives_broadcasts() {
    // テスト項目: AUTH が拒否されたビューアにもブロードキャストは届く
    // given (前提条件): 不正トークンで AUTH したビューア
    let (base_url, ws_url) = spawn_test_server().await;
    let client = reqwest::Client::new();
    let mut viewer = connect_viewer(&ws_url).await;

    viewer
        .send(Message::Text(
            r#"{"type":"AUTH","token":"tok-bogus"}"#.into(),
        ))
        .await
        .unwrap();
    let reply = next_text(&mut viewer).await;
    assert_eq!(reply["type"], "AUTH_ERROR");

    // when (操作): alice が置く
    let response = place(&client, &base_url, "tok-alice", 30, 40, 3).await;
    assert_eq!(response.status(), 200);

    // then (期待する結果): 未認証のビューアにも PIXEL_UPDATE が届く
    let update = next_text(&mut viewer).await;
    assert_eq!(update["type"], "PIXEL_UPDATE");
    assert_eq!(update["payload"]["x"], 30);
    assert_eq!(update["payload"]["y"], 40);
}

#[tokio::test]
async fn test_malformed_websocket_message_keeps_connection_open() {
    // テスト項目: 不正なメッセージは破棄され、接続は維持される
    // given (前提条件):
    let (base_url, ws_url) = spawn_test_server().await;
    let client = reqwest::Client::new();
    let mut viewer = connect_viewer(&ws_url).await;

    // when (操作): JSON ですらないフレームを送る
    viewer
        .send(Message::Text("not json at all".into()))
        .await
        .unwrap();
    viewer
        .send(Message::Text(r#"{"type":"AUTH"}"#.into()))
        .await
        .unwrap();

    // then (期待する結果): 接続は生きていて、以後の配信を受け取れる
    let response = place(&client, &base_url, "tok-alice", 1, 1, 9).await;
    assert_eq!(response.status(), 200);
    let update = next_text(&mut viewer).await;
    assert_eq!(update["type"], "PIXEL_UPDATE");
    assert_eq!(update["payload"]["color"], 9);
}

#[tokio::test]
async fn test_leaderboard_reports_counts_and_waiting_time() {
    // テスト項目: リーダーボードが配置数と残り待ち時間を返す
    // given (前提条件): alice と bob がそれぞれ 1 回置いている
    let (base_url, _ws_url) = spawn_test_server().await;
    let client = reqwest::Client::new();
    assert_eq!(place(&client, &base_url, "tok-alice", 0, 0, 1).await.status(), 200);
    assert_eq!(place(&client, &base_url, "tok-bob", 1, 1, 2).await.status(), 200);

    // when (操作):
    let entries: Vec<serde_json::Value> = client
        .get(format!("{}/api/leaderboard", base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    // then (期待する結果): 両ユーザーが pixelCount 1 で載り、待ち時間が 0〜10 秒
    let alice = entries
        .iter()
        .find(|e| e["id"] == "alice")
        .expect("alice missing from leaderboard");
    assert_eq!(alice["username"], "Alice");
    assert_eq!(alice["pixelCount"], 1);
    let waiting = alice["waitingTimeSeconds"].as_u64().unwrap();
    assert!(waiting <= 10);

    let bob = entries.iter().find(|e| e["id"] == "bob");
    assert!(bob.is_some());
}
