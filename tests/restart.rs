//! Restart server integration tests
//!
//! Run the lifecycle over real sockets on an ephemeral port, with restarts
//! driven through an in-memory trigger instead of OS signals.

use std::net::SocketAddr;
use std::time::Duration;

use axum::{routing::get, Router};
use tokio::sync::mpsc;

use chat_relay::server::{
    routes::create_greeting_router, RestartConfig, RestartError, RestartState, RestartableServer,
    SignalReason,
};

fn test_config() -> RestartConfig {
    RestartConfig::new("127.0.0.1:0".parse().unwrap())
        .with_grace_period(Duration::from_secs(2))
        .with_restart_pause(Duration::from_millis(300))
}

fn http_client() -> reqwest::Client {
    // No pooling: every request opens a fresh connection to the current listener
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .build()
        .unwrap()
}

async fn get_text(client: &reqwest::Client, addr: SocketAddr, path: &str) -> reqwest::Result<(u16, String)> {
    let response = client.get(format!("http://{}{}", addr, path)).send().await?;
    let status = response.status().as_u16();
    Ok((status, response.text().await?))
}

#[tokio::test]
async fn test_greeting_is_exact() {
    let mut server = RestartableServer::new(test_config(), create_greeting_router());
    let addr = server.start().await.unwrap();

    let (status, body) = get_text(&http_client(), addr, "/").await.unwrap();
    assert_eq!(status, 200);
    assert_eq!(body, "Hello, World!\n");

    let (status, _) = get_text(&http_client(), addr, "/missing").await.unwrap();
    assert_eq!(status, 404);

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_trigger_restarts_on_same_port_and_keeps_running() {
    let mut server = RestartableServer::new(test_config(), create_greeting_router());
    let addr = server.start().await.unwrap();
    let mut state = server.subscribe_state();

    let (trigger, rx) = mpsc::channel(4);
    let running = tokio::spawn(server.run(rx));
    let client = http_client();

    assert_eq!(get_text(&client, addr, "/").await.unwrap().1, "Hello, World!\n");

    for reason in [SignalReason::Terminate, SignalReason::Manual] {
        trigger.send(reason).await.unwrap();

        tokio::time::timeout(Duration::from_secs(5), state.wait_for(|s| *s == RestartState::Restarting))
            .await
            .expect("restart did not begin")
            .unwrap();
        tokio::time::timeout(Duration::from_secs(5), state.wait_for(|s| *s == RestartState::Serving))
            .await
            .expect("restart did not finish")
            .unwrap();

        let (status, body) = get_text(&client, addr, "/").await.unwrap();
        assert_eq!(status, 200);
        assert_eq!(body, "Hello, World!\n");
        assert!(!running.is_finished());
    }

    // Closing the trigger is the only way out of the loop
    drop(trigger);
    tokio::time::timeout(Duration::from_secs(5), running)
        .await
        .expect("run did not return after trigger closed")
        .unwrap();

    assert!(get_text(&client, addr, "/").await.is_err());
}

#[tokio::test]
async fn test_in_flight_request_completes_during_restart() {
    let router = Router::new().route(
        "/slow",
        get(|| async {
            tokio::time::sleep(Duration::from_millis(400)).await;
            "done"
        }),
    );

    let mut server = RestartableServer::new(test_config(), router);
    let addr = server.start().await.unwrap();

    let client = http_client();
    let in_flight = tokio::spawn(async move { get_text(&client, addr, "/slow").await });

    tokio::time::sleep(Duration::from_millis(100)).await;
    server.restart().await;

    let (status, body) = in_flight.await.unwrap().unwrap();
    assert_eq!(status, 200);
    assert_eq!(body, "done");
    assert_eq!(server.state(), RestartState::Serving);

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_grace_period_expiry_forces_shutdown() {
    let router = Router::new().route(
        "/stuck",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(30)).await;
            "late"
        }),
    );

    let config = test_config().with_grace_period(Duration::from_millis(200));
    let mut server = RestartableServer::new(config, router);
    let addr = server.start().await.unwrap();

    let client = http_client();
    let stuck = tokio::spawn(async move { get_text(&client, addr, "/stuck").await });
    tokio::time::sleep(Duration::from_millis(100)).await;

    let err = server.stop().await.unwrap_err();
    assert!(matches!(err, RestartError::GracePeriodExpired(d) if d == Duration::from_millis(200)));
    assert!(!server.is_running());

    stuck.abort();

    // Listener is gone, so the same port can be taken again
    let addr_again = server.start().await.unwrap();
    assert_eq!(addr_again, addr);
}
