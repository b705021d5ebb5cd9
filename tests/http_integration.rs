//! End-to-end polling against a local HTTP server.

use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use radiolog::app::AppContext;
use radiolog::config::Config;
use radiolog::daemon::Daemon;
use radiolog::domain::Playlist;
use radiolog::fetcher::FetchError;
use radiolog::publisher::{MemorySink, Publisher};
use radiolog::scheduler::{Action, FixedClock};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PAGE: &str = include_str!("fixtures/last_played.html");
const PAGE_PATH: &str = "/~nlum/caa-radio.php";

fn config_for(server: &MockServer) -> Config {
    let mut config = Config::default();
    config.source.url = format!("{}{}", server.uri(), PAGE_PATH);
    config.source.request_timeout_secs = 2;
    config
}

fn daemon(ctx: &AppContext, sink: &MemorySink, clock: Arc<FixedClock>) -> Daemon {
    Daemon::new(
        ctx.fetch_cycle(),
        Publisher::new(Box::new(sink.clone())),
        ctx.schedule,
        clock,
    )
}

#[tokio::test]
async fn test_fetch_cycle_parses_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(PAGE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(PAGE))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = AppContext::new(config_for(&server)).unwrap();
    let buffer = ctx.fetch_cycle().fetch().await.unwrap();

    // The row with an unknown zone is skipped
    assert_eq!(buffer.len(), 4);
    let newest = buffer.newest().unwrap();
    assert_eq!(newest.timestamp().timestamp(), 1381041727);
    assert_eq!(newest.artist(), Some("Daft Punk"));
    assert_eq!(buffer.entries()[3].artist(), Some("Simon & Garfunkel"));
}

#[tokio::test]
async fn test_service_unavailable_is_bad_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(PAGE_PATH))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let ctx = AppContext::new(config_for(&server)).unwrap();
    let err = ctx.fetch_cycle().fetch().await.unwrap_err();

    assert!(matches!(err, FetchError::BadStatus(503)));
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    let server = MockServer::start().await;
    let config = config_for(&server);
    drop(server);

    let ctx = AppContext::new(config).unwrap();
    let err = ctx.fetch_cycle().fetch().await.unwrap_err();

    assert!(matches!(err, FetchError::Transport(_)));
}

#[tokio::test]
async fn test_slow_server_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(PAGE)
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let mut config = config_for(&server);
    config.source.request_timeout_secs = 1;
    let ctx = AppContext::new(config).unwrap();

    let err = ctx.fetch_cycle().fetch().await.unwrap_err();
    assert!(matches!(err, FetchError::Transport(_)));
}

#[tokio::test]
async fn test_daemon_publishes_once_then_goes_stale() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(PAGE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(PAGE))
        .expect(2)
        .mount(&server)
        .await;

    let ctx = AppContext::new(config_for(&server)).unwrap();
    let sink = MemorySink::new();
    // Ten minutes after the newest song started
    let clock = Arc::new(FixedClock::new(Utc.timestamp_opt(1381041727 + 600, 0).unwrap()));
    let mut daemon = daemon(&ctx, &sink, clock.clone());

    let first = daemon.run_cycle().await;
    assert_eq!(first.action, Action::ResumePolling);
    assert_eq!(first.delay, Duration::from_secs(30));

    clock.advance(first.delay);
    let second = daemon.run_cycle().await;
    assert_eq!(second.action, Action::SourceStale);
    assert_eq!(second.delay, Duration::from_secs(600));

    let docs = sink.documents();
    assert_eq!(docs.len(), 1);

    let json: serde_json::Value = serde_json::from_slice(&docs[0]).unwrap();
    assert_eq!(json["songs"].as_array().unwrap().len(), 4);
    assert_eq!(json["songs"][0]["timestamp"], 1381041727);
    assert_eq!(json["songs"][0]["artist"], "Daft Punk");
    assert_eq!(json["songs"][1]["artist"], serde_json::Value::Null);
    assert_eq!(json["songs"][2]["title"], "Us and Them - 2011 Remaster");

    let playlist = Playlist::from_json(&docs[0]).unwrap();
    assert_eq!(playlist.songs[1].title(), "Station Identification");
}

#[tokio::test]
async fn test_daemon_backs_off_on_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let ctx = AppContext::new(config_for(&server)).unwrap();
    let sink = MemorySink::new();
    let clock = Arc::new(FixedClock::new(Utc::now()));
    let mut daemon = daemon(&ctx, &sink, clock);

    let decision = daemon.run_cycle().await;

    assert_eq!(decision.action, Action::RetryAfterFailure);
    assert_eq!(decision.delay, Duration::from_secs(60));
    assert!(sink.is_empty());
    assert!(daemon.state().previous_newest().is_none());
}
