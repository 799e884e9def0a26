//! Integration tests for lendsqr-core services
//!
//! Real DuckDB files and a real HTTP round trip against the mock users
//! server; only the clock is faked.
//!
//! Run with: cargo test --test integration_tests -- --nocapture

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use tempfile::TempDir;

use lendsqr_core::adapters::clock::ManualClock;
use lendsqr_core::adapters::duckdb::DuckDbStore;
use lendsqr_core::adapters::generator::generate_users;
use lendsqr_core::adapters::http::HttpUserApi;
use lendsqr_core::adapters::mock_server::{MockApiServer, MockConfig};
use lendsqr_core::config::Config;
use lendsqr_core::services::{EntryPoint, LogEvent, LogQuery, LoggingService, UsersSource};
use lendsqr_core::{Credentials, Error, FilterField, LendsqrContext, UserStatus};

// ============================================================================
// Test Helpers
// ============================================================================

fn start_server(count: usize) -> MockApiServer {
    MockApiServer::start(generate_users(count, 2024), MockConfig::default())
        .expect("Failed to start mock server")
}

fn test_clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap(),
    ))
}

/// Context over a DuckDB file in `dir`, the given server and clock
fn open_context(dir: &TempDir, server: &MockApiServer, clock: Arc<ManualClock>) -> LendsqrContext {
    let config = Config {
        api_base_url: Some(server.base_url()),
        login_delay_ms: 0,
        ..Config::default()
    };
    let store = DuckDbStore::new(&dir.path().join("lendsqr.duckdb"))
        .expect("Failed to open store");
    let api = HttpUserApi::new(&server.base_url()).expect("Failed to create client");
    LendsqrContext::from_parts(config, Arc::new(store), Arc::new(api), clock)
}

// ============================================================================
// Session persistence
// ============================================================================

#[test]
fn test_login_survives_reopen_and_logout_clears() {
    let dir = TempDir::new().unwrap();
    let server = start_server(5);

    {
        let ctx = open_context(&dir, &server, test_clock());
        let user = ctx.auth_service.login(&Credentials::default_pair()).unwrap();
        assert_eq!(user.name, "Adedeji");
    }

    let ctx = open_context(&dir, &server, test_clock());
    assert!(ctx.auth_service.is_authenticated());
    assert_eq!(
        ctx.auth_service.get_current_user().map(|u| u.email),
        Some("test@lendsqr.com".to_string())
    );

    ctx.auth_service.logout();
    drop(ctx);

    let ctx = open_context(&dir, &server, test_clock());
    assert!(!ctx.auth_service.is_authenticated());
    assert_eq!(ctx.session.get_token().unwrap(), None);
}

#[test]
fn test_failed_login_leaves_store_empty() {
    let dir = TempDir::new().unwrap();
    let server = start_server(1);
    let ctx = open_context(&dir, &server, test_clock());

    let err = ctx
        .auth_service
        .login(&Credentials::new("test@lendsqr.com", "wrong"))
        .unwrap_err();
    assert!(matches!(err, Error::InvalidCredentials));
    assert_eq!(ctx.session.get_token().unwrap(), None);
    assert_eq!(ctx.session.get_user().unwrap(), None);
}

// ============================================================================
// Cache policy over HTTP
// ============================================================================

#[test]
fn test_cache_window_and_stale_fallback_across_restarts() {
    let dir = TempDir::new().unwrap();
    let server = start_server(30);
    let clock = test_clock();

    {
        let ctx = open_context(&dir, &server, clock.clone());
        let fetch = ctx.user_service.fetch_users().unwrap();
        assert_eq!(fetch.source, UsersSource::Network);
        assert_eq!(fetch.users.len(), 30);
    }
    assert_eq!(server.user_requests(), 1);

    // Within the window: no network call
    clock.advance(Duration::hours(12));
    {
        let ctx = open_context(&dir, &server, clock.clone());
        let fetch = ctx.user_service.fetch_users().unwrap();
        assert_eq!(fetch.source, UsersSource::Cache);
    }
    assert_eq!(server.user_requests(), 1);

    // 24h and 1 minute after the fetch, with the API down
    clock.advance(Duration::hours(12) + Duration::minutes(1));
    server.set_failing(true);
    let ctx = open_context(&dir, &server, clock.clone());
    let fetch = ctx.user_service.fetch_users().unwrap();
    assert_eq!(fetch.source, UsersSource::StaleCache);
    assert_eq!(fetch.users.len(), 30);
    assert!(fetch.warnings[0].contains("500"));
    assert_eq!(server.user_requests(), 2);

    // Once the API recovers the list is refreshed
    server.set_failing(false);
    let fetch = ctx.user_service.fetch_users().unwrap();
    assert_eq!(fetch.source, UsersSource::Network);
    assert_eq!(server.user_requests(), 3);
}

#[test]
fn test_unreachable_api_without_cache_fails() {
    let dir = TempDir::new().unwrap();
    let mut server = start_server(3);
    let ctx = open_context(&dir, &server, test_clock());
    server.stop();

    let err = ctx.user_service.get_users().unwrap_err();
    assert!(matches!(err, Error::FetchFailed(_)));
}

#[test]
fn test_single_user_lookup_and_cache_clear() {
    let dir = TempDir::new().unwrap();
    let server = start_server(10);
    let ctx = open_context(&dir, &server, test_clock());

    let user = ctx.user_service.get_user_by_id("LSQ00000004").unwrap().unwrap();
    assert_eq!(user.id, "LSQ00000004");
    assert_eq!(ctx.user_service.get_user_by_id("LSQ00000404").unwrap(), None);

    // Cached lookup does not hit the server
    let before = server.user_requests();
    ctx.user_service.get_user_by_id("LSQ00000004").unwrap();
    assert_eq!(server.user_requests(), before);

    ctx.user_service.clear_cache().unwrap();
    assert_eq!(ctx.session.get_cached_user("LSQ00000004").unwrap(), None);
}

// ============================================================================
// Dashboard and table
// ============================================================================

#[test]
fn test_dashboard_and_table_over_served_data() {
    let dir = TempDir::new().unwrap();
    let server = MockApiServer::start(
        generate_users(23, 11),
        MockConfig {
            delay_ms: 20,
            ..Default::default()
        },
    )
    .unwrap();
    let ctx = open_context(&dir, &server, test_clock());

    let snapshot = ctx.dashboard_service.load().unwrap();
    assert_eq!(snapshot.stats.total_users, 23);
    assert_eq!(snapshot.stats.users_with_loans, 5);
    assert_eq!(snapshot.stats.users_with_savings, 9);

    let mut table = ctx.user_table(snapshot.users.users.clone()).unwrap();
    assert_eq!(table.total_pages(), 3);
    table.set_page(3);
    assert_eq!(table.page_items().len(), 3);

    table.set_filter(FilterField::Status, "BLACKLISTED");
    assert_eq!(table.current_page(), 1);
    assert!(table
        .filtered()
        .iter()
        .all(|u| u.status == UserStatus::Blacklisted));
}

// ============================================================================
// Logging
// ============================================================================

#[test]
fn test_logs_live_beside_session_database() {
    let dir = TempDir::new().unwrap();
    let server = start_server(1);
    let _ctx = open_context(&dir, &server, test_clock());

    let logger = LoggingService::new(dir.path(), EntryPoint::Cli, "0.1.0").unwrap();
    logger
        .log(
            LogEvent::new("users_fetch_failed")
                .with_user_id("LSQ00000001")
                .with_error("API responded with status: 500"),
        )
        .unwrap();

    assert!(dir.path().join("lendsqr.duckdb").exists());
    assert!(dir.path().join("logs.duckdb").exists());
    let errors = logger
        .query(&LogQuery::recent(5).for_user("LSQ00000001").errors_only())
        .unwrap();
    assert_eq!(errors.len(), 1);
}
