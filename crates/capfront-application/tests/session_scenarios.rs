mod common;

use capfront_application::CapfrontApp;
use capfront_core::error::CapfrontError;
use capfront_core::remote::Method;
use capfront_core::session::MessageKind;
use common::{MockTransport, app, config, seed_user, serve_registry_tables, serve_user_tables};
use serde_json::json;

#[tokio::test]
async fn test_login_creates_session_and_refreshes() {
    let transport = MockTransport::new();
    serve_user_tables(&transport, "DEMAND");
    transport.on_json(Method::Post, "auth/login", json!({"token": "fresh"}));
    let app = app(&transport);

    let outcome = app.auth.login("alan", "pw").await.unwrap();

    assert!(outcome.refreshed);
    assert_eq!(app.directory.token("alan").await.as_deref(), Some("fresh"));
    let login = &transport.calls()[0];
    assert_eq!(login.path, "auth/login");
    assert_eq!(login.bearer, None);
    assert_eq!(
        login.body,
        Some(json!({"username": "alan", "password": "pw"}))
    );
    let simulations = app
        .directory
        .read("alan", |s| s.snapshot.simulations.len())
        .await
        .unwrap();
    assert_eq!(simulations, 2);
}

#[tokio::test]
async fn test_login_overwrites_previous_session() {
    let transport = MockTransport::new();
    serve_user_tables(&transport, "DEMAND");
    transport.on_json(Method::Post, "auth/login", json!({"token": "second"}));
    let app = app(&transport);
    seed_user(&app, "alan", 5).await;

    app.auth.login("alan", "pw").await.unwrap();

    let (token, current) = app
        .directory
        .read("alan", |s| (s.token.clone(), s.current_simulation_id))
        .await
        .unwrap();
    assert_eq!(token, "second");
    assert_eq!(current, 0);
}

#[tokio::test]
async fn test_login_with_failed_refresh_is_still_a_login() {
    let transport = MockTransport::new();
    transport.on_json(Method::Post, "auth/login", json!({"token": "fresh"}));
    transport.unreachable(Method::Get, "simulations/mine");
    let app = app(&transport);

    let outcome = app.auth.login("alan", "pw").await.unwrap();
    assert!(!outcome.refreshed);
    assert_eq!(outcome.message.kind, MessageKind::Warning);
    assert!(app.directory.read("alan", |s| s.logged_in).await.unwrap());
}

#[tokio::test]
async fn test_refused_credentials() {
    let transport = MockTransport::new();
    transport.on(
        Method::Post,
        "auth/login",
        401,
        r#"{"detail":"Incorrect username or password"}"#,
    );
    let app = app(&transport);

    let err = app.auth.login("alan", "wrong").await.unwrap_err();
    assert!(err.is_auth_expired());
    assert!(!app.directory.contains("alan").await);
    assert!(!err.user_facing().to_string().contains("Incorrect"));
}

#[tokio::test]
async fn test_register_then_login() {
    let transport = MockTransport::new();
    serve_user_tables(&transport, "DEMAND");
    transport.on(Method::Post, "auth/register", 200, "{}");
    transport.on_json(Method::Post, "auth/login", json!({"token": "newbie"}));
    transport.on(Method::Get, "simulations/mine", 200, "[]");
    let app = app(&transport);

    let outcome = app.auth.register("bea", "pw").await.unwrap();
    assert!(outcome.refreshed);
    assert_eq!(transport.paths()[..2], ["auth/register", "auth/login"]);
    assert_eq!(app.page("bea").await.state, "NO SIMULATION YET");
}

#[tokio::test]
async fn test_logout_is_local_even_if_server_fails() {
    let transport = MockTransport::new();
    transport.unreachable(Method::Post, "auth/logout");
    let app = app(&transport);
    seed_user(&app, "alan", 5).await;

    let acknowledged = app.auth.logout("alan").await.unwrap();

    assert!(!acknowledged);
    assert!(!app.directory.read("alan", |s| s.logged_in).await.unwrap());
    assert!(app.directory.contains("alan").await);
    assert_eq!(app.directory.token("alan").await, None);
}

#[tokio::test]
async fn test_clone_template_switches_simulation() {
    let transport = MockTransport::new();
    serve_user_tables(&transport, "DEMAND");
    transport.on_json(
        Method::Get,
        "users/clone/1",
        json!({"message": "Simulation created", "simulation": 7}),
    );
    let app = app(&transport);
    seed_user(&app, "alan", 5).await;

    let outcome = app.simulations.clone_template("alan", 1).await.unwrap();

    assert_eq!(outcome.simulation_id, 7);
    assert!(outcome.refreshed);
    let page = app.page("alan").await;
    assert_eq!(page.current_simulation_id, 7);
    assert_eq!(page.simulation().name, "Clone");
    assert_eq!(page.state, "DEMAND");
    assert_eq!(page.message.kind, MessageKind::Info);
}

#[tokio::test]
async fn test_clone_with_garbled_reply() {
    let transport = MockTransport::new();
    transport.on(Method::Get, "users/clone/1", 200, "{\"message\": \"ok\"}");
    let app = app(&transport);
    seed_user(&app, "alan", 5).await;

    let err = app.simulations.clone_template("alan", 1).await.unwrap_err();
    assert!(err.is_decode());
    let current = app
        .directory
        .read("alan", |s| s.current_simulation_id)
        .await
        .unwrap();
    assert_eq!(current, 5);
}

#[tokio::test]
async fn test_delete_simulation_refreshes() {
    let transport = MockTransport::new();
    serve_user_tables(&transport, "DEMAND");
    transport.on(Method::Get, "simulations/delete/7", 200, "{}");
    let app = app(&transport);
    seed_user(&app, "alan", 5).await;

    assert!(app.simulations.delete_simulation("alan", 7).await.unwrap());
    assert_eq!(transport.paths()[0], "simulations/delete/7");
    assert_eq!(transport.call_count(), 7);
}

#[tokio::test]
async fn test_reset_is_admin_only() {
    let transport = MockTransport::new();
    serve_registry_tables(&transport);
    transport.on(Method::Get, "action/reset", 200, "{}");
    let app = app(&transport);
    seed_user(&app, "alan", 5).await;
    seed_user(&app, "admin", 0).await;

    let err = app.simulations.admin_reset("alan").await.unwrap_err();
    assert!(matches!(err, CapfrontError::Rejected { status: 403 }));
    assert_eq!(transport.call_count(), 0);

    assert!(app.simulations.admin_reset("admin").await.unwrap());
    assert_eq!(
        transport.paths(),
        vec!["action/reset", "simulations/templates", "users/"]
    );
}

#[tokio::test]
async fn test_bootstrap_populates_registry_and_placeholders() {
    let transport = MockTransport::new();
    serve_registry_tables(&transport);
    transport.on_json(Method::Post, "auth/login", json!({"token": "admin-token"}));
    transport.on(Method::Get, "simulations/mine", 200, "[]");
    let app = app(&transport);
    seed_user(&app, "alan", 5).await;

    let report = app.bootstrap.run().await.unwrap();

    assert_eq!(report.templates, 1);
    assert_eq!(report.users, 3);
    assert!(report.registry_complete);
    // admin and alan already have sessions.
    assert_eq!(report.placeholders, 1);
    assert_eq!(
        app.directory.usernames().await,
        vec!["admin", "alan", "bea"]
    );
    assert_eq!(
        app.directory.token("alan").await.as_deref(),
        Some("token-alan")
    );
    assert!(!app.directory.read("bea", |s| s.logged_in).await.unwrap());
}

#[tokio::test]
async fn test_bootstrap_without_password_is_a_config_error() {
    let transport = MockTransport::new();
    let mut config = config();
    config.admin_password = None;
    let app = CapfrontApp::new(transport.clone(), config);

    let err = app.bootstrap.run().await.unwrap_err();
    assert!(matches!(err, CapfrontError::Config(_)));
    assert_eq!(transport.call_count(), 0);
}

#[tokio::test]
async fn test_bootstrap_login_failure_is_fatal() {
    let transport = MockTransport::new();
    transport.unreachable(Method::Post, "auth/login");
    let app = app(&transport);

    let err = app.bootstrap.run().await.unwrap_err();
    assert!(err.is_transport());
}
