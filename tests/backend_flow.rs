//! End-to-end flows against a mock pair of backends served with axum

use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::time::Duration;

use logscope::api::client::fetch_dashboard_logs;
use logscope::api::{BackendClient, BackendUrls, LOGIN_FALLBACK};
use logscope::auth::{self, login_failure, register_failure};
use logscope::dashboard::{CardBody, DashboardView, ServerFilter};
use logscope::forms::{Field, FormKind, FormState};
use logscope::guard::{resolve, Access, Route};
use logscope::session::token::encode_unsigned;
use logscope::session::{FileSessionStore, SessionStore, TokenClaims};

const MFA_CODE: &str = "123456";
const PROVISIONING: &str = "otpauth://totp/Logscope:ana@example.com?secret=JBSWY3DPEHPK3PXP";

fn issued_token() -> String {
    encode_unsigned(&TokenClaims {
        email: Some("ana@example.com".to_string()),
        exp: Some(4_102_444_800),
        iat: Some(1_714_557_600),
    })
}

async fn login(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if body["token"] == MFA_CODE && body["password"] == "Abcdef1!" {
        (StatusCode::OK, Json(json!({ "token": issued_token() })))
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Código MFA inválido" })),
        )
    }
}

async fn register(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if body["email"] == "taken@example.com" {
        (
            StatusCode::CONFLICT,
            Json(json!({ "message": "El usuario ya existe" })),
        )
    } else {
        (
            StatusCode::CREATED,
            Json(json!({ "message": "Usuario registrado", "mfaSetup": PROVISIONING })),
        )
    }
}

async fn info() -> Json<Value> {
    Json(json!({ "nodeVersion": "v20.11.0", "mensaje": "Servidor 1 activo" }))
}

async fn primary_logs() -> Json<Value> {
    Json(json!({
        "logs": [
            { "logLevel": "info", "method": "GET", "statusCode": 200, "responseTime": "10ms", "timestamp": "2024-05-01T10:00:00Z" },
            { "logLevel": "info", "method": "POST", "statusCode": 201, "responseTime": "20ms", "timestamp": "2024-05-01T10:04:00Z" },
            { "logLevel": "error", "method": "GET", "statusCode": 500, "responseTime": "30ms", "timestamp": "2024-05-01T10:30:00Z" }
        ]
    }))
}

async fn secondary_logs() -> Json<Value> {
    Json(json!({
        "logs": [
            { "logLevel": "warn", "method": "GET", "statusCode": 429, "responseTime": "5ms", "timestamp": "2024-05-01T10:01:00Z" },
            { "method": "DELETE" }
        ]
    }))
}

async fn broken_logs() -> (StatusCode, Json<Value>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "message": "database unavailable" })),
    )
}

async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}/api", addr)
}

async fn backends(secondary_healthy: bool) -> BackendClient {
    let primary = Router::new()
        .route("/api/login", post(login))
        .route("/api/register", post(register))
        .route("/api/getInfo", get(info))
        .route("/api/logs", get(primary_logs));

    let secondary = if secondary_healthy {
        Router::new().route("/api/logs2", get(secondary_logs))
    } else {
        Router::new().route("/api/logs2", get(broken_logs))
    };

    let urls = BackendUrls::new(serve(primary).await, serve(secondary).await);
    BackendClient::new(urls, Duration::from_secs(5)).unwrap()
}

fn login_form(code: &str) -> FormState {
    FormState::new(FormKind::Login)
        .with(Field::Email, "ana@example.com")
        .with(Field::Password, "Abcdef1!")
        .with(Field::MfaCode, code)
}

#[tokio::test]
async fn test_login_stores_session_and_redirects_home() {
    let client = backends(true).await;
    let dir = tempfile::tempdir().unwrap();
    let session = FileSessionStore::new(dir.path().join("session.json"));

    assert_eq!(resolve(Route::Logs, &session), Access::Redirect(Route::Login));

    let outcome = auth::login(&client, &session, &login_form(MFA_CODE))
        .await
        .unwrap();

    assert_eq!(outcome.redirect_to, Route::Home);
    assert_eq!(outcome.delay, Duration::from_millis(1000));
    assert_eq!(session.identity(), "ana@example.com");
    assert_eq!(resolve(Route::Logs, &session), Access::Render(Route::Logs));

    // A second store on the same file sees the session
    let reopened = FileSessionStore::new(dir.path().join("session.json"));
    assert!(reopened.is_authenticated());

    auth::logout(&session).unwrap();
    assert_eq!(resolve(Route::Home, &reopened), Access::Redirect(Route::Login));
}

#[tokio::test]
async fn test_rejected_login_shows_backend_message() {
    let client = backends(true).await;
    let dir = tempfile::tempdir().unwrap();
    let session = FileSessionStore::new(dir.path().join("session.json"));

    let err = auth::login(&client, &session, &login_form("000000"))
        .await
        .unwrap_err();

    assert_eq!(login_failure(&err), "Código MFA inválido");
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn test_unreachable_backend_uses_fallback() {
    let urls = BackendUrls::new("http://127.0.0.1:1/api", "http://127.0.0.1:1/api");
    let client = BackendClient::new(urls, Duration::from_secs(2)).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let session = FileSessionStore::new(dir.path().join("session.json"));

    let err = auth::login(&client, &session, &login_form(MFA_CODE))
        .await
        .unwrap_err();
    assert_eq!(login_failure(&err), LOGIN_FALLBACK);
}

#[tokio::test]
async fn test_register_returns_enrollment() {
    let client = backends(true).await;

    let form = FormState::new(FormKind::Register)
        .with(Field::Email, "ana@example.com")
        .with(Field::Username, "ana")
        .with(Field::Password, "Abcdef1!")
        .with(Field::ConfirmPassword, "Abcdef1!");
    let enrollment = auth::register(&client, &form).await.unwrap();
    assert_eq!(enrollment.message, "Usuario registrado");
    assert_eq!(enrollment.provisioning.as_deref(), Some(PROVISIONING));

    let taken = form.with(Field::Email, "taken@example.com");
    let err = auth::register(&client, &taken).await.unwrap_err();
    assert_eq!(register_failure(&err), "El usuario ya existe");
}

#[tokio::test]
async fn test_server_info() {
    let client = backends(true).await;
    let info = client.server_info().await.unwrap();
    assert_eq!(info.node_version.as_deref(), Some("v20.11.0"));
    assert_eq!(info.mensaje.as_deref(), Some("Servidor 1 activo"));
}

#[tokio::test]
async fn test_dashboard_loads_both_servers() {
    let client = backends(true).await;
    let logs = fetch_dashboard_logs(&client).await;
    assert_eq!(logs.server1.len(), 3);
    assert_eq!(logs.server2.len(), 2);

    let view = DashboardView::build(&logs, ServerFilter::All);
    assert_eq!(view.cards.len(), 8);

    let Some(CardBody::Bar(levels)) = view.cards.first().map(|c| &c.body) else {
        panic!("first card should be the level comparison");
    };
    assert_eq!(levels.labels, vec!["info", "error", "warn", "unknown"]);
    assert_eq!(levels.datasets[0].data, vec![2, 1, 0, 0]);
    assert_eq!(levels.datasets[1].data, vec![0, 0, 1, 1]);

    let Some(CardBody::Stats { lines }) = view.card("⏱️ Tiempo Promedio de Respuesta").map(|c| &c.body)
    else {
        panic!("missing response time card");
    };
    assert_eq!(lines[0].to_string(), "Servidor 1: 20 ms");
    assert_eq!(lines[1].to_string(), "Servidor 2: 3 ms");

    let Some(CardBody::Stats { lines }) = view.card("🚀 Máx. peticiones en 10 min (S1 y S2)").map(|c| &c.body)
    else {
        panic!("missing peak card");
    };
    assert_eq!(lines[0].value, 2);
    assert_eq!(lines[1].value, 1);
}

#[tokio::test]
async fn test_failed_server_degrades_to_empty() {
    let client = backends(false).await;
    let logs = fetch_dashboard_logs(&client).await;

    assert_eq!(logs.server1.len(), 3);
    assert!(logs.server2.is_empty());

    let view = DashboardView::build(&logs, ServerFilter::Server2);
    assert_eq!(view.cards.len(), 5);
}
