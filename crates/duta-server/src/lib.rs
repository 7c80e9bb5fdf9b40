//! HTTP server for Duta Desa.
//!
//! Wraps the resident pages from [`duta_api`] behind a session check and adds
//! the public landing page, sign-in and sign-out.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod identity;

pub use error::Error;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router, middleware,
  routing::{get, post},
};
use duta_core::store::ResidentStore;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use auth::AuthConfig;
use handlers::{landing, login, session};
use identity::IdentityService;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:               String,
  pub port:               u16,
  pub store_path:         PathBuf,
  pub auth_username:      String,
  pub auth_password_hash: String,
  /// Upper bound on how long `/session/changes` holds a request open.
  #[serde(default = "default_session_wait")]
  pub session_wait_secs:  u64,
  /// How long a sign-in stays valid.
  #[serde(default = "default_session_ttl")]
  pub session_ttl_secs:   u64,
}

fn default_session_wait() -> u64 { 25 }

fn default_session_ttl() -> u64 { identity::DEFAULT_SESSION_TTL.as_secs() }

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<S> {
  pub store:    Arc<S>,
  pub config:   Arc<ServerConfig>,
  pub auth:     Arc<AuthConfig>,
  pub identity: IdentityService,
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self {
      store:    self.store.clone(),
      config:   self.config.clone(),
      auth:     self.auth.clone(),
      identity: self.identity.clone(),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application router.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: ResidentStore + 'static,
{
  let signed_in = duta_api::api_router(state.store.clone())
    .merge(
      Router::new()
        .route("/logout", post(session::logout::<S>))
        .route("/session/changes", get(session::changes::<S>))
        .with_state(state.clone()),
    )
    .route_layer(middleware::from_fn_with_state(
      state.clone(),
      auth::require_identity::<S>,
    ));

  Router::new()
    .route("/", get(landing::handler))
    .route("/login", get(login::form::<S>).post(login::submit::<S>))
    .with_state(state)
    .merge(signed_in)
    .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
  use std::time::Duration;

  use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
  use axum::{
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
    response::Response,
  };
  use duta_store_sqlite::SqliteStore;
  use rand_core::OsRng;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;

  use super::*;

  async fn make_state(password: &str) -> AppState<SqliteStore> {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
      .hash_password(password.as_bytes(), &salt)
      .unwrap()
      .to_string();

    AppState {
      store:    Arc::new(store),
      config:   Arc::new(ServerConfig {
        host:               "127.0.0.1".to_string(),
        port:               8080,
        store_path:         PathBuf::from(":memory:"),
        auth_username:      "admin".to_string(),
        auth_password_hash: hash.clone(),
        session_wait_secs:  1,
        session_ttl_secs:   60,
      }),
      auth:     Arc::new(AuthConfig {
        username:      "admin".to_string(),
        password_hash: hash,
      }),
      identity: IdentityService::new(),
    }
  }

  async fn oneshot(
    state: &AppState<SqliteStore>,
    method: &str,
    uri: &str,
    headers: Vec<(header::HeaderName, String)>,
    body: Option<Value>,
  ) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    for (k, v) in headers {
      builder = builder.header(k, v);
    }
    let body = match body {
      Some(v) => {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
        Body::from(v.to_string())
      }
      None => Body::empty(),
    };
    router(state.clone())
      .oneshot(builder.body(body).unwrap())
      .await
      .unwrap()
  }

  async fn json_body(res: Response) -> Value {
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  fn bearer(token: &str) -> Vec<(header::HeaderName, String)> {
    vec![(header::AUTHORIZATION, format!("Bearer {token}"))]
  }

  // ── Public pages ────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn landing_is_public() {
    let state = make_state("rahasia").await;
    let res = oneshot(&state, "GET", "/", vec![], None).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = json_body(res).await;
    assert_eq!(body["title"], "Duta Desa");
    assert_eq!(body["feedback"]["href"], landing::FEEDBACK_URL);
  }

  #[tokio::test]
  async fn login_form_is_public() {
    let state = make_state("rahasia").await;
    let res = oneshot(&state, "GET", "/login", vec![], None).await;
    assert_eq!(res.status(), StatusCode::OK);
  }

  // ── Gate ────────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn signed_out_requests_redirect_to_login() {
    let state = make_state("rahasia").await;
    for uri in ["/dashboard", "/data-penduduk", "/tambah-data-penduduk", "/session/changes"] {
      let res = oneshot(&state, "GET", uri, vec![], None).await;
      assert_eq!(res.status(), StatusCode::SEE_OTHER, "{uri}");
      assert_eq!(res.headers()[header::LOCATION], "/login");
    }
  }

  #[tokio::test]
  async fn stale_token_redirects() {
    let state = make_state("rahasia").await;
    let res = oneshot(&state, "GET", "/dashboard", bearer("deadbeef"), None).await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
  }

  // ── Sign-in flow ────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn wrong_password_is_rejected() {
    let state = make_state("rahasia").await;
    let res = oneshot(
      &state,
      "POST",
      "/login",
      vec![],
      Some(json!({ "username": "admin", "password": "salah" })),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
  }

  #[tokio::test]
  async fn login_cookie_opens_pages() {
    let state = make_state("rahasia").await;
    let res = oneshot(
      &state,
      "POST",
      "/login",
      vec![],
      Some(json!({ "username": "admin", "password": "rahasia" })),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let cookie = res.headers()[header::SET_COOKIE].to_str().unwrap().to_owned();
    assert!(cookie.starts_with("duta_session="));
    assert!(cookie.contains("HttpOnly"));

    let pair = cookie.split(';').next().unwrap().to_owned();
    let res = oneshot(&state, "GET", "/dashboard", vec![(header::COOKIE, pair.clone())], None).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(json_body(res).await["total_records"], 0);

    let res = oneshot(&state, "GET", "/login", vec![(header::COOKIE, pair)], None).await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(res.headers()[header::LOCATION], "/dashboard");
  }

  #[tokio::test]
  async fn bearer_token_can_add_and_list() {
    let state = make_state("rahasia").await;
    let token = state.identity.sign_in("admin");

    let res = oneshot(
      &state,
      "POST",
      "/tambah-data-penduduk",
      bearer(&token),
      Some(json!({
        "nama": "Budi Santoso",
        "jenis-kelamin": "Laki-laki",
        "kategori": "Penduduk Masuk",
        "keterangan": "pindahan dari Sragen",
        "tanggal-lahir": "1985-03-12",
      })),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = oneshot(&state, "GET", "/data-penduduk?q=budi", bearer(&token), None).await;
    let body = json_body(res).await;
    assert_eq!(body["total_matches"], 1);
    assert_eq!(body["rows"][0]["nama"], "Budi Santoso");
  }

  #[tokio::test]
  async fn expired_session_redirects() {
    let mut state = make_state("rahasia").await;
    state.identity = IdentityService::with_ttl(Duration::ZERO);
    let token = state.identity.sign_in("admin");

    let res = oneshot(&state, "GET", "/dashboard", bearer(&token), None).await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(res.headers()[header::LOCATION], "/login");
  }

  // ── Sign-out ────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn logout_ends_session() {
    let state = make_state("rahasia").await;
    let token = state.identity.sign_in("admin");

    let res = oneshot(&state, "POST", "/logout", bearer(&token), None).await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(res.headers()[header::LOCATION], "/login");
    assert!(res.headers()[header::SET_COOKIE].to_str().unwrap().contains("Max-Age=0"));

    let res = oneshot(&state, "GET", "/dashboard", bearer(&token), None).await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
  }

  #[tokio::test]
  async fn session_changes_times_out_unchanged() {
    let state = make_state("rahasia").await;
    let token = state.identity.sign_in("admin");

    let res = oneshot(&state, "GET", "/session/changes", bearer(&token), None).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = json_body(res).await;
    assert_eq!(body["signed_in"], true);
    assert_eq!(body["identity"]["username"], "admin");
    assert!(body.get("redirect").is_none());
  }

  #[tokio::test]
  async fn session_changes_reports_sign_out() {
    let state = make_state("rahasia").await;
    let token = state.identity.sign_in("admin");

    let poll = {
      let state = state.clone();
      let token = token.clone();
      tokio::spawn(async move {
        oneshot(&state, "GET", "/session/changes", bearer(&token), None).await
      })
    };
    tokio::time::sleep(Duration::from_millis(100)).await;
    state.identity.sign_out(&token);

    let body = json_body(poll.await.unwrap()).await;
    assert_eq!(body["signed_in"], false);
    assert_eq!(body["redirect"], "/login");
  }
}
