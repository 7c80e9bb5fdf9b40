//! `GET /login` and `POST /login`.

use axum::{
  Json,
  extract::State,
  http::{HeaderMap, header},
  response::{IntoResponse, Redirect, Response},
};
use duta_core::store::ResidentStore;
use serde::{Deserialize, Serialize};

use crate::{
  AppState,
  auth::{SESSION_COOKIE, session_token},
  error::Error,
};

#[derive(Debug, Serialize)]
pub struct LoginForm {
  pub action: &'static str,
  pub fields: [&'static str; 2],
}

/// Describes the sign-in form. A request that already carries a live session
/// is sent on to the dashboard.
pub async fn form<S>(State(state): State<AppState<S>>, headers: HeaderMap) -> Response
where
  S: ResidentStore + 'static,
{
  let signed_in = session_token(&headers)
    .is_some_and(|token| state.identity.current(&token).is_some());
  if signed_in {
    return Redirect::to("/dashboard").into_response();
  }
  Json(LoginForm { action: "/login", fields: ["username", "password"] })
    .into_response()
}

#[derive(Debug, Deserialize)]
pub struct Credentials {
  pub username: String,
  pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SignedIn {
  pub username: String,
  pub token:    String,
}

/// Verify the credentials and open a session, returned both as a cookie and
/// in the body for bearer clients.
pub async fn submit<S>(
  State(state): State<AppState<S>>,
  Json(creds): Json<Credentials>,
) -> Result<impl IntoResponse, Error>
where
  S: ResidentStore + 'static,
{
  if let Err(e) = state.auth.verify(&creds.username, &creds.password) {
    tracing::warn!(username = %creds.username, "rejected sign-in");
    return Err(e);
  }

  let token = state.identity.sign_in(&creds.username);
  tracing::info!(username = %creds.username, "signed in");

  let cookie = format!("{SESSION_COOKIE}={token}; HttpOnly; SameSite=Lax; Path=/");
  Ok((
    [(header::SET_COOKIE, cookie)],
    Json(SignedIn { username: creds.username, token }),
  ))
}
