//! `POST /logout` and `GET /session/changes`.

use std::time::Duration;

use axum::{
  Extension, Json,
  extract::State,
  http::header,
  response::{IntoResponse, Redirect},
};
use duta_core::store::ResidentStore;
use serde::Serialize;
use tokio::time::timeout;

use crate::{
  AppState,
  auth::{SESSION_COOKIE, Session},
  identity::Identity,
};

/// End the caller's session and clear the cookie.
pub async fn logout<S>(
  State(state): State<AppState<S>>,
  Extension(session): Extension<Session>,
) -> impl IntoResponse
where
  S: ResidentStore + 'static,
{
  state.identity.sign_out(&session.token);
  tracing::info!(username = %session.identity.username, "signed out");

  let cookie = format!("{SESSION_COOKIE}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0");
  ([(header::SET_COOKIE, cookie)], Redirect::to("/login"))
}

#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct SessionStatus {
  pub signed_in: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub identity:  Option<Identity>,
  /// Set when the client should leave the page.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub redirect:  Option<&'static str>,
}

impl From<Option<Identity>> for SessionStatus {
  fn from(identity: Option<Identity>) -> Self {
    Self {
      signed_in: identity.is_some(),
      redirect: identity.is_none().then_some("/login"),
      identity,
    }
  }
}

/// Long-poll for the next change to the caller's session.
///
/// Answers as soon as the session changes, or with the unchanged state after
/// `session_wait_secs`.
pub async fn changes<S>(
  State(state): State<AppState<S>>,
  Extension(session): Extension<Session>,
) -> Json<SessionStatus>
where
  S: ResidentStore + 'static,
{
  let mut subscription = state.identity.subscribe(&session.token);
  let mut latest = subscription.next().await.flatten();

  let wait = Duration::from_secs(state.config.session_wait_secs);
  if latest.is_some() {
    latest = match timeout(wait, subscription.next()).await {
      Ok(Some(next)) => next,
      Ok(None) => None,
      Err(_) => latest,
    };
  }
  subscription.unsubscribe();

  Json(latest.into())
}
