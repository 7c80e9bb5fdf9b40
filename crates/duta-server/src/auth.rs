//! Password check, session token lookup and the sign-in gate.

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::{
  extract::{Request, State},
  http::{HeaderMap, header},
  middleware::Next,
  response::{IntoResponse, Redirect, Response},
};
use duta_core::store::ResidentStore;

use crate::{AppState, error::Error, identity::Identity};

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "duta_session";

/// Credentials accepted as valid for this server instance.
#[derive(Clone)]
pub struct AuthConfig {
  pub username:      String,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  pub password_hash: String,
}

impl AuthConfig {
  pub fn verify(&self, username: &str, password: &str) -> Result<(), Error> {
    if username != self.username {
      return Err(Error::Unauthorized);
    }

    let parsed_hash =
      PasswordHash::new(&self.password_hash).map_err(|_| Error::Unauthorized)?;

    Argon2::default()
      .verify_password(password.as_bytes(), &parsed_hash)
      .map_err(|_| Error::Unauthorized)
  }
}

/// The session a request was made under. Inserted as a request extension
/// by [`require_identity`].
#[derive(Debug, Clone)]
pub struct Session {
  pub token:    String,
  pub identity: Identity,
}

/// Session token from the `duta_session` cookie, falling back to an
/// `Authorization: Bearer` header.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
  let from_cookie = headers
    .get_all(header::COOKIE)
    .iter()
    .filter_map(|v| v.to_str().ok())
    .flat_map(|v| v.split(';'))
    .filter_map(|pair| pair.trim().split_once('='))
    .find(|(name, _)| *name == SESSION_COOKIE)
    .map(|(_, value)| value.to_owned());

  from_cookie.or_else(|| {
    headers
      .get(header::AUTHORIZATION)
      .and_then(|v| v.to_str().ok())
      .and_then(|v| v.strip_prefix("Bearer "))
      .map(str::to_owned)
  })
}

/// Let signed-in requests through; send everyone else to `/login`.
pub async fn require_identity<S>(
  State(state): State<AppState<S>>,
  mut request: Request,
  next: Next,
) -> Response
where
  S: ResidentStore + 'static,
{
  let session = session_token(request.headers()).and_then(|token| {
    let identity = state.identity.current(&token)?;
    Some(Session { token, identity })
  });

  match session {
    Some(session) => {
      request.extensions_mut().insert(session);
      next.run(request).await
    }
    None => {
      tracing::debug!(path = %request.uri().path(), "no session, redirecting");
      Redirect::to("/login").into_response()
    }
  }
}
