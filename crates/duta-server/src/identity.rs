//! Signed-in identities and change notifications.
//!
//! Each session owns a [`watch`] channel carrying `Some(identity)` while the
//! session is live and `None` once it ends. Pages that need to react to a
//! sign-out subscribe to their session's channel.
//!
//! Sessions expire a fixed time after sign-in. Expired sessions are dropped
//! when looked up and swept on every new sign-in.

use std::{
  collections::HashMap,
  sync::{Arc, Mutex, MutexGuard, PoisonError},
  time::Duration,
};

use chrono::{DateTime, Utc};
use rand_core::{OsRng, RngCore};
use serde::Serialize;
use sha2::{Digest, Sha256};
use tokio::sync::watch;

/// Session lifetime used by [`IdentityService::new`].
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(12 * 60 * 60);

/// Who is signed in on a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
  pub username:     String,
  pub signed_in_at: DateTime<Utc>,
}

impl Identity {
  fn expired(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
    now
      .signed_duration_since(self.signed_in_at)
      .to_std()
      .is_ok_and(|age| age >= ttl)
  }
}

type Sessions = HashMap<String, watch::Sender<Option<Identity>>>;

/// Session registry. Cloning shares the same registry.
///
/// Tokens are only held as SHA-256 digests.
#[derive(Debug, Clone)]
pub struct IdentityService {
  sessions: Arc<Mutex<Sessions>>,
  ttl:      Duration,
}

impl Default for IdentityService {
  fn default() -> Self { Self::with_ttl(DEFAULT_SESSION_TTL) }
}

impl IdentityService {
  pub fn new() -> Self { Self::default() }

  /// A registry whose sessions end `ttl` after sign-in.
  pub fn with_ttl(ttl: Duration) -> Self {
    Self { sessions: Arc::default(), ttl }
  }

  fn sessions(&self) -> MutexGuard<'_, Sessions> {
    self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
  }

  /// Start a session for `username` and return its bearer token.
  pub fn sign_in(&self, username: &str) -> String {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    let token = hex::encode(bytes);

    let identity = Identity {
      username:     username.to_owned(),
      signed_in_at: Utc::now(),
    };
    let (tx, _) = watch::channel(Some(identity));

    let mut sessions = self.sessions();
    self.sweep(&mut sessions);
    sessions.insert(digest(&token), tx);
    token
  }

  /// The identity behind `token`, if the session is live. An expired session
  /// is ended here and its subscribers notified.
  pub fn current(&self, token: &str) -> Option<Identity> {
    let key = digest(token);
    let mut sessions = self.sessions();
    let identity = sessions.get(&key)?.borrow().clone()?;
    if !identity.expired(self.ttl, Utc::now()) {
      return Some(identity);
    }

    if let Some(tx) = sessions.remove(&key) {
      tx.send_replace(None);
    }
    tracing::info!(username = %identity.username, "session expired");
    None
  }

  fn sweep(&self, sessions: &mut Sessions) {
    let now = Utc::now();
    sessions.retain(|_, tx| {
      let live = tx
        .borrow()
        .as_ref()
        .is_some_and(|identity| !identity.expired(self.ttl, now));
      if !live {
        tx.send_replace(None);
      }
      live
    });
  }

  /// Watch the session behind `token`.
  ///
  /// An unknown token yields a subscription that reports `None` once and then
  /// ends.
  pub fn subscribe(&self, token: &str) -> Subscription {
    let rx = match self.sessions().get(&digest(token)) {
      Some(tx) => tx.subscribe(),
      None => watch::channel(None).1,
    };
    Subscription { rx, primed: false }
  }

  /// End the session behind `token`, notifying every subscriber. Returns
  /// false if there was no such session.
  pub fn sign_out(&self, token: &str) -> bool {
    let Some(tx) = self.sessions().remove(&digest(token)) else {
      return false;
    };
    tx.send_replace(None);
    true
  }
}

fn digest(token: &str) -> String { hex::encode(Sha256::digest(token.as_bytes())) }

/// A live view of one session's identity.
#[derive(Debug)]
pub struct Subscription {
  rx:     watch::Receiver<Option<Identity>>,
  primed: bool,
}

impl Subscription {
  /// The first call returns the current state. Later calls wait for the next
  /// change and return `None` once the session has ended and its final state
  /// has been delivered.
  pub async fn next(&mut self) -> Option<Option<Identity>> {
    if self.primed {
      self.rx.changed().await.ok()?;
    }
    self.primed = true;
    Some(self.rx.borrow_and_update().clone())
  }

  /// Stop receiving changes.
  pub fn unsubscribe(self) {}
}

#[cfg(test)]
mod tests {
  use std::time::Duration;

  use tokio::time::timeout;

  use super::*;

  #[test]
  fn tokens_are_unique_and_resolve() {
    let service = IdentityService::new();
    let a = service.sign_in("admin");
    let b = service.sign_in("admin");
    assert_ne!(a, b);
    assert_eq!(a.len(), 64);
    assert_eq!(service.current(&a).unwrap().username, "admin");
    assert!(service.current("not-a-token").is_none());
  }

  #[test]
  fn sign_out_ends_only_that_session() {
    let service = IdentityService::new();
    let a = service.sign_in("admin");
    let b = service.sign_in("admin");
    assert!(service.sign_out(&a));
    assert!(!service.sign_out(&a));
    assert!(service.current(&a).is_none());
    assert!(service.current(&b).is_some());
  }

  #[test]
  fn clones_share_sessions() {
    let service = IdentityService::new();
    let token = service.clone().sign_in("admin");
    assert!(service.current(&token).is_some());
  }

  #[tokio::test]
  async fn subscription_sees_current_then_sign_out() {
    let service = IdentityService::new();
    let token = service.sign_in("admin");
    let mut sub = service.subscribe(&token);

    let first = sub.next().await.unwrap();
    assert_eq!(first.unwrap().username, "admin");

    service.sign_out(&token);
    assert_eq!(sub.next().await, Some(None));
    assert_eq!(sub.next().await, None);
  }

  #[tokio::test]
  async fn subscription_waits_for_a_change() {
    let service = IdentityService::new();
    let token = service.sign_in("admin");
    let mut sub = service.subscribe(&token);
    sub.next().await;

    let pending = timeout(Duration::from_millis(20), sub.next()).await;
    assert!(pending.is_err());
    sub.unsubscribe();
  }

  #[tokio::test]
  async fn unknown_token_reports_signed_out() {
    let service = IdentityService::new();
    let mut sub = service.subscribe("nope");
    assert_eq!(sub.next().await, Some(None));
    assert_eq!(sub.next().await, None);
  }

  #[tokio::test]
  async fn expired_session_ends_on_lookup() {
    let service = IdentityService::with_ttl(Duration::ZERO);
    let token = service.sign_in("admin");
    let mut sub = service.subscribe(&token);
    assert!(sub.next().await.unwrap().is_some());

    assert!(service.current(&token).is_none());
    assert_eq!(sub.next().await, Some(None));
    assert!(!service.sign_out(&token));
  }

  #[test]
  fn sign_in_sweeps_expired_sessions() {
    let service = IdentityService::with_ttl(Duration::ZERO);
    for _ in 0..5 {
      service.sign_in("admin");
    }
    assert_eq!(service.sessions().len(), 1);
  }

  #[test]
  fn live_session_survives_sweep() {
    let service = IdentityService::with_ttl(Duration::from_secs(60));
    let a = service.sign_in("admin");
    service.sign_in("admin");
    assert_eq!(service.sessions().len(), 2);
    assert!(service.current(&a).is_some());
  }

  #[tokio::test]
  async fn every_subscriber_is_notified() {
    let service = IdentityService::new();
    let token = service.sign_in("admin");
    let mut one = service.subscribe(&token);
    let mut two = service.subscribe(&token);
    one.next().await;
    two.next().await;

    service.sign_out(&token);
    assert_eq!(one.next().await, Some(None));
    assert_eq!(two.next().await, Some(None));
  }
}
