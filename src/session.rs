//! Token session cell shared by every request issued through one client.
//!
//! The `(SST, TT)` pair lives in a single [`TokenPair`] behind an async reader-writer lock.
//! Request dispatch holds a read guard while the request is in flight; a refresh holds the write
//! guard for its whole duration, so readers never observe a half-applied update. A separate
//! single-flight gate serializes refresh attempts, and the pair's generation tells a task that
//! waited on the gate whether someone else already refreshed on its behalf.

// crates.io
use async_lock::{MutexGuard, RwLockReadGuard, RwLockWriteGuard};
// self
use crate::{_prelude::*, auth::TokenSecret};

/// Current authentication tokens plus refresh bookkeeping.
#[derive(Clone, Debug, Default)]
pub struct TokenPair {
	/// Super-secure token, once obtained.
	pub sst: Option<TokenSecret>,
	/// Temporary token, once obtained.
	pub tt: Option<TokenSecret>,
	/// Number of completed refresh attempts (successful or not).
	pub generation: u64,
	/// Instant of the last successful refresh.
	pub refreshed_at: Option<OffsetDateTime>,
}
impl TokenPair {
	/// Records a completed refresh attempt; `tt` is `Some` only when it succeeded.
	pub(crate) fn complete(&mut self, tt: Option<TokenSecret>) {
		self.generation = self.generation.wrapping_add(1);

		if let Some(tt) = tt {
			self.tt = Some(tt);
			self.refreshed_at = Some(OffsetDateTime::now_utc());
		}
	}
}

/// Secret-free view of the session for diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionSnapshot {
	/// Whether a super-secure token is held.
	pub has_sst: bool,
	/// Whether a temporary token is held.
	pub has_tt: bool,
	/// Number of completed refresh attempts.
	pub generation: u64,
	/// Instant of the last successful refresh.
	pub refreshed_at: Option<OffsetDateTime>,
}

/// Session state owned by one authenticated client.
#[derive(Debug, Default)]
pub struct Session {
	pair: AsyncRwLock<TokenPair>,
	refresh_gate: AsyncMutex<()>,
}
impl Session {
	/// Starts a session that already knows its super-secure token.
	pub fn with_sst(sst: TokenSecret) -> Self {
		Self {
			pair: AsyncRwLock::new(TokenPair { sst: Some(sst), ..Default::default() }),
			refresh_gate: AsyncMutex::new(()),
		}
	}

	/// Acquires a shared permit on the token pair.
	pub async fn read(&self) -> RwLockReadGuard<'_, TokenPair> {
		self.pair.read().await
	}

	/// Acquires the exclusive permit on the token pair.
	pub async fn write(&self) -> RwLockWriteGuard<'_, TokenPair> {
		self.pair.write().await
	}

	/// Waits for the single-flight refresh gate.
	pub async fn enter_refresh(&self) -> MutexGuard<'_, ()> {
		self.refresh_gate.lock().await
	}

	/// Returns a secret-free view of the current pair.
	pub async fn snapshot(&self) -> SessionSnapshot {
		let pair = self.read().await;

		SessionSnapshot {
			has_sst: pair.sst.is_some(),
			has_tt: pair.tt.is_some(),
			generation: pair.generation,
			refreshed_at: pair.refreshed_at,
		}
	}
}
