//! Optional observability helpers for client flows.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `gooddata_http_client.flow` with the `flow`
//!   and `stage` (call site) fields, plus debug events for challenge and refresh decisions.
//! - Enable `metrics` to increment the `gooddata_http_client_flow_total` counter for every
//!   attempt/success/failure/join, labeled by `flow` + `outcome`.
//!
//! Token values never reach either sink.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Flow kinds observed by the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowKind {
	/// A caller request, including its challenge/refresh/retry cycles.
	Request,
	/// Temporary-token refresh against the token endpoint.
	TtRefresh,
	/// Full re-authentication through the SST strategy.
	SstLogin,
}
impl FlowKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowKind::Request => "request",
			FlowKind::TtRefresh => "tt_refresh",
			FlowKind::SstLogin => "sst_login",
		}
	}
}
impl Display for FlowKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowOutcome {
	/// Entry to a client flow.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure folded into a synthetic response or propagated to the caller.
	Failure,
	/// The flow reused a refresh completed by another task.
	Joined,
}
impl FlowOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowOutcome::Attempt => "attempt",
			FlowOutcome::Success => "success",
			FlowOutcome::Failure => "failure",
			FlowOutcome::Joined => "joined",
		}
	}
}
impl Display for FlowOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
