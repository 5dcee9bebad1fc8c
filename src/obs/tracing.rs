// self
use crate::{_prelude::*, obs::FlowKind};

/// Future returned by [`FlowSpan::instrument`]; the bare future when `tracing` is off.
#[cfg(feature = "tracing")]
pub type InstrumentedFlow<F> = tracing::instrument::Instrumented<F>;
/// Passthrough alias used when `tracing` is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedFlow<F> = F;

/// `gooddata_http_client.flow` span carrying the `flow` and `stage` fields.
///
/// Without the `tracing` feature this is a zero-sized marker.
#[derive(Clone, Debug)]
pub struct FlowSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl FlowSpan {
	/// Opens an info-level span for `kind` at call site `stage`.
	pub fn new(kind: FlowKind, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		return Self {
			span: tracing::info_span!("gooddata_http_client.flow", flow = kind.as_str(), stage),
		};

		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, stage);

			Self {}
		}
	}

	/// Attaches the span to `fut`; it is entered on every poll, never across an `.await`.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedFlow<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		return tracing::Instrument::instrument(fut, self.span.clone());

		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Debug event describing a decision taken inside a flow.
///
/// `detail` must never contain token material.
pub fn flow_event(kind: FlowKind, detail: &str) {
	#[cfg(feature = "tracing")]
	tracing::debug!(flow = kind.as_str(), "{detail}");

	#[cfg(not(feature = "tracing"))]
	let _ = (kind, detail);
}

/// Warning event for a flow that ended without restoring the session.
pub fn flow_failure(kind: FlowKind, reason: &dyn Display) {
	#[cfg(feature = "tracing")]
	tracing::warn!(flow = kind.as_str(), %reason, "flow failed");

	#[cfg(not(feature = "tracing"))]
	let _ = (kind, reason);
}
