// self
use crate::obs::{FlowKind, FlowOutcome};

/// Counter incremented once per recorded flow transition.
pub const FLOW_COUNTER: &str = "gooddata_http_client_flow_total";

/// Increments [`FLOW_COUNTER`] labeled with `flow` and `outcome`.
///
/// Compiles to nothing unless the `metrics` feature is enabled; the global recorder decides
/// where the sample ends up.
pub fn record_flow_outcome(kind: FlowKind, outcome: FlowOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(FLOW_COUNTER, "flow" => kind.as_str(), "outcome" => outcome.as_str())
			.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	let _ = (kind, outcome);
}

/// Records the terminal outcome of a flow: [`FlowOutcome::Success`] when `succeeded`, else
/// [`FlowOutcome::Failure`].
pub fn record_flow_result(kind: FlowKind, succeeded: bool) {
	let outcome = if succeeded { FlowOutcome::Success } else { FlowOutcome::Failure };

	record_flow_outcome(kind, outcome);
}
