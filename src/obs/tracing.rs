// self
use crate::{_prelude::*, obs::Stage};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedFlow<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedFlow<F> = F;

/// A span builder used by the authentication flow.
#[derive(Clone, Debug)]
pub struct FlowSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl FlowSpan {
	/// Creates a new span tagged with the provided stage.
	pub fn new(stage: Stage) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("okta_saml_broker.flow", stage = stage.as_str());

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = stage;

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedFlow<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Emits a debug event describing a poll response (when tracing is enabled).
pub fn trace_poll(attempt: u32, result: &str) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(attempt, result, "Duo status polled.");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (attempt, result);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn trace_poll_noop_without_tracing() {
		trace_poll(1, "WAITING");
	}

	#[tokio::test]
	async fn instrument_wraps_future() {
		let span = FlowSpan::new(Stage::DuoStatus);
		let value = span.instrument(async { 42 }).await;

		assert_eq!(value, 42);
	}
}
