// self
use crate::obs::{FlowOutcome, Stage};

/// Records a stage outcome via the global metrics recorder (when enabled).
pub fn record_flow_outcome(stage: Stage, outcome: FlowOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"okta_saml_broker_flow_total",
			"stage" => stage.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (stage, outcome);
	}
}

/// Records one Duo status response, labeled by its reported `result`.
pub fn record_duo_poll(result: &str) {
	#[cfg(feature = "metrics")]
	{
		let label = match result {
			"SUCCESS" => "success",
			"FAILURE" => "failure",
			_ => "pending",
		};

		metrics::counter!("okta_saml_broker_duo_poll_total", "result" => label).increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = result;
	}
}
