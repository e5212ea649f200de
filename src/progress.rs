//! Progress events surfaced while the flow waits on the user's MFA device.

// self
use crate::_prelude::*;

/// Informational event emitted during an authentication attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProgressEvent {
	/// An MFA factor was chosen (implicitly or by the user).
	FactorSelected {
		/// Human-readable factor label.
		label: String,
	},
	/// Status message reported by the Duo status endpoint.
	DuoStatus {
		/// Message text, e.g. `Pushed a login request to your device...`.
		message: String,
	},
	/// The flow is about to wait before polling Duo again.
	DuoWaiting {
		/// Number of status requests issued so far.
		attempt: u32,
	},
}

/// Destination for [`ProgressEvent`]s.
///
/// Any `Fn(&ProgressEvent) + Send + Sync` closure is a sink.
pub trait ProgressSink
where
	Self: Send + Sync,
{
	/// Handles one event. Implementations must not block for long.
	fn emit(&self, event: &ProgressEvent);
}
impl<F> ProgressSink for F
where
	F: Fn(&ProgressEvent) + Send + Sync,
{
	fn emit(&self, event: &ProgressEvent) {
		self(event)
	}
}

/// Prints Duo status messages to stdout and ignores other events.
#[derive(Clone, Copy, Debug, Default)]
pub struct StdoutProgress;
impl ProgressSink for StdoutProgress {
	fn emit(&self, event: &ProgressEvent) {
		if let ProgressEvent::DuoStatus { message } = event {
			println!("{message}");
		}
	}
}

/// Collects every event in memory.
#[derive(Debug, Default)]
pub struct ProgressLog(Mutex<Vec<ProgressEvent>>);
impl ProgressLog {
	/// Returns a snapshot of the events collected so far.
	pub fn events(&self) -> Vec<ProgressEvent> {
		self.0.lock().clone()
	}

	/// Returns the Duo status messages collected so far.
	pub fn duo_messages(&self) -> Vec<String> {
		self.0
			.lock()
			.iter()
			.filter_map(|event| match event {
				ProgressEvent::DuoStatus { message } => Some(message.clone()),
				_ => None,
			})
			.collect()
	}
}
impl ProgressSink for ProgressLog {
	fn emit(&self, event: &ProgressEvent) {
		self.0.lock().push(event.clone());
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn closures_and_logs_receive_events() {
		let seen = Arc::new(Mutex::new(0_usize));
		let counter = seen.clone();
		let sink = move |_: &ProgressEvent| *counter.lock() += 1;
		let log = ProgressLog::default();

		for target in [&sink as &dyn ProgressSink, &log] {
			target.emit(&ProgressEvent::DuoStatus { message: "Pushed".into() });
			target.emit(&ProgressEvent::DuoWaiting { attempt: 1 });
		}

		assert_eq!(*seen.lock(), 2);
		assert_eq!(log.events().len(), 2);
		assert_eq!(log.duo_messages(), vec!["Pushed".to_owned()]);
	}
}
