//! Bounded-or-unbounded polling for asynchronous approvals.
//!
//! Waiting on a push approval has two terminal signals (approved, denied) and one continuation
//! signal. [`PollPolicy::run`] drives such a check with an injectable [`Sleeper`], so tests can
//! count waits without sleeping and callers can cap the number of polls.

// self
use crate::_prelude::*;

/// Boxed future returned by [`Sleeper::sleep`].
pub type SleepFuture<'a> = Pin<Box<dyn Future<Output = ()> + 'a + Send>>;

/// Suspends the flow between polls.
pub trait Sleeper
where
	Self: Send + Sync,
{
	/// Waits for `duration`; negative durations must complete immediately.
	fn sleep(&self, duration: Duration) -> SleepFuture<'_>;
}

/// [`Sleeper`] backed by `tokio::time::sleep`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TokioSleeper;
impl Sleeper for TokioSleeper {
	fn sleep(&self, duration: Duration) -> SleepFuture<'_> {
		let duration = std::time::Duration::try_from(duration).unwrap_or_default();

		Box::pin(tokio::time::sleep(duration))
	}
}

/// Outcome of one poll.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PollStatus<T> {
	/// The awaited approval arrived.
	Ready(T),
	/// Nothing decisive yet; poll again.
	Pending,
}

/// Interval and optional bound applied to a polling loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PollPolicy {
	/// Delay between two consecutive polls.
	pub interval: Duration,
	/// Maximum number of polls (the first, immediate one included); `None` polls forever.
	pub max_attempts: Option<u32>,
}
impl PollPolicy {
	/// Interval the Duo status endpoint is polled at.
	pub const DEFAULT_INTERVAL: Duration = Duration::seconds(3);

	/// Overrides the delay between polls.
	pub fn with_interval(mut self, interval: Duration) -> Self {
		self.interval = if interval.is_negative() { Duration::ZERO } else { interval };

		self
	}

	/// Caps the number of polls; `0` is treated as `1`.
	pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
		self.max_attempts = Some(max_attempts.max(1));

		self
	}

	/// Removes any poll cap.
	pub fn unbounded(mut self) -> Self {
		self.max_attempts = None;

		self
	}

	/// Runs `poll` until it yields [`PollStatus::Ready`] or an error.
	///
	/// The first poll runs immediately; every further poll is preceded by one
	/// [`Sleeper::sleep`] of [`PollPolicy::interval`]. `poll` receives the 1-based attempt
	/// number. `on_wait` runs with the attempt number right before each sleep, so it never fires
	/// for the last attempt. Exceeding [`PollPolicy::max_attempts`] yields
	/// [`Error::PollExhausted`].
	pub async fn run<T, F, Fut, W>(
		&self,
		sleeper: &dyn Sleeper,
		mut poll: F,
		mut on_wait: W,
	) -> Result<T>
	where
		F: FnMut(u32) -> Fut,
		Fut: Future<Output = Result<PollStatus<T>>>,
		W: FnMut(u32),
	{
		let mut attempt = 1;

		loop {
			if let PollStatus::Ready(value) = poll(attempt).await? {
				return Ok(value);
			}
			if self.max_attempts.is_some_and(|max| attempt >= max) {
				return Err(Error::PollExhausted { attempts: attempt });
			}

			on_wait(attempt);
			sleeper.sleep(self.interval).await;

			attempt += 1;
		}
	}
}
impl Default for PollPolicy {
	fn default() -> Self {
		Self { interval: Self::DEFAULT_INTERVAL, max_attempts: None }
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[derive(Default)]
	struct CountingSleeper(Mutex<Vec<Duration>>);
	impl Sleeper for CountingSleeper {
		fn sleep(&self, duration: Duration) -> SleepFuture<'_> {
			self.0.lock().push(duration);

			Box::pin(async {})
		}
	}

	fn scripted(results: &[&'static str]) -> Arc<Mutex<VecDeque<&'static str>>> {
		Arc::new(Mutex::new(results.iter().copied().collect()))
	}

	#[tokio::test]
	async fn sleeps_between_polls_only() {
		let sleeper = CountingSleeper::default();
		let script = scripted(&["WAITING", "WAITING", "SUCCESS"]);
		let value = PollPolicy::default()
			.run(
				&sleeper,
				|attempt| {
					let script = script.clone();

					async move {
						match script.lock().pop_front() {
							Some("SUCCESS") => Ok(PollStatus::Ready(attempt)),
							_ => Ok(PollStatus::Pending),
						}
					}
				},
				|_| {},
			)
			.await
			.expect("Third poll should succeed.");

		assert_eq!(value, 3);
		assert_eq!(*sleeper.0.lock(), vec![PollPolicy::DEFAULT_INTERVAL; 2]);
	}

	#[tokio::test]
	async fn bounded_policy_gives_up_without_waiting_after_last_attempt() {
		let sleeper = CountingSleeper::default();
		let mut waits = Vec::new();
		let err = PollPolicy::default()
			.with_max_attempts(3)
			.run(&sleeper, |_| async { Ok(PollStatus::<()>::Pending) }, |attempt| waits.push(attempt))
			.await
			.expect_err("Pending forever should exhaust the bound.");

		assert!(matches!(err, Error::PollExhausted { attempts: 3 }));
		assert_eq!(sleeper.0.lock().len(), 2);
		assert_eq!(waits, vec![1, 2]);
	}

	#[tokio::test]
	async fn poll_errors_stop_polling() {
		let sleeper = CountingSleeper::default();
		let err = PollPolicy::default()
			.run(
				&sleeper,
				|attempt| async move {
					if attempt == 2 {
						Err(Error::PollExhausted { attempts: 99 })
					} else {
						Ok(PollStatus::<()>::Pending)
					}
				},
				|_| {},
			)
			.await
			.expect_err("Poll error should propagate.");

		assert!(matches!(err, Error::PollExhausted { attempts: 99 }));
		assert_eq!(sleeper.0.lock().len(), 1);
	}

	#[test]
	fn negative_interval_clamps_to_zero() {
		let policy = PollPolicy::default().with_interval(Duration::seconds(-1)).with_max_attempts(0);

		assert_eq!(policy.interval, Duration::ZERO);
		assert_eq!(policy.max_attempts, Some(1));
		assert_eq!(policy.unbounded().max_attempts, None);
	}
}
