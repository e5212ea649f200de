//! Interactive collaborators consulted by the flow: a chooser that picks one option from an
//! ordered list and a text prompt that reads a required string.
//!
//! Both calls may block indefinitely on a human. [`ScriptedPrompter`] answers from queues for
//! unattended runs, and `TerminalPrompter` (feature `dialoguer`) renders real terminal prompts.

// self
use crate::{_prelude::*, error::BoxError};

/// Failures raised by a [`Prompter`].
#[derive(Debug, ThisError)]
pub enum PromptError {
	/// The chooser returned an index outside the offered options.
	#[error("Choice {index} is out of range for {len} options.")]
	OutOfRange {
		/// Index returned by the chooser.
		index: usize,
		/// Number of options offered.
		len: usize,
	},
	/// No scripted answer remains for the prompt.
	#[error("No scripted answer remains for prompt `{prompt}`.")]
	Exhausted {
		/// Prompt text that went unanswered.
		prompt: String,
	},
	/// The underlying terminal or input source failed.
	#[error("Prompt input failed.")]
	Io {
		/// Input source failure.
		#[source]
		source: BoxError,
	},
}
impl PromptError {
	/// Wraps an input source failure.
	pub fn io(src: impl Into<BoxError>) -> Self {
		Self::Io { source: src.into() }
	}
}

/// Source of human answers for the authentication flow.
pub trait Prompter
where
	Self: Send + Sync,
{
	/// Asks the user to pick one of `options` and returns its index.
	fn choose(&self, prompt: &str, options: &[String]) -> Result<usize, PromptError>;

	/// Reads one line of input; may return an empty string.
	fn read_line(&self, prompt: &str) -> Result<String, PromptError>;

	/// Reads a non-empty, trimmed string, re-prompting until one is supplied.
	fn text_required(&self, prompt: &str) -> Result<String, PromptError> {
		loop {
			let line = self.read_line(prompt)?;
			let trimmed = line.trim();

			if !trimmed.is_empty() {
				return Ok(trimmed.to_owned());
			}
		}
	}
}

/// Validates that a chooser answer is inside the offered options.
pub(crate) fn checked_choice(
	prompter: &dyn Prompter,
	prompt: &str,
	options: &[String],
) -> Result<usize, PromptError> {
	let index = prompter.choose(prompt, options)?;

	if index < options.len() { Ok(index) } else { Err(PromptError::OutOfRange { index, len: options.len() }) }
}

/// One recorded chooser invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChooserCall {
	/// Prompt text shown to the user.
	pub prompt: String,
	/// Ordered options offered.
	pub options: Vec<String>,
}

/// Queue-driven [`Prompter`] for unattended runs and tests.
///
/// Answers are consumed in order; every chooser call and text prompt is recorded so callers
/// can assert on what the flow asked.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
	choices: Mutex<VecDeque<usize>>,
	lines: Mutex<VecDeque<String>>,
	chooser_calls: Mutex<Vec<ChooserCall>>,
	text_prompts: Mutex<Vec<String>>,
}
impl ScriptedPrompter {
	/// Queues the next chooser answer.
	pub fn with_choice(self, index: usize) -> Self {
		self.choices.lock().push_back(index);

		self
	}

	/// Queues the next text answer.
	pub fn with_line(self, line: impl Into<String>) -> Self {
		self.lines.lock().push_back(line.into());

		self
	}

	/// Returns every chooser invocation observed so far.
	pub fn chooser_calls(&self) -> Vec<ChooserCall> {
		self.chooser_calls.lock().clone()
	}

	/// Returns every text prompt observed so far, including re-prompts.
	pub fn text_prompts(&self) -> Vec<String> {
		self.text_prompts.lock().clone()
	}
}
impl Prompter for ScriptedPrompter {
	fn choose(&self, prompt: &str, options: &[String]) -> Result<usize, PromptError> {
		self.chooser_calls
			.lock()
			.push(ChooserCall { prompt: prompt.to_owned(), options: options.to_vec() });
		self.choices.lock().pop_front().ok_or_else(|| PromptError::Exhausted { prompt: prompt.to_owned() })
	}

	fn read_line(&self, prompt: &str) -> Result<String, PromptError> {
		self.text_prompts.lock().push(prompt.to_owned());
		self.lines.lock().pop_front().ok_or_else(|| PromptError::Exhausted { prompt: prompt.to_owned() })
	}
}

/// Terminal [`Prompter`] backed by `dialoguer`.
#[cfg(feature = "dialoguer")]
#[derive(Clone, Copy, Debug, Default)]
pub struct TerminalPrompter;
#[cfg(feature = "dialoguer")]
impl Prompter for TerminalPrompter {
	fn choose(&self, prompt: &str, options: &[String]) -> Result<usize, PromptError> {
		dialoguer::Select::new()
			.with_prompt(prompt)
			.items(options)
			.default(0)
			.interact()
			.map_err(PromptError::io)
	}

	fn read_line(&self, prompt: &str) -> Result<String, PromptError> {
		dialoguer::Input::<String>::new()
			.with_prompt(prompt)
			.allow_empty(true)
			.interact_text()
			.map_err(PromptError::io)
	}
}
