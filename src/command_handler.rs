use thiserror::Error;
use tracing::{debug, info, warn};

use crate::command::Command;
use crate::file_io::{FileIoError, LineSink, LineSource, ZoneFiles};
use crate::state::{InsertOutcome, Line, Window, WindowError};

pub const HELP_TEXT: &str = "\
commands:
  i<n> [text]  - insert text after line n (n = start - 1 inserts before the first line)
  d<n>         - delete line n
  d<n1> <n2>   - delete lines n1 through n2
  n            - next zone (write the current zone, load the next batch)
  p [n]        - print page n of the zone (default 1)
  s<n>@old@new - replace the first 'old' with 'new' on line n
  m<pattern>   - list lines of the zone containing pattern
  h            - show this help
  q            - write everything out and quit
";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
	Continue,
	Quit,
	/// The session should read lines to insert, the first after `after`.
	AwaitInsert { after: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Execution {
	pub success:   bool,
	pub message:   String,
	/// Console bytes shown after the message, copied verbatim.
	pub output:    Option<Vec<u8>>,
	pub flow:      Flow,
	/// Set when the zone changed shape and should be shown again.
	pub redisplay: bool,
}

impl Execution {
	fn done(message: impl Into<String>) -> Self {
		Self { success: true, message: message.into(), output: None, flow: Flow::Continue, redisplay: false }
	}

	fn failed(message: impl Into<String>) -> Self {
		Self { success: false, ..Self::done(message) }
	}

	fn with_output(mut self, output: Vec<u8>) -> Self {
		self.output = Some(output);
		self
	}

	fn with_flow(mut self, flow: Flow) -> Self {
		self.flow = flow;
		self
	}

	fn redisplayed(mut self) -> Self {
		self.redisplay = true;
		self
	}
}

#[derive(Debug, Error)]
pub enum ExecuteError {
	#[error(transparent)]
	Window(#[from] WindowError),
	#[error("line number {line_no} is outside the zone")]
	NegativeLineNumber { line_no: i64 },
	#[error(transparent)]
	FileIo(#[from] FileIoError),
}

pub struct CommandHandler {
	load_batch: usize,
}

impl CommandHandler {
	pub fn new(load_batch: usize) -> Self {
		Self { load_batch: load_batch.max(1) }
	}

	pub fn load_batch(&self) -> usize {
		self.load_batch
	}

	/// Runs a command that already passed `Command::validate`.
	pub fn execute<S: LineSource, K: LineSink>(
		&mut self,
		window: &mut Window,
		files: &mut ZoneFiles<S, K>,
		command: Command,
	) -> Result<Execution, ExecuteError> {
		match command {
			Command::Insert { after, text: None } => {
				let after = to_line_no(after)?;
				Ok(Execution::done("enter text to insert, an empty line finishes:")
					.with_flow(Flow::AwaitInsert { after }))
			}
			Command::Insert { after, text: Some(text) } => {
				let after = to_line_no(after)?;
				let outcome = self.insert(window, files, after, &text)?;
				let message = match outcome.line_no() {
					Some(line_no) => format!("inserted line {} after line {}", line_no, after),
					None => "line evicted on arrival and written to output".to_string(),
				};
				Ok(Execution::done(message).redisplayed())
			}
			Command::Delete { start, end: None } => {
				let line_no = to_line_no(start)?;
				window.delete_line(line_no)?;
				Ok(Execution::done(format!("deleted line {}", line_no)).redisplayed())
			}
			Command::Delete { start, end: Some(end) } => {
				let (start, end) = (to_line_no(start)?, to_line_no(end)?);
				window.delete_range(start, end)?;
				Ok(Execution::done(format!("deleted lines {} to {}", start, end)).redisplayed())
			}
			Command::NextZone => self.next_zone(window, files),
			Command::Print { page } => Ok(print_page(window, page)),
			Command::Replace { line_no, old, new } => {
				let line_no = to_line_no(line_no)?;
				if window.replace_in_line(line_no, &old, &new) {
					let (old, new) = (String::from_utf8_lossy(&old), String::from_utf8_lossy(&new));
					Ok(Execution::done(format!("line {}: replaced '{}' with '{}'", line_no, old, new)).redisplayed())
				} else {
					let old = String::from_utf8_lossy(&old);
					Ok(Execution::failed(format!("pattern '{}' not found in line {}", old, line_no)))
				}
			}
			Command::Match { pattern } => {
				let matches = window.find_pattern(&pattern);
				let pattern = String::from_utf8_lossy(&pattern);
				if matches.is_empty() {
					return Ok(Execution::done(format!("pattern '{}' not found", pattern)));
				}
				let lines = matches.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ");
				Ok(Execution::done(format!("pattern '{}' found in lines: {}", pattern, lines)))
			}
			Command::Help => Ok(Execution::done("").with_output(HELP_TEXT.as_bytes().to_vec())),
			Command::Quit => Ok(Execution::done("quitting").with_flow(Flow::Quit)),
		}
	}

	/// Inserts one line and writes any evicted head to the output.
	pub fn insert<S: LineSource, K: LineSink>(
		&mut self,
		window: &mut Window,
		files: &mut ZoneFiles<S, K>,
		after: usize,
		text: &[u8],
	) -> Result<InsertOutcome, ExecuteError> {
		let outcome = window.insert(after, text);
		if let Some(evicted) = outcome.evicted() {
			write_evicted(files, evicted)?;
		}
		Ok(outcome)
	}

	/// Writes out the resident zone, renumbers past it, and loads the next
	/// batch from the input.
	fn next_zone<S: LineSource, K: LineSink>(
		&mut self,
		window: &mut Window,
		files: &mut ZoneFiles<S, K>,
	) -> Result<Execution, ExecuteError> {
		let written = write_window(window, files)?;
		let next_start = window.start_line_no() + window.line_count();
		window.clear();
		window.set_start_line_no(next_start);

		if files.input_exhausted() {
			info!(written, next_start, "zone written, input exhausted");
			return Ok(Execution::done("zone written to output, no more input"));
		}

		let loaded = load_zone(window, files, self.load_batch)?;
		info!(written, loaded, next_start, "advanced to next zone");
		Ok(Execution::done(format!("zone refreshed, loaded {} lines", loaded)))
	}
}

/// Appends up to `max_lines` input lines at the tail of `window`.
pub fn load_zone<S: LineSource, K: LineSink>(
	window: &mut Window,
	files: &mut ZoneFiles<S, K>,
	max_lines: usize,
) -> Result<usize, FileIoError> {
	let batch = files.read_batch(max_lines)?;
	let loaded = batch.len();
	for text in batch {
		if let Some(evicted) = window.append_line(Line::from_text(text)) {
			files.write_line(&evicted.text())?;
		}
	}
	debug!(loaded, "loaded batch");
	Ok(loaded)
}

/// Writes every resident line, head first. Returns how many reached the
/// output.
pub fn write_window<S: LineSource, K: LineSink>(
	window: &Window,
	files: &mut ZoneFiles<S, K>,
) -> Result<usize, FileIoError> {
	if !files.has_sink() {
		return Ok(0);
	}
	let mut written = 0;
	for (_, line) in window.iter() {
		files.write_line(&line.text())?;
		written += 1;
	}
	Ok(written)
}

fn write_evicted<S: LineSource, K: LineSink>(files: &mut ZoneFiles<S, K>, evicted: &Line) -> Result<(), FileIoError> {
	if !files.write_line(&evicted.text())? {
		warn!("no output file, evicted line dropped");
	}
	Ok(())
}

fn print_page(window: &Window, page: usize) -> Execution {
	if window.is_empty() {
		return Execution::done("zone is empty");
	}
	let total = window.total_pages();
	let page = page.min(total - 1);
	Execution::done(format!("showing page {} of {}", page + 1, total)).with_output(window.render_page(page))
}

fn to_line_no(line_no: i64) -> Result<usize, ExecuteError> {
	usize::try_from(line_no).map_err(|_| ExecuteError::NegativeLineNumber { line_no })
}
