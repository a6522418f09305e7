use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{error, info, warn};

use crate::command::{Command, CommandError};
use crate::command_handler::{CommandHandler, ExecuteError, Flow, load_zone, write_window};
use crate::config::{ConfigError, EditorConfig};
use crate::file_io::{FileIoError, LineSink, LineSource, ZoneFiles, ZoneSink, ZoneSource};
use crate::state::Window;

#[derive(Debug, Error)]
pub enum AppError {
	#[error("input and output files must differ: {}", path.display())]
	SameInputOutput { path: PathBuf },
	#[error(transparent)]
	Config(#[from] ConfigError),
	#[error(transparent)]
	FileIo(#[from] FileIoError),
	#[error(transparent)]
	Execute(#[from] ExecuteError),
	#[error("console io failed")]
	Console(#[from] io::Error),
}

pub type FileApp = App<ZoneSource<BufReader<File>>, ZoneSink<BufWriter<File>>>;

pub struct App<S, K> {
	window:     Window,
	handler:    CommandHandler,
	files:      ZoneFiles<S, K>,
	input_name: Option<String>,
}

impl FileApp {
	/// Opens the session documents and loads the first zone.
	pub fn open(config: EditorConfig, input: Option<&Path>, output: Option<&Path>) -> Result<Self, AppError> {
		if let (Some(input), Some(output)) = (input, output)
			&& same_file(input, output)
		{
			return Err(AppError::SameInputOutput { path: input.to_path_buf() });
		}

		let source = input.map(ZoneSource::open).transpose()?;
		let sink = output.map(ZoneSink::create).transpose()?;
		let mut app = Self::new(config, ZoneFiles::new(source, sink))?;
		app.input_name = input.map(|path| path.display().to_string());
		Ok(app)
	}
}

impl<S: LineSource, K: LineSink> App<S, K> {
	pub fn new(config: EditorConfig, files: ZoneFiles<S, K>) -> Result<Self, AppError> {
		config.validate()?;
		let mut app = Self {
			window: Window::with_page_size(config.max_lines, config.page_size),
			handler: CommandHandler::new(config.load_batch),
			files,
			input_name: None,
		};
		let loaded = load_zone(&mut app.window, &mut app.files, app.handler.load_batch())?;
		info!(loaded, max_lines = config.max_lines, "session opened");
		Ok(app)
	}

	pub fn window(&self) -> &Window {
		&self.window
	}

	/// Runs the command loop until `q` or end of input, then writes the zone
	/// and the unread input to the output. Returns the session documents.
	///
	/// The zone is saved even when the loop fails; the loop's error is
	/// returned afterwards.
	pub fn run<R: BufRead, W: Write>(mut self, mut reader: R, mut writer: W) -> Result<ZoneFiles<S, K>, AppError> {
		let session = self.command_loop(&mut reader, &mut writer);
		let saved = self.save();
		match (session, saved) {
			(Err(err), saved) => {
				error!("session aborted: {}", err);
				if let Err(save_err) = saved {
					error!("save after aborted session failed: {}", save_err);
				}
				Err(err)
			}
			(Ok(()), Err(err)) => Err(err),
			(Ok(()), Ok(())) => {
				writer.flush()?;
				Ok(self.files)
			}
		}
	}

	fn command_loop<R: BufRead, W: Write>(&mut self, reader: &mut R, writer: &mut W) -> Result<(), AppError> {
		self.show_welcome(writer)?;

		loop {
			write!(writer, "\n> ")?;
			writer.flush()?;
			let Some(input) = read_input_line(reader)? else {
				return Ok(());
			};
			if input.trim_ascii().is_empty() {
				continue;
			}
			if self.process_command(&input, reader, writer)?.is_break() {
				return Ok(());
			}
		}
	}

	fn save(&mut self) -> Result<(), AppError> {
		let written = write_window(&self.window, &mut self.files)?;
		let copied = self.files.finish()?;
		info!(written, copied, "session closed");
		Ok(())
	}

	fn process_command<R: BufRead, W: Write>(
		&mut self,
		input: &[u8],
		reader: &mut R,
		writer: &mut W,
	) -> Result<ControlFlow<()>, AppError> {
		let command = match Command::parse(input) {
			Ok(command) => command,
			Err(err @ CommandError::Unknown { .. }) => {
				warn!("{}", err);
				writeln!(writer, "{}\ntype 'h' for help.", err)?;
				return Ok(ControlFlow::Continue(()));
			}
			Err(err) => {
				warn!("parse command failed: {}", err);
				writeln!(writer, "parse error: {}", err)?;
				return Ok(ControlFlow::Continue(()));
			}
		};
		if let Err(err) = command.validate(&self.window) {
			warn!("validate command failed: {}", err);
			writeln!(writer, "validation error: {}", err)?;
			return Ok(ControlFlow::Continue(()));
		}

		let execution = match self.handler.execute(&mut self.window, &mut self.files, command) {
			Ok(execution) => execution,
			Err(ExecuteError::FileIo(err)) => return Err(err.into()),
			Err(err) => {
				warn!("execute command failed: {}", err);
				writeln!(writer, "error: {}", err)?;
				return Ok(ControlFlow::Continue(()));
			}
		};
		if !execution.success {
			writeln!(writer, "error: {}", execution.message)?;
			return Ok(ControlFlow::Continue(()));
		}

		match execution.flow {
			Flow::Quit => {
				writeln!(writer, "{}", execution.message)?;
				return Ok(ControlFlow::Break(()));
			}
			Flow::AwaitInsert { after } => {
				writeln!(writer, "{}", execution.message)?;
				self.insert_mode(after, reader, writer)?;
				return Ok(ControlFlow::Continue(()));
			}
			Flow::Continue => {}
		}

		if !execution.message.is_empty() {
			writeln!(writer, "{}", execution.message)?;
		}
		if let Some(output) = &execution.output {
			writer.write_all(b"\n")?;
			writer.write_all(output)?;
		}
		if execution.redisplay {
			self.display_zone(writer)?;
		}
		Ok(ControlFlow::Continue(()))
	}

	/// Inserts each entered line after the previous one until an empty line
	/// or end of input.
	fn insert_mode<R: BufRead, W: Write>(&mut self, after: usize, reader: &mut R, writer: &mut W) -> Result<(), AppError> {
		let mut after = after;
		let mut inserted = 0;
		loop {
			write!(writer, "  ")?;
			writer.flush()?;
			let Some(text) = read_input_line(reader)? else {
				break;
			};
			if text.is_empty() {
				break;
			}
			let outcome = self.handler.insert(&mut self.window, &mut self.files, after, &text)?;
			if let Some(line_no) = outcome.line_no() {
				after = line_no;
			}
			inserted += 1;
		}

		if inserted > 0 {
			writeln!(writer, "inserted {} lines.", inserted)?;
			self.display_zone(writer)?;
		}
		Ok(())
	}

	fn show_welcome<W: Write>(&self, writer: &mut W) -> Result<(), AppError> {
		writeln!(writer, "\n===========================================")?;
		writeln!(writer, "     zonedit line editor {}", env!("CARGO_PKG_VERSION"))?;
		writeln!(writer, "===========================================")?;
		writeln!(writer, "type 'h' for help, 'q' to quit")?;

		if !self.window.is_empty() {
			write!(writer, "\nloaded {} lines", self.window.line_count())?;
			if let Some(name) = &self.input_name {
				write!(writer, " from {}", name)?;
			}
			writeln!(writer, ".")?;
			self.display_zone(writer)?;
		}
		Ok(())
	}

	fn display_zone<W: Write>(&self, writer: &mut W) -> Result<(), AppError> {
		if self.window.is_empty() {
			writeln!(writer, "\n[zone is empty]")?;
			return Ok(());
		}
		writer.write_all(b"\n")?;
		writer.write_all(&self.window.render_page(0))?;
		writeln!(writer, "\nshowing lines {} - {}.", self.window.start_line_no(), self.window.end_line_no())?;
		Ok(())
	}
}

/// Asks for the input and output names when none were given on the command
/// line. An empty input name means a new document.
pub fn prompt_file_names<R: BufRead, W: Write>(
	reader: &mut R,
	writer: &mut W,
) -> Result<(Option<PathBuf>, Option<PathBuf>), AppError> {
	write!(writer, "no files given. input file name (empty for none): ")?;
	writer.flush()?;
	let input = read_file_name(reader)?;

	write!(writer, "output file name (empty for none): ")?;
	writer.flush()?;
	let output = read_file_name(reader)?;

	Ok((input, output))
}

fn read_file_name<R: BufRead>(reader: &mut R) -> io::Result<Option<PathBuf>> {
	let name = read_input_line(reader)?.map(|name| String::from_utf8_lossy(name.trim_ascii()).into_owned());
	Ok(name.filter(|name| !name.is_empty()).map(PathBuf::from))
}

/// One console line as raw bytes, without its `\n` or `\r\n`.
fn read_input_line<R: BufRead>(reader: &mut R) -> io::Result<Option<Vec<u8>>> {
	let mut line = Vec::new();
	if reader.read_until(b'\n', &mut line)? == 0 {
		return Ok(None);
	}
	if line.last() == Some(&b'\n') {
		line.pop();
		if line.last() == Some(&b'\r') {
			line.pop();
		}
	}
	Ok(Some(line))
}

fn same_file(input: &Path, output: &Path) -> bool {
	if input == output {
		return true;
	}
	match (input.canonicalize(), output.canonicalize()) {
		(Ok(input), Ok(output)) => input == output,
		_ => false,
	}
}
