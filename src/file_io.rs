use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, error};

const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

#[derive(Debug, Error)]
pub enum FileIoError {
	#[error("open input file failed: {}", path.display())]
	OpenInput {
		path:   PathBuf,
		#[source]
		source: io::Error,
	},
	#[error("create output file failed: {}", path.display())]
	CreateOutput {
		path:   PathBuf,
		#[source]
		source: io::Error,
	},
	#[error("read input failed")]
	Read {
		#[source]
		source: io::Error,
	},
	#[error("write output failed")]
	Write {
		#[source]
		source: io::Error,
	},
}

/// Number of bytes to skip for a leading UTF-8 byte order mark: 3 or 0.
pub fn detect_utf8_bom(data: &[u8]) -> usize {
	if data.starts_with(&UTF8_BOM) { UTF8_BOM.len() } else { 0 }
}

/// Supplies raw lines, in order, in batches.
pub trait LineSource {
	fn read_batch(&mut self, max_lines: usize) -> Result<Vec<Vec<u8>>, FileIoError>;
	fn is_exhausted(&self) -> bool;
}

/// Receives raw lines, in order.
pub trait LineSink {
	fn write_line(&mut self, line: &[u8]) -> Result<(), FileIoError>;
	fn flush(&mut self) -> Result<(), FileIoError>;
}

/// Line reader over any buffered input. A leading BOM is skipped once and
/// `\n` / `\r\n` terminators are stripped.
pub struct ZoneSource<R> {
	reader:      R,
	bom_checked: bool,
	exhausted:   bool,
}

impl ZoneSource<BufReader<File>> {
	pub fn open(path: &Path) -> Result<Self, FileIoError> {
		let file = File::open(path).map_err(|source| {
			error!("open input failed: {}: {}", path.display(), source);
			FileIoError::OpenInput { path: path.to_path_buf(), source }
		})?;
		debug!("opened input {}", path.display());
		Ok(Self::new(BufReader::new(file)))
	}
}

impl<R: BufRead> ZoneSource<R> {
	pub fn new(reader: R) -> Self {
		Self { reader, bom_checked: false, exhausted: false }
	}

	pub fn read_line(&mut self) -> Result<Option<Vec<u8>>, FileIoError> {
		if self.exhausted {
			return Ok(None);
		}
		self.skip_bom()?;

		let mut line = Vec::new();
		let read = self.reader.read_until(b'\n', &mut line).map_err(|source| FileIoError::Read { source })?;
		if read == 0 {
			self.exhausted = true;
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

	fn skip_bom(&mut self) -> Result<(), FileIoError> {
		if self.bom_checked {
			return Ok(());
		}
		self.bom_checked = true;
		let head = self.reader.fill_buf().map_err(|source| FileIoError::Read { source })?;
		let skip = detect_utf8_bom(head);
		self.reader.consume(skip);
		Ok(())
	}
}

impl<R: BufRead> LineSource for ZoneSource<R> {
	fn read_batch(&mut self, max_lines: usize) -> Result<Vec<Vec<u8>>, FileIoError> {
		let mut lines = Vec::new();
		while lines.len() < max_lines {
			match self.read_line()? {
				Some(line) => lines.push(line),
				None => break,
			}
		}
		Ok(lines)
	}

	fn is_exhausted(&self) -> bool {
		self.exhausted
	}
}

/// Line writer appending `\n` after every line.
pub struct ZoneSink<W: Write> {
	writer: W,
}

impl ZoneSink<BufWriter<File>> {
	pub fn create(path: &Path) -> Result<Self, FileIoError> {
		let file = File::create(path).map_err(|source| {
			error!("create output failed: {}: {}", path.display(), source);
			FileIoError::CreateOutput { path: path.to_path_buf(), source }
		})?;
		debug!("opened output {}", path.display());
		Ok(Self::new(BufWriter::new(file)))
	}
}

impl<W: Write> ZoneSink<W> {
	pub fn new(writer: W) -> Self {
		Self { writer }
	}

	pub fn into_inner(self) -> W {
		self.writer
	}
}

impl<W: Write> LineSink for ZoneSink<W> {
	fn write_line(&mut self, line: &[u8]) -> Result<(), FileIoError> {
		self.writer.write_all(line).map_err(|source| FileIoError::Write { source })?;
		self.writer.write_all(b"\n").map_err(|source| FileIoError::Write { source })
	}

	fn flush(&mut self) -> Result<(), FileIoError> {
		self.writer.flush().map_err(|source| FileIoError::Write { source })
	}
}

/// The optional input and output documents of one editing session.
pub struct ZoneFiles<S, K> {
	source: Option<S>,
	sink:   Option<K>,
}

impl<S: LineSource, K: LineSink> ZoneFiles<S, K> {
	pub fn new(source: Option<S>, sink: Option<K>) -> Self {
		Self { source, sink }
	}

	pub fn has_source(&self) -> bool {
		self.source.is_some()
	}

	pub fn has_sink(&self) -> bool {
		self.sink.is_some()
	}

	/// True when there is no source or it has hit end of input.
	pub fn input_exhausted(&self) -> bool {
		self.source.as_ref().is_none_or(LineSource::is_exhausted)
	}

	pub fn read_batch(&mut self, max_lines: usize) -> Result<Vec<Vec<u8>>, FileIoError> {
		match self.source.as_mut() {
			Some(source) => source.read_batch(max_lines),
			None => Ok(Vec::new()),
		}
	}

	/// Writes one line to the sink. Returns false when the session has no
	/// output and the line is dropped.
	pub fn write_line(&mut self, line: &[u8]) -> Result<bool, FileIoError> {
		match self.sink.as_mut() {
			Some(sink) => sink.write_line(line).map(|()| true),
			None => Ok(false),
		}
	}

	/// Copies every unread input line to the sink, then flushes it.
	pub fn finish(&mut self) -> Result<usize, FileIoError> {
		let Some(sink) = self.sink.as_mut() else {
			return Ok(0);
		};
		let mut copied = 0;
		if let Some(source) = self.source.as_mut() {
			while !source.is_exhausted() {
				for line in source.read_batch(FINISH_BATCH)? {
					sink.write_line(&line)?;
					copied += 1;
				}
			}
		}
		sink.flush()?;
		debug!(copied, "copied remaining input to output");
		Ok(copied)
	}

	pub fn sink(&self) -> Option<&K> {
		self.sink.as_ref()
	}

	pub fn into_sink(self) -> Option<K> {
		self.sink
	}
}

const FINISH_BATCH: usize = 256;
