//! The resident window of an editing session.
//!
//! A [`Window`] keeps a bounded, contiguously numbered run of [`Line`]s. Lines
//! live in a generation-checked arena and are chained through handles, so a
//! handle to an evicted or deleted line never resolves again.

use slotmap::{SlotMap, new_key_type};
use thiserror::Error;

mod chunk;
mod line;
mod render;
mod window;

pub use chunk::{CHUNK_CAPACITY, Chunk, ChunkChain};
pub use line::Line;

new_key_type! { pub struct LineId; }

pub const DEFAULT_MAX_LINES: usize = 100;
pub const DEFAULT_PAGE_SIZE: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WindowError {
	#[error("line {line_no} is outside the active zone {start}..={end}")]
	OutOfRange { line_no: i64, start: usize, end: i64 },
	#[error("start line {start} is greater than end line {end}")]
	InvalidRange { start: usize, end: usize },
}

/// Where a newly inserted line ended up.
#[derive(Debug)]
pub enum InsertOutcome {
	Inserted { line_no: usize },
	/// The window overflowed and its head was evicted to make room.
	InsertedWithEviction { line_no: usize, evicted: Line },
	/// The new line became the head of a full window and was evicted at once.
	EvictedOnArrival { evicted: Line },
}

impl InsertOutcome {
	pub fn line_no(&self) -> Option<usize> {
		match self {
			Self::Inserted { line_no } | Self::InsertedWithEviction { line_no, .. } => Some(*line_no),
			Self::EvictedOnArrival { .. } => None,
		}
	}

	pub fn evicted(&self) -> Option<&Line> {
		match self {
			Self::Inserted { .. } => None,
			Self::InsertedWithEviction { evicted, .. } | Self::EvictedOnArrival { evicted } => Some(evicted),
		}
	}

	pub fn into_evicted(self) -> Option<Line> {
		match self {
			Self::Inserted { .. } => None,
			Self::InsertedWithEviction { evicted, .. } | Self::EvictedOnArrival { evicted } => Some(evicted),
		}
	}
}

#[derive(Debug)]
pub struct Window {
	lines:         SlotMap<LineId, Line>,
	head:          Option<LineId>,
	tail:          Option<LineId>,
	start_line_no: usize,
	max_lines:     usize,
	page_size:     usize,
}

impl Window {
	pub fn new(max_lines: usize) -> Self {
		Self::with_page_size(max_lines, DEFAULT_PAGE_SIZE)
	}

	pub fn with_page_size(max_lines: usize, page_size: usize) -> Self {
		Self {
			lines: SlotMap::with_key(),
			head: None,
			tail: None,
			start_line_no: 1,
			max_lines: max_lines.max(1),
			page_size: page_size.max(1),
		}
	}

	pub fn head(&self) -> Option<LineId> {
		self.head
	}

	pub fn tail(&self) -> Option<LineId> {
		self.tail
	}

	pub fn get(&self, id: LineId) -> Option<&Line> {
		self.lines.get(id)
	}

	pub fn start_line_no(&self) -> usize {
		self.start_line_no
	}

	pub fn set_start_line_no(&mut self, line_no: usize) {
		self.start_line_no = line_no;
	}

	/// Number of the last resident line; `start_line_no - 1` when empty.
	pub fn end_line_no(&self) -> i64 {
		self.start_line_no as i64 + self.line_count() as i64 - 1
	}

	pub fn line_count(&self) -> usize {
		self.lines.len()
	}

	pub fn max_lines(&self) -> usize {
		self.max_lines
	}

	pub fn page_size(&self) -> usize {
		self.page_size
	}

	pub fn is_empty(&self) -> bool {
		self.lines.is_empty()
	}

	pub fn is_full(&self) -> bool {
		self.line_count() >= self.max_lines
	}

	pub fn iter(&self) -> Iter<'_> {
		Iter { window: self, cursor: self.head, line_no: self.start_line_no }
	}
}

impl Default for Window {
	fn default() -> Self {
		Self::new(DEFAULT_MAX_LINES)
	}
}

/// Walks resident lines head to tail, yielding each with its logical number.
pub struct Iter<'a> {
	window:  &'a Window,
	cursor:  Option<LineId>,
	line_no: usize,
}

impl<'a> Iterator for Iter<'a> {
	type Item = (usize, &'a Line);

	fn next(&mut self) -> Option<Self::Item> {
		let line = self.window.lines.get(self.cursor?)?;
		let line_no = self.line_no;
		self.cursor = line.next();
		self.line_no += 1;
		Some((line_no, line))
	}
}

#[cfg(test)]
mod tests;
