use tracing::{debug, trace};

use super::{InsertOutcome, Line, LineId, Window, WindowError};

impl Window {
	/// Line at a 0-based offset from the head. Linear in the window size,
	/// which is bounded by `max_lines`.
	pub fn line_at(&self, relative_index: usize) -> Option<&Line> {
		self.id_at(relative_index).and_then(|id| self.lines.get(id))
	}

	pub fn line_by_number(&self, line_no: usize) -> Option<&Line> {
		self.find_id(line_no).and_then(|id| self.lines.get(id))
	}

	pub fn line_by_number_mut(&mut self, line_no: usize) -> Option<&mut Line> {
		self.find_id(line_no).and_then(|id| self.lines.get_mut(id))
	}

	/// Inserts `text` as a new line after `after_line_no`.
	///
	/// A number below `start_line_no` makes the new line the head; a number
	/// at or past the tail appends. If the window then holds more than
	/// `max_lines`, the physical head is evicted and `start_line_no` advances,
	/// so every surviving line keeps its number.
	pub fn insert(&mut self, after_line_no: usize, text: impl AsRef<[u8]>) -> InsertOutcome {
		let anchor = if after_line_no < self.start_line_no { None } else { self.find_id(after_line_no) };
		let id = self.lines.insert(Line::from_text(text));

		let line_no = if after_line_no < self.start_line_no {
			self.link_front(id);
			self.start_line_no
		} else if let Some(anchor) = anchor {
			self.link_after(anchor, id);
			after_line_no + 1
		} else {
			self.link_back(id);
			self.end_line_no() as usize
		};
		trace!(line_no, after_line_no, "inserted line");

		if self.line_count() <= self.max_lines {
			return InsertOutcome::Inserted { line_no };
		}

		let evicted_was_new = self.head == Some(id);
		let Some(evicted) = self.remove_first() else {
			return InsertOutcome::Inserted { line_no };
		};
		debug!(start_line_no = self.start_line_no, "evicted head of full window");
		if evicted_was_new {
			InsertOutcome::EvictedOnArrival { evicted }
		} else {
			InsertOutcome::InsertedWithEviction { line_no, evicted }
		}
	}

	pub fn delete_line(&mut self, line_no: usize) -> Result<usize, WindowError> {
		self.delete_range(line_no, line_no)
	}

	/// Removes every resident line numbered within `start..=end` and returns
	/// how many were removed. Numbers without a resident line are skipped.
	pub fn delete_range(&mut self, start: usize, end: usize) -> Result<usize, WindowError> {
		if start > end {
			return Err(WindowError::InvalidRange { start, end });
		}

		let doomed = self
			.iter_ids()
			.filter(|(line_no, _)| (start..=end).contains(line_no))
			.map(|(_, id)| id)
			.collect::<Vec<_>>();
		for id in &doomed {
			let detached = self.detach(*id);
			debug_assert!(detached.is_some(), "resident line missing from the arena");
		}
		debug!(start, end, removed = doomed.len(), "deleted range");
		Ok(doomed.len())
	}

	pub fn replace_in_line(&mut self, line_no: usize, old: impl AsRef<[u8]>, new: impl AsRef<[u8]>) -> bool {
		match self.line_by_number_mut(line_no) {
			Some(line) => line.replace(old, new),
			None => false,
		}
	}

	/// Numbers of every resident line containing `pattern`, ascending.
	pub fn find_pattern(&self, pattern: impl AsRef<[u8]>) -> Vec<usize> {
		let pattern = pattern.as_ref();
		self.iter().filter(|(_, line)| line.contains(pattern)).map(|(line_no, _)| line_no).collect()
	}

	/// Drops every resident line. `start_line_no` is left for the caller.
	pub fn clear(&mut self) {
		self.lines.clear();
		self.head = None;
		self.tail = None;
	}

	/// Links `line` at the tail. Returns the evicted head if the window was
	/// already full.
	pub fn append_line(&mut self, mut line: Line) -> Option<Line> {
		line.unlink();
		let id = self.lines.insert(line);
		self.link_back(id);
		if self.line_count() > self.max_lines { self.remove_first() } else { None }
	}

	/// Unlinks the head and advances `start_line_no`.
	pub fn remove_first(&mut self) -> Option<Line> {
		let line = self.detach(self.head?)?;
		self.start_line_no += 1;
		Some(line)
	}

	pub fn remove_last(&mut self) -> Option<Line> {
		self.detach(self.tail?)
	}

	fn id_at(&self, relative_index: usize) -> Option<LineId> {
		if relative_index >= self.line_count() {
			return None;
		}
		let mut cursor = self.head;
		for _ in 0..relative_index {
			cursor = cursor.and_then(|id| self.lines.get(id)).and_then(Line::next);
		}
		cursor
	}

	fn find_id(&self, line_no: usize) -> Option<LineId> {
		let relative_index = line_no.checked_sub(self.start_line_no)?;
		self.id_at(relative_index)
	}

	fn iter_ids(&self) -> impl Iterator<Item = (usize, LineId)> + '_ {
		let mut cursor = self.head;
		let mut line_no = self.start_line_no;
		std::iter::from_fn(move || {
			let id = cursor?;
			cursor = self.lines.get(id)?.next();
			line_no += 1;
			Some((line_no - 1, id))
		})
	}

	fn link_front(&mut self, id: LineId) {
		let old_head = self.head;
		if let Some(line) = self.lines.get_mut(id) {
			line.set_prev(None);
			line.set_next(old_head);
		}
		match old_head.and_then(|head| self.lines.get_mut(head)) {
			Some(head) => head.set_prev(Some(id)),
			None => self.tail = Some(id),
		}
		self.head = Some(id);
	}

	fn link_back(&mut self, id: LineId) {
		let old_tail = self.tail;
		if let Some(line) = self.lines.get_mut(id) {
			line.set_prev(old_tail);
			line.set_next(None);
		}
		match old_tail.and_then(|tail| self.lines.get_mut(tail)) {
			Some(tail) => tail.set_next(Some(id)),
			None => self.head = Some(id),
		}
		self.tail = Some(id);
	}

	fn link_after(&mut self, anchor: LineId, id: LineId) {
		let Some(following) = self.lines.get(anchor).map(Line::next) else {
			return;
		};
		if let Some(anchor_line) = self.lines.get_mut(anchor) {
			anchor_line.set_next(Some(id));
		}
		if let Some(line) = self.lines.get_mut(id) {
			line.set_prev(Some(anchor));
			line.set_next(following);
		}
		match following.and_then(|next| self.lines.get_mut(next)) {
			Some(next) => next.set_prev(Some(id)),
			None => self.tail = Some(id),
		}
	}

	/// Removes a line from both the chain and the arena.
	fn detach(&mut self, id: LineId) -> Option<Line> {
		let mut line = self.lines.remove(id)?;
		let (prev, next) = (line.prev(), line.next());

		match prev.and_then(|prev| self.lines.get_mut(prev)) {
			Some(prev_line) => prev_line.set_next(next),
			None => self.head = next,
		}
		match next.and_then(|next| self.lines.get_mut(next)) {
			Some(next_line) => next_line.set_prev(prev),
			None => self.tail = prev,
		}

		line.unlink();
		Some(line)
	}
}
