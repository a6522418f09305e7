use super::LineId;
use super::chunk::{Chunk, ChunkChain};

/// One logical line. Text lives in a chain of fixed-capacity chunks; `prev`
/// and `next` name neighbours inside the owning window and carry no ownership.
#[derive(Debug, Clone, Default)]
pub struct Line {
	chunks: ChunkChain,
	prev: Option<LineId>,
	next: Option<LineId>,
}

impl Line {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn from_text(text: impl AsRef<[u8]>) -> Self {
		let mut line = Self::new();
		line.set_text(text);
		line
	}

	pub fn prev(&self) -> Option<LineId> {
		self.prev
	}

	pub fn next(&self) -> Option<LineId> {
		self.next
	}

	pub fn set_prev(&mut self, prev: Option<LineId>) {
		self.prev = prev;
	}

	pub fn set_next(&mut self, next: Option<LineId>) {
		self.next = next;
	}

	pub(super) fn unlink(&mut self) {
		self.prev = None;
		self.next = None;
	}

	pub fn chunks(&self) -> &ChunkChain {
		&self.chunks
	}

	pub fn chunk_count(&self) -> usize {
		self.chunks.len()
	}

	/// Replaces the whole content. Empty input leaves the line without chunks.
	pub fn set_text(&mut self, text: impl AsRef<[u8]>) {
		let text = text.as_ref();
		self.chunks.release();
		if text.is_empty() {
			return;
		}

		let mut current = self.chunks.reset_with_head();
		let mut offset = 0;
		while offset < text.len() {
			let Some(chunk) = self.chunks.get_mut(current) else {
				break;
			};
			offset += chunk.append_slice(&text[offset..]);
			if offset < text.len() {
				current = self.chunks.ensure_next(current);
			}
		}
	}

	pub fn text(&self) -> Vec<u8> {
		let mut text = Vec::with_capacity(self.length());
		for chunk in &self.chunks {
			text.extend_from_slice(chunk.as_bytes());
		}
		text
	}

	pub fn to_string_lossy(&self) -> String {
		String::from_utf8_lossy(&self.text()).into_owned()
	}

	pub fn length(&self) -> usize {
		self.chunks.byte_len()
	}

	pub fn is_empty(&self) -> bool {
		self.chunks.head().is_none_or(|head| head.used() == 0)
	}

	/// Byte offset of the first occurrence of `pattern`. Matching is byte
	/// literal: a multi-byte character is never treated as a unit.
	pub fn find(&self, pattern: impl AsRef<[u8]>) -> Option<usize> {
		find_bytes(&self.text(), pattern.as_ref())
	}

	pub fn contains(&self, pattern: impl AsRef<[u8]>) -> bool {
		self.find(pattern).is_some()
	}

	/// Replaces the first occurrence of `old` with `new` and rebuilds the
	/// chunk chain. Returns false without touching the line when `old` is
	/// empty or absent.
	pub fn replace(&mut self, old: impl AsRef<[u8]>, new: impl AsRef<[u8]>) -> bool {
		let old = old.as_ref();
		if old.is_empty() {
			return false;
		}

		let mut text = self.text();
		let Some(pos) = find_bytes(&text, old) else {
			return false;
		};

		text.splice(pos..pos + old.len(), new.as_ref().iter().copied());
		self.set_text(&text);
		true
	}

	pub fn chunk_at(&self, index: usize) -> Option<&Chunk> {
		self.chunks.get(index)
	}
}

fn find_bytes(haystack: &[u8], needle: &[u8]) -> Option<usize> {
	if needle.is_empty() {
		return Some(0);
	}
	if needle.len() > haystack.len() {
		return None;
	}
	haystack.windows(needle.len()).position(|window| window == needle)
}
