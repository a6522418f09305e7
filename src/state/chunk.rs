/// Size of a chunk's byte buffer. One byte is always kept free, so a chunk
/// holds at most `CHUNK_CAPACITY - 1` bytes of text.
pub const CHUNK_CAPACITY: usize = 81;

/// Fixed-capacity text segment. The unit of allocation for line content.
#[derive(Clone, PartialEq, Eq)]
pub struct Chunk {
	data: [u8; CHUNK_CAPACITY],
	used: usize,
}

impl Chunk {
	pub const fn new() -> Self {
		Self { data: [0; CHUNK_CAPACITY], used: 0 }
	}

	pub fn used(&self) -> usize {
		self.used
	}

	pub fn remaining(&self) -> usize {
		CHUNK_CAPACITY - 1 - self.used
	}

	pub fn is_full(&self) -> bool {
		self.used == CHUNK_CAPACITY - 1
	}

	pub fn as_bytes(&self) -> &[u8] {
		&self.data[..self.used]
	}

	pub fn append_byte(&mut self, byte: u8) -> bool {
		if self.is_full() {
			return false;
		}
		self.data[self.used] = byte;
		self.used += 1;
		true
	}

	/// Copies as many leading bytes of `bytes` as fit and returns how many
	/// were taken. The caller continues with the remainder in a new chunk.
	pub fn append_slice(&mut self, bytes: &[u8]) -> usize {
		let count = bytes.len().min(self.remaining());
		self.data[self.used..self.used + count].copy_from_slice(&bytes[..count]);
		self.used += count;
		count
	}

	pub fn clear(&mut self) {
		self.used = 0;
	}
}

impl Default for Chunk {
	fn default() -> Self {
		Self::new()
	}
}

impl std::fmt::Debug for Chunk {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Chunk")
			.field("used", &self.used)
			.field("data", &String::from_utf8_lossy(self.as_bytes()))
			.finish()
	}
}

/// The chunks of one line in chain order. Chunk `i + 1` is the successor of
/// chunk `i`; the whole chain is released in one deallocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChunkChain {
	chunks: Vec<Chunk>,
}

impl ChunkChain {
	pub fn new() -> Self {
		Self { chunks: Vec::new() }
	}

	pub fn is_empty(&self) -> bool {
		self.chunks.is_empty()
	}

	pub fn len(&self) -> usize {
		self.chunks.len()
	}

	pub fn head(&self) -> Option<&Chunk> {
		self.chunks.first()
	}

	pub fn get(&self, index: usize) -> Option<&Chunk> {
		self.chunks.get(index)
	}

	pub fn get_mut(&mut self, index: usize) -> Option<&mut Chunk> {
		self.chunks.get_mut(index)
	}

	/// Starts a chain with a single empty head chunk, dropping any previous one.
	pub fn reset_with_head(&mut self) -> usize {
		self.chunks.clear();
		self.chunks.push(Chunk::new());
		0
	}

	/// Index of the chunk following `index`, creating an empty one when the
	/// chain ends there. Calling it again without mutation yields the same index.
	pub fn ensure_next(&mut self, index: usize) -> usize {
		debug_assert!(index < self.chunks.len(), "ensure_next past the end of the chain");
		let next = index + 1;
		if next >= self.chunks.len() {
			self.chunks.push(Chunk::new());
			return self.chunks.len() - 1;
		}
		next
	}

	pub fn release(&mut self) {
		self.chunks = Vec::new();
	}

	pub fn iter(&self) -> std::slice::Iter<'_, Chunk> {
		self.chunks.iter()
	}

	pub fn byte_len(&self) -> usize {
		self.chunks.iter().map(Chunk::used).sum()
	}
}

impl<'a> IntoIterator for &'a ChunkChain {
	type IntoIter = std::slice::Iter<'a, Chunk>;
	type Item = &'a Chunk;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}
