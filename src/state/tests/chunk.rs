use crate::state::{CHUNK_CAPACITY, Chunk, ChunkChain};

#[test]
fn append_byte_fills_up_to_capacity_minus_one() {
	let mut chunk = Chunk::new();
	for _ in 0..CHUNK_CAPACITY - 1 {
		assert!(chunk.append_byte(b'x'));
	}
	assert!(chunk.is_full());
	assert!(!chunk.append_byte(b'y'));
	assert_eq!(chunk.used(), CHUNK_CAPACITY - 1);
	assert!(!chunk.as_bytes().contains(&b'y'));
}

#[test]
fn append_slice_copies_only_what_fits() {
	let mut chunk = Chunk::new();
	let input = vec![b'a'; 100];
	assert_eq!(chunk.append_slice(&input), 80);
	assert!(chunk.is_full());
	assert_eq!(chunk.append_slice(b"more"), 0);
}

#[test]
fn append_empty_slice_is_a_no_op() {
	let mut chunk = Chunk::new();
	assert_eq!(chunk.append_slice(b""), 0);
	assert_eq!(chunk.used(), 0);
}

#[test]
fn clear_resets_used_bytes() {
	let mut chunk = Chunk::new();
	chunk.append_slice(b"hello");
	chunk.clear();
	assert_eq!(chunk.used(), 0);
	assert!(chunk.as_bytes().is_empty());
	assert!(chunk.append_byte(b'z'));
	assert_eq!(chunk.as_bytes(), b"z");
}

#[test]
fn ensure_next_is_idempotent_without_mutation() {
	let mut chain = ChunkChain::new();
	let head = chain.reset_with_head();
	let first = chain.ensure_next(head);
	let second = chain.ensure_next(head);
	assert_eq!(first, second);
	assert_eq!(chain.len(), 2);
}

#[test]
fn ensure_next_returns_existing_successor() {
	let mut chain = ChunkChain::new();
	let head = chain.reset_with_head();
	let next = chain.ensure_next(head);
	let after_next = chain.ensure_next(next);
	assert_eq!(chain.len(), 3);
	assert_eq!(chain.ensure_next(head), next);
	assert_eq!(chain.ensure_next(next), after_next);
}

#[test]
fn release_drops_the_whole_chain() {
	let mut chain = ChunkChain::new();
	let mut current = chain.reset_with_head();
	for _ in 0..10_000 {
		current = chain.ensure_next(current);
	}
	assert_eq!(chain.len(), 10_001);
	chain.release();
	assert!(chain.is_empty());
	assert_eq!(chain.byte_len(), 0);
}
