use crate::state::{Line, Window};

pub(super) fn window_with_lines(max_lines: usize, count: usize) -> Window {
	let mut window = Window::new(max_lines);
	for i in 1..=count {
		let _ = window.append_line(Line::from_text(format!("Line {}", i)));
	}
	window
}

pub(super) fn resident_texts(window: &Window) -> Vec<String> {
	window.iter().map(|(_, line)| line.to_string_lossy()).collect()
}

/// Checks numbering, capacity and both link directions.
pub(super) fn assert_window_invariants(window: &Window) {
	assert!(window.line_count() <= window.max_lines(), "window exceeds capacity");

	let numbers = window.iter().map(|(line_no, _)| line_no).collect::<Vec<_>>();
	let expected = (window.start_line_no()..window.start_line_no() + window.line_count()).collect::<Vec<_>>();
	assert_eq!(numbers, expected, "resident numbers must be contiguous");

	let mut forward = Vec::new();
	let mut cursor = window.head();
	while let Some(id) = cursor {
		forward.push(id);
		cursor = window.get(id).expect("forward link resolves").next();
	}
	assert_eq!(forward.len(), window.line_count());
	assert_eq!(forward.last().copied(), window.tail());

	let mut backward = Vec::new();
	let mut cursor = window.tail();
	while let Some(id) = cursor {
		backward.push(id);
		cursor = window.get(id).expect("backward link resolves").prev();
	}
	backward.reverse();
	assert_eq!(forward, backward, "prev links must mirror next links");
}
