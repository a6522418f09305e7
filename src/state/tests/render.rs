use super::common::window_with_lines;
use crate::state::{Line, Window};

fn row_count(page: &[u8]) -> usize {
	page.iter().filter(|&&byte| byte == b'\n').count()
}

#[test]
fn pages_split_window_into_page_size_slices() {
	let window = window_with_lines(100, 25);
	assert_eq!(window.total_pages(), 2);
	assert_eq!(row_count(&window.render_page(0)), 20);
	assert_eq!(row_count(&window.render_page(1)), 5);
	assert_eq!(row_count(&window.render_page(5)), 0);
}

#[test]
fn empty_window_has_no_pages() {
	let window = Window::new(10);
	assert_eq!(window.total_pages(), 0);
	assert_eq!(window.render_page(0), b"");
}

#[test]
fn exactly_one_full_page() {
	let window = window_with_lines(100, 20);
	assert_eq!(window.total_pages(), 1);
	assert_eq!(window.render_page(1), b"");
}

#[test]
fn rows_use_right_justified_numbers() {
	let mut window = window_with_lines(100, 2);
	window.set_start_line_no(998);
	let _ = window.insert(999, "third");
	let _ = window.insert(1000, "");
	assert_eq!(window.render_page(0), b" 998 Line 1\n 999 Line 2\n1000 third\n1001 \n");
}

#[test]
fn second_page_continues_numbering() {
	let window = window_with_lines(100, 22);
	assert_eq!(window.render_page(1), b"  21 Line 21\n  22 Line 22\n");
}

#[test]
fn custom_page_size_is_respected() {
	let mut window = Window::with_page_size(10, 3);
	for text in ["a", "b", "c", "d"] {
		let _ = window.append_line(Line::from_text(text));
	}
	assert_eq!(window.total_pages(), 2);
	assert_eq!(window.render_page(1), b"   4 d\n");
}

#[test]
fn huge_page_index_renders_nothing() {
	let window = window_with_lines(100, 3);
	assert_eq!(window.render_page(usize::MAX), b"");
}

#[test]
fn rows_copy_line_bytes_verbatim() {
	let mut window = Window::new(10);
	let _ = window.append_line(Line::from_text(b"caf\xE9"));
	assert_eq!(window.render_page(0), b"   1 caf\xE9\n".to_vec());
}
