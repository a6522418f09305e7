use std::io::Write as _;

use super::Window;

/// Width of the right-justified line number column.
pub const LINE_NO_WIDTH: usize = 4;

impl Window {
	pub fn total_pages(&self) -> usize {
		self.line_count().div_ceil(self.page_size)
	}

	/// Renders one page as `"%4d %s\n"` rows with the line bytes copied
	/// verbatim. A page past the end renders as nothing.
	pub fn render_page(&self, page: usize) -> Vec<u8> {
		let mut out = Vec::new();
		let Some(skip) = page.checked_mul(self.page_size) else {
			return out;
		};
		for (line_no, line) in self.iter().skip(skip).take(self.page_size) {
			let _ = write!(out, "{:>width$} ", line_no, width = LINE_NO_WIDTH);
			out.extend_from_slice(&line.text());
			out.push(b'\n');
		}
		out
	}
}
