use thiserror::Error;

use crate::state::{Window, WindowError};

/// A parsed console command. Text operands keep the bytes exactly as typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
	/// `i<n> [text]`; without text the session switches to insert mode.
	Insert { after: i64, text: Option<Vec<u8>> },
	/// `d<n>` or `d<n1> <n2>`.
	Delete { start: i64, end: Option<i64> },
	NextZone,
	/// `p[n]`, stored 0-based.
	Print { page: usize },
	/// `s<n>@old@new`.
	Replace { line_no: i64, old: Vec<u8>, new: Vec<u8> },
	/// `m<pattern>`.
	Match { pattern: Vec<u8> },
	Help,
	Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
	#[error("empty command")]
	Empty,
	#[error("unknown command: {input}")]
	Unknown { input: String },
	#[error("missing parameter, usage: {usage}")]
	MissingParameter { usage: &'static str },
	#[error("invalid {what}: {value:?}")]
	InvalidFormat { what: &'static str, value: String },
	#[error(transparent)]
	Window(#[from] WindowError),
}

impl CommandError {
	fn invalid(what: &'static str, value: &[u8]) -> Self {
		Self::InvalidFormat { what, value: String::from_utf8_lossy(value).into_owned() }
	}
}

impl Command {
	pub fn parse(input: impl AsRef<[u8]>) -> Result<Self, CommandError> {
		let trimmed = input.as_ref().trim_ascii();
		let Some((&first, rest)) = trimmed.split_first() else {
			return Err(CommandError::Empty);
		};

		match first.to_ascii_lowercase() {
			b'i' => parse_insert(rest),
			b'd' => parse_delete(rest),
			b'n' => Ok(Self::NextZone),
			b'p' => parse_print(rest),
			b's' => parse_replace(rest),
			b'm' => Ok(Self::Match { pattern: rest.to_vec() }),
			b'h' => Ok(Self::Help),
			b'q' => Ok(Self::Quit),
			_ => Err(CommandError::Unknown { input: String::from_utf8_lossy(trimmed).into_owned() }),
		}
	}

	/// Checks line numbers against the resident run of `window`. An insert
	/// may name `start - 1` to go before the first line.
	pub fn validate(&self, window: &Window) -> Result<(), CommandError> {
		let start = window.start_line_no();
		let end = window.end_line_no();
		let out_of_range = |line_no: i64| WindowError::OutOfRange { line_no, start, end };
		let resident = |line_no: i64| line_no >= start as i64 && line_no <= end;

		match self {
			Self::Insert { after, .. } => {
				if *after < start as i64 - 1 || *after > end {
					return Err(out_of_range(*after).into());
				}
			}
			Self::Delete { start: first, end: last } => {
				if !resident(*first) {
					return Err(out_of_range(*first).into());
				}
				if let Some(last) = last {
					if !resident(*last) {
						return Err(out_of_range(*last).into());
					}
					if first > last {
						return Err(
							WindowError::InvalidRange { start: *first as usize, end: *last as usize }.into()
						);
					}
				}
			}
			Self::Replace { line_no, .. } => {
				if !resident(*line_no) {
					return Err(out_of_range(*line_no).into());
				}
			}
			Self::NextZone | Self::Print { .. } | Self::Match { .. } | Self::Help | Self::Quit => {}
		}
		Ok(())
	}
}

pub fn parse_line_number(value: &[u8]) -> Result<i64, CommandError> {
	let value = value.trim_ascii();
	std::str::from_utf8(value)
		.ok()
		.and_then(|digits| digits.parse::<i64>().ok())
		.ok_or_else(|| CommandError::invalid("line number", value))
}

fn split_once(bytes: &[u8], separator: u8) -> Option<(&[u8], &[u8])> {
	let pos = bytes.iter().position(|&byte| byte == separator)?;
	Some((&bytes[..pos], &bytes[pos + 1..]))
}

fn parse_insert(rest: &[u8]) -> Result<Command, CommandError> {
	if rest.is_empty() {
		return Err(CommandError::MissingParameter { usage: "i<line> [text]" });
	}
	let (number, text) = match split_once(rest, b' ') {
		Some((number, text)) => (number, Some(text.to_vec())),
		None => (rest, None),
	};
	Ok(Command::Insert { after: parse_line_number(number)?, text: text.filter(|text| !text.is_empty()) })
}

/// Anything after the second number is rejected rather than ignored.
fn parse_delete(rest: &[u8]) -> Result<Command, CommandError> {
	if rest.is_empty() {
		return Err(CommandError::MissingParameter { usage: "d<line> or d<start> <end>" });
	}
	match split_once(rest, b' ') {
		Some((start, end)) => {
			Ok(Command::Delete { start: parse_line_number(start)?, end: Some(parse_line_number(end)?) })
		}
		None => Ok(Command::Delete { start: parse_line_number(rest)?, end: None }),
	}
}

fn parse_print(rest: &[u8]) -> Result<Command, CommandError> {
	let rest = rest.trim_ascii();
	if rest.is_empty() {
		return Ok(Command::Print { page: 0 });
	}
	let page = std::str::from_utf8(rest)
		.ok()
		.and_then(|digits| digits.parse::<i64>().ok())
		.ok_or_else(|| CommandError::invalid("page number", rest))?;
	Ok(Command::Print { page: usize::try_from(page.saturating_sub(1)).unwrap_or(0) })
}

fn parse_replace(rest: &[u8]) -> Result<Command, CommandError> {
	if rest.len() < 2 {
		return Err(CommandError::MissingParameter { usage: "s<line>@<old>@<new>" });
	}
	let Some((number, patterns)) = split_once(rest, b'@') else {
		return Err(CommandError::invalid("replace command, expected s<line>@<old>@<new>", rest));
	};
	let Some((old, new)) = split_once(patterns, b'@') else {
		return Err(CommandError::invalid("replace command, expected two '@' separators", rest));
	};
	Ok(Command::Replace { line_no: parse_line_number(number)?, old: old.to_vec(), new: new.to_vec() })
}

#[cfg(test)]
mod tests {
	use super::{Command, CommandError};
	use crate::state::{Line, Window, WindowError};

	fn window_with(count: usize) -> Window {
		let mut window = Window::new(100);
		for i in 1..=count {
			let _ = window.append_line(Line::from_text(format!("Line {}", i)));
		}
		window
	}

	#[test]
	fn parse_insert_with_and_without_text() {
		assert_eq!(Command::parse("i10"), Ok(Command::Insert { after: 10, text: None }));
		assert_eq!(
			Command::parse("i5 Hello World"),
			Ok(Command::Insert { after: 5, text: Some(b"Hello World".to_vec()) })
		);
	}

	#[test]
	fn parse_trims_surrounding_whitespace() {
		assert_eq!(Command::parse("  i10  "), Ok(Command::Insert { after: 10, text: None }));
	}

	#[test]
	fn parse_delete_single_and_range() {
		assert_eq!(Command::parse("d10"), Ok(Command::Delete { start: 10, end: None }));
		assert_eq!(Command::parse("d5 10"), Ok(Command::Delete { start: 5, end: Some(10) }));
		assert_eq!(Command::parse("d5   10"), Ok(Command::Delete { start: 5, end: Some(10) }));
	}

	#[test]
	fn parse_simple_commands_case_insensitive() {
		assert_eq!(Command::parse("n"), Ok(Command::NextZone));
		assert_eq!(Command::parse("N"), Ok(Command::NextZone));
		assert_eq!(Command::parse("Q"), Ok(Command::Quit));
		assert_eq!(Command::parse("h"), Ok(Command::Help));
		assert!(matches!(Command::parse("I10"), Ok(Command::Insert { .. })));
		assert!(matches!(Command::parse("D10"), Ok(Command::Delete { .. })));
		assert!(matches!(Command::parse("P"), Ok(Command::Print { .. })));
	}

	#[test]
	fn parse_print_is_one_based() {
		assert_eq!(Command::parse("p"), Ok(Command::Print { page: 0 }));
		assert_eq!(Command::parse("p1"), Ok(Command::Print { page: 0 }));
		assert_eq!(Command::parse("p 3"), Ok(Command::Print { page: 2 }));
		assert_eq!(Command::parse("p0"), Ok(Command::Print { page: 0 }));
		assert_eq!(Command::parse("p-4"), Ok(Command::Print { page: 0 }));
		assert!(matches!(Command::parse("pxyz"), Err(CommandError::InvalidFormat { .. })));
	}

	#[test]
	fn parse_replace_splits_on_at_signs() {
		assert_eq!(
			Command::parse("s5@old@new"),
			Ok(Command::Replace { line_no: 5, old: b"old".to_vec(), new: b"new".to_vec() })
		);
		assert_eq!(
			Command::parse("s2@gone@"),
			Ok(Command::Replace { line_no: 2, old: b"gone".to_vec(), new: Vec::new() })
		);
		assert_eq!(
			Command::parse("s1@a@b@c"),
			Ok(Command::Replace { line_no: 1, old: b"a".to_vec(), new: b"b@c".to_vec() })
		);
	}

	#[test]
	fn parse_match_keeps_pattern_verbatim() {
		assert_eq!(Command::parse("mHello"), Ok(Command::Match { pattern: b"Hello".to_vec() }));
		assert_eq!(Command::parse("m"), Ok(Command::Match { pattern: Vec::new() }));
	}

	#[test]
	fn parse_rejects_empty_and_unknown() {
		assert_eq!(Command::parse(""), Err(CommandError::Empty));
		assert_eq!(Command::parse("   "), Err(CommandError::Empty));
		assert_eq!(Command::parse("x"), Err(CommandError::Unknown { input: "x".to_string() }));
	}

	#[test]
	fn parse_reports_missing_parameters() {
		assert!(matches!(Command::parse("i"), Err(CommandError::MissingParameter { .. })));
		assert!(matches!(Command::parse("d"), Err(CommandError::MissingParameter { .. })));
		assert!(matches!(Command::parse("s5"), Err(CommandError::MissingParameter { .. })));
	}

	#[test]
	fn parse_reports_bad_formats() {
		assert!(matches!(Command::parse("iabc"), Err(CommandError::InvalidFormat { .. })));
		assert!(matches!(Command::parse("s5oldnew"), Err(CommandError::InvalidFormat { .. })));
		assert!(matches!(Command::parse("s5@oldnew"), Err(CommandError::InvalidFormat { .. })));
		assert!(matches!(Command::parse("i 10"), Err(CommandError::InvalidFormat { .. })));
	}

	#[test]
	fn text_operands_keep_non_utf8_bytes() {
		assert_eq!(Command::parse(b"i1 caf\xE9"), Ok(Command::Insert { after: 1, text: Some(b"caf\xE9".to_vec()) }));
		assert_eq!(
			Command::parse(b"s2@\xE9@e"),
			Ok(Command::Replace { line_no: 2, old: b"\xE9".to_vec(), new: b"e".to_vec() })
		);
		assert_eq!(Command::parse(b"m\xFF\xFE"), Ok(Command::Match { pattern: b"\xFF\xFE".to_vec() }));
		assert!(matches!(Command::parse(b"\xE9"), Err(CommandError::Unknown { .. })));
		assert!(matches!(Command::parse(b"d\xE9"), Err(CommandError::InvalidFormat { .. })));
	}

	#[test]
	fn delete_rejects_trailing_numbers() {
		assert!(matches!(Command::parse("d5 10 20"), Err(CommandError::InvalidFormat { .. })));
	}

	#[test]
	fn negative_numbers_parse_but_fail_validation() {
		let command = Command::parse("i-5").expect("negative numbers parse");
		assert_eq!(command, Command::Insert { after: -5, text: None });
		assert!(matches!(
			command.validate(&window_with(3)),
			Err(CommandError::Window(WindowError::OutOfRange { line_no: -5, .. }))
		));
	}

	#[test]
	fn validate_insert_allows_before_first_and_after_last() {
		let window = window_with(3);
		assert!(Command::parse("i0 x").and_then(|c| c.validate(&window)).is_ok());
		assert!(Command::parse("i3 x").and_then(|c| c.validate(&window)).is_ok());
		assert!(Command::parse("i4 x").and_then(|c| c.validate(&window)).is_err());
	}

	#[test]
	fn validate_insert_into_empty_window() {
		let window = Window::new(10);
		assert!(Command::parse("i0 first").and_then(|c| c.validate(&window)).is_ok());
		assert!(Command::parse("i1 first").and_then(|c| c.validate(&window)).is_err());
	}

	#[test]
	fn validate_delete_bounds_and_order() {
		let window = window_with(5);
		assert!(Command::parse("d1 5").and_then(|c| c.validate(&window)).is_ok());
		assert!(Command::parse("d0").and_then(|c| c.validate(&window)).is_err());
		assert!(Command::parse("d2 6").and_then(|c| c.validate(&window)).is_err());
		assert_eq!(
			Command::parse("d4 2").and_then(|c| c.validate(&window)),
			Err(CommandError::Window(WindowError::InvalidRange { start: 4, end: 2 }))
		);
	}

	#[test]
	fn validate_replace_requires_resident_line() {
		let mut window = window_with(2);
		window.set_start_line_no(10);
		assert!(Command::parse("s10@a@b").and_then(|c| c.validate(&window)).is_ok());
		assert!(Command::parse("s9@a@b").and_then(|c| c.validate(&window)).is_err());
		assert!(Command::parse("s12@a@b").and_then(|c| c.validate(&window)).is_err());
	}

	#[test]
	fn validate_ignores_commands_without_line_numbers() {
		let window = Window::new(10);
		for input in ["n", "p5", "mfoo", "q", "h"] {
			assert!(Command::parse(input).and_then(|c| c.validate(&window)).is_ok(), "{input}");
		}
	}
}
