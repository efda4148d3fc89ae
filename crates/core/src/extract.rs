//! Extracts the command fragment the suggestion engine should complete
//! from the full input line and the cursor offset.

/// Walks backward from `cursor_offset` to the nearest `;` or `|` (or the
/// start of the line), then trims leading whitespace from what remains.
/// `cursor_offset` is a character offset, clamped to `input`'s length so
/// an out-of-range cursor never panics.
pub fn current_fragment(input: &str, cursor_offset: usize) -> &str {
	let byte_offset = input.char_indices().nth(cursor_offset).map(|(i, _)| i).unwrap_or(input.len());
	let head = &input[..byte_offset];
	let start = head.rfind([';', '|']).map(|i| i + 1).unwrap_or(0);
	head[start..].trim_start()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn whole_line_when_no_separator() {
		assert_eq!(current_fragment("git status", 10), "git status");
	}

	#[test]
	fn stops_at_semicolon() {
		assert_eq!(current_fragment("cd foo; git sta", 15), "git sta");
	}

	#[test]
	fn stops_at_pipe_and_trims_leading_space() {
		assert_eq!(current_fragment("ls -la | grep txt", 17), "grep txt");
	}

	#[test]
	fn cursor_in_the_middle_only_sees_text_before_it() {
		assert_eq!(current_fragment("git status --all", 10), "git status");
	}

	#[test]
	fn offset_past_end_is_clamped() {
		assert_eq!(current_fragment("ls", 50), "ls");
	}
}
