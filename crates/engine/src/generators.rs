//! Shape-classified fallback generators, consulted when both the cache
//! and the pattern table come up short.

/// The shape an input fragment is classified into, used to pick a
/// small built-in vocabulary to draw from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputShape {
	/// Begins with an uppercase letter followed by `-` (PowerShell verb-noun style).
	Command,
	/// Begins with `-`.
	Parameter,
	/// Contains a path separator.
	Path,
	/// Begins with `$`.
	Variable,
	/// Exactly one character.
	SingleLetter,
	/// None of the above.
	Unclassified,
}

fn classify(input: &str) -> InputShape {
	let mut chars = input.chars();
	let Some(first) = chars.next() else {
		return InputShape::Unclassified;
	};
	if input.chars().count() == 1 {
		return InputShape::SingleLetter;
	}
	if first == '-' {
		return InputShape::Parameter;
	}
	if first == '$' {
		return InputShape::Variable;
	}
	if input.contains('/') || input.contains('\\') {
		return InputShape::Path;
	}
	if first.is_uppercase() && chars.as_str().starts_with('-') {
		return InputShape::Command;
	}
	InputShape::Unclassified
}

const COMMAND_VOCAB: &[&str] = &["Get-ChildItem", "Set-Location", "New-Item", "Remove-Item", "Invoke-Command"];
const PARAMETER_VOCAB: &[&str] = &["-Path", "-Force", "-Recurse", "-Verbose", "-ErrorAction"];
const PATH_VOCAB: &[&str] = &["./", "../", "~/", "/tmp/", "/usr/local/bin/"];
const VARIABLE_VOCAB: &[&str] = &["$HOME", "$PATH", "$PWD", "$?", "$env:PATH"];
const SINGLE_LETTER_VOCAB: &[(&str, &[&str])] = &[
	("c", &["cd", "cat", "clear"]),
	("l", &["ls", "ll"]),
	("g", &["git", "grep"]),
	("d", &["docker", "dotnet"]),
	("p", &["pip", "python", "ps"]),
];

/// Generates completions for `input` from the fixed vocabulary matching
/// its shape. Returns an empty vector for inputs that don't classify or
/// have no vocabulary entry (e.g. an unlisted single letter).
pub fn generate(input: &str) -> Vec<String> {
	match classify(input) {
		InputShape::Command => filter_vocab(COMMAND_VOCAB, input),
		InputShape::Parameter => filter_vocab(PARAMETER_VOCAB, input),
		InputShape::Path => PATH_VOCAB.iter().map(|s| s.to_string()).collect(),
		InputShape::Variable => filter_vocab(VARIABLE_VOCAB, input),
		InputShape::SingleLetter => {
			let lower = input.to_ascii_lowercase();
			SINGLE_LETTER_VOCAB
				.iter()
				.find(|(key, _)| *key == lower)
				.map(|(_, completions)| completions.iter().map(|s| s.to_string()).collect())
				.unwrap_or_default()
		}
		InputShape::Unclassified => Vec::new(),
	}
}

/// Keeps vocabulary entries that case-insensitively start with `input`,
/// falling back to the whole vocabulary when nothing matches.
fn filter_vocab(vocab: &[&str], input: &str) -> Vec<String> {
	let lower = input.to_ascii_lowercase();
	let matching: Vec<String> = vocab.iter().filter(|v| v.to_ascii_lowercase().starts_with(lower.as_str())).map(|s| s.to_string()).collect();
	if matching.is_empty() { vocab.iter().map(|s| s.to_string()).collect() } else { matching }
}
