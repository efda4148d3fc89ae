//! Prompt assembly and response-to-completion parsing for the LM call.

/// Fixed few-shot exemplars keyed by the input's initial substring,
/// nudging the model toward shell-completion style output rather than
/// conversational prose.
const EXEMPLARS: &[(&str, &str)] = &[
	("git", "Input: git ch\nCompletion: git checkout"),
	("docker", "Input: docker co\nCompletion: docker compose up -d"),
	("npm", "Input: npm r\nCompletion: npm run build"),
	("cd", "Input: cd ..\nCompletion: cd .."),
];

/// Assembles the prompt sent to the LM: the input fragment, the
/// current working directory's final component, and any exemplars whose
/// key is a prefix of the input.
pub fn build_prompt(input: &str, cwd_name: &str) -> String {
	let lower = input.to_ascii_lowercase();
	let mut prompt = format!("You are a shell autocompletion engine. Working directory: {cwd_name}\n");
	for (key, exemplar) in EXEMPLARS {
		if lower.starts_with(key) {
			prompt.push_str(exemplar);
			prompt.push('\n');
		}
	}
	prompt.push_str(&format!("Input: {input}\nCompletion:"));
	prompt
}

/// Turns a raw, trimmed LM response into a full completion: returned
/// as-is if it already starts with `input` (case-insensitive), else
/// treated as a suffix and concatenated onto `input`.
pub fn resolve_completion(input: &str, response: &str) -> String {
	let trimmed = response.trim();
	if trimmed.to_ascii_lowercase().starts_with(&input.to_ascii_lowercase()) {
		trimmed.to_string()
	} else {
		format!("{input}{trimmed}")
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn prompt_includes_matching_exemplar() {
		let prompt = build_prompt("git ch", "myrepo");
		assert!(prompt.contains("git checkout"));
	}

	#[test]
	fn prompt_omits_unrelated_exemplars() {
		let prompt = build_prompt("ls -", "myrepo");
		assert!(!prompt.contains("docker compose"));
	}

	#[test]
	fn response_already_prefixed_returned_as_is() {
		assert_eq!(resolve_completion("git", "git status"), "git status");
	}

	#[test]
	fn response_treated_as_suffix_when_not_prefixed() {
		assert_eq!(resolve_completion("git s", "tatus"), "git status");
	}

	#[test]
	fn prefix_check_is_case_insensitive() {
		assert_eq!(resolve_completion("Get-", "get-childitem"), "get-childitem");
	}
}
