//! Fixed dictionary of hand-written completions, keyed by common
//! command names, plus pattern generators keyed by command-verb prefix.
//!
//! This table is the most volatile part of the suggestion engine; it
//! stays code-resident here rather than data-driven because nothing in
//! this workspace yet depends on hot-reloading it.

/// Exact-command completions consulted when the tiered cache comes up short.
const PATTERN_TABLE: &[(&str, &[&str])] = &[
	("cd", &["cd ..", "cd ~", "cd -"]),
	("ls", &["ls -la", "ls -lh", "ls -R"]),
	("git", &["git status", "git add .", "git commit -m", "git push", "git pull"]),
	("docker", &["docker ps", "docker build -t", "docker compose up -d", "docker logs -f"]),
	("npm", &["npm install", "npm run build", "npm run dev", "npm test"]),
	("dotnet", &["dotnet build", "dotnet run", "dotnet test", "dotnet restore"]),
	("pip", &["pip install -r requirements.txt", "pip list", "pip freeze"]),
	("python", &["python -m venv .venv", "python -m pytest", "python -c"]),
];

/// Verb-prefix generators: each entry maps a lowercase prefix to the
/// completions offered for any input that starts with it.
const VERB_PREFIXES: &[(&str, &[&str])] = &[
	("get-", &["Get-ChildItem", "Get-Content", "Get-Process", "Get-Service", "Get-Help"]),
	("set-", &["Set-Location", "Set-Content", "Set-Variable", "Set-ExecutionPolicy"]),
	("new-", &["New-Item", "New-Object", "New-Module", "New-Alias"]),
	("remove-", &["Remove-Item", "Remove-Variable", "Remove-Module"]),
	("test-", &["Test-Path", "Test-Connection", "Test-ModuleManifest"]),
	("start-", &["Start-Process", "Start-Service", "Start-Job"]),
	("stop-", &["Stop-Process", "Stop-Service", "Stop-Job"]),
];

/// Looks up exact-command and verb-prefix completions for `input_lower`.
pub fn lookup(input_lower: &str) -> Vec<String> {
	if let Some((_, completions)) = PATTERN_TABLE.iter().find(|(key, _)| *key == input_lower) {
		return completions.iter().map(|s| s.to_string()).collect();
	}
	VERB_PREFIXES
		.iter()
		.find(|(prefix, _)| input_lower.starts_with(*prefix))
		.map(|(_, completions)| completions.iter().map(|s| s.to_string()).collect())
		.unwrap_or_default()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn exact_command_hits_pattern_table() {
		assert_eq!(lookup("git"), vec!["git status", "git add .", "git commit -m", "git push", "git pull"]);
	}

	#[test]
	fn verb_prefix_matches_partial_input() {
		assert_eq!(lookup("get-c"), lookup("get-"));
	}

	#[test]
	fn unknown_input_returns_empty() {
		assert!(lookup("frobnicate").is_empty());
	}
}
