//! Orchestrates the tiered cache, pattern table, and smart generators
//! into ranked, tooltip-annotated suggestions.

use augur_cache::TieredCache;

use crate::{generators, patterns};

/// A single ranked suggestion: the completion text and a short tooltip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
	pub text: String,
	pub tooltip: String,
}

/// Returns up to `k` ranked suggestions for `input`, within the
/// synchronous latency budget: no network I/O, no cache mutation beyond
/// what `TieredCache::get_completions` already does internally.
///
/// Empty or all-whitespace input yields no suggestions.
pub fn suggest(cache: &TieredCache, input: &str, k: usize) -> Vec<Suggestion> {
	let trimmed = input.trim_start();
	if trimmed.is_empty() || k == 0 {
		return Vec::new();
	}
	let lower = trimmed.to_ascii_lowercase();

	let mut texts: Vec<String> = cache.get_completions(trimmed, 2 * k);

	if texts.len() < k {
		for text in patterns::lookup(&lower) {
			if !texts.contains(&text) {
				texts.push(text);
			}
		}
	}

	if texts.len() < k {
		for text in generators::generate(trimmed) {
			if !texts.contains(&text) {
				texts.push(text);
			}
		}
	}

	let mut seen = std::collections::HashSet::new();
	texts.retain(|t| seen.insert(t.clone()));
	texts.truncate(k);

	texts
		.into_iter()
		.map(|text| {
			let tooltip = if text.to_ascii_lowercase().starts_with(&lower) {
				format!("Complete: {}", &text[trimmed.len().min(text.len())..])
			} else {
				"Suggestion".to_string()
			};
			Suggestion { text, tooltip }
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn empty_input_yields_no_suggestions() {
		let cache = TieredCache::new();
		assert!(suggest(&cache, "   ", 3).is_empty());
	}

	#[test]
	fn cache_hit_gets_completion_tooltip() {
		let cache = TieredCache::new();
		let suggestions = suggest(&cache, "Get-", 3);
		assert_eq!(suggestions[0].text, "Get-ChildItem");
		assert_eq!(suggestions[0].tooltip, "Complete: ChildItem");
	}

	#[test]
	fn short_on_cache_hits_falls_through_to_pattern_table() {
		let cache = TieredCache::new();
		let suggestions = suggest(&cache, "docker", 4);
		assert!(suggestions.iter().any(|s| s.text == "docker compose up -d" || s.text == "docker ps"));
	}

	#[test]
	fn result_is_deduped_and_truncated() {
		let cache = TieredCache::new();
		let suggestions = suggest(&cache, "g", 2);
		assert_eq!(suggestions.len(), 2);
		let texts: std::collections::HashSet<_> = suggestions.iter().map(|s| &s.text).collect();
		assert_eq!(texts.len(), suggestions.len());
	}
}
