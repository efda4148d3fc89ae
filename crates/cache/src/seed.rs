//! Cold-start seed data for the hot map, ultra-hot slab, and trie.
//!
//! Seed scores are deliberately low relative to what real usage earns
//! (accepts insert at 2.0, executions' contribution is even higher via
//! `CommandStats::weight`). This is a resolved Open Question from the
//! design: seeds exist only to make a brand-new install feel populated,
//! and must not outrank anything the user actually does. See DESIGN.md.

/// `(prefix, [(completion, seed score)])`, inserted into both the trie
/// and the hot map at startup.
pub const SEED_ENTRIES: &[(&str, &[(&str, f64)])] = &[
	("get-", &[("Get-ChildItem", 1.0), ("Get-Content", 0.9), ("Get-Process", 0.8), ("Get-Service", 0.7), ("Get-Help", 0.6)]),
	("set-", &[("Set-Location", 0.9), ("Set-Content", 0.8), ("Set-Variable", 0.7), ("Set-ExecutionPolicy", 0.6)]),
	("new-", &[("New-Item", 0.9), ("New-Object", 0.8), ("New-Module", 0.7), ("New-Alias", 0.6)]),
	("remove-", &[("Remove-Item", 0.8), ("Remove-Variable", 0.7), ("Remove-Module", 0.6)]),
	("test-", &[("Test-Path", 0.8), ("Test-Connection", 0.7), ("Test-ModuleManifest", 0.6)]),
	("start-", &[("Start-Process", 0.8), ("Start-Service", 0.7), ("Start-Job", 0.6)]),
	("stop-", &[("Stop-Process", 0.8), ("Stop-Service", 0.7), ("Stop-Job", 0.6)]),
	("g", &[("git", 0.6), ("grep", 0.5), ("go", 0.4)]),
	("cd", &[("cd", 0.5)]),
	("ls", &[("ls", 0.6), ("ls -la", 0.5)]),
];

/// Prefixes promoted straight into the ultra-hot slab at startup — the
/// three expected to be hit most often in an ordinary shell session.
pub const ULTRA_HOT_SEED_PREFIXES: &[&str] = &["get-", "cd", "ls"];
