//! Architecture artifact types and lenient loading.
//!
//! The architecture stage asks the agent to emit `architecture.json`. Agents
//! sometimes wrap JSON output in Markdown code fences or surrounding prose,
//! so the loader strips fences before parsing. A missing or unparseable file
//! is reported as absent rather than an error; callers decide whether the
//! stage that needed it fails.

use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::OnceLock;

/// The architecture descriptor produced by the architecture stage.
///
/// `modules` is a `BTreeMap` so iteration order (and therefore the seeding
/// order of the dependency sequencer) is deterministic across runs.
#[derive(Debug, Clone, Deserialize)]
pub struct Architecture {
    #[serde(default)]
    pub modules: BTreeMap<String, ModuleInfo>,
    #[serde(default = "default_entry_point")]
    pub entry_point: String,
    #[serde(default)]
    pub cli_design: BTreeMap<String, String>,
}

/// Per-module info. Only `dependencies` is interpreted by the driver; the
/// agent is free to attach any descriptive metadata alongside it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModuleInfo {
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

fn default_entry_point() -> String {
    "main.py".to_string()
}

fn fence_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"```json\s*|```").expect("static fence pattern is valid"))
}

/// Strip Markdown code-fence delimiters from agent output, leaving the
/// fenced content in place.
fn strip_code_fences(text: &str) -> String {
    fence_pattern().replace_all(text, "").into_owned()
}

/// Read and lenient-parse the architecture artifact.
///
/// Returns `None` when the file does not exist, cannot be read, or does not
/// parse as an architecture descriptor after fence stripping.
pub fn read_structured(path: &Path) -> Option<Architecture> {
    if !path.exists() {
        return None;
    }
    let text = std::fs::read_to_string(path).ok()?;
    let cleaned = strip_code_fences(&text);
    match serde_json::from_str(&cleaned) {
        Ok(arch) => Some(arch),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "architecture artifact failed to parse");
            None
        }
    }
}
