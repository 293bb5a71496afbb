//! Runtime configuration for the fabrik pipeline.
//!
//! Settings are layered file → environment → CLI:
//! - `.fabrik/fabrik.toml` in the project directory (optional)
//! - `CLAUDE_CMD` and `SKIP_PERMISSIONS` environment variables
//! - command-line flags
//!
//! # Configuration File Format
//!
//! ```toml
//! [project]
//! language = "Python"
//! claude_cmd = "claude"
//!
//! [agent]
//! skip_permissions = true
//! max_retries = 2
//! retry_delay_secs = 3
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Target language the agent is asked to implement in when the project does
/// not say otherwise.
pub const DEFAULT_LANGUAGE: &str = "Python";

/// Contents of `.fabrik/fabrik.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FabrikToml {
    #[serde(default)]
    pub project: ProjectSection,
    #[serde(default)]
    pub agent: AgentSection,
}

/// Project-level settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectSection {
    /// Target implementation language (default: "Python")
    #[serde(default)]
    pub language: Option<String>,
    /// Agent CLI command (default: "claude")
    #[serde(default)]
    pub claude_cmd: Option<String>,
}

/// Agent invocation settings.
#[derive(Debug, Clone, Deserialize)]
pub struct AgentSection {
    /// Pass `--dangerously-skip-permissions` to the agent
    #[serde(default = "default_skip_permissions")]
    pub skip_permissions: bool,
    /// Additional attempts after a failed invocation
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Fixed delay between attempts, in seconds
    #[serde(default = "default_retry_delay_secs")]
    pub retry_delay_secs: u64,
}

fn default_skip_permissions() -> bool {
    true
}

fn default_max_retries() -> u32 {
    2
}

fn default_retry_delay_secs() -> u64 {
    3
}

impl Default for AgentSection {
    fn default() -> Self {
        Self {
            skip_permissions: default_skip_permissions(),
            max_retries: default_max_retries(),
            retry_delay_secs: default_retry_delay_secs(),
        }
    }
}

impl FabrikToml {
    /// Load `fabrik.toml` from the fabrik directory, falling back to defaults
    /// when the file does not exist. A file that exists but fails to parse is
    /// a hard error so typos do not silently change the run.
    pub fn load(fabrik_dir: &std::path::Path) -> Result<Self> {
        let path = fabrik_dir.join("fabrik.toml");
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }
}

/// Resolved runtime configuration for one pipeline run.
#[derive(Debug, Clone)]
pub struct Config {
    pub project_dir: PathBuf,
    pub fabrik_dir: PathBuf,
    /// Well-known path the instruction blob is persisted to before each
    /// agent invocation, overwritten every time.
    pub instruction_file: PathBuf,
    /// Well-known path the architecture stage is expected to produce.
    pub architecture_file: PathBuf,
    pub claude_cmd: String,
    pub skip_permissions: bool,
    pub language: String,
    pub max_retries: u32,
    pub retry_delay: Duration,
    pub verbose: bool,
}

impl Config {
    pub fn new(project_dir: PathBuf, language: Option<String>, verbose: bool) -> Result<Self> {
        let project_dir = project_dir
            .canonicalize()
            .context("Failed to resolve project directory")?;
        let fabrik_dir = project_dir.join(".fabrik");

        let file = FabrikToml::load(&fabrik_dir)?;

        let claude_cmd = std::env::var("CLAUDE_CMD")
            .ok()
            .or(file.project.claude_cmd)
            .unwrap_or_else(|| "claude".to_string());
        let skip_permissions = std::env::var("SKIP_PERMISSIONS")
            .map(|v| v != "false")
            .unwrap_or(file.agent.skip_permissions);
        let language = language
            .or(file.project.language)
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());

        Ok(Self {
            instruction_file: fabrik_dir.join("instruction.md"),
            architecture_file: project_dir.join("architecture.json"),
            project_dir,
            fabrik_dir,
            claude_cmd,
            skip_permissions,
            language,
            max_retries: file.agent.max_retries,
            retry_delay: Duration::from_secs(file.agent.retry_delay_secs),
            verbose,
        })
    }

    pub fn ensure_directories(&self) -> Result<()> {
        std::fs::create_dir_all(&self.fabrik_dir).context("Failed to create .fabrik directory")?;
        Ok(())
    }

    /// Arguments passed to the agent command for one invocation. The trigger
    /// message tells the agent to read the persisted instruction file.
    pub fn claude_flags(&self, trigger: &str) -> Vec<String> {
        let mut flags = Vec::new();
        if self.skip_permissions {
            flags.push("--dangerously-skip-permissions".to_string());
        }
        flags.push("-p".to_string());
        flags.push(trigger.to_string());
        flags
    }
}
