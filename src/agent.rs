//! External agent invocation.
//!
//! The agent is an opaque collaborator: it receives one instruction blob via
//! a well-known file, performs arbitrary filesystem work, and reports
//! success solely through its exit status. The invoker assembles the blob
//! (preamble + labeled context files + task), persists it, and drives the
//! subprocess with bounded fixed-delay retries. Retries resend the exact
//! same persisted instruction.

use crate::config::Config;
use crate::errors::AgentError;
use crate::ui;
use std::path::PathBuf;
use tokio::process::Command;

/// Cap on inlined context-file content. Bounds the instruction blob so it
/// stays within the agent's input budget.
pub const CONTEXT_CHAR_CAP: usize = 12_000;

/// Marker appended to context content cut at [`CONTEXT_CHAR_CAP`].
pub const TRUNCATION_MARKER: &str = "\n...(truncated)...";

const PREAMBLE: &str = "[SYSTEM INSTRUCTION]\n\
You are a HEADLESS, NON-CONVERSATIONAL software agent.\n\
1. DO NOT talk. DO NOT explain.\n\
2. Read the instructions below and EXECUTE them immediately using tools.\n";

/// Truncate context content to [`CONTEXT_CHAR_CAP`] characters, appending
/// the truncation marker when anything was cut.
pub fn truncate_for_context(content: &str) -> String {
    if content.chars().count() <= CONTEXT_CHAR_CAP {
        return content.to_string();
    }
    let mut cut: String = content.chars().take(CONTEXT_CHAR_CAP).collect();
    cut.push_str(TRUNCATION_MARKER);
    cut
}

pub struct AgentInvoker {
    config: Config,
}

impl AgentInvoker {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Run one agent task to completion.
    ///
    /// On non-zero exit the same instruction is retried up to
    /// `config.max_retries` more times with a fixed delay. When every
    /// attempt fails, the error is swallowed if `allow_failure` is set and
    /// the stage proceeds as a no-op; otherwise it propagates and the run
    /// terminates.
    pub async fn invoke(
        &self,
        task: &str,
        context_files: &[PathBuf],
        allow_failure: bool,
    ) -> Result<(), AgentError> {
        let blob = self.build_instruction(task, context_files);

        std::fs::write(&self.config.instruction_file, &blob).map_err(|source| {
            AgentError::InstructionWriteFailed {
                path: self.config.instruction_file.clone(),
                source,
            }
        })?;
        ui::info(&format!(
            "instruction written to {} ({} chars)",
            self.config.instruction_file.display(),
            blob.len()
        ));

        let trigger = format!(
            "Read the file '{}' and execute the [USER TASK] inside it immediately. Do not converse.",
            self.config.instruction_file.display()
        );

        let attempts = self.config.max_retries + 1;
        let mut last_exit_code = -1;

        for attempt in 0..attempts {
            let status = Command::new(&self.config.claude_cmd)
                .args(self.config.claude_flags(&trigger))
                .current_dir(&self.config.project_dir)
                .status()
                .await
                .map_err(|source| AgentError::SpawnFailed {
                    command: self.config.claude_cmd.clone(),
                    source,
                })?;

            if status.success() {
                tracing::debug!(attempt, "agent invocation succeeded");
                return Ok(());
            }

            last_exit_code = status.code().unwrap_or(-1);
            if attempt + 1 < attempts {
                ui::warn(&format!(
                    "agent failed (exit {}), retrying ({}/{})...",
                    last_exit_code,
                    attempt + 1,
                    self.config.max_retries
                ));
                tokio::time::sleep(self.config.retry_delay).await;
            }
        }

        let err = AgentError::Exhausted {
            attempts,
            exit_code: last_exit_code,
        };
        if allow_failure {
            ui::warn(&format!("{}; continuing (failure tolerated)", err));
            Ok(())
        } else {
            Err(err)
        }
    }

    /// Assemble the instruction blob: preamble, labeled context blocks for
    /// each context file that exists, then the task text.
    fn build_instruction(&self, task: &str, context_files: &[PathBuf]) -> String {
        let mut context = String::new();
        for path in context_files {
            let full = self.config.project_dir.join(path);
            if !full.exists() {
                continue;
            }
            match std::fs::read_to_string(&full) {
                Ok(content) => {
                    context.push_str(&format!(
                        "\n\n--- FILE: {} ---\n{}\n----------------\n",
                        path.display(),
                        truncate_for_context(&content)
                    ));
                }
                Err(e) => {
                    ui::warn(&format!(
                        "skipping unreadable context file {}: {}",
                        full.display(),
                        e
                    ));
                }
            }
        }

        format!("{PREAMBLE}\n[CONTEXT FILES]\n{context}\n\n[USER TASK]\n{task}\n")
    }
}
