//! The fixed six-stage pipeline.
//!
//! Each stage delegates its real work to the external agent with a
//! role-specific task, strictly in sequence: product definition,
//! architecture, dependency analysis (internal, no agent call), the
//! develop/integrate/verify loop over the build order, refactoring, and
//! final acceptance. Any fatal stage error aborts the whole run; there is no
//! checkpoint or resume.

use crate::agent::AgentInvoker;
use crate::artifact::{self, Architecture};
use crate::config::Config;
use crate::dag::ModuleGraph;
use crate::errors::PipelineError;
use crate::{prompts, ui};
use std::path::PathBuf;

pub struct Pipeline {
    config: Config,
    invoker: AgentInvoker,
}

impl Pipeline {
    pub fn new(config: Config) -> Self {
        let invoker = AgentInvoker::new(config.clone());
        Self { config, invoker }
    }

    /// Run the full pipeline for one idea.
    pub async fn run(&self, idea: &str) -> Result<(), PipelineError> {
        self.product_definition(idea).await?;
        self.system_architecture().await?;

        let arch = self.load_architecture()?;
        let build_order = self.dependency_analysis(&arch)?;

        self.development_loop(&arch, &build_order).await?;
        self.refactoring().await?;
        self.final_acceptance(&arch.entry_point).await?;

        ui::stage_banner(
            "DONE",
            "Project construction complete. All modules integrated and tested.",
        );
        Ok(())
    }

    async fn product_definition(&self, idea: &str) -> Result<(), PipelineError> {
        ui::stage_banner("STAGE 0", "Product Requirement Analysis (PM)");
        let task = prompts::product_definition(idea, &self.config.language);
        self.invoker.invoke(&task, &[], false).await?;
        Ok(())
    }

    async fn system_architecture(&self) -> Result<(), PipelineError> {
        ui::stage_banner("STAGE 1", "System Architecture & CLI Design (Architect)");
        let task = prompts::system_architecture();
        let context = [PathBuf::from("PRD.md"), PathBuf::from("DATA_FLOW.md")];
        self.invoker.invoke(&task, &context, false).await?;
        Ok(())
    }

    /// Read the architecture artifact the previous stage was required to
    /// produce. Absence or parse failure is fatal before any stage that
    /// depends on the build order.
    fn load_architecture(&self) -> Result<Architecture, PipelineError> {
        artifact::read_structured(&self.config.architecture_file).ok_or_else(|| {
            PipelineError::ArchitectureUnavailable {
                path: self.config.architecture_file.clone(),
            }
        })
    }

    fn dependency_analysis(&self, arch: &Architecture) -> Result<Vec<String>, PipelineError> {
        ui::stage_banner("STAGE 2", "Compute Development Path (Topological Sort)");
        let graph = ModuleGraph::build(arch)?;
        let build_order = graph.build_order()?;
        ui::info(&format!("Build Order: {}", build_order.join(" -> ")));
        Ok(build_order)
    }

    /// Develop -> Integrate -> Verify for each module, in build order. All
    /// three steps complete before the loop advances: each Integrate step
    /// assumes exactly the prior completed modules are importable.
    async fn development_loop(
        &self,
        arch: &Architecture,
        build_order: &[String],
    ) -> Result<(), PipelineError> {
        let entry_point = &arch.entry_point;
        let mut completed_modules: Vec<String> = Vec::new();

        for module_name in build_order {
            if !arch.modules.contains_key(module_name) {
                continue;
            }

            ui::stage_banner(
                "STAGE 3.1 (Dev)",
                &format!("Building Module: {module_name}"),
            );
            let task = prompts::build_module(module_name, &self.config.language);
            self.invoker.invoke(&task, &[], false).await?;

            completed_modules.push(module_name.clone());

            ui::stage_banner(
                "STAGE 3.2 (Integration)",
                &format!("Integrating {module_name} into {entry_point}"),
            );
            let task = prompts::integrate_module(entry_point, &completed_modules);
            self.invoker.invoke(&task, &[], false).await?;

            ui::stage_banner(
                "STAGE 3.3 (Verification)",
                &format!("Verifying {module_name} via CLI"),
            );
            let task = prompts::verify_module(entry_point, module_name, &self.config.language);
            self.invoker.invoke(&task, &[], false).await?;
        }

        Ok(())
    }

    async fn refactoring(&self) -> Result<(), PipelineError> {
        ui::stage_banner(
            "STAGE 4",
            "System Refactoring & Code Review (Refactoring Lead)",
        );
        let task = prompts::refactoring();
        self.invoker.invoke(&task, &[], false).await?;
        Ok(())
    }

    async fn final_acceptance(&self, entry_point: &str) -> Result<(), PipelineError> {
        ui::stage_banner("STAGE 5", "Final System Acceptance Test");
        let task = prompts::final_acceptance(entry_point, &self.config.language);
        self.invoker.invoke(&task, &[], false).await?;
        Ok(())
    }
}
