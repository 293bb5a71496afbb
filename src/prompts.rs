//! Role prompt templates for each pipeline stage.
//!
//! Each function renders the task text handed to the external agent for one
//! stage. The driver never interprets these beyond passing them to the
//! invoker; the role framing ("PM", "Architect", "QA", ...) is what steers
//! the agent's behavior at each stage.

/// Stage 0: deep requirement analysis, documentation only.
pub fn product_definition(idea: &str, language: &str) -> String {
    format!(
        r#"[ROLE]: Senior Product Manager (PM)
[IDEA]: {idea}

Please perform a deep requirement analysis on this idea.

OUTPUT REQUIREMENTS:
1. `PRD.md` (Product Requirement Doc): Detailed feature list, tech stack confirmation (Default: {language}).
2. `DATA_FLOW.md` (Data Flow Design): Data flow diagrams and core data structures.

NOTE: Do NOT write code yet. Only produce documentation.
"#
    )
}

/// Stage 1: emit `architecture.json` and the dependency manifest.
pub fn system_architecture() -> String {
    r#"[ROLE]: System Architect
[TASK]: Design the code architecture based on the PRD.

Read `PRD.md` and `DATA_FLOW.md`.

OUTPUT REQUIREMENTS:
1. Generate `architecture.json`.
   **CRITICAL**: Even if this is a Web Project, it must be a "CLI-First" architecture.
   The `entry_point` must handle command-line arguments to invoke underlying services directly for testing.

   Format Example:
   {
       "modules": { "module_name": { "dependencies": ["other_module"], "description": "..." } },
       "entry_point": "main.py",
       "cli_design": {
           "run_server": "Start main service/web server",
           "test_api": "Call API function directly via JSON args (No network)",
           "inspect_db": "Print DB stats"
       }
   }

2. Generate the dependency manifest (e.g. `requirements.txt`) and install dependencies.
"#
    .to_string()
}

/// Stage 3.1: implement one module plus its unit tests.
pub fn build_module(name: &str, language: &str) -> String {
    format!(
        r#"[ROLE]: Senior {language} Developer
[DOCS]: PRD.md
[ARCH]: architecture.json
[TASK]: Develop the module `{name}` defined in modules.

REQUIREMENTS:
1. **NO MOCK**: Dependencies are ready. Import and use them directly.
2. **IMPLEMENTATION**: Write real, robust code.
3. **UNIT TEST**: Write `tests/test_{name}` and execute it to ensure it passes.
"#
    )
}

/// Stage 3.2: rewrite the entry point to expose exactly the completed
/// modules, never forward-referencing unbuilt ones.
pub fn integrate_module(entry_point: &str, completed_modules: &[String]) -> String {
    format!(
        r#"[ROLE]: Integration Engineer
[TASK]: Update the entry point file `{entry_point}`
[DOCS]: PRD.md
[ARCH]: architecture.json
[READY MODULES]: {completed_modules:?}

INSTRUCTIONS:
1. Use standard CLI argument routing.
2. **ONLY import and register functionality from [READY MODULES].** Do NOT import modules that are not built yet.
3. Ensure Test Mode support: e.g. `{entry_point} test --target [function] --args [json]`.
4. Expose at least one core testable function for the latest module.
"#
    )
}

/// Stage 3.3: acceptance-test the new module through the CLI entry point.
pub fn verify_module(entry_point: &str, module_name: &str, language: &str) -> String {
    format!(
        r#"[ROLE]: QA Engineer
[DOCS]: PRD.md
[ARCH]: architecture.json
[TASK]: Verify that `{module_name}` is successfully integrated into `{entry_point}`.

INSTRUCTIONS:
1. Construct a {language} CLI command. Example: `{entry_point} test --target [belonging_to_{module_name}] ...`
2. Execute the command.
3. Confirm the output is correct (Exit Code 0 and valid JSON/Text output).
"#
    )
}

/// Stage 4: bounded refactor pass with a mandatory test re-run.
pub fn refactoring() -> String {
    r#"[ROLE]: System Refactoring Lead
[TASK]: Review code design, simplify unreasonable modules, and ensure a solid foundation.
[DOCS]: PRD.md
[ARCH]: architecture.json

EXECUTION STEPS:
1. READ and ANALYZE the produced source files.
2. IDENTIFY 1-3 specific areas for improvement (e.g. duplicated logic, messy imports, hardcoded values).
3. REFACTOR (Rewrite) the code to be cleaner and more professional.
4. **CRITICAL**: After refactoring, you MUST run the project tests to ensure functionality is intact.

[SAFETY RULE]
If tests fail after your refactor, you MUST fix the code immediately.

EXECUTE REFACTORING NOW.
"#
    .to_string()
}

/// Stage 5: end-to-end run, placeholder scan, readiness confirmation.
pub fn final_acceptance(entry_point: &str, language: &str) -> String {
    format!(
        r#"[ROLE]: Acceptance Test Lead
[TASK]: End-to-End System Test
[DOCS]: PRD.md

All modules are developed and integrated. Verify their collaboration.

INSTRUCTIONS:
1. Run the project using standard {language} commands (e.g. `{entry_point} run`).
2. Or run a complex test command involving multiple module interactions.
3. Check for any remaining TODOs, placeholder bodies, or mock code. Point them out or fix them.
4. Output the final "PROJECT READY" confirmation.
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_definition_carries_idea_and_language() {
        let prompt = product_definition("a pomodoro timer", "Python");
        assert!(prompt.contains("a pomodoro timer"));
        assert!(prompt.contains("Default: Python"));
        assert!(prompt.contains("PRD.md"));
        assert!(prompt.contains("DATA_FLOW.md"));
        assert!(prompt.contains("Do NOT write code yet"));
    }

    #[test]
    fn test_system_architecture_demands_artifact_schema() {
        let prompt = system_architecture();
        assert!(prompt.contains("architecture.json"));
        assert!(prompt.contains("entry_point"));
        assert!(prompt.contains("cli_design"));
        assert!(prompt.contains("CLI-First"));
    }

    #[test]
    fn test_build_module_has_no_mock_directive() {
        let prompt = build_module("storage", "Python");
        assert!(prompt.contains("`storage`"));
        assert!(prompt.contains("NO MOCK"));
        assert!(prompt.contains("UNIT TEST"));
        assert!(prompt.contains("Senior Python Developer"));
    }

    #[test]
    fn test_integrate_module_lists_only_completed_modules() {
        let completed = vec!["storage".to_string(), "auth".to_string()];
        let prompt = integrate_module("main.py", &completed);
        assert!(prompt.contains("main.py"));
        assert!(prompt.contains("storage"));
        assert!(prompt.contains("auth"));
        assert!(prompt.contains("Do NOT import modules that are not built yet"));
        assert!(prompt.contains("Test Mode"));
    }

    #[test]
    fn test_verify_module_targets_entry_point() {
        let prompt = verify_module("main.py", "auth", "Python");
        assert!(prompt.contains("`auth`"));
        assert!(prompt.contains("`main.py`"));
        assert!(prompt.contains("Exit Code 0"));
    }

    #[test]
    fn test_refactoring_requires_test_rerun_and_regression_fix() {
        let prompt = refactoring();
        assert!(prompt.contains("1-3 specific areas"));
        assert!(prompt.contains("MUST run the project tests"));
        assert!(prompt.contains("fix the code immediately"));
    }

    #[test]
    fn test_final_acceptance_scans_for_placeholders() {
        let prompt = final_acceptance("main.py", "Python");
        assert!(prompt.contains("End-to-End"));
        assert!(prompt.contains("mock code"));
        assert!(prompt.contains("PROJECT READY"));
    }
}
