//! Lint command definitions and configuration.

use difflint_core::LintTool;

/// Default per-project lint timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 600;

/// Command run for one lint tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintCommand {
    /// Tool this command lints with.
    pub tool: LintTool,

    /// Command to execute (first element is executable).
    pub command: Vec<String>,
}

impl LintCommand {
    /// The gulp task each tool is wired to in project build files.
    pub fn builtin(tool: LintTool) -> Option<Self> {
        let command = match tool {
            LintTool::JsHint => vec!["gulp".to_string(), "jshint".to_string()],
            LintTool::EsLint => vec!["gulp".to_string(), "lint".to_string()],
            LintTool::None => return None,
        };
        Some(Self { tool, command })
    }

    /// Create a custom command.
    pub fn custom(tool: LintTool, command: Vec<String>) -> Self {
        Self { tool, command }
    }

    /// Parse a whitespace-separated command line, e.g. `"npx eslint src"`.
    pub fn parse(tool: LintTool, line: &str) -> Option<Self> {
        let command: Vec<String> = line.split_whitespace().map(str::to_string).collect();
        if command.is_empty() {
            return None;
        }
        Some(Self { tool, command })
    }

    /// Human-readable command line.
    pub fn display(&self) -> String {
        self.command.join(" ")
    }
}

/// Configuration for lint execution.
#[derive(Debug, Clone)]
pub struct LintConfig {
    pub jshint: LintCommand,
    pub eslint: LintCommand,

    /// Timeout in seconds per project; 0 waits forever.
    pub timeout_secs: u64,

    /// Whether annotations carry ANSI colors.
    pub color: bool,
}

impl Default for LintConfig {
    fn default() -> Self {
        let builtin = |tool| {
            LintCommand::builtin(tool).unwrap_or_else(|| LintCommand::custom(tool, Vec::new()))
        };
        Self {
            jshint: builtin(LintTool::JsHint),
            eslint: builtin(LintTool::EsLint),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            color: true,
        }
    }
}

impl LintConfig {
    /// Command for `tool`, or `None` when nothing should run.
    pub fn command_for(&self, tool: LintTool) -> Option<&LintCommand> {
        match tool {
            LintTool::JsHint => Some(&self.jshint),
            LintTool::EsLint => Some(&self.eslint),
            LintTool::None => None,
        }
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn without_color(mut self) -> Self {
        self.color = false;
        self
    }
}
