//! Per-tool interpretation of lint output.
//!
//! Each lint tool prints failures in its own shape. An [`OutputClassifier`]
//! knows that shape: it finds the failure lines and prefixes each with the
//! project alias so interleaved reports stay attributable.

use std::sync::OnceLock;

use difflint_core::LintTool;
use owo_colors::OwoColorize;
use regex::{Captures, Regex};

/// Lint output after annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    /// Number of failure lines found.
    pub failures: usize,

    /// Output with every failure line prefixed by the alias.
    pub text: String,
}

impl Annotation {
    pub fn has_failures(&self) -> bool {
        self.failures > 0
    }
}

/// Recognises failure lines in one tool's output.
pub trait OutputClassifier: Send + Sync {
    /// Tool whose output this classifier understands.
    fn tool(&self) -> LintTool;

    /// Pattern matching a single failure line.
    fn failure_pattern(&self) -> &Regex;

    /// Alias header placed above each failure line.
    fn alias_header(&self, alias: &str, color: bool) -> String;

    /// Annotate `output`, prefixing each failure with the alias.
    fn annotate(&self, alias: &str, output: &str, color: bool) -> Annotation {
        let mut failures = 0usize;
        let header = self.alias_header(alias, color);
        let text = self
            .failure_pattern()
            .replace_all(output, |caps: &Captures<'_>| {
                failures += 1;
                let line = &caps[0];
                if color {
                    format!("{}\n{}", header, line.red())
                } else {
                    format!("{}\n{}", header, line)
                }
            })
            .into_owned();
        Annotation { failures, text }
    }
}

/// jshint reporter lines: `line 12, col 4, Missing semicolon.`
#[derive(Debug, Default, Clone, Copy)]
pub struct JsHintClassifier;

impl OutputClassifier for JsHintClassifier {
    fn tool(&self) -> LintTool {
        LintTool::JsHint
    }

    fn failure_pattern(&self) -> &Regex {
        static PATTERN: OnceLock<Regex> = OnceLock::new();
        PATTERN.get_or_init(|| Regex::new(r"(?i)line.*").expect("valid jshint pattern"))
    }

    fn alias_header(&self, alias: &str, color: bool) -> String {
        if color {
            alias.red().to_string()
        } else {
            alias.to_string()
        }
    }
}

/// eslint reporter lines: `src/routes/user.js:10:5 ...`
#[derive(Debug, Default, Clone, Copy)]
pub struct EsLintClassifier;

impl OutputClassifier for EsLintClassifier {
    fn tool(&self) -> LintTool {
        LintTool::EsLint
    }

    fn failure_pattern(&self) -> &Regex {
        static PATTERN: OnceLock<Regex> = OnceLock::new();
        PATTERN.get_or_init(|| Regex::new(r"(?i)src/.*\d+:\d+").expect("valid eslint pattern"))
    }

    fn alias_header(&self, alias: &str, color: bool) -> String {
        if color {
            alias.bright_blue().to_string()
        } else {
            alias.to_string()
        }
    }
}

/// Classifier for `tool`, or `None` when the tool never runs.
pub fn classifier_for(tool: LintTool) -> Option<&'static dyn OutputClassifier> {
    static JSHINT: JsHintClassifier = JsHintClassifier;
    static ESLINT: EsLintClassifier = EsLintClassifier;
    match tool {
        LintTool::JsHint => Some(&JSHINT),
        LintTool::EsLint => Some(&ESLINT),
        LintTool::None => None,
    }
}
