//! Output formatting for `press`

use clap::ValueEnum;
use console::style;
use serde::{Deserialize, Serialize};

use kalkulator::prelude::{DisplayState, History, HistoryEntry};

use crate::error::CliResult;

/// Output format for display snapshots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON output
    Json,
}

/// One step of a `--steps` run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Step {
    /// Key token as typed
    pub key: String,
    /// Display after the key
    pub display: DisplayState,
}

/// Single JSON document for a `press` run that also asks for the tape
#[derive(Debug, Serialize)]
struct PressReport<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    display: Option<&'a DisplayState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    steps: Option<&'a [Step]>,
    history: Vec<&'a HistoryEntry>,
}

/// Renders display states and the tape for the terminal
#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    format: OutputFormat,
    use_color: bool,
}

impl Renderer {
    /// Create a renderer
    #[must_use]
    pub const fn new(format: OutputFormat, use_color: bool) -> Self {
        Self { format, use_color }
    }

    /// Renders a whole `press` run: the final display or every step, then
    /// the tape if given. JSON output is always one document.
    pub fn press(
        &self,
        display: &DisplayState,
        steps: Option<&[Step]>,
        history: Option<&History>,
    ) -> CliResult<String> {
        if let (OutputFormat::Json, Some(history)) = (self.format, history) {
            let report = PressReport {
                display: if steps.is_none() { Some(display) } else { None },
                steps,
                history: history.iter().collect(),
            };
            return Ok(serde_json::to_string_pretty(&report)?);
        }

        let mut out = match steps {
            Some(steps) => self.steps(steps)?,
            None => self.display(display)?,
        };
        if let Some(history) = history {
            out.push('\n');
            out.push_str(&self.history(history)?);
        }
        Ok(out)
    }

    /// Renders the final display
    pub fn display(&self, display: &DisplayState) -> CliResult<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(display)?),
            OutputFormat::Text => Ok(self.display_text(display)),
        }
    }

    fn display_text(&self, display: &DisplayState) -> String {
        if !display.has_result() {
            return display.expression.clone();
        }
        let result = if self.use_color {
            if display.result == "Error" {
                style(&display.result).red().bold().to_string()
            } else {
                style(&display.result).bold().to_string()
            }
        } else {
            display.result.clone()
        };
        format!("{}\n= {result}", display.expression)
    }

    /// Renders every intermediate snapshot
    pub fn steps(&self, steps: &[Step]) -> CliResult<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(steps)?),
            OutputFormat::Text => {
                let width = steps.iter().map(|s| s.key.chars().count()).max().unwrap_or(0);
                let lines: Vec<String> = steps
                    .iter()
                    .map(|step| {
                        let key = format!("{:>width$}", step.key);
                        let key = if self.use_color {
                            style(key).cyan().to_string()
                        } else {
                            key
                        };
                        if step.display.has_result() {
                            format!(
                                "{key}  {} = {}",
                                step.display.expression, step.display.result
                            )
                        } else {
                            format!("{key}  {}", step.display.expression)
                        }
                    })
                    .collect();
                Ok(lines.join("\n"))
            }
        }
    }

    /// Renders the session tape, oldest first
    pub fn history(&self, history: &History) -> CliResult<String> {
        match self.format {
            OutputFormat::Json => Ok(history.to_json()?),
            OutputFormat::Text => {
                let header = if self.use_color {
                    style("Tape:").bold().to_string()
                } else {
                    "Tape:".to_string()
                };
                let mut out = header;
                for entry in history.iter() {
                    out.push_str("\n  ");
                    out.push_str(&entry.display());
                }
                Ok(out)
            }
        }
    }
}
