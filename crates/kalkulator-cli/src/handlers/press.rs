//! Press command handler
//!
//! Runs key tokens through a fresh engine. Every token is parsed before the
//! first one is pressed, so an unknown key leaves nothing half-done.

use kalkulator::prelude::{CalculatorEngine, CalculatorEvent};
use tracing::info;

use crate::commands::PressArgs;
use crate::config::CliConfig;
use crate::error::CliResult;
use crate::output::{Renderer, Step};

/// Parses key tokens into events
pub fn parse_keys(keys: &[String]) -> CliResult<Vec<CalculatorEvent>> {
    keys.iter()
        .map(|key| key.parse::<CalculatorEvent>().map_err(Into::into))
        .collect()
}

/// Presses the keys and renders the result
pub fn execute_press(config: &CliConfig, args: &PressArgs) -> CliResult<String> {
    let events = parse_keys(&args.keys)?;
    let format = args.format.unwrap_or(config.output_format);
    let renderer = Renderer::new(format, config.color.should_color());

    let mut engine = CalculatorEngine::new();
    let mut steps = Vec::with_capacity(events.len());
    for (key, event) in args.keys.iter().zip(events) {
        let display = engine.dispatch(event);
        steps.push(Step {
            key: key.clone(),
            display,
        });
    }
    info!(keys = args.keys.len(), "pressed keys");

    renderer.press(
        engine.state(),
        args.steps.then_some(steps.as_slice()),
        args.history.then(|| engine.history()),
    )
}
