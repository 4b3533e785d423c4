//! Simulator configuration
//!
//! Every field is optional in the TOML file; missing fields fall back to
//! the defaults in [`crate::constants`].
//!
//! ```toml
//! step_limit = 5000
//! output_banner = "$ ./a.out\n"
//! step_mode = "statement"
//! highlight_block = "#"
//! scoped_variables = false
//! ```

use crate::constants::{DEFAULT_STEP_LIMIT, HIGHLIGHT_BLOCK, OUTPUT_BANNER};
use crate::errors::ConfigError;
use crate::replay::predicates::StepMode;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    /// Steps a producer may record before the run is treated as runaway
    pub step_limit: usize,
    /// Text shown ahead of program output
    pub output_banner: String,
    /// Granularity of forward/backward stepping
    pub step_mode: StepMode,
    /// Character used for the highlight mask
    pub highlight_block: char,
    /// Hide variables whose scope does not contain the active statement
    pub scoped_variables: bool,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        SimulatorConfig {
            step_limit: DEFAULT_STEP_LIMIT,
            output_banner: OUTPUT_BANNER.to_string(),
            step_mode: StepMode::default(),
            highlight_block: HIGHLIGHT_BLOCK,
            scoped_variables: true,
        }
    }
}

impl SimulatorConfig {
    /// Read a configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }
}
