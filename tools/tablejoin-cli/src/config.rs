//! Configuration for the tablejoin CLI
//!
//! Every setting has a default, so a config file only needs the values it changes.
//! Command line flags override the file.
//!
//! # Example Configuration
//!
//! ```toml
//! [input]
//! left = "data/input_A.csv"
//! right = "data/input_B.csv"
//!
//! [output]
//! path = "data/result.csv"
//! fsync = false
//!
//! [join]
//! strategy = "bounded"
//! window = 5
//! separator = ","
//! on_malformed = "skip"
//! max_malformed = 100
//! ```

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tablejoin::{JoinOptions, JoinPlan, StrategyKind, WindowBound, DEFAULT_WINDOW_ROWS};
use tablejoin_core::{MalformedPolicy, SyncMode, DEFAULT_SEPARATOR};

/// Main configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Input tables
    #[serde(default)]
    pub input: InputConfig,

    /// Result file
    #[serde(default)]
    pub output: OutputConfig,

    /// Join behaviour
    #[serde(default)]
    pub join: JoinConfig,
}

/// Input table locations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InputConfig {
    /// Left table (A)
    pub left: PathBuf,
    /// Right table (B)
    pub right: PathBuf,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            left: PathBuf::from("./data/input_A.csv"),
            right: PathBuf::from("./data/input_B.csv"),
        }
    }
}

/// Result file settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Where joined rows are written
    pub path: PathBuf,
    /// Fsync the result after every batch
    pub fsync: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { path: PathBuf::from("./data/result.csv"), fsync: false }
    }
}

/// Join strategy names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyName {
    /// Windowed join with bounded memory
    #[default]
    Bounded,
    /// Load both tables into memory
    InMemory,
}

/// Malformed line handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum MalformedMode {
    /// Stop at the first malformed line
    #[default]
    Abort,
    /// Skip malformed lines and report them
    Skip,
}

/// Join behaviour
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct JoinConfig {
    /// Strategy to run
    pub strategy: StrategyName,
    /// Lines per window
    pub window: usize,
    /// Field separator
    pub separator: char,
    /// Malformed line handling
    pub on_malformed: MalformedMode,
    /// Fail once more than this many malformed lines were skipped
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_malformed: Option<usize>,
}

impl Default for JoinConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyName::default(),
            window: DEFAULT_WINDOW_ROWS,
            separator: DEFAULT_SEPARATOR,
            on_malformed: MalformedMode::default(),
            max_malformed: None,
        }
    }
}

impl JoinConfig {
    /// The malformed line policy these settings describe.
    pub fn policy(&self) -> MalformedPolicy {
        match (self.on_malformed, self.max_malformed) {
            (MalformedMode::Abort, _) => MalformedPolicy::Abort,
            (MalformedMode::Skip, None) => MalformedPolicy::Skip,
            (MalformedMode::Skip, Some(limit)) => MalformedPolicy::SkipUpTo(limit),
        }
    }

    /// Converts to library options.
    pub fn options(&self) -> Result<JoinOptions> {
        let Some(window) = WindowBound::rows(self.window) else {
            bail!("join.window must be a positive number of rows");
        };
        let strategy = match self.strategy {
            StrategyName::Bounded => StrategyKind::Bounded,
            StrategyName::InMemory => StrategyKind::InMemory,
        };
        let options = JoinOptions::default()
            .with_strategy(strategy)
            .with_window(window)
            .with_separator(self.separator)
            .with_malformed(self.policy());
        options.validate()?;
        Ok(options)
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("invalid config {}", path.display()))
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.join.max_malformed.is_some() && self.join.on_malformed == MalformedMode::Abort {
            bail!("join.max_malformed requires on_malformed = \"skip\"");
        }
        self.join.options()?;
        Ok(())
    }

    /// Builds the join plan described by this configuration.
    pub fn plan(&self) -> Result<JoinPlan> {
        let sync = if self.output.fsync { SyncMode::Fsync } else { SyncMode::Flush };
        Ok(JoinPlan::new(&self.input.left, &self.input.right, &self.output.path)
            .with_options(self.join.options()?)
            .with_sync(sync))
    }
}
