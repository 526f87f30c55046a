//! Configuration module for the trade journal.
//!
//! This module provides structured configuration loading from environment variables,
//! organized by concern: local journal, goal policy and remote spreadsheet.

mod goal_config;
mod journal_config;
mod sheets_config;

pub use goal_config::{GoalEnvConfig, load_goal_policy, parse_goal_policy};
pub use journal_config::JournalEnvConfig;
pub use sheets_config::SheetsEnvConfig;

use crate::domain::journal::GoalPolicy;
use crate::domain::repositories::SinkKind;
use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::path::Path;

/// Main application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub journal: JournalEnvConfig,
    pub goals: GoalEnvConfig,
    pub sheets: SheetsEnvConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let journal = JournalEnvConfig::from_env();
        let goals = GoalEnvConfig::from_env().context("Failed to load goal policy config")?;
        let sheets = SheetsEnvConfig::from_env().context("Failed to load sheets config")?;

        Ok(Self {
            journal,
            goals,
            sheets,
        })
    }

    /// Replaces the goal policy with the one in `path`.
    pub fn with_policy_file(mut self, path: &Path) -> Result<Self> {
        self.goals = GoalEnvConfig::from(load_goal_policy(path)?);
        Ok(self)
    }

    pub fn goal_policy(&self) -> GoalPolicy {
        self.goals.policy()
    }

    /// Sinks turned on by configuration.
    pub fn enabled_sinks(&self) -> BTreeSet<SinkKind> {
        let mut sinks = BTreeSet::new();
        if self.journal.local_enabled {
            sinks.insert(SinkKind::Local);
        }
        if self.sheets.enabled {
            sinks.insert(SinkKind::Remote);
        }
        sinks
    }
}
