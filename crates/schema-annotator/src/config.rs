//! Pass configuration.
//!
//! Which calls qualify is fixed; configuration only covers how the pass
//! reacts to failures while computing schemas.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{AnnotateError, Result};

pub const ENV_MAPPER_ERRORS: &str = "SCHEMA_ANNOTATOR_MAPPER_ERRORS";
pub const ENV_CYCLE_GUARD: &str = "SCHEMA_ANNOTATOR_CYCLE_GUARD";
pub const ENV_MAX_DEPTH: &str = "SCHEMA_ANNOTATOR_MAX_DEPTH";

/// Largest accepted `max_depth`. The walk recurses on the call stack.
pub const MAX_DEPTH_LIMIT: usize = 1024;

/// What to do when the mapper cannot produce a schema for a type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MapperErrorPolicy {
    /// Log, leave the type out of the table, keep walking.
    #[default]
    SkipEntry,
    /// Log and leave every document of the module untouched.
    AbortModule,
}

impl FromStr for MapperErrorPolicy {
    type Err = AnnotateError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "skip-entry" | "skip" => Ok(Self::SkipEntry),
            "abort-module" | "abort" => Ok(Self::AbortModule),
            other => Err(AnnotateError::Config(format!(
                "{ENV_MAPPER_ERRORS}: expected 'skip-entry' or 'abort-module', got '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ModifierConfig {
    pub mapper_errors: MapperErrorPolicy,
    /// Skip named types already being expanded higher up the walk.
    pub cycle_guard: bool,
    /// Upper bound on walk depth; exceeding it fails the module.
    pub max_depth: usize,
}

impl Default for ModifierConfig {
    fn default() -> Self {
        Self {
            mapper_errors: MapperErrorPolicy::default(),
            cycle_guard: true,
            max_depth: 128,
        }
    }
}

impl ModifierConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(policy) = lookup(ENV_MAPPER_ERRORS) {
            config.mapper_errors = policy.trim().parse()?;
        }
        if let Some(guard) = lookup(ENV_CYCLE_GUARD) {
            config.cycle_guard = match guard.trim() {
                "1" | "true" => true,
                "0" | "false" => false,
                other => {
                    return Err(AnnotateError::Config(format!(
                        "{ENV_CYCLE_GUARD}: expected 0 or 1, got '{other}'"
                    )));
                }
            };
        }
        if let Some(depth) = lookup(ENV_MAX_DEPTH) {
            config.max_depth = depth.trim().parse().map_err(|_| {
                AnnotateError::Config(format!("{ENV_MAX_DEPTH}: not a number: '{depth}'"))
            })?;
            if config.max_depth > MAX_DEPTH_LIMIT {
                return Err(AnnotateError::Config(format!(
                    "{ENV_MAX_DEPTH}: {} exceeds the limit of {MAX_DEPTH_LIMIT}",
                    config.max_depth
                )));
            }
        }

        Ok(config)
    }
}
