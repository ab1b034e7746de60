//! Configuration layering for the command line front end.
//!
//! Sources, highest precedence first: command line flags, GitHub Action
//! `INPUT_*` variables, `covgate.toml`, built-in defaults. The resolved
//! [`Settings`] are turned into an explicit [`GateConfig`] before the
//! pipeline runs; nothing below this module reads the environment.

use anyhow::{Context, Result};
use log::debug;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::gate::GateConfig;

pub const CONFIG_FILE: &str = "covgate.toml";
pub const DEFAULT_REPORT_PATH: &str = "./coverage/lcov.info";

#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub gate: GateSection,
    #[serde(default)]
    pub comment: CommentSection,
}

#[derive(Debug, Default, Deserialize)]
pub struct GateSection {
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub min_coverage: Option<f64>,
    #[serde(default)]
    pub exclude: Vec<String>,
    #[serde(default)]
    pub project_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CommentSection {
    /// Post the coverage summary on the pull request
    #[serde(default)]
    pub enabled: Option<bool>,
    #[serde(default)]
    pub token: Option<String>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: FileConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        Ok(config)
    }

    /// Load an explicitly requested file, or the default one when present
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let default = Path::new(CONFIG_FILE);
                if default.exists() {
                    debug!("Using config file {}", default.display());
                    Self::load(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}

/// GitHub Action inputs, as exposed to the process environment
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ActionInputs {
    pub path: Option<String>,
    pub min_coverage: Option<String>,
    pub exclude: Option<String>,
    pub github_token: Option<String>,
    pub report_coverage_comment: Option<String>,
    pub project_name: Option<String>,
}

impl ActionInputs {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Empty values are treated as unset
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            path: get("INPUT_PATH"),
            min_coverage: get("INPUT_MIN_COVERAGE"),
            exclude: get("INPUT_EXCLUDE"),
            github_token: get("INPUT_GITHUB_TOKEN").or_else(|| get("GITHUB_TOKEN")),
            report_coverage_comment: get("INPUT_REPORT_COVERAGE_COMMENT"),
            project_name: get("INPUT_PROJECT_NAME"),
        }
    }
}

/// Values given on the command line
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub path: Option<String>,
    pub min_coverage: Option<f64>,
    pub exclude: Vec<String>,
    pub project_name: Option<String>,
    pub github_token: Option<String>,
    pub report_coverage_comment: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub report_path: String,
    pub min_coverage: Option<f64>,
    pub exclude: Vec<String>,
    pub project_name: String,
    pub github_token: Option<String>,
    pub report_coverage_comment: bool,
}

impl Settings {
    pub fn resolve(cli: &Overrides, inputs: &ActionInputs, file: &FileConfig) -> Result<Self> {
        let min_coverage = match (cli.min_coverage, &inputs.min_coverage) {
            (Some(min), _) => Some(min),
            (None, Some(raw)) => Some(
                raw.trim()
                    .parse::<f64>()
                    .with_context(|| format!("min_coverage is not a number: '{}'", raw))?,
            ),
            (None, None) => file.gate.min_coverage,
        };

        let exclude = if !cli.exclude.is_empty() {
            cli.exclude.iter().flat_map(|p| split_patterns(p)).collect()
        } else if let Some(raw) = &inputs.exclude {
            split_patterns(raw)
        } else {
            file.gate.exclude.iter().flat_map(|p| split_patterns(p)).collect()
        };

        let report_coverage_comment = if cli.report_coverage_comment {
            true
        } else if let Some(raw) = &inputs.report_coverage_comment {
            parse_flag(raw)?
        } else {
            file.comment.enabled.unwrap_or(false)
        };

        Ok(Self {
            report_path: cli
                .path
                .clone()
                .or_else(|| inputs.path.clone())
                .or_else(|| file.gate.path.clone())
                .unwrap_or_else(|| DEFAULT_REPORT_PATH.to_string()),
            min_coverage,
            exclude,
            project_name: cli
                .project_name
                .clone()
                .or_else(|| inputs.project_name.clone())
                .or_else(|| file.gate.project_name.clone())
                .unwrap_or_default(),
            github_token: cli
                .github_token
                .clone()
                .or_else(|| inputs.github_token.clone())
                .or_else(|| file.comment.token.clone()),
            report_coverage_comment,
        })
    }

    pub fn gate_config(&self) -> Result<GateConfig> {
        GateConfig::new(self.min_coverage, &self.exclude, &self.project_name)
            .context("Invalid gate configuration")
    }

    /// Report path with `~` and `$VAR` expanded
    pub fn expanded_report_path(&self) -> Result<PathBuf> {
        let expanded = shellexpand::full(&self.report_path)
            .with_context(|| format!("Could not expand report path: {}", self.report_path))?;
        Ok(PathBuf::from(expanded.as_ref()))
    }

    pub fn read_report(&self) -> Result<String> {
        let path = self.expanded_report_path()?;
        debug!("Reading coverage report from {}", path.display());
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read coverage report: {}", path.display()))
    }
}

/// Split a pattern list on commas and newlines
pub fn split_patterns(raw: &str) -> Vec<String> {
    raw.split([',', '\n'])
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_flag(raw: &str) -> Result<bool> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => anyhow::bail!("Expected true or false, got '{}'", other),
    }
}
