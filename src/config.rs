use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, anyhow};
use jsonschema::{JSONSchema, ValidationError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    capabilities::{DetailLevel, InterventionFocus, PlanTimeframe},
    router::{KeywordExtensions, RetrievalToggles},
};

const DEFAULT_SCHEMA_FILE: &str = "cvd_agent.schema.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(rename = "$schema", default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub router: RouterConfig,
    #[serde(default)]
    pub reporting: ReportingConfig,
    #[serde(default)]
    pub capabilities: CapabilitiesConfig,
    #[serde(default)]
    pub model: ModelConfig,
}

fn default_enabled_true() -> bool {
    true
}

fn default_logging_dir() -> PathBuf {
    PathBuf::from("./logs")
}

fn default_logging_filter() -> String {
    "info".to_string()
}

fn default_logging_rotation() -> LoggingRotation {
    LoggingRotation::Daily
}

fn default_logging_retention_days() -> usize {
    14
}

fn default_top_risk_factors() -> usize {
    5
}

fn default_protective_factors() -> usize {
    3
}

fn default_retrieval_k() -> usize {
    3
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum LoggingRotation {
    Daily,
    Hourly,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_logging_dir")]
    pub dir: PathBuf,
    #[serde(default = "default_logging_filter")]
    pub filter: String,
    #[serde(default = "default_logging_rotation")]
    pub rotation: LoggingRotation,
    #[serde(default = "default_logging_retention_days")]
    pub retention_days: usize,
    #[serde(default = "default_enabled_true")]
    pub stderr_warn_enabled: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: default_logging_dir(),
            filter: default_logging_filter(),
            rotation: default_logging_rotation(),
            retention_days: default_logging_retention_days(),
            stderr_warn_enabled: true,
        }
    }
}

/// Session-level retrieval defaults and keyword-set refinements.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RouterConfig {
    #[serde(default)]
    pub defaults: RetrievalToggles,
    #[serde(default)]
    pub extra_keywords: KeywordExtensions,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportingConfig {
    #[serde(default = "default_top_risk_factors")]
    pub top_risk_factors: usize,
    #[serde(default = "default_protective_factors")]
    pub protective_factors: usize,
}

impl Default for ReportingConfig {
    fn default() -> Self {
        Self {
            top_risk_factors: default_top_risk_factors(),
            protective_factors: default_protective_factors(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilitiesConfig {
    #[serde(default = "default_retrieval_k")]
    pub retrieval_k: usize,
    #[serde(default)]
    pub explanation_detail: DetailLevel,
    #[serde(default)]
    pub intervention_focus: InterventionFocus,
    #[serde(default)]
    pub plan_timeframe: PlanTimeframe,
}

impl Default for CapabilitiesConfig {
    fn default() -> Self {
        Self {
            retrieval_k: default_retrieval_k(),
            explanation_detail: DetailLevel::default(),
            intervention_focus: InterventionFocus::default(),
            plan_timeframe: PlanTimeframe::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelConfig {
    /// JSON model artifact file; see `inference::ModelArtifacts`.
    #[serde(default)]
    pub artifacts_path: Option<PathBuf>,
}

impl Config {
    pub fn load(config_path: &Path) -> Result<Self> {
        let config_content = fs::read_to_string(config_path)
            .with_context(|| format!("failed to read {}", config_path.display()))?;
        let config_value: Value = json5::from_str(&config_content)
            .with_context(|| format!("failed to parse {}", config_path.display()))?;

        let config_base = config_path.parent().unwrap_or_else(|| Path::new("."));
        let schema_path = resolve_schema_path(config_base, &config_value)?;
        validate_against_schema(&config_value, &schema_path)?;

        let mut config: Config =
            serde_json::from_value(config_value).context("failed to deserialize cvd-agent config")?;

        if let Some(artifacts_path) = config.model.artifacts_path.as_mut()
            && !artifacts_path.is_absolute()
        {
            *artifacts_path = config_base.join(&*artifacts_path);
        }

        Ok(config)
    }
}

fn resolve_schema_path(config_base: &Path, config_value: &Value) -> Result<PathBuf> {
    if let Some(path_text) = config_value.get("$schema").and_then(|value| value.as_str()) {
        let configured = PathBuf::from(path_text);
        if configured.is_absolute() {
            return Ok(configured);
        }
        return Ok(config_base.join(&configured));
    }

    let local_default = config_base.join(DEFAULT_SCHEMA_FILE);
    if local_default.exists() {
        return Ok(local_default);
    }

    Err(anyhow!(
        "unable to resolve schema path: expected $schema in config or {DEFAULT_SCHEMA_FILE} next to it"
    ))
}

fn validate_against_schema(config_value: &Value, schema_path: &Path) -> Result<()> {
    let schema_content = fs::read_to_string(schema_path)
        .with_context(|| format!("failed to read schema {}", schema_path.display()))?;
    let schema: Value = serde_json::from_str(&schema_content)
        .with_context(|| format!("failed to parse schema {}", schema_path.display()))?;

    let compiled =
        JSONSchema::compile(&schema).map_err(|e| anyhow!("failed to compile schema: {e}"))?;

    let result = compiled.validate(config_value);
    if let Err(errors_iter) = result {
        let validation_errors: Vec<ValidationError> = errors_iter.collect();
        let messages: Vec<String> = validation_errors
            .into_iter()
            .map(|error| error.to_string())
            .collect();
        return Err(anyhow!("config validation failed: {}", messages.join("; ")));
    }
    Ok(())
}
