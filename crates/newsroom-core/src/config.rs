use crate::error::{NewsroomError, Result};
use crate::paths;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// WorkflowConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowConfig {
    /// Minimum length of feedback on request-revision / return-to-section.
    #[serde(default = "default_min_feedback")]
    pub min_feedback_chars: usize,
    #[serde(default = "default_single_timeout")]
    pub single_timeout_secs: u64,
    #[serde(default = "default_bulk_timeout")]
    pub bulk_timeout_secs: u64,
    #[serde(default = "default_bulk_parallel")]
    pub bulk_max_parallel: usize,
    #[serde(default = "default_wpm")]
    pub words_per_minute: usize,
}

fn default_min_feedback() -> usize {
    10
}

fn default_single_timeout() -> u64 {
    30
}

fn default_bulk_timeout() -> u64 {
    60
}

fn default_bulk_parallel() -> usize {
    8
}

fn default_wpm() -> usize {
    200
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            min_feedback_chars: default_min_feedback(),
            single_timeout_secs: default_single_timeout(),
            bulk_timeout_secs: default_bulk_timeout(),
            bulk_max_parallel: default_bulk_parallel(),
            words_per_minute: default_wpm(),
        }
    }
}

impl WorkflowConfig {
    pub fn single_timeout(&self) -> Duration {
        Duration::from_secs(self.single_timeout_secs)
    }

    pub fn bulk_timeout(&self) -> Duration {
        Duration::from_secs(self.bulk_timeout_secs)
    }
}

// ---------------------------------------------------------------------------
// ServerConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    3141
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

// ---------------------------------------------------------------------------
// PublicationConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicationConfig {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    pub publication: PublicationConfig,
    #[serde(default)]
    pub workflow: WorkflowConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

fn default_version() -> u32 {
    1
}

impl Config {
    pub fn new(publication_name: impl Into<String>) -> Self {
        Self {
            version: 1,
            publication: PublicationConfig {
                name: publication_name.into(),
                description: None,
            },
            workflow: WorkflowConfig::default(),
            server: ServerConfig::default(),
        }
    }

    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Err(NewsroomError::NotInitialized);
        }
        let data = std::fs::read_to_string(&path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    /// Write the config only when none exists. Returns true if written.
    pub fn save_if_missing(&self, root: &Path) -> Result<bool> {
        let path = paths::config_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::write_if_missing(&path, data.as_bytes())
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();
        let wf = &self.workflow;

        if wf.min_feedback_chars == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "workflow.min_feedback_chars is 0: empty revision requests will be accepted"
                    .to_string(),
            });
        }

        if wf.bulk_max_parallel == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "workflow.bulk_max_parallel must be at least 1".to_string(),
            });
        } else if wf.bulk_max_parallel > 64 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!(
                    "workflow.bulk_max_parallel={} (>64 is unusual)",
                    wf.bulk_max_parallel
                ),
            });
        }

        if wf.single_timeout_secs == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "workflow.single_timeout_secs must be at least 1".to_string(),
            });
        }

        if wf.bulk_timeout_secs == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "workflow.bulk_timeout_secs must be at least 1".to_string(),
            });
        } else if wf.bulk_timeout_secs < wf.single_timeout_secs {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!(
                    "workflow.bulk_timeout_secs ({}) is shorter than single_timeout_secs ({})",
                    wf.bulk_timeout_secs, wf.single_timeout_secs
                ),
            });
        }

        if wf.words_per_minute == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "workflow.words_per_minute must be at least 1".to_string(),
            });
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
