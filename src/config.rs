//! Stack Configuration
//!
//! Every field has a default, so an empty file describes the stock stack.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StackConfig {
    pub project: String,
    pub environment: String,
    pub stack_prefix: String,
    pub bucket_prefix: String,
    pub log_group_name: String,
    pub log_retention_days: u32,
    pub security_group_name: String,
    pub security_group_description: String,
    pub ingress_ports: Vec<u16>,
    pub table_name: String,
    pub cluster_name: String,
    pub role_name: String,
    pub engine_min_version: String,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            project: "CDK-Demo".to_string(),
            environment: "AcademyLabs".to_string(),
            stack_prefix: "CDK-Stack".to_string(),
            bucket_prefix: "appbucket".to_string(),
            log_group_name: "/ecs/AppLogGroup".to_string(),
            log_retention_days: 3,
            security_group_name: "AppSecurityGroup".to_string(),
            security_group_description: "Security group for ECS tasks".to_string(),
            ingress_ports: vec![80, 8080],
            table_name: "AppTable".to_string(),
            cluster_name: "AppCluster".to_string(),
            role_name: "LabRole".to_string(),
            engine_min_version: crate::ENGINE_VERSION.to_string(),
        }
    }
}

impl StackConfig {
    pub fn from_toml_str(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content, path)?;
        tracing::debug!(path = %path.display(), project = %config.project, "loaded stack config");
        Ok(config)
    }

    /// Falls back to defaults when no path is given.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_is_default() {
        let config = StackConfig::from_toml_str("", Path::new("stack.toml")).unwrap();
        assert_eq!(config, StackConfig::default());
        assert_eq!(config.log_retention_days, 3);
        assert_eq!(config.ingress_ports, vec![80, 8080]);
    }

    #[test]
    fn test_partial_override() {
        let config = StackConfig::from_toml_str(
            "project = \"Demo\"\ningress_ports = [443]\n",
            Path::new("stack.toml"),
        ).unwrap();
        assert_eq!(config.project, "Demo");
        assert_eq!(config.ingress_ports, vec![443]);
        assert_eq!(config.table_name, "AppTable");
    }

    #[test]
    fn test_parse_error_names_path() {
        let err = StackConfig::from_toml_str("log_retention_days = \"three\"", Path::new("bad.toml"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("bad.toml"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stack.toml");
        fs::write(&path, "cluster_name = \"Workers\"\n").unwrap();

        let config = StackConfig::load(&path).unwrap();
        assert_eq!(config.cluster_name, "Workers");

        let missing = StackConfig::load(&dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(missing, ConfigError::Read { .. }));
    }
}
