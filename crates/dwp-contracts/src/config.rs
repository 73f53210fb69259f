//! # Repository Configuration
//!
//! Reads the repository's `config.yml` to locate the generated schema
//! documents. Only the keys this crate needs are modelled; the sections used
//! by the ontology and generation tooling are ignored.
//!
//! ```yaml
//! ontology_version: v0.1
//! shapes_version: v0.1
//! build_version: v0.1
//! paths:
//!   build: build
//! ```
//!
//! The schema directory is `<workspace root>/<paths.build>/<build_version>/`,
//! unless `DWP_SCHEMA_DIR` overrides it.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::registry::SchemaRegistry;

/// Name of the configuration file at the workspace root.
pub const CONFIG_FILE_NAME: &str = "config.yml";

/// Environment variable overriding the derived schema directory.
pub const SCHEMA_DIR_ENV: &str = "DWP_SCHEMA_DIR";

const DEFAULT_VERSION: &str = "v0.1";

fn default_version() -> String {
    DEFAULT_VERSION.to_string()
}

fn default_build_path() -> String {
    "build".to_string()
}

/// Directory layout section (`paths:`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PathsConfig {
    /// Root of the build outputs, relative to the workspace root.
    #[serde(default = "default_build_path")]
    pub build: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            build: default_build_path(),
        }
    }
}

/// Parsed `config.yml` together with the workspace root it was found in.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ContractsConfig {
    /// Ontology version (informational).
    #[serde(default = "default_version")]
    pub ontology_version: String,
    /// SHACL shapes version (informational).
    #[serde(default = "default_version")]
    pub shapes_version: String,
    /// Version directory under `paths.build` holding the generated schemas.
    #[serde(default = "default_version")]
    pub build_version: String,
    /// Directory layout.
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(skip)]
    workspace_root: PathBuf,
    #[serde(skip)]
    schema_dir_override: Option<PathBuf>,
}

impl ContractsConfig {
    /// Defaults for a workspace rooted at `root`, without reading any file.
    pub fn with_defaults(root: impl Into<PathBuf>) -> Self {
        Self {
            ontology_version: default_version(),
            shapes_version: default_version(),
            build_version: default_version(),
            paths: PathsConfig::default(),
            workspace_root: root.into(),
            schema_dir_override: None,
        }
    }

    /// Load `config.yml` from `path`. Its parent directory becomes the workspace root.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] if the file cannot be read and
    /// [`ConfigError::Parse`] if it is not valid YAML for this shape.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        let mut config: Self = serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            source: e,
        })?;
        config.workspace_root = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Ok(config)
    }

    /// Walk up from `start` to the first directory containing `config.yml` and load it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotFound`] if no ancestor holds a config file.
    pub fn discover(start: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let start = start.as_ref();
        start
            .ancestors()
            .map(|dir| dir.join(CONFIG_FILE_NAME))
            .find(|candidate| candidate.is_file())
            .ok_or_else(|| ConfigError::NotFound(start.display().to_string()))
            .and_then(|path| Self::load(&path))
    }

    /// Apply environment overrides (`DWP_SCHEMA_DIR`).
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(dir) = std::env::var_os(SCHEMA_DIR_ENV) {
            tracing::debug!(schema_dir = ?dir, "schema directory overridden from environment");
            self.schema_dir_override = Some(PathBuf::from(dir));
        }
        self
    }

    /// Point the schema directory somewhere explicit.
    pub fn with_schema_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.schema_dir_override = Some(dir.into());
        self
    }

    /// Directory containing `config.yml`.
    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    /// Versioned path of a build output, relative to the workspace root
    /// (e.g. `build/v0.1/digitalWastePassport.schema.json`).
    pub fn build_path(&self, filename: &str) -> String {
        format!("{}/{}/{}", self.paths.build, self.build_version, filename)
    }

    /// True if `DWP_SCHEMA_DIR` or an explicit directory replaced the
    /// `<paths.build>/<build_version>` layout.
    pub fn schema_dir_overridden(&self) -> bool {
        self.schema_dir_override.is_some()
    }

    /// Directory holding the generated schema documents.
    pub fn schema_dir(&self) -> PathBuf {
        match &self.schema_dir_override {
            Some(dir) => dir.clone(),
            None => self
                .workspace_root
                .join(&self.paths.build)
                .join(&self.build_version),
        }
    }

    /// Registry rooted at [`ContractsConfig::schema_dir`].
    pub fn registry(&self) -> SchemaRegistry {
        SchemaRegistry::new(self.schema_dir())
    }
}

/// Errors reading repository configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config.yml not found in {0} or any parent directory")]
    NotFound(String),
    #[error("cannot read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid configuration in {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
}
