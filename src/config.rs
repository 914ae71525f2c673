//! Configuration file support.
//!
//! Settings live in an optional TOML file (`lsif.toml` by default). Every
//! key is optional; command-line flags override whatever the file says.
//!
//! ```toml
//! input_format = "line"
//! distance = 2
//! verbose = true
//! graph_name = "LSIF"
//! exempt_labels = ["metaData"]
//! schema = "lsif.schema.json"
//!
//! [[render.exclude]]
//! label = "document"
//! field = "contents"
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{LsifError, Result};
use crate::graph::InputFormat;
use crate::render::{FieldExclusion, RenderOptions};
use crate::validate::DEFAULT_EXEMPT_LABEL;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LsifConfig {
    pub input_format: InputFormat,
    /// Hops taken by `visualize`.
    pub distance: usize,
    /// Render vertex payload fields.
    pub verbose: bool,
    pub graph_name: String,
    /// Labels whose vertices need no edge.
    pub exempt_labels: Vec<String>,
    /// JSON schema with one definition per label. Relative paths are
    /// resolved against the config file's directory.
    pub schema: Option<PathBuf>,
    pub render: RenderConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub exclude: Vec<FieldExclusion>,
}

impl Default for LsifConfig {
    fn default() -> Self {
        let render = RenderOptions::default();
        Self {
            input_format: InputFormat::default(),
            distance: 1,
            verbose: render.verbose,
            graph_name: render.graph_name,
            exempt_labels: vec![DEFAULT_EXEMPT_LABEL.to_string()],
            schema: None,
            render: RenderConfig {
                exclude: render.exclusions,
            },
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            exclude: RenderOptions::default().exclusions,
        }
    }
}

impl LsifConfig {
    /// Load from `path`, falling back to defaults when the file is missing
    /// or unusable.
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring config file");
                Self::default()
            }
        }
    }

    /// Load from `path`. A missing file is not an error.
    pub fn try_load(path: &Path) -> Result<Self> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(LsifError::ReadInput {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let mut config = Self::from_toml_str(&text)?;
        if let (Some(schema), Some(dir)) = (&config.schema, path.parent()) {
            if schema.is_relative() {
                config.schema = Some(dir.join(schema));
            }
        }
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| LsifError::InvalidConfig(e.to_string()))
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            graph_name: self.graph_name.clone(),
            verbose: self.verbose,
            exclusions: self.render.exclude.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LsifConfig::default();
        assert_eq!(config.input_format, InputFormat::Auto);
        assert_eq!(config.distance, 1);
        assert!(!config.verbose);
        assert_eq!(config.graph_name, "LSIF");
        assert_eq!(config.exempt_labels, vec!["metaData"]);
        assert!(config.schema.is_none());
        assert_eq!(
            config.render.exclude,
            vec![FieldExclusion::new("document", "contents")]
        );
        assert_eq!(config.render_options(), RenderOptions::default());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = LsifConfig::from_toml_str("distance = 3\ninput_format = \"json\"\n").unwrap();
        assert_eq!(config.distance, 3);
        assert_eq!(config.input_format, InputFormat::Json);
        assert_eq!(config.graph_name, "LSIF");
        assert_eq!(config.render.exclude.len(), 1);
    }

    #[test]
    fn test_render_exclusions() {
        let text = r#"
verbose = true

[[render.exclude]]
label = "range"
field = "tag"

[[render.exclude]]
label = "hoverResult"
field = "result"
"#;
        let options = LsifConfig::from_toml_str(text).unwrap().render_options();
        assert!(options.verbose);
        assert_eq!(
            options.exclusions,
            vec![
                FieldExclusion::new("range", "tag"),
                FieldExclusion::new("hoverResult", "result"),
            ]
        );
    }

    #[test]
    fn test_invalid_file() {
        let err = LsifConfig::from_toml_str("distance = \"far\"").unwrap_err();
        assert!(matches!(err, LsifError::InvalidConfig(_)));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = LsifConfig::try_load(Path::new("/nonexistent/lsif.toml")).unwrap();
        assert_eq!(config, LsifConfig::default());
    }

    #[test]
    fn test_schema_resolved_against_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lsif.toml");
        fs::write(&path, "schema = \"schemas/lsif.json\"\n").unwrap();

        let config = LsifConfig::load(&path);
        assert_eq!(config.schema, Some(dir.path().join("schemas/lsif.json")));
    }

    #[test]
    fn test_load_falls_back_on_bad_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lsif.toml");
        fs::write(&path, "distance = [").unwrap();

        assert_eq!(LsifConfig::load(&path), LsifConfig::default());
    }
}
