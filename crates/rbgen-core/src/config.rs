use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level project configuration loaded from `.rbgen.yaml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RbgenConfig {
    pub input: String,
    pub output: String,
    /// Qualified name of the package or class to generate from (defaults to the model root).
    pub root: Option<String>,
    pub options: GenerationOptions,
}

impl Default for RbgenConfig {
    fn default() -> Self {
        Self {
            input: "model.yaml".to_string(),
            output: "generated".to_string(),
            root: None,
            options: GenerationOptions::default(),
        }
    }
}

/// Options for one generation run. Every rendering decision reads this value
/// and nothing else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationOptions {
    pub use_tab: bool,
    pub indent_spaces: usize,
    /// Emit an `initialize` method taking every instance attribute.
    pub initialize_method: bool,
    /// Use `attr_reader` / `attr_accessor` instead of explicit getter and setter methods.
    pub use_attribute_accessor: bool,
    /// Emit a placeholder `to_s` method.
    pub to_string_method: bool,
    /// Render model documentation as comments.
    pub documentation: bool,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            use_tab: false,
            indent_spaces: 2,
            initialize_method: true,
            use_attribute_accessor: false,
            to_string_method: true,
            documentation: true,
        }
    }
}

impl GenerationOptions {
    /// One level of indentation: a tab, or `indent_spaces` spaces.
    pub fn indent_unit(&self) -> String {
        if self.use_tab {
            "\t".to_string()
        } else {
            " ".repeat(self.indent_spaces)
        }
    }
}

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = ".rbgen.yaml";

/// Load config from a YAML file. Returns `None` if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Option<RbgenConfig>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config: RbgenConfig =
        serde_yaml_ng::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(Some(config))
}

/// Generate the default config file content.
pub fn default_config_content() -> &'static str {
    r#"# rbgen configuration
input: model.yaml       # model snapshot (YAML or JSON)
output: generated       # directory the root package folder is created in
# root: Shop.Billing    # qualified name of the element to generate from

options:
  use_tab: false
  indent_spaces: 2
  initialize_method: true        # def initialize(...) assigning every instance attribute
  use_attribute_accessor: false  # attr_reader/attr_accessor instead of getter/setter methods
  to_string_method: true         # placeholder def to_s
  documentation: true            # model documentation as # comments
"#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RbgenConfig::default();
        assert_eq!(config.input, "model.yaml");
        assert_eq!(config.output, "generated");
        assert!(config.root.is_none());
        assert!(config.options.initialize_method);
        assert!(!config.options.use_attribute_accessor);
        assert!(config.options.to_string_method);
        assert!(config.options.documentation);
        assert_eq!(config.options.indent_unit(), "  ");
    }

    #[test]
    fn test_parse_config_yaml() {
        let yaml = r#"
input: shop.json
output: out
root: Shop.Billing
options:
  use_tab: true
  initialize_method: false
  use_attribute_accessor: true
  to_string_method: false
  documentation: false
"#;
        let config: RbgenConfig = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(config.input, "shop.json");
        assert_eq!(config.output, "out");
        assert_eq!(config.root.as_deref(), Some("Shop.Billing"));
        assert!(config.options.use_tab);
        assert!(!config.options.initialize_method);
        assert!(config.options.use_attribute_accessor);
        assert!(!config.options.to_string_method);
        assert!(!config.options.documentation);
        assert_eq!(config.options.indent_unit(), "\t");
    }

    #[test]
    fn test_parse_minimal_config() {
        let yaml = "input: school.yaml\n";
        let config: RbgenConfig = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(config.input, "school.yaml");
        // Defaults applied
        assert_eq!(config.output, "generated");
        assert_eq!(config.options, GenerationOptions::default());
    }

    #[test]
    fn test_default_content_parses() {
        let config: RbgenConfig = serde_yaml_ng::from_str(default_config_content()).unwrap();
        assert_eq!(config.options, GenerationOptions::default());
    }

    #[test]
    fn test_indent_spaces() {
        let options = GenerationOptions {
            indent_spaces: 4,
            ..GenerationOptions::default()
        };
        assert_eq!(options.indent_unit(), "    ");
    }

    #[test]
    fn test_load_missing_config() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load_config(&dir.path().join(CONFIG_FILE_NAME)).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_load_invalid_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "options: [not, a, map]\n").unwrap();
        let err = load_config(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
