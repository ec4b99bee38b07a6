use crate::adapters::http::RelationshipLayout;
use crate::core::geometry::{ConnectorShape, CurveOptions};
use crate::core::renderer::RenderStyle;
use crate::core::selector::SelectorSettings;
use crate::domain::model::FitOptions;
use crate::utils::error::{ConnectionsError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub selector: SelectorConfig,
    pub render: RenderConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub layout: RelationshipLayout,
    pub timeout_seconds: u64,
    pub include_stats: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            layout: RelationshipLayout::Legacy,
            timeout_seconds: 10,
            include_stats: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    pub debounce_ms: u64,
    pub min_query_length: usize,
    pub cache_results: bool,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 250,
            min_query_length: 1,
            cache_results: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub padding: f64,
    pub max_zoom: f64,
    pub curve_factor: f64,
    pub connector: ConnectorShape,
    pub curve_segments: usize,
    pub viewport_width: f64,
    pub viewport_height: f64,
    pub center_color: String,
    pub related_color: String,
    pub connector_color: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        let style = RenderStyle::default();
        Self {
            padding: style.fit.padding,
            max_zoom: style.fit.max_zoom,
            curve_factor: style.curve.factor,
            connector: style.curve.shape,
            curve_segments: style.curve.segments,
            viewport_width: 1024.0,
            viewport_height: 768.0,
            center_color: style.center_color,
            related_color: style.related_color,
            connector_color: style.connector_color,
        }
    }
}

impl AppConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ConnectionsError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ConnectionsError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are left as-is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| ConnectionsError::ConfigError {
            message: format!("env substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn selector_settings(&self) -> SelectorSettings {
        SelectorSettings {
            debounce: Duration::from_millis(self.selector.debounce_ms),
            min_query_length: self.selector.min_query_length,
            cache_results: self.selector.cache_results,
        }
    }

    pub fn render_style(&self) -> RenderStyle {
        RenderStyle {
            center_color: self.render.center_color.clone(),
            related_color: self.render.related_color.clone(),
            connector_color: self.render.connector_color.clone(),
            curve: CurveOptions {
                factor: self.render.curve_factor,
                shape: self.render.connector,
                segments: self.render.curve_segments,
            },
            fit: FitOptions {
                padding: self.render.padding,
                max_zoom: self.render.max_zoom,
            },
            ..RenderStyle::default()
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_seconds)
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("api.base_url", &self.api.base_url)?;
        validation::validate_positive_number("api.timeout_seconds", self.api.timeout_seconds as usize, 1)?;
        validation::validate_positive_number("selector.min_query_length", self.selector.min_query_length, 1)?;
        validation::validate_positive_number("render.curve_segments", self.render.curve_segments, 2)?;
        validation::validate_range("render.max_zoom", self.render.max_zoom, 0.0, 24.0)?;
        validation::validate_range("render.curve_factor", self.render.curve_factor, -1.0, 1.0)?;
        validation::validate_range("render.padding", self.render.padding, 0.0, 1000.0)?;
        validation::validate_range("render.viewport_width", self.render.viewport_width, 1.0, 16384.0)?;
        validation::validate_range("render.viewport_height", self.render.viewport_height, 1.0, 16384.0)?;

        if self.render.viewport_width <= 2.0 * self.render.padding
            || self.render.viewport_height <= 2.0 * self.render.padding
        {
            return Err(ConnectionsError::InvalidConfigValueError {
                field: "render.padding".to_string(),
                value: self.render.padding.to_string(),
                reason: "Padding leaves no room inside the viewport".to_string(),
            });
        }

        for (field, color) in [
            ("render.center_color", &self.render.center_color),
            ("render.related_color", &self.render.related_color),
            ("render.connector_color", &self.render.connector_color),
        ] {
            validation::validate_non_empty_string(field, color)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.selector_settings().debounce, Duration::from_millis(250));
        assert_eq!(config.render_style(), RenderStyle::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[api]
base_url = "https://connections.example.com"
layout = "relationships"
timeout_seconds = 5
include_stats = true

[selector]
debounce_ms = 100
min_query_length = 2
cache_results = false

[render]
padding = 20
max_zoom = 12.5
connector = "straight3"
curve_segments = 10
"#;

        let config = AppConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.api.layout, RelationshipLayout::Relationships);
        assert!(config.api.include_stats);
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(config.selector_settings().min_query_length, 2);
        assert!(!config.selector_settings().cache_results);

        let style = config.render_style();
        assert_eq!(style.curve.shape, ConnectorShape::Straight3);
        assert_eq!(style.fit.max_zoom, 12.5);
        assert_eq!(style.fit.padding, 20.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("CONNECTIONS_MAP_TEST_BASE", "https://test.api.com");

        let config = AppConfig::from_toml_str(
            r#"
[api]
base_url = "${CONNECTIONS_MAP_TEST_BASE}"
"#,
        )
        .unwrap();
        assert_eq!(config.api.base_url, "https://test.api.com");

        std::env::remove_var("CONNECTIONS_MAP_TEST_BASE");
    }

    #[test]
    fn test_config_validation() {
        let config = AppConfig::from_toml_str(
            r#"
[api]
base_url = "invalid-url"
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());

        let config = AppConfig::from_toml_str("[render]\nmax_zoom = 40.0\n").unwrap();
        assert!(config.validate().is_err());

        let config = AppConfig::from_toml_str("[render]\npadding = 600\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_nan_viewport_is_rejected() {
        let config = AppConfig::from_toml_str("[render]\nviewport_width = nan\n").unwrap();
        match config.validate() {
            Err(ConnectionsError::InvalidConfigValueError { field, .. }) => {
                assert_eq!(field, "render.viewport_width")
            }
            other => panic!("unexpected validation result {:?}", other),
        }

        let config = AppConfig::from_toml_str("[render]\nviewport_height = -768.0\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_layout_is_rejected() {
        assert!(AppConfig::from_toml_str("[api]\nlayout = \"graphql\"\n").is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[selector]\ndebounce_ms = 0\n")
            .unwrap();

        let config = AppConfig::from_file(temp_file.path()).unwrap();
        assert!(config.selector_settings().debounce.is_zero());
    }
}
