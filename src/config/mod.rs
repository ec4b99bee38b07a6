pub mod toml_config;

pub use toml_config::{ApiConfig, AppConfig, RenderConfig, SelectorConfig};

#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "connections-map")]
#[command(about = "Browse vendor/client relationships and export them as a map scene")]
pub struct CliConfig {
    /// Text to search for
    pub query: String,

    #[arg(long, help = "TOML configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Override api.base_url from the configuration")]
    pub api_base: Option<String>,

    #[arg(long, default_value = "vendors", help = "vendors, clients or companies")]
    pub scope: crate::domain::model::SearchScope,

    #[arg(long, conflicts_with = "first", help = "Name of the company to select")]
    pub select: Option<String>,

    #[arg(long, help = "Select the first search hit")]
    pub first: bool,

    #[arg(long, help = "Write the rendered map scene as GeoJSON")]
    pub geojson: Option<PathBuf>,

    #[arg(long, help = "Emit JSON log lines")]
    pub json_logs: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Loads the file configuration (or defaults) and applies flag overrides.
    pub fn app_config(&self) -> crate::Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::from_file(path)?,
            None => AppConfig::default(),
        };
        if let Some(base) = &self.api_base {
            config.api.base_url = base.clone();
        }
        Ok(config)
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;
    use crate::domain::model::SearchScope;

    #[test]
    fn test_parse_cli_flags() {
        let cli = CliConfig::try_parse_from([
            "connections-map",
            "acme",
            "--scope",
            "clients",
            "--first",
            "--api-base",
            "http://127.0.0.1:9000",
        ])
        .unwrap();

        assert_eq!(cli.query, "acme");
        assert_eq!(cli.scope, SearchScope::Clients);
        assert!(cli.first);
        assert_eq!(
            cli.app_config().unwrap().api.base_url,
            "http://127.0.0.1:9000"
        );
    }

    #[test]
    fn test_select_conflicts_with_first() {
        assert!(CliConfig::try_parse_from([
            "connections-map",
            "acme",
            "--first",
            "--select",
            "Acme"
        ])
        .is_err());
    }
}
