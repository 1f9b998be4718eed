use anyhow::Result;
use clap::ArgMatches;
use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use folio_core::BuildConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Complete configuration that merges CLI args, env vars, config files, and defaults
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FolioConfig {
    /// Build configuration
    #[serde(default)]
    pub build: BuildConfig,
}

impl FolioConfig {
    /// Load configuration with cascading precedence:
    /// 1. CLI arguments (highest priority)
    /// 2. Environment variables (FOLIO_*)
    /// 3. Configuration file
    /// 4. Defaults (lowest priority)
    pub fn load(args: &ArgMatches) -> Result<Self> {
        let config_file = args
            .get_one::<String>("config")
            .map(String::as_str)
            .unwrap_or("./folio.toml");

        let mut builder = ConfigBuilder::builder();

        // 1. Start with defaults
        builder = builder.add_source(ConfigBuilder::try_from(&Self::default())?);

        // 2. Add configuration file if it exists
        if Path::new(config_file).exists() {
            builder = builder.add_source(File::new(config_file, FileFormat::Toml));
        }

        // 3. Add environment variables with FOLIO_ prefix
        builder = builder.add_source(
            Environment::with_prefix("FOLIO")
                .prefix_separator("_")
                .separator("__"), // Use double underscore for nested keys
        );

        // 4. Override with CLI arguments
        for (arg, key) in [
            ("static", "build.static_dir"),
            ("templates", "build.templates_dir"),
            ("content", "build.content_dir"),
            ("output", "build.output_dir"),
        ] {
            if let Some(value) = args.try_get_one::<String>(arg).unwrap_or(None) {
                builder = builder.set_override(key, value.as_str())?;
            }
        }
        if let Some(year) = args.try_get_one::<i32>("year").unwrap_or(None) {
            builder = builder.set_override("build.year", i64::from(*year))?;
        }

        Ok(builder.build()?.try_deserialize()?)
    }

    pub fn build_config(&self) -> &BuildConfig {
        &self.build
    }
}

/// Load configuration specifically for build commands
pub fn load_build_config(args: &ArgMatches) -> Result<FolioConfig> {
    FolioConfig::load(args)
}
