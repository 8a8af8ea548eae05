use crate::config::Config;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::info;
use std::fs::File;
use std::path::Path;

/// Load and parse configuration from a YAML file
pub fn load_config(config_path: &Path) -> Result<Config> {
    info!("Loading configuration from: {:?}", config_path);

    let file = File::open(config_path)
        .wrap_err_with(|| format!("Failed to open configuration '{}'", config_path.display()))?;

    let config: Config = serde_yaml::from_reader(file)
        .wrap_err_with(|| format!("Failed to parse configuration '{}'", config_path.display()))?;

    config.validate()?;

    info!(
        "Configuration loaded (recovery margin {:.2}, peak quarter rule {:?})",
        config.decomposition.recovery_margin, config.captions.peak_quarter
    );

    Ok(config)
}

/// Load the configuration at `config_path`, or fall back to defaults when no path is given
pub fn load_or_default(config_path: Option<&Path>) -> Result<Config> {
    match config_path {
        Some(path) => load_config(path),
        None => {
            info!("No configuration file given, using defaults");
            Ok(Config::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PeakQuarterRule;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config() {
        let yaml = r#"
general:
  log_level: debug
captions:
  peak_quarter: max_capital
  ltv_per_unit: 350
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{}", yaml).unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.captions.peak_quarter, PeakQuarterRule::MaxCapital);
        assert_eq!(config.captions.ltv_per_unit, 350.0);
    }

    #[test]
    fn test_load_config_rejects_invalid_margin() {
        let yaml = r#"
decomposition:
  recovery_margin: -0.1
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{}", yaml).unwrap();

        assert!(load_config(temp_file.path()).is_err());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(load_config(Path::new("/nonexistent/adapt-insights.yaml")).is_err());
    }

    #[test]
    fn test_load_or_default_without_path() {
        let config = load_or_default(None).unwrap();
        assert_eq!(config.decomposition.recovery_margin, 0.30);
    }
}
