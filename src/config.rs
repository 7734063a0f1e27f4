use chrono::{Datelike, NaiveDate, Utc};
use serde::Deserialize;
use std::env;
use std::fs;
use std::io;
use std::iter::FromIterator;
use std::path::{Path, PathBuf};

use crate::calendar::MonthSpec;
use crate::error::{Error, ErrorKind, Result};
use crate::labels;

const CONFIG_PATH_ENV_VAR: &str = "CALGRID_CONFIG_FILE";

pub const DEFAULT_LOCALE: &str = "pl_PL";
pub const DEFAULT_TIMEZONE: &str = "Europe/Warsaw";
pub const DEFAULT_STYLESHEET: &str = "calendar.css";

fn home_dir() -> Result<PathBuf> {
    dirs::home_dir().ok_or_else(|| {
        Error::new(
            ErrorKind::ConfigurationError,
            "Unable to find home directory",
        )
    })
}

pub fn find_configfile_locations() -> Result<Vec<PathBuf>> {
    let config_env: Option<PathBuf> = env::var_os(CONFIG_PATH_ENV_VAR).map(PathBuf::from);

    let home = home_dir()?;

    let home_config = PathBuf::from_iter([&home, &PathBuf::from(".calgrid.toml")].iter());

    let config_xdg = if let Ok(dir) = env::var("XDG_CONFIG_HOME") {
        PathBuf::from_iter([dir, "calgrid".to_string(), "config.toml".to_string()].iter())
    } else {
        PathBuf::from_iter(
            [
                home.as_path(),
                Path::new(".config"),
                Path::new("calgrid"),
                Path::new("config.toml"),
            ]
            .iter(),
        )
    };

    let mut locations = vec![config_xdg, home_config];

    if let Some(path) = config_env {
        locations.insert(0, path);
    }

    Ok(locations)
}

/// Settings as read from a config file or the command line. Every field is
/// optional; missing values are filled in by [`PartialConfig::resolve`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PartialConfig {
    pub month: Option<u32>,
    pub year: Option<i32>,
    pub locale: Option<String>,
    pub timezone: Option<String>,
    pub output: Option<PathBuf>,
    pub stylesheet: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub month: u32,
    pub year: i32,
    pub locale: String,
    pub timezone: String,
    pub output: PathBuf,
    pub stylesheet: String,
}

pub fn load_config_file(path: &Path) -> Result<PartialConfig> {
    let content = fs::read_to_string(path)
        .map_err(|e| Error::from(e).with_msg(&format!("{}", path.display())))?;

    toml::from_str(&content)
        .map_err(|e| {
            let msg = format!("{}: {}", path.display(), e);
            Error::from(e).with_msg(&msg)
        })
}

/// Loads the config file given on the command line, or the first existing
/// one from [`find_configfile_locations`]. No file at all yields an empty
/// config.
pub fn load_suitable_config(configfile: Option<&Path>) -> Result<PartialConfig> {
    if let Some(path) = configfile {
        if !path.exists() {
            return Err(Error::from(io::Error::from(io::ErrorKind::NotFound))
                .with_msg(&format!("config file {} does not exist", path.display())));
        }
        log::debug!("Loading config from {}", path.display());
        return load_config_file(path);
    }

    let locations = match find_configfile_locations() {
        Ok(locations) => locations,
        Err(e) => {
            log::warn!("Skipping config file lookup: {}", e);
            return Ok(PartialConfig::default());
        }
    };

    for path in locations.iter() {
        if path.is_file() {
            log::debug!("Loading config from {}", path.display());
            return load_config_file(path);
        }
    }

    log::debug!("No config file found, using defaults");
    Ok(PartialConfig::default())
}

impl PartialConfig {
    /// Values set in `self` win over values set in `fallback`.
    pub fn or(self, fallback: PartialConfig) -> PartialConfig {
        PartialConfig {
            month: self.month.or(fallback.month),
            year: self.year.or(fallback.year),
            locale: self.locale.or(fallback.locale),
            timezone: self.timezone.or(fallback.timezone),
            output: self.output.or(fallback.output),
            stylesheet: self.stylesheet.or(fallback.stylesheet),
        }
    }

    /// Fills in defaults, taking the current month in the configured timezone
    /// when month or year are not given.
    pub fn resolve(self) -> Result<Config> {
        let timezone = self
            .timezone
            .clone()
            .unwrap_or_else(|| DEFAULT_TIMEZONE.to_owned());
        let tz = labels::parse_timezone(&timezone)?;
        let today = Utc::now().with_timezone(&tz).date_naive();

        self.resolve_at(today)
    }

    pub fn resolve_at(self, today: NaiveDate) -> Result<Config> {
        let output = match self.output {
            Some(path) => path,
            None => PathBuf::from_iter(
                [home_dir()?.as_path(), Path::new("Projekty"), Path::new("output.html")].iter(),
            ),
        };

        Ok(Config {
            month: self.month.unwrap_or_else(|| today.month()),
            year: self.year.unwrap_or_else(|| today.year()),
            locale: self.locale.unwrap_or_else(|| DEFAULT_LOCALE.to_owned()),
            timezone: self.timezone.unwrap_or_else(|| DEFAULT_TIMEZONE.to_owned()),
            output,
            stylesheet: self
                .stylesheet
                .unwrap_or_else(|| DEFAULT_STYLESHEET.to_owned()),
        })
    }
}

impl Config {
    pub fn month_spec(&self) -> Result<MonthSpec> {
        MonthSpec::new(self.year, self.month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2022, 10, 16).unwrap()
    }

    #[test]
    fn parse_full_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
            month = 2
            year = 2024
            locale = "en_US"
            timezone = "UTC"
            output = "/tmp/feb.html"
            stylesheet = "style.css"
            "#,
        )
        .unwrap();

        let config = load_suitable_config(Some(&path)).unwrap();

        assert_eq!(config.month, Some(2));
        assert_eq!(config.year, Some(2024));
        assert_eq!(config.locale.as_deref(), Some("en_US"));
        assert_eq!(config.timezone.as_deref(), Some("UTC"));
        assert_eq!(config.output, Some(PathBuf::from("/tmp/feb.html")));
        assert_eq!(config.stylesheet.as_deref(), Some("style.css"));
    }

    #[test]
    fn malformed_file_is_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "month = \"october\"").unwrap();

        assert!(load_config_file(&path).unwrap_err().is_configuration());

        fs::write(&path, "colour = \"red\"").unwrap();
        assert!(load_config_file(&path).unwrap_err().is_configuration());
    }

    #[test]
    fn missing_explicit_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_suitable_config(Some(&dir.path().join("nope.toml"))).unwrap_err();

        assert!(err.is_io());
    }

    #[test]
    fn command_line_wins_over_file() {
        let cli = PartialConfig {
            month: Some(3),
            locale: Some("en_GB".to_owned()),
            ..PartialConfig::default()
        };
        let file = PartialConfig {
            month: Some(10),
            year: Some(2022),
            locale: Some("pl_PL".to_owned()),
            ..PartialConfig::default()
        };

        let merged = cli.or(file);

        assert_eq!(merged.month, Some(3));
        assert_eq!(merged.year, Some(2022));
        assert_eq!(merged.locale.as_deref(), Some("en_GB"));
        assert_eq!(merged.timezone, None);
    }

    #[test]
    fn defaults() {
        let config = PartialConfig {
            output: Some(PathBuf::from("out.html")),
            ..PartialConfig::default()
        }
        .resolve_at(today())
        .unwrap();

        assert_eq!(config.month, 10);
        assert_eq!(config.year, 2022);
        assert_eq!(config.locale, DEFAULT_LOCALE);
        assert_eq!(config.timezone, DEFAULT_TIMEZONE);
        assert_eq!(config.stylesheet, DEFAULT_STYLESHEET);
        assert_eq!(config.month_spec().unwrap(), MonthSpec::new(2022, 10).unwrap());
    }

    #[test]
    fn unknown_timezone_fails_resolution() {
        let partial = PartialConfig {
            timezone: Some("Atlantis/Capital".to_owned()),
            ..PartialConfig::default()
        };

        assert!(partial.resolve().unwrap_err().is_configuration());
    }

    #[test]
    fn invalid_month_surfaces_on_spec() {
        let config = PartialConfig {
            month: Some(13),
            output: Some(PathBuf::from("out.html")),
            ..PartialConfig::default()
        }
        .resolve_at(today())
        .unwrap();

        assert!(config.month_spec().unwrap_err().is_invalid_input());
    }
}
