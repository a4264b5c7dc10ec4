use directories::ProjectDirs;
use mdtoc_markdown::TocOptions;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

static CONFIG: OnceCell<ConfigInner> = OnceCell::new();

#[derive(Debug)]
struct ConfigInner {
    config: Config,
    file_path: PathBuf,
}

struct LoadedConfig {
    config: Config,
    file_path: PathBuf,
    maybe_error: Option<toml::de::Error>,
}

/// Default location of the config file.
///
/// Linux: ~/.config/mdtoc/config.toml
/// macOS: ~/Library/Application\ Support/org.mdtoc.mdtoc/config.toml
/// Windows: ~\AppData\Roaming\mdtoc\mdtoc\config\config.toml
pub fn default_config_file() -> Option<PathBuf> {
    ProjectDirs::from("org", "mdtoc", "mdtoc").map(|dirs| dirs.config_dir().join("config.toml"))
}

fn load_config(specified_config_file: Option<PathBuf>) -> LoadedConfig {
    let config_file = specified_config_file
        .or_else(default_config_file)
        .unwrap_or_else(|| PathBuf::from("mdtoc.toml"));

    let mut maybe_config_err = None;
    let config = match std::fs::read_to_string(&config_file) {
        Ok(contents) => toml::from_str(&contents).unwrap_or_else(|err| {
            maybe_config_err.replace(err);
            Config::default()
        }),
        Err(err) => {
            tracing::debug!(?config_file, ?err, "Config file unavailable, using the defaults");
            Config::default()
        }
    };

    LoadedConfig {
        config,
        file_path: config_file,
        maybe_error: maybe_config_err,
    }
}

/// Loads the config file once into the global [`Config`], the default config
/// is used if the file is missing or invalid, in which case the parse error is
/// returned as well.
pub fn load_config_on_startup(
    specified_config_file: Option<PathBuf>,
) -> (&'static Config, Option<toml::de::Error>) {
    let mut maybe_error = None;

    let inner = CONFIG.get_or_init(|| {
        let LoadedConfig {
            config,
            file_path,
            maybe_error: err,
        } = load_config(specified_config_file);
        maybe_error = err;
        ConfigInner { config, file_path }
    });

    (&inner.config, maybe_error)
}

pub fn config_file() -> Option<&'static PathBuf> {
    CONFIG.get().map(|inner| &inner.file_path)
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct LogConfig {
    /// Specify the log file path.
    ///
    /// The log is written to stderr when unset.
    pub log_file: Option<String>,

    /// Specify the max log level.
    pub max_level: String,

    /// Specify the log target to enable more detailed logging.
    ///
    /// ```toml
    /// [log]
    /// log-target = "mdtoc_markdown=trace"
    /// ```
    pub log_target: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_file: None,
            max_level: "info".into(),
            log_target: "".into(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Default, PartialEq)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct Config {
    /// Log configuration.
    pub log: LogConfig,

    /// Default TOC options, overridden per document by the TOC start marker.
    pub toc: TocOptions,
}
