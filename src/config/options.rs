//! every single available configuration option and its type is listed in this file
use {
    crate::{
        config::validate::{Validate, format_validation_errors},
        rooms::HttpSettings,
        theme::DEFAULT_THEME,
        transport::{DEFAULT_SOCKET_PATH, ReconnectPolicy},
    },
    color_eyre::{
        Section, SectionExt,
        eyre::{Context, OptionExt, Result, eyre},
    },
    config::{Config, ConfigBuilder},
    schemars::JsonSchema,
    serde::{Deserialize, Serialize},
    smart_default::SmartDefault,
    std::{
        path::{Path, PathBuf},
        time::Duration,
    },
    tracing::info,
};

/// the name of config files, both global and local
pub const CONFIG_FILE_NAME: &str = "chatroom.toml";

/// the prefix of environment overrides, e.g. `CHATROOM_SERVER__URL`
pub const ENV_PREFIX: &str = "CHATROOM";

/// Where the chat server lives
#[derive(Serialize, Deserialize, Clone, Debug, JsonSchema, SmartDefault)]
#[schemars(default)]
pub struct ServerCfg {
    /// Base URL of the chat server, used for both the socket and the HTTP api
    #[default(Some("http://localhost:8000".to_string()))]
    pub url: Option<String>,

    /// Path the Socket.IO endpoint is mounted at
    #[default(Some(DEFAULT_SOCKET_PATH.to_string()))]
    pub socket_path: Option<String>,
}

/// Reconnection behaviour when the socket drops
#[derive(Serialize, Deserialize, Clone, Debug, JsonSchema, SmartDefault)]
#[schemars(default)]
pub struct ReconnectCfg {
    /// Reconnect automatically after the connection is lost
    #[default(Some(true))]
    pub enabled: Option<bool>,

    /// How many failed attempts in a row before giving up
    #[default(Some(5))]
    pub attempts: Option<u32>,

    /// Milliseconds to wait between attempts
    #[default(Some(1000))]
    pub delay_ms: Option<u64>,
}

/// Configuration options for making HTTP requests
#[derive(Serialize, Deserialize, Clone, Debug, JsonSchema, SmartDefault)]
#[schemars(default)]
pub struct HttpCfg {
    /// Request timeout in seconds
    #[default(Some(30))]
    pub timeout: Option<u64>,

    /// Connection timeout in seconds
    #[default(Some(10))]
    pub connect_timeout: Option<u64>,

    /// User agent string sent with every request
    #[default(Some(crate::USER_AGENT.to_string()))]
    pub user_agent: Option<String>,
}

/// Theme settings
#[derive(Serialize, Deserialize, Clone, Debug, JsonSchema, SmartDefault)]
#[schemars(default)]
pub struct ThemeCfg {
    /// The theme to use when none was saved yet
    #[default(Some(DEFAULT_THEME.to_string()))]
    pub default: Option<String>,

    /// Where the theme preference is stored (defaults to the platform data dir)
    #[default(None)]
    pub store_path: Option<String>,
}

/// The format to log in
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, JsonSchema, SmartDefault)]
pub enum LoggingFormat {
    /// Use the compact output format
    Compact,

    /// Use an excessively pretty output format
    #[default]
    Pretty,
}

/// Settings for logging
#[derive(Serialize, Deserialize, Clone, Debug, JsonSchema, SmartDefault)]
#[schemars(default)]
pub struct LoggingConfig {
    /// Enable logging
    #[default(Some(true))]
    pub enable: Option<bool>,

    /// The max level to log at
    #[default(Some("info".to_string()))]
    pub level: Option<String>,

    /// The output format
    #[default(Some(LoggingFormat::Compact))]
    pub format: Option<LoggingFormat>,

    /// Enable ANSI escape codes for colors and stuff
    #[default(Some(true))]
    pub ansi: Option<bool>,

    /// Display event targets in log messages
    #[default(Some(false))]
    pub event_targets: Option<bool>,

    /// Display line numbers in log messages
    #[default(Some(false))]
    pub line_numbers: Option<bool>,
}

/// The chatroom configuration
#[derive(Serialize, Deserialize, Clone, Debug, JsonSchema, SmartDefault)]
#[schemars(default)]
pub struct ChatroomCfg {
    /// Configuration file version (do not modify manually)
    #[default(Some(1))]
    pub version: Option<u32>,

    /// Chat server settings
    #[default(Some(ServerCfg::default()))]
    pub server: Option<ServerCfg>,

    /// Reconnection settings
    #[default(Some(ReconnectCfg::default()))]
    pub reconnect: Option<ReconnectCfg>,

    /// HTTP settings
    #[default(Some(HttpCfg::default()))]
    pub http: Option<HttpCfg>,

    /// Theme settings
    #[default(Some(ThemeCfg::default()))]
    pub theme: Option<ThemeCfg>,

    /// Logging settings
    #[default(Some(LoggingConfig::default()))]
    pub logging: Option<LoggingConfig>,
}

impl ChatroomCfg {
    /// load config from default locations
    ///
    /// load prio: env > local > global > defaults
    pub fn load() -> Result<Self> {
        let global_config_path = Self::global_config_path()?;
        let local_config_path = Self::find_local_config()?;
        let cfg = Self::load_from(&global_config_path, local_config_path.as_deref())?;

        if !global_config_path.exists() {
            Self::create_default_config(&global_config_path, &Self::load_defaults()?)?;
        }

        Ok(cfg)
    }

    /// layer the defaults, the given files and the environment, then validate
    pub fn load_from(global: &Path, local: Option<&Path>) -> Result<Self> {
        let mut builder = Self::create_builder(Self::load_defaults()?)?;

        builder = builder.add_source(config::File::from(global).required(false));

        if let Some(local_config) = local {
            builder = builder.add_source(config::File::from(local_config).required(false));
        }

        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__"),
        );

        let settings = builder.build().wrap_err("Failed to build configuration")?;
        let cfg: ChatroomCfg = settings
            .try_deserialize::<ChatroomCfg>()
            .wrap_err("Failed to deserialize configuration")?;

        cfg.run_validation()?;
        info!("Configuration validation successful");

        Ok(cfg)
    }

    /// get the global config file path
    pub fn global_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_eyre("Unable to determine system config directory")
            .suggestion("Ensure XDG_CONFIG_HOME or HOME environment variables are set")
            .suggestion("On Windows, APPDATA should be set")?;

        Ok(config_dir.join(CONFIG_FILE_NAME))
    }

    /// load default config from embedded default config file
    fn load_defaults() -> Result<Self> {
        toml::from_str(include_str!("../../resources/chatroom.default.toml"))
            .wrap_err("Failed to parse embedded default configuration")
            .note("This is a bug - the embedded defaults are malformed")
    }

    /// create a config builder with defaults
    fn create_builder(defaults: ChatroomCfg) -> Result<ConfigBuilder<config::builder::DefaultState>> {
        let builder = Config::builder();
        let config_source = config::Config::try_from(&defaults)
            .wrap_err("Failed to convert default config struct to config source")?;

        Ok(builder.add_source(config_source))
    }

    /// run validation and return a pretty error if it fails
    fn run_validation(&self) -> Result<()> {
        self.validate()
            .map_err(|errors| {
                let formatted = format_validation_errors(&errors);
                eyre!(formatted)
            })
            .wrap_err("config validation failed")
            .suggestion("Check your chatroom.toml for invalid values")
            .suggestion("Run with default config to see valid options")
    }

    /// find the local config file
    fn find_local_config() -> Result<Option<PathBuf>> {
        let curr_dir = std::env::current_dir()
            .wrap_err("Failed to get current working directory")
            .suggestion("Ensure the current directory exists and is accessible")?;

        for ancestor in curr_dir.ancestors() {
            let config_path = ancestor.join(CONFIG_FILE_NAME);
            if config_path.exists() {
                return Ok(Some(config_path));
            }
        }

        Ok(None)
    }

    /// create the default config file
    fn create_default_config(path: &Path, defaults: &ChatroomCfg) -> Result<()> {
        let config_dir = path
            .parent()
            .ok_or_eyre("Unable to determine parent directory of config path")?;

        std::fs::create_dir_all(config_dir)
            .wrap_err("Failed to create config directory")
            .with_section(|| format!("{}", config_dir.display()).header("Directory:"))?;

        defaults
            .save_to_file(path)
            .wrap_err("Failed to write default configuration file")?;

        Ok(())
    }

    /// save config to a file
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let toml_str =
            toml::to_string_pretty(self).wrap_err("Failed to serialize config to TOML")?;

        std::fs::write(path, &toml_str)
            .wrap_err_with(|| format!("Failed to write config file: {}", path.display()))
            .with_section(|| path.display().to_string().header("File path"))
            .with_section(|| format!("{} bytes", toml_str.len()).header("Content size:"))?;

        Ok(())
    }

    /// the reconnect policy the socket connector should follow
    pub fn reconnect_policy(&self) -> ReconnectPolicy {
        let defaults = ReconnectPolicy::default();
        let Some(cfg) = self.reconnect.as_ref() else {
            return defaults;
        };

        ReconnectPolicy {
            enabled: cfg.enabled.unwrap_or(defaults.enabled),
            attempts: cfg.attempts.unwrap_or(defaults.attempts),
            delay: cfg.delay_ms.map(Duration::from_millis).unwrap_or(defaults.delay),
        }
    }

    /// the settings the http client is built with
    pub fn http_settings(&self) -> HttpSettings {
        let defaults = HttpSettings::default();
        let Some(cfg) = self.http.as_ref() else {
            return defaults;
        };

        HttpSettings {
            timeout: cfg.timeout.map(Duration::from_secs).unwrap_or(defaults.timeout),
            connect_timeout: cfg
                .connect_timeout
                .map(Duration::from_secs)
                .unwrap_or(defaults.connect_timeout),
            user_agent: cfg.user_agent.clone().unwrap_or(defaults.user_agent),
        }
    }
}

/// get the current value of a given setting
#[macro_export]
macro_rules! getopt {
    () => {
        $crate::config::instance::config()
    };

    ($field:ident) => {{
        $crate::config::instance::get_or_default(
            |c| c.$field.clone(),
            $crate::config::options::ChatroomCfg::default()
                .$field
                .expect(concat!("Default value missing for: ", stringify!($field))),
        )
    }};

    ($lvl1:ident . $field:ident) => {{
        $crate::config::instance::get_or_default(
            |c| c.$lvl1.as_ref().and_then(|sub| sub.$field.clone()),
            $crate::config::options::ChatroomCfg::default()
                .$lvl1
                .and_then(|sub| sub.$field)
                .expect(concat!(
                    "Default value missing for: ",
                    stringify!($lvl1),
                    ".",
                    stringify!($field)
                )),
        )
    }};

    (raw $field:ident) => {{
        $crate::config::instance::config()
            .ok()
            .and_then(|c| c.$field.clone())
    }};

    (raw $lvl1:ident . $field:ident) => {{
        $crate::config::instance::config()
            .ok()
            .and_then(|c| c.$lvl1.as_ref().and_then(|sub| sub.$field.clone()))
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_defaults_match_code_defaults() {
        let embedded = ChatroomCfg::load_defaults().unwrap();
        let code = ChatroomCfg::default();

        assert_eq!(
            toml::to_string_pretty(&embedded).unwrap(),
            toml::to_string_pretty(&code).unwrap()
        );
    }

    #[test]
    fn test_local_file_overrides_global() {
        let dir = tempfile::tempdir().unwrap();
        let global = dir.path().join("global.toml");
        let local = dir.path().join("local.toml");

        std::fs::write(
            &global,
            "[server]\nurl = \"http://chat.example:8000\"\n[reconnect]\nattempts = 2\n",
        )
        .unwrap();
        std::fs::write(&local, "[reconnect]\nattempts = 9\n").unwrap();

        let cfg = ChatroomCfg::load_from(&global, Some(&local)).unwrap();
        let server = cfg.server.clone().unwrap();

        assert_eq!(server.url.as_deref(), Some("http://chat.example:8000"));
        assert_eq!(server.socket_path.as_deref(), Some(DEFAULT_SOCKET_PATH));
        assert_eq!(cfg.reconnect_policy().attempts, 9);
        assert_eq!(cfg.reconnect_policy().delay, Duration::from_millis(1000));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let global = dir.path().join("global.toml");

        std::fs::write(&global, "[theme]\ndefault = \"neon\"\n").unwrap();
        assert!(ChatroomCfg::load_from(&global, None).is_err());

        std::fs::write(&global, "[server]\nurl = \"not a url\"\n").unwrap();
        assert!(ChatroomCfg::load_from(&global, None).is_err());
    }

    #[test]
    fn test_missing_files_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = ChatroomCfg::load_from(&dir.path().join("nope.toml"), None).unwrap();

        assert_eq!(cfg.http_settings(), HttpSettings::default());
        assert_eq!(cfg.reconnect_policy(), ReconnectPolicy::default());
    }

    #[test]
    fn test_save_to_file_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("saved.toml");

        let mut cfg = ChatroomCfg::default();
        cfg.theme = Some(ThemeCfg {
            default: Some("dark".to_string()),
            store_path: Some("/tmp/prefs.redb".to_string()),
        });
        cfg.save_to_file(&path).unwrap();

        let loaded = ChatroomCfg::load_from(&path, None).unwrap();
        let theme = loaded.theme.unwrap();
        assert_eq!(theme.default.as_deref(), Some("dark"));
        assert_eq!(theme.store_path.as_deref(), Some("/tmp/prefs.redb"));
    }
}
