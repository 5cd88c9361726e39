//! configuration validation stuff
use {
    crate::{config::options::*, theme::ThemeRegistry, validator, validator_nested},
    url::Url,
};

/// trait for validating config structs
pub trait Validate {
    /// validate the config
    fn validate(&self) -> Result<(), Vec<String>>;

    /// check if the config is valid
    fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

/// url schemes a chat server can be reached through
const VALID_SERVER_SCHEMES: &[&str] = &["http", "https", "ws", "wss"];

validator! { ServerCfg,
    url => |v: &String| Url::parse(v).is_ok_and(|u| VALID_SERVER_SCHEMES.contains(&u.scheme())),
        "must be an http(s) or ws(s) url";
    socket_path => |v: &String| v.starts_with('/'),
        "must start with '/'";
}

validator! { ReconnectCfg,
    attempts => |v: &u32| *v > 0,
        "must be greater than 0";
    delay_ms => |v: &u64| *v > 0,
        "must be greater than 0";
}

validator! { HttpCfg,
    timeout => |v: &u64| *v > 0,
        "must be greater than 0";
    connect_timeout => |v: &u64| *v > 0,
        "must be greater than 0";
    user_agent => |v: &String| !v.trim().is_empty(),
        "must not be empty";
}

validator! { ThemeCfg,
    default => |v: &String| ThemeRegistry::new().contains(v),
        "must be one of: default, green, purple, orange, dark";
    store_path => |v: &String| !v.trim().is_empty(),
        "must not be empty";
}

/// valid log levels
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

validator! { LoggingConfig,
    level => |v: &String| VALID_LOG_LEVELS.contains(&v.to_lowercase().as_str()),
        "must be one of: trace, debug, info, warn, error";
}

validator_nested! { ChatroomCfg,
    fields: {
        version => |v: &u32| *v == 1,
            "must be 1";
    }
    nested: { server; reconnect; http; theme; logging }
}

/// format validation errors for display
pub fn format_validation_errors(errors: &[String]) -> String {
    let mut output = String::from("Configuration validation failed:\n");
    for (i, err) in errors.iter().enumerate() {
        output.push_str(&format!("  {}. {}\n", i + 1, err));
    }
    output
}
