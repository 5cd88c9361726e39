//! utilities used across chatroom
use {
    crate::error::Result,
    std::{
        fs::{OpenOptions, create_dir_all},
        io::{BufWriter, Write},
        path::Path,
    },
    tracing::Level,
};

/// convert a string to a log level
///
/// takes a given string and converts it into a [`tracing::Level`] for later use when setting up
/// tracing in the app module. unknown strings fall back to [`Level::ERROR`]
pub fn string_to_log_level(lvl: &str) -> tracing::Level {
    match lvl.to_lowercase().as_str() {
        "d" | "debug" | "dbg" => Level::DEBUG,
        "t" | "trace" | "trc" => Level::TRACE,
        "e" | "error" | "err" => Level::ERROR,
        "i" | "info" | "inf" => Level::INFO,
        "w" | "warn" | "wrn" => Level::WARN,
        _ => Level::ERROR,
    }
}

/// write a string to a file, creating parent directories and truncating old contents
///
/// # Errors
///
/// returns an error if it fails to create the parent directory
/// returns an error if it fails to open or write `path`
pub fn write_to_file(path: impl AsRef<Path>, contents: &str) -> Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        create_dir_all(parent)?;
    }

    let file = OpenOptions::new()
        .write(true)
        .truncate(true)
        .create(true)
        .open(path)?;
    let mut w = BufWriter::new(file);
    w.write_all(contents.as_bytes())?;
    w.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_levels() {
        assert_eq!(string_to_log_level("DEBUG"), Level::DEBUG);
        assert_eq!(string_to_log_level("wrn"), Level::WARN);
        assert_eq!(string_to_log_level("t"), Level::TRACE);
        assert_eq!(string_to_log_level("nonsense"), Level::ERROR);
    }

    #[test]
    fn test_write_to_file_creates_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.toml");

        write_to_file(&path, "a = 1\n").unwrap();
        write_to_file(&path, "b = 2\n").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "b = 2\n");
    }
}
