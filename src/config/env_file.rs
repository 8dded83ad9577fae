//! Dotenv file persistence used by `setup`.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::ConfigError;

/// Sets `key=value` in the dotenv file at `path`.
///
/// An existing `key=` line (optionally prefixed with `export `) is replaced
/// in place and every other line is preserved. When the key is absent the
/// pair is appended. A missing file is created.
///
/// # Errors
///
/// Returns [`ConfigError::EnvFile`] if the file cannot be read or written.
///
/// # Example
///
/// ```rust,no_run
/// use shopify_data::update_env_file;
///
/// update_env_file(".env", "SHOP", "my-store.myshopify.com").unwrap();
/// ```
pub fn update_env_file(
    path: impl AsRef<Path>,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    let path = path.as_ref();
    let io_error = |e: std::io::Error| ConfigError::EnvFile {
        path: path.display().to_string(),
        message: e.to_string(),
    };

    let existing = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => String::new(),
        Err(e) => return Err(io_error(e)),
    };

    let rendered = upsert_line(&existing, key, value);
    fs::write(path, rendered).map_err(io_error)?;

    tracing::debug!(path = %path.display(), key, "updated env file");
    Ok(())
}

fn upsert_line(content: &str, key: &str, value: &str) -> String {
    let entry = format!("{key}={value}");
    let mut replaced = false;

    let mut lines: Vec<String> = content
        .lines()
        .map(|line| {
            let trimmed = line.trim_start();
            let bare = trimmed.strip_prefix("export ").unwrap_or(trimmed);
            let matches = bare
                .split_once('=')
                .is_some_and(|(name, _)| name.trim() == key);
            if matches && !replaced {
                replaced = true;
                entry.clone()
            } else {
                line.to_string()
            }
        })
        .collect();

    if !replaced {
        lines.push(entry);
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}
