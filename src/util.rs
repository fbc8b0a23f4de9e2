use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};

const STDIO_MARKER: &str = "-";

pub fn now_utc_string() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

pub fn ensure_directory(path: &Path) -> Result<()> {
    fs::create_dir_all(path)
        .with_context(|| format!("failed to create directory: {}", path.display()))
}

pub fn sha256_text(text: &str) -> String {
    format!("{:x}", Sha256::digest(text.as_bytes()))
}

fn is_stdio(path: Option<&Path>) -> bool {
    path.map(|value| value.as_os_str() == STDIO_MARKER)
        .unwrap_or(true)
}

pub fn display_path(path: Option<&Path>) -> String {
    match path {
        Some(value) if !is_stdio(Some(value)) => value.display().to_string(),
        _ => "<stdio>".to_string(),
    }
}

pub fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(value) if !is_stdio(Some(value)) => fs::read_to_string(value)
            .with_context(|| format!("failed to read input: {}", value.display())),
        _ => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read input from stdin")?;
            Ok(buffer)
        }
    }
}

pub fn write_text_output(path: Option<&Path>, text: &str) -> Result<()> {
    match path {
        Some(value) if !is_stdio(Some(value)) => {
            if let Some(parent) = value.parent() {
                ensure_directory(parent)?;
            }
            fs::write(value, format!("{text}\n"))
                .with_context(|| format!("failed to write output: {}", value.display()))
        }
        _ => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{text}").context("failed to write output to stdout")?;
            stdout.flush().context("failed to flush stdout")
        }
    }
}

pub fn write_json_pretty<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_directory(parent)?;
    }

    let data = serde_json::to_vec_pretty(value)
        .with_context(|| format!("failed to serialize json: {}", path.display()))?;

    let mut file = File::create(path)
        .with_context(|| format!("failed to create json file: {}", path.display()))?;
    file.write_all(&data)
        .with_context(|| format!("failed to write json file: {}", path.display()))?;
    file.write_all(b"\n")
        .with_context(|| format!("failed to finalize json file: {}", path.display()))?;

    Ok(())
}

/// Writes the report to `path`, or pretty-prints it on stdout.
pub fn emit_json<T: Serialize>(path: Option<&Path>, value: &T) -> Result<()> {
    match path {
        Some(value_path) => write_json_pretty(value_path, value),
        None => {
            let data = serde_json::to_string_pretty(value).context("failed to serialize json")?;
            write_text_output(None, &data)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::{display_path, sha256_text};

    #[test]
    fn sha256_text_is_lowercase_hex() {
        assert_eq!(
            sha256_text(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn display_path_treats_dash_as_stdio() {
        assert_eq!(display_path(None), "<stdio>");
        assert_eq!(display_path(Some(Path::new("-"))), "<stdio>");
        assert_eq!(display_path(Some(Path::new("answer.md"))), "answer.md");
    }
}
