//! Salvage path for answers that came back as plain text.
//!
//! Lines shaped like `<emoji> Label: text` are promoted to level-2 headings so
//! the later passes have structure to work with. Never run on text that
//! already looks like markdown.

use anyhow::{Context, Result};
use regex::Regex;

pub const MARKDOWN_MARKERS: [&str; 3] = ["# ", "## ", "### "];

pub fn looks_like_markdown(text: &str) -> bool {
    MARKDOWN_MARKERS.iter().any(|marker| text.contains(marker))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reflowed {
    pub text: String,
    pub promoted: usize,
}

pub struct PlainTextReflow {
    labelled_line: Regex,
}

impl PlainTextReflow {
    pub fn new() -> Result<Self> {
        Ok(Self {
            labelled_line: Regex::new(
                r"^\s*([^\p{L}\p{N}\s\x00-\x7F]+)\s*(\p{L}[^:]{0,79}?)\s*:\s*(.*)$",
            )
            .context("failed to compile labelled line regex")?,
        })
    }

    pub fn reflow(&self, text: &str) -> Reflowed {
        let mut lines = Vec::<String>::new();
        let mut promoted = 0usize;

        for line in text.lines() {
            let Some((heading, rest)) = self.promote(line) else {
                lines.push(line.to_string());
                continue;
            };

            let previous_is_blank = lines
                .last()
                .map(|previous| previous.trim().is_empty())
                .unwrap_or(true);
            if !previous_is_blank {
                lines.push(String::new());
            }
            lines.push(heading);
            if !rest.is_empty() {
                lines.push(rest);
            }
            promoted += 1;
        }

        if promoted == 0 {
            return Reflowed {
                text: text.to_string(),
                promoted,
            };
        }

        Reflowed {
            text: lines.join("\n"),
            promoted,
        }
    }

    fn promote(&self, line: &str) -> Option<(String, String)> {
        let captures = self.labelled_line.captures(line)?;
        let emoji = captures.get(1)?.as_str();
        let label = captures.get(2)?.as_str().trim();
        let rest = captures.get(3).map(|value| value.as_str().trim()).unwrap_or("");

        // `🔗 https://...` is a bare link, not a label.
        if rest.starts_with("//") {
            return None;
        }

        Some((format!("## {emoji} {label}"), rest.to_string()))
    }
}
