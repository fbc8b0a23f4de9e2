//! Finds every "sources consulted" section and folds them into one body.

use super::headings::{HeadingIndex, Section, normalized_heading_text};

/// Normalized heading texts that mark a sources section. Matched against the
/// start of the heading text; only punctuation or decoration may follow.
/// Comparison is on lower-cased text without Unicode normalization, so a
/// decomposed accent (`e` + U+0301) does not match `références`.
pub const SOURCES_HEADING_CANDIDATES: &[&str] = &[
    "sites consultés",
    "sources consultées",
    "sources",
    "références",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Consolidation {
    pub remainder: String,
    /// `None` when no sources section exists; an empty body is still `Some`.
    pub merged_body: Option<Vec<String>>,
    pub sections_merged: usize,
}

pub fn is_sources_heading(line: &str) -> bool {
    let text = normalized_heading_text(line);
    SOURCES_HEADING_CANDIDATES.iter().any(|candidate| {
        text.strip_prefix(*candidate)
            .map(|rest| !rest.chars().any(char::is_alphanumeric))
            .unwrap_or(false)
    })
}

pub fn consolidate_sources<S: AsRef<str>>(lines: &[S], index: &HeadingIndex) -> Consolidation {
    let matched = index
        .sections()
        .iter()
        .filter(|section| is_sources_heading(&index.heading(section).raw_text))
        .collect::<Vec<&Section>>();

    if matched.is_empty() {
        return Consolidation {
            remainder: join_lines(lines.iter().map(|line| line.as_ref())).trim().to_string(),
            merged_body: None,
            sections_merged: 0,
        };
    }

    let mut removed = vec![false; lines.len()];
    let mut merged_body = Vec::<String>::new();

    for section in &matched {
        removed[section.lines()].fill(true);

        let body = trim_blank_edges(&lines[section.body()]);
        if body.is_empty() {
            continue;
        }
        if !merged_body.is_empty() {
            merged_body.push(String::new());
        }
        merged_body.extend(body.iter().map(|line| line.as_ref().to_string()));
    }

    let kept = lines
        .iter()
        .zip(&removed)
        .filter(|(_, is_removed)| !**is_removed)
        .map(|(line, _)| line.as_ref());

    Consolidation {
        remainder: join_lines(kept).trim().to_string(),
        merged_body: Some(merged_body),
        sections_merged: matched.len(),
    }
}

fn trim_blank_edges<S: AsRef<str>>(lines: &[S]) -> &[S] {
    let is_blank = |line: &S| line.as_ref().trim().is_empty();
    let Some(first) = lines.iter().position(|line| !is_blank(line)) else {
        return &[];
    };
    let last = lines.iter().rposition(|line| !is_blank(line)).unwrap_or(first);
    &lines[first..=last]
}

fn join_lines<'a>(lines: impl Iterator<Item = &'a str>) -> String {
    lines.collect::<Vec<&str>>().join("\n")
}
