//! Line-level heading scan and the flat section partition built from it.
//!
//! Only level-1 and level-2 ATX headings delimit sections. Deeper headings
//! (`###` and beyond) stay inside the enclosing section as body content.

use std::ops::Range;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Heading {
    pub level: u8,
    pub line_index: usize,
    pub raw_text: String,
}

/// A `[start, end)` line range owned by the heading at `heading` (an index
/// into [`HeadingIndex::headings`]). `start` is the heading line itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Section {
    pub heading: usize,
    pub start: usize,
    pub end: usize,
}

impl Section {
    pub fn body(&self) -> Range<usize> {
        (self.start + 1)..self.end
    }

    pub fn lines(&self) -> Range<usize> {
        self.start..self.end
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeadingIndex {
    headings: Vec<Heading>,
    sections: Vec<Section>,
    prologue_end: usize,
    line_count: usize,
}

impl HeadingIndex {
    pub fn build<S: AsRef<str>>(lines: &[S]) -> Self {
        let headings = lines
            .iter()
            .enumerate()
            .filter_map(|(line_index, line)| {
                let line = line.as_ref();
                classify_heading(line).map(|level| Heading {
                    level,
                    line_index,
                    raw_text: line.trim().to_string(),
                })
            })
            .collect::<Vec<Heading>>();

        let sections = headings
            .iter()
            .enumerate()
            .map(|(position, heading)| {
                let end = headings[position + 1..]
                    .iter()
                    .find(|next| next.level <= 2)
                    .map(|next| next.line_index)
                    .unwrap_or(lines.len());
                Section {
                    heading: position,
                    start: heading.line_index,
                    end,
                }
            })
            .collect();

        let prologue_end = headings
            .first()
            .map(|heading| heading.line_index)
            .unwrap_or(lines.len());

        Self {
            headings,
            sections,
            prologue_end,
            line_count: lines.len(),
        }
    }

    pub fn headings(&self) -> &[Heading] {
        &self.headings
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn heading(&self, section: &Section) -> &Heading {
        &self.headings[section.heading]
    }

    /// Lines before the first heading; the whole document when there is none.
    pub fn prologue(&self) -> Range<usize> {
        0..self.prologue_end
    }

    pub fn line_count(&self) -> usize {
        self.line_count
    }
}

/// Returns the level (1 or 2) when `line` is a section-delimiting heading.
pub fn classify_heading(line: &str) -> Option<u8> {
    let trimmed = line.trim();
    let level = trimmed.chars().take_while(|character| *character == '#').count();
    if !(1..=2).contains(&level) {
        return None;
    }

    let rest = &trimmed[level..];
    let separated = rest
        .chars()
        .next()
        .map(char::is_whitespace)
        .unwrap_or(false);
    if !separated || rest.trim().is_empty() {
        return None;
    }

    Some(level as u8)
}

/// Lower-cased heading text with the `#` marker and any leading decoration
/// (emoji, variation selectors, emphasis markers, whitespace) removed.
pub fn normalized_heading_text(line: &str) -> String {
    line.trim()
        .trim_start_matches('#')
        .trim_start_matches(|character: char| !character.is_alphanumeric())
        .trim_end()
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::{HeadingIndex, classify_heading, normalized_heading_text};

    #[test]
    fn classify_heading_accepts_only_levels_one_and_two() {
        assert_eq!(classify_heading("# Title"), Some(1));
        assert_eq!(classify_heading("  ## Sub  "), Some(2));
        assert_eq!(classify_heading("###  Deep"), None);
        assert_eq!(classify_heading("#NoSpace"), None);
        assert_eq!(classify_heading("## "), None);
        assert_eq!(classify_heading("text # not a heading"), None);
    }

    #[test]
    fn sections_partition_document_with_prologue() {
        let lines = vec![
            "intro",
            "",
            "# One",
            "body",
            "### nested",
            "more",
            "## Two",
            "tail",
        ];

        let index = HeadingIndex::build(&lines);
        assert_eq!(index.prologue(), 0..2);
        assert_eq!(index.headings().len(), 2);

        let sections = index.sections();
        assert_eq!(sections[0].lines(), 2..6);
        assert_eq!(sections[0].body(), 3..6);
        assert_eq!(sections[1].lines(), 6..8);
        assert_eq!(index.heading(&sections[1]).raw_text, "## Two");

        let covered = index.prologue().len()
            + sections.iter().map(|section| section.lines().len()).sum::<usize>();
        assert_eq!(covered, lines.len());
    }

    #[test]
    fn heading_without_body_yields_empty_section() {
        let lines = vec!["## A", "## B"];
        let index = HeadingIndex::build(&lines);

        assert_eq!(index.sections()[0].body(), 1..1);
        assert!(index.sections()[0].body().is_empty());
        assert_eq!(index.sections()[1].lines(), 1..2);
    }

    #[test]
    fn document_without_headings_is_all_prologue() {
        let lines = vec!["plain", "text"];
        let index = HeadingIndex::build(&lines);

        assert!(index.sections().is_empty());
        assert_eq!(index.prologue(), 0..2);
        assert_eq!(index.line_count(), 2);
    }

    #[test]
    fn normalized_heading_text_strips_marker_and_emoji() {
        assert_eq!(
            normalized_heading_text("## 🔗 Sites consultés"),
            "sites consultés"
        );
        assert_eq!(normalized_heading_text("# **Sources**"), "sources**");
        assert_eq!(normalized_heading_text("##   RÉFÉRENCES  "), "références");
    }
}
