//! Post-processing for assistant answers.
//!
//! The pipeline is linear: an optional plain-text reflow, then CERFA forms
//! augmentation, then sources consolidation, then a final trim. Each call
//! works on its own copy of the text, so a [`Normalizer`] can be shared
//! freely between threads.

use std::sync::OnceLock;

use anyhow::{Context, Result, bail};
use serde::Serialize;
use tracing::{debug, warn};
use url::Url;

pub mod forms;
pub mod headings;
pub mod reflow;
pub mod sources;


use self::forms::{
    FormLink, FormReferenceExtractor, FormReferences, has_forms_heading, is_forms_heading,
};
use self::headings::{HeadingIndex, classify_heading};
use self::reflow::{PlainTextReflow, looks_like_markdown};
use self::sources::{consolidate_sources, is_sources_heading};

pub const DEFAULT_SEARCH_BASE_URL: &str = "https://www.google.com/search";
pub const FORMS_HEADING: &str = "## 🧾 Formulaires (CERFA)";
pub const SOURCES_HEADING: &str = "## 🔗 Sites consultés";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizerOptions {
    pub search_base_url: String,
    pub forms_heading: String,
    pub sources_heading: String,
}

impl Default for NormalizerOptions {
    fn default() -> Self {
        Self {
            search_base_url: DEFAULT_SEARCH_BASE_URL.to_string(),
            forms_heading: FORMS_HEADING.to_string(),
            sources_heading: SOURCES_HEADING.to_string(),
        }
    }
}

/// What a single normalization pass did, alongside the resulting text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NormalizeOutcome {
    #[serde(skip)]
    pub text: String,
    pub looked_like_markdown: bool,
    pub reflowed_lines: usize,
    pub form_references: FormReferences,
    pub forms_heading_present: bool,
    pub form_links_added: usize,
    pub sources_sections_merged: usize,
}

pub struct Normalizer {
    options: NormalizerOptions,
    search_base: Url,
    forms: FormReferenceExtractor,
    reflow: PlainTextReflow,
}

impl Normalizer {
    pub fn new(options: NormalizerOptions) -> Result<Self> {
        let search_base = Url::parse(&options.search_base_url)
            .with_context(|| format!("invalid search base url: {}", options.search_base_url))?;

        if classify_heading(&options.forms_heading).is_none()
            || !is_forms_heading(&options.forms_heading)
        {
            bail!(
                "forms heading must be a level 1-2 heading mentioning formulaires: {}",
                options.forms_heading
            );
        }
        if classify_heading(&options.sources_heading).is_none()
            || !is_sources_heading(&options.sources_heading)
        {
            bail!(
                "sources heading must be a level 1-2 heading matching a sources synonym: {}",
                options.sources_heading
            );
        }

        Ok(Self {
            options,
            search_base,
            forms: FormReferenceExtractor::new()?,
            reflow: PlainTextReflow::new()?,
        })
    }

    pub fn normalize(&self, text: &str) -> String {
        self.normalize_with_report(text).text
    }

    pub fn normalize_with_report(&self, text: &str) -> NormalizeOutcome {
        let mut outcome = NormalizeOutcome::default();
        let text = normalize_newlines(text);
        let trimmed = text.trim();

        let mut current = if looks_like_markdown(trimmed) {
            outcome.looked_like_markdown = true;
            trimmed.to_string()
        } else {
            let reflowed = self.reflow.reflow(trimmed);
            outcome.reflowed_lines = reflowed.promoted;
            reflowed.text
        };

        let references = self.forms.extract(&current);
        let lines = current.lines().collect::<Vec<&str>>();
        outcome.forms_heading_present = has_forms_heading(&HeadingIndex::build(&lines));

        if references.found && !outcome.forms_heading_present {
            let links = references.links(&self.search_base);
            outcome.form_links_added = links.len();
            current = append_section(
                &current,
                &self.options.forms_heading,
                links.iter().map(FormLink::to_markdown),
            );
        }
        outcome.form_references = references;

        let lines = current.lines().collect::<Vec<&str>>();
        let index = HeadingIndex::build(&lines);
        let consolidation = consolidate_sources(&lines, &index);
        outcome.sources_sections_merged = consolidation.sections_merged;

        let normalized = match consolidation.merged_body {
            Some(body) => append_section(
                &consolidation.remainder,
                &self.options.sources_heading,
                body,
            ),
            None => consolidation.remainder,
        };
        outcome.text = normalized.trim().to_string();

        debug!(
            looked_like_markdown = outcome.looked_like_markdown,
            reflowed_lines = outcome.reflowed_lines,
            form_links_added = outcome.form_links_added,
            sources_sections_merged = outcome.sources_sections_merged,
            "normalized answer"
        );

        outcome
    }
}

/// Normalizes with the default options, building the shared normalizer on
/// first use. Falls back to trimming only if that normalizer cannot be built.
pub fn normalize(text: &str) -> String {
    static DEFAULT: OnceLock<Option<Normalizer>> = OnceLock::new();

    let normalizer = DEFAULT.get_or_init(|| match Normalizer::new(NormalizerOptions::default()) {
        Ok(normalizer) => Some(normalizer),
        Err(error) => {
            warn!(error = %error, "failed to build default normalizer");
            None
        }
    });

    match normalizer {
        Some(normalizer) => normalizer.normalize(text),
        None => text.trim().to_string(),
    }
}

/// CRLF and lone CR become LF so that splitting and re-joining lines is lossless.
fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

fn append_section<I, S>(text: &str, heading: &str, body: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut output = text.trim_end().to_string();
    if !output.is_empty() {
        output.push_str("\n\n");
    }
    output.push_str(heading);
    for line in body {
        output.push('\n');
        output.push_str(line.as_ref());
    }
    output
}
