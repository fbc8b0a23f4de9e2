//! CERFA form mentions and the canonical search links synthesized for them.

use anyhow::{Context, Result};
use regex::Regex;
use serde::Serialize;
use url::Url;

use super::headings::{HeadingIndex, normalized_heading_text};

pub const FORM_SCHEME: &str = "cerfa";

const GENERIC_FORM_LABEL: &str = "Rechercher un formulaire CERFA";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormReferences {
    pub found: bool,
    /// Distinct form numbers in first-seen order.
    pub numbers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormLink {
    pub label: String,
    pub url: String,
}

impl FormLink {
    pub fn to_markdown(&self) -> String {
        format!("- [{}]({})", self.label, self.url)
    }
}

impl FormReferences {
    pub fn links(&self, search_base: &Url) -> Vec<FormLink> {
        if !self.found {
            return Vec::new();
        }

        if self.numbers.is_empty() {
            return vec![FormLink {
                label: GENERIC_FORM_LABEL.to_string(),
                url: search_url(search_base, FORM_SCHEME),
            }];
        }

        self.numbers
            .iter()
            .map(|number| FormLink {
                label: format!("Formulaire CERFA n° {number}"),
                url: search_url(search_base, &format!("{FORM_SCHEME} {number}")),
            })
            .collect()
    }
}

/// A numbered `cerfa` mention always counts. A bare one counts only in a
/// form context: directly after `formulaire(s)` or followed by a `n°`/`numéro`
/// marker, so prose such as "sans cerfa" is not treated as a reference. The
/// pieces of a mention must share one line.
pub struct FormReferenceExtractor {
    mention: Regex,
}

impl FormReferenceExtractor {
    pub fn new() -> Result<Self> {
        Ok(Self {
            mention: Regex::new(
                r"(?i)(?P<context>\bformulaires?[^\S\n]+)?\bcerfa\b(?:[^\S\n]*(?:n°|no\.?|numéro|numero)?[^\S\n]*(?P<number>[0-9]{4,5}\*[0-9]{2}|[0-9]{5,6})\b|[^\S\n]*(?P<marker>n°|(?:numéro|numero)\b))?",
            )
            .context("failed to compile form reference regex")?,
        })
    }

    pub fn extract(&self, text: &str) -> FormReferences {
        let mut references = FormReferences::default();

        for captures in self.mention.captures_iter(text) {
            let Some(number) = captures.name("number").map(|value| value.as_str()) else {
                if captures.name("context").is_some() || captures.name("marker").is_some() {
                    references.found = true;
                }
                continue;
            };

            references.found = true;
            if !references.numbers.iter().any(|seen| seen == number) {
                references.numbers.push(number.to_string());
            }
        }

        references
    }
}

pub fn search_url(search_base: &Url, query: &str) -> String {
    let mut url = search_base.clone();
    url.query_pairs_mut().append_pair("q", query);
    url.to_string()
}

pub fn is_forms_heading(line: &str) -> bool {
    normalized_heading_text(line).contains("formulaire")
}

pub fn has_forms_heading(index: &HeadingIndex) -> bool {
    index
        .headings()
        .iter()
        .any(|heading| is_forms_heading(&heading.raw_text))
}

#[cfg(test)]
mod tests {
    use url::Url;

    use super::{FormReferenceExtractor, FormReferences, is_forms_heading};

    fn base() -> Url {
        Url::parse("https://www.google.com/search").unwrap()
    }

    #[test]
    fn extract_collects_numbers_in_first_seen_order() {
        let extractor = FormReferenceExtractor::new().unwrap();
        let references = extractor.extract(
            "Remplir le CERFA 12345, puis le cerfa n° 14880*01 et encore le Cerfa 12345.",
        );

        assert!(references.found);
        assert_eq!(references.numbers, vec!["12345", "14880*01"]);
    }

    #[test]
    fn extract_accepts_all_number_shapes() {
        let extractor = FormReferenceExtractor::new().unwrap();
        let references = extractor.extract("cerfa 1234*56 / cerfa 123456 / cerfa 65432");

        assert_eq!(references.numbers, vec!["1234*56", "123456", "65432"]);
    }

    #[test]
    fn extract_flags_mention_without_number() {
        let extractor = FormReferenceExtractor::new().unwrap();
        let references = extractor.extract("Il existe un formulaire CERFA dédié.");

        assert!(references.found);
        assert!(references.numbers.is_empty());
    }

    #[test]
    fn bare_keyword_outside_form_context_is_not_a_mention() {
        let extractor = FormReferenceExtractor::new().unwrap();

        assert!(!extractor.extract("texte sans cerfa ni sources").found);
        assert!(!extractor.extract("Le site cerfa est en maintenance.").found);
        assert!(!extractor.extract("un formulaire de type cerfa").found);
    }

    #[test]
    fn bare_keyword_in_form_context_is_a_mention() {
        let extractor = FormReferenceExtractor::new().unwrap();

        let after_formulaires = extractor.extract("Les formulaires Cerfa sont en ligne.");
        assert!(after_formulaires.found);
        assert!(after_formulaires.numbers.is_empty());

        let with_marker = extractor.extract("Remplir le cerfa n° indiqué par la mairie.");
        assert!(with_marker.found);
        assert!(with_marker.numbers.is_empty());

        assert!(extractor.extract("le CERFA numéro correspondant").found);
    }

    #[test]
    fn mention_does_not_span_lines() {
        let extractor = FormReferenceExtractor::new().unwrap();

        assert!(!extractor.extract("Les formulaires\ncerfa").found);
        assert!(!extractor.extract("cerfa\n\n12345").found);
        assert!(extractor.extract("cerfa 12345\nsuite").found);
    }

    #[test]
    fn extract_requires_whole_word_keyword() {
        let extractor = FormReferenceExtractor::new().unwrap();

        assert!(!extractor.extract("les cerfas 12345").found);
        assert!(!extractor.extract("precerfa 12345").found);
        assert_eq!(
            extractor.extract("cerfa 1234567").numbers,
            Vec::<String>::new()
        );
    }

    #[test]
    fn links_encode_scheme_and_number_in_query() {
        let references = FormReferences {
            found: true,
            numbers: vec!["14880*01".to_string()],
        };

        let links = references.links(&base());
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].label, "Formulaire CERFA n° 14880*01");
        assert_eq!(
            links[0].url,
            "https://www.google.com/search?q=cerfa+14880*01"
        );
        assert_eq!(
            links[0].to_markdown(),
            "- [Formulaire CERFA n° 14880*01](https://www.google.com/search?q=cerfa+14880*01)"
        );
    }

    #[test]
    fn links_fall_back_to_single_generic_entry() {
        let references = FormReferences {
            found: true,
            numbers: Vec::new(),
        };

        let links = references.links(&base());
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].url, "https://www.google.com/search?q=cerfa");
        assert!(FormReferences::default().links(&base()).is_empty());
    }

    #[test]
    fn forms_heading_detection_ignores_decoration() {
        assert!(is_forms_heading("## 📋 Formulaires disponibles"));
        assert!(is_forms_heading("# Formulaire à remplir"));
        assert!(!is_forms_heading("## Démarches"));
    }
}
