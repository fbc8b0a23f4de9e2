use answer_normalizer::normalize::forms::{FormReferenceExtractor, is_forms_heading};
use answer_normalizer::normalize::headings::HeadingIndex;
use answer_normalizer::normalize::reflow::looks_like_markdown;
use answer_normalizer::normalize::sources::is_sources_heading;
use anyhow::Result;
use tracing::info;

use crate::cli::InspectArgs;
use crate::model::{InspectReport, InspectedHeading};
use crate::util::{display_path, emit_json, now_utc_string, read_input, sha256_text};

pub fn run(args: InspectArgs) -> Result<()> {
    let input_path = display_path(args.input.as_deref());
    let input = read_input(args.input.as_deref())?;
    let extractor = FormReferenceExtractor::new()?;

    let report = build_report(&input_path, &input, &extractor);
    info!(
        input = %input_path,
        headings = report.headings.len(),
        sources_headings = report.headings.iter().filter(|heading| heading.is_sources).count(),
        form_mentions_found = report.form_references.found,
        "inspected answer structure"
    );

    emit_json(args.report_path.as_deref(), &report)
}

fn build_report(
    input_path: &str,
    input: &str,
    extractor: &FormReferenceExtractor,
) -> InspectReport {
    let lines = input.lines().collect::<Vec<&str>>();
    let index = HeadingIndex::build(&lines);

    let headings = index
        .sections()
        .iter()
        .map(|section| {
            let heading = index.heading(section);
            InspectedHeading {
                level: heading.level,
                line_index: heading.line_index,
                line_end: section.end,
                text: heading.raw_text.clone(),
                body_line_count: section.body().len(),
                is_sources: is_sources_heading(&heading.raw_text),
                is_forms: is_forms_heading(&heading.raw_text),
            }
        })
        .collect();

    InspectReport {
        report_version: 1,
        generated_at: now_utc_string(),
        input_path: input_path.to_string(),
        input_sha256: sha256_text(input),
        line_count: index.line_count(),
        looks_like_markdown: looks_like_markdown(input.trim()),
        prologue_line_count: index.prologue().len(),
        headings,
        form_references: extractor.extract(input),
    }
}

#[cfg(test)]
mod tests {
    use answer_normalizer::normalize::forms::FormReferenceExtractor;

    use super::build_report;

    #[test]
    fn report_lists_sections_with_classification() {
        let extractor = FormReferenceExtractor::new().unwrap();
        let input = "Intro\n## 📋 Formulaires\n- cerfa 12345\n### Détail\n## Sources\n- [A](a)";

        let report = build_report("answer.md", input, &extractor);
        assert_eq!(report.line_count, 6);
        assert_eq!(report.prologue_line_count, 1);
        assert!(report.looks_like_markdown);
        assert_eq!(report.headings.len(), 2);

        let forms = &report.headings[0];
        assert!(forms.is_forms);
        assert!(!forms.is_sources);
        assert_eq!((forms.line_index, forms.line_end), (1, 4));
        assert_eq!(forms.body_line_count, 2);

        let sources = &report.headings[1];
        assert!(sources.is_sources);
        assert_eq!(sources.line_end, 6);

        assert_eq!(report.form_references.numbers, vec!["12345"]);
    }
}
