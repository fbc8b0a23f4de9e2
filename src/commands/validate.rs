use answer_normalizer::normalize::forms::is_forms_heading;
use answer_normalizer::normalize::headings::HeadingIndex;
use answer_normalizer::normalize::sources::is_sources_heading;
use answer_normalizer::{Normalizer, NormalizerOptions};
use anyhow::{Result, bail};
use tracing::{info, warn};

use crate::cli::ValidateArgs;
use crate::model::ValidationSummary;
use crate::util::{display_path, emit_json, now_utc_string, read_input};

const SUMMARY_VERSION: u32 = 1;
const MAX_SOURCES_HEADINGS: usize = 1;
const MAX_FORMS_HEADINGS: usize = 1;

pub fn run(args: ValidateArgs) -> Result<()> {
    let normalizer = Normalizer::new(NormalizerOptions {
        search_base_url: args.search_base_url.clone(),
        ..NormalizerOptions::default()
    })?;

    let input_path = display_path(args.input.as_deref());
    let input = read_input(args.input.as_deref())?;

    let summary = collect_contract_checks(&input_path, &input, &normalizer);
    emit_json(args.report_path.as_deref(), &summary)?;

    if summary.violations.is_empty() {
        info!(
            input = %input_path,
            sources_headings = summary.sources_heading_count,
            forms_headings = summary.forms_heading_count,
            "answer satisfies the output contract"
        );
        return Ok(());
    }

    for violation in &summary.violations {
        warn!(input = %input_path, violation = %violation, "contract check failed");
    }
    bail!(
        "{} contract check(s) failed for {}",
        summary.violations.len(),
        input_path
    );
}

fn collect_contract_checks(
    input_path: &str,
    input: &str,
    normalizer: &Normalizer,
) -> ValidationSummary {
    let lines = input.lines().collect::<Vec<&str>>();
    let index = HeadingIndex::build(&lines);

    let sources_positions = index
        .sections()
        .iter()
        .enumerate()
        .filter(|(_, section)| is_sources_heading(&index.heading(section).raw_text))
        .map(|(position, _)| position)
        .collect::<Vec<usize>>();
    let sources_heading_count = sources_positions.len();
    let sources_section_is_last = match sources_positions.last() {
        Some(position) => *position + 1 == index.sections().len(),
        None => true,
    };

    let forms_heading_count = index
        .headings()
        .iter()
        .filter(|heading| is_forms_heading(&heading.raw_text))
        .count();

    let is_fixed_point = normalizer.normalize(input) == input.trim();

    let mut violations = Vec::new();
    if sources_heading_count > MAX_SOURCES_HEADINGS {
        violations.push(format!(
            "sources_heading_count={sources_heading_count} exceeds {MAX_SOURCES_HEADINGS}"
        ));
    }
    if !sources_section_is_last {
        violations.push("sources section is not the last top-level section".to_string());
    }
    if forms_heading_count > MAX_FORMS_HEADINGS {
        violations.push(format!(
            "forms_heading_count={forms_heading_count} exceeds {MAX_FORMS_HEADINGS}"
        ));
    }
    if !is_fixed_point {
        violations.push("normalizing the answer again changes it".to_string());
    }

    ValidationSummary {
        report_version: SUMMARY_VERSION,
        generated_at: now_utc_string(),
        input_path: input_path.to_string(),
        status: if violations.is_empty() {
            "pass".to_string()
        } else {
            "fail".to_string()
        },
        sources_heading_count,
        sources_section_is_last,
        forms_heading_count,
        is_fixed_point,
        violations,
    }
}
