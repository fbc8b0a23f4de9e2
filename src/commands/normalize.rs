use answer_normalizer::{NormalizeOutcome, Normalizer, NormalizerOptions};
use anyhow::Result;
use tracing::info;

use crate::cli::NormalizeArgs;
use crate::model::NormalizeRunReport;
use crate::util::{
    display_path, now_utc_string, read_input, sha256_text, write_json_pretty, write_text_output,
};

const REPORT_VERSION: u32 = 1;

pub fn run(args: NormalizeArgs) -> Result<()> {
    let normalizer = Normalizer::new(NormalizerOptions {
        search_base_url: args.search_base_url.clone(),
        ..NormalizerOptions::default()
    })?;

    let input_path = display_path(args.input.as_deref());
    let input = read_input(args.input.as_deref())?;
    info!(input = %input_path, bytes = input.len(), "normalizing answer");

    let outcome = normalizer.normalize_with_report(&input);
    write_text_output(args.output.as_deref(), &outcome.text)?;

    info!(
        reflowed_lines = outcome.reflowed_lines,
        form_links_added = outcome.form_links_added,
        forms_heading_present = outcome.forms_heading_present,
        sources_sections_merged = outcome.sources_sections_merged,
        "normalization completed"
    );

    if let Some(report_path) = &args.report_path {
        let report = build_run_report(
            &input_path,
            &display_path(args.output.as_deref()),
            &args.search_base_url,
            &input,
            outcome,
        );
        write_json_pretty(report_path, &report)?;
        info!(path = %report_path.display(), "wrote normalize run report");
    }

    Ok(())
}

fn build_run_report(
    input_path: &str,
    output_path: &str,
    search_base_url: &str,
    input: &str,
    outcome: NormalizeOutcome,
) -> NormalizeRunReport {
    NormalizeRunReport {
        report_version: REPORT_VERSION,
        generated_at: now_utc_string(),
        input_path: input_path.to_string(),
        output_path: output_path.to_string(),
        search_base_url: search_base_url.to_string(),
        input_sha256: sha256_text(input),
        output_sha256: sha256_text(&outcome.text),
        input_bytes: input.len(),
        output_bytes: outcome.text.len(),
        changed: input != outcome.text,
        outcome,
    }
}
