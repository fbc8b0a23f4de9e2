use answer_normalizer::NormalizeOutcome;
use answer_normalizer::normalize::forms::FormReferences;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct NormalizeRunReport {
    pub report_version: u32,
    pub generated_at: String,
    pub input_path: String,
    pub output_path: String,
    pub search_base_url: String,
    pub input_sha256: String,
    pub output_sha256: String,
    pub input_bytes: usize,
    pub output_bytes: usize,
    pub changed: bool,
    pub outcome: NormalizeOutcome,
}

#[derive(Debug, Clone, Serialize)]
pub struct InspectedHeading {
    pub level: u8,
    pub line_index: usize,
    pub line_end: usize,
    pub text: String,
    pub body_line_count: usize,
    pub is_sources: bool,
    pub is_forms: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct InspectReport {
    pub report_version: u32,
    pub generated_at: String,
    pub input_path: String,
    pub input_sha256: String,
    pub line_count: usize,
    pub looks_like_markdown: bool,
    pub prologue_line_count: usize,
    pub headings: Vec<InspectedHeading>,
    pub form_references: FormReferences,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationSummary {
    pub report_version: u32,
    pub generated_at: String,
    pub input_path: String,
    pub status: String,
    pub sources_heading_count: usize,
    pub sources_section_is_last: bool,
    pub forms_heading_count: usize,
    pub is_fixed_point: bool,
    pub violations: Vec<String>,
}
