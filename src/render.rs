//! Plain-text rendering of a study guide for download.

use crate::processing::{QuestionRecord, QuestionSection, StudyGuide};

const RULE: &str = "========================================";
const SECTION_RULE: &str = "----------------------------------------";

/// Render a study guide as a plain-text document.
pub fn render_text(guide: &StudyGuide) -> String {
    let mut lines = vec![
        "STUDY GUIDE".to_string(),
        RULE.to_string(),
        format!("Source Document: {}", guide.filename),
        format!("Generated on: {}", generated_on(&guide.created_at)),
        format!("Total Questions: {}", guide.total_questions),
        String::new(),
        "SUMMARY".to_string(),
        SECTION_RULE.to_string(),
        guide.summary.clone(),
    ];

    for section in &guide.questions {
        lines.push(String::new());
        render_section(section, &mut lines);
    }

    let mut document = lines.join("\n");
    document.push('\n');
    document
}

/// Attachment filename used when the guide is downloaded.
pub fn download_filename(id: u64) -> String {
    format!("StudyGuide-{id}.txt")
}

fn render_section(section: &QuestionSection, lines: &mut Vec<String>) {
    lines.push(section.question_type.title().to_uppercase());
    lines.push(SECTION_RULE.to_string());
    if section.questions.is_empty() {
        lines.push("No questions could be generated for this section.".into());
        return;
    }
    for (index, record) in section.questions.iter().enumerate() {
        render_record(index + 1, record, lines);
    }
}

fn render_record(number: usize, record: &QuestionRecord, lines: &mut Vec<String>) {
    lines.push(format!("Q{number}. {}", record.question));
    for option in record.options.iter().flatten() {
        lines.push(format!("    {option}"));
    }
    lines.push(format!("Answer: {}", record.answer));
    if let Some(explanation) = &record.explanation {
        lines.push(format!("Explanation: {explanation}"));
    }
    lines.push(String::new());
}

/// Calendar date portion of an RFC 3339 timestamp.
fn generated_on(created_at: &str) -> &str {
    created_at.get(..10).unwrap_or(created_at)
}
