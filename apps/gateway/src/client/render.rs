use std::fmt::Write;

use super::session::SessionOutput;
use crate::analysis::AnalysisResult;

pub fn render_output(output: &SessionOutput) -> String {
    match output {
        SessionOutput::ExtractionOnly { resume_text } => {
            format!("Extracted resume text\n\n{resume_text}\n")
        }
        SessionOutput::Analysis { result, .. } => render_result(result),
    }
}

pub fn render_result(result: &AnalysisResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Result");
    let _ = writeln!(out, "Match score: {}%", result.score);

    let _ = writeln!(out, "\nMissing skills / keywords");
    if result.missing_skills.is_empty() {
        let _ = writeln!(out, "None. Your resume contains most JD keywords.");
    } else {
        push_list(&mut out, &result.missing_skills);
    }

    let _ = writeln!(out, "\nTop keywords (JD)");
    push_list(&mut out, &result.jd_keywords);

    let _ = writeln!(out, "\nTop keywords (Resume)");
    push_list(&mut out, &result.resume_keywords);

    let _ = writeln!(out, "\nSuggestions");
    push_list(&mut out, &result.suggestions);

    out
}

fn push_list(out: &mut String, items: &[String]) {
    for item in items {
        let _ = writeln!(out, "  - {item}");
    }
}
