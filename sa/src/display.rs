//! Terminal presentation of decoded results
//!
//! Model output is only loosely shaped, so every field is optional here and
//! missing or oddly typed values fall back to placeholders instead of errors.

use std::fmt::Write;

use colored::*;
use prompttext::StructuredResult;
use serde_json::Value;

use crate::analyzer::Assessment;

const RULE_WIDTH: usize = 80;

static NULL: Value = Value::Null;

/// Top-level field of a result, null when absent
fn field<'a>(result: &'a StructuredResult, key: &str) -> &'a Value {
    result.get(key).unwrap_or(&NULL)
}

/// `value` as a list; anything that isn't an array reads as empty
fn items(value: &Value) -> &[Value] {
    value.as_array().map(Vec::as_slice).unwrap_or(&[])
}

/// `value` as display text, or `default` when it is missing or null
fn text_or(value: &Value, default: &str) -> String {
    match value {
        Value::Null => default.to_string(),
        other => text_of(other),
    }
}

/// Integer readiness score; numbers are truncated, numeric strings parsed
pub fn score_of(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<f64>().ok().map(|f| f as i64),
        _ => None,
    }
}

/// Color band for a 1-10 score
pub fn score_color(score: i64) -> Color {
    match score {
        s if s >= 8 => Color::Green,
        s if s >= 6 => Color::Yellow,
        _ => Color::Red,
    }
}

/// Color band for a 0.0-1.0 role confidence
pub fn confidence_color(confidence: f64) -> Color {
    if confidence >= 0.85 {
        Color::Green
    } else if confidence >= 0.75 {
        Color::Yellow
    } else {
        Color::Cyan
    }
}

fn text_of(value: &Value) -> String {
    match value {
        Value::Null => "N/A".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn list_of(values: &[Value]) -> Vec<String> {
    values.iter().map(text_of).collect()
}

fn banner(out: &mut String, title: &str) {
    let rule = "=".repeat(RULE_WIDTH);
    let _ = writeln!(out, "\n{}\n{}\n{}", rule.blue(), title.blue().bold(), rule.blue());
}

/// Assessment report for the terminal
///
/// Each field is read on its own, so one missing or mistyped value only
/// blanks its own line.
pub fn render_assessment(assessment: &Assessment) -> String {
    let result = &assessment.result;
    let mut out = String::new();
    banner(&mut out, assessment.config.title);

    let readiness = field(result, "overall_readiness");
    match score_of(&readiness["score"]) {
        Some(score) => {
            let line = format!("\n📊 Overall Score: {}/10", score);
            let _ = writeln!(out, "{}", line.color(score_color(score)));
        }
        None => {
            let _ = writeln!(out, "{}", "\n📊 Overall Score: N/A/10".red());
        }
    }
    let summary = text_or(&readiness["summary"], "No summary available");
    let _ = writeln!(out, "{}", format!("📝 Summary: {}", summary).cyan());

    let strengths = items(&readiness["strengths"]);
    if !strengths.is_empty() {
        let _ = writeln!(out, "\n{}", "💪 Strengths:".green());
        for strength in list_of(strengths) {
            let _ = writeln!(out, "  • {}", strength);
        }
    }
    let areas = items(&readiness["development_areas"]);
    if !areas.is_empty() {
        let _ = writeln!(out, "\n{}", "📈 Development Areas:".yellow());
        for area in list_of(areas) {
            let _ = writeln!(out, "  • {}", area);
        }
    }

    let skills = items(field(result, "identified_skills"));
    if !skills.is_empty() {
        let header = format!("\n✅ Identified Skills ({}):", skills.len());
        let _ = writeln!(out, "{}", header.green());
        for skill in skills {
            // A bare string is taken as the skill name
            let name = if skill.is_string() { skill } else { &skill["skill_name"] };
            let confidence = skill["confidence_score"].as_f64().map(|c| (c * 100.0).round() as i64).unwrap_or(0);
            let line = format!(
                "  • {} - Level: {}, Confidence: {}%",
                text_of(name),
                text_of(&skill["proficiency_level"]),
                confidence
            );
            let _ = writeln!(out, "{}", line.cyan());
        }
    }

    let missing = items(field(result, "missing_essential_skills"));
    if !missing.is_empty() {
        let header = format!("\n⚠️  Missing Essential Skills ({}):", missing.len());
        let _ = writeln!(out, "{}", header.yellow());
        for skill in list_of(missing) {
            let _ = writeln!(out, "{}", format!("  ○ {}", skill).yellow());
        }
    }

    out
}

/// Role identification report for the terminal
pub fn render_roles(result: &StructuredResult) -> String {
    let mut out = String::new();
    banner(&mut out, "Role Identification Results");

    let _ = writeln!(out, "\n{}", "📋 Career Summary:".cyan());
    let _ = writeln!(out, "{}", text_or(field(result, "summary"), "No summary available"));

    let _ = writeln!(out, "\n{}", "🎯 Primary Role Match:".green());
    let _ = writeln!(out, "{}", text_of(field(result, "primary_role")).green());

    let roles = items(field(result, "identified_roles"));
    if roles.is_empty() {
        let _ = writeln!(out, "\n{}", "⚠️  No matching roles identified".yellow());
        return out;
    }

    let _ = writeln!(out, "\n{}", "✅ Identified Roles:".green());
    for role in roles {
        let name = if role.is_string() { role } else { &role["role"] };
        let confidence = role["confidence"].as_f64().unwrap_or(0.0);
        let line = format!("  • {} ({:.1}%)", text_of(name), confidence * 100.0);
        let _ = writeln!(out, "{}", line.color(confidence_color(confidence)));
        if !role["justification"].is_null() {
            let _ = writeln!(out, "    {}", text_of(&role["justification"]));
        }
        let evidence = items(&role["key_evidence"]);
        if !evidence.is_empty() {
            let evidence = format!("    Evidence: {}", list_of(evidence).join(", "));
            let _ = writeln!(out, "{}", evidence.cyan());
        }
    }
    out
}
