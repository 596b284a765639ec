//! Decision extraction from judge output.
//!
//! Judges are asked for JSON but may answer with anything. Strategies are
//! tried in order and the first meaningful decision wins:
//!
//! 1. The interior of a fence wrapping the whole body
//! 2. The whole body as JSON
//! 3. Every balanced `{...}` object embedded in the text, in order
//! 4. Line-oriented sections (`## Winner`, `risks: a; b`, bullets)
//!
//! JSON keys resolve through the [`judge_field`] alias table. Section
//! headings and `key: value` lines accept only the canonical field names
//! (via [`section_field`]), so ordinary prose such as `Reason: ...` stays
//! in the current section. Both share [`normalize_judge_key`].

use super::decision::{DecisionFormat, JudgeDecision};
use crate::core::string::normalize_newlines;
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};

/// Decision field a key or heading refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JudgeField {
    Winner,
    Rationale,
    Differences,
    Risks,
    FollowUp,
}

/// Aliases per field, in lookup priority order
const FIELD_ALIASES: &[(JudgeField, &[&str])] = &[
    (
        JudgeField::Winner,
        &["winner", "winner_id", "selected_branch", "selected", "best_branch", "branch"],
    ),
    (JudgeField::Rationale, &["rationale", "reason", "why"]),
    (JudgeField::Differences, &["differences", "diffs", "tradeoffs"]),
    (JudgeField::Risks, &["risks", "risk"]),
    (JudgeField::FollowUp, &["follow_up", "followup", "next_steps", "followups"]),
];

/// Lowercase and drop `_`, `-` and spaces.
pub fn normalize_judge_key(s: &str) -> String {
    s.trim()
        .to_lowercase()
        .chars()
        .filter(|c| !matches!(c, '_' | '-' | ' '))
        .collect()
}

/// Resolve a JSON key or section name to the field it names.
pub fn judge_field(raw: &str) -> Option<JudgeField> {
    let key = normalize_judge_key(raw);
    if key.is_empty() {
        return None;
    }
    FIELD_ALIASES
        .iter()
        .find(|(_, aliases)| aliases.iter().any(|a| normalize_judge_key(a) == key))
        .map(|(field, _)| *field)
}

/// Canonical name per field, as accepted in section headings and keys
const SECTION_NAMES: &[(JudgeField, &str)] = &[
    (JudgeField::Winner, "winner"),
    (JudgeField::Rationale, "rationale"),
    (JudgeField::Differences, "differences"),
    (JudgeField::Risks, "risks"),
    (JudgeField::FollowUp, "followup"),
];

/// Resolve a section heading or line key to the field it names.
pub fn section_field(raw: &str) -> Option<JudgeField> {
    let key = normalize_judge_key(raw);
    SECTION_NAMES
        .iter()
        .find(|(_, name)| *name == key)
        .map(|(field, _)| *field)
}

fn aliases(field: JudgeField) -> &'static [&'static str] {
    FIELD_ALIASES
        .iter()
        .find(|(f, _)| *f == field)
        .map(|(_, a)| *a)
        .unwrap_or(&[])
}

/// Parse judge output into a meaningful decision, if one can be recovered.
pub fn parse_judge_decision(raw: &str) -> Option<JudgeDecision> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    parse_json_decision(raw).or_else(|| parse_section_decision(raw))
}

fn parse_json_decision(raw: &str) -> Option<JudgeDecision> {
    let mut candidates: Vec<String> = Vec::new();
    if let Some(inner) = strip_fence(raw) {
        candidates.push(inner);
    }
    candidates.push(raw.to_string());
    candidates.extend(extract_json_objects(raw));

    let mut seen = HashSet::new();
    candidates
        .iter()
        .map(|c| c.trim())
        .filter(|c| !c.is_empty() && seen.insert(c.to_string()))
        .find_map(parse_json_candidate)
}

fn parse_json_candidate(candidate: &str) -> Option<JudgeDecision> {
    let value: Value = serde_json::from_str(candidate).ok()?;
    let object = value.as_object()?;
    let fields = index_fields(object);

    let mut decision = JudgeDecision::empty(DecisionFormat::Json);
    decision.winner = first_string(&fields, JudgeField::Winner);
    decision.rationale = first_string(&fields, JudgeField::Rationale);
    decision.differences = first_string_list(&fields, JudgeField::Differences);
    decision.risks = first_string_list(&fields, JudgeField::Risks);
    decision.follow_up = first_string_list(&fields, JudgeField::FollowUp);
    decision.is_meaningful().then_some(decision)
}

/// Normalized key -> value. The first spelling of a normalized key wins.
fn index_fields(object: &Map<String, Value>) -> HashMap<String, &Value> {
    let mut out = HashMap::with_capacity(object.len());
    for (key, value) in object {
        out.entry(normalize_judge_key(key)).or_insert(value);
    }
    out
}

fn field_values<'a>(
    fields: &'a HashMap<String, &'a Value>,
    field: JudgeField,
) -> impl Iterator<Item = &'a Value> + 'a {
    aliases(field)
        .iter()
        .filter_map(move |alias| fields.get(&normalize_judge_key(alias)).copied())
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(clean_judge_text(s)).filter(|s| !s.is_empty()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn first_string(fields: &HashMap<String, &Value>, field: JudgeField) -> String {
    field_values(fields, field)
        .find_map(scalar_to_string)
        .unwrap_or_default()
}

fn first_string_list(fields: &HashMap<String, &Value>, field: JudgeField) -> Vec<String> {
    field_values(fields, field)
        .map(|value| match value {
            Value::Array(items) => items.iter().filter_map(scalar_to_string).collect(),
            Value::String(s) => split_judge_list_value(s),
            _ => Vec::new(),
        })
        .find(|list| !list.is_empty())
        .unwrap_or_default()
}

/// Line-oriented fallback with a single current-section register.
fn parse_section_decision(raw: &str) -> Option<JudgeDecision> {
    let mut decision = JudgeDecision::empty(DecisionFormat::Sections);
    let mut section: Option<JudgeField> = None;

    for line in normalize_newlines(raw).lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with("```") {
            continue;
        }
        if let Some(field) = parse_heading(line) {
            section = Some(field);
            continue;
        }
        if let Some((field, value)) = parse_key_value(line) {
            section = Some(field);
            append_section(&mut decision, field, value);
            continue;
        }
        if is_bullet(line) {
            if let Some(field) = section {
                append_section(&mut decision, field, strip_bullet_prefix(line));
            }
            continue;
        }
        if let Some(field) = section {
            append_section(&mut decision, field, line);
        }
    }

    decision.is_meaningful().then_some(decision)
}

fn append_section(decision: &mut JudgeDecision, field: JudgeField, value: &str) {
    let value = clean_judge_text(value);
    if value.is_empty() {
        return;
    }
    match field {
        JudgeField::Winner => {
            if decision.winner.is_empty() {
                decision.winner = value;
            }
        }
        JudgeField::Rationale => {
            if decision.rationale.is_empty() {
                decision.rationale = value;
            } else if !decision.rationale.eq_ignore_ascii_case(&value) {
                decision.rationale = format!("{} {}", decision.rationale, value)
                    .trim()
                    .to_string();
            }
        }
        JudgeField::Differences => append_unique(&mut decision.differences, split_judge_list_value(&value)),
        JudgeField::Risks => append_unique(&mut decision.risks, split_judge_list_value(&value)),
        JudgeField::FollowUp => append_unique(&mut decision.follow_up, split_judge_list_value(&value)),
    }
}

/// `## Risks`, `Risks:`, `### follow-up` and friends.
fn parse_heading(line: &str) -> Option<JudgeField> {
    let name = line.trim_start_matches('#').trim();
    let name = name.trim_end_matches(':').trim();
    section_field(name)
}

/// `winner: u2` switches the section and carries a value.
fn parse_key_value(line: &str) -> Option<(JudgeField, &str)> {
    let (key, value) = line.split_once(':')?;
    if key.is_empty() {
        return None;
    }
    Some((section_field(key)?, value.trim()))
}

fn is_bullet(line: &str) -> bool {
    line.starts_with("- ") || line.starts_with("* ") || is_numbered_bullet(line)
}

/// `12. text`
fn is_numbered_bullet(line: &str) -> bool {
    let digits = line.bytes().take_while(u8::is_ascii_digit).count();
    digits > 0 && line[digits..].starts_with(". ") && line.len() > digits + 2
}

fn strip_bullet_prefix(line: &str) -> &str {
    let line = line.trim();
    if let Some(rest) = line.strip_prefix("- ").or_else(|| line.strip_prefix("* ")) {
        return rest.trim();
    }
    if is_numbered_bullet(line)
        && let Some((_, rest)) = line.split_once(". ")
    {
        return rest.trim();
    }
    line
}

/// Trim whitespace and surrounding quote characters.
fn clean_judge_text(s: &str) -> String {
    s.trim().trim_matches(|c: char| c == '"' || c == '\'').trim().to_string()
}

/// Split on `;` only when that yields more than one non-empty part.
fn split_judge_list_value(value: &str) -> Vec<String> {
    let value = clean_judge_text(value);
    if value.is_empty() {
        return Vec::new();
    }
    if value.contains(';') {
        let parts: Vec<String> = value
            .split(';')
            .map(clean_judge_text)
            .filter(|p| !p.is_empty())
            .collect();
        if parts.len() > 1 {
            return parts;
        }
    }
    vec![value]
}

fn append_unique(dst: &mut Vec<String>, src: Vec<String>) {
    for item in src {
        let item = clean_judge_text(&item);
        if !item.is_empty() && !dst.contains(&item) {
            dst.push(item);
        }
    }
}

/// Interior of a fence wrapping the whole body (at least three lines).
fn strip_fence(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if !raw.starts_with("```") {
        return None;
    }
    let normalized = normalize_newlines(raw);
    let lines: Vec<&str> = normalized.split('\n').collect();
    if lines.len() < 3 {
        return None;
    }
    let last = lines[lines.len() - 1].trim();
    if !lines[0].trim().starts_with("```") || !last.starts_with("```") {
        return None;
    }
    Some(lines[1..lines.len() - 1].join("\n"))
}

/// Every balanced top-level `{...}` in the text, in order of appearance.
fn extract_json_objects(raw: &str) -> Vec<String> {
    let raw = normalize_newlines(raw);
    let bytes = raw.as_bytes();
    let mut out = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'{'
            && let Some(end) = scan_json_object(bytes, i)
        {
            out.push(raw[i..end].to_string());
            i = end;
            continue;
        }
        i += 1;
    }
    out
}

/// End (exclusive) of the object opening at `start`, ignoring braces inside strings.
fn scan_json_object(bytes: &[u8], start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (offset, &b) in bytes[start..].iter().enumerate() {
        if in_string {
            match b {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(start + offset + 1);
                }
            }
            _ => {}
        }
    }
    None
}
