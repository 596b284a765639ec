//! Content kinds carried on universe output ports and handoff edges.
//!
//! Kinds are `category/name` strings. Free-text kinds from configuration
//! are resolved through [`normalize_kind`], which accepts the canonical
//! string, any registered alias, and `_` / `.` in place of `/`.

/// Generic kind used when a universe does not declare (or mis-declares) its output.
pub const SUMMARY_TEXT: &str = "summary/text";

/// Kind declared by the compiled handoff block.
pub const CONTEXT_COMPILED: &str = "context/compiled";

/// Kind declared by the judge comparison request.
pub const PLAN_SUMMARY: &str = "plan/summary";

struct KindDef {
    kind: &'static str,
    aliases: &'static [&'static str],
}

const REGISTRY: &[KindDef] = &[
    KindDef { kind: "text/plain", aliases: &["text", "plain"] },
    KindDef { kind: "text/markdown", aliases: &["md", "markdown"] },
    KindDef { kind: "text/diff", aliases: &["diff", "patch"] },
    KindDef { kind: "text/prompt", aliases: &["prompt"] },
    KindDef { kind: "code/rust", aliases: &["rs", "rust"] },
    KindDef { kind: "code/go", aliases: &["go"] },
    KindDef { kind: "code/ts", aliases: &["ts", "typescript"] },
    KindDef { kind: "code/python", aliases: &["py", "python"] },
    KindDef { kind: "json/value", aliases: &["json"] },
    KindDef { kind: "json/object", aliases: &[] },
    KindDef { kind: "plan/task", aliases: &["task"] },
    KindDef { kind: PLAN_SUMMARY, aliases: &["plan"] },
    KindDef { kind: "diagnostic/lint", aliases: &["lint"] },
    KindDef { kind: "diagnostic/test", aliases: &["test_result"] },
    KindDef { kind: "diagnostic/build", aliases: &["build_result"] },
    KindDef { kind: "summary/code", aliases: &["code_summary"] },
    KindDef { kind: SUMMARY_TEXT, aliases: &["text_summary", "summary"] },
    KindDef { kind: "summary/api", aliases: &["api_summary"] },
    KindDef { kind: "memory/fact", aliases: &["fact"] },
    KindDef { kind: "message/agent", aliases: &["agent_message"] },
    KindDef { kind: CONTEXT_COMPILED, aliases: &["compiled_context"] },
];

fn normalize(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .replace(['_', '.'], "/")
        .replace(' ', "")
}

/// Resolve a raw kind string to its canonical form.
///
/// Returns `None` for blank or unregistered kinds.
pub fn normalize_kind(raw: &str) -> Option<&'static str> {
    let wanted = normalize(raw);
    if wanted.is_empty() {
        return None;
    }
    REGISTRY
        .iter()
        .find(|def| {
            normalize(def.kind) == wanted || def.aliases.iter().any(|a| normalize(a) == wanted)
        })
        .map(|def| def.kind)
}

/// Whether `raw` resolves to a registered kind.
pub fn is_known_kind(raw: &str) -> bool {
    normalize_kind(raw).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_passes_through() {
        assert_eq!(normalize_kind("summary/code"), Some("summary/code"));
        assert_eq!(normalize_kind("diagnostic/test"), Some("diagnostic/test"));
    }

    #[test]
    fn test_separator_and_case_variants() {
        assert_eq!(normalize_kind("Summary.Text"), Some(SUMMARY_TEXT));
        assert_eq!(normalize_kind("context_compiled"), Some(CONTEXT_COMPILED));
    }

    #[test]
    fn test_aliases() {
        assert_eq!(normalize_kind("md"), Some("text/markdown"));
        assert_eq!(normalize_kind("text_summary"), Some(SUMMARY_TEXT));
    }

    #[test]
    fn test_unknown_and_blank() {
        assert_eq!(normalize_kind("  "), None);
        assert!(!is_known_kind("video/mp4"));
    }
}
