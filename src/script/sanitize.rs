// Fence-marker sanitization for model-authored code

/// Strip presentation artifacts from a model-authored code string.
///
/// Drops every line whose trimmed form starts with a code-fence marker
/// (including any language tag on the opening fence) and trims surrounding
/// blank space. Best-effort: malformed input degrades to a plain strip and
/// never fails. Idempotent.
pub fn sanitize(raw: &str) -> String {
    raw.lines()
        .filter(|line| !line.trim_start().starts_with("```"))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}
