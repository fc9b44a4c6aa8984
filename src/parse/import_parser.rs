/// One parsed line of an import file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportEntry {
    /// Task text (required)
    pub text: String,
    /// Optional description (empty when the line has no `|` part)
    pub description: String,
}

/// Parse import text: one task per non-blank line, with an optional
/// pipe-delimited description (`name | description`). Both parts are
/// trimmed; anything past a second `|` is ignored; lines whose name part is
/// empty are skipped.
pub fn parse_import(raw: &str) -> Vec<ImportEntry> {
    raw.lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let mut parts = line.split('|');
            let text = parts.next().unwrap_or("").trim();
            if text.is_empty() {
                return None;
            }
            let description = parts.next().map(str::trim).unwrap_or("").to_string();
            Some(ImportEntry {
                text: text.to_string(),
                description,
            })
        })
        .collect()
}
