//! Description cleanup for resolved entries.

const WORKED_ON: &str = "worked on ";

/// Strip a leading "Worked on <matter name>" from the entry text.
///
/// The comparison ignores case. Separators left behind (whitespace, commas,
/// periods, hyphens) are trimmed from the start of the remainder. Text that
/// does not start with the phrase is returned unchanged.
pub fn clean_description(text: &str, matter_name: &str) -> String {
    let prefix = format!("{WORKED_ON}{matter_name}");
    match strip_prefix_ignore_case(text, &prefix) {
        Some(rest) => rest
            .trim_start_matches(|c: char| c.is_whitespace() || matches!(c, ',' | '.' | '-'))
            .to_string(),
        None => text.to_string(),
    }
}

/// Case-insensitive `strip_prefix`, comparing one `char` at a time so that
/// case mappings that change byte length cannot split a character.
fn strip_prefix_ignore_case<'t>(text: &'t str, prefix: &str) -> Option<&'t str> {
    let mut rest = text.char_indices();
    for expected in prefix.chars() {
        let (_, actual) = rest.next()?;
        if !actual.to_lowercase().eq(expected.to_lowercase()) {
            return None;
        }
    }
    Some(rest.as_str())
}
