use semver::Version;

/// Replaces the value of the first `"version": "..."` field with
/// `new_version`, preserving every other byte of the document. Returns
/// `None` when no such field exists.
///
/// This is deliberately a textual substitution rather than a JSON
/// round-trip: the version file belongs to the user and its formatting
/// must survive untouched.
#[must_use]
pub fn rewrite_version_field(text: &str, new_version: &Version) -> Option<String> {
    let field = text.find("\"version\"")?;
    let after_field = &text[field + "\"version\"".len()..];

    let colon = after_field.find(':')?;
    let after_colon = &after_field[colon + 1..];

    let quote_offset = after_colon.find('"')?;
    let value_start = field + "\"version\"".len() + colon + 1 + quote_offset + 1;

    let value_len = text[value_start..].find('"')?;

    let mut rewritten = String::with_capacity(text.len() + 8);
    rewritten.push_str(&text[..value_start]);
    rewritten.push_str(&new_version.to_string());
    rewritten.push_str(&text[value_start + value_len..]);

    Some(rewritten)
}
