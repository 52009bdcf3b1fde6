/// Expands `${dotted.key}` placeholders in a hook command template.
///
/// The template is scanned exactly once, left to right. A substituted
/// value is inserted verbatim and never re-expanded, and values are not
/// escaped in any way: a value that itself contains `${...}` ends up in
/// the command literally. Unknown placeholders are left untouched.
#[must_use]
pub fn expand_command(template: &str, values: &[(String, String)]) -> String {
    let mut expanded = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find("${") {
        expanded.push_str(&rest[..open]);
        let after_open = &rest[open + 2..];

        match after_open.find('}') {
            Some(close) => {
                let key = &after_open[..close];
                match values.iter().find(|(k, _)| k == key) {
                    Some((_, value)) => expanded.push_str(value),
                    None => {
                        expanded.push_str("${");
                        expanded.push_str(key);
                        expanded.push('}');
                    }
                }
                rest = &after_open[close + 1..];
            }
            None => {
                // Unterminated placeholder; keep the rest as-is.
                expanded.push_str(&rest[open..]);
                rest = "";
            }
        }
    }

    expanded.push_str(rest);
    expanded
}
