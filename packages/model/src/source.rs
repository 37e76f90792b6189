//! Source references of the form `.../<name>@<version>...`

/// Derive a template name from a clause source reference.
///
/// Takes the text after the last `/` and before the first `@`. The slicing
/// is best effort: a reference without `@` loses its final character, and a
/// reference whose `@` precedes the last `/` yields an empty name. Neither
/// case is an error here; the name simply fails to resolve later.
pub fn extract_template_name(src: &str) -> &str {
    let start = src.rfind('/').map(|i| i + 1).unwrap_or(0);
    let end = match src.find('@') {
        Some(i) => i,
        None => src.char_indices().last().map(|(i, _)| i).unwrap_or(0),
    };

    if end <= start {
        ""
    } else {
        &src[start..end]
    }
}
