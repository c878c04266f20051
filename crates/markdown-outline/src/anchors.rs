/// Derive a link anchor from header text: lowercase, whitespace runs become a
/// single hyphen, leading and trailing hyphens are removed.
///
/// Repeated header text yields repeated anchors; no suffixes are added.
pub fn slugify(text: &str) -> String {
    let lowered = text.to_lowercase();
    let hyphenated = lowered.split_whitespace().collect::<Vec<_>>().join("-");
    hyphenated.trim_matches('-').to_string()
}
