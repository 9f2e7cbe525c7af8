//! Informal keyword to catalog category lookup.

/// Mapping table. Many informal terms share one canonical category.
const CATEGORY_MAPPING: &[(&str, &str)] = &[
    ("laptop", "electronics"),
    ("notebook", "electronics"),
    ("phone", "electronics"),
    ("mobile", "electronics"),
    ("headphone", "electronics"),
    ("earbud", "electronics"),
    ("smartwatch", "electronics"),
    ("tablet", "electronics"),
    ("camera", "electronics"),
    ("tv", "electronics"),
    ("television", "electronics"),
];

fn lookup(token: &str) -> Option<&'static str> {
    CATEGORY_MAPPING
        .iter()
        .find(|(term, _)| *term == token)
        .map(|(_, category)| *category)
}

/// Category of the first token, in the caller's order, that has a mapping.
///
/// Tokens are expected to be lowercase already.
pub fn resolve_category<S: AsRef<str>>(tokens: &[S]) -> Option<&'static str> {
    tokens.iter().find_map(|t| lookup(t.as_ref()))
}
