//! Key normalization
//!
//! Exported keys are namespaced as `<project>:<key>`. The destination stack
//! takes the key without the project segment, the same way the tool itself
//! splits a namespaced key at its first separator.

/// Separator between the project namespace and the rest of the key
pub const NAMESPACE_SEPARATOR: char = ':';

/// Strip the project namespace from a key
///
/// Everything after the first `:` is kept verbatim, including further
/// separators. A key without a separator is returned unchanged, and a key
/// ending in its only separator normalizes to the empty string.
pub fn normalize(key: &str) -> &str {
    match key.split_once(NAMESPACE_SEPARATOR) {
        Some((_project, rest)) => rest,
        None => key,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_project_namespace() {
        assert_eq!(normalize("myproj:db:host"), "db:host");
        assert_eq!(normalize("aws:region"), "region");
    }

    #[test]
    fn test_keeps_later_separators() {
        assert_eq!(normalize("proj:rest:more"), "rest:more");
        assert_eq!(normalize("proj::double"), ":double");
    }

    #[test]
    fn test_key_without_separator_is_unchanged() {
        for key in ["plain", "", "with space", "dotted.key"] {
            assert_eq!(normalize(key), key);
        }
    }

    #[test]
    fn test_trailing_separator_yields_empty_key() {
        assert_eq!(normalize("proj:"), "");
        assert_eq!(normalize(":"), "");
    }

    #[test]
    fn test_leading_separator_drops_empty_namespace() {
        assert_eq!(normalize(":key"), "key");
    }
}
