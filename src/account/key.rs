//! Lookup key derivation for display names.

/// Normalize a display name into a case-insensitive lookup key.
///
/// Surrounding whitespace is dropped, inner whitespace runs collapse to a
/// single space and the result is lowercased. Blank input gives an empty key.
pub fn name_key(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Acme Corp", "acme corp")]
    #[case("  Acme   Corp  ", "acme corp")]
    #[case("ACME\tCorp\n", "acme corp")]
    #[case("Énergie Verte", "énergie verte")]
    #[case("already lower", "already lower")]
    #[case("", "")]
    #[case("   ", "")]
    fn test_name_key(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(name_key(input), expected);
    }

    #[rstest]
    #[case("Acme Corp")]
    #[case("  MiXeD   case\u{00a0}Name ")]
    #[case("ΣΊΣΥΦΟΣ")]
    #[case("")]
    fn test_name_key_idempotent(#[case] input: &str) {
        let once = name_key(input);
        assert_eq!(name_key(&once), once);
    }

    #[test]
    fn test_name_key_deterministic() {
        assert_eq!(name_key("Acme Corp"), name_key("Acme Corp"));
    }
}
