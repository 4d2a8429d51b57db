//! Identifier normalization.
//!
//! The entity store serializes foreign keys inconsistently: sometimes a bare
//! number, sometimes a composite display string with the numeric id embedded
//! at the end (`"ORD-2024-00042"`). Joins only work if every representation
//! collapses to the same canonical number.
//!
//! When a string carries more than one digit run, the *last* run wins. That
//! is the source system's id-in-string convention, preserved as-is; see
//! DESIGN.md for the stakeholder flag on its ambiguity.

use crate::types::EntityRef;

/// Extract the last contiguous ASCII digit run from `text` as a `u64`.
///
/// Returns `None` when no digit is present, or when the run does not fit in
/// a `u64` (an unresolvable reference, not an error).
#[must_use]
pub fn last_digit_run(text: &str) -> Option<u64> {
    let bytes = text.as_bytes();
    let mut end = bytes.len();
    while end > 0 && !bytes[end - 1].is_ascii_digit() {
        end -= 1;
    }
    if end == 0 {
        return None;
    }
    let mut start = end;
    while start > 0 && bytes[start - 1].is_ascii_digit() {
        start -= 1;
    }
    text[start..end].parse().ok()
}

/// Resolve an optional reference to its canonical numeric identifier.
///
/// Null/absent input yields `None`, never an error.
#[must_use]
pub fn resolve_ref(value: Option<&EntityRef>) -> Option<u64> {
    value.and_then(EntityRef::resolve)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn embedded_identifier_resolves() {
        assert_eq!(last_digit_run("ORD-2024-00042"), Some(42));
    }

    #[test]
    fn bare_number_resolves_to_itself() {
        assert_eq!(resolve_ref(Some(&EntityRef::Id(7))), Some(7));
    }

    #[test]
    fn absent_reference_is_unresolvable() {
        assert_eq!(resolve_ref(None), None);
    }

    #[test]
    fn digitless_string_is_unresolvable() {
        assert_eq!(last_digit_run("no-digits"), None);
        assert_eq!(last_digit_run(""), None);
    }

    #[test]
    fn last_digit_run_wins() {
        assert_eq!(last_digit_run("2024-order-17"), Some(17));
        assert_eq!(last_digit_run("a1b2c3"), Some(3));
    }

    #[test]
    fn trailing_noise_after_the_run_is_ignored() {
        assert_eq!(last_digit_run("ticket-55/"), Some(55));
    }

    #[test]
    fn oversized_run_is_unresolvable() {
        assert_eq!(last_digit_run("99999999999999999999999999"), None);
    }

    /// Split-based reference implementation of the same convention.
    fn reference_last_run(text: &str) -> Option<u64> {
        text.split(|c: char| !c.is_ascii_digit())
            .filter(|run| !run.is_empty())
            .next_back()
            .and_then(|run| run.parse().ok())
    }

    proptest! {
        #[test]
        fn matches_reference_implementation(text in ".{0,40}") {
            prop_assert_eq!(last_digit_run(&text), reference_last_run(&text));
        }

        #[test]
        fn resolves_any_embedded_id(prefix in "[^0-9]{0,10}", id in 0u64..1_000_000) {
            let text = format!("{prefix}{id}");
            prop_assert_eq!(last_digit_run(&text), Some(id));
        }
    }
}
