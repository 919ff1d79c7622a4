//! Candidate identifier normalization.
//!
//! A candidate's display name is normalized into a `safe_name`, the
//! join key shared by the presence registry, the signaling table, and
//! the persisted submission record.

/// Normalize a display name into a safe identifier.
///
/// Rules:
/// - ASCII letters are lowercased; digits pass through.
/// - Every maximal run of non-alphanumeric characters (spaces,
///   punctuation, anything else) collapses to a single `_`.
/// - Leading and trailing runs are dropped entirely.
///
/// The function is idempotent: applying it to its own output yields
/// the same value.
///
/// # Examples
///
/// ```
/// use invigil_core::naming::safe_name;
///
/// assert_eq!(safe_name("John Doe!"), "john_doe");
/// assert_eq!(safe_name("  A--B  "), "a_b");
/// assert_eq!(safe_name("john_doe"), "john_doe");
/// ```
pub fn safe_name(display_name: &str) -> String {
    let mut out = String::with_capacity(display_name.len());
    let mut pending_separator = false;

    for c in display_name.chars() {
        if c.is_alphanumeric() {
            if pending_separator && !out.is_empty() {
                out.push('_');
            }
            pending_separator = false;
            for lower in c.to_lowercase() {
                out.push(lower);
            }
        } else {
            pending_separator = true;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_name() {
        assert_eq!(safe_name("John Doe"), "john_doe");
    }

    #[test]
    fn trailing_punctuation() {
        assert_eq!(safe_name("John Doe!"), "john_doe");
    }

    #[test]
    fn leading_and_trailing_runs_trimmed() {
        assert_eq!(safe_name("  A--B  "), "a_b");
    }

    #[test]
    fn idempotent_on_normalized_input() {
        assert_eq!(safe_name("john_doe"), "john_doe");
        let once = safe_name("!!Ada   Lovelace?!");
        assert_eq!(safe_name(&once), once);
    }

    #[test]
    fn mixed_punctuation_collapses_to_one_separator() {
        assert_eq!(safe_name("a .-, b"), "a_b");
        assert_eq!(safe_name("Mary-Jane O'Brien"), "mary_jane_o_brien");
    }

    #[test]
    fn digits_pass_through() {
        assert_eq!(safe_name("Agent 007"), "agent_007");
    }

    #[test]
    fn uppercase_lowered() {
        assert_eq!(safe_name("ALICE"), "alice");
    }

    #[test]
    fn empty_and_all_punctuation() {
        assert_eq!(safe_name(""), "");
        assert_eq!(safe_name("!!! ---"), "");
    }

    #[test]
    fn unicode_letters_kept() {
        assert_eq!(safe_name("Jürgen Çelik"), "jürgen_çelik");
    }
}
