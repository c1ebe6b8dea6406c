//! Shared text helpers for search and author display.

/// Format an author's display name from a stored full name / pseudonym pair.
///
/// Prefers "Full Name (Pseudonym)" when both are present, the full name when
/// only that is set, the pseudonym alone otherwise, and an empty string when
/// neither is populated.
pub fn display_name(full_name: &str, pseudonym: &str) -> String {
    if !full_name.is_empty() {
        if !pseudonym.is_empty() {
            format!("{full_name} ({pseudonym})")
        } else {
            full_name.to_string()
        }
    } else {
        pseudonym.to_string()
    }
}

/// Format an author's display name from its constituent parts.
///
/// The full-name form requires both first and last name; an author with only
/// a pseudonym falls back to that.
pub fn display_name_from_parts(
    first_name: Option<&str>,
    last_name: Option<&str>,
    pseudonym: Option<&str>,
) -> String {
    match (first_name, last_name) {
        (Some(first), Some(last)) if !first.is_empty() && !last.is_empty() => match pseudonym {
            Some(p) if !p.is_empty() => format!("{first} {last} ({p})"),
            _ => format!("{first} {last}"),
        },
        _ => pseudonym.unwrap_or_default().to_string(),
    }
}

/// Join first and last name into the single full-name string the author
/// index stores. Missing parts are skipped.
pub fn full_name(first_name: Option<&str>, last_name: Option<&str>) -> String {
    [first_name, last_name]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Strip punctuation from a search term before query construction, so
/// "great, escape" and "great escape" build the same query.
///
/// Keeps only alphanumerics and whitespace. Indexed titles are tokenized on
/// non-alphanumeric boundaries, so punctuation and symbols (ASCII or
/// Unicode) can never appear inside an indexed term; dropping them from the
/// query keeps both sides of the match aligned.
pub fn remove_punctuation(input: &str) -> String {
    input
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_prefers_full_name_with_pseudonym() {
        assert_eq!(display_name("Jane Doe", "JD"), "Jane Doe (JD)");
        assert_eq!(display_name("Jane Doe", ""), "Jane Doe");
        assert_eq!(display_name("", "JD Mystery"), "JD Mystery");
        assert_eq!(display_name("", ""), "");
    }

    #[test]
    fn display_name_from_parts_requires_both_names() {
        assert_eq!(
            display_name_from_parts(Some("Jane"), Some("Doe"), Some("JD")),
            "Jane Doe (JD)"
        );
        assert_eq!(
            display_name_from_parts(Some("Jane"), Some("Doe"), None),
            "Jane Doe"
        );
        // First name alone is not enough for the full-name form.
        assert_eq!(display_name_from_parts(Some("Jane"), None, Some("JD")), "JD");
        assert_eq!(display_name_from_parts(None, None, None), "");
    }

    #[test]
    fn full_name_skips_missing_parts() {
        assert_eq!(full_name(Some("Jane"), Some("Doe")), "Jane Doe");
        assert_eq!(full_name(None, Some("Doe")), "Doe");
        assert_eq!(full_name(Some(""), Some("Doe")), "Doe");
        assert_eq!(full_name(None, None), "");
    }

    #[test]
    fn remove_punctuation_keeps_words_and_spaces() {
        assert_eq!(remove_punctuation("the great, escape!"), "the great escape");
        assert_eq!(remove_punctuation(""), "");
    }

    #[test]
    fn remove_punctuation_strips_unicode_punctuation_and_symbols() {
        assert_eq!(remove_punctuation("«great» — escape…"), "great  escape");
        assert_eq!(remove_punctuation("c++ = fun"), "c  fun");
    }
}
