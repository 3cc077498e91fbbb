// src/extract/flatten.rs

/// Flatten a (possibly multi-level) column header into a normalized field
/// name: join non-empty parts with `_`, lower-case, spaces become `_`.
///
/// Pure and idempotent: flattening an already-flat name returns it unchanged.
pub fn flatten_parts<S: AsRef<str>>(parts: &[S]) -> String {
    parts
        .iter()
        .map(|p| p.as_ref().trim())
        .filter(|p| !p.is_empty())
        .map(|p| p.to_lowercase().replace(' ', "_"))
        .collect::<Vec<_>>()
        .join("_")
}

/// Single-level convenience wrapper.
pub fn flatten_name(name: &str) -> String {
    flatten_parts(&[name])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_multi_level_parts_with_underscores() {
        assert_eq!(flatten_parts(&["Name", "Full"]), "name_full");
    }

    #[test]
    fn single_level_is_lowercased() {
        assert_eq!(flatten_name("Country"), "country");
    }

    #[test]
    fn spaces_become_underscores() {
        assert_eq!(flatten_name("Date of birth"), "date_of_birth");
        assert_eq!(flatten_parts(&["Born", "Date of birth"]), "born_date_of_birth");
    }

    #[test]
    fn empty_parts_are_dropped() {
        assert_eq!(flatten_parts(&["", "Office", ""]), "office");
        assert_eq!(flatten_parts::<&str>(&[]), "");
    }

    #[test]
    fn idempotent_on_already_flat_names() {
        let once = flatten_name("Date of birth");
        assert_eq!(flatten_name(&once), once);
        assert_eq!(flatten_name("name_full"), "name_full");
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        assert_eq!(flatten_parts(&[" Name ", " Full "]), "name_full");
    }
}
