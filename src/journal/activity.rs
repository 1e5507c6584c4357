/// Form used to decide whether two activity labels mean the same thing: trimmed, lower-cased and
/// with every whitespace run replaced by a single hyphen. It is never shown to the user.
pub fn canonical_activity(label: &str) -> String {
    label
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

/// Finds the display form of an already known activity matching `label`.
pub fn find_activity<'a>(activities: &'a [String], label: &str) -> Option<&'a String> {
    let canonical = canonical_activity(label);
    activities
        .iter()
        .find(|existing| canonical_activity(existing) == canonical)
}

#[cfg(test)]
mod tests {
    use super::{canonical_activity, find_activity};

    #[test]
    fn canonical_form() {
        assert_eq!(canonical_activity("  Deep \t Work\n"), "deep-work");
        assert_eq!(canonical_activity("work"), "work");
        assert_eq!(canonical_activity("Side-Project"), "side-project");
        assert_eq!(canonical_activity("   "), "");
    }

    #[test]
    fn hyphen_and_space_collide() {
        // the canonical form does not tell these apart, so neither does deduplication
        assert_eq!(canonical_activity("deep work"), canonical_activity("Deep-Work"));
    }

    #[test]
    fn finds_first_display_form() {
        let activities = vec!["Work".to_string(), "study".to_string()];
        assert_eq!(find_activity(&activities, " WORK "), Some(&activities[0]));
        assert_eq!(find_activity(&activities, "reading"), None);
    }
}
