//! Label → source line lookup.

/// Split source text into lines on `'\n'`.
///
/// A trailing `'\r'` stays part of its line, and a trailing newline yields a
/// final empty line, matching how the textarea value is split in the browser.
pub fn split_lines(text: &str) -> Vec<&str> {
    text.split('\n').collect()
}

/// Find the first line containing `label`, case-insensitively.
///
/// Lines are scanned top to bottom and the first hit wins, even when a later
/// line is a better match: a label that also occurs in an earlier, unrelated
/// line jumps there. An empty label never matches.
#[must_use]
pub fn locate_line<S: AsRef<str>>(label: &str, lines: &[S]) -> Option<usize> {
    if label.is_empty() {
        return None;
    }

    let needle = label.to_lowercase();
    lines
        .iter()
        .position(|line| line.as_ref().to_lowercase().contains(&needle))
}

/// [`locate_line`] over a flattened document.
#[must_use]
pub fn locate_in_text(label: &str, text: &str) -> Option<usize> {
    locate_line(label, &split_lines(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEQUENCE: &[&str] = &[
        "@startuml",
        "Alice -> Bob: Hello",
        "Bob --> Alice: Hi",
        "@enduml",
    ];

    #[test]
    fn finds_first_matching_line() {
        assert_eq!(locate_line("Bob", SEQUENCE), Some(1));
        assert_eq!(locate_line("Hi", SEQUENCE), Some(2));
    }

    #[test]
    fn first_match_wins_over_better_match() {
        let lines = ["note: talk to Bobby later", "participant Bob"];
        assert_eq!(locate_line("Bob", &lines), Some(0));
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(locate_line("ALICE", SEQUENCE), Some(1));
        assert_eq!(locate_line("startUML", SEQUENCE), Some(0));
    }

    #[test]
    fn missing_label_is_not_found() {
        assert_eq!(locate_line("Carol", SEQUENCE), None);
        assert_eq!(locate_line("Carol", &[] as &[&str]), None);
    }

    #[test]
    fn empty_label_never_matches() {
        assert_eq!(locate_line("", SEQUENCE), None);
    }

    #[test]
    fn non_ascii_labels_match() {
        let lines = ["@startuml", "class 动物 {", "Ärger -> Öl"];
        assert_eq!(locate_line("动物", &lines), Some(1));
        assert_eq!(locate_line("ärger", &lines), Some(2));
    }

    #[test]
    fn locate_in_flattened_text() {
        assert_eq!(locate_in_text("bob", "A\r\nB -> bob\n"), Some(1));
        assert_eq!(split_lines("a\n"), vec!["a", ""]);
    }
}
