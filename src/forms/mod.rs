pub mod categories;
pub mod coupons;
pub mod newsletter;

/// Trims the input, drops control characters and squeezes whitespace runs
/// into a single space.
pub(crate) fn collapse_whitespace(input: &str) -> String {
    input
        .split_whitespace()
        .map(|word| word.chars().filter(|ch| !ch.is_control()).collect::<String>())
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Cleans every line like [`collapse_whitespace`] and keeps at most one blank
/// line between paragraphs.
pub(crate) fn tidy_paragraphs(input: &str) -> String {
    let mut paragraphs: Vec<String> = Vec::new();
    let mut pending_break = false;

    for line in input.lines().map(collapse_whitespace) {
        if line.is_empty() {
            pending_break = !paragraphs.is_empty();
            continue;
        }
        if pending_break {
            paragraphs.push(String::new());
            pending_break = false;
        }
        paragraphs.push(line);
    }

    paragraphs.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapse_whitespace_squeezes_runs() {
        assert_eq!(collapse_whitespace("  a \t b\u{7}c  "), "a bc");
        assert_eq!(collapse_whitespace(" \n "), "");
    }

    #[test]
    fn tidy_paragraphs_keeps_single_blank_lines() {
        assert_eq!(tidy_paragraphs("\n\n one \n\n\n two\nthree \n\n"), "one\n\ntwo\nthree");
    }
}
