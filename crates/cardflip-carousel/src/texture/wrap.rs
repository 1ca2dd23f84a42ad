/// Greedy word wrap.
///
/// Words are split on single spaces. A word starts a new line when the
/// current line plus that word (and a trailing space) measures wider than
/// `max_width`; the first word always stays on the first line, and a single
/// word wider than `max_width` is never broken. Lines are returned trimmed.
///
/// `measure` returns the advance width of a string in the same unit as
/// `max_width`.
pub fn wrap_text<F>(text: &str, max_width: f32, measure: F) -> Vec<String>
where
    F: Fn(&str) -> f32,
{
    let mut lines = Vec::new();
    let mut line = String::new();

    for (n, word) in text.split(' ').enumerate() {
        let mut candidate = String::with_capacity(line.len() + word.len() + 1);
        candidate.push_str(&line);
        candidate.push_str(word);
        candidate.push(' ');

        if measure(&candidate) > max_width && n > 0 {
            lines.push(line.trim().to_string());
            line.clear();
            line.push_str(word);
            line.push(' ');
        } else {
            line = candidate;
        }
    }
    lines.push(line.trim().to_string());

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    // One unit per char.
    fn mono(s: &str) -> f32 {
        s.chars().count() as f32
    }

    #[test]
    fn breaks_before_the_word_that_overflows() {
        let lines = wrap_text("the quick brown fox", 11.0, mono);
        assert_eq!(lines, vec!["the quick", "brown fox"]);
    }

    #[test]
    fn trailing_space_counts_against_the_width() {
        // "ab cd " is 6 wide.
        assert_eq!(wrap_text("ab cd", 5.0, mono), vec!["ab", "cd"]);
        assert_eq!(wrap_text("ab cd", 6.0, mono), vec!["ab cd"]);
    }

    #[test]
    fn long_words_overflow_instead_of_breaking() {
        let lines = wrap_text("supercalifragilistic is long", 6.0, mono);
        assert_eq!(lines, vec!["supercalifragilistic", "is", "long"]);
    }

    #[test]
    fn empty_text_yields_one_empty_line() {
        assert_eq!(wrap_text("", 10.0, mono), vec![""]);
    }

    #[test]
    fn every_word_survives_in_order() {
        let text = "Automates prior authorizations with AI agents and tracks status";
        let lines = wrap_text(text, 20.0, mono);
        assert_eq!(lines.join(" "), text);
        assert!(lines.iter().all(|l| mono(l) <= 20.0));
    }
}
