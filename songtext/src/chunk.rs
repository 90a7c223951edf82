// Copyright 2026 The songtext Authors.
// This project is dual-licensed under Apache 2.0 and MIT terms.
// See LICENSE-APACHE and LICENSE-MIT for details.

/// Splits any slide with more than `max` lines into several slides of `max` lines each.
///
/// Slides are separated by blank lines in both the input and the output. Runs of blank lines are
/// collapsed into one, and blank lines at the start and end are removed. A `max` of 0 is treated
/// as 1.
pub fn enforce_max_lines<S: AsRef<str>>(lines: &[S], max: usize) -> Vec<String> {
    let max = max.max(1);
    let slides = lines
        .split(|line| line.as_ref().trim().is_empty())
        .filter(|slide| !slide.is_empty())
        .flat_map(|slide| slide.chunks(max));

    let mut chunked = Vec::new();
    for slide in slides {
        if !chunked.is_empty() {
            chunked.push(String::new());
        }
        chunked.extend(slide.iter().map(|line| line.as_ref().to_owned()));
    }
    chunked
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_long_slide() {
        assert_eq!(
            enforce_max_lines(&["a", "b", "c", "d"], 2),
            vec!["a", "b", "", "c", "d"]
        );
    }

    #[test]
    fn uneven_split() {
        assert_eq!(
            enforce_max_lines(&["a", "b", "c", "", "d"], 2),
            vec!["a", "b", "", "c", "", "d"]
        );
    }

    #[test]
    fn short_slides_unchanged() {
        assert_eq!(
            enforce_max_lines(&["a", "", "b", "c"], 2),
            vec!["a", "", "b", "c"]
        );
    }

    #[test]
    fn collapses_blank_lines() {
        assert_eq!(
            enforce_max_lines(&["", "a", "", " ", "", "b", ""], 3),
            vec!["a", "", "b"]
        );
    }

    #[test]
    fn zero_max() {
        assert_eq!(enforce_max_lines(&["a", "b"], 0), vec!["a", "", "b"]);
    }

    #[test]
    fn empty() {
        assert_eq!(enforce_max_lines::<&str>(&[], 2), Vec::<String>::new());
    }
}
