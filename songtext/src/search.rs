// Copyright 2026 The songtext Authors.
// This project is dual-licensed under Apache 2.0 and MIT terms.
// See LICENSE-APACHE and LICENSE-MIT for details.

use regex::Regex;
use std::sync::LazyLock;

static TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\w+(?:-\w+)*").unwrap());

/// Replaces Romanian letters with diacritics by their plain ASCII counterparts.
///
/// Both the comma-below and the older cedilla forms of ș and ț are handled.
fn fold_diacritics(c: char) -> char {
    match c {
        'ă' | 'â' => 'a',
        'î' => 'i',
        'ș' | 'ş' => 's',
        'ț' | 'ţ' => 't',
        _ => c,
    }
}

/// Lowercases and folds the given text and splits it into words, keeping hyphenated words whole.
pub fn search_tokens(text: &str) -> Vec<String> {
    let folded = text
        .to_lowercase()
        .chars()
        .map(fold_diacritics)
        .collect::<String>();
    TOKEN
        .find_iter(&folded)
        .map(|token| token.as_str().to_owned())
        .collect()
}

/// Builds the normalised text used to search for a song from its name and lyric lines.
pub fn search_text<'a>(name: &str, lines: impl IntoIterator<Item = &'a str>) -> String {
    let mut tokens = search_tokens(name);
    for line in lines {
        tokens.extend(search_tokens(line));
    }
    tokens.join(" ")
}
