// Copyright 2026 The songtext Authors.
// This project is dual-licensed under Apache 2.0 and MIT terms.
// See LICENSE-APACHE and LICENSE-MIT for details.

use std::fmt::{self, Display, Formatter};

/// The kinds of section with a conventional name.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum SectionKind {
    Verse,
    Chorus,
    Bridge,
    PreChorus,
    Tag,
    Ending,
    Intro,
    Outro,
}

impl SectionKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Verse => "Verse",
            Self::Chorus => "Chorus",
            Self::Bridge => "Bridge",
            Self::PreChorus => "Pre-Chorus",
            Self::Tag => "Tag",
            Self::Ending => "Ending",
            Self::Intro => "Intro",
            Self::Outro => "Outro",
        }
    }

    /// Returns the kind abbreviated by the given letter, ignoring case.
    pub fn from_letter(letter: char) -> Option<Self> {
        match letter.to_ascii_uppercase() {
            'V' => Some(Self::Verse),
            'C' => Some(Self::Chorus),
            'B' => Some(Self::Bridge),
            'P' => Some(Self::PreChorus),
            'T' => Some(Self::Tag),
            'E' => Some(Self::Ending),
            'I' => Some(Self::Intro),
            'O' => Some(Self::Outro),
            _ => None,
        }
    }

    /// Returns the kind with the given name, ignoring case.
    pub fn from_word(word: &str) -> Option<Self> {
        match word.to_lowercase().as_str() {
            "verse" => Some(Self::Verse),
            "chorus" => Some(Self::Chorus),
            "bridge" => Some(Self::Bridge),
            "pre-chorus" => Some(Self::PreChorus),
            "tag" => Some(Self::Tag),
            "ending" => Some(Self::Ending),
            "intro" => Some(Self::Intro),
            "outro" => Some(Self::Outro),
            _ => None,
        }
    }
}

impl Display for SectionKind {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Expands a section tag such as `V1`, `C`, `2` or `chorus 2` into a part key such as `Verse1`,
/// `Chorus`, `Verse2` or `Chorus2`.
///
/// Tags which aren't recognised are capitalised. The result never contains whitespace.
pub fn expand_tag(tag: &str) -> String {
    let tag = tag.trim();
    let word = tag.trim_end_matches(|c: char| c.is_ascii_digit());
    let number = &tag[word.len()..];
    let word = word.trim_end();

    if word.is_empty() {
        return format!("{}{number}", SectionKind::Verse);
    }

    let mut letters = word.chars();
    let kind = match (letters.next(), letters.next()) {
        (Some(letter), None) => SectionKind::from_letter(letter),
        _ => None,
    }
    .or_else(|| SectionKind::from_word(word));
    if let Some(kind) = kind {
        return format!("{kind}{number}");
    }

    let mut letters = word.chars().filter(|c| !c.is_whitespace());
    let capitalised = letters
        .next()
        .map(|first| first.to_uppercase().chain(letters).collect::<String>())
        .unwrap_or_default();
    format!("{capitalised}{number}")
}
