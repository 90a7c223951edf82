// Copyright 2026 The songtext Authors.
// This project is dual-licensed under Apache 2.0 and MIT terms.
// See LICENSE-APACHE and LICENSE-MIT for details.

//! Splits OpenSong lyrics into tagged sections.
//!
//! OpenSong lyrics look like this:
//!
//! ```text
//! [V1]
//! .G          C        G
//!  Amazing grace, how sweet the sound
//! ;Slowly
//!  That saved a wretch like me
//! ||
//!  I once was lost
//! ```
//!
//! A `[tag]` line starts a new section, lines starting with `.` are chords, lines starting with
//! `;` are comments, `||` forces a new slide and lyrics are indented by one space.

use crate::repeat::section_repeat;
use regex::Regex;
use std::sync::LazyLock;

static SECTION_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[([^\]]+)\]\s*$").unwrap());

/// A section of lyrics, before its tag is expanded and its repeats are expanded.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParsedSection {
    /// The tag as written in the section header, e.g. `V1`.
    pub tag: String,
    /// Lyric lines, with an empty line wherever a new slide should start.
    pub lines: Vec<String>,
    /// Whether the whole section is wrapped in a repeat, which has been removed from `lines`.
    pub is_repeat: bool,
    /// How many times the section is sung each time it appears in the arrangement.
    pub repeat_multiplier: u32,
}

impl ParsedSection {
    pub fn new<S: Into<String>>(tag: &str, lines: impl IntoIterator<Item = S>) -> Self {
        Self {
            tag: tag.to_owned(),
            lines: lines.into_iter().map(Into::into).collect(),
            is_repeat: false,
            repeat_multiplier: 1,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum LyricsLine<'a> {
    Chord,
    Comment,
    SlideBreak,
    Lyric(&'a str),
}

impl<'a> LyricsLine<'a> {
    fn classify(line: &'a str) -> Self {
        if line.starts_with('.') {
            Self::Chord
        } else if line.starts_with(';') {
            Self::Comment
        } else if line.trim() == "||" {
            Self::SlideBreak
        } else {
            // Lyrics should be indented by exactly one space, but accept them without.
            Self::Lyric(line.strip_prefix(' ').unwrap_or(line).trim_end())
        }
    }
}

enum State<'a> {
    Outside,
    InSection { tag: &'a str, lines: Vec<&'a str> },
}

/// Splits lyrics into sections at `[tag]` headers.
///
/// Lines before the first header are ignored, as are sections with no lyrics.
pub fn parse_sections(lyrics: &str) -> Vec<ParsedSection> {
    let mut sections = Vec::new();
    let mut state = State::Outside;
    for line in lyrics.lines() {
        if let Some(captures) = SECTION_HEADER.captures(line) {
            let tag = captures.get(1).map_or("", |tag| tag.as_str()).trim();
            let previous = std::mem::replace(
                &mut state,
                State::InSection {
                    tag,
                    lines: Vec::new(),
                },
            );
            if let State::InSection { tag, lines } = previous {
                sections.extend(finish_section(tag, &lines));
            }
        } else if let State::InSection { lines, .. } = &mut state {
            lines.push(line);
        }
    }
    if let State::InSection { tag, lines } = state {
        sections.extend(finish_section(tag, &lines));
    }
    sections
}

fn finish_section(tag: &str, raw_lines: &[&str]) -> Option<ParsedSection> {
    let lines = raw_lines
        .iter()
        .filter_map(|line| match LyricsLine::classify(line) {
            LyricsLine::Chord | LyricsLine::Comment => None,
            LyricsLine::SlideBreak => Some(""),
            LyricsLine::Lyric(lyric) => Some(lyric),
        })
        .collect::<Vec<_>>();
    let lines = trim_blank_lines(&lines);
    if lines.is_empty() {
        return None;
    }

    let mut section = ParsedSection::new(tag, lines.iter().copied());
    if let Some(repeat) = section_repeat(&lines.join("\n")) {
        section.lines = trim_blank_lines(&repeat.content.split('\n').collect::<Vec<_>>())
            .iter()
            .map(|line| (*line).to_owned())
            .collect();
        section.is_repeat = true;
        section.repeat_multiplier = repeat.multiplier;
    }
    if section.lines.is_empty() {
        None
    } else {
        Some(section)
    }
}

/// Removes blank lines from the start and end.
fn trim_blank_lines<'a, 'b>(lines: &'b [&'a str]) -> &'b [&'a str] {
    let start = lines
        .iter()
        .position(|line| !line.trim().is_empty())
        .unwrap_or(lines.len());
    let end = lines
        .iter()
        .rposition(|line| !line.trim().is_empty())
        .map_or(start, |last| last + 1);
    &lines[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sections() {
        let lyrics = "\
ignored before the first header
[V1]
.G          C        G
 Amazing grace, how sweet the sound
;Slowly
 That saved a wretch like me
||
 I once was lost

[C]
No leading space
";
        assert_eq!(
            parse_sections(lyrics),
            vec![
                ParsedSection::new(
                    "V1",
                    [
                        "Amazing grace, how sweet the sound",
                        "That saved a wretch like me",
                        "",
                        "I once was lost",
                    ]
                ),
                ParsedSection::new("C", ["No leading space"]),
            ]
        );
    }

    #[test]
    fn drops_empty_sections() {
        assert_eq!(
            parse_sections("[V1]\n.C G\n;comment\n\n[V2]\n\n words\n\n"),
            vec![ParsedSection::new("V2", ["words"])]
        );
    }

    #[test]
    fn no_sections() {
        assert_eq!(parse_sections(" just some words\n more words"), vec![]);
        assert_eq!(parse_sections(""), vec![]);
    }

    #[test]
    fn header_must_be_whole_line() {
        assert_eq!(
            parse_sections("[V1]\n [not a header]\n[C] with text"),
            vec![ParsedSection::new(
                "V1",
                ["[not a header]", "[C] with text"]
            )]
        );
    }

    #[test]
    fn tag_whitespace_trimmed() {
        assert_eq!(
            parse_sections("[ chorus 2 ]\n words"),
            vec![ParsedSection::new("chorus 2", ["words"])]
        );
    }

    #[test]
    fn section_repeat() {
        assert_eq!(
            parse_sections("[C]\n /: My chains are gone\n I've been set free :/ x3\n[V1]\n a /: b :/"),
            vec![
                ParsedSection {
                    tag: "C".to_string(),
                    lines: vec![
                        "My chains are gone".to_string(),
                        "I've been set free".to_string()
                    ],
                    is_repeat: true,
                    repeat_multiplier: 3,
                },
                ParsedSection::new("V1", ["a /: b :/"]),
            ]
        );
    }

    #[test]
    fn empty_section_repeat() {
        assert_eq!(parse_sections("[C]\n /: :/"), vec![]);
    }
}
