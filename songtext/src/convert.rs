// Copyright 2026 The songtext Authors.
// This project is dual-licensed under Apache 2.0 and MIT terms.
// See LICENSE-APACHE and LICENSE-MIT for details.

use crate::{
    arrangement::{build_arrangement, merge_sections},
    chunk::enforce_max_lines,
    raw::{self, SEPARATOR, slides_from_lines},
    repeat::expand_repeats,
    sections::parse_sections,
    song::SongPart,
    tags::{SectionKind, expand_tag},
};
use log::{debug, warn};

/// An OpenSong song converted to raw song text.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConvertedSong {
    pub name: String,
    pub raw: String,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConverterConfig {
    /// Slides with more lines than this are split.
    pub max_slide_lines: usize,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self { max_slide_lines: 2 }
    }
}

/// Converts an OpenSong song sheet to raw song text with the default configuration.
pub fn convert_opensong(content: &str, fallback_name: &str) -> ConvertedSong {
    convert_opensong_with(content, fallback_name, &ConverterConfig::default())
}

/// Converts an OpenSong song sheet to raw song text.
///
/// The song is named by its title, or `fallback_name` if it doesn't have one. If the lyrics don't
/// contain any sections then they are put in a single verse as they are, so nothing is lost.
/// Sheets which don't deserialise cleanly are read with [`opensong::read_leniently`], so invalid
/// XML keeps whatever was read before the error. Lines of lyrics which are just `---` are dropped,
/// as they would otherwise split the part in two.
pub fn convert_opensong_with(
    content: &str,
    fallback_name: &str,
    config: &ConverterConfig,
) -> ConvertedSong {
    let sheet = opensong::from_str(content).unwrap_or_else(|e| {
        warn!("Failed to parse OpenSong XML for \"{fallback_name}\", reading it leniently: {e}");
        opensong::read_leniently(content)
    });
    let name = sheet.title().unwrap_or(fallback_name).to_owned();

    let sections = parse_sections(&sheet.lyrics);
    debug!("Found {} sections in \"{name}\"", sections.len());
    if sections.is_empty() {
        let key = SectionKind::Verse.label();
        let lyrics = sheet
            .lyrics
            .split('\n')
            .filter(|line| !is_separator(line))
            .collect::<Vec<_>>()
            .join("\n");
        return ConvertedSong {
            raw: format!("{key}\n{lyrics}\n{SEPARATOR}\n{key}"),
            name,
        };
    }

    let sections = merge_sections(sections);
    let mut arrangement = build_arrangement(&sections, sheet.presentation());
    let mut parts = Vec::new();
    for section in &sections {
        let key = expand_tag(&section.tag);
        let expanded = expand_repeats(&section.lines.join("\n"));
        let lines = expanded
            .split('\n')
            .filter(|line| !is_separator(line))
            .collect::<Vec<_>>();
        let chunked = enforce_max_lines(&lines, config.max_slide_lines);
        let slides = slides_from_lines(chunked.iter().map(String::as_str));
        if slides.is_empty() {
            debug!("Dropping section {} as it has no lyrics", section.tag);
            arrangement.retain(|entry| *entry != key);
            continue;
        }
        parts.push(SongPart { key, slides });
    }

    ConvertedSong {
        raw: raw::format(&parts, &arrangement),
        name,
    }
}

/// Whether the line would read back as a part separator in raw song text.
fn is_separator(line: &str) -> bool {
    line.trim() == SEPARATOR
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{raw::parse, validate::validate};

    const SHEET: &str = concat!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n",
        "<song>\n",
        "  <title>Amazing Grace</title>\n",
        "  <author>John Newton</author>\n",
        "  <presentation>V1 C V2</presentation>\n",
        "  <lyrics>[V1]\n",
        ".G        C\n",
        " Amazing grace how sweet\n",
        " the sound that saved\n",
        " a wretch like me\n",
        ";slowly\n",
        "[C]\n",
        " /: My chains are gone\n",
        " I've been set free :/\n",
        "[V2]\n",
        " Sing it\n",
        " /: Praise :/ x3\n",
        "</lyrics>\n",
        "</song>\n",
    );

    #[test]
    fn convert() {
        let converted = convert_opensong(SHEET, "amazing-grace.xml");
        assert_eq!(
            converted,
            ConvertedSong {
                name: "Amazing Grace".to_string(),
                raw: "\
Verse1
Amazing grace how sweet
the sound that saved

a wretch like me
---
Chorus
My chains are gone
I've been set free
---
Verse2
Sing it
Praise

Praise
Praise
---
Verse1 Chorus Chorus Verse2"
                    .to_string(),
            }
        );

        let validation = validate(&converted.raw);
        assert!(validation.is_valid(), "{validation:?}");
        assert_eq!(validation.warnings, vec![]);
    }

    #[test]
    fn section_repeat_without_presentation() {
        let converted = convert_opensong(
            "<song><lyrics>[C]\n /: X\n Y :/\n[V1]\n a</lyrics></song>",
            "Song",
        );
        assert_eq!(converted.raw, "Chorus\nX\nY\n---\nVerse1\na\n---\nChorus Chorus Verse1");
    }

    #[test]
    fn section_repeat_in_presentation() {
        let converted = convert_opensong(
            "<song><presentation>C</presentation><lyrics>[C]\n /: X\n Y :/</lyrics></song>",
            "Song",
        );
        let song = parse("1", &converted.name, &converted.raw).unwrap();
        assert_eq!(song.arrangement, vec!["Chorus", "Chorus"]);
    }

    #[test]
    fn duplicate_tags_merged() {
        let converted = convert_opensong(
            "<song><lyrics>[V1]\n one\n[C]\n chorus\n[V1]\n two</lyrics></song>",
            "Song",
        );
        assert_eq!(
            converted.raw,
            "Verse1\none\n\ntwo\n---\nChorus\nchorus\n---\nVerse1 Chorus"
        );
    }

    #[test]
    fn fallback_name() {
        let converted = convert_opensong(
            "<song><title>  </title><lyrics>[V1]\n words</lyrics></song>",
            "file name",
        );
        assert_eq!(converted.name, "file name");
    }

    #[test]
    fn no_sections() {
        let converted = convert_opensong(
            "<song><title>Plain</title><lyrics>just words\nmore words</lyrics></song>",
            "Song",
        );
        assert_eq!(
            converted,
            ConvertedSong {
                name: "Plain".to_string(),
                raw: "Verse\njust words\nmore words\n---\nVerse".to_string(),
            }
        );
        let song = parse("1", &converted.name, &converted.raw).unwrap();
        assert_eq!(song.parts.len(), 1);
        assert_eq!(song.arrangement, vec!["Verse"]);
    }

    #[test]
    fn invalid_xml() {
        assert_eq!(
            convert_opensong("<song><lyrics>", "broken.xml"),
            ConvertedSong {
                name: "broken.xml".to_string(),
                raw: "Verse\n\n---\nVerse".to_string(),
            }
        );
    }

    #[test]
    fn empty_section_dropped_from_arrangement() {
        let converted = convert_opensong(
            "<song><presentation>V1 C V1</presentation><lyrics>[V1]\n a\n[C]\n /: /: :/ :/</lyrics></song>",
            "Song",
        );
        assert_eq!(converted.raw, "Verse1\na\n---\nVerse1 Verse1");
    }

    #[test]
    fn custom_slide_length() {
        let converted = convert_opensong_with(
            "<song><lyrics>[V1]\n a\n b\n c\n d</lyrics></song>",
            "Song",
            &ConverterConfig { max_slide_lines: 3 },
        );
        assert_eq!(converted.raw, "Verse1\na\nb\nc\n\nd\n---\nVerse1");
    }

    #[test]
    fn repeated_title_keeps_lyrics() {
        let converted = convert_opensong(
            "<song><title>A</title><title>B</title><lyrics>[V1]\n words</lyrics></song>",
            "f",
        );
        assert_eq!(
            converted,
            ConvertedSong {
                name: "A".to_string(),
                raw: "Verse1\nwords\n---\nVerse1".to_string(),
            }
        );
    }

    #[test]
    fn markup_in_title_keeps_lyrics() {
        let converted = convert_opensong(
            "<song><title>A <i>b</i></title><lyrics>[V1]\n words</lyrics></song>",
            "f",
        );
        assert_eq!(converted.name, "A b");
        assert_eq!(converted.raw, "Verse1\nwords\n---\nVerse1");
    }

    #[test]
    fn separator_lines_dropped() {
        let converted = convert_opensong(
            "<song><lyrics>[V1]\n a\n ---\n b</lyrics></song>",
            "Song",
        );
        assert_eq!(converted.raw, "Verse1\na\nb\n---\nVerse1");
        assert_eq!(parse("1", "", &converted.raw).unwrap().parts.len(), 1);

        let converted =
            convert_opensong("<song><lyrics>one\n---\ntwo</lyrics></song>", "Song");
        assert_eq!(converted.raw, "Verse\none\ntwo\n---\nVerse");
        assert_eq!(parse("1", "", &converted.raw).unwrap().parts.len(), 1);
    }
}
