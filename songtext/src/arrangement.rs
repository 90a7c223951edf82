// Copyright 2026 The songtext Authors.
// This project is dual-licensed under Apache 2.0 and MIT terms.
// See LICENSE-APACHE and LICENSE-MIT for details.

use crate::{repeat::MAX_MULTIPLIER, sections::ParsedSection, tags::expand_tag};
use std::iter::repeat_n;

/// Merges sections with the same tag into the first one, keeping them in the order they were
/// first seen.
///
/// The lines of later sections are added as new slides. If any of the merged sections is a
/// whole-section repeat then so is the result, with the largest multiplier.
pub fn merge_sections(sections: Vec<ParsedSection>) -> Vec<ParsedSection> {
    let mut merged: Vec<ParsedSection> = Vec::new();
    for section in sections {
        if let Some(existing) = merged
            .iter_mut()
            .find(|existing| existing.tag == section.tag)
        {
            existing.lines.push(String::new());
            existing.lines.extend(section.lines);
            if section.is_repeat {
                existing.repeat_multiplier = if existing.is_repeat {
                    existing.repeat_multiplier.max(section.repeat_multiplier)
                } else {
                    section.repeat_multiplier
                };
                existing.is_repeat = true;
            }
        } else {
            merged.push(section);
        }
    }
    merged
}

/// Returns the part keys in the order they should be sung.
///
/// This comes from the space-separated `presentation` tags if there are any, or else the order
/// the sections are defined in. Sections which repeat as a whole are listed once per repeat.
pub fn build_arrangement(sections: &[ParsedSection], presentation: Option<&str>) -> Vec<String> {
    let order = match presentation.map(str::trim).filter(|order| !order.is_empty()) {
        Some(order) => order.split_whitespace().map(expand_tag).collect::<Vec<_>>(),
        None => sections
            .iter()
            .map(|section| expand_tag(&section.tag))
            .collect(),
    };

    let repeats = sections
        .iter()
        .filter(|section| section.is_repeat && section.repeat_multiplier > 1)
        .map(|section| (expand_tag(&section.tag), section.repeat_multiplier))
        .collect::<Vec<_>>();

    order
        .into_iter()
        .flat_map(|key| {
            let count = repeats
                .iter()
                .find(|(repeated_key, _)| *repeated_key == key)
                .map_or(1, |&(_, multiplier)| multiplier.min(MAX_MULTIPLIER) as usize);
            repeat_n(key, count)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repeated(tag: &str, lines: &[&str], multiplier: u32) -> ParsedSection {
        ParsedSection {
            is_repeat: true,
            repeat_multiplier: multiplier,
            ..ParsedSection::new(tag, lines.iter().copied())
        }
    }

    #[test]
    fn merge() {
        let merged = merge_sections(vec![
            ParsedSection::new("V1", ["a"]),
            ParsedSection::new("C", ["x"]),
            ParsedSection::new("V1", ["b", "c"]),
        ]);
        assert_eq!(
            merged,
            vec![
                ParsedSection::new("V1", ["a", "", "b", "c"]),
                ParsedSection::new("C", ["x"]),
            ]
        );
    }

    #[test]
    fn merge_keeps_largest_repeat() {
        let merged = merge_sections(vec![
            repeated("C", &["x"], 3),
            ParsedSection::new("C", ["y"]),
            repeated("C", &["z"], 2),
        ]);
        assert_eq!(merged, vec![repeated("C", &["x", "", "y", "", "z"], 3)]);

        let merged = merge_sections(vec![
            ParsedSection::new("C", ["y"]),
            repeated("C", &["z"], 4),
        ]);
        assert_eq!(merged, vec![repeated("C", &["y", "", "z"], 4)]);
    }

    #[test]
    fn definition_order() {
        let sections = [
            ParsedSection::new("V1", ["a"]),
            ParsedSection::new("C", ["b"]),
            ParsedSection::new("V2", ["c"]),
        ];
        assert_eq!(
            build_arrangement(&sections, None),
            vec!["Verse1", "Chorus", "Verse2"]
        );
        assert_eq!(
            build_arrangement(&sections, Some("  ")),
            vec!["Verse1", "Chorus", "Verse2"]
        );
    }

    #[test]
    fn presentation_order() {
        let sections = [
            ParsedSection::new("V1", ["a"]),
            ParsedSection::new("C", ["b"]),
        ];
        assert_eq!(
            build_arrangement(&sections, Some("C V1 C  chorus")),
            vec!["Chorus", "Verse1", "Chorus", "Chorus"]
        );
    }

    #[test]
    fn section_repeat_duplicates_entry() {
        let sections = [
            ParsedSection::new("V1", ["a"]),
            repeated("C", &["X", "Y"], 2),
            repeated("B", &["z"], 1),
        ];
        assert_eq!(
            build_arrangement(&sections, Some("V1 C B")),
            vec!["Verse1", "Chorus", "Chorus", "Bridge"]
        );
        assert_eq!(
            build_arrangement(&sections, None),
            vec!["Verse1", "Chorus", "Chorus", "Bridge"]
        );
    }

    #[test]
    fn huge_repeat_capped() {
        let sections = [repeated("C", &["X"], u32::MAX)];
        assert_eq!(
            build_arrangement(&sections, None).len(),
            MAX_MULTIPLIER as usize
        );
    }
}
