// Copyright 2026 The songtext Authors.
// This project is dual-licensed under Apache 2.0 and MIT terms.
// See LICENSE-APACHE and LICENSE-MIT for details.

//! The plain-text song format used for editing and storage.
//!
//! A song is written as a series of parts separated by lines containing exactly `---`. The first
//! line of each part is its key, and the remaining lines are its slides, separated by blank lines.
//! After the last separator comes the arrangement: the keys of the parts in the order they are
//! sung, separated by spaces.
//!
//! ```text
//! Verse1
//! Amazing grace, how sweet the sound
//! That saved a wretch like me
//! ---
//! Chorus
//! My chains are gone
//! ---
//! Verse1 Chorus
//! ```

use crate::{
    search::search_text,
    song::{Song, SongPart, SongSlide},
};
use thiserror::Error;

/// The line separating parts from each other and from the arrangement.
pub const SEPARATOR: &str = "---";

#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum ParseError {
    #[error("song text has no `{SEPARATOR}` line separating the parts from the arrangement")]
    MissingSeparator,
}

/// Splits raw song text into lines, ignoring a single trailing newline.
pub(crate) fn raw_lines(raw: &str) -> Vec<&str> {
    let raw = raw.strip_suffix('\n').unwrap_or(raw);
    raw.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect()
}

/// Groups lines into slides at blank lines, trimming each line.
///
/// Runs of several blank lines count as a single boundary.
pub fn slides_from_lines<'a>(lines: impl IntoIterator<Item = &'a str>) -> Vec<SongSlide> {
    let mut slides = Vec::new();
    let mut current = Vec::new();
    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            if !current.is_empty() {
                slides.push(SongSlide {
                    lines: std::mem::take(&mut current),
                });
            }
        } else {
            current.push(line.to_owned());
        }
    }
    if !current.is_empty() {
        slides.push(SongSlide { lines: current });
    }
    slides
}

/// Parses the raw text of a song.
///
/// If a key is defined more than once the last definition wins, in the position of the first.
/// Callers wanting diagnostics for this and other mistakes should run
/// [`validate`](crate::validate::validate) first.
pub fn parse(id: &str, name: &str, raw: &str) -> Result<Song, ParseError> {
    let mut chunks = raw_lines(raw)
        .split(|line| *line == SEPARATOR)
        .map(|chunk| chunk.to_vec())
        .collect::<Vec<_>>();
    let arrangement_chunk = chunks.pop().unwrap_or_default();
    if chunks.is_empty() {
        return Err(ParseError::MissingSeparator);
    }

    let mut parts: Vec<SongPart> = Vec::new();
    for chunk in chunks {
        let mut lines = chunk.into_iter().skip_while(|line| line.trim().is_empty());
        let Some(key) = lines.next() else {
            continue;
        };
        let part = SongPart {
            key: key.trim().to_owned(),
            slides: slides_from_lines(lines),
        };
        if let Some(existing) = parts.iter_mut().find(|existing| existing.key == part.key) {
            *existing = part;
        } else {
            parts.push(part);
        }
    }

    let arrangement = arrangement_chunk
        .iter()
        .flat_map(|line| line.split_whitespace())
        .map(str::to_owned)
        .collect();

    let search_text = search_text(
        name,
        parts
            .iter()
            .flat_map(|part| &part.slides)
            .flat_map(|slide| &slide.lines)
            .map(String::as_str),
    );

    Ok(Song {
        id: id.to_owned(),
        name: name.to_owned(),
        parts,
        arrangement,
        search_text,
    })
}

/// Formats parts and an arrangement as raw song text.
pub fn format(parts: &[SongPart], arrangement: &[String]) -> String {
    let mut raw = parts
        .iter()
        .map(|part| {
            let slides = part
                .slides
                .iter()
                .map(|slide| slide.lines.join("\n"))
                .collect::<Vec<_>>()
                .join("\n\n");
            format!("{}\n{slides}", part.key)
        })
        .collect::<Vec<_>>()
        .join(&format!("\n{SEPARATOR}\n"));
    raw.push_str(&format!("\n{SEPARATOR}\n"));
    raw.push_str(&arrangement.join(" "));
    raw
}

impl Song {
    /// Returns the raw text of the song's parts and arrangement, for editing.
    pub fn to_raw(&self) -> String {
        format(&self.parts, &self.arrangement)
    }
}
