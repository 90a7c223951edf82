// Copyright 2026 The songtext Authors.
// This project is dual-licensed under Apache 2.0 and MIT terms.
// See LICENSE-APACHE and LICENSE-MIT for details.

//! Parsing, validation and conversion of song lyrics for projecting on slides.
//!
//! Songs are edited and stored as plain text in the format described in [`raw`], which parses into
//! a [`Song`]. [`validate`](validate::validate) reports mistakes in that text with line numbers,
//! and [`convert`] turns [OpenSong](https://opensong.org/) song sheets into it.
//!
//! ```
//! use songtext::{import_song, validate::validate};
//!
//! let raw = "Verse1\nAmazing grace\n---\nChorus\nMy chains are gone\n---\nVerse1 Chorus Verse1";
//! assert!(validate(raw).is_valid());
//!
//! let song = import_song("1", "Amazing Grace", raw)?;
//! assert_eq!(song.arranged_slides().len(), 3);
//! # Ok::<(), songtext::raw::ParseError>(())
//! ```

pub mod arrangement;
pub mod chunk;
pub mod convert;
pub mod raw;
pub mod repeat;
pub mod search;
pub mod sections;
pub mod song;
pub mod tags;
pub mod validate;

pub use crate::song::{Song, SongPart, SongSlide};
use crate::{convert::convert_opensong, raw::ParseError};
use log::debug;

/// Imports a song from either an OpenSong song sheet or raw song text.
///
/// OpenSong sheets are named by their title if they have one. Raw text is named `fallback_name`,
/// as is an OpenSong sheet without a title.
pub fn import_song(id: &str, fallback_name: &str, content: &str) -> Result<Song, ParseError> {
    if opensong::is_opensong(content) {
        debug!("Importing \"{fallback_name}\" as OpenSong");
        let converted = convert_opensong(content, fallback_name);
        raw::parse(id, &converted.name, &converted.raw)
    } else {
        raw::parse(id, fallback_name, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn import_raw() {
        let song = import_song("3", "Song", "Verse\nWords\n---\nVerse").unwrap();
        assert_eq!(
            song,
            Song {
                id: "3".to_string(),
                name: "Song".to_string(),
                parts: vec![SongPart {
                    key: "Verse".to_string(),
                    slides: vec![SongSlide::new(["Words"])],
                }],
                arrangement: vec!["Verse".to_string()],
                search_text: "song words".to_string(),
            }
        );
    }

    #[test]
    fn import_opensong() {
        let song = import_song(
            "4",
            "file.xml",
            "\u{feff}<song><title>Cânt</title><lyrics>[C]\n /: Slavă :/ x2\n[V1]\n Îți mulțumim</lyrics></song>",
        )
        .unwrap();
        assert_eq!(song.name, "Cânt");
        assert_eq!(song.arrangement, vec!["Chorus", "Chorus", "Verse1"]);
        assert_eq!(song.search_text, "cant slava iti multumim");
        assert!(song.matches_search("multumim"));
    }

    #[test]
    fn import_unseparated_text() {
        assert_eq!(
            import_song("5", "Song", "just some words"),
            Err(ParseError::MissingSeparator)
        );
    }
}
