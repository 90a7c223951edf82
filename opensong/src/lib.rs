// Copyright 2026 The songtext Authors.
// This project is dual-licensed under Apache 2.0 and MIT terms.
// See LICENSE-APACHE and LICENSE-MIT for details.

//! Types deriving the appropriate serde traits to be used with
//! [`quick-xml`](https://crates.io/crates/quick-xml) for parsing
//! [OpenSong](https://opensong.org/development/file-formats/) song sheets, and a cheap structural
//! check for whether some text is an OpenSong sheet at all.
//!
//! ```
//! let xml = "<song><title>Title</title><lyrics>[V1]\n Some words</lyrics></song>";
//! assert!(opensong::is_opensong(xml));
//! let song = opensong::from_str(xml)?;
//! assert_eq!(song.title(), Some("Title"));
//! # Ok::<(), quick_xml::DeError>(())
//! ```

pub mod types;

use crate::types::Song;
use quick_xml::{DeError, Reader, escape::resolve_predefined_entity, events::Event};
use std::{collections::HashMap, mem::take};

const SONG_ELEMENT: &[u8] = b"song";
const LYRICS_ELEMENT: &[u8] = b"lyrics";

/// Removes a leading byte-order mark, if there is one.
pub fn strip_bom(content: &str) -> &str {
    content.strip_prefix('\u{feff}').unwrap_or(content)
}

/// Parses an OpenSong song sheet, ignoring a leading byte-order mark.
pub fn from_str(content: &str) -> Result<Song, DeError> {
    quick_xml::de::from_str(strip_bom(content))
}

/// Reads the known elements of a song sheet by walking its XML events, for sheets which
/// [`from_str`] rejects such as those with a repeated element or markup inside the title.
///
/// The first occurrence of each element wins, and only the text inside it is kept. Reading stops
/// at the first XML error, keeping whatever was read up to that point.
pub fn read_leniently(content: &str) -> Song {
    let mut reader = Reader::from_str(strip_bom(content));
    let mut fields = HashMap::new();
    let mut depth = 0usize;
    let mut current = None;
    let mut text = String::new();

    loop {
        match reader.read_event() {
            Err(_) | Ok(Event::Eof) => break,
            Ok(Event::Start(start)) => {
                if depth == 1 {
                    current = Some(start.name().as_ref().to_owned());
                    text.clear();
                }
                depth += 1;
            }
            Ok(Event::End(_)) => {
                depth = depth.saturating_sub(1);
                if depth == 1 {
                    if let Some(name) = current.take() {
                        fields.entry(name).or_insert_with(|| take(&mut text));
                    }
                }
            }
            Ok(Event::Text(t)) if current.is_some() => {
                text.push_str(&t.decode().unwrap_or_default());
            }
            Ok(Event::CData(t)) if current.is_some() => {
                text.push_str(&t.decode().unwrap_or_default());
            }
            Ok(Event::GeneralRef(reference)) if current.is_some() => {
                if let Ok(Some(c)) = reference.resolve_char_ref() {
                    text.push(c);
                } else if let Some(resolved) = reference
                    .decode()
                    .ok()
                    .and_then(|name| resolve_predefined_entity(&name))
                {
                    text.push_str(resolved);
                }
            }
            Ok(_) => {}
        }
    }
    // An element cut short by an error keeps the text read so far.
    if let Some(name) = current {
        fields.entry(name).or_insert(text);
    }

    let mut field = |name: &str| fields.remove(name.as_bytes());
    Song {
        title: field("title"),
        author: field("author"),
        copyright: field("copyright"),
        hymn_number: field("hymn_number"),
        presentation: field("presentation"),
        ccli: field("ccli"),
        key: field("key"),
        theme: field("theme"),
        lyrics: field("lyrics").unwrap_or_default(),
    }
}

/// Returns whether the given text is a well-formed XML document whose root element is `song` with
/// a `lyrics` child element.
pub fn is_opensong(content: &str) -> bool {
    let mut reader = Reader::from_str(strip_bom(content));
    let mut depth = 0usize;
    let mut root_is_song = None;
    let mut has_lyrics = false;

    loop {
        let (name, opens) = match reader.read_event() {
            Err(_) => return false,
            Ok(Event::Eof) => break,
            Ok(Event::Start(start)) => (start.name().as_ref().to_owned(), true),
            Ok(Event::Empty(start)) => (start.name().as_ref().to_owned(), false),
            Ok(Event::End(_)) => {
                depth = depth.saturating_sub(1);
                continue;
            }
            Ok(Event::Text(text)) => {
                // Nothing but whitespace may appear outside the root element.
                if depth == 0 && !text.iter().all(u8::is_ascii_whitespace) {
                    return false;
                }
                continue;
            }
            Ok(_) => continue,
        };

        match depth {
            0 if root_is_song.is_some() => return false,
            0 => root_is_song = Some(name == SONG_ELEMENT),
            1 if name == LYRICS_ELEMENT => has_lyrics = true,
            _ => {}
        }
        if opens {
            depth += 1;
        }
    }

    depth == 0 && root_is_song == Some(true) && has_lyrics
}
