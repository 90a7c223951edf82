// Copyright 2026 The songtext Authors.
// This project is dual-licensed under Apache 2.0 and MIT terms.
// See LICENSE-APACHE and LICENSE-MIT for details.

use crate::search::search_tokens;
use serde::{Deserialize, Serialize};

/// A song split into named parts, plus the order those parts are sung in.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    pub id: String,
    pub name: String,
    pub parts: Vec<SongPart>,
    /// Keys of parts in performance order. A key may appear more than once.
    pub arrangement: Vec<String>,
    pub search_text: String,
}

/// A named section of a song, such as a verse or chorus.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct SongPart {
    /// Never empty, and never contains whitespace.
    pub key: String,
    pub slides: Vec<SongSlide>,
}

/// The lines shown on screen at the same time.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct SongSlide {
    pub lines: Vec<String>,
}

impl SongSlide {
    pub fn new<S: Into<String>>(lines: impl IntoIterator<Item = S>) -> Self {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }
}

impl Song {
    /// Returns the part with the given key, if there is one.
    pub fn part(&self, key: &str) -> Option<&SongPart> {
        self.parts.iter().find(|part| part.key == key)
    }

    /// Returns every slide of the song in performance order, along with the key of the part it
    /// belongs to.
    ///
    /// Arrangement entries which don't refer to a part are skipped.
    pub fn arranged_slides(&self) -> Vec<(&str, &SongSlide)> {
        self.arrangement
            .iter()
            .filter_map(|key| self.part(key))
            .flat_map(|part| {
                part.slides
                    .iter()
                    .map(move |slide| (part.key.as_str(), slide))
            })
            .collect()
    }

    /// Returns whether every word of the given query appears in the song's name or lyrics.
    ///
    /// The query is normalised the same way as `search_text`, so case and the common Romanian
    /// diacritics are ignored.
    pub fn matches_search(&self, query: &str) -> bool {
        let words = self.search_text.split(' ').collect::<Vec<_>>();
        search_tokens(query)
            .iter()
            .all(|token| words.iter().any(|word| word.contains(token.as_str())))
    }
}
