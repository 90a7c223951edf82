// Copyright 2026 The songtext Authors.
// This project is dual-licensed under Apache 2.0 and MIT terms.
// See LICENSE-APACHE and LICENSE-MIT for details.

//! Repeat markers in lyrics.
//!
//! `/: some words :/` means the words are sung twice. An explicit count may follow the closing
//! marker, either as `x3` or in Romanian as `(de 3 ori)`. Markers may be nested.

use log::{debug, warn};
use std::ops::Range;

const OPEN: &str = "/:";
const CLOSE: &str = ":/";
const DEFAULT_MULTIPLIER: u32 = 2;

/// Larger counts are treated as this many.
pub const MAX_MULTIPLIER: u32 = 100;

/// Inline expansion gives up after this many passes, in case of pathological input.
pub const MAX_EXPANSION_PASSES: usize = 100;

/// Inline expansion stops once the text has grown beyond this many bytes, leaving any remaining
/// markers as they are.
pub const MAX_EXPANDED_LEN: usize = 64 * 1024;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TokenKind {
    /// `/:`
    Open,
    /// `:/`, with the count which followed it if any.
    Close { multiplier: Option<u32> },
    Text,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Byte range of the token in the source text, including any count after a closing marker.
    pub span: Range<usize>,
}

/// Splits text into repeat markers and the text between them.
pub fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut text_start = 0;
    let mut position = 0;
    while position < text.len() {
        let rest = &text[position..];
        let marker = if rest.starts_with(OPEN) {
            Some((TokenKind::Open, OPEN.len()))
        } else if rest.starts_with(CLOSE) {
            let (multiplier, suffix_len) = parse_multiplier(&rest[CLOSE.len()..]);
            Some((TokenKind::Close { multiplier }, CLOSE.len() + suffix_len))
        } else {
            None
        };

        if let Some((kind, len)) = marker {
            if text_start < position {
                tokens.push(Token {
                    kind: TokenKind::Text,
                    span: text_start..position,
                });
            }
            tokens.push(Token {
                kind,
                span: position..position + len,
            });
            position += len;
            text_start = position;
        } else {
            position += rest.chars().next().map_or(1, char::len_utf8);
        }
    }
    if text_start < text.len() {
        tokens.push(Token {
            kind: TokenKind::Text,
            span: text_start..text.len(),
        });
    }
    tokens
}

/// Parses an optional `x<N>` or `(de <N> ori)` count at the start of the given text, which may be
/// preceded by spaces or tabs.
///
/// Returns the count and the number of bytes it takes up, or `(None, 0)` if there isn't one.
fn parse_multiplier(text: &str) -> (Option<u32>, usize) {
    let rest = text.trim_start_matches([' ', '\t']);
    let after = rest
        .strip_prefix(['x', 'X'])
        .and_then(strip_number)
        .or_else(|| {
            let rest = rest.strip_prefix("(de")?;
            let (number, rest) = strip_number(rest.strip_prefix(' ')?.trim_start())?;
            let rest = rest.strip_prefix(' ')?.trim_start().strip_prefix("ori)")?;
            Some((number, rest))
        });
    match after {
        Some((multiplier, after)) => (Some(multiplier), text.len() - after.len()),
        None => (None, 0),
    }
}

/// Parses the decimal number at the start of the text, returning it and the rest of the text.
///
/// Numbers too big for a `u32` saturate.
fn strip_number(text: &str) -> Option<(u32, &str)> {
    let rest = text.trim_start_matches(|c: char| c.is_ascii_digit());
    let digits = &text[..text.len() - rest.len()];
    if digits.is_empty() {
        return None;
    }
    Some((digits.parse().unwrap_or(u32::MAX), rest))
}

/// Returns how many times to repeat, given the count written after the closing marker.
fn repeat_count(multiplier: Option<u32>) -> u32 {
    multiplier
        .unwrap_or(DEFAULT_MULTIPLIER)
        .clamp(1, MAX_MULTIPLIER)
}

/// A repeat which wraps an entire section.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SectionRepeat {
    /// The text between the outer markers, trimmed. This may still contain nested repeats.
    pub content: String,
    pub multiplier: u32,
}

/// Checks whether the whole of the given text is a single repeat, optionally followed by a count.
pub fn section_repeat(text: &str) -> Option<SectionRepeat> {
    let text = text.trim();
    let tokens = tokenize(text);
    let (first, rest) = tokens.split_first()?;
    if first.kind != TokenKind::Open {
        return None;
    }

    let mut depth = 1;
    let mut closing = None;
    for (index, token) in rest.iter().enumerate() {
        match token.kind {
            TokenKind::Open => depth += 1,
            TokenKind::Close { multiplier } => {
                depth -= 1;
                if depth == 0 {
                    closing = Some((index, token.span.start, multiplier));
                    break;
                }
            }
            TokenKind::Text => {}
        }
    }
    let (index, close_start, multiplier) = closing?;

    // Only whitespace may follow the outer closing marker and its count.
    if rest[index + 1..]
        .iter()
        .any(|token| token.kind != TokenKind::Text || !text[token.span.clone()].trim().is_empty())
    {
        return None;
    }

    Some(SectionRepeat {
        content: text[first.span.end..close_start].trim().to_owned(),
        multiplier: repeat_count(multiplier),
    })
}

/// Expands all repeat markers in the given text into literal copies of the repeated text,
/// innermost first.
///
/// A repeated single line is joined to its copies with newlines, so they stay on the same slide.
/// Repeated blocks of several lines are separated by blank lines, so each copy starts a new slide.
/// Unmatched markers are left as they are.
pub fn expand_repeats(text: &str) -> String {
    let mut text = text.to_owned();
    for pass in 0..MAX_EXPANSION_PASSES {
        match expand_innermost(&text) {
            Some(expanded) if expanded.len() > MAX_EXPANDED_LEN => {
                warn!(
                    "Stopped expanding repeats after {} passes as the text grew to {} bytes",
                    pass + 1,
                    expanded.len()
                );
                return expanded;
            }
            Some(expanded) => text = expanded,
            None => {
                debug!("Expanded repeats in {pass} passes");
                return text;
            }
        }
    }
    warn!("Gave up expanding repeats after {MAX_EXPANSION_PASSES} passes");
    text
}

/// Expands every repeat which contains no other markers, or returns `None` if there are none.
fn expand_innermost(text: &str) -> Option<String> {
    let tokens = tokenize(text);
    let mut expanded = String::with_capacity(text.len());
    let mut copied_to = 0;
    let mut index = 0;
    while index < tokens.len() {
        let open = &tokens[index];
        if open.kind != TokenKind::Open {
            index += 1;
            continue;
        }
        let (content, close, consumed) = match &tokens[index + 1..] {
            [
                Token {
                    kind: TokenKind::Close { multiplier },
                    span,
                },
                ..,
            ] => ("", (span, *multiplier), 2),
            [
                Token {
                    kind: TokenKind::Text,
                    span: content,
                },
                Token {
                    kind: TokenKind::Close { multiplier },
                    span,
                },
                ..,
            ] => (&text[content.clone()], (span, *multiplier), 3),
            _ => {
                index += 1;
                continue;
            }
        };
        let (close_span, multiplier) = close;

        expanded.push_str(&text[copied_to..open.span.start]);
        expanded.push_str(&repeat_content(content, repeat_count(multiplier)));
        copied_to = close_span.end;
        index += consumed;
    }

    if copied_to == 0 {
        return None;
    }
    expanded.push_str(&text[copied_to..]);
    Some(expanded)
}

fn repeat_content(content: &str, count: u32) -> String {
    let content = content.trim();
    let separator = if content.contains('\n') { "\n\n" } else { "\n" };
    vec![content; count as usize].join(separator)
}
