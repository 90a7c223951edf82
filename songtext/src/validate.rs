// Copyright 2026 The songtext Authors.
// This project is dual-licensed under Apache 2.0 and MIT terms.
// See LICENSE-APACHE and LICENSE-MIT for details.

//! Checks raw song text for mistakes before it is parsed and saved.
//!
//! Validation never fails: every problem found is returned as a [`ValidationMessage`] with the
//! 1-based line number it was found on, ready to be shown next to a text editor. Errors mean the
//! text would not parse into the song the author intended; warnings point out things which will
//! be silently normalised by the parser.

use crate::raw::{SEPARATOR, raw_lines};
use serde::{Deserialize, Serialize};
use std::{
    collections::{BTreeMap, HashMap, HashSet},
    fmt::{self, Display, Formatter},
};

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl Display for Severity {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
        }
    }
}

/// The kind of problem a validation message reports.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Lint {
    MissingSeparator,
    EmptyArrangement,
    ArrangementWhitespace,
    MultilineArrangement,
    UndefinedPart,
    EmptyPartKey,
    PartKeyPadding,
    PartKeyWhitespace,
    DuplicatePartKey,
    EmptyPart,
    SlideTooLong,
    MalformedSeparator,
    LinePadding,
    ExtraBlankLine,
    PartEdgeBlankLine,
    UnusedPart,
}

impl Lint {
    pub fn severity(self) -> Severity {
        match self {
            Self::MissingSeparator
            | Self::EmptyArrangement
            | Self::ArrangementWhitespace
            | Self::MultilineArrangement
            | Self::UndefinedPart
            | Self::EmptyPartKey
            | Self::PartKeyPadding
            | Self::PartKeyWhitespace
            | Self::DuplicatePartKey
            | Self::EmptyPart
            | Self::SlideTooLong => Severity::Error,
            Self::MalformedSeparator
            | Self::LinePadding
            | Self::ExtraBlankLine
            | Self::PartEdgeBlankLine
            | Self::UnusedPart => Severity::Warning,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ValidationMessage {
    pub lint: Lint,
    pub severity: Severity,
    pub message: String,
    /// 1-based line number the problem was found on, if it can be pinned to one.
    pub line: Option<usize>,
}

impl Display for ValidationMessage {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        if let Some(line) = self.line {
            write!(f, "line {line}: ")?;
        }
        write!(f, "{}: {}", self.severity, self.message)
    }
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Validation {
    pub errors: Vec<ValidationMessage>,
    pub warnings: Vec<ValidationMessage>,
}

impl Validation {
    /// Returns whether the text can be saved, i.e. there are no errors. Warnings are allowed.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ValidatorConfig {
    /// The maximum number of warnings reported for each kind of per-line problem.
    pub warning_cap: usize,
    /// The maximum number of lines allowed on a single slide.
    pub max_slide_lines: usize,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            warning_cap: 3,
            max_slide_lines: 2,
        }
    }
}

/// Validates raw song text with the default configuration.
pub fn validate(raw: &str) -> Validation {
    validate_with(raw, &ValidatorConfig::default())
}

/// Validates raw song text.
pub fn validate_with(raw: &str, config: &ValidatorConfig) -> Validation {
    let lines = raw_lines(raw);
    let mut report = Report::new(config);

    let mut chunks = Vec::new();
    let mut start = 0;
    for (index, line) in lines.iter().enumerate() {
        if *line == SEPARATOR {
            chunks.push(Chunk {
                first_line: start + 1,
                lines: &lines[start..index],
            });
            start = index + 1;
        }
    }
    if chunks.is_empty() {
        report.error(
            Lint::MissingSeparator,
            None,
            format!("Missing `{SEPARATOR}` line separating the parts from the arrangement"),
        );
        return report.finish();
    }
    let arrangement = Chunk {
        first_line: start + 1,
        lines: &lines[start..],
    };

    for (index, line) in lines.iter().enumerate() {
        let trimmed = line.trim();
        if *line != SEPARATOR && trimmed.len() >= 3 && trimmed.chars().all(|c| c == '-') {
            report.capped_warning(
                Lint::MalformedSeparator,
                index + 1,
                format!("Line looks like a separator but is not exactly `{SEPARATOR}`"),
            );
        }
    }

    let mut keys = PartKeys::default();
    for chunk in &chunks {
        check_part(chunk, &mut keys, &mut report);
    }
    check_arrangement(&arrangement, &keys, &mut report);

    report.finish()
}

/// The lines between two separators, or after the last one.
struct Chunk<'a> {
    /// 1-based line number of the first line of the chunk, even if it is empty.
    first_line: usize,
    lines: &'a [&'a str],
}

/// Part keys in the order they are defined, with the line they are defined on.
#[derive(Default)]
struct PartKeys<'a> {
    lines: HashMap<&'a str, usize>,
    order: Vec<&'a str>,
}

impl<'a> PartKeys<'a> {
    /// Records the key, or returns the line it was already defined on.
    fn define(&mut self, key: &'a str, line: usize) -> Result<(), usize> {
        if let Some(&first_line) = self.lines.get(key) {
            return Err(first_line);
        }
        self.lines.insert(key, line);
        self.order.push(key);
        Ok(())
    }

    fn contains(&self, key: &str) -> bool {
        self.lines.contains_key(key)
    }
}

fn check_part<'a>(chunk: &Chunk<'a>, keys: &mut PartKeys<'a>, report: &mut Report) {
    let Some((raw_key, content)) = chunk.lines.split_first() else {
        report.error(
            Lint::EmptyPartKey,
            Some(chunk.first_line),
            "Part is empty; expected a key on the first line".to_owned(),
        );
        return;
    };
    let key_line = chunk.first_line;
    let key = raw_key.trim();

    if key.is_empty() {
        report.error(
            Lint::EmptyPartKey,
            Some(key_line),
            "Part key is empty; the first line of a part must name it".to_owned(),
        );
    } else {
        if key != *raw_key {
            report.error(
                Lint::PartKeyPadding,
                Some(key_line),
                format!("Part key \"{key}\" has leading or trailing whitespace"),
            );
        }
        if key.contains(char::is_whitespace) {
            report.error(
                Lint::PartKeyWhitespace,
                Some(key_line),
                format!(
                    "Part key \"{key}\" contains whitespace, so the arrangement can't refer to it"
                ),
            );
        }
        if let Err(first_line) = keys.define(key, key_line) {
            report.error(
                Lint::DuplicatePartKey,
                Some(key_line),
                format!("Part \"{key}\" is already defined on line {first_line}"),
            );
        }
    }

    let is_blank = |line: &&str| line.trim().is_empty();
    if content.iter().all(is_blank) {
        report.error(
            Lint::EmptyPart,
            Some(key_line),
            format!("Part \"{key}\" has no lyrics"),
        );
        return;
    }
    if content.first().is_some_and(is_blank) {
        report.warning(
            Lint::PartEdgeBlankLine,
            Some(key_line + 1),
            format!("Part \"{key}\" starts with a blank line"),
        );
    } else if content.last().is_some_and(is_blank) {
        report.warning(
            Lint::PartEdgeBlankLine,
            Some(key_line + content.len()),
            format!("Part \"{key}\" ends with a blank line"),
        );
    }

    let max_slide_lines = report.config.max_slide_lines;
    let mut slide = SlideSpan::default();
    let mut blank_run = 0;
    for (offset, line) in content.iter().enumerate() {
        let line_number = key_line + 1 + offset;
        if is_blank(line) {
            blank_run += 1;
            if blank_run > 1 {
                report.capped_warning(
                    Lint::ExtraBlankLine,
                    line_number,
                    "Extra blank line will be ignored; one blank line separates slides".to_owned(),
                );
            }
            slide.finish(key, max_slide_lines, report);
        } else {
            blank_run = 0;
            slide.push(line_number);
            if line.trim() != *line {
                report.capped_warning(
                    Lint::LinePadding,
                    line_number,
                    "Leading or trailing whitespace will be removed".to_owned(),
                );
            }
        }
    }
    slide.finish(key, max_slide_lines, report);
}

/// The lines of the slide currently being checked.
#[derive(Default)]
struct SlideSpan {
    first_line: usize,
    len: usize,
}

impl SlideSpan {
    fn push(&mut self, line_number: usize) {
        if self.len == 0 {
            self.first_line = line_number;
        }
        self.len += 1;
    }

    fn finish(&mut self, key: &str, max_lines: usize, report: &mut Report) {
        if self.len > max_lines {
            report.error(
                Lint::SlideTooLong,
                Some(self.first_line),
                format!(
                    "Slide in part \"{key}\" has {} lines, but at most {max_lines} fit on a slide",
                    self.len
                ),
            );
        }
        self.len = 0;
    }
}

fn check_arrangement(arrangement: &Chunk, keys: &PartKeys, report: &mut Report) {
    let text = arrangement.lines.join("\n");
    let trimmed = text.trim();
    if trimmed.is_empty() {
        let line = if arrangement.lines.is_empty() {
            // Point at the separator, as there is no line after it.
            arrangement.first_line - 1
        } else {
            arrangement.first_line
        };
        report.error(
            Lint::EmptyArrangement,
            Some(line),
            "Arrangement is empty; list the part keys to sing after the last separator".to_owned(),
        );
        return;
    }

    if trimmed != text {
        report.error(
            Lint::ArrangementWhitespace,
            Some(arrangement.first_line),
            "Arrangement has leading or trailing whitespace".to_owned(),
        );
    }
    if trimmed.contains('\n') {
        report.error(
            Lint::MultilineArrangement,
            Some(arrangement.first_line),
            "Arrangement must be a single line of part keys".to_owned(),
        );
    }

    let mut used = HashSet::new();
    for (offset, line) in arrangement.lines.iter().enumerate() {
        for token in line.split_whitespace() {
            if used.insert(token) && !keys.contains(token) {
                report.error(
                    Lint::UndefinedPart,
                    Some(arrangement.first_line + offset),
                    format!("Arrangement refers to part \"{token}\", which is not defined"),
                );
            }
        }
    }

    for key in &keys.order {
        if !used.contains(key) {
            report.warning(
                Lint::UnusedPart,
                Some(keys.lines[key]),
                format!("Part \"{key}\" is not used in the arrangement"),
            );
        }
    }
}

/// Collects messages, limiting how many warnings of each capped kind are kept.
struct Report<'c> {
    config: &'c ValidatorConfig,
    validation: Validation,
    capped_counts: BTreeMap<Lint, usize>,
}

impl<'c> Report<'c> {
    fn new(config: &'c ValidatorConfig) -> Self {
        Self {
            config,
            validation: Validation::default(),
            capped_counts: BTreeMap::new(),
        }
    }

    fn push(&mut self, lint: Lint, line: Option<usize>, message: String) {
        let severity = lint.severity();
        let message = ValidationMessage {
            lint,
            severity,
            message,
            line,
        };
        match severity {
            Severity::Error => self.validation.errors.push(message),
            Severity::Warning => self.validation.warnings.push(message),
        }
    }

    fn error(&mut self, lint: Lint, line: Option<usize>, message: String) {
        debug_assert_eq!(lint.severity(), Severity::Error);
        self.push(lint, line, message);
    }

    fn warning(&mut self, lint: Lint, line: Option<usize>, message: String) {
        debug_assert_eq!(lint.severity(), Severity::Warning);
        self.push(lint, line, message);
    }

    fn capped_warning(&mut self, lint: Lint, line: usize, message: String) {
        let count = self.capped_counts.entry(lint).or_default();
        *count += 1;
        if *count <= self.config.warning_cap {
            self.warning(lint, Some(line), message);
        }
    }

    fn finish(mut self) -> Validation {
        for messages in [&mut self.validation.errors, &mut self.validation.warnings] {
            messages.sort_by_key(|message| message.line.unwrap_or(usize::MAX));
        }
        self.validation
    }
}
