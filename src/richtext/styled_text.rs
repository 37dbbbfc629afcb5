// Styled Text
// Rich text as a sequence of uniformly styled runs.
// Offsets and lengths count user-perceived characters (grapheme clusters), never bytes.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use unicode_segmentation::UnicodeSegmentation;

/// Semantic font class of a character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontRole {
    #[default]
    Body,
    Heading1,
    Heading2,
}

/// An RGBA foreground color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b, a: 0xff }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Color { r, g, b, a }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid color {0:?}, expected #rrggbb or #rrggbbaa")]
pub struct ParseColorError(String);

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseColorError(s.to_string());
        let hex = s.strip_prefix('#').ok_or_else(err)?;
        if !(hex.len() == 6 || hex.len() == 8) || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(err());
        }

        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| err());
        let alpha = if hex.len() == 8 { channel(6)? } else { 0xff };
        Ok(Color::rgba(channel(0)?, channel(2)?, channel(4)?, alpha))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{:02x}{:02x}{:02x}{:02x}",
            self.r, self.g, self.b, self.a
        )
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

fn is_body(font: &FontRole) -> bool {
    *font == FontRole::Body
}

/// Character attributes (semantic, not platform font objects)
///
/// `bold` and `italic` are traits of the current font; replacing the font
/// role clears them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TextStyle {
    #[serde(skip_serializing_if = "is_false")]
    pub bold: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub italic: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub underline: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub strikethrough: bool,
    #[serde(skip_serializing_if = "is_body")]
    pub font: FontRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
}

impl TextStyle {
    pub fn plain() -> Self {
        Self::default()
    }

    pub fn bold() -> Self {
        TextStyle {
            bold: true,
            ..Default::default()
        }
    }

    pub fn italic() -> Self {
        TextStyle {
            italic: true,
            ..Default::default()
        }
    }

    pub fn underline() -> Self {
        TextStyle {
            underline: true,
            ..Default::default()
        }
    }

    /// Replace the font, dropping the bold/italic traits of the old one
    pub fn set_font(&mut self, font: FontRole) {
        self.font = font;
        self.bold = false;
        self.italic = false;
    }
}

/// Half-open character range `[location, location + length)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TextRange {
    pub location: usize,
    pub length: usize,
}

impl TextRange {
    pub fn new(location: usize, length: usize) -> Self {
        TextRange { location, length }
    }

    /// Zero-length range (an insertion point)
    pub fn caret(location: usize) -> Self {
        Self::new(location, 0)
    }

    /// Exclusive end, or `None` if it overflows
    pub fn end(&self) -> Option<usize> {
        self.location.checked_add(self.length)
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }
}

/// Byte index of the grapheme at `offset`, or the string length past the end
fn byte_offset(text: &str, offset: usize) -> usize {
    text.grapheme_indices(true)
        .nth(offset)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}

/// A run of styled text (a contiguous piece of text with uniform styling)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRun {
    pub text: String,
    #[serde(flatten)]
    pub style: TextStyle,
}

impl TextRun {
    pub fn new(text: impl Into<String>, style: TextStyle) -> Self {
        TextRun {
            text: text.into(),
            style,
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, TextStyle::plain())
    }

    /// Length in characters
    pub fn len(&self) -> usize {
        self.text.graphemes(true).count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Split this text run at the given character offset
    /// Returns (left_run, right_run)
    pub fn split_at(&self, offset: usize) -> (TextRun, TextRun) {
        let (left, right) = self.text.split_at(byte_offset(&self.text, offset));
        (
            TextRun::new(left, self.style),
            TextRun::new(right, self.style),
        )
    }
}

/// Merge adjacent runs of equal style and drop empty ones.
/// Keeps equality structural: one canonical run list per styled text.
fn normalize(runs: impl IntoIterator<Item = TextRun>) -> Vec<TextRun> {
    let mut out: Vec<TextRun> = Vec::new();
    for run in runs {
        if run.is_empty() {
            continue;
        }
        match out.last_mut() {
            Some(last) if last.style == run.style => last.text.push_str(&run.text),
            _ => out.push(run),
        }
    }
    out
}

/// Rich text value: plain text plus per-character style attributes
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<TextRun>", into = "Vec<TextRun>")]
pub struct StyledText {
    runs: Vec<TextRun>,
}

impl StyledText {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::from_runs([TextRun::plain(text)])
    }

    pub fn from_runs(runs: impl IntoIterator<Item = TextRun>) -> Self {
        StyledText {
            runs: normalize(runs),
        }
    }

    pub fn with_text(self, text: impl Into<String>, style: TextStyle) -> Self {
        Self::from_runs(self.runs.into_iter().chain([TextRun::new(text, style)]))
    }

    pub fn with_plain_text(self, text: impl Into<String>) -> Self {
        self.with_text(text, TextStyle::plain())
    }

    pub fn runs(&self) -> &[TextRun] {
        &self.runs
    }

    /// Length in characters
    pub fn len(&self) -> usize {
        self.runs.iter().map(TextRun::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    pub fn plain_text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    /// Whether `range` lies within `[0, len)`
    pub fn contains_range(&self, range: TextRange) -> bool {
        range.end().is_some_and(|end| end <= self.len())
    }

    /// Style of the character at `offset`
    pub fn style_at(&self, offset: usize) -> Option<TextStyle> {
        let mut pos = 0;
        for run in &self.runs {
            let len = run.len();
            if offset < pos + len {
                return Some(run.style);
            }
            pos += len;
        }
        None
    }

    /// The styled sub-text covered by `range`; empty when out of bounds
    pub fn slice(&self, range: TextRange) -> StyledText {
        if !self.contains_range(range) {
            return StyledText::new();
        }
        let (_, selected, _) = self.split_for_range(range);
        Self::from_runs(selected)
    }

    /// Whether any character in `range` satisfies `pred`
    pub(crate) fn any_in_range<P>(&self, range: TextRange, mut pred: P) -> bool
    where
        P: FnMut(&TextStyle) -> bool,
    {
        let (_, selected, _) = self.split_for_range(range);
        selected.iter().any(|run| pred(&run.style))
    }

    /// Rewrite the style of every attribute run inside `range`.
    /// Runs are visited independently, so `apply` sees each run's own style.
    pub(crate) fn map_range<F>(&self, range: TextRange, mut apply: F) -> StyledText
    where
        F: FnMut(&mut TextStyle),
    {
        let (before, selected, after) = self.split_for_range(range);
        let styled = selected.into_iter().map(|mut run| {
            apply(&mut run.style);
            run
        });
        Self::from_runs(before.into_iter().chain(styled).chain(after))
    }

    /// Split runs into three parts: before, within and after `range`
    fn split_for_range(&self, range: TextRange) -> (Vec<TextRun>, Vec<TextRun>, Vec<TextRun>) {
        let start = range.location;
        let end = range.end().unwrap_or(usize::MAX);

        let mut before = Vec::new();
        let mut selected = Vec::new();
        let mut after = Vec::new();
        let mut pos = 0;

        for run in &self.runs {
            let len = run.len();
            let run_start = pos;
            let run_end = pos + len;
            pos = run_end;

            if run_end <= start {
                before.push(run.clone());
            } else if run_start >= end {
                after.push(run.clone());
            } else if run_start >= start && run_end <= end {
                selected.push(run.clone());
            } else {
                // Partial overlap
                let local_end = end.min(run_end) - run_start;
                let (head, tail) = run.split_at(local_end);
                let local_start = start.saturating_sub(run_start);
                let (left, middle) = head.split_at(local_start);
                before.push(left);
                selected.push(middle);
                after.push(tail);
            }
        }

        before.retain(|r| !r.is_empty());
        selected.retain(|r| !r.is_empty());
        after.retain(|r| !r.is_empty());
        (before, selected, after)
    }
}

impl From<Vec<TextRun>> for StyledText {
    fn from(runs: Vec<TextRun>) -> Self {
        Self::from_runs(runs)
    }
}

impl From<StyledText> for Vec<TextRun> {
    fn from(text: StyledText) -> Self {
        text.runs
    }
}

impl From<&str> for StyledText {
    fn from(text: &str) -> Self {
        Self::plain(text)
    }
}

impl fmt::Display for StyledText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for run in &self.runs {
            f.write_str(&run.text)?;
        }
        Ok(())
    }
}
