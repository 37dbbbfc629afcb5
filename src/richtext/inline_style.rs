// Inline Style
// Character-range styling of a block's rich text, and the pending
// typing attributes used when nothing is selected.

use super::styled_text::{Color, FontRole, StyledText, TextRange, TextStyle};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Inline style operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotesTextStyle {
    Bold,
    Italic,
    Underline,
    Strikethrough,
    Heading1,
    Heading2,
    Body,
}

impl NotesTextStyle {
    pub const ALL: [NotesTextStyle; 7] = [
        NotesTextStyle::Bold,
        NotesTextStyle::Italic,
        NotesTextStyle::Underline,
        NotesTextStyle::Strikethrough,
        NotesTextStyle::Heading1,
        NotesTextStyle::Heading2,
        NotesTextStyle::Body,
    ];

    /// The font role this style sets, if it is a font style
    pub fn font_role(self) -> Option<FontRole> {
        match self {
            NotesTextStyle::Heading1 => Some(FontRole::Heading1),
            NotesTextStyle::Heading2 => Some(FontRole::Heading2),
            NotesTextStyle::Body => Some(FontRole::Body),
            _ => None,
        }
    }
}

/// Toggle `style` over `range`.
///
/// Bold and italic flip independently in every attribute run of the range, so
/// a mixed selection ends up inverted run by run. Underline and strikethrough
/// are decided once for the whole range: if any character has the decoration
/// it is removed everywhere, otherwise it is added everywhere. Font styles
/// are not toggles; they set the font role.
///
/// An out-of-bounds range leaves the text unchanged.
pub fn toggle_character_style(text: &StyledText, range: TextRange, style: NotesTextStyle) -> StyledText {
    if !text.contains_range(range) {
        debug!(?range, len = text.len(), "toggle style: range out of bounds");
        return text.clone();
    }

    match style {
        NotesTextStyle::Bold => text.map_range(range, |s| s.bold = !s.bold),
        NotesTextStyle::Italic => text.map_range(range, |s| s.italic = !s.italic),
        NotesTextStyle::Underline => {
            let present = text.any_in_range(range, |s| s.underline);
            text.map_range(range, |s| s.underline = !present)
        }
        NotesTextStyle::Strikethrough => {
            let present = text.any_in_range(range, |s| s.strikethrough);
            text.map_range(range, |s| s.strikethrough = !present)
        }
        NotesTextStyle::Heading1 | NotesTextStyle::Heading2 | NotesTextStyle::Body => {
            apply_font(text, range, style.font_role().unwrap_or_default())
        }
    }
}

/// Set the font role over `range`, replacing the previous font
pub fn apply_font(text: &StyledText, range: TextRange, font: FontRole) -> StyledText {
    if !text.contains_range(range) {
        debug!(?range, len = text.len(), "apply font: range out of bounds");
        return text.clone();
    }
    text.map_range(range, |s| s.set_font(font))
}

/// Set the foreground color over `range`
pub fn set_foreground_color(text: &StyledText, range: TextRange, color: Color) -> StyledText {
    if !text.contains_range(range) {
        debug!(?range, len = text.len(), "set color: range out of bounds");
        return text.clone();
    }
    text.map_range(range, |s| s.color = Some(color))
}

/// Toggle `style` in the pending typing attributes
pub fn toggle_typing_attribute(attributes: &TextStyle, style: NotesTextStyle) -> TextStyle {
    let mut attributes = *attributes;
    match style {
        NotesTextStyle::Bold => attributes.bold = !attributes.bold,
        NotesTextStyle::Italic => attributes.italic = !attributes.italic,
        NotesTextStyle::Underline => attributes.underline = !attributes.underline,
        NotesTextStyle::Strikethrough => attributes.strikethrough = !attributes.strikethrough,
        NotesTextStyle::Heading1 | NotesTextStyle::Heading2 | NotesTextStyle::Body => {
            attributes.set_font(style.font_role().unwrap_or_default());
        }
    }
    attributes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags(text: &StyledText, pick: fn(&TextStyle) -> bool) -> Vec<(String, bool)> {
        text.runs()
            .iter()
            .map(|r| (r.text.clone(), pick(&r.style)))
            .collect()
    }

    #[test]
    fn test_toggle_bold_on_plain_range() {
        let text = StyledText::plain("Hello world");
        let styled = toggle_character_style(&text, TextRange::new(0, 5), NotesTextStyle::Bold);

        assert_eq!(
            flags(&styled, |s| s.bold),
            vec![("Hello".to_string(), true), (" world".to_string(), false)]
        );
    }

    #[test]
    fn test_toggle_bold_inverts_each_run() {
        let text = StyledText::new()
            .with_text("ab", TextStyle::bold())
            .with_plain_text("cd");
        let styled = toggle_character_style(&text, TextRange::new(0, 4), NotesTextStyle::Bold);

        assert_eq!(
            flags(&styled, |s| s.bold),
            vec![("ab".to_string(), false), ("cd".to_string(), true)]
        );
    }

    #[test]
    fn test_toggle_italic_twice_restores_text() {
        let text = StyledText::plain("abc").with_text("def", TextStyle::italic());
        let range = TextRange::new(1, 4);

        let once = toggle_character_style(&text, range, NotesTextStyle::Italic);
        let twice = toggle_character_style(&once, range, NotesTextStyle::Italic);
        assert_eq!(twice, text);
    }

    #[test]
    fn test_underline_toggles_whole_range() {
        let text = StyledText::new()
            .with_text("abc", TextStyle::underline())
            .with_plain_text("de");
        let styled = toggle_character_style(&text, TextRange::new(0, 5), NotesTextStyle::Underline);

        assert_eq!(styled, StyledText::plain("abcde"));
    }

    #[test]
    fn test_underline_added_when_absent() {
        let text = StyledText::plain("abcde");
        let styled = toggle_character_style(&text, TextRange::new(1, 3), NotesTextStyle::Underline);

        assert_eq!(
            flags(&styled, |s| s.underline),
            vec![
                ("a".to_string(), false),
                ("bcd".to_string(), true),
                ("e".to_string(), false)
            ]
        );
    }

    #[test]
    fn test_strikethrough_toggles_whole_range() {
        let struck = TextStyle {
            strikethrough: true,
            ..Default::default()
        };
        let text = StyledText::plain("ab").with_text("cd", struck);

        let cleared = toggle_character_style(&text, TextRange::new(0, 4), NotesTextStyle::Strikethrough);
        assert_eq!(cleared, StyledText::plain("abcd"));

        let added = toggle_character_style(&cleared, TextRange::new(0, 4), NotesTextStyle::Strikethrough);
        assert_eq!(added, StyledText::new().with_text("abcd", struck));
    }

    #[test]
    fn test_heading_sets_font_and_drops_traits() {
        let text = StyledText::new().with_text("Title", TextStyle::bold());
        let styled = toggle_character_style(&text, TextRange::new(0, 5), NotesTextStyle::Heading1);

        assert_eq!(styled.runs().len(), 1);
        assert_eq!(styled.runs()[0].style.font, FontRole::Heading1);
        assert!(!styled.runs()[0].style.bold);

        let again = toggle_character_style(&styled, TextRange::new(0, 5), NotesTextStyle::Heading1);
        assert_eq!(again, styled);
    }

    #[test]
    fn test_body_resets_font() {
        let text = StyledText::plain("x");
        let heading = apply_font(&text, TextRange::new(0, 1), FontRole::Heading2);
        let body = apply_font(&heading, TextRange::new(0, 1), FontRole::Body);
        assert_eq!(body, text);
    }

    #[test]
    fn test_set_foreground_color() {
        let red = Color::rgb(0xff, 0, 0);
        let text = StyledText::plain("color me");
        let styled = set_foreground_color(&text, TextRange::new(6, 2), red);

        assert_eq!(styled.style_at(5).and_then(|s| s.color), None);
        assert_eq!(styled.style_at(6).and_then(|s| s.color), Some(red));
        assert_eq!(styled.plain_text(), "color me");
    }

    #[test]
    fn test_color_range_is_character_based() {
        let text = StyledText::plain("é🙂x");
        let blue = Color::rgb(0, 0, 0xff);

        let styled = set_foreground_color(&text, TextRange::new(1, 2), blue);
        assert_eq!(styled.style_at(1).and_then(|s| s.color), Some(blue));
        assert_eq!(styled.style_at(2).and_then(|s| s.color), Some(blue));

        let out_of_bounds = set_foreground_color(&text, TextRange::new(2, 2), blue);
        assert_eq!(out_of_bounds, text);
    }

    #[test]
    fn test_out_of_bounds_range_is_noop() {
        let text = StyledText::plain("abc");
        for style in NotesTextStyle::ALL {
            let result = toggle_character_style(&text, TextRange::new(2, 5), style);
            assert_eq!(result, text);
        }
    }

    #[test]
    fn test_typing_attributes_toggle() {
        let attrs = TextStyle::default();

        let attrs = toggle_typing_attribute(&attrs, NotesTextStyle::Bold);
        assert!(attrs.bold);
        let attrs = toggle_typing_attribute(&attrs, NotesTextStyle::Underline);
        assert!(attrs.underline);
        let attrs = toggle_typing_attribute(&attrs, NotesTextStyle::Bold);
        assert!(!attrs.bold);
        assert!(attrs.underline);

        let attrs = toggle_typing_attribute(&attrs, NotesTextStyle::Italic);
        let attrs = toggle_typing_attribute(&attrs, NotesTextStyle::Heading2);
        assert_eq!(attrs.font, FontRole::Heading2);
        assert!(!attrs.italic);
        assert!(attrs.underline);

        let attrs = toggle_typing_attribute(&attrs, NotesTextStyle::Strikethrough);
        assert!(attrs.strikethrough);
    }
}
