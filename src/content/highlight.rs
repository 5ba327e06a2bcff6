use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use syntect::easy::HighlightLines;
use syntect::highlighting::{FontStyle, Theme as SyntaxTheme, ThemeSet};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

use crate::content::Language;

pub const DEFAULT_CODE_THEME: &str = "base16-ocean.dark";

/// Syntax highlighter for code blocks. Loading the syntax definitions is
/// slow, so one instance is built at start-up and shared.
pub struct Highlighter {
    syntaxes: SyntaxSet,
    theme: SyntaxTheme,
}

impl Highlighter {
    pub fn new(code_theme: &str) -> Self {
        let mut themes = ThemeSet::load_defaults();
        let theme = themes
            .themes
            .remove(code_theme)
            .or_else(|| themes.themes.remove(DEFAULT_CODE_THEME))
            .unwrap_or_default();
        Self {
            syntaxes: SyntaxSet::load_defaults_newlines(),
            theme,
        }
    }

    fn syntax_for(&self, hint: Option<&str>, fallback: Language) -> &SyntaxReference {
        hint.and_then(|token| self.syntaxes.find_syntax_by_token(token))
            .or_else(|| {
                self.syntaxes
                    .find_syntax_by_extension(fallback.syntax_extension())
            })
            .unwrap_or_else(|| self.syntaxes.find_syntax_plain_text())
    }

    /// Highlight a code block. `hint` is the block's own language tag when
    /// it has one; otherwise the selected solution language is used.
    pub fn highlight(&self, code: &str, hint: Option<&str>, fallback: Language) -> Vec<Line<'static>> {
        let syntax = self.syntax_for(hint, fallback);
        let mut highlighter = HighlightLines::new(syntax, &self.theme);
        let mut lines = Vec::new();

        for raw_line in LinesWithEndings::from(code) {
            let spans = match highlighter.highlight_line(raw_line, &self.syntaxes) {
                Ok(ranges) => ranges
                    .into_iter()
                    .map(|(style, text)| Span::styled(clean(text), convert_style(style)))
                    .collect(),
                Err(e) => {
                    log::debug!("highlighting failed, falling back to plain text: {e}");
                    vec![Span::raw(clean(raw_line))]
                }
            };
            lines.push(Line::from(spans));
        }
        lines
    }
}

fn clean(text: &str) -> String {
    text.trim_end_matches(['\n', '\r']).replace('\t', "    ")
}

fn convert_style(style: syntect::highlighting::Style) -> Style {
    let fg = style.foreground;
    let mut out = Style::default().fg(Color::Rgb(fg.r, fg.g, fg.b));
    if style.font_style.contains(FontStyle::BOLD) {
        out = out.add_modifier(Modifier::BOLD);
    }
    if style.font_style.contains(FontStyle::ITALIC) {
        out = out.add_modifier(Modifier::ITALIC);
    }
    if style.font_style.contains(FontStyle::UNDERLINE) {
        out = out.add_modifier(Modifier::UNDERLINED);
    }
    out
}
