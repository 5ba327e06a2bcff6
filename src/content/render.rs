use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

use crate::content::Language;
use crate::content::fragment::{escape_code_blocks, extract_content_region};
use crate::content::highlight::Highlighter;
use crate::ui::theme::Theme;

/// Turn a fetched fragment into terminal lines.
///
/// The content region is injected first, then the code-block escaping hook
/// runs, and only then is the HTML parsed (via Markdown) and highlighted.
pub fn render_fragment(
    html: &str,
    language: Language,
    highlighter: &Highlighter,
    theme: &Theme,
) -> Vec<Line<'static>> {
    let injected = extract_content_region(html);
    let escaped = escape_code_blocks(injected);
    let markdown = html2md::parse_html(&escaped);
    render_markdown(&markdown, language, highlighter, theme)
}

pub fn render_markdown(
    markdown: &str,
    language: Language,
    highlighter: &Highlighter,
    theme: &Theme,
) -> Vec<Line<'static>> {
    let mut renderer = MarkdownRenderer::new(language, highlighter, theme);
    let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH;
    for event in Parser::new_ext(markdown, options) {
        renderer.handle(event);
    }
    renderer.finish()
}

struct CodeBuffer {
    hint: Option<String>,
    text: String,
}

struct MarkdownRenderer<'a> {
    language: Language,
    highlighter: &'a Highlighter,
    theme: &'a Theme,
    lines: Vec<Line<'static>>,
    current: Vec<Span<'static>>,
    styles: Vec<Style>,
    /// One entry per open list: the next item number, or `None` for bullets.
    lists: Vec<Option<u64>>,
    code: Option<CodeBuffer>,
    quote_depth: usize,
}

impl<'a> MarkdownRenderer<'a> {
    fn new(language: Language, highlighter: &'a Highlighter, theme: &'a Theme) -> Self {
        Self {
            language,
            highlighter,
            theme,
            lines: Vec::new(),
            current: Vec::new(),
            styles: vec![Style::default().fg(theme.colors.fg())],
            lists: Vec::new(),
            code: None,
            quote_depth: 0,
        }
    }

    fn style(&self) -> Style {
        self.styles.last().copied().unwrap_or_default()
    }

    fn push_style(&mut self, f: impl FnOnce(Style) -> Style) {
        let next = f(self.style());
        self.styles.push(next);
    }

    fn pop_style(&mut self) {
        if self.styles.len() > 1 {
            self.styles.pop();
        }
    }

    fn flush(&mut self) {
        if self.current.is_empty() {
            return;
        }
        let mut spans = Vec::with_capacity(self.current.len() + 1);
        if self.quote_depth > 0 {
            spans.push(Span::styled(
                "\u{2502} ".repeat(self.quote_depth),
                Style::default().fg(self.theme.colors.text_muted()),
            ));
        }
        spans.append(&mut self.current);
        self.lines.push(Line::from(spans));
    }

    fn blank(&mut self) {
        self.flush();
        if self.lines.last().is_some_and(|l| !l.spans.is_empty()) {
            self.lines.push(Line::default());
        }
    }

    fn text(&mut self, text: &str) {
        let style = self.style();
        self.current.push(Span::styled(text.to_string(), style));
    }

    fn handle(&mut self, event: Event<'_>) {
        if let Some(ref mut code) = self.code {
            match event {
                Event::Text(text) => {
                    code.text.push_str(&text);
                    return;
                }
                Event::End(TagEnd::CodeBlock) => {}
                _ => return,
            }
        }

        let theme = self.theme;
        let colors = &theme.colors;
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                self.blank();
                let accent = colors.accent();
                self.push_style(|s| {
                    let s = s.fg(accent).add_modifier(Modifier::BOLD);
                    if level == HeadingLevel::H1 {
                        s.add_modifier(Modifier::UNDERLINED)
                    } else {
                        s
                    }
                });
            }
            Event::End(TagEnd::Heading(_)) => {
                self.flush();
                self.pop_style();
                self.blank();
            }
            Event::End(TagEnd::Paragraph) => self.blank(),
            Event::Start(Tag::CodeBlock(kind)) => {
                self.blank();
                let hint = match kind {
                    CodeBlockKind::Fenced(info) => info
                        .split_whitespace()
                        .next()
                        .map(|token| token.trim_start_matches("language-").to_string()),
                    CodeBlockKind::Indented => None,
                };
                self.code = Some(CodeBuffer {
                    hint,
                    text: String::new(),
                });
            }
            Event::End(TagEnd::CodeBlock) => {
                if let Some(code) = self.code.take() {
                    let highlighted =
                        self.highlighter
                            .highlight(&code.text, code.hint.as_deref(), self.language);
                    for line in highlighted {
                        let mut spans = vec![Span::raw("  ")];
                        spans.extend(line.spans);
                        self.lines.push(Line::from(spans));
                    }
                }
                self.blank();
            }
            Event::Text(text) => self.text(&text),
            Event::Code(code) => {
                let style = self.style().fg(colors.inline_code());
                self.current.push(Span::styled(code.into_string(), style));
            }
            Event::Start(Tag::Emphasis) => self.push_style(|s| s.add_modifier(Modifier::ITALIC)),
            Event::Start(Tag::Strong) => self.push_style(|s| s.add_modifier(Modifier::BOLD)),
            Event::Start(Tag::Strikethrough) => {
                self.push_style(|s| s.add_modifier(Modifier::CROSSED_OUT))
            }
            Event::Start(Tag::Link { .. }) => {
                let accent = colors.accent();
                self.push_style(|s| s.fg(accent).add_modifier(Modifier::UNDERLINED));
            }
            Event::End(TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough | TagEnd::Link) => {
                self.pop_style()
            }
            Event::Start(Tag::List(start)) => {
                self.flush();
                self.lists.push(start);
            }
            Event::End(TagEnd::List(_)) => {
                self.flush();
                self.lists.pop();
                if self.lists.is_empty() {
                    self.blank();
                }
            }
            Event::Start(Tag::Item) => {
                self.flush();
                let indent = "  ".repeat(self.lists.len().saturating_sub(1));
                let marker = match self.lists.last_mut() {
                    Some(Some(n)) => {
                        let marker = format!("{n}. ");
                        *n += 1;
                        marker
                    }
                    _ => "\u{2022} ".to_string(),
                };
                self.current.push(Span::styled(
                    format!("{indent}{marker}"),
                    Style::default().fg(colors.accent()),
                ));
            }
            Event::End(TagEnd::Item) => self.flush(),
            Event::Start(Tag::BlockQuote(_)) => {
                self.flush();
                self.quote_depth += 1;
            }
            Event::End(TagEnd::BlockQuote(_)) => {
                self.flush();
                self.quote_depth = self.quote_depth.saturating_sub(1);
                self.blank();
            }
            Event::End(TagEnd::TableCell) => {
                let muted = colors.text_muted();
                self.current.push(Span::styled(" \u{2502} ", Style::default().fg(muted)));
            }
            Event::End(TagEnd::TableHead | TagEnd::TableRow) => self.flush(),
            Event::End(TagEnd::Table) => self.blank(),
            Event::SoftBreak => self.text(" "),
            Event::HardBreak => self.flush(),
            Event::Rule => {
                self.blank();
                self.lines.push(Line::from(Span::styled(
                    "\u{2500}".repeat(40),
                    Style::default().fg(colors.border()),
                )));
                self.blank();
            }
            _ => {}
        }
    }

    fn finish(mut self) -> Vec<Line<'static>> {
        self.flush();
        while self.lines.last().is_some_and(|l| l.spans.is_empty()) {
            self.lines.pop();
        }
        self.lines
    }
}
