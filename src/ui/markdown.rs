//! Markdown → styled terminal lines for assistant replies.
//!
//! Walks the pulldown-cmark event stream and emits `Line`s with inline
//! styling for emphasis, code, headings, lists, and block quotes.
//! Tables and images degrade to their text content.

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

use super::theme::Theme;

/// Render markdown text into styled lines.
pub fn render_lines(markdown: &str, theme: &Theme) -> Vec<Line<'static>> {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    let parser = Parser::new_ext(markdown, options);

    let mut lines: Vec<Line<'static>> = Vec::new();
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut bold: usize = 0;
    let mut italic: usize = 0;
    let mut heading: Option<HeadingLevel> = None;
    let mut in_code_block = false;
    let mut quote_depth: usize = 0;
    let mut list_depth: usize = 0;

    fn flush(spans: &mut Vec<Span<'static>>, lines: &mut Vec<Line<'static>>) {
        if !spans.is_empty() {
            lines.push(Line::from(std::mem::take(spans)));
        }
    }

    for event in parser {
        match event {
            Event::Start(Tag::Paragraph) => {}
            Event::End(TagEnd::Paragraph) => {
                flush(&mut spans, &mut lines);
                if list_depth == 0 {
                    lines.push(Line::default());
                }
            }
            Event::Start(Tag::Heading { level, .. }) => {
                flush(&mut spans, &mut lines);
                heading = Some(level);
            }
            Event::End(TagEnd::Heading(_)) => {
                flush(&mut spans, &mut lines);
                heading = None;
                lines.push(Line::default());
            }
            Event::Start(Tag::Strong) => bold += 1,
            Event::End(TagEnd::Strong) => bold = bold.saturating_sub(1),
            Event::Start(Tag::Emphasis) => italic += 1,
            Event::End(TagEnd::Emphasis) => italic = italic.saturating_sub(1),
            Event::Start(Tag::BlockQuote) => {
                flush(&mut spans, &mut lines);
                quote_depth += 1;
            }
            Event::End(TagEnd::BlockQuote) => {
                flush(&mut spans, &mut lines);
                quote_depth = quote_depth.saturating_sub(1);
                lines.push(Line::default());
            }
            Event::Start(Tag::CodeBlock(_)) => {
                flush(&mut spans, &mut lines);
                in_code_block = true;
            }
            Event::End(TagEnd::CodeBlock) => {
                in_code_block = false;
                lines.push(Line::default());
            }
            Event::Start(Tag::List(_)) => {
                flush(&mut spans, &mut lines);
                list_depth += 1;
            }
            Event::End(TagEnd::List(_)) => {
                list_depth = list_depth.saturating_sub(1);
                if list_depth == 0 {
                    lines.push(Line::default());
                }
            }
            Event::Start(Tag::Item) => {
                flush(&mut spans, &mut lines);
                let indent = "  ".repeat(list_depth.saturating_sub(1));
                spans.push(Span::styled(
                    format!("{}• ", indent),
                    Style::default().fg(theme.muted),
                ));
            }
            Event::End(TagEnd::Item) => flush(&mut spans, &mut lines),
            Event::Text(text) => {
                if in_code_block {
                    for raw in text.lines() {
                        lines.push(Line::from(Span::styled(
                            format!("  {}", raw),
                            Style::default().fg(theme.code),
                        )));
                    }
                } else {
                    if spans.is_empty() && quote_depth > 0 {
                        spans.push(Span::styled("▌ ", Style::default().fg(theme.muted)));
                    }
                    spans.push(Span::styled(
                        text.into_string(),
                        inline_style(theme, heading, bold > 0, italic > 0),
                    ));
                }
            }
            Event::Code(code) => {
                spans.push(Span::styled(
                    code.into_string(),
                    Style::default().fg(theme.code),
                ));
            }
            Event::SoftBreak | Event::HardBreak => flush(&mut spans, &mut lines),
            Event::Rule => {
                flush(&mut spans, &mut lines);
                lines.push(Line::from(Span::styled(
                    "────────",
                    Style::default().fg(theme.border),
                )));
            }
            _ => {}
        }
    }
    flush(&mut spans, &mut lines);

    while lines.last().is_some_and(|line| line.spans.is_empty()) {
        lines.pop();
    }
    lines
}

fn inline_style(theme: &Theme, heading: Option<HeadingLevel>, bold: bool, italic: bool) -> Style {
    let mut style = Style::default().fg(theme.text);
    if heading.is_some() {
        style = style.fg(theme.accent).add_modifier(Modifier::BOLD);
    }
    if bold {
        // Strong text carries the accent, matching the product styling.
        style = style.fg(theme.accent).add_modifier(Modifier::BOLD);
    }
    if italic {
        style = style.add_modifier(Modifier::ITALIC);
    }
    style
}
