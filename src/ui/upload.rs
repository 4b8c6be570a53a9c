//! Upload modal rendering.

use ratatui::layout::{Alignment, Constraint, Direction, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use super::centered_rect;
use super::theme::Theme;
use crate::app::{UploadField, UploadModal};

pub fn draw(frame: &mut Frame, modal: &UploadModal, theme: &Theme) {
    let area = centered_rect(60, 60, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border_active))
        .title(Span::styled(
            " 添加作文素材 ",
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(4),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner);

    draw_field(
        frame,
        rows[0],
        "文件路径 (PDF, DOCX, 图片, TXT)",
        &modal.file_path,
        "例如 ~/Documents/素材.pdf",
        modal.field == UploadField::File,
        theme,
    );

    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            "────────── 或 ──────────",
            Style::default().fg(theme.dim),
        )))
        .alignment(Alignment::Center),
        rows[1],
    );

    draw_field(
        frame,
        rows[2],
        "粘贴文本内容或链接",
        &modal.text,
        "在此直接粘贴文本内容，或粘贴公众号/小红书链接...",
        modal.field == UploadField::Text,
        theme,
    );

    let status = if modal.uploading {
        Span::styled("AI 正在深度解析...", Style::default().fg(theme.accent))
    } else if let Some(error) = &modal.error {
        Span::styled(error.clone(), Style::default().fg(theme.danger))
    } else {
        Span::raw("")
    };
    frame.render_widget(Paragraph::new(Line::from(status)), rows[3]);

    let help = Line::from(Span::styled(
        "Tab 切换输入  Enter 开始识别与导入  Esc 关闭",
        Style::default().fg(theme.dim),
    ));
    frame.render_widget(Paragraph::new(help), rows[4]);
}

#[allow(clippy::too_many_arguments)]
fn draw_field(
    frame: &mut Frame,
    area: ratatui::layout::Rect,
    title: &str,
    value: &str,
    placeholder: &str,
    focused: bool,
    theme: &Theme,
) {
    let border = if focused {
        theme.border_active
    } else {
        theme.border
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(format!(" {} ", title));

    let (text, style) = if value.is_empty() {
        (placeholder.to_string(), Style::default().fg(theme.dim))
    } else if focused {
        (format!("{}▏", value), Style::default().fg(theme.text))
    } else {
        (value.to_string(), Style::default().fg(theme.text))
    };

    let body = Paragraph::new(text)
        .style(style)
        .wrap(Wrap { trim: false })
        .block(block);
    frame.render_widget(body, area);
}
