//! Detail screen rendering: reading/edit pane on the left, the
//! three-mode chat panel on the right.

use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Tabs, Wrap};
use ratatui::Frame;

use super::theme::Theme;
use super::{centered_rect, markdown};
use crate::app::{DetailScreen, DocState};
use crate::models::{Mode, Role};

pub fn draw(frame: &mut Frame, screen: &DetailScreen, theme: &Theme) {
    let area = frame.area();

    match &screen.doc {
        DocState::Loading => {
            draw_placeholder(frame, area, "正在加载素材...", theme);
            return;
        }
        DocState::NotFound => {
            draw_placeholder(frame, area, "文章不存在\n\nEsc 返回列表", theme);
            return;
        }
        DocState::Loaded(_) => {}
    }

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    draw_reading_pane(frame, columns[0], screen, theme);
    draw_chat_pane(frame, columns[1], screen, theme);

    if let Some(notice) = &screen.notice {
        draw_notice(frame, notice, theme);
    }
}

fn draw_placeholder(frame: &mut Frame, area: Rect, text: &str, theme: &Theme) {
    let body = Paragraph::new(text)
        .style(Style::default().fg(theme.dim))
        .alignment(Alignment::Center);
    frame.render_widget(body, centered_rect(60, 30, area));
}

fn draw_reading_pane(frame: &mut Frame, area: Rect, screen: &DetailScreen, theme: &Theme) {
    let Some(doc) = screen.document() else { return };

    let title = if screen.editing {
        format!(" 编辑全文 [{}] ", doc.display_type())
    } else {
        format!(" [{}] {} ", doc.display_type(), doc.date)
    };
    let border = if screen.editing {
        theme.border_active
    } else {
        theme.border
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(Span::styled(
            title,
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner);

    // Body: the edit buffer while editing, the document otherwise.
    let (text, scroll) = if screen.editing {
        let text = format!("{}▏", screen.edit_buffer);
        // Keep the end of the buffer in view while typing.
        let line_count = text.lines().count() as u16;
        let scroll = line_count.saturating_sub(rows[0].height);
        (text, scroll)
    } else {
        (doc.content.clone(), screen.content_scroll)
    };
    let body = Paragraph::new(text)
        .style(Style::default().fg(theme.text))
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    frame.render_widget(body, rows[0]);

    // Themes and tags.
    let mut labels: Vec<Span> = Vec::new();
    for label in &doc.themes {
        labels.push(Span::styled(
            format!("#{} ", label),
            Style::default().fg(theme.theme_tag),
        ));
    }
    for label in &doc.tags {
        labels.push(Span::styled(
            format!("#{} ", label),
            Style::default().fg(theme.muted),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(labels)), rows[1]);

    let help = if screen.saving {
        Span::styled("保存中...", Style::default().fg(theme.accent))
    } else if screen.editing {
        Span::styled(
            "Ctrl+S 保存修改  Esc 取消",
            Style::default().fg(theme.dim),
        )
    } else {
        Span::styled(
            "Ctrl+E 编辑全文  Ctrl+↑↓ 滚动  Esc 返回列表",
            Style::default().fg(theme.dim),
        )
    };
    frame.render_widget(Paragraph::new(Line::from(help)), rows[2]);
}

fn draw_chat_pane(frame: &mut Frame, area: Rect, screen: &DetailScreen, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
        .title(" AI 助教 ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(2),
        ])
        .split(inner);

    // Mode tabs.
    let titles: Vec<Line> = Mode::ALL.iter().map(|mode| Line::from(mode.label())).collect();
    let active = Mode::ALL
        .iter()
        .position(|mode| *mode == screen.active_mode)
        .unwrap_or(0);
    let tabs = Tabs::new(titles)
        .select(active)
        .style(Style::default().fg(theme.dim))
        .highlight_style(
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(tabs, rows[0]);

    draw_messages(frame, rows[1], screen, theme);
    draw_input(frame, rows[2], screen, theme);
}

fn draw_messages(frame: &mut Frame, area: Rect, screen: &DetailScreen, theme: &Theme) {
    let mut lines: Vec<Line> = Vec::new();
    let history = screen.history.get(screen.active_mode);

    if history.is_empty() {
        lines.push(Line::from(Span::styled(
            "你好！我是你的 AI 助教。",
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(vec![
            Span::styled("当前模式：", Style::default().fg(theme.dim)),
            Span::styled(
                screen.active_mode.label(),
                Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
            ),
        ]));
        lines.push(Line::default());
        for (i, preset) in screen.active_mode.presets().iter().enumerate() {
            let selected = i == screen.preset_cursor;
            let marker = if selected { "▶ " } else { "  " };
            let style = if selected {
                Style::default().fg(theme.accent)
            } else {
                Style::default().fg(theme.dim)
            };
            lines.push(Line::from(vec![
                Span::styled(marker, Style::default().fg(theme.accent)),
                Span::styled(*preset, style),
            ]));
        }
    } else {
        for message in history {
            match message.role {
                Role::User => {
                    lines.push(Line::from(Span::styled(
                        "你",
                        Style::default()
                            .fg(theme.user_accent)
                            .add_modifier(Modifier::BOLD),
                    )));
                    for raw in message.content.lines() {
                        lines.push(Line::from(Span::styled(
                            raw.to_string(),
                            Style::default().fg(theme.text),
                        )));
                    }
                }
                Role::Assistant => {
                    lines.push(Line::from(Span::styled(
                        "AI 助教",
                        Style::default()
                            .fg(theme.assistant_accent)
                            .add_modifier(Modifier::BOLD),
                    )));
                    lines.extend(markdown::render_lines(&message.content, theme));
                }
            }
            lines.push(Line::default());
        }
    }

    if screen.chat_loading {
        lines.push(Line::from(Span::styled(
            "AI 正在思考...",
            Style::default().fg(theme.accent),
        )));
    }

    // Stick to the latest entry unless the user scrolled up.
    let total = lines.len() as u16;
    let bottom = total.saturating_sub(area.height);
    let scroll = bottom.saturating_sub(screen.chat_scroll.min(bottom));

    let body = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    frame.render_widget(body, area);
}

fn draw_input(frame: &mut Frame, area: Rect, screen: &DetailScreen, theme: &Theme) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(area);

    let (text, style) = if screen.chat_loading {
        (
            "AI 正在思考，请稍候...".to_string(),
            Style::default().fg(theme.dim),
        )
    } else if screen.draft.is_empty() {
        (
            format!("在【{}】模式下提问...", screen.active_mode.label()),
            Style::default().fg(theme.dim),
        )
    } else {
        (
            format!("{}▏", screen.draft),
            Style::default().fg(theme.text),
        )
    };
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("› ", Style::default().fg(theme.accent)),
            Span::styled(text, style),
        ])),
        rows[0],
    );

    let help = Line::from(Span::styled(
        "Enter 发送  Tab 切换模式  ↑↓ 选择/滚动",
        Style::default().fg(theme.dim),
    ));
    frame.render_widget(Paragraph::new(help), rows[1]);
}

fn draw_notice(frame: &mut Frame, notice: &str, theme: &Theme) {
    let area = centered_rect(40, 20, frame.area());
    frame.render_widget(Clear, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.danger))
        .title(" 提示 ");
    let body = Paragraph::new(format!("{}\n\n按任意键关闭", notice))
        .style(Style::default().fg(theme.text))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: false })
        .block(block);
    frame.render_widget(body, area);
}
