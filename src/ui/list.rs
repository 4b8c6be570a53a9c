//! List screen rendering: filter sidebar, search header, card list,
//! and the delete/alert/upload overlays.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use super::theme::Theme;
use super::{centered_rect, upload};
use crate::app::App;
use crate::models::{THEME_FILTERS, TYPE_FILTERS};

/// Rows a single card occupies in the list pane.
const CARD_ROWS: usize = 3;

pub fn draw(frame: &mut Frame, app: &App, theme: &Theme) {
    let screen = &app.list;
    let area = frame.area();

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(26), Constraint::Min(40)])
        .split(area);

    draw_sidebar(frame, columns[0], app, theme);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(columns[1]);

    draw_header(frame, rows[0], app, theme);
    draw_cards(frame, rows[1], app, theme);
    draw_footer(frame, rows[2], theme);

    if let Some(modal) = &screen.upload {
        upload::draw(frame, modal, theme);
    } else if screen.confirm_delete.is_some() {
        draw_confirm(frame, theme);
    } else if let Some(alert) = &screen.alert {
        draw_alert(frame, alert, theme);
    }
}

fn draw_sidebar(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let screen = &app.list;
    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::from(Span::styled(
        "分类筛选",
        Style::default().fg(theme.muted).add_modifier(Modifier::BOLD),
    )));
    for (i, label) in TYPE_FILTERS.iter().enumerate() {
        let style = if i == screen.type_index {
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.text)
        };
        let marker = if i == screen.type_index { "▌ " } else { "  " };
        lines.push(Line::from(vec![
            Span::styled(marker, Style::default().fg(theme.accent)),
            Span::styled(*label, style),
        ]));
    }

    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        "核心主题",
        Style::default().fg(theme.muted).add_modifier(Modifier::BOLD),
    )));
    for (i, label) in THEME_FILTERS.iter().enumerate() {
        let active = screen.theme_index == Some(i);
        let style = if active {
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.dim)
        };
        let marker = if active { "▌ " } else { "  " };
        lines.push(Line::from(vec![
            Span::styled(marker, Style::default().fg(theme.accent)),
            Span::styled(format!("#{}", label), style),
        ]));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
        .title(Span::styled(
            " 智笔素材 ",
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
        ));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_header(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let screen = &app.list;

    let (search_text, search_style) = if screen.search_active {
        (
            format!("{}▏", screen.search),
            Style::default().fg(theme.text),
        )
    } else if screen.search.is_empty() {
        (
            "搜索素材内容、标签... (/)".to_string(),
            Style::default().fg(theme.dim),
        )
    } else {
        (screen.search.clone(), Style::default().fg(theme.text))
    };

    let status = if screen.loading {
        Span::styled("● 同步中...", Style::default().fg(theme.accent))
    } else if let Some(error) = &screen.error {
        Span::styled(error.clone(), Style::default().fg(theme.danger))
    } else {
        let label = match &screen.last_synced {
            Some(at) => format!("● 系统就绪 {}", at),
            None => "● 系统就绪".to_string(),
        };
        Span::styled(label, Style::default().fg(theme.success))
    };

    let line = Line::from(vec![
        Span::styled(search_text, search_style),
        Span::raw("  "),
        status,
    ]);

    let border = if screen.search_active {
        theme.border_active
    } else {
        theme.border
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));
    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn draw_cards(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let screen = &app.list;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if screen.documents.is_empty() {
        let hint = if screen.loading {
            "正在加载素材..."
        } else {
            "暂无相关素材\n尝试上传新文件或调整筛选条件"
        };
        let empty = Paragraph::new(hint)
            .style(Style::default().fg(theme.dim))
            .alignment(ratatui::layout::Alignment::Center);
        frame.render_widget(empty, centered_rect(60, 30, inner));
        return;
    }

    let visible = (inner.height as usize / CARD_ROWS).max(1);
    let offset = screen
        .selected
        .saturating_sub(visible.saturating_sub(1));

    let preview_chars = (inner.width as usize / 2).max(16);
    let mut lines: Vec<Line> = Vec::new();
    for (i, doc) in screen
        .documents
        .iter()
        .enumerate()
        .skip(offset)
        .take(visible)
    {
        let selected = i == screen.selected;
        let marker = if selected { "▶ " } else { "  " };
        let type_style = if selected {
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.accent)
        };

        let mut header = vec![
            Span::styled(marker, Style::default().fg(theme.accent)),
            Span::styled(format!("[{}]", doc.display_type()), type_style),
            Span::raw(" "),
            Span::styled(doc.date.clone(), Style::default().fg(theme.dim)),
            Span::raw("  "),
        ];
        for label in doc.themes.iter().take(2) {
            header.push(Span::styled(
                format!("#{} ", label),
                Style::default().fg(theme.theme_tag),
            ));
        }
        if doc.themes.len() < 2 {
            for label in doc.tags.iter().take(2 - doc.themes.len()) {
                header.push(Span::styled(
                    format!("#{} ", label),
                    Style::default().fg(theme.muted),
                ));
            }
        }
        lines.push(Line::from(header));

        let preview = if doc.content.trim().is_empty() {
            "（暂无内容预览，请点击查看详情）".to_string()
        } else {
            doc.preview(preview_chars)
        };
        let preview_style = if selected {
            Style::default().fg(theme.text)
        } else {
            Style::default().fg(theme.dim)
        };
        lines.push(Line::from(vec![
            Span::raw("    "),
            Span::styled(preview, preview_style),
        ]));
        lines.push(Line::default());
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

fn draw_footer(frame: &mut Frame, area: Rect, theme: &Theme) {
    let help = Line::from(Span::styled(
        " ↑↓ 选择  Enter 打开  / 搜索  t 分类  f 主题  u 上传  d 删除  r 刷新  q 退出",
        Style::default().fg(theme.dim),
    ));
    frame.render_widget(Paragraph::new(help), area);
}

fn draw_confirm(frame: &mut Frame, theme: &Theme) {
    let area = centered_rect(40, 20, frame.area());
    frame.render_widget(Clear, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.danger))
        .title(" 删除素材 ");
    let body = Paragraph::new("确定要删除这条素材吗？\n\ny 确认   其他键取消")
        .style(Style::default().fg(theme.text))
        .alignment(ratatui::layout::Alignment::Center)
        .wrap(Wrap { trim: false })
        .block(block);
    frame.render_widget(body, area);
}

fn draw_alert(frame: &mut Frame, message: &str, theme: &Theme) {
    let area = centered_rect(50, 20, frame.area());
    frame.render_widget(Clear, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.danger))
        .title(" 提示 ");
    let body = Paragraph::new(format!("{}\n\n按任意键关闭", message))
        .style(Style::default().fg(theme.text))
        .alignment(ratatui::layout::Alignment::Center)
        .wrap(Wrap { trim: false })
        .block(block);
    frame.render_widget(body, area);
}
