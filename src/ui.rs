use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph},
};
use crate::app::{App, InputMode};

pub fn render(app: &App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, panes, feedback, footer
    let [header_area, body_area, feedback_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(3),
        Constraint::Length(1),
    ])
    .areas(area);

    let [input_area, output_area] = Layout::horizontal([
        Constraint::Percentage(50),
        Constraint::Percentage(50),
    ])
    .areas(body_area);

    render_header(app, frame, header_area);
    render_input(app, frame, input_area);
    render_output(app, frame, output_area);
    render_feedback(app, frame, feedback_area);
    render_footer(app, frame, footer_area);
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let presentation = app.presentation();

    let title = Line::from(vec![
        Span::styled(" TOON Converter ", Style::default().fg(Color::Cyan).bold()),
        Span::styled(
            format!(" {} ", presentation.direction_label),
            Style::default().fg(Color::Black).bg(Color::Yellow),
        ),
        Span::raw(" "),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::Gray),
        ),
    ]);

    let header = Paragraph::new(title).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn to_u16(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

/// Offset needed so that `pos` stays inside a window of `size` cells
fn scroll_to_keep_visible(pos: usize, size: usize) -> u16 {
    if size == 0 || pos < size {
        0
    } else {
        u16::try_from(pos - size + 1).unwrap_or(u16::MAX)
    }
}

fn render_input(app: &App, frame: &mut Frame, area: Rect) {
    let presentation = app.presentation();
    let editing = app.input_mode == InputMode::Editing;
    let border_color = if editing { Color::Yellow } else { Color::DarkGray };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(format!(" {} ", presentation.input_label))
        .title_bottom(format!(" {} chars ", app.input().text().chars().count()));

    let inner_width = area.width.saturating_sub(2) as usize;
    let inner_height = area.height.saturating_sub(2) as usize;
    let (cursor_line, cursor_col) = app.input().cursor_position();
    let scroll_y = scroll_to_keep_visible(cursor_line, inner_height);
    let scroll_x = scroll_to_keep_visible(cursor_col, inner_width);

    let input = if app.input().is_empty() {
        Paragraph::new(Span::styled(
            presentation.input_placeholder,
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Paragraph::new(app.input().text())
            .style(Style::default().fg(Color::Cyan))
            .scroll((scroll_y, scroll_x))
    };

    frame.render_widget(input.block(block), area);

    if editing {
        frame.set_cursor_position((
            area.x + 1 + to_u16(cursor_col).saturating_sub(scroll_x),
            area.y + 1 + to_u16(cursor_line).saturating_sub(scroll_y),
        ));
    }
}

fn render_output(app: &App, frame: &mut Frame, area: Rect) {
    let presentation = app.presentation();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green))
        .title(format!(" {} (read-only) ", presentation.output_label))
        .title_bottom(format!(" {} chars ", app.output().chars().count()));

    let output = if app.is_busy() {
        // Animated ellipsis: cycles through ".", "..", "..."
        let dots = ".".repeat((app.animation_frame as usize) + 1);
        Paragraph::new(Span::styled(
            format!("Converting{}", dots),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        ))
    } else if app.output().is_empty() {
        Paragraph::new(Span::styled(
            presentation.output_placeholder,
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Paragraph::new(app.output()).scroll((app.output_scroll, 0))
    };

    frame.render_widget(output.block(block), area);
}

fn render_feedback(app: &App, frame: &mut Frame, area: Rect) {
    let feedback = app.feedback();
    let mut lines: Vec<Line> = Vec::new();

    if let Some(error) = feedback.error() {
        lines.push(Line::from(Span::styled(
            format!(" ✗ {}", error),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )));
    } else if let Some(success) = feedback.success() {
        lines.push(Line::from(Span::styled(
            format!(" ✓ {}", success),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )));
    } else {
        lines.push(Line::default());
    }

    if let Some(stats) = feedback.stats() {
        for line in stats.lines() {
            lines.push(Line::from(Span::styled(
                format!("   {}", line),
                Style::default().fg(Color::Gray),
            )));
        }
    }

    frame.render_widget(Paragraph::new(Text::from(lines)), area);
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let (mode_text, mode_style) = match app.input_mode {
        InputMode::Normal => (" NORMAL ", Style::default().bg(Color::Blue).fg(Color::White)),
        InputMode::Editing => (" EDIT ", Style::default().bg(Color::Yellow).fg(Color::Black)),
    };

    // Key style: dark background with bright text for visibility on both light/dark terminals
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);

    let pairs: &[(&str, &str)] = match app.input_mode {
        InputMode::Editing => &[
            (" Ctrl+Enter ", " convert "),
            (" Esc ", " commands "),
            (" Ctrl+C ", " quit "),
        ],
        InputMode::Normal => &[
            (" c ", " convert "),
            (" t ", " direction "),
            (" y ", " copy "),
            (" s ", " save "),
            (" e ", " example "),
            (" x ", " clear "),
            (" i ", " edit "),
            (" j/k ", " scroll "),
            (" q ", " quit "),
        ],
    };

    let mut spans = vec![Span::styled(mode_text, mode_style), Span::raw(" ")];
    for (key, label) in pairs {
        spans.push(Span::styled(*key, key_style));
        spans.push(Span::styled(*label, label_style));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scroll_to_keep_visible() {
        assert_eq!(scroll_to_keep_visible(0, 10), 0);
        assert_eq!(scroll_to_keep_visible(9, 10), 0);
        assert_eq!(scroll_to_keep_visible(10, 10), 1);
        assert_eq!(scroll_to_keep_visible(25, 10), 16);
        assert_eq!(scroll_to_keep_visible(5, 0), 0);
        assert_eq!(scroll_to_keep_visible(100_000, 10), u16::MAX);
    }
}
