// SPDX-FileCopyrightText: 2026 flowlink contributors
// SPDX-License-Identifier: LicenseRef-Flowlink-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of flowlink and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

/// Layout, title, footer, help, and style helpers used by TUI rendering.
fn stack_main_panes_vertically(area: Rect) -> bool {
    area.width < 90
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Diagram,
    Panel,
}

impl Focus {
    fn cycle(self) -> Self {
        match self {
            Self::Diagram => Self::Panel,
            Self::Panel => Self::Diagram,
        }
    }
}

fn panel_border_style_for_focus(active: Focus, panel: Focus) -> Style {
    if active != panel {
        return Style::default();
    }

    Style::default().fg(FOCUS_COLOR)
}

fn view_title(label: &str, tail: Option<&str>) -> String {
    let mut title = format!("─ {label}");
    if let Some(tail) = tail {
        let tail = tail.trim();
        if !tail.is_empty() {
            title.push(' ');
            title.push_str(tail);
        }
    }
    title.push(' ');
    title
}

fn diagram_view_title(workflow_name: &str, is_focused: bool, selected: Option<usize>, total: usize) -> Line<'static> {
    let name_color = if is_focused {
        Color::White
    } else {
        Color::Gray
    };
    Line::from(vec![
        Span::raw("─ Diagram ".to_owned()),
        Span::styled(node_counter_label(selected, total), Style::default().fg(FOCUS_COLOR)),
        Span::raw(" ".to_owned()),
        Span::styled(workflow_name.to_owned(), Style::default().fg(name_color)),
        Span::raw(" ".to_owned()),
    ])
}

fn node_counter_label(selected: Option<usize>, total: usize) -> String {
    if total == 0 {
        return "[0/0]".to_owned();
    }

    let width = total.to_string().len();
    let index = selected.map_or(0, |idx| idx + 1).min(total);
    format!("[{index:0width$}/{total}]")
}

/// Splits one line into display rows of at most `width` characters.
fn wrap_rows(line: &str, width: Option<usize>) -> Vec<String> {
    let Some(width) = width.filter(|width| *width > 0) else {
        return vec![line.to_owned()];
    };
    let chars = line.chars().collect::<Vec<_>>();
    if chars.is_empty() {
        return vec![String::new()];
    }
    chars.chunks(width).map(|chunk| chunk.iter().collect()).collect()
}

/// Styles the cells of `line` (row `y` of the diagram) that fall inside a styled region.
///
/// Regions later in the slice take precedence.
fn styled_diagram_line(line: &str, y: usize, regions: &[(CellRect, Style)]) -> Line<'static> {
    let mut spans = Vec::<Span<'static>>::new();
    let mut run = String::new();
    let mut run_style = Style::default();

    for (x, ch) in line.chars().enumerate() {
        let style = regions
            .iter()
            .rev()
            .find(|(rect, _)| rect.contains(x, y))
            .map_or_else(Style::default, |(_, style)| *style);
        if style != run_style && !run.is_empty() {
            spans.push(Span::styled(std::mem::take(&mut run), run_style));
        }
        run_style = style;
        run.push(ch);
    }
    if !run.is_empty() {
        spans.push(Span::styled(run, run_style));
    }
    Line::from(spans)
}

fn selected_node_style() -> Style {
    Style::default().fg(FOCUS_COLOR).add_modifier(Modifier::BOLD)
}

fn synced_node_style() -> Style {
    Style::default().fg(Color::Black).bg(HIGHLIGHT_COLOR)
}

fn panel_highlight_style() -> Style {
    Style::default().fg(Color::Black).bg(HIGHLIGHT_COLOR)
}

fn trace_entry_line(entry: &TraceEntry) -> Line<'static> {
    let style = if entry.decision.is_failure() {
        Style::default().fg(FAILURE_COLOR)
    } else {
        Style::default().fg(DIAGNOSTICS_COLOR)
    };
    Line::from(Span::styled(entry.to_string(), style))
}

fn footer_help_line(app: &App, toast_suffix: &str) -> Line<'static> {
    let mut spans = Vec::<Span<'static>>::new();
    let diagnostics = if app.show_diagnostics { "d◼ " } else { "d◻ " };

    match app.focus {
        Focus::Diagram => {
            push_footer_entry(&mut spans, "NODE", "n/p");
            push_footer_entry(&mut spans, "SYNC", "Enter");
        }
        Focus::Panel => {
            push_footer_entry(&mut spans, "SCROLL", "j/k");
        }
    }
    push_footer_entry(&mut spans, "FOCUS", "Tab");
    push_footer_entry(&mut spans, "TRACE", diagnostics);
    push_footer_entry(&mut spans, "RELOAD", "r");
    push_footer_entry(&mut spans, "HELP", "?");
    push_footer_entry(&mut spans, "QUIT", "q");

    let toast_message = toast_suffix.trim_start_matches(" | ");
    if !toast_message.is_empty() {
        spans.push(Span::styled(" | ".to_owned(), Style::default().fg(FOOTER_LABEL_COLOR)));
        spans.push(Span::raw(toast_message.to_owned()));
    }

    Line::from(spans)
}

fn footer_brand_line() -> Line<'static> {
    Line::from(vec![Span::styled(
        FOOTER_BRAND.to_owned(),
        Style::default().fg(FOOTER_BRAND_COLOR),
    )])
}

fn help_key_style() -> Style {
    Style::default()
        .fg(FOOTER_KEY_COLOR)
        .add_modifier(Modifier::BOLD)
}

fn help_header_style() -> Style {
    Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD)
}

fn centered_rect(width_percent: u16, height_percent: u16, area: Rect) -> Rect {
    let vertical_margin = (100u16.saturating_sub(height_percent)) / 2;
    let horizontal_margin = (100u16.saturating_sub(width_percent)) / 2;

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(vertical_margin),
            Constraint::Percentage(height_percent),
            Constraint::Percentage(vertical_margin),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(horizontal_margin),
            Constraint::Percentage(width_percent),
            Constraint::Percentage(horizontal_margin),
        ])
        .split(vertical[1])[1]
}

fn help_kv(key: &str, desc: &str, key_width: usize, key_style: Style) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{key:>width$}", width = key_width), key_style),
        Span::raw("  "),
        Span::raw(desc.to_owned()),
    ])
}

fn help_lines() -> Vec<Line<'static>> {
    let key_style = help_key_style();
    let header_style = help_header_style();
    let key_col_width = ["j/k, ↑/↓", "PgUp/PgDn", "Home/End"]
        .iter()
        .map(|s| s.chars().count())
        .max()
        .unwrap_or(0);

    let mut lines = Vec::<Line<'static>>::new();
    lines.push(Line::from(Span::styled("--- Global ---", header_style)));
    lines.push(help_kv("?", "Help (toggle)", key_col_width, key_style));
    lines.push(help_kv("q/Esc", "Quit", key_col_width, key_style));
    lines.push(help_kv("Tab", "Switch focus diagram/panel", key_col_width, key_style));
    lines.push(help_kv("d", "Toggle sync trace", key_col_width, key_style));
    lines.push(help_kv("r", "Reload workflow", key_col_width, key_style));
    lines.push(Line::from(""));

    lines.push(Line::from(Span::styled("--- Diagram ---", header_style)));
    lines.push(help_kv("click", "Scroll panel to step", key_col_width, key_style));
    lines.push(help_kv("n/p", "Next/previous node", key_col_width, key_style));
    lines.push(help_kv("Enter", "Sync selected node", key_col_width, key_style));
    lines.push(help_kv("j/k, ↑/↓", "Scroll diagram", key_col_width, key_style));
    lines.push(Line::from(""));

    lines.push(Line::from(Span::styled("--- Panel ---", header_style)));
    lines.push(help_kv("j/k, ↑/↓", "Scroll by 1", key_col_width, key_style));
    lines.push(help_kv("PgUp/PgDn", "Scroll by page", key_col_width, key_style));
    lines.push(help_kv("Home/End", "Top/bottom", key_col_width, key_style));
    lines
}

fn render_help(frame: &mut Frame<'_>, app: &mut App, main_area: Rect) {
    let area = centered_rect(70, 80, main_area);
    frame.render_widget(Clear, area);

    let lines = help_lines();
    let inner_height = area.height.saturating_sub(2);
    let max_scroll = (lines.len() as u16).saturating_sub(inner_height);
    app.help_scroll = app.help_scroll.min(max_scroll);

    let paragraph = Paragraph::new(Text::from(lines))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(FOCUS_COLOR))
                .title(view_title("Help", Some("(? / Esc to close)"))),
        )
        .wrap(Wrap { trim: false })
        .scroll((app.help_scroll, 0));
    frame.render_widget(paragraph, area);
}

fn push_footer_entry(spans: &mut Vec<Span<'static>>, label: &str, value: &str) {
    if !spans.is_empty() {
        spans.push(Span::styled(
            " | ".to_owned(),
            Style::default().fg(FOOTER_LABEL_COLOR),
        ));
    }
    spans.push(Span::styled(
        format!("{}:", footer_label_ucfirst(label)),
        Style::default().fg(FOOTER_LABEL_COLOR),
    ));
    spans.push(Span::styled(
        value.to_owned(),
        Style::default()
            .fg(FOOTER_KEY_COLOR)
            .add_modifier(Modifier::BOLD),
    ));
}

fn footer_label_ucfirst(label: &str) -> String {
    let lower = label.to_lowercase();
    let mut chars = lower.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    let mut out = first.to_uppercase().collect::<String>();
    out.push_str(chars.as_str());
    out
}
