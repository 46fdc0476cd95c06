// SPDX-FileCopyrightText: 2026 flowlink contributors
// SPDX-License-Identifier: LicenseRef-Flowlink-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of flowlink and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Terminal UI.
//!
//! Diagram on the left, panel JSON on the right. Clicking a step box (or selecting it with `n`/`p`
//! and pressing Enter) scrolls the panel to that step and highlights it for a while.

use std::{
    error::Error,
    io,
    path::PathBuf,
    time::{Duration, Instant},
};

use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{info, warn};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::config::AppConfig;
use crate::model::{fixtures, Workflow, WorkflowError};
use crate::render::{
    render_panel, render_workflow_diagram, CellRect, PanelContent, RenderError, RenderedDiagram,
};
use crate::sync::{
    DispatchOutcome, PanelViewport, PointerPress, ScrollSurface, StepSync, TraceEntry,
};

const FOCUS_COLOR: Color = Color::LightGreen;
const HIGHLIGHT_COLOR: Color = Color::Yellow;
const FAILURE_COLOR: Color = Color::LightRed;
const DIAGNOSTICS_COLOR: Color = Color::DarkGray;
const FOOTER_LABEL_COLOR: Color = Color::Gray;
const FOOTER_KEY_COLOR: Color = Color::Cyan;
const FOOTER_BRAND_COLOR: Color = Color::White;
const FOOTER_BRAND: &str = "flowlink ";
const POLL_INTERVAL: Duration = Duration::from_millis(50);
const TOAST_DURATION: Duration = Duration::from_secs(3);
const DIAGNOSTICS_HEIGHT: u16 = 9;
const MOUSE_SCROLL_ROWS: isize = 3;

/// Where the displayed workflow comes from; `r` reloads from here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowSource {
    Demo,
    File(PathBuf),
}

impl WorkflowSource {
    pub fn load(&self) -> Result<Workflow, WorkflowError> {
        match self {
            Self::Demo => Ok(fixtures::support_triage()),
            Self::File(path) => Workflow::load(path),
        }
    }

    pub fn label(&self) -> String {
        match self {
            Self::Demo => "demo".to_owned(),
            Self::File(path) => path.display().to_string(),
        }
    }
}

/// Runs the interactive terminal UI until the user quits.
pub fn run(source: WorkflowSource, config: AppConfig) -> Result<(), Box<dyn Error>> {
    let workflow = source.load()?;
    let mut app = App::new(source, config, workflow)?;
    let mut terminal = TerminalSession::new()?;

    while !app.should_quit {
        app.tick(Instant::now());
        terminal.draw(|frame| draw(frame, &mut app))?;

        if event::poll(POLL_INTERVAL)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                _ => {}
            }
        }
    }

    Ok(())
}

fn draw(frame: &mut Frame<'_>, app: &mut App) {
    let area = frame.area();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);
    let main_area = layout[0];
    let status_area = layout[1];

    let direction = if stack_main_panes_vertically(main_area) {
        Direction::Vertical
    } else {
        Direction::Horizontal
    };
    let panes = Layout::default()
        .direction(direction)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(main_area);
    let diagram_area = panes[0];
    let (panel_area, diagnostics_area) = if app.show_diagnostics {
        let split = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(DIAGNOSTICS_HEIGHT)])
            .split(panes[1]);
        (split[0], Some(split[1]))
    } else {
        (panes[1], None)
    };

    let diagram_block = Block::default()
        .borders(Borders::ALL)
        .title(diagram_view_title(
            app.workflow.name(),
            app.focus == Focus::Diagram,
            app.selected_node,
            app.node_indices.len(),
        ))
        .border_style(panel_border_style_for_focus(app.focus, Focus::Diagram));
    app.diagram_inner = diagram_block.inner(diagram_area);
    app.clamp_diagram_scroll();
    let diagram = Paragraph::new(app.diagram_text())
        .block(diagram_block)
        .scroll((app.diagram_scroll as u16, 0));
    frame.render_widget(diagram, diagram_area);

    let panel_title = view_title(
        "Panel",
        Some(&format!("· {} (rev {})", app.source.label(), app.panel.revision())),
    );
    let panel_block = Block::default()
        .borders(Borders::ALL)
        .title(panel_title)
        .border_style(panel_border_style_for_focus(app.focus, Focus::Panel));
    app.panel_inner = panel_block.inner(panel_area);
    app.fit_viewport();
    let panel = Paragraph::new(app.panel_text())
        .block(panel_block)
        .scroll((app.viewport.scroll_row() as u16, 0));
    frame.render_widget(panel, panel_area);

    if let Some(diagnostics_area) = diagnostics_area {
        let visible = DIAGNOSTICS_HEIGHT.saturating_sub(2) as usize;
        let lines = app.sync.trace().latest(visible).map(trace_entry_line).collect::<Vec<_>>();
        let diagnostics = Paragraph::new(Text::from(lines)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(DIAGNOSTICS_COLOR))
                .title(view_title("Sync trace", Some(&format!("· {}", app.sync.state())))),
        );
        frame.render_widget(diagnostics, diagnostics_area);
    }

    let toast_suffix = match app.toast.as_ref() {
        Some(toast) if toast.expires_at > Instant::now() => format!(" | {}", toast.message),
        _ => String::new(),
    };
    let status = Paragraph::new(footer_help_line(app, &toast_suffix));
    frame.render_widget(status, status_area);
    let brand = Paragraph::new(footer_brand_line()).alignment(Alignment::Right);
    frame.render_widget(brand, status_area);

    if app.show_help {
        render_help(frame, app, main_area);
    }
}

// Extracted panel/header/footer/help rendering helpers.
include!("chrome.rs");

#[derive(Debug, Clone)]
struct Toast {
    message: String,
    expires_at: Instant,
}

fn render_views(
    workflow: &Workflow,
    config: &AppConfig,
    revision: u64,
) -> Result<(RenderedDiagram, PanelContent), RenderError> {
    let diagram = render_workflow_diagram(workflow, &config.render_options())?;
    let panel = render_panel(workflow, config.panel_options(), revision)?;
    Ok((diagram, panel))
}

struct App {
    source: WorkflowSource,
    config: AppConfig,
    workflow: Workflow,
    diagram: RenderedDiagram,
    /// Element indices of the diagram's nodes, in paint order.
    node_indices: Vec<usize>,
    panel: PanelContent,
    sync: StepSync,
    viewport: PanelViewport,
    selected_node: Option<usize>,
    diagram_scroll: usize,
    diagram_inner: Rect,
    panel_inner: Rect,
    focus: Focus,
    show_diagnostics: bool,
    show_help: bool,
    help_scroll: u16,
    toast: Option<Toast>,
    should_quit: bool,
}

impl App {
    fn new(source: WorkflowSource, config: AppConfig, workflow: Workflow) -> Result<Self, RenderError> {
        let revision = 1;
        let (diagram, panel) = render_views(&workflow, &config, revision)?;
        let sync = StepSync::for_panel(&config.sync_config(), &workflow, &panel);
        let viewport = PanelViewport::new(&panel, None, 1);
        let node_indices = diagram.nodes().map(|(idx, _)| idx).collect::<Vec<_>>();

        Ok(Self {
            source,
            config,
            workflow,
            diagram,
            node_indices,
            panel,
            sync,
            viewport,
            selected_node: None,
            diagram_scroll: 0,
            diagram_inner: Rect::default(),
            panel_inner: Rect::default(),
            focus: Focus::Diagram,
            show_diagnostics: false,
            show_help: false,
            help_scroll: 0,
            toast: None,
            should_quit: false,
        })
    }

    fn wrap_width(&self) -> Option<usize> {
        if !self.config.panel_wrap() || self.panel_inner.width == 0 {
            return None;
        }
        Some(self.panel_inner.width as usize)
    }

    /// Matches the viewport to the panel area drawn this frame.
    fn fit_viewport(&mut self) {
        self.viewport.set_viewport_rows(self.panel_inner.height as usize);
        if self.viewport.rewrap(self.panel.text(), self.wrap_width()) {
            self.sync.refresh_highlight(&mut self.viewport);
        }
    }

    fn clamp_diagram_scroll(&mut self) {
        let rows = self.diagram.text().lines().count();
        let max_scroll = rows.saturating_sub(self.diagram_inner.height as usize);
        self.diagram_scroll = self.diagram_scroll.min(max_scroll);
    }

    fn tick(&mut self, now: Instant) {
        self.sync.tick(&mut self.viewport, now);
        if self.toast.as_ref().is_some_and(|toast| toast.expires_at <= now) {
            self.toast = None;
        }
    }

    /// The node currently highlighted in the panel, if any.
    fn synced_node_rect(&self) -> Option<CellRect> {
        let step = self.sync.coordinator().pending_step()?;
        let known = std::slice::from_ref(step);
        self.diagram
            .nodes()
            .find(|(_, element)| {
                element
                    .raw_id()
                    .is_some_and(|raw| !self.sync.normalizer().normalize(raw, known).is_empty())
            })
            .map(|(_, element)| element.rect())
    }

    fn selected_node_rect(&self) -> Option<CellRect> {
        let idx = *self.node_indices.get(self.selected_node?)?;
        Some(self.diagram.elements()[idx].rect())
    }

    fn diagram_text(&self) -> Text<'static> {
        let mut regions = Vec::<(CellRect, Style)>::with_capacity(2);
        if let Some(rect) = self.selected_node_rect() {
            regions.push((rect, selected_node_style()));
        }
        if let Some(rect) = self.synced_node_rect() {
            regions.push((rect, synced_node_style()));
        }

        let lines = self
            .diagram
            .text()
            .lines()
            .enumerate()
            .map(|(y, line)| styled_diagram_line(line, y, &regions))
            .collect::<Vec<_>>();
        Text::from(lines)
    }

    fn panel_text(&self) -> Text<'static> {
        let wrap = self.viewport.geometry().wrap_width();
        let highlight = self.viewport.highlight();
        let mut row = 0usize;
        let mut lines = Vec::<Line<'static>>::new();
        for line in self.panel.text().split('\n') {
            for chunk in wrap_rows(line, wrap) {
                let highlighted = highlight.is_some_and(|span| span.contains(row));
                lines.push(if highlighted {
                    Line::from(Span::styled(chunk, panel_highlight_style()))
                } else {
                    Line::from(chunk)
                });
                row += 1;
            }
        }
        Text::from(lines)
    }

    fn set_toast(&mut self, message: impl Into<String>) {
        self.toast = Some(Toast {
            message: message.into(),
            expires_at: Instant::now() + TOAST_DURATION,
        });
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if self.handle_key_code(key.code) {
            self.should_quit = true;
        }
    }

    /// Returns `true` when the app should quit.
    fn handle_key_code(&mut self, code: KeyCode) -> bool {
        if self.show_help {
            match code {
                KeyCode::Esc | KeyCode::Char('?') => self.show_help = false,
                KeyCode::Char('q') => return true,
                KeyCode::Down | KeyCode::Char('j') => {
                    self.help_scroll = self.help_scroll.saturating_add(1);
                }
                KeyCode::Up | KeyCode::Char('k') => {
                    self.help_scroll = self.help_scroll.saturating_sub(1);
                }
                KeyCode::Home => self.help_scroll = 0,
                _ => {}
            }
            return false;
        }

        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Char('?') => {
                self.show_help = true;
                self.help_scroll = 0;
            }
            KeyCode::Tab | KeyCode::BackTab => self.focus = self.focus.cycle(),
            KeyCode::Char('d') => self.show_diagnostics = !self.show_diagnostics,
            KeyCode::Char('r') => self.reload(),
            KeyCode::Char('n') => self.select_node_by(1),
            KeyCode::Char('p') => self.select_node_by(-1),
            KeyCode::Enter => self.activate_selected_node(),
            _ => match self.focus {
                Focus::Diagram => self.handle_diagram_key(code),
                Focus::Panel => self.handle_panel_key(code),
            },
        }

        false
    }

    fn handle_diagram_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Down | KeyCode::Char('j') => self.diagram_scroll += 1,
            KeyCode::Up | KeyCode::Char('k') => {
                self.diagram_scroll = self.diagram_scroll.saturating_sub(1);
            }
            KeyCode::Home => self.diagram_scroll = 0,
            _ => {}
        }
        self.clamp_diagram_scroll();
    }

    fn handle_panel_key(&mut self, code: KeyCode) {
        let page = self.viewport.viewport_rows().saturating_sub(1).max(1) as isize;
        match code {
            KeyCode::Down | KeyCode::Char('j') => self.viewport.scroll_by(1),
            KeyCode::Up | KeyCode::Char('k') => self.viewport.scroll_by(-1),
            KeyCode::PageDown => self.viewport.scroll_by(page),
            KeyCode::PageUp => self.viewport.scroll_by(-page),
            KeyCode::Home => self.viewport.scroll_by(isize::MIN),
            KeyCode::End => self.viewport.scroll_by(isize::MAX),
            _ => {}
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(press) = self.diagram_press_at(mouse.column, mouse.row) {
                    self.focus = Focus::Diagram;
                    self.dispatch(press);
                } else if rect_contains(self.panel_inner, mouse.column, mouse.row) {
                    self.focus = Focus::Panel;
                }
            }
            MouseEventKind::ScrollDown | MouseEventKind::ScrollUp => {
                let delta = if mouse.kind == MouseEventKind::ScrollDown {
                    MOUSE_SCROLL_ROWS
                } else {
                    -MOUSE_SCROLL_ROWS
                };
                if rect_contains(self.panel_inner, mouse.column, mouse.row) {
                    self.viewport.scroll_by(delta);
                } else if rect_contains(self.diagram_inner, mouse.column, mouse.row) {
                    self.diagram_scroll = self.diagram_scroll.saturating_add_signed(delta);
                    self.clamp_diagram_scroll();
                }
            }
            _ => {}
        }
    }

    /// Maps a terminal cell to diagram content coordinates.
    fn diagram_press_at(&self, column: u16, row: u16) -> Option<PointerPress> {
        if !rect_contains(self.diagram_inner, column, row) {
            return None;
        }
        let x = (column - self.diagram_inner.x) as usize;
        let y = (row - self.diagram_inner.y) as usize + self.diagram_scroll;
        Some(PointerPress::new(x, y))
    }

    fn select_node_by(&mut self, delta: isize) {
        let total = self.node_indices.len();
        if total == 0 {
            self.selected_node = None;
            return;
        }
        let next = match self.selected_node {
            Some(current) => (current as isize + delta).rem_euclid(total as isize) as usize,
            None if delta < 0 => total - 1,
            None => 0,
        };
        self.selected_node = Some(next);
        self.scroll_diagram_to_selected();
    }

    fn scroll_diagram_to_selected(&mut self) {
        let Some(rect) = self.selected_node_rect() else {
            return;
        };
        let height = (self.diagram_inner.height as usize).max(1);
        if rect.y0 < self.diagram_scroll {
            self.diagram_scroll = rect.y0;
        } else if rect.y1 >= self.diagram_scroll + height {
            self.diagram_scroll = (rect.y1 + 1).saturating_sub(height);
        }
    }

    /// Enter on a selected node behaves like clicking its centre.
    fn activate_selected_node(&mut self) {
        let Some(rect) = self.selected_node_rect() else {
            self.set_toast("No node selected (n/p to select)");
            return;
        };
        let (x, y) = rect.center();
        self.dispatch(PointerPress::new(x, y));
    }

    fn dispatch(&mut self, press: PointerPress) {
        let outcome = self.sync.handle_press(
            self.diagram.elements(),
            press,
            &mut self.viewport,
            Instant::now(),
        );
        match outcome {
            DispatchOutcome::Highlighted(_) => {
                let hit = self.node_indices.iter().rposition(|idx| {
                    self.diagram.elements()[*idx].rect().contains(press.x, press.y)
                });
                if hit.is_some() {
                    self.selected_node = hit;
                }
            }
            DispatchOutcome::Failed(err) => self.set_toast(err.to_string()),
            DispatchOutcome::Missed | DispatchOutcome::Ignored => {}
        }
    }

    fn reload(&mut self) {
        let workflow = match self.source.load() {
            Ok(workflow) => workflow,
            Err(err) => {
                warn!(source:% = self.source.label(), error:% = err; "workflow reload failed");
                self.set_toast(format!("Reload failed: {err}"));
                return;
            }
        };
        match self.install(workflow) {
            Ok(()) => {
                info!(
                    source:% = self.source.label(),
                    revision = self.panel.revision(),
                    steps = self.workflow.steps().len();
                    "workflow reloaded"
                );
                self.set_toast(format!("Reloaded {} steps", self.workflow.steps().len()));
            }
            Err(err) => {
                warn!(error:% = err; "workflow render failed");
                self.set_toast(format!("Render failed: {err}"));
            }
        }
    }

    /// Re-renders both views and rebuilds the index against the new panel revision.
    fn install(&mut self, workflow: Workflow) -> Result<(), RenderError> {
        let revision = self.panel.revision() + 1;
        let (diagram, panel) = render_views(&workflow, &self.config, revision)?;
        self.sync.rebuild(&workflow, &panel);
        self.viewport.replace_content(&panel, self.wrap_width());
        self.node_indices = diagram.nodes().map(|(idx, _)| idx).collect();
        self.selected_node = self
            .selected_node
            .filter(|selected| *selected < self.node_indices.len());
        self.diagram = diagram;
        self.panel = panel;
        self.workflow = workflow;
        self.clamp_diagram_scroll();
        Ok(())
    }
}

fn rect_contains(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x
        && row >= rect.y
        && column < rect.x.saturating_add(rect.width)
        && row < rect.y.saturating_add(rect.height)
}

struct TerminalSession {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalSession {
    fn new() -> Result<Self, Box<dyn Error>> {
        enable_raw_mode()?;

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture).map_err(|err| {
            teardown_terminal();
            err
        })?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).map_err(|err| {
            teardown_terminal();
            err
        })?;
        terminal.clear().map_err(|err| {
            teardown_terminal();
            err
        })?;

        Ok(Self { terminal })
    }

    fn draw(&mut self, draw_fn: impl FnOnce(&mut Frame<'_>)) -> io::Result<()> {
        self.terminal.draw(draw_fn)?;
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = self.terminal.show_cursor();
        teardown_terminal();
    }
}

fn teardown_terminal() {
    let _ = disable_raw_mode();
    let mut stdout = io::stdout();
    let _ = execute!(stdout, DisableMouseCapture, LeaveAlternateScreen);
}
