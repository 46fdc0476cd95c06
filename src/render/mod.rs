// SPDX-FileCopyrightText: 2026 flowlink contributors
// SPDX-License-Identifier: LicenseRef-Flowlink-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of flowlink and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Rendering for the two workflow views.
//!
//! The diagram renderer produces Unicode text plus a list of addressable elements (nodes, edges,
//! decorations) with cell rectangles. The panel renderer produces the pretty JSON text plus the
//! line of every step's object, which the sync layer treats as dedicated markers.

use std::fmt;

use thiserror::Error;

pub mod diagram;
pub mod panel;

pub use diagram::{
    render_workflow_diagram, DiagramElement, ElementKind, RenderOptions, RenderedDiagram,
};
pub use panel::{render_panel, PanelContent, PanelMarker, PanelOptions};

pub const UNICODE_BOX_HORIZONTAL: char = '─';
pub const UNICODE_BOX_VERTICAL: char = '│';
pub const UNICODE_BOX_TOP_LEFT: char = '╭';
pub const UNICODE_BOX_TOP_RIGHT: char = '╮';
pub const UNICODE_BOX_BOTTOM_LEFT: char = '╰';
pub const UNICODE_BOX_BOTTOM_RIGHT: char = '╯';
pub const UNICODE_ARROW_DOWN: char = '▼';

#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Canvas(#[from] CanvasError),
    #[error("failed to serialize panel json: {0}")]
    Json(#[from] serde_json::Error),
}

/// An inclusive rectangle of character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRect {
    pub x0: usize,
    pub y0: usize,
    pub x1: usize,
    pub y1: usize,
}

impl CellRect {
    pub fn new(x0: usize, y0: usize, x1: usize, y1: usize) -> Self {
        Self {
            x0: x0.min(x1),
            y0: y0.min(y1),
            x1: x0.max(x1),
            y1: y0.max(y1),
        }
    }

    pub fn contains(&self, x: usize, y: usize) -> bool {
        (self.x0..=self.x1).contains(&x) && (self.y0..=self.y1).contains(&y)
    }

    pub fn center(&self) -> (usize, usize) {
        ((self.x0 + self.x1) / 2, (self.y0 + self.y1) / 2)
    }
}

/// A fixed-size, bounds-checked character grid. Later writes overwrite earlier ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    width: usize,
    height: usize,
    cells: Vec<char>,
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Result<Self, CanvasError> {
        let len = width
            .checked_mul(height)
            .ok_or(CanvasError::AreaOverflow { width, height })?;
        Ok(Self {
            width,
            height,
            cells: vec![' '; len],
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> Result<char, CanvasError> {
        Ok(self.cells[self.index_of(x, y)?])
    }

    pub fn set(&mut self, x: usize, y: usize, ch: char) -> Result<(), CanvasError> {
        let idx = self.index_of(x, y)?;
        self.cells[idx] = ch;
        Ok(())
    }

    /// Writes `text` starting at `(x, y)`, clipping at the right edge.
    pub fn write_str(&mut self, x: usize, y: usize, text: &str) -> Result<(), CanvasError> {
        self.index_of(x.min(self.width.saturating_sub(1)), y)?;
        for (offset, ch) in text.chars().enumerate() {
            let cx = x + offset;
            if cx >= self.width {
                break;
            }
            self.set(cx, y, ch)?;
        }
        Ok(())
    }

    pub fn draw_vline(&mut self, x: usize, y0: usize, y1: usize) -> Result<(), CanvasError> {
        for y in y0.min(y1)..=y0.max(y1) {
            self.set(x, y, UNICODE_BOX_VERTICAL)?;
        }
        Ok(())
    }

    /// Draws a rounded box on the border of `rect`. Nothing is drawn if any corner is out of
    /// bounds.
    pub fn draw_box(&mut self, rect: CellRect) -> Result<(), CanvasError> {
        self.index_of(rect.x1, rect.y1)?;

        for x in (rect.x0 + 1)..rect.x1 {
            self.set(x, rect.y0, UNICODE_BOX_HORIZONTAL)?;
            self.set(x, rect.y1, UNICODE_BOX_HORIZONTAL)?;
        }
        for y in (rect.y0 + 1)..rect.y1 {
            self.set(rect.x0, y, UNICODE_BOX_VERTICAL)?;
            self.set(rect.x1, y, UNICODE_BOX_VERTICAL)?;
        }
        self.set(rect.x0, rect.y0, UNICODE_BOX_TOP_LEFT)?;
        self.set(rect.x1, rect.y0, UNICODE_BOX_TOP_RIGHT)?;
        self.set(rect.x0, rect.y1, UNICODE_BOX_BOTTOM_LEFT)?;
        self.set(rect.x1, rect.y1, UNICODE_BOX_BOTTOM_RIGHT)?;
        Ok(())
    }

    /// Renders the grid with trailing spaces and trailing blank lines removed.
    pub fn to_trimmed_string(&self) -> String {
        let mut lines = self
            .cells
            .chunks(self.width.max(1))
            .map(|row| row.iter().collect::<String>().trim_end().to_owned())
            .collect::<Vec<_>>();
        while matches!(lines.last(), Some(line) if line.is_empty()) {
            lines.pop();
        }
        lines.join("\n")
    }

    fn index_of(&self, x: usize, y: usize) -> Result<usize, CanvasError> {
        if x >= self.width || y >= self.height {
            return Err(CanvasError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(y * self.width + x)
    }
}

impl fmt::Display for Canvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (y, row) in self.cells.chunks(self.width.max(1)).enumerate() {
            if y > 0 {
                f.write_str("\n")?;
            }
            f.write_str(&row.iter().collect::<String>())?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CanvasError {
    #[error("canvas area overflow: {width}*{height}")]
    AreaOverflow { width: usize, height: usize },
    #[error("out of bounds: ({x},{y}) for {width}x{height} canvas")]
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },
}

pub(crate) fn text_len(text: &str) -> usize {
    text.chars().count()
}

pub(crate) fn truncate_with_ellipsis(text: &str, max_len: usize) -> String {
    if text_len(text) <= max_len {
        return text.to_owned();
    }
    if max_len == 0 {
        return String::new();
    }
    let mut out: String = text.chars().take(max_len - 1).collect();
    out.push('…');
    out
}
