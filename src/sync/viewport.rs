// SPDX-FileCopyrightText: 2026 flowlink contributors
// SPDX-License-Identifier: LicenseRef-Flowlink-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of flowlink and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use thiserror::Error;

use super::locate::{PanelGeometry, RowSpan};
use crate::render::PanelContent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SurfaceError {
    #[error("row {row} is outside the panel ({rows} rows)")]
    RowOutOfRange { row: usize, rows: usize },
    #[error("panel content is detached")]
    Detached,
}

/// The scrollable text view the coordinator drives.
pub trait ScrollSurface {
    /// Revision of the panel content currently displayed.
    fn revision(&self) -> u64;
    fn geometry(&self) -> &PanelGeometry;
    /// Puts `row` at the top of the viewport.
    fn scroll_to_row(&mut self, row: usize) -> Result<(), SurfaceError>;
    fn set_highlight(&mut self, rows: Option<RowSpan>) -> Result<(), SurfaceError>;
}

/// Scroll and highlight state of the panel pane.
#[derive(Debug, Clone)]
pub struct PanelViewport {
    geometry: PanelGeometry,
    revision: u64,
    scroll_row: usize,
    viewport_rows: usize,
    highlight: Option<RowSpan>,
    detached: bool,
}

impl PanelViewport {
    pub fn new(panel: &PanelContent, wrap_width: Option<usize>, viewport_rows: usize) -> Self {
        Self {
            geometry: PanelGeometry::new(panel.text(), wrap_width),
            revision: panel.revision(),
            scroll_row: 0,
            viewport_rows: viewport_rows.max(1),
            highlight: None,
            detached: false,
        }
    }

    /// Swaps in freshly rendered content. Any highlight belonged to the old content and is dropped.
    pub fn replace_content(&mut self, panel: &PanelContent, wrap_width: Option<usize>) {
        self.geometry = PanelGeometry::new(panel.text(), wrap_width);
        self.revision = panel.revision();
        self.highlight = None;
        self.detached = false;
        self.scroll_row = self.scroll_row.min(self.max_scroll());
    }

    /// Re-wraps the current content at a new width, keeping the revision.
    ///
    /// Returns `true` when the geometry changed. The highlight is dropped then; its rows belong to
    /// the old wrapping and the owner of the highlight has to re-apply it.
    pub fn rewrap(&mut self, text: &str, wrap_width: Option<usize>) -> bool {
        if self.geometry.wrap_width() == wrap_width.filter(|width| *width > 0) {
            return false;
        }
        self.geometry = PanelGeometry::new(text, wrap_width);
        self.highlight = None;
        self.scroll_row = self.scroll_row.min(self.max_scroll());
        true
    }

    /// Marks the content as gone; scroll requests fail until new content arrives.
    pub fn detach(&mut self) {
        self.detached = true;
        self.highlight = None;
    }

    pub fn is_detached(&self) -> bool {
        self.detached
    }

    pub fn set_viewport_rows(&mut self, rows: usize) {
        self.viewport_rows = rows.max(1);
        self.scroll_row = self.scroll_row.min(self.max_scroll());
    }

    pub fn viewport_rows(&self) -> usize {
        self.viewport_rows
    }

    pub fn scroll_row(&self) -> usize {
        self.scroll_row
    }

    pub fn highlight(&self) -> Option<RowSpan> {
        self.highlight
    }

    pub fn max_scroll(&self) -> usize {
        self.geometry.total_rows().saturating_sub(self.viewport_rows)
    }

    pub fn scroll_by(&mut self, delta: isize) {
        let next = self.scroll_row.saturating_add_signed(delta);
        self.scroll_row = next.min(self.max_scroll());
    }

    pub fn is_row_visible(&self, row: usize) -> bool {
        (self.scroll_row..self.scroll_row + self.viewport_rows).contains(&row)
    }
}

impl ScrollSurface for PanelViewport {
    fn revision(&self) -> u64 {
        self.revision
    }

    fn geometry(&self) -> &PanelGeometry {
        &self.geometry
    }

    fn scroll_to_row(&mut self, row: usize) -> Result<(), SurfaceError> {
        if self.detached {
            return Err(SurfaceError::Detached);
        }
        let rows = self.geometry.total_rows();
        if row >= rows {
            return Err(SurfaceError::RowOutOfRange { row, rows });
        }
        self.scroll_row = row.min(self.max_scroll());
        Ok(())
    }

    fn set_highlight(&mut self, rows: Option<RowSpan>) -> Result<(), SurfaceError> {
        if self.detached && rows.is_some() {
            return Err(SurfaceError::Detached);
        }
        self.highlight = rows;
        Ok(())
    }
}
