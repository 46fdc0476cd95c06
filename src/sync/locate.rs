// SPDX-FileCopyrightText: 2026 flowlink contributors
// SPDX-License-Identifier: LicenseRef-Flowlink-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of flowlink and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use super::index::StepIndex;

/// Where in the panel a step should be scrolled to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// A dedicated marker: exact, and stable when lines re-wrap.
    ElementAnchor { line: usize, end_line: usize },
    /// Character offset of the id literal. Row positions derived from it are estimates.
    TextOffset { offset: usize },
}

impl Target {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ElementAnchor { .. } => "anchor",
            Self::TextOffset { .. } => "offset",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ElementAnchor { line, end_line } => write!(f, "anchor lines {line}..={end_line}"),
            Self::TextOffset { offset } => write!(f, "offset {offset}"),
        }
    }
}

/// Prefers the marker; falls back to the text offset.
pub fn locate(step_id: &str, index: &StepIndex) -> Option<Target> {
    let entry = index.get(step_id)?;
    if let Some(marker) = entry.marker {
        return Some(Target::ElementAnchor {
            line: marker.line,
            end_line: marker.end_line,
        });
    }
    entry.first_offset.map(|offset| Target::TextOffset { offset })
}

/// Inclusive range of visual rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowSpan {
    pub start: usize,
    pub end: usize,
}

impl RowSpan {
    pub fn single(row: usize) -> Self {
        Self { start: row, end: row }
    }

    pub fn contains(&self, row: usize) -> bool {
        (self.start..=self.end).contains(&row)
    }
}

/// Line metrics of the panel text as displayed, optionally soft-wrapped at a fixed width.
///
/// Wrapping is estimated by character count, so rows computed with a wrap width can differ
/// slightly from a word-wrapping widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelGeometry {
    line_starts: Vec<usize>,
    line_lens: Vec<usize>,
    row_starts: Vec<usize>,
    total_chars: usize,
    total_rows: usize,
    wrap_width: Option<usize>,
}

impl PanelGeometry {
    pub fn new(text: &str, wrap_width: Option<usize>) -> Self {
        let wrap_width = wrap_width.filter(|width| *width > 0);
        let mut line_starts = Vec::new();
        let mut line_lens = Vec::new();
        let mut row_starts = Vec::new();
        let mut offset = 0usize;
        let mut row = 0usize;

        for line in text.split('\n') {
            let len = line.chars().count();
            line_starts.push(offset);
            line_lens.push(len);
            row_starts.push(row);
            offset += len + 1;
            row += rows_for_len(len, wrap_width);
        }

        Self {
            line_starts,
            line_lens,
            row_starts,
            total_chars: offset.saturating_sub(1),
            total_rows: row,
            wrap_width,
        }
    }

    pub fn line_count(&self) -> usize {
        self.line_lens.len()
    }

    pub fn total_rows(&self) -> usize {
        self.total_rows
    }

    pub fn wrap_width(&self) -> Option<usize> {
        self.wrap_width
    }

    pub fn row_of_line(&self, line: usize) -> Option<usize> {
        self.row_starts.get(line).copied()
    }

    /// The line a visual row belongs to.
    pub fn line_of_row(&self, row: usize) -> Option<usize> {
        if row >= self.total_rows {
            return None;
        }
        Some(self.row_starts.partition_point(|start| *start <= row) - 1)
    }

    /// Concrete rows for `target`, or `None` when it points outside the text.
    pub fn rows_for(&self, target: &Target) -> Option<RowSpan> {
        match *target {
            Target::ElementAnchor { line, end_line } => {
                let start = self.row_of_line(line)?;
                let last_line = end_line.max(line).min(self.line_count() - 1);
                let end = self.row_starts[last_line]
                    + rows_for_len(self.line_lens[last_line], self.wrap_width)
                    - 1;
                Some(RowSpan { start, end })
            }
            Target::TextOffset { offset } => {
                if offset > self.total_chars {
                    return None;
                }
                let line = self.line_starts.partition_point(|start| *start <= offset) - 1;
                let column = offset - self.line_starts[line];
                let within = match self.wrap_width {
                    Some(width) => column / width,
                    None => 0,
                };
                Some(RowSpan::single(self.row_starts[line] + within))
            }
        }
    }
}

fn rows_for_len(len: usize, wrap_width: Option<usize>) -> usize {
    match wrap_width {
        Some(width) if len > 0 => len.div_ceil(width),
        _ => 1,
    }
}
