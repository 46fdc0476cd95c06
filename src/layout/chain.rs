// SPDX-FileCopyrightText: 2026 flowlink contributors
// SPDX-License-Identifier: LicenseRef-Flowlink-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of flowlink and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crate::model::Workflow;
use crate::render::{text_len, truncate_with_ellipsis, CellRect};

const MIN_INNER_WIDTH: usize = 12;
const BOX_PADDING: usize = 1;
const CONNECTOR_ROWS: usize = 2;

/// Which workflow element a chain box stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChainSlot {
    Trigger,
    Step(usize),
    /// Placeholder target when the workflow has no steps yet.
    End,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainBox {
    slot: ChainSlot,
    rect: CellRect,
    lines: Vec<String>,
}

impl ChainBox {
    pub fn slot(&self) -> ChainSlot {
        self.slot
    }

    pub fn rect(&self) -> CellRect {
        self.rect
    }

    /// Label lines, already truncated to the box's inner width.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainConnector {
    from: ChainSlot,
    to: ChainSlot,
    x: usize,
    y0: usize,
    y1: usize,
}

impl ChainConnector {
    pub fn from(&self) -> ChainSlot {
        self.from
    }

    pub fn to(&self) -> ChainSlot {
        self.to
    }

    /// Column of the connector and its inclusive row range. The last row holds the arrow head.
    pub fn span(&self) -> (usize, usize, usize) {
        (self.x, self.y0, self.y1)
    }
}

/// Top-to-bottom placement of the trigger and every step, all boxes sharing one width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainLayout {
    width: usize,
    height: usize,
    boxes: Vec<ChainBox>,
    connectors: Vec<ChainConnector>,
}

impl ChainLayout {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn boxes(&self) -> &[ChainBox] {
        &self.boxes
    }

    pub fn connectors(&self) -> &[ChainConnector] {
        &self.connectors
    }
}

pub fn layout_chain(workflow: &Workflow, max_label_width: usize) -> ChainLayout {
    let mut labelled = Vec::<(ChainSlot, Vec<String>)>::new();
    labelled.push((ChainSlot::Trigger, vec![workflow.trigger().to_owned()]));
    if workflow.steps().is_empty() {
        labelled.push((ChainSlot::End, vec!["end".to_owned()]));
    }
    for (idx, step) in workflow.steps().iter().enumerate() {
        labelled.push((
            ChainSlot::Step(idx),
            vec![step.app().to_owned(), step.action().to_owned(), step.details().to_owned()],
        ));
    }

    let max_label_width = max_label_width.max(MIN_INNER_WIDTH);
    let inner_width = labelled
        .iter()
        .flat_map(|(_, lines)| lines.iter())
        .map(|line| text_len(line))
        .max()
        .unwrap_or(0)
        .clamp(MIN_INNER_WIDTH, max_label_width);
    let width = inner_width + 2 * (BOX_PADDING + 1);
    let center_x = width / 2;

    let mut boxes = Vec::with_capacity(labelled.len());
    let mut connectors = Vec::with_capacity(labelled.len().saturating_sub(1));
    let mut y = 0usize;
    for (slot, lines) in labelled {
        if let Some(previous) = boxes.last().map(ChainBox::slot) {
            connectors.push(ChainConnector {
                from: previous,
                to: slot,
                x: center_x,
                y0: y,
                y1: y + CONNECTOR_ROWS - 1,
            });
            y += CONNECTOR_ROWS;
        }

        let lines = lines
            .iter()
            .map(|line| truncate_with_ellipsis(line, inner_width))
            .collect::<Vec<_>>();
        let height = lines.len() + 2;
        boxes.push(ChainBox {
            slot,
            rect: CellRect::new(0, y, width - 1, y + height - 1),
            lines,
        });
        y += height;
    }

    ChainLayout {
        width,
        height: y,
        boxes,
        connectors,
    }
}
