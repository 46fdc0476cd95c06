// SPDX-FileCopyrightText: 2026 flowlink contributors
// SPDX-License-Identifier: LicenseRef-Flowlink-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of flowlink and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::scroll::ScrollOutcome;
use super::SyncError;
use crate::render::{DiagramElement, ElementKind};

/// What the dispatcher needs to know about a clickable diagram element.
pub trait InteractiveElement {
    fn kind(&self) -> ElementKind;
    fn raw_id(&self) -> Option<&str>;
    fn contains(&self, x: usize, y: usize) -> bool;
}

impl InteractiveElement for DiagramElement {
    fn kind(&self) -> ElementKind {
        DiagramElement::kind(self)
    }

    fn raw_id(&self) -> Option<&str> {
        DiagramElement::raw_id(self)
    }

    fn contains(&self, x: usize, y: usize) -> bool {
        self.rect().contains(x, y)
    }
}

/// A pointer press in diagram content coordinates (cells, origin at the top-left of the text).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerPress {
    pub x: usize,
    pub y: usize,
}

impl PointerPress {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

/// The topmost node under `press`. Edges and decorations are never hit, even where they overlap
/// a node.
pub fn hit_test<E>(elements: &[E], press: PointerPress) -> Option<&E>
where
    E: InteractiveElement,
{
    elements
        .iter()
        .rev()
        .filter(|element| element.kind() == ElementKind::Node)
        .find(|element| element.contains(press.x, press.y))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// No node under the pointer.
    Missed,
    /// A node was hit, but it carries no identifier.
    Ignored,
    Highlighted(ScrollOutcome),
    /// Resolution or scrolling failed; already traced.
    Failed(SyncError),
}

impl DispatchOutcome {
    pub fn is_highlighted(&self) -> bool {
        matches!(self, Self::Highlighted(_))
    }

    pub fn error(&self) -> Option<&SyncError> {
        match self {
            Self::Failed(err) => Some(err),
            _ => None,
        }
    }
}
