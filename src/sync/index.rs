// SPDX-FileCopyrightText: 2026 flowlink contributors
// SPDX-License-Identifier: LicenseRef-Flowlink-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of flowlink and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Canonical step id → where that step lives in the rendered panel.

use std::collections::BTreeMap;

use memchr::memchr_iter;

use super::normalize::KnownSteps;
use crate::model::StepId;
use crate::render::PanelContent;

/// Line range of a dedicated marker for one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerSpan {
    pub line: usize,
    pub end_line: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IndexEntry {
    /// Character offset of the first quoted occurrence of the step id.
    pub first_offset: Option<usize>,
    pub marker: Option<MarkerSpan>,
}

/// Per-render lookup table. Never patched: a new panel render means a new index.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StepIndex {
    revision: u64,
    entries: BTreeMap<StepId, IndexEntry>,
}

impl StepIndex {
    /// Scans `panel` once and keeps entries for ids in `known` only.
    pub fn build<K>(panel: &PanelContent, known: &K) -> Self
    where
        K: KnownSteps + ?Sized,
    {
        let mut entries = BTreeMap::<StepId, IndexEntry>::new();

        for (offset, literal) in quoted_literals(panel.text()) {
            let Some(step_id) = known.lookup(literal) else {
                continue;
            };
            let entry = entries.entry(step_id.clone()).or_default();
            if entry.first_offset.is_none() {
                entry.first_offset = Some(offset);
            }
        }

        for marker in panel.markers() {
            let Some(step_id) = known.lookup(marker.step_id().as_str()) else {
                continue;
            };
            let entry = entries.entry(step_id.clone()).or_default();
            if entry.marker.is_none() {
                entry.marker = Some(MarkerSpan {
                    line: marker.line(),
                    end_line: marker.end_line(),
                });
            }
        }

        Self {
            revision: panel.revision(),
            entries,
        }
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn get(&self, step_id: &str) -> Option<&IndexEntry> {
        self.entries.get(step_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&StepId, &IndexEntry)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Yields `(char_offset, content)` for every double-quoted literal in `text`.
///
/// `char_offset` is the character index of the first content character. Backslash escapes are
/// honoured when looking for the closing quote; the content is returned raw.
fn quoted_literals(text: &str) -> impl Iterator<Item = (usize, &str)> {
    let bytes = text.as_bytes();
    let mut open = None::<usize>;
    let mut counted_bytes = 0usize;
    let mut counted_chars = 0usize;

    memchr_iter(b'"', bytes).filter_map(move |pos| {
        let Some(start) = open else {
            open = Some(pos);
            return None;
        };

        let backslashes = bytes[start + 1..pos].iter().rev().take_while(|b| **b == b'\\').count();
        if backslashes % 2 == 1 {
            return None;
        }
        open = None;

        let content_start = start + 1;
        counted_chars += text[counted_bytes..content_start].chars().count();
        counted_bytes = content_start;
        Some((counted_chars, &text[content_start..pos]))
    })
}
