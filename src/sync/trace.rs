// SPDX-FileCopyrightText: 2026 flowlink contributors
// SPDX-License-Identifier: LicenseRef-Flowlink-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of flowlink and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::VecDeque;
use std::fmt;

use log::{debug, warn};
use smol_str::SmolStr;

use super::SyncState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Component {
    Dispatcher,
    Normalizer,
    Index,
    Locator,
    Coordinator,
}

impl Component {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dispatcher => "dispatcher",
            Self::Normalizer => "normalizer",
            Self::Index => "index",
            Self::Locator => "locator",
            Self::Coordinator => "coordinator",
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a component decided at one point of the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// The pipeline moved between states.
    Transition { from: SyncState, to: SyncState },
    NoNodeHit,
    MissingRawId,
    Candidate { rule: SmolStr },
    IndexRebuilt { entries: usize, revision: u64 },
    Located { target: SmolStr },
    Scrolled { row: usize },
    HighlightSuperseded,
    /// The highlight window ran out.
    HighlightCleared,
    /// The pending clear was dropped because the content it pointed into went away.
    HighlightCancelled,
    HighlightRefreshed { start: usize, end: usize },
    UnresolvedIdentifier,
    MissingAnchor,
    ScrollFailure { reason: SmolStr },
}

impl Decision {
    /// Failures are the entries a developer needs to see when a click "did nothing".
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Self::UnresolvedIdentifier | Self::MissingAnchor | Self::ScrollFailure { .. }
        )
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transition { from, to } => write!(f, "{from} -> {to}"),
            Self::NoNodeHit => f.write_str("no node under pointer"),
            Self::MissingRawId => f.write_str("node has no identifier"),
            Self::Candidate { rule } => write!(f, "candidate via {rule}"),
            Self::IndexRebuilt { entries, revision } => {
                write!(f, "index rebuilt ({entries} entries, rev {revision})")
            }
            Self::Located { target } => write!(f, "located {target}"),
            Self::Scrolled { row } => write!(f, "scrolled to row {row}"),
            Self::HighlightSuperseded => f.write_str("pending highlight superseded"),
            Self::HighlightCleared => f.write_str("highlight cleared"),
            Self::HighlightCancelled => f.write_str("pending highlight cancelled"),
            Self::HighlightRefreshed { start, end } => {
                write!(f, "highlight moved to rows {start}..={end}")
            }
            Self::UnresolvedIdentifier => f.write_str("unresolved identifier"),
            Self::MissingAnchor => f.write_str("missing anchor"),
            Self::ScrollFailure { reason } => write!(f, "scroll failed: {reason}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceEntry {
    pub component: Component,
    pub decision: Decision,
    /// The raw or canonical identifier the decision was about, if any.
    pub identifier: Option<SmolStr>,
}

impl fmt::Display for TraceEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.component, self.decision)?;
        if let Some(identifier) = &self.identifier {
            write!(f, " ({identifier})")?;
        }
        Ok(())
    }
}

/// Bounded in-memory trace, mirrored to the `log` facade.
///
/// Failures are logged at `warn`, everything else at `debug`.
#[derive(Debug, Clone)]
pub struct TraceLog {
    entries: VecDeque<TraceEntry>,
    capacity: usize,
}

impl TraceLog {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity.min(256)),
            capacity,
        }
    }

    pub fn record(
        &mut self,
        component: Component,
        decision: Decision,
        identifier: Option<&str>,
    ) {
        let identifier_kv = identifier.unwrap_or("");
        if decision.is_failure() {
            warn!(
                component = component.as_str(),
                identifier = identifier_kv,
                decision:% = decision;
                "sync decision"
            );
        } else {
            debug!(
                component = component.as_str(),
                identifier = identifier_kv,
                decision:% = decision;
                "sync decision"
            );
        }

        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(TraceEntry {
            component,
            decision,
            identifier: identifier.map(SmolStr::new),
        });
    }

    pub fn entries(&self) -> impl DoubleEndedIterator<Item = &TraceEntry> + ExactSizeIterator {
        self.entries.iter()
    }

    pub fn failures(&self) -> impl Iterator<Item = &TraceEntry> {
        self.entries.iter().filter(|entry| entry.decision.is_failure())
    }

    /// The last `count` entries, oldest first.
    pub fn latest(&self, count: usize) -> impl Iterator<Item = &TraceEntry> {
        self.entries.iter().skip(self.entries.len().saturating_sub(count))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
