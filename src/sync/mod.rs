// SPDX-FileCopyrightText: 2026 flowlink contributors
// SPDX-License-Identifier: LicenseRef-Flowlink-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of flowlink and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Diagram ⇄ panel synchronization.
//!
//! A press on a diagram node runs, synchronously and in order: hit test, identifier
//! normalization, index lookup, location, scroll and highlight. Every step records a
//! [`TraceEntry`]; failures never escape [`StepSync`] and surface as
//! [`DispatchOutcome::Failed`].

use std::collections::BTreeSet;
use std::fmt;
use std::time::{Duration, Instant};

use smol_str::{format_smolstr, SmolStr};
use thiserror::Error;

use crate::model::{StepId, Workflow};
use crate::render::PanelContent;

pub mod dispatch;
pub mod index;
pub mod locate;
pub mod normalize;
pub mod scroll;
pub mod trace;
pub mod viewport;

pub use dispatch::{hit_test, DispatchOutcome, InteractiveElement, PointerPress};
pub use index::{IndexEntry, MarkerSpan, StepIndex};
pub use locate::{locate, PanelGeometry, RowSpan, Target};
pub use normalize::{Candidate, Candidates, IdentifierNormalizer, KnownSteps, NormalizeRule};
pub use scroll::{ClearToken, LocatedTarget, ScrollCoordinator, ScrollOutcome};
pub use trace::{Component, Decision, TraceEntry, TraceLog};
pub use viewport::{PanelViewport, ScrollSurface, SurfaceError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyncState {
    Idle,
    Resolving,
    Located,
    Unresolved,
    Scrolled,
    Highlighted,
}

impl SyncState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Resolving => "resolving",
            Self::Located => "located",
            Self::Unresolved => "unresolved",
            Self::Scrolled => "scrolled",
            Self::Highlighted => "highlighted",
        }
    }
}

impl fmt::Display for SyncState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    #[error("no workflow step matches diagram node `{raw}`")]
    UnresolvedIdentifier { raw: SmolStr },
    #[error("step `{step}` has no location in the panel")]
    MissingAnchor { step: StepId },
    #[error("could not scroll to step `{step}`: {reason}")]
    ScrollFailure { step: StepId, reason: SmolStr },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    pub node_id_prefixes: Vec<String>,
    pub highlight_duration: Duration,
    /// Rows kept visible above the target after scrolling.
    pub scroll_context_rows: usize,
    pub trace_capacity: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            node_id_prefixes: vec!["node_".to_owned()],
            highlight_duration: Duration::from_millis(1500),
            scroll_context_rows: 2,
            trace_capacity: 200,
        }
    }
}

/// Owns the per-render sync state of one workflow: known ids, the panel index, the scroll
/// coordinator and the trace.
#[derive(Debug, Clone)]
pub struct StepSync {
    normalizer: IdentifierNormalizer,
    known: BTreeSet<StepId>,
    index: StepIndex,
    coordinator: ScrollCoordinator,
    trace: TraceLog,
}

impl StepSync {
    pub fn new(config: &SyncConfig) -> Self {
        Self {
            normalizer: IdentifierNormalizer::with_prefixes(&config.node_id_prefixes),
            known: BTreeSet::new(),
            index: StepIndex::default(),
            coordinator: ScrollCoordinator::new(
                config.highlight_duration,
                config.scroll_context_rows,
            ),
            trace: TraceLog::new(config.trace_capacity),
        }
    }

    /// Convenience for a workflow and its panel in one call.
    pub fn for_panel(config: &SyncConfig, workflow: &Workflow, panel: &PanelContent) -> Self {
        let mut sync = Self::new(config);
        sync.rebuild(workflow, panel);
        sync
    }

    /// Replaces the known ids and the index after the panel was re-rendered.
    ///
    /// A pending highlight belongs to the old content and is dropped.
    pub fn rebuild(&mut self, workflow: &Workflow, panel: &PanelContent) {
        self.coordinator.cancel_pending(&mut self.trace);
        self.known = workflow.step_ids();
        self.index = StepIndex::build(panel, &self.known);
        self.trace.record(
            Component::Index,
            Decision::IndexRebuilt {
                entries: self.index.len(),
                revision: self.index.revision(),
            },
            None,
        );
    }

    pub fn index(&self) -> &StepIndex {
        &self.index
    }

    pub fn trace(&self) -> &TraceLog {
        &self.trace
    }

    pub fn state(&self) -> SyncState {
        self.coordinator.state()
    }

    pub fn coordinator(&self) -> &ScrollCoordinator {
        &self.coordinator
    }

    pub fn normalizer(&self) -> &IdentifierNormalizer {
        &self.normalizer
    }

    /// Handles a pointer press at diagram content coordinates.
    pub fn handle_press<E, S>(
        &mut self,
        elements: &[E],
        press: PointerPress,
        surface: &mut S,
        now: Instant,
    ) -> DispatchOutcome
    where
        E: InteractiveElement,
        S: ScrollSurface + ?Sized,
    {
        let Some(element) = hit_test(elements, press) else {
            self.trace.record(Component::Dispatcher, Decision::NoNodeHit, None);
            return DispatchOutcome::Missed;
        };
        let Some(raw_id) = element.raw_id() else {
            self.trace.record(Component::Dispatcher, Decision::MissingRawId, None);
            return DispatchOutcome::Ignored;
        };
        let raw_id = SmolStr::new(raw_id);
        self.activate(&raw_id, surface, now)
    }

    /// Runs resolution and scrolling for a raw node id, as if its node had been pressed.
    pub fn activate<S>(&mut self, raw_id: &str, surface: &mut S, now: Instant) -> DispatchOutcome
    where
        S: ScrollSurface + ?Sized,
    {
        match self.resolve_and_scroll(raw_id, surface, now) {
            Ok(outcome) => DispatchOutcome::Highlighted(outcome),
            Err(err) => DispatchOutcome::Failed(err),
        }
    }

    /// Clears the highlight once its window has elapsed. Returns `true` when it did.
    pub fn tick<S>(&mut self, surface: &mut S, now: Instant) -> bool
    where
        S: ScrollSurface + ?Sized,
    {
        self.coordinator.tick(surface, now, &mut self.trace).is_some()
    }

    /// Re-applies a running highlight after the surface re-wrapped its content.
    pub fn refresh_highlight<S>(&mut self, surface: &mut S) -> Option<RowSpan>
    where
        S: ScrollSurface + ?Sized,
    {
        self.coordinator.refresh_highlight(surface, &mut self.trace)
    }

    fn resolve_and_scroll<S>(
        &mut self,
        raw_id: &str,
        surface: &mut S,
        now: Instant,
    ) -> Result<ScrollOutcome, SyncError>
    where
        S: ScrollSurface + ?Sized,
    {
        let trace = &mut self.trace;
        self.coordinator
            .transition(Component::Dispatcher, SyncState::Resolving, Some(raw_id), trace);

        let candidates = self.normalizer.normalize(raw_id, &self.known);
        let Some(first) = candidates.first() else {
            trace.record(Component::Normalizer, Decision::UnresolvedIdentifier, Some(raw_id));
            self.coordinator
                .transition(Component::Normalizer, SyncState::Unresolved, Some(raw_id), trace);
            self.coordinator.settle(Component::Dispatcher, Some(raw_id), trace);
            return Err(SyncError::UnresolvedIdentifier {
                raw: SmolStr::new(raw_id),
            });
        };

        let found = candidates.iter().find_map(|candidate| {
            locate(candidate.step_id.as_str(), &self.index).map(|target| (candidate, target))
        });
        let Some((candidate, target)) = found else {
            let step = first.step_id.clone();
            trace.record(Component::Index, Decision::MissingAnchor, Some(step.as_str()));
            self.coordinator.transition(
                Component::Locator,
                SyncState::Unresolved,
                Some(step.as_str()),
                trace,
            );
            self.coordinator.settle(Component::Dispatcher, Some(step.as_str()), trace);
            return Err(SyncError::MissingAnchor { step });
        };

        let step = candidate.step_id.clone();
        trace.record(
            Component::Normalizer,
            Decision::Candidate {
                rule: format_smolstr!("{}", candidate.rule),
            },
            Some(step.as_str()),
        );
        trace.record(
            Component::Locator,
            Decision::Located {
                target: format_smolstr!("{target}"),
            },
            Some(step.as_str()),
        );
        self.coordinator
            .transition(Component::Locator, SyncState::Located, Some(step.as_str()), trace);

        let located = LocatedTarget {
            step,
            target,
            revision: self.index.revision(),
        };
        self.coordinator.scroll_to(&located, surface, now, trace)
    }
}
