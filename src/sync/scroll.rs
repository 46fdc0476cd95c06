// SPDX-FileCopyrightText: 2026 flowlink contributors
// SPDX-License-Identifier: LicenseRef-Flowlink-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of flowlink and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::time::{Duration, Instant};

use smol_str::{format_smolstr, SmolStr};

use super::locate::{RowSpan, Target};
use super::trace::{Component, Decision, TraceLog};
use super::viewport::ScrollSurface;
use super::{SyncError, SyncState};
use crate::model::StepId;

/// A step located against one index revision, ready to scroll to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedTarget {
    pub step: StepId,
    pub target: Target,
    pub revision: u64,
}

/// Identifies one highlight request. Only the newest token may clear the highlight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClearToken(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingClear {
    token: ClearToken,
    step: StepId,
    target: Target,
    revision: u64,
    deadline: Instant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollOutcome {
    pub step: StepId,
    pub target: Target,
    pub scroll_row: usize,
    pub rows: RowSpan,
    pub token: ClearToken,
    /// A previous highlight was still pending and got cancelled.
    pub superseded: bool,
}

#[derive(Debug, Clone)]
pub struct ScrollCoordinator {
    state: SyncState,
    highlight_duration: Duration,
    context_rows: usize,
    pending: Option<PendingClear>,
    next_token: u64,
}

impl ScrollCoordinator {
    pub fn new(highlight_duration: Duration, context_rows: usize) -> Self {
        Self {
            state: SyncState::Idle,
            highlight_duration,
            context_rows,
            pending: None,
            next_token: 0,
        }
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    pub fn pending_token(&self) -> Option<ClearToken> {
        self.pending.as_ref().map(|pending| pending.token)
    }

    pub fn pending_step(&self) -> Option<&StepId> {
        self.pending.as_ref().map(|pending| &pending.step)
    }

    pub fn highlight_duration(&self) -> Duration {
        self.highlight_duration
    }

    pub(super) fn transition(
        &mut self,
        component: Component,
        to: SyncState,
        identifier: Option<&str>,
        trace: &mut TraceLog,
    ) {
        if self.state == to {
            return;
        }
        let from = std::mem::replace(&mut self.state, to);
        trace.record(component, Decision::Transition { from, to }, identifier);
    }

    /// Returns to `Highlighted` if a highlight is still showing, otherwise to `Idle`.
    pub(super) fn settle(&mut self, component: Component, identifier: Option<&str>, trace: &mut TraceLog) {
        let to = if self.pending.is_some() {
            SyncState::Highlighted
        } else {
            SyncState::Idle
        };
        self.transition(component, to, identifier, trace);
    }

    /// Scrolls `surface` to `located` and starts a fresh highlight window.
    ///
    /// Expects the pipeline to be in `Located`. On failure the previous highlight and its pending
    /// clear stay in place. A surface that scrolls but then refuses the highlight is left at the
    /// new scroll position.
    pub fn scroll_to<S>(
        &mut self,
        located: &LocatedTarget,
        surface: &mut S,
        now: Instant,
        trace: &mut TraceLog,
    ) -> Result<ScrollOutcome, SyncError>
    where
        S: ScrollSurface + ?Sized,
    {
        let step = located.step.as_str();

        if located.revision != surface.revision() {
            let reason = format_smolstr!(
                "stale target (rev {} vs panel rev {})",
                located.revision,
                surface.revision()
            );
            return Err(self.fail(&located.step, reason, trace));
        }

        let Some(rows) = surface.geometry().rows_for(&located.target) else {
            let reason = format_smolstr!("{} is outside the panel", located.target);
            return Err(self.fail(&located.step, reason, trace));
        };

        let scroll_row = rows.start.saturating_sub(self.context_rows);
        if let Err(err) = surface.scroll_to_row(scroll_row) {
            return Err(self.fail(&located.step, format_smolstr!("{err}"), trace));
        }
        trace.record(Component::Coordinator, Decision::Scrolled { row: scroll_row }, Some(step));
        self.transition(Component::Coordinator, SyncState::Scrolled, Some(step), trace);

        if let Err(err) = surface.set_highlight(Some(rows)) {
            return Err(self.fail(&located.step, format_smolstr!("{err}"), trace));
        }

        let superseded = match self.pending.take() {
            Some(previous) => {
                trace.record(
                    Component::Coordinator,
                    Decision::HighlightSuperseded,
                    Some(previous.step.as_str()),
                );
                true
            }
            None => false,
        };

        let token = ClearToken(self.next_token);
        self.next_token += 1;
        self.pending = Some(PendingClear {
            token,
            step: located.step.clone(),
            target: located.target,
            revision: located.revision,
            deadline: now + self.highlight_duration,
        });
        self.transition(Component::Coordinator, SyncState::Highlighted, Some(step), trace);

        Ok(ScrollOutcome {
            step: located.step.clone(),
            target: located.target,
            scroll_row,
            rows,
            token,
            superseded,
        })
    }

    /// Clears the highlight once the current request's deadline has passed.
    ///
    /// Returns the token that expired, if any. A surface that refuses the clear is traced as a
    /// failure; the request is over either way.
    pub fn tick<S>(&mut self, surface: &mut S, now: Instant, trace: &mut TraceLog) -> Option<ClearToken>
    where
        S: ScrollSurface + ?Sized,
    {
        let due = matches!(&self.pending, Some(pending) if now >= pending.deadline);
        if !due {
            return None;
        }
        let expired = self.pending.take()?;
        let decision = match surface.set_highlight(None) {
            Ok(()) => Decision::HighlightCleared,
            Err(err) => Decision::ScrollFailure {
                reason: format_smolstr!("clearing highlight: {err}"),
            },
        };
        trace.record(Component::Coordinator, decision, Some(expired.step.as_str()));
        self.transition(Component::Coordinator, SyncState::Idle, Some(expired.step.as_str()), trace);
        Some(expired.token)
    }

    /// Re-applies the pending highlight after the surface's geometry changed, e.g. on re-wrap.
    ///
    /// The deadline is kept. If the target no longer maps onto the surface the pending clear is
    /// cancelled instead. Returns the rows now highlighted.
    pub fn refresh_highlight<S>(&mut self, surface: &mut S, trace: &mut TraceLog) -> Option<RowSpan>
    where
        S: ScrollSurface + ?Sized,
    {
        let pending = self.pending.as_ref()?;
        let rows = (pending.revision == surface.revision())
            .then(|| surface.geometry().rows_for(&pending.target))
            .flatten();
        let applied = rows.filter(|rows| surface.set_highlight(Some(*rows)).is_ok());
        match applied {
            Some(rows) => {
                trace.record(
                    Component::Coordinator,
                    Decision::HighlightRefreshed {
                        start: rows.start,
                        end: rows.end,
                    },
                    Some(pending.step.as_str()),
                );
                Some(rows)
            }
            None => {
                // The old rows may now cover unrelated text.
                if let Err(err) = surface.set_highlight(None) {
                    trace.record(
                        Component::Coordinator,
                        Decision::ScrollFailure {
                            reason: format_smolstr!("clearing highlight: {err}"),
                        },
                        Some(pending.step.as_str()),
                    );
                }
                self.cancel_pending(trace);
                None
            }
        }
    }

    /// Drops the pending clear without touching any surface, e.g. when the content is replaced.
    pub fn cancel_pending(&mut self, trace: &mut TraceLog) -> Option<StepId> {
        let pending = self.pending.take()?;
        trace.record(
            Component::Coordinator,
            Decision::HighlightCancelled,
            Some(pending.step.as_str()),
        );
        self.transition(Component::Coordinator, SyncState::Idle, Some(pending.step.as_str()), trace);
        Some(pending.step)
    }

    fn fail(&mut self, step: &StepId, reason: SmolStr, trace: &mut TraceLog) -> SyncError {
        trace.record(
            Component::Coordinator,
            Decision::ScrollFailure {
                reason: reason.clone(),
            },
            Some(step.as_str()),
        );
        self.settle(Component::Coordinator, Some(step.as_str()), trace);
        SyncError::ScrollFailure {
            step: step.clone(),
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::{LocatedTarget, ScrollCoordinator};
    use crate::model::StepId;
    use crate::render::PanelContent;
    use crate::sync::{
        Component, Decision, PanelGeometry, PanelViewport, RowSpan, ScrollSurface, SurfaceError,
        SyncError, SyncState, Target, TraceLog,
    };

    /// A viewport whose highlight calls can be switched to fail.
    struct FlakyHighlight {
        view: PanelViewport,
        refuse_highlight: bool,
    }

    impl ScrollSurface for FlakyHighlight {
        fn revision(&self) -> u64 {
            self.view.revision()
        }

        fn geometry(&self) -> &PanelGeometry {
            self.view.geometry()
        }

        fn scroll_to_row(&mut self, row: usize) -> Result<(), SurfaceError> {
            self.view.scroll_to_row(row)
        }

        fn set_highlight(&mut self, rows: Option<RowSpan>) -> Result<(), SurfaceError> {
            if self.refuse_highlight {
                return Err(SurfaceError::Detached);
            }
            self.view.set_highlight(rows)
        }
    }

    fn view_text() -> String {
        (0..40).map(|i| format!("line {i}")).collect::<Vec<_>>().join("\n")
    }

    fn viewport() -> PanelViewport {
        PanelViewport::new(&PanelContent::from_parts(view_text(), Vec::new(), 1), None, 10)
    }

    fn located(step: &str, line: usize) -> LocatedTarget {
        LocatedTarget {
            step: StepId::new(step).unwrap(),
            target: Target::ElementAnchor { line, end_line: line + 3 },
            revision: 1,
        }
    }

    fn coordinator_in_located(trace: &mut TraceLog) -> ScrollCoordinator {
        let mut coordinator = ScrollCoordinator::new(Duration::from_millis(500), 2);
        coordinator.transition(Component::Locator, SyncState::Located, None, trace);
        coordinator
    }

    #[test]
    fn scrolls_with_context_rows_and_highlights_the_block() {
        let mut trace = TraceLog::new(32);
        let mut coordinator = coordinator_in_located(&mut trace);
        let mut view = viewport();

        let outcome = coordinator
            .scroll_to(&located("a", 12), &mut view, Instant::now(), &mut trace)
            .unwrap();

        assert_eq!(outcome.scroll_row, 10);
        assert_eq!(outcome.rows, RowSpan { start: 12, end: 15 });
        assert_eq!(view.scroll_row(), 10);
        assert_eq!(view.highlight(), Some(RowSpan { start: 12, end: 15 }));
        assert_eq!(coordinator.state(), SyncState::Highlighted);
        assert!(!outcome.superseded);
    }

    #[test]
    fn target_near_top_clamps_scroll_to_zero() {
        let mut trace = TraceLog::new(32);
        let mut coordinator = coordinator_in_located(&mut trace);
        let mut view = viewport();

        let outcome = coordinator
            .scroll_to(&located("a", 1), &mut view, Instant::now(), &mut trace)
            .unwrap();
        assert_eq!(outcome.scroll_row, 0);
    }

    #[test]
    fn tick_clears_only_after_deadline() {
        let mut trace = TraceLog::new(32);
        let mut coordinator = coordinator_in_located(&mut trace);
        let mut view = viewport();
        let t0 = Instant::now();

        let outcome = coordinator.scroll_to(&located("a", 5), &mut view, t0, &mut trace).unwrap();

        assert_eq!(coordinator.tick(&mut view, t0 + Duration::from_millis(499), &mut trace), None);
        assert!(view.highlight().is_some());
        assert_eq!(
            coordinator.tick(&mut view, t0 + Duration::from_millis(500), &mut trace),
            Some(outcome.token)
        );
        assert_eq!(view.highlight(), None);
        assert_eq!(coordinator.state(), SyncState::Idle);
        assert_eq!(coordinator.tick(&mut view, t0 + Duration::from_secs(5), &mut trace), None);
    }

    #[test]
    fn stale_revision_is_a_scroll_failure() {
        let mut trace = TraceLog::new(32);
        let mut coordinator = coordinator_in_located(&mut trace);
        let mut view = viewport();
        let mut target = located("a", 5);
        target.revision = 0;

        let err = coordinator
            .scroll_to(&target, &mut view, Instant::now(), &mut trace)
            .unwrap_err();
        assert!(matches!(err, SyncError::ScrollFailure { .. }));
        assert_eq!(view.scroll_row(), 0);
        assert_eq!(view.highlight(), None);
        assert_eq!(coordinator.state(), SyncState::Idle);
        assert_eq!(trace.failures().count(), 1);
    }

    #[test]
    fn target_outside_panel_is_a_scroll_failure() {
        let mut trace = TraceLog::new(32);
        let mut coordinator = coordinator_in_located(&mut trace);
        let mut view = viewport();

        let err = coordinator
            .scroll_to(&located("a", 400), &mut view, Instant::now(), &mut trace)
            .unwrap_err();
        assert!(matches!(err, SyncError::ScrollFailure { .. }));
    }

    #[test]
    fn refused_highlight_keeps_previous_pending_clear() {
        let mut trace = TraceLog::new(64);
        let mut coordinator = coordinator_in_located(&mut trace);
        let mut surface = FlakyHighlight {
            view: viewport(),
            refuse_highlight: false,
        };
        let t0 = Instant::now();

        let first = coordinator.scroll_to(&located("a", 5), &mut surface, t0, &mut trace).unwrap();
        surface.refuse_highlight = true;
        coordinator.transition(Component::Locator, SyncState::Located, None, &mut trace);
        let err = coordinator
            .scroll_to(&located("b", 30), &mut surface, t0, &mut trace)
            .unwrap_err();

        assert!(matches!(err, SyncError::ScrollFailure { .. }));
        assert_eq!(coordinator.pending_token(), Some(first.token));
        assert_eq!(coordinator.pending_step().map(|s| s.as_str()), Some("a"));
        assert_eq!(coordinator.state(), SyncState::Highlighted);
        assert_eq!(surface.view.highlight(), Some(first.rows));
        assert!(!trace.entries().any(|e| e.decision == Decision::HighlightSuperseded));

        surface.refuse_highlight = false;
        assert_eq!(
            coordinator.tick(&mut surface, t0 + Duration::from_millis(500), &mut trace),
            Some(first.token)
        );
        assert_eq!(surface.view.highlight(), None);
    }

    #[test]
    fn refused_clear_is_traced_and_still_ends_the_window() {
        let mut trace = TraceLog::new(64);
        let mut coordinator = coordinator_in_located(&mut trace);
        let mut surface = FlakyHighlight {
            view: viewport(),
            refuse_highlight: false,
        };
        let t0 = Instant::now();

        let outcome = coordinator.scroll_to(&located("a", 5), &mut surface, t0, &mut trace).unwrap();
        surface.refuse_highlight = true;

        assert_eq!(
            coordinator.tick(&mut surface, t0 + Duration::from_secs(1), &mut trace),
            Some(outcome.token)
        );
        let failures = trace.failures().collect::<Vec<_>>();
        assert_eq!(failures.len(), 1);
        assert!(matches!(
            &failures[0].decision,
            Decision::ScrollFailure { reason } if reason.starts_with("clearing highlight")
        ));
        assert_eq!(coordinator.pending_token(), None);
        assert_eq!(coordinator.state(), SyncState::Idle);
    }

    #[test]
    fn rewrap_moves_the_pending_highlight_onto_new_rows() {
        let mut trace = TraceLog::new(64);
        let mut coordinator = coordinator_in_located(&mut trace);
        let mut view = viewport();
        let t0 = Instant::now();
        let target = located("a", 12);

        let outcome = coordinator.scroll_to(&target, &mut view, t0, &mut trace).unwrap();
        assert!(view.rewrap(&view_text(), Some(4)));
        assert_eq!(view.highlight(), None);

        let rows = coordinator.refresh_highlight(&mut view, &mut trace).expect("rows");
        assert_eq!(Some(rows), view.geometry().rows_for(&target.target));
        assert_ne!(rows, outcome.rows);
        assert_eq!(view.highlight(), Some(rows));
        assert_eq!(coordinator.pending_token(), Some(outcome.token));
        assert_eq!(coordinator.state(), SyncState::Highlighted);

        // The deadline is unchanged.
        assert_eq!(
            coordinator.tick(&mut view, t0 + Duration::from_millis(500), &mut trace),
            Some(outcome.token)
        );
    }

    #[test]
    fn refresh_cancels_when_target_no_longer_fits() {
        let mut trace = TraceLog::new(64);
        let mut coordinator = coordinator_in_located(&mut trace);
        let mut view = viewport();

        coordinator
            .scroll_to(&located("a", 30), &mut view, Instant::now(), &mut trace)
            .unwrap();
        view.replace_content(&PanelContent::from_parts("short", Vec::new(), 2), None);

        assert_eq!(coordinator.refresh_highlight(&mut view, &mut trace), None);
        assert_eq!(coordinator.pending_token(), None);
        assert_eq!(coordinator.state(), SyncState::Idle);
        assert_eq!(view.highlight(), None);
        assert!(trace.entries().any(|e| e.decision == Decision::HighlightCancelled));
    }

    #[test]
    fn cancelled_clear_is_not_traced_as_expired() {
        let mut trace = TraceLog::new(64);
        let mut coordinator = coordinator_in_located(&mut trace);
        let mut view = viewport();

        coordinator
            .scroll_to(&located("a", 5), &mut view, Instant::now(), &mut trace)
            .unwrap();
        let cancelled = coordinator.cancel_pending(&mut trace);
        assert_eq!(cancelled.as_ref().map(StepId::as_str), Some("a"));

        let last = trace
            .entries()
            .map(|e| &e.decision)
            .filter(|decision| !matches!(decision, Decision::Transition { .. }))
            .last();
        assert_eq!(last, Some(&Decision::HighlightCancelled));
        assert!(!trace.entries().any(|e| e.decision == Decision::HighlightCleared));
        assert_eq!(coordinator.cancel_pending(&mut trace), None);
    }
}
