// SPDX-FileCopyrightText: 2026 flowlink contributors
// SPDX-License-Identifier: LicenseRef-Flowlink-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of flowlink and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use flowlink::config::AppConfig;
use flowlink::model::{Workflow, WorkflowError};
use flowlink::render::diagram::{END_NODE_ID, TRIGGER_NODE_ID};
use flowlink::render::{
    render_panel, render_workflow_diagram, PanelContent, PanelOptions, RenderedDiagram,
};
use flowlink::sync::{
    Component, DispatchOutcome, PanelViewport, PointerPress, ScrollOutcome, StepSync, SyncError,
    SyncState,
};
use rstest::rstest;

fn fixture(name: &str) -> Workflow {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    Workflow::load(&path).expect("fixture workflow")
}

struct Scene {
    workflow: Workflow,
    diagram: RenderedDiagram,
    panel: PanelContent,
    sync: StepSync,
    viewport: PanelViewport,
}

impl Scene {
    fn new(workflow: Workflow, config: &AppConfig, wrap: Option<usize>) -> Self {
        let diagram = render_workflow_diagram(&workflow, &config.render_options()).expect("diagram");
        let panel = render_panel(&workflow, config.panel_options(), 1).expect("panel");
        let sync = StepSync::for_panel(&config.sync_config(), &workflow, &panel);
        let viewport = PanelViewport::new(&panel, wrap, 8);
        Self {
            workflow,
            diagram,
            panel,
            sync,
            viewport,
        }
    }

    fn click(&mut self, raw_id: &str, now: Instant) -> DispatchOutcome {
        let (_, element) = self
            .diagram
            .nodes()
            .find(|(_, element)| element.raw_id() == Some(raw_id))
            .unwrap_or_else(|| panic!("no node {raw_id}"));
        let (x, y) = element.rect().center();
        self.sync.handle_press(
            self.diagram.elements(),
            PointerPress::new(x, y),
            &mut self.viewport,
            now,
        )
    }
}

fn highlighted(outcome: DispatchOutcome) -> ScrollOutcome {
    match outcome {
        DispatchOutcome::Highlighted(outcome) => outcome,
        other => panic!("expected a highlight, got {other:?}"),
    }
}

#[test]
fn every_step_node_lands_on_its_panel_object() {
    let mut scene = Scene::new(fixture("lead_intake.json"), &AppConfig::default(), None);
    let lines = scene.panel.text().lines().map(str::to_owned).collect::<Vec<_>>();
    let now = Instant::now();

    let step_ids = scene
        .workflow
        .steps()
        .iter()
        .map(|step| step.id().clone())
        .collect::<Vec<_>>();
    for step in step_ids {
        let outcome = highlighted(scene.click(&format!("node_{step}"), now));
        assert_eq!(outcome.step, step);
        assert_eq!(lines[outcome.rows.start].trim(), "{");
        assert!(lines[outcome.rows.start + 1].contains(step.as_str()));
        assert!(lines[outcome.rows.end].trim().starts_with('}'));
        assert!(scene.viewport.is_row_visible(outcome.rows.start));
        assert_eq!(scene.viewport.highlight(), Some(outcome.rows));
    }
    assert_eq!(scene.sync.state(), SyncState::Highlighted);
}

#[test]
fn highlight_expires_after_configured_duration() {
    let config = AppConfig::from_toml("highlight_duration_ms = 300").unwrap();
    let mut scene = Scene::new(fixture("lead_intake.json"), &config, None);
    let t0 = Instant::now();
    highlighted(scene.click("node_step_4", t0));

    assert!(!scene.sync.tick(&mut scene.viewport, t0 + Duration::from_millis(299)));
    assert!(scene.viewport.highlight().is_some());
    assert!(scene.sync.tick(&mut scene.viewport, t0 + Duration::from_millis(300)));
    assert_eq!(scene.viewport.highlight(), None);
    assert_eq!(scene.sync.state(), SyncState::Idle);
}

#[test]
fn custom_prefix_from_config_file_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("flowlink.toml");
    std::fs::write(&path, "node_id_prefixes = [\"wf-\"]\n").unwrap();
    let config = flowlink::config::load_config(Some(&path)).unwrap();

    let mut scene = Scene::new(fixture("lead_intake.json"), &config, None);
    let outcome = highlighted(scene.click("wf-step_2", Instant::now()));
    assert_eq!(outcome.step.as_str(), "step_2");
}

#[rstest]
#[case(None)]
#[case(Some(24))]
fn offset_fallback_lands_next_to_the_object(#[case] wrap: Option<usize>) {
    let config = AppConfig::from_toml("panel_markers = false").unwrap();
    let mut scene = Scene::new(fixture("lead_intake.json"), &config, wrap);
    let outcome = highlighted(scene.click("node_step_3", Instant::now()));

    // The marker-less panel locates the step by its id text, one line below the object brace.
    let lines = scene.panel.text().lines().collect::<Vec<_>>();
    let id_line = lines
        .iter()
        .position(|line| line.contains("\"step_3\""))
        .expect("id line");
    let geometry = flowlink::sync::PanelGeometry::new(scene.panel.text(), wrap);
    let brace_row = geometry.row_of_line(id_line - 1).expect("brace row");
    assert!(outcome.rows.start.abs_diff(brace_row) <= 1);
    assert!(scene.viewport.is_row_visible(outcome.rows.start));
}

#[test]
fn unknown_node_is_reported_once() {
    let mut scene = Scene::new(fixture("lead_intake.json"), &AppConfig::default(), None);
    let outcome = scene.sync.activate("node_step_99", &mut scene.viewport, Instant::now());

    assert_eq!(
        outcome.error(),
        Some(&SyncError::UnresolvedIdentifier {
            raw: "node_step_99".into()
        })
    );
    let failures = scene.sync.trace().failures().collect::<Vec<_>>();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].component, Component::Normalizer);
    assert_eq!(scene.viewport.scroll_row(), 0);
}

#[test]
fn workflow_without_steps_has_no_resolvable_nodes() {
    let mut scene = Scene::new(fixture("no_steps.json"), &AppConfig::default(), None);
    assert!(scene.sync.index().is_empty());

    for raw_id in [TRIGGER_NODE_ID, END_NODE_ID] {
        let outcome = scene.click(raw_id, Instant::now());
        assert!(matches!(
            outcome,
            DispatchOutcome::Failed(SyncError::UnresolvedIdentifier { .. })
        ));
    }
    assert_eq!(scene.sync.state(), SyncState::Idle);
}

#[test]
fn short_prefix_cannot_make_the_trigger_a_step() {
    let config = AppConfig::from_toml(r#"node_id_prefixes = ["s"]"#).unwrap();
    let workflow = Workflow::from_json(
        r#"{"name": "Short prefix", "trigger": "Manual", "steps": [
            {"id": "tart", "app": "Gmail", "action": "Send", "details": ""},
            {"id": "art", "app": "Slack", "action": "Post", "details": ""}
        ]}"#,
    )
    .unwrap();
    let mut scene = Scene::new(workflow, &config, None);
    let now = Instant::now();

    let trigger = scene.click(TRIGGER_NODE_ID, now);
    assert!(matches!(
        trigger,
        DispatchOutcome::Failed(SyncError::UnresolvedIdentifier { .. })
    ));
    assert_eq!(scene.viewport.highlight(), None);

    let step = highlighted(scene.click("start", now));
    assert_eq!(step.step.as_str(), "tart");
    assert_eq!(scene.sync.coordinator().pending_step().map(|s| s.as_str()), Some("tart"));
}

#[rstest]
#[case("start")]
#[case("end")]
fn workflow_json_with_reserved_step_id_is_rejected(#[case] id: &str) {
    let source = format!(
        r#"{{"name": "n", "trigger": "t", "steps": [{{"id": "{id}", "app": "", "action": "", "details": ""}}]}}"#
    );
    let err = Workflow::from_json(&source).unwrap_err();
    assert!(matches!(err, WorkflowError::ReservedStepId { .. }));
}

#[test]
fn panel_text_parses_back_into_the_workflow() {
    let scene = Scene::new(fixture("lead_intake.json"), &AppConfig::default(), None);
    let parsed = Workflow::from_json(scene.panel.text()).unwrap();
    assert_eq!(parsed, scene.workflow);
    assert_eq!(scene.panel.markers().len(), 4);
    assert!(PanelOptions::default().markers);
}
