// SPDX-FileCopyrightText: 2026 flowlink contributors
// SPDX-License-Identifier: LicenseRef-Flowlink-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of flowlink and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::RenderError;
use crate::model::{StepId, Workflow};

const STEP_INDENT: &str = "    ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelOptions {
    /// Record a marker at the opening line of every step object.
    pub markers: bool,
}

impl Default for PanelOptions {
    fn default() -> Self {
        Self { markers: true }
    }
}

/// The line range of one step's JSON object inside the panel text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelMarker {
    step_id: StepId,
    line: usize,
    end_line: usize,
}

impl PanelMarker {
    pub fn new(step_id: StepId, line: usize, end_line: usize) -> Self {
        Self {
            step_id,
            line,
            end_line: end_line.max(line),
        }
    }

    pub fn step_id(&self) -> &StepId {
        &self.step_id
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn end_line(&self) -> usize {
        self.end_line
    }
}

/// Rendered panel text, tagged with the revision it was rendered for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelContent {
    text: String,
    markers: Vec<PanelMarker>,
    revision: u64,
}

impl PanelContent {
    /// Panel content produced by some other renderer.
    pub fn from_parts(text: impl Into<String>, markers: Vec<PanelMarker>, revision: u64) -> Self {
        Self {
            text: text.into(),
            markers,
            revision,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn markers(&self) -> &[PanelMarker] {
        &self.markers
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }
}

/// Renders the workflow as pretty-printed JSON, identical to `serde_json::to_string_pretty`,
/// while recording which lines each step object occupies.
pub fn render_panel(
    workflow: &Workflow,
    options: PanelOptions,
    revision: u64,
) -> Result<PanelContent, RenderError> {
    let mut lines = Vec::<String>::new();
    let mut markers = Vec::<PanelMarker>::new();

    lines.push("{".to_owned());
    lines.push(format!("  \"name\": {},", serde_json::to_string(workflow.name())?));
    lines.push(format!("  \"trigger\": {},", serde_json::to_string(workflow.trigger())?));

    if workflow.steps().is_empty() {
        lines.push("  \"steps\": []".to_owned());
    } else {
        lines.push("  \"steps\": [".to_owned());
        let last = workflow.steps().len() - 1;
        for (idx, step) in workflow.steps().iter().enumerate() {
            let start = lines.len();
            let block = serde_json::to_string_pretty(step)?;
            lines.extend(block.lines().map(|line| format!("{STEP_INDENT}{line}")));
            if idx != last {
                if let Some(closing) = lines.last_mut() {
                    closing.push(',');
                }
            }
            if options.markers {
                markers.push(PanelMarker::new(step.id().clone(), start, lines.len() - 1));
            }
        }
        lines.push("  ]".to_owned());
    }
    lines.push("}".to_owned());

    Ok(PanelContent {
        text: lines.join("\n"),
        markers,
        revision,
    })
}

#[cfg(test)]
mod tests {
    use super::{render_panel, PanelOptions};
    use crate::model::{fixtures, Workflow};

    #[test]
    fn matches_serde_pretty_output() {
        let workflow = fixtures::support_triage();
        let panel = render_panel(&workflow, PanelOptions::default(), 1).unwrap();
        let expected = serde_json::to_string_pretty(&workflow).unwrap();
        assert_eq!(panel.text(), expected);

        let parsed = Workflow::from_json(panel.text()).unwrap();
        assert_eq!(parsed, workflow);
    }

    #[test]
    fn empty_steps_match_serde_pretty_output() {
        let workflow = Workflow::from_json(r#"{"name": "Untitled Workflow", "trigger": "Manual Trigger"}"#)
            .unwrap();
        let panel = render_panel(&workflow, PanelOptions::default(), 1).unwrap();
        assert_eq!(panel.text(), serde_json::to_string_pretty(&workflow).unwrap());
        assert!(panel.markers().is_empty());
    }

    #[test]
    fn markers_span_each_step_object() {
        let workflow = fixtures::numbered(2);
        let panel = render_panel(&workflow, PanelOptions::default(), 7).unwrap();
        let lines = panel.text().lines().collect::<Vec<_>>();

        assert_eq!(panel.revision(), 7);
        assert_eq!(panel.markers().len(), 2);
        for (marker, step) in panel.markers().iter().zip(workflow.steps()) {
            assert_eq!(marker.step_id(), step.id());
            assert_eq!(lines[marker.line()].trim(), "{");
            assert!(lines[marker.line() + 1].contains(step.id().as_str()));
            assert!(lines[marker.end_line()].trim().starts_with('}'));
        }
    }

    #[test]
    fn markers_can_be_disabled() {
        let workflow = fixtures::numbered(2);
        let panel = render_panel(&workflow, PanelOptions { markers: false }, 1).unwrap();
        assert!(panel.markers().is_empty());
    }
}
