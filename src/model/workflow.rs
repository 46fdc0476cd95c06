// SPDX-FileCopyrightText: 2026 flowlink contributors
// SPDX-License-Identifier: LicenseRef-Flowlink-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of flowlink and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::ids::StepId;

/// Step ids taken by the trigger and end-of-chain nodes in graph exports.
pub const RESERVED_STEP_IDS: [&str; 2] = ["start", "end"];

/// One action in a workflow.
///
/// Field order matters: it is the order the panel prints them in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowStep {
    id: StepId,
    app: String,
    action: String,
    details: String,
}

impl WorkflowStep {
    pub fn new(
        id: StepId,
        app: impl Into<String>,
        action: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            id,
            app: app.into(),
            action: action.into(),
            details: details.into(),
        }
    }

    pub fn id(&self) -> &StepId {
        &self.id
    }

    pub fn app(&self) -> &str {
        &self.app
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    pub fn details(&self) -> &str {
        &self.details
    }
}

/// A named automation: one trigger followed by a linear sequence of steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workflow {
    name: String,
    trigger: String,
    #[serde(default)]
    steps: Vec<WorkflowStep>,
}

impl Workflow {
    /// Builds a workflow, rejecting duplicate and reserved step ids.
    pub fn new(
        name: impl Into<String>,
        trigger: impl Into<String>,
        steps: Vec<WorkflowStep>,
    ) -> Result<Self, WorkflowError> {
        let workflow = Self {
            name: name.into(),
            trigger: trigger.into(),
            steps,
        };
        workflow.validate()?;
        Ok(workflow)
    }

    pub fn from_json(source: &str) -> Result<Self, WorkflowError> {
        let workflow: Self = serde_json::from_str(source)?;
        workflow.validate()?;
        Ok(workflow)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, WorkflowError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| WorkflowError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&source)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn trigger(&self) -> &str {
        &self.trigger
    }

    pub fn steps(&self) -> &[WorkflowStep] {
        &self.steps
    }

    pub fn step(&self, id: &str) -> Option<&WorkflowStep> {
        self.steps.iter().find(|step| step.id.as_str() == id)
    }

    pub fn step_ids(&self) -> BTreeSet<StepId> {
        self.steps.iter().map(|step| step.id.clone()).collect()
    }

    fn validate(&self) -> Result<(), WorkflowError> {
        let mut seen = BTreeSet::<&str>::new();
        for step in &self.steps {
            if RESERVED_STEP_IDS.contains(&step.id.as_str()) {
                return Err(WorkflowError::ReservedStepId {
                    step_id: step.id.clone(),
                });
            }
            if !seen.insert(step.id.as_str()) {
                return Err(WorkflowError::DuplicateStepId {
                    step_id: step.id.clone(),
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("failed to read workflow {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid workflow json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("duplicate step id: {step_id}")]
    DuplicateStepId { step_id: StepId },
    #[error("step id {step_id} is reserved for the trigger or end node")]
    ReservedStepId { step_id: StepId },
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{Workflow, WorkflowError, WorkflowStep};
    use crate::model::StepId;

    fn sid(value: &str) -> StepId {
        StepId::new(value).expect("step id")
    }

    #[test]
    fn parses_workflow_json_in_panel_shape() {
        let workflow = Workflow::from_json(
            r##"{
  "name": "Lead intake",
  "trigger": "New Typeform response",
  "steps": [
    {"id": "step_1", "app": "Gmail", "action": "Send Email", "details": "To: lead"},
    {"id": "step_2", "app": "Slack", "action": "Send Message", "details": "Channel: #sales"}
  ]
}"##,
        )
        .expect("workflow");

        assert_eq!(workflow.name(), "Lead intake");
        assert_eq!(workflow.steps().len(), 2);
        assert_eq!(workflow.step("step_2").map(WorkflowStep::app), Some("Slack"));
    }

    #[test]
    fn missing_steps_defaults_to_empty() {
        let workflow =
            Workflow::from_json(r#"{"name": "Untitled Workflow", "trigger": "Manual Trigger"}"#)
                .expect("workflow");
        assert!(workflow.steps().is_empty());
    }

    #[test]
    fn rejects_duplicate_step_ids() {
        let err = Workflow::new(
            "dup",
            "manual",
            vec![
                WorkflowStep::new(sid("step_1"), "A", "a", ""),
                WorkflowStep::new(sid("step_1"), "B", "b", ""),
            ],
        )
        .unwrap_err();

        assert!(matches!(err, WorkflowError::DuplicateStepId { step_id } if step_id.as_str() == "step_1"));
    }

    #[rstest]
    #[case("start")]
    #[case("end")]
    fn rejects_reserved_step_ids(#[case] id: &str) {
        let err = Workflow::new(
            "reserved",
            "manual",
            vec![WorkflowStep::new(sid(id), "A", "a", "")],
        )
        .unwrap_err();

        assert!(matches!(err, WorkflowError::ReservedStepId { step_id } if step_id.as_str() == id));
    }

    #[test]
    fn reserved_ids_only_match_whole_ids() {
        let workflow = Workflow::new(
            "near misses",
            "manual",
            vec![
                WorkflowStep::new(sid("started"), "A", "a", ""),
                WorkflowStep::new(sid("end_1"), "B", "b", ""),
                WorkflowStep::new(sid("Start"), "C", "c", ""),
            ],
        )
        .expect("workflow");
        assert_eq!(workflow.steps().len(), 3);
    }

    #[test]
    fn rejects_invalid_step_id_in_json() {
        let err = Workflow::from_json(
            r#"{"name": "n", "trigger": "t", "steps": [{"id": "has space", "app": "", "action": "", "details": ""}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, WorkflowError::Json(_)));
    }
}
