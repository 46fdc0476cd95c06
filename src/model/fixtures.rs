// SPDX-FileCopyrightText: 2026 flowlink contributors
// SPDX-License-Identifier: LicenseRef-Flowlink-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of flowlink and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::ids::StepId;
use super::workflow::{Workflow, WorkflowStep};

fn sid(value: &str) -> StepId {
    StepId::new(value).expect("step id")
}

/// The workflow shown by `--demo` and when no file is given.
pub fn support_triage() -> Workflow {
    Workflow::new(
        "Support Triage",
        "New email in support@",
        vec![
            WorkflowStep::new(
                sid("step_1"),
                "Gmail",
                "Read Message",
                "Mailbox: support@",
            ),
            WorkflowStep::new(
                sid("step_2"),
                "Customer Support System",
                "Categorize Issue",
                "Category: refund, bug, question",
            ),
            WorkflowStep::new(
                sid("step_3"),
                "Linear",
                "Create Ticket",
                "Team: Support, Priority from category",
            ),
            WorkflowStep::new(
                sid("step_4"),
                "Slack",
                "Send Message",
                "Channel: #support",
            ),
            WorkflowStep::new(sid("step_5"), "Gmail", "Reply", "Template: acknowledgement"),
        ],
    )
    .expect("demo workflow has unique step ids")
}

/// `count` generic steps named `step_1..=step_count`.
pub fn numbered(count: usize) -> Workflow {
    let steps = (1..=count)
        .map(|idx| {
            WorkflowStep::new(
                sid(&format!("step_{idx}")),
                format!("App {idx}"),
                format!("Action {idx}"),
                format!("Details for step {idx}"),
            )
        })
        .collect();
    Workflow::new(format!("Numbered {count}"), "Manual Trigger", steps)
        .expect("numbered steps are unique")
}
