// SPDX-FileCopyrightText: 2026 flowlink contributors
// SPDX-License-Identifier: LicenseRef-Flowlink-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of flowlink and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

#![allow(dead_code)]

// Deterministic workflows for benchmarks (no RNG).

use flowlink::model::{fixtures, Workflow};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Case {
    /// The demo workflow.
    Small,
    Medium,
    Large,
}

impl Case {
    pub const ALL: [Case; 3] = [Case::Small, Case::Medium, Case::Large];

    pub fn id(self) -> &'static str {
        match self {
            Case::Small => "small",
            Case::Medium => "medium",
            Case::Large => "large",
        }
    }
}

pub fn workflow(case: Case) -> Workflow {
    match case {
        Case::Small => fixtures::support_triage(),
        Case::Medium => fixtures::numbered(50),
        Case::Large => fixtures::numbered(500),
    }
}

/// Raw id of the last step node, the deepest entry in the panel.
pub fn last_node_id(workflow: &Workflow) -> String {
    let last = workflow.steps().last().expect("fixture has steps");
    format!("node_{}", last.id())
}
