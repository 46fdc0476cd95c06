// SPDX-FileCopyrightText: 2026 flowlink contributors
// SPDX-License-Identifier: LicenseRef-Flowlink-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of flowlink and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt::Write as _;

use crate::model::Workflow;

const TRIGGER_FILL: &str = "#FF4B4B";
const EDGE_COLOR: &str = "#aaaaaa";

/// Exports the workflow as a top-to-bottom Graphviz digraph.
///
/// The trigger becomes a filled `start` node; each step becomes a rounded box whose HTML label
/// stacks app, action and details. An empty workflow points `start` at an `end` node. Both names
/// are reserved, see [`crate::model::RESERVED_STEP_IDS`].
pub fn export_dot(workflow: &Workflow) -> String {
    let mut out = String::new();
    out.push_str("digraph G {\n");
    out.push_str("    rankdir=TB;\n");
    out.push_str("    node [shape=box, style=\"filled,rounded\", fontname=\"Helvetica\", penwidth=0];\n");
    let _ = writeln!(out, "    edge [fontname=\"Helvetica\", color=\"{EDGE_COLOR}\"];");
    out.push_str("    bgcolor=\"transparent\";\n\n");

    let _ = writeln!(
        out,
        "    start [label={}, fillcolor=\"{TRIGGER_FILL}\", fontcolor=\"white\", fontsize=12, margin=\"0.2,0.1\"];",
        quote_id(workflow.trigger())
    );

    for step in workflow.steps() {
        let _ = writeln!(
            out,
            "    {} [label=<{}<BR/><FONT POINT-SIZE=\"10\">{}</FONT><BR/><FONT POINT-SIZE=\"8\" COLOR=\"#555\">{}</FONT>>, fillcolor=\"white\", color=\"#ddd\", penwidth=1];",
            quote_id(step.id().as_str()),
            escape_html(step.app()),
            escape_html(step.action()),
            escape_html(step.details()),
        );
    }
    out.push('\n');

    match workflow.steps().first() {
        Some(first) => {
            let _ = writeln!(out, "    start -> {};", quote_id(first.id().as_str()));
        }
        None => out.push_str("    start -> end;\n"),
    }
    for pair in workflow.steps().windows(2) {
        let _ = writeln!(
            out,
            "    {} -> {};",
            quote_id(pair[0].id().as_str()),
            quote_id(pair[1].id().as_str())
        );
    }

    out.push_str("}\n");
    out
}

fn quote_id(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            _ => out.push(ch),
        }
    }
    out.push('"');
    out
}

fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}
