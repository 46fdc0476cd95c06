// SPDX-FileCopyrightText: 2026 flowlink contributors
// SPDX-License-Identifier: LicenseRef-Flowlink-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of flowlink and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use smol_str::{format_smolstr, SmolStr};

use super::{text_len, Canvas, CellRect, RenderError, UNICODE_ARROW_DOWN};
use crate::layout::{layout_chain, ChainSlot};
use crate::model::Workflow;

pub const DEFAULT_NODE_ID_PREFIX: &str = "node_";
/// Raw ids of the two non-step nodes. Both contain whitespace, which no step id may, so neither
/// the whole id nor any prefix-stripped remainder of it can name a step.
pub const TRIGGER_NODE_ID: &str = "start (trigger)";
pub const END_NODE_ID: &str = "end (placeholder)";
pub const TITLE_ELEMENT_ID: &str = "title";
const TITLE_ROWS: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Marker prepended to every step id to form the node's raw id.
    pub node_id_prefix: String,
    pub max_label_width: usize,
    pub show_title: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            node_id_prefix: DEFAULT_NODE_ID_PREFIX.to_owned(),
            max_label_width: 36,
            show_title: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Node,
    Edge,
    Decoration,
}

/// An addressable region of the rendered diagram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramElement {
    kind: ElementKind,
    raw_id: Option<SmolStr>,
    rect: CellRect,
}

impl DiagramElement {
    pub fn new(kind: ElementKind, raw_id: Option<&str>, rect: CellRect) -> Self {
        Self {
            kind,
            raw_id: raw_id.map(SmolStr::new),
            rect,
        }
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    pub fn raw_id(&self) -> Option<&str> {
        self.raw_id.as_deref()
    }

    pub fn rect(&self) -> CellRect {
        self.rect
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDiagram {
    text: String,
    elements: Vec<DiagramElement>,
}

impl RenderedDiagram {
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Elements in paint order; later elements sit on top.
    pub fn elements(&self) -> &[DiagramElement] {
        &self.elements
    }

    pub fn nodes(&self) -> impl Iterator<Item = (usize, &DiagramElement)> {
        self.elements.iter().enumerate().filter(|(_, e)| e.kind == ElementKind::Node)
    }
}

/// Renders the workflow as a vertical chain of rounded boxes.
pub fn render_workflow_diagram(
    workflow: &Workflow,
    options: &RenderOptions,
) -> Result<RenderedDiagram, RenderError> {
    let layout = layout_chain(workflow, options.max_label_width);
    let top = if options.show_title { TITLE_ROWS } else { 0 };

    let title_width = if options.show_title { text_len(workflow.name()) } else { 0 };
    let width = layout.width().max(title_width).max(1);
    let mut canvas = Canvas::new(width, layout.height() + top)?;
    let mut elements = Vec::with_capacity(layout.boxes().len() + layout.connectors().len() + 1);

    if options.show_title && title_width > 0 {
        canvas.write_str(0, 0, workflow.name())?;
        elements.push(DiagramElement::new(
            ElementKind::Decoration,
            Some(TITLE_ELEMENT_ID),
            CellRect::new(0, 0, title_width - 1, 0),
        ));
    }

    let raw_id_for = |slot: ChainSlot| -> SmolStr {
        match slot {
            ChainSlot::Trigger => SmolStr::new_static(TRIGGER_NODE_ID),
            ChainSlot::End => SmolStr::new_static(END_NODE_ID),
            ChainSlot::Step(idx) => {
                format_smolstr!("{}{}", options.node_id_prefix, workflow.steps()[idx].id())
            }
        }
    };

    for connector in layout.connectors() {
        let (x, y0, y1) = connector.span();
        let (y0, y1) = (y0 + top, y1 + top);
        if y1 > y0 {
            canvas.draw_vline(x, y0, y1 - 1)?;
        }
        canvas.set(x, y1, UNICODE_ARROW_DOWN)?;
        let raw_id =
            format_smolstr!("edge_{}_{}", raw_id_for(connector.from()), raw_id_for(connector.to()));
        elements.push(DiagramElement::new(
            ElementKind::Edge,
            Some(&raw_id),
            CellRect::new(x, y0, x, y1),
        ));
    }

    for chain_box in layout.boxes() {
        let rect = chain_box.rect();
        let rect = CellRect::new(rect.x0, rect.y0 + top, rect.x1, rect.y1 + top);
        canvas.draw_box(rect)?;

        let inner_width = rect.x1 - rect.x0 - 1;
        for (row, line) in chain_box.lines().iter().enumerate() {
            let pad = inner_width.saturating_sub(text_len(line)) / 2;
            canvas.write_str(rect.x0 + 1 + pad, rect.y0 + 1 + row, line)?;
        }

        let raw_id = raw_id_for(chain_box.slot());
        elements.push(DiagramElement::new(ElementKind::Node, Some(&raw_id), rect));
    }

    Ok(RenderedDiagram {
        text: canvas.to_trimmed_string(),
        elements,
    })
}

#[cfg(test)]
mod tests {
    use super::{render_workflow_diagram, ElementKind, RenderOptions, END_NODE_ID, TRIGGER_NODE_ID};
    use crate::model::{fixtures, StepId, Workflow};

    #[test]
    fn step_nodes_carry_prefixed_raw_ids() {
        let workflow = fixtures::numbered(2);
        let rendered = render_workflow_diagram(&workflow, &RenderOptions::default()).unwrap();

        let node_ids = rendered.nodes().filter_map(|(_, e)| e.raw_id()).collect::<Vec<_>>();
        assert_eq!(node_ids, vec![TRIGGER_NODE_ID, "node_step_1", "node_step_2"]);
    }

    #[test]
    fn empty_workflow_ends_in_placeholder_node() {
        let workflow = Workflow::new("Untitled", "Manual", Vec::new()).unwrap();
        let rendered = render_workflow_diagram(&workflow, &RenderOptions::default()).unwrap();

        let node_ids = rendered.nodes().filter_map(|(_, e)| e.raw_id()).collect::<Vec<_>>();
        assert_eq!(node_ids, vec![TRIGGER_NODE_ID, END_NODE_ID]);
    }

    #[test]
    fn non_step_node_ids_are_never_step_ids() {
        for raw_id in [TRIGGER_NODE_ID, END_NODE_ID] {
            assert!(StepId::new(raw_id).is_err(), "{raw_id}");
            // Prefixes never contain whitespace, so they cannot strip past the first space.
            let space = raw_id.find(' ').expect("space");
            for split in 1..=space {
                assert!(StepId::new(&raw_id[split..]).is_err(), "{raw_id} at {split}");
            }
        }
    }

    #[test]
    fn raw_id_prefix_is_configurable() {
        let workflow = fixtures::numbered(1);
        let options = RenderOptions {
            node_id_prefix: String::new(),
            ..RenderOptions::default()
        };
        let rendered = render_workflow_diagram(&workflow, &options).unwrap();
        assert!(rendered.nodes().any(|(_, e)| e.raw_id() == Some("step_1")));
    }

    #[test]
    fn renders_labels_inside_boxes_and_arrows_between() {
        let workflow = fixtures::support_triage();
        let rendered = render_workflow_diagram(&workflow, &RenderOptions::default()).unwrap();
        let text = rendered.text();

        assert!(text.starts_with("Support Triage"));
        assert!(text.contains("Categorize Issue"));
        assert_eq!(text.matches('▼').count(), workflow.steps().len());
        assert_eq!(text.matches('╭').count(), workflow.steps().len() + 1);
    }

    #[test]
    fn node_rects_cover_their_labels() {
        let workflow = fixtures::numbered(2);
        let rendered = render_workflow_diagram(&workflow, &RenderOptions::default()).unwrap();
        let lines = rendered.text().lines().collect::<Vec<_>>();

        let (_, node) = rendered
            .nodes()
            .find(|(_, e)| e.raw_id() == Some("node_step_2"))
            .expect("step 2 node");
        let rect = node.rect();
        let label_row = lines[rect.y0 + 1];
        assert!(label_row.contains("App 2"));
        assert_eq!(label_row.chars().nth(rect.x0), Some('│'));
    }

    #[test]
    fn edges_and_title_are_not_nodes() {
        let workflow = fixtures::numbered(2);
        let rendered = render_workflow_diagram(&workflow, &RenderOptions::default()).unwrap();

        let kinds = rendered.elements().iter().map(|e| e.kind()).collect::<Vec<_>>();
        assert_eq!(kinds.iter().filter(|k| **k == ElementKind::Edge).count(), 2);
        assert_eq!(kinds.iter().filter(|k| **k == ElementKind::Decoration).count(), 1);
        assert!(rendered
            .elements()
            .iter()
            .any(|e| e.raw_id() == Some("edge_node_step_1_node_step_2")));
    }
}
