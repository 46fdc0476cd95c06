// SPDX-FileCopyrightText: 2026 flowlink contributors
// SPDX-License-Identifier: LicenseRef-Flowlink-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of flowlink and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use flowlink::format::export_dot;
use flowlink::layout::layout_chain;
use flowlink::render::{render_panel, render_workflow_diagram, PanelOptions, RenderOptions};

mod fixtures;
mod profiler;

// Benchmark identity (keep stable):
// - Group names in this file: `render.layout`, `render.diagram`, `render.panel`, `render.dot`
// - Case IDs are `fixtures::Case::id`.
fn benches_render(c: &mut Criterion) {
    let options = RenderOptions::default();

    let mut group = c.benchmark_group("render.layout");
    for case in fixtures::Case::ALL {
        let workflow = fixtures::workflow(case);
        let max_label_width = options.max_label_width;
        group.bench_function(case.id(), move |b| {
            b.iter(|| black_box(layout_chain(black_box(&workflow), max_label_width).height()))
        });
    }
    group.finish();

    let mut group = c.benchmark_group("render.diagram");
    for case in fixtures::Case::ALL {
        let workflow = fixtures::workflow(case);
        let options = options.clone();
        group.bench_function(case.id(), move |b| {
            b.iter(|| {
                let rendered = render_workflow_diagram(black_box(&workflow), black_box(&options))
                    .expect("render_workflow_diagram");
                black_box(rendered.text().len())
            })
        });
    }
    group.finish();

    let mut group = c.benchmark_group("render.panel");
    for case in fixtures::Case::ALL {
        let workflow = fixtures::workflow(case);
        group.bench_function(case.id(), move |b| {
            b.iter(|| {
                let panel = render_panel(black_box(&workflow), PanelOptions::default(), 1)
                    .expect("render_panel");
                black_box(panel.markers().len())
            })
        });
    }
    group.finish();

    let mut group = c.benchmark_group("render.dot");
    for case in fixtures::Case::ALL {
        let workflow = fixtures::workflow(case);
        group.bench_function(case.id(), move |b| {
            b.iter(|| black_box(export_dot(black_box(&workflow)).len()))
        });
    }
    group.finish();
}

criterion_group! {
    name = benches;
    config = profiler::criterion();
    targets = benches_render
}
criterion_main!(benches);
