// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Benchmarks for scene-tree bounds queries.
//!
//! Builds a deterministic synthetic scene shaped like a widget gallery (a
//! grid of cells, each with a background quad, an icon, and a label; a few
//! cells rotated) and measures the exact and shortcut aggregation paths,
//! warm and cold.

use core::time::Duration;
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use kurbo::{Affine, Rect, Vec2};
use peniko::{Brush, Color};
use thicket_content::{Content, Quad, ShapeSet, TextBlock, TextMetrics};
use thicket_scene::{BoundsMode, NodeId, Scene};

fn solid() -> Brush {
    Brush::Solid(Color::from_rgba8(40, 80, 220, 255))
}

/// Synthetic gallery: 10×10 cells under a scrolled content group, four
/// leaves per cell, every 23rd cell slightly rotated so both aggregation
/// paths get exercised.
fn build_gallery() -> (Scene, NodeId, Vec<NodeId>) {
    let mut scene = Scene::new();
    let mut leaves = Vec::new();

    let root = scene.insert(None, Content::Container);
    let content = scene.insert(Some(root), Content::Container);
    scene.set_local_transform(content, Affine::translate(Vec2::new(200.0, 60.0)));

    let cols = 10;
    let rows = 10;
    let cell_w = 96.0;
    let cell_h = 64.0;

    for row in 0..rows {
        for col in 0..cols {
            let idx = row * cols + col;
            let x = 8.0 + (cell_w + 4.0) * f64::from(col);
            let y = 8.0 + (cell_h + 4.0) * f64::from(row);

            let mut tf = Affine::translate(Vec2::new(x, y));
            if idx % 23 == 0 {
                tf *= Affine::rotate(0.05);
            }
            let cell = scene.insert(Some(content), Content::Container);
            scene.set_local_transform(cell, tf);

            let bg = scene.insert(Some(cell), Content::Quad(Quad::with_frame(cell_w, cell_h)));
            leaves.push(bg);

            let mut border = ShapeSet::new();
            border.fill(Rect::new(0.0, 0.0, cell_w, cell_h), solid());
            leaves.push(scene.insert(Some(cell), Content::Shapes(border)));

            let icon = scene.insert(Some(cell), Content::Quad(Quad::with_frame(32.0, 32.0)));
            scene.set_local_transform(icon, Affine::translate(Vec2::new(8.0, 8.0)));
            leaves.push(icon);

            let mut label = TextBlock::new("item");
            label.resolve_metrics(TextMetrics::new(cell_w - 16.0, 16.0));
            let label = scene.insert(Some(cell), Content::Text(label));
            scene.set_local_transform(label, Affine::translate(Vec2::new(8.0, cell_h - 24.0)));
            leaves.push(label);
        }
    }

    (scene, root, leaves)
}

fn scene_bounds(c: &mut Criterion) {
    let mut g = c.benchmark_group("scene_bounds");
    g.warm_up_time(Duration::from_secs(1));
    g.measurement_time(Duration::from_secs(3));

    // Exact path: every query recomputes from leaf geometry.
    g.bench_function("local_bounds_slow", |b| {
        let (mut scene, root, _leaves) = build_gallery();
        b.iter(|| black_box(scene.local_bounds(black_box(root), BoundsMode::Slow)));
    });

    // Shortcut path, warm caches: queries are pure cache hits.
    g.bench_function("local_bounds_fast_warm", |b| {
        let (mut scene, root, _leaves) = build_gallery();
        let _ = scene.local_bounds(root, BoundsMode::FastIfEasy);
        b.iter(|| black_box(scene.local_bounds(black_box(root), BoundsMode::FastIfEasy)));
    });

    // Shortcut path after a single deep mutation: only the chain through
    // the mutated leaf recomputes, sibling subtrees reuse their boxes.
    g.bench_function("local_bounds_fast_one_dirty", |b| {
        let (mut scene, root, leaves) = build_gallery();
        let leaf = leaves[leaves.len() / 2];
        let _ = scene.local_bounds(root, BoundsMode::FastIfEasy);
        b.iter(|| {
            scene.invalidate_content(leaf);
            black_box(scene.local_bounds(black_box(root), BoundsMode::FastIfEasy))
        });
    });

    g.bench_function("global_bounds_deep_leaf", |b| {
        let (mut scene, _root, leaves) = build_gallery();
        let leaf = leaves[leaves.len() / 2];
        b.iter(|| {
            scene.invalidate_transform(leaf);
            black_box(scene.global_bounds(black_box(leaf), BoundsMode::FastIfEasy))
        });
    });

    g.finish();
}

criterion_group!(benches, scene_bounds);
criterion_main!(benches);
