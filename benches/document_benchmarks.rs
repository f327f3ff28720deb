//! Benchmarks for document editing and coordinate transforms.
//!
//! Run with: cargo bench

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use scribe_buffer::{BufferPos, Document, ScreenPos, Viewport};
use scribe_core::{Editor, EditorConfig, Movement, PlainRenderer};

/// Generates a Markdown-ish text for benchmarking.
fn generate_text(lines: usize) -> String {
    (0..lines)
        .map(|i| {
            if i % 20 == 0 {
                format!("## Section {i}")
            } else {
                format!("Line {i}: This is a sample line of text for benchmarking purposes.")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Benchmarks document creation.
fn bench_document_creation(c: &mut Criterion) {
    let mut group = c.benchmark_group("document_creation");

    for size in [100, 1000, 10000, 100000].iter() {
        let text = generate_text(*size);

        group.bench_with_input(BenchmarkId::new("from_text", size), &text, |b, text| {
            b.iter(|| black_box(Document::from_text(black_box(text))))
        });
    }

    group.finish();
}

/// Benchmarks typing through the editor, including history recording.
fn bench_typing(c: &mut Criterion) {
    let mut group = c.benchmark_group("typing");
    let base_text = generate_text(10000);

    group.bench_function("insert_char_mid_document", |b| {
        b.iter_with_setup(
            || {
                let mut editor = Editor::from_text(EditorConfig::default(), &base_text);
                editor.move_cursor_to(BufferPos::new(5000, 10)).unwrap();
                editor
            },
            |mut editor| {
                for ch in "inserted text".chars() {
                    editor.insert_char(black_box(ch)).unwrap();
                }
                black_box(editor)
            },
        )
    });

    group.bench_function("undo_redo_burst", |b| {
        b.iter_with_setup(
            || {
                let mut editor = Editor::from_text(EditorConfig::default(), &base_text);
                editor.insert_text("inserted text\nacross lines").unwrap();
                editor
            },
            |mut editor| {
                editor.undo().unwrap();
                editor.redo().unwrap();
                black_box(editor)
            },
        )
    });

    group.finish();
}

/// Benchmarks cursor movement with viewport following.
fn bench_navigation(c: &mut Criterion) {
    let mut group = c.benchmark_group("navigation");
    let base_text = generate_text(10000);

    for movement in [Movement::Down, Movement::WordRight] {
        group.bench_function(format!("{movement:?}"), |b| {
            b.iter_with_setup(
                || Editor::from_text(EditorConfig::default(), &base_text),
                |mut editor| {
                    for _ in 0..100 {
                        editor.move_cursor(black_box(movement), false).unwrap();
                    }
                    black_box(editor)
                },
            )
        });
    }

    group.finish();
}

/// Benchmarks coordinate transforms and rendering.
fn bench_transforms(c: &mut Criterion) {
    let mut group = c.benchmark_group("transforms");
    let viewport = Viewport::new(120, 40, 6, 4).with_top_line(500);

    group.bench_function("buffer_to_screen", |b| {
        b.iter(|| viewport.buffer_to_screen(black_box(BufferPos::new(520, 30))))
    });

    group.bench_function("screen_to_buffer", |b| {
        b.iter(|| viewport.screen_to_buffer(black_box(ScreenPos::new(20, 36))))
    });

    let editor = Editor::from_text(EditorConfig::default(), &generate_text(10000));
    group.bench_function("render_plain", |b| {
        b.iter(|| black_box(editor.render(&PlainRenderer)))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_document_creation,
    bench_typing,
    bench_navigation,
    bench_transforms,
);
criterion_main!(benches);
