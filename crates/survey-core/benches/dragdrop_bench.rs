//! Benchmarks for drag gestures on large pages.
//!
//! Measures one full page gesture (start, a sweep of hovers, finish) and a
//! ranking reorder sweep, both on wide models.
//!
//! Run with: cargo bench -p survey-core --bench dragdrop_bench

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use serde_json::json;
use std::hint::black_box;

use survey_core::{
    DragOverNode, ElementId, ItemValue, RankingArea, RankingDragDrop, RankingQuestion,
    SurveyModel, SurveySettings,
};

fn page_with(count: usize) -> (SurveyModel, ElementId, Vec<ElementId>) {
    let mut survey = SurveyModel::new(SurveySettings::default());
    let page = survey.add_page("page1");
    let ids = (0..count)
        .map(|i| {
            let id = survey
                .add_question(page, format!("q{i}"))
                .expect("fresh name");
            // Three questions per row.
            survey
                .set_start_with_new_line(id, i % 3 == 0)
                .expect("placed");
            id
        })
        .collect();
    (survey, page, ids)
}

/// Drag the first question across every other one, then drop it at the end.
fn sweep(survey: &mut SurveyModel, page: ElementId, ids: &[ElementId]) -> Option<ElementId> {
    let source = ids[0];
    let copy = survey.copy_element(source).expect("copyable");
    survey
        .drag_drop_start(page, Some(source), copy, None)
        .expect("idle page");
    for (i, destination) in ids.iter().enumerate().skip(1) {
        survey.drag_drop_move_to(page, Some(*destination), i % 2 == 0, false);
    }
    survey.drag_drop_finish(page, false)
}

// =============================================================================
// Benchmarks
// =============================================================================

fn bench_page_gesture(c: &mut Criterion) {
    let mut group = c.benchmark_group("dragdrop/page_sweep");
    for count in [16usize, 64, 256] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter_batched(
                || page_with(count),
                |(mut survey, page, ids)| black_box(sweep(&mut survey, page, &ids)),
                criterion::BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_ranking_sweep(c: &mut Criterion) {
    let mut group = c.benchmark_group("dragdrop/ranking_sweep");
    for count in [8usize, 32, 128] {
        let choices: Vec<ItemValue> = (0..count).map(|i| ItemValue::new(json!(i))).collect();
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter(|| {
                let question = RankingQuestion::new("rank", choices.clone());
                let mut dd = RankingDragDrop::new();
                dd.start(&question, &json!(0)).expect("known choice");
                for i in 1..count {
                    dd.drag_over(&question, &DragOverNode::item(json!(i), RankingArea::Ranked));
                }
                black_box(dd.finish(&question))
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_page_gesture, bench_ranking_sweep);
criterion_main!(benches);
