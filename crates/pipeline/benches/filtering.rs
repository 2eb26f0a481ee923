//! Benchmarks for filter compilation and heuristic scoring
//!
//! Run with: cargo bench --package pipeline
//!
//! Uses a synthetic catalog of 10,000 workouts.

use catalog::{Difficulty, Preferences, Workout, WorkoutFilter};
use chrono::Utc;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pipeline::{FilterPipeline, HeuristicScorer, RecommendationRequest};

const MUSCLE_GROUPS: [&str; 6] = ["core", "legs", "arms", "back", "chest", "glutes"];
const EQUIPMENT: [&str; 4] = ["mat", "dumbbells", "barbell", "kettlebell"];

fn synthetic_catalog(size: usize) -> Vec<Workout> {
    (0..size)
        .map(|i| Workout {
            id: format!("workout-{i}"),
            name: format!("Workout {}", size - i),
            description: format!("Synthetic session number {i}"),
            difficulty: Difficulty::ALL[i % 3],
            duration: 10 + (i % 60) as u32,
            muscle_groups: vec![
                MUSCLE_GROUPS[i % 6].to_string(),
                MUSCLE_GROUPS[(i / 6) % 6].to_string(),
            ],
            equipment: vec![EQUIPMENT[i % 4].to_string()],
            instructions: vec![],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        })
        .collect()
}

fn bench_filter_pipeline(c: &mut Criterion) {
    let workouts = synthetic_catalog(10_000);
    let filter = WorkoutFilter {
        search: Some("session".to_string()),
        difficulty: Some(Difficulty::Intermediate),
        min_duration: Some(20),
        max_duration: Some(45),
        muscle_groups: Some(vec!["core".to_string(), "legs".to_string()]),
        equipment: None,
    };

    c.bench_function("compile_and_apply_filter", |b| {
        b.iter(|| {
            let pipeline = FilterPipeline::compile(black_box(&filter)).unwrap();
            black_box(pipeline.apply(workouts.clone()).unwrap())
        })
    });
}

fn bench_heuristic_scoring(c: &mut Criterion) {
    let request = RecommendationRequest::new(
        synthetic_catalog(10_000),
        Some(Preferences {
            difficulty: Some(Difficulty::Beginner),
            duration: Some(30),
            muscle_groups: Some(vec!["core".to_string(), "back".to_string()]),
            ..Default::default()
        }),
    );
    let scorer = HeuristicScorer::new();

    c.bench_function("heuristic_recommend", |b| {
        b.iter(|| black_box(scorer.recommend(black_box(&request))))
    });
}

criterion_group!(benches, bench_filter_pipeline, bench_heuristic_scoring);
criterion_main!(benches);
