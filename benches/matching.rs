//! Benchmarks for the matching engine
//!
//! Measures compute_assignments over seeded participant populations of
//! increasing size.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;
use secret_santa::matching::{AssignmentMatcher, RegionalCycleMatcher};
use secret_santa::types::{Address, Participant};
use secret_santa::utils::generate_participant_id;

const REGIONS: [&str; 4] = ["EU", "NA", "APAC", "LATAM"];
const COUNTRIES: [&str; 8] = ["FR", "DE", "UK", "US", "CA", "JP", "BR", "MX"];

fn generate_participants(count: usize) -> Vec<Participant> {
    (0..count)
        .map(|i| Participant {
            id: generate_participant_id(),
            name: format!("participant_{i}"),
            slack_id: Some(format!("U{i:08}")),
            address: Address {
                line1: Some(format!("{i} Main St")),
                country: Some(COUNTRIES[i % COUNTRIES.len()].to_string()),
                ..Address::default()
            },
            likes: Some("surprises".to_string()),
            dislikes: None,
            region: Some(REGIONS[i % REGIONS.len()].to_string()),
            record_id: format!("rec{i}"),
        })
        .collect()
}

fn bench_compute_assignments(c: &mut Criterion) {
    let matcher = RegionalCycleMatcher::new();

    for size in [10, 100, 1000] {
        let participants = generate_participants(size);
        c.bench_function(&format!("compute_assignments/{size}"), |b| {
            b.iter(|| {
                let mut rng = StdRng::seed_from_u64(42);
                black_box(matcher.compute_assignments(black_box(&participants), &mut rng))
            })
        });
    }
}

criterion_group!(benches, bench_compute_assignments);
criterion_main!(benches);
