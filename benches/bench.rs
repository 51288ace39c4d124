// Criterion benchmarks for MedMatch Groups

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use medmatch_groups::core::{compatibility_score, GroupAssembler, MatchTables};
use medmatch_groups::models::{Interest, MatchingPolicy, Profile, ScoringWeights};

const SPECIALTIES: &[&str] = &[
    "Cardiology",
    "Internal Medicine",
    "Pediatrics",
    "Family Medicine",
    "Emergency Medicine",
];
const CITIES: &[&str] = &["Riyadh", "Jeddah", "Dammam"];
const INTERESTS: &[(&str, &str)] = &[
    ("sport", "padel"),
    ("sport", "running"),
    ("food", "coffee"),
    ("book", "fiction"),
];

fn create_profile(id: usize) -> Profile {
    Profile {
        id: format!("doctor-{}", id),
        first_name: "Doctor".to_string(),
        last_name: id.to_string(),
        specialty: Some(SPECIALTIES[id % SPECIALTIES.len()].to_string()),
        city: Some(CITIES[id % CITIES.len()].to_string()),
        country: Some("Saudi Arabia".to_string()),
        age: Some(28 + (id % 25) as u8),
        years_experience: Some((id % 20) as u8),
        interests: INTERESTS
            .iter()
            .skip(id % 2)
            .take(2)
            .map(|(k, v)| Interest::new(*k, *v))
            .collect(),
        ..Default::default()
    }
}

fn bench_compatibility_score(c: &mut Criterion) {
    let weights = ScoringWeights::default();
    let tables = MatchTables::default();
    let a = create_profile(0);
    let b = create_profile(6);

    c.bench_function("compatibility_score", |bench| {
        bench.iter(|| compatibility_score(black_box(&a), black_box(&b), &weights, &tables));
    });
}

fn bench_assemble(c: &mut Criterion) {
    let assembler = GroupAssembler::with_defaults();
    let requester = create_profile(0);
    let policy = MatchingPolicy::default();

    let mut group = c.benchmark_group("assemble");

    for candidate_count in [10, 50, 100].iter() {
        let candidates: Vec<Profile> = (1..=*candidate_count).map(create_profile).collect();

        group.bench_with_input(
            BenchmarkId::from_parameter(candidate_count),
            candidate_count,
            |bench, _| {
                bench.iter(|| assembler.assemble(black_box(&requester), black_box(&candidates), &policy));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_compatibility_score, bench_assemble);
criterion_main!(benches);
