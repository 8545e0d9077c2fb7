use claimgate_core::{Ability, Claim, ClaimSet, Query};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn claim_strings(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| format!("read:clients.client-{i}.projects.project.p{i}"))
        .collect()
}

fn bench_parse_claim(c: &mut Criterion) {
    c.bench_function("parse claim", |b| {
        b.iter(|| Claim::parse(black_box("read:clients.acme.projects.project.alpha")).unwrap())
    });
}

fn bench_parse_global_claim(c: &mut Criterion) {
    c.bench_function("parse global claim", |b| {
        b.iter(|| Claim::parse(black_box("admin:*")).unwrap())
    });
}

fn bench_claim_matches(c: &mut Criterion) {
    let claim = Claim::parse("read:clients.acme.projects").unwrap();
    let query = Query::new("read", Some("clients.acme.projects.project.alpha")).unwrap();

    c.bench_function("claim matches", |b| {
        b.iter(|| claim.matches(black_box(&query)))
    });
}

fn bench_set_construction(c: &mut Criterion) {
    for size in [10, 100, 1000] {
        let strings = claim_strings(size);
        c.bench_with_input(
            BenchmarkId::new("set construction", size),
            &strings,
            |b, strings| b.iter(|| ClaimSet::from_strings(black_box(strings)).unwrap()),
        );
    }
}

fn bench_set_query(c: &mut Criterion) {
    for size in [10, 100, 1000] {
        let set = ClaimSet::from_strings(claim_strings(size)).unwrap();
        let miss = Query::new("read", Some("suppliers.nobody")).unwrap();
        c.bench_with_input(BenchmarkId::new("set query miss", size), &set, |b, set| {
            b.iter(|| set.matches(black_box(&miss)))
        });
    }
}

fn bench_ability_can(c: &mut Criterion) {
    let permitted = ClaimSet::from_strings(claim_strings(100)).unwrap();
    let prohibited =
        ClaimSet::from_strings(["read:clients.client-7", "read:clients.client-13"]).unwrap();
    let ability = Ability::new(permitted, prohibited);
    let query = Query::new("read", Some("clients.client-42.projects")).unwrap();

    c.bench_function("ability can", |b| {
        b.iter(|| ability.can(black_box(&query)))
    });
}

fn bench_client_keys_view(c: &mut Criterion) {
    let permitted = ClaimSet::from_strings(claim_strings(1000)).unwrap();
    let prohibited =
        ClaimSet::from_strings(["read:clients.client-7", "read:clients.client-13"]).unwrap();
    let ability = Ability::new(permitted, prohibited);

    c.bench_function("client keys view on 1k claims", |b| {
        b.iter(|| ability.access_to_client_keys())
    });
}

criterion_group!(
    benches,
    bench_parse_claim,
    bench_parse_global_claim,
    bench_claim_matches,
    bench_set_construction,
    bench_set_query,
    bench_ability_can,
    bench_client_keys_view
);
criterion_main!(benches);
