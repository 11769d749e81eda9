use criterion::{black_box, criterion_group, criterion_main, Criterion};
use grimoire_api::models::ZodiacSign;
use grimoire_api::services::CrystalCatalog;

fn benchmark_catalog_matching(c: &mut Criterion) {
    // Build the catalog once
    let catalog = CrystalCatalog::new();

    // A realistic identify description that names a catalog entry mid-text
    let hit = "I found this stone at a market stall, the seller said it was \
               rose quartz but I am not sure, it is pale pink and slightly \
               cloudy with one polished face";

    // Same length, no catalog keyword anywhere (forces the full scan)
    let miss = "I found this stone at a market stall, the seller could not \
                name it, it is pale grey and slightly cloudy with one \
                polished face and some darker banding";

    let mut group = c.benchmark_group("description_matching");

    group.bench_function("named_crystal_hit", |b| {
        b.iter(|| catalog.match_description(black_box(hit)))
    });

    group.bench_function("no_keyword_fallback", |b| {
        b.iter(|| catalog.match_description(black_box(miss)))
    });

    group.finish();
}

fn benchmark_compatibility_lookup(c: &mut Criterion) {
    let catalog = CrystalCatalog::new();

    c.bench_function("compatible_with_sign", |b| {
        b.iter(|| catalog.compatible_with(black_box(ZodiacSign::Pisces)))
    });
}

criterion_group!(
    benches,
    benchmark_catalog_matching,
    benchmark_compatibility_lookup
);
criterion_main!(benches);
