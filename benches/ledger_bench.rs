use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rust_decimal_macros::dec;

use heirloom_ledger::{Ledger, TokenKind};

fn bench_ledger(c: &mut Criterion) {
    let mut group = c.benchmark_group("Ledger");

    // Issue and revoke so the owner slot is free on every iteration
    let ledger = Ledger::with_defaults();
    group.bench_function(BenchmarkId::new("issue_hit", "issue_then_revoke"), |b| {
        b.iter(|| {
            let token = ledger.issue_hit("bench-owner", "{}").unwrap();
            black_box(token);
            ledger.revoke_hit("bench-owner").unwrap();
        });
    });

    // Access checks against a token with a populated access list
    let ledger = Ledger::with_defaults();
    let prvn = ledger.issue_prvn("owner", "dataset", "{}");
    for i in 0..1000 {
        let duration = if i % 2 == 0 { Some(3600) } else { None };
        ledger
            .grant_access(&prvn.token_id, &format!("subject-{}", i), duration)
            .unwrap();
    }
    group.bench_function(BenchmarkId::new("has_access", "granted"), |b| {
        b.iter(|| black_box(ledger.has_access(&prvn.token_id, "subject-500")));
    });
    group.bench_function(BenchmarkId::new("has_access", "no_entry"), |b| {
        b.iter(|| black_box(ledger.has_access(&prvn.token_id, "stranger")));
    });

    group.bench_function(BenchmarkId::new("create_license", "single_token"), |b| {
        b.iter(|| {
            black_box(
                ledger
                    .create_license(&prvn.token_id, "licensee", dec!(100), dec!(5))
                    .unwrap(),
            )
        });
    });

    // Linking the same pair is the idempotent path
    let hit = ledger.issue_hit("owner", "{}").unwrap();
    group.bench_function(BenchmarkId::new("link_hit_to_prvn", "repeat_pair"), |b| {
        b.iter(|| {
            ledger
                .link_hit_to_prvn(black_box(&hit.token_id), black_box(&prvn.token_id))
                .unwrap()
        });
    });

    group.bench_function(BenchmarkId::new("verify_on_chain", "identity"), |b| {
        b.iter(|| black_box(ledger.verify_on_chain(&hit.token_id, TokenKind::IdentityToken)));
    });

    group.finish();
}

criterion_group!(benches, bench_ledger);
criterion_main!(benches);
