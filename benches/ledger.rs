// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Benchmarks for the points ledger.
//!
//! Run with: cargo bench
//!
//! Benchmarks include:
//! - Single-threaded grants, spends and balance queries
//! - Spends that walk long lot sequences
//! - Multi-threaded grants across users

use chrono::Utc;
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use points_ledger_rs::{Grant, Ledger, PayerId, Points, Spend, UserId};
use rayon::prelude::*;
use std::sync::Arc;

// =============================================================================
// Helper Functions
// =============================================================================

fn make_grant(user: usize, payer: usize, points: Points) -> Grant {
    Grant::new(
        UserId::new(format!("user-{user}")).unwrap(),
        PayerId::new(format!("payer-{payer}")).unwrap(),
        points,
        Utc::now(),
    )
}

fn make_spend(user: usize, points: u64) -> Spend {
    Spend::new(UserId::new(format!("user-{user}")).unwrap(), points)
}

/// A ledger whose first user holds `lots` lots of 10 points over 8 payers.
fn seeded_ledger(lots: usize) -> Ledger {
    let ledger = Ledger::new();
    for i in 0..lots {
        ledger.record_grant(make_grant(0, i % 8, 10));
    }
    ledger
}

// =============================================================================
// Single-Threaded Benchmarks
// =============================================================================

fn bench_single_grant(c: &mut Criterion) {
    c.bench_function("single_grant", |b| {
        b.iter(|| {
            let ledger = Ledger::new();
            ledger.record_grant(black_box(make_grant(0, 0, 100)));
        })
    });
}

fn bench_grant_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("grant_throughput");

    for count in [100, 1_000, 10_000].iter() {
        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, &count| {
            b.iter(|| {
                let ledger = seeded_ledger(count);
                black_box(&ledger);
            })
        });
    }
    group.finish();
}

fn bench_spend_across_lots(c: &mut Criterion) {
    let mut group = c.benchmark_group("spend_across_lots");

    for count in [100, 1_000, 10_000].iter() {
        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, &count| {
            b.iter_with_setup(
                || seeded_ledger(count),
                |ledger| {
                    // Drains every lot, touching all payers.
                    let items = ledger.spend(make_spend(0, count as u64 * 10));
                    black_box(items);
                },
            )
        });
    }
    group.finish();
}

fn bench_retraction(c: &mut Criterion) {
    c.bench_function("retraction_1000_lots", |b| {
        b.iter_with_setup(
            || seeded_ledger(1_000),
            |ledger| {
                ledger.record_grant(black_box(make_grant(0, 3, -1_000)));
            },
        )
    });
}

fn bench_balance(c: &mut Criterion) {
    let mut group = c.benchmark_group("balance");

    for count in [100, 1_000, 10_000].iter() {
        let ledger = seeded_ledger(*count);
        let user = UserId::new("user-0").unwrap();
        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, _| {
            b.iter(|| black_box(ledger.balance(&user)))
        });
    }
    group.finish();
}

// =============================================================================
// Multi-Threaded Benchmarks
// =============================================================================

fn bench_parallel_grants_different_users(c: &mut Criterion) {
    let mut group = c.benchmark_group("parallel_grants_different_users");

    for count in [1_000, 10_000].iter() {
        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, &count| {
            b.iter(|| {
                let ledger = Arc::new(Ledger::new());
                (0..count).into_par_iter().for_each(|i| {
                    ledger.record_grant(make_grant(i % 100, i % 8, 10));
                });
                black_box(&ledger);
            })
        });
    }
    group.finish();
}

fn bench_parallel_mixed_same_user(c: &mut Criterion) {
    let mut group = c.benchmark_group("parallel_mixed_same_user");

    for count in [1_000, 10_000].iter() {
        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, &count| {
            b.iter(|| {
                let ledger = Arc::new(Ledger::new());
                (0..count).into_par_iter().for_each(|i| {
                    if i % 2 == 0 {
                        ledger.record_grant(make_grant(0, i % 8, 10));
                    } else {
                        black_box(ledger.spend(make_spend(0, 5)));
                    }
                });
                black_box(&ledger);
            })
        });
    }
    group.finish();
}

criterion_group!(
    single_threaded,
    bench_single_grant,
    bench_grant_throughput,
    bench_spend_across_lots,
    bench_retraction,
    bench_balance,
);

criterion_group!(
    multi_threaded,
    bench_parallel_grants_different_users,
    bench_parallel_mixed_same_user,
);

criterion_main!(single_threaded, multi_threaded);
