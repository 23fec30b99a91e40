/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rayfish::{
    perft, Algorithm, AttackTables, Position, PsqtEvaluator, Search, SearchConfig, FEN_KIWIPETE,
    FEN_STARTPOS,
};

struct BenchCase {
    name: &'static str,
    fen: &'static str,
    expected_nodes: &'static [u64],
}

const PERFT_CASES: &[BenchCase] = &[
    BenchCase {
        name: "startpos",
        fen: FEN_STARTPOS,
        expected_nodes: &[20, 400, 8_902],
    },
    BenchCase {
        name: "kiwipete",
        fen: FEN_KIWIPETE,
        expected_nodes: &[48, 2_039],
    },
    BenchCase {
        name: "position_3",
        fen: "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
        expected_nodes: &[14, 191, 2_812],
    },
];

fn bench_perft(c: &mut Criterion) {
    let tables = AttackTables::new();

    let mut group = c.benchmark_group("perft");
    group.warm_up_time(Duration::from_secs(1));
    group.measurement_time(Duration::from_secs(4));
    group.sample_size(20);

    for case in PERFT_CASES {
        let position = Position::from_fen(case.fen).unwrap();

        for (i, expected) in case.expected_nodes.iter().enumerate() {
            let depth = i + 1;
            group.throughput(Throughput::Elements(*expected));

            group.bench_with_input(
                BenchmarkId::new(case.name, depth),
                expected,
                |b, expected| {
                    let mut position = position.clone();
                    b.iter(|| {
                        let nodes = perft(&tables, black_box(&mut position), black_box(depth));
                        assert_eq!(nodes, *expected);
                        nodes
                    });
                },
            );
        }
    }

    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let tables = AttackTables::new();

    let mut group = c.benchmark_group("search");
    group.sample_size(10);

    for algorithm in [Algorithm::Minimax, Algorithm::AlphaBeta] {
        let config = SearchConfig {
            depth: 3,
            algorithm,
        };

        group.bench_function(BenchmarkId::new(algorithm.to_string(), config.depth), |b| {
            let mut position = Position::from_fen(FEN_KIWIPETE).unwrap();
            b.iter(|| {
                let mut search = Search::new(&tables, &PsqtEvaluator, config);
                black_box(search.start(black_box(&mut position)).score)
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_perft, bench_search);
criterion_main!(benches);
