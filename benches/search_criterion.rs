use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use pawnstorm::game_state::chess_types::{Board, Color};
use pawnstorm::search::board_scoring::TaperedEvaluator;
use pawnstorm::search::iterative_deepening::{iterative_deepening_search, SearchConfig};
use pawnstorm::search::move_ordering::SearchHeuristics;
use pawnstorm::search::transposition_table::TranspositionTable;

#[derive(Clone, Copy)]
struct SearchCase {
    name: &'static str,
    fen: &'static str,
}

const CASES: &[SearchCase] = &[
    SearchCase {
        name: "startpos",
        fen: "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
    },
    SearchCase {
        name: "classical_mid",
        fen: "r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 w - - 0 10",
    },
    SearchCase {
        name: "tactical",
        fen: "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    },
    SearchCase {
        name: "end_kpk",
        fen: "8/8/8/8/8/4k3/4P3/4K3 w - - 0 1",
    },
];

fn bench_search(c: &mut Criterion) {
    let depth = std::env::var("PAWNSTORM_BENCH_DEPTH")
        .ok()
        .and_then(|v| v.parse::<u8>().ok())
        .unwrap_or(3)
        .max(1);

    let mut group = c.benchmark_group("search");
    group.warm_up_time(Duration::from_secs(1));
    group.measurement_time(Duration::from_secs(4));
    group.sample_size(10);

    let config = SearchConfig {
        max_depth: depth,
        movetime_ms: None,
        ..SearchConfig::default()
    };

    for case in CASES {
        let board = Board::from_fen(case.fen).expect("benchmark FEN should parse");
        let scorer = TaperedEvaluator::new(board.current_turn());
        group.bench_with_input(
            BenchmarkId::new(case.name, format!("d{depth}")),
            &board,
            |b, board| {
                b.iter(|| {
                    let mut scratch = board.clone();
                    let mut tt = TranspositionTable::new_with_mb(16);
                    let mut heuristics = SearchHeuristics::default();
                    let report = iterative_deepening_search(
                        black_box(&mut scratch),
                        &scorer,
                        &config,
                        &mut tt,
                        &mut heuristics,
                    )
                    .expect("search should run");
                    black_box(report.best_move)
                });
            },
        );
    }

    group.finish();
}

fn bench_evaluate(c: &mut Criterion) {
    let scorer = TaperedEvaluator::new(Color::White);
    let mut group = c.benchmark_group("evaluate");
    for case in CASES {
        let board = Board::from_fen(case.fen).expect("benchmark FEN should parse");
        group.bench_with_input(BenchmarkId::from_parameter(case.name), &board, |b, board| {
            b.iter(|| black_box(scorer.evaluate(black_box(board))));
        });
    }
    group.finish();
}

criterion_group!(search_benches, bench_search, bench_evaluate);
criterion_main!(search_benches);
