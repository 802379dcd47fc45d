use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use pincer::{attacks, fen, perft::perft};

#[derive(Clone, Copy)]
struct BenchCase {
    name: &'static str,
    fen: &'static str,
    depth: u32,
    nodes: u64,
}

const CASES: &[BenchCase] = &[
    BenchCase {
        name: "startpos_d4",
        fen: "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
        depth: 4,
        nodes: 197_281,
    },
    BenchCase {
        name: "kiwipete_d3",
        fen: "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        depth: 3,
        nodes: 97_862,
    },
    BenchCase {
        name: "rook_endgame_d4",
        fen: "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
        depth: 4,
        nodes: 43_238,
    },
];

fn perft_bench(c: &mut Criterion) {
    attacks::init();

    let mut group = c.benchmark_group("perft");
    for case in CASES {
        let pos = fen::parse(case.fen).expect("bench FEN should parse");
        group.throughput(Throughput::Elements(case.nodes));
        group.bench_with_input(BenchmarkId::from_parameter(case.name), &pos, |b, pos| {
            b.iter(|| {
                let nodes = perft(black_box(pos), case.depth);
                assert_eq!(nodes, case.nodes);
            })
        });
    }
    group.finish();
}

criterion_group!(benches, perft_bench);
criterion_main!(benches);
