use cozy_chess::Color;
use piebot_opponent::search::alphabeta::{Searcher, INFINITY};
use piebot_opponent::{Difficulty, EngineConfig, MoveSelector, Position};

const CASES: &[(&str, u32)] = &[
    ("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1", 3),
    ("rnbqkbnr/pppp1ppp/8/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R b KQkq - 1 2", 2),
    ("r1bqkb1r/pppp1ppp/2n2n2/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 4", 2),
    ("6k1/5ppp/8/8/8/8/5PPP/R5K1 w - - 0 1", 3),
    ("k7/8/8/8/8/8/3qQ3/7K b - - 0 1", 3),
];

fn run(pos: &mut Position, depth: u32, pruning: bool) -> (i32, u64) {
    let mut s = Searcher::default();
    s.set_use_pruning(pruning);
    s.begin();
    let maximizing = pos.side_to_move() == Color::White;
    let v = s.search(pos, depth, maximizing, -INFINITY, INFINITY);
    (v, s.nodes())
}

#[test]
fn pruning_preserves_minimax_value() {
    for &(fen, max_depth) in CASES {
        let mut pos = Position::from_fen(fen).expect("valid fen");
        for depth in 0..=max_depth {
            let (pruned, _) = run(&mut pos, depth, true);
            let (full, _) = run(&mut pos, depth, false);
            assert_eq!(pruned, full, "alpha-beta changed the value at depth {depth} for {fen}");
        }
    }
}

#[test]
fn pruning_visits_fewer_nodes() {
    let mut pos = Position::startpos();
    let (_, pruned) = run(&mut pos, 3, true);
    let (_, full) = run(&mut pos, 3, false);
    assert!(pruned < full, "pruned {pruned} should be below exhaustive {full}");
}

#[test]
fn search_restores_the_position() {
    for &(fen, depth) in CASES {
        let mut pos = Position::from_fen(fen).expect("valid fen");
        let before = pos.fen();
        run(&mut pos, depth, true);
        assert_eq!(pos.fen(), before);
        assert_eq!(pos.ply_count(), 0);
    }
}

#[test]
fn mated_interior_node_scores_as_static_eval() {
    // White to move and mated: no children to expand at any depth.
    let mut pos = Position::from_fen("k7/8/8/8/8/8/5PPP/r5K1 w - - 0 1").unwrap();
    let (d0, _) = run(&mut pos, 0, true);
    let (d2, _) = run(&mut pos, 2, true);
    assert_eq!(d0, d2);
}

#[test]
fn search_prefers_winning_queen_capture() {
    // Qe2xd2 wins a queen.
    for d in [Difficulty::Easy, Difficulty::Intermediate] {
        let mut pos = Position::from_fen("k7/8/8/8/8/8/3qQ3/7K w - - 0 1").expect("valid fen");
        let mut sel = MoveSelector::new(EngineConfig::for_difficulty(d));
        let best = sel.best_move(&mut pos).expect("expected a best move");
        assert_eq!(pos.to_uci(best.mv), "e2d2", "difficulty {d}");
    }
}

#[test]
fn black_root_takes_the_queen_too() {
    let mut pos = Position::from_fen("k7/8/8/8/8/8/3qQ3/7K b - - 0 1").expect("valid fen");
    let mut sel = MoveSelector::new(EngineConfig::for_difficulty(Difficulty::Easy));
    let best = sel.best_move(&mut pos).expect("expected a best move");
    assert_eq!(pos.to_uci(best.mv), "d2e2");
    assert_eq!(best.score, 900);
}
