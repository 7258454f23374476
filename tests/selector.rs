use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use piebot_opponent::chess_openings::OpeningLine;
use piebot_opponent::search::alphabeta::SearchLimits;
use piebot_opponent::{Difficulty, EngineConfig, Game, MoveSelector, MoveSource, Position};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

fn cfg(d: Difficulty) -> EngineConfig { EngineConfig::for_difficulty(d) }

#[test]
fn single_legal_move_is_played() {
    let mut game = Game::from_fen(cfg(Difficulty::Hard), "k7/8/8/8/8/8/1r6/K1r5 w - - 0 1").unwrap();
    assert_eq!(game.position().legal_moves().len(), 1);
    let turn = game.play_ai_turn();
    assert_eq!(turn.uci.as_deref(), Some("a1b2"));
    assert_eq!(turn.source, Some(MoveSource::Search));
    assert_eq!(game.move_count(), 1);
}

#[test]
fn equal_scores_resolve_to_the_last_generated_move() {
    // Only king moves for White; none of them changes the evaluation.
    let fen = "k7/p7/P7/8/8/8/8/7K w - - 0 1";
    for d in [Difficulty::Easy, Difficulty::Intermediate] {
        let mut pos = Position::from_fen(fen).unwrap();
        let legal = pos.legal_moves();
        assert!(legal.len() > 1);
        let mut sel = MoveSelector::new(cfg(d));
        let ranked = sel.rank_moves(&mut pos);
        assert!(ranked.iter().all(|s| s.score == ranked[0].score), "{d}: {ranked:?}");

        let mut game = Game::from_fen(cfg(d), fen).unwrap();
        let turn = game.play_ai_turn();
        assert_eq!(turn.mv, legal.last().copied(), "difficulty {d}");
        assert_ne!(turn.mv, legal.first().copied());
    }
}

#[test]
fn checkmated_side_gets_no_move() {
    let mut game = Game::from_fen(cfg(Difficulty::Easy), "k7/8/8/8/8/8/5PPP/r5K1 w - - 0 1").unwrap();
    let turn = game.play_ai_turn();
    assert_eq!(turn.mv, None);
    assert_eq!(turn.uci, None);
    assert!(turn.status.checkmate);
    assert!(turn.status.game_over);
    assert_eq!(game.move_count(), 0);
}

#[test]
fn mating_move_dominates() {
    let fen = "6k1/5ppp/8/8/8/8/5PPP/R5K1 w - - 0 1";
    let mut pos = Position::from_fen(fen).unwrap();
    let mut sel = MoveSelector::new(cfg(Difficulty::Easy));
    let ranked = sel.rank_moves(&mut pos);
    let mate = pos.parse_uci("a1a8").unwrap();
    let mate_score = ranked.iter().find(|s| s.mv == mate).expect("a1a8 ranked").score;
    // 500 material + 50 check + 10000 mate + 2 patterns x 500.
    assert_eq!(mate_score, 11_550);
    assert!(mate_score >= 10_500);

    let mut game = Game::from_fen(cfg(Difficulty::Easy), fen).unwrap();
    let turn = game.play_ai_turn();
    assert_eq!(turn.uci.as_deref(), Some("a1a8"));
    assert_eq!(turn.score, Some(11_550));
    assert!(turn.status.checkmate);
}

#[test]
fn black_takes_mate_in_one_too() {
    let fen = "r5k1/5ppp/8/8/8/8/5PPP/6K1 b - - 0 1";
    let mut pos = Position::from_fen(fen).unwrap();
    let mut sel = MoveSelector::new(cfg(Difficulty::Easy));
    let ranked = sel.rank_moves(&mut pos);
    let mate = pos.parse_uci("a8a1").unwrap();
    let mate_score = ranked.iter().find(|s| s.mv == mate).expect("a8a1 ranked").score;
    // Mirror of the White case: 500 material + 50 check + 10000 mate + 2 patterns x 500.
    assert_eq!(mate_score, 11_550);
    assert!(ranked.iter().all(|s| s.score <= mate_score));

    let mut game = Game::from_fen(cfg(Difficulty::Easy), fen).unwrap();
    let turn = game.play_ai_turn();
    assert_eq!(turn.uci.as_deref(), Some("a8a1"));
    assert!(turn.status.checkmate);
}

#[test]
fn black_mates_at_greater_depth() {
    let fen = "r5k1/5ppp/8/8/8/8/5PPP/6K1 b - - 0 1";
    for d in [Difficulty::Intermediate, Difficulty::Hard] {
        let mut game = Game::from_fen(cfg(d), fen).unwrap();
        let turn = game.play_ai_turn();
        assert_eq!(turn.uci.as_deref(), Some("a8a1"), "difficulty {d}");
        assert!(turn.status.checkmate);
    }
}

#[test]
fn drawn_position_with_legal_moves_still_gets_a_move() {
    // Bishop and king against king: insufficient material, yet White can move.
    let mut game = Game::from_fen(cfg(Difficulty::Easy), "k7/8/8/8/8/8/8/KB6 w - - 0 1").unwrap();
    assert!(game.status().draw);
    let legal = game.position().legal_moves();
    assert!(!legal.is_empty());
    let turn = game.play_ai_turn();
    assert!(legal.contains(&turn.mv.expect("a move in a drawn position")));
    assert!(turn.status.draw);
    assert_eq!(game.move_count(), 1);
}

#[test]
fn moves_stay_legal_against_a_random_opponent() {
    let mut rng = SmallRng::seed_from_u64(7);
    let mut game = Game::new(cfg(Difficulty::Easy), &mut rng);
    for _ in 0..12 {
        let legal = game.position().legal_moves();
        let turn = game.play_ai_turn();
        let Some(mv) = turn.mv else { break };
        assert!(legal.contains(&mv), "{} not legal", turn.uci.unwrap_or_default());
        if turn.status.game_over { break; }
        let replies = game.position().legal_moves();
        let reply = replies[rng.gen_range(0..replies.len())];
        let uci = game.position().to_uci(reply);
        if game.play_opponent(&uci).unwrap().game_over { break; }
    }
}

#[test]
fn ranking_restores_the_position() {
    let mut pos = Position::from_fen("r1bqkb1r/pppp1ppp/2n2n2/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 4").unwrap();
    let before = pos.fen();
    let mut sel = MoveSelector::new(cfg(Difficulty::Intermediate));
    let ranked = sel.rank_moves(&mut pos);
    assert_eq!(ranked.len(), pos.legal_moves().len());
    assert_eq!(pos.fen(), before);
    assert_eq!(pos.ply_count(), 0);
}

#[test]
fn raised_abort_flag_still_yields_a_legal_move() {
    let mut pos = Position::startpos();
    let mut sel = MoveSelector::new(cfg(Difficulty::Hard));
    sel.set_abort_flag(Arc::new(AtomicBool::new(true)));
    let mut move_count = 0;
    let legal = pos.legal_moves();
    let turn = sel.choose_move(&mut pos, &mut move_count, &OpeningLine::default());
    assert!(legal.contains(&turn.mv.expect("a move despite the abort")));
    assert!(sel.searcher_mut().stopped());
    assert_eq!(move_count, 1);
}

#[test]
fn node_budget_still_yields_a_legal_move() {
    let limits = SearchLimits { max_nodes: Some(50), movetime_ms: None };
    let mut game = Game::from_fen(cfg(Difficulty::Hard).with_limits(limits), "r1bqkb1r/pppp1ppp/2n2n2/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 4").unwrap();
    let legal = game.position().legal_moves();
    let turn = game.play_ai_turn();
    assert!(legal.contains(&turn.mv.expect("a move within budget")));
    assert_eq!(turn.source, Some(MoveSource::Search));
}
