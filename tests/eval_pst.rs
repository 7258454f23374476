use piebot_opponent::search::eval::{evaluate, evaluate_with, static_eval_cp, TerminalBonus};
use piebot_opponent::Position;

fn pos(fen: &str) -> Position { Position::from_fen(fen).expect("valid fen") }

#[test]
fn pawn_advanced_better_than_back() {
    // White pawn on e4 vs e2; kings only otherwise.
    let a = evaluate(&pos("k7/8/8/8/4P3/8/8/7K w - - 0 1"));
    let b = evaluate(&pos("k7/8/8/8/8/8/4P3/7K w - - 0 1"));
    assert!(a > b, "advanced pawn eval {a} should exceed back pawn {b}");
    assert_eq!(a, 120);
    assert_eq!(b, 80);
}

#[test]
fn black_pawns_mirror_white() {
    let w = evaluate(&pos("k7/8/8/8/4P3/8/8/7K w - - 0 1"));
    let b = evaluate(&pos("k7/8/8/4p3/8/8/8/7K w - - 0 1"));
    assert_eq!(w, -b);
}

#[test]
fn equal_material_is_zero() {
    // White: Kh1, Qe2; Black: Ka8, Qd2.
    assert_eq!(evaluate(&pos("k7/8/8/8/8/8/3qQ3/7K w - - 0 1")), 0);
}

#[test]
fn only_pawns_get_square_bonus() {
    let center = evaluate(&pos("k7/8/8/8/3N4/8/8/7K w - - 0 1"));
    let rim = evaluate(&pos("k7/8/8/8/8/8/8/N6K w - - 0 1"));
    assert_eq!(center, 320);
    assert_eq!(rim, 320);
}

#[test]
fn check_bonus_is_flat_for_either_side() {
    // White king in check from a1 rook.
    let white_checked = pos("k7/8/8/8/8/8/8/r6K w - - 0 1");
    assert_eq!(static_eval_cp(&white_checked), -500);
    assert_eq!(evaluate(&white_checked), -450);
    // Black king in check from h8 rook.
    let black_checked = pos("k6R/8/8/8/8/8/8/7K b - - 0 1");
    assert_eq!(evaluate(&black_checked), 550);
}

#[test]
fn checkmate_bonus_rewards_the_mated_side_under_flat_policy() {
    // Back-rank mate against White.
    let mated = pos("k7/8/8/8/8/8/5PPP/r5K1 w - - 0 1");
    assert!(mated.is_checkmate());
    assert_eq!(static_eval_cp(&mated), -175);
    assert_eq!(evaluate(&mated), -175 + 50 + 10_000);
}

#[test]
fn side_adjusted_policy_credits_the_attacker() {
    let mated = pos("k7/8/8/8/8/8/5PPP/r5K1 w - - 0 1");
    assert_eq!(evaluate_with(&mated, TerminalBonus::SideAdjusted), -175 - 50 - 10_000);
    let white_checked = pos("k7/8/8/8/8/8/8/r6K w - - 0 1");
    assert_eq!(evaluate_with(&white_checked, TerminalBonus::SideAdjusted), -550);
    let black_checked = pos("k6R/8/8/8/8/8/8/7K b - - 0 1");
    assert_eq!(evaluate_with(&black_checked, TerminalBonus::SideAdjusted), 550);
}

#[test]
fn stalemate_adds_nothing() {
    // Black to move, stalemated in the corner.
    let stale = pos("k7/2Q5/1K6/8/8/8/8/8 b - - 0 1");
    assert!(stale.is_stalemate());
    assert_eq!(evaluate(&stale), 900);
}
