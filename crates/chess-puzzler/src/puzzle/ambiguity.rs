//! Is there a single clearly best move?

use crate::score::Score;

/// |best| below this counts as equal
const EQUAL_CP: i32 = 50;
const EQUAL_GAP: i32 = 110;

/// Upper bound of the small-advantage band
const SMALL_ADVANTAGE_CP: i32 = 210;
const SMALL_ADVANTAGE_GAP: i32 = 250;
const SIGN_FLIP_GAP: i32 = 120;

/// Upper bound of the large-advantage band
const LARGE_ADVANTAGE_CP: i32 = 1000;
const CLEAR_BEST_CP: i32 = 350;
const CLEAR_RUNNER_UP_CP: i32 = 140;
const LARGE_ADVANTAGE_GAP: i32 = 500;

/// A runner-up above this still wins comfortably
const RUNNER_UP_WINNING_CP: i32 = 90;

/// A non-mating alternative this good next to a mate still solves the position
const MATE_ALTERNATIVE_CP: i32 = 500;

/// `scores` are the ranked candidate scores of one position, best first.
///
/// In strict mode the best move is compared with the second candidate. In
/// non-strict mode one alternative is tolerated, so the comparison is with
/// the third candidate, and fewer than three candidates is never ambiguous.
pub fn is_ambiguous(scores: &[Score], strict: bool) -> bool {
    let Some(best) = scores.first() else {
        return false;
    };
    let runner_up_index = if strict { 1 } else { 2 };
    let Some(runner_up) = scores.get(runner_up_index) else {
        return false;
    };

    let pov = best.pov();
    let runner_up = runner_up.for_color(pov);

    if let (Some(s0), Some(s1)) = (best.centipawns(), runner_up.centipawns()) {
        let gap = (s1 - s0).abs();

        if s0.abs() < EQUAL_CP && gap > EQUAL_GAP {
            return false;
        }
        if s0 < SMALL_ADVANTAGE_CP {
            let decisive = gap > SMALL_ADVANTAGE_GAP
                || (s1.abs() < EQUAL_CP && gap > EQUAL_GAP)
                || (best.sign() != runner_up.sign() && gap > SIGN_FLIP_GAP);
            return !decisive;
        }
        if s0 < LARGE_ADVANTAGE_CP
            && ((s0 > CLEAR_BEST_CP && s1 < CLEAR_RUNNER_UP_CP) || s0 - s1 > LARGE_ADVANTAGE_GAP)
        {
            return false;
        }
        return s1 > RUNNER_UP_WINNING_CP;
    }

    if let Some(m0) = best.mate_in() {
        return match runner_up.mate_in() {
            Some(m1) => m0 > 0 && m1 > 0,
            None => runner_up.centipawns().is_some_and(|s1| s1 > MATE_ALTERNATIVE_CP),
        };
    }

    false
}
