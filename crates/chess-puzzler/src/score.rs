//! Engine evaluations with an explicit point of view.

use std::cmp::Ordering;
use std::fmt;

use shakmaty::{Chess, Color, Position};

use crate::error::ScoreError;

/// Raw evaluation value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Eval {
    /// Centipawns
    Cp(i32),
    /// Mate in N moves (positive = the point of view mates, negative = gets mated)
    Mate(i32),
}

impl Eval {
    pub fn negate(self) -> Eval {
        match self {
            Eval::Cp(c) => Eval::Cp(-c),
            Eval::Mate(m) => Eval::Mate(-m),
        }
    }
}

/// An evaluation seen from one side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Score {
    eval: Eval,
    pov: Color,
}

impl Score {
    pub fn new(eval: Eval, pov: Color) -> Self {
        Self { eval, pov }
    }

    pub fn cp(cp: i32, pov: Color) -> Self {
        Self::new(Eval::Cp(cp), pov)
    }

    pub fn mate(moves: i32, pov: Color) -> Self {
        Self::new(Eval::Mate(moves), pov)
    }

    /// Build a score from the `cp`/`mate` fields of a UCI info line.
    /// A mate score takes precedence; `mate 0` only occurs in positions that
    /// are already over and is rejected.
    pub fn from_uci(cp: Option<i32>, mate: Option<i32>, pov: Color) -> Result<Self, ScoreError> {
        match (mate, cp) {
            (Some(0), _) => Err(ScoreError::Mated),
            (Some(m), _) => Ok(Self::mate(m, pov)),
            (None, Some(c)) => Ok(Self::cp(c, pov)),
            (None, None) => Err(ScoreError::Missing),
        }
    }

    pub fn eval(&self) -> Eval {
        self.eval
    }

    pub fn pov(&self) -> Color {
        self.pov
    }

    pub fn centipawns(&self) -> Option<i32> {
        match self.eval {
            Eval::Cp(c) => Some(c),
            Eval::Mate(_) => None,
        }
    }

    pub fn mate_in(&self) -> Option<i32> {
        match self.eval {
            Eval::Mate(m) => Some(m),
            Eval::Cp(_) => None,
        }
    }

    pub fn is_mate(&self) -> bool {
        matches!(self.eval, Eval::Mate(_))
    }

    /// -1, 0 or 1 from the point of view's side
    pub fn sign(&self) -> i32 {
        match self.eval {
            Eval::Cp(c) => c.signum(),
            Eval::Mate(m) => m.signum(),
        }
    }

    /// The same evaluation seen from `color`
    pub fn for_color(self, color: Color) -> Score {
        if color == self.pov {
            self
        } else {
            Score::new(self.eval.negate(), color)
        }
    }

    pub fn white(self) -> Score {
        self.for_color(Color::White)
    }

    /// Single integer ordering decisiveness: mates sit beyond any centipawn
    /// value and a shorter mate ranks higher.
    pub fn rank(&self) -> i32 {
        match self.eval {
            Eval::Cp(c) => c,
            Eval::Mate(m) if m > 0 => 10000 - m * 10,
            Eval::Mate(m) => -10000 - m * 10,
        }
    }
}

/// Interpret `eval` as relative to the side to move in `pos` and return it
/// from White's point of view.
pub fn normalize(pos: &Chess, eval: Eval) -> Score {
    Score::new(eval, pos.turn()).white()
}

impl PartialOrd for Score {
    /// Scores only compare when they share a point of view.
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.pov != other.pov {
            return None;
        }
        Some(self.rank().cmp(&other.rank()))
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.eval {
            Eval::Cp(c) => write!(f, "cp {c}"),
            Eval::Mate(m) => write!(f, "mate {m}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::board::parse_fen;

    #[test]
    fn test_from_uci() {
        assert_eq!(
            Score::from_uci(Some(35), None, Color::White).unwrap().eval(),
            Eval::Cp(35)
        );
        assert_eq!(
            Score::from_uci(Some(35), Some(-2), Color::Black).unwrap().eval(),
            Eval::Mate(-2)
        );
        assert!(matches!(
            Score::from_uci(None, None, Color::White),
            Err(ScoreError::Missing)
        ));
        assert!(matches!(
            Score::from_uci(None, Some(0), Color::White),
            Err(ScoreError::Mated)
        ));
    }

    #[test]
    fn test_sign() {
        assert_eq!(Score::cp(120, Color::White).sign(), 1);
        assert_eq!(Score::cp(-5, Color::White).sign(), -1);
        assert_eq!(Score::cp(0, Color::White).sign(), 0);
        assert_eq!(Score::mate(3, Color::Black).sign(), 1);
        assert_eq!(Score::mate(-1, Color::Black).sign(), -1);
    }

    #[test]
    fn test_for_color_flips_only_across_sides() {
        let s = Score::cp(80, Color::Black);
        assert_eq!(s.for_color(Color::Black), s);
        assert_eq!(s.white().eval(), Eval::Cp(-80));
        assert_eq!(Score::mate(2, Color::White).for_color(Color::Black).eval(), Eval::Mate(-2));
        assert_eq!(s.white().for_color(Color::Black), s);
    }

    #[test]
    fn test_normalize_uses_side_to_move() {
        let black_to_move = parse_fen("8/4k3/R6p/1R6/8/8/8/6K1 b - - 0 1").unwrap();
        let s = normalize(&black_to_move, Eval::Cp(-300));
        assert_eq!(s.pov(), Color::White);
        assert_eq!(s.eval(), Eval::Cp(300));

        let white_to_move = Chess::default();
        assert_eq!(normalize(&white_to_move, Eval::Mate(4)).eval(), Eval::Mate(4));
    }

    #[test]
    fn test_ordering() {
        let w = Color::White;
        assert!(Score::mate(5, w) > Score::cp(2000, w));
        assert!(Score::mate(1, w) > Score::mate(3, w));
        assert!(Score::mate(-5, w) > Score::mate(-1, w));
        assert!(Score::cp(-2000, w) > Score::mate(-8, w));
        assert!(Score::cp(10, w) < Score::cp(11, w));
        assert_eq!(Score::cp(10, w).partial_cmp(&Score::cp(10, Color::Black)), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Score::cp(-35, Color::White).to_string(), "cp -35");
        assert_eq!(Score::mate(3, Color::White).to_string(), "mate 3");
    }
}
