//! Board helpers over shakmaty: material weights, move notation, FEN.

use shakmaty::fen::Fen;
use shakmaty::san::San;
use shakmaty::uci::UciMove;
use shakmaty::{Board, CastlingMode, Chess, Color, EnPassantMode, Move, Position, Role};

// Material weights used by the blunder heuristic and the completeness test
pub const PAWN_VALUE: f64 = 1.0;
pub const KNIGHT_VALUE: f64 = 3.0;
pub const BISHOP_VALUE: f64 = 3.0;
pub const ROOK_VALUE: f64 = 5.5;
pub const QUEEN_VALUE: f64 = 9.0;

/// Piece value (king counts as zero)
pub fn piece_value(role: Role) -> f64 {
    match role {
        Role::Pawn => PAWN_VALUE,
        Role::Knight => KNIGHT_VALUE,
        Role::Bishop => BISHOP_VALUE,
        Role::Rook => ROOK_VALUE,
        Role::Queen => QUEEN_VALUE,
        Role::King => 0.0,
    }
}

/// Weighted material of one side
pub fn material(board: &Board, color: Color) -> f64 {
    Role::ALL
        .iter()
        .map(|&role| {
            let count = (board.by_role(role) & board.by_color(color)).count();
            count as f64 * piece_value(role)
        })
        .sum()
}

/// Weighted material of both sides together
pub fn material_total(board: &Board) -> f64 {
    material(board, Color::White) + material(board, Color::Black)
}

/// Material of `color` minus material of the other side
pub fn material_difference(board: &Board, color: Color) -> f64 {
    material(board, color) - material(board, !color)
}

/// Number of occupied squares (kings included)
pub fn piece_count(board: &Board) -> usize {
    board.occupied().count()
}

/// Parse a UCI move string against a position. Returns `None` for
/// malformed or illegal moves.
pub fn parse_uci_move(pos: &Chess, uci: &str) -> Option<Move> {
    let uci_move = uci.parse::<UciMove>().ok()?;
    uci_move.to_move(pos).ok()
}

/// UCI notation of a move (castling as king to destination square)
pub fn move_to_uci(mv: &Move) -> String {
    mv.clone().to_uci(CastlingMode::Standard).to_string()
}

/// SAN of a legal move including the check or mate suffix
pub fn san_plus(pos: &Chess, mv: &Move) -> String {
    let mut san = San::from_move(pos, mv.clone()).to_string();
    let mut after = pos.clone();
    after.play_unchecked(mv.clone());
    if after.is_checkmate() {
        san.push('#');
    } else if after.is_check() {
        san.push('+');
    }
    san
}

/// Full FEN of a position
pub fn fen_of(pos: &Chess) -> String {
    Fen::from_position(pos, EnPassantMode::Legal).to_string()
}

/// Parse a FEN into a legal standard-chess position
pub fn parse_fen(fen: &str) -> Result<Chess, String> {
    let parsed = fen.trim().parse::<Fen>().map_err(|e| e.to_string())?;
    parsed
        .into_position::<Chess>(CastlingMode::Standard)
        .map_err(|e| e.to_string())
}

/// Move number prefix for the side to move: `12.` for White, `12...` for Black
pub fn move_number_prefix(pos: &Chess) -> String {
    let number = pos.fullmoves().get();
    match pos.turn() {
        Color::White => format!("{number}."),
        Color::Black => format!("{number}..."),
    }
}

/// True when the side to move has no legal moves (mate or stalemate)
pub fn is_terminal(pos: &Chess) -> bool {
    pos.legal_moves().is_empty()
}
