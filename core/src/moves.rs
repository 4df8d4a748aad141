use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveKind {
    Reveal,
    Flag,
    Exploded,
}

impl MoveKind {
    pub const fn reveals(self) -> bool {
        matches!(self, Self::Reveal | Self::Exploded)
    }
}

/// One action recorded by the solver against a single cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub x: Coord,
    pub y: Coord,
    pub kind: MoveKind,
    /// Cell value computed by the solver, authoritative when present. Only reveals carry one.
    pub result: Option<i32>,
}

impl Move {
    pub const fn new(coords: Coord2, kind: MoveKind, result: Option<i32>) -> Self {
        Self {
            x: coords.0,
            y: coords.1,
            kind,
            result,
        }
    }

    pub const fn reveal(coords: Coord2, result: Option<i32>) -> Self {
        Self::new(coords, MoveKind::Reveal, result)
    }

    pub const fn flag(coords: Coord2) -> Self {
        Self::new(coords, MoveKind::Flag, None)
    }

    pub const fn exploded(coords: Coord2, result: Option<i32>) -> Self {
        Self::new(coords, MoveKind::Exploded, result)
    }

    pub const fn coords(&self) -> Coord2 {
        (self.x, self.y)
    }
}

/// Parses a solver result string the way a lenient integer prefix parser would.
///
/// Leading whitespace and a sign are accepted and parsing stops at the first non-digit. An empty string, or one with
/// no leading digits, is absent. `"0"` is a value, not an absence.
pub fn parse_result(text: &str) -> Option<i32> {
    let text = text.trim_start();
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    let value: i32 = digits[..end].parse().ok()?;
    Some(if negative { -value } else { value })
}

/// Ordered solver trace for one problem.
///
/// Each slot holds a move or is a hole left by a partial solver result. Holes keep their position so move indices
/// stay aligned with the solver's numbering, and are skipped during replay.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveList {
    slots: Vec<Option<Move>>,
}

impl MoveList {
    pub const fn new() -> Self {
        Self { slots: Vec::new() }
    }

    pub fn from_slots(slots: Vec<Option<Move>>) -> Self {
        Self { slots }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Index of the final slot, if there is one.
    pub fn last_index(&self) -> Option<usize> {
        self.slots.len().checked_sub(1)
    }

    /// Move at `index`, or `None` for holes and indices past the end.
    pub fn get(&self, index: usize) -> Option<&Move> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    pub fn slots(&self) -> &[Option<Move>] {
        &self.slots
    }

    pub fn hole_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_none()).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Move> {
        self.slots.iter().flatten()
    }
}

impl FromIterator<Move> for MoveList {
    fn from_iter<I: IntoIterator<Item = Move>>(iter: I) -> Self {
        Self::from_slots(iter.into_iter().map(Some).collect())
    }
}

impl FromIterator<Option<Move>> for MoveList {
    fn from_iter<I: IntoIterator<Item = Option<Move>>>(iter: I) -> Self {
        Self::from_slots(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn parse_result_keeps_zero() {
        assert_eq!(parse_result("0"), Some(0));
        assert_eq!(parse_result("3"), Some(3));
    }

    #[test]
    fn parse_result_treats_empty_and_garbage_as_absent() {
        assert_eq!(parse_result(""), None);
        assert_eq!(parse_result("   "), None);
        assert_eq!(parse_result("mine"), None);
        assert_eq!(parse_result("-"), None);
    }

    #[test]
    fn parse_result_reads_integer_prefix() {
        assert_eq!(parse_result("  2"), Some(2));
        assert_eq!(parse_result("-1"), Some(-1));
        assert_eq!(parse_result("+4"), Some(4));
        assert_eq!(parse_result("5 mines"), Some(5));
        assert_eq!(parse_result("99999999999"), None);
    }

    #[test]
    fn holes_count_towards_length() {
        let moves = MoveList::from_slots(vec![
            Some(Move::reveal((0, 0), Some(1))),
            None,
            Some(Move::flag((1, 0))),
        ]);

        assert_eq!(moves.len(), 3);
        assert_eq!(moves.last_index(), Some(2));
        assert_eq!(moves.hole_count(), 1);
        assert_eq!(moves.get(1), None);
        assert_eq!(moves.get(2), Some(&Move::flag((1, 0))));
        assert_eq!(moves.get(3), None);
        assert_eq!(moves.iter().count(), 2);
    }

    #[test]
    fn empty_list_has_no_last_index() {
        assert_eq!(MoveList::new().last_index(), None);
    }
}
