/// Single coordinate axis used for grid width, height, and positions.
pub type Coord = u16;

/// Two-dimensional coordinates `(x, y)` in solver addressing: `x` is the column, `y` is the row.
pub type Coord2 = (Coord, Coord);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    /// Display arrays are row-major, so `(x, y)` lands at `[y, x]`.
    fn to_nd_index(self) -> Self::Output {
        [self.1.into(), self.0.into()]
    }
}

/// Returns `coords` only when it is inside a `(cols, rows)` sized grid.
pub const fn checked_coords(coords: Coord2, bounds: Coord2) -> Option<Coord2> {
    if coords.0 < bounds.0 && coords.1 < bounds.1 {
        Some(coords)
    } else {
        None
    }
}
