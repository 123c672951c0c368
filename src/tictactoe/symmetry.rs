//! D4 symmetry group operations for board canonicalization

use serde::{Deserialize, Serialize};

/// Rotate a 3x3 grid 90° clockwise.
///
/// Cell `(r, c)` of the result takes cell `(2 - c, r)` of the input.
pub fn rotate_clockwise<T: Copy>(cells: &[T; 9]) -> [T; 9] {
    std::array::from_fn(|idx| {
        let (row, col) = (idx / 3, idx % 3);
        cells[(2 - col) * 3 + row]
    })
}

/// Mirror a 3x3 grid left-right.
pub fn reflect_horizontal<T: Copy>(cells: &[T; 9]) -> [T; 9] {
    std::array::from_fn(|idx| {
        let (row, col) = (idx / 3, idx % 3);
        cells[row * 3 + (2 - col)]
    })
}

/// D4 symmetry transformation (dihedral group of the square)
///
/// Reflection is applied before rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct D4Transform {
    /// Clockwise rotation in degrees (0, 90, 180, 270)
    pub rotation: u16,
    /// Whether to mirror left-right first
    pub reflection: bool,
}

impl D4Transform {
    /// Create identity transform
    pub fn identity() -> Self {
        D4Transform {
            rotation: 0,
            reflection: false,
        }
    }

    /// All 8 transforms, identity first
    pub fn all() -> [D4Transform; 8] {
        let mut transforms = [Self::identity(); 8];
        for (i, rotation) in [0, 90, 180, 270].into_iter().enumerate() {
            transforms[2 * i] = D4Transform {
                rotation,
                reflection: false,
            };
            transforms[2 * i + 1] = D4Transform {
                rotation,
                reflection: true,
            };
        }
        transforms
    }

    /// Where a position (0-8) lands under this transform
    pub fn transform_position(&self, pos: usize) -> usize {
        let (mut row, mut col) = (pos / 3, pos % 3);

        if self.reflection {
            col = 2 - col;
        }

        for _ in 0..(self.rotation / 90) {
            let new_row = col;
            let new_col = 2 - row;
            row = new_row;
            col = new_col;
        }

        row * 3 + col
    }

    /// Apply transform to an array of cells
    pub fn apply_to_cells<T: Copy + Default>(&self, cells: &[T; 9]) -> [T; 9] {
        let mut transformed = [T::default(); 9];
        for (idx, &cell) in cells.iter().enumerate() {
            transformed[self.transform_position(idx)] = cell;
        }
        transformed
    }

    /// Get the inverse transform
    pub fn inverse(&self) -> D4Transform {
        if self.reflection {
            // reflect-then-rotate is an involution for every rotation angle
            *self
        } else {
            D4Transform {
                rotation: (360 - self.rotation) % 360,
                reflection: false,
            }
        }
    }
}

impl Default for D4Transform {
    fn default() -> Self {
        Self::identity()
    }
}
