//! Per-leg view of an index tuple as consumed by the correlator stage.

use serde::{Deserialize, Serialize};

use crate::tuple::IndexTuple;

/// Spin and displacement of a single quark leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuarkTerm {
    /// Signed 1-based displacement direction, 0 when undisplaced.
    pub displacement: i32,
    /// 0-based spin index.
    pub spin: i32,
    /// 0-based displacement axis, 0 when undisplaced.
    pub disp_dir: i32,
    /// Displacement length, 0 when undisplaced.
    pub disp_len: i32,
    /// Slot of the displaced field: `0..=3` for `0..=3`, `4..=6` for `-1..=-3`.
    pub disp_ind: i32,
}

impl QuarkTerm {
    fn from_leg(spin: i32, displacement: i32, length: i32) -> Self {
        let displaced = displacement != 0;
        Self {
            displacement,
            spin: spin - 1,
            disp_dir: if displaced { displacement.abs() - 1 } else { 0 },
            disp_len: if displaced { length } else { 0 },
            disp_ind: if displacement < 0 {
                3 - displacement
            } else {
                displacement
            },
        }
    }
}

impl IndexTuple {
    /// Splits the tuple into its three quark legs.
    pub fn quark_terms(&self) -> [QuarkTerm; 3] {
        let spins = self.spins();
        let displacements = self.displacements();
        [0, 1, 2].map(|leg| QuarkTerm::from_leg(spins[leg], displacements[leg], self.length()))
    }
}
