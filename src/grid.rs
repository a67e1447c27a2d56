//! Walks the flattened block array and recovers each cell's position.
//!
//! The router lays cells out as `index = x + z*ex + y*ex*ez`: y slowest,
//! then z, then x fastest.

use std::iter::Enumerate;
use std::vec::IntoIter;

use crate::chunk::BlockPos;
use crate::design::{Extents, VoxelEntry};
use crate::error::{ConvertError, Result};

/// Single-pass iterator over `(grid position, entry)` pairs.
///
/// Positions are relative to the design origin.
pub struct GridWalker {
    extents: Extents,
    cells: Enumerate<IntoIter<VoxelEntry>>,
}

impl GridWalker {
    pub fn new(extents: Extents, blocks: Vec<VoxelEntry>) -> Result<Self> {
        let expected = extents
            .volume()
            .ok_or_else(|| ConvertError::MalformedInput(format!("extents {:?} overflow", extents)))?;

        if blocks.len() != expected {
            return Err(ConvertError::ExtentMismatch {
                x: extents.x,
                y: extents.y,
                z: extents.z,
                expected,
                actual: blocks.len(),
            });
        }

        let limit = i32::MAX as u32;
        if extents.x > limit || extents.y > limit || extents.z > limit {
            return Err(ConvertError::MalformedInput(format!(
                "extents {:?} exceed the world coordinate range",
                extents
            )));
        }

        Ok(Self {
            extents,
            cells: blocks.into_iter().enumerate(),
        })
    }

    pub fn extents(&self) -> Extents {
        self.extents
    }

    /// Inverse of `index = x + z*ex + y*ex*ez`.
    pub fn position_of(extents: Extents, index: usize) -> BlockPos {
        let ex = extents.x as usize;
        let ez = extents.z as usize;
        let x = index % ex;
        let z = (index / ex) % ez;
        let y = index / (ex * ez);
        BlockPos::new(x as i32, y as i32, z as i32)
    }
}

impl Iterator for GridWalker {
    type Item = (BlockPos, VoxelEntry);

    fn next(&mut self) -> Option<Self::Item> {
        let (index, entry) = self.cells.next()?;
        Some((Self::position_of(self.extents, index), entry))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.cells.size_hint()
    }
}

impl ExactSizeIterator for GridWalker {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn entries(n: usize) -> Vec<VoxelEntry> {
        (0..n).map(VoxelEntry::new).collect()
    }

    #[test]
    fn test_order_x_fastest_y_slowest() {
        let walker = GridWalker::new(Extents::new(2, 2, 2), entries(8)).unwrap();
        let positions: Vec<_> = walker.map(|(p, _)| (p.x, p.y, p.z)).collect();
        assert_eq!(
            positions,
            vec![
                (0, 0, 0),
                (1, 0, 0),
                (0, 0, 1),
                (1, 0, 1),
                (0, 1, 0),
                (1, 1, 0),
                (0, 1, 1),
                (1, 1, 1),
            ]
        );
    }

    #[test]
    fn test_index_formula_holds() {
        let extents = Extents::new(3, 4, 5);
        let walker = GridWalker::new(extents, entries(60)).unwrap();
        for (pos, entry) in walker {
            // palette_index doubles as the linear index here
            let index = pos.x + pos.z * 3 + pos.y * 3 * 5;
            assert_eq!(index as usize, entry.palette_index);
        }
    }

    #[test]
    fn test_every_cell_once() {
        let walker = GridWalker::new(Extents::new(4, 3, 5), entries(60)).unwrap();
        assert_eq!(walker.len(), 60);

        let seen: HashSet<_> = walker.map(|(p, _)| (p.x, p.y, p.z)).collect();
        assert_eq!(seen.len(), 60);
        for x in 0..4 {
            for y in 0..3 {
                for z in 0..5 {
                    assert!(seen.contains(&(x, y, z)));
                }
            }
        }
    }

    #[test]
    fn test_extent_mismatch() {
        let err = GridWalker::new(Extents::new(2, 2, 2), entries(7)).err().unwrap();
        assert!(matches!(
            err,
            ConvertError::ExtentMismatch { expected: 8, actual: 7, .. }
        ));
    }

    #[test]
    fn test_empty_design() {
        let mut walker = GridWalker::new(Extents::new(0, 4, 4), Vec::new()).unwrap();
        assert!(walker.next().is_none());
    }
}
