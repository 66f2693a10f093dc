//! Tunnel carving by biased random growth
//!
//! A tunnel starts at one random cell and grows by attaching the neighbour
//! that touches the fewest existing tunnel cells, which favours long thin
//! corridors over blobs. Growth that keeps hitting dead ends is abandoned
//! and restarted from scratch.

use rand::Rng;
use rustc_hash::FxHashSet;

use crate::error::{GridError, Result};
use crate::grid::{Hex, HexGrid};

/// Consecutive failed growth attempts before a restart
pub const DEFAULT_FAILURE_CEILING: u32 = 1000;

/// Grows one connected set of cells
#[derive(Clone, Copy, Debug)]
pub struct TunnelGenerator {
    target_size: usize,
    failure_ceiling: u32,
}

impl TunnelGenerator {
    pub fn new(target_size: usize) -> Self {
        Self {
            target_size,
            failure_ceiling: DEFAULT_FAILURE_CEILING,
        }
    }

    /// Set the number of consecutive failures that trigger a restart
    pub fn with_failure_ceiling(mut self, failure_ceiling: u32) -> Self {
        self.failure_ceiling = failure_ceiling.max(1);
        self
    }

    pub fn target_size(&self) -> usize {
        self.target_size
    }

    pub fn failure_ceiling(&self) -> u32 {
        self.failure_ceiling
    }

    /// Smallest ceiling accepted from outside callers: one failure per target cell
    pub fn min_failure_ceiling(&self) -> u32 {
        u32::try_from(self.target_size).unwrap_or(u32::MAX)
    }

    /// Reject parameters that cannot succeed on `grid` or would restart almost forever
    pub fn validate(&self, grid: &HexGrid) -> Result<()> {
        self.check_size(grid)?;
        if self.failure_ceiling < self.min_failure_ceiling() {
            return Err(GridError::InvalidFailureCeiling {
                requested: self.failure_ceiling,
                minimum: self.min_failure_ceiling(),
            });
        }
        Ok(())
    }

    fn check_size(&self, grid: &HexGrid) -> Result<()> {
        if self.target_size == 0 || self.target_size > grid.len() {
            return Err(GridError::InvalidTunnelSize {
                requested: self.target_size,
                cells: grid.len(),
            });
        }
        Ok(())
    }

    /// Carve a tunnel of exactly `target_size` connected cells.
    ///
    /// Only reads the grid's adjacency. Stalled attempts are restarted
    /// internally; the only error is an impossible target size.
    pub fn generate<R: Rng>(&self, grid: &HexGrid, rng: &mut R) -> Result<FxHashSet<Hex>> {
        self.check_size(grid)?;

        let mut restarts = 0u32;
        loop {
            match self.grow(grid, rng) {
                Ok(tunnel) => {
                    tracing::debug!(size = tunnel.len(), restarts, "tunnel carved");
                    return Ok(tunnel);
                }
                Err(GridError::GenerationStalled { failures }) => {
                    restarts += 1;
                    tracing::debug!(failures, restarts, "tunnel growth stalled, restarting");
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// One growth attempt from a fresh random start
    fn grow<R: Rng>(&self, grid: &HexGrid, rng: &mut R) -> Result<FxHashSet<Hex>> {
        let all: Vec<Hex> = grid.hexes().collect();
        let start = all[rng.gen_range(0..all.len())];

        let mut tunnel = FxHashSet::default();
        tunnel.insert(start);
        // Insertion-ordered copy for uniform picks
        let mut members = vec![start];
        let mut failures = 0u32;

        while tunnel.len() < self.target_size {
            let from = members[rng.gen_range(0..members.len())];

            match least_connected_neighbor(grid, &tunnel, from, rng) {
                Some(next) => {
                    tunnel.insert(next);
                    members.push(next);
                    failures = 0;
                }
                None => {
                    failures += 1;
                    if failures >= self.failure_ceiling {
                        return Err(GridError::GenerationStalled { failures });
                    }
                }
            }
        }

        Ok(tunnel)
    }
}

/// Number of `hex`'s neighbours already in the tunnel (lower is better)
fn desirability(grid: &HexGrid, tunnel: &FxHashSet<Hex>, hex: Hex) -> usize {
    grid.neighbors(hex).filter(|n| tunnel.contains(n)).count()
}

/// Lowest-scoring neighbour of `from` outside the tunnel; ties broken at random
fn least_connected_neighbor<R: Rng>(
    grid: &HexGrid,
    tunnel: &FxHashSet<Hex>,
    from: Hex,
    rng: &mut R,
) -> Option<Hex> {
    let mut best: Vec<Hex> = Vec::new();
    let mut best_score = usize::MAX;

    for candidate in grid.neighbors(from).filter(|n| !tunnel.contains(n)) {
        let score = desirability(grid, tunnel, candidate);
        if score < best_score {
            best_score = score;
            best.clear();
            best.push(candidate);
        } else if score == best_score {
            best.push(candidate);
        }
    }

    if best.is_empty() {
        None
    } else {
        Some(best[rng.gen_range(0..best.len())])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn is_connected(grid: &HexGrid, cells: &FxHashSet<Hex>) -> bool {
        let Some(&start) = cells.iter().next() else {
            return true;
        };
        let mut seen = FxHashSet::default();
        seen.insert(start);
        let mut stack = vec![start];
        while let Some(hex) = stack.pop() {
            for n in grid.neighbors(hex) {
                if cells.contains(&n) && seen.insert(n) {
                    stack.push(n);
                }
            }
        }
        seen.len() == cells.len()
    }

    #[test]
    fn test_tunnel_has_exact_size_and_is_connected() {
        let grid = HexGrid::new(10, 10, 20.0).unwrap();
        for seed in 0..25 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let tunnel = TunnelGenerator::new(15).generate(&grid, &mut rng).unwrap();
            assert_eq!(tunnel.len(), 15);
            assert!(is_connected(&grid, &tunnel));
            assert!(tunnel.iter().all(|&h| grid.contains(h)));
        }
    }

    #[test]
    fn test_tunnel_can_fill_grid() {
        let grid = HexGrid::new(3, 4, 20.0).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let tunnel = TunnelGenerator::new(12).generate(&grid, &mut rng).unwrap();
        assert_eq!(tunnel.len(), 12);
    }

    #[test]
    fn test_single_cell_tunnel() {
        let grid = HexGrid::new(4, 4, 20.0).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let tunnel = TunnelGenerator::new(1).generate(&grid, &mut rng).unwrap();
        assert_eq!(tunnel.len(), 1);
    }

    #[test]
    fn test_invalid_tunnel_size() {
        let grid = HexGrid::new(2, 2, 20.0).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        assert!(matches!(
            TunnelGenerator::new(0).generate(&grid, &mut rng),
            Err(GridError::InvalidTunnelSize { .. })
        ));
        assert!(matches!(
            TunnelGenerator::new(5).generate(&grid, &mut rng),
            Err(GridError::InvalidTunnelSize { requested: 5, cells: 4 })
        ));
    }

    #[test]
    fn test_stalled_growth_is_reported_by_attempt() {
        // A single row is a path; growing from an end cell dead-ends quickly
        let grid = HexGrid::new(1, 3, 20.0).unwrap();
        let generator = TunnelGenerator::new(3).with_failure_ceiling(1);
        let stalled = (0..50).any(|seed| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            matches!(
                generator.grow(&grid, &mut rng),
                Err(GridError::GenerationStalled { failures: 1 })
            )
        });
        assert!(stalled);
    }

    #[test]
    fn test_restarts_are_invisible_to_caller() {
        let grid = HexGrid::new(1, 3, 20.0).unwrap();
        let generator = TunnelGenerator::new(3).with_failure_ceiling(1);
        for seed in 0..20 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let tunnel = generator.generate(&grid, &mut rng).unwrap();
            assert_eq!(tunnel.len(), 3);
        }
    }

    #[test]
    fn test_prefers_least_connected_neighbor() {
        let grid = HexGrid::new(5, 5, 20.0).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        // (1,1) and (1,3) touch both carved cells; the others touch one
        let tunnel: FxHashSet<Hex> = [Hex::new(2, 2), Hex::new(1, 2)].into_iter().collect();
        assert_eq!(desirability(&grid, &tunnel, Hex::new(1, 1)), 2);
        assert_eq!(desirability(&grid, &tunnel, Hex::new(1, 3)), 2);
        for _ in 0..20 {
            let next = least_connected_neighbor(&grid, &tunnel, Hex::new(2, 2), &mut rng).unwrap();
            assert!([Hex::new(3, 2), Hex::new(2, 1), Hex::new(2, 3)].contains(&next));
        }
    }

    #[test]
    fn test_failure_ceiling_minimum() {
        assert_eq!(TunnelGenerator::new(3).with_failure_ceiling(0).failure_ceiling(), 1);
        assert_eq!(TunnelGenerator::new(3).failure_ceiling(), DEFAULT_FAILURE_CEILING);
    }

    #[test]
    fn test_validate_enforces_ceiling_floor() {
        let grid = HexGrid::new(8, 8, 20.0).unwrap();
        assert!(matches!(
            TunnelGenerator::new(64).with_failure_ceiling(1).validate(&grid),
            Err(GridError::InvalidFailureCeiling { requested: 1, minimum: 64 })
        ));
        assert!(TunnelGenerator::new(64).with_failure_ceiling(64).validate(&grid).is_ok());
        assert!(TunnelGenerator::new(8).validate(&grid).is_ok());
        assert!(matches!(
            TunnelGenerator::new(65).validate(&grid),
            Err(GridError::InvalidTunnelSize { .. })
        ));
    }

    #[test]
    fn test_full_grid_at_minimum_ceiling_finishes() {
        let grid = HexGrid::new(8, 8, 20.0).unwrap();
        let generator = TunnelGenerator::new(64).with_failure_ceiling(64);
        for seed in 0..3 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            assert_eq!(generator.generate(&grid, &mut rng).unwrap().len(), 64);
        }
    }
}
