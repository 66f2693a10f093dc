//! Region partitioning by randomized multi-seed flood fill
//!
//! Seeds grow one cell at a time in round-robin order so no region can
//! race ahead of the others, which keeps the partition roughly balanced.

use std::fmt;

use rand::seq::index;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};
use crate::grid::{Hex, HexGrid};

/// Region tag stored on a cell
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RegionId(pub u16);

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "region-{}", self.0)
    }
}

/// Summary of a finished partition
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RegionMap {
    /// Seed cell of each region, indexed by region id
    pub seeds: Vec<Hex>,
    /// Cell count of each region, indexed by region id
    pub sizes: Vec<usize>,
}

impl RegionMap {
    pub fn region_count(&self) -> usize {
        self.seeds.len()
    }
}

/// Splits a grid into `region_count` connected regions
#[derive(Clone, Copy, Debug)]
pub struct RegionGenerator {
    region_count: usize,
}

impl RegionGenerator {
    pub fn new(region_count: usize) -> Self {
        Self { region_count }
    }

    pub fn region_count(&self) -> usize {
        self.region_count
    }

    /// Tag every reachable cell of `grid` with a region id.
    ///
    /// Any previous tags are cleared first. The result depends entirely on
    /// `rng`; seed it to reproduce a partition.
    pub fn generate<R: Rng>(&self, grid: &mut HexGrid, rng: &mut R) -> Result<RegionMap> {
        let cells = grid.len();
        if self.region_count == 0 || self.region_count > cells || self.region_count > u16::MAX as usize {
            return Err(GridError::InvalidRegionCount {
                requested: self.region_count,
                cells,
            });
        }

        grid.clear_regions();

        let all: Vec<Hex> = grid.hexes().collect();
        let seeds: Vec<Hex> = index::sample(rng, cells, self.region_count)
            .into_iter()
            .map(|i| all[i])
            .collect();

        let mut sizes = vec![1; seeds.len()];
        let mut frontiers: Vec<Vec<Hex>> = Vec::with_capacity(seeds.len());
        for (id, &seed) in seeds.iter().enumerate() {
            grid.set_region(seed, Some(RegionId(id as u16)))?;
            frontiers.push(vec![seed]);
        }

        while frontiers.iter().any(|frontier| !frontier.is_empty()) {
            for (id, frontier) in frontiers.iter_mut().enumerate() {
                if frontier.is_empty() {
                    continue;
                }

                let pick = rng.gen_range(0..frontier.len());
                let candidate = frontier[pick];
                let open: Vec<Hex> = grid
                    .neighbors(candidate)
                    .filter(|&n| is_unclaimed(grid, n))
                    .collect();

                if open.is_empty() {
                    frontier.swap_remove(pick);
                    continue;
                }

                let claimed = open[rng.gen_range(0..open.len())];
                grid.set_region(claimed, Some(RegionId(id as u16)))?;
                frontier.push(claimed);
                sizes[id] += 1;

                // Exhausted once its last open neighbour is taken
                if open.len() == 1 {
                    frontier.swap_remove(pick);
                }
            }
        }

        tracing::debug!(regions = seeds.len(), ?sizes, "region partition complete");

        Ok(RegionMap { seeds, sizes })
    }
}

fn is_unclaimed(grid: &HexGrid, hex: Hex) -> bool {
    matches!(grid.region_of(hex), Ok(None))
}
