//! Uniform-grid neighbor search over the active agents of one buffer.
//!
//! The grid is rebuilt from scratch on every refresh: O(agents) inserts into
//! a hash map keyed by integer cell coordinates, then one bounded query per
//! agent that needs a neighbor list.  With the cell edge set to the largest
//! query range, every query touches at most 27 cells.

use smallvec::SmallVec;
use steer_agent::{AgentBuffer, CrowdAgent};
use steer_behavior::{MAX_NEIGHBOR_TARGETS, NeighborTargets};
use steer_core::{AgentId, EPSILON, Vec3};

#[cfg(feature = "fx-hash")]
type GridMap<K, V> = rustc_hash::FxHashMap<K, V>;
#[cfg(not(feature = "fx-hash"))]
type GridMap<K, V> = std::collections::HashMap<K, V>;

type CellKey = (i32, i32, i32);

/// Agents bucketed by grid cell.
pub struct NeighborGrid {
    cell_size: f32,
    cells:     GridMap<CellKey, SmallVec<[AgentId; 8]>>,
}

impl NeighborGrid {
    /// Bucket every active agent of `agents`.  `cell_size` below
    /// [`EPSILON`] is raised to it.
    pub fn build(agents: &AgentBuffer, cell_size: f32) -> Self {
        let cell_size = if cell_size.is_finite() { cell_size.max(EPSILON) } else { EPSILON };
        let mut grid = Self { cell_size, cells: GridMap::default() };
        for agent in agents.iter_active() {
            let key = grid.key(agent.pos);
            grid.cells.entry(key).or_default().push(agent.id);
        }
        grid
    }

    #[inline]
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Number of non-empty cells.
    #[inline]
    pub fn occupied_cells(&self) -> usize {
        self.cells.len()
    }

    /// Active agents within `range` of `agent` (center to center), nearest
    /// first, ties by identity, at most [`MAX_NEIGHBOR_TARGETS`].
    ///
    /// `agent` itself is never included.
    pub fn nearest(&self, agents: &AgentBuffer, agent: &CrowdAgent, range: f32) -> NeighborTargets {
        let mut found = NeighborTargets::new();
        if range.is_nan() || range <= 0.0 {
            return found;
        }

        let reach = (range / self.cell_size).ceil() as i32;
        let (cx, cy, cz) = self.key(agent.pos);
        let range_sq = range * range;

        let mut candidates: SmallVec<[(f32, AgentId); 32]> = SmallVec::new();
        for dx in -reach..=reach {
            for dy in -reach..=reach {
                for dz in -reach..=reach {
                    let Some(bucket) = self.cells.get(&(cx + dx, cy + dy, cz + dz)) else {
                        continue;
                    };
                    for &id in bucket {
                        if id == agent.id {
                            continue;
                        }
                        let Some(other) = agents.get(id) else { continue };
                        let d_sq = agent.pos.distance_squared(other.pos);
                        if d_sq <= range_sq {
                            candidates.push((d_sq, id));
                        }
                    }
                }
            }
        }

        candidates.sort_unstable_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        found.extend(candidates.into_iter().take(MAX_NEIGHBOR_TARGETS).map(|(_, id)| id));
        found
    }

    #[inline]
    fn key(&self, p: Vec3) -> CellKey {
        let c = (p / self.cell_size).floor();
        (c.x as i32, c.y as i32, c.z as i32)
    }
}
