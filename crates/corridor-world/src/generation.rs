//! Procedural layout generation.
//!
//! The chunk store only needs "give me a grid of this size"; anything that
//! implements [`LayoutGenerator`] can fill that role. [`CorridorGenerator`]
//! is the built-in one: it scatters region seeds, joins them with a spanning
//! set of L-shaped corridors and opens exits towards every edge so that
//! neighbouring chunks have something to connect to.

use corridor_common::{GenerationError, Tile};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::grid::Grid;

/// Rejection sampling cap for region seeds.
const MAX_SEED_ATTEMPTS: u32 = 1000;

/// Safety cap for the 2x2 thinning loop.
const MAX_THINNING_PASSES: u32 = 10;

/// Parameters for one generation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutParams {
    /// Grid width in tiles
    pub width: u32,
    /// Grid height in tiles
    pub height: u32,
    /// Region seeds to scatter (0 = auto, `2 * max(width, height)`)
    pub region_count: u32,
    /// Minimum distance between region seeds
    pub min_region_spacing: u32,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            width: 50,
            height: 50,
            region_count: 0,
            min_region_spacing: 3,
        }
    }
}

impl LayoutParams {
    /// Creates generation parameters.
    #[must_use]
    pub const fn new(width: u32, height: u32, region_count: u32, min_region_spacing: u32) -> Self {
        Self {
            width,
            height,
            region_count,
            min_region_spacing,
        }
    }

    /// Region count with the `0 = auto` rule applied.
    #[must_use]
    pub fn resolved_region_count(&self) -> u32 {
        if self.region_count == 0 {
            self.width.max(self.height) * 2
        } else {
            self.region_count
        }
    }
}

/// Produces a finished tile grid for the given parameters.
///
/// Implementations either return a complete grid of exactly
/// `params.width x params.height` tiles or an error; they must not hand back
/// partial results.
pub trait LayoutGenerator {
    /// Generates one grid.
    fn generate(&mut self, params: &LayoutParams) -> Result<Grid, GenerationError>;
}

impl<F> LayoutGenerator for F
where
    F: FnMut(&LayoutParams) -> Result<Grid, GenerationError>,
{
    fn generate(&mut self, params: &LayoutParams) -> Result<Grid, GenerationError> {
        self(params)
    }
}

/// Corridor generator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Random seed
    pub seed: u64,
    /// Carve a corridor from the nearest seed to each grid edge
    pub carve_exits: bool,
    /// Mark seed cells that were not carved as region centers
    pub mark_region_centers: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: 12345,
            carve_exits: true,
            mark_region_centers: false,
        }
    }
}

/// Seeded corridor layout generator.
pub struct CorridorGenerator {
    config: GeneratorConfig,
    rng: fastrand::Rng,
}

impl CorridorGenerator {
    /// Creates a generator with the given config.
    #[must_use]
    pub fn new(config: GeneratorConfig) -> Self {
        let rng = fastrand::Rng::with_seed(config.seed);
        Self { config, rng }
    }

    /// Creates a generator with default config and the given seed.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self::new(GeneratorConfig {
            seed,
            ..Default::default()
        })
    }

    /// Returns the generator configuration.
    #[must_use]
    pub const fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Scatters seeds with a minimum pairwise distance.
    fn scatter_seeds(&mut self, params: &LayoutParams) -> Vec<(i64, i64)> {
        let wanted = params.resolved_region_count() as usize;
        let min_sq = i64::from(params.min_region_spacing).pow(2);
        let mut seeds: Vec<(i64, i64)> = Vec::with_capacity(wanted);
        let mut attempts = 0;

        while seeds.len() < wanted && attempts < MAX_SEED_ATTEMPTS {
            attempts += 1;
            let candidate = (
                i64::from(self.rng.u32(0..params.width)),
                i64::from(self.rng.u32(0..params.height)),
            );
            let too_close = seeds.iter().any(|s| dist_sq(*s, candidate) < min_sq);
            if !too_close {
                seeds.push(candidate);
            }
        }
        seeds
    }

    /// Spanning tree over the seeds (Prim's, squared euclidean weights),
    /// returned shortest edge first.
    fn spanning_edges(seeds: &[(i64, i64)]) -> Vec<(usize, usize)> {
        let n = seeds.len();
        let mut in_tree = vec![false; n];
        let mut best: Vec<(i64, usize)> = vec![(i64::MAX, 0); n];
        let mut edges = Vec::with_capacity(n.saturating_sub(1));

        if n == 0 {
            return edges;
        }
        in_tree[0] = true;
        for j in 1..n {
            best[j] = (dist_sq(seeds[0], seeds[j]), 0);
        }

        for _ in 1..n {
            let next = (0..n)
                .filter(|&j| !in_tree[j])
                .min_by_key(|&j| best[j].0);
            let Some(next) = next else { break };
            in_tree[next] = true;
            edges.push((best[next].1, next));
            for j in 0..n {
                if !in_tree[j] {
                    let d = dist_sq(seeds[next], seeds[j]);
                    if d < best[j].0 {
                        best[j] = (d, next);
                    }
                }
            }
        }

        edges.sort_by_key(|&(a, b)| dist_sq(seeds[a], seeds[b]));
        edges
    }

    /// Carves an L-shaped corridor between two cells.
    fn carve_l(&mut self, canvas: &mut Canvas, from: (i64, i64), to: (i64, i64)) {
        let corner = if self.rng.bool() {
            (to.0, from.1)
        } else {
            (from.0, to.1)
        };
        canvas.carve_line(from, corner);
        canvas.carve_line(corner, to);
    }

    /// Carves from the seed nearest each edge straight out to that edge.
    fn carve_exits(canvas: &mut Canvas, seeds: &[(i64, i64)]) {
        let max_x = canvas.width - 1;
        let max_y = canvas.height - 1;

        let nearest = |key: &dyn Fn(&(i64, i64)) -> i64| seeds.iter().copied().min_by_key(|s| key(s));

        if let Some(s) = nearest(&|s| max_y - s.1) {
            canvas.carve_line(s, (s.0, max_y));
        }
        if let Some(s) = nearest(&|s| s.1) {
            canvas.carve_line(s, (s.0, 0));
        }
        if let Some(s) = nearest(&|s| max_x - s.0) {
            canvas.carve_line(s, (max_x, s.1));
        }
        if let Some(s) = nearest(&|s| s.0) {
            canvas.carve_line(s, (0, s.1));
        }
    }
}

impl LayoutGenerator for CorridorGenerator {
    fn generate(&mut self, params: &LayoutParams) -> Result<Grid, GenerationError> {
        if params.width == 0 || params.height == 0 {
            return Err(GenerationError::InvalidSize {
                width: params.width,
                height: params.height,
            });
        }

        let seeds = self.scatter_seeds(params);
        if seeds.len() < 2 {
            return Err(GenerationError::Failed(format!(
                "need at least 2 region seeds, placed {}",
                seeds.len()
            )));
        }

        let mut canvas = Canvas::new(params.width, params.height);
        let edges = Self::spanning_edges(&seeds);
        for &(a, b) in &edges {
            self.carve_l(&mut canvas, seeds[a], seeds[b]);
        }
        if self.config.carve_exits {
            Self::carve_exits(&mut canvas, &seeds);
        }
        canvas.thin_double_wide();

        if self.config.mark_region_centers {
            for &seed in &seeds {
                if canvas.get(seed) != Tile::Path {
                    canvas.set(seed, Tile::RegionCenter);
                }
            }
        }

        debug!(
            "Generated {}x{} layout: {} seeds, {} corridors",
            params.width,
            params.height,
            seeds.len(),
            edges.len()
        );

        Grid::from_tiles(params.width, params.height, canvas.tiles)
    }
}

fn dist_sq(a: (i64, i64), b: (i64, i64)) -> i64 {
    (a.0 - b.0).pow(2) + (a.1 - b.1).pow(2)
}

/// Mutable scratch buffer the generator carves into before freezing it
/// into a [`Grid`].
struct Canvas {
    width: i64,
    height: i64,
    tiles: Vec<Tile>,
}

impl Canvas {
    fn new(width: u32, height: u32) -> Self {
        Self {
            width: i64::from(width),
            height: i64::from(height),
            tiles: vec![Tile::Region; (width as usize) * (height as usize)],
        }
    }

    fn in_bounds(&self, (x, y): (i64, i64)) -> bool {
        x >= 0 && y >= 0 && x < self.width && y < self.height
    }

    fn index(&self, (x, y): (i64, i64)) -> usize {
        (y * self.width + x) as usize
    }

    fn get(&self, pos: (i64, i64)) -> Tile {
        if self.in_bounds(pos) {
            self.tiles[self.index(pos)]
        } else {
            Tile::Empty
        }
    }

    fn set(&mut self, pos: (i64, i64), tile: Tile) {
        if self.in_bounds(pos) {
            let i = self.index(pos);
            self.tiles[i] = tile;
        }
    }

    /// Carves an axis-aligned line (endpoints inclusive).
    fn carve_line(&mut self, from: (i64, i64), to: (i64, i64)) {
        let (mut x, mut y) = from;
        let step_x = (to.0 - from.0).signum();
        let step_y = (to.1 - from.1).signum();
        self.set((x, y), Tile::Path);
        while x != to.0 {
            x += step_x;
            self.set((x, y), Tile::Path);
        }
        while y != to.1 {
            y += step_y;
            self.set((x, y), Tile::Path);
        }
    }

    fn is_path(&self, pos: (i64, i64)) -> bool {
        self.get(pos) == Tile::Path
    }

    /// Path neighbours of `pos` that are not part of `block`.
    fn external_path_neighbors(&self, pos: (i64, i64), block: &[(i64, i64); 4]) -> Vec<(i64, i64)> {
        [(0, 1), (1, 0), (0, -1), (-1, 0)]
            .iter()
            .map(|(dx, dy)| (pos.0 + dx, pos.1 + dy))
            .filter(|n| !block.contains(n) && self.is_path(*n))
            .collect()
    }

    /// A tile with three external links, or two in a straight line, likely
    /// carries a corridor through the block.
    fn carries_corridor(&self, pos: (i64, i64), block: &[(i64, i64); 4]) -> bool {
        let links = self.external_path_neighbors(pos, block);
        match links.as_slice() {
            [a, b] => {
                let (ax, ay) = (a.0 - pos.0, a.1 - pos.1);
                let (bx, by) = (b.0 - pos.0, b.1 - pos.1);
                ax == -bx && ay == -by
            },
            l => l.len() >= 3,
        }
    }

    /// Removes one tile from every 2x2 block of path tiles.
    fn thin_double_wide(&mut self) {
        for _ in 0..MAX_THINNING_PASSES {
            let mut changed = false;
            for x in 0..self.width - 1 {
                for y in 0..self.height - 1 {
                    let block = [(x, y), (x + 1, y), (x, y + 1), (x + 1, y + 1)];
                    if !block.iter().all(|&p| self.is_path(p)) {
                        continue;
                    }
                    let mut ranked: Vec<((i64, i64), usize)> = block
                        .iter()
                        .map(|&p| (p, self.external_path_neighbors(p, &block).len()))
                        .collect();
                    ranked.sort_by_key(|&(_, links)| links);

                    let victim = ranked
                        .iter()
                        .find(|(p, _)| !self.carries_corridor(*p, &block))
                        .or_else(|| ranked.first())
                        .map(|&(p, _)| p);
                    if let Some(p) = victim {
                        self.set(p, Tile::Region);
                        changed = true;
                    }
                }
            }
            if !changed {
                break;
            }
        }
    }
}
