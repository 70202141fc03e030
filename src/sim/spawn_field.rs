//! Procedural spawn field
//!
//! A grid of coherent-noise samples laid over the environment. Spawn points
//! are drawn by rejection sampling: pick a random cell, keep it if its value
//! is positive. Roughly half the cells qualify, so a couple of draws usually
//! suffice; the attempt count is capped anyway.

use glam::Vec2;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::{GRID_SIZE, MAX_SPAWN_ATTEMPTS, NOISE_SCALE};

/// One grid sample: environment-space anchor and scaled noise value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoiseCell {
    pub x: f32,
    pub y: f32,
    pub value: f32,
}

const GRADIENTS: [Vec2; 8] = [
    Vec2::new(1.0, 1.0),
    Vec2::new(-1.0, 1.0),
    Vec2::new(1.0, -1.0),
    Vec2::new(-1.0, -1.0),
    Vec2::new(1.0, 0.0),
    Vec2::new(-1.0, 0.0),
    Vec2::new(0.0, 1.0),
    Vec2::new(0.0, -1.0),
];

/// Seeded 2D gradient noise (classic Perlin). Output is in [-1, 1] and
/// exactly zero on integer lattice points.
#[derive(Debug, Clone)]
pub struct Perlin {
    perm: [u8; 512],
}

impl Perlin {
    pub fn new(seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut table: Vec<u8> = (0..=255).collect();
        table.shuffle(&mut rng);

        let mut perm = [0u8; 512];
        for (i, slot) in perm.iter_mut().enumerate() {
            *slot = table[i & 255];
        }
        Self { perm }
    }

    fn gradient(&self, xi: i32, yi: i32) -> Vec2 {
        let a = self.perm[(xi & 255) as usize] as usize;
        let h = self.perm[a + (yi & 255) as usize];
        GRADIENTS[(h & 7) as usize]
    }

    pub fn sample(&self, x: f32, y: f32) -> f32 {
        let x0 = x.floor();
        let y0 = y.floor();
        let (xi, yi) = (x0 as i32, y0 as i32);
        let (tx, ty) = (x - x0, y - y0);

        let n00 = self.gradient(xi, yi).dot(Vec2::new(tx, ty));
        let n10 = self.gradient(xi + 1, yi).dot(Vec2::new(tx - 1.0, ty));
        let n01 = self.gradient(xi, yi + 1).dot(Vec2::new(tx, ty - 1.0));
        let n11 = self.gradient(xi + 1, yi + 1).dot(Vec2::new(tx - 1.0, ty - 1.0));

        let u = fade(tx);
        let v = fade(ty);
        let a = lerp(n00, n10, u);
        let b = lerp(n01, n11, u);
        lerp(a, b, v).clamp(-1.0, 1.0)
    }
}

// quintic smoothstep
#[inline]
fn fade(t: f32) -> f32 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Noise grid covering the environment, indexed `[column][row]`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoiseField {
    cells: Vec<Vec<NoiseCell>>,
    grid_size: f32,
}

impl NoiseField {
    /// Sample noise at every `GRID_SIZE` step across `width` x `height`
    pub fn generate(seed: u64, width: f32, height: f32) -> Self {
        let noise = Perlin::new(seed);
        let cols = (width / GRID_SIZE).ceil().max(0.0) as usize;
        let rows = (height / GRID_SIZE).ceil().max(0.0) as usize;

        let cells = (0..cols)
            .map(|i| {
                let x = i as f32 * GRID_SIZE;
                (0..rows)
                    .map(|j| {
                        let y = j as f32 * GRID_SIZE;
                        NoiseCell {
                            x,
                            y,
                            value: noise.sample(x / NOISE_SCALE, y / NOISE_SCALE) * 100.0,
                        }
                    })
                    .collect()
            })
            .collect();

        log::debug!("Generated {}x{} spawn field (seed {})", cols, rows, seed);
        Self {
            cells,
            grid_size: GRID_SIZE,
        }
    }

    /// Build a field from explicit columns
    pub fn from_cells(cells: Vec<Vec<NoiseCell>>, grid_size: f32) -> Self {
        Self { cells, grid_size }
    }

    pub fn columns(&self) -> usize {
        self.cells.len()
    }

    pub fn rows(&self) -> usize {
        self.cells.first().map_or(0, Vec::len)
    }

    pub fn cell(&self, column: usize, row: usize) -> Option<&NoiseCell> {
        self.cells.get(column).and_then(|c| c.get(row))
    }

    pub fn cells(&self) -> impl Iterator<Item = &NoiseCell> {
        self.cells.iter().flatten()
    }

    /// Field value at an environment-local point.
    ///
    /// Coordinates past the far edge wrap around; negative coordinates are
    /// mirrored onto the grid (`|floor((p / grid) % len)|`).
    pub fn value_at(&self, local: Vec2) -> f32 {
        let (cols, rows) = (self.columns(), self.rows());
        if cols == 0 || rows == 0 {
            return 0.0;
        }
        let i = grid_index(local.x / self.grid_size, cols);
        let j = grid_index(local.y / self.grid_size, rows);
        self.cell(i, j).map_or(0.0, |c| c.value)
    }

    /// Rejection-sample a spawn point on a positive cell.
    ///
    /// After `MAX_SPAWN_ATTEMPTS` misses, falls back to the first positive
    /// cell in grid order, or the environment origin if there is none.
    pub fn pick_spawn_point(&self, rng: &mut impl Rng) -> Vec2 {
        let (cols, rows) = (self.columns(), self.rows());
        if cols > 0 && rows > 0 {
            for _ in 0..MAX_SPAWN_ATTEMPTS {
                let i = rng.random_range(0..cols);
                let j = rng.random_range(0..rows);
                if let Some(cell) = self.cell(i, j).filter(|c| c.value > 0.0) {
                    return Vec2::new(cell.x, cell.y);
                }
            }
        }

        match self.cells().find(|c| c.value > 0.0) {
            Some(cell) => {
                log::warn!("Spawn sampling exhausted, using first positive cell");
                Vec2::new(cell.x, cell.y)
            }
            None => {
                log::warn!("Spawn field has no positive cells, spawning at origin");
                Vec2::ZERO
            }
        }
    }
}

// Truncating remainder keeps the sign, so negative steps land mirrored.
// The floor of a value just above -len is -len, which wraps back to 0.
fn grid_index(steps: f32, len: usize) -> usize {
    let index = (steps % len as f32).floor().abs() as usize;
    index % len
}
