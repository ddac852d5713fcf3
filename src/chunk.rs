//! Lazily generated, evictable cache of fixed-size terrain chunks.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::terrain::{TerrainGenerator, Tile};

pub const CHUNK_SIZE: i32 = 16;
const TILES_PER_CHUNK: usize = (CHUNK_SIZE * CHUNK_SIZE) as usize;

/// Hard cap on the width of a single window query, in tiles.
pub const MAX_WINDOW_WIDTH: u32 = 40;
/// Hard cap on the height of a single window query, in tiles.
pub const MAX_WINDOW_HEIGHT: u32 = 30;
/// Hard cap on the chunk radius of a single `visible_chunks` query.
pub const MAX_VISIBLE_RANGE: u32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkCoord {
    pub x: i32,
    pub y: i32,
}

impl ChunkCoord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Chunk holding the world tile. Floors toward negative infinity, so
    /// `-1` lands in chunk `-1` rather than `0`.
    pub const fn containing(world_x: i32, world_y: i32) -> Self {
        Self {
            x: world_x.div_euclid(CHUNK_SIZE),
            y: world_y.div_euclid(CHUNK_SIZE),
        }
    }

    /// Position of a world tile inside its chunk, each axis in `0..CHUNK_SIZE`.
    pub const fn local(world_x: i32, world_y: i32) -> (usize, usize) {
        (
            world_x.rem_euclid(CHUNK_SIZE) as usize,
            world_y.rem_euclid(CHUNK_SIZE) as usize,
        )
    }

    pub fn origin(self) -> (i32, i32) {
        (self.x * CHUNK_SIZE, self.y * CHUNK_SIZE)
    }

    pub fn chebyshev_distance(self, other: ChunkCoord) -> u64 {
        let dx = (self.x as i64 - other.x as i64).unsigned_abs();
        let dy = (self.y as i64 - other.y as i64).unsigned_abs();
        dx.max(dy)
    }
}

#[derive(Debug, Clone)]
pub struct Chunk {
    coord: ChunkCoord,
    tiles: Vec<Tile>,
}

impl Chunk {
    fn generate(coord: ChunkCoord, generator: &TerrainGenerator) -> Self {
        let (origin_x, origin_y) = coord.origin();
        let mut tiles = Vec::with_capacity(TILES_PER_CHUNK);
        for local_y in 0..CHUNK_SIZE {
            for local_x in 0..CHUNK_SIZE {
                tiles.push(generator.generate(origin_x + local_x, origin_y + local_y));
            }
        }
        Self { coord, tiles }
    }

    pub fn coord(&self) -> ChunkCoord {
        self.coord
    }

    pub fn tile(&self, local_x: usize, local_y: usize) -> Option<&Tile> {
        if local_x >= CHUNK_SIZE as usize {
            return None;
        }
        self.tiles.get(local_y * CHUNK_SIZE as usize + local_x)
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }
}

/// A rectangular tile region anchored at its top-left world tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileWindow {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl TileWindow {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Same anchor, extent capped at [`MAX_WINDOW_WIDTH`] x [`MAX_WINDOW_HEIGHT`].
    pub fn clamped(self) -> Self {
        Self {
            width: self.width.min(MAX_WINDOW_WIDTH),
            height: self.height.min(MAX_WINDOW_HEIGHT),
            ..self
        }
    }

    /// Row-major world coordinates covered by the clamped window.
    pub fn coords(self) -> impl Iterator<Item = (i32, i32)> {
        let window = self.clamped();
        (0..window.height as i64).flat_map(move |dy| {
            (0..window.width as i64).filter_map(move |dx| {
                let x = i32::try_from(window.x as i64 + dx).ok()?;
                let y = i32::try_from(window.y as i64 + dy).ok()?;
                Some((x, y))
            })
        })
    }
}

pub struct ChunkStore {
    generator: TerrainGenerator,
    chunks: HashMap<ChunkCoord, Chunk>,
}

impl ChunkStore {
    pub fn new(seed: u64) -> Self {
        Self {
            generator: TerrainGenerator::new(seed),
            chunks: HashMap::new(),
        }
    }

    pub fn seed(&self) -> u64 {
        self.generator.seed()
    }

    pub fn loaded_chunks(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_loaded(&self, coord: ChunkCoord) -> bool {
        self.chunks.contains_key(&coord)
    }

    /// Returns the cached chunk, generating every tile in it on first access.
    pub fn chunk(&mut self, coord: ChunkCoord) -> &Chunk {
        let generator = &self.generator;
        self.chunks.entry(coord).or_insert_with(|| {
            debug!(chunk_x = coord.x, chunk_y = coord.y, "generating chunk");
            Chunk::generate(coord, generator)
        })
    }

    /// Never fails: if the chunk cannot produce the tile, a default Plains
    /// tile is returned instead.
    pub fn tile(&mut self, world_x: i32, world_y: i32) -> Tile {
        let coord = ChunkCoord::containing(world_x, world_y);
        let (local_x, local_y) = ChunkCoord::local(world_x, world_y);
        self.chunk(coord)
            .tile(local_x, local_y)
            .copied()
            .unwrap_or_default()
    }

    /// Tiles of the clamped window in row-major order.
    pub fn tiles_in_window(&mut self, window: TileWindow) -> Vec<(i32, i32, Tile)> {
        window
            .coords()
            .map(|(x, y)| (x, y, self.tile(x, y)))
            .collect()
    }

    /// Chunk coordinates in the square of radius `range` around `center`,
    /// row-major. `range` is capped at [`MAX_VISIBLE_RANGE`].
    pub fn visible_chunks(center: ChunkCoord, range: u32) -> Vec<ChunkCoord> {
        let range = i64::from(range.min(MAX_VISIBLE_RANGE));
        let side = (2 * range + 1) as usize;
        let mut visible = Vec::with_capacity(side * side);
        for dy in -range..=range {
            for dx in -range..=range {
                let x = i32::try_from(center.x as i64 + dx);
                let y = i32::try_from(center.y as i64 + dy);
                if let (Ok(x), Ok(y)) = (x, y) {
                    visible.push(ChunkCoord::new(x, y));
                }
            }
        }
        visible
    }

    /// Evicts every cached chunk whose Chebyshev distance from `center`
    /// exceeds `max_distance`. Returns how many were dropped.
    pub fn unload_distant(&mut self, center: ChunkCoord, max_distance: u32) -> usize {
        let before = self.chunks.len();
        let max_distance = u64::from(max_distance);
        self.chunks
            .retain(|coord, _| coord.chebyshev_distance(center) <= max_distance);
        let evicted = before - self.chunks.len();
        if evicted > 0 {
            debug!(
                evicted,
                remaining = self.chunks.len(),
                center_x = center.x,
                center_y = center.y,
                "unloaded distant chunks"
            );
        }
        evicted
    }

    /// Switches to a new world seed and drops every cached chunk.
    pub fn regenerate(&mut self, seed: u64) {
        info!(seed, dropped = self.chunks.len(), "regenerating world");
        self.generator = TerrainGenerator::new(seed);
        self.chunks.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_coordinates_floor() {
        assert_eq!(ChunkCoord::containing(-1, -1), ChunkCoord::new(-1, -1));
        assert_eq!(ChunkCoord::local(-1, -1), (15, 15));
        assert_eq!(ChunkCoord::containing(-16, 0), ChunkCoord::new(-1, 0));
        assert_eq!(ChunkCoord::local(-16, 0), (0, 0));
        assert_eq!(ChunkCoord::containing(-17, 15), ChunkCoord::new(-2, 0));
        assert_eq!(ChunkCoord::local(-17, 15), (15, 15));
        assert_eq!(ChunkCoord::containing(16, 31), ChunkCoord::new(1, 1));
    }

    #[test]
    fn chunk_is_generated_once() {
        let mut store = ChunkStore::new(5);
        let first = store.tile(3, 4);
        assert_eq!(store.loaded_chunks(), 1);
        let second = store.tile(3, 4);
        assert_eq!(store.loaded_chunks(), 1);
        assert_eq!(first, second);
        store.tile(15, 15);
        assert_eq!(store.loaded_chunks(), 1);
        store.tile(16, 15);
        assert_eq!(store.loaded_chunks(), 2);
    }

    #[test]
    fn chunk_tiles_match_direct_generation() {
        let mut store = ChunkStore::new(77);
        let generator = TerrainGenerator::new(77);
        let chunk = store.chunk(ChunkCoord::new(-2, 3)).clone();
        let (ox, oy) = chunk.coord().origin();
        for ly in 0..CHUNK_SIZE as usize {
            for lx in 0..CHUNK_SIZE as usize {
                let expected = generator.generate(ox + lx as i32, oy + ly as i32);
                assert_eq!(chunk.tile(lx, ly), Some(&expected));
            }
        }
        assert_eq!(chunk.tile(CHUNK_SIZE as usize, 0), None);
    }

    #[test]
    fn unload_uses_chebyshev_distance() {
        let mut store = ChunkStore::new(1);
        for coord in [
            ChunkCoord::new(0, 0),
            ChunkCoord::new(2, 2),
            ChunkCoord::new(-2, 1),
            ChunkCoord::new(3, 0),
            ChunkCoord::new(0, -4),
        ] {
            store.chunk(coord);
        }
        let evicted = store.unload_distant(ChunkCoord::new(0, 0), 2);
        assert_eq!(evicted, 2);
        assert!(store.is_loaded(ChunkCoord::new(2, 2)));
        assert!(store.is_loaded(ChunkCoord::new(-2, 1)));
        assert!(!store.is_loaded(ChunkCoord::new(3, 0)));
        assert!(!store.is_loaded(ChunkCoord::new(0, -4)));
    }

    #[test]
    fn window_is_capped() {
        let window = TileWindow::new(-10, -10, 500, 500);
        assert_eq!(window.coords().count(), (MAX_WINDOW_WIDTH * MAX_WINDOW_HEIGHT) as usize);
        let mut store = ChunkStore::new(3);
        let tiles = store.tiles_in_window(TileWindow::new(0, 0, 3, 2));
        let coords: Vec<_> = tiles.iter().map(|(x, y, _)| (*x, *y)).collect();
        assert_eq!(coords, vec![(0, 0), (1, 0), (2, 0), (0, 1), (1, 1), (2, 1)]);
    }

    #[test]
    fn visible_chunks_cover_square() {
        let visible = ChunkStore::visible_chunks(ChunkCoord::new(4, -1), 2);
        assert_eq!(visible.len(), 25);
        assert_eq!(visible.first(), Some(&ChunkCoord::new(2, -3)));
        assert_eq!(visible.last(), Some(&ChunkCoord::new(6, 1)));
    }

    #[test]
    fn visible_range_is_capped() {
        let side = (2 * MAX_VISIBLE_RANGE + 1) as usize;
        let visible = ChunkStore::visible_chunks(ChunkCoord::new(0, 0), u32::MAX);
        assert_eq!(visible.len(), side * side);
        let edge = MAX_VISIBLE_RANGE as i32;
        assert_eq!(visible.first(), Some(&ChunkCoord::new(-edge, -edge)));

        let near_limit = ChunkStore::visible_chunks(ChunkCoord::new(i32::MAX, i32::MIN), 50);
        assert!(near_limit.len() < side * side);
        assert!(near_limit.contains(&ChunkCoord::new(i32::MAX, i32::MIN)));
    }

    #[test]
    fn regenerate_drops_cache() {
        let mut store = ChunkStore::new(10);
        store.tile(0, 0);
        store.regenerate(11);
        assert_eq!(store.loaded_chunks(), 0);
        assert_eq!(store.seed(), 11);
        assert_eq!(store.tile(0, 0), TerrainGenerator::new(11).generate(0, 0));
    }
}
