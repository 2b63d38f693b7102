//! Uniform chunk grid for broad-phase collision detection
//!
//! Based on Game Engine Architecture 3rd Edition, Section 13.3.2:
//! "Spatial partitioning schemes... allow us to quickly cull out pairs of
//! objects that cannot possibly be colliding."
//!
//! World space is cut into equal boxes ("chunks"). Every finite volume lives
//! in exactly one chunk, picked from its position; candidate pairs only come
//! from a chunk and its neighbours. Chunks exist only while occupied.

use std::collections::{BTreeMap, BTreeSet};

use crate::core::config::Neighborhood;
use crate::foundation::math::{utils, Vec3};
use crate::physics::{BodyHandle, PhysicsError};

/// Integer cell coordinate of a chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChunkKey {
    /// Cell index along x
    pub x: i64,
    /// Cell index along y
    pub y: i64,
    /// Cell index along z
    pub z: i64,
}

impl ChunkKey {
    /// Key from cell indices
    pub const fn new(x: i64, y: i64, z: i64) -> Self {
        Self { x, y, z }
    }

    /// Key of the chunk containing `position`
    pub fn from_position(position: Vec3, chunk_size: Vec3) -> Self {
        let [x, y, z] = utils::floor_div(position, chunk_size);
        Self { x, y, z }
    }

    /// World-space minimum corner: `floor(p / size) * size`
    pub fn origin(&self, chunk_size: Vec3) -> Vec3 {
        Vec3::new(
            self.x as f32 * chunk_size.x,
            self.y as f32 * chunk_size.y,
            self.z as f32 * chunk_size.z,
        )
    }

    /// Neighbouring key, or `None` past the edge of the key range
    pub fn offset(&self, delta: [i32; 3]) -> Option<Self> {
        Some(Self::new(
            self.x.checked_add(i64::from(delta[0]))?,
            self.y.checked_add(i64::from(delta[1]))?,
            self.z.checked_add(i64::from(delta[2]))?,
        ))
    }
}

/// Uniform grid of chunks holding body handles
#[derive(Debug, Clone)]
pub struct ChunkGrid {
    chunk_size: Vec3,
    neighborhood: Neighborhood,
    offsets: Vec<[i32; 3]>,
    chunks: BTreeMap<ChunkKey, Vec<BodyHandle>>,
    locations: BTreeMap<BodyHandle, ChunkKey>,
}

impl ChunkGrid {
    /// Create an empty grid
    ///
    /// Every chunk dimension must be positive and finite.
    pub fn new(chunk_size: Vec3, neighborhood: Neighborhood) -> Result<Self, PhysicsError> {
        if !chunk_size.iter().all(|c| c.is_finite() && *c > 0.0) {
            return Err(PhysicsError::InvalidChunkSize(chunk_size));
        }
        Ok(Self {
            chunk_size,
            neighborhood,
            offsets: neighborhood.offsets(),
            chunks: BTreeMap::new(),
            locations: BTreeMap::new(),
        })
    }

    /// Chunk dimensions
    pub fn chunk_size(&self) -> Vec3 {
        self.chunk_size
    }

    /// Neighbourhood used for pairing
    pub fn neighborhood(&self) -> Neighborhood {
        self.neighborhood
    }

    /// Key of the chunk containing `position`
    pub fn key_for(&self, position: Vec3) -> ChunkKey {
        ChunkKey::from_position(position, self.chunk_size)
    }

    /// World-space key of `position`: `floor(p / size) * size`
    pub fn chunk_origin(&self, position: Vec3) -> Vec3 {
        self.key_for(position).origin(self.chunk_size)
    }

    /// Half-open bounds `[min, max)` of a chunk
    pub fn bounds(&self, key: ChunkKey) -> (Vec3, Vec3) {
        let min = key.origin(self.chunk_size);
        (min, min + self.chunk_size)
    }

    /// Whether `position` lies inside the chunk `key`
    pub fn contains(&self, key: ChunkKey, position: Vec3) -> bool {
        self.key_for(position) == key
    }

    /// Place a handle in the chunk containing `position`
    ///
    /// A handle already in the grid is moved.
    pub fn assign(&mut self, handle: BodyHandle, position: Vec3) -> ChunkKey {
        self.remove(handle);
        let key = self.key_for(position);
        self.chunks.entry(key).or_default().push(handle);
        self.locations.insert(handle, key);
        key
    }

    /// Take a handle out of the grid, dropping its chunk if left empty
    pub fn remove(&mut self, handle: BodyHandle) -> bool {
        let Some(key) = self.locations.remove(&handle) else {
            return false;
        };
        if let Some(members) = self.chunks.get_mut(&key) {
            members.retain(|member| *member != handle);
            if members.is_empty() {
                self.chunks.remove(&key);
            }
        }
        true
    }

    /// Re-bucket every handle whose position left its chunk
    ///
    /// `position_of` reports each handle's current position; handles it has
    /// no position for are dropped. Returns how many handles changed chunk.
    pub fn update<F>(&mut self, mut position_of: F) -> usize
    where
        F: FnMut(BodyHandle) -> Option<Vec3>,
    {
        let mut orphans = Vec::new();
        let mut dropped = Vec::new();

        for (key, members) in &mut self.chunks {
            members.retain(|handle| match position_of(*handle) {
                Some(position) => {
                    let new_key = ChunkKey::from_position(position, self.chunk_size);
                    if new_key == *key {
                        true
                    } else {
                        orphans.push((*handle, new_key));
                        false
                    }
                }
                None => {
                    dropped.push(*handle);
                    false
                }
            });
        }

        self.chunks.retain(|_, members| !members.is_empty());

        for handle in dropped {
            self.locations.remove(&handle);
        }

        let moved = orphans.len();
        for (handle, key) in orphans {
            self.chunks.entry(key).or_default().push(handle);
            self.locations.insert(handle, key);
        }
        moved
    }

    /// Occupied chunks around `key`
    ///
    /// Absent chunks are omitted; none are created.
    pub fn neighbors(&self, key: ChunkKey, include_self: bool) -> Vec<ChunkKey> {
        let mut found = Vec::with_capacity(self.offsets.len() + 1);
        if include_self && self.chunks.contains_key(&key) {
            found.push(key);
        }
        found.extend(
            self.offsets
                .iter()
                .filter_map(|delta| key.offset(*delta))
                .filter(|neighbor| self.chunks.contains_key(neighbor)),
        );
        found
    }

    /// Chunk currently holding `handle`
    pub fn chunk_of(&self, handle: BodyHandle) -> Option<ChunkKey> {
        self.locations.get(&handle).copied()
    }

    /// Handles in a chunk
    pub fn members(&self, key: ChunkKey) -> &[BodyHandle] {
        self.chunks.get(&key).map_or(&[][..], Vec::as_slice)
    }

    /// Occupied chunks in key order
    pub fn iter(&self) -> impl Iterator<Item = (ChunkKey, &[BodyHandle])> {
        self.chunks.iter().map(|(key, members)| (*key, members.as_slice()))
    }

    /// Every unordered pair of handles sharing a chunk neighbourhood
    ///
    /// Pairs are stored larger handle first and come out in sorted order.
    pub fn candidate_pairs(&self) -> BTreeSet<(BodyHandle, BodyHandle)> {
        let mut pairs = BTreeSet::new();
        for (key, members) in &self.chunks {
            for neighbor in self.neighbors(*key, true) {
                for a in members {
                    for b in self.members(neighbor) {
                        if a != b {
                            pairs.insert(if a > b { (*a, *b) } else { (*b, *a) });
                        }
                    }
                }
            }
        }
        pairs
    }

    /// Number of handles in the grid
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    /// Whether the grid holds no handles
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Number of occupied chunks
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }
}
