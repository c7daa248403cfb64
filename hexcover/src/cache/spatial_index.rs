//! Spatial bucket index for viewport lookups.
//!
//! Hexagon centers are bucketed on a fixed-size lat/lon degree grid. A
//! viewport query only inspects the buckets its bounds touch. The index is a
//! lookup aid: the cache entries remain the source of truth.
//!
//! # Thread Safety
//!
//! Buckets live in a `DashMap`, so readers never block each other. Writes
//! happen under the cache's entry lock.

use std::collections::{BTreeSet, HashMap, HashSet};

use dashmap::DashMap;

use crate::coord::{normalize_lon, GeoBounds, MAX_LAT, MAX_LON, MIN_LAT, MIN_LON};

/// Grid bucket key: `(lat_index, lon_index)`.
pub type BucketKey = (i32, i32);

/// One bucket of the spatial grid.
#[derive(Debug, Clone, PartialEq)]
pub struct SpatialCell {
    pub bounds: GeoBounds,
    /// Hexagon ids in this bucket, with the number of cache entries holding each
    pub hexagon_ids: HashMap<String, u32>,
}

/// Fixed-grid spatial index over hexagon centers.
#[derive(Debug)]
pub struct SpatialIndex {
    grid_size: f64,
    rows: i32,
    cols: i32,
    cells: DashMap<BucketKey, SpatialCell>,
}

impl SpatialIndex {
    /// Create an index with `grid_size`-degree buckets.
    pub fn new(grid_size: u32) -> Self {
        let grid_size = f64::from(grid_size.max(1));
        Self {
            grid_size,
            rows: (180.0 / grid_size).ceil() as i32,
            cols: (360.0 / grid_size).ceil() as i32,
            cells: DashMap::new(),
        }
    }

    /// Bucket containing a point.
    pub fn bucket_of(&self, lat: f64, lon: f64) -> BucketKey {
        let lat = lat.clamp(MIN_LAT, MAX_LAT);
        let col = if lon == MAX_LON {
            self.cols - 1
        } else {
            self.column_of(normalize_lon(lon))
        };
        let row = (((lat - MIN_LAT) / self.grid_size).floor() as i32).clamp(0, self.rows - 1);
        (row, col)
    }

    fn bucket_bounds(&self, (row, col): BucketKey) -> GeoBounds {
        let min_lat = MIN_LAT + f64::from(row) * self.grid_size;
        let min_lon = MIN_LON + f64::from(col) * self.grid_size;
        GeoBounds::new(
            min_lat,
            (min_lat + self.grid_size).min(MAX_LAT),
            min_lon,
            (min_lon + self.grid_size).min(180.0),
        )
    }

    /// Add a hexagon id at a center point, returning its bucket.
    ///
    /// Each call adds one reference; pair it with one [`remove`](Self::remove).
    pub fn insert(&self, id: &str, lat: f64, lon: f64) -> BucketKey {
        let key = self.bucket_of(lat, lon);
        let mut cell = self.cells.entry(key).or_insert_with(|| SpatialCell {
            bounds: self.bucket_bounds(key),
            hexagon_ids: HashMap::new(),
        });
        *cell.hexagon_ids.entry(id.to_string()).or_insert(0) += 1;
        key
    }

    /// Drop one reference to a hexagon id, removing empty buckets.
    pub fn remove(&self, id: &str, key: BucketKey) {
        let empty = match self.cells.get_mut(&key) {
            Some(mut cell) => {
                if let Some(count) = cell.hexagon_ids.get_mut(id) {
                    *count = count.saturating_sub(1);
                    if *count == 0 {
                        cell.hexagon_ids.remove(id);
                    }
                }
                cell.hexagon_ids.is_empty()
            }
            None => false,
        };
        if empty {
            self.cells.remove_if(&key, |_, cell| cell.hexagon_ids.is_empty());
        }
    }

    /// Ids of all hexagons in buckets touching the bounds.
    pub fn candidates(&self, bounds: &GeoBounds) -> HashSet<String> {
        let min_row = self.bucket_of(bounds.min_lat, MIN_LON).0;
        let max_row = self.bucket_of(bounds.max_lat, MIN_LON).0;

        let mut cols = BTreeSet::new();
        for (min_lon, max_lon) in bounds.lon_ranges() {
            cols.extend(self.column_of(min_lon)..=self.column_of(max_lon));
            // -180 and +180 are the same meridian
            if min_lon <= MIN_LON {
                cols.insert(self.cols - 1);
            }
            if max_lon >= MAX_LON {
                cols.insert(0);
            }
        }

        let mut ids = HashSet::new();
        for row in min_row..=max_row {
            for &col in &cols {
                match self.cells.get(&(row, col)) {
                    Some(cell) if cell.bounds.intersects(bounds) => {
                        ids.extend(cell.hexagon_ids.keys().cloned());
                    }
                    _ => {}
                }
            }
        }
        ids
    }

    fn column_of(&self, lon: f64) -> i32 {
        // +180 is the last column, not the first
        if lon >= MAX_LON {
            return self.cols - 1;
        }
        (((lon - MIN_LON) / self.grid_size).floor() as i32).clamp(0, self.cols - 1)
    }

    /// Number of non-empty buckets.
    pub fn bucket_count(&self) -> usize {
        self.cells.len()
    }

    /// Number of distinct (bucket, id) pairs.
    pub fn id_count(&self) -> usize {
        self.cells.iter().map(|c| c.hexagon_ids.len()).sum()
    }

    pub fn clear(&self) {
        self.cells.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_of_edges() {
        let index = SpatialIndex::new(10);
        assert_eq!(index.bucket_of(-90.0, -180.0), (0, 0));
        assert_eq!(index.bucket_of(90.0, 179.9), (17, 35));
        assert_eq!(index.bucket_of(0.0, 0.0), (9, 18));
        // +180 stays in the last column
        assert_eq!(index.bucket_of(0.0, 180.0), (9, 35));
        assert_eq!(index.bucket_of(0.0, -180.0), (9, 0));
    }

    #[test]
    fn test_insert_and_candidates() {
        let index = SpatialIndex::new(10);
        index.insert("a", 45.0, 5.0);
        index.insert("b", -30.0, 150.0);

        let europe = GeoBounds::new(40.0, 50.0, 0.0, 10.0);
        let found = index.candidates(&europe);
        assert!(found.contains("a"));
        assert!(!found.contains("b"));
    }

    #[test]
    fn test_bucket_bounds_recorded() {
        let index = SpatialIndex::new(10);
        let key = index.insert("a", 45.0, 5.0);
        let cell = index.cells.get(&key).unwrap();
        assert_eq!(cell.bounds, GeoBounds::new(40.0, 50.0, 0.0, 10.0));
    }

    #[test]
    fn test_insert_same_id_is_single_entry() {
        let index = SpatialIndex::new(10);
        let key = index.insert("a", 45.0, 5.0);
        index.insert("a", 45.0, 5.0);
        assert_eq!(index.id_count(), 1);

        // Two references, so one removal keeps it
        index.remove("a", key);
        assert_eq!(index.id_count(), 1);
        index.remove("a", key);
        assert_eq!(index.id_count(), 0);
        assert_eq!(index.bucket_count(), 0);
    }

    #[test]
    fn test_candidates_across_antimeridian() {
        let index = SpatialIndex::new(10);
        index.insert("west", 0.0, -175.0);
        index.insert("east", 0.0, 175.0);
        index.insert("far", 0.0, 0.0);

        let bounds = GeoBounds::new(-5.0, 5.0, 170.0, -170.0);
        let found = index.candidates(&bounds);
        assert!(found.contains("west"));
        assert!(found.contains("east"));
        assert!(!found.contains("far"));
    }

    #[test]
    fn test_candidates_at_antimeridian_edge() {
        let index = SpatialIndex::new(10);
        index.insert("east_edge", 5.0, 180.0);
        index.insert("west_edge", 5.0, -180.0);

        let east = GeoBounds::new(0.0, 10.0, 170.0, 180.0);
        let found = index.candidates(&east);
        assert!(found.contains("east_edge"));
        assert!(found.contains("west_edge"));

        let west = GeoBounds::new(0.0, 10.0, -180.0, -170.0);
        let found = index.candidates(&west);
        assert!(found.contains("east_edge"));
        assert!(found.contains("west_edge"));
    }

    #[test]
    fn test_clear() {
        let index = SpatialIndex::new(5);
        index.insert("a", 1.0, 1.0);
        index.clear();
        assert_eq!(index.bucket_count(), 0);
    }
}
