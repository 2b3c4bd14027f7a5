//! Dense distance matrix.

use serde::{de, Deserialize, Deserializer, Serialize};

use crate::error::{Result, RoutingError};

/// Distance (km) marking an impassable edge.
///
/// Large enough that any path crossing it loses to every real path, small
/// enough that sums of a few hundred such edges stay finite.
pub const UNREACHABLE: f64 = 1.0e9;

/// A dense n×n distance matrix stored in row-major order.
///
/// Index 0 is the depot (the workplace); indices `1..n` are employees in
/// list order. Entries are non-negative and finite; impassable edges hold
/// [`UNREACHABLE`]. The matrix need not be symmetric.
///
/// # Examples
///
/// ```
/// use u_shuttle::distance::{DistanceMatrix, UNREACHABLE};
///
/// let dm = DistanceMatrix::from_rows(vec![
///     vec![0.0, 2.0, 5.0],
///     vec![2.0, 0.0, 3.0],
///     vec![5.0, 3.0, 0.0],
/// ])
/// .unwrap();
/// assert_eq!(dm.size(), 3);
/// assert_eq!(dm.get(1, 2), 3.0);
/// assert!(!dm.is_unreachable(0, 1));
///
/// let partial = DistanceMatrix::from_optional_rows(vec![
///     vec![Some(0.0), None],
///     vec![Some(4.0), Some(0.0)],
/// ])
/// .unwrap();
/// assert_eq!(partial.get(0, 1), UNREACHABLE);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistanceMatrix {
    data: Vec<f64>,
    size: usize,
}

/// Unchecked wire form; deserialization goes through [`DistanceMatrix::from_data`].
#[derive(Deserialize)]
struct RawMatrix {
    data: Vec<f64>,
    size: usize,
}

impl<'de> Deserialize<'de> for DistanceMatrix {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = RawMatrix::deserialize(deserializer)?;
        Self::from_data(raw.size, raw.data).map_err(de::Error::custom)
    }
}

impl DistanceMatrix {
    /// Creates a distance matrix of the given size, initialized to zero.
    pub fn new(size: usize) -> Self {
        Self {
            data: vec![0.0; size * size],
            size,
        }
    }

    /// Creates a distance matrix from an explicit n×n grid in row-major order.
    ///
    /// Infinite entries become [`UNREACHABLE`]. Fails on a length mismatch,
    /// NaN or negative entries, or a non-zero diagonal.
    pub fn from_data(size: usize, mut data: Vec<f64>) -> Result<Self> {
        if data.len() != size * size {
            return Err(RoutingError::invalid(format!(
                "matrix data has {} entries, expected {}",
                data.len(),
                size * size
            )));
        }
        for (idx, d) in data.iter_mut().enumerate() {
            let (row, col) = (idx / size, idx % size);
            *d = normalize(*d, row, col)?;
            if row == col && *d != 0.0 {
                return Err(RoutingError::invalid(format!(
                    "diagonal entry ({row}, {row}) is {d}, expected 0"
                )));
            }
        }
        Ok(Self { data, size })
    }

    /// Creates a distance matrix from square rows.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let size = rows.len();
        let mut data = Vec::with_capacity(size * size);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != size {
                return Err(RoutingError::invalid(format!(
                    "row {i} has {} entries, expected {size}",
                    row.len()
                )));
            }
            data.extend(row);
        }
        Self::from_data(size, data)
    }

    /// Creates a distance matrix from rows where a routing service could not
    /// resolve some pairs. Missing entries become [`UNREACHABLE`].
    pub fn from_optional_rows(rows: Vec<Vec<Option<f64>>>) -> Result<Self> {
        Self::from_rows(
            rows.into_iter()
                .map(|row| row.into_iter().map(|d| d.unwrap_or(UNREACHABLE)).collect())
                .collect(),
        )
    }

    /// Returns the distance from location `from` to location `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.size + to]
    }

    /// Sets the distance from location `from` to location `to`.
    ///
    /// Values are clamped into `[0, UNREACHABLE]`; NaN is stored as unreachable.
    pub fn set(&mut self, from: usize, to: usize, distance: f64) {
        let d = if distance.is_nan() {
            UNREACHABLE
        } else {
            distance.clamp(0.0, UNREACHABLE)
        };
        self.data[from * self.size + to] = d;
    }

    /// Number of locations in this matrix (depot included).
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of non-depot locations.
    pub fn num_employees(&self) -> usize {
        self.size.saturating_sub(1)
    }

    /// Returns `true` if the edge `from → to` is impassable.
    pub fn is_unreachable(&self, from: usize, to: usize) -> bool {
        self.get(from, to) >= UNREACHABLE
    }

    /// Projects the depot and the given global locations into a local matrix.
    ///
    /// Local index 0 is the depot and local index `i + 1` is `nodes[i]`, so a
    /// local route `r` maps back through `nodes[r - 1]`.
    ///
    /// # Panics
    ///
    /// Panics if any node is out of bounds.
    pub fn project(&self, nodes: &[usize]) -> DistanceMatrix {
        let size = nodes.len() + 1;
        let global = |local: usize| if local == 0 { 0 } else { nodes[local - 1] };
        let mut data = Vec::with_capacity(size * size);
        for i in 0..size {
            for j in 0..size {
                data.push(if i == j { 0.0 } else { self.get(global(i), global(j)) });
            }
        }
        DistanceMatrix { data, size }
    }
}

fn normalize(d: f64, row: usize, col: usize) -> Result<f64> {
    if d.is_nan() {
        return Err(RoutingError::invalid(format!("entry ({row}, {col}) is NaN")));
    }
    if d < 0.0 {
        return Err(RoutingError::invalid(format!(
            "entry ({row}, {col}) is negative ({d})"
        )));
    }
    Ok(d.min(UNREACHABLE))
}
