//! Ground-plane placement for a roster of figures

use std::f32::consts::TAU;

use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// How figures are arranged on the ground plane (y = 0)
///
/// Every generated arrangement is centred on the origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Layout {
    /// A single line along X
    Row { spacing: f32 },
    /// Rows of `columns` figures, filling towards -Z
    Grid { columns: usize, spacing: f32 },
    /// Evenly spaced around a circle, facing the centre
    Circle { radius: f32 },
    /// Uniformly random inside a square of side `extent`, reproducible from `seed`
    Scatter { extent: f32, seed: u64 },
    /// Fixed positions; personas beyond the list are not placed
    Explicit { positions: Vec<[f32; 3]> },
}

impl Default for Layout {
    fn default() -> Self {
        Layout::Grid {
            columns: 4,
            spacing: 1.5,
        }
    }
}

impl Layout {
    /// Positions for `count` figures
    ///
    /// `Explicit` ignores `count` and returns its own list.
    pub fn positions(&self, count: usize) -> Vec<[f32; 3]> {
        match self {
            Layout::Row { spacing } => {
                let offset = (count.saturating_sub(1)) as f32 * spacing * 0.5;
                (0..count)
                    .map(|i| [i as f32 * spacing - offset, 0.0, 0.0])
                    .collect()
            }
            Layout::Grid { columns, spacing } => {
                let columns = (*columns).max(1);
                let rows = count.div_ceil(columns);
                let used_columns = columns.min(count);
                let x_offset = (used_columns.saturating_sub(1)) as f32 * spacing * 0.5;
                let z_offset = (rows.saturating_sub(1)) as f32 * spacing * 0.5;

                (0..count)
                    .map(|i| {
                        let (row, col) = (i / columns, i % columns);
                        [
                            col as f32 * spacing - x_offset,
                            0.0,
                            z_offset - row as f32 * spacing,
                        ]
                    })
                    .collect()
            }
            Layout::Circle { radius } => {
                if count == 1 {
                    return vec![[0.0, 0.0, 0.0]];
                }
                (0..count)
                    .map(|i| {
                        let angle = i as f32 * TAU / count as f32;
                        [radius * angle.sin(), 0.0, radius * angle.cos()]
                    })
                    .collect()
            }
            Layout::Scatter { extent, seed } => {
                let mut rng = StdRng::seed_from_u64(*seed);
                let half = extent.abs() * 0.5;
                (0..count)
                    .map(|_| {
                        if half == 0.0 {
                            return [0.0, 0.0, 0.0];
                        }
                        [
                            rng.random_range(-half..half),
                            0.0,
                            rng.random_range(-half..half),
                        ]
                    })
                    .collect()
            }
            Layout::Explicit { positions } => positions.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_is_centred() {
        let positions = Layout::Row { spacing: 2.0 }.positions(3);
        assert_eq!(positions, vec![[-2.0, 0.0, 0.0], [0.0, 0.0, 0.0], [2.0, 0.0, 0.0]]);
        assert!(Layout::Row { spacing: 2.0 }.positions(0).is_empty());
    }

    #[test]
    fn test_grid_wraps_rows() {
        let positions = Layout::Grid {
            columns: 2,
            spacing: 1.0,
        }
        .positions(3);

        assert_eq!(positions.len(), 3);
        assert_eq!(positions[0], [-0.5, 0.0, 0.5]);
        assert_eq!(positions[1], [0.5, 0.0, 0.5]);
        assert_eq!(positions[2], [-0.5, 0.0, -0.5]);
    }

    #[test]
    fn test_circle_keeps_radius() {
        let positions = Layout::Circle { radius: 3.0 }.positions(5);
        assert_eq!(positions.len(), 5);
        for [x, y, z] in positions {
            assert_eq!(y, 0.0);
            assert!(((x * x + z * z).sqrt() - 3.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_scatter_is_reproducible() {
        let layout = Layout::Scatter {
            extent: 10.0,
            seed: 7,
        };
        let first = layout.positions(8);
        assert_eq!(first, layout.positions(8));
        assert!(first
            .iter()
            .all(|p| p[0].abs() <= 5.0 && p[2].abs() <= 5.0 && p[1] == 0.0));
    }

    #[test]
    fn test_explicit_ignores_count() {
        let layout = Layout::Explicit {
            positions: vec![[1.0, 0.0, 2.0]],
        };
        assert_eq!(layout.positions(4), vec![[1.0, 0.0, 2.0]]);
    }

    #[test]
    fn test_layout_deserializes_from_tagged_table() {
        let layout: Layout =
            serde_json::from_str(r#"{"kind": "circle", "radius": 4.0}"#).unwrap();
        assert_eq!(layout, Layout::Circle { radius: 4.0 });
    }
}
