//! # Cross-Section Geometry
//!
//! Pure functions over the five supported cross-section models: perimeter
//! (stirrup cut length) and the deterministic grid of candidate bar
//! attachment points.
//!
//! ## Coordinate Convention
//!
//! All coordinates are centimeters in the cross-section's bounding box,
//! origin at the top-left corner, y growing downward (the convention of the
//! SVG placement view that consumes these points).
//!
//! ## Determinism
//!
//! Grid generation is a pure function of `(model, width, height)`: the same
//! triple always yields the same ordered point ids. Bar groups store point
//! ids, never coordinates, so this ordering is load-bearing - changing it
//! would silently re-seat every stored bar.
//!
//! ## Example
//!
//! ```rust
//! use takeoff_core::geometry::{SectionModel, grid_points};
//!
//! // 20x40 cm rectangular stirrup: 2*(20+40) + 10 cm hook allowance
//! assert_eq!(SectionModel::Rect.perimeter_cm(20.0, 40.0), 130.0);
//!
//! // 16 circumference points plus the center
//! assert_eq!(grid_points(SectionModel::Circle, 30.0, 30.0).len(), 17);
//! ```

mod grid;

pub use grid::grid_points;

use serde::{Deserialize, Serialize};

/// Extra length added to every stirrup perimeter for the closing hooks (cm)
pub const HOOK_ALLOWANCE_CM: f64 = 10.0;

/// Cross-section model of an element (and of its stirrups).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionModel {
    /// Rectangular section (the default)
    #[default]
    Rect,
    /// Circular section; width is the diameter
    Circle,
    /// Isosceles triangle, base = width, height = height
    Triangle,
    /// Pentagon with fixed fractional vertices in the bounding box
    Pentagon,
    /// Hexagon with fixed fractional vertices in the bounding box
    Hexagon,
}

impl SectionModel {
    /// All models for iteration
    pub const ALL: [SectionModel; 5] = [
        SectionModel::Rect,
        SectionModel::Circle,
        SectionModel::Triangle,
        SectionModel::Pentagon,
        SectionModel::Hexagon,
    ];

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            SectionModel::Rect => "Rectangular",
            SectionModel::Circle => "Circular",
            SectionModel::Triangle => "Triangular",
            SectionModel::Pentagon => "Pentagonal",
            SectionModel::Hexagon => "Hexagonal",
        }
    }

    /// Stirrup cut length (cm) for a `width x height` section of this model,
    /// including the fixed hook allowance.
    pub fn perimeter_cm(&self, width_cm: f64, height_cm: f64) -> f64 {
        let outline = match self {
            SectionModel::Rect => 2.0 * (width_cm + height_cm),
            SectionModel::Circle => std::f64::consts::PI * width_cm,
            SectionModel::Triangle => {
                // base + two equal legs of the isosceles outline
                width_cm + 2.0 * ((width_cm / 2.0).powi(2) + height_cm.powi(2)).sqrt()
            }
            SectionModel::Pentagon | SectionModel::Hexagon => {
                // The fractional vertices are not equidistant, so sum the
                // actual edge lengths instead of assuming a regular polygon.
                let vertices = self.polygon_vertices(width_cm, height_cm);
                polygon_outline_cm(&vertices)
            }
        };
        outline + HOOK_ALLOWANCE_CM
    }

    /// Vertex coordinates for the polygonal models, scaled to the bounding
    /// box. Empty for rect/circle (those grids are not edge-walks).
    pub(crate) fn polygon_vertices(&self, width_cm: f64, height_cm: f64) -> Vec<(f64, f64)> {
        let fractions: &[(f64, f64)] = match self {
            SectionModel::Triangle => &[(0.5, 0.0), (1.0, 1.0), (0.0, 1.0)],
            SectionModel::Pentagon => {
                &[(0.5, 0.0), (1.0, 0.38), (0.81, 1.0), (0.19, 1.0), (0.0, 0.38)]
            }
            SectionModel::Hexagon => &[
                (0.25, 0.0),
                (0.75, 0.0),
                (1.0, 0.5),
                (0.75, 1.0),
                (0.25, 1.0),
                (0.0, 0.5),
            ],
            SectionModel::Rect | SectionModel::Circle => &[],
        };
        fractions
            .iter()
            .map(|&(fx, fy)| (fx * width_cm, fy * height_cm))
            .collect()
    }
}

impl std::fmt::Display for SectionModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

fn polygon_outline_cm(vertices: &[(f64, f64)]) -> f64 {
    let n = vertices.len();
    (0..n)
        .map(|i| {
            let (x0, y0) = vertices[i];
            let (x1, y1) = vertices[(i + 1) % n];
            ((x1 - x0).powi(2) + (y1 - y0).powi(2)).sqrt()
        })
        .sum()
}

/// One candidate bar attachment point on a cross-section.
///
/// `id` is the point's index in the fixed generation order for its
/// `(model, width, height)` triple; bar groups reference only this id.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridPoint {
    /// Stable index in the generation order
    pub id: u32,
    /// x coordinate (cm, from the section's left edge)
    pub x: f64,
    /// y coordinate (cm, from the section's top edge, growing downward)
    pub y: f64,
}
