//! Grid point generation per cross-section model.
//!
//! Point counts are fixed per model, so generation is statically bounded:
//!
//! - Rect: 5x6 lattice over the full section (edges + interior), 30 points
//! - Circle: 16 circumference points plus the center, 17 points
//! - Triangle: 4 points per edge, vertices counted once, 12 points
//! - Pentagon: 3 points per edge, 15 points
//! - Hexagon: 3 points per edge, 18 points

use super::{GridPoint, SectionModel};

/// Lattice size for the rectangular model
const RECT_COLS: usize = 5;
const RECT_ROWS: usize = 6;

/// Circumference subdivisions for the circular model
const CIRCLE_POINTS: usize = 16;

/// Generate the ordered candidate attachment points for a cross-section.
///
/// Pure and deterministic: the same `(model, width, height)` triple always
/// yields the same ordered ids. Stored bar placements reference these ids by
/// position, so the order here must never change.
pub fn grid_points(model: SectionModel, width_cm: f64, height_cm: f64) -> Vec<GridPoint> {
    let coordinates = match model {
        SectionModel::Rect => rect_lattice(width_cm, height_cm),
        SectionModel::Circle => circle_ring(width_cm, height_cm),
        SectionModel::Triangle => edge_walk(&model.polygon_vertices(width_cm, height_cm), 4),
        SectionModel::Pentagon | SectionModel::Hexagon => {
            edge_walk(&model.polygon_vertices(width_cm, height_cm), 3)
        }
    };

    coordinates
        .into_iter()
        .enumerate()
        .map(|(id, (x, y))| GridPoint { id: id as u32, x, y })
        .collect()
}

/// Dense row-major lattice covering the whole rectangle, edges included.
/// Interior rows allow second-layer and distributed bars, not just
/// perimeter placement.
fn rect_lattice(width_cm: f64, height_cm: f64) -> Vec<(f64, f64)> {
    let mut points = Vec::with_capacity(RECT_COLS * RECT_ROWS);
    for row in 0..RECT_ROWS {
        for col in 0..RECT_COLS {
            let x = width_cm * col as f64 / (RECT_COLS - 1) as f64;
            let y = height_cm * row as f64 / (RECT_ROWS - 1) as f64;
            points.push((x, y));
        }
    }
    points
}

/// Evenly spaced circumference points starting at the top of the circle,
/// walking clockwise in screen coordinates, then the center last.
fn circle_ring(width_cm: f64, height_cm: f64) -> Vec<(f64, f64)> {
    let radius = width_cm / 2.0;
    let (cx, cy) = (width_cm / 2.0, height_cm / 2.0);

    let mut points = Vec::with_capacity(CIRCLE_POINTS + 1);
    for i in 0..CIRCLE_POINTS {
        let angle = -std::f64::consts::FRAC_PI_2
            + std::f64::consts::TAU * i as f64 / CIRCLE_POINTS as f64;
        points.push((cx + radius * angle.cos(), cy + radius * angle.sin()));
    }
    points.push((cx, cy));
    points
}

/// Walk the polygon outline placing `per_edge` points on each edge at
/// t = 0, 1/per_edge, ... - each vertex lands exactly once, as t = 0 of
/// the edge it starts.
fn edge_walk(vertices: &[(f64, f64)], per_edge: usize) -> Vec<(f64, f64)> {
    let n = vertices.len();
    let mut points = Vec::with_capacity(n * per_edge);
    for i in 0..n {
        let (x0, y0) = vertices[i];
        let (x1, y1) = vertices[(i + 1) % n];
        for step in 0..per_edge {
            let t = step as f64 / per_edge as f64;
            points.push((x0 + (x1 - x0) * t, y0 + (y1 - y0) * t));
        }
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_counts() {
        assert_eq!(grid_points(SectionModel::Rect, 20.0, 40.0).len(), 30);
        assert_eq!(grid_points(SectionModel::Circle, 30.0, 30.0).len(), 17);
        assert_eq!(grid_points(SectionModel::Triangle, 30.0, 40.0).len(), 12);
        assert_eq!(grid_points(SectionModel::Pentagon, 30.0, 30.0).len(), 15);
        assert_eq!(grid_points(SectionModel::Hexagon, 30.0, 30.0).len(), 18);
    }

    #[test]
    fn test_ids_are_sequential() {
        let points = grid_points(SectionModel::Rect, 20.0, 40.0);
        for (i, p) in points.iter().enumerate() {
            assert_eq!(p.id, i as u32);
        }
    }

    #[test]
    fn test_deterministic() {
        for model in SectionModel::ALL {
            let a = grid_points(model, 25.0, 55.0);
            let b = grid_points(model, 25.0, 55.0);
            assert_eq!(a, b, "{} grid must be deterministic", model);
        }
    }

    #[test]
    fn test_rect_lattice_covers_corners() {
        let points = grid_points(SectionModel::Rect, 20.0, 40.0);
        // Row-major: first point top-left, last lattice point bottom-right
        assert_eq!((points[0].x, points[0].y), (0.0, 0.0));
        let last = points.last().unwrap();
        assert_eq!((last.x, last.y), (20.0, 40.0));
    }

    #[test]
    fn test_circle_center_is_last() {
        let points = grid_points(SectionModel::Circle, 30.0, 30.0);
        let center = points.last().unwrap();
        assert_eq!((center.x, center.y), (15.0, 15.0));
        // First circumference point sits at the top of the circle
        assert!((points[0].x - 15.0).abs() < 1e-9);
        assert!(points[0].y.abs() < 1e-9);
    }

    #[test]
    fn test_triangle_has_no_interior_points() {
        let width = 30.0;
        let height = 40.0;
        let points = grid_points(SectionModel::Triangle, width, height);
        // Every point must sit on one of the three edges
        let vertices = [(15.0, 0.0), (30.0, 40.0), (0.0, 40.0)];
        for p in &points {
            let on_edge = (0..3).any(|i| {
                let (x0, y0) = vertices[i];
                let (x1, y1) = vertices[(i + 1) % 3];
                let cross = (x1 - x0) * (p.y - y0) - (y1 - y0) * (p.x - x0);
                cross.abs() < 1e-6
            });
            assert!(on_edge, "point ({}, {}) is off the outline", p.x, p.y);
        }
    }
}
