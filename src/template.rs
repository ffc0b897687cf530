// Reference spiral for follow mode.
// Visual: a light gray Archimedean spiral centered on the canvas; the user traces it
// from the center outward.

use crate::types::TemplatePoint;
use std::f64::consts::TAU;

/// Shape of the reference spiral.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpiralParams {
    pub center_x: f64,
    pub center_y: f64,
    pub max_radius: f64,
    pub loops: u32,
    pub points_per_loop: u32,
}

impl SpiralParams {
    /// Center the spiral on a `width x height` surface, leaving `margin` pixels
    /// between the outer loop and the closest edge.
    pub fn fitted(width: f64, height: f64, margin: f64, loops: u32, points_per_loop: u32) -> Self {
        let center_x = width / 2.0;
        let center_y = height / 2.0;
        let max_radius = (center_x.min(center_y) - margin).max(0.0);
        Self { center_x, center_y, max_radius, loops, points_per_loop }
    }
}

/// Ordered spiral samples, angle non-decreasing from the first point to the last.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Template {
    points: Vec<TemplatePoint>,
    total_angle: f64,
}

impl Template {
    pub fn empty() -> Self { Self::default() }

    pub fn points(&self) -> &[TemplatePoint] { &self.points }
    pub fn len(&self) -> usize { self.points.len() }
    pub fn is_empty(&self) -> bool { self.points.is_empty() }
    pub fn first(&self) -> Option<&TemplatePoint> { self.points.first() }

    /// Angle swept by the whole spiral (`loops * 2π`); 0 for the degenerate spiral.
    pub fn total_angle(&self) -> f64 { self.total_angle }
}

/// Sample an Archimedean spiral `r = b * θ` with `b = max_radius / (loops * 2π)`.
///
/// Produces `loops * points_per_loop + 1` points at `θ_i = (i / points_per_loop) * 2π`.
/// With zero loops (or zero points per loop) the spiral collapses to its center.
pub fn generate(params: &SpiralParams) -> Template {
    let SpiralParams { center_x, center_y, max_radius, loops, points_per_loop } = *params;

    if loops == 0 || points_per_loop == 0 {
        return Template {
            points: vec![TemplatePoint { x: center_x, y: center_y, angle: 0.0 }],
            total_angle: 0.0,
        };
    }

    let total_angle = loops as f64 * TAU;
    let b = max_radius / total_angle;
    let total_points = loops as usize * points_per_loop as usize;

    let points = (0..=total_points)
        .map(|i| {
            let angle = (i as f64 / points_per_loop as f64) * TAU;
            let radius = b * angle;
            TemplatePoint {
                x: center_x + radius * angle.cos(),
                y: center_y + radius * angle.sin(),
                angle,
            }
        })
        .collect();

    Template { points, total_angle }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_params() -> SpiralParams {
        SpiralParams { center_x: 100.0, center_y: 100.0, max_radius: 80.0, loops: 3, points_per_loop: 100 }
    }

    #[test]
    fn test_point_count() {
        let template = generate(&default_params());
        assert_eq!(template.len(), 3 * 100 + 1);
    }

    #[test]
    fn test_angles_non_decreasing_and_span_full_range() {
        let template = generate(&default_params());
        let points = template.points();
        assert!(points.windows(2).all(|w| w[0].angle <= w[1].angle));
        assert_eq!(points[0].angle, 0.0);
        assert_eq!(points[points.len() - 1].angle, 3.0 * TAU);
        assert_eq!(template.total_angle(), 3.0 * TAU);
    }

    #[test]
    fn test_starts_at_center_and_ends_at_max_radius() {
        let template = generate(&default_params());
        let first = template.first().unwrap();
        assert_eq!((first.x, first.y), (100.0, 100.0));

        let last = template.points().last().unwrap();
        let r = ((last.x - 100.0).powi(2) + (last.y - 100.0).powi(2)).sqrt();
        assert!((r - 80.0).abs() < 1e-9, "outer radius was {r}");
    }

    #[test]
    fn test_zero_loops_is_single_center_point() {
        let params = SpiralParams { loops: 0, ..default_params() };
        let template = generate(&params);
        assert_eq!(template.points(), &[TemplatePoint { x: 100.0, y: 100.0, angle: 0.0 }]);
        assert_eq!(template.total_angle(), 0.0);
    }

    #[test]
    fn test_fitted_spiral_stays_inside_surface() {
        let params = SpiralParams::fitted(600.0, 400.0, 15.0, 3, 100);
        assert_eq!(params.max_radius, 185.0);
        let template = generate(&params);
        for p in template.points() {
            assert!(p.x >= 15.0 - 1e-9 && p.x <= 585.0 + 1e-9);
            assert!(p.y >= 15.0 - 1e-9 && p.y <= 385.0 + 1e-9);
        }
    }
}
