// Time-to-template mapping.
//
// Each user sample is given the spiral point the user "should" have reached at that
// moment, assuming the whole spiral is traced at constant angular speed over the
// gesture's duration: `expected = (t / total_time) * template.total_angle()`.

use crate::recorder::Gesture;
use crate::template::Template;
use crate::types::{MappedSample, TemplatePoint};

/// Pair every sample of `gesture` with its template point.
///
/// Returns `None` when either input is empty. A gesture whose last sample is at
/// `t = 0` maps every sample onto the first template point.
pub fn map(gesture: &Gesture, template: &Template) -> Option<Vec<MappedSample>> {
    let points = template.points();
    let first = *points.first()?;
    if gesture.is_empty() {
        return None;
    }

    let total_time = gesture.total_time();
    let mapped = gesture
        .samples()
        .iter()
        .map(|&sample| {
            let template = if total_time > 0.0 {
                let expected = (sample.t / total_time) * template.total_angle();
                *nearest_by_angle(points, expected)
            } else {
                first
            };
            MappedSample { sample, template }
        })
        .collect();

    Some(mapped)
}

/// Point whose angle is closest to `expected`, earliest index on ties.
///
/// `points` must be non-empty with non-decreasing angles. Binary search over the
/// angles, then pick between the last point below and the first at-or-above.
fn nearest_by_angle(points: &[TemplatePoint], expected: f64) -> &TemplatePoint {
    let upper = points.partition_point(|p| p.angle < expected);
    if upper == 0 {
        return &points[0];
    }

    // earliest point sharing the angle just below `expected`
    let below_angle = points[upper - 1].angle;
    let lower = points.partition_point(|p| p.angle < below_angle);
    if upper == points.len() {
        return &points[lower];
    }

    let below = expected - points[lower].angle;
    let above = points[upper].angle - expected;
    if below <= above { &points[lower] } else { &points[upper] }
}
