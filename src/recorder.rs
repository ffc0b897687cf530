// Gesture capture: turns pointer down/move/up into a timestamped sample list.
// Visual: every accepted move extends the blue stroke by one segment; nothing is redrawn.

use crate::draw::Surface;
use crate::types::{Point, Sample, StrokeStyle};
use log::debug;

/// One pointer-down-to-pointer-up recording.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Gesture {
    samples: Vec<Sample>,
}

impl Gesture {
    /// Build a gesture from already-recorded samples (e.g. loaded from a file).
    pub fn from_samples(samples: Vec<Sample>) -> Self {
        Self { samples }
    }

    pub fn samples(&self) -> &[Sample] { &self.samples }
    pub fn len(&self) -> usize { self.samples.len() }
    pub fn is_empty(&self) -> bool { self.samples.is_empty() }
    pub fn first(&self) -> Option<&Sample> { self.samples.first() }
    pub fn last(&self) -> Option<&Sample> { self.samples.last() }

    /// Elapsed time of the final sample, 0 for an empty gesture.
    pub fn total_time(&self) -> f64 {
        self.samples.last().map_or(0.0, |s| s.t)
    }
}

pub struct GestureRecorder {
    width: f64,
    height: f64,
    style: StrokeStyle,
    gesture: Gesture,
    start_clock: f64,
    live: bool,
}

impl GestureRecorder {
    pub fn new(width: f64, height: f64, style: StrokeStyle) -> Self {
        Self { width, height, style, gesture: Gesture::default(), start_clock: 0.0, live: false }
    }

    pub fn gesture(&self) -> &Gesture { &self.gesture }
    pub fn is_live(&self) -> bool { self.live }

    fn clamp(&self, p: Point) -> Point {
        Point::new(p.x.clamp(0.0, self.width), p.y.clamp(0.0, self.height))
    }

    /// Start a new gesture at `origin`; the previous recording is discarded.
    /// `clock_now` is any millisecond clock, later samples are timed against it.
    pub fn begin<S: Surface + ?Sized>(&mut self, origin: Point, clock_now: f64, surface: &mut S) {
        let origin = self.clamp(origin);
        self.gesture.samples.clear();
        self.gesture.samples.push(Sample::new(origin.x, origin.y, 0.0));
        self.start_clock = clock_now;
        self.live = true;
        surface.begin_path(origin, self.style);
        debug!("Drawing started at ({:.2}, {:.2}).", origin.x, origin.y);
    }

    /// Record one more pointer position. Ignored when no gesture is open.
    pub fn append<S: Surface + ?Sized>(&mut self, point: Point, clock_now: f64, surface: &mut S) {
        if !self.live { return; }
        let Some(prev) = self.gesture.last().copied() else { return; };

        let point = self.clamp(point);
        // a clock that steps backwards must not produce decreasing times
        let t = (clock_now - self.start_clock).max(prev.t);
        self.gesture.samples.push(Sample::new(point.x, point.y, t));
        surface.draw_segment(prev.point(), point, self.style);
    }

    /// Close the gesture. Safe to call repeatedly or with nothing open.
    pub fn end(&mut self) -> &Gesture {
        if self.live {
            self.live = false;
            debug!("Drawing stopped. Recorded {} points.", self.gesture.len());
        }
        &self.gesture
    }

    /// Drop the recording and any gesture in progress.
    pub fn reset(&mut self) {
        self.gesture.samples.clear();
        self.live = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingSurface {
        paths: Vec<Point>,
        segments: Vec<(Point, Point)>,
        clears: usize,
    }

    impl Surface for RecordingSurface {
        fn clear_surface(&mut self) { self.clears += 1; }
        fn begin_path(&mut self, origin: Point, _style: StrokeStyle) { self.paths.push(origin); }
        fn draw_segment(&mut self, from: Point, to: Point, _style: StrokeStyle) {
            self.segments.push((from, to));
        }
    }

    fn recorder() -> GestureRecorder {
        GestureRecorder::new(200.0, 100.0, StrokeStyle { color: 0x0000FF, width: 2.0 })
    }

    #[test]
    fn test_first_sample_is_time_zero() {
        let mut rec = recorder();
        let mut surface = RecordingSurface::default();
        rec.begin(Point::new(10.0, 20.0), 5_000.0, &mut surface);
        rec.append(Point::new(11.0, 21.0), 5_016.5, &mut surface);

        let g = rec.end();
        assert_eq!(g.samples()[0], Sample::new(10.0, 20.0, 0.0));
        assert_eq!(g.samples()[1], Sample::new(11.0, 21.0, 16.5));
        assert_eq!(surface.paths, vec![Point::new(10.0, 20.0)]);
    }

    #[test]
    fn test_points_are_clamped_to_bounds() {
        let mut rec = recorder();
        let mut surface = RecordingSurface::default();
        rec.begin(Point::new(-5.0, 150.0), 0.0, &mut surface);
        rec.append(Point::new(250.0, -1.0), 10.0, &mut surface);

        let samples = rec.end().samples().to_vec();
        assert_eq!(samples[0].point(), Point::new(0.0, 100.0));
        assert_eq!(samples[1].point(), Point::new(200.0, 0.0));
        assert_eq!(surface.segments, vec![(Point::new(0.0, 100.0), Point::new(200.0, 0.0))]);
    }

    #[test]
    fn test_append_without_gesture_is_noop() {
        let mut rec = recorder();
        let mut surface = RecordingSurface::default();
        rec.append(Point::new(1.0, 1.0), 1.0, &mut surface);
        assert!(rec.gesture().is_empty());

        rec.begin(Point::new(1.0, 1.0), 0.0, &mut surface);
        rec.end();
        rec.append(Point::new(2.0, 2.0), 5.0, &mut surface);
        assert_eq!(rec.gesture().len(), 1);
        assert!(surface.segments.is_empty());
    }

    #[test]
    fn test_end_is_idempotent() {
        let mut rec = recorder();
        let mut surface = RecordingSurface::default();
        assert!(rec.end().is_empty());

        rec.begin(Point::new(3.0, 4.0), 0.0, &mut surface);
        let first = rec.end().clone();
        let second = rec.end().clone();
        assert_eq!(first, second);
        assert_eq!(first.len(), 1);
        assert!(!rec.is_live());
    }

    #[test]
    fn test_segments_are_incremental() {
        let mut rec = recorder();
        let mut surface = RecordingSurface::default();
        rec.begin(Point::new(0.0, 0.0), 0.0, &mut surface);
        for i in 1..=3 {
            rec.append(Point::new(i as f64, 0.0), i as f64 * 10.0, &mut surface);
        }
        assert_eq!(
            surface.segments,
            vec![
                (Point::new(0.0, 0.0), Point::new(1.0, 0.0)),
                (Point::new(1.0, 0.0), Point::new(2.0, 0.0)),
                (Point::new(2.0, 0.0), Point::new(3.0, 0.0)),
            ]
        );
        assert_eq!(surface.clears, 0);
    }

    #[test]
    fn test_times_never_decrease() {
        let mut rec = recorder();
        let mut surface = RecordingSurface::default();
        rec.begin(Point::new(0.0, 0.0), 100.0, &mut surface);
        rec.append(Point::new(1.0, 0.0), 130.0, &mut surface);
        rec.append(Point::new(2.0, 0.0), 120.0, &mut surface);
        let times: Vec<f64> = rec.gesture().samples().iter().map(|s| s.t).collect();
        assert_eq!(times, vec![0.0, 30.0, 30.0]);
    }

    #[test]
    fn test_new_gesture_discards_previous() {
        let mut rec = recorder();
        let mut surface = RecordingSurface::default();
        rec.begin(Point::new(0.0, 0.0), 0.0, &mut surface);
        rec.append(Point::new(5.0, 5.0), 10.0, &mut surface);
        rec.end();

        rec.begin(Point::new(9.0, 9.0), 50.0, &mut surface);
        assert_eq!(rec.gesture().samples(), &[Sample::new(9.0, 9.0, 0.0)]);

        rec.reset();
        assert!(rec.gesture().is_empty());
        assert!(!rec.is_live());
    }
}
