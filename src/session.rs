// The drawing session: current mode, the gesture being recorded and the reference spiral.
// All input handlers go through here, one at a time; the mapper, the exporter and the
// plotter only ever see borrowed snapshots of this state.

use crate::config::Config;
use crate::draw::Surface;
use crate::error::{Error, Result};
use crate::export::{export_csv, suggested_filename, FileSink};
use crate::mapper;
use crate::plot::{build_charts, Plotter};
use crate::recorder::{Gesture, GestureRecorder};
use crate::template::{generate, SpiralParams, Template};
use crate::types::{MappedSample, Mode, Point, StrokeStyle};
use chrono::{DateTime, Utc};
use log::{info, warn};
use std::path::PathBuf;

pub struct Session<S: Surface, P: Plotter> {
    mode: Mode,
    recorder: GestureRecorder,
    template: Template,
    spiral: SpiralParams,
    template_style: StrokeStyle,
    surface: S,
    plotter: P,
}

impl<S: Surface, P: Plotter> Session<S, P> {
    /// Fresh session in freehand mode with nothing recorded.
    pub fn new(config: &Config, surface: S, plotter: P) -> Self {
        let (width, height) = (config.canvas.width as f64, config.canvas.height as f64);
        let spiral = SpiralParams::fitted(
            width,
            height,
            config.template.margin,
            config.template.loops,
            config.template.points_per_loop,
        );
        Self {
            mode: Mode::Freehand,
            recorder: GestureRecorder::new(width, height, config.user_style()),
            template: Template::empty(),
            spiral,
            template_style: config.template_style(),
            surface,
            plotter,
        }
    }

    pub fn mode(&self) -> Mode { self.mode }
    pub fn gesture(&self) -> &Gesture { self.recorder.gesture() }
    pub fn template(&self) -> &Template { &self.template }
    pub fn is_drawing(&self) -> bool { self.recorder.is_live() }
    pub fn surface(&self) -> &S { &self.surface }
    pub fn plotter(&self) -> &P { &self.plotter }

    /// Switch modes. Switching always wipes the canvas, the recording and the plots.
    pub fn set_mode(&mut self, mode: Mode) {
        if self.mode == mode {
            return;
        }
        self.mode = mode;
        self.clear();
        info!("Mode changed to: {}", self.mode);
    }

    /// Wipe canvas, recording and plots. Follow mode redraws a fresh spiral.
    pub fn clear(&mut self) {
        self.recorder.reset();
        self.surface.clear_surface();
        self.plotter.clear();
        match self.mode {
            Mode::Follow => self.draw_template(),
            Mode::Freehand => self.template = Template::empty(),
        }
        info!("Canvas cleared.");
    }

    fn draw_template(&mut self) {
        self.template = generate(&self.spiral);
        let style = self.template_style;
        let points = self.template.points();
        if let Some(first) = points.first() {
            self.surface.begin_path(Point::new(first.x, first.y), style);
        }
        for pair in points.windows(2) {
            self.surface.draw_segment(
                Point::new(pair[0].x, pair[0].y),
                Point::new(pair[1].x, pair[1].y),
                style,
            );
        }
        info!(
            "Template spiral drawn with {} loops. Stored {} points.",
            self.spiral.loops,
            self.template.len()
        );
    }

    pub fn pointer_down(&mut self, at: Point, clock_ms: f64) {
        self.recorder.begin(at, clock_ms, &mut self.surface);
    }

    pub fn pointer_move(&mut self, at: Point, clock_ms: f64) {
        self.recorder.append(at, clock_ms, &mut self.surface);
    }

    pub fn pointer_up(&mut self) {
        self.recorder.end();
    }

    /// Fresh time-to-template mapping of the current gesture; only in follow mode.
    pub fn mapping(&self) -> Option<Vec<MappedSample>> {
        match self.mode {
            Mode::Follow => mapper::map(self.recorder.gesture(), &self.template),
            Mode::Freehand => None,
        }
    }

    pub fn export_csv(&self) -> Result<String> {
        let mapped = self.mapping();
        export_csv(self.recorder.gesture(), mapped.as_deref())
    }

    /// Export the current gesture as CSV through `sink`, named after the mode and `at`.
    pub fn export<F: FileSink + ?Sized>(&self, sink: &mut F, at: DateTime<Utc>) -> Result<PathBuf> {
        let csv = self.export_csv().inspect_err(|e| {
            if matches!(e, Error::EmptyGesture) { warn!("{e}"); }
        })?;
        let name = suggested_filename(self.mode, at);
        let path = sink.offer(&name, csv.as_bytes())?;
        info!("Data exported as {} ({} rows).", path.display(), self.recorder.gesture().len());
        Ok(path)
    }

    /// Replace any shown charts with X/Y-over-time charts of the current gesture, both
    /// named after `at`. Charts shown before stay in place if this fails.
    pub fn visualize(&mut self, at: DateTime<Utc>) -> Result<()> {
        if self.recorder.gesture().is_empty() {
            warn!("{}", Error::EmptyGesture);
            return Err(Error::EmptyGesture);
        }

        let mapped = self.mapping();
        let charts = build_charts(self.recorder.gesture(), mapped.as_deref());
        self.plotter.show(&charts, at)?;
        info!(
            "Plots generated ({}).",
            if mapped.is_some() { "with mapped template" } else { "user only" }
        );
        Ok(())
    }
}
