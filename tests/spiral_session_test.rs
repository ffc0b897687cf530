use spiral_trace::draw::{Canvas, Surface};
use spiral_trace::export::{export_csv, DirectorySink};
use spiral_trace::mapper::map;
use spiral_trace::plot::PngPlotter;
use spiral_trace::{generate, Config, GestureRecorder, Mode, Point, Session, SpiralParams};
use spiral_trace::types::StrokeStyle;
use chrono::{TimeZone, Utc};
use std::f64::consts::TAU;

const WHITE: u32 = 0x00_FF_FF_FF;

#[test]
fn test_straight_gesture_maps_to_increasing_angles() {
    let template = generate(&SpiralParams {
        center_x: 100.0,
        center_y: 100.0,
        max_radius: 80.0,
        loops: 3,
        points_per_loop: 100,
    });
    assert_eq!(template.len(), 301);

    let mut canvas = Canvas::new(200, 200, WHITE);
    let mut recorder = GestureRecorder::new(200.0, 200.0, StrokeStyle { color: 0x0031ED, width: 2.0 });
    recorder.begin(Point::new(100.0, 100.0), 0.0, &mut canvas);
    for step in 1..=5 {
        let x = 100.0 + 16.0 * step as f64;
        recorder.append(Point::new(x, 100.0), 200.0 * step as f64, &mut canvas);
    }
    let gesture = recorder.end().clone();
    assert_eq!(gesture.len(), 6);
    assert_eq!(gesture.total_time(), 1000.0);

    let mapped = map(&gesture, &template).expect("mapping");
    let angles: Vec<f64> = mapped.iter().map(|m| m.template.angle).collect();
    assert!(angles.windows(2).all(|w| w[0] < w[1]), "angles not increasing: {angles:?}");
    assert_eq!(angles[0], 0.0);
    assert_eq!(angles[5], 3.0 * TAU);

    // the stroke really landed on the canvas
    assert_ne!(canvas.frame().get(140, 100), Some(WHITE));
    canvas.clear_surface();
    assert_eq!(canvas.frame().get(140, 100), Some(WHITE));
}

#[test]
fn test_recorded_gesture_invariants() {
    let mut canvas = Canvas::new(120, 80, WHITE);
    let mut recorder = GestureRecorder::new(120.0, 80.0, StrokeStyle { color: 0x0031ED, width: 2.0 });
    recorder.begin(Point::new(60.0, 40.0), 12_345.0, &mut canvas);
    let wild = [(-30.0, 10.0), (500.0, 90.0), (61.0, -2.0), (119.9, 79.9), (0.0, 0.0)];
    for (i, (x, y)) in wild.iter().enumerate() {
        recorder.append(Point::new(*x, *y), 12_345.0 + 7.5 * (i + 1) as f64, &mut canvas);
    }
    let gesture = recorder.end();

    assert_eq!(gesture.first().unwrap().t, 0.0);
    assert!(gesture.samples().windows(2).all(|w| w[0].t <= w[1].t));
    assert!(gesture
        .samples()
        .iter()
        .all(|s| (0.0..=120.0).contains(&s.x) && (0.0..=80.0).contains(&s.y)));
    assert!(export_csv(gesture, None).unwrap().starts_with("X,Y,Time(ms)\n60.00,40.00,0.00\n0.00,10.00,7.50"));
}

#[test]
fn test_follow_session_writes_csv_and_charts() {
    let tmp = tempfile::TempDir::new().unwrap();
    let mut config = Config::default();
    config.canvas.width = 300;
    config.canvas.height = 300;
    config.output.dir = tmp.path().to_path_buf();

    let canvas = Canvas::new(300, 300, WHITE);
    let plotter = PngPlotter::new(DirectorySink::new(tmp.path()), 200, 120);
    let mut session = Session::new(&config, canvas, plotter);
    session.set_mode(Mode::Follow);

    // the gray spiral is on the canvas at its center
    assert_eq!(session.surface().frame().get(150, 150), Some(config.style.template_color));

    session.pointer_down(Point::new(150.0, 150.0), 0.0);
    session.pointer_move(Point::new(170.0, 150.0), 400.0);
    session.pointer_move(Point::new(150.0, 180.0), 800.0);
    session.pointer_up();

    let mut sink = DirectorySink::new(tmp.path());
    let csv_path = session.export(&mut sink, Utc::now()).unwrap();
    let name = csv_path.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("spiral_data_follow_"));
    assert!(name.ends_with(".csv"));
    let text = std::fs::read_to_string(&csv_path).unwrap();
    assert!(text.starts_with("User_X,User_Y,Time(ms),Template_X,Template_Y\n"));
    assert_eq!(text.lines().count(), 4);

    let at = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
    session.visualize(at).unwrap();
    let charts = session.plotter().rendered();
    assert_eq!(charts, [
        tmp.path().join("spiral_plot_x_2025-06-01T12-00-00-000Z.png"),
        tmp.path().join("spiral_plot_y_2025-06-01T12-00-00-000Z.png"),
    ]);
    assert!(charts.iter().all(|p| p.exists()));
    let decoded = image::open(&charts[0]).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (200, 120));

    session.set_mode(Mode::Freehand);
    assert!(session.template().is_empty());
    assert!(session.gesture().is_empty());
    assert!(session.plotter().rendered().is_empty());
}
