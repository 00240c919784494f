// tests/render_loop.rs
use lsystem_canvas::{
    CanvasSink, Color, Drawing, LSystemRenderer, Preset, RenderConfig, RenderError,
    RenderOutcome, RenderStatus, ValidationError,
};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

#[derive(Default)]
struct Recorder {
    statuses: Vec<RenderStatus>,
    drawings: Vec<Drawing>,
}

impl CanvasSink for Recorder {
    fn status(&mut self, status: &RenderStatus) {
        self.statuses.push(status.clone());
    }

    fn present(&mut self, drawing: Drawing) {
        self.drawings.push(drawing);
    }
}

#[derive(Debug)]
enum Event {
    Status(RenderStatus),
    Present,
}

struct ChannelSink(Sender<Event>);

impl CanvasSink for ChannelSink {
    fn status(&mut self, status: &RenderStatus) {
        let _ = self.0.send(Event::Status(status.clone()));
    }

    fn present(&mut self, _drawing: Drawing) {
        let _ = self.0.send(Event::Present);
    }
}

fn next_event(rx: &Receiver<Event>) -> Event {
    rx.recv_timeout(Duration::from_secs(10))
        .expect("renderer went quiet")
}

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("lsystem_canvas=debug")
        .with_test_writer()
        .try_init();
}

fn koch(generations: u32) -> RenderConfig {
    RenderConfig {
        start_sequence: "F--F--F".to_string(),
        production_rules: "(F,F+F--F+F)".to_string(),
        generations,
        angle: 60.0,
        width: 400,
        height: 300,
        ..RenderConfig::default()
    }
}

#[test]
fn test_finished_run_presents_drawing() {
    init_logging();
    let mut renderer = LSystemRenderer::new(RenderConfig {
        background: Color::rgb(10, 20, 30),
        stroke: Color::rgb(200, 100, 0),
        ..koch(2)
    });
    let mut sink = Recorder::default();

    let outcome = renderer.run(&mut sink).unwrap();

    assert_eq!(
        sink.statuses,
        vec![RenderStatus::Calculating, RenderStatus::Finished]
    );
    assert_eq!(renderer.status(), &RenderStatus::Finished);
    assert_eq!(sink.drawings.len(), 1);

    let drawing = &sink.drawings[0];
    assert_eq!((drawing.width, drawing.height), (400, 300));
    assert_eq!(drawing.background, Color::rgb(10, 20, 30));
    assert_eq!(drawing.stroke, Color::rgb(200, 100, 0));
    // 3 * 4^2 forward moves.
    assert_eq!(drawing.segments.len(), 48);

    let RenderOutcome::Finished(stats) = outcome else {
        panic!("expected a finished run, got {outcome:?}");
    };
    assert_eq!(stats.segments, 48);
    // 48 moves plus 4 * 12 + 16 turns.
    assert_eq!(stats.symbols, 112);
    assert_eq!(stats.placement.scale.x, stats.placement.scale.y);
}

#[test]
fn test_stats_report_scaled_path_length() {
    // A 10x10 square fitted into a 100x100 inset is drawn with 100 px sides.
    let mut renderer = LSystemRenderer::new(RenderConfig {
        start_sequence: "A+A+A+A".to_string(),
        angle: 90.0,
        width: 130,
        height: 130,
        margin: 15,
        ..RenderConfig::default()
    });
    let mut sink = Recorder::default();

    let RenderOutcome::Finished(stats) = renderer.run(&mut sink).unwrap() else {
        panic!("expected a finished run");
    };
    assert_eq!(stats.segments, 4);
    assert!((stats.placement.scale.uniform() - 10.0).abs() < 1e-9);
    assert!(
        (stats.path_length - 400.0).abs() < 1e-6,
        "path length {}",
        stats.path_length
    );
}

#[test]
fn test_invalid_grammar_never_starts() {
    let mut renderer = LSystemRenderer::new(RenderConfig {
        start_sequence: "A".to_string(),
        production_rules: "(A,AB),(A,BA)".to_string(),
        ..RenderConfig::default()
    });
    let mut sink = Recorder::default();

    let err = renderer.run(&mut sink).unwrap_err();
    let RenderError::Invalid(errors) = err else {
        panic!("expected validation errors, got {err:?}");
    };
    assert!(errors.contains(|e| matches!(e, ValidationError::DuplicateRule { letter: 'A' })));
    assert!(sink.statuses.is_empty());
    assert!(sink.drawings.is_empty());
    assert_eq!(renderer.status(), &RenderStatus::Idle);
}

#[test]
fn test_invalid_canvas_never_starts() {
    let mut renderer = LSystemRenderer::new(RenderConfig {
        width: 30,
        ..RenderConfig::default()
    });
    let mut sink = Recorder::default();
    assert!(matches!(
        renderer.run(&mut sink),
        Err(RenderError::Config(_))
    ));
    assert!(sink.statuses.is_empty());
}

#[test]
fn test_out_of_memory_keeps_renderer_usable() {
    init_logging();
    let mut renderer = LSystemRenderer::new(RenderConfig {
        start_sequence: "A".to_string(),
        production_rules: "(A,AA)".to_string(),
        generations: 20,
        max_symbols: 1000,
        ..RenderConfig::default()
    });
    let mut sink = Recorder::default();

    let err = renderer.run(&mut sink).unwrap_err();
    assert!(matches!(err, RenderError::OutOfMemory { .. }));
    assert_eq!(
        sink.statuses,
        vec![
            RenderStatus::Calculating,
            RenderStatus::Error("OutOfMemory".to_string())
        ]
    );
    assert!(sink.drawings.is_empty());

    renderer.set_config(RenderConfig {
        generations: 5,
        ..renderer.config().clone()
    });
    assert_eq!(renderer.status(), &RenderStatus::Idle);
    assert!(matches!(
        renderer.run(&mut sink),
        Ok(RenderOutcome::Finished(_))
    ));
    assert_eq!(sink.drawings.len(), 1);
    assert_eq!(sink.drawings[0].segments.len(), 32);
}

#[test]
fn test_stack_underflow_is_reported() {
    let mut renderer = LSystemRenderer::new(RenderConfig {
        start_sequence: "A]A".to_string(),
        production_rules: String::new(),
        ..RenderConfig::default()
    });
    let mut sink = Recorder::default();

    let err = renderer.run(&mut sink).unwrap_err();
    assert_eq!(err, RenderError::StackUnderflow { position: 1 });
    assert_eq!(
        sink.statuses.last(),
        Some(&RenderStatus::Error(err.to_string()))
    );
    assert!(sink.drawings.is_empty());
}

#[test]
fn test_pause_then_resume_finishes() {
    let renderer = LSystemRenderer::new(koch(3));
    let control = renderer.control();
    control.pause();

    let (tx, rx) = mpsc::channel();
    let handle = thread::spawn(move || {
        let mut renderer = renderer;
        renderer.run(&mut ChannelSink(tx))
    });

    assert!(matches!(next_event(&rx), Event::Status(RenderStatus::Calculating)));
    assert!(matches!(next_event(&rx), Event::Status(RenderStatus::Paused)));
    control.resume();
    assert!(matches!(next_event(&rx), Event::Status(RenderStatus::Calculating)));
    assert!(matches!(next_event(&rx), Event::Present));
    assert!(matches!(next_event(&rx), Event::Status(RenderStatus::Finished)));

    let outcome = handle.join().unwrap().unwrap();
    assert!(matches!(outcome, RenderOutcome::Finished(_)));
}

#[test]
fn test_stop_while_paused_presents_nothing() {
    let renderer = LSystemRenderer::new(koch(3));
    let control = renderer.control();
    control.pause();

    let (tx, rx) = mpsc::channel();
    let handle = thread::spawn(move || {
        let mut renderer = renderer;
        let outcome = renderer.run(&mut ChannelSink(tx));
        (renderer, outcome)
    });

    assert!(matches!(next_event(&rx), Event::Status(RenderStatus::Calculating)));
    assert!(matches!(next_event(&rx), Event::Status(RenderStatus::Paused)));
    control.stop();

    let (renderer, outcome) = handle.join().unwrap();
    assert_eq!(outcome.unwrap(), RenderOutcome::Stopped);
    let rest: Vec<Event> = rx.try_iter().collect();
    assert!(matches!(
        rest.as_slice(),
        [Event::Status(RenderStatus::Stopped)]
    ));
    assert_eq!(renderer.status(), &RenderStatus::Stopped);
    assert!(!control.is_paused());

    // Stopping ended the pause too: the next run goes straight through.
    let (tx, rx) = mpsc::channel();
    let handle = thread::spawn(move || {
        let mut renderer = renderer;
        renderer.run(&mut ChannelSink(tx))
    });
    assert!(matches!(next_event(&rx), Event::Status(RenderStatus::Calculating)));
    assert!(matches!(next_event(&rx), Event::Present));
    assert!(matches!(next_event(&rx), Event::Status(RenderStatus::Finished)));
    assert!(matches!(
        handle.join().unwrap(),
        Ok(RenderOutcome::Finished(_))
    ));
}

#[test]
fn test_stop_during_long_expansion() {
    // Swapping letters never grows the sequence, so only a stop can end this early.
    let renderer = LSystemRenderer::new(RenderConfig {
        start_sequence: "A".to_string(),
        production_rules: "(A,B),(B,A)".to_string(),
        generations: u32::MAX,
        ..RenderConfig::default()
    });
    let control = renderer.control();

    let (tx, rx) = mpsc::channel();
    let handle = thread::spawn(move || {
        let mut renderer = renderer;
        renderer.run(&mut ChannelSink(tx))
    });

    assert!(matches!(next_event(&rx), Event::Status(RenderStatus::Calculating)));
    thread::sleep(Duration::from_millis(50));
    control.stop();

    assert!(matches!(next_event(&rx), Event::Status(RenderStatus::Stopped)));
    assert_eq!(handle.join().unwrap(), Ok(RenderOutcome::Stopped));
    assert!(rx.try_iter().next().is_none());
}

#[test]
fn test_pause_during_long_expansion() {
    let renderer = LSystemRenderer::new(RenderConfig {
        start_sequence: "A".to_string(),
        production_rules: "(A,B),(B,A)".to_string(),
        generations: u32::MAX,
        ..RenderConfig::default()
    });
    let control = renderer.control();

    let (tx, rx) = mpsc::channel();
    let handle = thread::spawn(move || {
        let mut renderer = renderer;
        renderer.run(&mut ChannelSink(tx))
    });

    assert!(matches!(next_event(&rx), Event::Status(RenderStatus::Calculating)));
    control.pause();
    assert!(matches!(next_event(&rx), Event::Status(RenderStatus::Paused)));
    control.stop();
    assert!(matches!(next_event(&rx), Event::Status(RenderStatus::Stopped)));
    assert_eq!(handle.join().unwrap(), Ok(RenderOutcome::Stopped));
}

#[test]
fn test_partial_config_uses_defaults() {
    let config: RenderConfig = serde_json::from_str(
        r#"{ "start_sequence": "A", "production_rules": "(A,A+A-A)", "generations": 1 }"#,
    )
    .unwrap();
    assert_eq!(config.margin, 15);
    assert_eq!(config.step_length, 10.0);
    assert!(config.validate().is_ok());

    let mut sink = Recorder::default();
    LSystemRenderer::new(config).run(&mut sink).unwrap();
    assert_eq!(sink.drawings[0].segments.len(), 3);
}

#[test]
fn test_config_validation() {
    let ok = RenderConfig::default();
    assert!(ok.validate().is_ok());

    let bad = [
        RenderConfig { width: 0, ..ok.clone() },
        RenderConfig { height: 30, ..ok.clone() },
        RenderConfig { step_length: 0.0, ..ok.clone() },
        RenderConfig { step_length: f64::NAN, ..ok.clone() },
        RenderConfig { angle: f64::INFINITY, ..ok.clone() },
    ];
    for config in bad {
        assert!(
            matches!(config.validate(), Err(RenderError::Config(_))),
            "{config:?} should be rejected"
        );
    }
}

#[test]
fn test_presets_render_inside_canvas() {
    for preset in Preset::ALL {
        let config = preset.apply(RenderConfig {
            width: 640,
            height: 480,
            ..RenderConfig::default()
        });
        let mut sink = Recorder::default();
        let outcome = LSystemRenderer::new(config.clone())
            .run(&mut sink)
            .unwrap_or_else(|e| panic!("{} failed: {e}", preset.name()));
        let RenderOutcome::Finished(stats) = outcome else {
            panic!("{} did not finish", preset.name());
        };

        let drawing = &sink.drawings[0];
        assert!(!drawing.segments.is_empty(), "{} drew nothing", preset.name());

        // Bounds are measured at whole-unit granularity.
        let slack = stats.placement.scale.uniform() + 1e-6;
        let margin = f64::from(config.margin);
        let (min, max) = drawing.extent().unwrap();
        assert!(min.x >= margin - slack, "{} left edge {}", preset.name(), min.x);
        assert!(min.y >= margin - slack, "{} top edge {}", preset.name(), min.y);
        assert!(max.x <= 640.0 - margin + slack, "{} right edge {}", preset.name(), max.x);
        assert!(max.y <= 480.0 - margin + slack, "{} bottom edge {}", preset.name(), max.y);
    }
}
