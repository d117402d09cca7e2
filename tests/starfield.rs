use glam::{Vec2, Vec4};
use showcase_engine::paint::{Pixmap, StarPainter};
use showcase_engine::starfield::{Star, Starfield, StarfieldOptions, StarShape};
use std::time::Duration;
use winit::dpi::PhysicalSize;

/// Painter that records calls instead of rasterizing, so tests can observe
/// exactly what the engine asked for.
struct RecordingPainter {
    display: Option<PhysicalSize<u32>>,
    backing: PhysicalSize<u32>,
    resizes: usize,
    clears: usize,
    circles: usize,
    rects: usize,
    lines: usize,
}

impl RecordingPainter {
    fn ready(display: PhysicalSize<u32>) -> Self {
        Self {
            display: Some(display),
            backing: PhysicalSize::new(0, 0),
            resizes: 0,
            clears: 0,
            circles: 0,
            rects: 0,
            lines: 0,
        }
    }

    fn not_ready() -> Self {
        let mut painter = Self::ready(PhysicalSize::new(0, 0));
        painter.display = None;
        painter
    }

    fn draw_calls(&self) -> usize {
        self.circles + self.rects + self.lines
    }
}

impl StarPainter for RecordingPainter {
    fn display_size(&self) -> Option<PhysicalSize<u32>> {
        self.display
    }

    fn resize(&mut self, backing: PhysicalSize<u32>) {
        self.backing = backing;
        self.resizes += 1;
    }

    fn backing_size(&self) -> PhysicalSize<u32> {
        self.backing
    }

    fn clear(&mut self, _color: Vec4) {
        self.clears += 1;
    }

    fn fill_circle(&mut self, _center: Vec2, _radius: f32, _color: Vec4) {
        self.circles += 1;
    }

    fn fill_rect(&mut self, _origin: Vec2, _size: Vec2, _color: Vec4) {
        self.rects += 1;
    }

    fn stroke_line(&mut self, _from: Vec2, _to: Vec2, _width: f32, _round_cap: bool, _color: Vec4) {
        self.lines += 1;
    }
}

fn options() -> StarfieldOptions {
    StarfieldOptions { density: 0.25, ..StarfieldOptions::default() }
}

#[test]
fn density_sets_the_pool_size() {
    let field = Starfield::new(RecordingPainter::ready(PhysicalSize::new(640, 360)), options());
    assert_eq!(field.stars().len(), 250, "density 0.25 should seed 250 stars");
    for star in field.stars() {
        assert!(star.depth > 0.0 && star.depth <= 1000.0);
        assert!(star.size >= 0.5 && star.size < 1.5);
    }
}

#[test]
fn advance_clears_and_draws_through_the_painter() {
    let mut field = Starfield::new(RecordingPainter::ready(PhysicalSize::new(640, 360)), options());
    field.advance();
    let painter = field.painter();
    assert_eq!(painter.resizes, 1, "first frame must sync the backing store");
    assert_eq!(painter.clears, 1);
    assert!(painter.draw_calls() > 0, "a quarter-density field should produce visible stars");
}

#[test]
fn backing_resync_only_happens_when_the_display_changes() {
    let mut field = Starfield::new(RecordingPainter::ready(PhysicalSize::new(640, 360)), options());
    field.advance();
    field.advance();
    assert_eq!(field.painter().resizes, 1, "unchanged display size must not reallocate");

    field.painter_mut().display = Some(PhysicalSize::new(800, 600));
    field.advance();
    assert_eq!(field.painter().resizes, 2);
    assert_eq!(field.painter().backing, PhysicalSize::new(800, 600));
}

#[test]
fn missing_context_skips_the_frame_without_failing() {
    let mut field = Starfield::new(RecordingPainter::not_ready(), options());
    field.advance();
    assert_eq!(field.painter().clears, 0, "no surface means no draw");

    // Surface comes up later; the next tick draws normally.
    field.painter_mut().display = Some(PhysicalSize::new(320, 240));
    field.advance();
    assert_eq!(field.painter().clears, 1);
}

#[test]
fn square_shape_without_warp_draws_rects() {
    let opts = StarfieldOptions { shape: StarShape::Square, warp_effect: false, ..options() };
    let mut field = Starfield::new(RecordingPainter::ready(PhysicalSize::new(640, 360)), opts);
    field.advance();
    let painter = field.painter();
    assert!(painter.rects > 0);
    assert_eq!(painter.circles, 0);
    assert_eq!(painter.lines, 0);
}

#[test]
fn warp_mode_draws_streaks() {
    let opts = StarfieldOptions { warp_effect: true, ..options() };
    let mut field = Starfield::new(RecordingPainter::ready(PhysicalSize::new(640, 360)), opts);
    field.advance();
    let painter = field.painter();
    assert!(painter.lines > 0);
    assert_eq!(painter.circles + painter.rects, 0);
}

#[test]
fn paused_ticks_move_nothing_and_resume_has_no_catchup() {
    let mut field = Starfield::new(RecordingPainter::ready(PhysicalSize::new(640, 360)), options());
    field.advance();
    field.pause();
    field.pause();
    assert!(field.is_paused(), "pause is idempotent");

    let depths: Vec<f32> = field.stars().iter().map(|s| s.depth).collect();
    std::thread::sleep(Duration::from_millis(60));
    field.advance();
    let after_pause: Vec<f32> = field.stars().iter().map(|s| s.depth).collect();
    assert_eq!(depths, after_pause, "paused ticks must not mutate the simulation");

    field.resume();
    field.resume();
    field.advance();
    for (before, star) in depths.iter().zip(field.stars()) {
        let moved = (before - star.depth).abs();
        let recycled = moved > 900.0;
        assert!(
            moved < field.speed() * 2.0 + 1.0 || recycled,
            "first resumed tick moved {moved}; the 60ms pause gap must not be replayed"
        );
    }
}

#[test]
fn destroy_is_terminal() {
    let mut field = Starfield::new(RecordingPainter::ready(PhysicalSize::new(640, 360)), options());
    field.advance();
    field.destroy();
    assert!(field.is_destroyed());

    let clears = field.painter().clears;
    let depths: Vec<f32> = field.stars().iter().map(|s| s.depth).collect();
    field.advance();
    field.resume();
    field.advance();
    assert_eq!(field.painter().clears, clears, "destroyed engine must not render");
    let after: Vec<f32> = field.stars().iter().map(|s| s.depth).collect();
    assert_eq!(depths, after, "destroyed engine must not simulate");
    assert!(field.is_destroyed(), "resume must not revive a destroyed engine");
}

#[test]
fn set_target_speed_ramps_toward_the_new_value() {
    let opts = StarfieldOptions { speed: 0.0, ramp_duration_ms: 40, ..options() };
    let mut field = Starfield::new(RecordingPainter::ready(PhysicalSize::new(64, 64)), opts);
    assert_eq!(field.speed(), 0.0);

    field.set_target_speed(4.0);
    assert_eq!(field.target_speed(), 4.0);
    std::thread::sleep(Duration::from_millis(100));
    field.advance();
    assert!(
        (field.speed() - 4.0).abs() < 1e-3,
        "a finished ramp should land exactly on the target, got {}",
        field.speed()
    );
}

#[test]
fn newest_target_wins_over_an_inflight_ramp() {
    let opts = StarfieldOptions { speed: 1.0, ramp_duration_ms: 10_000, ..options() };
    let mut field = Starfield::new(RecordingPainter::ready(PhysicalSize::new(64, 64)), opts);
    field.set_target_speed(50.0);
    field.advance();
    field.set_target_speed(0.0);
    std::thread::sleep(Duration::from_millis(30));
    field.advance();
    assert!(
        field.speed() <= 1.1,
        "replacing the ramp should ease from the current speed, not the old target; got {}",
        field.speed()
    );
    assert_eq!(field.target_speed(), 0.0);
}

#[test]
fn speed_never_goes_negative() {
    let opts = StarfieldOptions { speed: 0.5, ramp_duration_ms: 10, ..options() };
    let mut field = Starfield::new(RecordingPainter::ready(PhysicalSize::new(64, 64)), opts);
    field.set_target_speed(-3.0);
    std::thread::sleep(Duration::from_millis(30));
    field.advance();
    assert_eq!(field.speed(), 0.0, "speed floors at zero even for a negative target");
}

#[test]
fn recycled_star_keeps_the_overshoot_and_rerolls_laterally() {
    let mut rng = rand::thread_rng();
    let mut star = Star { lateral: Vec2::new(400.0, 400.0), depth: 3.0, size: 1.0 };
    star.advance(10.0, &mut rng);
    assert!((star.depth - 993.0).abs() < 1e-3, "new depth must be old + 1000 - consumed excess");
    assert!(
        star.lateral.x.abs() <= star.depth * 0.5 && star.lateral.y.abs() <= star.depth * 0.5,
        "lateral coordinates must be redrawn scaled to the new depth"
    );
}

#[test]
fn rendering_into_a_pixmap_produces_star_pixels() {
    let opts = StarfieldOptions {
        density: 1.0,
        warp_effect: false,
        depth_fade: false,
        star_size: 12.0,
        background_color: [0.0, 0.0, 0.0, 1.0],
        ..StarfieldOptions::default()
    };
    let mut field = Starfield::new(Pixmap::new(PhysicalSize::new(200, 200)), opts);
    field.advance();
    let pixels = field.painter().pixels();
    let lit = pixels.chunks_exact(4).filter(|px| px[0] > 0).count();
    assert!(lit > 0, "a dense field on a black background should light some pixels");
}
