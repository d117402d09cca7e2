use crate::paint::StarPainter;
use crate::time::FrameClock;
use glam::{Vec2, Vec4};
use rand::Rng;
use serde::Deserialize;
use std::time::{Duration, Instant};
use winit::dpi::PhysicalSize;

/// Depth of the far plane; stars live in (0, FAR_DEPTH] and recycle across
/// it when they pass the near plane at depth 1.
const FAR_DEPTH: f32 = 1000.0;

/// Screen sizes below this many backing pixels are not worth drawing.
const MIN_POINT_SIZE: f32 = 0.3;

/// Point rendering style. Circles also give warp streaks round caps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StarShape {
    #[default]
    Circle,
    Square,
}

/// Configuration bag for [`Starfield`]. Every field is optional in config
/// files; out-of-range values fall back to the documented defaults when the
/// engine sanitizes the bag at construction.
#[derive(Debug, Clone, Deserialize)]
pub struct StarfieldOptions {
    /// Initial speed, in depth units per baseline frame.
    #[serde(default = "StarfieldOptions::default_speed")]
    pub speed: f32,
    /// Initial ramp target. Defaults to `speed` (no ramp at startup).
    #[serde(default)]
    pub target_speed: Option<f32>,
    /// Duration of eased target-speed transitions.
    #[serde(default = "StarfieldOptions::default_ramp_duration_ms")]
    pub ramp_duration_ms: u64,
    /// Exponential smoothing coefficient in [0, 1] used when no ramp is
    /// active. Higher values track the target faster.
    #[serde(default = "StarfieldOptions::default_speed_adj_factor")]
    pub speed_adj_factor: f32,
    /// Stars per 1000-unit volume; the pool holds `density * 1000` stars.
    #[serde(default = "StarfieldOptions::default_density")]
    pub density: f32,
    #[serde(default)]
    pub shape: StarShape,
    /// Linear depth-based opacity fade.
    #[serde(default = "StarfieldOptions::default_true")]
    pub depth_fade: bool,
    /// Draw trailing streaks instead of points.
    #[serde(default = "StarfieldOptions::default_true")]
    pub warp_effect: bool,
    /// Streak length scalar; the tail sits at `depth + length * speed`.
    #[serde(default = "StarfieldOptions::default_warp_effect_length")]
    pub warp_effect_length: f32,
    /// Base point size scalar.
    #[serde(default = "StarfieldOptions::default_star_size")]
    pub star_size: f32,
    #[serde(default = "StarfieldOptions::default_background_color")]
    pub background_color: [f32; 4],
    #[serde(default = "StarfieldOptions::default_star_color")]
    pub star_color: [f32; 4],
}

impl StarfieldOptions {
    const fn default_speed() -> f32 {
        0.7
    }

    const fn default_ramp_duration_ms() -> u64 {
        1500
    }

    const fn default_speed_adj_factor() -> f32 {
        0.03
    }

    const fn default_density() -> f32 {
        0.7
    }

    const fn default_true() -> bool {
        true
    }

    const fn default_warp_effect_length() -> f32 {
        5.0
    }

    const fn default_star_size() -> f32 {
        3.0
    }

    /// Deep violet, the showcase backdrop.
    const fn default_background_color() -> [f32; 4] {
        [0.063, 0.039, 0.102, 1.0]
    }

    const fn default_star_color() -> [f32; 4] {
        [1.0, 1.0, 1.0, 1.0]
    }

    fn sanitized(mut self) -> Self {
        if !(self.speed >= 0.0) {
            self.speed = Self::default_speed();
        }
        if let Some(target) = self.target_speed {
            if !(target >= 0.0) {
                self.target_speed = None;
            }
        }
        self.speed_adj_factor = self.speed_adj_factor.clamp(0.0, 1.0);
        if !(self.density > 0.0) {
            self.density = Self::default_density();
        }
        self.warp_effect_length = self.warp_effect_length.max(0.0);
        if !(self.star_size > 0.0) {
            self.star_size = Self::default_star_size();
        }
        self
    }
}

impl Default for StarfieldOptions {
    fn default() -> Self {
        Self {
            speed: Self::default_speed(),
            target_speed: None,
            ramp_duration_ms: Self::default_ramp_duration_ms(),
            speed_adj_factor: Self::default_speed_adj_factor(),
            density: Self::default_density(),
            shape: StarShape::default(),
            depth_fade: true,
            warp_effect: true,
            warp_effect_length: Self::default_warp_effect_length(),
            star_size: Self::default_star_size(),
            background_color: Self::default_background_color(),
            star_color: Self::default_star_color(),
        }
    }
}

/// One particle. Lateral coordinates live in a depth-projected space roughly
/// +/-500 at the far plane; `size` is a random base scale in [0.5, 1.5).
#[derive(Debug, Clone, Copy)]
pub struct Star {
    pub lateral: Vec2,
    pub depth: f32,
    pub size: f32,
}

impl Star {
    pub fn spawn(rng: &mut impl Rng) -> Self {
        Self {
            lateral: Vec2::new(
                (rng.gen::<f32>() - 0.5) * FAR_DEPTH,
                (rng.gen::<f32>() - 0.5) * FAR_DEPTH,
            ),
            depth: rng.gen_range(1.0..=FAR_DEPTH),
            size: 0.5 + rng.gen::<f32>(),
        }
    }

    /// Moves the star toward the viewer by `step` depth units. Crossing the
    /// near plane recycles it: the depth wraps forward by the far-plane
    /// span (keeping the overshoot, so the result always lands in
    /// (1, 1001]) and the lateral position is re-randomized scaled to the
    /// new depth, which keeps apparent density uniform.
    pub fn advance(&mut self, step: f32, rng: &mut impl Rng) {
        self.depth -= step;
        while self.depth < 1.0 {
            self.depth += FAR_DEPTH;
            self.lateral = Vec2::new(
                (rng.gen::<f32>() - 0.5) * self.depth,
                (rng.gen::<f32>() - 0.5) * self.depth,
            );
        }
    }
}

/// Wall-clock anchored quadratic speed ramp. A newly set target captures the
/// current speed and timestamp as the ramp origin, replacing any in-flight
/// ramp; ramps never compose.
#[derive(Debug, Clone, Copy)]
pub struct SpeedRamp {
    start_speed: f32,
    started_at: Instant,
    duration: Duration,
    active: bool,
}

impl SpeedRamp {
    pub fn idle(duration: Duration) -> Self {
        Self { start_speed: 0.0, started_at: Instant::now(), duration, active: false }
    }

    pub fn begin(&mut self, current_speed: f32, now: Instant) {
        self.start_speed = current_speed;
        self.started_at = now;
        self.active = true;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Eased speed at `now`, or `None` once the ramp has finished. Ease-in
    /// (`t^2`) while accelerating, ease-out (`1 - (1-t)^2`) while
    /// decelerating; the ramp deactivates the first time it is evaluated at
    /// or past its full duration, returning the exact target.
    pub fn evaluate(&mut self, target: f32, now: Instant) -> Option<f32> {
        if !self.active {
            return None;
        }
        let elapsed = now.saturating_duration_since(self.started_at);
        let mut t = if self.duration.is_zero() {
            1.0
        } else {
            elapsed.as_secs_f32() / self.duration.as_secs_f32()
        };
        if t >= 1.0 {
            t = 1.0;
            self.active = false;
        }
        let eased = if target > self.start_speed { t * t } else { 1.0 - (1.0 - t) * (1.0 - t) };
        Some(self.start_speed + (target - self.start_speed) * eased)
    }
}

/// Frame-rate independent exponential smoothing toward `target`. `factor`
/// is the per-baseline-frame blend weight; raising it to `1/multiplier`
/// keeps the effective rate constant across frame rates.
pub fn smooth_toward(current: f32, target: f32, factor: f32, multiplier: f32) -> f32 {
    let adjusted = factor.powf(1.0 / multiplier);
    target * adjusted + current * (1.0 - adjusted)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Running,
    Paused,
    Destroyed,
}

/// Self-contained starfield simulation. The host schedules `advance` once
/// per animation frame; everything else is explicit state: a settable
/// target speed and the pause/resume/destroy lifecycle.
pub struct Starfield<P: StarPainter> {
    painter: P,
    stars: Vec<Star>,
    clock: FrameClock,
    phase: Phase,
    speed: f32,
    target_speed: f32,
    ramp: SpeedRamp,
    speed_adj_factor: f32,
    shape: StarShape,
    depth_fade: bool,
    warp_effect: bool,
    warp_effect_length: f32,
    star_size: f32,
    background_color: Vec4,
    star_color: Vec4,
    prev_display: Option<PhysicalSize<u32>>,
}

impl<P: StarPainter> Starfield<P> {
    pub fn new(painter: P, options: StarfieldOptions) -> Self {
        let options = options.sanitized();
        let mut rng = rand::thread_rng();
        let count = (options.density * FAR_DEPTH) as usize;
        let stars = (0..count).map(|_| Star::spawn(&mut rng)).collect();

        Self {
            painter,
            stars,
            clock: FrameClock::new(),
            phase: Phase::Running,
            speed: options.speed,
            target_speed: options.target_speed.unwrap_or(options.speed),
            ramp: SpeedRamp::idle(Duration::from_millis(options.ramp_duration_ms)),
            speed_adj_factor: options.speed_adj_factor,
            shape: options.shape,
            depth_fade: options.depth_fade,
            warp_effect: options.warp_effect,
            warp_effect_length: options.warp_effect_length,
            star_size: options.star_size,
            background_color: Vec4::from_array(options.background_color),
            star_color: Vec4::from_array(options.star_color),
            prev_display: None,
        }
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn target_speed(&self) -> f32 {
        self.target_speed
    }

    /// Retargets the speed. Captures the current speed and timestamp as the
    /// new ramp origin, discarding any in-flight ramp; the newest target
    /// always wins. Setting the current target again is a no-op.
    pub fn set_target_speed(&mut self, value: f32) {
        if value == self.target_speed {
            return;
        }
        self.ramp.begin(self.speed, Instant::now());
        self.target_speed = value;
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    pub fn painter(&self) -> &P {
        &self.painter
    }

    pub fn painter_mut(&mut self) -> &mut P {
        &mut self.painter
    }

    pub fn is_paused(&self) -> bool {
        self.phase == Phase::Paused
    }

    pub fn is_destroyed(&self) -> bool {
        self.phase == Phase::Destroyed
    }

    /// Freezes simulation and rendering. The host keeps scheduling
    /// `advance`; paused ticks only keep the clock warm so resuming after
    /// an arbitrarily long gap applies no catch-up delta.
    pub fn pause(&mut self) {
        if self.phase == Phase::Running {
            self.phase = Phase::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.phase == Phase::Paused {
            self.phase = Phase::Running;
        }
    }

    /// Terminal: no tick after this mutates any state.
    pub fn destroy(&mut self) {
        self.phase = Phase::Destroyed;
    }

    /// One cooperative tick: speed update, star motion, draw. All derived
    /// values within the tick come from the same clock read.
    pub fn advance(&mut self) {
        if self.phase == Phase::Destroyed {
            return;
        }
        let multiplier = self.clock.tick();
        if self.phase == Phase::Paused {
            return;
        }

        self.update_speed(multiplier, Instant::now());

        let step = self.speed * multiplier;
        let mut rng = rand::thread_rng();
        for star in &mut self.stars {
            star.advance(step, &mut rng);
        }

        self.render();
    }

    fn update_speed(&mut self, multiplier: f32, now: Instant) {
        if let Some(eased) = self.ramp.evaluate(self.target_speed, now) {
            self.speed = eased;
        } else if multiplier > 0.0 {
            self.speed = smooth_toward(self.speed, self.target_speed, self.speed_adj_factor, multiplier);
        }
        if self.speed < 0.0 {
            self.speed = 0.0;
        }
    }

    fn render(&mut self) {
        // Surface not ready: skip this frame's draw, retry next tick.
        let Some(display) = self.painter.display_size() else {
            return;
        };
        if self.prev_display != Some(display) {
            let ratio = self.painter.pixel_ratio().max(f32::MIN_POSITIVE);
            let backing = PhysicalSize::new(
                (display.width.max(10) as f32 * ratio).round() as u32,
                (display.height.max(10) as f32 * ratio).round() as u32,
            );
            self.painter.resize(backing);
            self.prev_display = Some(display);
        }

        let backing = self.painter.backing_size();
        if backing.width == 0 || backing.height == 0 {
            return;
        }
        let width = backing.width as f32;
        let height = backing.height as f32;
        let size_scale = width.min(height) / (10.0 / self.star_size);
        let max_line_width = size_scale / 30.0;
        let round_cap = self.shape == StarShape::Circle;

        self.painter.clear(self.background_color);

        for star in &self.stars {
            let projected = star.lateral / star.depth;
            if !self.warp_effect
                && (projected.x < -0.5 || projected.x > 0.5 || projected.y < -0.5 || projected.y > 0.5)
            {
                continue;
            }

            let size = star.size * size_scale / star.depth;
            if size < MIN_POINT_SIZE {
                continue;
            }

            let alpha = if self.depth_fade {
                ((FAR_DEPTH - star.depth) / FAR_DEPTH).clamp(0.0, 1.0)
            } else {
                1.0
            };
            let color = Vec4::new(self.star_color.x, self.star_color.y, self.star_color.z, self.star_color.w * alpha);

            let head = Vec2::new(
                width * (projected.x + 0.5) - size * 0.5,
                height * (projected.y + 0.5) - size * 0.5,
            );

            if self.warp_effect {
                let tail_depth = star.depth + self.warp_effect_length * self.speed;
                let tail_projected = star.lateral / tail_depth;
                if tail_projected.x < -0.5
                    || tail_projected.x > 0.5
                    || tail_projected.y < -0.5
                    || tail_projected.y > 0.5
                {
                    continue;
                }
                let tail = Vec2::new(
                    width * (tail_projected.x + 0.5) - size * 0.5,
                    height * (tail_projected.y + 0.5) - size * 0.5,
                );
                self.painter.stroke_line(head, tail, size.min(max_line_width), round_cap, color);
            } else if self.shape == StarShape::Circle {
                self.painter.fill_circle(head, size * 0.5, color);
            } else {
                self.painter.fill_rect(head, Vec2::splat(size), color);
            }
        }
    }
}
