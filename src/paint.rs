use anyhow::{anyhow, Context, Result};
use glam::{Vec2, Vec4};
use std::path::Path;
use winit::dpi::PhysicalSize;

/// Drawable surface seam for the starfield engine.
///
/// The engine owns its painter exclusively and drives it once per tick. A
/// painter whose context is not ready reports `None` from `display_size`;
/// the engine skips that frame's draw and retries on the next tick, so a
/// late surface is never fatal.
///
/// Colors are linear RGBA in [0, 1]; the alpha channel carries the depth
/// fade.
pub trait StarPainter {
    /// Displayed (logical) surface size, or `None` while the surface is not
    /// ready.
    fn display_size(&self) -> Option<PhysicalSize<u32>>;

    /// Ratio between backing-store pixels and logical display units.
    fn pixel_ratio(&self) -> f32 {
        1.0
    }

    /// Reallocates the backing store. Called by the engine only when the
    /// displayed size actually changed between frames.
    fn resize(&mut self, backing: PhysicalSize<u32>);

    /// Current backing-store resolution; all draw coordinates are in this
    /// space.
    fn backing_size(&self) -> PhysicalSize<u32>;

    fn clear(&mut self, color: Vec4);

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Vec4);

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Vec4);

    /// Streak segment. `round_cap` matches the circle point shape; square
    /// points use butt caps.
    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, round_cap: bool, color: Vec4);
}

/// CPU-side RGBA8 painter backing the capture binary and the render tests.
pub struct Pixmap {
    display: PhysicalSize<u32>,
    backing: PhysicalSize<u32>,
    pixel_ratio: f32,
    pixels: Vec<u8>,
}

impl Pixmap {
    pub fn new(display: PhysicalSize<u32>) -> Self {
        let mut pixmap =
            Self { display, backing: PhysicalSize::new(0, 0), pixel_ratio: 1.0, pixels: Vec::new() };
        pixmap.resize(display);
        pixmap
    }

    pub fn with_pixel_ratio(display: PhysicalSize<u32>, pixel_ratio: f32) -> Self {
        let mut pixmap = Self::new(display);
        pixmap.pixel_ratio = pixel_ratio.max(0.1);
        pixmap
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// RGBA of the pixel at (x, y) in backing coordinates.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.backing.width || y >= self.backing.height {
            return None;
        }
        let offset = ((y * self.backing.width + x) * 4) as usize;
        self.pixels[offset..offset + 4].try_into().ok()
    }

    pub fn encode_png(&self) -> Result<Vec<u8>> {
        let image = image::RgbaImage::from_raw(self.backing.width, self.backing.height, self.pixels.clone())
            .ok_or_else(|| anyhow!("pixmap buffer does not match {}x{}", self.backing.width, self.backing.height))?;
        let mut bytes = Vec::new();
        image
            .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .context("Encoding pixmap as PNG")?;
        Ok(bytes)
    }

    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let bytes = self.encode_png()?;
        std::fs::write(path, bytes).with_context(|| format!("Writing {}", path.display()))
    }

    fn blend_pixel(&mut self, x: i32, y: i32, color: Vec4) {
        if x < 0 || y < 0 || x as u32 >= self.backing.width || y as u32 >= self.backing.height {
            return;
        }
        let alpha = color.w.clamp(0.0, 1.0);
        if alpha <= 0.0 {
            return;
        }
        let offset = ((y as u32 * self.backing.width + x as u32) * 4) as usize;
        for (channel, src) in [color.x, color.y, color.z].into_iter().enumerate() {
            let dst = self.pixels[offset + channel] as f32 / 255.0;
            let blended = src.clamp(0.0, 1.0) * alpha + dst * (1.0 - alpha);
            self.pixels[offset + channel] = (blended * 255.0).round() as u8;
        }
        let dst_a = self.pixels[offset + 3] as f32 / 255.0;
        let out_a = alpha + dst_a * (1.0 - alpha);
        self.pixels[offset + 3] = (out_a * 255.0).round() as u8;
    }

    fn fill_span(&mut self, min: Vec2, max: Vec2, color: Vec4, mut covered: impl FnMut(Vec2) -> bool) {
        let x0 = min.x.floor() as i32;
        let y0 = min.y.floor() as i32;
        let x1 = max.x.ceil() as i32;
        let y1 = max.y.ceil() as i32;
        for y in y0..=y1 {
            for x in x0..=x1 {
                let sample = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                if covered(sample) {
                    self.blend_pixel(x, y, color);
                }
            }
        }
    }
}

impl StarPainter for Pixmap {
    fn display_size(&self) -> Option<PhysicalSize<u32>> {
        Some(self.display)
    }

    fn pixel_ratio(&self) -> f32 {
        self.pixel_ratio
    }

    fn resize(&mut self, backing: PhysicalSize<u32>) {
        self.backing = backing;
        self.pixels = vec![0; (backing.width as usize) * (backing.height as usize) * 4];
    }

    fn backing_size(&self) -> PhysicalSize<u32> {
        self.backing
    }

    fn clear(&mut self, color: Vec4) {
        let rgba = [
            (color.x.clamp(0.0, 1.0) * 255.0).round() as u8,
            (color.y.clamp(0.0, 1.0) * 255.0).round() as u8,
            (color.z.clamp(0.0, 1.0) * 255.0).round() as u8,
            (color.w.clamp(0.0, 1.0) * 255.0).round() as u8,
        ];
        for pixel in self.pixels.chunks_exact_mut(4) {
            pixel.copy_from_slice(&rgba);
        }
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Vec4) {
        if radius <= 0.0 {
            return;
        }
        let r2 = radius * radius;
        self.fill_span(center - Vec2::splat(radius), center + Vec2::splat(radius), color, |sample| {
            (sample - center).length_squared() <= r2
        });
    }

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Vec4) {
        if size.x <= 0.0 || size.y <= 0.0 {
            return;
        }
        let max = origin + size;
        self.fill_span(origin, max, color, |sample| {
            sample.x >= origin.x && sample.x < max.x && sample.y >= origin.y && sample.y < max.y
        });
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, round_cap: bool, color: Vec4) {
        let half = (width * 0.5).max(0.5);
        let delta = to - from;
        let len2 = delta.length_squared();
        if len2 <= f32::EPSILON {
            if round_cap {
                self.fill_circle(from, half, color);
            }
            return;
        }
        let min = from.min(to) - Vec2::splat(half);
        let max = from.max(to) + Vec2::splat(half);
        self.fill_span(min, max, color, |sample| {
            let t = (sample - from).dot(delta) / len2;
            if round_cap {
                let closest = from + delta * t.clamp(0.0, 1.0);
                (sample - closest).length_squared() <= half * half
            } else {
                if !(0.0..=1.0).contains(&t) {
                    return false;
                }
                let closest = from + delta * t;
                (sample - closest).length_squared() <= half * half
            }
        });
    }
}
