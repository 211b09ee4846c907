//! PNG scatter rendering of grid snapshots.
//!
//! Each live cell is drawn as a filled dot inside a framed plot area whose
//! axes span `[0, domain_size]`, with y growing upwards as in a scatter plot.

use image::{ImageBuffer, Rgba, RgbaImage};
use life_env::{EnvError, FrameRenderer, ScatterFrame};
use std::path::PathBuf;

/// Default output file.
pub const DEFAULT_IMAGE_PATH: &str = "grid.png";

/// Default canvas side in pixels.
pub const DEFAULT_IMAGE_SIZE: u32 = 400;

const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);
const FRAME: Rgba<u8> = Rgba([90, 90, 90, 255]);
const POINT: Rgba<u8> = Rgba([31, 119, 180, 255]);

/// Writes each frame to a PNG file, replacing the previous one.
pub struct PngScatterRenderer {
    path: PathBuf,
    image_size: u32,
}

impl PngScatterRenderer {
    pub fn new(path: impl Into<PathBuf>, image_size: u32) -> Self {
        Self {
            path: path.into(),
            image_size,
        }
    }

    /// Draws a frame into an in-memory image.
    pub fn draw(&self, frame: &ScatterFrame) -> Result<RgbaImage, EnvError> {
        if frame.domain_size == 0 {
            return Err(EnvError::render("domain size must be positive"));
        }
        let margin = (self.image_size / 20).max(2);
        if self.image_size <= 2 * margin + 1 {
            return Err(EnvError::render(format!(
                "image size {} too small for a plot",
                self.image_size
            )));
        }

        let mut img: RgbaImage = ImageBuffer::from_pixel(self.image_size, self.image_size, BACKGROUND);
        let plot = self.image_size - 2 * margin;
        let scale = plot as f64 / frame.domain_size as f64;
        let radius = (scale * 0.4).max(1.0) as i64;

        draw_frame(&mut img, margin, margin + plot);

        for &(x, y) in &frame.points {
            if x < 0 || y < 0 || x as i64 > frame.domain_size as i64 || y as i64 > frame.domain_size as i64 {
                continue;
            }
            let px = margin as f64 + x as f64 * scale;
            let py = (margin + plot) as f64 - y as f64 * scale;
            fill_dot(&mut img, px as i64, py as i64, radius, POINT);
        }

        Ok(img)
    }
}

impl FrameRenderer for PngScatterRenderer {
    fn render(&self, frame: &ScatterFrame) -> Result<(), EnvError> {
        let img = self.draw(frame)?;
        img.save(&self.path).map_err(EnvError::render)
    }

    fn target(&self) -> String {
        self.path.display().to_string()
    }
}

/// Axis box around the plot area.
fn draw_frame(img: &mut RgbaImage, lo: u32, hi: u32) {
    for i in lo..=hi {
        img.put_pixel(i, lo, FRAME);
        img.put_pixel(i, hi, FRAME);
        img.put_pixel(lo, i, FRAME);
        img.put_pixel(hi, i, FRAME);
    }
}

/// Filled disc clipped to the canvas.
fn fill_dot(img: &mut RgbaImage, cx: i64, cy: i64, r: i64, color: Rgba<u8>) {
    let (w, h) = (img.width() as i64, img.height() as i64);
    for dy in -r..=r {
        for dx in -r..=r {
            if dx * dx + dy * dy > r * r {
                continue;
            }
            let (x, y) = (cx + dx, cy + dy);
            if (0..w).contains(&x) && (0..h).contains(&y) {
                img.put_pixel(x as u32, y as u32, color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draw_places_points() {
        let renderer = PngScatterRenderer::new("unused.png", 200);
        let frame = ScatterFrame::new(0, 10, vec![(0, 0), (5, 5)]);
        let img = renderer.draw(&frame).unwrap();

        // margin 10, plot 180, scale 18: (5, 5) lands at (100, 100)
        assert_eq!(*img.get_pixel(100, 100), POINT);
        assert_eq!(*img.get_pixel(10, 190), POINT);
        assert_eq!(*img.get_pixel(150, 50), BACKGROUND);
    }

    #[test]
    fn test_draw_rejects_degenerate_input() {
        let renderer = PngScatterRenderer::new("unused.png", 200);
        assert!(renderer.draw(&ScatterFrame::new(0, 0, vec![])).is_err());

        let tiny = PngScatterRenderer::new("unused.png", 4);
        assert!(tiny.draw(&ScatterFrame::new(0, 10, vec![])).is_err());
    }

    #[test]
    fn test_render_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grid.png");
        let renderer = PngScatterRenderer::new(&path, 64);

        renderer
            .render(&ScatterFrame::new(3, 10, vec![(1, 1), (2, 8)]))
            .unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
    }

    #[test]
    fn test_render_to_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = PngScatterRenderer::new(dir.path().join("nope/grid.png"), 64);
        assert!(matches!(
            renderer.render(&ScatterFrame::new(0, 10, vec![])),
            Err(EnvError::Render(_))
        ));
    }
}
