use std::path::Path;

use glam::Vec3;
use papillon_common::Resolution;

/// Errors from building or writing a frame.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("expected {expected} pixels for {width}x{height}, got {actual}")]
    ResolutionMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}

/// Linear RGB pixels in row-major order, row 0 at the top.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    resolution: Resolution,
    pixels: Vec<Vec3>,
}

impl Frame {
    /// A frame filled with one colour.
    pub fn filled(resolution: Resolution, color: Vec3) -> Self {
        Self {
            resolution,
            pixels: vec![color; resolution.pixel_count()],
        }
    }

    pub fn from_pixels(resolution: Resolution, pixels: Vec<Vec3>) -> Result<Self, FrameError> {
        if pixels.len() != resolution.pixel_count() {
            return Err(FrameError::ResolutionMismatch {
                width: resolution.width,
                height: resolution.height,
                expected: resolution.pixel_count(),
                actual: pixels.len(),
            });
        }
        Ok(Self { resolution, pixels })
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    pub fn pixels(&self) -> &[Vec3] {
        &self.pixels
    }

    pub(crate) fn pixels_mut(&mut self) -> &mut [Vec3] {
        &mut self.pixels
    }

    pub fn get(&self, column: u32, row: u32) -> Option<Vec3> {
        if column >= self.resolution.width || row >= self.resolution.height {
            return None;
        }
        self.pixels
            .get(row as usize * self.resolution.width as usize + column as usize)
            .copied()
    }

    /// Pixel rows, top first.
    pub fn rows(&self) -> impl Iterator<Item = &[Vec3]> {
        self.pixels.chunks(self.resolution.width.max(1) as usize)
    }

    /// Packed 8-bit RGB, clamping each channel to [0, 1] first.
    pub fn to_rgb8(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|c| {
                let c = c.clamp(Vec3::ZERO, Vec3::ONE) * 255.0;
                [c.x.round() as u8, c.y.round() as u8, c.z.round() as u8]
            })
            .collect()
    }

    /// Mean luminance of the frame, for quick sanity checks and logs.
    pub fn mean_luminance(&self) -> f32 {
        if self.pixels.is_empty() {
            return 0.0;
        }
        let total: f32 = self.pixels.iter().map(|&c| luminance(c)).sum();
        total / self.pixels.len() as f32
    }

    pub fn to_image(&self) -> Result<image::RgbImage, FrameError> {
        let Resolution { width, height } = self.resolution;
        image::RgbImage::from_raw(width, height, self.to_rgb8()).ok_or(
            FrameError::ResolutionMismatch {
                width,
                height,
                expected: self.resolution.pixel_count(),
                actual: self.pixels.len(),
            },
        )
    }

    /// Write the frame as a PNG, creating parent directories as needed.
    pub fn save_png(&self, path: &Path) -> Result<(), FrameError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        self.to_image()?
            .save_with_format(path, image::ImageFormat::Png)?;
        tracing::debug!(path = %path.display(), "frame written");
        Ok(())
    }
}

/// Rec. 709 luma.
#[inline]
pub fn luminance(c: Vec3) -> f32 {
    c.dot(Vec3::new(0.2126, 0.7152, 0.0722))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_wrong_pixel_count() {
        let err = Frame::from_pixels(Resolution::new(2, 2), vec![Vec3::ZERO; 3]).unwrap_err();
        assert!(matches!(
            err,
            FrameError::ResolutionMismatch {
                expected: 4,
                actual: 3,
                ..
            }
        ));
    }

    #[test]
    fn rgb8_clamps_channels() {
        let frame = Frame::from_pixels(
            Resolution::new(2, 1),
            vec![Vec3::new(2.0, -1.0, 0.5), Vec3::ONE],
        )
        .unwrap();
        assert_eq!(frame.to_rgb8(), vec![255, 0, 128, 255, 255, 255]);
    }

    #[test]
    fn get_is_row_major() {
        let res = Resolution::new(3, 2);
        let pixels = (0..6).map(|i| Vec3::splat(i as f32)).collect();
        let frame = Frame::from_pixels(res, pixels).unwrap();
        assert_eq!(frame.get(2, 1), Some(Vec3::splat(5.0)));
        assert_eq!(frame.get(3, 0), None);
        assert_eq!(frame.rows().count(), 2);
    }

    #[test]
    fn save_png_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frames").join("white.png");
        let frame = Frame::filled(Resolution::new(8, 4), Vec3::ONE);
        frame.save_png(&path).unwrap();

        let loaded = image::open(&path).unwrap().to_rgb8();
        assert_eq!(loaded.dimensions(), (8, 4));
        assert_eq!(loaded.get_pixel(3, 2).0, [255, 255, 255]);
    }

    #[test]
    fn luminance_of_white_is_one() {
        let frame = Frame::filled(Resolution::new(4, 4), Vec3::ONE);
        assert!((frame.mean_luminance() - 1.0).abs() < 1e-5);
    }
}
