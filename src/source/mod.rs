//! Pixel sources feeding voxel generation.

use std::path::Path;

use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbImage};

use crate::color::Rgb;
use crate::core::types::Result;

/// Bounded pixel sampling by integer coordinate.
pub trait PixelSource {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Color at `(x, y)`, clamped to the image bounds.
    fn sample(&self, x: i64, y: i64) -> Rgb;
}

/// Decoded RGB image backed by the `image` crate.
#[derive(Clone, Debug)]
pub struct ImageSource {
    image: RgbImage,
}

impl ImageSource {
    pub fn new(image: RgbImage) -> Self {
        Self { image }
    }

    /// Decode an image file. Alpha is discarded.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let image = image::open(path)?;
        log::info!("Loaded {} ({}x{})", path.display(), image.width(), image.height());
        Ok(Self::from_dynamic(image))
    }

    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self::new(image.to_rgb8())
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    /// Largest aspect-preserving size that fits in `max_width` x `max_height`
    /// without upscaling.
    pub fn fitted_size(&self, max_width: f32, max_height: f32) -> (u32, u32) {
        let (w, h) = (self.image.width() as f32, self.image.height() as f32);
        if w == 0.0 || h == 0.0 {
            return (0, 0);
        }
        let aspect = w / h;

        let (target_w, target_h) = if aspect > 1.0 {
            let mut tw = max_width.min(w);
            let mut th = tw / aspect;
            if th > max_height {
                th = max_height;
                tw = th * aspect;
            }
            (tw, th)
        } else {
            let mut th = max_height.min(h);
            let mut tw = th * aspect;
            if tw > max_width {
                tw = max_width;
                th = tw / aspect;
            }
            (tw, th)
        };

        ((target_w.floor() as u32).max(1), (target_h.floor() as u32).max(1))
    }

    /// Resized copy that fits the given bounds.
    pub fn fit_within(&self, max_width: f32, max_height: f32) -> Self {
        let (w, h) = self.fitted_size(max_width, max_height);
        if (w, h) == self.image.dimensions() || w == 0 || h == 0 {
            return self.clone();
        }
        log::debug!(
            "Resizing image {}x{} -> {}x{}",
            self.image.width(),
            self.image.height(),
            w,
            h
        );
        Self::new(imageops::resize(&self.image, w, h, FilterType::Triangle))
    }
}

impl PixelSource for ImageSource {
    fn width(&self) -> u32 {
        self.image.width()
    }

    fn height(&self) -> u32 {
        self.image.height()
    }

    fn sample(&self, x: i64, y: i64) -> Rgb {
        if self.image.width() == 0 || self.image.height() == 0 {
            return Rgb::BLACK;
        }
        let x = x.clamp(0, self.image.width() as i64 - 1) as u32;
        let y = y.clamp(0, self.image.height() as i64 - 1) as u32;
        Rgb::from(*self.image.get_pixel(x, y))
    }
}

impl From<RgbImage> for ImageSource {
    fn from(image: RgbImage) -> Self {
        Self::new(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn gradient(w: u32, h: u32) -> ImageSource {
        ImageSource::new(RgbImage::from_fn(w, h, |x, y| {
            image::Rgb([x as u8, y as u8, 0])
        }))
    }

    #[test]
    fn test_sample_in_bounds() {
        let source = gradient(10, 5);
        assert_eq!(source.sample(3, 2), Rgb::new(3, 2, 0));
    }

    #[test]
    fn test_sample_clamps() {
        let source = gradient(10, 5);
        assert_eq!(source.sample(-4, -1), Rgb::new(0, 0, 0));
        assert_eq!(source.sample(100, 100), Rgb::new(9, 4, 0));
    }

    #[test]
    fn test_fitted_size_landscape() {
        let source = gradient(200, 100);
        assert_eq!(source.fitted_size(100.0, 100.0), (100, 50));
        // Height-limited
        assert_eq!(source.fitted_size(1000.0, 20.0), (40, 20));
    }

    #[test]
    fn test_fitted_size_portrait_no_upscale() {
        let source = gradient(50, 100);
        assert_eq!(source.fitted_size(640.0, 480.0), (50, 100));
        assert_eq!(source.fitted_size(20.0, 480.0), (20, 40));
    }

    #[test]
    fn test_fit_within_resizes() {
        let source = gradient(200, 100);
        let fitted = source.fit_within(100.0, 100.0);
        assert_eq!((fitted.width(), fitted.height()), (100, 50));
    }

    #[test]
    fn test_open_png() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tiny.png");
        RgbImage::from_pixel(4, 3, image::Rgb([9, 8, 7])).save(&path).unwrap();

        let source = ImageSource::open(&path).unwrap();
        assert_eq!((source.width(), source.height()), (4, 3));
        assert_eq!(source.sample(1, 1), Rgb::new(9, 8, 7));
    }
}
