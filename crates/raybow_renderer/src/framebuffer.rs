//! Sample accumulation and final 8-bit output.

use crate::bucket::BucketResult;
use raybow_math::{color_to_rgb8, Color};

/// Per-pixel running color sums and sample counts.
///
/// Pixels are row-major with row 0 at the top of the image.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    sums: Vec<Color>,
    counts: Vec<u32>,
}

impl FrameBuffer {
    /// Create a buffer with no samples.
    pub fn new(width: u32, height: u32) -> Self {
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            sums: vec![Color::ZERO; len],
            counts: vec![0; len],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        debug_assert!(x < self.width && y < self.height);
        y as usize * self.width as usize + x as usize
    }

    /// Add `samples` samples whose colors sum to `color_sum` to pixel (x, y).
    pub fn accumulate(&mut self, x: u32, y: u32, color_sum: Color, samples: u32) {
        let i = self.index(x, y);
        self.sums[i] += color_sum;
        self.counts[i] += samples;
    }

    /// Mean linear color of pixel (x, y); black before any sample lands.
    pub fn average(&self, x: u32, y: u32) -> Color {
        let i = self.index(x, y);
        match self.counts[i] {
            0 => Color::ZERO,
            n => self.sums[i] / n as f32,
        }
    }

    /// Samples accumulated into pixel (x, y).
    pub fn sample_count(&self, x: u32, y: u32) -> u32 {
        self.counts[self.index(x, y)]
    }

    /// Copy a finished bucket's per-pixel sums in.
    pub fn write_bucket(&mut self, result: &BucketResult, samples: u32) {
        let bucket = &result.bucket;
        let mut sums = result.pixels.iter();

        for y in bucket.y..bucket.y + bucket.height {
            for x in bucket.x..bucket.x + bucket.width {
                if let Some(sum) = sums.next() {
                    self.accumulate(x, y, *sum, samples);
                }
            }
        }
    }

    /// Gamma-encode every pixel to 8-bit RGB.
    pub fn finalize(self) -> RenderedImage {
        let mut pixels = Vec::with_capacity(self.sums.len() * 3);
        for (sum, count) in self.sums.iter().zip(&self.counts) {
            let average = if *count == 0 {
                Color::ZERO
            } else {
                *sum / *count as f32
            };
            pixels.extend_from_slice(&color_to_rgb8(average));
        }

        RenderedImage {
            width: self.width,
            height: self.height,
            pixels,
        }
    }
}

/// Final 8-bit RGB image, row-major, top row first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl RenderedImage {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// RGB bytes of pixel (x, y).
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let i = 3 * (y as usize * self.width as usize + x as usize);
        [self.pixels[i], self.pixels[i + 1], self.pixels[i + 2]]
    }

    /// Packed RGB bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.pixels
    }
}
