use ndarray::{ArrayView3, ArrayViewMut3};

use crate::shared::region::FaceRegion;

/// A single captured color frame: contiguous interleaved bytes in row-major order.
///
/// Supports 1 (gray), 3 (RGB) or 4 (RGBA) channels. The luminance image the
/// detectors consume is derived from it per call, see [`LumaImage::fill_from`].
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    channels: u8,
    index: usize,
}

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, channels: u8, index: usize) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * (channels as usize),
            "data length must equal width * height * channels"
        );
        Self {
            data,
            width,
            height,
            channels,
            index,
        }
    }

    /// Frame filled with a single color (one value per channel).
    pub fn filled(width: u32, height: u32, pixel: &[u8], index: usize) -> Self {
        let pixels = (width as usize) * (height as usize);
        let data = pixel.iter().copied().cycle().take(pixels * pixel.len()).collect();
        Self::new(data, width, height, pixel.len() as u8, index)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn as_ndarray(&self) -> ArrayView3<'_, u8> {
        ArrayView3::from_shape(self.shape(), &self.data)
            .expect("Frame data length must match dimensions")
    }

    pub fn as_ndarray_mut(&mut self) -> ArrayViewMut3<'_, u8> {
        ArrayViewMut3::from_shape(self.shape(), &mut self.data)
            .expect("Frame data length must match dimensions")
    }

    fn shape(&self) -> (usize, usize, usize) {
        (
            self.height as usize,
            self.width as usize,
            self.channels as usize,
        )
    }
}

/// Single-channel luminance image, the representation detectors search.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LumaImage {
    data: Vec<u8>,
    width: u32,
    height: u32,
}

impl LumaImage {
    pub fn new(data: Vec<u8>, width: u32, height: u32) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize),
            "data length must equal width * height"
        );
        Self {
            data,
            width,
            height,
        }
    }

    /// Zeroed buffer sized for a stream, reused across frames.
    pub fn with_size(width: u32, height: u32) -> Self {
        Self::new(vec![0; width as usize * height as usize], width, height)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Converts `frame` into this buffer, reallocating only when the
    /// dimensions differ. Uses BT.601 integer weights.
    ///
    /// Returns the unsupported channel count on failure.
    pub fn fill_from(&mut self, frame: &Frame) -> Result<(), u8> {
        let channels = frame.channels();
        if !matches!(channels, 1 | 3 | 4) {
            return Err(channels);
        }
        let len = frame.width() as usize * frame.height() as usize;
        self.data.resize(len, 0);
        self.width = frame.width();
        self.height = frame.height();

        if channels == 1 {
            self.data.copy_from_slice(frame.data());
            return Ok(());
        }
        for (dst, px) in self
            .data
            .iter_mut()
            .zip(frame.data().chunks_exact(channels as usize))
        {
            let (r, g, b) = (px[0] as u32, px[1] as u32, px[2] as u32);
            *dst = ((77 * r + 150 * g + 29 * b + 128) >> 8) as u8;
        }
        Ok(())
    }

    /// Copies the pixels under `region` into a new image.
    ///
    /// The region must lie inside the image; callers clip first.
    pub fn crop(&self, region: &FaceRegion) -> Option<LumaImage> {
        let inside = region.x >= 0
            && region.y >= 0
            && region.width > 0
            && region.height > 0
            && region.right() <= self.width as i32
            && region.bottom() <= self.height as i32;
        if !inside {
            return None;
        }
        let (x, y) = (region.x as usize, region.y as usize);
        let (w, h) = (region.width as usize, region.height as usize);
        let stride = self.width as usize;
        let mut data = Vec::with_capacity(w * h);
        for row in y..y + h {
            data.extend_from_slice(&self.data[row * stride + x..row * stride + x + w]);
        }
        Some(LumaImage::new(data, w as u32, h as u32))
    }
}
