//! Owned image buffers passed between pipeline stages.
//!
//! A [`Frame`] is immutable once built: stages read it through shared
//! references and hand a freshly allocated frame to the next stage instead of
//! mutating the one they were given.

use crate::error::PipelineError;

/// Pixel layout of a frame buffer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    #[default]
    Unknown,
    Grayscale8,
    Rgb8,
    Bgr8,
    Rgba8,
    Bgra8,
    /// Three-channel `f32` samples in native endianness. Despite the name the
    /// samples are interleaved (HWC), one pixel's channels next to each other.
    Float32Planar,
}

impl PixelFormat {
    /// Number of channels per pixel, zero for [`PixelFormat::Unknown`].
    pub fn channels(self) -> usize {
        match self {
            PixelFormat::Unknown => 0,
            PixelFormat::Grayscale8 => 1,
            PixelFormat::Rgb8 | PixelFormat::Bgr8 | PixelFormat::Float32Planar => 3,
            PixelFormat::Rgba8 | PixelFormat::Bgra8 => 4,
        }
    }

    /// Bytes occupied by a single pixel.
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Float32Planar => self.channels() * std::mem::size_of::<f32>(),
            other => other.channels(),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PixelFormat::Unknown => "unknown",
            PixelFormat::Grayscale8 => "gray8",
            PixelFormat::Rgb8 => "rgb8",
            PixelFormat::Bgr8 => "bgr8",
            PixelFormat::Rgba8 => "rgba8",
            PixelFormat::Bgra8 => "bgra8",
            PixelFormat::Float32Planar => "f32-planar",
        }
    }
}

/// Single image or video frame: dimensions, pixel format, and owned bytes.
///
/// The buffer is either empty (sentinel frame) or holds at least
/// [`Frame::min_bytes`] bytes for the declared dimensions and format.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Frame {
    width: u32,
    height: u32,
    format: PixelFormat,
    data: Vec<u8>,
}

impl Frame {
    /// Build a frame, rejecting non-empty buffers that are too small for the
    /// declared dimensions and dimensions whose byte size overflows `usize`.
    pub fn new(
        width: u32,
        height: u32,
        format: PixelFormat,
        data: Vec<u8>,
    ) -> Result<Self, PipelineError> {
        let required = Self::required_bytes(width, height, format)?;
        if !data.is_empty() && data.len() < required {
            return Err(PipelineError::InvalidFrame(format!(
                "{width}x{height} {} frame needs {required} bytes, got {}",
                format.label(),
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            format,
            data,
        })
    }

    /// Sentinel frame with no pixels.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Zero-filled frame sized exactly for the given dimensions and format.
    pub fn zeroed(
        width: u32,
        height: u32,
        format: PixelFormat,
    ) -> Result<Self, PipelineError> {
        let len = Self::required_bytes(width, height, format)?;
        Ok(Self {
            width,
            height,
            format,
            data: vec![0; len],
        })
    }

    /// Minimum byte count required for the given dimensions and format, or
    /// `None` when it does not fit in `usize`.
    pub fn min_bytes(width: u32, height: u32, format: PixelFormat) -> Option<usize> {
        (width as usize)
            .checked_mul(height as usize)?
            .checked_mul(format.bytes_per_pixel())
    }

    fn required_bytes(
        width: u32,
        height: u32,
        format: PixelFormat,
    ) -> Result<usize, PipelineError> {
        Self::min_bytes(width, height, format).ok_or_else(|| {
            PipelineError::InvalidFrame(format!(
                "{width}x{height} {} frame is too large to address",
                format.label()
            ))
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Read-only view of the pixel bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Pixel bytes trimmed to exactly [`Frame::min_bytes`].
    pub fn pixels(&self) -> &[u8] {
        let len = Self::min_bytes(self.width, self.height, self.format)
            .map_or(self.data.len(), |required| required.min(self.data.len()));
        &self.data[..len]
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }

    /// Decode a [`PixelFormat::Float32Planar`] buffer into samples.
    pub fn to_f32_samples(&self) -> Result<Vec<f32>, PipelineError> {
        if self.format != PixelFormat::Float32Planar {
            return Err(PipelineError::InvalidFrame(format!(
                "expected f32-planar frame, got {}",
                self.format.label()
            )));
        }
        Ok(self
            .pixels()
            .chunks_exact(4)
            .map(|chunk| f32::from_ne_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect())
    }

    /// Release the buffer to the caller.
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}
