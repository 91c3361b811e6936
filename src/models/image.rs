use image::DynamicImage;

/// Pixel layout of a [`RasterImage`] buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// 4 bytes per pixel, alpha ignored
    Rgba8,
    /// 3 bytes per pixel
    Rgb8,
    /// 1 byte per pixel, already luminance
    Gray8,
}

impl PixelFormat {
    /// Bytes per pixel for this format
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            PixelFormat::Rgba8 => 4,
            PixelFormat::Rgb8 => 3,
            PixelFormat::Gray8 => 1,
        }
    }
}

impl std::fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PixelFormat::Rgba8 => write!(f, "rgba8"),
            PixelFormat::Rgb8 => write!(f, "rgb8"),
            PixelFormat::Gray8 => write!(f, "gray8"),
        }
    }
}

/// Raster page image owned by the caller
///
/// The pipeline only ever reads from it; one image can back any number of
/// detection or sweep runs.
#[derive(Debug, Clone)]
pub struct RasterImage {
    /// Width in pixels
    pub width: usize,
    /// Height in pixels
    pub height: usize,
    /// Pixel layout of `data`
    pub format: PixelFormat,
    /// Raw pixel buffer, `width * height * bytes_per_pixel` long
    pub data: Vec<u8>,
}

impl RasterImage {
    /// Wrap an RGBA8 buffer
    pub fn from_rgba8(data: Vec<u8>, width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            format: PixelFormat::Rgba8,
            data,
        }
    }

    /// Wrap an RGB8 buffer
    pub fn from_rgb8(data: Vec<u8>, width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            format: PixelFormat::Rgb8,
            data,
        }
    }

    /// Wrap a grayscale buffer
    pub fn from_gray8(data: Vec<u8>, width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            format: PixelFormat::Gray8,
            data,
        }
    }

    /// Number of pixels
    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    /// Expected buffer length for the dimensions and format
    pub fn expected_len(&self) -> usize {
        self.pixel_count() * self.format.bytes_per_pixel()
    }
}

impl From<&DynamicImage> for RasterImage {
    fn from(img: &DynamicImage) -> Self {
        let rgba = img.to_rgba8();
        let (width, height) = (rgba.width() as usize, rgba.height() as usize);
        RasterImage::from_rgba8(rgba.into_raw(), width, height)
    }
}
