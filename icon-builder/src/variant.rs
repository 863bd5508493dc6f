use crate::error::IconBuildError;
use image::imageops::{self, FilterType};
use image::{ColorType, DynamicImage, RgbImage, RgbaImage};

/// How the source image is prepared before it is resampled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Normalization {
    /// Keep the decoded color mode, retaining the alpha channel where present
    Preserve,

    /// Discard any alpha channel and store every variant as 8-bit RGB
    ForceOpaque,
}

/// The pixel layout a variant is stored in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelLayout {
    Rgb,
    Rgba,
}

impl PixelLayout {
    /// Picks the layout for a decoded color mode. Any mode with an alpha
    /// channel keeps it unless the source is forced opaque.
    pub fn for_color(color: ColorType, normalization: Normalization) -> Self {
        match normalization {
            Normalization::Preserve if color.has_alpha() => Self::Rgba,
            Normalization::Preserve | Normalization::ForceOpaque => Self::Rgb,
        }
    }

    pub fn channels(self) -> usize {
        match self {
            Self::Rgb => 3,
            Self::Rgba => 4,
        }
    }

    pub fn bits_per_pixel(self) -> u16 {
        self.channels() as u16 * 8
    }
}

enum Pixels {
    Rgb(RgbImage),
    Rgba(RgbaImage),
}

/// A source image converted into the layout all of its variants share
pub struct PreparedSource {
    pixels: Pixels,
}

impl PreparedSource {
    pub fn new(source: &DynamicImage, normalization: Normalization) -> Result<Self, IconBuildError> {
        if source.width() == 0 || source.height() == 0 {
            return Err(IconBuildError::InvalidDimensions {
                width: source.width(),
                height: source.height(),
            });
        }

        let pixels = match PixelLayout::for_color(source.color(), normalization) {
            PixelLayout::Rgb => Pixels::Rgb(source.to_rgb8()),
            PixelLayout::Rgba => Pixels::Rgba(source.to_rgba8()),
        };

        Ok(Self { pixels })
    }

    pub fn layout(&self) -> PixelLayout {
        match self.pixels {
            Pixels::Rgb(_) => PixelLayout::Rgb,
            Pixels::Rgba(_) => PixelLayout::Rgba,
        }
    }

    /// Resamples the source to a `size`x`size` square using Lanczos3.
    pub fn resize(&self, size: u32) -> Result<Variant, IconBuildError> {
        if size == 0 {
            return Err(IconBuildError::InvalidDimensions {
                width: size,
                height: size,
            });
        }

        let ((width, height), data) = match &self.pixels {
            Pixels::Rgb(image) => {
                let resized = imageops::resize(image, size, size, FilterType::Lanczos3);
                (resized.dimensions(), resized.into_raw())
            }
            Pixels::Rgba(image) => {
                let resized = imageops::resize(image, size, size, FilterType::Lanczos3);
                (resized.dimensions(), resized.into_raw())
            }
        };

        Ok(Variant {
            width,
            height,
            layout: self.layout(),
            data,
        })
    }

    /// Produces one variant per size, in the order given.
    pub fn render_all(&self, sizes: &[u32]) -> Result<Vec<Variant>, IconBuildError> {
        sizes.iter().map(|size| self.resize(*size)).collect()
    }
}

/// One resized copy of the source image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    width: u32,
    height: u32,
    layout: PixelLayout,
    data: Vec<u8>,
}

impl Variant {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn layout(&self) -> PixelLayout {
        self.layout
    }

    /// Raw row-major pixel data in the variant's layout
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}
