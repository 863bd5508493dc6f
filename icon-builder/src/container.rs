//! Windows ICO container encoding and parsing.
//!
//! Every entry carries a PNG payload. The directory stores one byte per edge,
//! where 0 stands for "256 or larger", so the PNG header is the authority for
//! the exact dimensions of large entries.

use crate::error::IconBuildError;
use crate::variant::{PixelLayout, Variant};
use std::io::Write;

const HEADER_LEN: usize = 6;
const ENTRY_LEN: usize = 16;
const RESOURCE_TYPE_ICON: u16 = 1;
const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// One image stored in the container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerEntry {
    width: u32,
    height: u32,
    bits_per_pixel: u16,
    data: Vec<u8>,
}

impl ContainerEntry {
    /// Encodes a variant as a PNG entry. The dimensions are taken from the
    /// variant itself.
    pub fn encode(variant: &Variant) -> Result<Self, IconBuildError> {
        let mut data = Vec::new();

        let mut encoder = png::Encoder::new(&mut data, variant.width(), variant.height());
        encoder.set_color(match variant.layout() {
            PixelLayout::Rgb => png::ColorType::Rgb,
            PixelLayout::Rgba => png::ColorType::Rgba,
        });
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_compression(png::Compression::Best);

        let mut writer = encoder.write_header()?;
        writer.write_image_data(variant.data())?;
        writer.finish()?;

        Ok(Self {
            width: variant.width(),
            height: variant.height(),
            bits_per_pixel: variant.layout().bits_per_pixel(),
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// 24 for opaque RGB entries, 32 for entries with alpha
    pub fn bits_per_pixel(&self) -> u16 {
        self.bits_per_pixel
    }

    /// The encoded image payload
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

/// A multi-image icon container
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IconContainer {
    entries: Vec<ContainerEntry>,
}

impl IconContainer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_entry(&mut self, entry: ContainerEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[ContainerEntry] {
        &self.entries
    }

    /// Looks up the square entry with the given edge length.
    pub fn entry(&self, size: u32) -> Option<&ContainerEntry> {
        self.entries
            .iter()
            .find(|e| e.width == size && e.height == size)
    }

    /// The dimensions of all entries, in directory order
    pub fn dimensions(&self) -> Vec<(u32, u32)> {
        self.entries.iter().map(|e| (e.width, e.height)).collect()
    }

    /// Serializes the container into memory.
    pub fn to_bytes(&self) -> Result<Vec<u8>, IconBuildError> {
        let count = u16::try_from(self.entries.len())
            .map_err(|_| IconBuildError::TooManyEntries(self.entries.len()))?;

        let payload_len: usize = self.entries.iter().map(|e| e.data.len()).sum();
        let mut out = Vec::with_capacity(HEADER_LEN + ENTRY_LEN * self.entries.len() + payload_len);

        // ICONDIR
        out.extend_from_slice(&0u16.to_le_bytes());
        out.extend_from_slice(&RESOURCE_TYPE_ICON.to_le_bytes());
        out.extend_from_slice(&count.to_le_bytes());

        // ICONDIRENTRY per image, payloads follow the directory in the same order
        let mut offset = HEADER_LEN + ENTRY_LEN * self.entries.len();
        for entry in &self.entries {
            let len = u32::try_from(entry.data.len())
                .map_err(|_| IconBuildError::PayloadTooLarge(entry.data.len()))?;
            let start = u32::try_from(offset)
                .map_err(|_| IconBuildError::PayloadTooLarge(offset))?;

            out.push(dimension_byte(entry.width));
            out.push(dimension_byte(entry.height));
            out.push(0); // color count
            out.push(0); // reserved
            out.extend_from_slice(&1u16.to_le_bytes()); // planes
            out.extend_from_slice(&entry.bits_per_pixel.to_le_bytes());
            out.extend_from_slice(&len.to_le_bytes());
            out.extend_from_slice(&start.to_le_bytes());

            offset += entry.data.len();
        }

        for entry in &self.entries {
            out.extend_from_slice(&entry.data);
        }

        Ok(out)
    }

    /// Serializes the container and writes it out in one piece.
    pub fn write(&self, mut writer: impl Write) -> Result<(), IconBuildError> {
        writer.write_all(&self.to_bytes()?)?;
        Ok(())
    }

    /// Reads a container back, resolving exact entry dimensions.
    pub fn parse(bytes: &[u8]) -> Result<Self, IconBuildError> {
        let header = slice(bytes, 0, HEADER_LEN)?;
        if read_u16(header, 0) != 0 {
            return Err(IconBuildError::InvalidHeader("reserved field is not zero"));
        }
        if read_u16(header, 2) != RESOURCE_TYPE_ICON {
            return Err(IconBuildError::InvalidHeader("not an icon resource"));
        }

        let count = read_u16(header, 4) as usize;
        let directory = slice(bytes, HEADER_LEN, ENTRY_LEN * count)?;

        let mut entries = Vec::with_capacity(count);
        for raw in directory.chunks_exact(ENTRY_LEN) {
            let bits_per_pixel = read_u16(raw, 6);
            let len = read_u32(raw, 8) as usize;
            let start = read_u32(raw, 12) as usize;
            let data = slice(bytes, start, len)?.to_vec();

            let (width, height) = match png_dimensions(&data) {
                Some((width, height)) => {
                    if !dimension_matches(raw[0], width) || !dimension_matches(raw[1], height) {
                        return Err(IconBuildError::InvalidHeader(
                            "directory size disagrees with the embedded image",
                        ));
                    }
                    (width, height)
                }
                None => (directory_dimension(raw[0]), directory_dimension(raw[1])),
            };

            entries.push(ContainerEntry {
                width,
                height,
                bits_per_pixel,
                data,
            });
        }

        Ok(Self { entries })
    }
}

fn dimension_byte(value: u32) -> u8 {
    if value >= 256 {
        0
    } else {
        value as u8
    }
}

fn directory_dimension(byte: u8) -> u32 {
    if byte == 0 {
        256
    } else {
        byte as u32
    }
}

fn dimension_matches(byte: u8, actual: u32) -> bool {
    byte == dimension_byte(actual)
}

/// Width and height from the IHDR chunk, if the payload is a PNG
fn png_dimensions(data: &[u8]) -> Option<(u32, u32)> {
    if !data.starts_with(&PNG_SIGNATURE) || data.len() < 24 || &data[12..16] != b"IHDR" {
        return None;
    }

    let width = u32::from_be_bytes([data[16], data[17], data[18], data[19]]);
    let height = u32::from_be_bytes([data[20], data[21], data[22], data[23]]);
    Some((width, height))
}

fn slice(bytes: &[u8], start: usize, len: usize) -> Result<&[u8], IconBuildError> {
    let end = start.saturating_add(len);
    bytes.get(start..end).ok_or(IconBuildError::Truncated {
        expected: end,
        found: bytes.len(),
    })
}

fn read_u16(bytes: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([bytes[at], bytes[at + 1]])
}

fn read_u32(bytes: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}
