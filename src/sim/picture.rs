//! Image round trip.
//!
//! The pixels of an image are sent as a byte stream (three bytes per pixel,
//! row by row) once uncoded and once coded, and each result is rebuilt into
//! an image of the original width and height so the two can be compared.

use crate::ecc::{Codec, Error, NoisyChannel, Result};
use crate::sim::stream::{run_rgb, StreamReport};
use image::RgbImage;
use log::info;
use rand::Rng;
use std::path::{Path, PathBuf};

/// Both received versions of an image.
#[derive(Debug, Clone)]
pub struct ImageReport {
    /// Pixels sent without coding
    pub uncoded: RgbImage,
    /// Pixels sent encoded and decoded
    pub coded: RgbImage,
    /// Error counts of the underlying byte stream
    pub stream: StreamReport,
}

impl ImageReport {
    /// Writes both images; the format follows each path's extension.
    pub fn save(&self, uncoded_path: &Path, coded_path: &Path) -> Result<()> {
        self.uncoded.save(uncoded_path)?;
        self.coded.save(coded_path)?;
        info!(
            "Wrote {} and {}",
            uncoded_path.display(),
            coded_path.display()
        );
        Ok(())
    }
}

/// Opens an image file of any supported format as 8-bit RGB.
pub fn load_image(path: &Path) -> Result<RgbImage> {
    Ok(image::open(path)?.to_rgb8())
}

/// Default output paths next to `path`: `<stem>.uncoded.bmp` and `<stem>.coded.bmp`.
pub fn comparison_paths(path: &Path) -> (PathBuf, PathBuf) {
    (
        path.with_extension("uncoded.bmp"),
        path.with_extension("coded.bmp"),
    )
}

/// Sends the pixels of `image` uncoded and coded through the same channel.
pub fn run_image<R: Rng>(
    image: &RgbImage,
    codec: &Codec,
    channel: &mut NoisyChannel<R>,
) -> Result<ImageReport> {
    let (width, height) = image.dimensions();
    let stream = run_rgb(image.as_raw(), codec, channel)?;

    let rebuild = |bytes: &[u8]| {
        RgbImage::from_raw(width, height, bytes.to_vec()).ok_or_else(|| {
            Error::InvariantViolation(format!(
                "{} received bytes do not fill a {}x{} image",
                bytes.len(),
                width,
                height
            ))
        })
    };

    Ok(ImageReport {
        uncoded: rebuild(&stream.uncoded.bytes)?,
        coded: rebuild(&stream.coded.bytes)?,
        stream,
    })
}
