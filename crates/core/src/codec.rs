//! File boundary: decoding and encoding buffers through the `image` crate.
//!
//! Feature-gated behind `codec` (default on). Only pixel types that can
//! round-trip through 8-bit RGBA ([`RgbaPixel`]) are supported.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, RgbaImage};
use serde::{Deserialize, Serialize};

use crate::buffer::PixelBuffer;
use crate::error::RasterError;
use crate::pixel::RgbaPixel;

/// Output file format for [`PixelBuffer::write_file`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageFormat {
    #[default]
    Png,
    Jpeg,
}

impl ImageFormat {
    /// Picks the format from a path extension, if recognized.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "png" => Some(ImageFormat::Png),
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            _ => None,
        }
    }
}

fn codec_err(e: image::ImageError) -> RasterError {
    match e {
        image::ImageError::IoError(io) => RasterError::Io(io.to_string()),
        other => RasterError::Codec(other.to_string()),
    }
}

impl<T: RgbaPixel> PixelBuffer<T> {
    /// Decodes an image file into a new buffer.
    pub fn create_from_file(path: impl AsRef<Path>) -> Result<Self, RasterError> {
        let path = path.as_ref();
        let img = image::open(path).map_err(codec_err)?.to_rgba8();
        let (w, h) = img.dimensions();
        let data = img.pixels().map(|p| T::from_rgba8(p.0)).collect();
        tracing::debug!(path = %path.display(), width = w, height = h, "decoded image");
        PixelBuffer::from_data(w as usize, h as usize, data)
    }

    /// Encodes the buffer to `path`. `quality` (1-100, clamped) only
    /// affects JPEG output.
    pub fn write_file(
        &self,
        path: impl AsRef<Path>,
        format: ImageFormat,
        quality: u8,
    ) -> Result<(), RasterError> {
        let path = path.as_ref();
        let w = u32::try_from(self.width())
            .map_err(|_| RasterError::InvalidDimensions("width exceeds u32".into()))?;
        let h = u32::try_from(self.height())
            .map_err(|_| RasterError::InvalidDimensions("height exceeds u32".into()))?;
        if w == 0 || h == 0 {
            return Err(RasterError::InvalidDimensions(format!(
                "cannot encode a {w}x{h} image"
            )));
        }
        let rgba: Vec<u8> = self.data().iter().flat_map(RgbaPixel::to_rgba8).collect();
        let img = RgbaImage::from_raw(w, h, rgba)
            .ok_or_else(|| RasterError::Codec("RGBA buffer size mismatch".into()))?;

        match format {
            ImageFormat::Png => img
                .save_with_format(path, image::ImageFormat::Png)
                .map_err(codec_err)?,
            ImageFormat::Jpeg => {
                let file = File::create(path).map_err(|e| RasterError::Io(e.to_string()))?;
                let rgb = DynamicImage::ImageRgba8(img).to_rgb8();
                JpegEncoder::new_with_quality(BufWriter::new(file), quality.clamp(1, 100))
                    .encode_image(&rgb)
                    .map_err(codec_err)?;
            }
        }
        tracing::debug!(path = %path.display(), ?format, "wrote image");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixel::Argb;
    use glam::Vec3;

    #[test]
    fn png_round_trip_preserves_pixels() {
        let data = (0..12u32)
            .map(|i| Argb::from_channels(255, (i * 20) as u8, 7, (255 - i * 10) as u8))
            .collect();
        let buf = PixelBuffer::from_data(4, 3, data).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("round.png");

        buf.write_file(&path, ImageFormat::Png, 100).unwrap();
        let back = PixelBuffer::<Argb>::create_from_file(&path).unwrap();
        assert_eq!(back.dim(), (4, 3));
        assert_eq!(back.data(), buf.data());
    }

    #[test]
    fn jpeg_writes_decodable_file() {
        let buf = PixelBuffer::filled(16, 8, Vec3::new(0.2, 0.6, 0.9)).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.jpg");

        buf.write_file(&path, ImageFormat::Jpeg, 90).unwrap();
        let back = PixelBuffer::<Vec3>::create_from_file(&path).unwrap();
        assert_eq!(back.dim(), (16, 8));
        let v = back.get(8, 4).unwrap();
        assert!((v - Vec3::new(0.2, 0.6, 0.9)).abs().max_element() < 0.05, "got {v:?}");
    }

    #[test]
    fn empty_buffer_cannot_be_encoded() {
        let buf = PixelBuffer::<Argb>::empty();
        let dir = tempfile::tempdir().unwrap();
        let result = buf.write_file(dir.path().join("x.png"), ImageFormat::Png, 90);
        assert!(matches!(result, Err(RasterError::InvalidDimensions(_))));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = PixelBuffer::<Argb>::create_from_file(dir.path().join("nope.png"));
        let err = result.unwrap_err();
        assert!(!err.is_configuration(), "expected an environment error, got {err}");
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(ImageFormat::from_path(Path::new("a.PNG")), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::from_path(Path::new("a.jpeg")), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_path(Path::new("a.gif")), None);
        assert_eq!(ImageFormat::from_path(Path::new("noext")), None);
    }
}
