//! Image decoding and color normalization.

use image::{ColorType, DynamicImage, ImageFormat, ImageResult, RgbImage};

/// An uploaded image decoded into memory.
#[derive(Debug)]
pub struct DecodedImage {
    image: DynamicImage,
    format: ImageFormat,
}

impl DecodedImage {
    /// Decode raw bytes, detecting the container format from its magic bytes.
    pub fn decode(bytes: &[u8]) -> ImageResult<Self> {
        let format = image::guess_format(bytes)?;
        let image = image::load_from_memory_with_format(bytes, format)?;
        Ok(Self { image, format })
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Pixel layout of the decoded bitmap (the image "mode").
    pub fn color(&self) -> ColorType {
        self.image.color()
    }

    /// Whether the bitmap is already 8-bit RGB.
    pub fn is_rgb8(&self) -> bool {
        self.color() == ColorType::Rgb8
    }

    /// Convert to 8-bit RGB. RGB8 buffers are moved out untouched.
    pub fn into_rgb8(self) -> RgbImage {
        match self.image {
            DynamicImage::ImageRgb8(rgb) => rgb,
            other => other.to_rgb8(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use image::{GrayImage, Luma, Rgb, Rgba, RgbaImage};

    use super::*;

    fn encode(image: DynamicImage, format: ImageFormat) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        image.write_to(&mut buf, format).unwrap();
        buf.into_inner()
    }

    #[test]
    fn test_decode_reports_format_and_dimensions() {
        let png = encode(
            DynamicImage::ImageRgb8(RgbImage::new(12, 7)),
            ImageFormat::Png,
        );
        let decoded = DecodedImage::decode(&png).unwrap();
        assert_eq!(decoded.format(), ImageFormat::Png);
        assert_eq!((decoded.width(), decoded.height()), (12, 7));
        assert!(decoded.is_rgb8());
    }

    #[test]
    fn test_rgb_passes_through_unchanged() {
        let mut rgb = RgbImage::new(3, 2);
        rgb.put_pixel(1, 1, Rgb([10, 20, 30]));
        let png = encode(DynamicImage::ImageRgb8(rgb.clone()), ImageFormat::Png);

        let converted = DecodedImage::decode(&png).unwrap().into_rgb8();
        assert_eq!(converted, rgb);
    }

    #[test]
    fn test_rgba_is_converted_to_rgb() {
        let mut rgba = RgbaImage::new(2, 2);
        rgba.put_pixel(0, 0, Rgba([200, 100, 50, 255]));
        let png = encode(DynamicImage::ImageRgba8(rgba), ImageFormat::Png);

        let decoded = DecodedImage::decode(&png).unwrap();
        assert_eq!(decoded.color(), ColorType::Rgba8);
        assert!(!decoded.is_rgb8());

        let rgb = decoded.into_rgb8();
        assert_eq!(rgb.get_pixel(0, 0), &Rgb([200, 100, 50]));
    }

    #[test]
    fn test_grayscale_is_expanded_to_rgb() {
        let mut gray = GrayImage::new(2, 1);
        gray.put_pixel(1, 0, Luma([128]));
        let png = encode(DynamicImage::ImageLuma8(gray), ImageFormat::Png);

        let rgb = DecodedImage::decode(&png).unwrap().into_rgb8();
        assert_eq!(rgb.get_pixel(1, 0), &Rgb([128, 128, 128]));
    }

    #[test]
    fn test_jpeg_is_decoded() {
        let jpeg = encode(
            DynamicImage::ImageRgb8(RgbImage::from_pixel(8, 8, Rgb([255, 255, 255]))),
            ImageFormat::Jpeg,
        );
        let decoded = DecodedImage::decode(&jpeg).unwrap();
        assert_eq!(decoded.format(), ImageFormat::Jpeg);
    }

    #[test]
    fn test_garbage_bytes_fail_to_decode() {
        let err = DecodedImage::decode(b"definitely not an image").unwrap_err();
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn test_truncated_png_fails_to_decode() {
        let png = encode(
            DynamicImage::ImageRgb8(RgbImage::new(16, 16)),
            ImageFormat::Png,
        );
        assert!(DecodedImage::decode(&png[..png.len() / 2]).is_err());
    }
}
