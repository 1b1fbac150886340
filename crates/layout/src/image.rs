//! Probing of image resources for placement and embedding.
//!
//! Only JPEG data is accepted. The bytes are embedded untouched with
//! `DCTDecode`, so probing reads the header and never decodes pixels.

use folio_traits::SharedResourceData;
use image::{ExtendedColorType, ImageDecoder, ImageFormat, ImageReader};
use std::io::Cursor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpace {
    Gray,
    Rgb,
    Cmyk,
}

impl ColorSpace {
    pub fn pdf_name(self) -> &'static str {
        match self {
            ColorSpace::Gray => "DeviceGray",
            ColorSpace::Rgb => "DeviceRGB",
            ColorSpace::Cmyk => "DeviceCMYK",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ImageData {
    pub width_px: u32,
    pub height_px: u32,
    pub color_space: ColorSpace,
    pub bits_per_component: u8,
    pub data: SharedResourceData,
}

impl ImageData {
    /// Reads dimensions and color space from JPEG data.
    pub fn probe_jpeg(data: SharedResourceData) -> Result<ImageData, String> {
        let (width_px, height_px, color_space) = read_jpeg_header(&data)?;
        Ok(ImageData {
            width_px,
            height_px,
            color_space,
            bits_per_component: 8,
            data,
        })
    }

    /// Natural size in points, one pixel per point.
    pub fn natural_size(&self) -> (f32, f32) {
        (self.width_px as f32, self.height_px as f32)
    }

    /// Resolves the drawn size from optional requested dimensions, keeping
    /// the aspect ratio when only one is given.
    pub fn scaled_size(&self, width: Option<f32>, height: Option<f32>) -> (f32, f32) {
        let (natural_w, natural_h) = self.natural_size();
        match (width, height) {
            (Some(w), Some(h)) => (w, h),
            (Some(w), None) => (w, w * natural_h / natural_w),
            (None, Some(h)) => (h * natural_w / natural_h, h),
            (None, None) => (natural_w, natural_h),
        }
    }
}

fn read_jpeg_header(bytes: &[u8]) -> Result<(u32, u32, ColorSpace), String> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| e.to_string())?;
    match reader.format() {
        Some(ImageFormat::Jpeg) => {}
        Some(other) => return Err(format!("{:?} images are not supported, use JPEG", other)),
        None => return Err("unrecognized image format".to_string()),
    }

    let decoder = reader.into_decoder().map_err(|e| e.to_string())?;
    let (width, height) = decoder.dimensions();
    if width == 0 || height == 0 {
        return Err("image has no pixels".to_string());
    }
    let color_space = match decoder.original_color_type() {
        ExtendedColorType::L8 | ExtendedColorType::L16 => ColorSpace::Gray,
        ExtendedColorType::Cmyk8 => ColorSpace::Cmyk,
        _ => ColorSpace::Rgb,
    };
    Ok((width, height, color_space))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Arc;

    /// A valid 2x1 baseline RGB JPEG.
    pub(crate) fn tiny_jpeg() -> Vec<u8> {
        let img = image::RgbImage::from_pixel(2, 1, image::Rgb([200, 10, 10]));
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Jpeg)
            .unwrap();
        bytes
    }

    #[test]
    fn test_probe_reads_dimensions() {
        let data = ImageData::probe_jpeg(Arc::new(tiny_jpeg())).unwrap();
        assert_eq!((data.width_px, data.height_px), (2, 1));
        assert_eq!(data.color_space, ColorSpace::Rgb);
    }

    #[test]
    fn test_gray_jpeg_keeps_the_shared_bytes() {
        let img = image::GrayImage::from_pixel(3, 4, image::Luma([128]));
        let mut bytes = Vec::new();
        image::DynamicImage::ImageLuma8(img)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Jpeg)
            .unwrap();
        let shared = Arc::new(bytes);

        let data = ImageData::probe_jpeg(shared.clone()).unwrap();
        assert_eq!((data.width_px, data.height_px), (3, 4));
        assert_eq!(data.color_space, ColorSpace::Gray);
        assert!(Arc::ptr_eq(&data.data, &shared));
    }

    #[test]
    fn test_probe_rejects_non_jpeg() {
        let err = ImageData::probe_jpeg(Arc::new(b"GIF89a....".to_vec())).unwrap_err();
        assert!(err.contains("not supported"));

        let err = ImageData::probe_jpeg(Arc::new(vec![0, 1, 2, 3])).unwrap_err();
        assert!(err.contains("unrecognized"));
    }

    #[test]
    fn test_scaled_size_keeps_aspect_ratio() {
        let data = ImageData::probe_jpeg(Arc::new(tiny_jpeg())).unwrap();
        assert_eq!(data.scaled_size(Some(100.0), None), (100.0, 50.0));
        assert_eq!(data.scaled_size(None, Some(10.0)), (20.0, 10.0));
        assert_eq!(data.scaled_size(None, None), (2.0, 1.0));
    }
}
