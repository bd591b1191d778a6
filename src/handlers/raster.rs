use std::rc::Rc;

use image::{DynamicImage, GenericImageView};

use super::{FileInfo, Handler, Viewer};
use crate::artifact::{Artifact, ImageSurface};
use crate::error::{PreviewError, Result};
use crate::geometry::NaturalSize;

// Supported image extensions
const IMAGE_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "jfif", "png", "bmp", "dib", "ico", "tiff", "tif", "webp", "tga", "pnm",
    "pbm", "pgm", "ppm", "qoi", "dds", "hdr", "exr",
];

// Longest side kept in memory; larger images are downsampled on load.
pub(crate) const MAX_DECODED_SIDE: u32 = 2048;

pub struct ImageHandler;

impl Handler for ImageHandler {
    fn name(&self) -> &'static str {
        "image"
    }

    fn can_open(&self, file: &FileInfo) -> bool {
        file.has_extension(IMAGE_EXTENSIONS)
    }

    fn get_viewer(&self, file: &FileInfo) -> Result<Viewer> {
        let img = image::open(&file.path).map_err(|e| PreviewError::decode("image", e))?;
        let (width, height) = img.dimensions();
        Ok(Viewer::new(Artifact::Image(to_surface(&img)), natural_size(width, height))
            .with_metadata(dimensions_label(width, height)))
    }
}

pub(crate) fn natural_size(width: u32, height: u32) -> NaturalSize {
    NaturalSize::new(f64::from(width), f64::from(height))
}

pub(crate) fn dimensions_label(width: u32, height: u32) -> String {
    format!("{width} x {height}")
}

pub(crate) fn to_surface(img: &DynamicImage) -> ImageSurface {
    let (orig_width, orig_height) = img.dimensions();

    let rgba = if orig_width <= MAX_DECODED_SIDE && orig_height <= MAX_DECODED_SIDE {
        img.to_rgba8()
    } else {
        // Scale down to fit while maintaining aspect ratio
        let scale = f64::from(MAX_DECODED_SIDE) / f64::from(orig_width.max(orig_height));
        let new_width = ((f64::from(orig_width) * scale) as u32).max(1);
        let new_height = ((f64::from(orig_height) * scale) as u32).max(1);
        img.resize(new_width, new_height, image::imageops::FilterType::Triangle)
            .to_rgba8()
    };

    let (width, height) = rgba.dimensions();
    let mut pixels: Vec<u8> = Vec::with_capacity((width * height * 4) as usize);
    for pixel in rgba.pixels() {
        pixels.push(pixel[2]); // B
        pixels.push(pixel[1]); // G
        pixels.push(pixel[0]); // R
        pixels.push(pixel[3]); // A
    }

    ImageSurface {
        pixels: Rc::new(pixels),
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    #[test]
    fn reports_pixel_size_and_converts_to_bgra() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("red.png");
        RgbaImage::from_pixel(40, 30, Rgba([255, 0, 0, 255])).save(&path).unwrap();

        let viewer = ImageHandler.get_viewer(&FileInfo::from_path(&path).unwrap()).unwrap();
        assert_eq!(viewer.size, NaturalSize::new(40.0, 30.0));
        assert_eq!(viewer.metadata.as_deref(), Some("40 x 30"));
        match viewer.artifact {
            Artifact::Image(surface) => {
                assert_eq!((surface.width, surface.height), (40, 30));
                assert_eq!(&surface.pixels[..4], &[0, 0, 255, 255]);
            }
            other => panic!("unexpected artifact {other:?}"),
        }
    }

    #[test]
    fn large_images_are_downsampled_but_keep_natural_size() {
        let img = DynamicImage::ImageRgba8(RgbaImage::new(4096, 1024));
        let surface = to_surface(&img);
        assert_eq!((surface.width, surface.height), (2048, 512));
        assert_eq!(surface.pixels.len(), 2048 * 512 * 4);
    }

    #[test]
    fn corrupt_image_is_a_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"\x89PNG garbage").unwrap();

        let err = ImageHandler
            .get_viewer(&FileInfo::from_path(&path).unwrap())
            .unwrap_err();
        assert!(matches!(err, PreviewError::Decode { format: "image", .. }));
    }
}
