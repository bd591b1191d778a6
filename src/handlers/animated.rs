use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use image::codecs::webp::WebPDecoder;
use image::{AnimationDecoder, GenericImageView};

use super::raster::{dimensions_label, natural_size, to_surface};
use super::{FileInfo, Handler, Viewer};
use crate::artifact::Artifact;
use crate::error::{PreviewError, Result};

pub struct AnimatedImageHandler;

impl Handler for AnimatedImageHandler {
    fn name(&self) -> &'static str {
        "animated-image"
    }

    fn can_open(&self, file: &FileInfo) -> bool {
        match file.extension.as_str() {
            "gif" => true,
            "webp" => webp_is_animated(&file.path),
            _ => false,
        }
    }

    fn get_viewer(&self, file: &FileInfo) -> Result<Viewer> {
        let frames = match file.extension.as_str() {
            "webp" => webp_frame_count(&file.path)?,
            _ => gif_frame_count(&file.path)?,
        };

        let img = image::open(&file.path).map_err(|e| PreviewError::decode("animated image", e))?;
        let (width, height) = img.dimensions();

        let label = if frames > 1 {
            format!("{}, {frames} frames", dimensions_label(width, height))
        } else {
            dimensions_label(width, height)
        };
        Ok(Viewer::new(Artifact::Image(to_surface(&img)), natural_size(width, height)).with_metadata(label))
    }
}

fn gif_frame_count(path: &Path) -> Result<usize> {
    let file = File::open(path).map_err(|e| PreviewError::io(path, e))?;
    let mut options = gif::DecodeOptions::new();
    options.set_color_output(gif::ColorOutput::Indexed);
    let mut decoder = options
        .read_info(BufReader::new(file))
        .map_err(|e| PreviewError::decode("gif", e))?;

    let mut count = 0;
    while decoder
        .read_next_frame()
        .map_err(|e| PreviewError::decode("gif", e))?
        .is_some()
    {
        count += 1;
    }
    Ok(count)
}

fn open_webp(path: &Path) -> Result<WebPDecoder<BufReader<File>>> {
    let file = File::open(path).map_err(|e| PreviewError::io(path, e))?;
    WebPDecoder::new(BufReader::new(file)).map_err(|e| PreviewError::decode("webp", e))
}

fn webp_is_animated(path: &Path) -> bool {
    open_webp(path).map(|decoder| decoder.has_animation()).unwrap_or(false)
}

fn webp_frame_count(path: &Path) -> Result<usize> {
    let decoder = open_webp(path)?;
    if !decoder.has_animation() {
        return Ok(1);
    }
    Ok(decoder.into_frames().count())
}
