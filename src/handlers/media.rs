use std::path::Path;

use super::{FileInfo, Handler, Viewer};
use crate::artifact::{Artifact, HostedKind, HostedSurface};
use crate::error::Result;
use crate::geometry::NaturalSize;

// Supported video extensions
const VIDEO_EXTENSIONS: &[&str] = &[
    "mp4", "m4v", "mov", "webm", "mkv", "avi", "wmv", "flv", "mpg", "mpeg", "m2ts", "3gp",
];

// Supported audio extensions
const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "wma", "flac", "aac", "m4a", "ogg", "opus", "aiff"];

const VIDEO_SIZE: NaturalSize = NaturalSize::new(1280.0, 720.0);
const AUDIO_SIZE: NaturalSize = NaturalSize::new(480.0, 160.0);

pub struct VideoHandler;

impl Handler for VideoHandler {
    fn name(&self) -> &'static str {
        "video"
    }

    fn can_open(&self, file: &FileInfo) -> bool {
        // `.ts` is far more often TypeScript; the source handler runs first.
        file.has_extension(VIDEO_EXTENSIONS)
    }

    fn get_viewer(&self, file: &FileInfo) -> Result<Viewer> {
        let surface = HostedSurface::new(HostedKind::Video, &file.path, file.file_name());
        Ok(Viewer::new(Artifact::Hosted(surface), VIDEO_SIZE))
    }
}

pub struct AudioHandler;

impl Handler for AudioHandler {
    fn name(&self) -> &'static str {
        "audio"
    }

    fn can_open(&self, file: &FileInfo) -> bool {
        file.has_extension(AUDIO_EXTENSIONS)
    }

    fn get_viewer(&self, file: &FileInfo) -> Result<Viewer> {
        let surface = HostedSurface::new(HostedKind::Audio, &file.path, file.file_name());
        let viewer = Viewer::new(Artifact::Hosted(surface), AUDIO_SIZE);
        let duration = if file.extension == "wav" { wav_duration_secs(&file.path) } else { None };
        Ok(match duration {
            Some(secs) => viewer.with_metadata(format_duration(secs)),
            None => viewer,
        })
    }
}

fn wav_duration_secs(path: &Path) -> Option<u64> {
    let reader = hound::WavReader::open(path).ok()?;
    let rate = reader.spec().sample_rate;
    if rate == 0 {
        return None;
    }
    Some(u64::from(reader.duration()) / u64::from(rate))
}

fn format_duration(total_secs: u64) -> String {
    let (hours, minutes, seconds) = (total_secs / 3600, (total_secs / 60) % 60, total_secs % 60);
    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_durations() {
        assert_eq!(format_duration(0), "0:00");
        assert_eq!(format_duration(75), "1:15");
        assert_eq!(format_duration(3725), "1:02:05");
    }

    #[test]
    fn wav_reports_duration() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tone.wav");
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 8000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(&path, spec).unwrap();
        for _ in 0..8000 * 3 {
            writer.write_sample(0i16).unwrap();
        }
        writer.finalize().unwrap();

        let viewer = AudioHandler.get_viewer(&FileInfo::from_path(&path).unwrap()).unwrap();
        assert_eq!(viewer.metadata.as_deref(), Some("0:03"));
        assert!(matches!(viewer.artifact, Artifact::Hosted(ref s) if s.kind == HostedKind::Audio));
    }

    #[test]
    fn compressed_audio_has_no_duration() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("song.mp3");
        std::fs::write(&path, b"ID3").unwrap();

        let viewer = AudioHandler.get_viewer(&FileInfo::from_path(&path).unwrap()).unwrap();
        assert!(viewer.metadata.is_none());
        assert_eq!(viewer.size, AUDIO_SIZE);
    }

    #[test]
    fn video_gets_a_hosted_surface() {
        let file = FileInfo::with_len(Path::new("clip.MP4"), 1);
        assert!(VideoHandler.can_open(&file));
        let viewer = VideoHandler.get_viewer(&file).unwrap();
        assert_eq!(viewer.size, VIDEO_SIZE);
    }
}
