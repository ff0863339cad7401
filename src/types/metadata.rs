use serde::{Deserialize, Serialize};

use super::format::FormatDescriptor;
use crate::slug::slugify;

/// Title used when the extractor reports none
pub const DEFAULT_TITLE: &str = "untitled";

/// What the extractor reports about a stream in metadata-only mode.
///
/// Deserialized from the extractor's JSON dump; unknown attributes are
/// dropped and every kept attribute may be absent or null.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProbeResult {
    pub title: Option<String>,
    pub duration: Option<f64>,
    pub thumbnail: Option<String>,
    pub formats: Option<Vec<FormatDescriptor>>,
}

impl ProbeResult {
    pub fn formats(&self) -> &[FormatDescriptor] {
        self.formats.as_deref().unwrap_or_default()
    }
}

/// Metadata record served to clients, combining what the extractor reported
/// with the chosen audio format.
#[derive(Debug, Clone, Serialize)]
pub struct VideoMetadata {
    pub title: String,
    pub clean_title: String,
    pub duration: Option<f64>,
    pub thumbnail: Option<String>,
    pub abr: Option<f64>,
    pub ext: Option<String>,
    pub filesize: Option<u64>,
    pub audio_url: Option<String>,
}

impl VideoMetadata {
    /// Assemble the client-facing record from a probe and its chosen format.
    ///
    /// `filesize` prefers the exact size over the extractor's estimate and is
    /// rounded to whole bytes.
    pub fn assemble(probe: &ProbeResult, chosen: &FormatDescriptor, slug_max_len: usize) -> Self {
        let title = probe
            .title
            .clone()
            .unwrap_or_else(|| DEFAULT_TITLE.to_owned());

        Self {
            clean_title: slugify(&title, slug_max_len),
            duration: probe.duration,
            thumbnail: probe.thumbnail.clone(),
            abr: chosen.abr,
            ext: chosen.ext.clone(),
            filesize: chosen.effective_filesize().map(|bytes| bytes.round() as u64),
            audio_url: chosen.url.clone(),
            title,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assembles_record_with_sanitized_title() {
        let probe = ProbeResult {
            title: Some("My Song: Official Video (HD)!!".to_owned()),
            duration: Some(213.0),
            thumbnail: Some("https://i.example/thumb.jpg".to_owned()),
            formats: None,
        };
        let chosen = FormatDescriptor {
            abr: Some(128.0),
            ext: Some("m4a".to_owned()),
            filesize_approx: Some(3411223.7),
            url: Some("https://cdn.example/audio".to_owned()),
            ..Default::default()
        };

        let meta = VideoMetadata::assemble(&probe, &chosen, 50);
        assert_eq!(meta.title, "My Song: Official Video (HD)!!");
        assert_eq!(meta.clean_title, "my-song-official-video-hd");
        assert_eq!(meta.duration, Some(213.0));
        assert_eq!(meta.filesize, Some(3411224));
        assert_eq!(meta.audio_url.as_deref(), Some("https://cdn.example/audio"));
    }

    #[test]
    fn test_missing_title_falls_back() {
        let meta = VideoMetadata::assemble(&ProbeResult::default(), &FormatDescriptor::default(), 50);
        assert_eq!(meta.title, DEFAULT_TITLE);
        assert_eq!(meta.clean_title, DEFAULT_TITLE);
    }

    #[test]
    fn test_exact_filesize_wins_over_estimate() {
        let chosen = FormatDescriptor {
            filesize: Some(1000.0),
            filesize_approx: Some(2000.0),
            ..Default::default()
        };
        let meta = VideoMetadata::assemble(&ProbeResult::default(), &chosen, 50);
        assert_eq!(meta.filesize, Some(1000));
    }

    #[test]
    fn test_probe_tolerates_nulls_and_unknown_fields() {
        let raw = r#"{
            "id": "dQw4w9WgXcQ",
            "title": "Some Song",
            "duration": null,
            "uploader": "Somebody",
            "formats": [{"format_id": "251", "acodec": "opus", "abr": 70}]
        }"#;
        let probe: ProbeResult = serde_json::from_str(raw).unwrap();
        assert_eq!(probe.title.as_deref(), Some("Some Song"));
        assert_eq!(probe.duration, None);
        assert_eq!(probe.formats().len(), 1);
    }
}
