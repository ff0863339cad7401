use serde::Deserialize;

use crate::error::{Error, Result};

/// Sentinel codec reported by the extractor for formats without an audio track
pub const NO_AUDIO_CODEC: &str = "none";

/// One downloadable format as advertised by the extractor.
///
/// The extractor reports many more attributes per format; only the ones the
/// service consumes are kept, everything else is ignored on deserialization.
/// Every field is optional because extractors omit or null them freely.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FormatDescriptor {
    pub format_id: Option<String>,
    pub acodec: Option<String>,
    pub abr: Option<f64>,
    pub ext: Option<String>,
    pub url: Option<String>,
    pub filesize: Option<f64>,
    pub filesize_approx: Option<f64>,
}

impl FormatDescriptor {
    /// Whether this format carries an audio track.
    ///
    /// A missing codec counts the same as the `"none"` marker.
    pub fn has_audio(&self) -> bool {
        self.acodec
            .as_deref()
            .map_or(false, |codec| codec != NO_AUDIO_CODEC)
    }

    /// Advertised audio bitrate in kbps; missing values rank lowest.
    pub fn effective_bitrate(&self) -> f64 {
        self.abr.unwrap_or(0.0)
    }

    /// Exact size when known, otherwise the extractor's estimate.
    pub fn effective_filesize(&self) -> Option<f64> {
        self.filesize.or(self.filesize_approx)
    }
}

/// Pick the audio format with the highest advertised bitrate.
///
/// Formats whose codec is missing or `"none"` are skipped. A later format
/// must be strictly better to replace the current best, so equal bitrates
/// keep the earliest entry.
pub fn best_audio(formats: &[FormatDescriptor]) -> Result<&FormatDescriptor> {
    let mut best: Option<&FormatDescriptor> = None;

    for candidate in formats.iter().filter(|f| f.has_audio()) {
        let better = match best {
            Some(current) => candidate
                .effective_bitrate()
                .total_cmp(&current.effective_bitrate())
                .is_gt(),
            None => true,
        };
        if better {
            best = Some(candidate);
        }
    }

    best.ok_or(Error::NoAudioFormat)
}
