//! Request handlers for the metadata and audio delivery endpoints.
//!
//! Both endpoints take the stream URL as a query parameter and translate
//! every collaborator failure into a status code with a `detail` JSON body.

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use tracing::{debug, info};

use super::AppContext;
use crate::{
    error::{Error, Result},
    slug::slugify,
    types::{best_audio, VideoMetadata},
    workspace::Workspace,
};

/// Base file name used when a stream has no usable title
const DEFAULT_BASE_NAME: &str = "audio";

#[derive(Debug, Deserialize)]
pub struct UrlQuery {
    pub url: String,
}

/// `GET /info?url=...`
///
/// Probe a stream and describe its best audio format, without downloading
/// any media.
pub async fn video_info(
    State(ctx): State<AppContext>,
    Query(query): Query<UrlQuery>,
) -> Result<Json<VideoMetadata>> {
    info!("metadata requested for {}", query.url);

    let probe = ctx.extractor.probe(&query.url).await?;
    let formats = probe.formats();
    if formats.is_empty() {
        return Err(Error::NoFormats);
    }

    let chosen = best_audio(formats)?;
    debug!(
        "selected format {} at {} kbps",
        chosen.format_id.as_deref().unwrap_or("?"),
        chosen.effective_bitrate(),
    );

    Ok(Json(VideoMetadata::assemble(
        &probe,
        chosen,
        ctx.config.slug_max_len,
    )))
}

/// `GET /audio?url=...`
///
/// Fetch the best audio stream, convert it to MP3 and deliver the file as
/// an attachment. The stages run strictly in order: probe, prepare,
/// download, transcode, deliver. All file work happens in a per-request
/// workspace that is removed on every exit path, including failures.
pub async fn download_audio(
    State(ctx): State<AppContext>,
    Query(query): Query<UrlQuery>,
) -> Result<Response> {
    info!("audio requested for {}", query.url);

    let probe = ctx.extractor.probe(&query.url).await?;

    let title = probe.title.as_deref().unwrap_or(DEFAULT_BASE_NAME);
    let mut base_name = slugify(title, ctx.config.slug_max_len);
    if base_name.is_empty() {
        base_name = DEFAULT_BASE_NAME.to_owned();
    }

    let workspace = Workspace::create(ctx.config.work_dir.as_deref())?;
    let raw_path = workspace.raw_path();
    let mp3_path = workspace.mp3_path(&base_name);

    // Which stream gets fetched is the extractor's own bestaudio call, not
    // a selection over the probed format list
    ctx.extractor.download_audio(&query.url, &raw_path).await?;

    ctx.transcoder
        .transcode_to_mp3(&raw_path, &mp3_path, ctx.config.audio_bitrate)
        .await?;

    let bytes = tokio::fs::read(&mp3_path).await?;
    info!("delivering {base_name}.mp3 ({} bytes)", bytes.len());

    let headers = [
        (header::CONTENT_TYPE, "audio/mpeg".to_owned()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{base_name}.mp3\""),
        ),
    ];
    // The workspace handle drops here, removing the raw and MP3 files
    Ok((headers, bytes).into_response())
}
