use std::path::Path;

use log::{debug, error, info};
use tokio::process::Command;

use crate::app_config::StyleConfig;
use crate::errors::MediaError;

// @module: ffmpeg invocation for audio extraction and burn-in render

/// Timeout for audio extraction
const EXTRACT_TIMEOUT_SECS: u64 = 120;

/// Timeout for full burn-in renders
const RENDER_TIMEOUT_SECS: u64 = 1800;

/// Default packed color used when a hex color cannot be parsed
const DEFAULT_ASS_COLOR: &str = "&H00FFFFFF&";

/// Extract the audio track of a video to a mono 16 kHz PCM WAV file.
///
/// Parameters match what speech-to-text services expect; the output is
/// overwritten if it exists.
pub async fn extract_audio(video_path: &Path, audio_path: &Path) -> Result<(), MediaError> {
    debug!("Extracting audio from {:?} to {:?}", video_path, audio_path);

    let args = [
        "-i",
        video_path.to_str().unwrap_or_default(),
        "-vn",
        "-acodec",
        "pcm_s16le",
        "-ar",
        "16000",
        "-ac",
        "1",
        "-y",
        audio_path.to_str().unwrap_or_default(),
    ];

    run_tool("ffmpeg", &args, EXTRACT_TIMEOUT_SECS).await?;
    Ok(())
}

/// Burn subtitles into a video with the given style.
///
/// A `preview_secs` limit renders only the head of the video with a faster
/// preset, matching the preview/final split of the render endpoint this tool
/// replaces.
pub async fn render_subtitles(
    video_path: &Path,
    subtitle_path: &Path,
    output_path: &Path,
    style: &StyleConfig,
    preview_secs: Option<u32>,
) -> Result<(), MediaError> {
    let filter = format!(
        "subtitles={}:force_style='{}'",
        subtitle_path.to_str().unwrap_or_default(),
        build_force_style(style)
    );

    let mut args: Vec<String> = vec![
        "-i".to_string(),
        video_path.to_str().unwrap_or_default().to_string(),
        "-vf".to_string(),
        filter,
    ];

    if let Some(secs) = preview_secs {
        args.extend(["-t".to_string(), secs.to_string()]);
    }

    let (preset, crf) = if preview_secs.is_some() {
        ("fast", "23")
    } else {
        ("medium", "20")
    };

    args.extend(
        [
            "-c:v", "libx264", "-preset", preset, "-crf", crf, "-c:a", "aac", "-y",
        ]
        .iter()
        .map(|s| s.to_string()),
    );
    args.push(output_path.to_str().unwrap_or_default().to_string());

    info!(
        "Rendering {} with burned-in subtitles to {:?}",
        if preview_secs.is_some() { "preview" } else { "video" },
        output_path
    );

    let arg_refs: Vec<&str> = args.iter().map(|s| s.as_str()).collect();
    run_tool("ffmpeg", &arg_refs, RENDER_TIMEOUT_SECS).await?;
    Ok(())
}

/// Build the ASS force_style override string from a style configuration
pub fn build_force_style(style: &StyleConfig) -> String {
    format!(
        "Fontname={},Fontsize={},PrimaryColour={},OutlineColour={},Outline={},Bold=0,BorderStyle=1",
        style.font_family,
        style.font_size,
        hex_to_ass_color(&style.color),
        hex_to_ass_color(&style.stroke_color),
        style.stroke_width
    )
}

/// Convert a `#RRGGBB` hex color to a packed ASS color code.
///
/// ASS expects `&H00BBGGRR&`: bytes reordered blue-green-red, two uppercase
/// hex digits each, with a fixed `00` alpha prefix. A missing `#` is
/// tolerated; any other malformed input (wrong length, non-hex digits) maps
/// to the default white code.
pub fn hex_to_ass_color(hex: &str) -> String {
    let with_hash = if hex.starts_with('#') {
        hex.to_string()
    } else {
        format!("#{}", hex)
    };

    // Byte-offset slicing below requires ASCII
    if !with_hash.is_ascii() || with_hash.len() != 7 {
        return DEFAULT_ASS_COLOR.to_string();
    }

    let digits = &with_hash[1..];
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&digits[range], 16);

    match (channel(0..2), channel(2..4), channel(4..6)) {
        (Ok(r), Ok(g), Ok(b)) => format!("&H00{:02X}{:02X}{:02X}&", b, g, r),
        _ => DEFAULT_ASS_COLOR.to_string(),
    }
}

/// Run an external tool with a timeout, returning its stdout
async fn run_tool(tool: &str, args: &[&str], timeout_secs: u64) -> Result<String, MediaError> {
    let future = Command::new(tool).args(args).output();

    let timeout = std::time::Duration::from_secs(timeout_secs);
    let output = tokio::select! {
        result = future => {
            result.map_err(|e| MediaError::LaunchFailed {
                tool: tool.to_string(),
                message: e.to_string(),
            })?
        },
        _ = tokio::time::sleep(timeout) => {
            return Err(MediaError::Timeout { tool: tool.to_string(), seconds: timeout_secs });
        }
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let diagnostic = filter_tool_stderr(&stderr);
        error!("{} failed: {}", tool, diagnostic);
        return Err(MediaError::ToolFailed {
            tool: tool.to_string(),
            diagnostic,
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

/// Filter ffmpeg/ffprobe stderr to only the meaningful error lines, stripping
/// the version banner, build configuration, and stream metadata noise.
pub fn filter_tool_stderr(stderr: &str) -> String {
    let dominated_prefixes = [
        "ffmpeg version",
        "ffprobe version",
        "  built with",
        "  configuration:",
        "  lib",
        "Input #",
        "  Metadata:",
        "  Duration:",
        "  Chapter",
        "    Chapter",
        "  Stream #",
        "      Metadata:",
        "        title",
        "        BPS",
        "        DURATION",
        "        NUMBER_OF",
        "        _STATISTICS",
        "Output #",
        "Stream mapping:",
        "Press [q]",
    ];

    let meaningful: Vec<&str> = stderr
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                return false;
            }
            !dominated_prefixes.iter().any(|p| line.starts_with(p))
        })
        .collect();

    if meaningful.is_empty() {
        "unknown tool error (stderr was empty after filtering)".to_string()
    } else {
        meaningful.join("\n")
    }
}
