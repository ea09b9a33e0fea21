/*!
 * Tests for style string construction and tool diagnostics
 */

use subgen::app_config::StyleConfig;
use subgen::media::{build_force_style, filter_tool_stderr, hex_to_ass_color};

/// Test packing a plain hex color into ASS byte order
#[test]
fn test_hex_to_ass_color_withRed_shouldReorderChannels() {
    assert_eq!(hex_to_ass_color("#FF0000"), "&H000000FF&");
}

/// Test the white and black endpoints
#[test]
fn test_hex_to_ass_color_withWhiteAndBlack_shouldPack() {
    assert_eq!(hex_to_ass_color("#FFFFFF"), "&H00FFFFFF&");
    assert_eq!(hex_to_ass_color("#000000"), "&H00000000&");
}

/// Test a mixed color reorders to blue-green-red
#[test]
fn test_hex_to_ass_color_withMixedColor_shouldPackBgr() {
    assert_eq!(hex_to_ass_color("#12AB34"), "&H0034AB12&");
}

/// Test that a missing hash prefix is tolerated
#[test]
fn test_hex_to_ass_color_withMissingHash_shouldStillParse() {
    assert_eq!(hex_to_ass_color("00FF00"), "&H0000FF00&");
}

/// Test malformed colors degrade to the default white code
#[test]
fn test_hex_to_ass_color_withMalformedInput_shouldFallBackToWhite() {
    assert_eq!(hex_to_ass_color("not-a-color"), "&H00FFFFFF&");
    assert_eq!(hex_to_ass_color("#FFF"), "&H00FFFFFF&");
    assert_eq!(hex_to_ass_color("#GGGGGG"), "&H00FFFFFF&");
    assert_eq!(hex_to_ass_color(""), "&H00FFFFFF&");
}

/// Test that multibyte characters degrade to white instead of panicking
#[test]
fn test_hex_to_ass_color_withMultibyteInput_shouldFallBackToWhite() {
    assert_eq!(hex_to_ass_color("#x\u{e9}000"), "&H00FFFFFF&");
    assert_eq!(hex_to_ass_color("\u{e9}\u{e9}\u{e9}"), "&H00FFFFFF&");
    assert_eq!(hex_to_ass_color("#ffff\u{e9}"), "&H00FFFFFF&");
}

/// Test lowercase hex digits parse and format as uppercase
#[test]
fn test_hex_to_ass_color_withLowercaseDigits_shouldUppercaseOutput() {
    assert_eq!(hex_to_ass_color("#ff00aa"), "&H00AA00FF&");
}

/// Test the force_style string built from the default style
#[test]
fn test_build_force_style_withDefaultStyle_shouldIncludeAllFields() {
    let style = StyleConfig::default();
    let force_style = build_force_style(&style);

    assert_eq!(
        force_style,
        "Fontname=Arial,Fontsize=24,PrimaryColour=&H00FFFFFF&,\
         OutlineColour=&H00000000&,Outline=2,Bold=0,BorderStyle=1"
    );
}

/// Test custom style values flow into the force_style string
#[test]
fn test_build_force_style_withCustomStyle_shouldUseGivenValues() {
    let style = StyleConfig {
        font_family: "Verdana".to_string(),
        font_size: 32,
        color: "#FF0000".to_string(),
        stroke_color: "#0000FF".to_string(),
        stroke_width: 3,
    };
    let force_style = build_force_style(&style);

    assert!(force_style.contains("Fontname=Verdana"));
    assert!(force_style.contains("Fontsize=32"));
    assert!(force_style.contains("PrimaryColour=&H000000FF&"));
    assert!(force_style.contains("OutlineColour=&H00FF0000&"));
    assert!(force_style.contains("Outline=3"));
}

/// Test that version banners and stream noise are stripped from stderr
#[test]
fn test_filter_tool_stderr_withNoise_shouldKeepOnlyErrorLines() {
    let stderr = [
        "ffmpeg version 6.0 Copyright (c) 2000-2023",
        "  built with gcc 12",
        "  configuration: --enable-gpl",
        "Input #0, matroska, from 'input.mkv':",
        "  Duration: 00:01:00.00",
        "  Stream #0:0: Video: h264",
        "No such file or directory",
    ]
    .join("\n");

    let filtered = filter_tool_stderr(&stderr);
    assert_eq!(filtered, "No such file or directory");
}

/// Test that fully filtered stderr yields a placeholder diagnostic
#[test]
fn test_filter_tool_stderr_withOnlyNoise_shouldReturnPlaceholder() {
    let stderr = "ffprobe version 6.0\n  built with gcc 12\n";
    let filtered = filter_tool_stderr(stderr);

    assert!(filtered.contains("unknown tool error"));
}

/// Test empty stderr yields the placeholder
#[test]
fn test_filter_tool_stderr_withEmptyInput_shouldReturnPlaceholder() {
    assert!(filter_tool_stderr("").contains("unknown tool error"));
}
