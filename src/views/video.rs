//! Video variants and miscellaneous video settings.

use crate::api::{VideoSettings, VideoVariant};
use crate::widgets::key_value::{render_key_value_table, KeyValue};
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};

pub const SAME_AS_SOURCE: &str = "Same as source";

pub fn format_bitrate(kbps: u32) -> String {
    if kbps == 0 {
        SAME_AS_SOURCE.to_string()
    } else {
        format!("{} kbps", kbps)
    }
}

pub fn format_framerate(fps: u32) -> String {
    if fps == 0 {
        SAME_AS_SOURCE.to_string()
    } else {
        format!("{} fps", fps)
    }
}

pub fn format_preset(preset: &str) -> String {
    if preset.is_empty() {
        "n/a".to_string()
    } else {
        preset.to_string()
    }
}

/// Variants table; the `#` column is one-based.
pub fn render_variants_table(variants: &[VideoVariant]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        "#",
        "Video bitrate",
        "Framerate",
        "Encoder preset",
        "Audio bitrate",
        "Passthrough",
    ]);

    for (index, variant) in variants.iter().enumerate() {
        let passthrough = match (variant.video_passthrough, variant.audio_passthrough) {
            (true, true) => "video, audio",
            (true, false) => "video",
            (false, true) => "audio",
            (false, false) => "",
        };
        table.add_row(vec![
            Cell::new(index + 1),
            Cell::new(format_bitrate(variant.video_bitrate)),
            Cell::new(format_framerate(variant.framerate)),
            Cell::new(format_preset(&variant.encoder_preset)),
            Cell::new(format_bitrate(variant.audio_bitrate)),
            Cell::new(passthrough),
        ]);
    }

    table.to_string()
}

pub fn misc_video_settings(settings: &VideoSettings) -> Vec<KeyValue> {
    vec![
        KeyValue::new("Segment length", settings.segment_length_seconds),
        KeyValue::new("Number of segments", settings.number_of_playlist_items),
    ]
}

pub fn render_video_settings(settings: &VideoSettings) -> String {
    format!(
        "{}\n{}",
        render_variants_table(&settings.video_quality_variants),
        render_key_value_table("Video settings", &misc_video_settings(settings))
    )
}
