//! Single scalar config field editor.

use super::{submit_config_update, ConfigUpdate, MutationError, MutationSite};
use crate::api::{AdminApi, ServerConfig};
use crate::context::ServerContext;
use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

/// Scalar settings that can be changed one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigField {
    Name,
    Title,
    Summary,
    Logo,
    Nsfw,
    StreamKey,
    FfmpegPath,
    WebServerPort,
    RtmpServerPort,
    PageContent,
    SegmentLength,
    PlaylistItems,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Text,
    Flag,
    Port,
    Count,
}

impl ConfigField {
    pub const ALL: [ConfigField; 12] = [
        ConfigField::Name,
        ConfigField::Title,
        ConfigField::Summary,
        ConfigField::Logo,
        ConfigField::Nsfw,
        ConfigField::StreamKey,
        ConfigField::FfmpegPath,
        ConfigField::WebServerPort,
        ConfigField::RtmpServerPort,
        ConfigField::PageContent,
        ConfigField::SegmentLength,
        ConfigField::PlaylistItems,
    ];

    /// Command-line name.
    pub fn key(&self) -> &'static str {
        match self {
            ConfigField::Name => "name",
            ConfigField::Title => "title",
            ConfigField::Summary => "summary",
            ConfigField::Logo => "logo",
            ConfigField::Nsfw => "nsfw",
            ConfigField::StreamKey => "stream-key",
            ConfigField::FfmpegPath => "ffmpeg-path",
            ConfigField::WebServerPort => "web-port",
            ConfigField::RtmpServerPort => "rtmp-port",
            ConfigField::PageContent => "page-content",
            ConfigField::SegmentLength => "segment-length",
            ConfigField::PlaylistItems => "playlist-items",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ConfigField::Name => "Name",
            ConfigField::Title => "Title",
            ConfigField::Summary => "Summary",
            ConfigField::Logo => "Logo",
            ConfigField::Nsfw => "NSFW",
            ConfigField::StreamKey => "Stream key",
            ConfigField::FfmpegPath => "FFmpeg path",
            ConfigField::WebServerPort => "Web server port",
            ConfigField::RtmpServerPort => "RTMP server port",
            ConfigField::PageContent => "Page content",
            ConfigField::SegmentLength => "Segment length",
            ConfigField::PlaylistItems => "Playlist items",
        }
    }

    /// Endpoint suffix under the config update prefix.
    pub fn api_path(&self) -> &'static str {
        match self {
            ConfigField::Name => "name",
            ConfigField::Title => "servertitle",
            ConfigField::Summary => "serversummary",
            ConfigField::Logo => "logo",
            ConfigField::Nsfw => "nsfw",
            ConfigField::StreamKey => "key",
            ConfigField::FfmpegPath => "ffmpegpath",
            ConfigField::WebServerPort => "webserverport",
            ConfigField::RtmpServerPort => "rtmpserverport",
            ConfigField::PageContent => "pagecontent",
            ConfigField::SegmentLength => "video/segmentlength",
            ConfigField::PlaylistItems => "video/playlistitems",
        }
    }

    /// Containing object and field name in the cached config.
    fn location(&self) -> (&'static str, &'static str) {
        match self {
            ConfigField::Name => ("instanceDetails", "name"),
            ConfigField::Title => ("instanceDetails", "title"),
            ConfigField::Summary => ("instanceDetails", "summary"),
            ConfigField::Logo => ("instanceDetails", "logo"),
            ConfigField::Nsfw => ("instanceDetails", "nsfw"),
            ConfigField::StreamKey => ("", "streamKey"),
            ConfigField::FfmpegPath => ("", "ffmpegPath"),
            ConfigField::WebServerPort => ("", "webServerPort"),
            ConfigField::RtmpServerPort => ("", "rtmpServerPort"),
            ConfigField::PageContent => ("instanceDetails", "extraPageContent"),
            ConfigField::SegmentLength => ("videoSettings", "segmentLengthSeconds"),
            ConfigField::PlaylistItems => ("videoSettings", "numberOfPlaylistItems"),
        }
    }

    fn kind(&self) -> Kind {
        match self {
            ConfigField::Nsfw => Kind::Flag,
            ConfigField::WebServerPort | ConfigField::RtmpServerPort => Kind::Port,
            ConfigField::SegmentLength | ConfigField::PlaylistItems => Kind::Count,
            _ => Kind::Text,
        }
    }

    /// Parse user input into the JSON value the server expects.
    pub fn parse_value(&self, input: &str) -> Result<Value, MutationError> {
        let input = input.trim();
        let invalid = |what: &str| {
            MutationError::Invalid(format!("{} must be {}", self.label(), what))
        };

        match self.kind() {
            Kind::Text => Ok(json!(input)),
            Kind::Flag => match input.to_lowercase().as_str() {
                "true" | "yes" | "on" | "1" => Ok(json!(true)),
                "false" | "no" | "off" | "0" => Ok(json!(false)),
                _ => Err(invalid("true or false")),
            },
            Kind::Port => match input.parse::<u16>() {
                Ok(port) if port > 0 => Ok(json!(port)),
                _ => Err(invalid("a port between 1 and 65535")),
            },
            Kind::Count => match input.parse::<u32>() {
                Ok(count) if count > 0 => Ok(json!(count)),
                _ => Err(invalid("a positive whole number")),
            },
        }
    }

    /// Current value as displayed text.
    pub fn current(&self, config: &ServerConfig) -> String {
        match self {
            ConfigField::Name => config.instance_details.name.clone(),
            ConfigField::Title => config.instance_details.title.clone(),
            ConfigField::Summary => config.instance_details.summary.clone(),
            ConfigField::Logo => config.instance_details.logo.clone(),
            ConfigField::Nsfw => config.instance_details.nsfw.to_string(),
            ConfigField::StreamKey => config.stream_key.clone(),
            ConfigField::FfmpegPath => config.ffmpeg_path.clone(),
            ConfigField::WebServerPort => config.web_server_port.to_string(),
            ConfigField::RtmpServerPort => config.rtmp_server_port.to_string(),
            ConfigField::PageContent => config.instance_details.extra_page_content.clone(),
            ConfigField::SegmentLength => config.video_settings.segment_length_seconds.to_string(),
            ConfigField::PlaylistItems => {
                config.video_settings.number_of_playlist_items.to_string()
            }
        }
    }
}

impl fmt::Display for ConfigField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ConfigField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.to_lowercase().replace('_', "-");
        ConfigField::ALL
            .iter()
            .copied()
            .find(|field| field.key() == wanted)
            .ok_or_else(|| {
                let names: Vec<&str> = ConfigField::ALL.iter().map(|f| f.key()).collect();
                format!("Unknown field: {}. Use one of: {}", s, names.join(", "))
            })
    }
}

/// Edits scalar config fields through a single shared site.
pub struct FieldEditor {
    api: Arc<dyn AdminApi>,
    context: ServerContext,
    site: MutationSite,
}

impl FieldEditor {
    pub fn new(api: Arc<dyn AdminApi>, context: ServerContext, reset_after: Duration) -> Self {
        Self {
            api,
            context,
            site: MutationSite::new(reset_after),
        }
    }

    pub fn site(&self) -> &MutationSite {
        &self.site
    }

    pub async fn set(&self, field: ConfigField, input: &str) -> Result<String, MutationError> {
        let value = field.parse_value(input).map_err(|e| self.site.reject(e))?;
        let (config_path, name) = field.location();

        submit_config_update(
            self.api.as_ref(),
            &self.context,
            &self.site,
            ConfigUpdate {
                api_path: field.api_path(),
                config_path,
                field: name,
                value,
                success_message: format!("{} updated.", field.label()),
            },
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::{Call, FakeApi};

    fn editor() -> (Arc<FakeApi>, FieldEditor, ServerContext) {
        let api = Arc::new(FakeApi::default());
        let context = ServerContext::new();
        let mut config = ServerConfig::default();
        config.instance_details.name = "Old".to_string();
        config.web_server_port = 8080;
        context.replace_config(config);
        let editor = FieldEditor::new(api.clone(), context.clone(), Duration::from_secs(3));
        (api, editor, context)
    }

    #[test]
    fn test_every_field_location_exists_in_config() {
        let document = serde_json::to_value(ServerConfig::default()).unwrap();
        for field in ConfigField::ALL {
            let (path, name) = field.location();
            let object = if path.is_empty() {
                &document
            } else {
                &document[path]
            };
            assert!(object.get(name).is_some(), "{} missing", field);
        }
    }

    #[test]
    fn test_field_names_parse() {
        assert_eq!("stream-key".parse::<ConfigField>().unwrap(), ConfigField::StreamKey);
        assert_eq!("WEB_PORT".parse::<ConfigField>().unwrap(), ConfigField::WebServerPort);
        assert!("colour".parse::<ConfigField>().is_err());
    }

    #[test]
    fn test_value_parsing() {
        assert_eq!(ConfigField::Nsfw.parse_value("yes").unwrap(), json!(true));
        assert_eq!(ConfigField::WebServerPort.parse_value(" 8081 ").unwrap(), json!(8081));
        assert!(ConfigField::WebServerPort.parse_value("0").is_err());
        assert!(ConfigField::RtmpServerPort.parse_value("70000").is_err());
        assert!(ConfigField::SegmentLength.parse_value("-2").is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_posts_and_merges() {
        let (api, editor, context) = editor();

        let message = editor.set(ConfigField::Name, "New Name").await.unwrap();

        assert_eq!(message, "Name updated.");
        assert_eq!(
            api.calls(),
            vec![Call::UpdateConfig {
                api_path: "name".to_string(),
                value: json!("New Name"),
            }]
        );
        assert_eq!(context.config().instance_details.name, "New Name");
        assert_eq!(context.config().web_server_port, 8080);
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_value_sends_nothing() {
        let (api, editor, context) = editor();
        let before = context.config();

        let result = editor.set(ConfigField::WebServerPort, "eighty").await;

        assert!(matches!(result, Err(MutationError::Invalid(_))));
        assert!(api.calls().is_empty());
        assert_eq!(context.config(), before);
    }
}
