use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};

use crate::tracker::error::{invalid_argument, TrackerResult};

/// Classification of the streamed content.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MediaType {
    LongFormOnDemand,
    ShortFormOnDemand,
    Live,
    UserGeneratedLongFormOnDemand,
    UserGeneratedShortFormOnDemand,
    UserGeneratedLive,
    Bumper,
    #[default]
    Other,
}

impl MediaType {
    pub fn from_key(value: &str) -> Self {
        match value {
            "longFormOnDemand" => MediaType::LongFormOnDemand,
            "shortFormOnDemand" => MediaType::ShortFormOnDemand,
            "live" => MediaType::Live,
            "userGeneratedLongFormOnDemand" => MediaType::UserGeneratedLongFormOnDemand,
            "userGeneratedShortFormOnDemand" => MediaType::UserGeneratedShortFormOnDemand,
            "userGeneratedLive" => MediaType::UserGeneratedLive,
            "bumper" => MediaType::Bumper,
            _ => MediaType::Other,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeedType {
    EastHd,
    WestHd,
    EastSd,
    WestSd,
}

impl FeedType {
    pub fn from_key(value: &str) -> Option<Self> {
        match value {
            "easthd" => Some(FeedType::EastHd),
            "westhd" => Some(FeedType::WestHd),
            "eastsd" => Some(FeedType::EastSd),
            "westsd" => Some(FeedType::WestSd),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeliveryMode {
    Linear,
    OnDemand,
}

impl DeliveryMode {
    pub fn from_key(value: &str) -> Option<Self> {
        match value {
            "linear" => Some(DeliveryMode::Linear),
            "ondemand" => Some(DeliveryMode::OnDemand),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeliverySubscriptionType {
    TraditionalMvpd,
    VirtualMvpd,
    Subscription,
    Transactional,
    Advertising,
    Premium,
}

impl DeliverySubscriptionType {
    pub fn from_key(value: &str) -> Option<Self> {
        match value {
            "traditionalMvpd" => Some(DeliverySubscriptionType::TraditionalMvpd),
            "virtualMvpd" => Some(DeliverySubscriptionType::VirtualMvpd),
            "subscription" => Some(DeliverySubscriptionType::Subscription),
            "transactional" => Some(DeliverySubscriptionType::Transactional),
            "advertising" => Some(DeliverySubscriptionType::Advertising),
            "premium" => Some(DeliverySubscriptionType::Premium),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeliveryComposition {
    Clean,
    Embed,
}

impl DeliveryComposition {
    pub fn from_key(value: &str) -> Option<Self> {
        match value {
            "clean" => Some(DeliveryComposition::Clean),
            "embed" => Some(DeliveryComposition::Embed),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeliveryAdvertisementCapability {
    None,
    DynamicLoad,
    DynamicReplacement,
    Linear1Day,
    Linear2Day,
    Linear3Day,
    Linear4Day,
    Linear5Day,
    Linear6Day,
    Linear7Day,
}

impl DeliveryAdvertisementCapability {
    pub fn from_key(value: &str) -> Option<Self> {
        match value {
            "none" => Some(DeliveryAdvertisementCapability::None),
            "dynamicLoad" => Some(DeliveryAdvertisementCapability::DynamicLoad),
            "dynamicReplacement" => Some(DeliveryAdvertisementCapability::DynamicReplacement),
            "linear1day" => Some(DeliveryAdvertisementCapability::Linear1Day),
            "linear2day" => Some(DeliveryAdvertisementCapability::Linear2Day),
            "linear3day" => Some(DeliveryAdvertisementCapability::Linear3Day),
            "linear4day" => Some(DeliveryAdvertisementCapability::Linear4Day),
            "linear5day" => Some(DeliveryAdvertisementCapability::Linear5Day),
            "linear6day" => Some(DeliveryAdvertisementCapability::Linear6Day),
            "linear7day" => Some(DeliveryAdvertisementCapability::Linear7Day),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MediaFormat {
    FullContentEpisode,
    FullContentMovie,
    FullContentPodcast,
    FullContentGeneric,
    PartialContentEpisode,
    PartialContentMovie,
    PartialContentPodcast,
    PartialContentGeneric,
    PreviewEpisode,
    PreviewMovie,
    PreviewGeneric,
    ExtraEpisode,
    ExtraMovie,
    ExtraGeneric,
}

impl MediaFormat {
    pub fn from_key(value: &str) -> Option<Self> {
        match value {
            "fullContentEpisode" => Some(MediaFormat::FullContentEpisode),
            "fullContentMovie" => Some(MediaFormat::FullContentMovie),
            "fullContentPodcast" => Some(MediaFormat::FullContentPodcast),
            "fullContentGeneric" => Some(MediaFormat::FullContentGeneric),
            "partialContentEpisode" => Some(MediaFormat::PartialContentEpisode),
            "partialContentMovie" => Some(MediaFormat::PartialContentMovie),
            "partialContentPodcast" => Some(MediaFormat::PartialContentPodcast),
            "partialContentGeneric" => Some(MediaFormat::PartialContentGeneric),
            "previewEpisode" => Some(MediaFormat::PreviewEpisode),
            "previewMovie" => Some(MediaFormat::PreviewMovie),
            "previewGeneric" => Some(MediaFormat::PreviewGeneric),
            "extraEpisode" => Some(MediaFormat::ExtraEpisode),
            "extraMovie" => Some(MediaFormat::ExtraMovie),
            "extraGeneric" => Some(MediaFormat::ExtraGeneric),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DistributionModel {
    TvAndOnline,
    ExclusivelyOnline,
}

impl DistributionModel {
    pub fn from_key(value: &str) -> Option<Self> {
        match value {
            "tvAndOnline" => Some(DistributionModel::TvAndOnline),
            "exclusivelyOnline" => Some(DistributionModel::ExclusivelyOnline),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct MetadataDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct MetadataTime {
    pub hours: u32,
    pub minutes: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct VideoDimension {
    pub width: u32,
    pub height: u32,
}

/// Typed description of one piece of streamed content, handed to the
/// streaming backend at connector creation and on metadata updates.
///
/// Classification strings that the backend vocabulary does not know parse
/// to `None` (or [`MediaType::Other`]) instead of failing the whole object.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContentMetadata {
    #[serde(deserialize_with = "de_media_type")]
    pub media_type: MediaType,
    pub unique_id: Option<String>,
    /// Content length in milliseconds; zero for live streams.
    pub length: i64,
    pub c3: Option<String>,
    pub c4: Option<String>,
    pub c6: Option<String>,
    pub station_title: Option<String>,
    pub station_code: Option<String>,
    pub network_affiliate: Option<String>,
    pub publisher_name: Option<String>,
    pub program_title: Option<String>,
    pub program_id: Option<String>,
    pub episode_title: Option<String>,
    pub episode_id: Option<String>,
    pub episode_season_number: Option<String>,
    pub episode_number: Option<String>,
    pub genre_name: Option<String>,
    pub genre_id: Option<String>,
    pub carry_tv_advertisement_load: bool,
    pub classify_as_complete_episode: bool,
    pub date_of_production: Option<MetadataDate>,
    pub time_of_production: Option<MetadataTime>,
    pub date_of_tv_airing: Option<MetadataDate>,
    pub time_of_tv_airing: Option<MetadataTime>,
    pub date_of_digital_airing: Option<MetadataDate>,
    pub time_of_digital_airing: Option<MetadataTime>,
    #[serde(deserialize_with = "de_keyed")]
    pub feed_type: Option<FeedType>,
    pub classify_as_audio_stream: bool,
    #[serde(deserialize_with = "de_keyed")]
    pub delivery_mode: Option<DeliveryMode>,
    #[serde(deserialize_with = "de_keyed")]
    pub delivery_subscription_type: Option<DeliverySubscriptionType>,
    #[serde(deserialize_with = "de_keyed")]
    pub delivery_composition: Option<DeliveryComposition>,
    #[serde(deserialize_with = "de_keyed")]
    pub delivery_advertisement_capability: Option<DeliveryAdvertisementCapability>,
    #[serde(deserialize_with = "de_keyed")]
    pub media_format: Option<MediaFormat>,
    #[serde(deserialize_with = "de_keyed")]
    pub distribution_model: Option<DistributionModel>,
    pub playlist_title: Option<String>,
    pub total_segments: Option<i32>,
    pub clip_url: Option<String>,
    pub video_dimension: Option<VideoDimension>,
    pub custom_labels: BTreeMap<String, String>,
}

/// Classification enums that parse from a wire string, returning `None`
/// for values outside the backend vocabulary.
pub trait FromWireKey: Sized {
    fn parse_key(value: &str) -> Option<Self>;
}

macro_rules! impl_from_wire_key {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FromWireKey for $ty {
                fn parse_key(value: &str) -> Option<Self> {
                    Self::from_key(value)
                }
            }
        )*
    };
}

impl_from_wire_key!(
    FeedType,
    DeliveryMode,
    DeliverySubscriptionType,
    DeliveryComposition,
    DeliveryAdvertisementCapability,
    MediaFormat,
    DistributionModel,
);

fn de_media_type<'de, D>(deserializer: D) -> Result<MediaType, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.as_deref().map(MediaType::from_key).unwrap_or_default())
}

fn de_keyed<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromWireKey,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.as_deref().and_then(T::parse_key))
}

impl ContentMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses metadata from the JSON object shape the bridge-facing calls
    /// deliver.
    pub fn from_json(value: serde_json::Value) -> TrackerResult<Self> {
        serde_json::from_value(value)
            .map_err(|err| invalid_argument(format!("invalid content metadata: {err}")))
    }

    pub fn with_media_type(mut self, media_type: MediaType) -> Self {
        self.media_type = media_type;
        self
    }

    pub fn with_unique_id(mut self, unique_id: impl Into<String>) -> Self {
        self.unique_id = Some(unique_id.into());
        self
    }

    pub fn with_length(mut self, length_ms: i64) -> Self {
        self.length = length_ms;
        self
    }

    pub fn with_program_title(mut self, title: impl Into<String>) -> Self {
        self.program_title = Some(title.into());
        self
    }

    pub fn with_custom_label(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.custom_labels.insert(name.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn media_type_parses_known_keys_and_defaults_to_other() {
        assert_eq!(
            MediaType::from_key("longFormOnDemand"),
            MediaType::LongFormOnDemand
        );
        assert_eq!(MediaType::from_key("live"), MediaType::Live);
        assert_eq!(MediaType::from_key("bumper"), MediaType::Bumper);
        assert_eq!(MediaType::from_key("hologram"), MediaType::Other);
    }

    #[test]
    fn classification_enums_parse_wire_strings() {
        assert_eq!(FeedType::from_key("easthd"), Some(FeedType::EastHd));
        assert_eq!(FeedType::from_key("northhd"), None);
        assert_eq!(DeliveryMode::from_key("ondemand"), Some(DeliveryMode::OnDemand));
        assert_eq!(DeliveryMode::from_key("catchup"), None);
        assert_eq!(
            DeliverySubscriptionType::from_key("virtualMvpd"),
            Some(DeliverySubscriptionType::VirtualMvpd)
        );
        assert_eq!(
            DeliveryAdvertisementCapability::from_key("linear7day"),
            Some(DeliveryAdvertisementCapability::Linear7Day)
        );
        assert_eq!(DeliveryAdvertisementCapability::from_key("linear8day"), None);
        assert_eq!(
            MediaFormat::from_key("fullContentPodcast"),
            Some(MediaFormat::FullContentPodcast)
        );
        assert_eq!(
            DistributionModel::from_key("exclusivelyOnline"),
            Some(DistributionModel::ExclusivelyOnline)
        );
    }

    #[test]
    fn from_json_reads_camel_case_object() {
        let metadata = ContentMetadata::from_json(json!({
            "mediaType": "longFormOnDemand",
            "uniqueId": "ep-001",
            "length": 1800000,
            "programTitle": "Morning Show",
            "episodeSeasonNumber": "2",
            "feedType": "westhd",
            "deliveryMode": "linear",
            "videoDimension": {"width": 1920, "height": 1080},
            "customLabels": {"campaign": "spring"},
        }))
        .unwrap();

        assert_eq!(metadata.media_type, MediaType::LongFormOnDemand);
        assert_eq!(metadata.unique_id.as_deref(), Some("ep-001"));
        assert_eq!(metadata.length, 1_800_000);
        assert_eq!(metadata.program_title.as_deref(), Some("Morning Show"));
        assert_eq!(metadata.episode_season_number.as_deref(), Some("2"));
        assert_eq!(metadata.feed_type, Some(FeedType::WestHd));
        assert_eq!(metadata.delivery_mode, Some(DeliveryMode::Linear));
        assert_eq!(
            metadata.video_dimension,
            Some(VideoDimension {
                width: 1920,
                height: 1080
            })
        );
        assert_eq!(metadata.custom_labels["campaign"], "spring");
        assert!(!metadata.classify_as_audio_stream);
    }

    #[test]
    fn from_json_tolerates_unknown_classification_strings() {
        let metadata = ContentMetadata::from_json(json!({
            "mediaType": "hologram",
            "feedType": "northhd",
            "deliveryMode": "catchup",
        }))
        .unwrap();
        assert_eq!(metadata.media_type, MediaType::Other);
        assert_eq!(metadata.feed_type, None);
        assert_eq!(metadata.delivery_mode, None);
    }

    #[test]
    fn from_json_rejects_malformed_objects() {
        let err = ContentMetadata::from_json(json!({"length": "long"})).unwrap_err();
        assert_eq!(err.code_str(), "tracker/invalid-argument");
    }

    #[test]
    fn builders_compose() {
        let metadata = ContentMetadata::new()
            .with_media_type(MediaType::Live)
            .with_unique_id("live-42")
            .with_length(0)
            .with_program_title("Evening News")
            .with_custom_label("region", "emea");
        assert_eq!(metadata.media_type, MediaType::Live);
        assert_eq!(metadata.unique_id.as_deref(), Some("live-42"));
        assert_eq!(metadata.custom_labels["region"], "emea");
    }
}
