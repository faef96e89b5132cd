use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};

/// Whether the end user consented to audience measurement. Wire values
/// follow the `cs_ucfr` label convention: `"1"` granted, `"0"` denied,
/// `"-1"` undecided.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UserConsent {
    Denied,
    Granted,
    #[default]
    Unknown,
}

impl UserConsent {
    pub fn from_key(value: &str) -> Self {
        match value {
            "0" => UserConsent::Denied,
            "1" => UserConsent::Granted,
            _ => UserConsent::Unknown,
        }
    }

    pub fn as_label_value(self) -> &'static str {
        match self {
            UserConsent::Denied => "0",
            UserConsent::Granted => "1",
            UserConsent::Unknown => "-1",
        }
    }

    /// True for Granted and Denied; only decided consent is reported to the
    /// backend as a persistent label.
    pub fn is_decided(self) -> bool {
        !matches!(self, UserConsent::Unknown)
    }
}

/// Controls when the backend refreshes usage properties on its own.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UsagePropertiesAutoUpdateMode {
    #[default]
    ForegroundOnly,
    ForegroundAndBackground,
    Disabled,
}

impl UsagePropertiesAutoUpdateMode {
    pub fn from_key(value: &str) -> Self {
        match value {
            "foregroundOnly" => UsagePropertiesAutoUpdateMode::ForegroundOnly,
            "foregroundAndBackground" => UsagePropertiesAutoUpdateMode::ForegroundAndBackground,
            "disabled" => UsagePropertiesAutoUpdateMode::Disabled,
            other => {
                log::warn!(
                    "unrecognized usage properties auto-update mode `{other}`; falling back to foregroundOnly"
                );
                UsagePropertiesAutoUpdateMode::ForegroundOnly
            }
        }
    }
}

/// Configuration accepted by [`crate::tracker::Tracker::initialize`].
///
/// Both recognized identity keys are optional: a configuration without a
/// publisher id turns initialization into a no-op. The remaining fields
/// default to the most conservative behavior.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TrackerConfig {
    pub publisher_id: Option<String>,
    pub application_name: Option<String>,
    #[serde(deserialize_with = "de_user_consent")]
    pub user_consent: UserConsent,
    #[serde(deserialize_with = "de_auto_update_mode")]
    pub usage_properties_auto_update_mode: UsagePropertiesAutoUpdateMode,
    pub secure_transmission: bool,
    pub child_directed: bool,
    pub debug: bool,
}

fn de_user_consent<'de, D>(deserializer: D) -> Result<UserConsent, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value
        .as_deref()
        .map(UserConsent::from_key)
        .unwrap_or_default())
}

fn de_auto_update_mode<'de, D>(
    deserializer: D,
) -> Result<UsagePropertiesAutoUpdateMode, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value
        .as_deref()
        .map(UsagePropertiesAutoUpdateMode::from_key)
        .unwrap_or_default())
}

impl TrackerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_publisher_id(mut self, id: impl Into<String>) -> Self {
        self.publisher_id = Some(id.into());
        self
    }

    pub fn with_application_name(mut self, name: impl Into<String>) -> Self {
        self.application_name = Some(name.into());
        self
    }

    pub fn with_user_consent(mut self, consent: UserConsent) -> Self {
        self.user_consent = consent;
        self
    }

    /// Builds a configuration from a plain string map, the shape the
    /// bridge-facing initialization call receives. Unknown keys are
    /// ignored; missing keys keep their defaults.
    pub fn from_map(map: &BTreeMap<String, String>) -> Self {
        let mut config = Self::default();
        if let Some(id) = map.get("publisherId") {
            config.publisher_id = Some(id.clone());
        }
        if let Some(name) = map.get("applicationName") {
            config.application_name = Some(name.clone());
        }
        if let Some(consent) = map.get("userConsent") {
            config.user_consent = UserConsent::from_key(consent);
        }
        if let Some(mode) = map.get("usagePropertiesAutoUpdateMode") {
            config.usage_properties_auto_update_mode = UsagePropertiesAutoUpdateMode::from_key(mode);
        }
        if let Some(value) = map.get("secureTransmission") {
            config.secure_transmission = parse_flag(value);
        }
        if let Some(value) = map.get("childDirected") {
            config.child_directed = parse_flag(value);
        }
        if let Some(value) = map.get("debug") {
            config.debug = parse_flag(value);
        }
        config
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value, "true" | "1")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn from_map_reads_recognized_keys() {
        let config = TrackerConfig::from_map(&map(&[
            ("publisherId", "20634243"),
            ("applicationName", "NewsReader"),
            ("userConsent", "1"),
            ("usagePropertiesAutoUpdateMode", "foregroundAndBackground"),
            ("secureTransmission", "true"),
            ("childDirected", "false"),
            ("debug", "1"),
        ]));
        assert_eq!(config.publisher_id.as_deref(), Some("20634243"));
        assert_eq!(config.application_name.as_deref(), Some("NewsReader"));
        assert_eq!(config.user_consent, UserConsent::Granted);
        assert_eq!(
            config.usage_properties_auto_update_mode,
            UsagePropertiesAutoUpdateMode::ForegroundAndBackground
        );
        assert!(config.secure_transmission);
        assert!(!config.child_directed);
        assert!(config.debug);
    }

    #[test]
    fn from_map_ignores_unknown_keys_and_defaults_missing_ones() {
        let config = TrackerConfig::from_map(&map(&[("theme", "dark")]));
        assert_eq!(config, TrackerConfig::default());
        assert_eq!(config.user_consent, UserConsent::Unknown);
        assert_eq!(
            config.usage_properties_auto_update_mode,
            UsagePropertiesAutoUpdateMode::ForegroundOnly
        );
    }

    #[test]
    fn unknown_auto_update_mode_falls_back_to_foreground_only() {
        let config = TrackerConfig::from_map(&map(&[(
            "usagePropertiesAutoUpdateMode",
            "sometimes",
        )]));
        assert_eq!(
            config.usage_properties_auto_update_mode,
            UsagePropertiesAutoUpdateMode::ForegroundOnly
        );
    }

    #[test]
    fn consent_round_trips_through_label_values() {
        for consent in [UserConsent::Denied, UserConsent::Granted, UserConsent::Unknown] {
            assert_eq!(UserConsent::from_key(consent.as_label_value()), consent);
        }
        assert_eq!(UserConsent::from_key("2"), UserConsent::Unknown);
        assert!(UserConsent::Granted.is_decided());
        assert!(UserConsent::Denied.is_decided());
        assert!(!UserConsent::Unknown.is_decided());
    }

    #[test]
    fn deserializes_from_camel_case_json() {
        let config: TrackerConfig = serde_json::from_value(serde_json::json!({
            "publisherId": "20634243",
            "applicationName": "NewsReader",
            "userConsent": "0",
            "usagePropertiesAutoUpdateMode": "disabled",
            "childDirected": true,
        }))
        .unwrap();
        assert_eq!(config.publisher_id.as_deref(), Some("20634243"));
        assert_eq!(config.user_consent, UserConsent::Denied);
        assert_eq!(
            config.usage_properties_auto_update_mode,
            UsagePropertiesAutoUpdateMode::Disabled
        );
        assert!(config.child_directed);
        assert!(!config.debug);
    }
}
