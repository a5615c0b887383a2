//! Timeout fields in `config.toml`
//!
//! A timeout is written as a humantime string (`"20s"`, `"1m 30s"`,
//! `"750ms"`) or as a number of seconds, fractions allowed (`20`, `2.5`).
//! Values are always written back as humantime strings.

use serde::de::{self, Visitor};
use serde::{Deserializer, Serializer};
use std::{fmt, time::Duration};

fn render(timeout: &Duration) -> String {
    humantime::format_duration(*timeout).to_string()
}

struct TimeoutVisitor;

impl<'de> Visitor<'de> for TimeoutVisitor {
    type Value = Duration;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a timeout such as \"20s\" or a number of seconds")
    }

    fn visit_u64<E: de::Error>(self, seconds: u64) -> Result<Duration, E> {
        Ok(Duration::from_secs(seconds))
    }

    fn visit_i64<E: de::Error>(self, seconds: i64) -> Result<Duration, E> {
        u64::try_from(seconds)
            .map(Duration::from_secs)
            .map_err(|_| E::custom(format!("timeout cannot be negative: {seconds}")))
    }

    fn visit_f64<E: de::Error>(self, seconds: f64) -> Result<Duration, E> {
        Duration::try_from_secs_f64(seconds)
            .map_err(|_| E::custom(format!("timeout out of range: {seconds}")))
    }

    fn visit_str<E: de::Error>(self, text: &str) -> Result<Duration, E> {
        humantime::parse_duration(text.trim())
            .map_err(|e| E::custom(format!("timeout '{text}' is not a duration: {e}")))
    }
}

/// `#[serde(with = "duration_serde::duration")]` for required timeouts
pub mod duration {
    use super::*;

    pub fn serialize<S: Serializer>(timeout: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&render(timeout))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        deserializer.deserialize_any(TimeoutVisitor)
    }
}

/// Per-adapter timeouts, absent when the adapter has no budget of its own
pub mod option_duration {
    use super::*;

    pub fn serialize<S: Serializer>(
        timeout: &Option<Duration>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match timeout {
            Some(timeout) => serializer.serialize_some(&render(timeout)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Duration>, D::Error> {
        deserializer.deserialize_any(TimeoutVisitor).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};
    use std::time::Duration;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Timeouts {
        #[serde(with = "super::duration")]
        request: Duration,
        #[serde(
            default,
            with = "super::option_duration",
            skip_serializing_if = "Option::is_none"
        )]
        adapter: Option<Duration>,
    }

    #[test]
    fn test_human_readable_and_numeric() {
        let parsed: Timeouts = toml::from_str("request = \"1m 30s\"\nadapter = 5").unwrap();
        assert_eq!(parsed.request, Duration::from_secs(90));
        assert_eq!(parsed.adapter, Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_optional_duration_may_be_absent() {
        let parsed: Timeouts = toml::from_str("request = \"500ms\"").unwrap();
        assert_eq!(parsed.request, Duration::from_millis(500));
        assert!(parsed.adapter.is_none());

        let rendered = toml::to_string(&parsed).unwrap();
        assert_eq!(rendered.trim(), "request = \"500ms\"");
    }

    #[test]
    fn test_fractional_seconds() {
        let parsed: Timeouts = toml::from_str("request = 2.5").unwrap();
        assert_eq!(parsed.request, Duration::from_millis(2500));
    }

    #[test]
    fn test_invalid_duration_is_rejected() {
        assert!(toml::from_str::<Timeouts>("request = \"soon\"").is_err());
        assert!(toml::from_str::<Timeouts>("request = -3").is_err());
    }
}
