//! URL utilities for provider request construction
//!
//! Provider URLs carry API keys in their query strings, so anything that
//! ends up in a log line goes through [`UrlUtils::obfuscate_credentials`].

use regex::Regex;
use url::{form_urlencoded, Url};

/// URL utilities for consistent URL handling
pub struct UrlUtils;

impl UrlUtils {
    /// Join `path` onto `base` and append query parameters
    ///
    /// A trailing slash is added to the base before joining so that
    /// `https://host/api` + `v1/x` keeps the `api` segment.
    ///
    /// ```rust
    /// use listings_proxy::utils::url::UrlUtils;
    ///
    /// let url = UrlUtils::build("https://data.example.com", "v1.1/stations/10991/airings", &[("api_key", "k")]).unwrap();
    /// assert_eq!(url, "https://data.example.com/v1.1/stations/10991/airings?api_key=k");
    /// ```
    pub fn build(base: &str, path: &str, params: &[(&str, &str)]) -> Result<String, url::ParseError> {
        let base = if base.ends_with('/') {
            base.to_string()
        } else {
            format!("{base}/")
        };

        let mut url = Url::parse(&base)?.join(path.trim_start_matches('/'))?;
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params.iter());
        }
        Ok(url.to_string())
    }

    /// Fill `{entity}` and `{date}` placeholders in a page template
    ///
    /// Values are percent-encoded, so a `/` or `?` in an entity stays inside
    /// its placeholder.
    pub fn fill_template(template: &str, entity: &str, date: &str) -> String {
        template
            .replace("{entity}", &encode_component(entity))
            .replace("{date}", &encode_component(date))
    }

    /// Obfuscate credentials in URLs for safe logging
    ///
    /// ```rust
    /// use listings_proxy::utils::url::UrlUtils;
    ///
    /// let obfuscated = UrlUtils::obfuscate_credentials("https://host/v1?api_key=secret&zip=36330");
    /// assert_eq!(obfuscated, "https://host/v1?api_key=****&zip=36330");
    /// ```
    pub fn obfuscate_credentials(url: &str) -> String {
        let mut obfuscated = url.to_string();

        if let Ok(parsed) = Url::parse(url) {
            if !parsed.username().is_empty() || parsed.password().is_some() {
                let mut new_url = parsed.clone();
                let _ = new_url.set_username("****");
                let _ = new_url.set_password(Some("****"));
                obfuscated = new_url.to_string();
            }
        }

        let sensitive_params = ["api_key", "apikey", "key", "token", "password"];

        for param in &sensitive_params {
            let pattern = format!(r"(?i)([?&]{}=)[^&]*", regex::escape(param));
            if let Ok(re) = Regex::new(&pattern) {
                obfuscated = re.replace_all(&obfuscated, "${1}****").to_string();
            }
        }

        obfuscated
    }
}

fn encode_component(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}
