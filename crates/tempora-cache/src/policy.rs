//! Request classification and cache generation naming.

use url::Url;

/// The two named cache partitions for one version token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationNames {
    pub static_gen: String,
    pub api_gen: String,
}

impl GenerationNames {
    /// Derive the generation names from a version token, e.g. `v1` gives
    /// `static-v1` and `api-v1`.
    pub fn new(version: &str) -> Self {
        Self {
            static_gen: format!("static-{version}"),
            api_gen: format!("api-{version}"),
        }
    }

    /// The generations that survive an activation sweep.
    pub fn current(&self) -> [&str; 2] {
        [&self.static_gen, &self.api_gen]
    }
}

/// Which caching policy applies to a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestClass {
    /// Weather/geocoding API call: network-first
    Api,
    /// App shell, scripts, styles, media: stale-while-revalidate
    Static,
}

/// Classify a request by its host.
pub fn classify(url: &Url, api_hosts: &[String]) -> RequestClass {
    match url.host_str() {
        Some(host) if api_hosts.iter().any(|h| h == host) => RequestClass::Api,
        _ => RequestClass::Static,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hosts() -> Vec<String> {
        vec![
            "api.open-meteo.com".to_string(),
            "geocoding-api.open-meteo.com".to_string(),
        ]
    }

    #[test]
    fn test_generation_names() {
        let names = GenerationNames::new("v2");
        assert_eq!(names.static_gen, "static-v2");
        assert_eq!(names.api_gen, "api-v2");
        assert_eq!(names.current(), ["static-v2", "api-v2"]);
    }

    #[test]
    fn test_api_hosts_classify_as_api() {
        let url = Url::parse("https://api.open-meteo.com/v1/forecast?latitude=1").unwrap();
        assert_eq!(classify(&url, &hosts()), RequestClass::Api);

        let url = Url::parse("https://geocoding-api.open-meteo.com/v1/search?name=x").unwrap();
        assert_eq!(classify(&url, &hosts()), RequestClass::Api);
    }

    #[test]
    fn test_other_hosts_classify_as_static() {
        let url = Url::parse("https://example.com/styles/index.css").unwrap();
        assert_eq!(classify(&url, &hosts()), RequestClass::Static);
    }
}
