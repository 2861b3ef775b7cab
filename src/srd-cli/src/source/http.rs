//! Live API source backed by ureq.

use serde_json::Value;
use srd::{Collection, ResourceList, RulesSource, SourceError};
use std::time::Duration;
use tracing::debug;

pub struct HttpSource {
    base_url: String,
    agent: ureq::Agent,
}

impl HttpSource {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            agent,
        }
    }

    /// Absolute URL for a reference. Relative references are joined to the base.
    fn url_for(&self, reference: &str) -> String {
        if reference.starts_with("http://") || reference.starts_with("https://") {
            reference.to_string()
        } else if reference.starts_with('/') {
            format!("{}{}", self.base_url, reference)
        } else {
            format!("{}/{}", self.base_url, reference)
        }
    }

    fn get_json(&self, url: &str) -> Result<Value, SourceError> {
        debug!("GET {}", url);
        let response = match self.agent.get(url).call() {
            Ok(resp) => resp,
            Err(ureq::Error::Status(code, _)) => {
                return Err(SourceError::Transport(format!(
                    "Server returned {} for {}",
                    code, url
                )));
            }
            Err(e) => {
                return Err(SourceError::Transport(format!(
                    "Request to {} failed: {}",
                    url, e
                )));
            }
        };

        response
            .into_json()
            .map_err(|e| SourceError::Decode(format!("{}: {}", url, e)))
    }
}

impl RulesSource for HttpSource {
    fn fetch_list(&self, collection: Collection) -> Result<ResourceList, SourceError> {
        let url = self.url_for(&format!("/api/{}", collection.path()));
        let body = self.get_json(&url)?;
        Ok(ResourceList::from_value(&body))
    }

    fn fetch_detail(&self, reference: &str) -> Result<Value, SourceError> {
        self.get_json(&self.url_for(reference))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> HttpSource {
        HttpSource::new("https://rules.example/", Duration::from_secs(1))
    }

    #[test]
    fn test_relative_reference_joined_to_base() {
        let s = source();
        assert_eq!(
            s.url_for("/api/monsters/goblin"),
            "https://rules.example/api/monsters/goblin"
        );
        assert_eq!(
            s.url_for("api/spells/fireball"),
            "https://rules.example/api/spells/fireball"
        );
    }

    #[test]
    fn test_absolute_reference_kept() {
        assert_eq!(
            source().url_for("http://mirror.local/api/races/elf"),
            "http://mirror.local/api/races/elf"
        );
    }

    #[test]
    fn test_unreachable_host_is_transport_error() {
        let s = HttpSource::new("http://127.0.0.1:9", Duration::from_millis(200));
        let err = s.fetch_detail("/api/monsters/goblin").unwrap_err();
        assert!(matches!(err, SourceError::Transport(_)));
    }
}
