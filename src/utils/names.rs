// Channel and role name normalization
// Server names become the keys used in .env.server

use once_cell::sync::Lazy;
use regex::Regex;

/// Off-topic slots are named like `ot0-some-joke` and rotate regularly
static OFF_TOPIC_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^ot\d(_.*)+").expect("failed to compile off-topic regex"));

/// Lowercase a server name and join its words with underscores
/// "Dev Environment" -> "dev_environment", "Off Topic-1" -> "off_topic_1"
pub fn normalize_name(name: &str) -> String {
    name.split(' ')
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("_")
        .replace('-', "_")
}

/// Whether a normalized name is an off-topic slot
pub fn is_off_topic(normalized: &str) -> bool {
    OFF_TOPIC_NAME.is_match(normalized)
}

/// Renumbers off-topic channels in the order they are listed
#[derive(Debug, Default)]
pub struct OffTopicCounter {
    next: usize,
}

impl OffTopicCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize a raw name, replacing off-topic slots with `off_topic_<n>`
    pub fn key_for(&mut self, raw_name: &str) -> String {
        let name = normalize_name(raw_name);
        if !is_off_topic(&name) {
            return name;
        }

        let renamed = format!("off_topic_{}", self.next);
        self.next += 1;
        renamed
    }
}
