// .env.server document
// Sectioned key=value lines read by the bot at startup

use std::path::Path;

/// Default location of the generated file, relative to the working directory
pub const DEFAULT_ENV_FILE: &str = ".env.server";

#[derive(Debug, Clone, PartialEq, Eq)]
struct Section {
    title: String,
    entries: Vec<(String, String)>,
}

/// Ordered, sectioned `key=value` document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvFile {
    sections: Vec<Section>,
}

impl EnvFile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new `#<title>` section; following entries land in it
    pub fn section(&mut self, title: impl Into<String>) -> &mut Self {
        self.sections.push(Section {
            title: title.into(),
            entries: Vec::new(),
        });
        self
    }

    /// Append an entry to the current section
    pub fn entry(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        if self.sections.is_empty() {
            self.section("");
        }
        if let Some(section) = self.sections.last_mut() {
            section.entries.push((key.into(), value.into()));
        }
        self
    }

    /// Look an entry up by key, last write wins
    pub fn get(&self, key: &str) -> Option<&str> {
        self.sections
            .iter()
            .flat_map(|s| s.entries.iter())
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .last()
    }

    pub fn len(&self) -> usize {
        self.sections.iter().map(|s| s.entries.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        for (i, section) in self.sections.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            if !section.title.is_empty() {
                out.push('#');
                out.push_str(&section.title);
                out.push('\n');
            }
            for (key, value) in &section.entries {
                out.push_str(key);
                out.push('=');
                out.push_str(value);
                out.push('\n');
            }
        }
        out
    }

    /// Overwrite `path` with the rendered document
    pub async fn write_to(&self, path: &Path) -> std::io::Result<()> {
        tokio::fs::write(path, self.render().as_bytes()).await
    }
}
