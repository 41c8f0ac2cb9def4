// src/image/model.rs

use std::fmt;
use std::str::FromStr;

/// Reference to a hosted model: `owner/name`, optionally pinned to a
/// `:version`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelRef {
    pub owner: String,
    pub name: String,
    pub version: Option<String>,
}

impl ModelRef {
    /// `owner/name` without the version.
    pub fn slug(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

impl FromStr for ModelRef {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (slug, version) = match s.split_once(':') {
            Some((slug, version)) => {
                if version.is_empty() {
                    return Err(format!("model reference '{s}' has an empty version"));
                }
                (slug, Some(version.to_string()))
            }
            None => (s, None),
        };

        match slug.split_once('/') {
            Some((owner, name))
                if !owner.is_empty() && !name.is_empty() && !name.contains('/') =>
            {
                Ok(ModelRef {
                    owner: owner.to_string(),
                    name: name.to_string(),
                    version,
                })
            }
            _ => Err(format!(
                "invalid model reference '{s}' (expected \"owner/name\" or \"owner/name:version\")"
            )),
        }
    }
}

impl fmt::Display for ModelRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(v) => write!(f, "{}/{}:{}", self.owner, self.name, v),
            None => write!(f, "{}/{}", self.owner, self.name),
        }
    }
}
