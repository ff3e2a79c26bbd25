use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Address of a draggable element on the active slide.
///
/// Text form: `title`, `content`, `brand`, `asset-<id>`, `extra-<id>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ElementKey {
    Title,
    Content,
    Brand,
    Asset(String),
    Extra(String),
}

impl ElementKey {
    /// Whether committing this element writes to the project rather than a slide.
    pub fn is_project_level(&self) -> bool {
        matches!(self, Self::Brand)
    }
}

impl fmt::Display for ElementKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Title => f.write_str("title"),
            Self::Content => f.write_str("content"),
            Self::Brand => f.write_str("brand"),
            Self::Asset(id) => write!(f, "asset-{id}"),
            Self::Extra(id) => write!(f, "extra-{id}"),
        }
    }
}

impl FromStr for ElementKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "title" => Ok(Self::Title),
            "content" => Ok(Self::Content),
            "brand" => Ok(Self::Brand),
            _ => {
                if let Some(id) = s.strip_prefix("asset-").filter(|id| !id.is_empty()) {
                    Ok(Self::Asset(id.to_string()))
                } else if let Some(id) = s.strip_prefix("extra-").filter(|id| !id.is_empty()) {
                    Ok(Self::Extra(id.to_string()))
                } else {
                    Err(format!("Unknown element key: {s}"))
                }
            }
        }
    }
}

impl Serialize for ElementKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ElementKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_text_round_trip() {
        for text in ["title", "content", "brand", "asset-42", "extra-abc-def"] {
            let key: ElementKey = text.parse().unwrap();
            assert_eq!(key.to_string(), text);
        }
    }

    #[test]
    fn test_asset_id_may_contain_dashes() {
        let key: ElementKey = "asset-1f2e-33".parse().unwrap();
        assert_eq!(key, ElementKey::Asset("1f2e-33".into()));
    }

    #[test]
    fn test_unknown_keys_rejected() {
        assert!("asset-".parse::<ElementKey>().is_err());
        assert!("logo".parse::<ElementKey>().is_err());
    }
}
