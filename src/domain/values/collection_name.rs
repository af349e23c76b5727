use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

const MIN_LEN: usize = 3;
const MAX_LEN: usize = 63;

/// Validated collection name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CollectionName(String);

impl CollectionName {
    pub fn new(name: &str) -> Result<Self, String> {
        let len = name.chars().count();
        if !(MIN_LEN..=MAX_LEN).contains(&len) {
            return Err(format!(
                "Collection name must be between {MIN_LEN} and {MAX_LEN} characters, got '{name}'"
            ));
        }
        let first = name.chars().next().unwrap_or('-');
        let last = name.chars().last().unwrap_or('-');
        if !first.is_ascii_alphanumeric() || !last.is_ascii_alphanumeric() {
            return Err(format!(
                "Collection name must start and end with a letter or digit, got '{name}'"
            ));
        }
        if let Some(c) = name
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.')))
        {
            return Err(format!("Collection name contains invalid character '{c}'"));
        }
        if name.contains("..") {
            return Err(format!("Collection name must not contain '..', got '{name}'"));
        }
        if name.parse::<Ipv4Addr>().is_ok() {
            return Err(format!("Collection name must not be an IPv4 address, got '{name}'"));
        }
        Ok(CollectionName(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CollectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CollectionName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CollectionName::new(s)
    }
}

impl TryFrom<String> for CollectionName {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        CollectionName::new(&s)
    }
}

impl From<CollectionName> for String {
    fn from(name: CollectionName) -> Self {
        name.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_typical_names() {
        assert!(CollectionName::new("arabic_listening_comprehension").is_ok());
        assert!(CollectionName::new("docs-v1.2").is_ok());
        assert!(CollectionName::new("abc").is_ok());
    }

    #[test]
    fn test_length_bounds() {
        assert!(CollectionName::new("ab").is_err());
        assert!(CollectionName::new(&"a".repeat(63)).is_ok());
        assert!(CollectionName::new(&"a".repeat(64)).is_err());
    }

    #[test]
    fn test_rejects_bad_edges_and_characters() {
        assert!(CollectionName::new("_docs").is_err());
        assert!(CollectionName::new("docs-").is_err());
        assert!(CollectionName::new("my docs").is_err());
        assert!(CollectionName::new("a..b").is_err());
    }

    #[test]
    fn test_rejects_ipv4() {
        assert!(CollectionName::new("192.168.0.1").is_err());
        assert!(CollectionName::new("192.168.0").is_ok());
    }
}
