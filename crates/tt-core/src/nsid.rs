use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// A parsed namespaced id: `<type>:<source>/<name>`.
///
/// The type may be dotted to refine a category (`card.action`,
/// `card.technology.unit_upgrade`). Classification never needs a side table:
/// everything the rules engine keys on is in the string itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Nsid {
    /// Object category, e.g. `unit`, `token`, `card.action`.
    pub kind: String,
    /// Content pack the object comes from, e.g. `base`, `pok`.
    pub source: String,
    /// Variant name within the category, e.g. `fighter`.
    pub name: String,
}

impl Nsid {
    /// Build an id from its three parts.
    pub fn new(kind: impl Into<String>, source: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            source: source.into(),
            name: name.into(),
        }
    }

    /// Parse `<type>:<source>/<name>`.
    pub fn parse(s: &str) -> CoreResult<Self> {
        let malformed = || CoreError::InvalidNsid(s.to_string());
        let (kind, rest) = s.split_once(':').ok_or_else(malformed)?;
        let (source, name) = rest.split_once('/').ok_or_else(malformed)?;
        if kind.is_empty() || source.is_empty() || name.is_empty() {
            return Err(malformed());
        }
        Ok(Self::new(kind, source, name))
    }

    /// True if this id's type is `kind` or a dotted refinement of it.
    pub fn is_type(&self, kind: &str) -> bool {
        self.kind == kind
            || self
                .kind
                .strip_prefix(kind)
                .is_some_and(|rest| rest.starts_with('.'))
    }
}

/// True if `id` parses and its type is `kind` or a refinement of it.
///
/// Unparsable ids match nothing.
pub fn matches_type(id: &str, kind: &str) -> bool {
    Nsid::parse(id).is_ok_and(|nsid| nsid.is_type(kind))
}

impl FromStr for Nsid {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Nsid {
    type Error = CoreError;

    fn try_from(s: String) -> CoreResult<Self> {
        Self::parse(&s)
    }
}

impl From<Nsid> for String {
    fn from(nsid: Nsid) -> Self {
        nsid.to_string()
    }
}

impl fmt::Display for Nsid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}/{}", self.kind, self.source, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parse_unit() {
        let nsid = Nsid::parse("unit:base/fighter").unwrap();
        assert_eq!(nsid.kind, "unit");
        assert_eq!(nsid.source, "base");
        assert_eq!(nsid.name, "fighter");
    }

    #[test]
    fn parse_dotted_type() {
        let nsid = Nsid::parse("card.technology.unit_upgrade:base/carrier_2").unwrap();
        assert_eq!(nsid.kind, "card.technology.unit_upgrade");
        assert_eq!(nsid.name, "carrier_2");
    }

    #[test]
    fn parse_rejects_missing_separators() {
        assert!(Nsid::parse("fighter").is_err());
        assert!(Nsid::parse("unit:fighter").is_err());
        assert!(Nsid::parse("unit/base:fighter").is_err());
        assert!(Nsid::parse(":base/fighter").is_err());
        assert!(Nsid::parse("unit:base/").is_err());
        assert!(Nsid::parse("").is_err());
    }

    #[test]
    fn type_matching_follows_dots() {
        assert!(matches_type("card.action:base/morale_boost", "card"));
        assert!(matches_type("card.action:base/morale_boost", "card.action"));
        assert!(!matches_type("cardboard:base/box", "card"));
        assert!(!matches_type("token:base/fighter_1", "unit"));
        assert!(!matches_type("garbage", "unit"));
    }

    #[test]
    fn serde_uses_string_form() {
        let nsid = Nsid::new("token", "base", "fighter_3");
        let json = serde_json::to_string(&nsid).unwrap();
        assert_eq!(json, "\"token:base/fighter_3\"");
        let back: Nsid = serde_json::from_str(&json).unwrap();
        assert_eq!(back, nsid);
        assert!(serde_json::from_str::<Nsid>("\"nope\"").is_err());
    }

    proptest! {
        #[test]
        fn display_parses_back(
            kind in "[a-z]{1,6}(\\.[a-z_]{1,8}){0,2}",
            source in "[a-z0-9.]{1,6}",
            name in "[a-z0-9_]{1,12}",
        ) {
            let nsid = Nsid::new(kind, source, name);
            prop_assert_eq!(Nsid::parse(&nsid.to_string()).unwrap(), nsid);
        }
    }
}
