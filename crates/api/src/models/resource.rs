use super::position::Range;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Resource namespace: project-local (`app`) or platform-provided (`sys`).
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum ResourceScope {
    App,
    Sys,
}

impl ResourceScope {
    pub const ALL: [ResourceScope; 2] = [ResourceScope::App, ResourceScope::Sys];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceScope::App => "app",
            ResourceScope::Sys => "sys",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ResourceScope::App => "Application resources",
            ResourceScope::Sys => "System resources",
        }
    }
}

impl fmt::Display for ResourceScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceScope {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "app" => Ok(ResourceScope::App),
            "sys" => Ok(ResourceScope::Sys),
            _ => Err(()),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Color,
    String,
    Float,
    Boolean,
    Integer,
    Media,
    Profile,
    Symbol,
    Plural,
    // Structured kinds only appear inside declaration files.
    IntArray,
    StrArray,
    Pattern,
    Theme,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 13] = [
        ResourceKind::Color,
        ResourceKind::String,
        ResourceKind::Float,
        ResourceKind::Boolean,
        ResourceKind::Integer,
        ResourceKind::Media,
        ResourceKind::Profile,
        ResourceKind::Symbol,
        ResourceKind::Plural,
        ResourceKind::IntArray,
        ResourceKind::StrArray,
        ResourceKind::Pattern,
        ResourceKind::Theme,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Color => "color",
            ResourceKind::String => "string",
            ResourceKind::Float => "float",
            ResourceKind::Boolean => "boolean",
            ResourceKind::Integer => "integer",
            ResourceKind::Media => "media",
            ResourceKind::Profile => "profile",
            ResourceKind::Symbol => "symbol",
            ResourceKind::Plural => "plural",
            ResourceKind::IntArray => "intarray",
            ResourceKind::StrArray => "strarray",
            ResourceKind::Pattern => "pattern",
            ResourceKind::Theme => "theme",
        }
    }

    /// Whether `scope.<kind>.name` is a valid reference shape.
    pub fn is_referable(&self) -> bool {
        !matches!(
            self,
            ResourceKind::IntArray
                | ResourceKind::StrArray
                | ResourceKind::Pattern
                | ResourceKind::Theme
        )
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResourceKind::ALL
            .iter()
            .find(|kind| kind.as_str() == s)
            .copied()
            .ok_or(())
    }
}

/// A parsed `scope.type.name` string.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceReference {
    pub scope: ResourceScope,
    pub kind: ResourceKind,
    pub name: String,
    pub raw: String,
}

impl ResourceReference {
    /// Returns `None` for anything that is not exactly three dot-separated
    /// segments with a known scope, a referable kind and a non-empty name.
    pub fn parse(raw: &str) -> Option<Self> {
        let mut parts = raw.split('.');
        let scope = parts.next()?.parse::<ResourceScope>().ok()?;
        let kind = parts.next()?.parse::<ResourceKind>().ok()?;
        let name = parts.next()?;
        if parts.next().is_some() || name.is_empty() || !kind.is_referable() {
            return None;
        }
        Some(Self {
            scope,
            kind,
            name: name.to_string(),
            raw: raw.to_string(),
        })
    }

    pub fn key(&self) -> IndexKey {
        IndexKey::new(self.scope, self.kind, &self.name)
    }
}

impl fmt::Display for ResourceReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.scope, self.kind, self.name)
    }
}

/// Index key: the `scope.type.name` triple.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IndexKey {
    pub scope: ResourceScope,
    pub kind: ResourceKind,
    pub name: String,
}

impl IndexKey {
    pub fn new(scope: ResourceScope, kind: ResourceKind, name: &str) -> Self {
        Self {
            scope,
            kind,
            name: name.to_string(),
        }
    }
}

impl fmt::Display for IndexKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.scope, self.kind, self.name)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ResourceLocation {
    pub uri: PathBuf,
    /// Absent for synthesized locations such as a media file.
    pub range: Option<Range>,
    pub value: Option<String>,
}

impl ResourceLocation {
    pub fn file(uri: PathBuf) -> Self {
        Self {
            uri,
            range: None,
            value: None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct IndexItem {
    pub scope: ResourceScope,
    pub kind: ResourceKind,
    pub name: String,
    pub location: ResourceLocation,
}

impl IndexItem {
    pub fn key(&self) -> IndexKey {
        IndexKey::new(self.scope, self.kind, &self.name)
    }

    pub fn value(&self) -> Option<&str> {
        self.location.value.as_deref()
    }
}

/// One named entry inside an element declaration file.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub kind: ResourceKind,
    pub name: String,
    pub value_text: String,
    pub name_range: Range,
    pub uri: PathBuf,
}

impl Declaration {
    pub fn location(&self) -> ResourceLocation {
        ResourceLocation {
            uri: self.uri.clone(),
            range: Some(self.name_range),
            value: Some(self.value_text.clone()),
        }
    }
}

/// Every qualified variant (`base`, `dark`, `en_US`, ...) declaring the same name.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct NameReference {
    pub kind: ResourceKind,
    pub name: String,
    pub references: Vec<Declaration>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_reference() {
        let r = ResourceReference::parse("app.color.primary").unwrap();
        assert_eq!(r.scope, ResourceScope::App);
        assert_eq!(r.kind, ResourceKind::Color);
        assert_eq!(r.name, "primary");
        assert_eq!(r.raw, "app.color.primary");
        assert_eq!(r.to_string(), "app.color.primary");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(ResourceReference::parse("").is_none());
        assert!(ResourceReference::parse("app.color").is_none());
        assert!(ResourceReference::parse("app.color.").is_none());
        assert!(ResourceReference::parse("lib.color.primary").is_none());
        assert!(ResourceReference::parse("app.colour.primary").is_none());
        assert!(ResourceReference::parse("app.color.a.b").is_none());
        // structured kinds are declarable but not referable
        assert!(ResourceReference::parse("app.strarray.names").is_none());
    }

    #[test]
    fn test_kind_round_trip_names() {
        for kind in ResourceKind::ALL {
            assert_eq!(kind.as_str().parse::<ResourceKind>(), Ok(kind));
        }
        assert!("element".parse::<ResourceKind>().is_err());
    }
}
