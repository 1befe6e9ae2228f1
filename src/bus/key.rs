//! Compound clip addressing
//!
//! Every subscription and every routed event is addressed by the pair of
//! collection id and clip id. Nothing else in the protocol carries an
//! ordering token, so the key is the whole address.

use serde::{Deserialize, Deserializer};

/// Identifier of a collection within the catalog
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CollectionId(String);

/// Identifier of a clip within its collection
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClipId(String);

/// Raw id as it appears on the wire
///
/// The catalog endpoint serializes ids as JSON strings while stream events
/// from older server revisions carry them as integers. Both decode to the
/// same canonical string form so a clip maps to the same key everywhere.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(u64),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(s) => s,
            RawId::Number(n) => n.to_string(),
        }
    }
}

macro_rules! id_impls {
    ($name:ident) => {
        impl $name {
            /// Create an id from its canonical string form
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Canonical string form
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                RawId::deserialize(deserializer).map(|raw| Self(raw.into()))
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(id.to_string())
            }
        }
    };
}

id_impls!(CollectionId);
id_impls!(ClipId);

/// Unique address of a clip (collection id + clip id)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClipKey {
    /// Owning collection
    pub coll: CollectionId,
    /// Clip within the collection
    pub clip: ClipId,
}

impl ClipKey {
    /// Create a new clip key
    pub fn new(coll: impl Into<CollectionId>, clip: impl Into<ClipId>) -> Self {
        Self {
            coll: coll.into(),
            clip: clip.into(),
        }
    }
}

impl std::fmt::Display for ClipKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.coll, self.clip)
    }
}
