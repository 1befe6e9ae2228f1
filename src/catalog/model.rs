//! Catalog data model
//!
//! The catalog is fetched once at startup and is immutable from this
//! layer's point of view; catalog edits happen server-side between
//! sessions.

use serde::{Deserialize, Deserializer};

use crate::bus::{ClipId, ClipKey, CollectionId};

/// Category of a collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollectionKind {
    /// Short musical drops
    Drops,
    /// Background music
    BackgroundMusic,
    /// Battle music
    BattleMusic,
    /// Sound effects
    Fx,
    /// Ambience recordings
    Ambience,
    /// Any kind this client revision does not know
    #[default]
    Other,
}

impl CollectionKind {
    /// Parse the wire tag; unknown tags fold into `Other` rather than
    /// failing the catalog decode
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "Drops" => CollectionKind::Drops,
            "BackgroundMusic" => CollectionKind::BackgroundMusic,
            "BattleMusic" => CollectionKind::BattleMusic,
            "Fx" => CollectionKind::Fx,
            "Ambience" => CollectionKind::Ambience,
            _ => CollectionKind::Other,
        }
    }

    /// Human-readable name for display
    pub fn display_name(self) -> &'static str {
        match self {
            CollectionKind::Drops => "Drops",
            CollectionKind::BackgroundMusic => "Background Music",
            CollectionKind::BattleMusic => "Battle Music",
            CollectionKind::Fx => "FX",
            CollectionKind::Ambience => "Ambience",
            CollectionKind::Other => "Other",
        }
    }
}

impl<'de> Deserialize<'de> for CollectionKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(CollectionKind::from_tag(&tag))
    }
}

/// A single playable audio unit
#[derive(Debug, Clone, Deserialize)]
pub struct Clip {
    /// Identifier within the owning collection
    pub id: ClipId,
    /// Display name
    pub name: String,
}

/// A named group of clips sharing a category
#[derive(Debug, Clone, Deserialize)]
pub struct Collection {
    /// Catalog-wide identifier
    pub id: CollectionId,
    /// Display name
    pub name: String,
    /// Category; absent in some protocol revisions
    #[serde(default)]
    pub kind: CollectionKind,
    /// Clips, in catalog order
    pub clips: Vec<Clip>,
}

impl Collection {
    /// The compound key addressing one of this collection's clips
    pub fn clip_key(&self, clip: &Clip) -> ClipKey {
        ClipKey::new(self.id.clone(), clip.id.clone())
    }
}

/// Ordered sequence of collections
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    /// Collections, in catalog order
    pub collections: Vec<Collection>,
}

impl Catalog {
    /// All clip keys in catalog order
    pub fn keys(&self) -> impl Iterator<Item = ClipKey> + '_ {
        self.collections
            .iter()
            .flat_map(|coll| coll.clips.iter().map(|clip| coll.clip_key(clip)))
    }

    /// Total number of clips
    pub fn clip_count(&self) -> usize {
        self.collections.iter().map(|coll| coll.clips.len()).sum()
    }

    /// Whether the catalog holds no collections at all
    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }
}
