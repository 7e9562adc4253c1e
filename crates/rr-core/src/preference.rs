//! Runner preferences and the node tags they act on.
//!
//! Each graph node carries a [`NodeTag`].  A request's [`Preferences`] turn
//! the tags at both ends of an edge into a multiplier on the edge length:
//!
//! | Condition                              | Factor |
//! |----------------------------------------|--------|
//! | park at either end, parks preferred    | 0.7    |
//! | river at either end, rivers preferred  | 0.8    |
//! | river at either end, dark ways avoided | 1.5    |
//!
//! Factors compound, so a riverside edge for a runner who likes rivers but
//! avoids dark ways costs `0.8 × 1.5 = 1.2` times its length.

pub const PARK_FACTOR:  f64 = 0.7;
pub const RIVER_FACTOR: f64 = 0.8;
/// Riverside ways are assumed unlit.
pub const DARK_FACTOR:  f64 = 1.5;

// ── NodeTag ───────────────────────────────────────────────────────────────────

/// What a node sits in or next to.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum NodeTag {
    #[default]
    Normal,
    Park,
    River,
}

impl NodeTag {
    /// Classify a provider label such as a node name or a `tag` cell.
    /// Case-insensitive; `"Riverside Park"` is a park.
    pub fn from_label(label: &str) -> Self {
        let label = label.to_lowercase();
        if label.contains("park") {
            NodeTag::Park
        } else if label.contains("river") {
            NodeTag::River
        } else {
            NodeTag::Normal
        }
    }
}

// ── Preferences ───────────────────────────────────────────────────────────────

/// A kind of place the runner wants to pass.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum Place {
    Park,
    River,
    /// Accepted and ignored (`"scenic"`, `"hill"`, …).
    #[cfg_attr(feature = "serde", serde(other))]
    Other,
}

impl From<&str> for Place {
    fn from(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "park"  => Place::Park,
            "river" => Place::River,
            _       => Place::Other,
        }
    }
}

/// A condition the runner wants to stay away from.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum Avoid {
    Dark,
    #[cfg_attr(feature = "serde", serde(other))]
    Other,
}

impl From<&str> for Avoid {
    fn from(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "dark" => Avoid::Dark,
            _      => Avoid::Other,
        }
    }
}

/// Per-request routing preferences.  The default prefers nothing, and routes
/// are then plain shortest paths by length.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct Preferences {
    pub places: Vec<Place>,
    pub avoid:  Vec<Avoid>,
}

impl Preferences {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_place(mut self, place: Place) -> Self {
        self.places.push(place);
        self
    }

    pub fn with_avoid(mut self, avoid: Avoid) -> Self {
        self.avoid.push(avoid);
        self
    }

    #[inline]
    pub fn prefers(&self, place: Place) -> bool {
        self.places.contains(&place)
    }

    #[inline]
    pub fn avoids(&self, avoid: Avoid) -> bool {
        self.avoid.contains(&avoid)
    }

    /// `true` if no preference changes any edge cost.
    pub fn is_neutral(&self) -> bool {
        !(self.prefers(Place::Park) || self.prefers(Place::River) || self.avoids(Avoid::Dark))
    }

    /// Cost multiplier for an edge whose endpoints carry tags `a` and `b`.
    pub fn edge_factor(&self, a: NodeTag, b: NodeTag) -> f64 {
        let touches = |tag: NodeTag| a == tag || b == tag;
        let mut factor = 1.0;
        if touches(NodeTag::Park) && self.prefers(Place::Park) {
            factor *= PARK_FACTOR;
        }
        if touches(NodeTag::River) {
            if self.prefers(Place::River) {
                factor *= RIVER_FACTOR;
            }
            if self.avoids(Avoid::Dark) {
                factor *= DARK_FACTOR;
            }
        }
        factor
    }
}
