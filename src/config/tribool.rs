//! Tri-state boolean distinguishing "not set" from an explicit `false`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A boolean that remembers whether anyone set it.
///
/// Default filling only ever touches [`TriBool::Unset`]; an explicit `false`
/// from the file or the environment is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TriBool {
    #[default]
    Unset,
    True,
    False,
}

impl TriBool {
    pub fn is_unset(&self) -> bool {
        matches!(self, TriBool::Unset)
    }

    /// The explicit value, if any.
    pub fn get(self) -> Option<bool> {
        match self {
            TriBool::Unset => None,
            TriBool::True => Some(true),
            TriBool::False => Some(false),
        }
    }

    /// Replace `Unset` with `default`; explicit values are left alone.
    pub fn fill(&mut self, default: bool) {
        if self.is_unset() {
            *self = default.into();
        }
    }
}

impl From<bool> for TriBool {
    fn from(value: bool) -> Self {
        if value { TriBool::True } else { TriBool::False }
    }
}

impl From<Option<bool>> for TriBool {
    fn from(value: Option<bool>) -> Self {
        value.map_or(TriBool::Unset, TriBool::from)
    }
}

impl Serialize for TriBool {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.get() {
            Some(value) => serializer.serialize_bool(value),
            None => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for TriBool {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<bool>::deserialize(deserializer).map(TriBool::from)
    }
}
