//! Optional serde support.
//!
//! [`ItemKind`] serializes as its SML name. [`Item`] serializes as its SML
//! text and is validated by the SML decoder when deserialized.

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};

use crate::item::Item;
use crate::kind::ItemKind;

impl Serialize for ItemKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for ItemKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_str(TextVisitor("an SECS-II item kind name", ItemKind::from_name))
    }
}

impl Serialize for Item {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.to_sml())
    }
}

impl<'de> Deserialize<'de> for Item {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_str(TextVisitor("SML text of an SECS-II item", Item::from_sml))
    }
}

/// Visits a string and converts it with a fallible parser.
struct TextVisitor<F>(&'static str, F);

impl<'de, T, F> Visitor<'de> for TextVisitor<F>
where
    F: FnOnce(&str) -> crate::Result<T>,
{
    type Value = T;

    fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<T, E> {
        (self.1)(v).map_err(E::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_serializes_as_name() {
        assert_eq!(serde_json::to_string(&ItemKind::Boolean).unwrap(), "\"BOOLEAN\"");
        let kind: ItemKind = serde_json::from_str("\"u2\"").unwrap();
        assert_eq!(kind, ItemKind::U2);
        assert!(serde_json::from_str::<ItemKind>("\"Z\"").is_err());
    }

    #[test]
    fn test_item_serializes_as_sml() {
        let item = Item::create("U1", vec![1, 2]).unwrap();
        let json = serde_json::to_string(&item).unwrap();
        assert_eq!(json, "\"<U1 [2] 1 2 >\"");

        let back: Item = serde_json::from_str(&json).unwrap();
        assert_eq!(back, item);

        assert!(serde_json::from_str::<Item>("\"<U1 300>\"").is_err());
    }
}
