//! Tagged encoding for map- and set-valued fields.
//!
//! Maps and sets are written as `{ "kind": "map" | "set", "entries": [...] }`
//! so that non-string keys (positions, enums) survive a generic JSON pass and
//! the shape of the field can be checked when decoding. Use through
//! `#[serde(with = "crate::state::tagged::map")]` or `...::set`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Serialize)]
struct TaggedRef<'a, E> {
    kind: &'a str,
    entries: E,
}

#[derive(Deserialize)]
struct TaggedOwned<E> {
    kind: String,
    entries: E,
}

fn check_kind<E: serde::de::Error>(expected: &str, found: &str) -> Result<(), E> {
    if expected == found {
        Ok(())
    } else {
        Err(E::custom(format!(
            "expected tagged `{expected}`, found `{found}`"
        )))
    }
}

pub mod map {
    use std::collections::BTreeMap;

    use super::*;

    pub const KIND: &str = "map";

    pub fn serialize<K, V, S>(map: &BTreeMap<K, V>, serializer: S) -> Result<S::Ok, S::Error>
    where
        K: Serialize,
        V: Serialize,
        S: Serializer,
    {
        let entries: Vec<(&K, &V)> = map.iter().collect();
        TaggedRef {
            kind: KIND,
            entries,
        }
        .serialize(serializer)
    }

    pub fn deserialize<'de, K, V, D>(deserializer: D) -> Result<BTreeMap<K, V>, D::Error>
    where
        K: Deserialize<'de> + Ord,
        V: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        let tagged = TaggedOwned::<Vec<(K, V)>>::deserialize(deserializer)?;
        check_kind::<D::Error>(KIND, &tagged.kind)?;
        Ok(tagged.entries.into_iter().collect())
    }
}

pub mod set {
    use std::collections::BTreeSet;

    use super::*;

    pub const KIND: &str = "set";

    pub fn serialize<T, S>(set: &BTreeSet<T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Serialize,
        S: Serializer,
    {
        let entries: Vec<&T> = set.iter().collect();
        TaggedRef {
            kind: KIND,
            entries,
        }
        .serialize(serializer)
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<BTreeSet<T>, D::Error>
    where
        T: Deserialize<'de> + Ord,
        D: Deserializer<'de>,
    {
        let tagged = TaggedOwned::<Vec<T>>::deserialize(deserializer)?;
        check_kind::<D::Error>(KIND, &tagged.kind)?;
        Ok(tagged.entries.into_iter().collect())
    }
}
