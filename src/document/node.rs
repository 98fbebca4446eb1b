//! Property-list node representation.
//!
//! This module provides the core data structures for representing configuration
//! documents in plistquill. A document is a recursive tree made of exactly three
//! node kinds: mappings, sequences and scalars. Scalars are opaque to the
//! mutation engine; only mappings and sequences can be navigated or mutated.
//!
//! # Example
//!
//! ```
//! use plistquill::document::node::{Node, Scalar};
//! use indexmap::IndexMap;
//!
//! let mut security = IndexMap::new();
//! security.insert("AllowSetDefault".to_string(), Node::from(true));
//! security.insert("ScanPolicy".to_string(), Node::from(0));
//!
//! let node = Node::Mapping(security);
//! assert!(node.is_mapping());
//! assert_eq!(node.kind(), "mapping");
//!
//! let scalar = Node::Scalar(Scalar::String("OpenCore".to_string()));
//! assert!(scalar.is_scalar());
//! ```

use std::fmt;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::{DateTime, SecondsFormat, Utc};
use indexmap::IndexMap;
use serde::de::{self, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{SerializeMap, SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};

/// A terminal value in the document tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    String(String),
    Integer(i64),
    Real(f64),
    Boolean(bool),
    /// Raw bytes, written as `<data>` in property lists.
    Data(Vec<u8>),
    Date(DateTime<Utc>),
}

impl Scalar {
    /// Short type name used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Scalar::String(_) => "string",
            Scalar::Integer(_) => "integer",
            Scalar::Real(_) => "real",
            Scalar::Boolean(_) => "boolean",
            Scalar::Data(_) => "data",
            Scalar::Date(_) => "date",
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::String(s) => write!(f, "{}", s),
            Scalar::Integer(i) => write!(f, "{}", i),
            Scalar::Real(r) => write!(f, "{}", r),
            Scalar::Boolean(b) => write!(f, "{}", b),
            Scalar::Data(bytes) => write!(f, "{}", BASE64.encode(bytes)),
            Scalar::Date(date) => write!(f, "{}", date.to_rfc3339_opts(SecondsFormat::Secs, true)),
        }
    }
}

/// A node in a configuration document.
///
/// The variant set is closed: every operation of the mutation engine is a total
/// `match` over these three kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// String-keyed entries. Key order is kept for stable output only.
    Mapping(IndexMap<String, Node>),
    /// Zero-indexed ordered elements.
    Sequence(Vec<Node>),
    /// A terminal value.
    Scalar(Scalar),
}

impl Node {
    /// Creates an empty mapping node.
    pub fn mapping() -> Self {
        Node::Mapping(IndexMap::new())
    }

    /// Returns true if this node is a mapping.
    ///
    /// # Example
    ///
    /// ```
    /// use plistquill::document::node::Node;
    ///
    /// assert!(Node::mapping().is_mapping());
    /// assert!(!Node::from(42).is_mapping());
    /// ```
    pub fn is_mapping(&self) -> bool {
        matches!(self, Node::Mapping(_))
    }

    /// Returns true if this node is a sequence.
    pub fn is_sequence(&self) -> bool {
        matches!(self, Node::Sequence(_))
    }

    /// Returns true if this node is a scalar.
    pub fn is_scalar(&self) -> bool {
        matches!(self, Node::Scalar(_))
    }

    /// Short type name used in error messages and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Mapping(_) => "mapping",
            Node::Sequence(_) => "sequence",
            Node::Scalar(scalar) => scalar.kind(),
        }
    }

    /// Returns the text of a string scalar.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::Scalar(Scalar::String(s)) => Some(s),
            _ => None,
        }
    }

    /// Returns the value of a boolean scalar.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Node::Scalar(Scalar::Boolean(b)) => Some(*b),
            _ => None,
        }
    }

    /// Returns the entries of a mapping.
    pub fn as_mapping(&self) -> Option<&IndexMap<String, Node>> {
        match self {
            Node::Mapping(entries) => Some(entries),
            _ => None,
        }
    }

    /// Returns the elements of a sequence.
    pub fn as_sequence(&self) -> Option<&[Node]> {
        match self {
            Node::Sequence(elements) => Some(elements),
            _ => None,
        }
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Node::Scalar(Scalar::String(value.to_string()))
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Node::Scalar(Scalar::String(value))
    }
}

impl From<i64> for Node {
    fn from(value: i64) -> Self {
        Node::Scalar(Scalar::Integer(value))
    }
}

impl From<i32> for Node {
    fn from(value: i32) -> Self {
        Node::Scalar(Scalar::Integer(value.into()))
    }
}

impl From<f64> for Node {
    fn from(value: f64) -> Self {
        Node::Scalar(Scalar::Real(value))
    }
}

impl From<bool> for Node {
    fn from(value: bool) -> Self {
        Node::Scalar(Scalar::Boolean(value))
    }
}

impl From<Vec<u8>> for Node {
    fn from(value: Vec<u8>) -> Self {
        Node::Scalar(Scalar::Data(value))
    }
}

impl From<Vec<Node>> for Node {
    fn from(value: Vec<Node>) -> Self {
        Node::Sequence(value)
    }
}

impl From<IndexMap<String, Node>> for Node {
    fn from(value: IndexMap<String, Node>) -> Self {
        Node::Mapping(value)
    }
}

impl<K: Into<String>> FromIterator<(K, Node)> for Node {
    fn from_iter<I: IntoIterator<Item = (K, Node)>>(iter: I) -> Self {
        Node::Mapping(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

// Text formats have no blob or date type, so those go out as strings.
impl Serialize for Node {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Node::Mapping(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
            Node::Sequence(elements) => {
                let mut seq = serializer.serialize_seq(Some(elements.len()))?;
                for element in elements {
                    seq.serialize_element(element)?;
                }
                seq.end()
            }
            Node::Scalar(Scalar::String(s)) => serializer.serialize_str(s),
            Node::Scalar(Scalar::Integer(i)) => serializer.serialize_i64(*i),
            Node::Scalar(Scalar::Real(r)) => serializer.serialize_f64(*r),
            Node::Scalar(Scalar::Boolean(b)) => serializer.serialize_bool(*b),
            Node::Scalar(scalar @ (Scalar::Data(_) | Scalar::Date(_))) => {
                serializer.serialize_str(&scalar.to_string())
            }
        }
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(NodeVisitor)
    }
}

struct NodeVisitor;

impl<'de> Visitor<'de> for NodeVisitor {
    type Value = Node;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "a mapping, sequence, string, number, boolean or byte string")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Node, E> {
        Ok(Node::from(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Node, E> {
        Ok(Node::from(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Node, E> {
        i64::try_from(v)
            .map(Node::from)
            .map_err(|_| E::custom(format!("integer {} is out of range", v)))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Node, E> {
        Ok(Node::from(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Node, E> {
        Ok(Node::from(v))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Node, E> {
        Ok(Node::from(v))
    }

    fn visit_bytes<E: de::Error>(self, v: &[u8]) -> Result<Node, E> {
        Ok(Node::from(v.to_vec()))
    }

    fn visit_byte_buf<E: de::Error>(self, v: Vec<u8>) -> Result<Node, E> {
        Ok(Node::from(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Node, E> {
        Err(E::custom("null values cannot be represented in a property list"))
    }

    fn visit_none<E: de::Error>(self) -> Result<Node, E> {
        self.visit_unit()
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Node, D::Error> {
        Node::deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Node, A::Error> {
        let mut elements = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(element) = seq.next_element()? {
            elements.push(element);
        }
        Ok(Node::Sequence(elements))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Node, A::Error> {
        let mut entries = IndexMap::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((key, value)) = map.next_entry::<String, Node>()? {
            entries.insert(key, value);
        }
        Ok(Node::Mapping(entries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_node_kinds() {
        assert_eq!(Node::mapping().kind(), "mapping");
        assert_eq!(Node::Sequence(vec![]).kind(), "sequence");
        assert_eq!(Node::from("x").kind(), "string");
        assert_eq!(Node::from(1).kind(), "integer");
        assert_eq!(Node::from(1.5).kind(), "real");
        assert_eq!(Node::from(vec![0u8, 1]).kind(), "data");
    }

    #[test]
    fn test_from_iterator_builds_mapping() {
        let node: Node = [("a", Node::from(1)), ("b", Node::from(2))]
            .into_iter()
            .collect();
        let entries = node.as_mapping().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries.get_index(0).unwrap().0, "a");
    }

    #[test]
    fn test_deserialize_from_json() {
        let node: Node = serde_json::from_str(r#"{"key": [1, 2.5, "three", true]}"#).unwrap();
        let expected: Node = [(
            "key",
            Node::Sequence(vec![
                Node::from(1),
                Node::from(2.5),
                Node::from("three"),
                Node::from(true),
            ]),
        )]
        .into_iter()
        .collect();
        assert_eq!(node, expected);
    }

    #[test]
    fn test_deserialize_rejects_null() {
        let result: Result<Node, _> = serde_json::from_str(r#"{"key": null}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_serialize_data_and_date_as_strings() {
        let date = Utc.with_ymd_and_hms(2023, 1, 2, 3, 4, 5).unwrap();
        let node: Node = [
            ("rom", Node::from(vec![0x11u8, 0x22, 0x33])),
            ("when", Node::Scalar(Scalar::Date(date))),
        ]
        .into_iter()
        .collect();

        let json = serde_json::to_string(&node).unwrap();
        assert_eq!(json, r#"{"rom":"ESIz","when":"2023-01-02T03:04:05Z"}"#);
    }
}
