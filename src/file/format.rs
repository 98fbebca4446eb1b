//! On-disk document formats and conversion to and from the node tree.
//!
//! Property lists go through `plist::Value`, which keeps the `<data>` and
//! `<date>` types intact. JSON and YAML go through the serde impls on `Node`.

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::SystemTime;

use anyhow::{anyhow, bail, Context, Result};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Serialize;

use crate::config::Config;
use crate::document::node::{Node, Scalar};
use crate::document::tree::Document;

/// A serialization format for documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// XML property list (decoding also accepts binary).
    Plist,
    /// Binary property list.
    BinaryPlist,
    Json,
    Yaml,
}

impl Format {
    /// Picks a format from a file name, ignoring a trailing `.gz`.
    ///
    /// Unknown extensions are treated as property lists.
    ///
    /// # Example
    ///
    /// ```
    /// use plistquill::file::format::Format;
    ///
    /// assert_eq!(Format::from_path("config.plist"), Format::Plist);
    /// assert_eq!(Format::from_path("config.json.gz"), Format::Json);
    /// assert_eq!(Format::from_path("config.yml"), Format::Yaml);
    /// assert_eq!(Format::from_path("config"), Format::Plist);
    /// ```
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        let path = if is_gzip_path(path) {
            Path::new(path.file_stem().unwrap_or_default())
        } else {
            path
        };

        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("json") => Format::Json,
            Some("yaml") | Some("yml") => Format::Yaml,
            _ => Format::Plist,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Format::Plist => "plist",
            Format::BinaryPlist => "binary-plist",
            Format::Json => "json",
            Format::Yaml => "yaml",
        }
    }

    /// Decodes `bytes` into a document.
    pub fn decode(&self, bytes: &[u8]) -> Result<Document> {
        let root = match self {
            Format::Plist | Format::BinaryPlist => {
                let value = plist::Value::from_reader(std::io::Cursor::new(bytes))
                    .context("Failed to parse property list")?;
                node_from_plist(value)?
            }
            Format::Json => serde_json::from_slice(bytes).context("Failed to parse JSON")?,
            Format::Yaml => serde_yaml::from_slice(bytes).context("Failed to parse YAML")?,
        };

        Ok(Document::try_from(root)?)
    }

    /// Encodes `document` in this format.
    pub fn encode(&self, document: &Document, config: &Config) -> Result<Vec<u8>> {
        let mut out = Vec::new();

        match self {
            Format::Plist => {
                let options = plist::XmlWriteOptions::default().indent(b' ', config.indent_size);
                plist_from_node(document.root())
                    .to_writer_xml_with_options(&mut out, &options)
                    .context("Failed to write XML property list")?
            }
            Format::BinaryPlist => plist_from_node(document.root())
                .to_writer_binary(&mut out)
                .context("Failed to write binary property list")?,
            Format::Json => {
                let indent = " ".repeat(config.indent_size);
                let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
                let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
                document
                    .root()
                    .serialize(&mut serializer)
                    .context("Failed to write JSON")?;
            }
            Format::Yaml => {
                serde_yaml::to_writer(&mut out, document.root()).context("Failed to write YAML")?
            }
        }

        if !out.ends_with(b"\n") {
            out.push(b'\n');
        }

        Ok(out)
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Format {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "plist" | "xml" => Ok(Format::Plist),
            "binary-plist" | "binary" | "bplist" => Ok(Format::BinaryPlist),
            "json" => Ok(Format::Json),
            "yaml" | "yml" => Ok(Format::Yaml),
            other => bail!("Unknown format '{}'", other),
        }
    }
}

/// Returns true if the path ends in `.gz`.
pub fn is_gzip_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("gz"))
        .unwrap_or(false)
}

/// Converts a decoded property list value into a node.
pub fn node_from_plist(value: plist::Value) -> Result<Node> {
    let node = match value {
        plist::Value::Dictionary(dict) => {
            let mut entries = IndexMap::with_capacity(dict.len());
            for (key, value) in dict {
                entries.insert(key, node_from_plist(value)?);
            }
            Node::Mapping(entries)
        }
        plist::Value::Array(items) => Node::Sequence(
            items
                .into_iter()
                .map(node_from_plist)
                .collect::<Result<Vec<_>>>()?,
        ),
        plist::Value::String(s) => Node::from(s),
        plist::Value::Boolean(b) => Node::from(b),
        plist::Value::Real(r) => Node::from(r),
        plist::Value::Integer(i) => {
            let value = i
                .as_signed()
                .ok_or_else(|| anyhow!("Integer {:?} is out of range", i))?;
            Node::from(value)
        }
        plist::Value::Data(bytes) => Node::from(bytes),
        plist::Value::Date(date) => {
            let time: SystemTime = date.into();
            Node::Scalar(Scalar::Date(DateTime::<Utc>::from(time)))
        }
        other => bail!("Unsupported property list value: {:?}", other),
    };

    Ok(node)
}

/// Converts a node into a property list value.
pub fn plist_from_node(node: &Node) -> plist::Value {
    match node {
        Node::Mapping(entries) => {
            let mut dict = plist::Dictionary::new();
            for (key, value) in entries {
                dict.insert(key.clone(), plist_from_node(value));
            }
            plist::Value::Dictionary(dict)
        }
        Node::Sequence(elements) => {
            plist::Value::Array(elements.iter().map(plist_from_node).collect())
        }
        Node::Scalar(Scalar::String(s)) => plist::Value::String(s.clone()),
        Node::Scalar(Scalar::Integer(i)) => plist::Value::Integer((*i).into()),
        Node::Scalar(Scalar::Real(r)) => plist::Value::Real(*r),
        Node::Scalar(Scalar::Boolean(b)) => plist::Value::Boolean(*b),
        Node::Scalar(Scalar::Data(bytes)) => plist::Value::Data(bytes.clone()),
        Node::Scalar(Scalar::Date(date)) => {
            plist::Value::Date(plist::Date::from(SystemTime::from(*date)))
        }
    }
}
