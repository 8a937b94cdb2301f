// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Identifier and naming types of the OPC UA information model.
//!
//! - **NodeId**: server-local node identifier (namespace index + identifier)
//! - **ExpandedNodeId**: identifier whose namespace may be given by URI and
//!   which may point into another server
//! - **QualifiedName**: namespace-qualified browse name
//! - **LocalizedText**: human readable text with an optional locale
//! - **ByteString**: opaque byte sequence
//!
//! # Examples
//!
//! ```
//! use uamodel_core::types::{ExpandedNodeId, NodeId};
//!
//! let node: NodeId = "ns=2;s=Boiler.Drum".parse().unwrap();
//! assert_eq!(node, NodeId::string(2, "Boiler.Drum"));
//!
//! let double: ExpandedNodeId = "nsu=http://opcfoundation.org/UA/;i=11".parse().unwrap();
//! assert_eq!(double.namespace_uri(), Some("http://opcfoundation.org/UA/"));
//! ```

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ConversionError, NamespaceError};
use crate::namespace::NamespaceTable;

/// UTC timestamp used for `DateTime` values.
pub type DateTime = chrono::DateTime<chrono::Utc>;

/// URI of namespace 0, the OPC UA base namespace.
pub const OPC_UA_NAMESPACE_URI: &str = "http://opcfoundation.org/UA/";

// =============================================================================
// NodeId
// =============================================================================

/// OPC UA Node Identifier.
///
/// A NodeId uniquely identifies a node within a server's address space. It
/// consists of a namespace index and an identifier which can be numeric,
/// string, GUID, or opaque (byte string).
///
/// # Examples
///
/// ```
/// use uamodel_core::types::NodeId;
///
/// let numeric = NodeId::numeric(2, 1001);
/// let parsed: NodeId = "ns=2;i=1001".parse().unwrap();
/// assert_eq!(numeric, parsed);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId {
    /// Namespace index (0 = OPC UA standard namespace).
    pub namespace_index: u16,

    /// The node identifier.
    pub identifier: Identifier,
}

impl NodeId {
    // =========================================================================
    // Constructors
    // =========================================================================

    /// Creates a numeric node ID.
    #[inline]
    pub const fn numeric(namespace_index: u16, value: u32) -> Self {
        Self {
            namespace_index,
            identifier: Identifier::Numeric(value),
        }
    }

    /// Creates a string node ID.
    #[inline]
    pub fn string(namespace_index: u16, value: impl Into<String>) -> Self {
        Self {
            namespace_index,
            identifier: Identifier::String(value.into()),
        }
    }

    /// Creates a GUID node ID.
    #[inline]
    pub const fn guid(namespace_index: u16, value: Uuid) -> Self {
        Self {
            namespace_index,
            identifier: Identifier::Guid(value),
        }
    }

    /// Creates an opaque (byte string) node ID.
    #[inline]
    pub fn opaque(namespace_index: u16, value: impl Into<Vec<u8>>) -> Self {
        Self {
            namespace_index,
            identifier: Identifier::Opaque(value.into()),
        }
    }

    /// Returns the null node ID (ns=0, i=0).
    #[inline]
    pub const fn null() -> Self {
        Self::numeric(0, 0)
    }

    // =========================================================================
    // Standard Node IDs
    // =========================================================================

    /// Objects folder node (ns=0, i=85).
    pub const OBJECTS_FOLDER: NodeId = NodeId::numeric(0, 85);

    /// Server node (ns=0, i=2253).
    pub const SERVER: NodeId = NodeId::numeric(0, 2253);

    /// PropertyType variable type definition (ns=0, i=68).
    pub const PROPERTY_TYPE: NodeId = NodeId::numeric(0, 68);

    /// BaseDataVariableType variable type definition (ns=0, i=63).
    pub const BASE_DATA_VARIABLE_TYPE: NodeId = NodeId::numeric(0, 63);

    /// BaseObjectType object type definition (ns=0, i=58).
    pub const BASE_OBJECT_TYPE: NodeId = NodeId::numeric(0, 58);

    // =========================================================================
    // Properties
    // =========================================================================

    /// Returns `true` if this is a null node ID (ns=0, i=0).
    #[inline]
    pub fn is_null(&self) -> bool {
        self.namespace_index == 0 && matches!(self.identifier, Identifier::Numeric(0))
    }

    /// Returns the numeric value if this is a numeric identifier.
    #[inline]
    pub fn as_numeric(&self) -> Option<u32> {
        match self.identifier {
            Identifier::Numeric(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the string value if this is a string identifier.
    #[inline]
    pub fn as_string(&self) -> Option<&str> {
        match &self.identifier {
            Identifier::String(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the numeric identifier if this node lives in namespace 0.
    #[inline]
    pub fn ns0_numeric(&self) -> Option<u32> {
        if self.namespace_index == 0 {
            self.as_numeric()
        } else {
            None
        }
    }

    /// Converts to an expanded node id that keeps the namespace index.
    pub fn to_expanded(&self) -> ExpandedNodeId {
        ExpandedNodeId {
            namespace: NamespaceRef::Index(self.namespace_index),
            identifier: self.identifier.clone(),
            server_index: 0,
        }
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::null()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace_index == 0 {
            write!(f, "{}", self.identifier)
        } else {
            write!(f, "ns={};{}", self.namespace_index, self.identifier)
        }
    }
}

impl FromStr for NodeId {
    type Err = ConversionError;

    /// Parses a NodeId from OPC UA string format.
    ///
    /// Supported formats:
    /// - `ns=2;i=1001` (numeric)
    /// - `ns=2;s=MyNode` (string)
    /// - `ns=2;g=550e8400-e29b-41d4-a716-446655440000` (GUID)
    /// - `ns=2;b=SGVsbG8=` (opaque, base64 encoded)
    /// - `i=1001` / `s=MyNode` (namespace 0)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        let (namespace_index, identifier_part) = match s.strip_prefix("ns=") {
            Some(rest) => {
                let (ns_str, id) = rest
                    .split_once(';')
                    .ok_or_else(|| ConversionError::parse(s, "Missing identifier after namespace"))?;
                let ns: u16 = ns_str
                    .parse()
                    .map_err(|_| ConversionError::parse(s, "Invalid namespace index"))?;
                (ns, id)
            }
            None => (0, s),
        };

        Ok(Self {
            namespace_index,
            identifier: identifier_part.parse().map_err(|e: ConversionError| match e {
                ConversionError::Parse { reason, .. } => ConversionError::parse(s, reason),
                other => other,
            })?,
        })
    }
}

// =============================================================================
// Identifier
// =============================================================================

/// The identifier part of a node id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Identifier {
    /// Numeric identifier (`i=`).
    Numeric(u32),
    /// String identifier (`s=`).
    String(String),
    /// GUID identifier (`g=`).
    Guid(Uuid),
    /// Opaque identifier (`b=`, base64 in text form).
    Opaque(Vec<u8>),
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(v) => write!(f, "i={}", v),
            Self::String(v) => write!(f, "s={}", v),
            Self::Guid(v) => write!(f, "g={}", v),
            Self::Opaque(v) => write!(f, "b={}", BASE64.encode(v)),
        }
    }
}

impl FromStr for Identifier {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(id) = s.strip_prefix("i=") {
            id.parse()
                .map(Self::Numeric)
                .map_err(|_| ConversionError::parse(s, "Invalid numeric identifier"))
        } else if let Some(id) = s.strip_prefix("s=") {
            Ok(Self::String(id.to_string()))
        } else if let Some(id) = s.strip_prefix("g=") {
            Uuid::parse_str(id)
                .map(Self::Guid)
                .map_err(|e| ConversionError::parse(s, format!("Invalid GUID: {}", e)))
        } else if let Some(id) = s.strip_prefix("b=") {
            BASE64
                .decode(id)
                .map(Self::Opaque)
                .map_err(|e| ConversionError::parse(s, format!("Invalid base64: {}", e)))
        } else {
            Err(ConversionError::parse(
                s,
                "Unknown identifier type. Expected i=, s=, g=, or b=",
            ))
        }
    }
}

// =============================================================================
// ExpandedNodeId
// =============================================================================

/// How an [`ExpandedNodeId`] names its namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NamespaceRef {
    /// Namespace given by index into the server's namespace table.
    Index(u16),
    /// Namespace given by URI; must be resolved before use.
    Uri(Cow<'static, str>),
}

/// A node identifier that may name its namespace by URI and may refer to a
/// node on another server.
///
/// Type descriptors declare data types as URI-qualified expanded ids so that
/// they stay valid regardless of the index a namespace receives at runtime;
/// [`ExpandedNodeId::to_node_id`] resolves them against the live table.
///
/// # Examples
///
/// ```
/// use uamodel_core::{NamespaceTable, NodeId};
/// use uamodel_core::types::{ExpandedNodeId, OPC_UA_NAMESPACE_URI};
///
/// const DOUBLE: ExpandedNodeId = ExpandedNodeId::numeric_uri(OPC_UA_NAMESPACE_URI, 11);
///
/// let table = NamespaceTable::new();
/// assert_eq!(DOUBLE.to_node_id(&table).unwrap(), NodeId::numeric(0, 11));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExpandedNodeId {
    /// Namespace of the identifier.
    pub namespace: NamespaceRef,
    /// The identifier within the namespace.
    pub identifier: Identifier,
    /// Server index (0 = local server).
    pub server_index: u32,
}

impl ExpandedNodeId {
    /// Creates a local numeric id whose namespace is given by URI.
    pub const fn numeric_uri(namespace_uri: &'static str, value: u32) -> Self {
        Self {
            namespace: NamespaceRef::Uri(Cow::Borrowed(namespace_uri)),
            identifier: Identifier::Numeric(value),
            server_index: 0,
        }
    }

    /// Creates a local id in namespace 0, named by the base namespace URI.
    pub const fn ns0(value: u32) -> Self {
        Self::numeric_uri(OPC_UA_NAMESPACE_URI, value)
    }

    /// Creates an id whose namespace is given by URI.
    pub fn with_uri(namespace_uri: impl Into<String>, identifier: Identifier) -> Self {
        Self {
            namespace: NamespaceRef::Uri(Cow::Owned(namespace_uri.into())),
            identifier,
            server_index: 0,
        }
    }

    /// Sets the server index.
    pub fn with_server_index(mut self, server_index: u32) -> Self {
        self.server_index = server_index;
        self
    }

    /// Returns the namespace URI if the namespace is given by URI.
    pub fn namespace_uri(&self) -> Option<&str> {
        match &self.namespace {
            NamespaceRef::Uri(uri) => Some(uri),
            NamespaceRef::Index(_) => None,
        }
    }

    /// Returns `true` if the id refers to the local server.
    #[inline]
    pub fn is_local(&self) -> bool {
        self.server_index == 0
    }

    /// Resolves to a server-local [`NodeId`].
    ///
    /// # Errors
    ///
    /// Returns [`NamespaceError::NotLocal`] for ids on another server and
    /// [`NamespaceError::UnknownUri`] when the namespace URI is not
    /// registered in `table`.
    pub fn to_node_id(&self, table: &NamespaceTable) -> Result<NodeId, NamespaceError> {
        if !self.is_local() {
            return Err(NamespaceError::NotLocal {
                server_index: self.server_index,
            });
        }

        let namespace_index = match &self.namespace {
            NamespaceRef::Index(index) => *index,
            NamespaceRef::Uri(uri) => table
                .index_of(uri)
                .ok_or_else(|| NamespaceError::unknown_uri(uri.to_string()))?,
        };

        Ok(NodeId {
            namespace_index,
            identifier: self.identifier.clone(),
        })
    }

    /// Like [`to_node_id`](Self::to_node_id) but discards the reason.
    pub fn local(&self, table: &NamespaceTable) -> Option<NodeId> {
        self.to_node_id(table).ok()
    }
}

impl From<NodeId> for ExpandedNodeId {
    fn from(node_id: NodeId) -> Self {
        Self {
            namespace: NamespaceRef::Index(node_id.namespace_index),
            identifier: node_id.identifier,
            server_index: 0,
        }
    }
}

impl fmt::Display for ExpandedNodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.server_index != 0 {
            write!(f, "svr={};", self.server_index)?;
        }
        match &self.namespace {
            NamespaceRef::Uri(uri) => write!(f, "nsu={};{}", uri, self.identifier),
            NamespaceRef::Index(0) => write!(f, "{}", self.identifier),
            NamespaceRef::Index(index) => write!(f, "ns={};{}", index, self.identifier),
        }
    }
}

impl FromStr for ExpandedNodeId {
    type Err = ConversionError;

    /// Parses `svr=..;nsu=..;i=..` and every [`NodeId`] format.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        let (server_index, rest) = match s.strip_prefix("svr=") {
            Some(rest) => {
                let (svr, rest) = rest
                    .split_once(';')
                    .ok_or_else(|| ConversionError::parse(s, "Missing identifier after server index"))?;
                let svr: u32 = svr
                    .parse()
                    .map_err(|_| ConversionError::parse(s, "Invalid server index"))?;
                (svr, rest)
            }
            None => (0, s),
        };

        match rest.strip_prefix("nsu=") {
            Some(rest) => {
                let (uri, id) = rest
                    .split_once(';')
                    .ok_or_else(|| ConversionError::parse(s, "Missing identifier after namespace URI"))?;
                Ok(Self::with_uri(uri, id.parse()?).with_server_index(server_index))
            }
            None => Ok(ExpandedNodeId::from(rest.parse::<NodeId>()?).with_server_index(server_index)),
        }
    }
}

// =============================================================================
// QualifiedName
// =============================================================================

/// A namespace-qualified browse name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct QualifiedName {
    /// Namespace index.
    pub namespace_index: u16,
    /// The name.
    pub name: String,
}

impl QualifiedName {
    /// Creates a new qualified name.
    pub fn new(namespace_index: u16, name: impl Into<String>) -> Self {
        Self {
            namespace_index,
            name: name.into(),
        }
    }

    /// Returns `true` if this name matches the given namespace and name.
    #[inline]
    pub fn matches(&self, namespace_index: u16, name: &str) -> bool {
        self.namespace_index == namespace_index && self.name == name
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace_index == 0 {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}:{}", self.namespace_index, self.name)
        }
    }
}

// =============================================================================
// LocalizedText
// =============================================================================

/// Human readable text with an optional locale.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct LocalizedText {
    /// Locale identifier such as `en` or `de-DE`.
    pub locale: Option<String>,
    /// The text.
    pub text: String,
}

impl LocalizedText {
    /// Creates text with a locale.
    pub fn new(locale: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            locale: Some(locale.into()),
            text: text.into(),
        }
    }

    /// Creates text without a locale.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            locale: None,
            text: text.into(),
        }
    }

    /// Creates English text.
    pub fn english(text: impl Into<String>) -> Self {
        Self::new("en", text)
    }
}

impl fmt::Display for LocalizedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl From<&str> for LocalizedText {
    fn from(text: &str) -> Self {
        Self::text(text)
    }
}

// =============================================================================
// ByteString
// =============================================================================

/// An opaque byte sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ByteString(pub Vec<u8>);

impl ByteString {
    /// Returns the bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the number of bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no bytes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for ByteString {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for ByteString {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl AsRef<[u8]> for ByteString {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for ByteString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&BASE64.encode(&self.0))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // NodeId Tests
    // =========================================================================

    #[test]
    fn test_node_id_parse() {
        assert_eq!("i=85".parse::<NodeId>().unwrap(), NodeId::OBJECTS_FOLDER);
        assert_eq!(
            "ns=3;s=Tank.Level".parse::<NodeId>().unwrap(),
            NodeId::string(3, "Tank.Level")
        );
        assert_eq!(
            "ns=1;b=AQID".parse::<NodeId>().unwrap(),
            NodeId::opaque(1, vec![1, 2, 3])
        );

        let guid = "ns=2;g=550e8400-e29b-41d4-a716-446655440000"
            .parse::<NodeId>()
            .unwrap();
        assert!(matches!(guid.identifier, Identifier::Guid(_)));
    }

    #[test]
    fn test_node_id_parse_errors() {
        assert!("ns=x;i=1".parse::<NodeId>().is_err());
        assert!("ns=2".parse::<NodeId>().is_err());
        assert!("q=5".parse::<NodeId>().is_err());

        let err = "ns=2;i=abc".parse::<NodeId>().unwrap_err();
        assert!(err.to_string().contains("ns=2;i=abc"));
    }

    #[test]
    fn test_node_id_display() {
        assert_eq!(NodeId::numeric(0, 68).to_string(), "i=68");
        assert_eq!(NodeId::string(2, "A.B").to_string(), "ns=2;s=A.B");
    }

    #[test]
    fn test_null() {
        assert!(NodeId::null().is_null());
        assert!(NodeId::default().is_null());
        assert!(!NodeId::numeric(1, 0).is_null());
    }

    // =========================================================================
    // ExpandedNodeId Tests
    // =========================================================================

    #[test]
    fn test_expanded_parse_display() {
        let id: ExpandedNodeId = "svr=2;nsu=urn:demo;s=Pump".parse().unwrap();
        assert_eq!(id.server_index, 2);
        assert_eq!(id.namespace_uri(), Some("urn:demo"));
        assert_eq!(id.to_string(), "svr=2;nsu=urn:demo;s=Pump");

        let plain: ExpandedNodeId = "ns=4;i=7".parse().unwrap();
        assert_eq!(plain.namespace, NamespaceRef::Index(4));
        assert_eq!(plain.to_string(), "ns=4;i=7");
    }

    #[test]
    fn test_expanded_to_node_id() {
        let table = NamespaceTable::new();
        let index = table.register("urn:demo");

        let id = ExpandedNodeId::with_uri("urn:demo", Identifier::Numeric(9));
        assert_eq!(id.to_node_id(&table).unwrap(), NodeId::numeric(index, 9));

        let unknown = ExpandedNodeId::with_uri("urn:missing", Identifier::Numeric(9));
        assert!(matches!(
            unknown.to_node_id(&table),
            Err(NamespaceError::UnknownUri { .. })
        ));
        assert!(unknown.local(&table).is_none());

        let remote = ExpandedNodeId::ns0(11).with_server_index(1);
        assert!(matches!(
            remote.to_node_id(&table),
            Err(NamespaceError::NotLocal { server_index: 1 })
        ));
    }

    #[test]
    fn test_ns0_const() {
        const DOUBLE: ExpandedNodeId = ExpandedNodeId::ns0(11);
        let table = NamespaceTable::new();
        assert_eq!(DOUBLE.to_node_id(&table).unwrap(), NodeId::numeric(0, 11));
    }

    // =========================================================================
    // Name Tests
    // =========================================================================

    #[test]
    fn test_qualified_name() {
        let name = QualifiedName::new(2, "HighLimit");
        assert!(name.matches(2, "HighLimit"));
        assert!(!name.matches(0, "HighLimit"));
        assert_eq!(name.to_string(), "2:HighLimit");
    }

    #[test]
    fn test_localized_text() {
        let text = LocalizedText::new("en", "hello");
        assert_eq!(text.locale.as_deref(), Some("en"));
        assert_eq!(text.to_string(), "hello");
        assert_eq!(LocalizedText::from("x").locale, None);
    }
}
