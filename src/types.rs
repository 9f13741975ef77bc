/*!
 * Core types and data structures for accessibility snapshots
 */

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use strum::EnumString;

/// Identifier of a node, unique within one snapshot
pub type NodeId = i32;

/// Accessibility role of a node
///
/// Role strings use the camelCase spelling of the accessibility tree
/// (`genericContainer`, `listItem`, ...). Anything outside the known set is
/// kept verbatim in [`Role::Other`] and treated like any extractable role.
#[derive(Debug, Clone, PartialEq, Eq, Hash, EnumString)]
#[strum(serialize_all = "camelCase")]
pub enum Role {
    /// No role at all
    None,
    /// Generic layout container (`div`, `span`, ...)
    GenericContainer,
    /// Script element
    Script,
    /// Style element
    Style,
    /// Paragraph
    Paragraph,
    /// Heading of any level
    Heading,
    /// List item
    ListItem,
    /// Block quotation
    Blockquote,
    /// Self-contained article
    Article,
    /// Document section
    Section,
    /// Inline text run
    StaticText,
    /// Hyperlink
    Link,
    /// Root of a web document
    RootWebArea,
    /// Any other role
    #[strum(default)]
    Other(String),
}

impl Role {
    /// Returns the role string as it appears in a snapshot
    pub fn as_str(&self) -> &str {
        match self {
            Role::None => "none",
            Role::GenericContainer => "genericContainer",
            Role::Script => "script",
            Role::Style => "style",
            Role::Paragraph => "paragraph",
            Role::Heading => "heading",
            Role::ListItem => "listItem",
            Role::Blockquote => "blockquote",
            Role::Article => "article",
            Role::Section => "section",
            Role::StaticText => "staticText",
            Role::Link => "link",
            Role::RootWebArea => "rootWebArea",
            Role::Other(raw) => raw,
        }
    }

    /// Roles whose own text is never emitted but whose children are visited
    pub fn is_pass_through(&self) -> bool {
        matches!(
            self,
            Role::None | Role::GenericContainer | Role::Script | Role::Style
        )
    }

    /// Roles that are separated from surrounding text by a paragraph break
    pub fn is_block_level(&self) -> bool {
        matches!(
            self,
            Role::Paragraph
                | Role::Heading
                | Role::ListItem
                | Role::Blockquote
                | Role::Article
                | Role::Section
        )
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Role::from_str(&raw).unwrap_or(Role::Other(raw)))
    }
}

/// A single node of an accessibility snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessibilityNode {
    /// Node identifier
    pub id: NodeId,
    /// Accessibility role
    pub role: Role,
    /// Accessible name, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Whether the node is marked invisible
    #[serde(default, alias = "invisible")]
    pub is_invisible: bool,
    /// Children in traversal order
    #[serde(default)]
    pub child_ids: Vec<NodeId>,
}

impl AccessibilityNode {
    /// Create a visible node without a name or children
    pub fn new(id: NodeId, role: Role) -> Self {
        Self {
            id,
            role,
            name: None,
            is_invisible: false,
            child_ids: Vec::new(),
        }
    }

    /// Set the accessible name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the children
    pub fn with_children(mut self, child_ids: impl IntoIterator<Item = NodeId>) -> Self {
        self.child_ids = child_ids.into_iter().collect();
        self
    }

    /// Mark the node invisible
    pub fn invisible(mut self) -> Self {
        self.is_invisible = true;
        self
    }

    /// The accessible name, if present and non-empty
    pub fn text(&self) -> Option<&str> {
        self.name.as_deref().filter(|name| !name.is_empty())
    }
}

/// A point-in-time view of a rendered document's accessibility tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Root of the tree
    pub root_id: NodeId,
    /// All nodes, in no particular order
    #[serde(default)]
    pub nodes: Vec<AccessibilityNode>,
}

impl Snapshot {
    /// Create a snapshot from its root and node collection
    pub fn new(root_id: NodeId, nodes: Vec<AccessibilityNode>) -> Self {
        Self { root_id, nodes }
    }
}

/// A snapshot together with the page metadata recorded when it was requested
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapturedPage {
    /// Document title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Source locator of the document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// The accessibility snapshot
    #[serde(flatten)]
    pub snapshot: Snapshot,
}
