#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Coarse content category of a vault file
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum NodeType {
    #[default]
    Note,
    Image,
    Pdf,
    Audio,
    Video,
    Other,
}

impl NodeType {
    pub const ALL: [NodeType; 6] = [
        NodeType::Note,
        NodeType::Image,
        NodeType::Pdf,
        NodeType::Audio,
        NodeType::Video,
        NodeType::Other,
    ];

    /// Classify a file by its extension.
    pub fn from_path(path: &str) -> Self {
        let file_name = path.rsplit('/').next().unwrap_or(path);
        let Some((_, ext)) = file_name.rsplit_once('.') else {
            return NodeType::Other;
        };

        match ext.to_ascii_lowercase().as_str() {
            "md" | "markdown" | "txt" | "canvas" => NodeType::Note,
            "png" | "jpg" | "jpeg" | "gif" | "svg" | "webp" | "bmp" => NodeType::Image,
            "pdf" => NodeType::Pdf,
            "mp3" | "wav" | "ogg" | "flac" | "m4a" => NodeType::Audio,
            "mp4" | "mov" | "webm" | "mkv" => NodeType::Video,
            _ => NodeType::Other,
        }
    }

    /// Text-like content gets a small dynamics boost when mapped.
    pub fn is_text_like(self) -> bool {
        matches!(self, NodeType::Note)
    }

    pub const fn name(self) -> &'static str {
        match self {
            NodeType::Note => "note",
            NodeType::Image => "image",
            NodeType::Pdf => "pdf",
            NodeType::Audio => "audio",
            NodeType::Video => "video",
            NodeType::Other => "other",
        }
    }
}

impl std::fmt::Display for NodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One file in the vault's link graph
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphNode {
    /// Stable identifier, unique within one extraction
    pub id: String,
    /// Display title, also the input for all content hashing
    pub title: String,
    #[cfg_attr(feature = "serde", serde(rename = "type", default))]
    pub node_type: NodeType,
    /// Slash-delimited vault path
    #[cfg_attr(feature = "serde", serde(default))]
    pub path: String,
    /// File size in bytes
    #[cfg_attr(feature = "serde", serde(default))]
    pub file_size: u64,
    /// Ids of linked nodes
    #[cfg_attr(feature = "serde", serde(default))]
    pub connections: Vec<String>,
    /// Creation timestamp (milliseconds since the Unix epoch)
    #[cfg_attr(feature = "serde", serde(default))]
    pub creation_date: i64,
}

impl GraphNode {
    /// Create a node, inferring its type from the path extension
    pub fn new(id: impl Into<String>, title: impl Into<String>, path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            id: id.into(),
            title: title.into(),
            node_type: NodeType::from_path(&path),
            path,
            file_size: 0,
            connections: Vec::new(),
            creation_date: 0,
        }
    }

    pub fn with_type(mut self, node_type: NodeType) -> Self {
        self.node_type = node_type;
        self
    }

    pub fn with_file_size(mut self, file_size: u64) -> Self {
        self.file_size = file_size;
        self
    }

    pub fn with_connections<I, S>(mut self, connections: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.connections = connections.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_creation_date(mut self, creation_date: i64) -> Self {
        self.creation_date = creation_date;
        self
    }

    /// Number of folders above the file. `"a/b.md"` is 1, `"b.md"` is 0.
    pub fn path_depth(&self) -> usize {
        self.path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .count()
            .saturating_sub(1)
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }
}
