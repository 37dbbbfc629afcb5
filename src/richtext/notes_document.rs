// Notes Document Model
// A flat, ordered sequence of typed blocks.
// JSON is only used as a storage/serialization format

use super::styled_text::StyledText;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Stable identity of a block. Never reused within a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(Uuid);

impl BlockId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for BlockId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stable identity of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(Uuid);

impl DocumentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextBlock {
    pub id: BlockId,
    pub text: StyledText,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistBlock {
    pub id: BlockId,
    pub is_checked: bool,
    pub text: StyledText,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulletBlock {
    pub id: BlockId,
    pub text: StyledText,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberedBlock {
    pub id: BlockId,
    /// Position within its run of numbered blocks, starting at 1
    pub index: u32,
    pub text: StyledText,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageBlock {
    pub id: BlockId,
    pub asset_id: String,
    pub caption: Option<StyledText>,
}

/// Block variants a text block can be converted between
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockType {
    Text,
    Checklist,
    Bullet,
    Numbered,
}

/// A block of content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Block {
    Text(TextBlock),
    Checklist(ChecklistBlock),
    Bullet(BulletBlock),
    Numbered(NumberedBlock),
    Image(ImageBlock),
}

impl Block {
    pub fn text(text: impl Into<StyledText>) -> Self {
        Block::Text(TextBlock {
            id: BlockId::new(),
            text: text.into(),
        })
    }

    pub fn checklist(is_checked: bool, text: impl Into<StyledText>) -> Self {
        Block::Checklist(ChecklistBlock {
            id: BlockId::new(),
            is_checked,
            text: text.into(),
        })
    }

    pub fn bullet(text: impl Into<StyledText>) -> Self {
        Block::Bullet(BulletBlock {
            id: BlockId::new(),
            text: text.into(),
        })
    }

    pub fn numbered(index: u32, text: impl Into<StyledText>) -> Self {
        Block::Numbered(NumberedBlock {
            id: BlockId::new(),
            index,
            text: text.into(),
        })
    }

    pub fn image(asset_id: impl Into<String>) -> Self {
        Block::Image(ImageBlock {
            id: BlockId::new(),
            asset_id: asset_id.into(),
            caption: None,
        })
    }

    /// Build a block of `block_type` around existing text, keeping `id`
    pub fn of_type(block_type: BlockType, id: BlockId, text: StyledText, index: u32) -> Self {
        match block_type {
            BlockType::Text => Block::Text(TextBlock { id, text }),
            BlockType::Checklist => Block::Checklist(ChecklistBlock {
                id,
                is_checked: false,
                text,
            }),
            BlockType::Bullet => Block::Bullet(BulletBlock { id, text }),
            BlockType::Numbered => Block::Numbered(NumberedBlock { id, index, text }),
        }
    }

    pub fn id(&self) -> BlockId {
        match self {
            Block::Text(b) => b.id,
            Block::Checklist(b) => b.id,
            Block::Bullet(b) => b.id,
            Block::Numbered(b) => b.id,
            Block::Image(b) => b.id,
        }
    }

    /// The variant as a convertible block type; `None` for images
    pub fn block_type(&self) -> Option<BlockType> {
        match self {
            Block::Text(_) => Some(BlockType::Text),
            Block::Checklist(_) => Some(BlockType::Checklist),
            Block::Bullet(_) => Some(BlockType::Bullet),
            Block::Numbered(_) => Some(BlockType::Numbered),
            Block::Image(_) => None,
        }
    }

    /// Editable body text; images have none
    pub fn body(&self) -> Option<&StyledText> {
        match self {
            Block::Text(b) => Some(&b.text),
            Block::Checklist(b) => Some(&b.text),
            Block::Bullet(b) => Some(&b.text),
            Block::Numbered(b) => Some(&b.text),
            Block::Image(_) => None,
        }
    }

    pub fn body_mut(&mut self) -> Option<&mut StyledText> {
        match self {
            Block::Text(b) => Some(&mut b.text),
            Block::Checklist(b) => Some(&mut b.text),
            Block::Bullet(b) => Some(&mut b.text),
            Block::Numbered(b) => Some(&mut b.text),
            Block::Image(_) => None,
        }
    }

    /// A block is empty when it carries body text of zero length.
    /// Images are never empty.
    pub fn is_empty(&self) -> bool {
        self.body().is_some_and(StyledText::is_empty)
    }

    /// Length of the body text in characters (0 for images)
    pub fn text_len(&self) -> usize {
        self.body().map_or(0, StyledText::len)
    }

    pub fn to_plain_text(&self) -> String {
        match self {
            Block::Image(b) => b
                .caption
                .as_ref()
                .map(StyledText::plain_text)
                .unwrap_or_default(),
            _ => self.body().map(StyledText::plain_text).unwrap_or_default(),
        }
    }
}

/// Errors surfaced when decoding a serialized document
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed document: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("duplicate block id {0}")]
    DuplicateBlockId(BlockId),
    #[error("numbered block {block} has invalid index {index}")]
    InvalidIndex { block: BlockId, index: u32 },
}

/// The notes document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotesDocument {
    pub id: DocumentId,
    blocks: Vec<Block>,
}

impl NotesDocument {
    pub fn new() -> Self {
        Self::with_blocks(Vec::new())
    }

    pub fn with_blocks(blocks: Vec<Block>) -> Self {
        NotesDocument {
            id: DocumentId::new(),
            blocks,
        }
    }

    /// Get blocks
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Get mutable blocks
    pub(crate) fn blocks_mut(&mut self) -> &mut Vec<Block> {
        &mut self.blocks
    }

    /// Get block count
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Find block by ID
    pub fn find_block(&self, id: BlockId) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id() == id)
    }

    /// Find block index by ID
    pub fn find_block_index(&self, id: BlockId) -> Option<usize> {
        self.blocks.iter().position(|b| b.id() == id)
    }

    /// Re-derive `1..n` indices for every maximal run of numbered blocks
    pub fn renumber_lists(&mut self) {
        let mut counter = 1;
        for block in &mut self.blocks {
            if let Block::Numbered(b) = block {
                b.index = counter;
                counter += 1;
            } else {
                counter = 1;
            }
        }
    }

    /// Convert to plain text, one line per block
    pub fn to_plain_text(&self) -> String {
        self.blocks
            .iter()
            .map(Block::to_plain_text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Decode and validate a serialized document
    pub fn from_json(data: &[u8]) -> Result<Self, DecodeError> {
        let document: NotesDocument = serde_json::from_slice(data)?;
        document.validate()?;
        Ok(document)
    }

    /// Ids must be unique and each numbered run must count up from 1
    fn validate(&self) -> Result<(), DecodeError> {
        let mut seen = HashSet::new();
        let mut expected = 1;
        for block in &self.blocks {
            if !seen.insert(block.id()) {
                return Err(DecodeError::DuplicateBlockId(block.id()));
            }
            if let Block::Numbered(b) = block {
                if b.index != expected {
                    return Err(DecodeError::InvalidIndex {
                        block: b.id,
                        index: b.index,
                    });
                }
                expected += 1;
            } else {
                expected = 1;
            }
        }
        Ok(())
    }
}

impl Default for NotesDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NotesDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "NotesDocument ({} blocks):", self.blocks.len())?;
        for (i, block) in self.blocks.iter().enumerate() {
            write!(f, "  [{}] ", i)?;
            match block {
                Block::Text(_) => write!(f, "Text")?,
                Block::Checklist(b) => write!(
                    f,
                    "Checklist({})",
                    if b.is_checked { "checked" } else { "unchecked" }
                )?,
                Block::Bullet(_) => write!(f, "Bullet")?,
                Block::Numbered(b) => write!(f, "Numbered(#{})", b.index)?,
                Block::Image(b) => write!(f, "Image({})", b.asset_id)?,
            }
            writeln!(f, ": {:?}", block.to_plain_text())?;
        }
        Ok(())
    }
}

/// The welcome note shown by the demo
pub fn sample_document() -> NotesDocument {
    NotesDocument::with_blocks(vec![
        Block::text("Welcome to the notes editor!"),
        Block::checklist(false, "Try checking this item"),
        Block::bullet("Bullet point 1"),
        Block::bullet("Bullet point 2"),
        Block::numbered(1, "Numbered item 1"),
        Block::numbered(2, "Numbered item 2"),
    ])
}
