// Block Editor
// Structural edits on a NotesDocument: split, merge, retype, check, insert.
//
// Every operation reads the input document and returns a new one. Stale or
// unknown block ids degrade to a no-op instead of an error, since the caller's
// active id can lag a structural edit by one cycle.

use super::notes_document::*;
use super::styled_text::StyledText;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Where the input collaborator should place the caret in a refocused block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FocusPosition {
    #[default]
    Start,
    End,
}

/// Request to move input focus to a block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusRequest {
    pub block_id: BlockId,
    pub position: FocusPosition,
}

/// Result of a split or merge: the new document and the block to focus next
#[derive(Debug, Clone, PartialEq)]
pub struct BlockEdit {
    pub document: NotesDocument,
    pub focus: Option<FocusRequest>,
}

impl BlockEdit {
    fn unchanged(document: &NotesDocument) -> Self {
        BlockEdit {
            document: document.clone(),
            focus: None,
        }
    }
}

/// Handle a break (return key) in the block `id`.
///
/// An empty list item is first turned into an empty text block (keeping its
/// id) and a fresh text block follows it. A non-empty block is continued by a
/// fresh empty block of the same variant; images continue as text.
pub fn split_on_break(document: &NotesDocument, id: BlockId) -> BlockEdit {
    let Some(index) = document.find_block_index(id) else {
        debug!(%id, "break: block not found");
        return BlockEdit::unchanged(document);
    };

    let mut document = document.clone();
    let blocks = document.blocks_mut();
    let current = &blocks[index];

    let new_block = if current.is_empty() {
        if matches!(
            current,
            Block::Checklist(_) | Block::Bullet(_) | Block::Numbered(_)
        ) {
            blocks[index] = Block::Text(TextBlock {
                id,
                text: StyledText::new(),
            });
        }
        Block::text("")
    } else {
        match current {
            Block::Text(_) | Block::Image(_) => Block::text(""),
            Block::Checklist(_) => Block::checklist(false, ""),
            Block::Bullet(_) => Block::bullet(""),
            Block::Numbered(b) => Block::numbered(b.index.saturating_add(1), ""),
        }
    };

    let new_id = new_block.id();
    blocks.insert(index + 1, new_block);
    document.renumber_lists();
    debug!(%id, %new_id, "break: inserted block");

    BlockEdit {
        document,
        focus: Some(FocusRequest {
            block_id: new_id,
            position: FocusPosition::Start,
        }),
    }
}

/// Handle backspace at the start of block `id`: the block is removed and the
/// previous block gains focus at its end. The first block is never removed.
pub fn merge_on_backspace(document: &NotesDocument, id: BlockId) -> BlockEdit {
    let Some(index) = document.find_block_index(id) else {
        debug!(%id, "backspace: block not found");
        return BlockEdit::unchanged(document);
    };
    if index == 0 {
        return BlockEdit::unchanged(document);
    }

    let mut document = document.clone();
    document.blocks_mut().remove(index);
    document.renumber_lists();

    let previous = document.blocks()[index - 1].id();
    debug!(%id, %previous, "backspace: removed block");

    BlockEdit {
        document,
        focus: Some(FocusRequest {
            block_id: previous,
            position: FocusPosition::End,
        }),
    }
}

/// Convert block `id` to `target`, or back to text if it already is that list
/// type. Text content and id are carried over; images cannot be converted.
pub fn toggle_block_type(document: &NotesDocument, id: BlockId, target: BlockType) -> NotesDocument {
    let Some(index) = document.find_block_index(id) else {
        debug!(%id, "toggle block type: block not found");
        return document.clone();
    };

    let current = &document.blocks()[index];
    let (Some(current_type), Some(text)) = (current.block_type(), current.body()) else {
        debug!(%id, "toggle block type: image blocks cannot be converted");
        return document.clone();
    };

    let target = if current_type == target { BlockType::Text } else { target };

    let next_index = match index.checked_sub(1).map(|i| &document.blocks()[i]) {
        Some(Block::Numbered(previous)) => previous.index.saturating_add(1),
        _ => 1,
    };

    let converted = Block::of_type(target, id, text.clone(), next_index);
    let mut document = document.clone();
    document.blocks_mut()[index] = converted;
    document.renumber_lists();
    debug!(%id, ?target, "toggle block type");
    document
}

/// Flip the checked state of checklist block `id`
pub fn toggle_checklist(document: &NotesDocument, id: BlockId) -> NotesDocument {
    let mut document = document.clone();
    match document.blocks_mut().iter_mut().find(|b| b.id() == id) {
        Some(Block::Checklist(block)) => block.is_checked = !block.is_checked,
        Some(_) => debug!(%id, "toggle checklist: not a checklist block"),
        None => debug!(%id, "toggle checklist: block not found"),
    }
    document
}

/// Insert an image block right after block `id`
pub fn insert_image(document: &NotesDocument, id: BlockId, asset_id: &str) -> NotesDocument {
    let Some(index) = document.find_block_index(id) else {
        debug!(%id, "insert image: block not found");
        return document.clone();
    };

    let mut document = document.clone();
    document.blocks_mut().insert(index + 1, Block::image(asset_id));
    document.renumber_lists();
    document
}

/// Replace the body text of block `id` (the caption for images; an empty
/// caption is removed). Id and variant are kept.
pub fn replace_text(document: &NotesDocument, id: BlockId, text: StyledText) -> NotesDocument {
    let Some(index) = document.find_block_index(id) else {
        debug!(%id, "replace text: block not found");
        return document.clone();
    };

    let mut document = document.clone();
    match &mut document.blocks_mut()[index] {
        Block::Image(image) => image.caption = (!text.is_empty()).then_some(text),
        other => {
            if let Some(body) = other.body_mut() {
                *body = text;
            }
        }
    }
    document
}
