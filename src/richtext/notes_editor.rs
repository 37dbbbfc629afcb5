// Notes Editor
// Session-level controller: tracks the active block, selection and pending
// typing attributes, and turns edit intents into new documents.
//
// The editor never stores the document. Each operation takes the current
// document and returns the next one; the caller keeps (and persists) it.

use super::block_editor::{self, FocusPosition, FocusRequest};
use super::inline_style::{self, NotesTextStyle};
use super::notes_document::{BlockId, BlockType, NotesDocument};
use super::styled_text::{Color, StyledText, TextRange, TextStyle};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Toolbar-facing editing surface
pub trait NotesEditorController {
    fn toggle_style(&mut self, document: &NotesDocument, style: NotesTextStyle) -> NotesDocument;
    fn set_text_color(&mut self, document: &NotesDocument, color: Color) -> NotesDocument;
    fn insert_image(&mut self, document: &NotesDocument, asset_id: &str) -> NotesDocument;
    fn toggle_block_type(&mut self, document: &NotesDocument, block_type: BlockType)
    -> NotesDocument;
}

/// Undo/redo hooks, implemented by whoever owns the document history
pub trait UndoSupport {
    fn undo(&mut self);
    fn redo(&mut self);
    fn can_undo(&self) -> bool;
    fn can_redo(&self) -> bool;
}

/// Edit intents decoded from platform input by the surrounding UI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "intent", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Intent {
    Break { block_id: BlockId },
    BackspaceAtStart { block_id: BlockId },
    SelectionChanged { block_id: BlockId, range: TextRange },
    TextChanged { block_id: BlockId, text: StyledText },
    ToggleStyle { style: NotesTextStyle },
    SetColor { color: Color },
    ToggleBlockType { block_type: BlockType },
    ToggleChecklist { block_id: BlockId },
    InsertImage { asset_id: String },
}

/// Editing session state (not persisted)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EditorState {
    pub active_block_id: Option<BlockId>,
    pub active_selection: TextRange,
    /// Styles for the next typed character when the selection is empty
    pub typing_attributes: TextStyle,
    pub focused_block_id: Option<BlockId>,
    pub focus_position: FocusPosition,
}

/// The notes editor controller
#[derive(Debug, Default)]
pub struct NotesEditor {
    state: EditorState,
    pending_focus: Option<FocusRequest>,
}

impl NotesEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn set_active_block(&mut self, id: BlockId) {
        self.state.active_block_id = Some(id);
    }

    /// Record the selection reported by the input collaborator
    pub fn selection_changed(&mut self, id: BlockId, range: TextRange) {
        self.state.active_block_id = Some(id);
        self.state.active_selection = range;
    }

    /// The focus request left by the last break/backspace, handed out once.
    /// Taking it marks the block as focused.
    pub fn take_focus_request(&mut self) -> Option<FocusRequest> {
        let request = self.pending_focus.take()?;
        self.state.focused_block_id = Some(request.block_id);
        Some(request)
    }

    pub fn text_changed(&mut self, document: &NotesDocument, id: BlockId, text: StyledText) -> NotesDocument {
        block_editor::replace_text(document, id, text)
    }

    pub fn toggle_checklist(&mut self, document: &NotesDocument, id: BlockId) -> NotesDocument {
        block_editor::toggle_checklist(document, id)
    }

    /// Break in block `id`; focus moves to the start of the new block
    pub fn handle_return(&mut self, document: &NotesDocument, id: BlockId) -> NotesDocument {
        let edit = block_editor::split_on_break(document, id);
        if let Some(request) = edit.focus {
            self.request_focus(request, 0);
        }
        edit.document
    }

    /// Backspace at the start of block `id`; focus moves to the end of the
    /// previous block
    pub fn handle_backspace(&mut self, document: &NotesDocument, id: BlockId) -> NotesDocument {
        let edit = block_editor::merge_on_backspace(document, id);
        if let Some(request) = edit.focus {
            let caret = edit
                .document
                .find_block(request.block_id)
                .map_or(0, |b| b.text_len());
            self.request_focus(request, caret);
        }
        edit.document
    }

    /// Dispatch one inbound intent
    pub fn apply(&mut self, document: &NotesDocument, intent: &Intent) -> NotesDocument {
        trace!(?intent, "apply intent");
        match intent {
            Intent::Break { block_id } => self.handle_return(document, *block_id),
            Intent::BackspaceAtStart { block_id } => self.handle_backspace(document, *block_id),
            Intent::SelectionChanged { block_id, range } => {
                self.selection_changed(*block_id, *range);
                document.clone()
            }
            Intent::TextChanged { block_id, text } => {
                self.text_changed(document, *block_id, text.clone())
            }
            Intent::ToggleStyle { style } => self.toggle_style(document, *style),
            Intent::SetColor { color } => self.set_text_color(document, *color),
            Intent::ToggleBlockType { block_type } => self.toggle_block_type(document, *block_type),
            Intent::ToggleChecklist { block_id } => self.toggle_checklist(document, *block_id),
            Intent::InsertImage { asset_id } => self.insert_image(document, asset_id),
        }
    }

    fn request_focus(&mut self, request: FocusRequest, caret: usize) {
        self.state.active_block_id = Some(request.block_id);
        self.state.focus_position = request.position;
        self.state.active_selection = TextRange::caret(caret);
        // Replaces any request the UI has not picked up yet
        self.pending_focus = Some(request);
    }

    /// Apply `restyle` to the active block's text over the active selection
    fn restyle_active<F>(&self, document: &NotesDocument, restyle: F) -> NotesDocument
    where
        F: FnOnce(&StyledText, TextRange) -> StyledText,
    {
        let Some(id) = self.state.active_block_id else {
            return document.clone();
        };
        let Some(text) = document.find_block(id).and_then(|b| b.body()) else {
            debug!(%id, "restyle: no editable text in active block");
            return document.clone();
        };

        let styled = restyle(text, self.state.active_selection);
        block_editor::replace_text(document, id, styled)
    }
}

impl NotesEditorController for NotesEditor {
    fn toggle_style(&mut self, document: &NotesDocument, style: NotesTextStyle) -> NotesDocument {
        if self.state.active_block_id.is_none() {
            return document.clone();
        }

        if self.state.active_selection.is_empty() {
            self.state.typing_attributes =
                inline_style::toggle_typing_attribute(&self.state.typing_attributes, style);
            return document.clone();
        }

        self.restyle_active(document, |text, range| {
            inline_style::toggle_character_style(text, range, style)
        })
    }

    fn set_text_color(&mut self, document: &NotesDocument, color: Color) -> NotesDocument {
        self.restyle_active(document, |text, range| {
            inline_style::set_foreground_color(text, range, color)
        })
    }

    fn insert_image(&mut self, document: &NotesDocument, asset_id: &str) -> NotesDocument {
        match self.state.active_block_id {
            Some(id) => block_editor::insert_image(document, id, asset_id),
            None => document.clone(),
        }
    }

    fn toggle_block_type(&mut self, document: &NotesDocument, block_type: BlockType) -> NotesDocument {
        match self.state.active_block_id {
            Some(id) => block_editor::toggle_block_type(document, id, block_type),
            None => document.clone(),
        }
    }
}
