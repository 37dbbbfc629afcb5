// Library exports for notes-editor

pub mod config;
pub mod richtext;

pub use config::{ConfigError, EdgeInsets, EditorConfiguration};
pub use richtext::block_editor::{BlockEdit, FocusPosition, FocusRequest};
pub use richtext::inline_style::NotesTextStyle;
pub use richtext::notes_document::{
    Block, BlockId, BlockType, DecodeError, DocumentId, NotesDocument, sample_document,
};
pub use richtext::notes_editor::{
    EditorState, Intent, NotesEditor, NotesEditorController, UndoSupport,
};
pub use richtext::styled_text::{Color, FontRole, StyledText, TextRange, TextRun, TextStyle};
