pub mod styled_text;
pub mod notes_document;

pub mod block_editor;
pub mod inline_style;
pub mod notes_editor;
