//! System clipboard access for the editor's copy action.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("clipboard backend error: {0}")]
    Backend(#[from] arboard::Error),
}

pub fn copy_text(text: &str) -> Result<(), ClipboardError> {
    let mut cb = arboard::Clipboard::new()?;
    cb.set_text(text.to_owned())?;
    tracing::debug!(bytes = text.len(), "copied to clipboard");
    Ok(())
}
