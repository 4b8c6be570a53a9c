//! Upload modal: a file path for multipart upload, or raw text / a
//! pasted link for the text endpoint. Two mutually exclusive
//! submission shapes, one uploading gate.

use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::list::ListScreen;
use super::Effect;

/// Which input currently has the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadField {
    File,
    Text,
}

/// State of the upload modal.
pub struct UploadModal {
    pub field: UploadField,
    pub file_path: String,
    pub text: String,
    /// One submission at a time; also blocks closing the modal.
    pub uploading: bool,
    /// Failure notice shown inside the modal; inputs stay intact.
    pub error: Option<String>,
}

impl UploadModal {
    pub fn new() -> Self {
        Self {
            field: UploadField::File,
            file_path: String::new(),
            text: String::new(),
            uploading: false,
            error: None,
        }
    }

    /// Submit the focused input. No-op while a submission is
    /// outstanding or the input is blank.
    pub fn submit(&mut self) -> Option<Effect> {
        if self.uploading {
            return None;
        }
        let effect = match self.field {
            UploadField::File => {
                let raw = self.file_path.trim();
                if raw.is_empty() {
                    return None;
                }
                let path = shellexpand::tilde(raw);
                Effect::UploadFile {
                    path: PathBuf::from(path.as_ref()),
                }
            }
            UploadField::Text => {
                let text = self.text.trim();
                if text.is_empty() {
                    return None;
                }
                Effect::UploadText {
                    text: text.to_string(),
                }
            }
        };
        self.uploading = true;
        self.error = None;
        Some(effect)
    }
}

impl Default for UploadModal {
    fn default() -> Self {
        Self::new()
    }
}

/// Key handling while the modal is open.
pub fn handle_key(screen: &mut ListScreen, key: KeyEvent) -> Vec<Effect> {
    let Some(modal) = screen.upload.as_mut() else {
        return Vec::new();
    };

    match key.code {
        KeyCode::Esc => {
            if !modal.uploading {
                screen.upload = None;
            }
            Vec::new()
        }
        KeyCode::Tab | KeyCode::BackTab => {
            modal.field = match modal.field {
                UploadField::File => UploadField::Text,
                UploadField::Text => UploadField::File,
            };
            Vec::new()
        }
        KeyCode::Enter => modal.submit().into_iter().collect(),
        KeyCode::Backspace => {
            if !modal.uploading {
                match modal.field {
                    UploadField::File => modal.file_path.pop(),
                    UploadField::Text => modal.text.pop(),
                };
            }
            Vec::new()
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            if !modal.uploading {
                match modal.field {
                    UploadField::File => modal.file_path.push(c),
                    UploadField::Text => modal.text.push(c),
                }
            }
            Vec::new()
        }
        _ => Vec::new(),
    }
}
