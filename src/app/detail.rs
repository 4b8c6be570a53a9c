//! Detail screen: one loaded document, the edit/save flow, and the
//! three-mode chat panel.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::{App, Effect};
use crate::api::ApiError;
use crate::models::{ChatHistory, Document, Message, Mode};

/// Fixed assistant message appended when a chat request fails.
pub const CHAT_ERROR_TEXT: &str = "网络错误，请检查后端。";

/// Load state of the displayed document. `NotFound` is terminal.
#[derive(Debug, Clone)]
pub enum DocState {
    Loading,
    Loaded(Document),
    NotFound,
}

/// State of the document detail screen.
///
/// The chat histories and the edit buffer live only here; navigating
/// away drops them.
pub struct DetailScreen {
    /// Mount token; completions from an earlier mount are dropped.
    pub mount: u64,
    pub doc_id: i64,
    pub doc: DocState,

    // Edit/save flow
    pub editing: bool,
    pub edit_buffer: String,
    pub saving: bool,
    /// Blocking failure notice; dismissed by the next key press.
    pub notice: Option<String>,

    // Chat panel
    pub active_mode: Mode,
    pub history: ChatHistory,
    pub draft: String,
    /// One outstanding chat request across all modes.
    pub chat_loading: bool,
    /// Lines scrolled up from the bottom of the message list;
    /// 0 sticks to the latest entry.
    pub chat_scroll: u16,
    pub content_scroll: u16,
    pub preset_cursor: usize,
}

impl DetailScreen {
    /// Create the screen and the single load request for `id`.
    pub fn new(mount: u64, id: i64) -> (Self, Effect) {
        let screen = Self {
            mount,
            doc_id: id,
            doc: DocState::Loading,
            editing: false,
            edit_buffer: String::new(),
            saving: false,
            notice: None,
            active_mode: Mode::General,
            history: ChatHistory::default(),
            draft: String::new(),
            chat_loading: false,
            chat_scroll: 0,
            content_scroll: 0,
            preset_cursor: 0,
        };
        (screen, Effect::FetchDocument { mount, id })
    }

    pub fn document(&self) -> Option<&Document> {
        match &self.doc {
            DocState::Loaded(doc) => Some(doc),
            _ => None,
        }
    }

    /// Apply the load result. Failure is terminal: the screen shows a
    /// not-found display and never retries.
    pub fn apply_loaded(&mut self, result: Result<Document, ApiError>) {
        match result {
            Ok(doc) => {
                self.edit_buffer = doc.content.clone();
                self.doc = DocState::Loaded(doc);
            }
            Err(err) => {
                tracing::error!("Failed to load document {}: {}", self.doc_id, err);
                self.doc = DocState::NotFound;
            }
        }
    }

    /// Switch the displayed chat mode. Histories are untouched and any
    /// in-flight request keeps targeting the mode captured at send time.
    pub fn switch_mode(&mut self, mode: Mode) {
        self.active_mode = mode;
        self.preset_cursor = 0;
        self.chat_scroll = 0;
    }

    /// Send a chat message in the active mode.
    ///
    /// No-op while a request is outstanding (one gate across all
    /// modes) or when the text is blank. Otherwise the user message is
    /// appended optimistically and the originating mode travels with
    /// the request.
    pub fn send(&mut self, text: &str) -> Option<Effect> {
        if text.trim().is_empty() || self.chat_loading {
            return None;
        }
        if self.document().is_none() {
            return None;
        }

        self.history.push(self.active_mode, Message::user(text));
        self.draft.clear();
        self.chat_loading = true;
        self.chat_scroll = 0;

        Some(Effect::SendChat {
            mount: self.mount,
            doc_id: self.doc_id,
            mode: self.active_mode,
            message: text.to_string(),
        })
    }

    /// Apply a chat completion to the mode captured at send time.
    pub fn apply_chat_reply(&mut self, mode: Mode, result: Result<String, ApiError>) {
        match result {
            Ok(response) => {
                self.history.push(mode, Message::assistant(response));
            }
            Err(err) => {
                tracing::warn!("Chat request failed (mode {}): {}", mode.as_str(), err);
                self.history.push(mode, Message::assistant(CHAT_ERROR_TEXT));
            }
        }
        // Cleared last, success or failure.
        self.chat_loading = false;
        self.chat_scroll = 0;
    }

    /// Enter edit state, seeding the buffer from the displayed content.
    pub fn begin_edit(&mut self) {
        let Some(doc) = self.document() else { return };
        if self.editing {
            return;
        }
        self.edit_buffer = doc.content.clone();
        self.editing = true;
        self.notice = None;
    }

    /// Discard buffer changes and return to viewing.
    pub fn cancel_edit(&mut self) {
        if let Some(doc) = self.document() {
            self.edit_buffer = doc.content.clone();
        }
        self.editing = false;
        self.notice = None;
    }

    /// Request a save of the edit buffer. Inert while a save is
    /// already outstanding.
    pub fn request_save(&mut self) -> Option<Effect> {
        if !self.editing || self.saving {
            return None;
        }
        let doc = self.document()?;

        let mut document = doc.clone();
        document.content = self.edit_buffer.clone();
        self.saving = true;
        self.notice = None;

        Some(Effect::SaveDocument {
            mount: self.mount,
            document,
        })
    }

    /// Apply the save result. Success commits the content that was
    /// sent and exits editing; failure keeps the edit state and buffer
    /// intact behind a blocking notice.
    pub fn apply_save(&mut self, content: String, result: Result<(), ApiError>) {
        self.saving = false;
        match result {
            Ok(()) => {
                if let DocState::Loaded(doc) = &mut self.doc {
                    doc.content = content.clone();
                }
                self.edit_buffer = content;
                self.editing = false;
                self.notice = None;
            }
            Err(ApiError::Status(code)) => {
                tracing::warn!("Save rejected for document {}: HTTP {}", self.doc_id, code);
                self.notice = Some("保存失败".to_string());
            }
            Err(err) => {
                tracing::warn!("Save failed for document {}: {}", self.doc_id, err);
                self.notice = Some("网络错误".to_string());
            }
        }
    }
}

/// Key handling for the detail screen.
pub fn handle_key(app: &mut App, key: KeyEvent) -> Vec<Effect> {
    let Some(screen) = app.detail.as_mut() else {
        app.screen = super::Screen::List;
        return Vec::new();
    };

    // A blocking notice swallows the key that dismisses it.
    if screen.notice.is_some() {
        screen.notice = None;
        return Vec::new();
    }

    if screen.editing {
        return handle_editing_key(screen, key);
    }

    match (key.code, key.modifiers) {
        (KeyCode::Esc, _) => {
            app.close_detail();
            Vec::new()
        }
        (KeyCode::Tab, _) => {
            let next = screen.active_mode.next();
            screen.switch_mode(next);
            Vec::new()
        }
        (KeyCode::BackTab, _) => {
            let prev = screen.active_mode.prev();
            screen.switch_mode(prev);
            Vec::new()
        }
        (KeyCode::Char('e'), KeyModifiers::CONTROL) => {
            screen.begin_edit();
            Vec::new()
        }
        (KeyCode::Up, KeyModifiers::CONTROL) => {
            screen.content_scroll = screen.content_scroll.saturating_sub(1);
            Vec::new()
        }
        (KeyCode::Down, KeyModifiers::CONTROL) => {
            screen.content_scroll = screen.content_scroll.saturating_add(1);
            Vec::new()
        }
        (KeyCode::Enter, _) => {
            let effect = if !screen.draft.trim().is_empty() {
                let draft = screen.draft.clone();
                screen.send(&draft)
            } else if screen.history.is_empty(screen.active_mode) {
                let presets = screen.active_mode.presets();
                presets
                    .get(screen.preset_cursor)
                    .copied()
                    .and_then(|preset| screen.send(preset))
            } else {
                None
            };
            effect.into_iter().collect()
        }
        (KeyCode::Up, _) => {
            if screen.history.is_empty(screen.active_mode) {
                screen.preset_cursor = screen.preset_cursor.saturating_sub(1);
            } else {
                screen.chat_scroll = screen.chat_scroll.saturating_add(1);
            }
            Vec::new()
        }
        (KeyCode::Down, _) => {
            if screen.history.is_empty(screen.active_mode) {
                let max = screen.active_mode.presets().len().saturating_sub(1);
                screen.preset_cursor = (screen.preset_cursor + 1).min(max);
            } else {
                screen.chat_scroll = screen.chat_scroll.saturating_sub(1);
            }
            Vec::new()
        }
        (KeyCode::PageUp, _) => {
            screen.chat_scroll = screen.chat_scroll.saturating_add(5);
            Vec::new()
        }
        (KeyCode::PageDown, _) => {
            screen.chat_scroll = screen.chat_scroll.saturating_sub(5);
            Vec::new()
        }
        (KeyCode::Backspace, _) => {
            if !screen.chat_loading {
                screen.draft.pop();
            }
            Vec::new()
        }
        (KeyCode::Char(c), modifiers) if !modifiers.contains(KeyModifiers::CONTROL) => {
            // The input is inert while a request is outstanding.
            if !screen.chat_loading {
                screen.draft.push(c);
            }
            Vec::new()
        }
        _ => Vec::new(),
    }
}

/// Key handling while the edit surface is focused.
fn handle_editing_key(screen: &mut DetailScreen, key: KeyEvent) -> Vec<Effect> {
    // The whole surface is inert while a save is outstanding.
    if screen.saving {
        return Vec::new();
    }

    match (key.code, key.modifiers) {
        (KeyCode::Esc, _) => {
            screen.cancel_edit();
            Vec::new()
        }
        (KeyCode::Char('s'), KeyModifiers::CONTROL) => screen.request_save().into_iter().collect(),
        (KeyCode::Enter, _) => {
            screen.edit_buffer.push('\n');
            Vec::new()
        }
        (KeyCode::Backspace, _) => {
            screen.edit_buffer.pop();
            Vec::new()
        }
        (KeyCode::Char(c), modifiers) if !modifiers.contains(KeyModifiers::CONTROL) => {
            screen.edit_buffer.push(c);
            Vec::new()
        }
        _ => Vec::new(),
    }
}
