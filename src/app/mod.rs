//! Application state and the reducer.
//!
//! All state mutations happen here. The runtime feeds `update(app, event)`
//! with key presses and request completions and executes the returned
//! effects on background tasks. Nothing in this module performs I/O,
//! which keeps every flow drivable from tests.

pub mod detail;
pub mod list;
pub mod runtime;
pub mod upload;

use std::path::PathBuf;

use crossterm::event::KeyEvent;

use crate::api::{ApiError, DocumentQuery, UploadResponse};
use crate::models::{Document, Mode};

pub use detail::{DetailScreen, DocState, CHAT_ERROR_TEXT};
pub use list::ListScreen;
pub use upload::{UploadField, UploadModal};

/// Which screen owns the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    List,
    Detail,
}

/// Network calls requested by the reducer. Executed by the runtime;
/// each effect produces exactly one [`ApiEvent`].
#[derive(Debug, Clone)]
pub enum Effect {
    FetchDocuments { generation: u64, query: DocumentQuery },
    FetchDocument { mount: u64, id: i64 },
    SaveDocument { mount: u64, document: Document },
    DeleteDocument { id: i64 },
    UploadFile { path: PathBuf },
    UploadText { text: String },
    SendChat { mount: u64, doc_id: i64, mode: Mode, message: String },
}

/// Completion of a network call, carrying the context captured when the
/// request was issued (generation token, detail mount, originating mode).
#[derive(Debug)]
pub enum ApiEvent {
    DocumentsLoaded {
        generation: u64,
        result: Result<Vec<Document>, ApiError>,
    },
    DocumentLoaded {
        mount: u64,
        id: i64,
        result: Result<Document, ApiError>,
    },
    DocumentSaved {
        mount: u64,
        id: i64,
        /// Content that was sent, committed locally on success.
        content: String,
        result: Result<(), ApiError>,
    },
    DocumentDeleted {
        id: i64,
        result: Result<(), ApiError>,
    },
    UploadFinished {
        result: Result<UploadResponse, ApiError>,
    },
    ChatReply {
        mount: u64,
        doc_id: i64,
        mode: Mode,
        result: Result<String, ApiError>,
    },
}

/// Input to the reducer.
#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Api(ApiEvent),
}

/// Top-level application state.
pub struct App {
    pub screen: Screen,
    pub list: ListScreen,
    pub detail: Option<DetailScreen>,
    pub should_quit: bool,
    /// Bumped each time a detail screen mounts. Completions from a
    /// previous mount are dropped instead of leaking into a fresh
    /// screen's histories.
    detail_mounts: u64,
}

impl App {
    /// Create the application and the initial collection fetch.
    pub fn new() -> (Self, Vec<Effect>) {
        let mut list = ListScreen::new();
        let effect = list.refetch();
        let app = Self {
            screen: Screen::List,
            list,
            detail: None,
            should_quit: false,
            detail_mounts: 0,
        };
        (app, vec![effect])
    }

    /// Navigate to the detail screen for `id`.
    pub fn open_detail(&mut self, id: i64) -> Vec<Effect> {
        self.detail_mounts += 1;
        let (screen, effect) = DetailScreen::new(self.detail_mounts, id);
        self.detail = Some(screen);
        self.screen = Screen::Detail;
        vec![effect]
    }

    /// Navigate back to the list. Chat histories and the edit buffer
    /// are dropped with the screen.
    pub fn close_detail(&mut self) {
        self.detail = None;
        self.screen = Screen::List;
    }

    fn detail_for(&mut self, mount: u64) -> Option<&mut DetailScreen> {
        self.detail.as_mut().filter(|screen| screen.mount == mount)
    }
}

/// The reducer. Folds one event into state and returns the effects to
/// execute.
pub fn update(app: &mut App, event: AppEvent) -> Vec<Effect> {
    match event {
        AppEvent::Key(key) => match app.screen {
            Screen::List => list::handle_key(app, key),
            Screen::Detail => detail::handle_key(app, key),
        },
        AppEvent::Api(api_event) => handle_api(app, api_event),
    }
}

fn handle_api(app: &mut App, event: ApiEvent) -> Vec<Effect> {
    match event {
        ApiEvent::DocumentsLoaded { generation, result } => {
            app.list.apply_documents(generation, result);
            Vec::new()
        }
        ApiEvent::DocumentLoaded { mount, id, result } => {
            if let Some(screen) = app.detail_for(mount) {
                if screen.doc_id == id {
                    screen.apply_loaded(result);
                }
            } else {
                tracing::debug!("Dropping document load for unmounted screen (doc {})", id);
            }
            Vec::new()
        }
        ApiEvent::DocumentSaved {
            mount,
            id,
            content,
            result,
        } => {
            if let Some(screen) = app.detail_for(mount) {
                if screen.doc_id == id {
                    screen.apply_save(content, result);
                }
            }
            Vec::new()
        }
        ApiEvent::DocumentDeleted { id, result } => app.list.apply_deleted(id, result),
        ApiEvent::UploadFinished { result } => app.list.apply_upload(result),
        ApiEvent::ChatReply {
            mount,
            doc_id,
            mode,
            result,
        } => {
            if let Some(screen) = app.detail_for(mount) {
                if screen.doc_id == doc_id {
                    screen.apply_chat_reply(mode, result);
                }
            } else {
                tracing::debug!("Dropping chat reply for unmounted screen (doc {})", doc_id);
            }
            Vec::new()
        }
    }
}
