//! List screen: the server-filtered document collection, delete flow,
//! and the upload modal entry point.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::upload::{self, UploadModal};
use super::{App, Effect};
use crate::api::{ApiError, DocumentQuery, UploadResponse};
use crate::models::{Document, THEME_FILTERS, TYPE_FILTERS};

/// State of the document list screen.
///
/// The collection is always server-derived: every filter or search
/// change issues a fresh fetch instead of re-filtering a cached set.
pub struct ListScreen {
    pub documents: Vec<Document>,
    pub loading: bool,
    /// Fetch error for the latest generation, shown in the status bar.
    pub error: Option<String>,

    pub search: String,
    /// Search input has the keyboard.
    pub search_active: bool,
    /// Index into [`TYPE_FILTERS`]; 0 means no type filter.
    pub type_index: usize,
    /// Index into [`THEME_FILTERS`]; `None` means no theme filter.
    pub theme_index: Option<usize>,

    pub selected: usize,
    /// Document id awaiting delete confirmation.
    pub confirm_delete: Option<i64>,
    pub upload: Option<UploadModal>,
    /// Blocking failure notice; dismissed by the next key press.
    pub alert: Option<String>,
    /// Wall-clock time of the last successful sync.
    pub last_synced: Option<String>,

    /// Generation token of the newest issued fetch. Responses carrying
    /// an older token are dropped, so out-of-order completions can
    /// never replace newer results.
    generation: u64,
}

impl ListScreen {
    pub fn new() -> Self {
        Self {
            documents: Vec::new(),
            loading: false,
            error: None,
            search: String::new(),
            search_active: false,
            type_index: 0,
            theme_index: None,
            selected: 0,
            confirm_delete: None,
            upload: None,
            alert: None,
            last_synced: None,
            generation: 0,
        }
    }

    /// Current server-side filter parameters.
    pub fn query(&self) -> DocumentQuery {
        DocumentQuery {
            query: (!self.search.trim().is_empty()).then(|| self.search.trim().to_string()),
            doc_type: (self.type_index > 0).then(|| TYPE_FILTERS[self.type_index].to_string()),
            theme: self.theme_index.map(|i| THEME_FILTERS[i].to_string()),
        }
    }

    /// Issue a fresh collection fetch with the next generation token.
    pub fn refetch(&mut self) -> Effect {
        self.generation += 1;
        self.loading = true;
        Effect::FetchDocuments {
            generation: self.generation,
            query: self.query(),
        }
    }

    /// Apply a fetch completion. Only the latest generation updates
    /// the displayed collection; stale responses are dropped.
    pub fn apply_documents(&mut self, generation: u64, result: Result<Vec<Document>, ApiError>) {
        if generation != self.generation {
            tracing::debug!(
                "Dropping stale document list (generation {} < {})",
                generation,
                self.generation
            );
            return;
        }
        self.loading = false;
        match result {
            Ok(documents) => {
                self.documents = documents;
                if self.selected >= self.documents.len() {
                    self.selected = self.documents.len().saturating_sub(1);
                }
                self.error = None;
                self.last_synced =
                    Some(chrono::Local::now().format("%H:%M:%S").to_string());
            }
            Err(err) => {
                tracing::error!("Failed to load document list: {}", err);
                self.error = Some(format!("加载失败: {}", err));
            }
        }
    }

    pub fn selected_document(&self) -> Option<&Document> {
        self.documents.get(self.selected)
    }

    /// Confirm the pending delete: issue the DELETE. The collection is
    /// re-fetched unconditionally when the completion arrives.
    pub fn confirm_pending_delete(&mut self) -> Option<Effect> {
        let id = self.confirm_delete.take()?;
        Some(Effect::DeleteDocument { id })
    }

    /// Apply a delete completion. No optimistic removal happened, so
    /// the refresh is the only state change; failures also surface a
    /// notice.
    pub fn apply_deleted(&mut self, id: i64, result: Result<(), ApiError>) -> Vec<Effect> {
        if let Err(err) = result {
            tracing::warn!("Delete failed for document {}: {}", id, err);
            self.alert = Some("删除失败，请检查后端连接".to_string());
        }
        vec![self.refetch()]
    }

    /// Apply an upload completion to the modal.
    pub fn apply_upload(&mut self, result: Result<UploadResponse, ApiError>) -> Vec<Effect> {
        let Some(modal) = self.upload.as_mut() else {
            // Modal already gone; still refresh after a successful import.
            return match result {
                Ok(outcome) if outcome.is_success() => vec![self.refetch()],
                _ => Vec::new(),
            };
        };

        modal.uploading = false;
        match result {
            Ok(outcome) if outcome.is_success() => {
                self.upload = None;
                vec![self.refetch()]
            }
            Ok(outcome) => {
                let reason = outcome.message.unwrap_or_else(|| "解析失败".to_string());
                modal.error = Some(format!("处理失败: {}", reason));
                Vec::new()
            }
            Err(err) => {
                tracing::warn!("Upload failed: {}", err);
                modal.error = Some("上传出错，请检查后端连接".to_string());
                Vec::new()
            }
        }
    }
}

impl Default for ListScreen {
    fn default() -> Self {
        Self::new()
    }
}

/// Key handling for the list screen.
pub fn handle_key(app: &mut App, key: KeyEvent) -> Vec<Effect> {
    let screen = &mut app.list;

    // A blocking notice swallows the key that dismisses it.
    if screen.alert.is_some() {
        screen.alert = None;
        return Vec::new();
    }

    if screen.upload.is_some() {
        return upload::handle_key(screen, key);
    }

    if let Some(_id) = screen.confirm_delete {
        return match key.code {
            KeyCode::Char('y') | KeyCode::Enter => {
                screen.confirm_pending_delete().into_iter().collect()
            }
            _ => {
                screen.confirm_delete = None;
                Vec::new()
            }
        };
    }

    if screen.search_active {
        return match key.code {
            KeyCode::Esc | KeyCode::Enter => {
                screen.search_active = false;
                Vec::new()
            }
            KeyCode::Backspace => {
                if screen.search.pop().is_some() {
                    vec![screen.refetch()]
                } else {
                    Vec::new()
                }
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                screen.search.push(c);
                vec![screen.refetch()]
            }
            _ => Vec::new(),
        };
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => {
            app.should_quit = true;
            Vec::new()
        }
        KeyCode::Char('/') => {
            screen.search_active = true;
            Vec::new()
        }
        KeyCode::Up | KeyCode::Char('k') => {
            screen.selected = screen.selected.saturating_sub(1);
            Vec::new()
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if screen.selected + 1 < screen.documents.len() {
                screen.selected += 1;
            }
            Vec::new()
        }
        KeyCode::Enter => {
            if let Some(id) = screen.selected_document().map(|doc| doc.id) {
                app.open_detail(id)
            } else {
                Vec::new()
            }
        }
        KeyCode::Char('t') => {
            screen.type_index = (screen.type_index + 1) % TYPE_FILTERS.len();
            vec![screen.refetch()]
        }
        KeyCode::Char('T') => {
            screen.type_index = screen
                .type_index
                .checked_sub(1)
                .unwrap_or(TYPE_FILTERS.len() - 1);
            vec![screen.refetch()]
        }
        KeyCode::Char('f') => {
            // None → 0 → 1 → … → last → None
            screen.theme_index = match screen.theme_index {
                None => Some(0),
                Some(i) if i + 1 < THEME_FILTERS.len() => Some(i + 1),
                Some(_) => None,
            };
            vec![screen.refetch()]
        }
        KeyCode::Char('F') => {
            screen.theme_index = match screen.theme_index {
                None => Some(THEME_FILTERS.len() - 1),
                Some(0) => None,
                Some(i) => Some(i - 1),
            };
            vec![screen.refetch()]
        }
        KeyCode::Char('r') => vec![screen.refetch()],
        KeyCode::Char('d') => {
            screen.confirm_delete = screen.selected_document().map(|doc| doc.id);
            Vec::new()
        }
        KeyCode::Char('u') => {
            screen.upload = Some(UploadModal::new());
            Vec::new()
        }
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(id: i64) -> Document {
        Document {
            id,
            title: None,
            content: format!("素材 {}", id),
            doc_type: String::new(),
            themes: vec![],
            tags: vec![],
            date: String::new(),
        }
    }

    #[test]
    fn test_query_maps_filters() {
        let mut screen = ListScreen::new();
        assert_eq!(screen.query(), DocumentQuery::default());

        screen.search = " 奋斗 ".to_string();
        screen.type_index = 1;
        screen.theme_index = Some(0);
        let query = screen.query();
        assert_eq!(query.query.as_deref(), Some("奋斗"));
        assert_eq!(query.doc_type.as_deref(), Some("论证段"));
        assert_eq!(query.theme.as_deref(), Some("青春奋斗"));
    }

    #[test]
    fn test_all_types_filter_is_unset() {
        let screen = ListScreen::new();
        assert_eq!(screen.type_index, 0);
        assert!(screen.query().doc_type.is_none());
    }

    #[test]
    fn test_stale_generation_is_dropped() {
        let mut screen = ListScreen::new();
        let first = screen.refetch();
        let second = screen.refetch();
        let (Effect::FetchDocuments { generation: g1, .. },
             Effect::FetchDocuments { generation: g2, .. }) = (first, second)
        else {
            panic!("expected fetch effects");
        };
        assert!(g2 > g1);

        // The newer response lands first.
        screen.apply_documents(g2, Ok(vec![doc(1), doc(2)]));
        assert_eq!(screen.documents.len(), 2);
        assert!(!screen.loading);

        // The stale one must not clobber it.
        screen.apply_documents(g1, Ok(vec![doc(9)]));
        assert_eq!(screen.documents.len(), 2);
        assert_eq!(screen.documents[0].id, 1);
    }

    #[test]
    fn test_fetch_error_keeps_previous_collection() {
        let mut screen = ListScreen::new();
        let Effect::FetchDocuments { generation, .. } = screen.refetch() else {
            panic!("expected fetch effect");
        };
        screen.apply_documents(generation, Ok(vec![doc(1)]));

        let Effect::FetchDocuments { generation, .. } = screen.refetch() else {
            panic!("expected fetch effect");
        };
        screen.apply_documents(
            generation,
            Err(ApiError::Connection("connection refused".to_string())),
        );
        assert_eq!(screen.documents.len(), 1);
        assert!(screen.error.is_some());
    }

    #[test]
    fn test_selection_clamped_after_shrink() {
        let mut screen = ListScreen::new();
        let Effect::FetchDocuments { generation, .. } = screen.refetch() else {
            panic!("expected fetch effect");
        };
        screen.apply_documents(generation, Ok(vec![doc(1), doc(2), doc(3)]));
        screen.selected = 2;

        let Effect::FetchDocuments { generation, .. } = screen.refetch() else {
            panic!("expected fetch effect");
        };
        screen.apply_documents(generation, Ok(vec![doc(1)]));
        assert_eq!(screen.selected, 0);
    }

    #[test]
    fn test_delete_always_refetches() {
        let mut screen = ListScreen::new();
        screen.confirm_delete = Some(7);
        let effect = screen.confirm_pending_delete().expect("delete effect");
        assert!(matches!(effect, Effect::DeleteDocument { id: 7 }));

        let effects = screen.apply_deleted(7, Ok(()));
        assert!(matches!(effects[0], Effect::FetchDocuments { .. }));
        assert!(screen.alert.is_none());

        let effects = screen.apply_deleted(7, Err(ApiError::Status(500)));
        assert!(matches!(effects[0], Effect::FetchDocuments { .. }));
        assert!(screen.alert.is_some());
    }
}
