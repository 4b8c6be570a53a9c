//! End-to-end reducer tests: every flow is driven through key events
//! and request completions exactly as the runtime delivers them, with
//! the returned effects standing in for the network.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use zhibi::api::ApiError;
use zhibi::app::{update, ApiEvent, App, AppEvent, Effect, Screen, CHAT_ERROR_TEXT};
use zhibi::models::{Document, Mode};

fn doc(id: i64, content: &str) -> Document {
    Document {
        id,
        title: None,
        content: content.to_string(),
        doc_type: "论证段".to_string(),
        themes: vec!["青春奋斗".to_string()],
        tags: vec![],
        date: "2025-11-02".to_string(),
    }
}

fn press(app: &mut App, code: KeyCode) -> Vec<Effect> {
    update(app, AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE)))
}

fn press_ctrl(app: &mut App, c: char) -> Vec<Effect> {
    update(
        app,
        AppEvent::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)),
    )
}

fn type_text(app: &mut App, text: &str) -> Vec<Effect> {
    let mut effects = Vec::new();
    for c in text.chars() {
        effects.extend(press(app, KeyCode::Char(c)));
    }
    effects
}

/// Create an app showing the given collection.
fn app_with_documents(documents: Vec<Document>) -> App {
    let (mut app, effects) = App::new();
    let Some(Effect::FetchDocuments { generation, .. }) = effects.first().cloned() else {
        panic!("expected initial fetch");
    };
    update(
        &mut app,
        AppEvent::Api(ApiEvent::DocumentsLoaded {
            generation,
            result: Ok(documents),
        }),
    );
    app
}

/// Open the detail screen for the first document and complete its load.
fn open_first(app: &mut App, document: Document) -> u64 {
    let effects = press(app, KeyCode::Enter);
    let Some(Effect::FetchDocument { mount, id }) = effects.first().cloned() else {
        panic!("expected document fetch");
    };
    assert_eq!(id, document.id);
    update(
        app,
        AppEvent::Api(ApiEvent::DocumentLoaded {
            mount,
            id,
            result: Ok(document),
        }),
    );
    mount
}

// ============================================================================
// Chat panel
// ============================================================================

#[test]
fn chat_send_appends_user_then_assistant_in_order() {
    let mut app = app_with_documents(vec![doc(42, "A")]);
    open_first(&mut app, doc(42, "A"));

    type_text(&mut app, "你好");
    let effects = press(&mut app, KeyCode::Enter);
    let Some(Effect::SendChat {
        mount,
        doc_id,
        mode,
        message,
    }) = effects.first().cloned()
    else {
        panic!("expected chat effect");
    };
    assert_eq!(doc_id, 42);
    assert_eq!(mode, Mode::General);
    assert_eq!(message, "你好");

    update(
        &mut app,
        AppEvent::Api(ApiEvent::ChatReply {
            mount,
            doc_id,
            mode,
            result: Ok("你好，想聊聊这段素材的哪方面？".to_string()),
        }),
    );

    let screen = app.detail.as_ref().expect("detail screen");
    let history = screen.history.get(Mode::General);
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].content, "你好");
    assert_eq!(history[1].content, "你好，想聊聊这段素材的哪方面？");
    assert!(!screen.chat_loading);
}

#[test]
fn chat_reply_lands_in_mode_active_at_send_time() {
    let mut app = app_with_documents(vec![doc(42, "A")]);
    open_first(&mut app, doc(42, "A"));

    // Switch to analyze, send, then look at rewrite while waiting.
    press(&mut app, KeyCode::Tab);
    type_text(&mut app, "分析这段素材的论证逻辑");
    let effects = press(&mut app, KeyCode::Enter);
    let Some(Effect::SendChat { mount, mode, .. }) = effects.first().cloned() else {
        panic!("expected chat effect");
    };
    assert_eq!(mode, Mode::Analyze);
    press(&mut app, KeyCode::Tab);

    update(
        &mut app,
        AppEvent::Api(ApiEvent::ChatReply {
            mount,
            doc_id: 42,
            mode,
            result: Ok("**亮点**：论证层层递进".to_string()),
        }),
    );

    let screen = app.detail.as_ref().expect("detail screen");
    assert_eq!(screen.active_mode, Mode::Rewrite);
    assert_eq!(screen.history.len(Mode::Analyze), 2);
    assert_eq!(screen.history.len(Mode::Rewrite), 0);
    assert_eq!(screen.history.len(Mode::General), 0);
}

#[test]
fn chat_failure_appends_fixed_error_and_clears_waiting() {
    let mut app = app_with_documents(vec![doc(42, "A")]);
    open_first(&mut app, doc(42, "A"));

    type_text(&mut app, "问一句");
    let effects = press(&mut app, KeyCode::Enter);
    let Some(Effect::SendChat { mount, mode, .. }) = effects.first().cloned() else {
        panic!("expected chat effect");
    };

    update(
        &mut app,
        AppEvent::Api(ApiEvent::ChatReply {
            mount,
            doc_id: 42,
            mode,
            result: Err(ApiError::Connection("connection refused".to_string())),
        }),
    );

    let screen = app.detail.as_ref().expect("detail screen");
    let history = screen.history.get(Mode::General);
    assert_eq!(history.len(), 2);
    assert_eq!(history[1].content, CHAT_ERROR_TEXT);
    assert!(!screen.chat_loading);
}

#[test]
fn global_gate_blocks_sends_in_other_modes() {
    let mut app = app_with_documents(vec![doc(42, "A")]);
    open_first(&mut app, doc(42, "A"));

    type_text(&mut app, "第一问");
    assert_eq!(press(&mut app, KeyCode::Enter).len(), 1);

    // While waiting, input is inert in every mode.
    press(&mut app, KeyCode::Tab);
    type_text(&mut app, "第二问");
    assert!(press(&mut app, KeyCode::Enter).is_empty());
    let screen = app.detail.as_ref().expect("detail screen");
    assert_eq!(screen.history.len(Mode::Analyze), 0);
}

#[test]
fn preset_enter_sends_the_selected_question() {
    let mut app = app_with_documents(vec![doc(42, "A")]);
    open_first(&mut app, doc(42, "A"));

    press(&mut app, KeyCode::Tab); // analyze
    press(&mut app, KeyCode::Down);
    let effects = press(&mut app, KeyCode::Enter);
    let Some(Effect::SendChat { message, mode, .. }) = effects.first().cloned() else {
        panic!("expected chat effect");
    };
    assert_eq!(mode, Mode::Analyze);
    assert_eq!(message, Mode::Analyze.presets()[1]);

    let screen = app.detail.as_ref().expect("detail screen");
    assert_eq!(screen.history.get(Mode::Analyze)[0].content, message);
}

#[test]
fn reply_for_a_previous_mount_is_dropped() {
    let mut app = app_with_documents(vec![doc(42, "A")]);
    open_first(&mut app, doc(42, "A"));

    type_text(&mut app, "旧会话的问题");
    let effects = press(&mut app, KeyCode::Enter);
    let Some(Effect::SendChat { mount: old_mount, .. }) = effects.first().cloned() else {
        panic!("expected chat effect");
    };

    // Navigate away (histories drop) and reopen the same document.
    press(&mut app, KeyCode::Esc);
    assert_eq!(app.screen, Screen::List);
    open_first(&mut app, doc(42, "A"));

    update(
        &mut app,
        AppEvent::Api(ApiEvent::ChatReply {
            mount: old_mount,
            doc_id: 42,
            mode: Mode::General,
            result: Ok("迟到的回答".to_string()),
        }),
    );

    let screen = app.detail.as_ref().expect("detail screen");
    assert_eq!(screen.history.len(Mode::General), 0);
}

// ============================================================================
// Edit / save
// ============================================================================

#[test]
fn cancel_restores_loaded_content() {
    let mut app = app_with_documents(vec![doc(42, "A")]);
    open_first(&mut app, doc(42, "A"));

    press_ctrl(&mut app, 'e');
    type_text(&mut app, "B");
    press(&mut app, KeyCode::Esc);

    let screen = app.detail.as_ref().expect("detail screen");
    assert!(!screen.editing);
    assert_eq!(screen.document().unwrap().content, "A");
    assert_eq!(screen.edit_buffer, "A");
}

#[test]
fn save_success_commits_buffer_and_exits_editing() {
    let mut app = app_with_documents(vec![doc(42, "A")]);
    open_first(&mut app, doc(42, "A"));

    press_ctrl(&mut app, 'e');
    press(&mut app, KeyCode::Backspace);
    type_text(&mut app, "B");
    let effects = press_ctrl(&mut app, 's');
    let Some(Effect::SaveDocument { mount, document }) = effects.first().cloned() else {
        panic!("expected save effect");
    };
    assert_eq!(document.content, "B");

    update(
        &mut app,
        AppEvent::Api(ApiEvent::DocumentSaved {
            mount,
            id: 42,
            content: document.content,
            result: Ok(()),
        }),
    );

    let screen = app.detail.as_ref().expect("detail screen");
    assert_eq!(screen.document().unwrap().content, "B");
    assert!(!screen.editing);
    assert!(!screen.saving);
}

#[test]
fn save_failure_keeps_editing_with_buffer_intact() {
    let mut app = app_with_documents(vec![doc(42, "A")]);
    open_first(&mut app, doc(42, "A"));

    press_ctrl(&mut app, 'e');
    type_text(&mut app, "B");
    let effects = press_ctrl(&mut app, 's');
    let Some(Effect::SaveDocument { mount, .. }) = effects.first().cloned() else {
        panic!("expected save effect");
    };

    // The surface is inert while the save is outstanding.
    assert!(press_ctrl(&mut app, 's').is_empty());

    update(
        &mut app,
        AppEvent::Api(ApiEvent::DocumentSaved {
            mount,
            id: 42,
            content: "AB".to_string(),
            result: Err(ApiError::Status(500)),
        }),
    );

    let screen = app.detail.as_ref().expect("detail screen");
    assert!(screen.editing);
    assert_eq!(screen.edit_buffer, "AB");
    assert_eq!(screen.document().unwrap().content, "A");
    assert!(screen.notice.is_some());
}

#[test]
fn load_failure_shows_terminal_not_found() {
    let mut app = app_with_documents(vec![doc(42, "A")]);
    let effects = press(&mut app, KeyCode::Enter);
    let Some(Effect::FetchDocument { mount, id }) = effects.first().cloned() else {
        panic!("expected document fetch");
    };

    update(
        &mut app,
        AppEvent::Api(ApiEvent::DocumentLoaded {
            mount,
            id,
            result: Err(ApiError::Status(404)),
        }),
    );

    let screen = app.detail.as_ref().expect("detail screen");
    assert!(screen.document().is_none());
}

// ============================================================================
// List / delete / stale responses
// ============================================================================

#[test]
fn delete_confirmed_issues_delete_then_refetch() {
    let mut app = app_with_documents(vec![doc(7, "目标"), doc(8, "其他")]);

    press(&mut app, KeyCode::Char('d'));
    let effects = press(&mut app, KeyCode::Char('y'));
    assert!(matches!(
        effects.first(),
        Some(Effect::DeleteDocument { id: 7 })
    ));

    let effects = update(
        &mut app,
        AppEvent::Api(ApiEvent::DocumentDeleted {
            id: 7,
            result: Ok(()),
        }),
    );
    let Some(Effect::FetchDocuments { generation, .. }) = effects.first().cloned() else {
        panic!("expected refetch after delete");
    };

    update(
        &mut app,
        AppEvent::Api(ApiEvent::DocumentsLoaded {
            generation,
            result: Ok(vec![doc(8, "其他")]),
        }),
    );
    assert!(app.list.documents.iter().all(|d| d.id != 7));
}

#[test]
fn declined_delete_issues_nothing() {
    let mut app = app_with_documents(vec![doc(7, "目标")]);
    press(&mut app, KeyCode::Char('d'));
    assert!(press(&mut app, KeyCode::Char('n')).is_empty());
    assert_eq!(app.list.documents.len(), 1);
}

#[test]
fn stale_search_response_does_not_clobber_newer_one() {
    let mut app = app_with_documents(vec![doc(1, "旧")]);

    // Two keystrokes ⇒ two independent fetches.
    press(&mut app, KeyCode::Char('/'));
    let first = press(&mut app, KeyCode::Char('奋'));
    let second = press(&mut app, KeyCode::Char('斗'));
    let Some(Effect::FetchDocuments { generation: g1, .. }) = first.first().cloned() else {
        panic!("expected fetch");
    };
    let Some(Effect::FetchDocuments { generation: g2, .. }) = second.first().cloned() else {
        panic!("expected fetch");
    };

    // Later fetch resolves first.
    update(
        &mut app,
        AppEvent::Api(ApiEvent::DocumentsLoaded {
            generation: g2,
            result: Ok(vec![doc(2, "奋斗素材")]),
        }),
    );
    update(
        &mut app,
        AppEvent::Api(ApiEvent::DocumentsLoaded {
            generation: g1,
            result: Ok(vec![doc(3, "过时结果")]),
        }),
    );

    assert_eq!(app.list.documents.len(), 1);
    assert_eq!(app.list.documents[0].id, 2);
}

// ============================================================================
// Upload modal
// ============================================================================

#[test]
fn upload_success_closes_modal_and_refreshes() {
    let mut app = app_with_documents(vec![]);

    press(&mut app, KeyCode::Char('u'));
    press(&mut app, KeyCode::Tab); // focus the text field
    type_text(&mut app, "https://example.com/article");
    let effects = press(&mut app, KeyCode::Enter);
    assert!(matches!(effects.first(), Some(Effect::UploadText { .. })));

    let outcome = serde_json::from_str(r#"{"status": "success", "count": 2}"#).unwrap();
    let effects = update(
        &mut app,
        AppEvent::Api(ApiEvent::UploadFinished {
            result: Ok(outcome),
        }),
    );
    assert!(app.list.upload.is_none());
    assert!(matches!(
        effects.first(),
        Some(Effect::FetchDocuments { .. })
    ));
}

#[test]
fn upload_failure_keeps_modal_open_with_input_preserved() {
    let mut app = app_with_documents(vec![]);

    press(&mut app, KeyCode::Char('u'));
    press(&mut app, KeyCode::Tab);
    type_text(&mut app, "一段素材");
    press(&mut app, KeyCode::Enter);

    let effects = update(
        &mut app,
        AppEvent::Api(ApiEvent::UploadFinished {
            result: Err(ApiError::Connection("timeout".to_string())),
        }),
    );
    assert!(effects.is_empty());

    let modal = app.list.upload.as_ref().expect("modal still open");
    assert_eq!(modal.text, "一段素材");
    assert!(modal.error.is_some());
    assert!(!modal.uploading);
}
