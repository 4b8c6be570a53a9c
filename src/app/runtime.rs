//! Terminal runtime: owns the terminal, merges key events with request
//! completions, and executes effects on background tasks.
//!
//! Requests are never cancelled. Each spawned task runs its call to
//! completion and sends exactly one [`ApiEvent`] back through the
//! channel; the reducer decides what the completion still applies to.

use std::io::Stdout;
use std::sync::Arc;

use anyhow::Result;
use crossterm::event::{Event, EventStream, KeyEventKind};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use futures::StreamExt;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::sync::mpsc::{self, UnboundedSender};

use super::{update, ApiEvent, App, AppEvent, Effect};
use crate::api::ApiClient;
use crate::ui;

type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Run the interactive browser until the user quits.
pub async fn run(api: ApiClient, start_id: Option<i64>) -> Result<()> {
    let mut terminal = setup_terminal()?;
    let result = run_loop(&mut terminal, api, start_id).await;
    restore_terminal(&mut terminal)?;
    result
}

fn setup_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    crossterm::execute!(stdout, EnterAlternateScreen)?;
    let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    crossterm::execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

async fn run_loop(terminal: &mut Tui, api: ApiClient, start_id: Option<i64>) -> Result<()> {
    let api = Arc::new(api);
    let (tx, mut rx) = mpsc::unbounded_channel::<ApiEvent>();

    let (mut app, mut effects) = App::new();
    if let Some(id) = start_id {
        effects.extend(app.open_detail(id));
    }
    for effect in effects {
        execute(effect, api.clone(), tx.clone());
    }

    let mut events = EventStream::new();

    loop {
        terminal.draw(|frame| ui::draw(frame, &app))?;

        let event = tokio::select! {
            maybe_event = events.next() => match maybe_event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    AppEvent::Key(key)
                }
                // Resize and other terminal events only need a redraw.
                Some(Ok(_)) => continue,
                Some(Err(err)) => return Err(err.into()),
                None => break,
            },
            Some(api_event) = rx.recv() => AppEvent::Api(api_event),
        };

        for effect in update(&mut app, event) {
            execute(effect, api.clone(), tx.clone());
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Execute one effect on a background task. The completion carries the
/// context captured here, not whatever is current when it resolves.
fn execute(effect: Effect, api: Arc<ApiClient>, tx: UnboundedSender<ApiEvent>) {
    tokio::spawn(async move {
        let event = match effect {
            Effect::FetchDocuments { generation, query } => ApiEvent::DocumentsLoaded {
                generation,
                result: api.list_documents(&query).await,
            },
            Effect::FetchDocument { mount, id } => ApiEvent::DocumentLoaded {
                mount,
                id,
                result: api.get_document(id).await,
            },
            Effect::SaveDocument { mount, document } => {
                let id = document.id;
                let content = document.content.clone();
                ApiEvent::DocumentSaved {
                    mount,
                    id,
                    content,
                    result: api.update_document(&document).await,
                }
            }
            Effect::DeleteDocument { id } => ApiEvent::DocumentDeleted {
                id,
                result: api.delete_document(id).await,
            },
            Effect::UploadFile { path } => ApiEvent::UploadFinished {
                result: api.upload_file(&path).await,
            },
            Effect::UploadText { text } => ApiEvent::UploadFinished {
                result: api.upload_text(&text).await,
            },
            Effect::SendChat {
                mount,
                doc_id,
                mode,
                message,
            } => ApiEvent::ChatReply {
                mount,
                doc_id,
                mode,
                result: api.chat(doc_id, mode, &message).await,
            },
        };
        // The receiver is gone only during shutdown.
        let _ = tx.send(event);
    });
}
