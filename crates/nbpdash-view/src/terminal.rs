use crate::labels::Labels;
use crate::page::ServiceCard;
use crate::surface::RenderSurface;
use async_trait::async_trait;
use chrono::{DateTime, Local};
use nbpdash_core::types::{ConnectionStatus, Locale, RatioDetail, Service, ServiceId};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Pending writes before new output is dropped.
const BACKLOG: usize = 256;

/// Plain-text surface for running the dashboard in a terminal.
///
/// Output goes through a writer task, so a terminal that stops reading never
/// holds up whoever renders. Once the backlog is full, new output is dropped.
pub struct TerminalSurface {
    labels: &'static Labels,
    output: mpsc::Sender<String>,
}

impl TerminalSurface {
    /// Start the writer task on `out`. The task hands `out` back once every
    /// queued write is done and the surface has been dropped.
    pub fn spawn<W>(locale: Locale, out: W) -> (Self, JoinHandle<W>)
    where
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(BACKLOG);
        let writer = tokio::spawn(write_output(out, rx));
        let surface = Self {
            labels: Labels::for_locale(locale),
            output: tx,
        };
        (surface, writer)
    }

    /// Print text that is not part of the dashboard itself, in order with it.
    pub fn print(&self, text: impl Into<String>) {
        let mut text = text.into();
        if !text.ends_with('\n') {
            text.push('\n');
        }
        self.emit(text);
    }

    fn emit(&self, text: String) {
        match self.output.try_send(text) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => warn!("terminal is not keeping up, output dropped"),
            Err(TrySendError::Closed(_)) => debug!("terminal writer stopped, output dropped"),
        }
    }
}

async fn write_output<W: AsyncWrite + Unpin>(mut out: W, mut rx: mpsc::Receiver<String>) -> W {
    while let Some(text) = rx.recv().await {
        if let Err(e) = out.write_all(text.as_bytes()).await {
            warn!("terminal write failed: {e}");
            continue;
        }
        if let Err(e) = out.flush().await {
            warn!("terminal flush failed: {e}");
        }
    }
    out
}

fn card_block(card: &ServiceCard) -> String {
    format!(
        "[{}] {}\n    {}\n    {}\n    {}\n",
        card.service_id, card.name, card.type_line, card.ratio_line, card.status_line
    )
}

#[async_trait]
impl RenderSurface for TerminalSurface {
    async fn render_service_list(&self, services: &[Service]) {
        let mut text = format!("== {} ({}) ==\n", self.labels.title, services.len());
        for service in services {
            text.push_str(&card_block(&ServiceCard::from_service(service, self.labels)));
        }
        self.emit(text);
    }

    async fn show_detail_panel(&self) {}

    async fn render_service_detail(&self, id: &ServiceId, detail: &RatioDetail) {
        let text = format!("-- {} [{id}] --\n{}\n", self.labels.detail_title, detail.pretty());
        self.emit(text);
    }

    async fn render_connection_status(&self, status: ConnectionStatus, at: DateTime<Local>) {
        let text = format!(
            "{} | {}: {}\n",
            self.labels.connection(status),
            self.labels.last_update_prefix,
            at.format("%H:%M:%S")
        );
        self.emit(text);
    }
}
