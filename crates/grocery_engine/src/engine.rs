use std::sync::{mpsc, Arc};
use std::thread;

use grocery_core::Ingredient;
use grocery_logging::grocery_error;
use tokio_util::sync::CancellationToken;

use crate::{FetchRequest, ImportError, RecipeImporter};

struct ImportCommand {
    request: FetchRequest,
    cancel: CancellationToken,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ImportEvent {
    Completed {
        request: FetchRequest,
        result: Result<Vec<Ingredient>, ImportError>,
    },
}

/// Runs recipe imports on a background runtime for hosts without one.
///
/// Results are polled with [`ImportHandle::try_recv`] and handed to
/// [`crate::GrocerySession::apply_import`].
pub struct ImportHandle {
    cmd_tx: mpsc::Sender<ImportCommand>,
    event_rx: mpsc::Receiver<ImportEvent>,
}

impl ImportHandle {
    pub fn new(importer: RecipeImporter) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel::<ImportCommand>();
        let (event_tx, event_rx) = mpsc::channel();
        let importer = Arc::new(importer);

        thread::spawn(move || {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(err) => {
                    grocery_error!("Failed to start import runtime: {}", err);
                    return;
                }
            };
            while let Ok(command) = cmd_rx.recv() {
                let importer = importer.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    let ImportCommand { request, cancel } = command;
                    let result = importer.import(&request.url, &cancel).await;
                    let _ = event_tx.send(ImportEvent::Completed { request, result });
                });
            }
        });

        Self { cmd_tx, event_rx }
    }

    /// Queues an import. Cancelling the returned token aborts it.
    pub fn enqueue(&self, request: FetchRequest) -> CancellationToken {
        let cancel = CancellationToken::new();
        let _ = self.cmd_tx.send(ImportCommand {
            request,
            cancel: cancel.clone(),
        });
        cancel
    }

    pub fn try_recv(&self) -> Option<ImportEvent> {
        self.event_rx.try_recv().ok()
    }
}
