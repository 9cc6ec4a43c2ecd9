use std::sync::Arc;
use std::time::{Duration, Instant};

use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use maud::html;

use crate::facts::FactRotation;
use crate::fetch::{Completion, Orchestrator, RequestToken, Sequencer};
use crate::gallery::{Activation, Gallery, GalleryRenderer};
use crate::modal::{CloseReason, ModalPresenter};
use crate::surface::{Bindings, Document, Key, Surface};

pub struct Options {
    pub bindings: Bindings,
    pub orchestrator: Arc<Orchestrator>,
    pub max_cards: usize,
}

/// Page state owned by the main task. Fetch workers report back through a
/// channel that only this model drains.
pub struct Model {
    bindings: Bindings,
    document: Document,
    renderer: GalleryRenderer,
    modal: ModalPresenter,
    gallery: Gallery,
    orchestrator: Arc<Orchestrator>,
    sequencer: Sequencer,
    completions_tx: Sender<Completion>,
    completions_rx: Receiver<Completion>,
    facts: FactRotation,
    loading: bool,
}

impl Model {
    pub fn new(options: Options) -> Self {
        let (completions_tx, completions_rx) = unbounded();
        let renderer = GalleryRenderer::new(&options.bindings, options.max_cards);
        let mut model = Self {
            bindings: options.bindings,
            document: Document::new(),
            renderer,
            modal: ModalPresenter::new(&options.bindings),
            gallery: Gallery::default(),
            orchestrator: options.orchestrator,
            sequencer: Sequencer::default(),
            completions_tx,
            completions_rx,
            facts: FactRotation::new(),
            loading: false,
        };
        model.gallery = model.renderer.render(&mut model.document, &[]);
        model.modal.reset(&mut model.document);
        model.show_next_fact();
        model
    }

    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn gallery(&self) -> &Gallery {
        &self.gallery
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn modal_open(&self) -> bool {
        self.modal.is_open()
    }

    pub fn trigger_fetch(&mut self) -> RequestToken {
        self.renderer.render_loading(&mut self.document);
        self.loading = true;
        self.show_next_fact();
        let token = self.sequencer.issue();
        self.orchestrator
            .spawn(token, Instant::now(), self.completions_tx.clone());
        token
    }

    pub fn poll_completions(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(completion) = self.completions_rx.try_recv() {
            self.apply(completion);
            applied += 1;
        }
        applied
    }

    pub fn wait_for_completion(&mut self, timeout: Duration) -> bool {
        match self.completions_rx.recv_timeout(timeout) {
            Ok(completion) => {
                self.apply(completion);
                true
            }
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => false,
        }
    }

    pub fn apply(&mut self, completion: Completion) {
        let Completion {
            token,
            outcome,
            elapsed,
        } = completion;

        if !self.sequencer.is_current(token) {
            tracing::debug!(token = token.value(), "discarding superseded fetch");
            return;
        }
        self.loading = false;

        match outcome {
            Ok(records) => {
                tracing::info!(
                    token = token.value(),
                    records = records.len(),
                    elapsed_ms = elapsed.as_millis() as u64,
                    "dataset loaded"
                );
                self.gallery = self.renderer.render(&mut self.document, &records);
            }
            Err(err) => {
                tracing::error!(token = token.value(), error = %err, "failed to load dataset");
                self.renderer.render_error(&mut self.document, &err.to_string());
                self.gallery = Gallery::default();
            }
        }
    }

    pub fn activate_card(&mut self, index: usize, activation: Activation) -> bool {
        match self.gallery.activate(index, activation) {
            Some(entry) => {
                self.modal.open(&mut self.document, entry);
                true
            }
            None => false,
        }
    }

    pub fn close_modal(&mut self, reason: CloseReason) -> bool {
        self.modal.close(&mut self.document, reason)
    }

    pub fn key(&mut self, key: Key) -> bool {
        self.modal.handle_key(&mut self.document, key)
    }

    fn show_next_fact(&mut self) {
        if let Some(region) = self.bindings.fact {
            let fact = self.facts.next_fact();
            self.document.replace(
                region,
                html! {
                    p.fact-label { "Did you know?" }
                    p.fact-text { (fact) }
                },
            );
        }
    }
}
