use chrono::{DateTime, Local};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

pub const SELECT_OLT: &str = "Selecione uma OLT!";
pub const ENTER_CLIENT: &str = "Digite o nome do cliente!";
pub const SELECT_ONU: &str = "Selecione uma ONU!";
pub const INVALID_CLIENT: &str = "Erro: Informe um cliente válido!";
pub const QUERY_FAILED: &str = "Erro ao buscar o status da ONU!";
pub const COMMAND_FAILED: &str = "Erro ao enviar o comando para a ONU!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

/// A message the operator has to acknowledge.
#[derive(Debug, Clone)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
    pub at: DateTime<Local>,
}

/// FIFO of pending operator notices; the UI shows the front one as a modal.
#[derive(Debug, Clone, Default)]
pub struct NoticeBoard {
    queue: Arc<Mutex<VecDeque<Notice>>>,
}

impl NoticeBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn info(&self, text: impl Into<String>) {
        self.push(NoticeKind::Info, text.into());
    }

    pub fn error(&self, text: impl Into<String>) {
        self.push(NoticeKind::Error, text.into());
    }

    pub fn current(&self) -> Option<Notice> {
        self.lock().front().cloned()
    }

    pub fn dismiss(&self) {
        self.lock().pop_front();
    }

    pub fn pending(&self) -> Vec<Notice> {
        self.lock().iter().cloned().collect()
    }

    fn push(&self, kind: NoticeKind, text: String) {
        self.lock().push_back(Notice {
            kind,
            text,
            at: Local::now(),
        });
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<Notice>> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
