use crate::client::OltApi;
use crate::loading::LoadingIndicator;
use crate::models::{OnuCommand, SearchRequest};
use crate::notice::{self, NoticeBoard};
use crate::results::{RenderOutcome, ResultList};
use chrono::{DateTime, Local};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{error, info, warn};

/// How a search invocation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    Aborted,
    Rendered(usize),
    ErrorShown,
    NetworkFailed,
}

/// How an unlock or reboot invocation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Aborted,
    Succeeded,
    Rejected,
    NetworkFailed,
}

/// Shared UI state the controllers write to.
#[derive(Debug, Clone)]
pub struct ConsoleState {
    pub loading: LoadingIndicator,
    pub results: ResultList,
    pub notices: NoticeBoard,
    last_search: Arc<Mutex<Option<DateTime<Local>>>>,
}

impl ConsoleState {
    pub fn new() -> Self {
        Self {
            loading: LoadingIndicator::new(),
            results: ResultList::new(),
            notices: NoticeBoard::new(),
            last_search: Arc::new(Mutex::new(None)),
        }
    }

    /// When the last search that passed validation was issued.
    pub fn last_search(&self) -> Option<DateTime<Local>> {
        *self.last_search.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn mark_search(&self) {
        *self.last_search.lock().unwrap_or_else(PoisonError::into_inner) = Some(Local::now());
    }
}

pub struct StatusQueryController<A: OltApi> {
    api: Arc<A>,
    state: ConsoleState,
}

impl<A: OltApi> StatusQueryController<A> {
    pub fn new(api: Arc<A>, state: ConsoleState) -> Self {
        Self { api, state }
    }

    pub async fn handle_search(&self, olt: Option<&str>, client_name: &str) -> SearchOutcome {
        let Some(olt) = olt.filter(|o| !o.is_empty()) else {
            self.state.notices.error(notice::SELECT_OLT);
            return SearchOutcome::Aborted;
        };
        let cliente = client_name.trim();
        if cliente.is_empty() {
            self.state.notices.error(notice::ENTER_CLIENT);
            return SearchOutcome::Aborted;
        }

        let request = SearchRequest {
            olt: olt.to_string(),
            cliente: cliente.to_string(),
        };

        self.state.mark_search();
        let _loading = self.state.loading.acquire();
        info!("Querying ONUs of '{}' on OLT {}", request.cliente, request.olt);

        match self.api.query_status(&request).await {
            Ok(outcome) => match self.state.results.apply(&outcome) {
                RenderOutcome::Rendered(count) => {
                    info!("Rendered {} ONU card(s)", count);
                    SearchOutcome::Rendered(count)
                }
                RenderOutcome::Empty => {
                    warn!("No ONU found for '{}'", request.cliente);
                    self.state.notices.error(notice::INVALID_CLIENT);
                    SearchOutcome::ErrorShown
                }
            },
            Err(e) => {
                error!("Status query failed: {}", e);
                self.state.notices.error(notice::QUERY_FAILED);
                SearchOutcome::NetworkFailed
            }
        }
    }
}

pub struct OnuCommandController<A: OltApi> {
    api: Arc<A>,
    state: ConsoleState,
}

impl<A: OltApi> OnuCommandController<A> {
    pub fn new(api: Arc<A>, state: ConsoleState) -> Self {
        Self { api, state }
    }

    pub async fn handle_unlock(&self) -> CommandOutcome {
        self.run(OnuCommand::Unlock).await
    }

    pub async fn handle_reboot(&self) -> CommandOutcome {
        self.run(OnuCommand::Reboot).await
    }

    async fn run(&self, command: OnuCommand) -> CommandOutcome {
        // Selection is read now, not when the card was clicked
        let Some(key) = self.state.results.selected_key() else {
            self.state.notices.error(notice::SELECT_ONU);
            return CommandOutcome::Aborted;
        };

        let _loading = self.state.loading.acquire();
        info!("Sending {} for ONU {}", command.as_str(), key);

        match self.api.send_command(command, &key).await {
            Ok(result) if result.is_ok() => {
                info!("{} of ONU {} succeeded", command.as_str(), key);
                self.state.notices.info(command.success_text());
                CommandOutcome::Succeeded
            }
            Ok(result) => {
                let message = result.mensagem.unwrap_or_default();
                warn!("{} of ONU {} rejected: {}", command.as_str(), key, message);
                self.state.notices.error(format!("Erro: {}", message));
                CommandOutcome::Rejected
            }
            Err(e) => {
                error!("{} request for ONU {} failed: {}", command.as_str(), key, e);
                self.state.notices.error(notice::COMMAND_FAILED);
                CommandOutcome::NetworkFailed
            }
        }
    }
}
