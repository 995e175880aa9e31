use crate::card::OnuCard;
use crate::client::HttpOltClient;
use crate::config::OltEntry;
use crate::controller::{ConsoleState, OnuCommandController, StatusQueryController};
use crate::models::StatusClass;
use crate::notice::NoticeKind;
use eframe::egui;
use std::sync::Arc;
use std::time::Duration;

pub struct OnuConsoleApp {
    state: ConsoleState,
    search: Arc<StatusQueryController<HttpOltClient>>,
    commands: Arc<OnuCommandController<HttpOltClient>>,
    olts: Vec<OltEntry>,
    selected_olt: Option<String>,
    client_name: String,
}

impl OnuConsoleApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        api: Arc<HttpOltClient>,
        olts: Vec<OltEntry>,
    ) -> Self {
        let state = ConsoleState::new();

        Self {
            search: Arc::new(StatusQueryController::new(api.clone(), state.clone())),
            commands: Arc::new(OnuCommandController::new(api, state.clone())),
            state,
            olts,
            selected_olt: None,
            client_name: String::new(),
        }
    }

    fn trigger_search(&self) {
        let search = Arc::clone(&self.search);
        let olt = self.selected_olt.clone();
        let client_name = self.client_name.clone();

        tokio::spawn(async move {
            search.handle_search(olt.as_deref(), &client_name).await;
        });
    }

    fn trigger_unlock(&self) {
        let commands = Arc::clone(&self.commands);
        tokio::spawn(async move {
            commands.handle_unlock().await;
        });
    }

    fn trigger_reboot(&self) {
        let commands = Arc::clone(&self.commands);
        tokio::spawn(async move {
            commands.handle_reboot().await;
        });
    }

    fn render_header(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.add_space(10.0);

            ui.heading("🖧 OLT Console");
            ui.add_space(20.0);
            ui.label("Status e liberação de ONUs");

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.add_space(10.0);
                if let Some(at) = self.state.last_search() {
                    ui.label(
                        egui::RichText::new(format!("Última busca: {}", at.format("%H:%M:%S")))
                            .color(egui::Color32::from_rgb(100, 100, 100)),
                    );
                }
            });
        });

        ui.add_space(5.0);
        ui.separator();
    }

    fn render_search_form(&mut self, ui: &mut egui::Ui) {
        egui::Frame::none()
            .fill(egui::Color32::from_rgb(240, 240, 240))
            .stroke(egui::Stroke::new(1.0, egui::Color32::from_rgb(200, 200, 200)))
            .inner_margin(15.0)
            .show(ui, |ui| {
                ui.label(egui::RichText::new("OLT").strong());
                ui.horizontal_wrapped(|ui| {
                    if self.olts.is_empty() {
                        ui.colored_label(
                            egui::Color32::from_rgb(200, 50, 50),
                            "Nenhuma OLT configurada",
                        );
                    }
                    for olt in &self.olts {
                        ui.radio_value(&mut self.selected_olt, Some(olt.ip.clone()), olt.name.as_str());
                    }
                });

                ui.add_space(10.0);
                ui.label(egui::RichText::new("Cliente").strong());
                ui.add(
                    egui::TextEdit::singleline(&mut self.client_name)
                        .hint_text("Nome do cliente")
                        .desired_width(340.0),
                );

                ui.add_space(10.0);
                let busy = self.state.loading.is_visible();
                if ui
                    .add_sized(
                        [140.0, 35.0],
                        egui::Button::new(
                            egui::RichText::new("🔍 Pesquisar").color(egui::Color32::WHITE),
                        )
                        .fill(egui::Color32::from_rgb(0, 120, 215)),
                    )
                    .clicked()
                    && !busy
                {
                    self.trigger_search();
                }
            });
    }

    fn render_results(&mut self, ctx: &egui::Context) {
        let mut unlock = false;
        let mut reboot = false;
        let mut close = false;

        {
            let mut view = self.state.results.lock();
            if !view.overlay_open {
                return;
            }

            let mut selected = view.selected;
            egui::Window::new(format!("ONUs encontradas ({})", view.cards.len()))
                .id(egui::Id::new("results_overlay"))
                .collapsible(false)
                .resizable(true)
                .default_width(420.0)
                .show(ctx, |ui| {
                    egui::ScrollArea::vertical()
                        .max_height(420.0)
                        .show(ui, |ui| {
                            for (idx, card) in view.cards.iter().enumerate() {
                                render_card(ui, card, idx, &mut selected);
                                ui.add_space(4.0);
                            }
                        });

                    ui.separator();
                    ui.horizontal(|ui| {
                        if ui
                            .add_sized(
                                [150.0, 35.0],
                                egui::Button::new(
                                    egui::RichText::new("🔓 Liberar ONU")
                                        .color(egui::Color32::WHITE),
                                )
                                .fill(egui::Color32::from_rgb(50, 150, 50)),
                            )
                            .clicked()
                        {
                            unlock = true;
                        }

                        if ui
                            .add_sized(
                                [150.0, 35.0],
                                egui::Button::new(
                                    egui::RichText::new("⟳ Reboot ONU").color(egui::Color32::WHITE),
                                )
                                .fill(egui::Color32::from_rgb(200, 120, 30)),
                            )
                            .clicked()
                        {
                            reboot = true;
                        }

                        if ui
                            .add_sized(
                                [100.0, 35.0],
                                egui::Button::new(
                                    egui::RichText::new("✖ Fechar").color(egui::Color32::BLACK),
                                )
                                .fill(egui::Color32::from_rgb(230, 230, 230)),
                            )
                            .clicked()
                        {
                            close = true;
                        }
                    });
                });

            if let Some(idx) = selected {
                view.select(idx);
            }
        }

        if close {
            self.state.results.close_overlay();
        }
        if unlock {
            self.trigger_unlock();
        }
        if reboot {
            self.trigger_reboot();
        }
    }

    fn render_notice(&self, ctx: &egui::Context) {
        let Some(notice) = self.state.notices.current() else {
            return;
        };

        let (title, color) = match notice.kind {
            NoticeKind::Info => ("Aviso", egui::Color32::from_rgb(50, 150, 50)),
            NoticeKind::Error => ("Erro", egui::Color32::from_rgb(200, 50, 50)),
        };

        egui::Window::new(title)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.colored_label(color, notice.text.as_str());
                ui.label(
                    egui::RichText::new(notice.at.format("%H:%M:%S").to_string())
                        .size(10.0)
                        .color(egui::Color32::from_rgb(150, 150, 150)),
                );
                let waiting = self.state.notices.pending().len().saturating_sub(1);
                if waiting > 0 {
                    ui.label(format!("+{} aviso(s) pendente(s)", waiting));
                }
                ui.add_space(8.0);
                if ui.button("OK").clicked() {
                    self.state.notices.dismiss();
                }
            });
    }

    fn render_loading(&self, ctx: &egui::Context) {
        if !self.state.loading.is_visible() {
            return;
        }

        egui::Window::new("loading")
            .title_bar(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.add(egui::Spinner::new());
                    ui.label("Consultando a OLT...");
                });
            });
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EnterAction {
    DismissNotice,
    Search,
    Ignore,
}

// Enter acknowledges a pending notice first, otherwise searches from anywhere
fn enter_action(notice_pending: bool, busy: bool) -> EnterAction {
    if notice_pending {
        EnterAction::DismissNotice
    } else if busy {
        EnterAction::Ignore
    } else {
        EnterAction::Search
    }
}

fn status_color(status: StatusClass) -> egui::Color32 {
    match status {
        StatusClass::Online => egui::Color32::from_rgb(50, 150, 50),
        StatusClass::Offline => egui::Color32::from_rgb(200, 50, 50),
        StatusClass::Other => egui::Color32::from_rgb(150, 150, 150),
    }
}

// Field values go through RichText, never markup
fn render_card(ui: &mut egui::Ui, card: &OnuCard, idx: usize, selected: &mut Option<usize>) {
    let color = status_color(card.status);
    let stroke_width = if *selected == Some(idx) { 2.5 } else { 1.0 };

    egui::Frame::none()
        .fill(egui::Color32::from_rgb(250, 250, 250))
        .stroke(egui::Stroke::new(stroke_width, color))
        .inner_margin(10.0)
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.radio_value(selected, Some(idx), "")
                    .on_hover_text(card.status.as_str());
                ui.vertical(|ui| {
                    ui.label(egui::RichText::new(&card.title).strong().color(color));
                    for field in &card.fields {
                        ui.horizontal(|ui| {
                            ui.label(egui::RichText::new(format!("{}:", field.label)).strong());
                            ui.label(field.value.as_str());
                        });
                    }
                });
            });
        });
}

impl eframe::App for OnuConsoleApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if ctx.input(|i| i.key_pressed(egui::Key::Enter)) {
            let pending = self.state.notices.current().is_some();
            match enter_action(pending, self.state.loading.is_visible()) {
                EnterAction::DismissNotice => self.state.notices.dismiss(),
                EnterAction::Search => self.trigger_search(),
                EnterAction::Ignore => {}
            }
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_space(10.0);

            self.render_header(ui);
            ui.add_space(15.0);

            self.render_search_form(ui);
        });

        self.render_results(ctx);
        self.render_loading(ctx);
        self.render_notice(ctx);

        // Request repaint so background results show up
        ctx.request_repaint_after(Duration::from_millis(100));
    }
}
