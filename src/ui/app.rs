use std::collections::BTreeMap;
use std::sync::mpsc::{channel, Receiver, Sender};

use eframe::egui;
use egui::{Color32, RichText};

use super::views::{self, GridResponse};
use crate::api::{ScheduleInfo, StoreClient, StoreError};
use crate::config::Config;
use crate::grid::{
    parse_keys, Consensus, EditMode, GridState, Slot, SyncPhase, SyncState, SLOT_COUNT,
};

pub struct HuddleApp {
    config: Config,
    state: AppState,

    // Data for the mounted schedule view - replaced wholesale on fetch
    grid: GridState,
    info: Option<ScheduleInfo>,
    slot_counts: BTreeMap<Slot, u32>,
    consensus: Consensus,

    // Save lifecycle, one machine per editable set
    selection_sync: SyncState,
    blackout_sync: SyncState,

    // Settings dialog
    show_settings: bool,
    settings_server: String,
    settings_schedule: String,
    settings_user: String,
    settings_display_name: String,
    settings_owner_key: String,
    settings_read_only: bool,
    settings_font_scale: f32,

    // Name capture dialog
    show_name_prompt: bool,
    name_input: String,
    name_saving: bool,

    // Status
    status_message: Option<(String, bool)>, // (message, is_error)
    loading: bool,
    save_in_flight: bool,
    is_offline: bool,
    fatal_error: Option<String>,

    // Async communication
    runtime: tokio::runtime::Runtime,
    result_rx: Receiver<AsyncResult>,
    result_tx: Sender<AsyncResult>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum AppState {
    Setup,
    Main,
}

enum AsyncResult {
    ScheduleLoaded(ScheduleInfo, Vec<String>, Option<Vec<String>>), // (info, selections, owner blackouts)
    InfoRefreshed(ScheduleInfo),
    SelectionsSaved,
    BlackoutsSaved,
    NameSaved(String),
    NameRequired,
    SaveFailed(String),
    Fatal(String),
    Error(String),
    Offline,
}

impl HuddleApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let config = Config::load().unwrap_or_default();
        super::setup_fonts(&cc.egui_ctx);
        super::setup_theme(&cc.egui_ctx);
        let state = if config.is_configured() {
            AppState::Main
        } else {
            AppState::Setup
        };

        let runtime = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
        let (result_tx, result_rx) = channel();

        let mut app = Self {
            show_settings: false,
            settings_server: config.server_url.clone(),
            settings_schedule: config.schedule_id.clone(),
            settings_user: config.user_id.clone(),
            settings_display_name: config.display_name.clone().unwrap_or_default(),
            settings_owner_key: config.owner_key.clone().unwrap_or_default(),
            settings_read_only: config.read_only,
            settings_font_scale: config.font_scale,
            config,
            state,
            grid: GridState::new(),
            info: None,
            slot_counts: BTreeMap::new(),
            consensus: Consensus::default(),
            selection_sync: SyncState::default(),
            blackout_sync: SyncState::default(),
            show_name_prompt: false,
            name_input: String::new(),
            name_saving: false,
            status_message: None,
            loading: false,
            save_in_flight: false,
            is_offline: false,
            fatal_error: None,
            runtime,
            result_rx,
            result_tx,
        };

        if state == AppState::Main {
            app.refresh_data();
        }

        app
    }

    fn check_async_results(&mut self) {
        while let Ok(result) = self.result_rx.try_recv() {
            match result {
                AsyncResult::ScheduleLoaded(info, selections, owner_blackouts) => {
                    self.loading = false;
                    self.is_offline = false;
                    self.fatal_error = None;
                    self.status_message = None;
                    // Fresh view state: the fetched snapshot replaces
                    // everything, including edits that were never saved.
                    self.grid = GridState::new();
                    self.apply_info(info);
                    if let Some(keys) = owner_blackouts {
                        self.grid.load_blackouts(parse_keys(&keys));
                    }
                    self.grid.load_selections(parse_keys(&selections));
                    self.selection_sync.reset();
                    self.blackout_sync.reset();
                }
                AsyncResult::InfoRefreshed(info) => {
                    self.apply_info(info);
                }
                AsyncResult::SelectionsSaved => {
                    self.save_in_flight = false;
                    self.selection_sync.finish_save(true);
                    self.status_message = Some(("Saved".to_string(), false));
                    self.refresh_info();
                }
                AsyncResult::BlackoutsSaved => {
                    self.save_in_flight = false;
                    self.blackout_sync.finish_save(true);
                    self.status_message = Some(("Blackouts saved".to_string(), false));
                    self.refresh_info();
                }
                AsyncResult::NameSaved(name) => {
                    self.name_saving = false;
                    self.show_name_prompt = false;
                    self.config.display_name = Some(name);
                    if let Err(err) = self.config.save() {
                        log::warn!("Failed to persist display name: {}", err);
                    }
                    self.status_message =
                        Some(("Display name saved - save again to publish".to_string(), false));
                }
                AsyncResult::NameRequired => {
                    self.save_in_flight = false;
                    self.selection_sync.finish_save(false);
                    self.name_input = self.config.display_name.clone().unwrap_or_default();
                    self.show_name_prompt = true;
                    self.status_message =
                        Some(("The server wants a display name first".to_string(), true));
                }
                AsyncResult::SaveFailed(msg) => {
                    self.save_in_flight = false;
                    // Only the in-flight machine is in Saving; the other
                    // call is a no-op.
                    self.selection_sync.finish_save(false);
                    self.blackout_sync.finish_save(false);
                    self.status_message = Some((msg, true));
                }
                AsyncResult::Fatal(msg) => {
                    self.loading = false;
                    self.save_in_flight = false;
                    self.name_saving = false;
                    self.fatal_error = Some(msg);
                }
                AsyncResult::Error(msg) => {
                    self.loading = false;
                    self.name_saving = false;
                    self.is_offline = false;
                    self.status_message = Some((msg, true));
                }
                AsyncResult::Offline => {
                    self.loading = false;
                    self.is_offline = true;
                    self.status_message = None;
                }
            }
        }
    }

    /// Swap in a fresh aggregate snapshot: counts, rank ladder, owner
    /// capability, and (when not mid-edit) the blackout layer. The local
    /// selection set is left alone.
    fn apply_info(&mut self, info: ScheduleInfo) {
        self.slot_counts = info.slot_counts();
        self.consensus = Consensus::new(&self.slot_counts, info.count);
        if let Some(keys) = &info.blackouts {
            if self.blackout_sync.phase() == SyncPhase::Clean {
                self.grid.load_blackouts(parse_keys(keys));
            }
        }
        let mode = if info.is_owner && !self.config.read_only {
            EditMode::Blackout
        } else {
            EditMode::Selection
        };
        self.grid.set_mode(mode);
        self.info = Some(info);
    }

    fn refresh_data(&mut self) {
        if self.loading {
            return;
        }
        self.loading = true;
        self.status_message = None;
        log::info!("Loading schedule {}", self.config.schedule_id);

        let config = self.config.clone();
        let tx = self.result_tx.clone();

        self.runtime.spawn(async move {
            let result = async {
                let client = StoreClient::new(&config)?;
                let info = client.fetch_info().await?;
                let selections = client.fetch_selections().await?;
                // Owners edit the authoritative blackout set, so fetch it
                // directly rather than trusting the info snapshot.
                let blackouts = if info.is_owner {
                    Some(client.fetch_blackouts().await?)
                } else {
                    None
                };
                Ok::<_, StoreError>((info, selections, blackouts))
            }
            .await;

            match result {
                Ok((info, selections, blackouts)) => {
                    let _ = tx.send(AsyncResult::ScheduleLoaded(info, selections, blackouts));
                }
                Err(err) if err.is_fatal() => {
                    let _ = tx.send(AsyncResult::Fatal(err.to_string()));
                }
                Err(err) if err.is_offline() => {
                    let _ = tx.send(AsyncResult::Offline);
                }
                Err(StoreError::Malformed(detail)) => {
                    log::warn!("Schedule load returned malformed response: {}", detail);
                    let _ = tx.send(AsyncResult::Error(
                        "Load failed: unexpected response from the server".to_string(),
                    ));
                }
                Err(err) => {
                    let _ = tx.send(AsyncResult::Error(format!("Load failed: {}", err)));
                }
            }
        });
    }

    /// Re-fetch only the aggregate info (after a successful save). Local
    /// edits made during the request are preserved.
    fn refresh_info(&mut self) {
        let config = self.config.clone();
        let tx = self.result_tx.clone();

        self.runtime.spawn(async move {
            let result = async {
                let client = StoreClient::new(&config)?;
                client.fetch_info().await
            }
            .await;

            match result {
                Ok(info) => {
                    let _ = tx.send(AsyncResult::InfoRefreshed(info));
                }
                Err(err) if err.is_fatal() => {
                    let _ = tx.send(AsyncResult::Fatal(err.to_string()));
                }
                Err(StoreError::Malformed(detail)) => {
                    log::warn!("Info refresh returned malformed response: {}", detail);
                    let _ = tx.send(AsyncResult::Error(
                        "Refresh failed: unexpected response from the server".to_string(),
                    ));
                }
                Err(err) => {
                    let _ = tx.send(AsyncResult::Error(format!("Refresh failed: {}", err)));
                }
            }
        });
    }

    fn apply_grid_response(&mut self, response: GridResponse) {
        if self.config.read_only {
            return;
        }
        let mut changed = false;
        if let Some(slot) = response.toggled_slot {
            changed |= self.grid.toggle(slot);
        }
        if let Some(day) = response.toggled_day {
            changed |= self.grid.toggle_column(day);
        }
        if let Some(hour) = response.toggled_hour {
            changed |= self.grid.toggle_row(hour);
        }
        if let Some(from) = response.copy_from {
            changed |= self.grid.copy_column(from);
        }
        if changed {
            match self.grid.mode() {
                EditMode::Selection => self.selection_sync.mark_dirty(),
                EditMode::Blackout => self.blackout_sync.mark_dirty(),
            }
        }
    }

    fn save_changes(&mut self) {
        if self.config.read_only || self.save_in_flight {
            return;
        }
        match self.grid.mode() {
            EditMode::Selection => self.save_selections(),
            EditMode::Blackout => self.save_blackouts(),
        }
    }

    fn save_selections(&mut self) {
        // The store lists participants by display name; capture one before
        // the first save instead of letting the server bounce it.
        if !self.config.has_display_name() {
            self.name_input = self.config.display_name.clone().unwrap_or_default();
            self.show_name_prompt = true;
            self.status_message =
                Some(("A display name is required before saving".to_string(), true));
            return;
        }
        if !self.selection_sync.begin_save() {
            return;
        }
        self.save_in_flight = true;
        self.status_message = None;

        let config = self.config.clone();
        let keys = self.grid.active_keys();
        let tx = self.result_tx.clone();

        self.runtime.spawn(async move {
            let result = async {
                let client = StoreClient::new(&config)?;
                client.save_selections(&keys).await
            }
            .await;

            match result {
                Ok(()) => {
                    let _ = tx.send(AsyncResult::SelectionsSaved);
                }
                Err(StoreError::NameRequired) => {
                    let _ = tx.send(AsyncResult::NameRequired);
                }
                Err(err) if err.is_fatal() => {
                    let _ = tx.send(AsyncResult::Fatal(err.to_string()));
                }
                Err(StoreError::Malformed(detail)) => {
                    log::warn!("Save returned malformed response: {}", detail);
                    let _ = tx.send(AsyncResult::SaveFailed(
                        "Save failed: unexpected response from the server".to_string(),
                    ));
                }
                Err(err) => {
                    let _ = tx.send(AsyncResult::SaveFailed(format!("Save failed: {}", err)));
                }
            }
        });
    }

    fn save_blackouts(&mut self) {
        if !self.blackout_sync.begin_save() {
            return;
        }
        self.save_in_flight = true;
        self.status_message = None;

        let config = self.config.clone();
        let keys = self.grid.active_keys();
        let tx = self.result_tx.clone();

        self.runtime.spawn(async move {
            let result = async {
                let client = StoreClient::new(&config)?;
                client.save_blackouts(&keys).await
            }
            .await;

            match result {
                Ok(()) => {
                    let _ = tx.send(AsyncResult::BlackoutsSaved);
                }
                Err(err) if err.is_fatal() => {
                    let _ = tx.send(AsyncResult::Fatal(err.to_string()));
                }
                Err(StoreError::Malformed(detail)) => {
                    log::warn!("Blackout save returned malformed response: {}", detail);
                    let _ = tx.send(AsyncResult::SaveFailed(
                        "Save failed: unexpected response from the server".to_string(),
                    ));
                }
                Err(err) => {
                    let _ = tx.send(AsyncResult::SaveFailed(format!("Save failed: {}", err)));
                }
            }
        });
    }

    fn submit_name(&mut self) {
        let name = self.name_input.trim().to_string();
        if name.is_empty() {
            self.status_message = Some(("Display name cannot be empty".to_string(), true));
            return;
        }
        if self.name_saving {
            return;
        }
        self.name_saving = true;

        let config = self.config.clone();
        let tx = self.result_tx.clone();

        self.runtime.spawn(async move {
            let result = async {
                let client = StoreClient::new(&config)?;
                client.set_name(&name).await?;
                Ok::<_, StoreError>(name)
            }
            .await;

            match result {
                Ok(name) => {
                    let _ = tx.send(AsyncResult::NameSaved(name));
                }
                Err(err) if err.is_fatal() => {
                    let _ = tx.send(AsyncResult::Fatal(err.to_string()));
                }
                Err(err) => {
                    let _ = tx.send(AsyncResult::Error(format!("Name save failed: {}", err)));
                }
            }
        });
    }

    fn save_settings(&mut self) {
        let new_server = self.settings_server.trim().to_string();
        let new_schedule = self.settings_schedule.trim().to_string();
        let new_user = self.settings_user.trim().to_string();
        let new_owner_key = match self.settings_owner_key.trim() {
            "" => None,
            key => Some(key.to_string()),
        };

        let identity_changed = self.config.server_url != new_server
            || self.config.schedule_id != new_schedule
            || self.config.user_id != new_user
            || self.config.owner_key != new_owner_key
            || self.config.read_only != self.settings_read_only;

        self.config.server_url = new_server;
        self.config.schedule_id = new_schedule;
        self.config.user_id = new_user;
        self.config.owner_key = new_owner_key;
        self.config.read_only = self.settings_read_only;
        self.config.font_scale = self.settings_font_scale;
        self.config.display_name = match self.settings_display_name.trim() {
            "" => None,
            name => Some(name.to_string()),
        };

        match self.config.save() {
            Ok(_) => {
                self.show_settings = false;
                if self.config.is_configured() && self.state == AppState::Setup {
                    self.state = AppState::Main;
                }
                if identity_changed {
                    self.fatal_error = None;
                    self.is_offline = false;
                    self.refresh_data();
                }
            }
            Err(err) => {
                self.status_message = Some((format!("Failed to save: {}", err), true));
            }
        }
    }

    fn open_settings(&mut self) {
        // Reset fields to the current config values
        self.settings_server = self.config.server_url.clone();
        self.settings_schedule = self.config.schedule_id.clone();
        self.settings_user = self.config.user_id.clone();
        self.settings_display_name = self.config.display_name.clone().unwrap_or_default();
        self.settings_owner_key = self.config.owner_key.clone().unwrap_or_default();
        self.settings_read_only = self.config.read_only;
        self.settings_font_scale = self.config.font_scale;
        self.show_settings = true;
    }

    fn render_setup(&mut self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(40.0);
            ui.heading("Huddle setup");
            ui.add_space(20.0);
            ui.label("Point the app at your scheduler and say who you are.");
            ui.add_space(20.0);
        });

        egui::Grid::new("setup_grid")
            .num_columns(2)
            .spacing([20.0, 10.0])
            .show(ui, |ui| {
                ui.label("Server:");
                ui.add(
                    egui::TextEdit::singleline(&mut self.settings_server)
                        .hint_text("sched.example.com")
                        .desired_width(350.0),
                );
                ui.end_row();

                ui.label("Schedule ID:");
                ui.add(
                    egui::TextEdit::singleline(&mut self.settings_schedule)
                        .hint_text("dzEP5I")
                        .desired_width(200.0),
                );
                ui.end_row();

                ui.label("User ID:");
                ui.add(
                    egui::TextEdit::singleline(&mut self.settings_user)
                        .hint_text("your login")
                        .desired_width(200.0),
                );
                ui.end_row();

                ui.label("Display name:");
                ui.add(
                    egui::TextEdit::singleline(&mut self.settings_display_name)
                        .hint_text("Shown to other participants")
                        .desired_width(350.0),
                );
                ui.end_row();

                ui.label("Owner key:");
                ui.add(
                    egui::TextEdit::singleline(&mut self.settings_owner_key)
                        .password(true)
                        .hint_text("Only if you own the schedule")
                        .desired_width(350.0),
                );
                ui.end_row();
            });

        ui.add_space(20.0);

        if views::painted_button(ui, "Save and connect", true) {
            self.save_settings();
        }
    }

    fn render_main(&mut self, ui: &mut egui::Ui) {
        if let Some(message) = self.fatal_error.clone() {
            self.render_fatal(ui, &message);
            return;
        }
        if self.is_offline {
            self.render_offline(ui);
            return;
        }

        self.render_header(ui);
        ui.add_space(4.0);

        let response = views::render_grid(
            ui,
            &self.grid,
            &self.slot_counts,
            &self.consensus,
            self.config.read_only,
        );
        self.apply_grid_response(response);

        ui.add_space(6.0);
        let blackouts_shown =
            !self.grid.blackouts().is_empty() || self.grid.mode() == EditMode::Blackout;
        views::render_legend(ui, blackouts_shown);

        if !self.config.read_only {
            ui.add_space(8.0);
            self.render_save_row(ui);
        }
    }

    fn render_header(&mut self, ui: &mut egui::Ui) {
        let mut reload = false;
        let mut settings = false;
        let mut open_page = false;

        ui.horizontal(|ui| {
            let title = self
                .info
                .as_ref()
                .and_then(|info| info.name.clone())
                .unwrap_or_else(|| self.config.schedule_id.clone());
            ui.label(RichText::new(title).size(16.0).color(Color32::WHITE));

            if let Some(info) = &self.info {
                let participants = format!("{} {}", egui_phosphor::regular::USERS, info.count);
                ui.label(
                    RichText::new(participants)
                        .size(13.0)
                        .color(Color32::from_rgb(150, 150, 144)),
                )
                .on_hover_text(info.users.join(", "));
            }

            if self.grid.mode() == EditMode::Blackout {
                ui.label(
                    RichText::new("editing blackouts")
                        .size(12.0)
                        .color(Color32::from_rgb(224, 108, 117)),
                );
            }

            if self.loading || self.save_in_flight {
                ui.spinner();
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if icon_button(ui, egui_phosphor::regular::FADERS_HORIZONTAL, "Settings") {
                    settings = true;
                }
                ui.add_space(8.0);
                if icon_button(ui, egui_phosphor::regular::ARROWS_CLOCKWISE, "Reload from server")
                {
                    reload = true;
                }
                ui.add_space(8.0);
                if icon_button(ui, egui_phosphor::regular::GLOBE, "Open in browser") {
                    open_page = true;
                }
            });
        });

        if settings {
            self.open_settings();
        }
        if reload {
            self.refresh_data();
        }
        if open_page {
            let _ = open::that(self.config.schedule_page_url());
        }
    }

    fn render_save_row(&mut self, ui: &mut egui::Ui) {
        let sync = match self.grid.mode() {
            EditMode::Selection => &self.selection_sync,
            EditMode::Blackout => &self.blackout_sync,
        };
        let phase = sync.phase();
        let saving = sync.is_saving();
        let enabled = sync.can_save() && !self.save_in_flight;
        let label = match self.grid.mode() {
            EditMode::Selection => "Save times",
            EditMode::Blackout => "Save blackouts",
        };
        let marked = match self.grid.mode() {
            EditMode::Selection => self.grid.selected().len(),
            EditMode::Blackout => self.grid.blackouts().len(),
        };
        let dim = Color32::from_rgb(130, 130, 124);

        let mut save_clicked = false;
        ui.horizontal(|ui| {
            if views::painted_button(ui, label, enabled) {
                save_clicked = true;
            }
            ui.add_space(4.0);
            if saving {
                ui.label(RichText::new("Saving...").size(13.0).color(dim));
            } else {
                match phase {
                    SyncPhase::Clean => {
                        ui.label(RichText::new("All changes saved").size(13.0).color(dim));
                    }
                    SyncPhase::Dirty => {
                        ui.label(
                            RichText::new("Unsaved changes")
                                .size(13.0)
                                .color(Color32::from_rgb(229, 192, 123)),
                        );
                    }
                    SyncPhase::Saving => {}
                }
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(
                    RichText::new(format!("{}/{} marked", marked, SLOT_COUNT))
                        .size(12.0)
                        .color(dim),
                );
            });
        });

        if save_clicked {
            self.save_changes();
        }
    }

    fn render_offline(&mut self, ui: &mut egui::Ui) {
        ui.add_space(40.0);
        ui.vertical_centered(|ui| {
            ui.label(
                RichText::new(egui_phosphor::regular::WIFI_SLASH.to_string())
                    .size(34.0)
                    .color(Color32::from_rgb(224, 108, 117)),
            );
            ui.add_space(16.0);
            ui.label(
                RichText::new("No connection")
                    .size(20.0)
                    .color(Color32::from_rgb(200, 200, 210)),
            );
            ui.add_space(8.0);
            ui.label(
                RichText::new("Check your internet and try again")
                    .size(14.0)
                    .color(Color32::from_rgb(120, 120, 140)),
            );
            ui.add_space(24.0);
            let blue = Color32::from_rgb(0x13, 0x98, 0xf4);
            if ui
                .add(
                    egui::Button::new(
                        RichText::new(format!(
                            "{} Retry",
                            egui_phosphor::regular::ARROWS_CLOCKWISE
                        ))
                        .size(17.0)
                        .color(Color32::WHITE),
                    )
                    .fill(blue)
                    .rounding(6.0),
                )
                .clicked()
            {
                self.is_offline = false;
                self.refresh_data();
            }
        });
    }

    /// Blocking panel for a schedule that cannot be opened at all.
    fn render_fatal(&mut self, ui: &mut egui::Ui, message: &str) {
        let mut back = false;
        let mut open_page = false;

        ui.add_space(40.0);
        ui.vertical_centered(|ui| {
            ui.label(
                RichText::new(egui_phosphor::regular::WARNING.to_string())
                    .size(34.0)
                    .color(Color32::from_rgb(229, 192, 123)),
            );
            ui.add_space(16.0);
            ui.label(
                RichText::new("Can't open this schedule")
                    .size(20.0)
                    .color(Color32::from_rgb(200, 200, 210)),
            );
            ui.add_space(8.0);
            ui.label(
                RichText::new(message)
                    .size(14.0)
                    .color(Color32::from_rgb(120, 120, 140)),
            );
            ui.add_space(24.0);
            ui.horizontal(|ui| {
                // Center the button pair
                let spacer = (ui.available_width() - 280.0).max(0.0) / 2.0;
                ui.add_space(spacer);
                if views::painted_button(ui, "Back to setup", true) {
                    back = true;
                }
                if views::painted_button(ui, "Open in browser", true) {
                    open_page = true;
                }
            });
        });

        if back {
            self.fatal_error = None;
            self.state = AppState::Setup;
        }
        if open_page {
            let _ = open::that(self.config.schedule_page_url());
        }
    }

    fn render_name_dialog(&mut self, ctx: &egui::Context) {
        let (content_bg, frame_color, _) = super::theme::dialog_colors();
        let dialog_frame = egui::Frame::none()
            .fill(content_bg)
            .stroke(egui::Stroke::new(2.0, frame_color))
            .rounding(egui::Rounding::same(8.0))
            .inner_margin(egui::Margin::same(20.0));

        let mut submit = false;
        let mut cancel = false;

        egui::Window::new("Display name")
            .collapsible(false)
            .resizable(false)
            .default_width(380.0)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .frame(dialog_frame)
            .show(ctx, |ui| {
                ui.label("Saved times are listed under a display name. Pick one first.");
                ui.add_space(8.0);
                ui.add(
                    egui::TextEdit::singleline(&mut self.name_input)
                        .hint_text("e.g. Mara")
                        .desired_width(300.0),
                );
                ui.add_space(12.0);
                ui.horizontal(|ui| {
                    if views::painted_button(ui, "Save name", !self.name_saving) {
                        submit = true;
                    }
                    if views::painted_button(ui, "Cancel", true) {
                        cancel = true;
                    }
                    if self.name_saving {
                        ui.spinner();
                    }
                });
            });

        if submit {
            self.submit_name();
        }
        if cancel {
            self.show_name_prompt = false;
        }
    }

    fn render_settings_dialog(&mut self, ctx: &egui::Context) {
        let (content_bg, frame_color, _) = super::theme::dialog_colors();
        let dialog_frame = egui::Frame::none()
            .fill(content_bg)
            .stroke(egui::Stroke::new(2.0, frame_color))
            .rounding(egui::Rounding::same(8.0))
            .inner_margin(egui::Margin::same(20.0));

        let mut save = false;
        let mut cancel = false;

        egui::Window::new("Settings")
            .collapsible(false)
            .resizable(false)
            .default_width(560.0)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .frame(dialog_frame)
            .show(ctx, |ui| {
                let section_color = Color32::from_rgb(140, 140, 160);

                ui.label(RichText::new("Schedule").color(section_color).strong());
                ui.add_space(8.0);
                egui::Grid::new("settings_schedule_grid")
                    .num_columns(2)
                    .spacing([20.0, 10.0])
                    .show(ui, |ui| {
                        ui.label("Server");
                        ui.add(
                            egui::TextEdit::singleline(&mut self.settings_server)
                                .hint_text("sched.example.com")
                                .desired_width(350.0),
                        );
                        ui.end_row();

                        ui.label("Schedule ID");
                        ui.add(
                            egui::TextEdit::singleline(&mut self.settings_schedule)
                                .desired_width(200.0),
                        );
                        ui.end_row();

                        ui.label("User ID");
                        ui.add(
                            egui::TextEdit::singleline(&mut self.settings_user)
                                .desired_width(200.0),
                        );
                        ui.end_row();

                        ui.label("Owner key");
                        ui.add(
                            egui::TextEdit::singleline(&mut self.settings_owner_key)
                                .password(true)
                                .hint_text("Leave blank unless you own the schedule")
                                .desired_width(350.0),
                        );
                        ui.end_row();
                    });

                ui.add_space(20.0);

                ui.label(RichText::new("Profile").color(section_color).strong());
                ui.add_space(8.0);
                egui::Grid::new("settings_profile_grid")
                    .num_columns(2)
                    .spacing([20.0, 10.0])
                    .show(ui, |ui| {
                        ui.label("Display name");
                        ui.add(
                            egui::TextEdit::singleline(&mut self.settings_display_name)
                                .hint_text("Shown to other participants")
                                .desired_width(350.0),
                        );
                        ui.end_row();

                        ui.label("Read only");
                        ui.checkbox(&mut self.settings_read_only, "Browse without editing");
                        ui.end_row();
                    });

                ui.add_space(20.0);

                ui.label(RichText::new("Display").color(section_color).strong());
                ui.add_space(8.0);
                egui::Grid::new("settings_display_grid")
                    .num_columns(2)
                    .spacing([20.0, 10.0])
                    .show(ui, |ui| {
                        ui.label("Font scale");
                        ui.horizontal(|ui| {
                            ui.add(
                                egui::Slider::new(&mut self.settings_font_scale, 0.75..=2.0)
                                    .show_value(false),
                            );
                            ui.label(format!("{:.0}%", self.settings_font_scale * 100.0));
                        });
                        ui.end_row();
                    });

                ui.add_space(24.0);

                ui.horizontal(|ui| {
                    if views::painted_button(ui, "Save", true) {
                        save = true;
                    }
                    if views::painted_button(ui, "Cancel", true) {
                        cancel = true;
                    }
                });
            });

        if save {
            self.save_settings();
        }
        if cancel {
            self.show_settings = false;
        }
    }
}

/// Icon-only button, gray with white hover.
fn icon_button(ui: &mut egui::Ui, icon: &str, tooltip: &str) -> bool {
    let text_color = Color32::from_rgb(150, 150, 150);
    let hover_color = Color32::WHITE;
    let font_id = egui::FontId::proportional(18.0);
    let icon_size = ui.fonts(|f| {
        f.layout_no_wrap(icon.to_string(), font_id.clone(), Color32::WHITE)
            .size()
    });
    let (rect, response) =
        ui.allocate_exact_size(icon_size + egui::vec2(8.0, 4.0), egui::Sense::click());
    let color = if response.hovered() {
        hover_color
    } else {
        text_color
    };
    ui.painter()
        .text(rect.center(), egui::Align2::CENTER_CENTER, icon, font_id, color);
    if response.hovered() {
        ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
    }
    response.on_hover_text(tooltip).clicked()
}

impl eframe::App for HuddleApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Handle pinch-to-zoom (trackpad pinch or Ctrl+scroll)
        let zoom_delta = ctx.input(|i| i.zoom_delta());
        if zoom_delta != 1.0 {
            self.config.font_scale = (self.config.font_scale * zoom_delta).clamp(0.75, 2.5);
            if (zoom_delta - 1.0).abs() > 0.01 {
                let _ = self.config.save();
            }
        }
        ctx.set_pixels_per_point(self.config.font_scale);

        self.check_async_results();

        // Keep the frame loop alive while async work is pending
        if self.loading || self.save_in_flight || self.name_saving {
            ctx.request_repaint_after(std::time::Duration::from_millis(150));
        }

        if self.show_name_prompt {
            self.render_name_dialog(ctx);
        }
        if self.show_settings {
            self.render_settings_dialog(ctx);
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::none().inner_margin(egui::Margin::symmetric(12.0, 8.0)))
            .show(ctx, |ui| {
                // Status message - selectable with copy and close buttons
                let mut dismiss_message = false;
                let mut copy_message: Option<String> = None;
                if let Some((msg, is_error)) = &self.status_message {
                    let color = if *is_error {
                        Color32::from_rgb(224, 108, 117)
                    } else {
                        Color32::from_rgb(152, 195, 121)
                    };
                    let dim_color = Color32::from_rgb(120, 120, 130);
                    ui.horizontal(|ui| {
                        ui.add(egui::Label::new(RichText::new(msg).color(color)));

                        ui.add_space(8.0);

                        let copy_btn = ui.add(
                            egui::Label::new(
                                RichText::new(egui_phosphor::regular::COPY)
                                    .size(14.0)
                                    .color(dim_color),
                            )
                            .sense(egui::Sense::click()),
                        );
                        if copy_btn.hovered() {
                            ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
                        }
                        if copy_btn.clicked() {
                            copy_message = Some(msg.clone());
                        }

                        let close_btn = ui.add(
                            egui::Label::new(
                                RichText::new(egui_phosphor::regular::X)
                                    .size(14.0)
                                    .color(dim_color),
                            )
                            .sense(egui::Sense::click()),
                        );
                        if close_btn.hovered() {
                            ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
                        }
                        if close_btn.clicked() {
                            dismiss_message = true;
                        }
                    });
                    ui.add_space(4.0);
                }
                if let Some(text) = copy_message {
                    ui.ctx().copy_text(text);
                }
                if dismiss_message {
                    self.status_message = None;
                }

                match self.state {
                    AppState::Setup => self.render_setup(ui),
                    AppState::Main => self.render_main(ui),
                }
            });
    }
}
