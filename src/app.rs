use std::collections::BTreeMap;
use std::path::PathBuf;

use shopfloor_timeline::config::{AppPaths, AppSettings};
use shopfloor_timeline::engine::{assign_lanes_by_row, LaneAssignment};
use shopfloor_timeline::model::{Schedule, TimelineViewport, ZoomLevel};
use shopfloor_timeline::sample::sample_schedule;
use shopfloor_timeline::{io, ScheduleStore};
use tracing::{debug, warn};

use crate::ui;
use crate::ui::timeline_chart::ChartAction;
use crate::ui::work_order_panel::{PanelAction, WorkOrderForm};

/// Main application state. The schedule is the single source of truth; lanes
/// are derived from it after every mutation.
pub struct TimelineApp {
    pub schedule: Schedule,
    pub viewport: TimelineViewport,
    pub settings: AppSettings,
    pub paths: AppPaths,
    /// Explicit document chosen through Save As / Open; autosave always runs.
    pub file_path: Option<PathBuf>,
    pub lanes: BTreeMap<String, LaneAssignment>,
    pub selected: Option<String>,
    pub form: Option<WorkOrderForm>,
    pub show_about: bool,
    pub status_message: String,
    /// Scroll the chart so today is centered on the next frame.
    pub center_on_today: bool,
}

impl TimelineApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        // Register Phosphor icon font as a fallback so icons render inline with text
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);
        ui::theme::apply_theme(&cc.egui_ctx);

        let paths = AppPaths::resolve();
        let settings = AppSettings::load(&paths.settings_file());
        let viewport = TimelineViewport::new(settings.default_zoom);
        let schedule = io::load_or_seed(&paths.autosave_file(), viewport.today());

        let mut app = Self {
            schedule,
            viewport,
            settings,
            paths,
            file_path: None,
            lanes: BTreeMap::new(),
            selected: None,
            form: None,
            show_about: false,
            status_message: "Ready".to_string(),
            center_on_today: true,
        };
        app.refresh_lanes();
        app
    }

    fn refresh_lanes(&mut self) {
        self.lanes = assign_lanes_by_row(&self.schedule.work_orders);
        debug!(rows = self.lanes.len(), "Recomputed lanes");
    }

    /// Persist after every successful mutation. Last write wins.
    fn autosave(&mut self) {
        if let Err(e) = io::save_schedule(&self.schedule, &self.paths.autosave_file()) {
            warn!(error = %e, "Autosave failed");
            self.status_message = format!("Autosave failed: {}", e);
        }
    }

    fn save_settings(&self) {
        if let Err(e) = self.settings.save(&self.paths.settings_file()) {
            warn!(error = %e, "Failed to save settings");
        }
    }

    fn replace_schedule(&mut self, schedule: Schedule) {
        self.schedule.reset_to(schedule);
        self.selected = None;
        self.form = None;
        self.refresh_lanes();
        self.center_on_today = true;
        self.autosave();
    }

    // --- File operations ---

    pub fn new_from_sample(&mut self) {
        let sample = sample_schedule(self.viewport.today());
        self.file_path = None;
        self.replace_schedule(sample);
        self.status_message = "Loaded sample schedule".to_string();
    }

    pub fn open_schedule(&mut self) {
        let mut dialog = rfd::FileDialog::new().add_filter("Schedule", &["json"]);
        if let Some(dir) = self.settings.last_file.as_ref().and_then(|p| p.parent()) {
            dialog = dialog.set_directory(dir);
        }
        let Some(path) = dialog.pick_file() else {
            return;
        };
        match io::load_schedule(&path) {
            Ok(schedule) => {
                self.replace_schedule(schedule);
                self.status_message = format!("Opened {}", path.display());
                self.settings.last_file = Some(path.clone());
                self.file_path = Some(path);
                self.save_settings();
            }
            Err(e) => self.status_message = format!("Error loading: {}", e),
        }
    }

    pub fn save_schedule(&mut self) {
        match self.file_path.clone() {
            Some(path) => self.write_to(path),
            None => self.save_schedule_as(),
        }
    }

    pub fn save_schedule_as(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Schedule", &["json"])
            .set_file_name(format!("{}.json", self.schedule.name))
            .save_file()
        {
            self.write_to(path);
        }
    }

    fn write_to(&mut self, path: PathBuf) {
        self.schedule.touch();
        match io::save_schedule(&self.schedule, &path) {
            Ok(()) => {
                self.status_message = format!("Saved {}", path.display());
                self.settings.last_file = Some(path.clone());
                self.file_path = Some(path);
                self.save_settings();
            }
            Err(e) => self.status_message = format!("Error saving: {}", e),
        }
    }

    pub fn import_csv(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv", "txt"])
            .pick_file()
        else {
            return;
        };
        match io::import_csv(&mut self.schedule, &path) {
            Ok(summary) => {
                self.status_message = summary.to_string();
                if summary.created > 0 {
                    self.refresh_lanes();
                    self.autosave();
                }
            }
            Err(e) => self.status_message = format!("CSV import failed: {}", e),
        }
    }

    pub fn export_csv(&mut self) {
        if self.schedule.work_orders.is_empty() {
            self.status_message = "Nothing to export: the schedule has no work orders".to_string();
            return;
        }
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .set_file_name(format!("{}.csv", self.schedule.name))
            .save_file()
        {
            match io::export_csv(&self.schedule, &path) {
                Ok(count) => self.status_message = format!("Exported {} work orders to CSV", count),
                Err(e) => self.status_message = format!("CSV export failed: {}", e),
            }
        }
    }

    pub fn open_data_folder(&mut self) {
        let dir = self.paths.data_dir.clone();
        if let Err(e) = std::fs::create_dir_all(&dir).and_then(|_| open::that(&dir)) {
            self.status_message = format!("Could not open {}: {}", dir.display(), e);
        }
    }

    // --- Timeline ---

    pub fn set_zoom(&mut self, level: ZoomLevel) {
        self.viewport.set_zoom(level);
        self.center_on_today = true;
        if self.settings.default_zoom != level {
            self.settings.default_zoom = level;
            self.save_settings();
        }
    }

    pub fn go_to_today(&mut self) {
        self.viewport.refresh_clock();
        self.center_on_today = true;
    }

    // --- Work order operations ---

    fn handle_chart_action(&mut self, action: ChartAction) {
        match action {
            ChartAction::None => {}
            ChartAction::Create { work_center_id, date } => {
                self.selected = None;
                self.form = Some(WorkOrderForm::create(work_center_id, date));
            }
            ChartAction::Edit(id) => {
                if let Some(order) = self.schedule.get_by_id(&id) {
                    self.form = Some(WorkOrderForm::edit(order));
                    self.selected = Some(id);
                }
            }
            ChartAction::Delete(id) => self.delete_work_order(&id),
        }
    }

    fn submit_form(&mut self) {
        let Some(form) = self.form.as_mut() else {
            return;
        };
        let draft = match form.to_draft() {
            Ok(draft) => draft,
            Err(e) => {
                form.set_error(&e.into());
                return;
            }
        };
        match self.schedule.commit(draft, form.commit_mode()) {
            Ok(order) => {
                self.status_message = format!(
                    "Saved '{}' on {} ({} → {})",
                    order.name,
                    self.schedule.work_center_name(&order.work_center_id),
                    order.interval.start,
                    order.interval.end
                );
                self.selected = Some(order.id);
                self.form = None;
                self.refresh_lanes();
                self.autosave();
            }
            // Panel stays open with the message; nothing was written.
            Err(e) => form.set_error(&e),
        }
    }

    fn delete_work_order(&mut self, id: &str) {
        let name = self.schedule.get_by_id(id).map(|wo| wo.name.clone());
        if self.schedule.delete(id) {
            if self.selected.as_deref() == Some(id) {
                self.selected = None;
            }
            self.form = None;
            self.refresh_lanes();
            self.autosave();
            self.status_message = format!("Deleted '{}'", name.unwrap_or_default());
        }
    }
}

impl eframe::App for TimelineApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if ctx.input(|i| i.modifiers.command && i.key_pressed(egui::Key::S)) {
            self.save_schedule();
        }

        // Top panel: toolbar
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui::toolbar::show_toolbar(self, ui);
        });

        // Bottom panel: status bar
        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(ui::theme::STATUS_BAR_HEIGHT)
            .frame(
                egui::Frame::default()
                    .fill(ui::theme::BG_STATUS_BAR)
                    .inner_margin(egui::Margin::symmetric(10.0, 0.0)),
            )
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    ui.label(
                        egui::RichText::new(&self.status_message)
                            .size(11.0)
                            .color(ui::theme::TEXT_SECONDARY),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(
                            egui::RichText::new(format!("Zoom: {}", self.viewport.zoom().label()))
                                .size(10.5)
                                .color(ui::theme::TEXT_DIM),
                        );
                        ui.label(egui::RichText::new(" · ").size(10.5).color(ui::theme::TEXT_DIM));
                        ui.label(
                            egui::RichText::new(format!("Work orders: {}", self.schedule.work_orders.len()))
                                .size(10.5)
                                .color(ui::theme::TEXT_DIM),
                        );
                    });
                });
            });

        // Right panel: create / edit form
        let mut panel_action = PanelAction::None;
        if let Some(form) = self.form.as_mut() {
            let work_centers = &self.schedule.work_centers;
            egui::SidePanel::right("work_order_panel")
                .exact_width(ui::theme::PANEL_WIDTH)
                .resizable(false)
                .frame(
                    egui::Frame::default()
                        .fill(ui::theme::BG_PANEL)
                        .inner_margin(egui::Margin::same(12.0))
                        .stroke(egui::Stroke::new(1.0, ui::theme::BORDER_SUBTLE)),
                )
                .show(ctx, |ui| {
                    panel_action = ui::work_order_panel::show_work_order_panel(form, work_centers, ui);
                });
        }
        match panel_action {
            PanelAction::None => {}
            PanelAction::Submit => self.submit_form(),
            PanelAction::Cancel => self.form = None,
            PanelAction::Delete => {
                if let Some(ui::work_order_panel::FormMode::Edit { id }) = self.form.as_ref().map(|f| f.mode.clone()) {
                    self.delete_work_order(&id);
                }
            }
        }

        // Central panel: work center list + timeline
        let chart_frame = egui::Frame::default()
            .fill(ui::theme::BG_DARK)
            .inner_margin(egui::Margin::ZERO);
        let mut chart_action = ChartAction::None;
        egui::CentralPanel::default().frame(chart_frame).show(ctx, |ui| {
            chart_action = ui::timeline_chart::show_timeline_chart(
                &self.schedule,
                &self.lanes,
                &self.viewport,
                &self.settings.row_layout,
                self.selected.as_deref(),
                &mut self.center_on_today,
                ui,
            );
        });
        self.handle_chart_action(chart_action);

        // Dialogs
        if self.show_about {
            ui::dialogs::show_about_dialog(self, ctx);
        }
    }
}
