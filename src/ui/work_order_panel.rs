use chrono::{Duration, NaiveDate};
use egui::{Color32, RichText, Ui};
use egui_phosphor::regular as icons;
use shopfloor_timeline::model::{Interval, WorkCenter, WorkOrder, WorkOrderDraft, WorkOrderStatus};
use shopfloor_timeline::{CommitMode, StoreError, TimelineError};

use crate::ui::theme;

pub const CONFLICT_MESSAGE: &str =
    "This work order overlaps with an existing order on the same work center. Please adjust the dates.";

/// Length of a freshly created order, in days after the clicked date.
const DEFAULT_SPAN_DAYS: i64 = 7;

/// Whether the panel creates a new order or edits an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit { id: String },
}

/// Editable state of the slide-out work order panel.
#[derive(Debug, Clone)]
pub struct WorkOrderForm {
    pub mode: FormMode,
    pub name: String,
    pub work_center_id: String,
    pub status: WorkOrderStatus,
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Validation or conflict message shown under the fields.
    pub error: Option<String>,
}

impl WorkOrderForm {
    /// Prefilled for a click at `start` on a work center row.
    pub fn create(work_center_id: impl Into<String>, start: NaiveDate) -> Self {
        Self {
            mode: FormMode::Create,
            name: String::new(),
            work_center_id: work_center_id.into(),
            status: WorkOrderStatus::Open,
            start,
            end: start + Duration::days(DEFAULT_SPAN_DAYS),
            error: None,
        }
    }

    pub fn edit(order: &WorkOrder) -> Self {
        Self {
            mode: FormMode::Edit { id: order.id.clone() },
            name: order.name.clone(),
            work_center_id: order.work_center_id.clone(),
            status: order.status,
            start: order.interval.start,
            end: order.interval.end,
            error: None,
        }
    }

    pub fn title(&self) -> &'static str {
        match self.mode {
            FormMode::Create => "Create Work Order",
            FormMode::Edit { .. } => "Edit Work Order",
        }
    }

    pub fn commit_mode(&self) -> CommitMode {
        match &self.mode {
            FormMode::Create => CommitMode::Create,
            FormMode::Edit { id } => CommitMode::Update { id: id.clone() },
        }
    }

    pub fn to_draft(&self) -> Result<WorkOrderDraft, TimelineError> {
        let interval = Interval::new(self.start, self.end)?;
        Ok(WorkOrderDraft::new(self.work_center_id.clone(), self.name.clone(), interval).with_status(self.status))
    }

    /// Message to keep the panel open with after a rejected submit.
    pub fn set_error(&mut self, err: &StoreError) {
        self.error = Some(match err {
            StoreError::Conflict(_) => CONFLICT_MESSAGE.to_string(),
            StoreError::EmptyName => "Please enter a work order name.".to_string(),
            StoreError::Invalid(TimelineError::InvalidRange { .. }) => {
                "End date must be on or after the start date.".to_string()
            }
            other => other.to_string(),
        });
    }
}

/// What the user asked the panel to do this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelAction {
    None,
    Submit,
    Cancel,
    Delete,
}

fn field_label(ui: &mut Ui, text: &str) {
    ui.label(RichText::new(text).size(10.0).color(theme::TEXT_DIM).strong());
}

/// Render the work order form inside a side panel.
pub fn show_work_order_panel(form: &mut WorkOrderForm, work_centers: &[WorkCenter], ui: &mut Ui) -> PanelAction {
    let mut action = PanelAction::None;

    ui.add_space(6.0);
    ui.horizontal(|ui| {
        ui.label(RichText::new(form.title()).strong().size(14.0));
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button(icons::X).clicked() {
                action = PanelAction::Cancel;
            }
        });
    });
    ui.add_space(6.0);
    ui.separator();
    ui.add_space(4.0);

    ui.spacing_mut().item_spacing.y = 6.0;
    ui.visuals_mut().extreme_bg_color = theme::BG_FIELD;

    field_label(ui, "Work Order Name");
    let name_edit = ui.add_sized(
        [ui.available_width(), 24.0],
        egui::TextEdit::singleline(&mut form.name)
            .hint_text("e.g. Aluminum Profile Batch #1248")
            .text_color(theme::TEXT_PRIMARY),
    );
    if name_edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
        action = PanelAction::Submit;
    }

    field_label(ui, "Work Center");
    let selected_name = work_centers
        .iter()
        .find(|wc| wc.id == form.work_center_id)
        .map(|wc| wc.name.as_str())
        .unwrap_or("Unknown");
    egui::ComboBox::from_id_salt("work_center_combo")
        .selected_text(selected_name)
        .width(ui.available_width())
        .show_ui(ui, |ui| {
            for wc in work_centers {
                ui.selectable_value(&mut form.work_center_id, wc.id.clone(), wc.name.as_str());
            }
        });

    field_label(ui, "Status");
    egui::ComboBox::from_id_salt("status_combo")
        .selected_text(RichText::new(form.status.label()).color(theme::status_color(form.status)))
        .width(ui.available_width())
        .show_ui(ui, |ui| {
            for status in WorkOrderStatus::all() {
                ui.selectable_value(
                    &mut form.status,
                    *status,
                    RichText::new(status.label()).color(theme::status_color(*status)),
                );
            }
        });

    ui.horizontal(|ui| {
        ui.vertical(|ui| {
            field_label(ui, "Start Date");
            ui.add(egui_extras::DatePickerButton::new(&mut form.start).id_salt("wo_dp_start"));
        });
        ui.add_space(12.0);
        ui.vertical(|ui| {
            field_label(ui, "End Date");
            ui.add(egui_extras::DatePickerButton::new(&mut form.end).id_salt("wo_dp_end"));
        });
    });

    if let Some(error) = &form.error {
        ui.add_space(4.0);
        ui.label(RichText::new(format!("{}  {}", icons::WARNING, error)).color(theme::TEXT_ERROR));
    }

    ui.add_space(8.0);
    ui.separator();
    ui.add_space(4.0);

    ui.horizontal(|ui| {
        let submit_label = match form.mode {
            FormMode::Create => "Create",
            FormMode::Edit { .. } => "Save",
        };
        let submit = egui::Button::new(RichText::new(submit_label).color(Color32::WHITE))
            .fill(theme::ACCENT)
            .rounding(egui::Rounding::same(4.0));
        if ui.add_sized([80.0, 28.0], submit).clicked() {
            action = PanelAction::Submit;
        }
        if ui.add_sized([80.0, 28.0], egui::Button::new("Cancel")).clicked() {
            action = PanelAction::Cancel;
        }
        if matches!(form.mode, FormMode::Edit { .. }) {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button(format!("{}  Delete", icons::TRASH)).clicked() {
                    action = PanelAction::Delete;
                }
            });
        }
    });

    if ui.input(|i| i.key_pressed(egui::Key::Escape)) {
        action = PanelAction::Cancel;
    }
    action
}
