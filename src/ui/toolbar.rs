use crate::app::TimelineApp;
use crate::ui::theme;
use egui::{menu, RichText, Ui};
use egui_phosphor::regular as icons;
use shopfloor_timeline::model::ZoomLevel;

/// Render the top menu bar with file actions, zoom selector and Today button.
pub fn show_toolbar(app: &mut TimelineApp, ui: &mut Ui) {
    menu::bar(ui, |ui| {
        ui.menu_button(RichText::new("  File  ").font(theme::font_menu()), |ui| {
            if ui.button(format!("{}  New from Sample", icons::FILE_PLUS)).clicked() {
                app.new_from_sample();
                ui.close_menu();
            }
            if ui.button(format!("{}  Open...", icons::FOLDER_OPEN)).clicked() {
                app.open_schedule();
                ui.close_menu();
            }
            ui.separator();
            if ui.button(format!("{}  Save          Ctrl+S", icons::FLOPPY_DISK)).clicked() {
                app.save_schedule();
                ui.close_menu();
            }
            if ui.button("      Save As...").clicked() {
                app.save_schedule_as();
                ui.close_menu();
            }
            ui.separator();
            if ui.button(format!("{}  Import CSV...", icons::DOWNLOAD_SIMPLE)).clicked() {
                app.import_csv();
                ui.close_menu();
            }
            if ui.button(format!("{}  Export CSV...", icons::EXPORT)).clicked() {
                app.export_csv();
                ui.close_menu();
            }
            ui.separator();
            if ui.button(format!("{}  Open Data Folder", icons::FOLDER)).clicked() {
                app.open_data_folder();
                ui.close_menu();
            }
        });

        ui.menu_button(RichText::new("  Help  ").font(theme::font_menu()), |ui| {
            if ui.button(format!("{}  About", icons::INFO)).clicked() {
                app.show_about = true;
                ui.close_menu();
            }
        });

        ui.separator();
        ui.label(RichText::new("Timescale").color(theme::TEXT_SECONDARY));
        let current = app.viewport.zoom();
        egui::ComboBox::from_id_salt("zoom_combo")
            .selected_text(current.label())
            .width(90.0)
            .show_ui(ui, |ui| {
                for level in ZoomLevel::all() {
                    if ui.selectable_label(current == *level, level.label()).clicked() {
                        app.set_zoom(*level);
                    }
                }
            });

        if ui.button(format!("{}  Today", icons::CROSSHAIR)).clicked() {
            app.go_to_today();
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let location = if app.file_path.is_some() { "" } else { " (autosave)" };
            ui.label(
                RichText::new(format!("{}{}", app.schedule.name, location))
                    .size(11.0)
                    .weak(),
            );
        });
    });
}
