use std::collections::BTreeMap;

use chrono::NaiveDate;
use egui::{Color32, Painter, Pos2, Rect, Rounding, Sense, Stroke, Ui, Vec2};
use egui_phosphor::regular as icons;
use shopfloor_timeline::engine::{duration_days, LaneAssignment, RowLayout};
use shopfloor_timeline::model::{format_iso_date, Schedule, TimelineViewport, WorkOrder};

use crate::ui::theme;

const HEADER_HEIGHT: f32 = theme::HEADER_HEIGHT;

/// Something the user did on the chart that the app must act on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChartAction {
    None,
    Create { work_center_id: String, date: NaiveDate },
    Edit(String),
    Delete(String),
}

/// Vertical band of one work center, relative to the top of the body.
struct RowBand<'a> {
    work_center_id: &'a str,
    name: &'a str,
    top: f32,
    height: f32,
    lanes: Option<&'a LaneAssignment>,
}

fn row_bands<'a>(
    schedule: &'a Schedule,
    lanes: &'a BTreeMap<String, LaneAssignment>,
    layout: &RowLayout,
) -> Vec<RowBand<'a>> {
    let mut top = 0.0;
    schedule
        .work_centers
        .iter()
        .map(|wc| {
            let assignment = lanes.get(&wc.id);
            let height = layout.row_height(assignment.map_or(1, LaneAssignment::lane_count));
            let band = RowBand {
                work_center_id: &wc.id,
                name: &wc.name,
                top,
                height,
                lanes: assignment,
            };
            top += height;
            band
        })
        .collect()
}

/// Render the work center list and the scrollable timeline beside it.
///
/// When `center_on_today` is set the horizontal scroll jumps to today and the
/// flag is cleared.
pub fn show_timeline_chart(
    schedule: &Schedule,
    lanes: &BTreeMap<String, LaneAssignment>,
    viewport: &TimelineViewport,
    layout: &RowLayout,
    selected: Option<&str>,
    center_on_today: &mut bool,
    ui: &mut Ui,
) -> ChartAction {
    let mut action = ChartAction::None;
    let rows = row_bands(schedule, lanes, layout);
    let body_height = rows.last().map_or(0.0, |r| r.top + r.height);
    let canvas_height = HEADER_HEIGHT + body_height;

    egui::ScrollArea::vertical()
        .id_salt("timeline_rows")
        .auto_shrink([false, false])
        .show(ui, |ui| {
            ui.horizontal_top(|ui| {
                ui.spacing_mut().item_spacing = Vec2::ZERO;
                draw_name_column(ui, &rows, canvas_height);

                let visible_width = ui.available_width();
                let mut area = egui::ScrollArea::horizontal()
                    .id_salt("timeline_columns")
                    .auto_shrink([false, true]);
                if *center_on_today {
                    let offset = viewport.centering_scroll_offset(visible_width as f64) as f32;
                    area = area.horizontal_scroll_offset(offset);
                    *center_on_today = false;
                }
                area.show(ui, |ui| {
                    action = draw_canvas(schedule, viewport, layout, &rows, selected, canvas_height, ui);
                });
            });
        });

    action
}

fn draw_name_column(ui: &mut Ui, rows: &[RowBand<'_>], canvas_height: f32) {
    let (rect, _) = ui.allocate_exact_size(Vec2::new(theme::NAME_COLUMN_WIDTH, canvas_height), Sense::hover());
    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, 0.0, theme::BG_PANEL);

    let header = Rect::from_min_size(rect.min, Vec2::new(rect.width(), HEADER_HEIGHT));
    painter.rect_filled(header, 0.0, theme::BG_HEADER);
    painter.text(
        Pos2::new(header.left() + 12.0, header.center().y),
        egui::Align2::LEFT_CENTER,
        "Work Center",
        theme::font_header(),
        theme::TEXT_SECONDARY,
    );

    for (i, row) in rows.iter().enumerate() {
        let band = Rect::from_min_size(
            Pos2::new(rect.left(), rect.top() + HEADER_HEIGHT + row.top),
            Vec2::new(rect.width(), row.height),
        );
        if i % 2 == 1 {
            painter.rect_filled(band, 0.0, theme::BG_ROW_ALT);
        }
        painter.line_segment(
            [band.left_bottom(), band.right_bottom()],
            Stroke::new(0.5, theme::BORDER_SUBTLE),
        );
        let text_painter = painter.with_clip_rect(band.shrink2(Vec2::new(8.0, 0.0)));
        text_painter.text(
            Pos2::new(band.left() + 12.0, band.top() + 22.0),
            egui::Align2::LEFT_CENTER,
            row.name,
            theme::font_header(),
            theme::TEXT_PRIMARY,
        );
    }

    painter.line_segment(
        [rect.right_top(), rect.right_bottom()],
        Stroke::new(1.0, theme::BORDER_SUBTLE),
    );
}

fn draw_canvas(
    schedule: &Schedule,
    viewport: &TimelineViewport,
    layout: &RowLayout,
    rows: &[RowBand<'_>],
    selected: Option<&str>,
    canvas_height: f32,
    ui: &mut Ui,
) -> ChartAction {
    let mut action = ChartAction::None;
    let width = (viewport.total_width() as f32).max(ui.available_width());
    let (response, painter) = ui.allocate_painter(Vec2::new(width, canvas_height), Sense::click());
    let origin = response.rect.min;

    painter.rect_filled(response.rect, 0.0, theme::BG_DARK);
    draw_row_backgrounds(&painter, origin, width, rows, response.hover_pos());
    draw_timeline_header(&painter, origin, viewport, canvas_height);
    draw_today_line(&painter, origin, viewport, canvas_height);

    let bar_height = theme::BAR_HEIGHT.min(layout.lane_height - 4.0);
    for row in rows {
        let row_top = origin.y + HEADER_HEIGHT + row.top;
        for order in schedule.orders_for(row.work_center_id) {
            let lane = row.lanes.and_then(|l| l.lane_of(&order.id)).unwrap_or(0);
            let geometry = viewport.bar_geometry(&order.interval);
            let lane_top = row_top + layout.lane_offset(lane);
            let bar_rect = Rect::from_min_size(
                Pos2::new(
                    origin.x + geometry.left as f32,
                    lane_top + (layout.lane_height - bar_height) / 2.0,
                ),
                Vec2::new((geometry.width as f32).max(theme::MIN_BAR_WIDTH), bar_height),
            );
            let is_selected = selected == Some(order.id.as_str());
            draw_bar(&painter, bar_rect, order, is_selected);

            let bar_response = ui.interact(bar_rect, ui.make_persistent_id(("wo-bar", &order.id)), Sense::click());
            if bar_response.clicked() {
                action = ChartAction::Edit(order.id.clone());
            }
            if bar_response.hovered() {
                ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
                egui::show_tooltip_at_pointer(
                    ui.ctx(),
                    ui.layer_id(),
                    egui::Id::new(("wo-tip", &order.id)),
                    |ui| {
                        ui.strong(&order.name);
                        ui.label(format!(
                            "{} {} {}  ({} days)",
                            format_iso_date(order.interval.start),
                            icons::ARROW_RIGHT,
                            format_iso_date(order.interval.end),
                            duration_days(&order.interval)
                        ));
                        ui.label(
                            egui::RichText::new(order.status.label()).color(theme::status_color(order.status)),
                        );
                    },
                );
            }
            bar_response.context_menu(|ui| {
                if ui.button(format!("{}  Edit", icons::PENCIL_SIMPLE)).clicked() {
                    action = ChartAction::Edit(order.id.clone());
                    ui.close_menu();
                }
                if ui.button(format!("{}  Delete", icons::TRASH)).clicked() {
                    action = ChartAction::Delete(order.id.clone());
                    ui.close_menu();
                }
            });
        }
    }

    // Click on empty row space starts a new order at that date.
    if action == ChartAction::None && response.clicked() {
        if let Some(pos) = response.interact_pointer_pos() {
            let body_y = pos.y - origin.y - HEADER_HEIGHT;
            if let Some(row) = rows.iter().find(|r| body_y >= r.top && body_y < r.top + r.height) {
                let date = viewport.pixel_to_date((pos.x - origin.x) as f64);
                action = ChartAction::Create {
                    work_center_id: row.work_center_id.to_string(),
                    date,
                };
            }
        }
    }

    action
}

fn draw_row_backgrounds(painter: &Painter, origin: Pos2, width: f32, rows: &[RowBand<'_>], hover: Option<Pos2>) {
    for (i, row) in rows.iter().enumerate() {
        let band = Rect::from_min_size(
            Pos2::new(origin.x, origin.y + HEADER_HEIGHT + row.top),
            Vec2::new(width, row.height),
        );
        if hover.is_some_and(|p| band.contains(p)) {
            painter.rect_filled(band, 0.0, theme::BG_ROW_HOVER);
        } else if i % 2 == 1 {
            painter.rect_filled(band, 0.0, theme::BG_ROW_ALT);
        }
        painter.line_segment(
            [band.left_bottom(), band.right_bottom()],
            Stroke::new(0.5, theme::BORDER_SUBTLE),
        );
    }
}

fn draw_timeline_header(painter: &Painter, origin: Pos2, viewport: &TimelineViewport, height: f32) {
    let column_width = viewport.column_width() as f32;
    let total_width = viewport.total_width() as f32;

    painter.rect_filled(
        Rect::from_min_size(origin, Vec2::new(total_width, HEADER_HEIGHT)),
        0.0,
        theme::BG_HEADER,
    );

    let mut previous_secondary: Option<&str> = None;
    for (i, column) in viewport.columns().iter().enumerate() {
        let x = origin.x + i as f32 * column_width;
        let body = Rect::from_min_size(
            Pos2::new(x, origin.y + HEADER_HEIGHT),
            Vec2::new(column_width, height - HEADER_HEIGHT),
        );
        if column.is_today {
            painter.rect_filled(body, 0.0, theme::BG_TODAY_COLUMN);
            painter.rect_filled(
                Rect::from_min_size(Pos2::new(x, origin.y), Vec2::new(column_width, HEADER_HEIGHT)),
                0.0,
                theme::BG_TODAY_COLUMN,
            );
        } else if column.is_weekend {
            painter.rect_filled(body, 0.0, theme::BG_WEEKEND);
        }

        painter.line_segment(
            [Pos2::new(x, origin.y), Pos2::new(x, origin.y + height)],
            Stroke::new(0.5, theme::GRID_LINE),
        );

        // Secondary label only where it changes, e.g. once per month.
        if previous_secondary != Some(column.secondary_label.as_str()) {
            painter.text(
                Pos2::new(x + 5.0, origin.y + 12.0),
                egui::Align2::LEFT_CENTER,
                &column.secondary_label,
                theme::font_sub(),
                theme::TEXT_SECONDARY,
            );
            previous_secondary = Some(column.secondary_label.as_str());
        }

        let label_color = if column.is_today { theme::TEXT_PRIMARY } else { theme::TEXT_SECONDARY };
        painter.text(
            Pos2::new(x + column_width / 2.0, origin.y + 31.0),
            egui::Align2::CENTER_CENTER,
            &column.primary_label,
            theme::font_header(),
            label_color,
        );
    }

    painter.line_segment(
        [
            Pos2::new(origin.x, origin.y + HEADER_HEIGHT),
            Pos2::new(origin.x + total_width, origin.y + HEADER_HEIGHT),
        ],
        Stroke::new(1.0, theme::BORDER_SUBTLE),
    );
}

fn draw_today_line(painter: &Painter, origin: Pos2, viewport: &TimelineViewport, height: f32) {
    let x = origin.x + viewport.today_pixel() as f32;

    painter.line_segment(
        [Pos2::new(x, origin.y + HEADER_HEIGHT), Pos2::new(x, origin.y + height)],
        Stroke::new(1.5, theme::TODAY_LINE),
    );

    let badge_w = 42.0;
    let badge_rect = Rect::from_min_size(
        Pos2::new(x - badge_w / 2.0, origin.y + HEADER_HEIGHT - 1.0),
        Vec2::new(badge_w, 14.0),
    );
    painter.rect_filled(badge_rect, Rounding::same(3.0), theme::TODAY_LINE);
    painter.text(
        badge_rect.center(),
        egui::Align2::CENTER_CENTER,
        "Today",
        theme::font_small(),
        Color32::WHITE,
    );
}

const BADGE_MIN_BAR_WIDTH: f32 = 140.0;
const BADGE_PADDING: f32 = 7.0;
const BADGE_MARGIN: f32 = 6.0;

/// Narrow bars keep the name only; status stays visible through colour and tooltip.
fn shows_status_badge(bar_width: f32) -> bool {
    bar_width >= BADGE_MIN_BAR_WIDTH
}

fn draw_bar(painter: &Painter, bar_rect: Rect, order: &WorkOrder, is_selected: bool) {
    let rounding = Rounding::same(theme::BAR_ROUNDING);
    let color = theme::status_color(order.status);

    painter.rect_filled(bar_rect.translate(Vec2::new(1.0, 2.0)), rounding, Color32::from_black_alpha(35));
    painter.rect_filled(bar_rect, rounding, color.gamma_multiply(0.85));
    // Status accent along the left edge.
    painter.rect_filled(
        Rect::from_min_size(bar_rect.min, Vec2::new(4.0_f32.min(bar_rect.width()), bar_rect.height())),
        Rounding {
            nw: theme::BAR_ROUNDING,
            sw: theme::BAR_ROUNDING,
            ne: 0.0,
            se: 0.0,
        },
        color,
    );

    if is_selected {
        painter.rect_stroke(bar_rect.expand(1.5), rounding, Stroke::new(2.0, Color32::WHITE));
    }

    let mut text_right = bar_rect.right() - 8.0;
    if shows_status_badge(bar_rect.width()) {
        let galley = painter.layout_no_wrap(order.status.label().to_string(), theme::font_small(), theme::TEXT_ON_BAR);
        let pill = Rect::from_min_size(
            Pos2::new(
                bar_rect.right() - BADGE_MARGIN - galley.size().x - 2.0 * BADGE_PADDING,
                bar_rect.center().y - galley.size().y / 2.0 - 2.0,
            ),
            Vec2::new(galley.size().x + 2.0 * BADGE_PADDING, galley.size().y + 4.0),
        );
        painter.rect_filled(pill, Rounding::same(pill.height() / 2.0), Color32::from_black_alpha(60));
        painter.galley(
            Pos2::new(pill.left() + BADGE_PADDING, pill.top() + 2.0),
            galley,
            theme::TEXT_ON_BAR,
        );
        text_right = pill.left() - 6.0;
    }

    if bar_rect.width() > 24.0 {
        let clip = Rect::from_min_max(
            Pos2::new(bar_rect.left() + 8.0, bar_rect.top()),
            Pos2::new(text_right.max(bar_rect.left() + 8.0), bar_rect.bottom()),
        );
        let clipped = painter.with_clip_rect(clip);
        clipped.text(
            Pos2::new(bar_rect.left() + 10.0, bar_rect.center().y),
            egui::Align2::LEFT_CENTER,
            &order.name,
            theme::font_bar(),
            theme::TEXT_ON_BAR,
        );
    }
}
