use std::collections::BTreeMap;

use egui::{Color32, RichText, Sense, Stroke, Ui};

use super::theme::{
    accent_color, blackout_color, button_colors, header_text_colors, phosphor_fill_family,
    tier_color,
};
use crate::grid::{Consensus, GridState, Slot, Tier, DAY_COUNT, DAY_LABELS, HOUR_COUNT, HOUR_LABELS};

/// Interactions reported by one frame of the schedule grid. The caller
/// applies them to the model; the next frame re-derives the whole render.
#[derive(Default)]
pub struct GridResponse {
    pub toggled_slot: Option<Slot>,
    pub toggled_day: Option<usize>,
    pub toggled_hour: Option<usize>,
    pub copy_from: Option<usize>,
}

const CELL_HEIGHT: f32 = 30.0;
const HOUR_LABEL_WIDTH: f32 = 52.0;
const HEADER_HEIGHT: f32 = 36.0;
const GRID_SPACING: f32 = 3.0;

pub fn render_grid(
    ui: &mut Ui,
    grid: &GridState,
    counts: &BTreeMap<Slot, u32>,
    consensus: &Consensus,
    read_only: bool,
) -> GridResponse {
    let mut out = GridResponse::default();

    let cell_width = ((ui.available_width() - HOUR_LABEL_WIDTH) / DAY_COUNT as f32 - GRID_SPACING)
        .clamp(44.0, 110.0);

    egui::Grid::new("schedule_grid")
        .num_columns(DAY_COUNT + 1)
        .spacing([GRID_SPACING, GRID_SPACING])
        .show(ui, |ui| {
            // Top-left corner stays blank above the hour gutter
            let _ = ui.allocate_exact_size(egui::vec2(HOUR_LABEL_WIDTH, HEADER_HEIGHT), Sense::hover());
            for day in 0..DAY_COUNT {
                render_day_header(ui, day, cell_width, read_only, &mut out);
            }
            ui.end_row();

            for hour in 0..HOUR_COUNT {
                render_hour_header(ui, hour, read_only, &mut out);
                for day in 0..DAY_COUNT {
                    let slot = Slot { day, hour };
                    if render_cell(ui, grid, counts, consensus, slot, cell_width, read_only) {
                        out.toggled_slot = Some(slot);
                    }
                }
                ui.end_row();
            }
        });

    out
}

/// Day label (column toggle) with the copy control underneath. The last
/// day gets a spacer instead so the headers stay level.
fn render_day_header(
    ui: &mut Ui,
    day: usize,
    cell_width: f32,
    read_only: bool,
    out: &mut GridResponse,
) {
    let (text_color, hover_color) = header_text_colors();

    ui.allocate_ui_with_layout(
        egui::vec2(cell_width, HEADER_HEIGHT),
        egui::Layout::top_down(egui::Align::Center),
        |ui| {
            ui.spacing_mut().item_spacing.y = 1.0;

            let sense = if read_only { Sense::hover() } else { Sense::click() };
            let label = ui.add(
                egui::Label::new(RichText::new(DAY_LABELS[day]).size(14.0).color(text_color))
                    .sense(sense),
            );
            if !read_only {
                if label.hovered() {
                    ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
                }
                if label.clicked() {
                    out.toggled_day = Some(day);
                }
            }

            if day + 1 < DAY_COUNT && !read_only {
                let copy_text = format!("copy {}", egui_phosphor::regular::ARROW_RIGHT);
                let font_id = egui::FontId::proportional(11.0);
                let text_size = ui.fonts(|f| {
                    f.layout_no_wrap(copy_text.clone(), font_id.clone(), text_color).size()
                });
                let (rect, response) =
                    ui.allocate_exact_size(text_size + egui::vec2(8.0, 3.0), Sense::click());
                let color = if response.hovered() { hover_color } else { text_color };
                ui.painter().text(
                    rect.center(),
                    egui::Align2::CENTER_CENTER,
                    &copy_text,
                    font_id,
                    color,
                );
                if response.hovered() {
                    ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
                }
                if response.clicked() {
                    out.copy_from = Some(day);
                }
            }
        },
    );
}

/// Hour label, clickable as the row toggle.
fn render_hour_header(ui: &mut Ui, hour: usize, read_only: bool, out: &mut GridResponse) {
    let (text_color, hover_color) = header_text_colors();
    let sense = if read_only { Sense::hover() } else { Sense::click() };
    let (rect, response) =
        ui.allocate_exact_size(egui::vec2(HOUR_LABEL_WIDTH, CELL_HEIGHT), sense);

    let color = if response.hovered() && !read_only {
        hover_color
    } else {
        text_color
    };
    ui.painter().text(
        rect.right_center() - egui::vec2(4.0, 0.0),
        egui::Align2::RIGHT_CENTER,
        HOUR_LABELS[hour],
        egui::FontId::proportional(13.0),
        color,
    );

    if !read_only {
        if response.hovered() {
            ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
        }
        if response.clicked() {
            out.toggled_hour = Some(hour);
        }
    }
}

/// One slot cell: tier fill, selection ring + dot, unanimous star, count
/// badge, blackout prohibit. Returns whether it was clicked.
fn render_cell(
    ui: &mut Ui,
    grid: &GridState,
    counts: &BTreeMap<Slot, u32>,
    consensus: &Consensus,
    slot: Slot,
    cell_width: f32,
    read_only: bool,
) -> bool {
    let sense = if read_only { Sense::hover() } else { Sense::click() };
    let (rect, response) = ui.allocate_exact_size(egui::vec2(cell_width, CELL_HEIGHT), sense);

    let selected = grid.is_selected(slot);
    let blackout = grid.is_blackout(slot);
    let count = counts.get(&slot).copied().unwrap_or(0);
    let tier = consensus.tier_for(counts, slot);

    let painter = ui.painter();
    let fill = if blackout { blackout_color() } else { tier_color(tier) };
    painter.rect_filled(rect, 4.0, fill);

    if selected {
        painter.rect_stroke(rect, 4.0, Stroke::new(1.5, accent_color()));
        painter.circle_filled(rect.min + egui::vec2(8.0, 8.0), 3.0, accent_color());
    } else if response.hovered() && !read_only {
        painter.rect_stroke(rect, 4.0, Stroke::new(1.0, Color32::from_rgb(120, 120, 112)));
    }

    if blackout {
        painter.text(
            rect.center(),
            egui::Align2::CENTER_CENTER,
            egui_phosphor::fill::PROHIBIT,
            egui::FontId::new(14.0, phosphor_fill_family()),
            Color32::from_rgb(108, 64, 64),
        );
    } else {
        if tier == Tier::Unanimous {
            painter.text(
                rect.center() - egui::vec2(10.0, 0.0),
                egui::Align2::CENTER_CENTER,
                egui_phosphor::fill::STAR,
                egui::FontId::new(13.0, phosphor_fill_family()),
                Color32::from_rgb(255, 222, 120),
            );
        }
        if count > 0 {
            painter.text(
                rect.right_bottom() - egui::vec2(5.0, 2.0),
                egui::Align2::RIGHT_BOTTOM,
                count.to_string(),
                egui::FontId::proportional(11.0),
                Color32::from_rgb(222, 222, 214),
            );
        }
    }

    if response.hovered() && !read_only {
        ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
    }

    response.clicked()
}

/// Color key under the grid.
pub fn render_legend(ui: &mut Ui, blackouts_shown: bool) {
    let entries = [
        (Tier::Unanimous, "everyone"),
        (Tier::FirstRank, "most common"),
        (Tier::SecondRank, "2nd"),
        (Tier::ThirdRank, "3rd"),
        (Tier::LowConsensus, "under 70%"),
    ];
    ui.horizontal_wrapped(|ui| {
        ui.spacing_mut().item_spacing.x = 6.0;
        for (tier, label) in entries {
            legend_swatch(ui, tier_color(tier), label);
            ui.add_space(8.0);
        }
        if blackouts_shown {
            legend_swatch(ui, blackout_color(), "blocked");
        }
    });
}

fn legend_swatch(ui: &mut Ui, color: Color32, label: &str) {
    let (rect, _) = ui.allocate_exact_size(egui::vec2(13.0, 13.0), Sense::hover());
    ui.painter().rect_filled(rect, 3.0, color);
    ui.label(RichText::new(label).size(12.0).color(Color32::from_rgb(150, 150, 144)));
}

/// Custom-painted button with the hover treatment used across the app.
pub fn painted_button(ui: &mut Ui, text: &str, enabled: bool) -> bool {
    let (btn_bg, btn_text) = button_colors();
    let btn_hover = Color32::from_rgb(80, 80, 74);
    let color = if enabled {
        btn_text
    } else {
        Color32::from_rgb(104, 104, 98)
    };
    let font_id = egui::FontId::proportional(15.0);
    let padding = egui::vec2(16.0, 8.0);
    let text_size = ui.fonts(|f| f.layout_no_wrap(text.to_string(), font_id.clone(), color).size());
    let sense = if enabled { Sense::click() } else { Sense::hover() };
    let (rect, response) = ui.allocate_exact_size(text_size + padding * 2.0, sense);
    let bg = if response.hovered() && enabled {
        btn_hover
    } else {
        btn_bg
    };
    ui.painter().rect_filled(rect, egui::Rounding::same(6.0), bg);
    ui.painter()
        .text(rect.center(), egui::Align2::CENTER_CENTER, text, font_id, color);
    if response.hovered() && enabled {
        ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
    }
    response.clicked() && enabled
}
