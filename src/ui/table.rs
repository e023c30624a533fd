use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use crate::view::{TableView, TABLE_COLUMNS};

// ---------------------------------------------------------------------------
// Data table (central panel)
// ---------------------------------------------------------------------------

/// Render the filtered rows with a leading 0-based index column.
pub fn data_table(ui: &mut Ui, table: &TableView) {
    if table.is_empty() {
        ui.label("No rows match the current selection.");
        return;
    }

    TableBuilder::new(ui)
        .striped(true)
        .vscroll(false)
        .column(Column::auto().at_least(32.0))
        .columns(Column::auto().at_least(80.0), TABLE_COLUMNS.len())
        .header(20.0, |mut header| {
            header.col(|ui| {
                ui.strong("");
            });
            for name in TABLE_COLUMNS {
                header.col(|ui| {
                    ui.strong(name);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, table.len(), |mut row| {
                let Some(cells) = table.row_cells(row.index()) else {
                    return;
                };
                for cell in cells {
                    row.col(|ui| {
                        ui.label(cell);
                    });
                }
            });
        });
}
