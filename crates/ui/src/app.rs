use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use eframe::egui;
use perfdash_core::transport::HttpClient;
use perfdash_core::{DataTable, SummaryController};

use crate::http::UiHttpClient;
use crate::pages::{Page, dashboard_pages};

/// Main application state: one table + controller per dashboard page.
pub struct DashApp {
    client: UiHttpClient,
    pages: Vec<PageState>,
    active: usize,
}

struct PageState {
    page: Page,
    table: Rc<RefCell<DataTable>>,
    controller: SummaryController,
    filter_input: String,
}

impl DashApp {
    pub fn new(cc: &eframe::CreationContext<'_>, base_url: &str) -> Self {
        cc.egui_ctx.set_visuals(egui::Visuals::dark());

        let repaint_ctx = cc.egui_ctx.clone();
        let client = UiHttpClient::with_waker(Arc::new(move || repaint_ctx.request_repaint()));
        let shared: Rc<dyn HttpClient> = Rc::new(client.clone());

        let pages = dashboard_pages(base_url)
            .into_iter()
            .map(|page| {
                let table = Rc::new(RefCell::new(DataTable::new()));
                let controller = SummaryController::new(
                    Rc::clone(&table),
                    Rc::clone(&shared),
                    page.endpoint.clone(),
                    Arc::clone(&page.columns),
                );
                // Page-load trigger: fetch immediately, and apply the
                // filter once so a pre-filled value is honored.
                controller.request_remote_data();
                let filter_input = String::new();
                table.borrow_mut().set_filter(&filter_input);
                PageState {
                    page,
                    table,
                    controller,
                    filter_input,
                }
            })
            .collect();

        Self {
            client,
            pages,
            active: 0,
        }
    }

    fn controls(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            for (index, state) in self.pages.iter().enumerate() {
                ui.selectable_value(&mut self.active, index, state.page.title);
            }
            ui.separator();

            let state = &mut self.pages[self.active];
            if ui.button("Update").clicked() {
                state.controller.request_remote_data();
            }
            ui.label("Filter:");
            if ui.text_edit_singleline(&mut state.filter_input).changed() {
                state.table.borrow_mut().set_filter(&state.filter_input);
            }
            if self.client.in_flight() > 0 {
                ui.spinner();
            }
        });
    }

    fn table_grid(state: &PageState, ui: &mut egui::Ui) {
        // Snapshot the document so header clicks can mutate the table
        // without a live borrow.
        let document = state.table.borrow().document().clone();
        let sort = state
            .table
            .borrow()
            .sort_state()
            .map(|(attribute, ascending)| (attribute.to_owned(), ascending));

        egui::Grid::new(state.page.title)
            .striped(true)
            .min_col_width(80.0)
            .show(ui, |ui| {
                for cell in &document.header {
                    let marker = match &sort {
                        Some((attribute, true)) if *attribute == cell.attribute => " ▲",
                        Some((attribute, false)) if *attribute == cell.attribute => " ▼",
                        _ => "",
                    };
                    if ui
                        .button(format!("{}{marker}", cell.label))
                        .on_hover_text(format!("Sort by {}", cell.label))
                        .clicked()
                    {
                        state.table.borrow_mut().cycle_sort(&cell.attribute);
                    }
                }
                ui.end_row();

                for row in &document.body {
                    for cell in &row.cells {
                        ui.label(cell);
                    }
                    ui.end_row();
                }
            });
    }
}

impl eframe::App for DashApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Hand completed responses to their controllers before drawing.
        self.client.pump();

        egui::TopBottomPanel::top("perfdash-controls").show(ctx, |ui| {
            self.controls(ui);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let state = &self.pages[self.active];
            if state.table.borrow().document().is_empty() {
                ui.label("No data yet.");
                return;
            }
            egui::ScrollArea::both().show(ui, |ui| {
                Self::table_grid(state, ui);
            });
        });
    }
}
