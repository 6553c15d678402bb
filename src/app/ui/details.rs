use eframe::egui::{self, Align, Layout, RichText, Ui};

use super::super::ViewModel;

struct PartnerRow {
    id: String,
    name: String,
    passes: u32,
    assists: u32,
}

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        ui.heading("Player Details");
        ui.separator();

        let mut pending_selection = None;

        {
            let Some(scene) = self.scene.as_ref() else {
                ui.label("No players in the current view.");
                return;
            };

            let selected_index = self
                .selected
                .as_ref()
                .and_then(|id| scene.index_by_id.get(id).copied());
            let Some(index) = selected_index else {
                ui.label("Click a player in the graph to inspect their passing profile.");
                return;
            };

            let node = &scene.nodes[index];
            ui.label(RichText::new(&node.name).strong().size(16.0));
            ui.label(format!("Assists: {}", node.assist_total));
            ui.add_space(6.0);

            let mut outgoing = Vec::new();
            let mut incoming = Vec::new();
            for edge in &scene.edges {
                if edge.source == index {
                    let target = &scene.nodes[edge.target];
                    outgoing.push(PartnerRow {
                        id: target.id.clone(),
                        name: target.name.clone(),
                        passes: edge.passes,
                        assists: edge.assists,
                    });
                } else if edge.target == index {
                    let source = &scene.nodes[edge.source];
                    incoming.push(PartnerRow {
                        id: source.id.clone(),
                        name: source.name.clone(),
                        passes: edge.passes,
                        assists: edge.assists,
                    });
                }
            }
            outgoing.sort_by(|a, b| b.passes.cmp(&a.passes));
            incoming.sort_by(|a, b| b.passes.cmp(&a.passes));

            let outgoing_click = draw_partner_rows(ui, "Passes to", "outgoing_rows", &outgoing);
            let incoming_click = draw_partner_rows(ui, "Passes from", "incoming_rows", &incoming);
            pending_selection = outgoing_click.or(incoming_click);
        }

        if pending_selection.is_some() {
            self.set_selected(pending_selection);
        }
    }
}

fn draw_partner_rows(
    ui: &mut Ui,
    title: &str,
    scroll_id: &'static str,
    rows: &[PartnerRow],
) -> Option<String> {
    let mut clicked = None;

    egui::CollapsingHeader::new(title)
        .default_open(true)
        .show(ui, |ui| {
            if rows.is_empty() {
                ui.label("none");
                return;
            }

            egui::ScrollArea::vertical()
                .id_salt(scroll_id)
                .max_height(180.0)
                .auto_shrink([false, true])
                .show(ui, |ui| {
                    for row in rows {
                        let row_response = ui
                            .horizontal(|ui| {
                                let selected = ui.selectable_label(false, &row.name).clicked();
                                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                                    ui.label(format!("{} P / {} A", row.passes, row.assists));
                                });
                                selected
                            })
                            .inner;

                        if row_response {
                            clicked = Some(row.id.clone());
                        }
                    }
                });
        });

    clicked
}
