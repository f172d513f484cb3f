use crate::statics;
use crate::{LoadedSave, VarValue};
use eframe::egui;
use egui_extras::{Column, TableBuilder};
use std::{path::PathBuf, sync::OnceLock};

pub fn run_gui() -> eframe::Result {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1000.0, 700.0]),
        ..Default::default()
    };
    let title = format!("{} {}", statics::EN_APP_TITLE, env!("CARGO_PKG_VERSION"));
    eframe::run_native(
        &title,
        options,
        Box::new(|_cc| {
            Ok(Box::new(SuzedApp {
                theme_dark: true,
                ..Default::default()
            }))
        }),
    )
}

/// The main application state and GUI logic.
/// Owns the LoadedSave and the UI state (search filter, status, errors).
#[derive(Default)]
struct SuzedApp {
    save: Option<LoadedSave>,
    dialog_dir: Option<PathBuf>,
    search_query: String,
    status: String,
    last_error: Option<String>,
    about_open: bool,
    theme_dark: bool,
}

impl SuzedApp {
    fn default_save_dir() -> Option<PathBuf> {
        let home = std::env::var_os("USERPROFILE")
            .or_else(|| std::env::var_os("HOME"))
            .map(PathBuf::from)?;

        Some(
            home.join("AppData")
                .join("LocalLow")
                .join(statics::SZ_SAVE_DIR_PUBLISHER)
                .join(statics::SZ_SAVE_DIR_GAME),
        )
    }

    fn initial_dialog_dir() -> Option<PathBuf> {
        static CACHED: OnceLock<Option<PathBuf>> = OnceLock::new();
        CACHED.get_or_init(Self::default_save_dir).clone()
    }

    fn file_dialog(&self) -> rfd::FileDialog {
        let mut dlg = rfd::FileDialog::new().add_filter(statics::EN_FILTER_SAVE, &["json"]);

        if let Some(dir) = self.dialog_dir.clone().or_else(Self::initial_dialog_dir) {
            dlg = dlg.set_directory(dir);
        }

        dlg
    }

    fn open_file(&mut self) {
        let Some(path) = self.file_dialog().pick_file() else {
            return;
        };

        match LoadedSave::load_path(&path) {
            Ok(save) => {
                self.dialog_dir = path.parent().map(PathBuf::from);
                self.status = format!("Loaded {}", path.display());
                self.search_query.clear();
                self.save = Some(save);
                self.last_error = None;
            }
            Err(e) => {
                self.last_error = Some(format!("Failed to load: {e:#}"));
            }
        }
    }

    /// Overwrite the loaded file in place; the session copies the previous
    /// contents to `<name>.bak` first.
    fn save_file(&mut self) {
        let Some(save) = self.save.as_mut() else {
            return;
        };
        let Some(path) = save.source_path.clone() else {
            return;
        };

        if let Err(e) = save.save_to_path(&path) {
            self.last_error = Some(format!("Failed to save: {e:#}"));
        } else {
            self.status = format!("Saved {}", path.display());
            self.last_error = None;
        }
    }

    fn save_file_as(&mut self) {
        let mut dlg = self.file_dialog();
        if let Some(save) = self.save.as_ref()
            && let Some(source_path) = save.source_path.as_ref()
            && let Some(file_name) = source_path.file_name()
        {
            dlg = dlg.set_file_name(file_name.to_string_lossy());
        }

        let Some(path) = dlg.save_file() else {
            return;
        };

        let Some(save) = self.save.as_mut() else {
            return;
        };

        if let Err(e) = save.save_to_path(&path) {
            self.last_error = Some(format!("Failed to save: {e:#}"));
        } else {
            self.dialog_dir = path.parent().map(PathBuf::from);
            self.status = format!("Saved {}", path.display());
            self.last_error = None;
        }
    }

    fn render_vars_table(&mut self, ui: &mut egui::Ui, save: &mut LoadedSave) {
        let query = self.search_query.trim().to_lowercase();
        let rows: Vec<(String, VarValue)> = save
            .vars
            .iter()
            .filter(|(k, _)| query.is_empty() || k.to_lowercase().contains(&query))
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();

        if rows.is_empty() {
            ui.label(statics::EN_SEARCH_NO_MATCHES);
            return;
        }

        let row_h = ui.text_style_height(&egui::TextStyle::Body) + 6.0;
        let mut pending: Vec<(String, VarValue)> = Vec::new();
        let mut quote_rejected = false;

        ui.push_id("vars_table", |ui| {
            TableBuilder::new(ui)
                .striped(true)
                .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
                .column(Column::initial(420.0).resizable(true))
                .column(Column::initial(70.0).resizable(false))
                .column(Column::remainder().resizable(true))
                .header(row_h, |mut header| {
                    header.col(|ui| {
                        ui.strong(statics::EN_COL_KEY);
                    });
                    header.col(|ui| {
                        ui.strong(statics::EN_COL_TYPE);
                    });
                    header.col(|ui| {
                        ui.strong(statics::EN_COL_VALUE);
                    });
                })
                .body(|body| {
                    body.rows(row_h, rows.len(), |mut row| {
                        let (key, value) = &rows[row.index()];
                        row.col(|ui| {
                            ui.monospace(key);
                        });
                        row.col(|ui| {
                            ui.label(value.type_name());
                        });
                        row.col(|ui| match value {
                            VarValue::Bool(v) => {
                                let mut tmp = *v;
                                if ui.checkbox(&mut tmp, statics::EN_EMPTY).changed() {
                                    pending.push((key.clone(), VarValue::Bool(tmp)));
                                }
                            }
                            VarValue::Int(v) => {
                                let mut tmp = *v;
                                if ui.add(egui::DragValue::new(&mut tmp).speed(1)).changed() {
                                    pending.push((key.clone(), VarValue::Int(tmp)));
                                }
                            }
                            VarValue::Text(s) => {
                                let mut tmp = s.clone();
                                if ui
                                    .add(
                                        egui::TextEdit::singleline(&mut tmp)
                                            .desired_width(ui.available_width()),
                                    )
                                    .changed()
                                {
                                    // The format cannot escape a double quote, so one
                                    // here would corrupt the block on encode.
                                    if tmp.contains('"') {
                                        quote_rejected = true;
                                    } else {
                                        pending.push((key.clone(), VarValue::Text(tmp)));
                                    }
                                }
                            }
                        });
                    });
                });
        });

        for (key, value) in pending {
            if save.vars.set(&key, value) {
                save.mark_dirty();
                self.status = format!("Updated {key}");
            }
        }
        if quote_rejected {
            self.last_error = Some(statics::EN_ERR_QUOTE_IN_TEXT.to_string());
        }
    }
}

impl eframe::App for SuzedApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                if ui.button(statics::EN_BTN_OPEN).clicked() {
                    self.open_file();
                }

                let has_save = self.save.is_some();
                if ui
                    .add_enabled(has_save, egui::Button::new(statics::EN_BTN_SAVE))
                    .clicked()
                {
                    self.save_file();
                }
                if ui
                    .add_enabled(has_save, egui::Button::new(statics::EN_BTN_SAVE_AS))
                    .clicked()
                {
                    self.save_file_as();
                }

                if ui.button(statics::EN_BTN_ABOUT).clicked() {
                    self.about_open = true;
                }

                if ui.button(statics::EN_BTN_TOGGLE_THEME).clicked() {
                    self.theme_dark = !self.theme_dark;
                    if self.theme_dark {
                        ctx.set_visuals(egui::Visuals::dark());
                    } else {
                        ctx.set_visuals(egui::Visuals::light());
                    }
                }

                if let Some(save) = self.save.as_ref()
                    && save.dirty
                {
                    ui.separator();
                    ui.colored_label(ui.visuals().warn_fg_color, statics::EN_BADGE_MODIFIED);
                }

                if !self.status.is_empty() {
                    ui.separator();
                    ui.label(&self.status);
                }
            });
        });

        if self.about_open {
            let mut open = self.about_open;
            egui::Window::new(statics::EN_WINDOW_ABOUT)
                .collapsible(false)
                .open(&mut open)
                .show(ctx, |ui| {
                    ui.heading(statics::EN_ABOUT_HEADING);
                    ui.label(format!(
                        "{} {}",
                        statics::EN_ABOUT_VERSION,
                        env!("CARGO_PKG_VERSION")
                    ));
                    ui.separator();
                    ui.label(statics::EN_ABOUT_BACKUPS);
                });
            self.about_open = open;
        }

        if let Some(err) = self.last_error.clone() {
            egui::TopBottomPanel::top("error_bar").show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.colored_label(egui::Color32::RED, err);
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.small_button(statics::EN_BTN_CLEAR).clicked() {
                            self.last_error = None;
                        }
                    });
                });
            });
        }

        if self.save.is_none() {
            egui::CentralPanel::default().show(ctx, |ui| {
                ui.heading(statics::EN_HOME_HEADING);
                ui.label(statics::EN_HOME_INSTRUCTIONS);
            });
            return;
        }

        let mut save = self.save.take().expect("checked above");

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(statics::EN_LABEL_SEARCH);
                ui.add(
                    egui::TextEdit::singleline(&mut self.search_query)
                        .hint_text(statics::EN_HINT_SEARCH),
                );
                if ui.small_button(statics::EN_BTN_CLEAR).clicked() {
                    self.search_query.clear();
                }
                ui.separator();
                ui.label(format!(
                    "{} {}",
                    statics::EN_LABEL_VARIABLES_COUNT,
                    save.vars.len()
                ));
            });
            ui.separator();

            self.render_vars_table(ui, &mut save);
        });

        self.save = Some(save);
    }
}
