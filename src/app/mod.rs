use std::collections::{HashMap, VecDeque};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Context, Pos2, Vec2};

use crate::data::{PassDataset, load_pass_dataset};

mod animation;
mod depth;
mod graph;
mod highlight;
mod physics;
mod projection;
mod render_utils;
mod ui;

use animation::AnimationClock;
use highlight::HighlightState;
use projection::{Projected, Rotation};

pub struct PassNetworkApp {
    data_file: String,
    state: AppState,
    reload_rx: Option<Receiver<Result<PassDataset, String>>>,
}

enum AppState {
    Loading {
        rx: Receiver<Result<PassDataset, String>>,
    },
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    dataset: PassDataset,
    team_id: String,
    date_start: usize,
    date_end: usize,
    search: String,
    selected: Option<String>,
    rotation: Rotation,
    auto_rotate: bool,
    preview_mode: bool,
    live_layout: bool,
    pan: Vec2,
    zoom: f32,
    clock: AnimationClock,
    scene_dirty: bool,
    scene_revision: u64,
    scene: Option<RenderScene>,
    highlight_cache: Option<HighlightCache>,
    show_fps_bar: bool,
    fps_current: f32,
    fps_samples: VecDeque<f32>,
    visible_player_count: usize,
    visible_edge_count: usize,
}

struct HighlightCache {
    selected: Option<String>,
    scene_revision: u64,
    state: HighlightState,
}

struct RenderScene {
    nodes: Vec<PlayerNode>,
    edges: Vec<PassEdge>,
    index_by_id: HashMap<String, usize>,
    max_assist_total: u32,
    max_pass_weight: u32,
    layout_scratch: LayoutScratch,
    frame: FrameScratch,
}

struct PlayerNode {
    id: String,
    name: String,
    assist_total: u32,
    world_pos: Vec2,
    velocity: Vec2,
    depth_seed: f32,
}

struct PassEdge {
    source: usize,
    target: usize,
    passes: u32,
    assists: u32,
}

#[derive(Default)]
struct LayoutScratch {
    forces: Vec<Vec2>,
}

#[derive(Default)]
struct FrameScratch {
    node_projections: Vec<Projected>,
    node_screen: Vec<Pos2>,
    node_radius_px: Vec<f32>,
    node_depths: Vec<f32>,
    node_order: Vec<usize>,
    edge_depths: Vec<f32>,
    edge_order: Vec<usize>,
}

impl PassNetworkApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, data_file: String) -> Self {
        let state = Self::start_load(data_file.clone());
        Self {
            data_file,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(data_file: String) -> Receiver<Result<PassDataset, String>> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = load_pass_dataset(&data_file).map_err(|error| format!("{error:#}"));
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(data_file: String) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(data_file),
        }
    }
}

impl eframe::App for PassNetworkApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                if let Ok(result) = rx.try_recv() {
                    transition = Some(match result {
                        Ok(dataset) => AppState::Ready(Box::new(ViewModel::new(dataset))),
                        Err(error) => AppState::Error(error),
                    });
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading pass data...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load pass data");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition = Some(Self::start_load(self.data_file.clone()));
                    }
                });
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                model.show(ctx, &self.data_file, &mut reload_requested, is_reloading);

                if reload_requested && self.reload_rx.is_none() {
                    self.reload_rx = Some(Self::spawn_load(self.data_file.clone()));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(result) => {
                            transition = Some(match result {
                                Ok(dataset) => AppState::Ready(Box::new(ViewModel::new(dataset))),
                                Err(error) => AppState::Error(error),
                            });
                        }
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                        }
                        Err(TryRecvError::Disconnected) => {
                            transition = Some(AppState::Error(
                                "Background load worker disconnected".to_owned(),
                            ));
                        }
                    }
                }
            }
        }

        if let Some(next_state) = transition {
            self.reload_rx = None;
            self.state = next_state;
        }
    }
}
