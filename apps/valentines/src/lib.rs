use wasm_bindgen::prelude::*;
use lovegrid_engine::*;

pub mod config;
pub mod game;
pub mod lattice;
pub mod layout;
pub mod messages;
pub mod overlay;
pub mod pointer;
pub mod twinkle;
pub mod visibility;
use game::ValentineGrid;

lovegrid_web::export_game!(ValentineGrid, "valentines");
