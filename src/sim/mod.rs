mod components;
mod player;
mod systems;
mod tic;

pub use components::{Billboard, Collectible, InputCmd, Monster, Position};
pub use player::Player;
pub use systems::{
    billboard_positions, caught, chase, collect, enrage, nearest_monster, pick_texture,
    spawn_collectible, spawn_monster, sprite_records,
};
pub use tic::{DT, SIM_FPS, Status, TicRunner};
