// Game modules: config, characters, world

pub mod characters;
pub mod config;
pub mod world;
