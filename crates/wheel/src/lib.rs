pub mod config;
pub mod events;
pub mod menu;
pub mod sys;
