pub mod console;
pub mod events;
pub mod models;
pub mod theme;
