//! egui rendering. Widgets read the state and call its setters; nothing here
//! computes results.

pub mod pages;
pub mod panels;
pub mod plot;
pub mod tables;
