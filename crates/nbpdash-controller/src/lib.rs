pub mod connection;
pub mod controller;
pub mod state;

#[cfg(test)]
mod testing;

pub use controller::{DashboardController, UiEvent};
