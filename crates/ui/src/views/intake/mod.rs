mod actions;
mod components;
mod state;
mod view;

pub use view::IntakeView;
