mod complete;
mod intake;
mod state;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use complete::CompleteView;
pub use intake::IntakeView;
pub use state::{ViewError, ViewState, view_state_from_resource};
