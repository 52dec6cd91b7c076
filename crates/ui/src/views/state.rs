use dioxus::prelude::*;

use services::IntakeError;

/// Why a view could not load its data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewError {
    /// The local store could not be read.
    StoreUnavailable,
    Unknown,
}

impl ViewError {
    #[must_use]
    pub fn message(&self) -> &'static str {
        match self {
            Self::StoreUnavailable => {
                "Your saved answers could not be loaded. Please restart and try again."
            }
            Self::Unknown => "Something went wrong. Please try again.",
        }
    }
}

impl From<&IntakeError> for ViewError {
    fn from(err: &IntakeError) -> Self {
        match err {
            IntakeError::Storage(_) => Self::StoreUnavailable,
            _ => Self::Unknown,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Ready(T),
    Error(ViewError),
}

/// Collapse a resource into the four states every view renders.
#[must_use]
pub fn view_state_from_resource<T: Clone>(
    resource: &Resource<Result<T, ViewError>>,
) -> ViewState<T> {
    match resource.state().cloned() {
        UseResourceState::Pending => ViewState::Loading,
        UseResourceState::Ready => match resource.value().read().as_ref() {
            Some(Ok(data)) => ViewState::Ready(data.clone()),
            Some(Err(err)) => ViewState::Error(*err),
            None => ViewState::Error(ViewError::Unknown),
        },
        UseResourceState::Paused | UseResourceState::Stopped => ViewState::Idle,
    }
}
