use std::sync::Arc;

use glimpse_ui::{Notifier, UiHandle};

use crate::state::AppState;

/// Everything an activation needs, cheap to clone into its task
#[derive(Clone)]
pub struct ActivationContext {
    pub state: Arc<AppState>,
    pub ui: UiHandle,
    pub notifier: Notifier,
}

impl ActivationContext {
    pub fn new(state: Arc<AppState>, ui: UiHandle, notifier: Notifier) -> Self {
        Self {
            state,
            ui,
            notifier,
        }
    }
}
