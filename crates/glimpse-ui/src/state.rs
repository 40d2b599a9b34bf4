use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use glimpse_config::ui::UiConfig;

use crate::{ResultPopup, SelectorWindow};

/// Windows owned by the GUI thread. Closed windows are dropped on the next
/// event loop turn, never from inside their own callbacks.
pub struct UiState {
    pub config: UiConfig,
    /// Open overlay tagged with its id
    pub selector: RefCell<Option<(u64, SelectorWindow)>>,
    pub popups: RefCell<HashMap<u64, ResultPopup>>,
    next_id: Cell<u64>,
}

impl UiState {
    pub fn new(config: UiConfig) -> Self {
        Self {
            config,
            selector: RefCell::new(None),
            popups: RefCell::new(HashMap::new()),
            next_id: Cell::new(0),
        }
    }

    pub fn next_id(&self) -> u64 {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        id
    }

    /// Drop the overlay if it is still the one tagged `id`
    pub fn release_selector(&self, id: u64) {
        let mut selector = self.selector.borrow_mut();
        if selector.as_ref().is_some_and(|(open, _)| *open == id) {
            selector.take();
        }
    }
}
