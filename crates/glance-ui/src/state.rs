use slint::ComponentHandle;

use crate::FloatingWindow;

/// Ownership of the optional floating result window.
#[derive(Default)]
pub struct DetachedState {
    pub window: Option<FloatingWindow>,
}

impl DetachedState {
    pub fn close(&mut self) {
        if let Some(window) = self.window.take() {
            let _ = window.hide();
        }
    }
}
