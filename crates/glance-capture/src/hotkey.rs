use global_hotkey::{
    GlobalHotKeyEvent, GlobalHotKeyManager,
    hotkey::{Code, HotKey, Modifiers},
};

use crate::backend::CaptureError;

pub struct HotkeyManager {
    _manager: GlobalHotKeyManager,
    hotkey: HotKey,
}

impl HotkeyManager {
    /// Registers the manual-translate hotkey (Ctrl+Shift+G).
    pub fn new() -> Result<Self, CaptureError> {
        let manager =
            GlobalHotKeyManager::new().map_err(|e| CaptureError::Backend(e.to_string()))?;

        let hotkey = HotKey::new(Some(Modifiers::CONTROL | Modifiers::SHIFT), Code::KeyG);

        manager
            .register(hotkey)
            .map_err(|e| CaptureError::Backend(e.to_string()))?;

        Ok(Self {
            _manager: manager,
            hotkey,
        })
    }

    /// Check if the hotkey was pressed (non-blocking).
    pub fn poll(&self) -> bool {
        let receiver = GlobalHotKeyEvent::receiver();
        match receiver.try_recv() {
            Ok(event) => event.id == self.hotkey.id(),
            Err(_) => false,
        }
    }
}
