use white_tile::NameStore;

const NAME_KEY: &str = "name";

/// Player name kept in `localStorage`.
pub struct LocalStorageNames {
    storage: Option<web_sys::Storage>,
}

impl LocalStorageNames {
    pub fn new() -> Self {
        let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten());
        if storage.is_none() {
            log::warn!("localStorage unavailable, the player name will not be remembered");
        }
        Self { storage }
    }
}

impl Default for LocalStorageNames {
    fn default() -> Self {
        Self::new()
    }
}

impl NameStore for LocalStorageNames {
    fn saved_name(&self) -> Option<String> {
        self.storage.as_ref()?.get_item(NAME_KEY).ok().flatten()
    }

    fn save_name(&mut self, name: &str) {
        let Some(storage) = &self.storage else {
            return;
        };
        if let Err(err) = storage.set_item(NAME_KEY, name) {
            log::warn!("could not save player name: {:?}", err);
        }
    }
}
