/// Where the player's name is remembered between sessions.
pub trait NameStore {
    fn saved_name(&self) -> Option<String>;
    fn save_name(&mut self, name: &str);
}

#[derive(Debug, Clone, Default)]
pub struct MemoryNameStore {
    name: Option<String>,
}

impl MemoryNameStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }
}

impl NameStore for MemoryNameStore {
    fn saved_name(&self) -> Option<String> {
        self.name.clone()
    }

    fn save_name(&mut self, name: &str) {
        self.name = Some(name.to_string());
    }
}
