use log::debug;

/// Minimal history contract the navigation core depends on: the current
/// location and an imperative push. Embedders with a real routing layer
/// implement this over their own history stack.
pub trait History: Send {
    fn current_path(&self) -> String;
    fn push(&mut self, path: &str);
}

/// In-memory location stack. Backs the demo runtime and the tests.
#[derive(Debug, Clone)]
pub struct MemoryHistory {
    stack: Vec<String>,
}

impl MemoryHistory {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            stack: vec![initial.into()],
        }
    }

    /// All locations pushed so far, oldest first.
    pub fn entries(&self) -> &[String] {
        &self.stack
    }
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::new("/")
    }
}

impl History for MemoryHistory {
    fn current_path(&self) -> String {
        self.stack
            .last()
            .cloned()
            .unwrap_or_else(|| "/".to_string())
    }

    fn push(&mut self, path: &str) {
        debug!("history push: {}", path);
        self.stack.push(path.to_string());
    }
}
