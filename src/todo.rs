use serde::{Deserialize, Serialize};

/// Title given to every todo sent during a benchmark
pub const BENCHMARK_TITLE: &str = "test";

/// Payload sent to the todo API. The title travels as `text` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    pub id: u64,
    #[serde(rename = "text")]
    pub title: String,
    pub completed: bool,
}

impl TodoItem {
    pub fn new(id: u64, title: &str, completed: bool) -> Self {
        Self {
            id,
            title: title.to_string(),
            completed,
        }
    }
}

/// Monotonic id source owned by a single trial.
#[derive(Debug, Default)]
pub struct IdGenerator {
    current: u64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances the counter and returns the new value; the first id is 1.
    pub fn next_id(&mut self) -> u64 {
        self.current += 1;
        self.current
    }

    pub fn current(&self) -> u64 {
        self.current
    }
}

/// Produces a fresh todo per iteration from the trial's id generator.
#[derive(Debug)]
pub struct RequestBuilder {
    ids: IdGenerator,
    title: String,
    completed: bool,
}

impl RequestBuilder {
    pub fn new(ids: IdGenerator) -> Self {
        Self {
            ids,
            title: BENCHMARK_TITLE.to_string(),
            completed: false,
        }
    }

    pub fn next_item(&mut self) -> TodoItem {
        TodoItem::new(self.ids.next_id(), &self.title, self.completed)
    }

    /// Number of items produced so far in this trial
    pub fn issued(&self) -> u64 {
        self.ids.current()
    }
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::new(IdGenerator::new())
    }
}
