use std::collections::HashMap;
use std::sync::Arc;

use log::info;

use crate::error::{Error, Result};

use super::Task;

/// Tasks available to a process, registered explicitly at startup.
#[derive(Default)]
pub struct TaskRegistry {
    tasks: HashMap<String, Arc<dyn Task>>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, task: Arc<dyn Task>) -> Result<()> {
        let name = task.name().to_string();
        if self.tasks.contains_key(&name) {
            return Err(Error::TaskError(format!("{}: task already registered", name)));
        }

        info!("registered task {}", name);
        self.tasks.insert(name, task);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Task>> {
        self.tasks.get(name).cloned()
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tasks.keys().map(String::as_str).collect();
        names.sort();
        names
    }

    pub async fn dispatch(&self, name: &str, args: serde_json::Value) -> Result<serde_json::Value> {
        let task = self
            .get(name)
            .ok_or_else(|| {
                Error::TaskError(format!(
                    "{}: no such task, registered: [{}]",
                    name,
                    self.names().join(", ")
                ))
            })?;
        task.run(args).await
    }
}
