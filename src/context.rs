// File: ./src/context.rs
//! Where task-tools keeps its `config.toml`.
//!
//! Anything that reads or writes the config takes a `&dyn AppContext`, so the
//! binary and the tests can point at different directories.
use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use std::fs;
use std::path::PathBuf;

const CONFIG_FILE: &str = "config.toml";

pub trait AppContext: Send + Sync + std::fmt::Debug {
    /// Directory holding the config file. Created on first use.
    fn get_config_dir(&self) -> Result<PathBuf>;

    fn get_config_file_path(&self) -> Result<PathBuf> {
        Ok(self.get_config_dir()?.join(CONFIG_FILE))
    }
}

fn create_dir(path: PathBuf) -> Result<PathBuf> {
    fs::create_dir_all(&path)
        .with_context(|| format!("Failed to create config directory {}", path.display()))?;
    Ok(path)
}

/// Platform config directory, or `<root>/config` when `--root` is given.
#[derive(Clone, Debug)]
pub struct StandardContext {
    override_root: Option<PathBuf>,
}

impl StandardContext {
    pub fn new(override_root: Option<PathBuf>) -> Self {
        Self { override_root }
    }
}

impl AppContext for StandardContext {
    fn get_config_dir(&self) -> Result<PathBuf> {
        let dir = match &self.override_root {
            Some(root) => root.join("config"),
            None => ProjectDirs::from("com", "task-tools", "task-tools")
                .ok_or_else(|| anyhow!("Cannot locate a home directory for the config"))?
                .config_dir()
                .to_path_buf(),
        };
        create_dir(dir)
    }
}

/// Throwaway config root under the system temp dir, deleted on drop.
#[derive(Clone, Debug)]
pub struct TestContext {
    pub root: PathBuf,
}

impl TestContext {
    pub fn new() -> Self {
        let root = std::env::temp_dir().join(format!("task_tools_test_{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&root).expect("failed to create TestContext temp dir");
        Self { root }
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl AppContext for TestContext {
    fn get_config_dir(&self) -> Result<PathBuf> {
        create_dir(self.root.join("config"))
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.root);
    }
}
