// File: ./src/model/mod.rs
pub mod duration;
pub mod issue;
pub mod item;
pub mod parser;

pub use duration::{DurationLabel, DurationTable, label_for_duration, resolve};
pub use item::{RawTask, Task, TaskDraft, search_tasks};
pub use parser::{LinkPair, ParseError, ParsedContent, parse, process_links, render, summary};
