pub mod settings;

pub use settings::{Automation, Settings};
