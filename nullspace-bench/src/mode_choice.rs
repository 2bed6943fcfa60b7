use clap::ValueEnum;
use nullspace_core::{NullSpaceSettings, ParallelMode};

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum ModeChoice {
    Auto,
    Serial,
    Parallel,
}

impl From<ModeChoice> for ParallelMode {
    fn from(choice: ModeChoice) -> Self {
        match choice {
            ModeChoice::Auto => ParallelMode::Auto,
            ModeChoice::Serial => ParallelMode::Serial,
            ModeChoice::Parallel => ParallelMode::Parallel,
        }
    }
}

pub fn settings_for(threshold: f64, mode: ModeChoice) -> NullSpaceSettings {
    NullSpaceSettings::default()
        .with_threshold(threshold)
        .with_parallel(mode.into())
}
