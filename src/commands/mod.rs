pub mod play;
pub mod report;
pub mod sample;

use std::path::PathBuf;

use anyhow::{Context, Result};
use fraction_drill::exercise_engine::{build_exercise, generator::kind_for_type_id, DifficultyConfig, ExerciseKind};

/// Built-in tiers, or the overrides in `path`.
pub fn load_config(path: Option<PathBuf>) -> Result<DifficultyConfig> {
    match path {
        Some(path) => DifficultyConfig::load(&path).with_context(|| format!("loading {}", path.display())),
        None => Ok(DifficultyConfig::default()),
    }
}

pub fn parse_kind(type_id: &str) -> Result<ExerciseKind> {
    kind_for_type_id(type_id)
        .with_context(|| format!("unknown exercise '{type_id}'; run `fraction-drill list` for the known ids"))
}

/// The `fraction-drill list` command.
pub fn list() -> Result<()> {
    let config = DifficultyConfig::default();
    for kind in ExerciseKind::all() {
        println!("{:<40} {kind}", build_exercise(kind, &config).exercise_type());
    }
    Ok(())
}
