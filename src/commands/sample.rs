//! The `fraction-drill sample` command.

use std::path::PathBuf;

use anyhow::Result;
use fraction_drill::exercise_engine::{generate_sample, SampleRequest};

use super::{load_config, parse_kind};

pub fn execute(exercise: String, seed: Option<u64>, json: bool, config: Option<PathBuf>) -> Result<()> {
    let config = load_config(config)?;
    let request = SampleRequest { kind: parse_kind(&exercise)?, rng_seed: seed };
    let sample = generate_sample(&request, &config)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&sample)?);
    } else {
        println!("[{}]", sample.exercise_type);
        println!("{}", sample.rendered);
        println!("Answer: {}", sample.question.correct);
    }
    Ok(())
}
