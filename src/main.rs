mod cli;
mod report;

use anyhow::{Context, Result};
use binary_cnn::{BinaryCnn, Device, evaluate};
use clap::Parser;
use log::{debug, info};
use mem_weights::WeightSet;
use mnist_data::{Mnist01, Split};

use crate::cli::Cli;
use crate::report::fmt_report;

fn main() -> Result<()> {
    env_logger::init();
    let args = Cli::parse();

    let device = Device::default();
    println!("[Info] device={device}");
    debug!("seed={}; inference consumes no randomness", args.seed);

    let weights = WeightSet::load(&args.mem_dir).with_context(|| {
        format!("loading .mem weight dumps from {}", args.mem_dir.display())
    })?;
    let model = BinaryCnn::new(weights, device);

    let split = Split::from(args.split);
    let dataset = Mnist01::load(&args.data_dir, split).context("loading the MNIST 0/1 subset")?;
    info!(
        "evaluating {} samples in batches of {}",
        dataset.len(),
        args.batch_size
    );

    let metrics = evaluate(&model, dataset.batches(args.batch_size), args.threshold)
        .context("running the evaluation")?;

    print!("{}", fmt_report(split.tag(), &metrics));
    Ok(())
}
