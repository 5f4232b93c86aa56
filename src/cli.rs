use std::num::NonZeroUsize;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use mnist_data::Split;

/// Evaluate a tiny binary CNN initialized from Verilog .mem dumps on the
/// MNIST digits {0, 1}.
#[derive(Debug, Parser)]
#[command(version)]
pub struct Cli {
    /// Directory with conv_w.mem/conv_b.mem/fc_w.mem/fc_b.mem
    #[arg(long, default_value = ".")]
    pub mem_dir: PathBuf,

    /// Directory for MNIST data
    #[arg(long, default_value = "./data")]
    pub data_dir: PathBuf,

    /// Samples per evaluation batch
    #[arg(long, default_value_t = NonZeroUsize::new(512).unwrap())]
    pub batch_size: NonZeroUsize,

    /// Decision threshold on sigmoid(logit)
    #[arg(long, default_value_t = 0.5)]
    pub threshold: f32,

    /// Seed for incidental randomness; inference itself consumes none
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Dataset split to evaluate
    #[arg(long, value_enum, default_value_t = SplitArg::Test)]
    pub split: SplitArg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SplitArg {
    Train,
    Test,
}

impl From<SplitArg> for Split {
    fn from(arg: SplitArg) -> Self {
        match arg {
            SplitArg::Train => Split::Train,
            SplitArg::Test => Split::Test,
        }
    }
}

#[cfg(test)]
mod test {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["memnet-eval"]);
        assert_eq!(cli.mem_dir, PathBuf::from("."));
        assert_eq!(cli.data_dir, PathBuf::from("./data"));
        assert_eq!(cli.batch_size.get(), 512);
        assert_eq!(cli.threshold, 0.5);
        assert_eq!(cli.seed, 42);
        assert_eq!(cli.split, SplitArg::Test);
    }

    #[test]
    fn test_flags_override_defaults() {
        let cli = Cli::parse_from([
            "memnet-eval",
            "--mem-dir",
            "/tmp/mems",
            "--batch-size",
            "64",
            "--threshold",
            "0.9",
            "--split",
            "train",
        ]);
        assert_eq!(cli.mem_dir, PathBuf::from("/tmp/mems"));
        assert_eq!(cli.batch_size.get(), 64);
        assert_eq!(cli.threshold, 0.9);
        assert_eq!(cli.split, SplitArg::Train);
    }
}
