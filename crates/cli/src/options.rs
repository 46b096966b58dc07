use hackjack_core::RunMode;
use std::path::PathBuf;

pub const DEFAULT_RUN_SEED: u64 = 0xC0FFEE;

pub const USAGE: &str = "usage: hackjack [--seed N] [--mode stage|survival] [--ascension 0-10] \
[--runs N] [--max-steps N] [--rollouts N] [--target-wave N] [--config PATH] [--trace DIR] [--verbose]";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliOptions {
    pub seed: u64,
    pub mode: RunMode,
    pub ascension: u8,
    pub runs: u32,
    pub max_steps: Option<u32>,
    pub rollouts: Option<u32>,
    pub target_wave: Option<u32>,
    pub config: Option<PathBuf>,
    pub trace: Option<PathBuf>,
    pub verbose: bool,
    pub help: bool,
}

impl Default for CliOptions {
    fn default() -> Self {
        Self {
            seed: DEFAULT_RUN_SEED,
            mode: RunMode::Stage,
            ascension: 0,
            runs: 1,
            max_steps: None,
            rollouts: None,
            target_wave: None,
            config: None,
            trace: None,
            verbose: false,
            help: false,
        }
    }
}

pub fn parse_cli_options(args: &[String]) -> Result<CliOptions, String> {
    let mut options = CliOptions::default();
    let mut idx = 0usize;
    while idx < args.len() {
        let flag = args[idx].as_str();
        match flag {
            "--verbose" | "-v" => options.verbose = true,
            "--help" | "-h" => options.help = true,
            "--seed" => options.seed = parse_value(flag, args.get(idx + 1))?,
            "--mode" => options.mode = parse_mode(value_of(flag, args.get(idx + 1))?)?,
            "--ascension" => {
                let level: u8 = parse_value(flag, args.get(idx + 1))?;
                if level > 10 {
                    return Err(format!("--ascension must be 0-10, got {level}"));
                }
                options.ascension = level;
            }
            "--runs" => {
                options.runs = parse_value(flag, args.get(idx + 1))?;
                if options.runs == 0 {
                    return Err("--runs must be at least 1".to_string());
                }
            }
            "--max-steps" => options.max_steps = Some(parse_value(flag, args.get(idx + 1))?),
            "--rollouts" => options.rollouts = Some(parse_value(flag, args.get(idx + 1))?),
            "--target-wave" => options.target_wave = Some(parse_value(flag, args.get(idx + 1))?),
            "--config" => {
                options.config = Some(PathBuf::from(value_of(flag, args.get(idx + 1))?));
            }
            "--trace" => options.trace = Some(PathBuf::from(value_of(flag, args.get(idx + 1))?)),
            other => return Err(format!("unknown argument: {other}")),
        }
        if takes_value(flag) {
            idx += 1;
        }
        idx += 1;
    }
    Ok(options)
}

fn takes_value(flag: &str) -> bool {
    !matches!(flag, "--verbose" | "-v" | "--help" | "-h")
}

fn value_of<'a>(flag: &str, value: Option<&'a String>) -> Result<&'a str, String> {
    value
        .map(String::as_str)
        .ok_or_else(|| format!("{flag} needs a value"))
}

fn parse_value<T: std::str::FromStr>(flag: &str, value: Option<&String>) -> Result<T, String> {
    let raw = value_of(flag, value)?;
    raw.parse::<T>()
        .map_err(|_| format!("invalid value for {flag}: {raw}"))
}

fn parse_mode(value: &str) -> Result<RunMode, String> {
    match value.to_ascii_lowercase().as_str() {
        "stage" => Ok(RunMode::Stage),
        "survival" | "endless" => Ok(RunMode::Survival),
        other => Err(format!("unknown mode: {other}")),
    }
}
