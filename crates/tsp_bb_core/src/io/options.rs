use std::{
    env,
    path::{Path, PathBuf},
};

use log::LevelFilter;
use tsp_bb_derive::{CliOptions, CliValue, KvDisplay};

use crate::{Error, Result};

/// Runtime options for one solver run.
#[derive(Clone, Debug, CliOptions, KvDisplay)]
pub struct SolverOptions {
    /// Number of shortest candidate edges examined per search node once a
    /// solution exists below it. A value >= the city count disables the
    /// heuristic and yields the exact optimum.
    #[cli(long = "breadth-limit")]
    pub breadth_limit: usize,
    /// Opaque label used only for naming the output file.
    #[cli(long = "run-label")]
    pub run_label: String,
    /// Directory the CSV snapshots are written into.
    #[cli(long = "output-dir")]
    #[kv(fmt = "path")]
    pub output_dir: PathBuf,
    /// Optional input file path for city records. Empty means stdin.
    #[cli(long = "input")]
    pub input: String,
    /// Structured logging level.
    #[cli(long = "log-level", parse_with = "LogLevel::parse")]
    pub log_level: LogLevel,
    /// Logging output format.
    #[cli(long = "log-format", parse_with = "LogFormat::parse")]
    pub log_format: LogFormat,
    /// Include timestamps in log lines.
    pub log_timestamp: bool,
    /// Optional output file path for logs. Empty means stderr.
    #[cli(long = "log-output")]
    pub log_output: String,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, CliValue)]
#[cli_value(option = "log-level")]
pub enum LogLevel {
    Error,
    #[cli(alias = "warning")]
    Warn,
    Info,
    Debug,
    Trace,
    Off,
}

impl LogLevel {
    pub fn to_filter(self) -> LevelFilter {
        match self {
            Self::Error => LevelFilter::Error,
            Self::Warn => LevelFilter::Warn,
            Self::Info => LevelFilter::Info,
            Self::Debug => LevelFilter::Debug,
            Self::Trace => LevelFilter::Trace,
            Self::Off => LevelFilter::Off,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, CliValue)]
#[cli_value(option = "log-format")]
pub enum LogFormat {
    Compact,
    Pretty,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            breadth_limit: 5,
            run_label: String::from("run"),
            output_dir: PathBuf::from("output"),
            input: String::new(),
            log_level: LogLevel::Warn,
            log_format: LogFormat::Compact,
            log_timestamp: true,
            log_output: String::new(),
        }
    }
}

impl SolverOptions {
    pub fn from_args() -> Result<Self> {
        Self::parse_from_iter(env::args().skip(1))
    }

    fn parse_from_iter<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut options = Self::default();
        let mut args = args
            .into_iter()
            .map(|arg| arg.as_ref().to_owned())
            .peekable();

        while let Some(arg) = args.next() {
            if arg == "--help" || arg == "-h" {
                return Err(Error::invalid_input(Self::usage()));
            }

            let Some(raw_name) = arg.strip_prefix("--") else {
                return Err(Error::invalid_input(format!(
                    "Unexpected argument: {arg}\n\n{}",
                    Self::usage()
                )));
            };
            if raw_name.is_empty() {
                return Err(Error::invalid_input(format!(
                    "Invalid option name: {arg}\n\n{}",
                    Self::usage()
                )));
            }

            let (name, value) = Self::split_arg(raw_name, &mut args);
            if options.apply_cli_option(&name, value.clone())? {
                continue;
            }

            match name.as_str() {
                "log-timestamp" => {
                    options.log_timestamp = match value {
                        Some(v) => parse_bool(&name, &v)?,
                        None => true,
                    };
                }
                "no-log-timestamp" => {
                    if value.is_some() {
                        return Err(Error::invalid_input(format!(
                            "Flag --{name} does not take a value"
                        )));
                    }
                    options.log_timestamp = false;
                }
                _ => {
                    return Err(Error::invalid_input(format!(
                        "Unknown option: --{name}\n\n{}",
                        Self::usage()
                    )));
                }
            }
        }

        if options.breadth_limit == 0 {
            return Err(Error::invalid_input(
                "--breadth-limit must be a positive integer",
            ));
        }

        Ok(options)
    }

    pub fn usage() -> &'static str {
        concat!(
            "Usage:\n",
            "  tsp-bb [options] --input cities.txt\n",
            "  tsp-bb [options] < cities.txt\n\n",
            "Options:\n",
            "  --breadth-limit <usize>  candidate edges per node once a solution exists\n",
            "                           (>= city count searches exhaustively)\n",
            "  --run-label <name>       output file label\n",
            "  --output-dir <path>\n",
            "  --input <path>\n",
            "  --log-level <error|warn|info|debug|trace|off>\n",
            "  --log-format <compact|pretty>\n",
            "  --log-timestamp[=<bool>]\n",
            "  --no-log-timestamp\n",
            "  --log-output <path>\n",
            "  --help\n",
            "\n",
            "Examples:\n",
            "  tsp-bb --breadth-limit 4 --run-label uruguay --input uy734.tsp.txt\n",
            "  tsp-bb --breadth-limit=1000 --log-level=info < fifteen.txt\n",
        )
    }

    pub fn input_path(&self) -> Option<&Path> {
        let input = self.input.trim();
        if input.is_empty() || input == "-" {
            None
        } else {
            Some(Path::new(input))
        }
    }

    pub fn log_output_path(&self) -> Option<&Path> {
        let log_output = self.log_output.trim();
        if log_output.is_empty() || log_output == "-" {
            None
        } else {
            Some(Path::new(log_output))
        }
    }
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value {
        "1" | "true" | "TRUE" | "True" | "yes" | "YES" | "on" | "ON" => Ok(true),
        "0" | "false" | "FALSE" | "False" | "no" | "NO" | "off" | "OFF" => Ok(false),
        _ => Err(Error::invalid_input(format!(
            "Invalid boolean for --{name}: {value} (expected true/false)"
        ))),
    }
}
