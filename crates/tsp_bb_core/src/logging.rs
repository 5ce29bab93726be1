use std::{fs::File, io::Write};

use env_logger::{Builder, Target, WriteStyle, fmt::Formatter};
use log::Record;

use crate::Result;
use crate::options::{LogFormat, SolverOptions};

/// Wires up the global logger for a solver run. Compact lines carry the
/// level and message only; pretty lines add the module target, which is
/// how `solve` and `search` output is told apart in long runs.
pub fn init_logger(options: &SolverOptions) -> Result<()> {
    let format = options.log_format;
    let timestamp = options.log_timestamp;

    Builder::new()
        .filter_level(options.log_level.to_filter())
        .write_style(WriteStyle::Never)
        .format(move |buf: &mut Formatter, record| write_line(buf, record, format, timestamp))
        .target(log_target(options)?)
        .try_init()
        .map_err(|e| crate::Error::other(format!("logger init failed: {e}")))
}

fn log_target(options: &SolverOptions) -> Result<Target> {
    let Some(log_path) = options.log_output_path() else {
        return Ok(Target::Stderr);
    };
    let log_file = File::create(log_path).map_err(|e| {
        crate::Error::other(format!(
            "failed to create log output file {}: {e}",
            log_path.display()
        ))
    })?;
    Ok(Target::Pipe(Box::new(log_file)))
}

fn write_line(
    buf: &mut Formatter,
    record: &Record<'_>,
    format: LogFormat,
    timestamp: bool,
) -> std::io::Result<()> {
    if timestamp {
        write!(buf, "{} ", buf.timestamp_millis())?;
    }
    let level = record.level().as_str();
    match format {
        LogFormat::Compact => writeln!(buf, "{level} {}", record.args()),
        LogFormat::Pretty => writeln!(buf, "{level} [{}] {}", record.target(), record.args()),
    }
}

#[cfg(test)]
mod tests {
    use super::log_target;
    use crate::options::SolverOptions;

    #[test]
    fn blank_log_output_targets_stderr() {
        let options = SolverOptions::default();
        assert!(log_target(&options).is_ok());
    }

    #[test]
    fn unwritable_log_output_is_reported() {
        let options = SolverOptions {
            log_output: String::from("/nonexistent-dir/run.log"),
            ..SolverOptions::default()
        };
        let Err(err) = log_target(&options) else {
            panic!("creating a log file in a missing directory must fail");
        };
        assert!(err.to_string().contains("failed to create log output file"));
    }
}
