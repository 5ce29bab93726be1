use std::time::Instant;

use log::info;

use tsp_bb_core::{Result, SolverOptions, logging, read_cities, solve};

fn main() -> Result<()> {
    let now = Instant::now();
    let options = SolverOptions::from_args()?;
    logging::init_logger(&options)?;

    let records = read_cities(options.input_path())?;

    info!("options: {options}");
    info!("input: n={}", records.len());

    let report = solve(&records, &options)?;

    println!("{}", report.best_length);
    println!("{}", report.output_path.display());

    info!(
        "done: improvements={} time={:.2}s",
        report.improvements,
        now.elapsed().as_secs_f32()
    );

    Ok(())
}
