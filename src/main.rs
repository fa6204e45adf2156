use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{error, info};

use aspics::config::{ParametersFile, PathConfig};
use aspics::convert::DefaultConverter;
use aspics::engine::HeadlessEngine;
use aspics::error::AspicsError;
use aspics::pipeline::SnapshotPipeline;

#[derive(Parser, Debug)]
#[command(name = "aspics")]
#[command(about = "Assemble and run an agent-based epidemic simulation snapshot")]
struct Cli {
    /// Parameters file to use to configure the model
    #[arg(short, long)]
    parameters_file: PathBuf,

    /// Root folder holding preprocessed study-area data
    #[arg(long, default_value = "data/processed_data")]
    processed_data: PathBuf,
}

fn try_main(cli: &Cli) -> Result<(), AspicsError> {
    info!("reading parameters file: {}", cli.parameters_file.display());
    let parameters = ParametersFile::load(&cli.parameters_file)?;

    let pipeline = SnapshotPipeline::new(PathConfig::new(&cli.processed_data), DefaultConverter);
    let mut engine = HeadlessEngine;
    let result = pipeline.run(
        &mut engine,
        &parameters.simulation,
        parameters.calibration.as_ref(),
        parameters.disease.as_ref(),
        &cli.parameters_file,
    )?;

    if let Some(result) = result {
        info!("simulation finished after {} iterations", result.iterations_completed);
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match try_main(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            error!("{error}");
            ExitCode::FAILURE
        }
    }
}
