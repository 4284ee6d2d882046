//! Command line front end of the EIS effective area calibration.
//!
//! - `ea`: print the effective area of a model at a date
//! - `calibrate`: rescale a preflight-calibrated observation to a model

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{ArgGroup, Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use eiscal::bands::Band;
use eiscal::{
    Config, EffectiveArea, EffectiveAreaModel, Model2014, Model2023, Observation, Options2023,
    PreflightEffectiveArea, WavelengthRequest, apply, create_reader,
};
use eiscal::reference::ReferenceReader;

const DEFAULT_CONFIG: &str = "./data/config/eiscal.json";

#[derive(Parser, Debug)]
#[command(name = "eiscal")]
#[command(about = "Hinode/EIS effective area and intensity calibration")]
#[command(version)]
struct Args {
    /// Configuration file
    #[arg(long, global = true, default_value = DEFAULT_CONFIG)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum EaModel {
    #[value(name = "2014")]
    Nrl2014,
    #[value(name = "2023")]
    Fit2023,
    Preflight,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum CalibrationModel {
    #[value(name = "2014")]
    Nrl2014,
    #[value(name = "2023")]
    Fit2023,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the effective area at a date
    #[command(group(ArgGroup::new("grid").args(["wavelength", "short", "long"])))]
    Ea {
        #[arg(short, long, value_enum, default_value = "2023")]
        model: EaModel,

        /// Observation date(s); the 2023 model takes exactly one
        #[arg(short, long, required = true, num_args = 1..)]
        date: Vec<String>,

        /// Wavelengths in Å
        #[arg(short, long, num_args = 1..)]
        wavelength: Vec<f64>,

        /// Use the short band default grid
        #[arg(long)]
        short: bool,

        /// Use the long band default grid
        #[arg(long)]
        long: bool,

        /// Print radcal values instead of effective areas (2023 model)
        #[arg(long)]
        radcal: bool,

        /// Do not warn about dates outside the fitted range (2023 model)
        #[arg(short, long)]
        quiet: bool,
    },

    /// Apply the calibration ratio to an observation file
    Calibrate {
        #[arg(short, long, value_enum, default_value = "2023")]
        model: CalibrationModel,

        /// Observation JSON file calibrated with the preflight effective area
        #[arg(short, long)]
        input: PathBuf,

        /// Output observation JSON file
        #[arg(short, long)]
        output: PathBuf,
    },
}

/// Reader over the configured reference files. Each model reads only the
/// files it needs, so a missing 2023 fit file only fails the 2023 model.
fn open_reader(config: &Config) -> Result<Box<dyn ReferenceReader>> {
    let paths = config
        .reference_paths()
        .context("Failed to locate the reference files")?;
    Ok(create_reader(paths)?)
}

fn request_from_args(wavelength: Vec<f64>, short: bool, long: bool) -> Result<WavelengthRequest> {
    if !wavelength.is_empty() {
        return Ok(WavelengthRequest::Values(wavelength));
    }

    let band = match (short, long) {
        (true, _) => Band::Short,
        (_, true) => Band::Long,
        _ => Band::None,
    };
    WavelengthRequest::grid(band).context("Select wavelengths with --wavelength, --short or --long")
}

fn print_effective_area(ea: &EffectiveArea, radcal: bool) {
    let unit = if radcal {
        "radcal [ergs/(sr cm^2 s) / (DN/s)]"
    } else {
        "effective area [cm^2]"
    };
    println!("wavelength [Å]  {}", unit);
    for (wavelength, value) in ea.iter() {
        println!("{:>14.3}  {:.6e}", wavelength, value);
    }
}

#[allow(clippy::too_many_arguments)]
fn cmd_ea(
    config: &Config,
    model: EaModel,
    date: Vec<String>,
    wavelength: Vec<f64>,
    short: bool,
    long: bool,
    radcal: bool,
    quiet: bool,
) -> Result<()> {
    let request = request_from_args(wavelength, short, long)?;
    let reader = open_reader(config)?;

    let ea = match model {
        EaModel::Fit2023 => {
            let model = Model2023::from_reader(reader.as_ref(), config.radcal())?;
            model.interpolate(date.as_slice(), &request, Options2023 { radcal, quiet })?
        }
        EaModel::Nrl2014 | EaModel::Preflight => {
            if radcal {
                bail!("--radcal is only available with the 2023 model");
            }
            let [date] = date.as_slice() else {
                bail!("Please input a single date (got {})", date.len());
            };
            let model: Box<dyn EffectiveAreaModel> = if model == EaModel::Nrl2014 {
                Box::new(Model2014::from_reader(reader.as_ref())?)
            } else {
                Box::new(PreflightEffectiveArea::from_reader(reader.as_ref())?)
            };
            model.effective_area(date, &request)?
        }
    };

    print_effective_area(&ea, radcal);
    Ok(())
}

fn read_observation(path: &Path) -> Result<Observation> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let observation = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(observation)
}

fn write_observation(path: &Path, observation: &Observation) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, observation)?;
    writer.flush()?;
    Ok(())
}

fn cmd_calibrate(
    config: &Config,
    model: CalibrationModel,
    input: &Path,
    output: &Path,
) -> Result<()> {
    let reader = open_reader(config)?;
    let preflight = PreflightEffectiveArea::from_reader(reader.as_ref())?;
    let model: Box<dyn EffectiveAreaModel> = match model {
        CalibrationModel::Nrl2014 => Box::new(Model2014::from_reader(reader.as_ref())?),
        CalibrationModel::Fit2023 => {
            Box::new(Model2023::from_reader(reader.as_ref(), config.radcal())?)
        }
    };

    let observation = read_observation(input)?;
    let calibrated = apply(&observation, &preflight, model.as_ref())?;
    write_observation(output, &calibrated)?;

    info!("Wrote calibrated observation to {}", output.display());
    Ok(())
}

fn main() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let args = Args::parse();
    let config = Config::from_file(&args.config)
        .with_context(|| format!("Failed to read configuration {}", args.config.display()))?;

    match args.command {
        Command::Ea {
            model,
            date,
            wavelength,
            short,
            long,
            radcal,
            quiet,
        } => cmd_ea(&config, model, date, wavelength, short, long, radcal, quiet),
        Command::Calibrate {
            model,
            input,
            output,
        } => cmd_calibrate(&config, model, &input, &output),
    }
}
