//! grayslab - run the gray atmosphere energy balance model
//!
//! # Usage
//!
//! ```bash
//! cargo run -p grayslab-cli -- --svg earth_temperature.svg
//! cargo run -p grayslab-cli -- --config params.toml --dt 30 --summary-style corrected
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use grayslab_core::chart::{ChartSpec, CsvTrajectory, ReportSink, SvgChart};
use grayslab_core::integrator::run;
use grayslab_core::parameters::SimulationParameters;
use grayslab_core::summary::{Summary, SummarySink, SummaryStyle, TextSummary};
use log::{error, info};
use std::fs;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Single-slab (gray atmosphere) energy balance model
#[derive(Parser, Debug)]
#[command(name = "grayslab")]
#[command(about = "Integrate the single-slab energy balance model and report the temperatures")]
struct Cli {
    /// TOML file with simulation parameters; missing keys use the defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Time step (s)
    #[arg(long)]
    dt: Option<f64>,

    /// Simulated period (s)
    #[arg(long)]
    duration: Option<f64>,

    /// Incoming shortwave flux (W/m^2)
    #[arg(long)]
    insolation: Option<f64>,

    /// Reflected fraction of insolation
    #[arg(long)]
    albedo: Option<f64>,

    /// Surface heat capacity (J/m^2/K)
    #[arg(long)]
    heat_capacity: Option<f64>,

    /// Atmosphere heat capacity (J/m^2/K)
    #[arg(long)]
    atmosphere_heat_capacity: Option<f64>,

    /// Atmosphere longwave emissivity
    #[arg(long)]
    emissivity: Option<f64>,

    /// Write the surface temperature chart as SVG
    #[arg(long)]
    svg: Option<PathBuf>,

    /// Write the trajectory as CSV
    #[arg(long)]
    csv: Option<PathBuf>,

    /// "legacy" reproduces the historical report, "corrected" adds the true
    /// atmosphere maximum
    #[arg(long, default_value = "legacy")]
    summary_style: SummaryStyle,
}

impl Cli {
    fn parameters(&self) -> Result<SimulationParameters> {
        let mut parameters = match &self.config {
            Some(path) => SimulationParameters::from_file(path)
                .with_context(|| format!("Failed to load parameters from {}", path.display()))?,
            None => SimulationParameters::default(),
        };

        let overrides = [
            (self.dt, &mut parameters.dt),
            (self.duration, &mut parameters.duration),
            (self.insolation, &mut parameters.insolation),
            (self.albedo, &mut parameters.albedo),
            (self.heat_capacity, &mut parameters.heat_capacity),
            (
                self.atmosphere_heat_capacity,
                &mut parameters.atmosphere_heat_capacity,
            ),
            (self.emissivity, &mut parameters.emissivity),
        ];
        for (value, field) in overrides {
            if let Some(value) = value {
                *field = value;
            }
        }

        parameters.validate()?;
        Ok(parameters)
    }
}

fn render_to(path: &Path, sink: impl FnOnce(BufWriter<fs::File>) -> Result<()>) -> Result<()> {
    let file = fs::File::create(path).with_context(|| format!("create {}", path.display()))?;
    sink(BufWriter::new(file))?;
    info!("Wrote {}", path.display());
    Ok(())
}

fn execute(cli: &Cli) -> Result<()> {
    let parameters = cli.parameters()?;
    info!(
        "Running {} steps of {} s (insolation={} W/m^2, albedo={}, emissivity={})",
        parameters.n_steps(),
        parameters.dt,
        parameters.insolation,
        parameters.albedo,
        parameters.emissivity
    );

    let result = run(&parameters)?;
    let chart = ChartSpec::default();

    if let Some(path) = &cli.svg {
        render_to(path, |w| Ok(SvgChart::new(w).render(&chart, &result.trajectory)?))?;
    }
    if let Some(path) = &cli.csv {
        render_to(path, |w| {
            Ok(CsvTrajectory::new(w).render(&chart, &result.trajectory)?)
        })?;
    }

    let mut summary = TextSummary::new(std::io::stdout().lock(), cli.summary_style);
    summary.emit(&Summary::from_result(&result))?;
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "grayslab_cli=info,grayslab_core=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = execute(&cli) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_arguments() {
        let cli = Cli::try_parse_from(["grayslab"]).unwrap();
        assert_eq!(cli.parameters().unwrap(), SimulationParameters::default());
        assert_eq!(cli.summary_style, SummaryStyle::Legacy);
    }

    #[test]
    fn overrides_apply() {
        let cli = Cli::try_parse_from([
            "grayslab",
            "--dt",
            "30",
            "--emissivity",
            "0.9",
            "--summary-style",
            "corrected",
        ])
        .unwrap();
        let parameters = cli.parameters().unwrap();
        assert_eq!(parameters.dt, 30.0);
        assert_eq!(parameters.emissivity, 0.9);
        assert_eq!(parameters.albedo, 0.3);
        assert_eq!(cli.summary_style, SummaryStyle::Corrected);
    }

    #[test]
    fn invalid_override_is_rejected() {
        let cli = Cli::try_parse_from(["grayslab", "--albedo", "1.2"]).unwrap();
        assert!(cli.parameters().is_err());
    }

    #[test]
    fn unknown_style_is_rejected() {
        assert!(Cli::try_parse_from(["grayslab", "--summary-style", "max"]).is_err());
    }

    #[test]
    fn writes_outputs() {
        let dir = std::env::temp_dir().join(format!("grayslab-cli-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let svg = dir.join("chart.svg");
        let csv = dir.join("trajectory.csv");

        let args: Vec<std::ffi::OsString> = vec![
            "grayslab".into(),
            "--svg".into(),
            svg.clone().into_os_string(),
            "--csv".into(),
            csv.clone().into_os_string(),
        ];
        let cli = Cli::try_parse_from(args).unwrap();
        execute(&cli).unwrap();

        assert!(fs::read_to_string(&svg).unwrap().contains("</svg>"));
        assert_eq!(fs::read_to_string(&csv).unwrap().lines().count(), 61);
        fs::remove_dir_all(&dir).unwrap();
    }
}
