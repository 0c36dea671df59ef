use clap::{Parser, Subcommand};
use hl_app::{AppResult, ReportFormat};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "heatload")]
#[command(about = "heatload - building heat-loss and passive-solar calculator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate project file syntax and structure
    Validate {
        /// Path to the project YAML or JSON file
        project_path: PathBuf,
    },
    /// List the cases in a project
    Cases {
        /// Path to the project YAML or JSON file
        project_path: PathBuf,
    },
    /// Run every case in a project and print the report
    Run {
        /// Path to the project YAML or JSON file
        project_path: PathBuf,
        /// Report format (yaml or json)
        #[arg(short, long, default_value = "yaml")]
        format: ReportFormat,
        /// Write the report to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Solve a single glasshouse with default properties
    Glasshouse {
        /// Outdoor air temperature (°C)
        #[arg(long, allow_negative_numbers = true)]
        outdoor: f64,
        /// Solar irradiance on the glazing (W/m²)
        #[arg(long)]
        irradiance: f64,
        /// Glazing area (m²)
        #[arg(long)]
        glass_area: f64,
        /// Collector area (m²)
        #[arg(long)]
        collector_area: f64,
    },
}

fn main() -> AppResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { project_path } => cmd_validate(&project_path),
        Commands::Cases { project_path } => cmd_cases(&project_path),
        Commands::Run {
            project_path,
            format,
            output,
        } => cmd_run(&project_path, format, output.as_deref()),
        Commands::Glasshouse {
            outdoor,
            irradiance,
            glass_area,
            collector_area,
        } => cmd_glasshouse(outdoor, irradiance, glass_area, collector_area),
    }
}

fn cmd_validate(project_path: &Path) -> AppResult<()> {
    println!("Validating project: {}", project_path.display());
    let project = hl_app::load_project(project_path)?;
    hl_app::validate_project(&project)?;
    println!("✓ Project is valid");
    Ok(())
}

fn cmd_cases(project_path: &Path) -> AppResult<()> {
    let project = hl_app::load_project(project_path)?;
    let cases = hl_app::list_cases(&project);

    if cases.is_empty() {
        println!("No cases found in project");
    } else {
        println!("Cases in '{}':", project.name);
        for case in cases {
            println!("  {:<10} {}", case.kind, case.id);
        }
    }
    Ok(())
}

fn cmd_run(project_path: &Path, format: ReportFormat, output: Option<&Path>) -> AppResult<()> {
    let project = hl_app::load_project(project_path)?;
    let report = hl_app::run_project(&project)?;
    let rendered = hl_app::render_report(&report, format)?;

    match output {
        Some(path) => {
            hl_app::write_report(path, &rendered)?;
            eprintln!(
                "✓ Report for '{}' written to {} ({:.3}s)",
                report.name,
                path.display(),
                report.elapsed_s
            );
        }
        None => print!("{rendered}"),
    }
    Ok(())
}

fn cmd_glasshouse(outdoor: f64, irradiance: f64, glass_area: f64, collector_area: f64) -> AppResult<()> {
    let report = hl_app::run_glasshouse(outdoor, irradiance, glass_area, collector_area)?;
    let s = &report.solution;

    println!("Glasshouse balance ({:?} after {} iterations):", s.state, s.iterations);
    println!("  Interior:  {:.2} °C", s.interior_temp);
    println!("  Glass:     {:.2} °C", s.glass_temp);
    println!("  Collector: {:.2} °C", s.collector_temp);
    println!("  Passive gain: {:.0} W", report.passive_gain);
    if let Some(reason) = &s.abort_reason {
        println!("  Aborted: {reason}");
    }

    Ok(())
}
