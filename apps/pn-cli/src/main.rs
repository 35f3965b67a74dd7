use clap::{Parser, Subcommand};
use std::fmt::Write as _;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use pn_app::{
    AppResult, EvaluateOptions, Evaluation, EvaluationProgressEvent, compile_scenario,
    evaluate_with_progress, project_service, query,
};
use pn_fluids::Library;
use pn_project::schema::Scenario;
use pn_solver::ScaleRange;

#[derive(Parser)]
#[command(name = "pn-cli")]
#[command(about = "pumpnet CLI - pump and pipe network sizing tool", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate scenario file syntax and structure
    Validate {
        /// Path to the scenario file (.yaml, .yml or .json)
        scenario_path: PathBuf,
    },
    /// Solve the operating point and print the full report
    Evaluate {
        /// Path to the scenario file
        scenario_path: PathBuf,
        /// Print the evaluation as JSON instead of tables
        #[arg(long)]
        json: bool,
    },
    /// Print annual cost against pipe diameter scale as CSV
    Sweep {
        /// Path to the scenario file
        scenario_path: PathBuf,
        /// First diameter scale [%] (defaults to the scenario's)
        #[arg(long)]
        from: Option<f64>,
        /// Last diameter scale [%] (defaults to the scenario's)
        #[arg(long)]
        to: Option<f64>,
        /// Output CSV file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print sampled pump and system curves as CSV
    Curve {
        /// Path to the scenario file
        scenario_path: PathBuf,
        /// Number of samples
        #[arg(long, default_value_t = 100)]
        points: usize,
        /// Output CSV file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List materials, fluids and fittings
    Library {
        /// Scenario whose user library is overlaid on the built-ins
        scenario_path: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Validate { scenario_path } => cmd_validate(&scenario_path),
        Commands::Evaluate {
            scenario_path,
            json,
        } => cmd_evaluate(&scenario_path, json),
        Commands::Sweep {
            scenario_path,
            from,
            to,
            output,
        } => cmd_sweep(&scenario_path, from, to, output.as_deref()),
        Commands::Curve {
            scenario_path,
            points,
            output,
        } => cmd_curve(&scenario_path, points, output.as_deref()),
        Commands::Library { scenario_path } => cmd_library(scenario_path.as_deref()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            clear_progress_line();
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn cmd_validate(scenario_path: &Path) -> AppResult<()> {
    println!("Validating scenario: {}", scenario_path.display());
    let scenario = project_service::load_scenario(scenario_path)?;
    project_service::validate_scenario(&scenario)?;
    compile_scenario(&scenario)?;

    let summary = project_service::summarize(&scenario);
    println!("✓ Scenario is valid");
    println!("  Name: {}", summary.name);
    println!("  Fluid: {}", summary.fluid);
    println!(
        "  {} segments, {} branches, {} fittings",
        summary.segment_count, summary.branch_count, summary.fitting_count
    );
    if summary.user_materials + summary.user_fluids > 0 {
        println!(
            "  User library: {} materials, {} fluids",
            summary.user_materials, summary.user_fluids
        );
    }
    Ok(())
}

fn run_evaluation(scenario_path: &Path, options: &EvaluateOptions) -> AppResult<Evaluation> {
    let scenario = project_service::load_scenario(scenario_path)?;
    evaluate_loaded(&scenario, options)
}

fn evaluate_loaded(scenario: &Scenario, options: &EvaluateOptions) -> AppResult<Evaluation> {
    let runtime = compile_scenario(scenario)?;
    let evaluation = evaluate_with_progress(
        &runtime,
        options,
        Some(&mut |event| render_cli_progress(&event)),
    )?;
    clear_progress_line();
    Ok(evaluation)
}

fn cmd_evaluate(scenario_path: &Path, json: bool) -> AppResult<()> {
    let eval = run_evaluation(scenario_path, &EvaluateOptions::default())?;

    if json {
        println!("{}", eval.to_json()?);
        return Ok(());
    }

    let op = &eval.operating_point;
    println!("Scenario: {}", eval.scenario);
    println!("\nOperating point:");
    println!("  Flow:       {:>10.2} m³/h", op.flow_m3h);
    println!("  Head:       {:>10.2} m", op.head_m);
    println!("  Efficiency: {:>10.1} %", op.efficiency_pct);

    println!("\nEnergy:");
    println!("  Power:       {:>10.2} kW", eval.energy.power_kw);
    println!("  Annual cost: {:>10.2}", eval.energy.annual_cost);

    println!("\nHead breakdown:");
    println!("  Static:         {:>8.3} m", eval.losses.static_m);
    println!("  Before split:   {:>8.3} m", eval.losses.before_m);
    println!("  Parallel:       {:>8.3} m", eval.losses.parallel_m);
    println!("  After junction: {:>8.3} m", eval.losses.after_m);

    if !eval.branch_flows.is_empty() {
        println!("\nBranch flows:");
        for branch in &eval.branch_flows {
            println!("  {:<24} {:>10.3} m³/h", branch.name, branch.flow_m3h);
        }
    }

    println!("\nSegments:");
    println!(
        "  {:<15} {:<18} {:>3} {:>10} {:>8} {:>10} {:>9} {:>9}",
        "Section", "Branch", "#", "Q [m³/h]", "v [m/s]", "Re", "hf [m]", "hm [m]"
    );
    for row in &eval.segments {
        println!(
            "  {:<15} {:<18} {:>3} {:>10.3} {:>8.3} {:>10.0} {:>9.4} {:>9.4}",
            row.section.label(),
            row.branch.as_deref().unwrap_or("-"),
            row.index,
            row.flow_m3h,
            row.velocity_mps,
            row.reynolds,
            row.major_m,
            row.minor_m
        );
    }

    println!("\nDiameter sensitivity:");
    for point in &eval.sensitivity {
        match point.annual_cost {
            Some(cost) => println!("  {:>6.1} %  {:>12.2}", point.scale_pct, cost),
            None => println!("  {:>6.1} %  {:>12}", point.scale_pct, "n/a"),
        }
    }

    Ok(())
}

fn cmd_sweep(
    scenario_path: &Path,
    from: Option<f64>,
    to: Option<f64>,
    output: Option<&Path>,
) -> AppResult<()> {
    let scenario = project_service::load_scenario(scenario_path)?;
    let options = EvaluateOptions {
        sensitivity_range: Some(ScaleRange::new(
            from.unwrap_or(scenario.sensitivity.from_pct),
            to.unwrap_or(scenario.sensitivity.to_pct),
        )),
        ..EvaluateOptions::default()
    };
    let eval = evaluate_loaded(&scenario, &options)?;

    let mut csv = String::from("scale_pct,annual_cost\n");
    for point in &eval.sensitivity {
        let cost = point.annual_cost.map(|c| c.to_string()).unwrap_or_default();
        let _ = writeln!(csv, "{},{}", point.scale_pct, cost);
    }

    write_output(&csv, eval.sensitivity.len(), output)
}

fn cmd_curve(scenario_path: &Path, points: usize, output: Option<&Path>) -> AppResult<()> {
    let options = EvaluateOptions {
        curve_points: points,
        ..EvaluateOptions::default()
    };
    let eval = run_evaluation(scenario_path, &options)?;

    let mut csv = String::from("flow_m3h,pump_head_m,system_head_m\n");
    for sample in &eval.curves {
        let pump = sample.pump_head_m.map(|h| h.to_string()).unwrap_or_default();
        let system = sample.system_head_m.map(|h| h.to_string()).unwrap_or_default();
        let _ = writeln!(csv, "{},{},{}", sample.flow_m3h, pump, system);
    }

    write_output(&csv, eval.curves.len(), output)
}

fn cmd_library(scenario_path: Option<&Path>) -> AppResult<()> {
    let library = match scenario_path {
        Some(path) => {
            let scenario = project_service::load_scenario(path)?;
            pn_app::compile::build_library(&scenario.library)?
        }
        None => Library::builtin(),
    };

    println!("Materials:");
    for m in query::list_materials(&library) {
        let tag = if m.user { " (user)" } else { "" };
        println!("  {:<32} ε = {:.4} mm{}", m.name, m.roughness_mm, tag);
    }

    println!("\nFluids:");
    for f in query::list_fluids(&library) {
        let tag = if f.user { " (user)" } else { "" };
        println!(
            "  {:<32} ρ = {:.1} kg/m³, ν = {:.3e} m²/s{}",
            f.name, f.density_kg_m3, f.kinematic_viscosity_m2_s, tag
        );
    }

    println!("\nFittings:");
    for fitting in query::list_fittings("") {
        println!("  {:<32} K = {:.2}", fitting.name, fitting.k);
    }

    Ok(())
}

fn write_output(csv: &str, rows: usize, output: Option<&Path>) -> AppResult<()> {
    if let Some(path) = output {
        std::fs::write(path, csv)?;
        println!("✓ Exported {} rows to {}", rows, path.display());
    } else {
        print!("{}", csv);
    }
    Ok(())
}

fn clear_progress_line() {
    eprint!("\r{}\r", " ".repeat(80));
    let _ = io::stderr().flush();
}

fn render_cli_progress(event: &EvaluationProgressEvent) {
    let mut line = format!(
        "\r{}  elapsed={:.2}s",
        event.stage.label(),
        event.elapsed_wall_s
    );
    if let Some(msg) = &event.message {
        line.push_str(&format!("  {}", msg));
    }
    eprint!("{:<80}", line);
    let _ = io::stderr().flush();
}
