// stepscope: step-by-step replay of instrumented C program traces

use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use stepscope::config::SimulatorConfig;
use stepscope::errors::SessionError;
use stepscope::producer::{Producer, TraceFile};
use stepscope::reconstruct::format::format_value;
use stepscope::replay::predicates::StepMode;
use stepscope::session::Simulation;
use stepscope::ui::App;

#[derive(Parser)]
#[command(name = "stepscope")]
#[command(about = "Replay an instrumented C program one step at a time", long_about = None)]
#[command(version)]
struct Cli {
    /// JSON trace written by the instrumented program
    trace: PathBuf,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Stepping granularity (overrides the config file)
    #[arg(short, long, value_enum)]
    mode: Option<StepMode>,

    /// Print every step to stdout instead of starting the viewer
    #[arg(long)]
    dump: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so they never mix with --dump output
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("stepscope=info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => SimulatorConfig::load(path)?,
        None => SimulatorConfig::default(),
    };
    if let Some(mode) = cli.mode {
        config.step_mode = mode;
    }

    let producer = TraceFile::new(&cli.trace).with_step_limit(config.step_limit);
    let mut simulation = Simulation::new(producer, config);

    if let Err(err) = simulation.run() {
        tracing::error!("failed to load {}: {}", cli.trace.display(), err);
        return Err(err.into());
    }
    tracing::info!(
        steps = simulation.total_steps(),
        "loaded {}",
        cli.trace.display()
    );

    if cli.dump {
        let stdout = io::stdout();
        dump(&mut simulation, &mut stdout.lock())?;
        return Ok(());
    }

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(simulation);
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

/// Write every stop of the simulation, then the final output
fn dump<P: Producer>(simulation: &mut Simulation<P>, out: &mut impl Write) -> Result<(), SessionError> {
    if simulation.total_steps() == 0 {
        writeln!(out, "(empty trace)")?;
        return Ok(());
    }

    simulation.rewind_to_start();
    loop {
        writeln!(
            out,
            "== step {} [{}] ==",
            simulation.cursor() + 1,
            simulation.current_statement_ref().unwrap_or("-")
        )?;
        writeln!(out, "{}", simulation.evaluated_code()?)?;

        if let Some(tree) = simulation.current_call_tree()? {
            let path: Vec<&str> = tree.active_path().iter().map(|call| call.name()).collect();
            writeln!(out, "  calls: {}", path.join(" > "))?;
        }
        for variable in simulation.variables() {
            let value = variable
                .data_value
                .as_ref()
                .map_or_else(|| "?".to_string(), |value| format_value(&variable.data_type, value));
            writeln!(out, "  {} {} = {}", variable.data_type, variable.identifier, value)?;
        }

        if !simulation.step_forward() {
            break;
        }
    }

    writeln!(out, "== output ==")?;
    write!(out, "{}", simulation.output())?;
    Ok(())
}
