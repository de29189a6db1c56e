use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use freshsense::acquisition::EchoProbe;
use freshsense::{
    FileStorage, QueueTransport, ScriptedProbe, SensorConfig, SensorEngine,
};
use rand::Rng;

#[derive(Parser, Debug)]
#[command(
    name = "freshsense-cli",
    about = "Host harness for the FreshSense sensor core"
)]
struct Cli {
    /// Path of the persisted calibration model
    #[arg(long, default_value = "freshsense_model.json")]
    model: PathBuf,
    /// Optional JSON config file overriding the built-in tuning defaults
    #[arg(long)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Stream a labeled CSV file through a training session and print the
    /// device responses
    Train {
        #[arg(long)]
        csv: PathBuf,
        /// Add to the persisted totals instead of replacing them
        #[arg(long, default_value_t = false)]
        accumulate: bool,
    },
    /// Print the model status report
    Report,
    /// Run the polling loop against a synthetic jittered echo source and
    /// stream telemetry to stdout
    Simulate {
        /// Simulated true echo in microseconds
        #[arg(long, default_value_t = 1500)]
        echo_us: u32,
        /// Uniform jitter applied to each reading
        #[arg(long, default_value_t = 40)]
        jitter_us: u32,
        /// Probability that a single reading is a missed echo
        #[arg(long, default_value_t = 0.05)]
        dropout: f64,
        /// Number of loop ticks to run
        #[arg(long, default_value_t = 20)]
        ticks: u32,
    },
}

/// Echo probe producing jittered readings around a fixed target
struct JitterProbe {
    echo_us: u32,
    jitter_us: u32,
    dropout: f64,
    rng: rand::rngs::ThreadRng,
}

impl JitterProbe {
    fn new(echo_us: u32, jitter_us: u32, dropout: f64) -> Self {
        Self {
            echo_us,
            jitter_us,
            dropout: dropout.clamp(0.0, 1.0),
            rng: rand::thread_rng(),
        }
    }
}

impl EchoProbe for JitterProbe {
    fn poll_echo(&mut self) -> Option<u32> {
        if self.rng.gen_bool(self.dropout) {
            return None;
        }
        let jitter = self.jitter_us as i64;
        let reading = self.echo_us as i64 + self.rng.gen_range(-jitter..=jitter);
        Some(reading.max(1) as u32)
    }
}

fn main() -> ExitCode {
    freshsense::init_logging();
    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::from(1)
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => SensorConfig::load_from_file(path),
        None => SensorConfig::default(),
    };
    config.model.storage_path = cli.model.to_string_lossy().into_owned();

    match cli.command {
        Commands::Train { csv, accumulate } => run_train(&config, &csv, accumulate),
        Commands::Report => run_report(&config),
        Commands::Simulate {
            echo_us,
            jitter_us,
            dropout,
            ticks,
        } => run_simulate(&config, echo_us, jitter_us, dropout, ticks),
    }
}

fn run_train(config: &SensorConfig, csv: &PathBuf, accumulate: bool) -> Result<ExitCode> {
    let contents = fs::read_to_string(csv)
        .with_context(|| format!("reading labeled rows from {}", csv.display()))?;

    let mut engine = SensorEngine::new(
        config,
        ScriptedProbe::silent(),
        FileStorage::new(&config.model.storage_path),
        QueueTransport::new(),
    );

    let transport = engine.transport_mut();
    transport.push_line(if accumulate {
        "CSVACCUM:ON"
    } else {
        "CSVACCUM:OFF"
    });
    transport.push_line("CSVTEST:BEGIN");
    let mut queued = 0usize;
    for line in contents.lines() {
        if !line.trim().is_empty() {
            transport.push_line(line);
            queued += 1;
        }
    }
    transport.push_line("CSVTEST:END");
    transport.push_line("R");
    println!("Queued rows: {queued}");

    let mut refused = false;
    while engine.transport_mut().pending_input() > 0 {
        engine.tick();
        for line in engine.transport_mut().take_sent_lines() {
            if line.starts_with("CSVTEST:ERR") {
                refused = true;
            }
            println!("[device] {line}");
        }
    }

    Ok(ExitCode::from(if refused { 2 } else { 0 }))
}

fn run_report(config: &SensorConfig) -> Result<ExitCode> {
    let mut engine = SensorEngine::new(
        config,
        ScriptedProbe::silent(),
        FileStorage::new(&config.model.storage_path),
        QueueTransport::new(),
    );
    engine.transport_mut().push_line("R");
    engine.tick();
    for line in engine.transport_mut().take_sent_lines() {
        println!("[device] {line}");
    }
    Ok(ExitCode::from(0))
}

fn run_simulate(
    config: &SensorConfig,
    echo_us: u32,
    jitter_us: u32,
    dropout: f64,
    ticks: u32,
) -> Result<ExitCode> {
    let mut engine = SensorEngine::new(
        config,
        JitterProbe::new(echo_us, jitter_us, dropout),
        FileStorage::new(&config.model.storage_path),
        QueueTransport::new(),
    );

    engine.transport_mut().push_line("TRAIN:ON");
    for _ in 0..ticks {
        engine.tick();
        for line in engine.transport_mut().take_sent_lines() {
            println!("{line}");
        }
    }

    Ok(ExitCode::from(0))
}
