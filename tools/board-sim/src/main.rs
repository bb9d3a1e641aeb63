//! W601 Board Simulator
//!
//! Runs the W601 IoT board demo programs on the host against the simulated
//! board from `w601_board::sim`, and reports what the board would have done.
//!
//! # Usage
//!
//! ```bash
//! # Blink the red LED for 2.5 simulated seconds
//! board-sim blink
//!
//! # Blink for a minute with a custom LED from a config file
//! board-sim --config board.toml blink --duration-ms 60000
//!
//! # Run the LCD demo, print every call and save the final frame
//! board-sim lcd --trace --output frame.ppm
//!
//! # Print the effective configuration
//! board-sim config show
//! ```

mod config;
mod ppm;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use log::{debug, info};
use std::path::PathBuf;

use config::{Board, SimConfig};
use w601_board::hal::{Gpio, Level, PinMode};
use w601_board::sim::{RecordingLcd, SimClock, SimDelay, SimError, SimGpio};
use w601_board::{Color, Framebuffer, Screen};
use w601_demos::blink::{self, count_cycles, BlinkConfig, BlinkError};
use w601_demos::lcd;

/// W601 Board Simulator
///
/// Run the board demos without hardware
#[derive(Parser)]
#[command(name = "board-sim")]
#[command(version = "0.1.0")]
#[command(about = "Run the W601 IoT board demos against a simulated board")]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Board configuration file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the LED blink demo until the simulated time runs out
    Blink {
        /// Simulated run time in milliseconds
        #[arg(short, long, default_value_t = 2500)]
        duration_ms: u64,
    },

    /// Run the LCD drawing demo on a simulated 240x240 panel
    Lcd {
        /// Save the final frame as a binary PPM image
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print every LCD call the demo issues
        #[arg(short, long)]
        trace: bool,
    },

    /// Configuration operations
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the effective configuration as TOML
    Show,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let board = Board::resolve(SimConfig::load_or_default(cli.config.as_deref())?);
    debug!("board: {:?}", board);

    match cli.command {
        Commands::Blink { duration_ms } => handle_blink(&board, duration_ms),
        Commands::Lcd { output, trace } => handle_lcd(&board, output, trace),
        Commands::Config(ConfigCommands::Show) => handle_config_show(&board.config),
    }
}

fn handle_blink(board: &Board, duration_ms: u64) -> Result<()> {
    let blink_config = BlinkConfig {
        pin: board.led,
        half_period_ms: board.config.led.half_period_ms,
    };
    if blink_config.half_period_ms == 0 {
        bail!("half_period_ms must be greater than zero");
    }

    println!(
        "{} Blinking {} every {} ms for {} ms of simulated time",
        "[*]".cyan().bold(),
        blink_config.pin.to_string().white(),
        blink_config.half_period_ms,
        duration_ms
    );

    let clock = SimClock::with_deadline(duration_ms);
    let mut gpio = SimGpio::new(clock.clone());
    let mut delay = SimDelay::new(clock);

    match blink::run_with(&blink_config, &mut gpio, &mut delay) {
        Ok(never) => match never {},
        Err(BlinkError::Pin(SimError::Halted { at_ms })) => {
            info!("simulation stopped at {} ms", at_ms);
        }
        Err(e) => {
            eprintln!("{} {}", "[ERROR]".red().bold(), e);
            bail!("blink demo failed: {}", e);
        }
    }

    let events = gpio.events_for(blink_config.pin);
    println!("{}", "=".repeat(40));
    println!("{:>10}  {:<14} {}", "time (ms)", "pin", "level");
    println!("{}", "-".repeat(40));
    for event in &events {
        let level = match event.level {
            Level::Low => "LOW".dimmed(),
            Level::High => "HIGH".yellow().bold(),
        };
        println!("{:>10}  {:<14} {}", event.at_ms, event.pin.to_string(), level);
    }
    println!("{}", "=".repeat(40));

    let cycles = count_cycles(events.iter().map(|e| e.level));
    println!(
        "{} {} level changes, {} complete cycles",
        "[OK]".green().bold(),
        events.len(),
        cycles
    );
    Ok(())
}

fn handle_lcd(board: &Board, output: Option<PathBuf>, trace: bool) -> Result<()> {
    if trace {
        let mut recorder = RecordingLcd::new();
        lcd::run(&mut recorder).context("LCD demo failed while tracing")?;
        println!("{}", "LCD calls:".white().bold());
        for (i, call) in recorder.calls().iter().enumerate() {
            println!("  {:>2}. {:?}", i + 1, call);
        }
        println!();
    }

    let mut gpio = SimGpio::new(SimClock::new());
    let backlight_pin = board.backlight;
    let backlight = gpio
        .output(backlight_pin, PinMode::OutputPushPull)
        .with_context(|| format!("Failed to configure backlight pin {}", backlight_pin))?;
    let mut screen = Screen::new(Framebuffer::new(), backlight);

    println!("{} Running LCD demo", "[*]".cyan().bold());
    lcd::run(&mut screen).context("LCD demo failed")?;

    let fb = screen.target();
    let backlight = if screen.backlight_on() {
        "on".green()
    } else {
        "off".red()
    };
    println!("  Backlight: {}", backlight);
    println!("  White pixels: {}", fb.count(Color::WHITE));
    println!("  Black pixels: {}", fb.count(Color::BLACK));

    if let Some(path) = output {
        ppm::save(fb, &path)?;
        println!(
            "{} Frame saved to {}",
            "[OK]".green().bold(),
            path.display().to_string().white()
        );
    } else {
        println!("{} LCD demo finished", "[OK]".green().bold());
    }
    Ok(())
}

fn handle_config_show(config: &SimConfig) -> Result<()> {
    let text = config
        .to_toml()
        .context("Failed to serialize configuration")?;
    print!("{}", text);
    Ok(())
}
