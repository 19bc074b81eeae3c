//! # Terminal Life Example
//!
//! Runs the Life engine against a `Renderer` that draws into a truecolor
//! terminal, so the simulation can be watched without a panel.
//!
//! ## Run it
//! ```sh
//! cargo run --no-default-features --example terminal_life -- --fade-steps 6
//! ```

use clap::Parser;
use led_life::life::{CycleOutcome, GameOfLife, LifeConfig, Pattern};
use led_life::renderer::{FrameBuffer, Renderer};
use led_life::{Color, is_running, setup_signal_handler};
use std::io::{self, Write};
use std::thread;
use std::time::Duration;

/// Pixels drawn as two spaces with a background color, one text row per
/// pixel row.
struct TerminalRenderer {
    frame: FrameBuffer,
}

impl Renderer for TerminalRenderer {
    fn width(&self) -> usize {
        self.frame.width()
    }

    fn height(&self) -> usize {
        self.frame.height()
    }

    fn set_pixel(&mut self, x: usize, y: usize, color: Color) {
        self.frame.set_pixel(x, y, color);
    }

    fn present(&mut self) {
        let mut out = String::from("\x1b[H");
        for y in 0..self.frame.height() {
            for x in 0..self.frame.width() {
                let c = self.frame.pixel(x, y);
                out.push_str(&format!("\x1b[48;2;{};{};{}m  ", c.r, c.g, c.b));
            }
            out.push_str("\x1b[0m\n");
        }

        let mut stdout = io::stdout().lock();
        // A closed terminal just means nobody is watching.
        let _ = stdout.write_all(out.as_bytes()).and_then(|_| stdout.flush());
    }
}

#[derive(Parser)]
#[command(name = "terminal_life")]
#[command(about = "Watch the Life engine in a terminal")]
struct Args {
    #[arg(long, default_value = "32")]
    width: usize,

    #[arg(long, default_value = "24")]
    height: usize,

    #[arg(long, default_value = "0")]
    fade_steps: u8,

    #[arg(long, default_value = "60")]
    delay_ms: u64,

    #[arg(long, value_enum, default_value_t = Pattern::Random)]
    pattern: Pattern,

    /// Stop after this many generations (runs until Ctrl+C otherwise)
    #[arg(long)]
    generations: Option<u64>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let running = setup_signal_handler();

    let renderer = TerminalRenderer {
        frame: FrameBuffer::new(args.width, args.height),
    };
    let config = LifeConfig {
        fade_steps: args.fade_steps,
        delay_ms: args.delay_ms,
        seed: args.pattern.into(),
        ..LifeConfig::default()
    };

    print!("\x1b[2J");
    let mut life = GameOfLife::new(renderer, config)?;
    let mut total = 0u64;

    while is_running(&running) && args.generations.is_none_or(|n| total < n) {
        if let CycleOutcome::Reset(cause) = life.run_cycle() {
            eprintln!("reset: {cause}");
        }
        total += 1;
        thread::sleep(Duration::from_millis(args.delay_ms));
    }

    let stats = life.stats();
    println!(
        "\x1b[0m{} generations, {} resets, longest run {:?}",
        total, stats.resets, stats.max_generations
    );
    Ok(())
}
