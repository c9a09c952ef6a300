//! somposter CLI - SOM Image Posterization
//!
//! Command-line interface for posterizing images with a Self-Organizing Map.

use clap::{Parser, Subcommand};
use indicatif::{HumanDuration, ProgressBar, ProgressStyle};
use log::error;
use somposter::{
    count_colors, default_output_path, load_pixels, save_pixels, ChaChaSource, Config,
    GridShape, Posterizer, Result, SomError, SomTrainer, TrainingState,
};
use std::path::PathBuf;
use std::time::{Duration, Instant};

#[derive(Parser)]
#[command(name = "somposter")]
#[command(version)]
#[command(about = "Image posterization with a Self-Organizing Map", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Posterize an image
    Posterize {
        /// Input image file
        #[arg(short, long)]
        input: PathBuf,

        /// Output image file (default: <input>_posterized.<ext>)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// JSON configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Posterization level: the map is level x level neurons (default: 2)
        #[arg(short, long)]
        level: Option<usize>,

        /// Maximum number of training epochs (default: 3000)
        #[arg(short = 'n', long)]
        epochs: Option<usize>,

        /// Convergence threshold (default: 0.001)
        #[arg(short, long)]
        threshold: Option<f32>,

        /// Random seed for reproducibility
        #[arg(short, long)]
        seed: Option<u64>,

        /// Clamp neuron weights into [0, 1] during training
        #[arg(long)]
        clamp: bool,

        /// Remap pixels on a single thread
        #[arg(long)]
        sequential: bool,
    },

    /// Count the distinct colors in an image
    Colors {
        /// Image file to inspect
        input: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let result = match cli.command {
        Commands::Posterize {
            input,
            output,
            config,
            level,
            epochs,
            threshold,
            seed,
            clamp,
            sequential,
        } => {
            let overrides = Overrides {
                level,
                epochs,
                threshold,
                seed,
                clamp,
                sequential,
            };
            load_config(config, overrides).and_then(|config| posterize_image(input, output, config))
        }

        Commands::Colors { input } => show_colors(input),
    };

    if let Err(e) = result {
        error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Command-line values that take precedence over the config file.
struct Overrides {
    level: Option<usize>,
    epochs: Option<usize>,
    threshold: Option<f32>,
    seed: Option<u64>,
    clamp: bool,
    sequential: bool,
}

fn load_config(path: Option<PathBuf>, overrides: Overrides) -> Result<Config> {
    let mut config = match path {
        Some(path) => Config::from_file(&path)?,
        None => Config::default(),
    };

    if let Some(level) = overrides.level {
        config.som.level = level;
    }
    if let Some(epochs) = overrides.epochs {
        config.som.max_epochs = epochs;
    }
    if let Some(threshold) = overrides.threshold {
        config.som.threshold = threshold;
    }
    if overrides.seed.is_some() {
        config.som.seed = overrides.seed;
    }
    if overrides.clamp {
        config.som.clamp_weights = true;
    }
    if overrides.sequential {
        config.som.parallel = false;
    }

    config.som.validate()?;
    Ok(config)
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

fn posterize_image(input: PathBuf, output: Option<PathBuf>, config: Config) -> Result<()> {
    let start_time = Instant::now();
    let output = output.unwrap_or_else(|| default_output_path(&input, &config.output.suffix));

    println!("somposter - SOM Image Posterization");
    println!("   Input:  {}", input.display());
    println!("   Output: {}", output.display());
    println!();

    // Step 1: Load image
    let pb = spinner("Loading image...");
    let image = load_pixels(&input)?;
    pb.finish_and_clear();
    println!(
        "✓ Loaded {}x{} image ({} pixels)",
        image.width,
        image.height,
        format_number(image.pixels.len())
    );

    // Step 2: Train SOM
    let shape = GridShape::from_neuron_count(config.som.neurons())?;
    let trainer = SomTrainer::new(config.som.trainer_config());
    let mut rng = ChaChaSource::from_seed_option(config.som.seed);

    let pb = ProgressBar::new(config.som.max_epochs as u64);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{msg}\n{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) ETA: {eta}")
    {
        pb.set_style(style.progress_chars("█▓▒░  "));
    }
    pb.set_message(format!(
        "Training SOM ({}x{} = {} neurons)...",
        shape.width,
        shape.height,
        shape.len()
    ));

    let (som, report) = trainer.train_with_report(&image.pixels, shape, &mut rng, |epoch, _, _| {
        pb.set_position(epoch as u64);
    })?;

    pb.finish_and_clear();
    let how = match report.state {
        TrainingState::Converged => "converged",
        TrainingState::Exhausted => "epoch limit reached",
    };
    println!(
        "✓ Trained SOM in {} epochs ({}, final delta {:.6})",
        format_number(report.epochs),
        how,
        report.final_delta
    );

    // Step 3: Remap pixels
    let pb = spinner("Posterizing...");
    let posterized = Posterizer::new(config.som.parallel).apply(&image.pixels, &som)?;
    pb.finish_and_clear();
    println!("✓ Palette of {} distinct colors", som.distinct_colors());

    // Step 4: Save
    let pb = spinner("Saving image...");
    save_pixels(&output, image.width, image.height, &posterized)?;
    pb.finish_and_clear();
    println!("✓ Saved {}", output.display());

    println!();
    println!("Done in {}", HumanDuration(start_time.elapsed()));
    Ok(())
}

fn show_colors(input: PathBuf) -> Result<()> {
    if !input.exists() {
        return Err(SomError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} does not exist", input.display()),
        )));
    }
    let img = image::open(&input)?.into_rgb8();
    println!("{}", format_number(count_colors(&img)));
    Ok(())
}

fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}
