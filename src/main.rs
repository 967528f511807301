//! tipview - render a tooltip's lifecycle to PNG frames
//!
//! Usage:
//!   tipview                                  # default scene, default config path
//!   tipview --config scene.json              # explicit config file
//!   tipview --text "Saved" --side top        # override the scene from the command line
//!   tipview --write-config                   # store the effective config at the default path

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tipview::{AppConfig, CosmicText, LogLevel, Scene};
use tipview_ui::Side;

#[derive(Parser)]
#[command(name = "tipview")]
#[command(about = "Render tooltip bubbles into PNG frames")]
struct Cli {
    /// Configuration file (defaults to the user config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output file stem
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Preferred arrow side: top, bottom, left or right
    #[arg(long)]
    side: Option<Side>,

    /// Tooltip text
    #[arg(long)]
    text: Option<String>,

    /// Frames rendered per transition
    #[arg(long)]
    frames: Option<u32>,

    /// Log verbosity (overrides the config file; RUST_LOG overrides both)
    #[arg(long, value_enum)]
    log_level: Option<LogLevel>,

    /// Show the tooltip at once instead of animating it in
    #[arg(long)]
    no_animation: bool,

    /// Save the effective configuration to the default path and exit
    #[arg(long)]
    write_config: bool,
}

impl Cli {
    fn apply(&self, config: &mut AppConfig) {
        if let Some(output) = &self.output {
            config.scene.output = output.clone();
        }
        if let Some(side) = self.side {
            config.preferences.drawing.arrow_side = side;
        }
        if let Some(text) = &self.text {
            config.scene.text = text.clone();
        }
        if let Some(frames) = self.frames {
            config.scene.frames = frames;
        }
        if let Some(level) = self.log_level {
            config.log_level = level;
        }
        if self.no_animation {
            config.scene.animated = false;
        }
    }
}

fn init_logging(level: LogLevel) {
    // RUST_LOG, when set, takes precedence over the configured level
    env_logger::Builder::new()
        .filter_level(level.to_level_filter())
        .parse_default_env()
        .init();
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    // Loading happens before the logger exists, so report afterwards.
    let (mut config, source) = match &cli.config {
        Some(path) => (AppConfig::load(path)?, Some(path.clone())),
        None => match AppConfig::default_path().filter(|p| p.exists()) {
            Some(path) => (AppConfig::load(&path)?, Some(path)),
            None => (AppConfig::default(), None),
        },
    };
    cli.apply(&mut config);
    init_logging(config.log_level);

    match source {
        Some(path) => log::info!("Loaded configuration from {:?}", path),
        None => log::info!("Using default configuration"),
    }

    if cli.write_config {
        let path = config.save_to_default_path()?;
        println!("{}", path.display());
        return Ok(());
    }

    let text = CosmicText::new();
    for font in &config.scene.fonts {
        if let Err(e) = text.load_font_file(font) {
            log::warn!("Failed to load font {:?}: {}", font, e);
        }
    }
    if text.face_count() == 0 {
        log::warn!("No fonts available; tooltip text will not be rendered");
    }

    let mut scene = Scene::new(config.scene.clone(), config.preferences.clone(), &text)?;
    for path in scene.record(&text)? {
        println!("{}", path.display());
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // The logger may not be up yet when the config fails to load.
            if log::log_enabled!(log::Level::Error) {
                log::error!("{}", e);
            } else {
                eprintln!("tipview: {}", e);
            }
            ExitCode::FAILURE
        }
    }
}
