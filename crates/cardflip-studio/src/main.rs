mod app;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use winit::dpi::LogicalSize;

use cardflip_carousel::card::{load_deck, parse_deck};
use cardflip_carousel::{CardData, CarouselConfig};
use cardflip_engine::device::GpuInit;
use cardflip_engine::logging::{LoggingConfig, init_logging};
use cardflip_engine::text::{FontId, FontSystem};
use cardflip_engine::window::{Runtime, RuntimeConfig};

use app::CarouselApp;

const BUILTIN_DECK: &str = include_str!("../decks/healthcare.json");

const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/noto/NotoSans-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
    "/System/Library/Fonts/Helvetica.ttc",
    "C:\\Windows\\Fonts\\segoeui.ttf",
];

#[derive(Parser, Debug)]
#[command(name = "cardflip-studio", about = "3D flip-card carousel viewer")]
struct Cli {
    /// Carousel configuration (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Card deck (JSON array of cards); the built-in deck is used otherwise
    #[arg(long)]
    cards: Option<PathBuf>,

    /// Auto-play interval in milliseconds; 0 or less disables it
    #[arg(long, allow_negative_numbers = true)]
    interval: Option<i64>,

    /// Font used for card text
    #[arg(long)]
    font: Option<PathBuf>,

    /// Log filter, e.g. "debug" or "cardflip_carousel=trace"
    #[arg(long)]
    log: Option<String>,

    #[arg(long, default_value_t = 1280.0)]
    width: f64,

    #[arg(long, default_value_t = 800.0)]
    height: f64,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(match &cli.log {
        Some(filter) => LoggingConfig::with_filter(filter.as_str()),
        None => LoggingConfig::default(),
    });

    let mut config = match &cli.config {
        Some(path) => CarouselConfig::load(path)
            .with_context(|| format!("loading carousel config {}", path.display()))?,
        None => CarouselConfig::default(),
    };
    if let Some(ms) = cli.interval {
        config.auto_play_interval_ms = ms;
    }

    let cards = load_cards(cli.cards.as_deref())?;
    let (fonts, font) = load_font(cli.font.as_deref())?;

    log::info!(
        "{} cards, auto-play {}",
        cards.len(),
        match config.auto_play_interval() {
            Some(d) => format!("every {d:?}"),
            None => "off".to_string(),
        }
    );

    let app = CarouselApp::new(config, cards, fonts, font);
    Runtime::run(
        RuntimeConfig {
            title: "cardflip studio".to_string(),
            initial_size: LogicalSize::new(cli.width, cli.height),
        },
        GpuInit::default(),
        app,
    )
}

fn load_cards(path: Option<&Path>) -> Result<Vec<CardData>> {
    match path {
        Some(path) => load_deck(path).with_context(|| format!("loading deck {}", path.display())),
        None => parse_deck(BUILTIN_DECK).context("built-in deck is malformed"),
    }
}

/// Loads the font from `path`, or the first usable system font. Cards are
/// drawn without text when none is found.
fn load_font(path: Option<&Path>) -> Result<(Arc<FontSystem>, Option<FontId>)> {
    let mut fonts = FontSystem::new();

    let font = match path {
        Some(path) => {
            let bytes = std::fs::read(path).with_context(|| format!("reading font {}", path.display()))?;
            let id = fonts
                .load_font(&bytes)
                .with_context(|| format!("parsing font {}", path.display()))?;
            Some(id)
        }
        None => SYSTEM_FONTS.iter().find_map(|p| {
            let bytes = std::fs::read(p).ok()?;
            let id = fonts.load_font(&bytes).ok()?;
            log::debug!("using system font {p}");
            Some(id)
        }),
    };

    if font.is_none() {
        log::warn!("no usable font found; cards will have no text (pass --font)");
    }
    Ok((Arc::new(fonts), font))
}
