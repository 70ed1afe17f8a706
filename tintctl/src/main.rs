//! `tintctl`: pick, inspect and clear per-site accent colors from the shell.

mod stylesheet;

use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tint_config::{EnvConfig, TintConfig};
use tint_core::{
    ApplyCoordinator, CommitPolicy, DeliveryOutcome, HexColor, JsonFileStore,
    Origin, OriginColorStore, PaletteDelivery, StyleOverrides,
    derive_palette, normalize,
};
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use stylesheet::StylesheetInjector;

const DEFAULT_LOG_FILTER: &str = "warn,tint_core=info";

#[derive(Parser)]
#[command(
    name = "tintctl",
    version,
    about = "Per-site accent colors for the navigation bar"
)]
struct Cli {
    /// Config file (TOML or JSON), takes precedence over TINT_CONFIG_PATH
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// JSON store file, takes precedence over the configured store path
    #[arg(long, global = true)]
    store: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the color a site starts with (stored or default)
    Get {
        /// Site origin or any page URL on it
        target: String,
    },
    /// Store a site's color, paint it, and record it as recent once settled
    Set {
        /// Site origin or any page URL on it
        target: String,
        /// Color as #rgb or #rrggbb (the leading # is optional)
        color: String,
        /// Write the style overrides to this file instead of stdout
        #[arg(long)]
        css_out: Option<PathBuf>,
        /// Record the color as recent without waiting for the commit window
        #[arg(long)]
        commit_now: bool,
    },
    /// Forget a site's color
    Clear {
        /// Site origin or any page URL on it
        target: String,
    },
    /// List every site with a stored color
    List,
    /// Show recently used colors, most recent first
    Recents,
    /// Apply one of the recent colors to a site
    UseRecent {
        /// Site origin or any page URL on it
        target: String,
        /// Position in `tintctl recents` (0 is the most recent)
        index: usize,
        /// Write the style overrides to this file instead of stdout
        #[arg(long)]
        css_out: Option<PathBuf>,
        /// Record the color as recent without waiting for the commit window
        #[arg(long)]
        commit_now: bool,
    },
    /// Repaint a site's stored color without touching recents
    Restore {
        /// Site origin or any page URL on it
        target: String,
        /// Write the style overrides to this file instead of stdout
        #[arg(long)]
        css_out: Option<PathBuf>,
    },
    /// Print the derived palette levels for a color
    Palette {
        /// Color as #rgb or #rrggbb
        color: String,
    },
    /// Print the style overrides for a color as a CSS rule
    Css {
        /// Color as #rgb or #rrggbb
        color: String,
    },
}

struct Session {
    config: TintConfig,
    store: OriginColorStore<JsonFileStore>,
}

impl Session {
    fn open(config_path: Option<PathBuf>, store_path: Option<PathBuf>) -> Result<Self> {
        let mut env = EnvConfig::gather();
        if let Some(path) = config_path {
            env.config_path = Some(path);
        }

        let base_dir = std::env::current_dir()
            .context("failed to resolve working directory")?;
        let (mut config, source) = TintConfig::load(&env, &base_dir)
            .context("failed to load configuration")?;
        if let Some(path) = store_path {
            config.store.path = Some(path);
        }

        for warning in config.validate().iter() {
            match &warning.hint {
                Some(hint) => {
                    warn!(message = %warning.message, hint = %hint, "configuration warning")
                }
                None => {
                    warn!(message = %warning.message, "configuration warning")
                }
            }
        }

        let path = config.store_path()?;
        debug!(source = %source.describe(), store = %path.display(), "session opened");

        Ok(Self {
            config,
            store: OriginColorStore::new(Arc::new(JsonFileStore::new(path))),
        })
    }

    fn coordinator(
        &self,
        css_out: Option<PathBuf>,
        commit_now: bool,
    ) -> ApplyCoordinator<JsonFileStore> {
        let mut coordinator_config = self.config.coordinator_config();
        if commit_now {
            coordinator_config.commit_policy = CommitPolicy::Immediate;
        }

        let delivery = PaletteDelivery::default()
            .with_fallback(Arc::new(StylesheetInjector::new(css_out)));

        ApplyCoordinator::new(self.store.clone(), delivery, coordinator_config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Command::Palette { color } => {
            if let Some(color) = parse_color(color) {
                print_palette(&color);
            }
            return Ok(());
        }
        Command::Css { color } => {
            if let Some(color) = parse_color(color) {
                print!("{}", StyleOverrides::from_base(&color).to_css());
            }
            return Ok(());
        }
        _ => {}
    }

    let session = Session::open(cli.config, cli.store)?;

    match cli.command {
        Command::Get { target } => {
            let origin = parse_target(&target)?;
            let color = session.coordinator(None, false).initial_color(&origin).await;
            println!("{color}");
        }
        Command::Set {
            target,
            color,
            css_out,
            commit_now,
        } => {
            let origin = parse_target(&target)?;
            let coordinator = session.coordinator(css_out, commit_now);
            let Some(applied) =
                coordinator.request_apply_raw(&origin, &color).await?
            else {
                eprintln!("ignoring invalid color {color:?}");
                return Ok(());
            };
            report_delivery(applied.delivery);
            settle(&coordinator).await;
            eprintln!("{} -> {}", applied.origin, applied.color);
        }
        Command::Clear { target } => {
            let origin = parse_target(&target)?;
            session.coordinator(None, false).clear(&origin).await?;
            eprintln!("cleared {origin}");
        }
        Command::List => {
            for (origin, color) in session.store.all_colors().await? {
                println!("{origin} {color}");
            }
        }
        Command::Recents => {
            for (index, color) in
                session.store.get_recent_colors().await?.iter().enumerate()
            {
                println!("{index} {color}");
            }
        }
        Command::UseRecent {
            target,
            index,
            css_out,
            commit_now,
        } => {
            let origin = parse_target(&target)?;
            let coordinator = session.coordinator(css_out, commit_now);
            let Some(applied) = coordinator.apply_recent(&origin, index).await?
            else {
                bail!("no recent color at index {index}");
            };
            report_delivery(applied.delivery);
            settle(&coordinator).await;
            eprintln!("{} -> {}", applied.origin, applied.color);
        }
        Command::Restore { target, css_out } => {
            let origin = parse_target(&target)?;
            match session.coordinator(css_out, false).restore(&origin).await? {
                Some(outcome) => report_delivery(outcome),
                None => eprintln!("no stored color for {origin}"),
            }
        }
        Command::Palette { .. } | Command::Css { .. } => {}
    }

    Ok(())
}

fn parse_target(raw: &str) -> Result<Origin> {
    Origin::parse(raw).with_context(|| format!("invalid site {raw:?}"))
}

/// Invalid colors are ignored with a note rather than failing the command.
fn parse_color(raw: &str) -> Option<HexColor> {
    let color = normalize(raw);
    if color.is_none() {
        eprintln!("ignoring invalid color {raw:?}");
    }
    color
}

fn print_palette(color: &HexColor) {
    let palette = derive_palette(color);
    let levels = std::iter::once(&palette.base).chain(palette.levels.iter());
    for (index, level) in levels.enumerate() {
        println!("{index} {level}");
    }
}

fn report_delivery(outcome: DeliveryOutcome) {
    if outcome == DeliveryOutcome::Failed {
        warn!("palette could not be delivered; the color is still saved");
    }
}

/// Wait out the commit window so the color reaches recents before exit.
async fn settle(coordinator: &ApplyCoordinator<JsonFileStore>) {
    if let CommitPolicy::Delayed(delay) = coordinator.config().commit_policy {
        info!(
            delay_ms = delay.as_millis() as u64,
            "waiting for the commit window"
        );
    }
    coordinator.drain().await;
}
