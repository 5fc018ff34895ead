//! Command-line front end for inspecting a theme's components.
//!
//! The layout comes from `--config <file>` when given, otherwise from the
//! `THEME_COMPONENTS_*` environment variables. Output goes to stdout; logs go
//! to stderr and follow `RUST_LOG`.

use anyhow::{Context, Result, bail};
use std::env;
use std::path::PathBuf;
use theme_components::{
    ComponentListing, StaticSite, ThemeLayout, discover, ensure_components_directory,
};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse()?;
    let layout = match &cli.config {
        Some(path) => ThemeLayout::load(path)?,
        None => ThemeLayout::from_env()
            .context("set THEME_COMPONENTS_* variables or pass --config")?,
    };

    match &cli.command {
        Command::List { json } => list(&layout, *json),
        Command::Render { can_edit } => {
            let site = StaticSite {
                layout: &layout,
                can_edit: *can_edit,
            };
            print!("{}", ComponentListing::new(&layout, &site).render_page());
            Ok(())
        }
        Command::Provision => {
            let dir = ensure_components_directory(layout.stylesheet_dir())?;
            println!("{}", dir.display());
            Ok(())
        }
        Command::AssetUrl(path) => {
            let site = StaticSite {
                layout: &layout,
                can_edit: false,
            };
            println!("{}", ComponentListing::new(&layout, &site).asset_url(path));
            Ok(())
        }
    }
}

fn list(layout: &ThemeLayout, json: bool) -> Result<()> {
    let records = discover(layout)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }
    if records.is_empty() {
        eprintln!("No components installed.");
        return Ok(());
    }
    for record in &records {
        let version = if record.version.is_empty() {
            "-"
        } else {
            record.version.as_str()
        };
        println!("{}\t{}\t{}", record.name, version, record.filepath.display());
    }
    Ok(())
}

struct Cli {
    command: Command,
    config: Option<PathBuf>,
}

enum Command {
    List { json: bool },
    Render { can_edit: bool },
    Provision,
    AssetUrl(PathBuf),
}

impl Cli {
    fn parse() -> Result<Self> {
        let mut args = env::args().skip(1);
        let mut command = None;
        let mut config = None;
        let mut json = false;
        let mut can_edit = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--list" | "-l" => command = Some(Command::List { json: false }),
                "--render" | "-r" => command = Some(Command::Render { can_edit: false }),
                "--provision" | "-p" => command = Some(Command::Provision),
                "--asset-url" => {
                    let Some(path) = args.next() else {
                        bail!("--asset-url requires a path");
                    };
                    command = Some(Command::AssetUrl(PathBuf::from(path)));
                }
                "--config" | "-c" => {
                    let Some(path) = args.next() else {
                        bail!("--config requires a path");
                    };
                    config = Some(PathBuf::from(path));
                }
                "--json" => json = true,
                "--can-edit" => can_edit = true,
                "--help" | "-h" => usage(0),
                other => {
                    eprintln!("Unknown argument: {other}");
                    usage(1);
                }
            }
        }

        let command = match command {
            Some(Command::List { .. }) => Command::List { json },
            Some(Command::Render { .. }) => Command::Render { can_edit },
            Some(other) => other,
            None => usage(1),
        };
        Ok(Self { command, config })
    }
}

fn usage(code: i32) -> ! {
    eprintln!(
        "Usage: theme-components (--list [--json] | --render [--can-edit] | --provision | --asset-url <path>) [--config <file>]\n\nCommands:\n  --list, -l        Print discovered components (name, version, marker path).\n  --render, -r      Print the admin listing markup.\n  --provision, -p   Create the override theme's components directory.\n  --asset-url PATH  Print the public URL for a component marker.\n\nWithout --config the layout is read from THEME_COMPONENTS_THEME_ROOT,\nTHEME_COMPONENTS_TEMPLATE, THEME_COMPONENTS_STYLESHEET (optional),\nTHEME_COMPONENTS_SITE_ROOT, THEME_COMPONENTS_SITE_URL and\nTHEME_COMPONENTS_ADMIN_URL."
    );
    std::process::exit(code);
}
