//! `watlas` command line front end: display or load water atlas fragments
//! against a headless renderer.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use serde_json::json;
use watlas_sync::color::ColorFormat;
use watlas_sync::download::SourceFetcher;
use watlas_sync::options::Options;
use watlas_sync::renderer::HeadlessRenderer;
use watlas_sync::resources::{ResourceRef, ResourceType, DENSITY_MAP_KINDS};
use watlas_sync::{DisplaySynchronizer, FragmentKey, ResourceKind};

type Synchronizer = DisplaySynchronizer<HeadlessRenderer, SourceFetcher>;

#[derive(Parser)]
#[command(name = "watlas", version, about = "Water atlas fragment loader")]
struct Cli {
    /// Options file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Override the fragment data root (directory or http(s) URL)
    #[arg(long, global = true)]
    data_root: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Display one fragment and print its state and colors as JSON
    Show {
        /// Dinucleotide class code, e.g. AA00
        code: String,
        /// Sequence, e.g. A_A
        seq: String,
        /// Structure kinds to show (reference, base, step, phos)
        #[arg(long, value_delimiter = ',')]
        structures: Vec<ResourceKind>,
        /// Density map kinds to show (base, step, phos)
        #[arg(long, value_delimiter = ',')]
        density_maps: Vec<ResourceKind>,
    },
    /// Load fragment bundles given as CODE:SEQ
    Load {
        #[arg(required = true, value_parser = parse_key)]
        fragments: Vec<FragmentKey>,
    },
    /// Print the options JSON schema
    Schema,
}

fn parse_key(s: &str) -> Result<FragmentKey, String> {
    match s.split_once(':') {
        Some((code, seq)) if !code.is_empty() && !seq.is_empty() => {
            Ok(FragmentKey::new(code, seq))
        }
        _ => Err(format!("expected CODE:SEQ, got {s}")),
    }
}

fn options(cli: &Cli) -> anyhow::Result<Options> {
    let mut options = match &cli.config {
        Some(path) => Options::load(path)
            .with_context(|| format!("reading {}", path.display()))?,
        None => Options::default(),
    };
    if let Some(root) = &cli.data_root {
        options.links.data_root.clone_from(root);
    }
    Ok(options)
}

fn synchronizer(options: &Options) -> Synchronizer {
    let fetcher =
        SourceFetcher::for_root(&options.links.data_root, &options.fetch);
    DisplaySynchronizer::new(HeadlessRenderer::new(), fetcher, options)
}

fn show(
    sync: &mut Synchronizer,
    key: &FragmentKey,
    structures: &[ResourceKind],
    density_maps: &[ResourceKind],
) -> anyhow::Result<()> {
    if let Err(e) = sync.add(key, structures, density_maps) {
        for message in e.messages() {
            log::error!("{message}");
        }
        bail!("could not display {key}");
    }

    let state = sync.fragment(key).context("fragment state missing")?;
    let colors = sync.fragment_colors(key, ColorFormat::Style);
    let map_visuals: serde_json::Map<_, _> = DENSITY_MAP_KINDS
        .into_iter()
        .filter_map(|kind| {
            let map = ResourceRef::new(key, kind, ResourceType::DensityMap);
            let visuals = sync.renderer().map_visuals(&map)?;
            Some((kind.to_string(), json!(visuals)))
        })
        .collect();
    let out = json!({
        "state": state,
        "colors": colors,
        "visuals": sync.renderer().visual_count(),
        "density_map_visuals": map_visuals,
    });
    writeln!(io::stdout().lock(), "{}", serde_json::to_string_pretty(&out)?)?;
    Ok(())
}

fn load(sync: &mut Synchronizer, keys: &[FragmentKey]) -> anyhow::Result<()> {
    let outcome = sync.load_with_progress(keys, |done, total| {
        log::info!("processed {done} of {total} fragment(s)");
    });
    if let Err(e) = &outcome {
        for message in e.messages() {
            log::error!("{message}");
        }
    }

    let mut stdout = io::stdout().lock();
    for key in keys {
        let status = if sync.is_loaded(key) { "loaded" } else { "failed" };
        writeln!(stdout, "{key}\t{status}")?;
    }

    if outcome.is_err() {
        bail!("some fragments failed to load");
    }
    Ok(())
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let options = options(cli)?;

    match &cli.command {
        Command::Show {
            code,
            seq,
            structures,
            density_maps,
        } => {
            let mut sync = synchronizer(&options);
            show(
                &mut sync,
                &FragmentKey::new(code.as_str(), seq.as_str()),
                structures,
                density_maps,
            )
        }
        Command::Load { fragments } => {
            let mut sync = synchronizer(&options);
            load(&mut sync, fragments)
        }
        Command::Schema => {
            let schema = serde_json::to_string_pretty(&Options::json_schema())?;
            writeln!(io::stdout().lock(), "{schema}")?;
            Ok(())
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        log::error!("{e:#}");
        process::exit(1);
    }
}
