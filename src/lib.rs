// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Terra Asset: interactive geometry editing core for a 3D globe asset editor

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod config;
pub mod data;
pub mod editing;
pub mod geo;
pub mod interchange;
pub mod model;
pub mod scene;
pub mod settings;
pub mod store;
pub mod style;
pub mod theme;

use config::EditorConfig;
use data::{AppState, AutoConfirm};
use model::LayerId;
use scene::HeadlessScene;
use store::JsonFileStore;

#[derive(Debug, Parser)]
#[command(name = "terra-asset")]
#[command(about = "Inspect, import and export the layers of a Terra Asset store")]
struct Cli {
    /// Editor configuration file (defaults to terra-asset.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: CliCommand,
}

/// What the command line asked for
#[derive(Debug, Clone, PartialEq, Subcommand)]
enum CliCommand {
    /// List layers with their feature counts
    List,
    /// Import a FeatureCollection file into a new layer
    Import { file: PathBuf },
    /// Write a layer as a FeatureCollection (stdout unless OUT is given)
    Export { layer: i64, out: Option<PathBuf> },
}

/// Entry point for the terra-asset command line tool
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = EditorConfig::load_or_default(cli.config.as_deref())?;

    // RUST_LOG wins over the configured filter
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log.filter)),
        )
        .init();

    let store = JsonFileStore::open(&config.store.path)
        .with_context(|| format!("Failed to open store {}", config.store.path.display()))?;
    tracing::info!("Using store {}", store.path().display());
    let mut state = AppState::new(store, HeadlessScene::new(), AutoConfirm).with_config(&config);
    futures::executor::block_on(state.load());
    fail_on_alerts(&mut state)?;

    match cli.command {
        CliCommand::List => list_layers(&state),
        CliCommand::Import { file } => import_file(&mut state, &file)?,
        CliCommand::Export { layer, out } => export_layer(&mut state, LayerId(layer), out)?,
    }
    Ok(())
}

type CliState = AppState<JsonFileStore, HeadlessScene, AutoConfirm>;

fn list_layers(state: &CliState) {
    for layer in state.workspace.layers() {
        let count = state.workspace.features_of(layer.id).count();
        let visibility = if layer.visible { "" } else { " (hidden)" };
        println!("{}\t{}\t{}\t{} features{}", layer.id, layer.kind, layer.name, count, visibility);
    }
}

fn import_file(state: &mut CliState, path: &std::path::Path) -> Result<()> {
    let text = std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let imported = futures::executor::block_on(state.import_feature_collection(&file_name, &text));
    let alerts = state.take_notifications();
    match imported {
        Some(_) => {
            for alert in alerts {
                println!("{alert}");
            }
            Ok(())
        }
        None => bail!("{}", alerts.join("\n")),
    }
}

fn export_layer(state: &mut CliState, layer: LayerId, out: Option<PathBuf>) -> Result<()> {
    let Some(text) = state.export_layer(layer) else {
        fail_on_alerts(state)?;
        bail!("Layer {layer} does not exist");
    };
    match out {
        Some(path) => {
            std::fs::write(&path, text).with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!("Wrote {}", path.display());
        }
        None => println!("{text}"),
    }
    Ok(())
}

fn fail_on_alerts(state: &mut CliState) -> Result<()> {
    let alerts = state.take_notifications();
    if alerts.is_empty() {
        Ok(())
    } else {
        bail!("{}", alerts.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("terra-asset").chain(line.split_whitespace()))
    }

    #[test]
    fn parses_commands() {
        assert_eq!(parse("list").unwrap().command, CliCommand::List);
        assert_eq!(
            parse("import roads.geojson").unwrap().command,
            CliCommand::Import {
                file: PathBuf::from("roads.geojson")
            }
        );
        assert_eq!(
            parse("export 3 out.json").unwrap().command,
            CliCommand::Export {
                layer: 3,
                out: Some(PathBuf::from("out.json"))
            }
        );
    }

    #[test]
    fn config_flag_may_appear_anywhere() {
        let cli = parse("export 4 --config editor.toml").unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("editor.toml")));
        assert_eq!(cli.command, CliCommand::Export { layer: 4, out: None });

        let cli = parse("--config editor.toml list").unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("editor.toml")));
    }

    #[test]
    fn rejects_bad_invocations() {
        assert!(parse("").is_err());
        assert!(parse("export roads").is_err());
        assert!(parse("import").is_err());
        assert!(parse("list --config").is_err());
        assert!(parse("export 1 a b").is_err());
    }

    #[test]
    fn help_is_generated() {
        let err = parse("--help").unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
        assert!(err.to_string().contains("import"));
    }
}
