use std::sync::Arc;

use clap::Parser;
use itertools::Itertools;
use log::info;

use levelgraph::animation::walker::AnimationWalker;
use levelgraph::common::festivals::festival_label;
use levelgraph::common::layout::FestivalFilter;
use levelgraph::io::fs::loader::DirectoryLoader;
use levelgraph::loader::json_decoder::JsonDecoder;
use levelgraph::scene::debug::describe;
use levelgraph::scene::loader::SceneLoader;
use levelgraph::settings::{CliArgs, OperationMode};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = CliArgs::parse();
    log::trace!("Starting with args: {:?}", args);

    let fetcher = Arc::new(DirectoryLoader::new(&args.data_dir, args.path_base.clone()));
    let loader = SceneLoader::new(fetcher, Arc::new(JsonDecoder::new()));
    let filter = args
        .festival
        .map(FestivalFilter::with_festival)
        .unwrap_or_default();

    let mut bundle = match &args.operation_mode {
        OperationMode::Level { level } => loader.load_level(level, filter).await?,
        OperationMode::Container { path } => loader.load_container(path, filter).await?,
    };

    if let Some(time_ms) = args.animate_ms {
        let animated = AnimationWalker::new().update(&mut bundle.graph, time_ms);
        info!("Animated {} nodes at {}ms", animated, time_ms);
    }

    println!(
        "{} nodes, {} distinct models to draw, {} draw calls",
        bundle.graph.len(),
        bundle.renderables.len(),
        bundle.graph.draw_list().len()
    );
    println!("{:?}", bundle.stats);
    if !bundle.festivals.is_empty() {
        println!(
            "Festivals: {}",
            bundle.festivals.iter().map(|&id| festival_label(id)).join(", ")
        );
    }

    if args.dump_tree {
        for line in describe(&bundle.graph) {
            println!("{}", line);
        }
    }

    Ok(())
}
