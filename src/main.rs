use std::path::PathBuf;

use anyhow::{bail, Context as _, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::fmt::SubscriberBuilder;
use triangulator::{
    codec,
    loader::{Loader, PlainFileLoader},
    service::{DirectoryStore, Service},
    Predicates, Settings, TriangulatorBuilder,
};

#[derive(Parser)]
#[command(name = "triangulator", version, about)]
struct Cmd {
    /// Log debug events
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Convert a text point file, one `x y` per line, to a binary PointSet
    Encode {
        #[arg(short, long, value_name = "PATH")]
        input: PathBuf,
        #[arg(short, long, value_name = "PATH")]
        output: PathBuf,
    },
    /// Run the triangulate pipeline for a point set held in a store directory
    Triangulate {
        /// Directory holding `<id>.bin` PointSet files
        #[arg(long, value_name = "DIR")]
        store: PathBuf,
        #[arg(long)]
        id: String,
        /// Where to write the TriangleSet, nothing is written when omitted
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
        /// JSON settings file
        #[arg(long, value_name = "PATH")]
        config: Option<PathBuf>,
        /// Overrides the configured epsilon
        #[arg(long)]
        epsilon: Option<f64>,
        /// Use exact predicates, overrides the configured ones
        #[arg(long)]
        robust: bool,
    },
    /// Print a binary PointSet, or a TriangleSet with --triangles, as JSON
    Decode {
        #[arg(short, long, value_name = "PATH")]
        input: PathBuf,
        #[arg(long)]
        triangles: bool,
    },
}

fn main() -> Result<()> {
    let cmd = Cmd::parse();
    let level = if cmd.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    SubscriberBuilder::default()
        .with_target(false)
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match cmd.action {
        Action::Encode { input, output } => encode(input, output),
        Action::Triangulate {
            store,
            id,
            output,
            config,
            epsilon,
            robust,
        } => {
            let mut settings = match config {
                Some(path) => Settings::from_json_file(&path)
                    .with_context(|| format!("loading settings from {}", path.display()))?,
                None => Settings::default(),
            };
            if let Some(epsilon) = epsilon {
                settings.epsilon = epsilon;
            }
            if robust {
                settings.predicates = Predicates::Robust;
            }
            settings.validate()?;
            triangulate(store, id, output, settings)
        }
        Action::Decode { input, triangles } => decode(input, triangles),
    }
}

fn encode(input: PathBuf, output: PathBuf) -> Result<()> {
    let points = PlainFileLoader::default()
        .load(&input.to_string_lossy())
        .with_context(|| format!("loading {}", input.display()))?;
    let bytes = codec::encode_point_set(&points)?;
    std::fs::write(&output, &bytes)?;
    tracing::info!(
        points = points.len(),
        bytes = bytes.len(),
        output = %output.display(),
        "encoded"
    );
    Ok(())
}

fn triangulate(store: PathBuf, id: String, output: Option<PathBuf>, settings: Settings) -> Result<()> {
    tracing::info!(store = %store.display(), id = %id, ?settings, "triangulate");
    let triangulator = TriangulatorBuilder::with_settings(settings).build();
    let service = Service::new(DirectoryStore::new(store), triangulator);

    let response = service.handle("GET", &format!("/triangulate/{id}"));
    if !response.is_success() {
        println!("{}", String::from_utf8_lossy(&response.body));
        bail!("request failed with status {}", response.status);
    }

    let (points, triangles) = codec::decode_triangles(&response.body)?;
    tracing::info!(
        points = points.len(),
        triangles = triangles.len(),
        "triangulated"
    );
    if let Some(output) = output {
        std::fs::write(&output, &response.body)?;
    }
    Ok(())
}

fn decode(input: PathBuf, triangles: bool) -> Result<()> {
    let bytes = std::fs::read(&input).with_context(|| format!("reading {}", input.display()))?;
    let value = if triangles {
        let (points, triangles) = codec::decode_triangles(&bytes)?;
        let triangles = triangles.iter().map(|t| t.indices()).collect::<Vec<_>>();
        serde_json::json!({ "points": points, "triangles": triangles })
    } else {
        let points = codec::decode_point_set(&bytes)?;
        serde_json::json!({ "points": points })
    };
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}
