//! Command-line front-end: parse a CSG scene, voxelize it, write OBJ.

use std::fs::File;
use std::io::{BufWriter, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "ocmesh",
    about = "Voxelize a CSG scene description and export an OBJ mesh"
)]
struct Cli {
    /// Scene description to read.
    input: PathBuf,

    /// Mesh file to write.
    output: PathBuf,

    /// Smallest voxel edge, as a fraction of the scene bounding box
    /// side.
    #[arg(short, long, default_value_t = 0.01)]
    precision: f32,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // Let clap print its own usage/help text, but keep the
            // exit code contract: 1 for any argument problem.
            let _ = err.print();
            return match err.kind() {
                clap::error::ErrorKind::DisplayHelp
                | clap::error::ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::from(1),
            };
        }
    };

    if !(cli.precision > 0.0 && cli.precision <= 1.0) {
        error!("precision must be in (0, 1]");
        return ExitCode::from(1);
    }

    let mut source = String::new();
    match File::open(&cli.input) {
        Ok(mut file) => {
            if let Err(err) = file.read_to_string(&mut source) {
                error!("cannot read {}: {err}", cli.input.display());
                return ExitCode::from(2);
            }
        }
        Err(err) => {
            error!("cannot open {}: {err}", cli.input.display());
            return ExitCode::from(2);
        }
    }

    let output = match File::create(&cli.output) {
        Ok(file) => file,
        Err(err) => {
            error!("cannot open {}: {err}", cli.output.display());
            return ExitCode::from(3);
        }
    };

    let scene = match ocmesh::parse(&source) {
        Ok(scene) => scene,
        Err(err) => {
            error!("{}: {err}", cli.input.display());
            return ExitCode::from(4);
        }
    };
    if scene.is_empty() {
        error!("{}: scene contains no `build` statements", cli.input.display());
        return ExitCode::from(4);
    }

    let octree = ocmesh::Octree::from_scene(&scene, cli.precision);

    let mut writer = BufWriter::new(output);
    if let Err(err) = ocmesh::obj::write_obj(&octree, &mut writer) {
        error!("cannot write {}: {err}", cli.output.display());
        return ExitCode::from(3);
    }

    ExitCode::SUCCESS
}
