mod provenance;
mod table;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use footprint::geom::rand::{draw_block, BlockCfg, ReplayToken};
use footprint::{
    calc_forces, polsby_popper, relative_position, ClassifyCfg, ForceCfg, Frame, Overwrite,
};
use serde::Serialize;
use tracing_subscriber::fmt::SubscriberBuilder;

use crate::provenance::{current_git_rev, write_sidecar, Provenance};
use crate::table::{attribute_frame, read_vertices, vertex_frame, write_frame, Keyed};

#[derive(Parser)]
#[command(name = "footprint-cli")]
#[command(about = "Force descriptors and relative position of building footprints")]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

#[derive(Clone, Copy, Debug, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
enum FrameArg {
    /// Longitude/latitude degrees (WGS84); projected to UTM internally
    Geographic,
    /// Already projected coordinates
    Planar,
}

impl From<FrameArg> for Frame {
    fn from(f: FrameArg) -> Self {
        match f {
            FrameArg::Geographic => Frame::Geographic,
            FrameArg::Planar => Frame::Planar,
        }
    }
}

#[derive(clap::Args, Debug, Serialize)]
struct ForcesArgs {
    /// Vertex table (CSV or .parquet): footprint, x, y, extra attributes
    #[arg(long)]
    input: PathBuf,
    /// Attribute table to write (CSV or .parquet)
    #[arg(long)]
    out: PathBuf,
    /// Interaction reach in working-frame units
    #[arg(long, default_value_t = 0.0)]
    buffer: f64,
    /// Numeric column scaling the normals
    #[arg(long)]
    height_column: Option<String>,
    #[arg(long, value_enum, default_value_t = FrameArg::Planar)]
    frame: FrameArg,
    /// Also write relative_position
    #[arg(long)]
    classify: bool,
    /// Also write polsby_popper
    #[arg(long)]
    polsby_popper: bool,
    #[arg(long, default_value_t = 0.05)]
    force_significance: f64,
    #[arg(long, default_value_t = 0.6)]
    angle_significance: f64,
    /// Fail instead of overwriting existing output columns
    #[arg(long)]
    strict: bool,
}

#[derive(clap::Args, Debug, Serialize)]
struct SynthArgs {
    /// Vertex table to write (CSV or .parquet)
    #[arg(long)]
    out: PathBuf,
    #[arg(long, default_value_t = 0)]
    seed: u64,
    #[arg(long, default_value_t = 6)]
    rows: usize,
    #[arg(long, default_value_t = 6)]
    cols: usize,
    /// Cell side length
    #[arg(long, default_value_t = 10.0)]
    cell: f64,
}

#[derive(Subcommand)]
enum Action {
    /// Compute force descriptors for a vertex table
    Forces(ForcesArgs),
    /// Write a synthetic block of footprints as a vertex table
    Synth(SynthArgs),
    /// Print a small provenance JSON block
    Report,
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Forces(args) => forces(&args),
        Action::Synth(args) => synth(&args),
        Action::Report => report(),
    }
}

fn forces(args: &ForcesArgs) -> Result<()> {
    tracing::info!(
        input = %args.input.display(),
        out = %args.out.display(),
        buffer = args.buffer,
        "forces"
    );
    let overwrite = if args.strict {
        Overwrite::Strict
    } else {
        Overwrite::Warn
    };
    let Keyed { keys, set } = read_vertices(&args.input, args.frame.into())?;

    let cfg = ForceCfg {
        buffer: args.buffer,
        height_column: args.height_column.clone(),
        overwrite,
        ..ForceCfg::default()
    };
    let mut set = calc_forces(&set, &cfg).context("computing forces")?;
    if args.polsby_popper {
        set = polsby_popper(&set, overwrite)?;
    }
    if args.classify {
        let cfg = ClassifyCfg {
            force_significance: args.force_significance,
            angle_significance: args.angle_significance,
            overwrite,
        };
        set = relative_position(&set, &cfg).context("classifying")?;
    }

    let keyed = Keyed { keys, set };
    write_frame(&args.out, &mut attribute_frame(&keyed)?)?;
    let prov = Provenance::new(serde_json::to_value(args)?).with_input(&args.input);
    write_sidecar(&args.out, prov)?;
    Ok(())
}

fn synth(args: &SynthArgs) -> Result<()> {
    tracing::info!(out = %args.out.display(), seed = args.seed, "synth");
    let cfg = BlockCfg {
        rows: args.rows,
        cols: args.cols,
        cell: args.cell,
        ..BlockCfg::default()
    };
    let set = draw_block(
        cfg,
        ReplayToken {
            seed: args.seed,
            index: 0,
        },
    );
    let keyed = Keyed {
        keys: (0..set.len() as i64).collect(),
        set,
    };
    write_frame(&args.out, &mut vertex_frame(&keyed)?)?;
    write_sidecar(&args.out, Provenance::new(serde_json::to_value(args)?))?;
    Ok(())
}

fn report() -> Result<()> {
    let obj = serde_json::json!({
        "tool": env!("CARGO_PKG_NAME"),
        "version": footprint::VERSION,
        "code_rev": current_git_rev(),
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;
    use std::path::Path;
    use tempfile::tempdir;

    fn sidecar_of(out: &Path) -> PathBuf {
        let mut name = out.as_os_str().to_os_string();
        name.push(".provenance.json");
        PathBuf::from(name)
    }

    fn forces_args(input: PathBuf, out: PathBuf) -> ForcesArgs {
        ForcesArgs {
            input,
            out,
            buffer: 0.0,
            height_column: Some("height".into()),
            frame: FrameArg::Planar,
            classify: true,
            polsby_popper: true,
            force_significance: 0.05,
            angle_significance: 0.6,
            strict: false,
        }
    }

    #[test]
    fn synth_then_forces_end_to_end() {
        let dir = tempdir().unwrap();
        let vertices = dir.path().join("block.csv");
        let attrs = dir.path().join("out/attrs.csv");
        synth(&SynthArgs {
            out: vertices.clone(),
            seed: 4,
            rows: 4,
            cols: 5,
            cell: 10.0,
        })
        .unwrap();
        assert!(sidecar_of(&vertices).exists());

        forces(&forces_args(vertices.clone(), attrs.clone())).unwrap();
        assert!(sidecar_of(&attrs).exists());

        let df = LazyCsvReader::new(&attrs)
            .finish()
            .unwrap()
            .collect()
            .unwrap();
        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|n| n.to_string())
            .collect();
        for col in [
            "footprint",
            "height",
            "force",
            "confinement",
            "momentum",
            "normalized_angle",
            "polsby_popper",
            "relative_position",
        ] {
            assert!(names.iter().any(|n| n == col), "missing {col}");
        }
        let input = read_vertices(&vertices, Frame::Planar).unwrap();
        assert_eq!(df.height(), input.set.len());
    }

    #[test]
    fn strict_rerun_on_own_output_fails() {
        let dir = tempdir().unwrap();
        let vertices = dir.path().join("v.csv");
        std::fs::write(
            &vertices,
            "footprint,x,y,force\n1,0,0,3\n1,10,0,3\n1,10,10,3\n1,0,10,3\n",
        )
        .unwrap();
        let mut args = forces_args(vertices, dir.path().join("a.csv"));
        args.height_column = None;
        args.strict = true;
        assert!(forces(&args).is_err());
        args.strict = false;
        assert!(forces(&args).is_ok());
    }

    #[test]
    fn clockwise_rings_still_share_walls() {
        let dir = tempdir().unwrap();
        let vertices = dir.path().join("v.csv");
        // Footprint 1 is wound clockwise, footprint 2 counter-clockwise.
        std::fs::write(
            &vertices,
            "footprint,x,y\n1,0,0\n1,0,10\n1,10,10\n1,10,0\n2,10,0\n2,20,0\n2,20,10\n2,10,10\n",
        )
        .unwrap();
        let attrs = dir.path().join("a.csv");
        forces(&forces_args(vertices, attrs.clone())).unwrap();
        let df = LazyCsvReader::new(&attrs)
            .finish()
            .unwrap()
            .collect()
            .unwrap();
        let force = df.column("force").unwrap().f64().unwrap();
        for f in force.into_iter() {
            assert!((f.unwrap() - 10.0).abs() < 1e-6);
        }
    }
}
