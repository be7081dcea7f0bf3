use std::{
    path::{Path, PathBuf},
    process::ExitCode,
};

use anyhow::Context;
use clap::Parser;
use rayon::prelude::*;
use vtf::prelude::*;

/// Print the header and mipmap layout of .vtf files.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Files to read
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Only parse and validate the header
    #[arg(long)]
    header_only: bool,

    /// INI file with a [limits] section overriding the validation limits
    #[arg(long)]
    limits: Option<PathBuf>,

    /// Write the highest resolution image of frame 0 as PNG into this directory
    #[arg(long)]
    png: Option<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let decoder = match &args.limits {
        Some(path) => match DecoderLimits::load(path) {
            Ok(limits) => Decoder::new(limits),
            Err(e) => {
                log::error!("{}: {e}", path.display());
                return ExitCode::FAILURE;
            }
        },
        None => Decoder::default(),
    };

    // Independent files, independent decodes.
    let reports: Vec<_> = args
        .paths
        .par_iter()
        .map(|path| (path, readout(&decoder, path, &args)))
        .collect();

    let mut failed = false;
    for (path, report) in reports {
        match report {
            Ok(text) => print!("{text}"),
            Err(e) => {
                failed = true;
                log::error!("{}: {e:#}", path.display());
            }
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn readout(decoder: &Decoder, path: &Path, args: &Args) -> anyhow::Result<String> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;

    if args.header_only {
        let header = decoder.read_header(&bytes)?;
        return Ok(describe_header(path, &header));
    }

    let vtf = decoder.decode_vec(bytes)?;
    let mut out = describe_header(path, vtf.header());

    for (level, (width, height)) in vtf.mipmap_dimensions().into_iter().enumerate().rev() {
        out += &format!(
            "  mip {level:>2}: {width:>5}x{height:<5} {:>9} bytes x {} frames\n",
            vtf.image(level, 0, 0, 0).len(),
            vtf.frames()
        );
    }
    out += &format!("  thumbnail: {} bytes\n", vtf.low_res_image_data().len());

    if let Some(dir) = &args.png {
        let level = vtf.mipmap_count() - 1;
        let rgba = vtf.decode_rgba8(level, 0, &Texture2DDecoder)?;
        let stem = path.file_stem().unwrap_or_default();
        let out_path = dir.join(stem).with_extension("png");

        image::save_buffer(
            &out_path,
            &rgba,
            vtf.width(),
            vtf.height(),
            image::ExtendedColorType::Rgba8,
        )
        .with_context(|| format!("writing {}", out_path.display()))?;
        out += &format!("  wrote {}\n", out_path.display());
    }

    Ok(out)
}

fn describe_header(path: &Path, header: &VTFHeader) -> String {
    let format = header
        .high_res_image_format()
        .map_or_else(|| format!("unknown ({})", header.high_res_image_format), |f| format!("{f:?}"));

    format!(
        "{}: vtf {}.{} {}x{} {format}, {} mips, {} frames (first {}), thumbnail {}x{}\n  flags: {:?}\n  reflectivity: {:?} bumpmap scale {}\n",
        path.display(),
        header.version[0],
        header.version[1],
        header.width,
        header.height,
        header.mipmap_count,
        header.frames,
        header.first_frame,
        header.low_res_image_width,
        header.low_res_image_height,
        header.flags(),
        header.reflectivity,
        header.bumpmap_scale,
    )
}
