//! Image to voxel mesh converter.
//!
//! Loads an image, builds the voxel sculpture with the given settings,
//! optionally strips the background and recolors it, then exports a mesh.

use std::path::{Path, PathBuf};
use std::time::Instant;

use pixvox::color::Palette;
use pixvox::core::logging;
use pixvox::core::EditorConfig;
use pixvox::editor::VoxelEditorSession;
use pixvox::export::ExportFormat;
use pixvox::voxel::DepthMode;

#[derive(Debug)]
struct Args {
    image: PathBuf,
    output: PathBuf,
    config: Option<PathBuf>,
    cell_size: Option<f32>,
    depth_mode: Option<DepthMode>,
    depth_scale: Option<f32>,
    invert: bool,
    reduce: Option<f32>,
    seed: Option<u64>,
    extrude: bool,
    remove_background: Option<f32>,
    palette: Option<Palette>,
    format: ExportFormat,
}

fn value<T: std::str::FromStr>(flag: &str, raw: Option<String>) -> Result<T, String> {
    let raw = raw.ok_or_else(|| format!("{flag} needs a value"))?;
    raw.parse().map_err(|_| format!("invalid value for {flag}: {raw}"))
}

fn parse_args() -> Result<Args, String> {
    let mut args = std::env::args().skip(1);
    let mut positional = Vec::new();

    let mut config = None;
    let mut cell_size = None;
    let mut depth_mode = None;
    let mut depth_scale = None;
    let mut invert = false;
    let mut reduce = None;
    let mut seed = None;
    let mut extrude = false;
    let mut remove_background = None;
    let mut palette = None;
    let mut format = ExportFormat::Obj;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-c" | "--config" => config = Some(value::<PathBuf>(&arg, args.next())?),
            "-s" | "--cell-size" => cell_size = Some(value(&arg, args.next())?),
            "-d" | "--depth-mode" => depth_mode = Some(value(&arg, args.next())?),
            "--depth-scale" => depth_scale = Some(value(&arg, args.next())?),
            "--invert" => invert = true,
            "-r" | "--reduce" => reduce = Some(value(&arg, args.next())?),
            "--seed" => seed = Some(value(&arg, args.next())?),
            "-e" | "--extrude" => extrude = true,
            "-b" | "--remove-background" => remove_background = Some(value(&arg, args.next())?),
            "-p" | "--palette" => palette = Some(value(&arg, args.next())?),
            "-f" | "--format" => format = value(&arg, args.next())?,
            "-h" | "--help" | "help" => return Err("show_help".to_string()),
            flag if flag.starts_with('-') => return Err(format!("unknown option {flag}")),
            other => positional.push(PathBuf::from(other)),
        }
    }

    let mut positional = positional.into_iter();
    let (Some(image), Some(output), None) =
        (positional.next(), positional.next(), positional.next())
    else {
        return Err("expected <IMAGE> and <OUTPUT_STEM>".to_string());
    };

    Ok(Args {
        image,
        output,
        config,
        cell_size,
        depth_mode,
        depth_scale,
        invert,
        reduce,
        seed,
        extrude,
        remove_background,
        palette,
        format,
    })
}

fn print_help() {
    println!("Image to voxel mesh converter");
    println!("=============================");
    println!();
    println!("Usage: voxelize [OPTIONS] <IMAGE> <OUTPUT_STEM>");
    println!();
    println!("Options:");
    println!("  -c, --config <FILE>            Editor config JSON (flags override it)");
    println!("  -s, --cell-size <PX>           Grid cell size in pixels (default: 20)");
    println!("  -d, --depth-mode <MODE>        red, green, blue, brightness, saturation, hue");
    println!("      --depth-scale <N>          Maximum depth offset (default: 50)");
    println!("      --invert                   Invert the depth mapping");
    println!("  -r, --reduce <PERCENT>         Randomly drop this share of cells");
    println!("      --seed <N>                 Seed for --reduce");
    println!("  -e, --extrude                  Fill columns from z = 0 to the depth");
    println!("  -b, --remove-background <T>    Remove the dominant color within distance T");
    println!("  -p, --palette <NAME|HEX,...>   pastel, neon, earth, ocean or a hex list");
    println!("  -f, --format <FORMAT>          obj, obj-mtl or ply (default: obj)");
    println!();
    println!("Examples:");
    println!("  voxelize photo.png out/photo");
    println!("  voxelize -s 10 -d hue -b 30 -p ocean -f obj-mtl logo.png out/logo");
}

fn build_config(args: &Args) -> pixvox::core::Result<EditorConfig> {
    let mut config = match &args.config {
        Some(path) => EditorConfig::load_sync(path)?,
        None => EditorConfig::default(),
    };

    if let Some(cell_size) = args.cell_size {
        config.cell_size = cell_size;
    }
    if let Some(mode) = args.depth_mode {
        config.depth.mode = mode;
    }
    if let Some(scale) = args.depth_scale {
        config.depth.scale = scale;
    }
    if args.invert {
        config.depth.invert = true;
    }
    if let Some(reduce) = args.reduce {
        config.reduce_percent = reduce;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if args.extrude {
        config.extrude = true;
    }
    config.validate()?;
    Ok(config)
}

fn run(args: &Args) -> pixvox::core::Result<Vec<PathBuf>> {
    let config = build_config(args)?;
    let mut session = VoxelEditorSession::new(config);

    let start = Instant::now();
    let count = session.open_image(&args.image)?;
    let params = *session.grid_params();
    println!(
        "Generated {} voxels on a {}x{} grid in {:.1}ms",
        count,
        params.cols,
        params.rows,
        start.elapsed().as_secs_f64() * 1000.0
    );

    if let Some(threshold) = args.remove_background {
        let removed = session.remove_background(threshold);
        println!("Removed {} background voxels", removed);
    }
    if let Some(palette) = &args.palette {
        let recolored = session.apply_palette(palette);
        println!("Recolored {} cells", recolored);
    }

    let dir = match args.output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir)?;
    let stem = stem_of(&args.output);

    session.export(args.format, &dir, &stem)
}

fn stem_of(output: &Path) -> String {
    output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "voxel_art".to_string())
}

fn main() {
    logging::init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            if e == "show_help" {
                print_help();
                return;
            }
            eprintln!("Error: {}", e);
            print_help();
            std::process::exit(1);
        }
    };

    match run(&args) {
        Ok(paths) => {
            for path in paths {
                println!("Wrote {}", path.display());
            }
        }
        Err(e) => {
            log::error!("voxelize failed: {}", e);
            std::process::exit(1);
        }
    }
}
