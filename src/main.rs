//! LED cube CLI - Inspect and generate `.cbin` animations.

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use ledcube::{
    CUBE_SIZE,
    animation::{CbinRecorder, RecorderConfig, load},
    schema::{EditorConfig, VoxelGrid},
};

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage(&args[0]);
        process::exit(1);
    }

    let result = match args[1].as_str() {
        "--example" => {
            print_example_config();
            Ok(())
        }
        "info" if args.len() >= 3 => info(Path::new(&args[2])),
        "dump" if args.len() >= 3 => {
            let frame = args.get(3).and_then(|s| s.parse().ok());
            dump(Path::new(&args[2]), frame)
        }
        "noise" if args.len() >= 4 => noise(&args[2..]),
        _ => {
            print_usage(&args[0]);
            process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn print_usage(program: &str) {
    eprintln!("Usage: {} <command> [args]", program);
    eprintln!();
    eprintln!("Inspect and generate LED cube .cbin animations.");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  info <file.cbin>                   Print header and size summary");
    eprintln!("  dump <file.cbin> [frame]           Print z planes of each frame");
    eprintln!("  noise <file.cbin> <frames> [seed] [--config cfg.json]");
    eprintln!("                                     Write a random animation");
    eprintln!("  --example                          Print example configuration");
}

fn info(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let sequence = load(path, u32::MAX)?;
    let file_len = fs::metadata(path)?.len();

    println!("{}", path.display());
    println!("  Frames: {}", sequence.frame_count());
    println!("  Delay: {} ms", sequence.delay);
    println!("  Loop: {}", sequence.looping);
    println!(
        "  Size: {} bytes ({} expected)",
        file_len,
        sequence.encoded_len()
    );
    let lit: usize = sequence.frames.iter().map(VoxelGrid::count_occupied).sum();
    println!("  Lit voxels: {}", lit);
    Ok(())
}

fn dump(path: &Path, only: Option<usize>) -> Result<(), Box<dyn std::error::Error>> {
    let sequence = load(path, u32::MAX)?;

    for (i, frame) in sequence.frames.iter().enumerate() {
        if only.is_some_and(|n| n != i) {
            continue;
        }
        println!("Frame {}:", i);
        for z in 0..CUBE_SIZE {
            println!("  z={}", z);
            for y in (0..CUBE_SIZE).rev() {
                let row: String = (0..CUBE_SIZE)
                    .map(|x| if frame.get(x, y, z) { '#' } else { '.' })
                    .collect();
                println!("    {}", row);
            }
        }
    }
    Ok(())
}

fn noise(args: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let path = PathBuf::from(&args[0]);
    let frames: u32 = args[1].parse()?;

    let mut seed = 0u64;
    let mut config = EditorConfig::default();
    let mut rest = args[2..].iter();
    while let Some(arg) = rest.next() {
        if arg == "--config" {
            let config_path = rest.next().ok_or("--config needs a path")?;
            config = EditorConfig::from_json(&fs::read_to_string(config_path)?)?;
        } else {
            seed = arg.parse()?;
        }
    }

    let mut recorder = CbinRecorder::create(
        &path,
        config.delay_ms,
        config.looping,
        RecorderConfig::default(),
    )?;
    for i in 0..frames as u64 {
        recorder.record_frame(&VoxelGrid::noise(0.2, seed.wrapping_add(i)))?;
    }
    let stats = recorder.finalize()?;

    println!("Wrote {}: {}", path.display(), stats);
    Ok(())
}

fn print_example_config() {
    let config = EditorConfig::default();

    println!("Example configuration (config.json):");
    println!("{}", serde_json::to_string_pretty(&config).unwrap());
}
