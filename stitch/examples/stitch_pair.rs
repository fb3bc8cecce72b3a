//! Stitch two photos from disk and write the five step renders as PNGs.
//!
//! Usage: stitch_pair <left-image> <right-image> [out-dir]

use pano_stitch::Stitcher;
use std::env;
use std::error::Error;
use std::fs;
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

fn main() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        eprintln!("usage: {} <left-image> <right-image> [out-dir]", args[0]);
        std::process::exit(2);
    }

    let left = fs::read(&args[1])?;
    let right = fs::read(&args[2])?;
    let out_dir = PathBuf::from(args.get(3).map(String::as_str).unwrap_or("."));

    pano_core::init_global_thread_pool(None)?;

    // Run the pipeline on a worker and collect the result over a channel,
    // keeping the calling thread free.
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let stitcher = Stitcher::default();
        let _ = tx.send(stitcher.run_bytes(&left, &right));
    });

    let result = rx.recv()??;

    fs::create_dir_all(&out_dir)?;
    for (step, image) in result.iter() {
        let name = format!(
            "step_{}_{}.png",
            step.index(),
            step.label().to_lowercase().replace(' ', "_")
        );
        let path = out_dir.join(name);
        image.save(&path)?;
        println!("wrote {}", path.display());
    }

    Ok(())
}
