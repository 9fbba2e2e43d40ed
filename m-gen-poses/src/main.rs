#![cfg(feature = "generator")]

use std::error::Error;
use std::path::PathBuf;

use m_gen_poses::script::{DEMO_RECORDING_PATH, demo_recording};

fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}

fn main() -> Result<(), Box<dyn Error>> {
    let root = workspace_root();

    let recording = demo_recording();
    let text = recording.to_jsonl()?;
    let path = root.join(DEMO_RECORDING_PATH);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, &text)?;
    println!("wrote {} ({} frames)", path.display(), recording.len());

    Ok(())
}
