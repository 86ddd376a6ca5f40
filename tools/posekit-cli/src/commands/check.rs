//! Report which pose backends are available on this machine.

use std::path::{Path, PathBuf};

use posekit_common::config::AppConfig;
use posekit_invoker::{candidate_paths, locate_executable};

pub fn run(config: &AppConfig) {
    println!("MediaPipe worker:");
    let worker = &config.processor.worker;
    match worker.first() {
        Some(program) => {
            let status = if resolve_program(program).is_some() {
                "OK"
            } else {
                "--"
            };
            println!("  [{status}] {}", worker.join(" "));
            if let Some(script) = worker.get(1).filter(|arg| arg.ends_with(".py")) {
                let status = if Path::new(script).is_file() { "OK" } else { "--" };
                println!("  [{status}] {script}");
            }
        }
        None => println!("  [--] no worker command configured"),
    }
    println!();

    println!("OpenPose executable:");
    let candidates = candidate_paths(&config.invoker.extra_candidates);
    for path in &candidates {
        let status = if path.exists() { "OK" } else { "--" };
        println!("  [{status}] {}", path.display());
    }
    match locate_executable(&candidates) {
        Some(path) => println!("  Using: {}", path.display()),
        None => println!("  Not installed"),
    }
}

/// Resolve a program name the way the shell would.
fn resolve_program(program: &str) -> Option<PathBuf> {
    let path = Path::new(program);
    if path.components().count() > 1 {
        return path.is_file().then(|| path.to_path_buf());
    }
    std::env::var_os("PATH").and_then(|dirs| {
        std::env::split_paths(&dirs)
            .map(|dir| dir.join(program))
            .find(|candidate| candidate.is_file())
    })
}
