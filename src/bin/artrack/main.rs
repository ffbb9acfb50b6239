//! artrack CLI - Inspect and dry-run recorded AR capture sessions.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tracing_subscriber::EnvFilter;

use artrack::core::{AnchorRecord, AnchorType};
use artrack::playback::{
    AnchorRegistry, InvalidFramePolicy, PlaybackConfig, PlaybackDriver, StillDecoder,
};
use artrack::store::Session;

/// Log filter for each verbosity level.
const LOG_QUIET: &str = "error";
const LOG_INFO: &str = "info";
const LOG_DEBUG: &str = "debug";
const LOG_TRACE: &str = "trace";

/// Neutral gray used by the dry-run decoder.
const STILL_COLOR: [u8; 4] = [128, 128, 128, 255];

struct Options {
    log_level: &'static str,
    config: Option<PathBuf>,
    skip_invalid: bool,
    emit_invalid: bool,
    parallel: bool,
}

fn main() {
    let args: Vec<String> = env::args().collect();

    // Parse global flags
    let mut opts = Options {
        log_level: LOG_INFO,
        config: None,
        skip_invalid: false,
        emit_invalid: false,
        parallel: false,
    };
    let mut filtered_args: Vec<&str> = Vec::new();
    let mut iter = args[1..].iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-v" | "--verbose" => opts.log_level = LOG_DEBUG,
            "-vv" | "--trace" => opts.log_level = LOG_TRACE,
            "-q" | "--quiet" => opts.log_level = LOG_QUIET,
            "--skip-invalid" => opts.skip_invalid = true,
            "--emit-invalid" => opts.emit_invalid = true,
            "--parallel" => opts.parallel = true,
            "-c" | "--config" => match iter.next() {
                Some(path) => opts.config = Some(PathBuf::from(path)),
                None => {
                    eprintln!("Error: --config needs a file argument");
                    std::process::exit(1);
                }
            },
            _ => filtered_args.push(arg),
        }
    }

    init_logging(opts.log_level);

    if filtered_args.is_empty() {
        print_help();
        return;
    }

    let result = match filtered_args[0] {
        "info" | "i" => with_dir(&filtered_args, "info", |dir| cmd_info(dir, &opts)),
        "frames" | "f" => with_dir(&filtered_args, "frames", |dir| cmd_frames(dir, &opts)),
        "anchors" | "a" => with_dir(&filtered_args, "anchors", |dir| cmd_anchors(dir, &opts)),
        "play" | "p" => with_dir(&filtered_args, "play", |dir| cmd_play(dir, &opts)),
        "version" | "-V" | "--version" => {
            print_version();
            Ok(())
        }
        "help" | "h" | "-h" | "--help" => {
            print_help();
            Ok(())
        }
        // Default: if the directory exists, show info; otherwise error
        other => {
            if Path::new(other).is_dir() {
                cmd_info(Path::new(other), &opts)
            } else {
                eprintln!("Unknown command: {}", other);
                eprintln!();
                print_help();
                std::process::exit(1);
            }
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(exit_code(&e));
    }
}

/// 2 if the capture could not be loaded, 1 for anything else.
fn exit_code(e: &anyhow::Error) -> i32 {
    let load_failed = e
        .chain()
        .find_map(|cause| cause.downcast_ref::<artrack::Error>())
        .is_some_and(artrack::Error::is_load_error);
    if load_failed {
        2
    } else {
        1
    }
}

/// Install a fmt subscriber; `RUST_LOG` overrides the flag-derived level.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn with_dir(args: &[&str], command: &str, f: impl FnOnce(&Path) -> Result<()>) -> Result<()> {
    match args.get(1) {
        Some(dir) => f(Path::new(dir)),
        None => {
            eprintln!("Error: missing capture directory");
            eprintln!("Usage: artrack {} <dir>", command);
            std::process::exit(1);
        }
    }
}

fn print_version() {
    println!(
        "artrack {} (built {} {})",
        env!("CARGO_PKG_VERSION"),
        option_env!("ARTRACK_BUILD_DATE").unwrap_or("unknown"),
        option_env!("ARTRACK_BUILD_TIME").unwrap_or("unknown")
    );
}

fn print_help() {
    println!("artrack - AR capture session toolkit");
    println!();
    println!("USAGE:");
    println!("    artrack [OPTIONS] <COMMAND> <dir>");
    println!();
    println!("COMMANDS:");
    println!("    i, info    <dir>     Show project metadata and stream counts");
    println!("    f, frames  <dir>     Show per-frame stream coverage");
    println!("    a, anchors <dir>     List anchor lifecycle records by frame");
    println!("    p, play    <dir>     Dry-run playback with a still-color decoder");
    println!("    version              Show version and build date");
    println!("    h, help              Show this help");
    println!();
    println!("OPTIONS:");
    println!("    -v, --verbose        Show debug output");
    println!("    -vv, --trace         Show trace output (every anchor event)");
    println!("    -q, --quiet          Only show errors");
    println!("    -c, --config <file>  Playback config (default: user config dir)");
    println!("    --skip-invalid       Skip frames missing color, depth or camera");
    println!("    --emit-invalid       Emit incomplete frames instead of halting");
    println!("    --parallel           Use the parallel transform backend");
    println!();
    println!("NOTES:");
    println!("    - Passing a capture directory directly is equivalent to 'info'");
    println!("    - RUST_LOG overrides -v/-vv/-q");
    println!("    - Exit status 2 means the capture failed to load, 1 any other error");
}

fn load_config(opts: &Options) -> Result<PlaybackConfig> {
    let mut config = match &opts.config {
        Some(path) => PlaybackConfig::load_from(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => PlaybackConfig::load(),
    };
    if opts.skip_invalid && opts.emit_invalid {
        bail!("--skip-invalid and --emit-invalid are mutually exclusive");
    }
    if opts.skip_invalid {
        config.invalid_frame_policy = InvalidFramePolicy::Skip;
    }
    if opts.emit_invalid {
        config.invalid_frame_policy = InvalidFramePolicy::Emit;
    }
    if opts.parallel {
        config.parallel_transform = true;
    }
    Ok(config)
}

fn load_session(dir: &Path, config: &PlaybackConfig) -> Result<Session> {
    Session::load(dir, &config.load_options())
        .with_context(|| format!("loading capture {}", dir.display()))
}

fn cmd_info(dir: &Path, opts: &Options) -> Result<()> {
    let config = load_config(opts)?;
    let session = load_session(dir, &config)?;
    let p = &session.project;

    println!("Capture: {}", dir.display());
    println!("Name:        {}", p.name);
    if !p.description.is_empty() {
        println!("Description: {}", p.description);
    }
    match p.created_at() {
        Some(t) => println!("Created:     {}", t),
        None => println!("Created:     {} (unrepresentable)", p.creation_date),
    }
    println!("Device:      {}", p.model_name);
    println!("Frames:      {}", p.number_of_frames);
    println!("Color:       {}x{}", p.color_size.x, p.color_size.y);
    println!("Depth:       {}x{}", p.depth_size.x, p.depth_size.y);
    println!("Viewport:    {}x{}", p.viewport_size.x, p.viewport_size.y);
    println!();
    println!("Streams:");
    println!("  Cameras:      {}", session.cameras.len());
    println!("  Depth sets:   {}", session.depth.len());
    println!("  Light:        {}", session.lights.len());
    println!("  Anchors:      {} records in {} frames", session.anchors.len(), session.anchors.num_frames());
    println!("  Planes:       {} records in {} frames", session.planes.len(), session.planes.num_frames());
    println!("  Probes:       {} records in {} frames", session.probes.len(), session.probes.num_frames());

    let textured = session
        .probes
        .iter()
        .flat_map(|(_, records)| records)
        .filter(|r| r.as_probe().is_some_and(|p| p.texture.is_some()))
        .count();
    if textured > 0 {
        println!("  Cubemaps:     {}", textured);
    }
    Ok(())
}

fn cmd_frames(dir: &Path, opts: &Options) -> Result<()> {
    let config = load_config(opts)?;
    let session = load_session(dir, &config)?;

    println!("{:>6}  {:<18}  {:<5}  {:<6}  {:<4}  {:<5}  {:>7}", "frame", "orientation", "depth", "smooth", "conf", "light", "anchors");
    for i in 0..session.project.number_of_frames {
        let orientation = session
            .cameras
            .get(i)
            .map_or("-".to_string(), |c| c.orientation.to_string());
        let set = session.depth.get(i);
        let flag = |present: bool| if present { "yes" } else { "-" };
        let anchors = session.anchors.get(i).len() + session.probes.get(i).len() + session.planes.get(i).len();
        println!(
            "{:>6}  {:<18}  {:<5}  {:<6}  {:<4}  {:<5}  {:>7}",
            i,
            orientation,
            flag(set.is_some_and(|s| s.depth.is_some())),
            flag(set.is_some_and(|s| s.smooth_depth.is_some())),
            flag(set.is_some_and(|s| s.confidence.is_some())),
            flag(session.lights.contains(i)),
            anchors
        );
    }
    Ok(())
}

fn describe(record: &AnchorRecord) -> String {
    let p = record.position();
    let mut line = format!(
        "{:<6} {:<5} {} ({:.3}, {:.3}, {:.3})",
        record.status.as_str(),
        record.anchor_type().name(),
        record.identifier,
        p.x,
        p.y,
        p.z
    );
    if let Some(plane) = record.as_plane() {
        line.push_str(&format!(" {} align={}", plane.classification, plane.alignment));
    }
    if let Some(probe) = record.as_probe() {
        if let Some(tex) = &probe.texture {
            line.push_str(&format!(" cubemap={}px/{} mips", tex.size(), tex.mip_count()));
        }
    }
    line
}

fn cmd_anchors(dir: &Path, opts: &Options) -> Result<()> {
    let config = load_config(opts)?;
    let session = load_session(dir, &config)?;

    for i in 0..session.project.number_of_frames {
        let records: Vec<&AnchorRecord> = session
            .anchors
            .get(i)
            .iter()
            .chain(session.probes.get(i))
            .chain(session.planes.get(i))
            .collect();
        if records.is_empty() {
            continue;
        }
        println!("Frame {}:", i);
        for r in records {
            println!("  {}", describe(r));
        }
    }
    Ok(())
}

fn cmd_play(dir: &Path, opts: &Options) -> Result<()> {
    let config = load_config(opts)?;
    let session = load_session(dir, &config)?;
    let decoder = StillDecoder::new(
        session.project.color_size,
        session.project.number_of_frames,
        STILL_COLOR,
    );

    let mut driver = PlaybackDriver::new(session, decoder, config)?;
    let registry = AnchorRegistry::new().into_shared();
    driver.attach_registry(registry.clone());
    driver.on_frame(|frame| {
        tracing::debug!(
            "emitted frame {} ({}, {} missing)",
            frame.index,
            frame.orientation,
            frame.missing().len()
        );
    });
    driver.on_finished(|last| tracing::info!("reached frame {}", last));

    let stats = driver.run().context("playback failed")?;

    println!("Frames emitted: {}", stats.frames_emitted);
    println!("Frames skipped: {}", stats.frames_skipped);
    println!("Anchor events:  {}", stats.anchor_events);

    let registry = registry.lock();
    println!("Live anchors:   {}", registry.len());
    for t in [AnchorType::WorldPosition, AnchorType::Plane, AnchorType::Probe] {
        let count = registry.iter().filter(|a| a.record.anchor_type() == t).count();
        if count > 0 {
            println!("  {:<6} {}", t.name(), count);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_by_error_kind() {
        let load = anyhow::Error::from(artrack::Error::FileNotFound(PathBuf::from("camera.json")))
            .context("loading capture");
        assert_eq!(exit_code(&load), 2);

        let playback = anyhow::Error::from(artrack::Error::decoder("eof")).context("playback failed");
        assert_eq!(exit_code(&playback), 1);

        assert_eq!(exit_code(&anyhow::anyhow!("bad flag")), 1);
    }
}
