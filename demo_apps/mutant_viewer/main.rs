//! Mutant Viewer
//!
//! Headless driver for the stage. Loads the assets from `./assets/` (or the
//! directory / URL given as the first argument, or a settings JSON given with
//! `--settings <file>`), runs the frame loop at a fixed 60 Hz, sweeps the pointer
//! across the viewport and double-taps every few seconds.
//!
//! Run: `RUST_LOG=info cargo run -p mutant_viewer -- ./assets/`

use std::time::Duration;

use anyhow::Context;
use glam::Vec2;
use mutant_stage::input::{InputEvent, Viewport};
use mutant_stage::{FrameStatus, LoadEvent, Stage, StageSettings};

const FRAME_DT: f32 = 1.0 / 60.0;
const RUN_SECONDS: f32 = 30.0;
const TAP_EVERY_FRAMES: u64 = 5 * 60;

fn settings_from_args() -> anyhow::Result<StageSettings> {
    let mut args = std::env::args().skip(1);
    let mut settings = StageSettings::default();

    while let Some(arg) = args.next() {
        if arg == "--settings" {
            let path = args.next().context("--settings needs a file")?;
            settings = StageSettings::from_path(&path)
                .with_context(|| format!("Failed to read settings from {path}"))?;
        } else {
            settings.assets.base_url = arg;
        }
    }
    Ok(settings)
}

fn double_tap(stage: &mut Stage, at: Duration, position: Vec2) {
    for offset in [0, 120] {
        let t = at + Duration::from_millis(offset);
        stage.handle_input(InputEvent::PointerDown { position }, t);
        if let Some(outcome) =
            stage.handle_input(InputEvent::PointerUp { position }, t + Duration::from_millis(40))
        {
            log::info!("Double tap: {outcome:?}");
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = settings_from_args()?;
    let viewport = Viewport::new(1280.0, 720.0);
    let mut stage = Stage::new(settings, viewport);

    let reader = stage.asset_reader()?;
    let requests = stage.take_load_requests();
    let sender = stage.result_sender();
    let loader = std::thread::spawn(move || -> anyhow::Result<()> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        runtime.block_on(mutant_stage::assets::fetch_all(reader, requests, sender));
        Ok(())
    });

    let mut clock = Duration::ZERO;
    let total_frames = (RUN_SECONDS / FRAME_DT) as u64;
    let mut running_frames = 0;

    for _ in 0..total_frames {
        std::thread::sleep(Duration::from_secs_f32(FRAME_DT));
        clock += Duration::from_secs_f32(FRAME_DT);

        let status = stage.frame(FRAME_DT);
        for event in stage.take_load_events() {
            match event {
                LoadEvent::Started { url, loaded, total } => {
                    log::info!("Started loading file: {url}. Loaded {loaded} of {total} files...");
                }
                LoadEvent::Progress { url, loaded, total } => {
                    log::info!("Loading file: {url}. Loaded {loaded} of {total} files.");
                }
                LoadEvent::Loaded => log::info!("Loading complete!"),
                LoadEvent::Error { url } => log::warn!("There was an error loading {url}"),
            }
        }

        let FrameStatus::Running { frame } = status else {
            continue;
        };
        running_frames = frame;

        // Sweep the pointer left to right and back.
        let phase = (frame as f32 * FRAME_DT * 0.5).sin();
        let pointer = Vec2::new(
            viewport.width * 0.5 * (1.0 + phase),
            viewport.height * 0.4,
        );
        stage.handle_input(InputEvent::PointerMoved { position: pointer }, clock);

        if frame % TAP_EVERY_FRAMES == 0 {
            double_tap(&mut stage, clock, pointer);
        }
    }

    log::info!(
        "Ran {running_frames} frames, character busy: {}",
        stage.character().is_busy()
    );

    loader
        .join()
        .map_err(|_| anyhow::anyhow!("Loader thread panicked"))??;
    Ok(())
}
