use clap::Parser;
use log::{error, info, warn};
use sdl2::image::InitFlag;
use sdl2::render::Canvas;
use sdl2::video::{FullscreenType, Window, WindowPos};
use std::time::{Duration, Instant};

mod cli;
mod config;
mod context;
mod frame;
mod gui;
mod input_system;
mod locale;
mod media;
mod profile;
mod psych;
mod resources;
mod screen;
mod screens;
mod ship;
mod text;

use cli::Cli;
use config::{Settings, VideoSettings};
use context::{AppContext, Layout};
use input_system::{InputEvent, InputSystem};
use locale::Strings;
use media::VideoLibrary;
use profile::ProfileStore;
use resources::{DataPaths, ImageCache};
use screen::{ScreenManager, ScreenRequest, Transition};
use screens::game_over::GameSummary;

/// Target time per loop iteration (~60 FPS)
const FRAME_TIME: Duration = Duration::from_nanos(1_000_000_000 / 60);

/// Longest tick handed to screens, so a stall doesn't skip whole animations
const MAX_TICK: Duration = Duration::from_millis(100);

const WINDOW_TITLE: &str = "Starward";

/// Switches between windowed and fullscreen and resizes the window
///
/// Vsync is fixed when the renderer is created and takes effect on restart.
fn apply_video_settings(canvas: &mut Canvas<Window>, video: &VideoSettings) -> Result<(), String> {
    let window = canvas.window_mut();
    if video.fullscreen {
        window.set_fullscreen(FullscreenType::Desktop)?;
    } else {
        window.set_fullscreen(FullscreenType::Off)?;
        window
            .set_size(video.width, video.height)
            .map_err(|e| e.to_string())?;
        window.set_position(WindowPos::Centered, WindowPos::Centered);
    }
    info!(
        "video mode: {}x{} {}",
        video.width,
        video.height,
        if video.fullscreen { "fullscreen" } else { "windowed" }
    );
    Ok(())
}

/// Loads the profile used last time, if it still exists
fn restore_last_profile(ctx: &mut AppContext<'_>) {
    let Some(name) = ctx.settings.last_profile.clone() else {
        return;
    };
    match ctx.profiles.load(&name) {
        Ok(profile) => ctx.profile = Some(profile),
        Err(err) => warn!("last profile '{}' unavailable: {}", name, err),
    }
}

fn main() -> Result<(), String> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let paths = DataPaths {
        data: cli.data.clone(),
        config_file: cli.config_file(),
        profiles: cli.profile_dir(),
    };
    let settings = Settings::load(&paths.config_file);
    info!("data directory: {}", paths.data.display());

    let sdl_context = sdl2::init()?;
    let video_subsystem = sdl_context.video()?;
    let _image_context = sdl2::image::init(InitFlag::PNG | InitFlag::JPG)?;

    let mut window_builder =
        video_subsystem.window(WINDOW_TITLE, settings.video.width, settings.video.height);
    window_builder.position_centered().resizable().allow_highdpi();
    if settings.video.fullscreen {
        window_builder.fullscreen_desktop();
    }
    let window = window_builder.build().map_err(|e| e.to_string())?;

    let mut canvas_builder = window.into_canvas().accelerated();
    if settings.video.vsync {
        canvas_builder = canvas_builder.present_vsync();
    }
    let mut canvas = canvas_builder.build().map_err(|e| e.to_string())?;

    let texture_creator = canvas.texture_creator();
    let mut event_pump = sdl_context.event_pump()?;
    let text_input = video_subsystem.text_input();
    text_input.stop();

    let profiles = ProfileStore::new(&paths.profiles)
        .map_err(|e| format!("Failed to open profile directory {}: {}", paths.profiles.display(), e))?;

    let last_summary = cli.summary.as_ref().and_then(|path| match GameSummary::load(path) {
        Ok(summary) => Some(summary),
        Err(err) => {
            error!("unable to read game summary {}: {}", path.display(), err);
            None
        }
    });

    let (width, height) = canvas.output_size()?;
    let mut ctx = AppContext {
        strings: Strings::load(&paths.lang(), &settings.game.language),
        images: ImageCache::new(&texture_creator, paths.images()),
        textures: &texture_creator,
        paths,
        settings,
        profiles,
        profile: None,
        library: VideoLibrary::default(),
        layout: Layout::new(width, height),
        video_changed: false,
        last_summary,
    };

    let mut manager: ScreenManager<'_, AppContext<'_>> =
        ScreenManager::new(screens::build, width, height);

    // A summary without an explicit start screen means the game just ended
    let start = cli
        .start
        .or(ctx.last_summary.as_ref().map(|_| cli::StartScreen::GameOver));
    match start {
        None => manager.open(
            &mut ctx,
            ScreenRequest::Loading {
                skip_intro: cli.skip_intro,
            },
        ),
        Some(start) => {
            // Skipping the loading screen: do its work up front
            ctx.library = VideoLibrary::scan(&ctx.paths.movies());
            restore_last_profile(&mut ctx);

            if start.needs_menu_below() {
                manager.open(&mut ctx, ScreenRequest::MainMenu);
                manager.apply(&mut ctx, Transition::Push(start.request()));
            } else {
                manager.open(&mut ctx, start.request());
            }
        }
    }

    let mut input = InputSystem::new();
    let mut last_tick = Instant::now();

    while manager.is_running() {
        if manager.wants_text_input() != text_input.is_active() {
            if manager.wants_text_input() {
                text_input.start();
            } else {
                text_input.stop();
            }
        }

        for event in input.poll_events(&mut event_pump) {
            let event = match event {
                // Window size and drawable size differ on high-DPI displays
                InputEvent::Resized(..) => {
                    let (w, h) = canvas.output_size()?;
                    ctx.layout = Layout::new(w, h);
                    InputEvent::Resized(w, h)
                }
                other => other,
            };
            manager.handle_input(&mut ctx, event);
            if !manager.is_running() {
                break;
            }
        }

        let now = Instant::now();
        let dt = (now - last_tick).min(MAX_TICK);
        last_tick = now;
        manager.update(&mut ctx, dt);

        if ctx.video_changed {
            ctx.video_changed = false;
            if let Err(err) = apply_video_settings(&mut canvas, &ctx.settings.video) {
                error!("failed to apply video settings: {}", err);
            }
            let (w, h) = canvas.output_size()?;
            ctx.layout = Layout::new(w, h);
            manager.resize(&mut ctx, w, h);
        }

        if !manager.is_running() {
            break;
        }

        manager.draw(&mut canvas, &mut ctx)?;
        canvas.present();

        let elapsed = now.elapsed();
        if elapsed < FRAME_TIME {
            std::thread::sleep(FRAME_TIME - elapsed);
        }
    }

    manager.shutdown(&mut ctx);
    ctx.save_profile();
    info!("goodbye");
    Ok(())
}
