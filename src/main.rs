//! Application entry point and thread bootstrapper.

mod input;
mod logic;
mod models;
mod render;
mod shared;
mod state;
mod system;

use crate::logic::clock::SystemClock;
use crate::models::settings::{SETTINGS_PATH, SettingsState};
use crate::render::LogRenderSink;
use crate::system::bus::SystemBus;
use std::path::PathBuf;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("MAIN: Booting rstaff...");

    let settings_path = PathBuf::from(SETTINGS_PATH);
    let settings = SettingsState::load_or_default(&settings_path);
    if !settings_path.exists() {
        match settings.save_to(&settings_path) {
            Ok(()) => log::info!("MAIN: Wrote default settings to {}", settings_path.display()),
            Err(e) => log::warn!("MAIN: Could not write default settings: {}", e),
        }
    }

    let bus = SystemBus::new();

    let input_bus = bus.clone();
    let console_bus = bus.clone();
    let logic_bus = bus.clone();
    let render_bus = bus.clone();

    let input_manager = input::manager::InputManager::new(&settings.keybinds);
    let clock = SystemClock::new();

    input::start_thread(input_bus, input_manager, clock);
    input::start_console_reader(console_bus);
    logic::start_thread(logic_bus, settings_path, clock);

    log::info!("MAIN: Type a letter (c), a pitch (C4), treble:C, midi 60, restart or quit");
    let mut sink = LogRenderSink::default();
    render::run(render_bus, &mut sink);

    log::info!("MAIN: Bye");
}
