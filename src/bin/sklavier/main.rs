//! sklavier - play a short phrase through the default audio output
//!
//! Run with: cargo run
//! Log level follows RUST_LOG (default: info).

mod app;

use app::{Phrase, Sklavier};
use sklavier::VoiceStealing;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // I - IV - V - I, half a second per chord
    let phrase = Phrase::new(0.5)
        .chord(&[60, 64, 67])
        .chord(&[60, 65, 69])
        .chord(&[59, 62, 67])
        .chord(&[60, 64, 67, 72]);

    Sklavier::new()
        .voices(8)
        .stealing(VoiceStealing::Oldest)
        .play(phrase)
}
