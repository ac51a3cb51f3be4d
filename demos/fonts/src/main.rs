//! Renders a background image, a caption in a TTF font & a live FPS readout
//!
//! Usage: `fonts [DATA_DIR]`. The data directory must hold `bg2.png`,
//! `Exocet.ttf` & `DejaVuSansMono.ttf`; it defaults to `$EASEL_DATA_DIR`,
//! then to `data/` next to this demo.

use std::{env, path::PathBuf, process::ExitCode};

use anyhow::{Context, Result};
use easel::{
    Color, Event, Font, Text, Texture, Vec2, Window,
    time::{FpsCounter, Ticker},
};

fn main() -> ExitCode {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    match fonts() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn data_dir() -> PathBuf {
    env::args_os()
        .nth(1)
        .or_else(|| env::var_os("EASEL_DATA_DIR"))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data"))
}

fn fonts() -> Result<()> {
    let data = data_dir();
    log::info!("loading assets from {}", data.display());

    let mut win = Window::open(640, 480).context("opening window")?;

    let bg = Texture::load(data.join("bg2.png"))?;

    let text_font = Font::load(data.join("Exocet.ttf"))?;
    let text = Text::new(&text_font)
        .text("TTF fonts")
        .size(32.0)
        .color(Color::WHITE);

    // updated every frame with the running average
    let fps_font = Font::load(data.join("DejaVuSansMono.ttf"))?;
    let mut fps = Text::new(&fps_font).size(14.0).color(Color::WHITE);

    let mut counter = FpsCounter::new();
    let mut ticker = Ticker::per_second(60);

    loop {
        ticker.tick();

        win.clear(Color::WHITE);
        win.draw(Vec2::ZERO, &bg).context("drawing background")?;
        win.draw((420.0, 12.0), &text).context("drawing caption")?;

        fps.set_text(counter.label());
        win.draw((8.0, 4.0), &fps).context("drawing fps")?;

        win.update().context("presenting frame")?;
        counter.frame();

        while let Some(event) = win.poll_event() {
            println!("{event}");
            if event == Event::Close {
                return Ok(());
            }
        }
    }
}
