//! padgate-sim - scripted controller session against a simulated gateway.
//!
//! Manual debugging harness for the input core: replays a short shop/pick
//! session and prints every notification the core emits as one JSON object
//! per line.

use anyhow::Result;
use clap::{Arg, Command};
use padgate::gateway::{actions, Phase};
use padgate::keys::BindingTable;
use padgate::pad::buttons;
use padgate::protocol::ControlMessage;
use padgate::sim::{SharedPad, SimGateway};
use padgate::InputEngine;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::sleep;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging for development
    env_logger::init();

    let matches = Command::new("padgate-sim")
        .version(padgate::VERSION)
        .about("Replay a scripted controller session against a simulated gateway")
        .arg(
            Arg::new("slots")
                .long("slots")
                .help("Shop slot count")
                .value_parser(clap::value_parser!(usize))
                .default_value("6"),
        )
        .arg(
            Arg::new("bindings")
                .long("bindings")
                .help("Path to a persisted binding table (JSON)"),
        )
        .get_matches();

    let slots = *matches
        .get_one::<usize>("slots")
        .expect("slots has a default");
    let bindings = matches
        .get_one::<String>("bindings")
        .map(|path| BindingTable::load_or_default(Path::new(path)))
        .unwrap_or_default();

    let gateway = Arc::new(SimGateway::legal_at(
        Phase::Shop,
        &[0, 1, 2, actions::REROLL, actions::LEVEL_UP, actions::END_TURN],
    ));
    let pad = SharedPad::connected();

    let (notify_tx, mut notify_rx) = mpsc::unbounded_channel();
    let (control_tx, control_rx) = mpsc::channel(16);

    let mut engine = InputEngine::new(
        Box::new(pad.clone()),
        Some(Arc::clone(&gateway) as _),
        bindings,
        notify_tx,
    );
    engine.apply(ControlMessage::SetMaxShopSlots { slots });

    let printer = tokio::spawn(async move {
        while let Some(notification) = notify_rx.recv().await {
            match serde_json::to_string(&notification) {
                Ok(json) => println!("{json}"),
                Err(err) => eprintln!("notification unserializable: {err}"),
            }
        }
    });

    let driver = tokio::spawn(engine.run(control_rx));

    // Let the throttled detector settle into the shop context.
    sleep(Duration::from_millis(300)).await;

    // Hold right long enough for repeats to kick in, then buy at the cursor.
    pad.press(buttons::DPAD_RIGHT);
    sleep(Duration::from_millis(900)).await;
    pad.release(buttons::DPAD_RIGHT);
    pad.press(buttons::SOUTH);
    sleep(Duration::from_millis(50)).await;
    pad.release(buttons::SOUTH);

    // Combat disables routing; this press must be inert.
    gateway.set_phase(Phase::Combat);
    sleep(Duration::from_millis(300)).await;
    pad.press(buttons::NORTH);
    sleep(Duration::from_millis(50)).await;
    pad.release(buttons::NORTH);

    // A pick round with three choices: take the middle one.
    let mut mask = vec![0u8; actions::ACTION_SPACE];
    for slot in 0..3 {
        mask[actions::PICK_BASE + slot] = 1;
    }
    gateway.set_mask(Some(mask));
    gateway.set_phase(Phase::PickPokemon);
    sleep(Duration::from_millis(300)).await;
    pad.press(buttons::DPAD_RIGHT);
    sleep(Duration::from_millis(50)).await;
    pad.release(buttons::DPAD_RIGHT);
    pad.press(buttons::SOUTH);
    sleep(Duration::from_millis(50)).await;
    pad.release_all();
    sleep(Duration::from_millis(100)).await;

    control_tx.send(ControlMessage::Shutdown).await?;
    driver.await?;
    printer.await?;

    eprintln!("gateway exec calls: {:?}", gateway.exec_calls());
    Ok(())
}
