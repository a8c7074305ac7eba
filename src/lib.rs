// ==================== Imports ====================
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsValue;

#[macro_use]
mod browser;
mod engine;
mod game;
pub mod input;
pub mod player;
pub mod sprite;

pub use engine::{Point, Size};
use input::InputSignal;
use player::config::{ensure_positive_size, PlayerConfig};
use player::Player;

// TABLE:
// ┌──────────────────────────────────────────────────────────────────────────┐
// │                      Directory Structure                                 │
// ├───────────────────┬──────────────────────────────────────────────────────┤
// │ src/              │                                                      │
// │ ├── lib.rs        │ wasm entry points                                    │
// │ ├── browser.rs    │ window / canvas / fetch helpers, log! macro          │
// │ ├── engine.rs     │ Game trait, GameLoop, Renderer, key listeners        │
// │ ├── game.rs       │ StateDemo : loading, stage, overlay                  │
// │ ├── input.rs      │ InputSignal + LastSignal (last edge wins)            │
// │ ├── sprite/       │ SpriteGrid : (frame, row) -> sheet rectangle         │
// │ └── player/       │ the core                                             │
// │     ├── mod.rs    │ Player entity, update order, Snapshot                │
// │     ├── state.rs  │ PlayerStateId : entry effects + transition table     │
// │     ├── physics.rs│ Body (integrate/clamp/gravity), Animation timer      │
// │     └── config.rs │ PlayerConfig (serde, defaults, validate)             │
// └───────────────────┴──────────────────────────────────────────────────────┘

// ==================== Main Functions ====================
/// Main entry for Webassembly module, called by the page's bootstrap script
/// - better panic messages
/// - loads assets, then starts the frame loop
#[wasm_bindgen]
pub fn main_js() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    browser::spawn_local(async move {
        let demo = game::StateDemo::new();
        if let Err(err) = engine::GameLoop::start(demo).await {
            error!("Could not start game loop : {:#?}", err);
        }
    });

    Ok(())
}

/// The player core without the bundled loop, for pages that drive their
/// own requestAnimationFrame.
#[wasm_bindgen]
pub struct Simulation {
    player: Player,
}

#[wasm_bindgen]
impl Simulation {
    #[wasm_bindgen(constructor)]
    pub fn new(world_width: f64, world_height: f64) -> Result<Simulation, JsValue> {
        let to_js = |err: anyhow::Error| JsValue::from_str(&format!("{:#}", err));
        let config = PlayerConfig::default().validate().map_err(to_js)?;
        let world = ensure_positive_size(
            Size {
                width: world_width,
                height: world_height,
            },
            "world size",
        )
        .map_err(to_js)?;
        Ok(Simulation {
            player: Player::new(world, &config),
        })
    }

    /// One tick. `signal` is "PRESS left", "RELEASE down", ... anything else
    /// counts as no input. Returns the snapshot as a plain JS object.
    pub fn tick(&mut self, delta_ms: f64, signal: &str) -> Result<JsValue, JsValue> {
        self.player.update(delta_ms.max(0.0), InputSignal::parse(signal));
        serde_wasm_bindgen::to_value(&self.player.snapshot())
            .map_err(|err| JsValue::from_str(&format!("{:#}", err)))
    }

    #[wasm_bindgen(js_name = stateName)]
    pub fn state_name(&self) -> String {
        self.player.state().name().to_string()
    }
}
