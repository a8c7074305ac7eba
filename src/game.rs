use crate::browser;
use crate::engine;
#[cfg(debug_assertions)]
use crate::engine::DebugDraw;
use crate::engine::{Game, Point, Rect, Renderer, Size};
use crate::input::InputSignal;
use crate::player::config::PlayerConfig;
use crate::player::Player;
use crate::sprite::SpriteGrid;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use futures::join;
use web_sys::HtmlImageElement;

/// TABLE
/// ┌───────────────────── Demo Architecture Overview ────────────────────────┐
/// │                                                                         │
/// │    ┌─────────────┐          ┌─────────────┐          ┌─────────────┐    │
/// │    │  engine.rs  │  signal  │   game.rs   │  update  │  player/    │    │
/// │    │  GameLoop   ├─────────►│  StateDemo  ├─────────►│  Player     │    │
/// │    │  rAF delta  │          │  Stage      │          │  FSM+physics│    │
/// │    └──────┬──────┘          └──────┬──────┘          └──────┬──────┘    │
/// │           │                        │        snapshot        │           │
/// │     keydown/keyup                  │◄───────────────────────┘           │
/// │     -> LastSignal                  ▼                                    │
/// │                              Renderer (sprite + overlay)                │
/// └─────────────────────────────────────────────────────────────────────────┘
pub enum StateDemo {
    /// resources are being loaded
    Loading,
    /// player, sprite sheet and tuning in place
    Loaded(Stage),
}

impl StateDemo {
    const CONFIG_PATH: &'static str = "player.json";
    const IMAGE_PATH: &'static str = "player.png";

    pub fn new() -> Self {
        StateDemo::Loading
    }

    /// `player.json` is optional, a missing or malformed file means defaults.
    /// Values that parse but can't drive the physics are fatal.
    async fn load_config() -> Result<PlayerConfig> {
        let config = browser::fetch_json::<PlayerConfig>(Self::CONFIG_PATH)
            .await
            .unwrap_or_else(|err| {
                log!(
                    "Warning: using default player config, {} unavailable : {:#}",
                    Self::CONFIG_PATH,
                    err
                );
                PlayerConfig::default()
            });
        config
            .validate()
            .with_context(|| format!("Invalid player config in : {}", Self::CONFIG_PATH))
    }

    async fn load_sprite_image() -> Result<HtmlImageElement> {
        engine::load_image(Self::IMAGE_PATH).await.with_context(|| {
            format!(
                "Failed to load sprite image resource from : {}",
                Self::IMAGE_PATH
            )
        })
    }
}

impl Default for StateDemo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait(?Send)]
impl Game for StateDemo {
    async fn initialize(&self) -> Result<Box<dyn Game>> {
        match self {
            StateDemo::Loading => {
                // both resources in flight at once, total time = slowest one
                let (config_result, image_result) =
                    join!(Self::load_config(), Self::load_sprite_image());
                let config = config_result?;
                let image = image_result?;
                let (width, height) = browser::fit_canvas_to_window()?;
                let world = Size {
                    width: f64::from(width),
                    height: f64::from(height),
                };
                Ok(Box::new(StateDemo::Loaded(Stage::new(world, config, image))))
            }
            StateDemo::Loaded(_) => Err(anyhow!("Game is already initialized")),
        }
    }

    fn update(&mut self, delta: f64, signal: InputSignal) {
        if let StateDemo::Loaded(stage) = self {
            stage.update(delta, signal);
        }
    }

    fn draw(&self, renderer: &Renderer) {
        if let StateDemo::Loaded(stage) = self {
            stage.draw(renderer);
        }
    }
}

pub struct Stage {
    player: Player,
    grid: SpriteGrid,
    image: HtmlImageElement,
    world: Size,
    fps: f64,
    // shown in the overlay, the player itself keeps no input
    signal: InputSignal,
}

impl Stage {
    fn new(world: Size, config: PlayerConfig, image: HtmlImageElement) -> Self {
        Stage {
            player: Player::new(world, &config),
            grid: SpriteGrid::new(config.size()),
            image,
            world,
            fps: config.fps,
            signal: InputSignal::None,
        }
    }

    fn update(&mut self, delta: f64, signal: InputSignal) {
        let before = self.player.state();
        self.player.update(delta, signal);
        self.signal = signal;

        if cfg!(debug_assertions) && self.player.state() != before {
            log!("{} -> {} on {}", before, self.player.state(), signal);
        }
    }

    fn draw(&self, renderer: &Renderer) {
        renderer.clear(&Rect::new(Point::default(), self.world));

        let snapshot = self.player.snapshot();
        let (source, destination) = self.grid.frame_for(&snapshot);
        renderer.draw_image(&self.image, &source, &destination);

        #[cfg(debug_assertions)]
        {
            destination.draw_debug(renderer);
        }

        renderer.draw_shadow_text(
            &format!("Input {}", self.signal),
            Point { x: 20.0, y: 100.0 },
        );
        renderer.draw_shadow_text(
            &format!("Current State {}", snapshot.state),
            Point { x: 20.0, y: 150.0 },
        );
        renderer.draw_shadow_text(
            &format!("FPS {}", self.fps),
            Point {
                x: self.world.width - 200.0,
                y: 150.0,
            },
        );
    }
}
