use crate::browser;
use crate::input::{InputSignal, LastSignal};
use anyhow::{anyhow, Error, Result};
// ELI5: web assembly is a single threaded environment, so Rc RefCell > Mutex
use async_trait::async_trait;
use futures::channel::mpsc::{unbounded, UnboundedReceiver};
use futures::channel::oneshot::channel;
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::{
    // unchecked_ref (unsafe) cast from Javascript type to Rust type
    // - we control the closure creation and specify the expected type
    JsCast,
    JsValue,
};
use web_sys::{CanvasRenderingContext2d, HtmlImageElement, KeyboardEvent};

#[async_trait(?Send)]
pub trait Game {
    async fn initialize(&self) -> Result<Box<dyn Game>>;
    /// one tick per animation frame
    /// - delta : ms since the previous frame, never negative
    /// - signal : the last key edge seen, see `LastSignal`
    fn update(&mut self, delta: f64, signal: InputSignal);
    fn draw(&self, renderer: &Renderer);
}

// ==================== Geometry ====================
// canvas space : origin top left, y grows downward
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rect {
    pub position: Point,
    pub size: Size,
}

impl Rect {
    pub fn new(position: Point, size: Size) -> Self {
        Rect { position, size }
    }
}

// ==================== Loop ====================
pub struct GameLoop {
    last_frame: f64,
}

type SharedLoopClosure = Rc<RefCell<Option<browser::LoopClosure>>>;

impl GameLoop {
    pub async fn start(game: impl Game + 'static) -> Result<()> {
        let mut keyevent_receiver = prepare_input()?;
        let mut game = game.initialize().await?;
        let mut game_loop = GameLoop {
            last_frame: browser::now()?,
        };
        let mut last_signal = LastSignal::default();
        let renderer = Renderer {
            context: browser::context()?,
        };
        let f: SharedLoopClosure = Rc::new(RefCell::new(None));
        let g = f.clone();
        *g.borrow_mut() = Some(browser::create_raf_closure(move |perf: f64| {
            process_input(&mut last_signal, &mut keyevent_receiver);
            // rAF timestamps can land before our first performance.now()
            let delta = (perf - game_loop.last_frame).max(0.0);
            game_loop.last_frame = perf;
            game.update(delta, last_signal.current());
            game.draw(&renderer);
            if let Some(callback) = f.borrow().as_ref() {
                if let Err(err) = browser::request_animation_frame(callback) {
                    error!("GameLoop: {:#?}", err);
                }
            }
        }));

        browser::request_animation_frame(
            g.borrow()
                .as_ref()
                .ok_or_else(|| anyhow!("GameLoop: Loop is None"))?,
        )?;

        Ok(())
    }
}

// KeyboardEvent.key only, e.g. "ArrowLeft"
// only KeyboardEvent.key is kept, the event itself can't leave the callback
#[derive(Debug, Clone, PartialEq)]
pub enum KeyPress {
    KeyDown(String),
    KeyUp(String),
}

/// keydown/keyup on the window -> channel of raw key edges
/// - the listeners outlive this call (forget), the loop drains the receiver
fn prepare_input() -> Result<UnboundedReceiver<KeyPress>> {
    let (keydown_sender, keyevent_receiver) = unbounded();
    let keyup_sender = keydown_sender.clone();

    let onkeydown = browser::closure_wrap(Box::new(move |keycode: KeyboardEvent| {
        let _ = keydown_sender.unbounded_send(KeyPress::KeyDown(keycode.key()));
    }) as Box<dyn FnMut(KeyboardEvent)>);

    let onkeyup = browser::closure_wrap(Box::new(move |keycode: KeyboardEvent| {
        let _ = keyup_sender.unbounded_send(KeyPress::KeyUp(keycode.key()));
    }) as Box<dyn FnMut(KeyboardEvent)>);

    let window = browser::window()?;
    window.set_onkeydown(Some(onkeydown.as_ref().unchecked_ref()));
    window.set_onkeyup(Some(onkeyup.as_ref().unchecked_ref()));
    onkeydown.forget();
    onkeyup.forget();

    Ok(keyevent_receiver)
}

/// drain everything that arrived since last frame, the newest edge wins
fn process_input(last_signal: &mut LastSignal, receiver: &mut UnboundedReceiver<KeyPress>) {
    // try_recv : Err when nothing is waiting or the channel is closed
    while let Ok(evt) = receiver.try_recv() {
        match evt {
            KeyPress::KeyDown(key) => last_signal.press(&key),
            KeyPress::KeyUp(key) => last_signal.release(&key),
        }
    }
}

// ==================== Rendering ====================
pub struct Renderer {
    context: CanvasRenderingContext2d,
}

impl Renderer {
    pub fn clear(&self, rect: &Rect) {
        self.context.clear_rect(
            rect.position.x,
            rect.position.y,
            rect.size.width,
            rect.size.height,
        );
    }

    pub fn draw_image(&self, image: &HtmlImageElement, frame: &Rect, destination: &Rect) {
        if let Err(err) = self
            .context
            .draw_image_with_html_image_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
                image,
                frame.position.x,
                frame.position.y,
                frame.size.width,
                frame.size.height,
                destination.position.x,
                destination.position.y,
                destination.size.width,
                destination.size.height,
            )
        {
            error!("Renderer: draw_image failed {:#?}", err);
        }
    }

    /// black text with a white copy offset by 2px on top
    #[allow(deprecated)]
    pub fn draw_shadow_text(&self, text: &str, position: Point) {
        self.context.set_font("40px Helvetica");
        self.context.set_text_align("left");
        self.context.set_fill_style(&JsValue::from_str("#000"));
        if let Err(err) = self.fill_text(text, position) {
            error!("Renderer: draw_shadow_text failed {:#?}", err);
        }
        self.context.set_fill_style(&JsValue::from_str("#fff"));
        let shadow = Point {
            x: position.x + 2.0,
            y: position.y + 2.0,
        };
        if let Err(err) = self.fill_text(text, shadow) {
            error!("Renderer: draw_shadow_text failed {:#?}", err);
        }
    }

    fn fill_text(&self, text: &str, position: Point) -> Result<()> {
        self.context
            .fill_text(text, position.x, position.y)
            .map_err(|err| anyhow!("fill_text '{}' : {:#?}", text, err))
    }

    #[cfg(debug_assertions)]
    #[allow(deprecated)]
    fn draw_rect(&self, rect: &Rect) {
        self.context.set_stroke_style(&JsValue::from_str("#FF0000"));
        self.context.begin_path();
        self.context.rect(
            rect.position.x,
            rect.position.y,
            rect.size.width,
            rect.size.height,
        );
        self.context.stroke();
    }
}

#[cfg(debug_assertions)]
pub trait DebugDraw {
    fn draw_debug(&self, renderer: &Renderer);
}

#[cfg(debug_assertions)]
impl DebugDraw for Rect {
    fn draw_debug(&self, renderer: &Renderer) {
        renderer.draw_rect(self);
    }
}

// ==================== Assets ====================
/// Asynchronously load an image from a given source path
/// # Arguments
/// * `source` - string slice to path/url
/// # Returns
/// * `Ok(HtmlImageElement)` - on load success
/// * `Err` - on load fail
pub async fn load_image(source: &str) -> Result<HtmlImageElement> {
    let image = browser::new_image()?;
    let (tx, rx) = channel::<Result<(), Error>>();
    let success_tx = Rc::new(RefCell::new(Some(tx)));
    let error_tx = success_tx.clone();

    let success_callback = browser::closure_once(move || {
        if let Some(tx) = success_tx.borrow_mut().take() {
            let _ = tx.send(Ok(()));
        }
    });

    let error_callback = browser::closure_once(move |err: JsValue| {
        if let Some(tx) = error_tx.borrow_mut().take() {
            let _ = tx.send(Err(anyhow!(
                "[engine.rs::load_image] Error loading image: {:#?}",
                err
            )));
        }
    });

    image.set_onload(Some(success_callback.as_ref().unchecked_ref()));
    image.set_onerror(Some(error_callback.as_ref().unchecked_ref()));
    image.set_src(source);

    // keep callback alive until image is loaded or errors
    success_callback.forget();
    error_callback.forget();

    // ?? - Result<Result<(), Error>, oneshot::Canceled>
    // - first ? yields channel result : Result<(), Error>
    // - second ? yields image load result : () or propagating Error
    rx.await??;

    Ok(image)
}


#[cfg(all(test, target_arch = "wasm32"))]
mod web_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn offscreen_renderer() -> Renderer {
        let canvas = browser::document()
            .and_then(|document| {
                document
                    .create_element("canvas")
                    .map_err(|err| anyhow!("{:#?}", err))
            })
            .unwrap()
            .dyn_into::<web_sys::HtmlCanvasElement>()
            .unwrap();
        let context = canvas
            .get_context("2d")
            .unwrap()
            .unwrap()
            .dyn_into::<CanvasRenderingContext2d>()
            .unwrap();
        Renderer { context }
    }

    #[wasm_bindgen_test]
    fn fill_text_reports_success() {
        let renderer = offscreen_renderer();
        assert!(renderer.fill_text("Input none", Point { x: 20.0, y: 100.0 }).is_ok());
        // the logging wrapper must not panic either
        renderer.draw_shadow_text("Current State STANDING_RIGHT", Point { x: 20.0, y: 150.0 });
    }
}
