//! Block Drop entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlElement, PointerEvent};

    use block_drop::GameOptions;
    use block_drop::consts::{HINT_LABEL, HINT_LINES};
    use block_drop::anim::{Easing, RenderCommand, Target, Timeline, Transform};
    use block_drop::persistence::{LocalStorage, MemoryStorage, Storage};
    use block_drop::sim::{GameEvent, LevelController};

    type Controller = LevelController<Timeline, Box<dyn Storage>>;

    /// Game instance holding all state
    struct Game {
        controller: Controller,
        last_time: f64,
    }

    impl Game {
        fn new(controller: Controller) -> Self {
            Self {
                controller,
                last_time: 0.0,
            }
        }

        /// Advance animations and feed completions back to the controller
        fn update(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                (time - self.last_time).min(100.0) as f32
            } else {
                0.0
            };
            self.last_time = time;

            for handle in self.controller.animator_mut().advance(dt) {
                self.controller.on_animation_complete(handle);
            }

            for event in self.controller.drain_events() {
                match event {
                    GameEvent::LevelCompleted { level } => log::info!("Cleared level {}", level),
                    GameEvent::LevelFailed { level, outcome } => {
                        log::info!("Level {} failed: {:?}", level, outcome)
                    }
                    other => log::debug!("{:?}", other),
                }
            }
        }

        /// Apply queued render commands to the DOM sprites
        fn render(&mut self) {
            let options = self.controller.options().clone();
            for command in self.controller.animator_mut().drain_commands() {
                match command {
                    RenderCommand::Set { target, transform } => {
                        if let Some(el) = sprite_element(target) {
                            jump(&el, target, transform, &options);
                        }
                    }
                    RenderCommand::Tween {
                        target,
                        transform,
                        duration,
                        easing,
                    } => {
                        if let Some(el) = sprite_element(target) {
                            let ease = css_easing(easing);
                            let _ = el.style().set_property(
                                "transition",
                                &format!(
                                    "translate {d}ms {e}, scale {d}ms {e}, rotate {d}ms {e}",
                                    d = duration,
                                    e = ease
                                ),
                            );
                            place(&el, target, transform, &options);
                        }
                    }
                    RenderCommand::Loop {
                        target,
                        from,
                        to,
                        duration,
                    } => {
                        if let Some(el) = sprite_element(target) {
                            let style = el.style();
                            let _ = style.set_property("--wobble-from", &format!("{}deg", from.angle));
                            let _ = style.set_property("--wobble-to", &format!("{}deg", to.angle));
                            let _ = style.set_property(
                                "animation",
                                &format!("wobble {}ms ease-in-out infinite alternate", duration),
                            );
                        }
                    }
                    RenderCommand::Stop { target, transform } => {
                        if let Some(el) = sprite_element(target) {
                            jump(&el, target, transform, &options);
                        }
                    }
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let hud = self.controller.hud();

            if let Some(el) = document.get_element_by_id("banner") {
                el.set_text_content(Some(&hud.banner));
            }
            if let Some(el) = document.get_element_by_id("square-text") {
                el.set_text_content(Some(&hud.remaining.to_string()));
            }
            if let Some(el) = html_element("game") {
                let _ = el
                    .style()
                    .set_property("background-color", &format!("#{:06x}", hud.tint));
            }
            if let Some(el) = html_element("square-text") {
                let _ = el.style().set_property("color", &format!("#{:06x}", hud.tint));
            }
            if let Some(el) = document.get_element_by_id("hint") {
                let class = if hud.hint_visible { "" } else { "hidden" };
                let _ = el.set_attribute("class", class);
            }
            if let Some(el) = html_element("hint-target") {
                let size = self.controller.geometry().hole_width;
                let _ = el.style().set_property("width", &format!("{}px", size));
                let _ = el.style().set_property("height", &format!("{}px", size));
            }
        }
    }

    /// Fill the static overlay text
    fn fill_hint() {
        let texts = [
            ("hint-grow", HINT_LINES[0]),
            ("hint-release", HINT_LINES[1]),
            ("hint-label", HINT_LABEL),
        ];
        for (id, text) in texts {
            if let Some(el) = html_element(id) {
                el.set_text_content(Some(text));
            }
        }
    }

    fn html_element(id: &str) -> Option<HtmlElement> {
        web_sys::window()?
            .document()?
            .get_element_by_id(id)?
            .dyn_into::<HtmlElement>()
            .ok()
    }

    fn sprite_element(target: Target) -> Option<HtmlElement> {
        let id = match target {
            Target::Square => "square",
            Target::LeftFloor => "left-floor",
            Target::RightFloor => "right-floor",
            Target::LeftWall => "left-wall",
            Target::RightWall => "right-wall",
        };
        html_element(id)
    }

    fn css_easing(easing: Easing) -> &'static str {
        match easing {
            Easing::Linear => "linear",
            Easing::CubicIn => "cubic-bezier(0.32, 0, 0.67, 0)",
            Easing::CubicOut => "cubic-bezier(0.33, 1, 0.68, 1)",
            Easing::BounceOut => {
                "linear(0, 0.063, 0.25, 0.563, 1 36.4%, 0.812, 0.75, 0.813, 1 72.7%, 0.953, 0.938, 0.953, 1 90.9%, 0.984, 1)"
            }
        }
    }

    fn clear_motion(el: &HtmlElement) {
        let style = el.style();
        let _ = style.set_property("transition", "none");
        let _ = style.set_property("animation", "none");
    }

    /// Place a sprite without animating, committing the position before any
    /// tween queued in the same frame
    fn jump(el: &HtmlElement, target: Target, t: Transform, options: &GameOptions) {
        clear_motion(el);
        place(el, target, t, options);
        // Reading layout forces a style flush
        let _ = el.offset_width();
    }

    /// Position a sprite by its anchor: block centered, floors and walls
    /// anchored bottom-inner so their inner edge sits at `x`
    fn place(el: &HtmlElement, target: Target, t: Transform, options: &GameOptions) {
        let width = options.scene.width;
        let (dx, dy) = match target {
            Target::Square => (-options.square_size / 2.0, -options.square_size / 2.0),
            Target::LeftFloor => (-width, -options.floor_height),
            Target::RightFloor => (0.0, -options.floor_height),
            Target::LeftWall => (-width, -options.wall_height),
            Target::RightWall => (0.0, -options.wall_height),
        };
        let style = el.style();
        let _ = style.set_property(
            "translate",
            &format!("{}px {}px", t.pos.x + dx, t.pos.y + dy),
        );
        let _ = style.set_property("scale", &t.scale.to_string());
        let _ = style.set_property("rotate", &format!("{}deg", t.angle));
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Block Drop starting...");

        let options = GameOptions::load();
        let storage: Box<dyn Storage> = match LocalStorage::open() {
            Ok(storage) => Box::new(storage),
            Err(e) => {
                log::warn!("{}; progress will not survive a reload", e);
                Box::new(MemoryStorage::new())
            }
        };

        let seed = js_sys::Date::now() as u64;
        let mut controller = match LevelController::new(options, Timeline::new(), storage, seed) {
            Ok(controller) => controller,
            Err(e) => {
                log::error!("Cannot start: {}", e);
                return;
            }
        };
        controller.on_enter();
        log::info!("Game initialized with seed: {}", seed);

        let game = Rc::new(RefCell::new(Game::new(controller)));
        fill_hint();
        {
            let mut g = game.borrow_mut();
            g.render();
            g.update_hud();
        }

        setup_input_handlers(game.clone());

        // Hide loading indicator
        if let Some(loading) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("loading"))
        {
            let _ = loading.set_attribute("class", "hidden");
        }

        request_animation_frame(game);

        log::info!("Block Drop running!");
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let (Some(window), Some(scene)) = (web_sys::window(), html_element("game")) else {
            log::error!("No #game element");
            return;
        };

        // Press on the scene
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                event.prevent_default();
                game.borrow_mut().controller.on_pointer_down();
            });
            let _ = scene
                .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Release anywhere (the pointer may have left the scene)
        for kind in ["pointerup", "pointercancel"] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: PointerEvent| {
                game.borrow_mut().controller.on_pointer_up();
            });
            let _ = window.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let f: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
        let g = f.clone();

        *g.borrow_mut() = Some(Closure::new(move |time: f64| {
            {
                let mut game = game.borrow_mut();
                game.update(time);
                game.render();
                game.update_hud();
            }

            if let Some(window) = web_sys::window() {
                if let Some(callback) = f.borrow().as_ref() {
                    let _ = window.request_animation_frame(callback.as_ref().unchecked_ref());
                }
            }
        }));

        if let Some(window) = web_sys::window() {
            if let Some(callback) = g.borrow().as_ref() {
                let _ = window.request_animation_frame(callback.as_ref().unchecked_ref());
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::time::{SystemTime, UNIX_EPOCH};

    use block_drop::GameOptions;
    use block_drop::anim::Timeline;
    use block_drop::persistence::MemoryStorage;
    use block_drop::sim::{AutoPlayer, GameEvent, LevelController};

    /// Simulated frame length (ms)
    const FRAME_MS: f32 = 1000.0 / 60.0;
    /// Length of the headless demo (ms)
    const DEMO_MS: f32 = 120_000.0;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Block Drop (native) starting...");
    log::info!("Native mode runs a headless auto-play demo - run with `trunk serve` for the web version");

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default();
    let mut controller =
        match LevelController::new(GameOptions::load(), Timeline::new(), MemoryStorage::new(), seed) {
            Ok(controller) => controller,
            Err(e) => {
                log::error!("Cannot start: {}", e);
                std::process::exit(1);
            }
        };
    let mut player = AutoPlayer::new(seed.rotate_left(17), 0.85);
    controller.on_enter();
    log::info!("Game initialized with seed: {}", seed);

    let (mut cleared, mut failed) = (0u32, 0u32);
    let mut elapsed = 0.0;
    while elapsed < DEMO_MS {
        player.update(&mut controller, FRAME_MS);
        for handle in controller.animator_mut().advance(FRAME_MS) {
            controller.on_animation_complete(handle);
        }
        // Nothing to draw headless
        controller.animator_mut().drain_commands();

        for event in controller.drain_events() {
            match event {
                GameEvent::Dropped { outcome, width } => {
                    log::info!("Dropped at width {:.1}: {:?}", width, outcome)
                }
                GameEvent::LevelCompleted { .. } => cleared += 1,
                GameEvent::LevelFailed { .. } => failed += 1,
                _ => {}
            }
        }
        elapsed += FRAME_MS;
    }

    println!(
        "\nDemo finished at level {} ({} levels cleared, {} restarts)",
        controller.level(),
        cleared,
        failed
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
