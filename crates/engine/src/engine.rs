use std::time::Duration;

use foundation::TIME;
use input::{Event, EventBus, InputSystem};
use log::{debug, error};
use renderer_2d::AssetStore;

use crate::{
    context::ApplicationContext,
    frame_counter::{ExponentialMovingAverage, FixedTimestep, FpsPrinter, FrameCounter},
    platform::Platform,
    scene::{Scene, SceneManager},
    Result,
};

/// Frame loop tuning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    updates_per_second: u32,
    max_updates_per_frame: u32,
    fps_log_throttle_ms: u64,
}

impl EngineConfig {
    #[inline]
    pub fn with_updates_per_second(mut self, updates_per_second: u32) -> Self {
        self.updates_per_second = updates_per_second;
        self
    }

    #[inline]
    pub fn with_max_updates_per_frame(mut self, max_updates_per_frame: u32) -> Self {
        self.max_updates_per_frame = max_updates_per_frame;
        self
    }

    #[inline]
    pub fn with_fps_log_throttle_ms(mut self, fps_log_throttle_ms: u64) -> Self {
        self.fps_log_throttle_ms = fps_log_throttle_ms;
        self
    }

    pub fn updates_per_second(&self) -> u32 {
        self.updates_per_second
    }

    pub fn max_updates_per_frame(&self) -> u32 {
        self.max_updates_per_frame
    }

    pub fn fps_log_throttle_ms(&self) -> u64 {
        self.fps_log_throttle_ms
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            updates_per_second: 60,
            max_updates_per_frame: 5,
            fps_log_throttle_ms: 1000,
        }
    }
}

#[derive(Default)]
pub struct EngineBuilder {
    config: Option<EngineConfig>,
    assets: Option<AssetStore>,
}

impl EngineBuilder {
    /// Initializes a new `EngineBuilder` with default values.
    #[inline]
    pub fn new() -> Self {
        Self {
            config: Some(EngineConfig::default()),
            assets: Some(AssetStore::new()),
        }
    }

    #[inline]
    pub fn with_config(mut self, config: Option<EngineConfig>) -> Self {
        self.config = config;
        self
    }

    /// Starts the engine with assets that were loaded ahead of time.
    #[inline]
    pub fn with_asset_store(mut self, assets: Option<AssetStore>) -> Self {
        self.assets = assets;
        self
    }

    #[inline]
    pub fn build(mut self) -> Result<Engine> {
        let config = self.config.take().ok_or("config is None")?;
        let assets = self.assets.take().ok_or("asset store is None")?;

        if config.updates_per_second == 0 {
            return Err("updates_per_second must be positive".into());
        }
        if config.max_updates_per_frame == 0 {
            return Err("max_updates_per_frame must be positive".into());
        }

        Ok(Engine::new(config, assets))
    }
}

pub struct Engine {
    config: EngineConfig,
    input: InputSystem,
    events: EventBus,
    assets: AssetStore,
}

impl Engine {
    /// Initializes a new `Engine` with provided values.
    #[inline]
    pub fn new(config: EngineConfig, assets: AssetStore) -> Self {
        Self {
            config,
            input: InputSystem::new(),
            events: EventBus::new(),
            assets,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Bus the platform events are dispatched on, open for subscriptions
    /// before the loop starts.
    pub fn events(&mut self) -> &mut EventBus {
        &mut self.events
    }

    pub fn input(&self) -> &InputSystem {
        &self.input
    }

    pub fn assets(&self) -> &AssetStore {
        &self.assets
    }

    /// Runs `scene` until the platform closes or a close is requested.
    ///
    /// The running scene is destroyed on exit, also when a hook failed.
    pub fn run<P>(&mut self, platform: &mut P, scene: Box<dyn Scene>) -> Result<()>
    where
        P: Platform + ?Sized,
    {
        let mut scenes = SceneManager::new();
        {
            let mut ctx = ApplicationContext::new(
                platform.graphics(),
                &self.input,
                &mut self.events,
                &mut self.assets,
                Duration::ZERO,
                0,
            );
            scenes.set_scene(&mut ctx, scene)?;
        }

        let result = self.run_loop(platform, &mut scenes);
        if let Err(e) = &result {
            error!("engine: {e}");
        }

        let mut ctx = ApplicationContext::new(
            platform.graphics(),
            &self.input,
            &mut self.events,
            &mut self.assets,
            Duration::ZERO,
            0,
        );
        scenes.clear(&mut ctx);
        result
    }

    fn run_loop<P>(&mut self, platform: &mut P, scenes: &mut SceneManager) -> Result<()>
    where
        P: Platform + ?Sized,
    {
        let mut frame_counter = FrameCounter::new(platform.elapsed());
        let mut timestep = FixedTimestep::new(
            self.config.updates_per_second,
            self.config.max_updates_per_frame,
        );
        let mut fps_printer = {
            let moving_average = ExponentialMovingAverage::new().with_alpha(0.95);
            let print_fn = |fps| debug!("fps: {:.2}", fps);
            FpsPrinter::new(moving_average, print_fn)
                .with_throttle_ms(self.config.fps_log_throttle_ms)
        };

        let mut close_requested = false;
        while !close_requested && !platform.should_close() {
            TIME!("Engine.frame");

            // feed input state and subscribers
            for event in platform.poll_events() {
                self.input.on_event(&event);
                self.events.dispatch(&event);
                if event == Event::WindowClose {
                    close_requested = true;
                }
            }
            if close_requested {
                break;
            }

            frame_counter.on_update(platform.elapsed());
            let delta_time = frame_counter.delta_time();
            let frame = frame_counter.frame_count();
            fps_printer.on_update(delta_time, frame_counter.fps());

            let steps = timestep.advance(delta_time);
            {
                let mut ctx = ApplicationContext::new(
                    platform.graphics(),
                    &self.input,
                    &mut self.events,
                    &mut self.assets,
                    delta_time,
                    frame,
                );
                for _ in 0..steps {
                    scenes
                        .update(&mut ctx, timestep.step())
                        .map_err(|e| format!("scene update: {e:?}"))?;
                    if let Some(next) = ctx.take_next_scene() {
                        scenes.set_scene(&mut ctx, next)?;
                    }
                }
                close_requested |= ctx.is_close_requested();
            }

            platform
                .begin_frame()
                .map_err(|e| format!("begin frame: {e:?}"))?;
            {
                let mut ctx = ApplicationContext::new(
                    platform.graphics(),
                    &self.input,
                    &mut self.events,
                    &mut self.assets,
                    delta_time,
                    frame,
                );
                scenes
                    .render(&mut ctx)
                    .map_err(|e| format!("scene render: {e:?}"))?;
                if let Some(next) = ctx.take_next_scene() {
                    scenes.set_scene(&mut ctx, next)?;
                }
                close_requested |= ctx.is_close_requested();
            }
            platform.present().map_err(|e| format!("present: {e:?}"))?;

            self.input.reset();
        }

        debug!("engine: loop exited after {} frames", frame_counter.frame_count());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use input::{EventKind, Key};
    use renderer_2d::graphics::Command;

    use super::*;
    use crate::platform::HeadlessPlatform;

    #[derive(Debug, Default, PartialEq)]
    struct Counts {
        create: u32,
        update: u32,
        render: u32,
        destroy: u32,
        steps: Vec<Duration>,
        w_pressed: Vec<bool>,
    }

    struct Counting {
        counts: Rc<RefCell<Counts>>,
        close_after_renders: Option<u32>,
        fail_update: bool,
    }

    impl Counting {
        fn new(counts: &Rc<RefCell<Counts>>) -> Self {
            Self {
                counts: Rc::clone(counts),
                close_after_renders: None,
                fail_update: false,
            }
        }
    }

    impl Scene for Counting {
        fn create(&mut self, _: &mut ApplicationContext) -> Result<()> {
            self.counts.borrow_mut().create += 1;
            Ok(())
        }

        fn update(&mut self, ctx: &mut ApplicationContext, delta_time: Duration) -> Result<()> {
            if self.fail_update {
                return Err("update failed".into());
            }
            let mut counts = self.counts.borrow_mut();
            counts.update += 1;
            counts.steps.push(delta_time);
            counts.w_pressed.push(ctx.input().is_key_pressed(Key::W));
            Ok(())
        }

        fn render(&mut self, ctx: &mut ApplicationContext) -> Result<()> {
            let mut counts = self.counts.borrow_mut();
            counts.render += 1;
            if Some(counts.render) == self.close_after_renders {
                ctx.request_close();
            }
            Ok(())
        }

        fn destroy(&mut self, _: &mut ApplicationContext) {
            self.counts.borrow_mut().destroy += 1;
        }
    }

    #[test]
    fn one_update_per_frame_at_matching_rate() {
        let counts = Rc::new(RefCell::new(Counts::default()));
        let mut platform = HeadlessPlatform::new()
            .with_frame_time(Duration::from_secs_f64(1.0 / 60.0))
            .with_frame_limit(10);
        let mut engine = EngineBuilder::new().build().unwrap();

        engine
            .run(&mut platform, Box::new(Counting::new(&counts)))
            .unwrap();

        let counts = counts.borrow();
        assert_eq!(counts.create, 1);
        assert_eq!(counts.update, 10);
        assert_eq!(counts.render, 10);
        assert_eq!(counts.destroy, 1);
        assert!(counts
            .steps
            .iter()
            .all(|step| *step == Duration::from_secs_f64(1.0 / 60.0)));
        assert_eq!(platform.frames_presented(), 10);
    }

    #[test]
    fn slow_frames_catch_up_within_bounds() {
        let counts = Rc::new(RefCell::new(Counts::default()));
        let mut platform = HeadlessPlatform::new()
            .with_frame_time(Duration::from_millis(250))
            .with_frame_limit(2);
        let mut engine = EngineBuilder::new()
            .with_config(Some(
                EngineConfig::default()
                    .with_updates_per_second(10)
                    .with_max_updates_per_frame(2),
            ))
            .build()
            .unwrap();

        engine
            .run(&mut platform, Box::new(Counting::new(&counts)))
            .unwrap();

        assert_eq!(counts.borrow().update, 4);
        assert_eq!(counts.borrow().render, 2);
    }

    #[test]
    fn close_request_stops_the_loop() {
        let counts = Rc::new(RefCell::new(Counts::default()));
        let mut platform = HeadlessPlatform::new();
        let mut engine = EngineBuilder::new().build().unwrap();
        let mut scene = Counting::new(&counts);
        scene.close_after_renders = Some(3);

        engine.run(&mut platform, Box::new(scene)).unwrap();

        assert_eq!(counts.borrow().render, 3);
        assert_eq!(counts.borrow().destroy, 1);
        assert_eq!(platform.frames_presented(), 3);
    }

    #[test]
    fn window_close_event_ends_before_rendering() {
        let counts = Rc::new(RefCell::new(Counts::default()));
        let mut platform = HeadlessPlatform::new()
            .with_event(2, Event::WindowClose)
            .with_frame_limit(100);
        let mut engine = EngineBuilder::new().build().unwrap();

        engine
            .run(&mut platform, Box::new(Counting::new(&counts)))
            .unwrap();

        assert_eq!(counts.borrow().render, 2);
        assert_eq!(counts.borrow().destroy, 1);
    }

    #[test]
    fn events_reach_input_and_subscribers() {
        let counts = Rc::new(RefCell::new(Counts::default()));
        let mut platform = HeadlessPlatform::new()
            .with_event(1, Event::key_press(Key::W))
            .with_event(2, Event::key_release(Key::W))
            .with_frame_limit(3);
        let mut engine = EngineBuilder::new().build().unwrap();

        let presses = Rc::new(RefCell::new(0));
        let seen = Rc::clone(&presses);
        engine
            .events()
            .subscribe(EventKind::KeyPress, move |_| *seen.borrow_mut() += 1);

        engine
            .run(&mut platform, Box::new(Counting::new(&counts)))
            .unwrap();

        assert_eq!(*presses.borrow(), 1);
        assert_eq!(counts.borrow().w_pressed, vec![false, true, false]);
    }

    #[test]
    fn failing_scene_is_still_destroyed() {
        let counts = Rc::new(RefCell::new(Counts::default()));
        let mut platform = HeadlessPlatform::new().with_frame_limit(5);
        let mut engine = EngineBuilder::new().build().unwrap();
        let mut scene = Counting::new(&counts);
        scene.fail_update = true;

        assert!(engine.run(&mut platform, Box::new(scene)).is_err());
        assert_eq!(counts.borrow().destroy, 1);
        assert_eq!(counts.borrow().render, 0);
    }

    #[test]
    fn frames_are_cleared_before_rendering() {
        let counts = Rc::new(RefCell::new(Counts::default()));
        let mut platform = HeadlessPlatform::new().with_frame_limit(2);
        let mut engine = EngineBuilder::new().build().unwrap();

        engine
            .run(&mut platform, Box::new(Counting::new(&counts)))
            .unwrap();

        assert_eq!(platform.context().commands(), &[Command::Clear, Command::Clear]);
    }

    #[test]
    fn builder_rejects_invalid_config() {
        let zero_rate = EngineConfig::default().with_updates_per_second(0);
        assert!(EngineBuilder::new()
            .with_config(Some(zero_rate))
            .build()
            .is_err());
        assert!(EngineBuilder::new().with_config(None).build().is_err());
        assert_eq!(
            EngineBuilder::new().build().unwrap().config(),
            &EngineConfig::default()
        );
    }
}
