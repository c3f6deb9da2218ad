use crate::core::{App, AppControl, FrameCtx};
use crate::input::{InputEvent, InputFrame, InputState};
use crate::time::{FpsCounter, FrameClock, FrameTime};

use super::surface::Surface;

/// Failures of the frame loop entry points.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("no surface attached; create one before calling run()")]
    NoSurface,

    #[error("a surface already exists")]
    SurfaceExists,

    #[error("surface creation failed: {0:#}")]
    Platform(anyhow::Error),

    #[error("init listener failed: {0:#}")]
    Init(anyhow::Error),
}

/// Explicit renderer context: the surface plus every piece of loop state.
///
/// Lifecycle is `attach` (or `create_surface`) → `run` → surface released.
pub struct Runtime<S: Surface> {
    title: String,
    surface: Option<S>,
    input: InputState,
    input_frame: InputFrame,
    clock: FrameClock,
    fps: FpsCounter,
}

impl<S: Surface> Runtime<S> {
    /// `title` is the base for the FPS title updates.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            surface: None,
            input: InputState::default(),
            input_frame: InputFrame::default(),
            clock: FrameClock::new(),
            fps: FpsCounter::new(),
        }
    }

    /// Creates the surface with `create` unless one already exists.
    ///
    /// `create` is not called when a surface is attached.
    pub fn create_surface<F>(&mut self, create: F) -> Result<(), RuntimeError>
    where
        F: FnOnce() -> anyhow::Result<S>,
    {
        if self.surface.is_some() {
            return Err(RuntimeError::SurfaceExists);
        }

        let surface = create().map_err(RuntimeError::Platform)?;
        self.surface = Some(surface);
        Ok(())
    }

    /// Attaches an existing surface. A second surface is rejected and dropped.
    pub fn attach(&mut self, surface: S) -> Result<(), RuntimeError> {
        if self.surface.is_some() {
            return Err(RuntimeError::SurfaceExists);
        }

        self.surface = Some(surface);
        Ok(())
    }

    pub fn has_surface(&self) -> bool {
        self.surface.is_some()
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    pub fn surface_mut(&mut self) -> Option<&mut S> {
        self.surface.as_mut()
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// Runs the frame loop until the close flag is observed.
    ///
    /// Order per iteration: clock/FPS, `on_time`, `on_update` and edge reset
    /// (both skipped while minimized), present, event poll and dispatch, close
    /// check.
    /// The surface is released when this returns, on success or init failure.
    pub fn run<A: App<S>>(&mut self, app: &mut A) -> Result<(), RuntimeError> {
        let Some(surface) = self.surface.as_mut() else {
            return Err(RuntimeError::NoSurface);
        };

        if let Err(err) = app.on_init(surface) {
            self.surface = None;
            return Err(RuntimeError::Init(err));
        }

        log::debug!("frame loop started");

        loop {
            let Self {
                title,
                surface,
                input,
                input_frame,
                clock,
                fps,
            } = self;
            let Some(surface) = surface.as_mut() else {
                return Err(RuntimeError::NoSurface);
            };

            let ft: FrameTime = clock.tick(surface.time());

            if let Some(count) = fps.tick(ft.dt) {
                surface.set_title(&format!("{title} - {count} fps"));
                log::trace!("{count} fps");
            }

            app.on_time(ft.time);

            if !surface.is_minimized() {
                let control = {
                    let mut ctx = FrameCtx {
                        surface: &mut *surface,
                        input,
                        input_frame,
                        time: ft,
                    };
                    app.on_update(&mut ctx)
                };

                if control == AppControl::Exit {
                    surface.request_close();
                }

                // Edges stay pending while minimized, so every press reaches one update slot.
                input_frame.clear();
            }

            surface.present();

            surface.poll_events(&mut |ev: InputEvent| {
                input.apply_event(input_frame, &ev);
                dispatch::<S, A>(app, &ev);
            });

            if surface.should_close() {
                break;
            }
        }

        if let Some(surface) = self.surface.as_mut() {
            app.on_finish(surface);
        }
        self.surface = None;

        log::debug!("frame loop finished");
        Ok(())
    }
}

fn dispatch<S: Surface, A: App<S>>(app: &mut A, ev: &InputEvent) {
    match ev {
        InputEvent::Key(key) => app.on_key(key),
        InputEvent::MouseMoved { x, y } => app.on_mouse_move(*x, *y),
        InputEvent::MouseScroll { total } => app.on_mouse_scroll(*total),
        InputEvent::Resized { width, height } => app.on_resize(*width, *height),
        InputEvent::Focused(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    use super::*;
    use crate::core::Callbacks;
    use crate::input::{Key, KeyAction, KeyEvent, Modifiers};

    #[derive(Default)]
    struct SurfaceLog {
        titles: Vec<String>,
        presents: u32,
        released: bool,
    }

    /// Delivers one scripted batch per poll and closes once the script runs out.
    struct ScriptedSurface {
        script: VecDeque<Vec<InputEvent>>,
        step: f32,
        now: f32,
        /// Polls left during which the surface reports itself minimized.
        minimized_polls: usize,
        closed: bool,
        log: Rc<RefCell<SurfaceLog>>,
    }

    impl ScriptedSurface {
        fn new(script: Vec<Vec<InputEvent>>) -> (Self, Rc<RefCell<SurfaceLog>>) {
            let log = Rc::new(RefCell::new(SurfaceLog::default()));
            let surface = Self {
                script: script.into(),
                step: 0.1,
                now: 0.0,
                minimized_polls: 0,
                closed: false,
                log: log.clone(),
            };
            (surface, log)
        }

        fn frames(n: usize) -> (Self, Rc<RefCell<SurfaceLog>>) {
            Self::new(vec![Vec::new(); n])
        }
    }

    impl Surface for ScriptedSurface {
        fn size(&self) -> (u32, u32) {
            (800, 600)
        }

        fn set_title(&mut self, title: &str) {
            self.log.borrow_mut().titles.push(title.to_string());
        }

        fn time(&self) -> f32 {
            self.now
        }

        fn poll_events(&mut self, sink: &mut dyn FnMut(InputEvent)) {
            self.minimized_polls = self.minimized_polls.saturating_sub(1);
            if let Some(batch) = self.script.pop_front() {
                for ev in batch {
                    sink(ev);
                }
            }
            if self.script.is_empty() {
                self.closed = true;
            }
        }

        fn present(&mut self) {
            self.log.borrow_mut().presents += 1;
            self.now += self.step;
        }

        fn should_close(&self) -> bool {
            self.closed
        }

        fn request_close(&mut self) {
            self.closed = true;
        }

        fn is_minimized(&self) -> bool {
            self.minimized_polls > 0
        }
    }

    impl Drop for ScriptedSurface {
        fn drop(&mut self) {
            self.log.borrow_mut().released = true;
        }
    }

    fn key(key: Key, action: KeyAction) -> InputEvent {
        InputEvent::Key(KeyEvent {
            key,
            scancode: 7,
            action,
            modifiers: Modifiers::default(),
        })
    }

    type Trace = Rc<RefCell<Vec<String>>>;

    fn tracing_callbacks(trace: &Trace) -> Callbacks<ScriptedSurface> {
        let mut cb = Callbacks::new();
        let t = trace.clone();
        cb.set_init(move |_| {
            t.borrow_mut().push("init".into());
            Ok(())
        });
        let t = trace.clone();
        cb.set_time(move |_| t.borrow_mut().push("time".into()));
        let t = trace.clone();
        cb.set_update(move |_: &mut FrameCtx<'_, ScriptedSurface>| {
            t.borrow_mut().push("update".into());
            AppControl::Continue
        });
        let t = trace.clone();
        cb.set_finish(move |_| t.borrow_mut().push("finish".into()));
        cb
    }

    // ── surface guards ────────────────────────────────────────────────────

    #[test]
    fn run_without_surface_is_an_error() {
        let mut runtime = Runtime::<ScriptedSurface>::new("t");
        let mut cb = Callbacks::new();
        assert!(matches!(runtime.run(&mut cb), Err(RuntimeError::NoSurface)));
    }

    #[test]
    fn second_surface_is_rejected() {
        let mut runtime = Runtime::new("t");
        let (first, _) = ScriptedSurface::frames(1);
        let (second, second_log) = ScriptedSurface::frames(1);

        runtime.attach(first).unwrap();
        assert!(matches!(runtime.attach(second), Err(RuntimeError::SurfaceExists)));
        assert!(second_log.borrow().released);
        assert!(runtime.has_surface());
    }

    #[test]
    fn create_surface_is_not_called_when_one_exists() {
        let mut runtime = Runtime::new("t");
        let (first, _) = ScriptedSurface::frames(1);
        runtime.attach(first).unwrap();

        let mut called = false;
        let res = runtime.create_surface(|| {
            called = true;
            Ok(ScriptedSurface::frames(1).0)
        });

        assert!(matches!(res, Err(RuntimeError::SurfaceExists)));
        assert!(!called);
    }

    #[test]
    fn create_failure_is_a_platform_error() {
        let mut runtime = Runtime::<ScriptedSurface>::new("t");
        let res = runtime.create_surface(|| anyhow::bail!("no display"));
        assert!(matches!(res, Err(RuntimeError::Platform(_))));
        assert!(!runtime.has_surface());
    }

    // ── loop order ────────────────────────────────────────────────────────

    #[test]
    fn init_frames_finish_in_order_then_surface_released() {
        let mut runtime = Runtime::new("t");
        let (surface, log) = ScriptedSurface::frames(2);
        runtime.attach(surface).unwrap();

        let trace = Trace::default();
        let mut cb = tracing_callbacks(&trace);
        runtime.run(&mut cb).unwrap();

        assert_eq!(
            *trace.borrow(),
            ["init", "time", "update", "time", "update", "finish"]
        );
        assert_eq!(log.borrow().presents, 2);
        assert!(log.borrow().released);
        assert!(!runtime.has_surface());
    }

    #[test]
    fn minimized_surface_skips_update_but_not_time() {
        let mut runtime = Runtime::new("t");
        let (mut surface, _) = ScriptedSurface::frames(3);
        surface.minimized_polls = 3;
        runtime.attach(surface).unwrap();

        let trace = Trace::default();
        let mut cb = tracing_callbacks(&trace);
        runtime.run(&mut cb).unwrap();

        let trace = trace.borrow();
        assert_eq!(trace.iter().filter(|s| *s == "time").count(), 3);
        assert!(!trace.iter().any(|s| s == "update"));
    }

    #[test]
    fn press_while_minimized_reaches_the_next_update() {
        let mut runtime = Runtime::new("t");
        let (mut surface, _) = ScriptedSurface::new(vec![
            vec![key(Key::F1, KeyAction::Press)],
            Vec::new(),
            Vec::new(),
        ]);
        surface.minimized_polls = 1;
        runtime.attach(surface).unwrap();

        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut cb = Callbacks::new();
        let s = seen.clone();
        cb.set_update(move |ctx: &mut FrameCtx<'_, ScriptedSurface>| {
            s.borrow_mut().push(ctx.input_frame.pressed(Key::F1));
            AppControl::Continue
        });
        runtime.run(&mut cb).unwrap();

        assert_eq!(*seen.borrow(), [true, false]);
    }

    #[test]
    fn empty_registry_runs_to_completion() {
        let mut runtime = Runtime::new("t");
        let (surface, log) = ScriptedSurface::new(vec![
            vec![key(Key::W, KeyAction::Press), InputEvent::MouseScroll { total: 1.0 }],
            vec![InputEvent::Resized { width: 10, height: 20 }],
        ]);
        runtime.attach(surface).unwrap();

        runtime.run(&mut Callbacks::new()).unwrap();
        assert!(log.borrow().released);
    }

    #[test]
    fn exit_from_update_stops_after_that_frame() {
        let mut runtime = Runtime::new("t");
        let (surface, log) = ScriptedSurface::frames(10);
        runtime.attach(surface).unwrap();

        let mut cb = Callbacks::new();
        cb.set_update(|_: &mut FrameCtx<'_, ScriptedSurface>| AppControl::Exit);
        runtime.run(&mut cb).unwrap();

        assert_eq!(log.borrow().presents, 1);
    }

    #[test]
    fn init_failure_releases_surface_without_frames() {
        let mut runtime = Runtime::new("t");
        let (surface, log) = ScriptedSurface::frames(3);
        runtime.attach(surface).unwrap();

        let trace = Trace::default();
        let mut cb = tracing_callbacks(&trace);
        cb.set_init(|_| anyhow::bail!("shader missing"));

        assert!(matches!(runtime.run(&mut cb), Err(RuntimeError::Init(_))));
        assert!(trace.borrow().is_empty());
        assert_eq!(log.borrow().presents, 0);
        assert!(log.borrow().released);
    }

    // ── timing ────────────────────────────────────────────────────────────

    #[test]
    fn fps_title_updates_once_window_elapses() {
        let mut runtime = Runtime::new("viewer");
        let (mut surface, log) = ScriptedSurface::frames(6);
        surface.step = 0.3;
        runtime.attach(surface).unwrap();

        runtime.run(&mut Callbacks::new()).unwrap();

        // Samples 0.0, 0.3, 0.6, 0.9, 1.2: the window passes 1s on the fifth frame.
        assert_eq!(log.borrow().titles, ["viewer - 5 fps"]);
    }

    #[test]
    fn time_slot_receives_wall_clock() {
        let mut runtime = Runtime::new("t");
        let (surface, _) = ScriptedSurface::frames(3);
        runtime.attach(surface).unwrap();

        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = seen.clone();
        let mut cb = Callbacks::new();
        cb.set_time(move |t| s.borrow_mut().push(t));
        runtime.run(&mut cb).unwrap();

        let seen = seen.borrow();
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[0], 0.0);
        assert!(seen[1] > seen[0] && seen[2] > seen[1]);
    }

    // ── dispatch ──────────────────────────────────────────────────────────

    #[test]
    fn events_reach_their_slots() {
        let mut runtime = Runtime::new("t");
        let (surface, _) = ScriptedSurface::new(vec![vec![
            key(Key::Unused, KeyAction::Press),
            InputEvent::MouseMoved { x: 3.0, y: 4.0 },
            InputEvent::MouseScroll { total: 2.0 },
            InputEvent::Resized { width: 640, height: 480 },
        ]]);
        runtime.attach(surface).unwrap();

        let trace = Trace::default();
        let mut cb = Callbacks::new();
        let t = trace.clone();
        cb.set_keys(move |ev| t.borrow_mut().push(format!("key {:?} {}", ev.key, ev.scancode)));
        let t = trace.clone();
        cb.set_mouse_move(move |x, y| t.borrow_mut().push(format!("move {x} {y}")));
        let t = trace.clone();
        cb.set_mouse_scroll(move |total| t.borrow_mut().push(format!("scroll {total}")));
        let t = trace.clone();
        cb.set_resize(move |w, h| t.borrow_mut().push(format!("resize {w} {h}")));

        runtime.run(&mut cb).unwrap();

        assert_eq!(
            *trace.borrow(),
            ["key Unused 7", "move 3 4", "scroll 2", "resize 640 480"]
        );
    }

    #[test]
    fn press_edge_is_seen_by_exactly_one_update() {
        let mut runtime = Runtime::new("t");
        let (surface, _) = ScriptedSurface::new(vec![
            vec![key(Key::F1, KeyAction::Press)],
            vec![key(Key::F1, KeyAction::Repeat)],
            vec![],
            vec![],
        ]);
        runtime.attach(surface).unwrap();

        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = seen.clone();
        let mut cb = Callbacks::new();
        cb.set_update(move |ctx: &mut FrameCtx<'_, ScriptedSurface>| {
            s.borrow_mut()
                .push((ctx.input_frame.pressed(Key::F1), ctx.input.key_down(Key::F1)));
            AppControl::Continue
        });
        runtime.run(&mut cb).unwrap();

        // Frame 1 runs before any poll; the edge shows up in frame 2 only.
        assert_eq!(
            *seen.borrow(),
            [(false, false), (true, true), (false, true), (false, true)]
        );
    }

    struct Counter {
        keys: u32,
        finished: bool,
    }

    impl App<ScriptedSurface> for Counter {
        fn on_key(&mut self, _event: &KeyEvent) {
            self.keys += 1;
        }

        fn on_finish(&mut self, _surface: &mut ScriptedSurface) {
            self.finished = true;
        }
    }

    #[test]
    fn trait_defaults_are_no_ops() {
        let mut runtime = Runtime::new("t");
        let (surface, _) = ScriptedSurface::new(vec![vec![
            key(Key::A, KeyAction::Press),
            key(Key::A, KeyAction::Release),
            InputEvent::MouseMoved { x: 1.0, y: 1.0 },
        ]]);
        runtime.attach(surface).unwrap();

        let mut app = Counter {
            keys: 0,
            finished: false,
        };
        runtime.run(&mut app).unwrap();

        assert_eq!(app.keys, 2);
        assert!(app.finished);
    }
}
