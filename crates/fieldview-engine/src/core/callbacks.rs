use crate::input::KeyEvent;
use crate::window::Surface;

use super::app::{App, AppControl};
use super::ctx::FrameCtx;

type InitFn<S> = Box<dyn FnMut(&mut S) -> anyhow::Result<()>>;
type UpdateFn<S> = Box<dyn FnMut(&mut FrameCtx<'_, S>) -> AppControl>;
type FinishFn<S> = Box<dyn FnMut(&mut S)>;

/// Registry of optional listener closures.
///
/// Each setter replaces its slot. Unset slots are skipped, never an error.
pub struct Callbacks<S: Surface> {
    init: Option<InitFn<S>>,
    update: Option<UpdateFn<S>>,
    finish: Option<FinishFn<S>>,
    keys: Option<Box<dyn FnMut(&KeyEvent)>>,
    mouse_move: Option<Box<dyn FnMut(f32, f32)>>,
    mouse_scroll: Option<Box<dyn FnMut(f32)>>,
    resize: Option<Box<dyn FnMut(u32, u32)>>,
    time: Option<Box<dyn FnMut(f32)>>,
}

impl<S: Surface> Callbacks<S> {
    pub fn new() -> Self {
        Self {
            init: None,
            update: None,
            finish: None,
            keys: None,
            mouse_move: None,
            mouse_scroll: None,
            resize: None,
            time: None,
        }
    }

    pub fn set_init(&mut self, f: impl FnMut(&mut S) -> anyhow::Result<()> + 'static) -> &mut Self {
        self.init = Some(Box::new(f));
        self
    }

    pub fn set_update(
        &mut self,
        f: impl FnMut(&mut FrameCtx<'_, S>) -> AppControl + 'static,
    ) -> &mut Self {
        self.update = Some(Box::new(f));
        self
    }

    pub fn set_finish(&mut self, f: impl FnMut(&mut S) + 'static) -> &mut Self {
        self.finish = Some(Box::new(f));
        self
    }

    pub fn set_keys(&mut self, f: impl FnMut(&KeyEvent) + 'static) -> &mut Self {
        self.keys = Some(Box::new(f));
        self
    }

    pub fn set_mouse_move(&mut self, f: impl FnMut(f32, f32) + 'static) -> &mut Self {
        self.mouse_move = Some(Box::new(f));
        self
    }

    pub fn set_mouse_scroll(&mut self, f: impl FnMut(f32) + 'static) -> &mut Self {
        self.mouse_scroll = Some(Box::new(f));
        self
    }

    pub fn set_resize(&mut self, f: impl FnMut(u32, u32) + 'static) -> &mut Self {
        self.resize = Some(Box::new(f));
        self
    }

    pub fn set_time(&mut self, f: impl FnMut(f32) + 'static) -> &mut Self {
        self.time = Some(Box::new(f));
        self
    }
}

impl<S: Surface> Default for Callbacks<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Surface> App<S> for Callbacks<S> {
    fn on_init(&mut self, surface: &mut S) -> anyhow::Result<()> {
        match self.init.as_mut() {
            Some(f) => f(surface),
            None => Ok(()),
        }
    }

    fn on_time(&mut self, time: f32) {
        if let Some(f) = self.time.as_mut() {
            f(time);
        }
    }

    fn on_update(&mut self, ctx: &mut FrameCtx<'_, S>) -> AppControl {
        match self.update.as_mut() {
            Some(f) => f(ctx),
            None => AppControl::Continue,
        }
    }

    fn on_key(&mut self, event: &KeyEvent) {
        if let Some(f) = self.keys.as_mut() {
            f(event);
        }
    }

    fn on_mouse_move(&mut self, x: f32, y: f32) {
        if let Some(f) = self.mouse_move.as_mut() {
            f(x, y);
        }
    }

    fn on_mouse_scroll(&mut self, total: f32) {
        if let Some(f) = self.mouse_scroll.as_mut() {
            f(total);
        }
    }

    fn on_resize(&mut self, width: u32, height: u32) {
        if let Some(f) = self.resize.as_mut() {
            f(width, height);
        }
    }

    fn on_finish(&mut self, surface: &mut S) {
        if let Some(f) = self.finish.as_mut() {
            f(surface);
        }
    }
}
