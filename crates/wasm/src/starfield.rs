//! Canvas renderer and `requestAnimationFrame` loop for the starfield.

use std::cell::RefCell;
use std::f64::consts::TAU;
use std::rc::Rc;

use anyhow::{Context as _, anyhow};
use nightsky_core::config::StarfieldConfig;
use nightsky_core::starfield::{Clock, FrameScheduler, FrameTask};
use nightsky_protocol::{Background, RenderCommand};
use rand::SeedableRng;
use rand::rngs::StdRng;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    CanvasRenderingContext2d, Document, HtmlCanvasElement, PageTransitionEvent, Performance,
    Window,
};

use crate::dom::{self, describe, js_err};

type Task = FrameTask<PerformanceClock, StdRng>;
type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// `performance.now()`.
pub struct PerformanceClock {
    performance: Performance,
}

impl Clock for PerformanceClock {
    fn now_ms(&self) -> f64 {
        self.performance.now()
    }
}

/// Schedules the frame callback with `requestAnimationFrame`.
struct AnimationFrameScheduler<'a> {
    window: &'a Window,
    callback: &'a FrameCallback,
}

impl FrameScheduler for AnimationFrameScheduler<'_> {
    fn request_frame(&mut self) {
        request_animation_frame(self.window, self.callback);
    }
}

fn request_animation_frame(window: &Window, callback: &FrameCallback) {
    if let Some(callback) = callback.borrow().as_ref()
        && let Err(e) = window.request_animation_frame(callback.as_ref().unchecked_ref())
    {
        log::error!("requestAnimationFrame failed: {}", describe(&e));
    }
}

/// Draws render commands onto a 2D canvas context.
struct CanvasRenderer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasRenderer {
    fn draw(&self, commands: &[RenderCommand]) -> Result<(), JsValue> {
        let width = f64::from(self.canvas.width());
        let height = f64::from(self.canvas.height());
        for cmd in commands {
            match cmd {
                RenderCommand::Clear { background } => {
                    self.ctx.clear_rect(0.0, 0.0, width, height);
                    if let Some(fill) = background.fill_css() {
                        self.ctx.set_fill_style_str(&fill);
                        self.ctx.fill_rect(0.0, 0.0, width, height);
                    }
                }
                RenderCommand::FillCircle {
                    center,
                    radius,
                    color,
                } => {
                    self.ctx.begin_path();
                    self.ctx.arc(center.x, center.y, *radius, 0.0, TAU)?;
                    self.ctx.set_fill_style_str(&color.to_css());
                    self.ctx.fill();
                }
                RenderCommand::StrokeGradientLine {
                    from,
                    to,
                    from_color,
                    to_color,
                    width: line_width,
                } => {
                    let gradient = self.ctx.create_linear_gradient(from.x, from.y, to.x, to.y);
                    gradient.add_color_stop(0.0, &from_color.to_css())?;
                    gradient.add_color_stop(1.0, &to_color.to_css())?;
                    self.ctx.set_stroke_style_canvas_gradient(&gradient);
                    self.ctx.set_line_width(*line_width);
                    self.ctx.begin_path();
                    self.ctx.move_to(from.x, from.y);
                    self.ctx.line_to(to.x, to.y);
                    self.ctx.stroke();
                }
            }
        }
        Ok(())
    }
}

fn resolve_background(
    window: &Window,
    document: &Document,
    config: &StarfieldConfig,
) -> Background {
    config
        .background
        .resolve(|name| dom::css_variable(window, document, name))
}

/// Match the canvas to the viewport and return its size.
fn fit_to_viewport(window: &Window, canvas: &HtmlCanvasElement) -> anyhow::Result<(f64, f64)> {
    let (width, height) = dom::viewport_size(window)?;
    canvas.set_width(width as u32);
    canvas.set_height(height as u32);
    Ok((width, height))
}

/// Start the animation on the configured canvas.
pub fn start(window: &Window, document: &Document, config: &StarfieldConfig) -> anyhow::Result<()> {
    let canvas: HtmlCanvasElement = document
        .get_element_by_id(&config.canvas_id)
        .ok_or_else(|| anyhow!("no canvas element with id '{}'", config.canvas_id))?
        .dyn_into()
        .map_err(|_| anyhow!("#{} is not a canvas", config.canvas_id))?;
    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")
        .map_err(js_err)?
        .ok_or_else(|| anyhow!("2d context unavailable"))?
        .dyn_into()
        .map_err(|_| anyhow!("unexpected 2d context type"))?;
    let performance = window
        .performance()
        .context("performance API unavailable")?;

    let (width, height) = fit_to_viewport(window, &canvas)?;
    let mut task: Task = FrameTask::new(
        config.clone(),
        resolve_background(window, document, config),
        PerformanceClock { performance },
        StdRng::from_entropy(),
        width,
        height,
    );
    if config.respect_reduced_motion && dom::prefers_reduced_motion(window) {
        log::info!("reduced motion requested, drawing a still starfield");
        task = task.still();
    }
    let task = Rc::new(RefCell::new(task));
    let renderer = Rc::new(CanvasRenderer {
        canvas: canvas.clone(),
        ctx,
    });

    let callback: FrameCallback = Rc::new(RefCell::new(None));
    {
        let task = task.clone();
        let renderer = renderer.clone();
        let window = window.clone();
        let next = callback.clone();
        *callback.borrow_mut() = Some(Closure::new(move |_timestamp: f64| {
            let mut scheduler = AnimationFrameScheduler {
                window: &window,
                callback: &next,
            };
            let commands = task.borrow_mut().run_frame(&mut scheduler);
            if let Err(e) = renderer.draw(&commands) {
                log::error!("starfield draw failed: {}", describe(&e));
            }
        }));
    }
    request_animation_frame(window, &callback);

    let on_resize = {
        let task = task.clone();
        let callback = callback.clone();
        let window = window.clone();
        let document = document.clone();
        let config = config.clone();
        Closure::<dyn FnMut()>::new(move || {
            let (width, height) = match fit_to_viewport(&window, &canvas) {
                Ok(size) => size,
                Err(e) => {
                    log::error!("starfield resize failed: {e:#}");
                    return;
                }
            };
            let background = resolve_background(&window, &document, &config);
            let mut task = task.borrow_mut();
            let was_running = task.is_running();
            task.resize(width, height, background);
            if !was_running && task.is_running() {
                drop(task);
                request_animation_frame(&window, &callback);
            }
        })
    };
    window
        .add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())
        .map_err(js_err)?;
    on_resize.forget();

    let on_hide = {
        let task = task.clone();
        Closure::<dyn FnMut()>::new(move || task.borrow_mut().stop())
    };
    window
        .add_event_listener_with_callback("pagehide", on_hide.as_ref().unchecked_ref())
        .map_err(js_err)?;
    on_hide.forget();

    let on_show = {
        let window = window.clone();
        Closure::<dyn FnMut(PageTransitionEvent)>::new(move |event: PageTransitionEvent| {
            if event.persisted() && task.borrow_mut().resume() {
                request_animation_frame(&window, &callback);
            }
        })
    };
    window
        .add_event_listener_with_callback("pageshow", on_show.as_ref().unchecked_ref())
        .map_err(js_err)?;
    on_show.forget();

    Ok(())
}
