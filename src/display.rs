/*!
Host window (feature `display`): winit event loop + `pixels` surface.

The loop owns the `Console`. Every `RedrawRequested` runs one `tick`, copies
the PPU surface into the pixel buffer and presents it, then asks for the next
redraw. Frames are paced to roughly 60 Hz.

Keys:
- Space: pause / resume
- S: single step
- R: restart from the loaded ROM
- Escape: exit

The window closes on a close request or once `Console::should_exit()` is set.

Log entries collected by the console's `ConsoleLog` are printed to stderr
after every redraw and once more when the loop ends.
*/

use std::rc::Rc;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use pixels::{Pixels, SurfaceTexture};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::console::Console;
use crate::logger::ConsoleLog;
use crate::ppu::{SCREEN_HEIGHT, SCREEN_WIDTH};

/// ~60 Hz host frame.
const FRAME_DURATION: Duration = Duration::from_nanos(16_666_667);
const SCALE: f64 = 3.0;

struct App {
    console: Console,
    log: Rc<ConsoleLog>,
    window: Option<Arc<Window>>,
    pixels: Option<Pixels<'static>>,
    last_frame: Instant,
    error: Option<anyhow::Error>,
}

impl App {
    fn init_surface(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let size = LogicalSize::new(SCREEN_WIDTH as f64 * SCALE, SCREEN_HEIGHT as f64 * SCALE);
        let attrs = Window::default_attributes()
            .with_title("famicore")
            .with_inner_size(size)
            .with_min_inner_size(LogicalSize::new(SCREEN_WIDTH as f64, SCREEN_HEIGHT as f64));
        let window = Arc::new(event_loop.create_window(attrs).context("creating window")?);

        let inner = window.inner_size();
        let surface = SurfaceTexture::new(inner.width, inner.height, Arc::clone(&window));
        let pixels = Pixels::new(SCREEN_WIDTH as u32, SCREEN_HEIGHT as u32, surface)
            .context("creating pixel surface")?;

        window.request_redraw();
        self.window = Some(window);
        self.pixels = Some(pixels);
        Ok(())
    }

    fn redraw(&mut self) -> Result<()> {
        self.console.tick();
        self.flush_log();

        if let Some(pixels) = self.pixels.as_mut() {
            self.console.ppu().write_rgba(pixels.frame_mut());
            pixels.render().context("presenting frame")?;
        }

        let elapsed = self.last_frame.elapsed();
        if elapsed < FRAME_DURATION {
            std::thread::sleep(FRAME_DURATION - elapsed);
        }
        self.last_frame = Instant::now();
        Ok(())
    }

    fn on_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Space => self.console.pause(),
            KeyCode::KeyS => {
                let cycles = self.console.step();
                let line = format!("{} ({cycles} cycles)", self.console.snapshot());
                self.console.logger().message(&line);
            }
            KeyCode::KeyR => {
                // A failed reload is logged by `Console::start` and leaves
                // the running program in place.
                let _ = self.console.restart();
            }
            KeyCode::Escape => self.console.exit(),
            _ => {}
        }
    }

    fn flush_log(&self) {
        for entry in self.log.drain() {
            eprintln!("{entry}");
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        self.error = Some(err);
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(err) = self.init_surface(event_loop) {
                self.fail(event_loop, err);
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                self.console.exit();
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let Some(pixels) = self.pixels.as_mut() {
                    if let Err(err) = pixels.resize_surface(size.width, size.height) {
                        self.fail(event_loop, anyhow::Error::new(err).context("resizing surface"));
                    }
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => self.on_key(code),
            WindowEvent::RedrawRequested => {
                if let Err(err) = self.redraw() {
                    self.fail(event_loop, err);
                    return;
                }
                if self.console.should_exit() {
                    event_loop.exit();
                } else if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}

/// Open a window and drive `console` until it is closed. `log` must be the
/// sink the console was built with.
pub fn run(console: Console, log: Rc<ConsoleLog>) -> Result<()> {
    let event_loop = EventLoop::new().context("creating event loop")?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App {
        console,
        log,
        window: None,
        pixels: None,
        last_frame: Instant::now(),
        error: None,
    };
    let result = event_loop.run_app(&mut app).context("running event loop");
    app.flush_log();
    result?;

    match app.error.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
