//! Live preview of a drawing in progress.
//!
//! Streams the [`Canvas`] into an SDL2 texture once per frame, scaled to the
//! window. Only built with the `preview` feature.

use std::time::{Duration, Instant};

use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::pixels::PixelFormatEnum;
use sdl2::rect::Rect;

use crate::error::{Result, SkylineError};
use crate::render::Canvas;

pub const WINDOW_SIZE: u32 = 800;
pub const FPS: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowEvent {
    None,
    Quit,
    Resize(u32, u32),
}

fn window_error(err: impl ToString) -> SkylineError {
    SkylineError::Window(err.to_string())
}

/// Keeps the preview at [`FPS`] frames per second.
pub struct FrameLimiter {
    frame_start: Instant,
}

impl FrameLimiter {
    pub fn new() -> Self {
        Self {
            frame_start: Instant::now(),
        }
    }

    /// Sleeps off whatever is left of the current frame, then starts the
    /// next one. Returns how long the finished frame took.
    pub fn finish_frame(&mut self) -> Duration {
        let target = Duration::from_secs(1) / FPS;
        let elapsed = self.frame_start.elapsed();
        if elapsed < target {
            std::thread::sleep(target - elapsed);
        }
        let frame_time = self.frame_start.elapsed();
        self.frame_start = Instant::now();
        frame_time
    }
}

impl Default for FrameLimiter {
    fn default() -> Self {
        Self::new()
    }
}

pub struct Window {
    canvas: sdl2::render::Canvas<sdl2::video::Window>,
    // Declared before `texture_creator` so it is dropped first.
    texture: sdl2::render::Texture<'static>,
    #[allow(dead_code)] // owns the memory `texture` borrows
    texture_creator: Box<sdl2::render::TextureCreator<sdl2::video::WindowContext>>,
    event_pump: sdl2::EventPump,
    width: u32,
    height: u32,
}

impl Window {
    /// Opens a window showing a `texture_size`² canvas.
    pub fn new(title: &str, width: u32, height: u32, texture_size: u32) -> Result<Self> {
        let sdl_context = sdl2::init().map_err(window_error)?;
        let video_subsystem = sdl_context.video().map_err(window_error)?;

        let window = video_subsystem
            .window(title, width, height)
            .position_centered()
            .resizable()
            .build()
            .map_err(window_error)?;

        let canvas = window.into_canvas().build().map_err(window_error)?;
        let texture_creator = Box::new(canvas.texture_creator());
        let event_pump = sdl_context.event_pump().map_err(window_error)?;

        // SAFETY: texture_creator is heap-allocated and lives as long as Window.
        // The texture field is declared first, so it is dropped first.
        let texture_creator_ref: &'static sdl2::render::TextureCreator<sdl2::video::WindowContext> =
            unsafe { &*(texture_creator.as_ref() as *const _) };
        let texture = texture_creator_ref
            .create_texture_streaming(PixelFormatEnum::ARGB8888, texture_size, texture_size)
            .map_err(window_error)?;

        Ok(Self {
            canvas,
            texture,
            texture_creator,
            event_pump,
            width,
            height,
        })
    }

    pub fn poll_events(&mut self) -> WindowEvent {
        for event in self.event_pump.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => return WindowEvent::Quit,
                Event::Window {
                    win_event: sdl2::event::WindowEvent::Resized(w, h),
                    ..
                } => {
                    self.width = w as u32;
                    self.height = h as u32;
                    return WindowEvent::Resize(self.width, self.height);
                }
                _ => {}
            }
        }
        WindowEvent::None
    }

    /// Uploads the canvas and shows it as the largest centred square that
    /// fits the window.
    pub fn present(&mut self, canvas: &Canvas) -> Result<()> {
        self.texture
            .update(None, canvas.as_bytes(), (canvas.size() * 4) as usize)
            .map_err(window_error)?;

        let side = self.width.min(self.height);
        let x = ((self.width - side) / 2) as i32;
        let y = ((self.height - side) / 2) as i32;

        self.canvas.set_draw_color(sdl2::pixels::Color::RGB(64, 64, 64));
        self.canvas.clear();
        self.canvas
            .copy(&self.texture, None, Some(Rect::new(x, y, side, side)))
            .map_err(window_error)?;
        self.canvas.present();
        Ok(())
    }
}
