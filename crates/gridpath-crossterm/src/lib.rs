//! Crossterm terminal driver for gridpath.
//!
//! [`CrosstermDriver`] implements [`gridpath_core::Driver`]: it turns
//! terminal key, mouse and resize events into [`Msg`]s and writes frame
//! diffs with one flush per frame.

use std::error::Error;
use std::io::{self, Stdout, Write};
use std::sync::mpsc::Sender;
use std::time::Duration;

use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
        MouseEventKind,
    },
    execute, queue,
    style::{Attribute, Color as CtColor, Print, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use log::debug;

use gridpath_core::{
    AttrMask, Color, Frame, Point,
    app::{Context, Driver},
    messages::{Key, MouseAction, Msg},
};

/// Maps a [`gridpath_core::Color`] to a [`crossterm::style::Color`].
fn to_ct_color(c: Color) -> CtColor {
    if c == Color::DEFAULT {
        CtColor::Reset
    } else {
        CtColor::Rgb {
            r: c.r(),
            g: c.g(),
            b: c.b(),
        }
    }
}

fn to_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::Char(' ') => Some(Key::Space),
        KeyCode::Char(c) => Some(Key::Char(c)),
        KeyCode::Enter => Some(Key::Enter),
        KeyCode::Esc => Some(Key::Escape),
        KeyCode::Backspace => Some(Key::Backspace),
        KeyCode::Tab => Some(Key::Tab),
        _ => None,
    }
}

fn key_msg(ev: KeyEvent) -> Option<Msg> {
    if ev.kind != KeyEventKind::Press {
        return None;
    }
    // Raw mode swallows the terminal's own Ctrl-C handling.
    if ev.modifiers.contains(KeyModifiers::CONTROL) && ev.code == KeyCode::Char('c') {
        return Some(Msg::Quit);
    }
    to_key(ev.code).map(Msg::key)
}

fn mouse_msg(me: MouseEvent) -> Option<Msg> {
    let pos = Point::new(me.column as i32, me.row as i32);
    let action = match me.kind {
        MouseEventKind::Down(MouseButton::Left) => MouseAction::Main,
        MouseEventKind::Down(MouseButton::Right) => MouseAction::Secondary,
        MouseEventKind::Down(MouseButton::Middle) => MouseAction::Auxiliary,
        MouseEventKind::Up(_) => MouseAction::Release,
        MouseEventKind::Drag(_) | MouseEventKind::Moved => MouseAction::Move,
        _ => return None,
    };
    Some(Msg::mouse(action, pos))
}

fn to_msg(ev: Event) -> Option<Msg> {
    match ev {
        Event::Key(ke) => key_msg(ke),
        Event::Mouse(me) => mouse_msg(me),
        Event::Resize(w, h) => Some(Msg::Screen {
            width: w as i32,
            height: h as i32,
        }),
        _ => None,
    }
}

/// A terminal back-end using crossterm.
pub struct CrosstermDriver {
    mouse_enabled: bool,
    out: Stdout,
}

impl CrosstermDriver {
    pub fn new() -> Self {
        Self {
            mouse_enabled: true,
            out: io::stdout(),
        }
    }

    /// Configure whether mouse events are captured.
    pub fn with_mouse(mut self, enabled: bool) -> Self {
        self.mouse_enabled = enabled;
        self
    }

    fn queue_attrs(&mut self, attrs: AttrMask) -> io::Result<()> {
        if attrs.contains(AttrMask::BOLD) {
            queue!(self.out, SetAttribute(Attribute::Bold))?;
        }
        if attrs.contains(AttrMask::UNDERLINE) {
            queue!(self.out, SetAttribute(Attribute::Underlined))?;
        }
        if attrs.contains(AttrMask::DIM) {
            queue!(self.out, SetAttribute(Attribute::Dim))?;
        }
        Ok(())
    }
}

impl Default for CrosstermDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl Driver for CrosstermDriver {
    fn init(&mut self) -> Result<(), Box<dyn Error>> {
        terminal::enable_raw_mode()?;
        execute!(
            self.out,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::Clear(ClearType::All)
        )?;
        if self.mouse_enabled {
            execute!(self.out, event::EnableMouseCapture)?;
        }
        debug!("terminal initialised, mouse capture {}", self.mouse_enabled);
        Ok(())
    }

    fn poll_msgs(
        &mut self,
        ctx: &Context,
        tx: &Sender<Msg>,
        wait: Duration,
    ) -> Result<(), Box<dyn Error>> {
        if !event::poll(wait)? {
            return Ok(());
        }

        while event::poll(Duration::ZERO)? {
            if ctx.is_done() {
                return Ok(());
            }
            if let Some(msg) = to_msg(event::read()?) {
                tx.send(msg).ok();
            }
        }

        Ok(())
    }

    fn flush(&mut self, frame: Frame) -> Result<(), Box<dyn Error>> {
        for fg in &frame.glyphs {
            let (p, glyph) = (fg.pos, fg.glyph);
            queue!(
                self.out,
                cursor::MoveTo(p.x as u16, p.y as u16),
                SetForegroundColor(to_ct_color(glyph.style.fg)),
                SetBackgroundColor(to_ct_color(glyph.style.bg))
            )?;
            let attrs = glyph.style.attrs;
            self.queue_attrs(attrs)?;
            queue!(self.out, Print(glyph.ch))?;
            if !attrs.is_empty() {
                queue!(self.out, SetAttribute(Attribute::Reset))?;
            }
        }
        self.out.flush()?;
        Ok(())
    }

    fn close(&mut self) {
        if self.mouse_enabled {
            let _ = execute!(self.out, event::DisableMouseCapture);
        }
        let _ = execute!(
            self.out,
            SetAttribute(Attribute::Reset),
            cursor::Show,
            terminal::LeaveAlternateScreen
        );
        let _ = terminal::disable_raw_mode();
        debug!("terminal restored");
    }
}
