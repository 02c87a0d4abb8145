// Copyright (c) 2026 rezky_nightky

use std::io::{stdout, Stdout, Write};
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal, ExecutableCommand, QueueableCommand,
};

use crate::canvas::Canvas;
use crate::error::Result;
use crate::frame::{Cell, Frame};
use crate::render_loop::FrameHost;
use crate::runtime::ColorMode;

#[derive(Default)]
struct Pen {
    fg: Option<Color>,
    bg: Option<Color>,
    bold: bool,
    pos: Option<(u16, u16)>,
}

pub struct Terminal {
    stdout: Stdout,
    drawn_once: bool,
    run_buf: String,
}

impl Terminal {
    pub fn new() -> Result<Self> {
        let mut out = stdout();
        terminal::enable_raw_mode()?;
        let init: std::io::Result<()> = (|| {
            out.execute(terminal::EnterAlternateScreen)?;
            out.execute(cursor::Hide)?;
            let _ = out.execute(terminal::DisableLineWrap);
            out.execute(SetAttribute(Attribute::Reset))?;
            out.execute(ResetColor)?;
            out.execute(terminal::Clear(terminal::ClearType::All))?;
            out.flush()
        })();
        if let Err(e) = init {
            restore_terminal_best_effort();
            return Err(e.into());
        }
        Ok(Self {
            stdout: out,
            drawn_once: false,
            run_buf: String::with_capacity(64),
        })
    }

    pub fn size(&self) -> Result<(u16, u16)> {
        Ok(terminal::size()?)
    }

    fn put_style(&mut self, pen: &mut Pen, cell: &Cell) -> Result<()> {
        if cell.fg != pen.fg {
            self.stdout
                .queue(SetForegroundColor(cell.fg.unwrap_or(Color::Reset)))?;
            pen.fg = cell.fg;
        }
        if cell.bg != pen.bg {
            self.stdout
                .queue(SetBackgroundColor(cell.bg.unwrap_or(Color::Reset)))?;
            pen.bg = cell.bg;
        }
        let bold = cell.bold();
        if bold != pen.bold {
            self.stdout.queue(SetAttribute(if bold {
                Attribute::Bold
            } else {
                Attribute::NormalIntensity
            }))?;
            pen.bold = bold;
        }
        Ok(())
    }

    fn draw_full(&mut self, frame: &Frame, pen: &mut Pen) -> Result<()> {
        for y in 0..frame.height {
            self.stdout.queue(cursor::MoveTo(0, y))?;
            for x in 0..frame.width {
                let cell = frame.cell_at_index(y as usize * frame.width as usize + x as usize);
                self.put_style(pen, &cell)?;
                self.stdout.queue(Print(cell.ch))?;
            }
        }
        Ok(())
    }

    fn draw_dirty(&mut self, frame: &Frame, pen: &mut Pen) -> Result<()> {
        let width = frame.width as usize;
        let mut dirty = frame.dirty_indices().to_vec();
        dirty.sort_unstable();

        let mut i = 0usize;
        while i < dirty.len() {
            let start = dirty[i];
            let first = frame.cell_at_index(start);
            let (x0, y0) = ((start % width) as u16, (start / width) as u16);

            // Batch horizontally adjacent cells that share a style.
            self.run_buf.clear();
            self.run_buf.push(first.ch);
            let mut j = i + 1;
            while j < dirty.len() {
                let idx = dirty[j];
                let cell = frame.cell_at_index(idx);
                let same_row = idx / width == start / width;
                let adjacent = idx == dirty[j - 1] + 1;
                if !same_row
                    || !adjacent
                    || cell.fg != first.fg
                    || cell.bg != first.bg
                    || cell.layer != first.layer
                {
                    break;
                }
                self.run_buf.push(cell.ch);
                j += 1;
            }

            if pen.pos != Some((x0, y0)) {
                self.stdout.queue(cursor::MoveTo(x0, y0))?;
            }
            self.put_style(pen, &first)?;
            self.stdout.queue(Print(self.run_buf.as_str()))?;

            let next_x = x0.saturating_add((j - i) as u16);
            pen.pos = (next_x < frame.width).then_some((next_x, y0));
            i = j;
        }
        Ok(())
    }

    pub fn draw(&mut self, frame: &mut Frame) -> Result<()> {
        let total = frame.width as usize * frame.height as usize;
        let large = total > 0 && frame.dirty_indices().len() >= total / 3;
        let mut pen = Pen::default();

        if !self.drawn_once || frame.is_dirty_all() || large {
            self.draw_full(frame, &mut pen)?;
            self.drawn_once = true;
        } else {
            self.draw_dirty(frame, &mut pen)?;
        }

        self.stdout.queue(SetAttribute(Attribute::Reset))?;
        self.stdout.queue(ResetColor)?;
        self.stdout.flush()?;
        frame.clear_dirty();
        Ok(())
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        restore_terminal_best_effort();
    }
}

pub fn restore_terminal_best_effort() {
    let mut out = stdout();
    let _ = out.execute(SetAttribute(Attribute::Reset));
    let _ = out.execute(ResetColor);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::EnableLineWrap);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
    let _ = out.flush();
}

#[derive(Clone, Copy, Debug, Default)]
pub struct PerfStats {
    pub frames: u64,
    pub drawn_frames: u64,
    pub work_sum_s: f64,
    pub work_max_s: f64,
    pub late_frames: u64,
}

/// Presents canvases on the terminal and paces ticks at a fixed frame rate.
pub struct TerminalHost {
    term: Terminal,
    frame: Frame,
    color_mode: ColorMode,
    period: Duration,
    next_frame: Instant,
    end_time: Option<Instant>,
    work_start: Instant,
    pub stats: PerfStats,
}

impl TerminalHost {
    pub fn new(
        term: Terminal,
        frame: Frame,
        color_mode: ColorMode,
        fps: f64,
        duration: Option<Duration>,
    ) -> Self {
        let now = Instant::now();
        Self {
            term,
            frame,
            color_mode,
            period: Duration::from_secs_f64(1.0 / fps),
            next_frame: now,
            end_time: duration.map(|d| now + d),
            work_start: now,
            stats: PerfStats::default(),
        }
    }

    fn wants_quit(ev: &Event) -> bool {
        match ev {
            Event::Key(k) if k.kind == KeyEventKind::Press => matches!(
                (k.code, k.modifiers),
                (KeyCode::Esc, _) | (KeyCode::Char('q'), _)
            ) || (k.code == KeyCode::Char('c')
                && k.modifiers.contains(KeyModifiers::CONTROL)),
            _ => false,
        }
    }
}

impl FrameHost<Canvas> for TerminalHost {
    fn present(&mut self, trail: &Canvas, head: &Canvas) -> Result<()> {
        self.frame.compose(trail, head, self.color_mode);
        let drew = self.frame.has_changes();
        if drew {
            self.term.draw(&mut self.frame)?;
        }

        let work = self.work_start.elapsed().as_secs_f64();
        self.stats.frames += 1;
        if drew {
            self.stats.drawn_frames += 1;
        }
        self.stats.work_sum_s += work;
        self.stats.work_max_s = self.stats.work_max_s.max(work);
        if work > self.period.as_secs_f64() {
            self.stats.late_frames += 1;
        }
        Ok(())
    }

    fn request_frame(&mut self) -> Result<bool> {
        self.next_frame = schedule(self.next_frame, self.period, Instant::now());

        loop {
            match gate(pending_event, Instant::now(), self.next_frame, self.end_time)? {
                Pace::Stop => return Ok(false),
                Pace::Go => break,
                Pace::Wait(timeout) => {
                    // Wakes early on input; the next gate drains it.
                    event::poll(timeout)?;
                }
            }
        }

        self.work_start = Instant::now();
        Ok(true)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Pace {
    Stop,
    Go,
    Wait(Duration),
}

/// Deadline after `next_frame`; a missed deadline snaps to `now` instead of bursting.
fn schedule(next_frame: Instant, period: Duration, now: Instant) -> Instant {
    let next = next_frame + period;
    if now > next {
        now
    } else {
        next
    }
}

fn pace(now: Instant, next_frame: Instant, end_time: Option<Instant>) -> Pace {
    if end_time.is_some_and(|end| now >= end) {
        return Pace::Stop;
    }
    if now >= next_frame {
        return Pace::Go;
    }
    let mut timeout = next_frame - now;
    if let Some(end) = end_time {
        timeout = timeout.min(end - now);
    }
    Pace::Wait(timeout)
}

/// Drains every queued event before looking at the clock, so quit keys are
/// seen even when each frame runs late.
fn gate<F>(
    mut pending: F,
    now: Instant,
    next_frame: Instant,
    end_time: Option<Instant>,
) -> Result<Pace>
where
    F: FnMut() -> Result<Option<Event>>,
{
    while let Some(ev) = pending()? {
        // Resizes are ignored; the viewport is fixed at startup.
        if TerminalHost::wants_quit(&ev) {
            return Ok(Pace::Stop);
        }
    }
    Ok(pace(now, next_frame, end_time))
}

fn pending_event() -> Result<Option<Event>> {
    if event::poll(Duration::ZERO)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}
