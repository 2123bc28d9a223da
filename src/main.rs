//! Terminal Blockfall runner (default binary).
//!
//! Resumes the saved game if there is one, otherwise starts fresh. Uses
//! crossterm for input and the framebuffer renderer from `blockfall-term`.
//! Quitting mid-game saves; losing terminal focus pauses.

use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event};

use blockfall::engine::{FileStore, Session, SessionConfig};
use blockfall::input::{handle_key_event, should_quit};
use blockfall::term::{FrameBuffer, GameView, TerminalRenderer, Viewport};
use blockfall::types::TICK_MS;

fn main() -> Result<()> {
    let config = SessionConfig::from_env();
    let store = FileStore::new(&config.save_dir);
    let mut session = Session::new(store, &config);
    let resumed = session.continue_or_new_game();

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, &mut session);

    // Always try to restore terminal state.
    let _ = term.exit();

    if let Err(e) = session.save_now() {
        eprintln!("[Session] Failed to save game: {}", e);
    }

    let game = session.game();
    if resumed {
        println!("Resumed a saved game.");
    }
    if game.game_over() {
        println!("Game over. Final score: {}", game.score());
    } else {
        println!(
            "Score: {}  Lines: {}  Level: {} (saved to {})",
            game.score(),
            game.lines(),
            game.level(),
            session.store().path().display()
        );
    }
    result
}

fn run(term: &mut TerminalRenderer, session: &mut Session<FileStore>) -> Result<()> {
    let view = GameView::default();
    let mut fb = FrameBuffer::new(0, 0);

    let tick_duration = Duration::from_millis(TICK_MS as u64);
    let mut last_tick = Instant::now();

    loop {
        // Render.
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        view.render_into(session.game(), Viewport::new(w, h), &mut fb);
        term.draw_swap(&mut fb)?;

        // Input with timeout until next tick.
        let timeout = tick_duration
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => {
                    if should_quit(key) {
                        return Ok(());
                    }
                    if let Some(action) = handle_key_event(key) {
                        session.apply(action);
                    }
                }
                Event::FocusLost => {
                    session.pause();
                }
                Event::Resize(_, _) => term.invalidate(),
                _ => {}
            }
        }

        // Gravity runs on measured time, not on frame count.
        let elapsed = last_tick.elapsed();
        if elapsed >= tick_duration {
            last_tick = Instant::now();
            session.tick(elapsed.as_millis().min(u32::MAX as u128) as u32);
        }

        // Events are only needed by observers; drop them each frame.
        session.take_events();
    }
}
