//! Brick Strike entry point
//!
//! Parses the command line, then runs either the interactive terminal
//! session or a headless demo loop on the virtual clock.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::{Context as _, Result};

use brick_strike::Session;
use brick_strike::consts::FRAME_MICROS;
use brick_strike::platform::headless::{ManualClock, RecordingSurface, ScriptedInput};
use brick_strike::platform::term::{SystemClock, TermInput, TermSurface};
use brick_strike::platform::{FrameInput, SessionContext};
use brick_strike::sim::GameState;

/// Ten seconds of simulated play, enough for a demo to clear bricks
const DEFAULT_HEADLESS_FRAMES: u64 = 600;

struct Args {
    seed: u64,
    demo: bool,
    headless: bool,
    frames: u64,
}

fn parse_args() -> Result<Args> {
    let mut args = Args {
        seed: SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0),
        demo: false,
        headless: false,
        frames: DEFAULT_HEADLESS_FRAMES,
    };

    let mut argv = std::env::args().skip(1);
    while let Some(arg) = argv.next() {
        match arg.as_str() {
            "--seed" => {
                let value = argv.next().context("--seed needs a value")?;
                args.seed = value.parse().context("--seed wants an integer")?;
            }
            "--demo" => args.demo = true,
            "--headless" => args.headless = true,
            "--frames" => {
                let value = argv.next().context("--frames needs a value")?;
                args.frames = value.parse().context("--frames wants an integer")?;
            }
            other => anyhow::bail!(
                "unknown argument {other:?} (try --seed N, --demo, --headless, --frames N)"
            ),
        }
    }
    Ok(args)
}

fn main() -> Result<()> {
    env_logger::init();
    let args = parse_args()?;

    log::info!("Brick Strike starting with seed {}", args.seed);

    if args.headless {
        run_headless(args)
    } else {
        run_terminal(args)
    }
}

/// Interactive terminal game. The surface restores the terminal on drop.
fn run_terminal(args: Args) -> Result<()> {
    let ctx = SessionContext {
        surface: TermSurface::new()?,
        input: TermInput::new(),
        clock: SystemClock::new(),
    };
    let mut session = Session::new(GameState::new(args.seed), ctx);
    session.demo = args.demo;
    session.run()
}

/// Demo run with no terminal: scripted input, manual clock, recorded
/// draw calls. Useful for smoke-testing a seed from CI.
fn run_headless(args: Args) -> Result<()> {
    let ctx = SessionContext {
        surface: RecordingSurface::new(),
        input: ScriptedInput::hold(FrameInput::default()),
        clock: ManualClock::new(),
    };
    let mut session = Session::new(GameState::new(args.seed), ctx);
    session.demo = true;

    for _ in 0..args.frames {
        session.step(Duration::ZERO)?;
        session.ctx.clock.advance(FRAME_MICROS / 1_000);
        if session.state.game_over {
            break;
        }
    }

    log::info!("Headless run finished after {} ticks", session.state.time_ticks);
    println!(
        "ticks={} score={} lives={} bricks_left={}",
        session.state.time_ticks,
        session.state.score,
        session.state.lives,
        session.state.visible_bricks()
    );
    Ok(())
}
