use std::io::{self, BufRead, Write};
use std::thread;
use std::time::Duration;

use anyhow::{anyhow, Context};
use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError};
use stage_schema::StageId;
use timer_core::{GameSession, Tick};

use crate::report;

const FRAME: Duration = Duration::from_millis(16);

/// One Enter press per message. The channel closes with stdin.
fn spawn_enter_reader() -> Receiver<()> {
    let (sender, receiver) = unbounded();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            if line.is_err() || sender.send(()).is_err() {
                break;
            }
        }
    });
    receiver
}

pub fn run(mut session: GameSession, stage_id: StageId) -> anyhow::Result<()> {
    let view = session
        .start_attempt(stage_id)
        .ok_or_else(|| anyhow!("stage {stage_id} is unknown or locked"))?;
    report::print_view(&view);

    let enter = spawn_enter_reader();
    println!("press Enter to start");
    enter.recv().context("stdin closed before start")?;
    session.begin()?;

    let mut laps_done = 0;
    loop {
        let result = match enter.recv_timeout(FRAME) {
            Ok(()) => session.stop_attempt(),
            Err(RecvTimeoutError::Timeout) => match session.tick() {
                Ok(Tick::Running { elapsed, obscured }) => {
                    draw(elapsed, obscured)?;
                    continue;
                }
                Ok(Tick::AutoStopped(outcome)) => {
                    println!("\ntime's up");
                    Ok(outcome)
                }
                Ok(Tick::Idle) => return Ok(()),
                Err(e) => Err(e),
            },
            Err(RecvTimeoutError::Disconnected) => {
                session.abandon();
                return Err(anyhow!("stdin closed, attempt abandoned"));
            }
        };

        if report::settle(result, &mut laps_done)? {
            return Ok(());
        }
    }
}

fn draw(elapsed: f64, obscured: bool) -> anyhow::Result<()> {
    let mut out = io::stdout().lock();
    if obscured {
        write!(out, "\r  ?.???")?;
    } else {
        write!(out, "\r{elapsed:>7.3}")?;
    }
    out.flush()?;
    Ok(())
}
