//! Console application loop
//!
//! Polls the control loop on a fixed interval and handles console input until
//! the user exits or the shutdown future resolves.
//!
//! Standard input is read on its own thread and forwarded over a channel, so
//! a pending read never holds up runtime shutdown.

use crate::dashboard::control::ControlLoop;
use crate::dashboard::input::{help_text, parse_input, ConsoleInput};
use anyhow::Context;
use bmshv_core::DisplaySink;
use std::future::Future;
use std::io::{self, BufRead};
use std::thread;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

const INPUT_THREAD_NAME: &str = "bmshv-console";

const INPUT_BUFFER: usize = 16;

/// Run the dashboard on stdin until `exit` or Ctrl-C
///
/// Returns the control loop so callers can inspect its final state.
pub async fn run_dashboard<S: DisplaySink>(
    control: ControlLoop<S>,
    poll_interval: Duration,
) -> anyhow::Result<ControlLoop<S>> {
    let input = spawn_stdin_reader().context("Failed to start console input")?;

    let interrupted = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Ctrl-C handler unavailable");
            std::future::pending::<()>().await;
        }
        tracing::info!("Interrupted");
    };

    Ok(run_dashboard_with(control, poll_interval, input, interrupted).await)
}

/// Forward standard input lines from a detached thread
///
/// The thread ends at end of file, on a read error, or once the receiver is
/// dropped and the next line arrives.
pub fn spawn_stdin_reader() -> io::Result<mpsc::Receiver<String>> {
    let (tx, rx) = mpsc::channel(INPUT_BUFFER);

    thread::Builder::new()
        .name(INPUT_THREAD_NAME.to_string())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                match line {
                    Ok(line) => {
                        if tx.blocking_send(line).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Console read failed");
                        break;
                    }
                }
            }
            tracing::debug!("Console reader finished");
        })?;

    Ok(rx)
}

/// Run the dashboard with an arbitrary line source and shutdown trigger
///
/// When every sender of `input` is dropped the dashboard keeps polling until
/// `shutdown` resolves.
pub async fn run_dashboard_with<S, F>(
    mut control: ControlLoop<S>,
    poll_interval: Duration,
    mut input: mpsc::Receiver<String>,
    shutdown: F,
) -> ControlLoop<S>
where
    S: DisplaySink,
    F: Future<Output = ()>,
{
    let mut ticker = tokio::time::interval(poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut input_open = true;
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                control.tick();
            }
            line = input.recv(), if input_open => {
                match line {
                    Some(line) => {
                        if !handle_line(&mut control, &line) {
                            break;
                        }
                    }
                    None => {
                        tracing::debug!("Console input closed");
                        input_open = false;
                    }
                }
            }
            _ = &mut shutdown => break,
        }
    }

    tracing::info!(stats = ?control.stats(), "Dashboard stopped");
    control
}

/// Apply one console line; returns false when the user asked to exit
fn handle_line<S: DisplaySink>(control: &mut ControlLoop<S>, line: &str) -> bool {
    match parse_input(line) {
        Ok(ConsoleInput::Action(action)) => match control.dispatch(action) {
            Ok(_) => {}
            Err(e) if e.is_queue_overflow() => {
                tracing::warn!(action = %action, "Previous command still pending, try again")
            }
            Err(e) => tracing::error!(action = %action, error = %e, "Command not queued"),
        },
        Ok(ConsoleInput::Help) => eprint!("{}", help_text()),
        Ok(ConsoleInput::Empty) => {}
        Ok(ConsoleInput::Exit) => return false,
        Err(e) => tracing::warn!(error = %e, "Unrecognised input, type `help` for a list"),
    }
    true
}
