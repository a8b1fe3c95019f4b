//! Line-at-a-time lookups where only the newest line's result is shown.
//!
//! Every line is looked up on its own thread as soon as it arrives. Results
//! go through a [`RequestSequencer`], so one that finishes after a newer line
//! was entered is dropped instead of being reported.

use std::sync::{mpsc, Arc};

use zhuyin_core::error::Result;
use zhuyin_core::{
    PhrasePipeline, PhraseSuggestions, ReadingResolver, RequestSequencer, Ticket, WordReading,
};

/// Result of looking up one line.
#[derive(Debug)]
pub enum LineOutcome {
    /// A single character: idioms sharing its reading.
    Phrases(Result<PhraseSuggestions>),
    /// Anything longer: the word's readings.
    Reading(Result<WordReading>),
}

/// Look up one trimmed, non-empty line.
pub fn lookup_line<R: ReadingResolver>(pipeline: &PhrasePipeline<R>, input: &str) -> LineOutcome {
    if input.chars().count() == 1 {
        LineOutcome::Phrases(pipeline.suggest_for_char(input))
    } else {
        LineOutcome::Reading(pipeline.to_reading(input))
    }
}

/// Look up each line of `lines` concurrently and hand current results to `sink`.
///
/// Blank lines are skipped. `sink` runs on a dedicated thread, in completion
/// order. Returns once every lookup has finished and its result has been
/// delivered or dropped.
pub fn run_lines<R, I, F>(pipeline: Arc<PhrasePipeline<R>>, lines: I, mut sink: F)
where
    R: ReadingResolver + Send + Sync + 'static,
    I: IntoIterator<Item = String>,
    F: FnMut(&str, LineOutcome) + Send + 'static,
{
    let sequencer = Arc::new(RequestSequencer::new());
    let (tx, rx) = mpsc::channel::<(Ticket, String, LineOutcome)>();

    let printer = {
        let sequencer = Arc::clone(&sequencer);
        std::thread::spawn(move || {
            for (ticket, input, outcome) in rx {
                if let Some(outcome) = sequencer.accept(ticket, outcome) {
                    sink(&input, outcome);
                }
            }
        })
    };

    for line in lines {
        let input = line.trim().to_string();
        if input.is_empty() {
            continue;
        }
        let ticket = sequencer.issue();
        let pipeline = Arc::clone(&pipeline);
        let tx = tx.clone();
        std::thread::spawn(move || {
            let outcome = lookup_line(&*pipeline, &input);
            let _ = tx.send((ticket, input, outcome));
        });
    }

    // The printer stops once the last lookup thread drops its sender.
    drop(tx);
    if printer.join().is_err() {
        tracing::error!("result printer panicked");
    }
}
