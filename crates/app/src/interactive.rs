//! Terminal session loop. Plays the external timer: each question gets its
//! target time to be answered before it is recorded as timed out.

use std::error::Error;
use std::io::Write;
use std::time::Duration;

use services::{SessionAnswerResult, SessionLoopError, SessionLoopService, StudentSession};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::Instant;

use crate::render;

const QUIT_WORDS: &[&str] = &[":q", "quit", "exit"];

/// What one line read from the terminal means for the current question.
#[derive(Debug, PartialEq, Eq)]
enum Input<'a> {
    /// Nothing typed; ask again without recording an attempt.
    Blank,
    Answer(&'a str),
    /// EOF or an explicit quit word.
    Quit,
}

fn classify(line: Option<&str>) -> Input<'_> {
    match line.map(str::trim) {
        None => Input::Quit,
        Some("") => Input::Blank,
        Some(text) if QUIT_WORDS.contains(&text) => Input::Quit,
        Some(text) => Input::Answer(text),
    }
}

pub async fn play(
    svc: &SessionLoopService,
    mut session: StudentSession,
) -> Result<StudentSession, Box<dyn Error>> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    println!("Type your answer and press Enter. Type `quit` to stop.");

    while let Some(question) = session.current_question() {
        let deadline =
            Instant::now() + Duration::from_secs(u64::from(question.target_time_secs()));
        render::question(question, &session.progress());

        // Blank lines re-prompt against the same deadline.
        let step = loop {
            print!("> ");
            std::io::stdout().flush()?;

            match tokio::time::timeout_at(deadline, lines.next_line()).await {
                Err(_elapsed) => {
                    println!();
                    break Some(svc.timeout_current(&mut session).await);
                }
                Ok(line) => {
                    let line = line?;
                    match classify(line.as_deref()) {
                        Input::Blank => continue,
                        Input::Answer(text) => {
                            break Some(svc.answer_current(&mut session, text).await);
                        }
                        Input::Quit => break None,
                    }
                }
            }
        };

        let Some(step) = step else {
            svc.finish(&mut session).await?;
            break;
        };

        match step {
            Ok(SessionAnswerResult { step, .. }) => println!("{}\n", step.feedback),
            Err(SessionLoopError::Storage(e)) if session.needs_save() => {
                eprintln!("saving the result failed ({e}); retrying once");
                svc.save_pending(&mut session).await?;
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(session)
}
