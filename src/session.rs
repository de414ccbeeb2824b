//! Interactive console session: one image, at most one question.

use crate::analysis::{ImageAnalysis, ImageAnalyzer};
use crate::answer::QuestionAnswerer;
use crate::error::Result;
use std::io::{BufRead, Write};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

pub const URL_PROMPT: &str = "Enter the URL of the image: ";
pub const QUESTION_PROMPT: &str = "Ask a question about the image (or press Enter to exit): ";
pub const NO_QUESTION_FAREWELL: &str = "No question asked. Exiting the program. Goodbye!";
pub const FAREWELL: &str = "Exiting the program. Goodbye!";

enum SessionState {
    AwaitUrl,
    AwaitQuestion(ImageAnalysis),
    Done,
}

/// Drives the analyzer and answerer from line-based input.
pub struct Session {
    analyzer: ImageAnalyzer,
    answerer: QuestionAnswerer,
}

impl Session {
    pub fn new(analyzer: ImageAnalyzer, answerer: QuestionAnswerer) -> Self {
        Self { analyzer, answerer }
    }

    /// Run the session to completion against the given input and output.
    pub async fn run<R: BufRead, W: Write>(&self, mut input: R, mut output: W) -> Result<()> {
        let mut state = SessionState::AwaitUrl;

        loop {
            state = match state {
                SessionState::AwaitUrl => self.await_url(&mut input, &mut output).await?,
                SessionState::AwaitQuestion(analysis) => {
                    self.await_question(&analysis, &mut input, &mut output).await?
                }
                SessionState::Done => break,
            };
        }

        output.flush()?;
        Ok(())
    }

    async fn await_url<R: BufRead, W: Write>(
        &self,
        input: &mut R,
        output: &mut W,
    ) -> Result<SessionState> {
        let Some(image_url) = prompt(input, output, URL_PROMPT)? else {
            warn!("Input closed before an image URL was entered");
            writeln!(output)?;
            return Ok(SessionState::Done);
        };
        debug!(image_url = %image_url, "Image URL received");

        writeln!(output, "Analyzing the image... This may take a moment.")?;
        output.flush()?;
        let analysis = self.analyzer.analyze(&image_url).await;
        if analysis.is_failed() {
            warn!("Continuing without a usable image analysis");
        }

        writeln!(output, "\nImage Analysis:")?;
        writeln!(output, "{}", analysis.to_pretty_json()?)?;
        writeln!(output, "\nImage analysis complete. You can now ask a question about the image.")?;

        Ok(SessionState::AwaitQuestion(analysis))
    }

    async fn await_question<R: BufRead, W: Write>(
        &self,
        analysis: &ImageAnalysis,
        input: &mut R,
        output: &mut W,
    ) -> Result<SessionState> {
        writeln!(output)?;
        let question = prompt(input, output, QUESTION_PROMPT)?.unwrap_or_default();

        if question.trim().is_empty() {
            writeln!(output, "\n{}", NO_QUESTION_FAREWELL)?;
            return Ok(SessionState::Done);
        }

        writeln!(output, "Processing your question...")?;
        output.flush()?;
        let started = Instant::now();
        let answer = self.answerer.answer(&question, analysis).await;
        let elapsed = started.elapsed();

        writeln!(output, "\nAnswer: {}", answer)?;
        writeln!(output, "Time taken to answer: {} seconds", format_elapsed(elapsed))?;
        writeln!(output, "\n{}", FAREWELL)?;

        Ok(SessionState::Done)
    }
}

/// Seconds with exactly two decimals.
pub fn format_elapsed(elapsed: Duration) -> String {
    format!("{:.2}", elapsed.as_secs_f64())
}

/// Write `text`, then read one line. `None` means the input is exhausted.
fn prompt<R: BufRead, W: Write>(input: &mut R, output: &mut W, text: &str) -> Result<Option<String>> {
    write!(output, "{}", text)?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }

    let trimmed_len = line.trim_end_matches(['\n', '\r']).len();
    line.truncate(trimmed_len);
    Ok(Some(line))
}
