//! Ask command implementation.

use crate::cli::preflight;
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use anyhow::Result;

/// Load a video, then answer one question about it.
pub async fn run_ask(url: &str, question: &str, settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(&settings) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let orchestrator = Orchestrator::new(settings)?;

    let spinner = Output::spinner("Fetching and indexing transcript...");
    let session = match orchestrator.load_video(url).await {
        Ok(session) => {
            spinner.finish_and_clear();
            session
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Failed to load video: {}", e));
            return Err(e.into());
        }
    };

    Output::success(&format!(
        "Indexed {} ({} segments)",
        session.video_id,
        session.documents.len()
    ));
    Output::header("Summary");
    println!("{}\n", session.summary);

    let spinner = Output::spinner("Thinking...");
    match orchestrator.ask(&session.video_id, question).await {
        Ok(answer) => {
            spinner.finish_and_clear();
            Output::header("Answer");
            println!("{}\n", answer);
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Failed to answer: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
