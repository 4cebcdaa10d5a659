use anyhow::Result;
use clap::{Arg, Command};
use std::path::PathBuf;
use tracing::{info, warn};

use yt_chapter_analyzer::llm::actions::{ActionKind, ActionProcessor};
use yt_chapter_analyzer::{Config, VideoAnalyzer};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter("yt_chapter_analyzer=info,warn")
        .init();

    let matches = Command::new("YouTube Chapter Analyzer")
        .version("0.1.0")
        .about("Aligns YouTube transcripts with chapter markers and runs LLM content actions")
        .arg(
            Arg::new("video-id")
                .value_name("VIDEO_ID")
                .help("YouTube video id to analyze")
                .required(true)
        )
        .arg(
            Arg::new("strategy")
                .short('s')
                .long("strategy")
                .value_name("STRATEGY")
                .help("Alignment strategy: overlap-window or single-assignment")
        )
        .arg(
            Arg::new("overlap")
                .long("overlap")
                .value_name("SECONDS")
                .help("Chapter window overlap margin in seconds")
        )
        .arg(
            Arg::new("action")
                .short('a')
                .long("action")
                .value_name("ACTION")
                .help("LLM action to run: summarize, answer-question, extract-key-points")
        )
        .arg(
            Arg::new("question")
                .short('q')
                .long("question")
                .value_name("TEXT")
                .help("Question for the answer-question action")
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FILE")
                .help("Write the JSON result to a file instead of stdout")
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging")
                .action(clap::ArgAction::SetTrue)
        )
        .get_matches();

    let video_id = matches.get_one::<String>("video-id").unwrap();
    if matches.get_flag("verbose") {
        info!("Verbose logging enabled");
    }

    // Load configuration
    let mut config = Config::load().unwrap_or_else(|e| {
        warn!("Failed to load config, using defaults: {}", e);
        Config::default()
    });

    if let Some(strategy) = matches.get_one::<String>("strategy") {
        config.alignment.strategy = strategy.parse()?;
    }
    if let Some(overlap) = matches.get_one::<String>("overlap") {
        config.alignment.overlap_offset_seconds = overlap.parse()?;
    }

    config.validate()?;

    info!("🚀 YouTube Chapter Analyzer starting...");
    info!("🎬 Video: {}", video_id);
    info!("🔧 Strategy: {}", config.alignment.strategy.as_str());

    let analyzer = VideoAnalyzer::new(&config);
    let outcome = analyzer.analyze(video_id).await?;

    info!(
        "📊 {} chapters, {} transcript items, {:.0}s of video",
        outcome.result.metadata.chapter_count,
        outcome.result.metadata.transcript_item_count,
        outcome.result.metadata.total_duration
    );

    // Optional LLM action over the aligned content
    let action_result = match matches.get_one::<String>("action") {
        Some(action) => {
            let kind = ActionKind::parse(
                action,
                matches.get_one::<String>("question").map(String::as_str),
            )?;
            let processor = ActionProcessor::new(&config.llm)?;
            Some(processor.run(&outcome.result, kind).await?)
        }
        None => None,
    };

    let output = match &action_result {
        Some(action) => serde_json::json!({
            "analysis": outcome,
            "action": action,
        }),
        None => serde_json::to_value(&outcome)?,
    };

    let rendered = if config.output.pretty_json {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };

    match matches.get_one::<String>("output") {
        Some(path) => {
            let path = PathBuf::from(path);
            tokio::fs::write(&path, &rendered).await?;
            info!("💾 Result written to: {}", path.display());
        }
        None => println!("{}", rendered),
    }

    Ok(())
}
