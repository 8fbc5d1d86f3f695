// SPDX-FileCopyrightText: 2026 GP2GP Transfers Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `gp2gp classify`: JSON-lines messages in, JSON-lines transfers out.
//!
//! Conversations are grouped up front, then split into chunks that each
//! blocking worker owns outright. Output is sorted by conversation id.

use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use gp2gp_config::Gp2gpConfig;
use gp2gp_core::{Gp2gpError, Message, Transfer};
use gp2gp_transfer::{TracingObserver, TransferPipeline};
use tokio::task::JoinSet;
use tracing::info;

#[derive(Debug)]
pub struct ClassifyOptions {
    pub input: PathBuf,
    pub cutoff_hours: Option<u64>,
    pub workers: usize,
}

pub async fn run(config: &Gp2gpConfig, options: ClassifyOptions) -> Result<(), Gp2gpError> {
    let file = File::open(&options.input)?;
    let messages = parse_messages(BufReader::new(file))?;
    info!(
        input = %options.input.display(),
        messages = messages.len(),
        "loaded message log"
    );

    let mut pipeline = TransferPipeline::new(config, Arc::new(TracingObserver));
    if let Some(hours) = options.cutoff_hours {
        pipeline = pipeline.with_cutoff(Some(Duration::from_secs(hours.saturating_mul(3600))));
    }

    let transfers = classify_in_parallel(pipeline, messages, options.workers).await?;
    info!(transfers = transfers.len(), "classification complete");

    write_transfers(std::io::stdout().lock(), &transfers)
}

/// Decode one message per non-blank line. Line numbers in errors are 1-based.
pub fn parse_messages(reader: impl BufRead) -> Result<Vec<Message>, Gp2gpError> {
    let mut messages = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let message = serde_json::from_str(&line).map_err(|e| Gp2gpError::Input {
            line: index + 1,
            message: e.to_string(),
        })?;
        messages.push(message);
    }
    Ok(messages)
}

/// Group, then classify conversation chunks on up to `workers` blocking tasks.
pub async fn classify_in_parallel(
    pipeline: TransferPipeline,
    messages: Vec<Message>,
    workers: usize,
) -> Result<Vec<Transfer>, Gp2gpError> {
    let conversations: Vec<_> = pipeline.group(messages).collect();
    let chunk_size = conversations.len().div_ceil(workers.max(1)).max(1);

    let mut tasks = JoinSet::new();
    let mut remaining = conversations.into_iter();
    loop {
        let chunk: Vec<_> = remaining.by_ref().take(chunk_size).collect();
        if chunk.is_empty() {
            break;
        }
        let worker = pipeline.clone();
        tasks.spawn_blocking(move || worker.process_conversations(chunk));
    }

    let mut transfers = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        let chunk = joined
            .map_err(|e| Gp2gpError::Internal(format!("classification worker failed: {e}")))?;
        transfers.extend(chunk);
    }
    transfers.sort_by(|a, b| a.conversation_id.cmp(&b.conversation_id));
    Ok(transfers)
}

pub fn write_transfers(mut out: impl Write, transfers: &[Transfer]) -> Result<(), Gp2gpError> {
    for transfer in transfers {
        serde_json::to_writer(&mut out, transfer).map_err(std::io::Error::from)?;
        writeln!(out)?;
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;
    use gp2gp_core::TransferStatus;
    use gp2gp_test_utils::{ConversationFixture, RecordingObserver};

    use super::*;

    fn started(id: &str) -> Vec<Message> {
        let mut fixture = ConversationFixture::new(id);
        fixture
            .request_started("rs", TimeDelta::zero())
            .ack("rs-ack", TimeDelta::minutes(1), "rs", None)
            .request_completed("ehr", TimeDelta::minutes(2))
            .ack("ehr-ack", TimeDelta::minutes(3), "ehr", None);
        fixture.into_messages()
    }

    #[test]
    fn parses_lines_and_skips_blanks() {
        let mut input = String::new();
        for message in started("c1") {
            input.push_str(&serde_json::to_string(&message).expect("serialize"));
            input.push_str("\n\n");
        }
        let messages = parse_messages(input.as_bytes()).expect("valid input");
        assert_eq!(messages, started("c1"));
    }

    #[test]
    fn reports_line_of_bad_message() {
        let good = serde_json::to_string(&started("c1")[0]).expect("serialize");
        let input = format!("{good}\n{{\"time\": \"not a time\"}}\n");
        let err = parse_messages(input.as_bytes()).unwrap_err();
        assert!(matches!(err, Gp2gpError::Input { line: 2, .. }), "got {err}");
    }

    #[tokio::test]
    async fn parallel_classification_matches_sequential() {
        let mut messages = Vec::new();
        for id in ["c3", "c1", "c2", "c5", "c4"] {
            messages.extend(started(id));
        }
        let observer = Arc::new(RecordingObserver::new());
        let pipeline = TransferPipeline::new(&Gp2gpConfig::default(), observer);

        let sequential = pipeline.process_batch(messages.clone());
        let parallel = classify_in_parallel(pipeline, messages, 2)
            .await
            .expect("workers succeed");

        assert_eq!(parallel.len(), 5);
        assert_eq!(parallel, sequential);
        assert!(
            parallel
                .iter()
                .all(|t| t.outcome.status() == TransferStatus::IntegratedOnTime)
        );
    }

    #[tokio::test]
    async fn empty_input_yields_no_transfers() {
        let pipeline = TransferPipeline::new(&Gp2gpConfig::default(), Arc::new(RecordingObserver::new()));
        let transfers = classify_in_parallel(pipeline, Vec::new(), 4)
            .await
            .expect("nothing to do");
        assert!(transfers.is_empty());
    }

    #[tokio::test]
    async fn run_reads_file_and_succeeds() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        for message in started("c1") {
            writeln!(file, "{}", serde_json::to_string(&message).expect("serialize"))
                .expect("write temp file");
        }
        let options = ClassifyOptions {
            input: file.path().to_path_buf(),
            cutoff_hours: Some(24),
            workers: 1,
        };
        run(&Gp2gpConfig::default(), options).await.expect("run succeeds");
    }

    #[tokio::test]
    async fn run_fails_on_missing_input() {
        let options = ClassifyOptions {
            input: PathBuf::from("/nonexistent/messages.jsonl"),
            cutoff_hours: None,
            workers: 1,
        };
        let err = run(&Gp2gpConfig::default(), options).await.unwrap_err();
        assert!(matches!(err, Gp2gpError::Io { .. }));
    }

    #[test]
    fn writes_one_json_object_per_line() {
        let observer = Arc::new(RecordingObserver::new());
        let pipeline = TransferPipeline::new(&Gp2gpConfig::default(), observer);
        let transfers = pipeline.process_batch(started("c1"));

        let mut out = Vec::new();
        write_transfers(&mut out, &transfers).expect("write to vec");
        let text = String::from_utf8(out).expect("utf8");
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 1);
        let value: serde_json::Value = serde_json::from_str(lines[0]).expect("json");
        assert_eq!(value["conversation_id"], "c1");
        assert_eq!(value["sla_duration_secs"], 60);
    }
}
