//! End-to-end coverage for the orchestrator using the recorded/fake adapter
//! set: happy path, cache resume from a later stage, forced regeneration,
//! and cancellation before a run starts.

use std::path::Path;

use clipcheck_adapters::fakes::{FakeClipper, FakeCompositor, FakeDiarizer, FakeDownloader, FakeTts, RecordedLlm};
use clipcheck_adapters::AdapterSet;
use clipcheck_models::{PipelineConfig, StageName, StageState, Transcript, TranscriptSegment, TwoPassConfig};
use clipcheck_pipeline::{final_output_name, CancelToken, RunOptions};
use clipcheck_retry::RetryConfig;

const SOURCE: &str = "https://example.com/videos/moon-landing";

const PASS1_RESPONSE: &str = r#"{"segments":[{
    "segment_id":"seg-1",
    "title":"moon landing claim",
    "severity":"HIGH",
    "harm_category":"misinformation",
    "evidence":[{"timestamp":1.0,"speaker":"a","quote":"the moon landing was staged"}],
    "context":"discussing space history",
    "confidence":0.95,
    "duration_seconds":5.0,
    "context_start":0.0,
    "context_end":5.0
}]}"#;

const PASS2_RESPONSE: &str = r#"{"scores":[{
    "segment_id":"seg-1",
    "quote_strength":9.0,
    "factual_accuracy":8.0,
    "potential_impact":8.0,
    "specificity":7.0,
    "context_appropriateness":7.0
}]}"#;

const SCRIPT_RESPONSE: &str = r#"{"sections":[
    {"section_type":"intro","section_id":"s0","script_content":"welcome","audio_tone":"upbeat","estimated_duration":5.0},
    {"section_type":"pre_clip","section_id":"s1","script_content":"here comes a claim","audio_tone":"neutral","estimated_duration":3.0,"clip_id":"seg-1"},
    {"section_type":"video_clip","section_id":"s2","clip_id":"seg-1","start_time":0.0,"end_time":5.0},
    {"section_type":"post_clip","section_id":"s3","script_content":"that is false","audio_tone":"neutral","estimated_duration":4.0,"clip_id":"seg-1"},
    {"section_type":"outro","section_id":"s4","script_content":"goodbye","audio_tone":"calm","estimated_duration":4.0}
]}"#;

const VERIFY_RESPONSE: &str = r#"{"corrections":[
    {"section_id":"s3","script_content":"that claim is contradicted by photographic and seismic evidence"}
]}"#;

fn full_llm_responses() -> Vec<Vec<u8>> {
    vec![
        PASS1_RESPONSE.as_bytes().to_vec(),
        PASS2_RESPONSE.as_bytes().to_vec(),
        SCRIPT_RESPONSE.as_bytes().to_vec(),
        VERIFY_RESPONSE.as_bytes().to_vec(),
    ]
}

fn transcript() -> Transcript {
    Transcript {
        language: "en".into(),
        model_name: "m".into(),
        segments: vec![TranscriptSegment {
            id: 0,
            speaker: "a".into(),
            text: "the moon landing was staged".into(),
            start: 0.0,
            end: 5.0,
        }],
    }
}

fn adapter_set(llm_responses: Vec<Vec<u8>>) -> AdapterSet {
    AdapterSet {
        downloader: Box::new(FakeDownloader::default()),
        diarizer: Box::new(FakeDiarizer::new(transcript())),
        llm: Box::new(RecordedLlm::new(llm_responses)),
        tts: Box::new(FakeTts),
        clipper: Box::new(FakeClipper),
        compositor: Box::new(FakeCompositor),
    }
}

fn config(content_root: &Path) -> PipelineConfig {
    let mut config = PipelineConfig::default();
    config.paths.content_root = content_root.to_string_lossy().into_owned();
    config.two_pass = TwoPassConfig { min_count: 1, ..TwoPassConfig::default() };
    config
}

fn fast_retry() -> RetryConfig {
    RetryConfig::default().with_max_attempts(1)
}

fn final_output_path(content_root: &Path) -> std::path::PathBuf {
    let episode = clipcheck_workspace::locate(SOURCE).unwrap();
    content_root.join(episode.id.as_str()).join("Output/Final").join(final_output_name(&episode.id))
}

#[tokio::test]
async fn happy_path_runs_all_seven_stages_and_produces_final_output() {
    let tmp = tempfile::tempdir().unwrap();
    let adapters = adapter_set(full_llm_responses());
    let pipeline_config = config(tmp.path());
    let (_token, signal) = CancelToken::new();
    let options = RunOptions::new(signal).with_retry(fast_retry());

    let report = clipcheck_pipeline::run(SOURCE, &options, &adapters, &pipeline_config).await.unwrap();

    assert!(report.succeeded());
    assert_eq!(report.stages.len(), 7);
    assert!(report.stages.iter().all(|s| s.state == StageState::Done));
    assert!(tokio::fs::metadata(final_output_path(tmp.path())).await.is_ok());
}

#[tokio::test]
async fn resuming_from_a_later_stage_skips_earlier_ones_and_reuses_cache() {
    let tmp = tempfile::tempdir().unwrap();
    let pipeline_config = config(tmp.path());

    {
        let adapters = adapter_set(full_llm_responses());
        let (_token, signal) = CancelToken::new();
        let options = RunOptions::new(signal).with_retry(fast_retry());
        let report = clipcheck_pipeline::run(SOURCE, &options, &adapters, &pipeline_config).await.unwrap();
        assert!(report.succeeded());
    }

    // Drop the composed output only, then resume from stage 5: stages 1-4
    // are cache-complete and should be recorded as skipped, not re-run.
    tokio::fs::remove_file(final_output_path(tmp.path())).await.unwrap();

    let adapters = adapter_set(Vec::new());
    let (_token, signal) = CancelToken::new();
    let options =
        RunOptions::new(signal).with_retry(fast_retry()).with_range(StageName::AudioGeneration, StageName::Composition);

    let report = clipcheck_pipeline::run(SOURCE, &options, &adapters, &pipeline_config).await.unwrap();

    assert!(report.succeeded());
    for stage in [StageName::MediaExtraction, StageName::Transcription, StageName::ContentAnalysisPass1, StageName::NarrativeGeneration]
    {
        let record = report.stages.iter().find(|s| s.name == stage).unwrap();
        assert_eq!(record.state, StageState::Done);
        assert!(record.cached);
    }
    for stage in [StageName::AudioGeneration, StageName::VideoClipping, StageName::Composition] {
        assert_eq!(report.stages.iter().find(|s| s.name == stage).unwrap().state, StageState::Done);
    }
    assert!(tokio::fs::metadata(final_output_path(tmp.path())).await.is_ok());
}

#[tokio::test]
async fn forced_regeneration_redoes_every_stage() {
    let tmp = tempfile::tempdir().unwrap();
    let pipeline_config = config(tmp.path());

    {
        let adapters = adapter_set(full_llm_responses());
        let (_token, signal) = CancelToken::new();
        let options = RunOptions::new(signal).with_retry(fast_retry());
        clipcheck_pipeline::run(SOURCE, &options, &adapters, &pipeline_config).await.unwrap();
    }

    let adapters = adapter_set(full_llm_responses());
    let (_token, signal) = CancelToken::new();
    let options = RunOptions::new(signal).with_retry(fast_retry()).with_force(true);

    let report = clipcheck_pipeline::run(SOURCE, &options, &adapters, &pipeline_config).await.unwrap();

    assert!(report.succeeded());
    assert!(report.stages.iter().all(|s| s.state == StageState::Done));
}

#[tokio::test]
async fn cancellation_before_the_run_starts_fails_the_first_stage() {
    let tmp = tempfile::tempdir().unwrap();
    let adapters = adapter_set(full_llm_responses());
    let pipeline_config = config(tmp.path());
    let (token, signal) = CancelToken::new();
    token.cancel();
    let options = RunOptions::new(signal).with_retry(fast_retry());

    let result = clipcheck_pipeline::run(SOURCE, &options, &adapters, &pipeline_config).await;
    assert!(result.is_err());
}
