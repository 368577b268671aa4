//! End-to-end coverage for stages 3 and 4 using the recorded LLM fake:
//! no network, deterministic responses, and cache-hit short-circuiting.

use clipcheck_adapters::fakes::RecordedLlm;
use clipcheck_analysis::{run_filter_script_verify, run_pass1};
use clipcheck_cache::{put_value, SchemaName};
use clipcheck_models::{Pass1Analysis, Transcript, TranscriptSegment, TwoPassConfig};
use clipcheck_retry::RetryConfig;
use clipcheck_workspace::{LogicalName, Workspace};

async fn workspace() -> (tempfile::TempDir, Workspace) {
    let tmp = tempfile::tempdir().unwrap();
    let episode = clipcheck_workspace::locate("https://example.com/ep").unwrap();
    let ws = Workspace::ensure(tmp.path(), episode).await.unwrap();
    (tmp, ws)
}

fn retry_config() -> RetryConfig {
    RetryConfig::default().with_max_attempts(1)
}

async fn seed_transcript(ws: &Workspace) {
    let transcript = Transcript {
        language: "en".into(),
        model_name: "m".into(),
        segments: vec![TranscriptSegment {
            id: 0,
            speaker: "a".into(),
            text: "the moon landing was staged".into(),
            start: 0.0,
            end: 5.0,
        }],
    };
    put_value(ws, &LogicalName::Transcript, &transcript, SchemaName::Transcript).await.unwrap();
}

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

#[tokio::test]
async fn pass1_cache_hit_makes_no_llm_call() {
    let (_tmp, ws) = workspace().await;
    seed_transcript(&ws).await;

    let llm = RecordedLlm::new(vec![PASS1_RESPONSE.as_bytes().to_vec()]);
    let config = retry_config();

    let first = run_pass1(&ws, &llm, &config).await.unwrap();
    assert_eq!(first.segments.len(), 1);

    // No more responses queued; a second LLM call would error, so this
    // only succeeds if the cache short-circuits it.
    let second = run_pass1(&ws, &llm, &config).await.unwrap();
    assert_eq!(second, first);
}

#[tokio::test]
async fn filter_script_verify_produces_structurally_sound_verified_script() {
    let (_tmp, ws) = workspace().await;

    let pass1 = Pass1Analysis {
        segments: serde_json::from_str::<Pass1Analysis>(PASS1_RESPONSE).unwrap().segments,
    };

    let pass2_response = r#"{"scores":[{
        "segment_id":"seg-1",
        "quote_strength":9.0,
        "factual_accuracy":8.0,
        "potential_impact":8.0,
        "specificity":7.0,
        "context_appropriateness":7.0
    }]}"#;

    let script_response = r#"{"sections":[
        {"section_type":"intro","section_id":"s0","script_content":"welcome","audio_tone":"upbeat","estimated_duration":5.0},
        {"section_type":"pre_clip","section_id":"s1","script_content":"here comes a claim","audio_tone":"neutral","estimated_duration":3.0,"clip_id":"seg-1"},
        {"section_type":"video_clip","section_id":"s2","clip_id":"seg-1","start_time":0.0,"end_time":5.0},
        {"section_type":"post_clip","section_id":"s3","script_content":"that is false","audio_tone":"neutral","estimated_duration":4.0,"clip_id":"seg-1"},
        {"section_type":"outro","section_id":"s4","script_content":"goodbye","audio_tone":"calm","estimated_duration":4.0}
    ]}"#;

    let verify_response = r#"{"corrections":[
        {"section_id":"s3","script_content":"that claim is contradicted by photographic and seismic evidence"}
    ]}"#;

    let llm = RecordedLlm::new(vec![
        pass2_response.as_bytes().to_vec(),
        script_response.as_bytes().to_vec(),
        verify_response.as_bytes().to_vec(),
    ]);
    let config = retry_config();
    let two_pass = TwoPassConfig { min_count: 1, ..TwoPassConfig::default() };

    let verified = run_filter_script_verify(&ws, &llm, &pass1, &two_pass, &config).await.unwrap();

    assert_eq!(verified.sections.len(), 5);
    let corrected = verified.sections[3].script_content().unwrap();
    assert!(corrected.contains("contradicted"));

    // The cached pass2_filtered, unified_script, and verified_script
    // artifacts are all present on disk for a later `--from` resume.
    assert!(ws.exists(&LogicalName::Pass2Filtered).await);
    assert!(ws.exists(&LogicalName::UnifiedScript).await);
    assert!(ws.exists(&LogicalName::VerifiedScript).await);
}
