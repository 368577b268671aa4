//! LLM round-trip helper shared by all four sub-stages: upload attachments,
//! call `generate`, always release handles, parse the response as JSON.

use std::path::Path;

use clipcheck_adapters::Llm;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::attempt::AttemptError;

pub async fn call_llm_for_json<T: DeserializeOwned>(
    llm: &dyn Llm,
    prompt: &str,
    attachments: &[&Path],
) -> Result<T, AttemptError> {
    let mut handles = Vec::with_capacity(attachments.len());
    for path in attachments {
        match llm.upload_file(path).await {
            Ok(handle) => handles.push(handle),
            Err(e) => {
                release(llm, &handles).await;
                return Err(AttemptError::Llm(e));
            },
        }
    }

    let generated = llm.generate(prompt, &handles).await;
    release(llm, &handles).await;

    let bytes = generated.map_err(AttemptError::Llm)?;
    serde_json::from_slice(&bytes).map_err(|e| AttemptError::Malformed(e.to_string()))
}

/// Best-effort cleanup: a failed delete is logged, not propagated, since
/// the attempt's own outcome (success, adapter error, or parse error) has
/// already been decided by the time cleanup runs.
async fn release(llm: &dyn Llm, handles: &[clipcheck_adapters::FileHandle]) {
    for handle in handles {
        if let Err(e) = llm.delete_file(handle).await {
            warn!(error = %e, "failed to release uploaded file handle");
        }
    }
}
