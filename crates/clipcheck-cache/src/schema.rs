//! Schema Validator (C2): named schemas and the parsed artifact each
//! produces.

use clipcheck_models::{Pass1Analysis, Pass2Analysis, Transcript, UnifiedScript, VerifiedScript};
use serde::de::DeserializeOwned;

use crate::error::{CacheError, CacheResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaName {
    Transcript,
    Pass1Analysis,
    Pass2Filtered,
    UnifiedScript,
    VerifiedScript,
}

impl SchemaName {
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaName::Transcript => "transcript",
            SchemaName::Pass1Analysis => "pass1_analysis",
            SchemaName::Pass2Filtered => "pass2_filtered",
            SchemaName::UnifiedScript => "unified_script",
            SchemaName::VerifiedScript => "verified_script",
        }
    }
}

/// A validated artifact, tagged by which schema it was parsed and checked
/// against. Each stage that reads a cached artifact matches on the variant
/// it expects; a mismatch is a programmer error, not a runtime one, since
/// callers always pass the `SchemaName` matching the logical artifact they
/// asked for.
#[derive(Debug, Clone, PartialEq)]
pub enum Artifact {
    Transcript(Transcript),
    Pass1Analysis(Pass1Analysis),
    Pass2Filtered(Pass2Analysis),
    UnifiedScript(UnifiedScript),
    VerifiedScript(VerifiedScript),
}

impl Artifact {
    pub fn as_transcript(&self) -> Option<&Transcript> {
        match self {
            Artifact::Transcript(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_pass1(&self) -> Option<&Pass1Analysis> {
        match self {
            Artifact::Pass1Analysis(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_pass2(&self) -> Option<&Pass2Analysis> {
        match self {
            Artifact::Pass2Filtered(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_unified_script(&self) -> Option<&UnifiedScript> {
        match self {
            Artifact::UnifiedScript(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_verified_script(&self) -> Option<&VerifiedScript> {
        match self {
            Artifact::VerifiedScript(s) => Some(s),
            _ => None,
        }
    }
}

/// Parses `bytes` as JSON and runs the invariant checks for `schema`.
/// Cross-artifact invariants (subset, clip_id references, structural
/// preservation) are not checked here since they need a second artifact —
/// the two-pass controller checks those explicitly after both reads
/// succeed.
pub fn validate(bytes: &[u8], schema: SchemaName) -> CacheResult<Artifact> {
    match schema {
        SchemaName::Transcript => {
            let parsed: Transcript = parse(bytes)?;
            parsed.validate().map_err(|e| CacheError::validation(schema.as_str(), e))?;
            Ok(Artifact::Transcript(parsed))
        },
        SchemaName::Pass1Analysis => {
            let parsed: Pass1Analysis = parse(bytes)?;
            parsed.validate().map_err(|e| CacheError::validation(schema.as_str(), e))?;
            Ok(Artifact::Pass1Analysis(parsed))
        },
        SchemaName::Pass2Filtered => {
            // Subset invariant needs pass1_analysis; checked by the caller.
            let parsed: Pass2Analysis = parse(bytes)?;
            Ok(Artifact::Pass2Filtered(parsed))
        },
        SchemaName::UnifiedScript => {
            let parsed: UnifiedScript = parse(bytes)?;
            parsed.validate().map_err(|e| CacheError::validation(schema.as_str(), e))?;
            Ok(Artifact::UnifiedScript(parsed))
        },
        SchemaName::VerifiedScript => {
            let parsed: VerifiedScript = parse(bytes)?;
            parsed.validate().map_err(|e| CacheError::validation(schema.as_str(), e))?;
            Ok(Artifact::VerifiedScript(parsed))
        },
    }
}

fn parse<T: DeserializeOwned>(bytes: &[u8]) -> CacheResult<T> {
    Ok(serde_json::from_slice(bytes)?)
}
