use super::{FlowBuilder, FlowDefinition, NavigationRule, RulePolicy, Step};
use crate::condition::Condition;
use crate::error::ArtifactError;
use bincode::config::standard;
use bincode::serde::{decode_from_slice, encode_to_vec};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{Read, Write};

/// Current layout version of `FlowArtifact`.
pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

/// A compact binary snapshot of a validated flow.
///
/// Loading an artifact runs the full builder validation again, so a tampered or stale file
/// can never produce an invalid `FlowDefinition`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowArtifact {
    pub version: u32,
    pub identifier: String,
    pub steps: Vec<Step>,
    pub rules: Vec<(String, NavigationRule)>,
    pub skip_rules: Vec<(String, Condition)>,
}

impl FlowArtifact {
    pub fn from_definition(flow: &FlowDefinition) -> Self {
        Self {
            version: ARTIFACT_FORMAT_VERSION,
            identifier: flow.identifier().to_string(),
            steps: flow.steps().to_vec(),
            rules: flow
                .rules()
                .into_iter()
                .map(|(t, r)| (t.to_string(), r.clone()))
                .collect(),
            skip_rules: flow
                .skip_rules()
                .into_iter()
                .map(|(s, c)| (s.to_string(), c.clone()))
                .collect(),
        }
    }

    /// Validates the snapshot and turns it back into a definition.
    pub fn into_definition(self) -> Result<FlowDefinition, ArtifactError> {
        if self.version != ARTIFACT_FORMAT_VERSION {
            return Err(ArtifactError::UnsupportedVersion {
                found: self.version,
                expected: ARTIFACT_FORMAT_VERSION,
            });
        }

        let mut builder = FlowBuilder::new(self.identifier)
            .with_rule_policy(RulePolicy::Reject)
            .steps(self.steps);
        for (trigger, rule) in self.rules {
            builder = builder.navigation_rule(trigger, rule);
        }
        for (step, condition) in self.skip_rules {
            builder = builder.skip_rule(step, condition);
        }
        Ok(builder.build()?)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, ArtifactError> {
        encode_to_vec(self, standard()).map_err(|e| ArtifactError::Encode(e.to_string()))
    }

    /// Deserializes an artifact from a byte slice.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ArtifactError> {
        decode_from_slice(bytes, standard())
            .map(|(artifact, _)| artifact) // bincode 2 returns a tuple (data, bytes_read)
            .map_err(|e| ArtifactError::Decode(e.to_string()))
    }

    /// Saves the artifact to a file using the bincode format.
    pub fn save(&self, path: &str) -> Result<(), ArtifactError> {
        let bytes = self.to_bytes()?;
        let io_error = |source: std::io::Error| ArtifactError::Io {
            path: path.to_string(),
            source,
        };
        let mut file = fs::File::create(path).map_err(io_error)?;
        file.write_all(&bytes).map_err(io_error)?;
        Ok(())
    }

    pub fn from_file(path: &str) -> Result<Self, ArtifactError> {
        let io_error = |source: std::io::Error| ArtifactError::Io {
            path: path.to_string(),
            source,
        };
        let mut file = fs::File::open(path).map_err(io_error)?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes).map_err(io_error)?;
        Self::from_bytes(&bytes)
    }
}
