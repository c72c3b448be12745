use std::collections::HashMap;

use log::{error, info, warn};

use crate::matching::FieldMatcher;
use crate::models::{
    BatchOutcome, ExtractedFields, GroundTruthTable, GroupResult, ImageRecord, MatchScoreSet,
};
use crate::output::{assemble_fallback, assemble_group};
use crate::processing::FieldExtractor;
use crate::utils::VerifyError;
use crate::validation::DecisionEngine;

/// All images sharing one base identifier, in first-seen order.
#[derive(Debug)]
struct ImageGroup {
    base_id: String,
    members: Vec<ImageRecord>,
}

/// Partition the batch by base_id. Groups keep the order in which their first
/// member appeared, members keep batch order; no incidental map iteration is
/// involved.
fn group_images(images: &[ImageRecord]) -> Vec<ImageGroup> {
    let mut groups: Vec<ImageGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for image in images {
        match index.get(&image.base_id) {
            Some(&position) => groups[position].members.push(image.clone()),
            None => {
                index.insert(image.base_id.clone(), groups.len());
                groups.push(ImageGroup {
                    base_id: image.base_id.clone(),
                    members: vec![image.clone()],
                });
            }
        }
    }
    groups
}

/// Drives the extractor and matcher over every group of a batch and selects
/// each group's best-scoring image, the analog of a human reviewer keeping the
/// clearest scan of a document.
pub struct BatchVerifier {
    extractor: Box<dyn FieldExtractor>,
    matcher: FieldMatcher,
    engine: DecisionEngine,
}

impl BatchVerifier {
    pub fn new(
        extractor: Box<dyn FieldExtractor>,
        matcher: FieldMatcher,
        engine: DecisionEngine,
    ) -> Self {
        BatchVerifier {
            extractor,
            matcher,
            engine,
        }
    }

    /// Process one batch against the ground-truth table. Groups without a
    /// ground-truth row or without usable extractions are rejected per image;
    /// everything else yields one response and one audit row per group.
    pub fn process(
        &self,
        images: &[ImageRecord],
        table: &GroundTruthTable,
    ) -> Result<BatchOutcome, VerifyError> {
        let mut outcome = BatchOutcome::default();

        for group in group_images(images) {
            info!(
                "Processing group {} ({} images)",
                group.base_id,
                group.members.len()
            );

            let truth = match table.lookup(&group.base_id) {
                Some(row) => row,
                None => {
                    warn!("No ground-truth row for base serial {}", group.base_id);
                    let remark = format!(
                        "Base serial number {} not found in ground truth",
                        group.base_id
                    );
                    for member in &group.members {
                        let (response, row) = assemble_fallback(member, &remark);
                        outcome.responses.push(response);
                        outcome.audit_rows.push(row);
                    }
                    continue;
                }
            };

            let mut best: Option<(ExtractedFields, MatchScoreSet, String)> = None;
            let mut best_score = 0.0;
            let mut files = Vec::with_capacity(group.members.len());

            for member in &group.members {
                let extraction = self.extractor.extract(&member.path);
                files.push(member.filename.clone());

                if extraction.fields.name.is_empty() {
                    error!("Name not extracted for {}", member.filename);
                    continue;
                }

                let scores = self.matcher.score(&extraction.fields, truth);
                // Strict comparison: on ties the first-seen image stays the
                // representative.
                if scores.overall > best_score {
                    best_score = scores.overall;
                    best = Some((extraction.fields, scores, extraction.classification));
                }
            }

            match best {
                Some((fields, scores, classification)) => {
                    let decision = self.engine.decide(best_score, &classification);
                    let result = GroupResult {
                        base_id: group.base_id.clone(),
                        files,
                        fields,
                        scores,
                        classification,
                    };
                    let (response, row) = assemble_group(&result, &decision, truth);
                    outcome.responses.push(response);
                    outcome.audit_rows.push(row);
                    info!(
                        "Processed group {} with best score {:.2}",
                        group.base_id, best_score
                    );
                }
                None => {
                    error!("No valid data extracted for group {}", group.base_id);
                    for member in &group.members {
                        let (response, row) =
                            assemble_fallback(member, "No valid data extracted from any image");
                        outcome.responses.push(response);
                        outcome.audit_rows.push(row);
                    }
                }
            }
        }

        Ok(outcome)
    }
}
