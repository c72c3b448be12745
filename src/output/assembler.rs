use crate::models::{
    audit_columns, ApiResponseEntry, AuditRow, GroundTruthRow, GroupResult, ImageRecord, Status,
    VerificationOutcome, TRACKED_FIELDS,
};

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Build one audit row by resolving every column of the fixed schema.
fn build_row(resolve: impl Fn(&str) -> String) -> AuditRow {
    AuditRow {
        cells: audit_columns()
            .into_iter()
            .map(|column| {
                let value = resolve(&column);
                (column, value)
            })
            .collect(),
    }
}

/// Both output shapes for one scored group. The API remark carries the
/// processed-image count unless the classification override replaced it; the
/// audit row always carries the bare remark.
pub fn assemble_group(
    result: &GroupResult,
    outcome: &VerificationOutcome,
    truth: &GroundTruthRow,
) -> (ApiResponseEntry, AuditRow) {
    let final_remark = if outcome.overridden {
        outcome.remark.clone()
    } else {
        format!(
            "{} (processed {} images)",
            outcome.remark,
            result.files.len()
        )
    };

    let response = ApiResponseEntry {
        file: result.files.join(", "),
        status: outcome.status,
        document_type: outcome.document_type.clone(),
        final_remark,
        score: Some(round2(outcome.score)),
    };

    let row = build_row(|column| {
        if column.ends_with(" Match Score") {
            return format!("{:.2}", result.scores.field_score(column));
        }
        if TRACKED_FIELDS.iter().any(|(field, _)| *field == column) {
            return truth.field(column).to_string();
        }
        match column {
            "SrNo" => result.base_id.clone(),
            "File" => result.files.join(", "),
            "Status" => outcome.status.to_string(),
            "Extracted Name" => result.fields.name.clone(),
            "Extracted UID" => result.fields.uid.clone(),
            "Extracted Address" => result.fields.address.clone(),
            "Overall Match" => format!("{:.2}", round2(outcome.score)),
            "Final Remarks" => outcome.remark.clone(),
            "Document Type" => outcome.document_type.clone(),
            _ => String::new(),
        }
    });

    (response, row)
}

/// Both output shapes for an image rejected before scoring (no ground-truth
/// row, or no member with usable data). No score set exists for these.
pub fn assemble_fallback(image: &ImageRecord, remark: &str) -> (ApiResponseEntry, AuditRow) {
    let response = ApiResponseEntry {
        file: image.filename.clone(),
        status: Status::Rejected,
        document_type: "Unknown".to_string(),
        final_remark: remark.to_string(),
        score: None,
    };

    let row = build_row(|column| match column {
        "SrNo" => image.serial_label.clone(),
        "File" => image.filename.clone(),
        "Status" => Status::Rejected.to_string(),
        "Final Remarks" => remark.to_string(),
        "Document Type" => "Unknown".to_string(),
        _ => String::new(),
    });

    (response, row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::path::PathBuf;

    use crate::models::{ExtractedFields, GroundTruthRow, MatchScoreSet};

    fn sample_result() -> GroupResult {
        let mut scores = HashMap::new();
        for (field, _) in TRACKED_FIELDS.iter() {
            scores.insert(format!("{} Match Score", field), 90.0);
        }
        GroupResult {
            base_id: "A1".to_string(),
            files: vec!["A1_1.jpg".to_string(), "A1_2.jpg".to_string()],
            fields: ExtractedFields {
                name: "John Doe".to_string(),
                uid: "1234".to_string(),
                address: "MG Road, Kochi".to_string(),
                ..Default::default()
            },
            scores: MatchScoreSet::new(scores, 90.0),
            classification: "Aadhaar".to_string(),
        }
    }

    fn sample_truth() -> GroundTruthRow {
        let mut values = HashMap::new();
        values.insert("SrNo".to_string(), "A1".to_string());
        values.insert("Name".to_string(), "John Doe".to_string());
        values.insert("City".to_string(), "Kochi".to_string());
        GroundTruthRow::new(values)
    }

    fn verified_outcome() -> VerificationOutcome {
        VerificationOutcome {
            status: Status::Verified,
            remark: "Matched".to_string(),
            document_type: "Aadhaar".to_string(),
            score: 90.0,
            overridden: false,
        }
    }

    #[test]
    fn response_and_row_correspond() {
        let result = sample_result();
        let (response, row) = assemble_group(&result, &verified_outcome(), &sample_truth());

        assert_eq!(response.file, "A1_1.jpg, A1_2.jpg");
        assert_eq!(response.final_remark, "Matched (processed 2 images)");
        assert_eq!(response.score, Some(90.0));

        assert_eq!(row.get("SrNo"), "A1");
        assert_eq!(row.get("File"), response.file);
        assert_eq!(row.get("Status"), "Verified");
        assert_eq!(row.get("Final Remarks"), "Matched");
        assert_eq!(row.get("Overall Match"), "90.00");
        assert_eq!(row.get("Name"), "John Doe");
        assert_eq!(row.get("Extracted Name"), "John Doe");
    }

    #[test]
    fn every_score_set_field_lands_in_a_column() {
        let result = sample_result();
        let (_, row) = assemble_group(&result, &verified_outcome(), &sample_truth());
        for (field, _) in TRACKED_FIELDS.iter() {
            let column = format!("{} Match Score", field);
            assert!(result.scores.contains(&column));
            assert_eq!(row.get(&column), "90.00");
        }
    }

    #[test]
    fn override_remark_carries_no_image_count() {
        let result = sample_result();
        let outcome = VerificationOutcome {
            status: Status::Rejected,
            remark: "Non Aadhaar".to_string(),
            document_type: "Non-Aadhaar".to_string(),
            score: 90.0,
            overridden: true,
        };
        let (response, row) = assemble_group(&result, &outcome, &sample_truth());
        assert_eq!(response.final_remark, "Non Aadhaar");
        assert_eq!(row.get("Final Remarks"), "Non Aadhaar");
    }

    #[test]
    fn fallback_row_has_no_scores() {
        let image = ImageRecord::new("B9_1.jpg", PathBuf::from("/tmp/B9_1.jpg"));
        let (response, row) =
            assemble_fallback(&image, "Base serial number B9 not found in ground truth");

        assert_eq!(response.status, Status::Rejected);
        assert_eq!(response.document_type, "Unknown");
        assert!(response.score.is_none());

        assert_eq!(row.get("SrNo"), "B9_1");
        assert_eq!(row.get("Status"), "Rejected");
        assert_eq!(row.get("Overall Match"), "");
        assert_eq!(row.get("Name Match Score"), "");
    }
}
