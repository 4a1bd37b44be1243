//! Upload checks and version numbering. Everything here runs before any
//! storage or database call, so a rejected file leaves no trace.

use serde::Deserialize;

use crate::errors::AppError;
use crate::models::resume::ResumeStatus;

const GENERIC_CONTENT_TYPE: &str = "application/octet-stream";
const MAX_FILE_NAME_LEN: usize = 100;

/// Accepted resume formats: `(content type, extension)`.
pub const ALLOWED_FORMATS: &[(&str, &str)] = &[
    ("application/pdf", "pdf"),
    ("application/msword", "doc"),
    (
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "docx",
    ),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptedFile {
    pub file_name: String,
    pub content_type: String,
}

fn extension(file_name: &str) -> Option<String> {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
}

/// Checks size and format. Returns a single error describing the first
/// problem found.
pub fn validate_upload(
    file_name: &str,
    content_type: Option<&str>,
    size: usize,
    max_bytes: usize,
) -> Result<AcceptedFile, AppError> {
    if size == 0 {
        return Err(AppError::Validation("The uploaded file is empty".to_string()));
    }
    if size > max_bytes {
        return Err(AppError::Validation(format!(
            "File is too large ({:.1} MB); the limit is {:.0} MB",
            size as f64 / (1024.0 * 1024.0),
            max_bytes as f64 / (1024.0 * 1024.0)
        )));
    }

    let ext = extension(file_name);
    let by_extension = ext
        .as_deref()
        .and_then(|e| ALLOWED_FORMATS.iter().find(|(_, allowed)| *allowed == e));

    let content_type = content_type
        .map(|c| c.split(';').next().unwrap_or(c).trim().to_ascii_lowercase())
        .filter(|c| !c.is_empty() && c != GENERIC_CONTENT_TYPE);

    let format = match content_type {
        Some(ct) => ALLOWED_FORMATS.iter().find(|(allowed, _)| *allowed == ct),
        None => by_extension,
    };

    match format {
        Some((ct, _)) => Ok(AcceptedFile {
            file_name: sanitize_file_name(file_name),
            content_type: ct.to_string(),
        }),
        None => Err(AppError::Validation(
            "Only PDF, DOC or DOCX resumes are accepted".to_string(),
        )),
    }
}

/// Keeps a storage-safe version of the client's file name.
pub fn sanitize_file_name(raw: &str) -> String {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or(raw);
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    // Keep the tail so the extension survives truncation.
    let skip = cleaned.chars().count().saturating_sub(MAX_FILE_NAME_LEN);
    let truncated: String = cleaned.chars().skip(skip).collect();
    if truncated.is_empty() {
        "resume".to_string()
    } else {
        truncated
    }
}

/// Next version number: one past the highest ever issued for the student.
pub fn next_version(highest_existing: Option<i32>) -> i32 {
    highest_existing.unwrap_or(0).max(0) + 1
}

pub fn object_key(student_id: uuid::Uuid, version: i32, file_name: &str) -> String {
    format!("resumes/{student_id}/v{version}/{file_name}")
}

#[derive(Debug, Deserialize)]
pub struct ReviewDecision {
    pub status: ResumeStatus,
    pub feedback: Option<String>,
}

/// A decision must approve or reject; rejections must say why.
pub fn validate_decision(decision: ReviewDecision) -> Result<(ResumeStatus, Option<String>), AppError> {
    let feedback = decision
        .feedback
        .map(|f| f.trim().to_string())
        .filter(|f| !f.is_empty());
    match decision.status {
        ResumeStatus::Pending => Err(AppError::Validation(
            "A review decision must be approved or rejected".to_string(),
        )),
        ResumeStatus::Rejected if feedback.is_none() => Err(AppError::Validation(
            "Feedback is required when rejecting a resume".to_string(),
        )),
        status => Ok((status, feedback)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MB: usize = 1024 * 1024;
    const LIMIT: usize = 10 * MB;

    #[test]
    fn test_pdf_accepted() {
        let f = validate_upload("cv.pdf", Some("application/pdf"), MB, LIMIT).unwrap();
        assert_eq!(f.content_type, "application/pdf");
        assert_eq!(f.file_name, "cv.pdf");
    }

    #[test]
    fn test_generic_content_type_falls_back_to_extension() {
        let f = validate_upload("CV.DOCX", Some(GENERIC_CONTENT_TYPE), MB, LIMIT).unwrap();
        assert!(f.content_type.contains("wordprocessingml"));

        let f = validate_upload("cv.doc", None, MB, LIMIT).unwrap();
        assert_eq!(f.content_type, "application/msword");
    }

    #[test]
    fn test_oversized_rejected_once() {
        let err = validate_upload("cv.pdf", Some("application/pdf"), LIMIT + 1, LIMIT).unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m.contains("too large")));
    }

    #[test]
    fn test_exact_limit_accepted() {
        assert!(validate_upload("cv.pdf", Some("application/pdf"), LIMIT, LIMIT).is_ok());
    }

    #[test]
    fn test_wrong_type_rejected() {
        assert!(validate_upload("photo.png", Some("image/png"), MB, LIMIT).is_err());
        assert!(validate_upload("cv.pdf", Some("image/png"), MB, LIMIT).is_err());
        assert!(validate_upload("notes.txt", None, MB, LIMIT).is_err());
    }

    #[test]
    fn test_oversized_wrong_type_reports_size() {
        let err = validate_upload("photo.png", Some("image/png"), LIMIT * 2, LIMIT).unwrap_err();
        assert!(err.to_string().contains("too large"));
    }

    #[test]
    fn test_content_type_parameters_ignored() {
        assert!(validate_upload("cv.pdf", Some("application/pdf; charset=binary"), MB, LIMIT).is_ok());
    }

    #[test]
    fn test_empty_file_rejected() {
        assert!(validate_upload("cv.pdf", Some("application/pdf"), 0, LIMIT).is_err());
    }

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("C:\\Users\\me\\My CV (final).pdf"), "My_CV__final_.pdf");
        assert_eq!(sanitize_file_name("..."), "resume");
        let long = format!("{}.pdf", "a".repeat(300));
        let cleaned = sanitize_file_name(&long);
        assert_eq!(cleaned.len(), MAX_FILE_NAME_LEN);
        assert!(cleaned.ends_with(".pdf"));
    }

    #[test]
    fn test_next_version_exceeds_all_existing() {
        assert_eq!(next_version(None), 1);
        let existing = [1, 2, 5, 3];
        let next = next_version(existing.iter().copied().max());
        assert!(existing.iter().all(|v| next > *v));
        assert_eq!(next, 6);
    }

    #[test]
    fn test_object_key_layout() {
        let id = uuid::Uuid::nil();
        assert_eq!(
            object_key(id, 3, "cv.pdf"),
            "resumes/00000000-0000-0000-0000-000000000000/v3/cv.pdf"
        );
    }

    #[test]
    fn test_rejection_requires_feedback() {
        let d = ReviewDecision {
            status: ResumeStatus::Rejected,
            feedback: Some("  ".to_string()),
        };
        assert!(validate_decision(d).is_err());
    }

    #[test]
    fn test_pending_is_not_a_decision() {
        let d = ReviewDecision {
            status: ResumeStatus::Pending,
            feedback: None,
        };
        assert!(validate_decision(d).is_err());
    }

    #[test]
    fn test_approval_without_feedback_ok() {
        let d = ReviewDecision {
            status: ResumeStatus::Approved,
            feedback: None,
        };
        assert_eq!(validate_decision(d).unwrap(), (ResumeStatus::Approved, None));
    }
}
