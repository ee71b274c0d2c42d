//! Points resolution for OCR results.
//!
//! The extractor reports `points` itself; this module only decides whether
//! that value can be trusted. Anything unusable scores zero.

use serde_json::{Number, Value};

use crate::models::{DocumentType, ExtractedData};

/// Interpret a raw OCR result and resolve its points in one step.
pub fn score_ocr_result(doc_type: DocumentType, raw: Value) -> (ExtractedData, u32) {
    let extracted = ExtractedData::from_ocr(doc_type, raw);
    let points = resolve_points(doc_type, &extracted);
    (extracted, points)
}

/// Points for a document of `doc_type` carrying `extracted`.
///
/// A typed variant that disagrees with `doc_type` scores zero.
pub fn resolve_points(doc_type: DocumentType, extracted: &ExtractedData) -> u32 {
    if let Some(kind) = extracted.doc_type() {
        if kind != doc_type {
            tracing::warn!(
                expected = %doc_type,
                actual = %kind,
                "Extracted data kind does not match document type, scoring zero"
            );
            return 0;
        }
    }

    extracted
        .reported_points()
        .map(points_from_number)
        .unwrap_or(0)
}

/// Non-negative integers up to `u32::MAX` pass through, non-negative
/// fractions are floored, everything else is zero.
pub fn points_from_number(number: &Number) -> u32 {
    if let Some(value) = number.as_u64() {
        return u32::try_from(value).unwrap_or(0);
    }
    if number.as_i64().is_some() {
        // Negative integer.
        return 0;
    }
    match number.as_f64() {
        Some(value) if value.is_finite() && value >= 0.0 && value <= f64::from(u32::MAX) => {
            value.floor() as u32
        }
        _ => 0,
    }
}
