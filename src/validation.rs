//! Input validation for event days.
//!
//! The slot planner tolerates malformed placements (they only shrink
//! the set of offered slots). Callers that want to surface data
//! problems to an organizer run these checks first. Detects:
//! - Missing or empty event window
//! - Empty placement windows
//! - Duplicate placement IDs
//! - Placements outside the event window
//! - Overlapping placements

use crate::models::{ActivityPlacement, EventDay};
use std::collections::HashSet;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// The event has no opening hours yet.
    MissingEventWindow,
    /// A window ends at or before its start.
    InvalidWindow,
    /// Two placements share the same ID.
    DuplicateId,
    /// A placement extends past the event window.
    OutsideEventWindow,
    /// Two placements occupy overlapping time.
    OverlappingPlacements,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates an event day.
///
/// Checks:
/// 1. The event window is set and non-empty
/// 2. Every placement window is non-empty
/// 3. No duplicate placement IDs
/// 4. Every placement lies inside the event window
/// 5. No two placements overlap
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_event_day(day: &EventDay) -> ValidationResult {
    let mut errors = Vec::new();

    match &day.event_window {
        None => errors.push(ValidationError::new(
            ValidationErrorKind::MissingEventWindow,
            "Event window is not set",
        )),
        Some(window) if !window.is_valid() => errors.push(ValidationError::new(
            ValidationErrorKind::InvalidWindow,
            format!("Event window {}–{} is empty", window.start, window.end),
        )),
        Some(_) => {}
    }

    let mut ids = HashSet::new();
    for placement in &day.placements {
        if !ids.insert(placement.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate placement ID: {}", placement.id),
            ));
        }

        if !placement.window.is_valid() {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidWindow,
                format!("Placement '{}' has an empty window", placement.id),
            ));
            continue;
        }

        if let Some(window) = day.event_window.filter(|w| w.is_valid()) {
            if !window.encloses(&placement.window) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::OutsideEventWindow,
                    format!(
                        "Placement '{}' ({}–{}) is outside the event window ({}–{})",
                        placement.id,
                        placement.window.start,
                        placement.window.end,
                        window.start,
                        window.end
                    ),
                ));
            }
        }
    }

    // Sorted sweep: each placement only needs checking against the
    // latest-ending placement seen so far.
    let sorted = day.sorted_placements();
    let mut reach: Option<&ActivityPlacement> = None;
    for placement in sorted.into_iter().filter(|p| p.window.is_valid()) {
        if let Some(prev) = reach {
            if prev.window.overlaps(&placement.window) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::OverlappingPlacements,
                    format!("Placements '{}' and '{}' overlap", prev.id, placement.id),
                ));
            }
            if placement.window.end > prev.window.end {
                reach = Some(placement);
            }
        } else {
            reach = Some(placement);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
