//! Slot conflict resolution
//!
//! Pure queries over a snapshot of the active roster. A session occupies its start slot
//! and the slot after it, so an enrollment starting at 17:00 holds 17:00 and 17:30.

use serde::Serialize;

use crate::domain::entities::{
    DayOfWeek, Enrollment, EnrollmentId, PreferredDays, SlotTime, TimeSlot,
};

/// An active enrollment standing in the way of a candidate session
#[derive(Debug, Clone, Copy)]
pub struct SlotConflict<'a> {
    /// The candidate's session start that collided
    pub slot: TimeSlot,
    pub occupant: &'a Enrollment,
}

/// The active enrollment occupying `candidate` on `day`, if any
///
/// An enrollment occupies the slot when it meets on `day` and its session starts either
/// at `candidate` or in the slot right before it.
pub fn occupant<'a>(
    day: DayOfWeek,
    candidate: SlotTime,
    roster: &'a [Enrollment],
) -> Option<&'a Enrollment> {
    roster.iter().find(|e| occupies(e, day, candidate))
}

/// First conflict for a candidate schedule, skipping the candidate itself
///
/// Both slots of each candidate session are checked, so a 16:30 candidate collides with
/// a 17:00 enrollment as well as with a 16:00 one.
pub fn find_conflict<'a>(
    days: &PreferredDays,
    start: SlotTime,
    roster: &'a [Enrollment],
    candidate: Option<EnrollmentId>,
) -> Option<SlotConflict<'a>> {
    days.iter().find_map(|day| {
        roster
            .iter()
            .filter(|e| Some(e.id) != candidate)
            .find(|e| overlaps_session(e, day, start))
            .map(|occupant| SlotConflict {
                slot: TimeSlot { day, start },
                occupant,
            })
    })
}

fn occupies(enrollment: &Enrollment, day: DayOfWeek, candidate: SlotTime) -> bool {
    enrollment.is_active()
        && enrollment.meets_on(day)
        && (enrollment.preferred_start == candidate
            || Some(enrollment.preferred_start) == candidate.previous())
}

fn overlaps_session(enrollment: &Enrollment, day: DayOfWeek, start: SlotTime) -> bool {
    occupies(enrollment, day, start)
        || start
            .next()
            .is_some_and(|second_half| occupies(enrollment, day, second_half))
}

/// One cell of the weekly occupancy grid
#[derive(Debug, Clone, Serialize)]
pub struct GridCell {
    pub day: DayOfWeek,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enrollment_id: Option<EnrollmentId>,
    /// True when the occupying session starts in this cell
    pub session_start: bool,
}

/// One time row of the weekly occupancy grid
#[derive(Debug, Clone, Serialize)]
pub struct GridRow {
    pub time: SlotTime,
    pub cells: Vec<GridCell>,
}

/// Render the weekly day x slot grid of an active roster
pub fn occupancy_grid(roster: &[Enrollment]) -> Vec<GridRow> {
    SlotTime::all()
        .into_iter()
        .map(|time| GridRow {
            time,
            cells: DayOfWeek::ALL
                .iter()
                .map(|&day| {
                    let holder = occupant(day, time, roster);
                    GridCell {
                        day,
                        enrollment_id: holder.map(|e| e.id),
                        session_start: holder.is_some_and(|e| e.preferred_start == time),
                    }
                })
                .collect(),
        })
        .collect()
}
