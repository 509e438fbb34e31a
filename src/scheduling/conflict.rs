use super::types::Appointment;

/// True when the half-open intervals `[a.start, a.end)` and
/// `[b.start, b.end)` overlap. Touching boundaries (`a.end == b.start`) do
/// not overlap, so back-to-back appointments are always legal.
fn overlaps(a: &Appointment, b: &Appointment) -> bool {
    a.start < b.end && b.start < a.end
}

/// Returns every appointment in `existing` that collides with `candidate` on
/// the same chair and date. Cancelled appointments never collide, and the
/// candidate never collides with its own id (so re-checking an already stored
/// appointment is safe). Pure: safe to call speculatively before commit.
pub fn find_conflicts(candidate: &Appointment, existing: &[Appointment]) -> Vec<Appointment> {
    existing
        .iter()
        .filter(|other| {
            other.chair_id == candidate.chair_id
                && other.date == candidate.date
                && !other.is_cancelled()
                && other.id != candidate.id
                && overlaps(candidate, other)
        })
        .cloned()
        .collect()
}
