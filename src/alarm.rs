//! Short labels for the raw alarm text reported by the OLT.

const DYING_GASP: &str = "The dying-gasp of GPON ONTi (DGi) is generated";
const FIBER_BROKEN: &str = "distribute fiber is broken";
const GEM_LOSS: &str = "loss of GEM";

pub const NOT_AVAILABLE: &str = "N/A";

/// Maps a raw alarm to its display label. Rules are checked in order and are
/// case-sensitive; unknown alarms pass through unchanged.
pub fn normalize_alarm(raw: &str) -> &str {
    if raw == DYING_GASP {
        "Falta de energia"
    } else if raw.contains(FIBER_BROKEN) || raw.contains(GEM_LOSS) {
        "LOSS"
    } else {
        raw
    }
}

/// Display text for an optional alarm, `N/A` when absent or empty.
pub fn alarm_label(raw: Option<&str>) -> String {
    match raw {
        Some(raw) if !raw.is_empty() => normalize_alarm(raw).to_string(),
        _ => NOT_AVAILABLE.to_string(),
    }
}
