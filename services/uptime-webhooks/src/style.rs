//! Severity marker used as the attachment color

use serde::{Serialize, Serializer};

use crate::event::EventKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeverityMarker {
    Positive,
    Critical,
    Warning,
    None,
}

impl SeverityMarker {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeverityMarker::Positive => "positive",
            SeverityMarker::Critical => "critical",
            SeverityMarker::Warning => "warning",
            SeverityMarker::None => "",
        }
    }
}

impl Serialize for SeverityMarker {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

pub fn style_for(kind: &EventKind) -> SeverityMarker {
    match kind {
        EventKind::Up => SeverityMarker::Positive,
        EventKind::Down => SeverityMarker::Critical,
        EventKind::Paused | EventKind::Restarted => SeverityMarker::Warning,
        EventKind::Unrecognized(_) => SeverityMarker::None,
    }
}
