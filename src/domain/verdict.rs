/// Binary classification outcome for a call's opening audio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    Human,
    Machine,
}

impl Label {
    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Human => "HUMAN",
            Label::Machine => "MACHINE",
        }
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Terminal output of one classification request.
///
/// `confidence` is always in `[0, 1]`: 0 at the score midpoint, 1 at either
/// extreme.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Verdict {
    pub label: Label,
    pub confidence: f32,
}
