mod executor;
mod orchestrator;

pub use orchestrator::{
    CorpusFit, CorpusStats, Orchestrator, PreparedCorpus, ReviewReport, ReviewResult,
    ReviewSettings,
};

/// Where a run is in its linear life cycle, for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Collecting,
    Reviewing { index: usize, total: usize },
    PolicyFailed { index: usize, total: usize },
    Rendering,
    Done,
    Aborted,
}

impl std::fmt::Display for RunPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunPhase::Collecting => write!(f, "collecting"),
            RunPhase::Reviewing { index, total } => write!(f, "reviewing {}/{}", index + 1, total),
            RunPhase::PolicyFailed { index, total } => {
                write!(f, "policy {}/{} failed", index + 1, total)
            }
            RunPhase::Rendering => write!(f, "rendering"),
            RunPhase::Done => write!(f, "done"),
            RunPhase::Aborted => write!(f, "aborted"),
        }
    }
}
