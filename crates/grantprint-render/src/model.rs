#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderableSeverity {
    Info,
    Warning,
    Error,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderableVerdictStatus {
    Pass,
    Warn,
    Fail,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderableAction {
    Create,
    Update,
    Skip,
    Invalid,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableDecision {
    pub index: usize,
    pub action: RenderableAction,
    pub reason: String,
    pub source: Option<String>,
    pub slug: Option<String>,
    pub slug_changed: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableFinding {
    pub severity: RenderableSeverity,
    pub check_id: String,
    pub code: String,
    pub message: String,
    pub record_index: Option<usize>,
    pub help: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderableCounts {
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
    pub invalid: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableData {
    pub profile: String,
    pub checksum_mode: String,
    pub records_total: usize,
    pub known_grants: usize,
    pub counts: RenderableCounts,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableReport {
    pub verdict: RenderableVerdictStatus,
    pub decisions: Vec<RenderableDecision>,
    pub findings: Vec<RenderableFinding>,
    pub data: RenderableData,
}
