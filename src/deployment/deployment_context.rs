use std::path::PathBuf;
use std::sync::Arc;

use super::steps::assemble_report::REPORT_PATH;
use crate::ledger::Ledger;
use crate::report::Report;

#[derive(Debug)]
pub struct DeploymentContext {
    pub deployment_dir: PathBuf,
    /// Report of the previous run, steps recorded in it are reused
    pub report: Report,
    pub ledger: Arc<dyn Ledger>,
}

impl DeploymentContext {
    pub fn report_path(&self) -> PathBuf {
        self.deployment_dir.join(REPORT_PATH)
    }
}
