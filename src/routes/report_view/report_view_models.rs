use serde::Serialize;

use crate::stats::ProjectReport;

#[derive(Serialize)]
pub struct GetProjectReportResponse {
    pub project_id: String,
    #[serde(flatten)]
    pub report: ProjectReport,
}
