use std::collections::BTreeSet;

use anyhow::anyhow;
use axum::{
    extract::{Multipart, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::analysis::models::{AnalysisReport, Claim};
use crate::analysis::pipeline::{analyze_resume, score_claims};
use crate::analysis::vulnerability::map_vulnerabilities;
use crate::errors::AppError;
use crate::ml::readiness::score_readiness;
use crate::ml::risk_classifier::{FeatureWeight, TrainingMetrics};
use crate::ml::ReadinessReport;
use crate::nlp::keywords::{extract_keywords, flatten, KeywordMap};
use crate::nlp::ontology::implied_skills;
use crate::parsing::document::extract_text;
use crate::parsing::ExtractedClaim;
use crate::state::AppState;

const MAX_CLAIMS_PER_REQUEST: usize = 200;
const DEFAULT_TOP_N: usize = 10;
const ALLOWED_EXTENSIONS: &[&str] = &[".pdf", ".txt"];

/// Runs CPU-bound pipeline work off the async runtime.
async fn run_blocking<T, F>(work: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| AppError::Internal(anyhow!("analysis task failed: {e}")))?
}

#[derive(Deserialize)]
pub struct AnalysisRequest {
    pub resume_text: String,
    pub job_description: Option<String>,
}

/// POST /api/v1/analysis
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(req): Json<AnalysisRequest>,
) -> Result<Json<AnalysisReport>, AppError> {
    if req.resume_text.trim().is_empty() {
        return Err(AppError::Validation("resume_text must not be empty".into()));
    }
    let report = run_blocking(move || {
        Ok(analyze_resume(
            &req.resume_text,
            req.job_description.as_deref(),
            &state.rules,
            &state.models,
        )?)
    })
    .await?;
    Ok(Json(report))
}

/// POST /api/v1/analysis/upload
/// Multipart fields: `file` (.pdf or .txt), optional `job_description`.
pub async fn handle_analyze_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalysisReport>, AppError> {
    let mut upload: Option<(String, Vec<u8>)> = None;
    let mut job_description: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart body: {e}")))?
    {
        match field.name() {
            Some("file") => {
                let filename = field.file_name().unwrap_or("resume.txt").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("could not read file: {e}")))?;
                upload = Some((filename, bytes.to_vec()));
            }
            Some("job_description") => {
                let text = field.text().await.map_err(|e| {
                    AppError::Validation(format!("could not read job_description: {e}"))
                })?;
                job_description = Some(text);
            }
            _ => {}
        }
    }

    let (filename, bytes) =
        upload.ok_or_else(|| AppError::Validation("missing `file` field".into()))?;
    let lower = filename.to_lowercase();
    if !ALLOWED_EXTENSIONS.iter().any(|ext| lower.ends_with(ext)) {
        return Err(AppError::Validation(format!(
            "unsupported file type `{filename}`, expected .pdf or .txt"
        )));
    }

    let report = run_blocking(move || {
        let text = extract_text(&bytes, &filename)?;
        Ok(analyze_resume(
            &text,
            job_description.as_deref(),
            &state.rules,
            &state.models,
        )?)
    })
    .await?;
    Ok(Json(report))
}

#[derive(Deserialize)]
pub struct ClaimInput {
    pub text: String,
    #[serde(default = "default_section")]
    pub section: String,
}

fn default_section() -> String {
    "experience".to_string()
}

#[derive(Deserialize)]
pub struct ClaimScoreRequest {
    pub claims: Vec<ClaimInput>,
}

#[derive(Serialize)]
pub struct ClaimScoreResponse {
    pub claims: Vec<Claim>,
    pub readiness: ReadinessReport,
}

/// POST /api/v1/claims/score
pub async fn handle_score_claims(
    State(state): State<AppState>,
    Json(req): Json<ClaimScoreRequest>,
) -> Result<Json<ClaimScoreResponse>, AppError> {
    if req.claims.is_empty() {
        return Err(AppError::Validation("claims must not be empty".into()));
    }
    if req.claims.len() > MAX_CLAIMS_PER_REQUEST {
        return Err(AppError::Validation(format!(
            "at most {MAX_CLAIMS_PER_REQUEST} claims per request"
        )));
    }

    let claims: Vec<ExtractedClaim> = req
        .claims
        .into_iter()
        .map(|c| ExtractedClaim::new(c.text.trim(), c.section.trim().to_lowercase()))
        .collect();

    let response = run_blocking(move || {
        let predictions = score_claims(&claims, &state.models)?;
        let readiness = score_readiness(&claims, &state.models.risk)?;
        let map = map_vulnerabilities(&claims, &predictions);
        let scored = claims
            .iter()
            .zip(predictions)
            .zip(map.per_claim)
            .map(|((claim, prediction), found)| {
                Claim::new(claim, prediction, found.vulnerabilities)
            })
            .collect();
        Ok(ClaimScoreResponse {
            claims: scored,
            readiness,
        })
    })
    .await?;
    Ok(Json(response))
}

#[derive(Deserialize)]
pub struct KeywordRequest {
    pub text: String,
}

#[derive(Serialize)]
pub struct KeywordResponse {
    pub keywords: KeywordMap,
    pub explicit_skills: BTreeSet<String>,
    pub implied_skills: BTreeSet<String>,
    pub missing_skills: BTreeSet<String>,
}

/// POST /api/v1/keywords
pub async fn handle_keywords(Json(req): Json<KeywordRequest>) -> Json<KeywordResponse> {
    let keywords = extract_keywords(&req.text);
    let explicit_skills = flatten(&keywords);
    let implied = implied_skills(&explicit_skills);
    let missing_skills = implied.difference(&explicit_skills).cloned().collect();
    Json(KeywordResponse {
        keywords,
        explicit_skills,
        implied_skills: implied,
        missing_skills,
    })
}

#[derive(Deserialize)]
pub struct InsightsQuery {
    pub top_n: Option<usize>,
}

#[derive(Serialize)]
pub struct InsightsResponse {
    pub trained: bool,
    pub metrics: Option<TrainingMetrics>,
    pub feature_weights: Vec<FeatureWeight>,
}

/// GET /api/v1/model/insights
pub async fn handle_model_insights(
    State(state): State<AppState>,
    Query(params): Query<InsightsQuery>,
) -> Json<InsightsResponse> {
    let top_n = params.top_n.unwrap_or(DEFAULT_TOP_N);
    Json(InsightsResponse {
        trained: state.models.is_ready(),
        metrics: state.models.risk.metrics(),
        feature_weights: state.models.risk.feature_importance(top_n),
    })
}
