use std::sync::Arc;

use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{
    config::{Config, ReportingConfig},
    inference::{FeatureRecord, InferencePipeline, top_negative, top_positive},
    router::{
        CapabilityRegistry, CapabilityReply, CapabilityRequest, CapabilityRouter, Intent,
        ResolvedContext, RetrievalOverrides, RetrievalToggles, RouterError,
    },
    session::{
        error::SessionError,
        state::{ScenarioRecord, SessionState},
        types::AnalysisReport,
    },
};

/// One conversation: cached predictions plus routing of follow-up questions.
///
/// Clones share the same state.
#[derive(Clone)]
pub struct Session {
    id: Uuid,
    pipeline: Arc<InferencePipeline>,
    router: Arc<CapabilityRouter>,
    reporting: ReportingConfig,
    state: Arc<Mutex<SessionState>>,
}

impl Session {
    pub fn new(
        pipeline: Arc<InferencePipeline>,
        router: Arc<CapabilityRouter>,
        retrieval_defaults: RetrievalToggles,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            pipeline,
            router,
            reporting: ReportingConfig::default(),
            state: Arc::new(Mutex::new(SessionState::with_retrieval_defaults(
                retrieval_defaults,
            ))),
        }
    }

    pub fn from_config(
        config: &Config,
        pipeline: Arc<InferencePipeline>,
        registry: CapabilityRegistry,
    ) -> Result<Self, RouterError> {
        let router = CapabilityRouter::from_config(&config.router, registry)?;
        Ok(Self::new(pipeline, Arc::new(router), config.router.defaults)
            .with_reporting(config.reporting.clone()))
    }

    pub fn with_reporting(mut self, reporting: ReportingConfig) -> Self {
        self.reporting = reporting;
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Runs inference on the patient's record and makes it the current prediction.
    pub async fn analyze(&self, record: FeatureRecord) -> Result<AnalysisReport, SessionError> {
        let prediction = self.pipeline.run_inference(record.clone())?;
        let report = AnalysisReport {
            top_risk_factors: top_positive(&prediction, self.reporting.top_risk_factors),
            protective_factors: top_negative(&prediction, self.reporting.protective_factors),
            prediction: prediction.clone(),
        };

        self.state.lock().await.set_current(record, prediction);
        tracing::info!(
            target: "session",
            session_id = %self.id,
            risk_score = report.prediction.risk_score,
            risk_level = report.prediction.risk_level.label(),
            "current_prediction_set"
        );
        Ok(report)
    }

    /// Runs inference on a what-if record and appends it to the scenario history.
    pub async fn add_scenario(
        &self,
        record: FeatureRecord,
        label: Option<String>,
    ) -> Result<ScenarioRecord, SessionError> {
        let prediction = self.pipeline.run_inference(record)?;
        let risk_score = prediction.risk_score;

        let (label, history_len) = {
            let mut state = self.state.lock().await;
            let label = state.push_scenario(label, prediction.clone());
            (label, state.scenario_history.len())
        };
        tracing::info!(
            target: "session",
            session_id = %self.id,
            label = %label,
            risk_score = risk_score,
            history_len = history_len,
            "scenario_added"
        );
        Ok(ScenarioRecord { label, prediction })
    }

    /// Routes a free-text question. Never changes session state.
    pub async fn ask(
        &self,
        message: &str,
        overrides: Option<&RetrievalOverrides>,
    ) -> Result<CapabilityReply, SessionError> {
        let state = self.snapshot().await;
        let (intent, context) = self.router.route(message, &state, overrides)?;
        tracing::debug!(
            target: "session",
            session_id = %self.id,
            intent = %intent,
            "question_dispatched"
        );
        Ok(self.router.dispatch(context).await?)
    }

    /// Asks the intervention capability for what-if scenarios over the modifiable risk
    /// factors of the current prediction.
    pub async fn suggest_scenarios(
        &self,
        overrides: Option<&RetrievalOverrides>,
    ) -> Result<CapabilityReply, SessionError> {
        let state = self.snapshot().await;
        let context = self.router.direct(
            Intent::Intervention,
            CapabilityRequest::SuggestScenarios,
            "Suggest what-if scenarios worth exploring".to_string(),
            &state,
            overrides,
        )?;
        self.dispatch_direct(context).await
    }

    /// Explains one feature's contribution to the current prediction.
    pub async fn explain_feature(&self, feature: &str) -> Result<CapabilityReply, SessionError> {
        let state = self.snapshot().await;
        let context = self.router.direct(
            Intent::Explanation,
            CapabilityRequest::ExplainFeature {
                feature: feature.to_string(),
            },
            format!("Explain {feature}"),
            &state,
            None,
        )?;
        self.dispatch_direct(context).await
    }

    async fn dispatch_direct(
        &self,
        context: ResolvedContext,
    ) -> Result<CapabilityReply, SessionError> {
        tracing::debug!(
            target: "session",
            session_id = %self.id,
            intent = %context.intent,
            request = ?context.request,
            "request_dispatched"
        );
        Ok(self.router.dispatch(context).await?)
    }

    pub async fn snapshot(&self) -> SessionState {
        self.state.lock().await.clone()
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("router", &self.router)
            .field("reporting", &self.reporting)
            .finish_non_exhaustive()
    }
}
