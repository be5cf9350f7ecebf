//! Voice Query Orchestrator
//!
//! Runs one voice query through five ordered stages. Each stage either hands
//! its result forward or ends the run in a terminal [`QueryOutcome`]; there is
//! no backward transition and no stage-level retry except inside answer
//! generation, which goes through the [`ResilientCaller`].
//!
//! The citation is always the URL of the first raw search result, regardless
//! of which passages ranking keeps as context.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::Instrument;
use uuid::Uuid;
use voxpedia_config::{PipelineConfig, Settings};
use voxpedia_core::{
    Embedder, Error, Language, LanguageModel, Result, SearchDepth, SearchHit, SpeechToText,
    Translator, VoiceQuery, WebSearch,
};
use voxpedia_llm::{
    CallOutcome, GeminiBackend, GroundedPrompt, LlmConfig, ResilientCaller, RetryPolicy, Sleeper,
    TokioSleeper,
};
use voxpedia_rag::{create_embedder, ranker, TavilyConfig, TavilySearch};
use voxpedia_text_processing::create_translator;

use crate::stt::{HttpSttBackend, HttpSttConfig};

/// Citation placeholder for runs that end before search results exist
pub const NO_CITATION: &str = "N/A";

/// Terminal state of a pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryOutcome {
    /// Grounded answer generated
    Answered,
    /// ASR unreachable, non-success HTTP, or service-side processing error
    AsrUnavailable,
    /// ASR succeeded but produced no text
    EmptyTranscript,
    /// Translation errored or came back empty
    TranslationFailed,
    /// Web search errored
    SearchFailed,
    /// Web search returned nothing
    NoInformationFound,
    /// Answer generation stayed rate-limited for every attempt
    AnswerServiceOverloaded,
    /// Answer generation failed with a non-retryable error
    AnswerFailed,
}

impl QueryOutcome {
    /// Stable label for logs and metrics
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryOutcome::Answered => "answered",
            QueryOutcome::AsrUnavailable => "asr_unavailable",
            QueryOutcome::EmptyTranscript => "empty_transcript",
            QueryOutcome::TranslationFailed => "translation_failed",
            QueryOutcome::SearchFailed => "search_failed",
            QueryOutcome::NoInformationFound => "no_information_found",
            QueryOutcome::AnswerServiceOverloaded => "answer_service_overloaded",
            QueryOutcome::AnswerFailed => "answer_failed",
        }
    }

    /// User-facing message for terminal states that carry no generated text
    pub fn message(&self) -> Option<&'static str> {
        match self {
            QueryOutcome::Answered | QueryOutcome::AnswerFailed => None,
            QueryOutcome::AsrUnavailable => {
                Some("Speech recognition service is unavailable. Is the ASR server running?")
            }
            QueryOutcome::EmptyTranscript => {
                Some("The ASR could not extract any text. Please check audio quality/format.")
            }
            QueryOutcome::TranslationFailed => {
                Some("Translation failed. Check the translation API key.")
            }
            QueryOutcome::SearchFailed => Some("Web search failed. Please try again later."),
            QueryOutcome::NoInformationFound => Some("No relevant information found on the web."),
            QueryOutcome::AnswerServiceOverloaded => {
                Some("The answer service is currently overloaded. Please try again in a minute.")
            }
        }
    }

    /// Whether the run produced an answer the user can read as such
    pub fn is_answer(&self) -> bool {
        matches!(
            self,
            QueryOutcome::Answered | QueryOutcome::AnswerServiceOverloaded
        )
    }
}

impl fmt::Display for QueryOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Answer text plus exactly one citation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VoiceAnswer {
    pub request_id: Uuid,
    pub text: String,
    /// First raw search result URL, or [`NO_CITATION`]
    pub citation: String,
    pub outcome: QueryOutcome,
}

impl VoiceAnswer {
    fn terminal(request_id: Uuid, outcome: QueryOutcome) -> Self {
        Self {
            request_id,
            text: outcome.message().unwrap_or_default().to_string(),
            citation: NO_CITATION.to_string(),
            outcome,
        }
    }

    fn cited(request_id: Uuid, outcome: QueryOutcome, text: String, citation: &str) -> Self {
        Self {
            request_id,
            text,
            citation: citation.to_string(),
            outcome,
        }
    }

    /// Chat-style rendering: answer then source
    pub fn to_markdown(&self) -> String {
        format!("**Answer:** {}\n\n**Source:** {}", self.text, self.citation)
    }
}

/// Remote collaborators, built once and shared by every run
#[derive(Clone)]
pub struct Collaborators {
    pub stt: Arc<dyn SpeechToText>,
    pub translator: Arc<dyn Translator>,
    pub search: Arc<dyn WebSearch>,
    pub embedder: Arc<dyn Embedder>,
    pub llm: Arc<dyn LanguageModel>,
}

/// Build the production collaborators from settings
pub fn build_collaborators(settings: &Settings) -> Result<Collaborators> {
    let stt = HttpSttBackend::new(HttpSttConfig::from(&settings.asr))?;
    let translator = create_translator(&settings.translation)?;
    let search = TavilySearch::new(TavilyConfig::from_settings(
        &settings.search,
        settings.pipeline.max_search_results,
    ))?;
    let embedder = create_embedder(&settings.embedding)?;
    let llm = GeminiBackend::new(LlmConfig::from(&settings.llm))?;

    tracing::info!(
        asr = %settings.asr.endpoint,
        translator = translator.name(),
        embedder = embedder.model_name(),
        llm = llm.model_name(),
        "Pipeline collaborators ready"
    );

    Ok(Collaborators {
        stt: Arc::new(stt),
        translator,
        search: Arc::new(search),
        embedder,
        llm: Arc::new(llm),
    })
}

/// Per-deployment pipeline parameters
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    /// Language assumed when a request does not name one
    pub source_language: Language,
    /// Language search and generation work in
    pub target_language: Language,
    /// Passages kept as grounding context
    pub top_k: usize,
    pub search_depth: SearchDepth,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self::from(&PipelineConfig::default())
    }
}

impl From<&PipelineConfig> for PipelineSettings {
    fn from(config: &PipelineConfig) -> Self {
        Self {
            source_language: config.source_language,
            target_language: config.target_language,
            top_k: config.top_k,
            search_depth: config.search_depth,
        }
    }
}

/// Voice query pipeline
pub struct VoiceQueryPipeline {
    collaborators: Collaborators,
    settings: PipelineSettings,
    caller: ResilientCaller<Arc<dyn Sleeper>>,
}

impl VoiceQueryPipeline {
    pub fn new(collaborators: Collaborators, settings: PipelineSettings, policy: RetryPolicy) -> Self {
        Self {
            collaborators,
            settings,
            caller: ResilientCaller::with_sleeper(policy, Arc::new(TokioSleeper)),
        }
    }

    /// Build the production pipeline from loaded settings
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Ok(Self::new(
            build_collaborators(settings)?,
            PipelineSettings::from(&settings.pipeline),
            RetryPolicy::from_config(&settings.retry),
        ))
    }

    /// Replace the backoff clock
    #[must_use]
    pub fn with_sleeper(self, sleeper: Arc<dyn Sleeper>) -> Self {
        let policy = self.caller.policy().clone();
        Self {
            caller: ResilientCaller::with_sleeper(policy, sleeper),
            ..self
        }
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// Answer a spoken question.
    ///
    /// Always yields a text/citation pair; stage failures are reported through
    /// [`VoiceAnswer::outcome`]. The only `Err` is an embedding failure.
    pub async fn process_voice_query(
        &self,
        audio: impl Into<Bytes>,
        language: Language,
    ) -> Result<VoiceAnswer> {
        self.run(VoiceQuery::new(audio, language)).await
    }

    /// Run a prepared query
    pub async fn run(&self, query: VoiceQuery) -> Result<VoiceAnswer> {
        let request_id = Uuid::new_v4();
        let span = tracing::info_span!(
            "voice_query",
            %request_id,
            lang = %query.language(),
            audio_bytes = query.audio().len()
        );

        async move {
            let start = Instant::now();
            let result = self.execute(request_id, query).await;
            match &result {
                Ok(answer) => tracing::info!(
                    outcome = %answer.outcome,
                    total_ms = start.elapsed().as_millis() as u64,
                    "Voice query finished"
                ),
                Err(e) => tracing::error!(
                    error = %e,
                    total_ms = start.elapsed().as_millis() as u64,
                    "Voice query failed"
                ),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn execute(&self, request_id: Uuid, query: VoiceQuery) -> Result<VoiceAnswer> {
        let language = query.language();

        // 1. transcribe
        let stage = Instant::now();
        let transcript = match self.collaborators.stt.transcribe(&query).await {
            Ok(result) if result.success => result.text,
            Ok(result) => {
                tracing::warn!(message = %result.text, "ASR could not process the recording");
                return Ok(VoiceAnswer::terminal(request_id, QueryOutcome::AsrUnavailable));
            }
            Err(e) => {
                tracing::warn!(error = %e, "ASR unavailable");
                return Ok(VoiceAnswer::terminal(request_id, QueryOutcome::AsrUnavailable));
            }
        };
        drop(query);
        log_stage("transcribe", stage);

        let transcript = transcript.trim();
        if transcript.is_empty() {
            tracing::warn!("ASR returned an empty transcript");
            return Ok(VoiceAnswer::terminal(request_id, QueryOutcome::EmptyTranscript));
        }
        tracing::debug!(transcript, "Transcribed");

        // 2. translate
        let stage = Instant::now();
        let Some(search_query) = self.translate(transcript, language).await else {
            return Ok(VoiceAnswer::terminal(request_id, QueryOutcome::TranslationFailed));
        };
        log_stage("translate", stage);
        tracing::debug!(query = %search_query, "Translated");

        // 3. search
        let stage = Instant::now();
        let hits = match self
            .collaborators
            .search
            .search(&search_query, self.settings.search_depth)
            .await
        {
            Ok(hits) => hits,
            Err(e) => {
                tracing::warn!(error = %e, "Web search failed");
                return Ok(VoiceAnswer::terminal(request_id, QueryOutcome::SearchFailed));
            }
        };
        log_stage("search", stage);

        let Some(citation) = hits.first().map(|h| citation_for(&h.url)) else {
            tracing::info!("Web search returned no results");
            return Ok(VoiceAnswer::terminal(request_id, QueryOutcome::NoInformationFound));
        };
        tracing::debug!(results = hits.len(), %citation, "Search complete");

        // 4. rank
        let stage = Instant::now();
        let context = self.rank_context(&search_query, &hits).await?;
        log_stage("rank", stage);

        // 5. answer
        let stage = Instant::now();
        let prompt = GroundedPrompt::new(search_query.as_str())
            .with_context(context)
            .build();
        let llm: &dyn LanguageModel = self.collaborators.llm.as_ref();
        let prompt = prompt.as_str();

        let answer = match self.caller.call(move || llm.generate(prompt)).await {
            Ok(CallOutcome::Completed { value, attempts }) => {
                tracing::debug!(attempts, "Answer generated");
                VoiceAnswer::cited(request_id, QueryOutcome::Answered, value, &citation)
            }
            Ok(CallOutcome::Exhausted { attempts }) => {
                tracing::warn!(attempts, "Answer service overloaded");
                let outcome = QueryOutcome::AnswerServiceOverloaded;
                let text = outcome.message().unwrap_or_default().to_string();
                VoiceAnswer::cited(request_id, outcome, text, &citation)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Answer generation failed");
                VoiceAnswer::cited(
                    request_id,
                    QueryOutcome::AnswerFailed,
                    format!("Answer generation error: {}", e),
                    &citation,
                )
            }
        };
        log_stage("answer", stage);

        Ok(answer)
    }

    /// Render the transcript into the target language. `None` ends the run.
    async fn translate(&self, transcript: &str, from: Language) -> Option<String> {
        let to = self.settings.target_language;
        if from == to {
            return Some(transcript.to_string());
        }

        match self.collaborators.translator.translate(transcript, from, to).await {
            Ok(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
            Ok(_) => {
                tracing::warn!(%from, %to, "Translation came back empty");
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, %from, %to, "Translation failed");
                None
            }
        }
    }

    /// Embed query and passages, returning the nearest passages, nearest first
    async fn rank_context(&self, query: &str, hits: &[SearchHit]) -> Result<Vec<String>> {
        let mut inputs: Vec<&str> = Vec::with_capacity(hits.len() + 1);
        inputs.push(query);
        inputs.extend(hits.iter().map(|h| h.content.as_str()));

        let mut vectors = self
            .collaborators
            .embedder
            .embed(&inputs)
            .await
            .map_err(into_embedding_error)?;

        if vectors.len() != inputs.len() {
            return Err(Error::Embedding(format!(
                "Expected {} embeddings, got {}",
                inputs.len(),
                vectors.len()
            )));
        }

        let query_vector = vectors.remove(0);
        let ranked = ranker::rank(&query_vector, &vectors, self.settings.top_k)
            .map_err(|e| Error::Embedding(e.to_string()))?;

        tracing::debug!(?ranked, "Ranked passages");
        Ok(ranked
            .into_iter()
            .map(|i| hits[i].content.clone())
            .collect())
    }
}

fn into_embedding_error(err: Error) -> Error {
    match err {
        Error::Embedding(_) => err,
        other => Error::Embedding(other.to_string()),
    }
}

/// The first raw result is always the citation, even when its URL is blank
fn citation_for(url: &str) -> String {
    let url = url.trim();
    if url.is_empty() {
        NO_CITATION.to_string()
    } else {
        url.to_string()
    }
}

fn log_stage(stage: &'static str, started: Instant) {
    tracing::debug!(stage, elapsed_ms = started.elapsed().as_millis() as u64, "Stage complete");
}
