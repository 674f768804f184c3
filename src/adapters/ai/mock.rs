//! Mock implementations of the AI ports for testing.
//!
//! Both mocks consume a scripted queue of responses and record every request
//! they receive, so tests can drive the orchestrator through provider
//! outages without touching the network.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::domain::foundation::SlotId;
use crate::domain::slots::SlotVerdicts;
use crate::ports::{
    ClassificationError, ClassificationRequest, GenerationError, GenerationRequest,
    ReplyGenerator, SlotClassifier,
};

/// Failure modes the mocks can be scripted with.
#[derive(Debug, Clone)]
pub enum MockFailure {
    RequestFailed(String),
    Timeout { seconds: u64 },
    RateLimited,
}

impl From<MockFailure> for ClassificationError {
    fn from(failure: MockFailure) -> Self {
        match failure {
            MockFailure::RequestFailed(message) => ClassificationError::RequestFailed(message),
            MockFailure::Timeout { seconds } => ClassificationError::Timeout { seconds },
            MockFailure::RateLimited => ClassificationError::RateLimited,
        }
    }
}

impl From<MockFailure> for GenerationError {
    fn from(failure: MockFailure) -> Self {
        match failure {
            MockFailure::RequestFailed(message) => GenerationError::RequestFailed(message),
            MockFailure::Timeout { seconds } => GenerationError::Timeout { seconds },
            MockFailure::RateLimited => GenerationError::RateLimited,
        }
    }
}

#[derive(Debug, Clone)]
enum ClassifierScript {
    Verdicts(SlotVerdicts),
    Failure(MockFailure),
}

/// Mock slot classifier with scripted verdicts.
#[derive(Clone)]
pub struct MockSlotClassifier {
    responses: Arc<Mutex<VecDeque<ClassifierScript>>>,
    calls: Arc<Mutex<Vec<ClassificationRequest>>>,
}

impl MockSlotClassifier {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queues one verdict map to return.
    pub fn with_verdicts<I, S>(self, verdicts: I) -> Self
    where
        I: IntoIterator<Item = (S, bool)>,
        S: Into<String>,
    {
        let verdicts = verdicts
            .into_iter()
            .map(|(id, verdict)| (SlotId::new(id), verdict))
            .collect();
        self.responses
            .lock()
            .unwrap()
            .push_back(ClassifierScript::Verdicts(verdicts));
        self
    }

    /// Queues one failure to return.
    pub fn with_failure(self, failure: MockFailure) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(ClassifierScript::Failure(failure));
        self
    }

    /// Number of classify calls received.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// All requests received so far.
    pub fn calls(&self) -> Vec<ClassificationRequest> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for MockSlotClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SlotClassifier for MockSlotClassifier {
    async fn classify(
        &self,
        request: ClassificationRequest,
    ) -> Result<SlotVerdicts, ClassificationError> {
        self.calls.lock().unwrap().push(request);

        let next = self.responses.lock().unwrap().pop_front();
        match next {
            Some(ClassifierScript::Verdicts(verdicts)) => Ok(verdicts),
            Some(ClassifierScript::Failure(failure)) => Err(failure.into()),
            // Queue exhausted: report nothing observed.
            None => Ok(SlotVerdicts::new()),
        }
    }
}

#[derive(Debug, Clone)]
enum GeneratorScript {
    Reply(String),
    Failure(MockFailure),
}

/// Mock reply generator with scripted replies.
#[derive(Clone)]
pub struct MockReplyGenerator {
    responses: Arc<Mutex<VecDeque<GeneratorScript>>>,
    calls: Arc<Mutex<Vec<GenerationRequest>>>,
}

impl MockReplyGenerator {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queues one reply to return.
    pub fn with_reply(self, reply: impl Into<String>) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(GeneratorScript::Reply(reply.into()));
        self
    }

    /// Queues one failure to return.
    pub fn with_failure(self, failure: MockFailure) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(GeneratorScript::Failure(failure));
        self
    }

    /// Number of generate calls received.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// All requests received so far.
    pub fn calls(&self) -> Vec<GenerationRequest> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for MockReplyGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReplyGenerator for MockReplyGenerator {
    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError> {
        self.calls.lock().unwrap().push(request);

        let next = self.responses.lock().unwrap().pop_front();
        match next {
            Some(GeneratorScript::Reply(reply)) => Ok(reply),
            Some(GeneratorScript::Failure(failure)) => Err(failure.into()),
            None => Ok("Mock reply.".to_string()),
        }
    }
}
