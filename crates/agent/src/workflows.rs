use std::collections::BTreeMap;
use std::sync::Arc;

use intentroute_core::domain::intent::Intent;
use intentroute_core::domain::request::RequestState;

pub const HELP_MESSAGE: &str = "🤖 I can retrieve, analyze, visualize or generate.";

/// A routed handler. Renders the reply for a classified request; the router
/// commits it as the request's `result`.
pub trait Workflow: Send + Sync {
    fn name(&self) -> &'static str;

    fn handle(&self, state: &RequestState) -> String;
}

/// Placeholder that reports what it would do with the extracted entities.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlaceholderWorkflow {
    name: &'static str,
    headline: &'static str,
}

impl PlaceholderWorkflow {
    pub const fn new(name: &'static str, headline: &'static str) -> Self {
        Self { name, headline }
    }
}

impl Workflow for PlaceholderWorkflow {
    fn name(&self) -> &'static str {
        self.name
    }

    fn handle(&self, state: &RequestState) -> String {
        format!("{} for {}", self.headline, state.entities)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HelpWorkflow;

impl Workflow for HelpWorkflow {
    fn name(&self) -> &'static str {
        "help"
    }

    fn handle(&self, _state: &RequestState) -> String {
        HELP_MESSAGE.to_string()
    }
}

pub const RETRIEVE: PlaceholderWorkflow = PlaceholderWorkflow::new("retrieve", "📦 Retrieving data");
pub const ANALYZE: PlaceholderWorkflow = PlaceholderWorkflow::new("analyze", "📊 Analyzing data");
pub const VISUALIZE: PlaceholderWorkflow =
    PlaceholderWorkflow::new("visualize", "📈 Visualizing data");
pub const GENERATE: PlaceholderWorkflow =
    PlaceholderWorkflow::new("generate", "📝 Generating output");

/// Immutable intent to handler table, fixed once built.
///
/// The fallback is the registered `help` handler, or [`HelpWorkflow`] when the
/// table was built without one.
#[derive(Clone)]
pub struct WorkflowRegistry {
    handlers: BTreeMap<Intent, Arc<dyn Workflow>>,
    fallback: Arc<dyn Workflow>,
}

impl WorkflowRegistry {
    pub fn builder() -> WorkflowRegistryBuilder {
        WorkflowRegistryBuilder::default()
    }

    /// One placeholder handler per allowed intent.
    pub fn standard() -> Self {
        Self::builder()
            .register(Intent::Retrieve, RETRIEVE)
            .register(Intent::Analyze, ANALYZE)
            .register(Intent::Visualize, VISUALIZE)
            .register(Intent::Generate, GENERATE)
            .register(Intent::Help, HelpWorkflow)
            .build()
    }

    pub fn get(&self, intent: Intent) -> Option<&Arc<dyn Workflow>> {
        self.handlers.get(&intent)
    }

    pub fn fallback(&self) -> &Arc<dyn Workflow> {
        &self.fallback
    }

    pub fn intents(&self) -> impl Iterator<Item = Intent> + '_ {
        self.handlers.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl Default for WorkflowRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

#[derive(Default)]
pub struct WorkflowRegistryBuilder {
    handlers: BTreeMap<Intent, Arc<dyn Workflow>>,
}

impl WorkflowRegistryBuilder {
    /// Later registrations for the same intent replace earlier ones.
    pub fn register(mut self, intent: Intent, workflow: impl Workflow + 'static) -> Self {
        self.handlers.insert(intent, Arc::new(workflow));
        self
    }

    pub fn build(self) -> WorkflowRegistry {
        let fallback = self
            .handlers
            .get(&Intent::Help)
            .cloned()
            .unwrap_or_else(|| Arc::new(HelpWorkflow) as Arc<dyn Workflow>);
        WorkflowRegistry { handlers: self.handlers, fallback }
    }
}
