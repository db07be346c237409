use serde::{Deserialize, Serialize};

/// Which qualifying event authorizes the flow to begin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlowStartTrigger {
    #[default]
    OnLoad,
    OnChatbotInteract,
    OnPageInteract,
}

/// Outcome of offering one event to the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowTransition {
    /// This call flipped the flag.
    Started,
    AlreadyStarted,
    /// The event does not match the configured trigger.
    Pending,
}

impl FlowTransition {
    pub fn is_started(self) -> bool {
        matches!(self, Self::Started)
    }
}

/// Monotonic interaction flags for one widget instance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InteractionState {
    has_flow_started: bool,
    has_interacted_page: bool,
}

impl InteractionState {
    pub fn has_flow_started(&self) -> bool {
        self.has_flow_started
    }

    pub fn has_interacted_page(&self) -> bool {
        self.has_interacted_page
    }

    pub fn start_flow(&mut self) -> FlowTransition {
        if self.has_flow_started {
            return FlowTransition::AlreadyStarted;
        }
        self.has_flow_started = true;
        FlowTransition::Started
    }

    /// Returns true only for the first recorded interaction.
    pub fn record_page_interaction(&mut self) -> bool {
        let first = !self.has_interacted_page;
        self.has_interacted_page = true;
        first
    }

    /// Starts the flow when `source` is the configured trigger.
    pub fn offer(&mut self, trigger: FlowStartTrigger, source: FlowStartTrigger) -> FlowTransition {
        if self.has_flow_started {
            FlowTransition::AlreadyStarted
        } else if trigger == source {
            self.start_flow()
        } else {
            FlowTransition::Pending
        }
    }
}

/// Decides when the conversational flow may begin.
///
/// Every qualifying event is evaluated until the first transition; afterwards
/// each event reports `AlreadyStarted`.
#[derive(Debug, Clone, Default)]
pub struct InteractionGate {
    state: InteractionState,
}

impl InteractionGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    pub fn has_flow_started(&self) -> bool {
        self.state.has_flow_started()
    }

    pub fn has_interacted_page(&self) -> bool {
        self.state.has_interacted_page()
    }

    /// Explicit "start now", regardless of trigger.
    pub fn start_flow(&mut self) -> FlowTransition {
        Self::log(self.state.start_flow())
    }

    pub fn on_mount(&mut self, trigger: FlowStartTrigger) -> FlowTransition {
        Self::log(self.state.offer(trigger, FlowStartTrigger::OnLoad))
    }

    /// Pointer-down or submission on the chat surface.
    pub fn on_chatbot_interact(&mut self, trigger: FlowStartTrigger) -> FlowTransition {
        self.state.record_page_interaction();
        Self::log(self.state.offer(trigger, FlowStartTrigger::OnChatbotInteract))
    }

    /// Pointer, key or touch input anywhere on the page.
    pub fn on_page_interact(&mut self, trigger: FlowStartTrigger) -> FlowTransition {
        self.state.record_page_interaction();
        Self::log(self.state.offer(trigger, FlowStartTrigger::OnPageInteract))
    }

    fn log(transition: FlowTransition) -> FlowTransition {
        if transition.is_started() {
            tracing::info!("conversation flow started");
        }
        transition
    }
}
