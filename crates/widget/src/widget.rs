use std::fmt;
use std::sync::Arc;

use futures::future::LocalBoxFuture;
use serde_json::Value;
use snafu::Whatever;

use crate::events::{
    EventDetail, HostBridge, ListenerId, ListenerResult, Notification, NotificationEmitter,
    NotificationKind, SubmitTextData,
};
use crate::gate::{FlowTransition, InteractionGate};
use crate::input::{
    BotStates, ChangeOutcome, CharacterCounter, InputMode, InputPipeline, InputStyle,
    InputSurface, KeyAction, KeyPress,
};
use crate::settings::{Settings, SettingsStore};
use crate::snapshot::{Message, Snapshot, SnapshotList, Styles};

pub type SubmitFuture = LocalBoxFuture<'static, Result<(), Whatever>>;

/// Conversation engine driven by the widget; it runs outside the core.
pub trait FlowEngine {
    /// Called exactly once, when the gate authorizes the flow.
    fn flow_started(&mut self);

    /// Receives accepted user text. The returned future may suspend freely;
    /// the widget holds no buffer borrow while it runs.
    fn submit_text(&mut self, text: String, send_in_chat: bool) -> SubmitFuture;
}

pub enum SubmitOutcome {
    /// Nothing but whitespace in the buffer.
    Empty,
    Disabled,
    /// A listener prevented the default; the buffer is left untouched.
    Vetoed,
    Accepted(SubmitFuture),
}

impl SubmitOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }
}

impl fmt::Debug for SubmitOutcome {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => formatter.write_str("Empty"),
            Self::Disabled => formatter.write_str("Disabled"),
            Self::Vetoed => formatter.write_str("Vetoed"),
            Self::Accepted(_) => formatter.write_str("Accepted(..)"),
        }
    }
}

#[derive(Debug)]
pub struct KeyDownOutcome {
    pub action: KeyAction,
    pub submission: Option<SubmitOutcome>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerOutcome {
    /// The host must stop the event from reaching ancestor handlers.
    pub stop_propagation: bool,
    pub flow: FlowTransition,
}

/// All interaction state of one widget instance.
///
/// Nothing here is global: two contexts never observe each other's buffer,
/// gate or listeners.
pub struct WidgetContext {
    settings: SettingsStore,
    styles: Arc<Styles>,
    messages: SnapshotList<Message>,
    paths: SnapshotList<String>,
    states: BotStates,
    /// Set while `text_area_disabled` is held by `block_spam`.
    spam_hold: bool,
    gate: InteractionGate,
    input: InputPipeline,
    emitter: NotificationEmitter,
    engine: Box<dyn FlowEngine>,
}

impl WidgetContext {
    pub fn new(settings: Settings, engine: impl FlowEngine + 'static) -> Self {
        Self::with_store(SettingsStore::new(settings), engine)
    }

    pub fn with_store(settings: SettingsStore, engine: impl FlowEngine + 'static) -> Self {
        Self {
            settings,
            styles: Arc::new(Styles::default()),
            messages: SnapshotList::default(),
            paths: SnapshotList::default(),
            states: BotStates::default(),
            spam_hold: false,
            gate: InteractionGate::new(),
            input: InputPipeline::new(),
            emitter: NotificationEmitter::new(),
            engine: Box::new(engine),
        }
    }

    pub fn settings(&self) -> Arc<Settings> {
        self.settings.settings()
    }

    pub fn update_settings(&self, settings: Settings) {
        self.settings.update(settings);
    }

    pub fn set_styles(&mut self, styles: Styles) {
        self.styles = Arc::new(styles);
    }

    pub fn push_message(&self, message: Message) {
        self.messages.push(message);
    }

    pub fn set_paths(&self, paths: Vec<String>) {
        self.paths.replace(paths);
    }

    pub fn bot_states(&self) -> BotStates {
        self.states
    }

    /// Replaces the host-owned flags. The host's value for
    /// `text_area_disabled` wins over any pending `block_spam` hold.
    pub fn set_bot_states(&mut self, states: BotStates) {
        self.states = states;
        self.spam_hold = false;
        if states.text_area_disabled {
            self.input.handle_blur();
        }
    }

    pub fn gate(&self) -> &InteractionGate {
        &self.gate
    }

    pub fn input(&self) -> &InputPipeline {
        &self.input
    }

    pub fn subscribe<F>(&mut self, kind: NotificationKind, listener: F) -> ListenerId
    where
        F: FnMut(&Notification) -> ListenerResult + 'static,
    {
        self.emitter.bus_mut().subscribe(kind, listener)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.emitter.bus_mut().unsubscribe(id)
    }

    pub fn attach_host(&mut self, bridge: impl HostBridge + 'static) {
        self.emitter.attach_host(bridge);
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            settings: self.settings.settings(),
            styles: Arc::clone(&self.styles),
            messages: self.messages.current(),
            paths: self.paths.current(),
        }
    }

    /// Announces `kind` with the current snapshot. The caller performs the
    /// default action only if the returned notification is not vetoed.
    pub fn emit(&mut self, kind: NotificationKind, data: Value) -> Notification {
        let snapshot = self.snapshot();
        let detail = EventDetail::from_paths(&snapshot.paths);
        self.emitter.emit(kind, detail, data, snapshot)
    }

    pub fn mount(&mut self) -> FlowTransition {
        let trigger = self.settings.settings().general.flow_start_trigger;
        let transition = self.gate.on_mount(trigger);
        self.notify_flow(transition)
    }

    pub fn start_flow(&mut self) -> FlowTransition {
        let transition = self.gate.start_flow();
        self.notify_flow(transition)
    }

    pub fn handle_change(&mut self, raw: &str) -> ChangeOutcome {
        let settings = self.settings.settings();
        self.input
            .handle_change(raw, self.states.mode(), &settings.chat_input)
    }

    pub fn handle_key_down(&mut self, key: &KeyPress) -> KeyDownOutcome {
        let settings = self.settings.settings();
        let action = self.input.handle_key_down(key, &settings.chat_input);
        let submission = match action {
            KeyAction::Submit => Some(self.submit_text()),
            KeyAction::Default | KeyAction::Suppress => None,
        };
        KeyDownOutcome { action, submission }
    }

    pub fn handle_focus(&mut self) -> bool {
        self.input.handle_focus(self.states.mode())
    }

    pub fn handle_blur(&mut self) {
        self.input.handle_blur();
    }

    /// Pointer-down on the input surface.
    pub fn handle_pointer_down(&mut self) -> PointerOutcome {
        let flow = self.offer_chatbot_interaction();
        PointerOutcome {
            stop_propagation: true,
            flow,
        }
    }

    /// Any interaction elsewhere on the hosting page.
    pub fn handle_page_interaction(&mut self) -> FlowTransition {
        let trigger = self.settings.settings().general.flow_start_trigger;
        let transition = self.gate.on_page_interact(trigger);
        self.notify_flow(transition)
    }

    /// Announces the buffer as `UserSubmitText` and, unless vetoed, clears it
    /// and hands the text to the flow engine.
    pub fn submit_text(&mut self) -> SubmitOutcome {
        if self.states.mode() == InputMode::Disabled {
            return SubmitOutcome::Disabled;
        }
        let Some(text) = self.input.pending_text() else {
            return SubmitOutcome::Empty;
        };
        self.offer_chatbot_interaction();

        let settings = self.settings.settings();
        let send_in_chat = !(self.states.text_area_sensitive_mode
            && settings.sensitive_input.hide_in_user_bubble);
        let payload = SubmitTextData {
            input_text: text.clone(),
            send_in_chat,
        };
        let data = serde_json::to_value(&payload).unwrap_or_else(|error| {
            tracing::warn!("failed to encode submit payload: {}", error);
            Value::Null
        });

        let notification = self.emit(NotificationKind::UserSubmitText, data);
        if notification.is_vetoed() {
            return SubmitOutcome::Vetoed;
        }

        self.input.clear();
        if settings.chat_input.block_spam {
            self.states.text_area_disabled = true;
            self.spam_hold = true;
            self.input.handle_blur();
        }
        SubmitOutcome::Accepted(self.engine.submit_text(text, send_in_chat))
    }

    /// Re-enables input held back by `block_spam` once the engine is done.
    pub fn finish_submission(&mut self) {
        if self.spam_hold {
            self.states.text_area_disabled = false;
            self.spam_hold = false;
        }
    }

    pub fn placeholder(&self) -> String {
        let settings = self.settings.settings();
        self.input
            .placeholder(self.states.mode(), &settings.chat_input)
            .to_string()
    }

    pub fn surface(&self) -> InputSurface {
        self.input.surface(self.states, &self.settings.settings())
    }

    pub fn style(&self) -> InputStyle {
        self.input.style(self.states.mode())
    }

    pub fn focus_ring_color(&self) -> Option<String> {
        self.input
            .focus_ring_color(self.states.mode(), &self.settings.settings())
            .map(str::to_string)
    }

    pub fn character_counter(&self) -> Option<CharacterCounter> {
        self.input
            .character_counter(&self.settings.settings().chat_input)
    }

    fn offer_chatbot_interaction(&mut self) -> FlowTransition {
        let trigger = self.settings.settings().general.flow_start_trigger;
        let transition = self.gate.on_chatbot_interact(trigger);
        self.notify_flow(transition)
    }

    fn notify_flow(&mut self, transition: FlowTransition) -> FlowTransition {
        if transition.is_started() {
            self.engine.flow_started();
        }
        transition
    }
}
