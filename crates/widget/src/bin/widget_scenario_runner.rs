use std::cell::RefCell;
use std::env;
use std::path::PathBuf;
use std::rc::Rc;

use futures::FutureExt;
use serde_json::{Value, json};
use snafu::{OptionExt, ResultExt, Snafu, Whatever};
use tracing_subscriber::EnvFilter;

use widget_core::events::RecordingBridge;
use widget_core::input::KeyPress;
use widget_core::widget::SubmitFuture;
use widget_core::{
    FlowEngine, FlowStartTrigger, FlowTransition, NotificationKind, Settings, SettingsStore,
    SubmitOutcome, WidgetContext,
};

#[derive(Debug, Clone)]
struct RunnerArgs {
    scenario: Scenario,
    settings_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy)]
enum Scenario {
    Submit,
    Veto,
    NewlineLimit,
    GateChatbot,
    GateLoad,
    HostForward,
    All,
}

impl Scenario {
    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "submit" => Some(Self::Submit),
            "veto" => Some(Self::Veto),
            "newline_limit" => Some(Self::NewlineLimit),
            "gate_chatbot" => Some(Self::GateChatbot),
            "gate_load" => Some(Self::GateLoad),
            "host_forward" => Some(Self::HostForward),
            "all" => Some(Self::All),
            _ => None,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Submit => "submit",
            Self::Veto => "veto",
            Self::NewlineLimit => "newline_limit",
            Self::GateChatbot => "gate_chatbot",
            Self::GateLoad => "gate_load",
            Self::HostForward => "host_forward",
            Self::All => "all",
        }
    }
}

#[derive(Debug, Snafu)]
enum RunnerError {
    #[snafu(display("missing required --scenario argument"))]
    MissingScenario { stage: &'static str },
    #[snafu(display("missing value for argument '{arg}'"))]
    MissingArgumentValue {
        stage: &'static str,
        arg: &'static str,
    },
    #[snafu(display("unknown scenario '{raw}'"))]
    UnknownScenario { stage: &'static str, raw: String },
    #[snafu(display("unknown argument '{raw}'"))]
    UnknownArgument { stage: &'static str, raw: String },
    #[snafu(display("scenario '{scenario}' failed: {reason}"))]
    ScenarioFailed {
        stage: &'static str,
        scenario: &'static str,
        reason: String,
    },
    #[snafu(display("flow engine rejected submission: {source}"))]
    EngineFailed {
        stage: &'static str,
        source: Whatever,
    },
}

type RunnerResult<T> = Result<T, RunnerError>;

/// Prints what a real conversation engine would receive.
#[derive(Clone, Default)]
struct ConsoleEngine {
    submitted: Rc<RefCell<Vec<String>>>,
}

impl FlowEngine for ConsoleEngine {
    fn flow_started(&mut self) {
        println!("flow_started=true");
    }

    fn submit_text(&mut self, text: String, send_in_chat: bool) -> SubmitFuture {
        println!("submitted_text={text:?} send_in_chat={send_in_chat}");
        self.submitted.borrow_mut().push(text);
        async {
            tokio::task::yield_now().await;
            Ok::<(), Whatever>(())
        }
        .boxed_local()
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if let Err(error) = run().await {
        println!("runner_ok=false");
        eprintln!("runner_error={error}");
        std::process::exit(1);
    }
}

async fn run() -> RunnerResult<()> {
    let args = parse_args(env::args().skip(1))?;
    println!("scenario={}", args.scenario.name());

    let base = match args.settings_path.as_deref() {
        Some(path) => {
            println!("settings_path={}", path.display());
            SettingsStore::load(path).settings().as_ref().clone()
        }
        None => Settings::default(),
    };

    match args.scenario {
        Scenario::Submit => run_submit(base).await,
        Scenario::Veto => run_veto(base),
        Scenario::NewlineLimit => run_newline_limit(base),
        Scenario::GateChatbot => run_gate_chatbot(base),
        Scenario::GateLoad => run_gate_load(base),
        Scenario::HostForward => run_host_forward(base),
        Scenario::All => {
            run_submit(base.clone()).await?;
            run_veto(base.clone())?;
            run_newline_limit(base.clone())?;
            run_gate_chatbot(base.clone())?;
            run_gate_load(base.clone())?;
            run_host_forward(base)
        }
    }?;

    println!("runner_ok=true");
    Ok(())
}

fn parse_args(mut args: impl Iterator<Item = String>) -> RunnerResult<RunnerArgs> {
    let mut scenario = None;
    let mut settings_path = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--scenario" => {
                let raw = args.next().context(MissingArgumentValueSnafu {
                    stage: "parse-args-scenario",
                    arg: "--scenario",
                })?;
                scenario = Some(Scenario::parse(&raw).context(UnknownScenarioSnafu {
                    stage: "parse-args-scenario",
                    raw,
                })?);
            }
            "--settings" => {
                let raw = args.next().context(MissingArgumentValueSnafu {
                    stage: "parse-args-settings",
                    arg: "--settings",
                })?;
                settings_path = Some(PathBuf::from(raw));
            }
            _ => {
                return UnknownArgumentSnafu {
                    stage: "parse-args",
                    raw: arg,
                }
                .fail();
            }
        }
    }

    Ok(RunnerArgs {
        scenario: scenario.context(MissingScenarioSnafu {
            stage: "parse-args",
        })?,
        settings_path,
    })
}

fn ensure(condition: bool, scenario: &'static str, reason: impl Into<String>) -> RunnerResult<()> {
    if condition {
        Ok(())
    } else {
        ScenarioFailedSnafu {
            stage: "check-scenario-expectation",
            scenario,
            reason: reason.into(),
        }
        .fail()
    }
}

async fn run_submit(settings: Settings) -> RunnerResult<()> {
    let engine = ConsoleEngine::default();
    let mut context = WidgetContext::new(settings, engine.clone());
    context.mount();
    context.handle_change("hello there");

    let outcome = context.handle_key_down(&KeyPress::enter());
    println!("key_action={:?}", outcome.action);
    match outcome.submission {
        Some(SubmitOutcome::Accepted(future)) => {
            future.await.context(EngineFailedSnafu {
                stage: "await-submission",
            })?;
            context.finish_submission();
        }
        other => {
            return ScenarioFailedSnafu {
                stage: "submit-enter",
                scenario: "submit",
                reason: format!("expected accepted submission, got {other:?}"),
            }
            .fail();
        }
    }

    ensure(
        context.input().buffer().is_empty(),
        "submit",
        "buffer not cleared after submission",
    )?;
    ensure(
        engine.submitted.borrow().len() == 1,
        "submit",
        "engine did not receive exactly one submission",
    )
}

fn run_veto(settings: Settings) -> RunnerResult<()> {
    let engine = ConsoleEngine::default();
    let mut context = WidgetContext::new(settings, engine.clone());
    context.subscribe(NotificationKind::UserSubmitText, |notification| {
        println!("vetoing={}", notification.data()["inputText"]);
        notification.prevent_default();
        Ok(())
    });
    context.handle_change("blocked message");

    let outcome = context.submit_text();
    println!("submit_outcome={outcome:?}");
    ensure(
        matches!(outcome, SubmitOutcome::Vetoed),
        "veto",
        "listener veto was not honored",
    )?;
    ensure(
        engine.submitted.borrow().is_empty(),
        "veto",
        "vetoed text reached the engine",
    )
}

fn run_newline_limit(mut settings: Settings) -> RunnerResult<()> {
    settings.chat_input.allow_newline = false;
    settings.chat_input.character_limit = Some(5);
    settings.chat_input.show_character_count = true;
    let mut context = WidgetContext::new(settings, ConsoleEngine::default());

    let outcome = context.handle_change("he\nllo world");
    let value = context.input().buffer().value().to_string();
    println!("change_outcome={outcome:?} buffer={value:?}");
    if let Some(counter) = context.character_counter() {
        println!(
            "counter={}/{} reached={}",
            counter.length, counter.limit, counter.reached
        );
    }
    ensure(value == "he ll", "newline_limit", format!("unexpected buffer {value:?}"))
}

fn run_gate_chatbot(mut settings: Settings) -> RunnerResult<()> {
    settings.general.flow_start_trigger = FlowStartTrigger::OnChatbotInteract;
    let mut context = WidgetContext::new(settings, ConsoleEngine::default());

    let mounted = context.mount();
    let first = context.handle_pointer_down();
    let second = context.handle_pointer_down();
    println!("mount={mounted:?} first={:?} second={:?}", first.flow, second.flow);
    ensure(
        mounted == FlowTransition::Pending
            && first.flow == FlowTransition::Started
            && second.flow == FlowTransition::AlreadyStarted,
        "gate_chatbot",
        "flow did not start exactly once on pointer-down",
    )
}

fn run_gate_load(mut settings: Settings) -> RunnerResult<()> {
    settings.general.flow_start_trigger = FlowStartTrigger::OnLoad;
    let mut context = WidgetContext::new(settings, ConsoleEngine::default());

    let mounted = context.mount();
    let explicit = context.start_flow();
    println!("mount={mounted:?} explicit={explicit:?}");
    ensure(
        mounted == FlowTransition::Started && explicit == FlowTransition::AlreadyStarted,
        "gate_load",
        "flow did not start on mount",
    )
}

fn run_host_forward(settings: Settings) -> RunnerResult<()> {
    let mut context = WidgetContext::new(settings, ConsoleEngine::default());
    context.attach_host(RecordingBridge::vetoing([NotificationKind::ToggleAudio]));
    context.set_paths(vec!["start".to_string()]);

    let audio = context.emit(NotificationKind::ToggleAudio, json!({ "newState": true }));
    let injected = context.emit(NotificationKind::PostInjectMessage, Value::Null);
    println!(
        "toggle_audio_vetoed={} post_inject_vetoed={}",
        audio.is_vetoed(),
        injected.is_vetoed()
    );
    ensure(
        audio.is_vetoed() && !injected.is_vetoed(),
        "host_forward",
        "host veto did not follow the cancel policy",
    )
}
