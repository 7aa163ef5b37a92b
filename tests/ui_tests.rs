//! UI automation tests using egui_kittest and AccessKit
//!
//! These tests render the real components and check the accessibility tree
//! and the actions the input bar reports.

use egui_kittest::kittest::Queryable;
use egui_kittest::Harness;
use retail_assistant::messages::{ChartType, Message, Reply, Row, Visualization};
use retail_assistant::render::ResponseRenderer;
use retail_assistant::ui::components::{InputAction, InputBar, MessageList, NoticeWindow};
use retail_assistant::ui::{Theme, UiState};
use serde_json::json;

/// Component state wrapper for testing
#[derive(Default)]
struct TestApp {
    state: UiState,
    theme: Theme,
    renderer: ResponseRenderer,
    messages: Vec<Message>,
    pending: bool,
    listening: bool,
    voice_input: bool,
    actions: Vec<InputAction>,
}

impl TestApp {
    fn new() -> Self {
        Self {
            voice_input: true,
            ..Default::default()
        }
    }

    fn with_message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }

    fn pending(mut self) -> Self {
        self.pending = true;
        self
    }
}

fn render_app(ctx: &egui::Context, app: &mut TestApp) {
    egui::TopBottomPanel::bottom("input").show(ctx, |ui| {
        let action = InputBar::new(&mut app.state, &app.theme)
            .pending(app.pending)
            .listening(app.listening)
            .voice_input(app.voice_input)
            .show(ui);
        if let Some(action) = action {
            app.actions.push(action);
        }
    });

    egui::CentralPanel::default().show(ctx, |ui| {
        MessageList::new(&app.messages, &app.renderer, &app.theme)
            .pending(app.pending)
            .show(ui);
    });

    NoticeWindow::new(&mut app.state, &app.theme).show(ctx);
}

fn harness(app: TestApp) -> Harness<'static, TestApp> {
    Harness::builder()
        .with_size(egui::Vec2::new(700.0, 700.0))
        .build_state(render_app, app)
}

fn rows(value: serde_json::Value) -> Vec<Row> {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_object().cloned().unwrap())
        .collect()
}

/// Test that the input controls exist and are accessible
#[test]
fn test_input_controls_exist() {
    let mut harness = harness(TestApp::new());
    harness.run();

    let _input = harness.get_by_label("Message input");
    let _send = harness.get_by_label("Send message");
    let _mic = harness.get_by_label("Start voice input");
}

/// Test that typing and clicking send reports the trimmed query
#[test]
fn test_send_reports_query_and_clears_input() {
    let mut harness = harness(TestApp::new());
    harness.run();

    harness.get_by_label("Message input").focus();
    harness.run();

    harness.get_by_label("Message input").type_text("  top 5 stores  ");
    harness.run();
    assert_eq!(harness.state().state.input_text, "  top 5 stores  ");

    harness.get_by_label("Send message").click();
    harness.run();

    assert_eq!(
        harness.state().actions,
        vec![InputAction::Send("top 5 stores".to_string())]
    );
    assert!(harness.state().state.input_text.is_empty());
}

/// Test that empty input cannot be sent
#[test]
fn test_cannot_send_empty_message() {
    let mut harness = harness(TestApp::new());
    harness.run();

    harness.get_by_label("Send message").click();
    harness.run();

    assert!(harness.state().actions.is_empty());
}

/// Test that nothing is sent while a reply is pending
#[test]
fn test_cannot_send_while_pending() {
    let mut app = TestApp::new().pending();
    app.state.input_text = "another question".to_string();

    let mut harness = harness(app);
    harness.run();

    harness.get_by_label("Send message").click();
    harness.run();

    assert!(harness.state().actions.is_empty());
    assert_eq!(harness.state().state.input_text, "another question");
    let _loading = harness.get_by_label("Waiting for reply");
}

/// Test that the microphone toggles listening
#[test]
fn test_mic_button_actions() {
    let mut harness = harness(TestApp::new());
    harness.run();

    harness.get_by_label("Start voice input").click();
    harness.run();
    assert_eq!(harness.state().actions, vec![InputAction::StartListening]);

    harness.state_mut().listening = true;
    harness.state_mut().actions.clear();
    harness.run();

    harness.get_by_label("Stop voice input").click();
    harness.run();
    assert_eq!(harness.state().actions, vec![InputAction::StopListening]);
}

/// Test that the microphone is hidden when voice input is off
#[test]
fn test_mic_hidden_without_voice_input() {
    let mut app = TestApp::new();
    app.voice_input = false;

    let mut harness = harness(app);
    harness.run();

    assert!(harness.query_by_label("Start voice input").is_none());
}

/// Test that user and assistant messages appear in the list
#[test]
fn test_messages_appear_in_list() {
    let app = TestApp::new()
        .with_message(Message::assistant_text(
            "Hello! I can help you analyze and visualize retail data.",
        ))
        .with_message(Message::user("Which store sold the most?"));

    let mut harness = harness(app);
    harness.run();

    let _greeting = harness.get_by_label(
        "Assistant response: Hello! I can help you analyze and visualize retail data.",
    );
    let _question = harness.get_by_label("User message: Which store sold the most?");
}

/// Test that a table reply shows the grid and the generated query
#[test]
fn test_table_reply_with_generated_query() {
    let reply = Reply::analytics(
        "Here are the top stores.",
        Visualization::without_axes(ChartType::Table),
        rows(json!([
            {"store_name": "North", "total_sales": 1200},
            {"store_name": "South", "total_sales": 900}
        ])),
    )
    .with_generated_query("SELECT store_name, total_sales FROM stores");

    let mut harness = harness(TestApp::new().with_message(Message::from_reply(reply)));
    harness.run();

    let _narrative = harness.get_by_label("Assistant response: Here are the top stores.");
    let _table = harness.get_by_label("Data table: 2 rows");
    let _header = harness.get_by_label("Total Sales");
    let _sql = harness.get_by_label("Generated SQL: SELECT store_name, total_sales FROM stores");
}

/// Test that chart replies are drawn
#[test]
fn test_chart_replies_drawn() {
    let bar = Reply::analytics(
        "Monthly sales.",
        Visualization::new(ChartType::Bar, "month", "total_sales"),
        rows(json!([{"month": "Jan", "total_sales": 10}, {"month": "Feb", "total_sales": 14}])),
    );
    let pie = Reply::analytics(
        "Sales share.",
        Visualization::new(ChartType::Pie, "category", "share"),
        rows(json!([{"category": "Shoes", "share": 3}, {"category": "Bags", "share": 1}])),
    );

    let app = TestApp::new()
        .with_message(Message::from_reply(bar))
        .with_message(Message::from_reply(pie));
    let mut harness = harness(app);
    harness.run();

    let _bar = harness.get_by_label("Bar chart: Total Sales by Month");
    let _pie = harness.get_by_label("Pie chart: 2 slices");
}

/// Test that a chart of type none shows only the narrative
#[test]
fn test_none_chart_shows_text_only() {
    let reply = Reply::analytics(
        "Nothing to plot.",
        Visualization::without_axes(ChartType::None),
        Vec::new(),
    );

    let mut harness = harness(TestApp::new().with_message(Message::from_reply(reply)));
    harness.run();

    let _narrative = harness.get_by_label("Assistant response: Nothing to plot.");
    assert!(harness.query_by_label("Data table: 0 rows").is_none());
    assert!(harness.query_by_label("Generated SQL").is_none());
}

/// Test that the notice is shown and dismissed with OK
#[test]
fn test_notice_dismissed() {
    let mut app = TestApp::new();
    app.state
        .show_notice("Speech recognition is not supported on this system.");

    let mut harness = harness(app);
    harness.run();

    let _notice =
        harness.get_by_label("Notice: Speech recognition is not supported on this system.");

    harness.get_by_label("OK").click();
    harness.run();

    assert!(harness.state().state.notice.is_none());
}
