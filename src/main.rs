mod client;
mod config;
mod markdown;

use iced::{
    widget::{button, column, container, scrollable, text, text_input, text_input::Id},
    Element, Length, Task, Theme, Color, Subscription,
    time, clipboard,
    keyboard::{self, Key},
    event::{self, Event as IcedEvent},
    alignment,
    window,
};
use std::sync::Arc;
use std::time::Duration;

use client::{GenerateClient, GenerateError};
use markdown::{MarkupRenderer, TextRenderer};

// Palette shared by the status line and the result placeholders.
const ERROR_COLOR: Color = Color { r: 0.937, g: 0.267, b: 0.267, a: 1.0 };
const SUCCESS_COLOR: Color = Color { r: 0.133, g: 0.773, b: 0.369, a: 1.0 };
const MUTED_COLOR: Color = Color { r: 0.580, g: 0.639, b: 0.722, a: 1.0 };

const COPY_FEEDBACK_WINDOW: Duration = Duration::from_secs(2);

fn main() -> iced::Result {
    let config = config::Config::load();

    iced::application("BlogForge", App::update, App::view)
        .theme(App::theme)
        .subscription(App::subscription)
        .window(window::Settings {
            size: iced::Size::new(config.window.width as f32, config.window.height as f32),
            position: window::Position::Centered,
            ..Default::default()
        })
        .run_with(App::new)
}

#[derive(Debug, Clone)]
enum Message {
    OpenGenerator,
    InputChanged(String),
    Submit,
    GenerationFinished {
        seq: u64,
        result: Result<String, GenerateError>,
    },
    CopyResult,
    CopyLabelReset,
    Tick,
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Landing,
    Generator,
}

/// Lifecycle of the generation controller. A request in flight carries the
/// sequence number it was started with; a completion message with any other
/// sequence is stale and gets dropped.
#[derive(Debug, Clone, PartialEq)]
enum Phase {
    Idle,
    Busy { seq: u64 },
    Failed { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatusTone {
    Muted,
    Success,
    Warning,
}

impl StatusTone {
    fn color(self) -> Color {
        match self {
            StatusTone::Muted => MUTED_COLOR,
            StatusTone::Success => SUCCESS_COLOR,
            StatusTone::Warning => ERROR_COLOR,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct StatusLine {
    message: String,
    tone: StatusTone,
}

impl StatusLine {
    fn none() -> Self {
        Self::muted("")
    }

    fn muted(message: impl Into<String>) -> Self {
        StatusLine { message: message.into(), tone: StatusTone::Muted }
    }

    fn success(message: impl Into<String>) -> Self {
        StatusLine { message: message.into(), tone: StatusTone::Success }
    }

    fn warning(message: impl Into<String>) -> Self {
        StatusLine { message: message.into(), tone: StatusTone::Warning }
    }
}

struct App {
    screen: Screen,
    input_text: String,
    /// Raw markdown of the last successful generation; what CopyResult
    /// writes to the clipboard. Survives later failures and stays stored
    /// (though masked by the placeholder) while a new request is busy.
    raw_markdown: String,
    /// The renderer's output for `raw_markdown`; what the content area shows.
    rendered: String,
    phase: Phase,
    status: StatusLine,
    loading_frame: usize,
    copied: bool,
    next_seq: u64,
    client: Arc<GenerateClient>,
    renderer: Box<dyn MarkupRenderer>,
    input_id: Id,
}

impl App {
    fn new() -> (Self, Task<Message>) {
        let config = config::Config::load();
        let app = App::from_parts(config, Box::new(TextRenderer));
        let focus_task = text_input::focus(app.input_id.clone());
        (app, focus_task)
    }

    fn from_parts(config: config::Config, renderer: Box<dyn MarkupRenderer>) -> Self {
        App {
            screen: Screen::Landing,
            input_text: String::new(),
            raw_markdown: String::new(),
            rendered: String::new(),
            phase: Phase::Idle,
            status: StatusLine::none(),
            loading_frame: 0,
            copied: false,
            next_seq: 0,
            client: Arc::new(GenerateClient::new(config.server.base_url)),
            renderer,
            input_id: Id::unique(),
        }
    }

    fn is_busy(&self) -> bool {
        matches!(self.phase, Phase::Busy { .. })
    }

    fn can_copy(&self) -> bool {
        !self.raw_markdown.is_empty() && !self.is_busy()
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::OpenGenerator => {
                self.screen = Screen::Generator;
                text_input::focus(self.input_id.clone())
            }
            Message::InputChanged(value) => {
                self.input_text = value;
                Task::none()
            }
            Message::Submit => {
                // Single-in-flight invariant: the disabled button is UI
                // garnish, this check is the actual guard.
                if self.is_busy() {
                    return Task::none();
                }

                let url = self.input_text.trim().to_string();
                if url.is_empty() {
                    self.status = StatusLine::warning("⚠ Please enter a URL first.");
                    return Task::none();
                }

                self.next_seq += 1;
                let seq = self.next_seq;
                self.phase = Phase::Busy { seq };
                self.loading_frame = 0;
                self.status = StatusLine::muted("Agents activated...");

                let client = self.client.clone();
                Task::future(async move {
                    let result = client.generate(&url).await;
                    Message::GenerationFinished { seq, result }
                })
            }
            Message::GenerationFinished { seq, result } => {
                if self.phase != (Phase::Busy { seq }) {
                    // Stale completion from a superseded request.
                    return Task::none();
                }

                match result {
                    Ok(content) => {
                        self.rendered = self.renderer.render(&content);
                        self.raw_markdown = content;
                        self.phase = Phase::Idle;
                        self.status = StatusLine::success("✔ Blog generated successfully!");
                    }
                    Err(e) => {
                        let message = e.to_string();
                        self.status = StatusLine::warning(format!("✖ Error: {}", message));
                        self.phase = Phase::Failed { message };
                    }
                }
                Task::none()
            }
            Message::CopyResult => {
                if !self.can_copy() {
                    return Task::none();
                }

                self.copied = true;
                Task::batch([
                    clipboard::write(self.raw_markdown.clone()),
                    Task::perform(tokio::time::sleep(COPY_FEEDBACK_WINDOW), |_| {
                        Message::CopyLabelReset
                    }),
                ])
            }
            Message::CopyLabelReset => {
                self.copied = false;
                Task::none()
            }
            Message::Tick => {
                if self.is_busy() {
                    self.loading_frame = (self.loading_frame + 1) % 75; // 25 frames * 3 phrases
                }
                Task::none()
            }
            Message::Exit => {
                iced::exit()
            }
        }
    }

    fn subscription(&self) -> Subscription<Message> {
        let timer = if self.is_busy() {
            time::every(Duration::from_millis(80)).map(|_| Message::Tick)
        } else {
            Subscription::none()
        };

        let events = event::listen_with(|event, _status, _id| {
            if let IcedEvent::Keyboard(keyboard::Event::KeyPressed {
                key: Key::Named(keyboard::key::Named::Escape),
                ..
            }) = event
            {
                Some(Message::Exit)
            } else {
                None
            }
        });

        Subscription::batch([timer, events])
    }

    fn view(&self) -> Element<Message> {
        match self.screen {
            Screen::Landing => self.view_landing(),
            Screen::Generator => self.view_generator(),
        }
    }

    fn view_landing(&self) -> Element<Message> {
        let nav_bar = container(
            button(text("Open Studio").size(14))
                .on_press(Message::OpenGenerator)
                .padding(10),
        )
        .width(Length::Fill)
        .align_x(alignment::Horizontal::Right);

        let hero = container(
            column![
                text("BlogForge").size(42),
                text("Turn any video into a polished blog post.").size(16),
                button(text("Get Started").size(18))
                    .on_press(Message::OpenGenerator)
                    .padding(15),
            ]
            .spacing(20)
            .align_x(alignment::Horizontal::Center),
        )
        .width(Length::Fill)
        .height(Length::Fill)
        .align_x(alignment::Horizontal::Center)
        .align_y(alignment::Vertical::Center);

        container(column![nav_bar, hero].spacing(10).padding(10))
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    fn view_generator(&self) -> Element<Message> {
        let busy = self.is_busy();

        let mut input = text_input("Paste a video URL...", &self.input_text)
            .padding(15)
            .size(18)
            .id(self.input_id.clone());
        if !busy {
            input = input
                .on_input(Message::InputChanged)
                .on_submit(Message::Submit);
        }

        let trigger_label = if busy { "Working..." } else { "Generate Blog" };
        let mut trigger = button(text(trigger_label).size(16)).padding(15);
        if !busy {
            trigger = trigger.on_press(Message::Submit);
        }

        let status = text(self.status.message.clone())
            .size(14)
            .color(self.status.tone.color());

        let content: Element<Message> = match &self.phase {
            Phase::Busy { .. } => self.view_busy_placeholder(),
            Phase::Failed { message } => placeholder(
                format!("Generation Failed.\n{}", message),
                ERROR_COLOR,
            ),
            Phase::Idle if self.rendered.is_empty() => placeholder(
                "Your generated blog post will appear here.".to_string(),
                MUTED_COLOR,
            ),
            Phase::Idle => scrollable(
                container(text(self.rendered.clone()).size(15))
                    .padding(15)
                    .width(Length::Fill),
            )
            .height(Length::Fill)
            .into(),
        };

        let copy_label = if self.copied { "Copied!" } else { "Copy Markdown" };
        let mut copy = button(text(copy_label).size(14)).padding(10);
        if self.can_copy() {
            copy = copy.on_press(Message::CopyResult);
        }
        let copy_row = container(copy)
            .width(Length::Fill)
            .align_x(alignment::Horizontal::Right);

        container(
            column![input, trigger, status, content, copy_row]
                .spacing(10)
                .padding(10),
        )
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
    }

    fn view_busy_placeholder(&self) -> Element<Message> {
        let frames = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
        let phrases = [
            "Analyzing the video...",
            "Researching the topic...",
            "Writing the blog post...",
        ];

        let spinner_idx = self.loading_frame % frames.len();
        let phrase_idx = (self.loading_frame / 25) % phrases.len();

        container(
            column![
                text(frames[spinner_idx]).size(32),
                text(phrases[phrase_idx]).size(15),
                text("This usually takes 30-60 seconds.")
                    .size(13)
                    .color(MUTED_COLOR),
            ]
            .spacing(10)
            .align_x(alignment::Horizontal::Center),
        )
        .width(Length::Fill)
        .height(Length::Fill)
        .align_x(alignment::Horizontal::Center)
        .align_y(alignment::Vertical::Center)
        .into()
    }

    fn theme(&self) -> Theme {
        Theme::TokyoNight
    }
}

fn placeholder<'a>(message: String, color: Color) -> Element<'a, Message> {
    container(text(message).size(15).color(color))
        .width(Length::Fill)
        .height(Length::Fill)
        .align_x(alignment::Horizontal::Center)
        .align_y(alignment::Vertical::Center)
        .into()
}
