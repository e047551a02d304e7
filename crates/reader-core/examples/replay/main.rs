mod fixture;
mod renderer;

use std::time::{Duration, Instant};

use aloud_narrator_interface::{ScriptedEngine, VoiceCatalog, VoiceId};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use fixture::Fixture;
use ratatui::DefaultTerminal;
use reader_core::{PlaybackState, ReaderSession};

#[derive(clap::Parser)]
#[command(
    name = "replay",
    about = "Drive the read-along core against a scripted narration engine"
)]
struct Args {
    #[arg(short, long, default_value_t = Fixture::Lighthouse)]
    fixture: Fixture,

    /// Milliseconds between engine signals.
    #[arg(short, long, default_value_t = 160)]
    speed: u64,
}

struct App {
    session: ReaderSession<ScriptedEngine>,
    text: &'static str,
    fixture_name: String,
    speed_ms: u64,
    highlight_sentence: bool,
    voices: Vec<VoiceId>,
}

impl App {
    fn new(fixture: &Fixture, speed_ms: u64) -> Self {
        let engine = ScriptedEngine::new();
        let voices: Vec<VoiceId> = engine.voices().into_iter().map(|v| v.id).collect();
        let default_voice = engine.default_voice();

        let mut session = ReaderSession::new(engine);
        session.set_voice(default_voice);

        Self {
            session,
            text: fixture.text(),
            fixture_name: fixture.to_string(),
            speed_ms,
            highlight_sentence: true,
            voices,
        }
    }

    /// Deliver the engine's next scripted signal, if it has one.
    fn tick(&mut self) {
        if let Some(event) = self.session.engine_mut().poll_event() {
            self.session.handle_event(event);
        }
    }

    /// One play/pause control, like a narration app's combined button.
    fn toggle(&mut self) {
        match self.session.state() {
            PlaybackState::Idle => self.session.start(self.text),
            PlaybackState::Playing => self.session.pause(),
            PlaybackState::Paused => self.session.resume(),
        }
    }

    fn nudge_rate(&mut self, delta: f32) {
        let rate = self.session.requested_params().rate + delta;
        self.session.set_rate((rate * 10.0).round() / 10.0);
    }

    fn cycle_voice(&mut self) {
        if self.voices.is_empty() {
            return;
        }
        let next = match &self.session.requested_params().voice {
            Some(current) => self
                .voices
                .iter()
                .position(|v| v == current)
                .map_or(0, |i| (i + 1) % self.voices.len()),
            None => 0,
        };
        self.session.set_voice(Some(self.voices[next].clone()));
    }
}

fn main() {
    use clap::Parser;
    let args = Args::parse();

    let mut terminal = ratatui::init();
    let result = run(&mut terminal, App::new(&args.fixture, args.speed));
    ratatui::restore();

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(terminal: &mut DefaultTerminal, mut app: App) -> std::io::Result<()> {
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|frame| renderer::render(frame, &app))?;

        let tick_duration = Duration::from_millis(app.speed_ms);
        let timeout = tick_duration.saturating_sub(last_tick.elapsed());

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => {
                        app.session.stop();
                        break;
                    }
                    KeyCode::Char(' ') => app.toggle(),
                    KeyCode::Char('x') => app.session.stop(),
                    KeyCode::Char('v') => app.cycle_voice(),
                    KeyCode::Char('h') => app.highlight_sentence = !app.highlight_sentence,
                    KeyCode::Up => app.nudge_rate(0.1),
                    KeyCode::Down => app.nudge_rate(-0.1),
                    _ => {}
                }
            }
        } else if last_tick.elapsed() >= tick_duration {
            app.tick();
            last_tick = Instant::now();
        }
    }

    Ok(())
}
