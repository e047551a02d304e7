use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Gauge, Paragraph, Wrap},
};

use reader_core::PlaybackState;

use crate::App;

pub fn render(frame: &mut Frame, app: &App) {
    let [header_area, body_area, progress_area, hint_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    render_header(frame, app, header_area);
    render_document(frame, app, body_area);
    render_progress(frame, app, progress_area);
    render_hints(frame, hint_area);
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let snapshot = app.session.frame();
    let status = match snapshot.state {
        PlaybackState::Idle => "■ IDLE",
        PlaybackState::Playing => "▶ PLAYING",
        PlaybackState::Paused => "⏸ PAUSED",
    };
    let voice = snapshot
        .voice
        .as_ref()
        .map_or("default", |v| v.as_str());
    let text = format!(
        " {} | {} | {:.1}x | voice: {} ",
        app.fixture_name, status, snapshot.rate, voice
    );
    frame.render_widget(
        Paragraph::new(text).style(Style::default().fg(Color::DarkGray)),
        area,
    );
}

fn render_document(frame: &mut Frame, app: &App, area: Rect) {
    let snapshot = app.session.frame();

    let mut spans: Vec<Span> = Vec::new();
    match app.session.segmentation() {
        None => {
            // idle: the document as it would be read, dimmed
            spans.push(Span::styled(
                app.text,
                Style::default().fg(Color::DarkGray),
            ));
        }
        Some(seg) => {
            let word_style = Style::default()
                .bg(Color::Cyan)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD);
            let sentence_style = Style::default().bg(Color::DarkGray).fg(Color::White);

            for (index, token) in seg.tokens().iter().enumerate() {
                let in_sentence = app.highlight_sentence
                    && snapshot.sentence.is_some_and(|s| s.contains(index));

                let style = if snapshot.word_index == Some(index) {
                    word_style
                } else if in_sentence {
                    sentence_style
                } else {
                    Style::default()
                };
                spans.push(Span::styled(token.text.clone(), style));

                // the space after a word joins the sentence highlight unless
                // the word closes the sentence
                if index + 1 < seg.len() {
                    let space_style = if in_sentence && !token.ends_sentence() {
                        sentence_style
                    } else {
                        Style::default()
                    };
                    spans.push(Span::styled(" ", space_style));
                }
            }
        }
    }

    frame.render_widget(
        Paragraph::new(Line::from(spans))
            .block(Block::default())
            .wrap(Wrap { trim: false }),
        area,
    );
}

fn render_progress(frame: &mut Frame, app: &App, area: Rect) {
    let snapshot = app.session.frame();
    let (ratio, label) = match (app.session.segmentation(), snapshot.word_index) {
        (Some(seg), Some(word)) if !seg.is_empty() => (
            (word + 1) as f64 / seg.len() as f64,
            format!("{}/{}", word + 1, seg.len()),
        ),
        _ => (0.0, "-".to_string()),
    };

    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::White).bg(Color::DarkGray))
        .ratio(ratio)
        .label(label);
    frame.render_widget(gauge, area);
}

fn render_hints(frame: &mut Frame, area: Rect) {
    frame.render_widget(
        Paragraph::new(
            " [Space] play/pause  [x] stop  [↑/↓] rate  [v] voice  [h] sentence highlight  [q] quit ",
        )
        .style(Style::default().fg(Color::DarkGray)),
        area,
    );
}
