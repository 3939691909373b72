//! Plain-text rendering of the screen surface.

use std::fmt::Write;

use academy_orchestrator::screen::{Header, LevelStatus, ResultsView};
use academy_orchestrator::{LevelPane, Screen, Surface};

/// Renders the whole surface as one text frame.
#[must_use]
pub fn render(surface: &Surface) -> String {
    let mut out = String::new();
    render_header(&mut out, surface.header());
    out.push_str(&"-".repeat(40));
    out.push('\n');

    match surface.visible() {
        Screen::Landing => {
            if let Some(landing) = surface.landing() {
                let _ = writeln!(out, "{}\n\n{}\n{}", landing.title, landing.prompt, landing.hint);
            }
        }
        Screen::Intro => {
            if let Some(intro) = surface.intro() {
                let _ = writeln!(out, "{}\n\n{}\n\n{}", intro.title, intro.body, intro.hint);
            }
        }
        Screen::LevelSelect => {
            if let Some(picker) = surface.level_select() {
                let _ = writeln!(out, "{}", picker.title);
                for entry in &picker.entries {
                    let marker = match entry.status {
                        LevelStatus::Current => '>',
                        LevelStatus::Unlocked => ' ',
                        LevelStatus::Locked => 'x',
                    };
                    let _ = writeln!(out, "{marker} {} [{}]", entry.title, entry.status_text);
                }
                let _ = writeln!(out, "\n{}", picker.hint);
            }
        }
        Screen::Game => render_level_pane(&mut out, surface.level_pane()),
        Screen::Results => {
            if let Some(results) = surface.results() {
                render_results(&mut out, results);
            }
        }
    }

    if let Some(dialog) = surface.active_dialog() {
        let _ = writeln!(
            out,
            "\n[ {} ]\n{}\n{}",
            dialog.title,
            dialog.message,
            surface.header().labels.dismiss
        );
    }
    out
}

fn render_header(out: &mut String, header: &Header) {
    let _ = writeln!(out, "== {} ==", header.title);
    if header.progress_visible {
        let labels = &header.labels;
        let _ = write!(
            out,
            "{}: {} | {}: {} | {}: {} | {}: {} | {}",
            labels.player,
            header.player,
            labels.level,
            header.level,
            labels.score,
            header.score,
            labels.xp,
            header.xp,
            header.timer_text
        );
        if header.timer_paused {
            let _ = write!(out, " ({})", labels.paused);
        }
        out.push('\n');
    }
}

fn render_level_pane(out: &mut String, pane: &LevelPane) {
    match pane {
        LevelPane::Empty => {}
        LevelPane::Loading { message, .. } => {
            let _ = writeln!(out, "{message}");
        }
        LevelPane::Failed { message, hint, .. } => {
            let _ = writeln!(out, "{message}\n{hint}");
        }
        LevelPane::Mounted { container, .. } => {
            for line in container.lines() {
                let _ = writeln!(out, "{line}");
            }
            if let Some(prompt) = container.prompt() {
                let _ = writeln!(out, "\n{prompt}");
            }
        }
    }
}

fn render_results(out: &mut String, results: &ResultsView) {
    let _ = writeln!(out, "{}", results.headline);
    if let Some(subtitle) = &results.subtitle {
        let _ = writeln!(out, "{subtitle}");
    }
    for stat in &results.stats {
        let _ = writeln!(out, "{}: {}", stat.label, stat.value);
    }
    let labels = &results.answer_labels;
    for row in &results.rows {
        let mark = if row.is_correct { '+' } else { '-' };
        let _ = writeln!(out, "\n{mark} {}", row.prompt);
        let _ = writeln!(out, "  {}: {}", labels.chosen, row.chosen);
        if let Some(correct) = &row.correct_answer {
            let _ = writeln!(out, "  {}: {correct}", labels.correct);
        }
        if !row.explanation.is_empty() {
            let _ = writeln!(out, "  {}: {}", labels.explanation, row.explanation);
        }
    }
    out.push('\n');
    for (_, label) in &results.actions {
        let _ = writeln!(out, "{label}");
    }
}
