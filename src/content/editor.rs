//! State editor for another window.
//!
//! Binds to the target's controller through the realm, seeds itself with a
//! `get_state` snapshot and follows later changes through a subscription
//! keyed by the editor's own window id. When the target closes, the editor
//! closes its own window. Edits are JSON partials fed to `update_state`.

use std::cell::RefCell;
use std::rc::Rc;

use crossterm::event::{Event, KeyCode, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::Paragraph;

use super::js_literal::to_js_literal;
use super::{Content, ContentView, ViewContext};
use crate::clipboard;
use crate::realm::Realm;
use crate::window::{StateNotice, WindowConfig, WindowController, WindowKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorMode {
    #[default]
    Edit,
    View,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewFormat {
    #[default]
    Json,
    Js,
}

#[derive(Debug, Default)]
struct Snapshot {
    state: Option<WindowConfig>,
    updates: usize,
}

pub struct EditorView {
    target: WindowKey,
    own: WindowController,
    binding: Option<WindowController>,
    snapshot: Rc<RefCell<Snapshot>>,
    mode: EditorMode,
    format: ViewFormat,
    input: String,
    status: Option<(String, bool)>,
    scroll: u16,
}

impl EditorView {
    pub fn new(target: WindowKey, own: WindowController, realm: &Realm<Content>) -> Self {
        let mut editor = Self {
            target,
            own,
            binding: None,
            snapshot: Rc::new(RefCell::new(Snapshot::default())),
            mode: EditorMode::default(),
            format: ViewFormat::default(),
            input: String::new(),
            status: None,
            scroll: 0,
        };
        editor.bind(realm);
        editor
    }

    pub fn target(&self) -> &WindowKey {
        &self.target
    }

    pub fn is_bound(&self) -> bool {
        self.binding.is_some()
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn format(&self) -> ViewFormat {
        self.format
    }

    /// Latest known state of the target.
    pub fn snapshot(&self) -> Option<WindowConfig> {
        self.snapshot.borrow().state.clone()
    }

    /// Number of change notifications received from the target.
    pub fn updates_seen(&self) -> usize {
        self.snapshot.borrow().updates
    }

    /// Error from the last apply or copy, if it failed.
    pub fn error(&self) -> Option<&str> {
        match &self.status {
            Some((message, true)) => Some(message.as_str()),
            _ => None,
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Subscribe to the target once its controller is registered. A target
    /// that has left the pool before we ever bound closes the editor.
    fn bind(&mut self, realm: &Realm<Content>) {
        if self.binding.is_some() {
            return;
        }
        let Some(target) = realm.controller(&self.target) else {
            if !realm.contains(&self.target) {
                tracing::debug!(target = %self.target, "editor target gone before bind");
                self.own.close();
            }
            return;
        };

        self.snapshot.borrow_mut().state = Some(target.get_state(Clone::clone));
        let sink = Rc::clone(&self.snapshot);
        let own = self.own.clone();
        target.subscribe_to_state(self.own.id().as_str(), move |notice| match notice {
            StateNotice::Changed(state) => {
                let mut snapshot = sink.borrow_mut();
                snapshot.state = Some(state.clone());
                snapshot.updates += 1;
            }
            StateNotice::Closed => own.close(),
        });
        tracing::debug!(editor = %self.own.id(), target = %self.target, "editor bound");
        self.binding = Some(target);
    }

    /// Parse the input line as a partial and merge it into the target.
    pub fn apply_input(&mut self) {
        let Some(target) = &self.binding else {
            self.status = Some(("target not available".to_string(), true));
            return;
        };
        let raw = self.input.trim();
        if raw.is_empty() {
            return;
        }
        match target.update_state_json(raw) {
            Ok(()) => {
                self.status = Some(("applied".to_string(), false));
                self.input.clear();
            }
            Err(err) => {
                tracing::warn!(target = %self.target, error = %err, "editor patch rejected");
                self.status = Some((err.to_string(), true));
            }
        }
    }

    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            EditorMode::Edit => EditorMode::View,
            EditorMode::View => EditorMode::Edit,
        };
        self.scroll = 0;
    }

    pub fn toggle_format(&mut self) {
        self.format = match self.format {
            ViewFormat::Json => ViewFormat::Js,
            ViewFormat::Js => ViewFormat::Json,
        };
    }

    /// The snapshot rendered in the active view format.
    pub fn rendered(&self) -> String {
        let Some(state) = self.snapshot() else {
            return String::new();
        };
        let value = match serde_json::to_value(&state) {
            Ok(value) => value,
            Err(err) => return err.to_string(),
        };
        match self.format {
            ViewFormat::Json => serde_json::to_string_pretty(&value).unwrap_or_default(),
            ViewFormat::Js => to_js_literal(&value),
        }
    }

    fn copy(&mut self) {
        self.status = Some(match clipboard::copy_text(&self.rendered()) {
            Ok(()) => ("Copied to clipboard!".to_string(), false),
            Err(err) => (err.to_string(), true),
        });
    }

    fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> bool {
        if code == KeyCode::F(2) {
            self.toggle_mode();
            return true;
        }
        match (self.mode, code) {
            (_, KeyCode::Up) => self.scroll = self.scroll.saturating_sub(1),
            (_, KeyCode::Down) => self.scroll = self.scroll.saturating_add(1),
            (EditorMode::Edit, KeyCode::Enter) => self.apply_input(),
            (EditorMode::Edit, KeyCode::Esc) => {
                self.input.clear();
                self.status = None;
            }
            (EditorMode::Edit, KeyCode::Backspace) => {
                self.input.pop();
            }
            (EditorMode::Edit, KeyCode::Char(c)) if !modifiers.contains(KeyModifiers::CONTROL) => {
                self.input.push(c);
            }
            (EditorMode::View, KeyCode::Char('e')) => self.toggle_mode(),
            (EditorMode::View, KeyCode::Char('f')) => self.toggle_format(),
            (EditorMode::View, KeyCode::Char('c')) => self.copy(),
            _ => return false,
        }
        true
    }
}

impl ContentView for EditorView {
    fn render(&mut self, frame: &mut Frame<'_>, area: Rect, ctx: &ViewContext<'_>) {
        self.bind(ctx.realm);
        if area.width == 0 || area.height == 0 {
            return;
        }
        let [body, input, status] = Layout::vertical([
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(area);

        let text = if self.is_bound() {
            self.rendered()
        } else {
            format!("waiting for {} ...", self.target)
        };
        let lines: Vec<Line> = text.lines().map(Line::from).collect();
        frame.render_widget(Paragraph::new(lines).scroll((self.scroll, 0)), body);

        let prompt = match self.mode {
            EditorMode::Edit => format!("patch> {}", self.input),
            EditorMode::View => match self.format {
                ViewFormat::Json => "[e] Edit  [f] JS  [c] Copy".to_string(),
                ViewFormat::Js => "[e] Edit  [f] Json  [c] Copy".to_string(),
            },
        };
        frame.render_widget(
            Paragraph::new(prompt).style(Style::default().fg(Color::Cyan)),
            input,
        );
        if let Some((message, is_error)) = &self.status {
            let color = if *is_error { Color::Red } else { Color::Green };
            frame.render_widget(
                Paragraph::new(message.as_str()).style(Style::default().fg(color)),
                status,
            );
        }
    }

    fn handle_event(&mut self, event: &Event, _area: Rect, ctx: &ViewContext<'_>) -> bool {
        self.bind(ctx.realm);
        match event {
            Event::Key(key) => self.handle_key(key.code, key.modifiers),
            Event::Paste(text) if self.mode == EditorMode::Edit => {
                self.input.push_str(text);
                true
            }
            _ => false,
        }
    }

    fn key_hint(&self) -> &str {
        match self.mode {
            EditorMode::Edit => "type a JSON patch, Enter apply, F2 view",
            EditorMode::View => "e edit  f format  c copy",
        }
    }
}

impl Drop for EditorView {
    fn drop(&mut self) {
        if let Some(target) = self.binding.take() {
            target.unsub_from_state(self.own.id().as_str());
        }
    }
}
