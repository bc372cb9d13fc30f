//! App — component-based event loop.
//!
//! Architecture:
//! - `App` owns all components and `AppState` (shared read-only data for components).
//! - Terminal input, store changes and settled scrolls arrive on their own
//!   `tokio::mpsc` channels; a 100ms UI tick drives animations and expiries.
//! - Components return `Vec<Action>`; App dispatches each Action.
//! - Intents to the store flow out through the `StoreHandle`.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use iptv_proto::channel::Channel;
use iptv_proto::config::Config;
use iptv_proto::store::StoreHandle;
use ratatui::crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    Frame, Terminal,
};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    components::{channel_grid::ChannelGrid, help_overlay::HelpOverlay, search_bar::SearchBar},
    epg::EpgService,
    focus::FocusRing,
    i18n::Translator,
    subscription::{StoreEvent, Subscriptions},
    sync::SettleTimer,
    ui_event::{KeyUiEvent, MouseUiEvent},
    widgets::{
        status_bar::{self, InputMode},
        toast::{Severity, ToastManager},
    },
};

/// Screen areas from the last draw, used for mouse hit-testing.
#[derive(Debug, Clone, Copy, Default)]
struct PaneAreas {
    search: Rect,
    grid: Rect,
}

pub struct App {
    state: AppState,
    focus: FocusRing,
    search_bar: SearchBar,
    channel_grid: ChannelGrid,
    help_overlay: HelpOverlay,
    toast: ToastManager,
    store: StoreHandle,
    epg: Arc<dyn EpgService>,
    settle: SettleTimer,
    settled_rx: Option<mpsc::UnboundedReceiver<String>>,
    areas: PaneAreas,
    should_quit: bool,
}

impl App {
    pub fn new(
        config: &Config,
        store: StoreHandle,
        epg: Arc<dyn EpgService>,
        translator: Translator,
        channels: Option<Vec<Channel>>,
        load_error: Option<String>,
    ) -> Self {
        let (settled_tx, settled_rx) = mpsc::unbounded_channel();
        let settle = SettleTimer::new(Duration::from_millis(config.ui.settle_delay_ms), settled_tx);

        let mut channel_grid = ChannelGrid::new(
            Duration::from_millis(config.ui.toast_duration_ms),
            config.ui.card_width,
        );
        channel_grid.set_channels(channels);

        let mut state = AppState::new(translator);
        let search_bar = SearchBar::new(state.t("CHANNELS.SEARCH_PLACEHOLDER"));
        let mut toast = ToastManager::new();
        if let Some(err) = &load_error {
            toast.error(err.clone());
        }
        state.load_error = load_error;

        Self {
            state,
            focus: FocusRing::default(),
            search_bar,
            channel_grid,
            help_overlay: HelpOverlay::new(),
            toast,
            store,
            epg,
            settle,
            settled_rx: Some(settled_rx),
            areas: PaneAreas::default(),
            should_quit: false,
        }
    }

    pub fn grid(&self) -> &ChannelGrid {
        &self.channel_grid
    }

    pub fn focused(&self) -> Option<ComponentId> {
        self.focus.current()
    }

    pub fn toasts(&self) -> &ToastManager {
        &self.toast
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    // ── Main run loop ─────────────────────────────────────────────────────────

    pub async fn run(mut self) -> anyhow::Result<()> {
        let Some(mut settled_rx) = self.settled_rx.take() else {
            anyhow::bail!("App::run called twice");
        };

        debug!("run(): enabling raw mode");
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        debug!("run(): terminal created, size={:?}", terminal.size());

        // ── Background task: keyboard/mouse events ────────────────────────────
        let (input_tx, mut input_rx) = mpsc::channel::<Event>(1024);
        tokio::task::spawn_blocking(move || loop {
            match event::read() {
                Ok(ev) => {
                    if input_tx.blocking_send(ev).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        });

        // ── Store subscriptions ───────────────────────────────────────────────
        let (store_tx, mut store_rx) = mpsc::channel::<StoreEvent>(256);
        let mut subscriptions = Subscriptions::attach(&self.store, store_tx);

        let result = self
            .event_loop(&mut terminal, &mut input_rx, &mut store_rx, &mut settled_rx)
            .await;

        // ── Teardown ──────────────────────────────────────────────────────────
        subscriptions.release();
        self.channel_grid.view_mut().destroy();
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
        info!("event loop finished");

        result
    }

    async fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
        input_rx: &mut mpsc::Receiver<Event>,
        store_rx: &mut mpsc::Receiver<StoreEvent>,
        settled_rx: &mut mpsc::UnboundedReceiver<String>,
    ) -> anyhow::Result<()> {
        // Toast expiry, pending-favorite timeouts, scroll animation
        let mut ui_tick = tokio::time::interval(Duration::from_millis(100));
        ui_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal.draw(|f| self.draw(f))?;
            }
            needs_redraw = false;

            if self.should_quit {
                break;
            }

            tokio::select! {
                Some(ev) = input_rx.recv() => {
                    needs_redraw = self.handle_event(ev);
                }
                Some(ev) = store_rx.recv() => {
                    self.handle_store_event(ev);
                    needs_redraw = true;
                }
                Some(id) = settled_rx.recv() => {
                    self.on_scroll_settled(&id);
                    needs_redraw = true;
                }
                _ = ui_tick.tick() => {
                    self.tick();
                    needs_redraw = true;
                }
            }
        }
        Ok(())
    }

    // ── Message handlers ──────────────────────────────────────────────────────

    /// Returns `true` if the event requires a redraw.
    fn handle_event(&mut self, ev: Event) -> bool {
        let actions = match ev {
            Event::Key(key) => {
                if key.kind == KeyEventKind::Release {
                    return false;
                }
                self.handle_key(key)
            }
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(..) => Vec::new(),
            _ => return false,
        };
        for a in actions {
            self.dispatch(a);
        }
        true
    }

    pub fn handle_store_event(&mut self, event: StoreEvent) {
        match event {
            StoreEvent::Favorites(urls) => {
                self.channel_grid.view_mut().on_favorites(Some(urls));
            }
            StoreEvent::ActiveChannel(channel) => {
                let actions = self.channel_grid.view_mut().on_active_channel(channel.as_ref());
                self.state.active_channel = channel;
                for a in actions {
                    self.dispatch(a);
                }
            }
        }
    }

    pub fn on_scroll_settled(&mut self, channel_id: &str) {
        if self.channel_grid.view().is_detached() {
            return;
        }
        self.channel_grid.center_on(channel_id);
    }

    fn tick(&mut self) {
        self.toast.tick();
        let actions = self.channel_grid.tick(&self.state);
        for a in actions {
            self.dispatch(a);
        }
    }

    // ── Key handling ──────────────────────────────────────────────────────────

    pub fn handle_key(&mut self, key: KeyEvent) -> Vec<Action> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return vec![Action::Quit];
        }

        // Document-level hotkeys win over whatever has focus
        let mut event = KeyUiEvent::new(key);
        let actions = self.channel_grid.view_mut().handle_hotkey(&mut event);
        if event.is_default_prevented() {
            return actions;
        }

        // Help overlay captures all keys when visible
        if self.help_overlay.visible {
            return self.help_overlay.handle_key(&mut event, &self.state);
        }

        match key.code {
            KeyCode::Tab => return vec![Action::FocusNext],
            KeyCode::BackTab => return vec![Action::FocusPrev],
            _ => {}
        }

        if self.state.input_mode == InputMode::Normal {
            match key.code {
                KeyCode::Char('q') if key.modifiers == KeyModifiers::NONE => {
                    return vec![Action::Quit];
                }
                KeyCode::Char('?') => return vec![Action::ToggleHelp],
                KeyCode::Char('1') => return vec![Action::FocusSearch],
                KeyCode::Char('2') => return vec![Action::FocusGrid],
                _ => {}
            }
        }

        let s = &self.state;
        match self.focus.current() {
            Some(ComponentId::SearchBar) => self.search_bar.handle_key(&mut event, s),
            Some(ComponentId::ChannelGrid) => self.channel_grid.handle_key(&mut event, s),
            _ => vec![],
        }
    }

    // ── Mouse handling ────────────────────────────────────────────────────────

    fn handle_mouse(&mut self, mouse: MouseEvent) -> Vec<Action> {
        let is_click = matches!(
            mouse.kind,
            MouseEventKind::Down(_) | MouseEventKind::ScrollUp | MouseEventKind::ScrollDown
        );
        if !is_click || self.help_overlay.visible {
            return vec![];
        }

        fn hit(r: Rect, col: u16, row: u16) -> bool {
            r.width > 0
                && r.height > 0
                && col >= r.x
                && col < r.x + r.width
                && row >= r.y
                && row < r.y + r.height
        }

        let areas = self.areas;
        let mut event = MouseUiEvent::new(mouse);
        let s = &self.state;

        if hit(areas.search, mouse.column, mouse.row) {
            return self.search_bar.handle_mouse(&mut event, areas.search, s);
        }
        if hit(areas.grid, mouse.column, mouse.row) {
            let mut actions = self.channel_grid.handle_mouse(&mut event, areas.grid, s);
            let left_click = mouse.kind == MouseEventKind::Down(MouseButton::Left);
            if left_click && !self.focus.is_focused(ComponentId::ChannelGrid) {
                actions.insert(0, Action::FocusGrid);
            }
            return actions;
        }
        vec![]
    }

    // ── Action dispatcher ─────────────────────────────────────────────────────

    /// Broadcast to the components first, then apply at the app level.
    /// Follow-up actions from components are applied one level deep.
    pub fn dispatch(&mut self, action: Action) {
        let secondary: Vec<Action> = {
            let s = &self.state;
            let mut out = Vec::new();
            out.extend(self.search_bar.on_action(&action, s));
            out.extend(self.channel_grid.on_action(&action, s));
            out.extend(self.help_overlay.on_action(&action, s));
            out
        };

        self.apply_action(action);

        for a in secondary {
            self.apply_action(a);
        }
    }

    fn apply_action(&mut self, action: Action) {
        if action != Action::Noop {
            debug!("apply_action: {:?}", action);
        }
        match action {
            Action::Dispatch(intent) => self.store.dispatch(intent),
            Action::FetchPrograms(name) => self.epg.get_channel_programs(&name),
            Action::Notify { key, duration } => {
                let message = self.state.t(key);
                self.toast.push(message, Severity::Info, duration);
            }
            Action::FocusSearch => self.set_focus(ComponentId::SearchBar),
            Action::FocusGrid => self.set_focus(ComponentId::ChannelGrid),
            Action::FocusNext => {
                self.focus.next();
                self.sync_input_mode();
            }
            Action::FocusPrev => {
                self.focus.prev();
                self.sync_input_mode();
            }
            Action::ScheduleScroll(id) => self.settle.schedule(id),
            Action::Quit => self.should_quit = true,
            // Handled by the components in `dispatch`
            Action::SearchChanged(_) | Action::ClearSearch | Action::ToggleHelp | Action::Noop => {}
        }
    }

    fn set_focus(&mut self, id: ComponentId) {
        // A focus hotkey can fire with the help popup open; close it so keys
        // reach the newly focused pane.
        self.help_overlay.visible = false;
        self.focus.set(id);
        self.sync_input_mode();
    }

    fn sync_input_mode(&mut self) {
        self.state.input_mode = if self.focus.is_focused(ComponentId::SearchBar) {
            InputMode::Search
        } else {
            InputMode::Normal
        };
    }

    // ── Drawing ───────────────────────────────────────────────────────────────

    fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let outer = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(area);

        self.areas = PaneAreas {
            search: outer[0],
            grid: outer[1],
        };

        let search_focused = self.focus.is_focused(ComponentId::SearchBar);
        let grid_focused = self.focus.is_focused(ComponentId::ChannelGrid);
        self.search_bar
            .draw(frame, outer[0], search_focused, &self.state);
        self.channel_grid
            .draw(frame, outer[1], grid_focused, &self.state);
        status_bar::draw_keys_bar(
            frame,
            outer[2],
            self.state.input_mode,
            self.state.active_channel_name(),
        );

        if self.help_overlay.visible {
            self.help_overlay.draw(frame, area, false, &self.state);
        }
        self.toast.draw(frame, area);
    }
}
