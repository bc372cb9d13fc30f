//! End-to-end behaviour of the channel grid engine against a live store.

use std::time::Duration;

use iptv_proto::channel::Channel;
use iptv_proto::store::{Store, StoreIntent};
use iptv_tui::action::Action;
use iptv_tui::app_state::AppState;
use iptv_tui::component::Component;
use iptv_tui::components::channel_grid::ChannelGrid;
use iptv_tui::grid::{GridView, FAVORITES_UPDATED};
use iptv_tui::i18n::Translator;
use iptv_tui::scroll::{
    scroll_to_channel, Bounds, Container, ScrollBehavior, ScrollOutcome, ScrollSurface,
};
use iptv_tui::subscription::{StoreEvent, Subscriptions};
use iptv_tui::sync::SettleTimer;
use iptv_tui::ui_event::UiEvent;
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::Rect;
use tokio::sync::mpsc;

const TOAST: Duration = Duration::from_millis(2000);
const SETTLE: Duration = Duration::from_millis(100);

fn named(id: &str, name: &str) -> Channel {
    Channel {
        id: Some(id.into()),
        name: Some(name.into()),
        ..Default::default()
    }
}

fn ids(list: &[Channel]) -> Vec<&str> {
    list.iter().filter_map(Channel::id).collect()
}

fn intents(actions: &[Action]) -> Vec<&StoreIntent> {
    actions
        .iter()
        .filter_map(|a| match a {
            Action::Dispatch(intent) => Some(intent),
            _ => None,
        })
        .collect()
}

/// One card, one container, records what it was asked to do.
struct FakeSurface {
    card_id: &'static str,
    card: Bounds,
    container: Option<Container>,
    scrolled_to: Option<(f32, ScrollBehavior)>,
    into_view: bool,
}

impl ScrollSurface for FakeSurface {
    fn element_bounds(&self, channel_id: &str) -> Option<Bounds> {
        (channel_id == self.card_id).then_some(self.card)
    }
    fn scroll_container(&self, _channel_id: &str) -> Option<Container> {
        self.container
    }
    fn scroll_container_to(&mut self, _channel_id: &str, top: f32, behavior: ScrollBehavior) {
        self.scrolled_to = Some((top, behavior));
    }
    fn scroll_into_view(&mut self, _channel_id: &str, _behavior: ScrollBehavior) {
        self.into_view = true;
    }
}

#[test]
fn search_example_narrows_then_restores() {
    let mut grid = GridView::new(TOAST);
    grid.set_channel_list(Some(vec![named("1", "News 24"), named("2", "Sports")]));

    grid.on_search_change("news");
    assert_eq!(ids(grid.filtered()), vec!["1"]);

    grid.on_search_change("");
    assert_eq!(ids(grid.filtered()), vec!["1", "2"]);
}

#[test]
fn replacing_the_list_refilters_with_the_current_term() {
    let mut grid = GridView::new(TOAST);
    grid.set_channel_list(Some(vec![named("1", "News 24"), named("2", "Sports")]));
    grid.on_search_change("news");
    assert_eq!(ids(grid.filtered()), vec!["1"]);

    grid.set_channel_list(Some(vec![
        named("3", "World News"),
        named("4", "Movies"),
        named("5", "news night"),
    ]));
    assert_eq!(grid.search_term(), "news");
    assert_eq!(ids(grid.filtered()), vec!["3", "5"]);

    grid.set_channel_list(None);
    assert!(grid.filtered().is_empty());
}

#[test]
fn grid_component_keeps_cursor_across_list_replacement() {
    let mut grid = ChannelGrid::new(TOAST, 28);
    grid.set_channels(Some(vec![
        named("1", "News 24"),
        named("2", "Sports"),
        named("3", "CNN News"),
    ]));
    grid.resize(Rect::new(0, 0, 56, 12));
    let state = AppState::new(Translator::embedded("en"));
    grid.on_action(&Action::SearchChanged("news".into()), &state);
    assert_eq!(ids(grid.view().filtered()), vec!["1", "3"]);

    // Move to "CNN News", then swap in a list where it sits elsewhere
    let mut right = UiEvent::new(KeyEvent::new(KeyCode::Right, KeyModifiers::NONE));
    grid.handle_key(&mut right, &state);
    assert_eq!(grid.cursor_channel().and_then(Channel::id), Some("3"));

    grid.set_channels(Some(vec![
        named("7", "Local News"),
        named("3", "CNN News"),
        named("8", "Cartoons"),
    ]));
    assert_eq!(ids(grid.view().filtered()), vec!["7", "3"]);
    assert_eq!(grid.cursor(), 1);
    assert_eq!(grid.cursor_channel().and_then(Channel::id), Some("3"));

    // Cursor card dropped from the list: back to the first card
    grid.set_channels(Some(vec![named("9", "News 9"), named("10", "Weather")]));
    assert_eq!(ids(grid.view().filtered()), vec!["9"]);
    assert_eq!(grid.cursor(), 0);
}

#[test]
fn absent_channel_list_is_empty() {
    let mut grid = GridView::new(TOAST);
    grid.set_channel_list(None);
    assert!(grid.filtered().is_empty());
    grid.on_search_change("x");
    assert!(grid.filtered().is_empty());
}

#[test]
fn selecting_nothing_is_a_noop() {
    let mut grid = GridView::new(TOAST);
    assert!(grid.select_channel(None).is_empty());
    assert!(grid.selected_channel_id().is_none());

    let mut ev = UiEvent::new(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
    assert!(grid.on_card_key_down(&mut ev, None).is_empty());
}

#[test]
fn enter_and_space_match_direct_select_other_keys_do_nothing() {
    let channel = Channel::new("7", "Arte", "http://tv/7");
    let direct = GridView::new(TOAST).select_channel(Some(&channel));

    for code in [KeyCode::Enter, KeyCode::Char(' ')] {
        let mut grid = GridView::new(TOAST);
        let mut ev = UiEvent::new(KeyEvent::new(code, KeyModifiers::NONE));
        assert_eq!(grid.on_card_key_down(&mut ev, Some(&channel)), direct);
        assert!(ev.is_default_prevented());
    }

    for code in [KeyCode::Char('a'), KeyCode::Tab, KeyCode::Down] {
        let mut grid = GridView::new(TOAST);
        let mut ev = UiEvent::new(KeyEvent::new(code, KeyModifiers::NONE));
        assert!(grid.on_card_key_down(&mut ev, Some(&channel)).is_empty());
        assert!(!ev.is_default_prevented());
        assert!(grid.selected_channel_id().is_none());
    }
}

#[test]
fn clear_search_only_acts_on_a_non_empty_term() {
    let mut grid = GridView::new(TOAST);
    grid.set_channel_list(Some(vec![named("1", "News 24"), named("2", "Sports")]));

    assert!(grid.clear_search().is_empty());

    grid.on_search_change("sport");
    assert_eq!(grid.filtered().len(), 1);
    assert_eq!(grid.clear_search(), vec![Action::FocusSearch]);
    assert_eq!(grid.search_term(), "");
    assert_eq!(ids(grid.filtered()), vec!["1", "2"]);
}

#[test]
fn toggle_emits_one_intent_and_one_toast_without_flipping_membership() {
    let mut grid = GridView::new(TOAST);
    let channel = Channel {
        url: Some("u1".into()),
        ..Default::default()
    };
    let mut click = UiEvent::new(());

    let actions = grid.toggle_favorite(&channel, &mut click);
    assert!(click.is_propagation_stopped());
    assert_eq!(
        intents(&actions),
        vec![&StoreIntent::UpdateFavorites(channel.clone())]
    );
    let toasts: Vec<_> = actions
        .iter()
        .filter(|a| matches!(a, Action::Notify { .. }))
        .collect();
    assert_eq!(
        toasts,
        vec![&Action::Notify {
            key: FAVORITES_UPDATED,
            duration: TOAST
        }]
    );
    assert!(!grid.is_favorite(&channel));

    grid.on_favorites(Some(vec!["u1".into()]));
    assert!(grid.is_favorite(&channel));
}

#[test]
fn favorites_emission_replaces_membership() {
    let mut grid = GridView::new(TOAST);
    let a = Channel::new("a", "A", "ua");
    let b = Channel::new("b", "B", "ub");

    grid.on_favorites(Some(vec!["ua".into()]));
    assert!(grid.is_favorite(&a));
    grid.on_favorites(Some(vec!["ub".into()]));
    assert!(!grid.is_favorite(&a));
    assert!(grid.is_favorite(&b));
    grid.on_favorites(None);
    assert!(!grid.is_favorite(&b));
}

#[tokio::test(start_paused = true)]
async fn active_ch42_is_centered_after_settle_delay() {
    let mut grid = GridView::new(TOAST);
    let (tx, mut settled) = mpsc::unbounded_channel();
    let timer = SettleTimer::new(SETTLE, tx);
    let mut surface = FakeSurface {
        card_id: "ch42",
        card: Bounds {
            top: 530.0,
            height: 40.0,
        },
        container: Some(Container {
            bounds: Bounds {
                top: 100.0,
                height: 400.0,
            },
            scroll_top: 200.0,
            client_height: 400.0,
        }),
        scrolled_to: None,
        into_view: false,
    };

    for action in grid.on_active_channel(Some(&named("ch42", "Channel 42"))) {
        if let Action::ScheduleScroll(id) = action {
            timer.schedule(id);
        }
    }

    tokio::time::sleep(Duration::from_millis(99)).await;
    assert!(settled.try_recv().is_err());

    let id = settled.recv().await.expect("settle timer fired");
    let outcome = scroll_to_channel(&mut surface, &id);

    // 200 + (530 - 100) - 400/2 + 40/2
    assert_eq!(outcome, ScrollOutcome::Centered(450.0));
    assert_eq!(surface.scrolled_to, Some((450.0, ScrollBehavior::Smooth)));
    assert!(!surface.into_view);
}

#[test]
fn filtered_out_card_is_not_scrolled() {
    let mut surface = FakeSurface {
        card_id: "ch1",
        card: Bounds {
            top: 0.0,
            height: 4.0,
        },
        container: None,
        scrolled_to: None,
        into_view: false,
    };
    assert_eq!(scroll_to_channel(&mut surface, "ch42"), ScrollOutcome::NotFound);
    assert_eq!(scroll_to_channel(&mut surface, "ch1"), ScrollOutcome::IntoView);
    assert!(surface.into_view);
    assert!(surface.scrolled_to.is_none());
}

#[test]
fn grid_component_centers_ch42() {
    let mut grid = ChannelGrid::new(TOAST, 28);
    grid.set_channels(Some(
        (0..100)
            .map(|i| Channel::new(format!("ch{i}"), format!("Channel {i}"), format!("http://tv/{i}")))
            .collect(),
    ));
    grid.resize(Rect {
        x: 0,
        y: 2,
        width: 56,
        height: 20,
    });

    // Two columns of 4-row cards: ch42 starts at content row 84.
    // 0 + (86 - 2) - 20/2 + 4/2
    assert_eq!(grid.center_on("ch42"), ScrollOutcome::Centered(76.0));
    assert_eq!(grid.scroll_target(), 76.0);

    grid.view_mut().on_search_change("channel 1");
    grid.resize(grid.layout().area);
    assert_eq!(grid.center_on("ch42"), ScrollOutcome::NotFound);
}

#[tokio::test]
async fn store_round_trip_confirms_favorite() {
    let (store, handle, intents_rx) = Store::new(vec![]);
    tokio::spawn(store.run(intents_rx));

    let (tx, mut events) = mpsc::channel(16);
    let mut subs = Subscriptions::attach(&handle, tx);
    let mut grid = GridView::new(TOAST);
    let channel = Channel::new("1", "News 24", "u1");

    // Initial values arrive first
    let mut initial = 0;
    while initial < 2 {
        match events.recv().await {
            Some(StoreEvent::Favorites(urls)) => grid.on_favorites(Some(urls)),
            Some(StoreEvent::ActiveChannel(c)) => {
                assert!(grid.on_active_channel(c.as_ref()).is_empty());
            }
            None => panic!("subscriptions closed"),
        }
        initial += 1;
    }

    for action in grid.toggle_favorite(&channel, &mut UiEvent::new(())) {
        if let Action::Dispatch(intent) = action {
            handle.dispatch(intent);
        }
    }
    assert!(!grid.is_favorite(&channel));

    match events.recv().await {
        Some(StoreEvent::Favorites(urls)) => grid.on_favorites(Some(urls)),
        other => panic!("unexpected {other:?}"),
    }
    assert!(grid.is_favorite(&channel));

    subs.release();
    grid.destroy();
    grid.on_favorites(Some(vec![]));
    assert!(grid.is_favorite(&channel));
}

#[test]
fn destroyed_grid_ignores_active_channel() {
    let mut grid = GridView::new(TOAST);
    grid.destroy();
    assert!(grid.on_active_channel(Some(&named("x", "X"))).is_empty());
    assert!(grid.active_channel_id().is_none());
}
