//! Navigation scenario tests.
//!
//! Drives a shell through router matches and binding signals and checks the
//! visible outcome: layout, busy state, list selection and router calls.

use std::time::Duration;

use tricolumn_app::{BindOutcome, SelectableList, SelectionOutcome, ShellConfig, ShellEvent};
use tricolumn_core::{
    BusyPhase, DisplayTarget, LayoutKind, ListReadiness, NavigationRequest, Region, SelectionMode,
};
use tricolumn_harness::{MemoryList, World};

const DEFAULT_DELAY: Duration = Duration::from_millis(1000);

/// World with objects 1, 7 and 9 in the catalog and a loaded list.
fn loaded_world() -> World {
    let mut world = World::new();
    for id in ["1", "7", "9"] {
        world.model().insert(format!("/Categories({id})"), id);
    }
    world.register_list();
    world.list().deliver(&["1", "7", "9"]);
    world
}

#[tokio::test]
async fn object_route_binds_and_selects() {
    let mut world = loaded_world();

    world.open_object("7").await.unwrap();

    let shell = world.shell();
    assert_eq!(shell.layout().layout(), LayoutKind::TwoColumnMidExpanded);
    assert!(!shell.layout().is_full_screen());
    let detail = shell.busy().region(Region::Detail);
    assert!(detail.is_busy());
    assert_eq!(detail.delay(), Duration::ZERO);
    assert_eq!(world.model().last_bind().unwrap().path, "/Categories(7)");

    assert!(world.complete_last_bind().await.unwrap());
    let detail = world.shell().busy().region(Region::Detail);
    assert!(!detail.is_busy());
    assert_eq!(detail.delay(), DEFAULT_DELAY);
    assert_eq!(detail.phase(), BusyPhase::Idle);

    assert_eq!(world.settle().await, vec![SelectionOutcome::Selected { index: 1 }]);
    assert_eq!(world.list().selected_key().as_deref(), Some("7"));
}

#[tokio::test]
async fn later_binds_keep_configured_delay() {
    let mut world = loaded_world();
    world.open_object("7").await.unwrap();
    world.complete_last_bind().await.unwrap();

    world.open_object("9").await.unwrap();
    let detail = world.shell().busy().region(Region::Detail);
    assert!(detail.is_busy());
    assert_eq!(detail.delay(), DEFAULT_DELAY);
}

#[tokio::test]
async fn selection_waits_for_registration_and_first_data() {
    let mut world = World::new();
    world.model().insert("/Categories(7)", "7");

    world.open_object("7").await.unwrap();
    world.complete_last_bind().await.unwrap();
    assert_eq!(world.shell().pending_selections(), 1);
    assert_eq!(world.shell().selector().readiness(), ListReadiness::Unbound);

    assert!(world.register_list());
    assert!(!world.register_list());
    assert_eq!(world.shell().selector().readiness(), ListReadiness::AwaitingFirstData);
    world.list().deliver(&["3", "7"]);

    assert_eq!(world.settle().await, vec![SelectionOutcome::Selected { index: 1 }]);
    assert_eq!(world.list().selected_key().as_deref(), Some("7"));
}

#[tokio::test]
async fn empty_list_drops_selection() {
    let mut world = World::new();
    world.model().insert("/Categories(7)", "7");
    world.register_list();
    world.list().deliver::<&str>(&[]);

    world.open_object("7").await.unwrap();
    world.complete_last_bind().await.unwrap();

    assert_eq!(world.settle().await, vec![SelectionOutcome::Unavailable]);
    assert_eq!(world.shell().selector().readiness(), ListReadiness::Failed);
}

#[tokio::test]
async fn failed_list_load_drops_selection() {
    let mut world = World::new();
    world.model().insert("/Categories(7)", "7");
    world.register_list();
    world.list().fail();

    world.open_object("7").await.unwrap();
    world.complete_last_bind().await.unwrap();

    assert_eq!(world.settle().await, vec![SelectionOutcome::Unavailable]);
    assert_eq!(world.list().selected_key(), None);
}

#[tokio::test]
async fn close_detail_clears_selection_silently() {
    let mut world = loaded_world();
    world.open_object("7").await.unwrap();
    world.complete_last_bind().await.unwrap();
    world.settle().await;

    world.send(ShellEvent::CloseDetail).await.unwrap();

    assert_eq!(world.shell().layout().layout(), LayoutKind::OneColumn);
    assert_eq!(world.router().navigations(), vec![NavigationRequest::to_list()]);
    assert_eq!(world.settle().await, vec![SelectionOutcome::Cleared]);
    assert_eq!(world.list().selected_key(), None);
    assert_eq!(world.list().selection_events(), 0);
}

#[tokio::test]
async fn clear_selection_does_not_wait_for_data() {
    let mut world = World::new();
    world.register_list();
    world.list().deliver(&["7"]);
    world.list().tap("7");

    world.send(ShellEvent::CloseDetail).await.unwrap();

    assert_eq!(world.settle().await, vec![SelectionOutcome::Cleared]);
    assert_eq!(world.list().selected_key(), None);
    assert_eq!(world.list().selection_events(), 1);
}

#[tokio::test]
async fn list_route_returns_to_one_column() {
    let mut world = loaded_world();
    world.open_object("7").await.unwrap();
    world.send(ShellEvent::ToggleFullScreen).await.unwrap();

    world.open_list().await.unwrap();

    let layout = world.shell().layout();
    assert_eq!(layout.layout(), LayoutKind::OneColumn);
    assert!(!layout.is_full_screen());
    assert_eq!(layout.previous_layout(), None);
}

#[tokio::test]
async fn toggle_full_screen_twice_restores_layout() {
    let mut world = loaded_world();
    world.open_object("7").await.unwrap();
    let before = world.shell().layout().clone();

    world.send(ShellEvent::ToggleFullScreen).await.unwrap();
    let layout = world.shell().layout();
    assert_eq!(layout.layout(), LayoutKind::MidColumnFullScreen);
    assert!(layout.is_full_screen());
    assert_eq!(layout.previous_layout(), Some(LayoutKind::TwoColumnMidExpanded));

    world.send(ShellEvent::ToggleFullScreen).await.unwrap();
    assert_eq!(world.shell().layout(), &before);
}

#[tokio::test]
async fn missing_object_shows_detail_not_found() {
    let mut world = loaded_world();

    world.open_object("42").await.unwrap();
    world.complete_last_bind().await.unwrap();

    assert_eq!(world.router().displays(), vec![DisplayTarget::DetailObjectNotFound]);
    assert_eq!(world.shell().layout().layout(), LayoutKind::TwoColumnMidExpanded);
    assert_eq!(world.settle().await, vec![SelectionOutcome::Cleared]);
}

#[tokio::test]
async fn bypassed_route_shows_not_found() {
    let mut world = loaded_world();
    world.open_object("7").await.unwrap();

    world.bypass().await.unwrap();
    assert_eq!(world.router().displays(), vec![DisplayTarget::NotFound]);

    world.send(ShellEvent::NotFoundDisplayed).await.unwrap();
    assert_eq!(world.shell().layout().layout(), LayoutKind::OneColumn);
    assert_eq!(world.settle().await, vec![SelectionOutcome::Cleared]);
}

#[tokio::test]
async fn superseded_bind_is_ignored() {
    let mut world = loaded_world();
    world.open_object("1").await.unwrap();
    let stale = world.model().last_bind().unwrap();

    world.open_object("9").await.unwrap();
    world.complete_last_bind().await.unwrap();
    assert_eq!(world.settle().await, vec![SelectionOutcome::Selected { index: 2 }]);

    for event in world.model().events_for(&stale) {
        world.send(event).await.unwrap();
    }

    assert!(!world.shell().is_current(stale.ticket));
    assert!(!world.shell().busy().region(Region::Detail).is_busy());
    assert_eq!(world.shell().pending_selections(), 0);
    assert_eq!(world.list().selected_key().as_deref(), Some("9"));
}

#[tokio::test]
async fn closing_supersedes_inflight_bind() {
    let mut world = loaded_world();
    world.open_object("7").await.unwrap();
    world.send(ShellEvent::CloseDetail).await.unwrap();
    world.settle().await;

    world.complete_last_bind().await.unwrap();

    assert_eq!(world.shell().pending_selections(), 0);
    assert_eq!(world.list().selected_key(), None);
}

#[tokio::test]
async fn product_route_binds_without_layout_change() {
    let mut world = loaded_world();
    world.model().insert("/Products(3)", "3");
    world.open_object("7").await.unwrap();

    world.open_product("7", "3").await.unwrap();

    assert_eq!(world.shell().layout().layout(), LayoutKind::TwoColumnMidExpanded);
    assert_eq!(world.model().last_bind().unwrap().path, "/Products(3)");
    assert!(world.shell().busy().region(Region::Product).is_busy());

    world.complete_last_bind().await.unwrap();
    assert!(!world.shell().busy().region(Region::Product).is_busy());
    assert!(world.router().displays().is_empty());
}

#[tokio::test]
async fn missing_product_shows_product_not_found() {
    let mut world = loaded_world();

    world.open_product("7", "404").await.unwrap();
    world.complete_last_bind().await.unwrap();

    assert_eq!(world.router().displays(), vec![DisplayTarget::ProductObjectNotFound]);
    assert_eq!(world.shell().pending_selections(), 0);
}

#[tokio::test]
async fn malformed_route_is_an_error() {
    let mut world = loaded_world();

    assert!(world.open_object("").await.is_err());
    assert!(world.model().binds().is_empty());
    assert_eq!(world.shell().layout().layout(), LayoutKind::OneColumn);
}

#[tokio::test]
async fn update_finished_sets_titles() {
    let mut world = World::new();
    assert_eq!(world.shell().titles().list, "Categories (0)");

    world.send(ShellEvent::UpdateFinished { region: Region::List, total: Some(3) }).await.unwrap();
    assert_eq!(world.shell().titles().list, "Categories (3)");
    assert!(!world.shell().busy().region(Region::List).is_busy());

    world
        .send(ShellEvent::UpdateFinished { region: Region::LineItems, total: Some(2) })
        .await
        .unwrap();
    assert_eq!(world.shell().titles().line_items, "Products (2)");

    world
        .send(ShellEvent::UpdateFinished { region: Region::LineItems, total: Some(0) })
        .await
        .unwrap();
    assert_eq!(world.shell().titles().line_items, "Products");

    world.send(ShellEvent::UpdateFinished { region: Region::List, total: None }).await.unwrap();
    assert_eq!(world.shell().titles().list, "Categories (3)");
}

#[tokio::test]
async fn closing_before_list_loads_drops_pending_selection() {
    let mut world = World::new();
    world.model().insert("/Categories(7)", "7");
    world.register_list();
    world.open_object("7").await.unwrap();
    world.complete_last_bind().await.unwrap();
    assert_eq!(world.shell().pending_selections(), 1);

    world.send(ShellEvent::CloseDetail).await.unwrap();
    tokio::task::yield_now().await;
    world.list().deliver(&["1", "7", "9"]);

    let outcomes = world.settle().await;
    assert!(outcomes.contains(&SelectionOutcome::Superseded));
    assert!(outcomes.contains(&SelectionOutcome::Cleared));
    assert_eq!(world.list().selected_key(), None);
}

#[tokio::test]
async fn list_route_before_list_loads_drops_pending_selection() {
    let mut world = World::new();
    world.model().insert("/Categories(7)", "7");
    world.open_object("7").await.unwrap();
    world.complete_last_bind().await.unwrap();

    world.open_list().await.unwrap();
    world.register_list();
    world.list().deliver(&["7"]);

    assert_eq!(world.settle().await, vec![SelectionOutcome::Superseded]);
    assert_eq!(world.list().selected_key(), None);
}

#[tokio::test]
async fn events_are_handled_while_metadata_loads() {
    let mut world = loaded_world();
    world.model().hold_metadata();

    world.open_object("7").await.unwrap();
    world.send(ShellEvent::ToggleFullScreen).await.unwrap();

    assert_eq!(world.shell().layout().layout(), LayoutKind::MidColumnFullScreen);
    assert!(world.shell().busy().region(Region::Detail).is_busy());
    assert!(world.model().binds().is_empty());
    assert_eq!(world.shell().pending_binds(), 1);

    world.model().load_metadata();
    assert_eq!(
        world.settle_binds().await,
        vec![BindOutcome::Bound { path: "/Categories(7)".into() }]
    );
    assert_eq!(world.model().last_bind().unwrap().path, "/Categories(7)");
}

#[tokio::test]
async fn only_latest_bind_runs_after_metadata_loads() {
    let mut world = loaded_world();
    world.model().hold_metadata();

    world.open_object("1").await.unwrap();
    world.open_object("9").await.unwrap();
    world.model().load_metadata();

    let outcomes = world.settle_binds().await;
    assert!(outcomes.contains(&BindOutcome::Superseded));
    let binds = world.model().binds();
    assert_eq!(binds.len(), 1);
    assert_eq!(binds[0].path, "/Categories(9)");

    world.complete_last_bind().await.unwrap();
    assert_eq!(world.settle().await, vec![SelectionOutcome::Selected { index: 2 }]);
}

#[tokio::test]
async fn line_items_show_busy_without_delay_until_first_update() {
    let mut world = World::new();
    assert_eq!(world.shell().busy().region(Region::LineItems).delay(), Duration::ZERO);

    world
        .send(ShellEvent::UpdateFinished { region: Region::LineItems, total: Some(2) })
        .await
        .unwrap();

    let line_items = world.shell().busy().region(Region::LineItems);
    assert_eq!(line_items.delay(), DEFAULT_DELAY);
    assert_eq!(line_items.phase(), BusyPhase::Idle);
}

#[tokio::test]
async fn tapping_list_entry_opens_object() {
    let mut world = loaded_world();

    assert!(world.tap_list("7").await.unwrap());

    assert_eq!(world.shell().layout().layout(), LayoutKind::TwoColumnMidExpanded);
    let navigation = world.router().navigations().pop().unwrap();
    assert_eq!(navigation, NavigationRequest::to_object("7", true));
    assert!(navigation.replace_history);
}

#[tokio::test]
async fn tapping_on_phone_keeps_history() {
    let mut world = World::with_config(ShellConfig { phone: true, ..ShellConfig::default() });
    world.register_list();
    world.list().deliver(&["7"]);

    world.tap_list("7").await.unwrap();

    assert_eq!(world.router().navigations(), vec![NavigationRequest::to_object("7", false)]);
}

#[tokio::test]
async fn multi_select_deselection_does_not_navigate() {
    let list = MemoryList::with_mode(SelectionMode::MultiSelect);
    let mut world = World::build(ShellConfig::default(), list);
    world.register_list();
    world.list().deliver(&["7"]);

    world
        .send(ShellEvent::ListSelectionChanged { key: "7".into(), selected: false })
        .await
        .unwrap();

    assert!(world.router().navigations().is_empty());
    assert_eq!(world.shell().layout().layout(), LayoutKind::OneColumn);
}

#[tokio::test]
async fn pressing_line_item_opens_product() {
    let mut world = loaded_world();
    world.open_object("7").await.unwrap();

    world.press_line_item("7", "3").await.unwrap();

    assert_eq!(world.router().navigations(), vec![NavigationRequest::to_product("7", "3")]);
    assert_eq!(world.shell().layout().layout(), LayoutKind::TwoColumnMidExpanded);
}

#[tokio::test]
async fn nav_back_goes_back_in_history() {
    let mut world = loaded_world();
    world.router().set_history(true);

    world.send(ShellEvent::NavBack).await.unwrap();

    assert_eq!(world.router().back_steps(), 1);
    assert!(world.router().navigations().is_empty());
}

#[tokio::test]
async fn nav_back_without_history_replaces_with_list() {
    let mut world = loaded_world();

    world.send(ShellEvent::NavBack).await.unwrap();

    assert_eq!(world.router().back_steps(), 0);
    let navigations = world.router().navigations();
    assert_eq!(navigations, vec![NavigationRequest::to_list_replacing()]);
    assert!(navigations[0].replace_history);
}
