//! Property tests for the core state machines.
//!
//! Random sequences of route matches and gestures drive the machines into
//! arbitrary reachable states; the invariants must hold from every one.

use proptest::prelude::*;
use tricolumn_core::{
    BindTicket, BoundObject, ErrorDeduplicator, FailureDetails, LayoutKind, LayoutMachine,
    Region, RequestFailure, SelectionMode, SelectionPlan, ShellAction, plan_selection,
};

/// Inputs the layout state machine reacts to.
#[derive(Debug, Clone)]
enum Input {
    ListMatched,
    ObjectMatched(u8),
    ProductMatched(u8, u8),
    ToggleFullScreen,
    CloseDetail,
    Bypassed,
    NotFoundDisplayed,
}

fn input_strategy() -> impl Strategy<Value = Input> {
    prop_oneof![
        2 => Just(Input::ListMatched),
        3 => any::<u8>().prop_map(Input::ObjectMatched),
        1 => (any::<u8>(), any::<u8>()).prop_map(|(o, p)| Input::ProductMatched(o, p)),
        3 => Just(Input::ToggleFullScreen),
        1 => Just(Input::CloseDetail),
        1 => Just(Input::Bypassed),
        1 => Just(Input::NotFoundDisplayed),
    ]
}

fn apply(machine: &mut LayoutMachine, input: &Input) -> Vec<ShellAction> {
    match input {
        Input::ListMatched => machine.on_list_route_matched(),
        Input::ObjectMatched(id) => machine.on_object_route_matched(id.to_string()),
        Input::ProductMatched(o, p) => machine.on_product_route_matched(o.to_string(), p.to_string()),
        Input::ToggleFullScreen => {
            machine.toggle_full_screen();
            Vec::new()
        },
        Input::CloseDetail => machine.on_close_detail(),
        Input::Bypassed => machine.on_bypassed(),
        Input::NotFoundDisplayed => {
            machine.on_not_found_displayed();
            Vec::new()
        },
    }
}

proptest! {
    /// Toggling full screen twice returns to exactly the starting state.
    #[test]
    fn prop_toggle_twice_is_identity(inputs in prop::collection::vec(input_strategy(), 0..40)) {
        let mut machine = LayoutMachine::new();
        for input in &inputs {
            apply(&mut machine, input);
        }

        let before = machine.state().clone();
        machine.toggle_full_screen();
        machine.toggle_full_screen();
        prop_assert_eq!(machine.state(), &before);
    }

    /// The full-screen flag is set exactly when a previous layout is remembered.
    #[test]
    fn prop_full_screen_flag_matches_previous(inputs in prop::collection::vec(input_strategy(), 0..40)) {
        let mut machine = LayoutMachine::new();
        for input in &inputs {
            apply(&mut machine, input);
            let state = machine.state();
            prop_assert_eq!(state.is_full_screen(), state.previous_layout().is_some());
            prop_assert_eq!(
                state.is_full_screen(),
                state.layout() == LayoutKind::MidColumnFullScreen
            );
        }
    }

    /// Only the most recent detail bind can drive the list selection.
    #[test]
    fn prop_only_latest_bind_selects(ids in prop::collection::vec(any::<u8>(), 1..10)) {
        let mut machine = LayoutMachine::new();
        let tickets: Vec<BindTicket> = ids
            .iter()
            .filter_map(|id| {
                machine.on_object_route_matched(id.to_string()).into_iter().find_map(|a| match a {
                    ShellAction::Bind { ticket, .. } => Some(ticket),
                    _ => None,
                })
            })
            .collect();

        let last = tickets.len() - 1;
        for (i, ticket) in tickets.iter().enumerate() {
            prop_assert_eq!(ticket.region, Region::Detail);
            let key = ids[i].to_string();
            let object = BoundObject { path: format!("/Categories({key})"), key: key.clone() };
            let actions = machine.on_binding_changed(*ticket, Some(object));
            if i == last {
                prop_assert_eq!(
                    actions,
                    vec![ShellAction::SelectListItem { ticket: *ticket, key }]
                );
            } else {
                prop_assert!(actions.is_empty());
            }
        }
    }

    /// Whatever arrives while a notification is open, only one is ever open.
    #[test]
    fn prop_at_most_one_open_notification(
        statuses in prop::collection::vec(400u16..600, 1..20),
        dismiss_every in 1usize..5,
    ) {
        let mut dedup = ErrorDeduplicator::new("error");
        let mut shown = 0usize;
        let mut dismissed = 0usize;

        for (i, status) in statuses.iter().enumerate() {
            let was_open = dedup.is_open();
            let failure = RequestFailure { status_code: *status, response_body: String::new() };
            if dedup.report_failure(FailureDetails::from(failure)).is_some() {
                prop_assert!(!was_open);
                shown += 1;
            }
            if (i + 1) % dismiss_every == 0 && dedup.is_open() {
                let id = dedup.current().map(|n| n.id).unwrap();
                prop_assert!(dedup.dismiss(id));
                prop_assert!(!dedup.dismiss(id));
                dismissed += 1;
            }
        }

        prop_assert!(shown <= dismissed + 1);
    }

    /// A planned selection always points at an entry with the requested key.
    #[test]
    fn prop_plan_points_at_matching_key(
        keys in prop::collection::vec(0u8..10, 0..20),
        target in 0u8..10,
    ) {
        let keys: Vec<String> = keys.iter().map(u8::to_string).collect();
        let target = target.to_string();

        match plan_selection(SelectionMode::SingleSelectMaster, None, &keys, &target) {
            SelectionPlan::Select { index } => {
                prop_assert_eq!(&keys[index], &target);
                prop_assert!(keys[..index].iter().all(|k| k != &target));
            },
            SelectionPlan::NoMatch => prop_assert!(!keys.contains(&target)),
            other => prop_assert!(false, "unexpected plan {:?}", other),
        }
    }
}
