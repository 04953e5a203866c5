use super::*;
use crate::view::ViewAction;
use uuid::Uuid;

fn profile(n: u128, first_name: &str) -> Profile {
    Profile {
        id: ProfileId(Uuid::from_u128(n)),
        first_name: first_name.to_string(),
        last_name: "Tester".to_string(),
        age: 20 + n as u32,
        city: "Tampere".to_string(),
        country: "Finland".to_string(),
        image_url: format!("https://example.test/portraits/{n}.jpg"),
    }
}

fn abc() -> Vec<Profile> {
    vec![profile(1, "A"), profile(2, "B"), profile(3, "C")]
}

fn loaded(profiles: Vec<Profile>) -> ProfileBrowser {
    let mut browser = ProfileBrowser::new();
    let ticket = browser.begin_fetch().expect("first fetch starts");
    browser.finish_fetch(ticket, Ok(profiles));
    browser
}

fn decide_and_advance(browser: &mut ProfileBrowser, decision: Decision) {
    let ticket = browser.decide(decision).expect("decision accepted");
    assert!(browser.complete_exit(ticket));
}

fn liked_names(browser: &ProfileBrowser) -> Vec<&str> {
    browser
        .liked()
        .iter()
        .map(|profile| profile.first_name.as_str())
        .collect()
}

#[test]
fn new_browser_starts_idle_with_nothing_to_decide() {
    let mut browser = ProfileBrowser::new();
    assert_eq!(browser.state(), BrowserState::Idle);

    let screen = browser.render();
    assert_eq!(screen.view, View::Blank);
    assert!(!screen.decisions_enabled);
    assert!(!screen.loading);
    assert_eq!(screen.liked_count, 0);
    assert!(browser.decide(Decision::Accept).is_none());
}

#[test]
fn loading_shows_spinner_and_disables_decisions() {
    let mut browser = ProfileBrowser::new();
    let _ticket = browser.begin_fetch().expect("fetch starts");

    assert_eq!(browser.state(), BrowserState::Loading);
    let screen = browser.render();
    assert!(screen.loading);
    assert!(!screen.decisions_enabled);
    assert_eq!(screen.view, View::Blank);
}

#[test]
fn fetch_while_loading_changes_nothing() {
    let mut browser = loaded(abc());
    decide_and_advance(&mut browser, Decision::Accept);

    let _in_flight = browser.begin_fetch().expect("refetch starts");
    let batch_before = browser.batch().to_vec();
    let cursor_before = browser.cursor();
    let liked_before = browser.liked().to_vec();
    let screen_before = browser.render();

    assert!(browser.begin_fetch().is_none());
    assert!(browser.begin_fetch().is_none());

    assert_eq!(browser.batch(), batch_before.as_slice());
    assert_eq!(browser.cursor(), cursor_before);
    assert_eq!(browser.liked(), liked_before.as_slice());
    assert_eq!(browser.render(), screen_before);
}

#[test]
fn batch_of_k_needs_exactly_k_decisions() {
    for k in 1..=6u128 {
        let profiles: Vec<Profile> = (0..k).map(|n| profile(n, "P")).collect();
        let mut browser = loaded(profiles);
        assert_eq!(browser.state(), BrowserState::Ready { cursor: 0 });

        for step in 0..k as usize {
            assert_eq!(browser.state(), BrowserState::Ready { cursor: step });
            decide_and_advance(&mut browser, Decision::Reject);
        }
        assert_eq!(browser.state(), BrowserState::Exhausted);
        assert_eq!(browser.cursor(), k as usize);
    }
}

#[test]
fn accept_reject_accept_scenario_ends_exhausted_with_two_likes() {
    let mut browser = loaded(abc());

    decide_and_advance(&mut browser, Decision::Accept);
    decide_and_advance(&mut browser, Decision::Reject);
    decide_and_advance(&mut browser, Decision::Accept);

    assert_eq!(liked_names(&browser), vec!["A", "C"]);
    assert_eq!(browser.state(), BrowserState::Exhausted);

    let screen = browser.render();
    assert_eq!(screen.liked_count, 2);
    assert_eq!(screen.view, View::Terminal(TerminalView { liked_count: 2 }));
    assert_eq!(screen.action(), Some(ViewAction::LoadMore));
    assert!(!screen.decisions_enabled);
}

#[test]
fn double_accept_before_advance_likes_once() {
    let mut browser = loaded(abc());

    let first = browser.decide(Decision::Accept).expect("first click");
    assert!(browser.decide(Decision::Accept).is_none());
    assert!(browser.decide(Decision::Reject).is_none());
    assert!(browser.complete_exit(first));

    assert_eq!(liked_names(&browser), vec!["A"]);
    assert_eq!(browser.cursor(), 1);
}

#[test]
fn liking_the_same_profile_again_in_a_later_batch_is_idempotent() {
    let mut browser = loaded(abc());
    decide_and_advance(&mut browser, Decision::Accept);

    let ticket = browser.begin_fetch().expect("refetch");
    browser.finish_fetch(ticket, Ok(vec![profile(1, "A"), profile(4, "D")]));
    decide_and_advance(&mut browser, Decision::Accept);
    decide_and_advance(&mut browser, Decision::Accept);

    assert_eq!(liked_names(&browser), vec!["A", "D"]);
}

#[test]
fn refetch_after_exhausted_keeps_likes_and_resets_cursor() {
    let mut browser = loaded(abc());
    decide_and_advance(&mut browser, Decision::Accept);
    decide_and_advance(&mut browser, Decision::Reject);
    decide_and_advance(&mut browser, Decision::Reject);
    assert_eq!(browser.state(), BrowserState::Exhausted);

    let ticket = browser.begin_fetch().expect("load more");
    let next = vec![profile(7, "G"), profile(8, "H")];
    browser.finish_fetch(ticket, Ok(next.clone()));

    assert_eq!(browser.state(), BrowserState::Ready { cursor: 0 });
    assert_eq!(browser.batch(), next.as_slice());
    assert_eq!(liked_names(&browser), vec!["A"]);
    assert_eq!(browser.current().map(|p| p.first_name.as_str()), Some("G"));
}

#[test]
fn empty_batch_is_exhausted_not_an_error() {
    let browser = loaded(Vec::new());
    assert_eq!(browser.state(), BrowserState::Exhausted);
    let screen = browser.render();
    assert!(matches!(screen.view, View::Terminal(_)));
    assert!(!screen.decisions_enabled);
}

#[test]
fn failed_fetch_shows_retry_and_keeps_decisions_disabled() {
    let mut browser = ProfileBrowser::new();
    let ticket = browser.begin_fetch().expect("fetch");
    browser.finish_fetch(ticket, Err(FetchFailure::new("HTTP status server error (500)")));

    assert_eq!(browser.state(), BrowserState::Error);
    assert!(!browser.is_loading());
    let screen = browser.render();
    assert!(!screen.decisions_enabled);
    assert_eq!(screen.action(), Some(ViewAction::Retry));
    let View::Error(error_view) = &screen.view else {
        panic!("expected error view, got {:?}", screen.view);
    };
    assert!(error_view.detail.contains("500"));
    assert!(browser.decide(Decision::Accept).is_none());

    let retry = browser.begin_fetch().expect("retry starts a new fetch");
    assert_eq!(browser.state(), BrowserState::Loading);
    browser.finish_fetch(retry, Ok(abc()));
    assert_eq!(browser.state(), BrowserState::Ready { cursor: 0 });
    assert!(browser.render().decisions_enabled);
}

#[test]
fn failed_refetch_keeps_likes_and_blocks_decisions_on_old_batch() {
    let mut browser = loaded(abc());
    decide_and_advance(&mut browser, Decision::Accept);

    let ticket = browser.begin_fetch().expect("refetch");
    browser.finish_fetch(ticket, Err(FetchFailure::new("connection refused")));

    assert_eq!(browser.state(), BrowserState::Error);
    assert_eq!(browser.liked_count(), 1);
    assert!(browser.decide(Decision::Reject).is_none());
}

#[test]
fn decisions_are_disabled_while_card_is_exiting() {
    let mut browser = loaded(abc());
    assert!(browser.render().decisions_enabled);

    let ticket = browser.decide(Decision::Reject).expect("decide");
    let screen = browser.render();
    assert!(!screen.decisions_enabled);
    assert_eq!(screen.exiting, Some(ticket));
    assert!(matches!(screen.view, View::Card(ref card) if card.name == "A Tester"));

    browser.complete_exit(ticket);
    let screen = browser.render();
    assert!(screen.decisions_enabled);
    assert!(matches!(screen.view, View::Card(ref card) if card.name == "B Tester"));
}

#[test]
fn last_exit_lands_on_terminal_view_with_controls_disabled() {
    let mut browser = loaded(vec![profile(1, "A")]);
    let ticket = browser.decide(Decision::Accept).expect("decide");
    assert!(browser.complete_exit(ticket));

    let screen = browser.render();
    assert!(!screen.decisions_enabled);
    assert_eq!(screen.view, View::Terminal(TerminalView { liked_count: 1 }));
}

#[test]
fn stale_exit_completion_is_ignored() {
    let mut browser = loaded(abc());
    let ticket = browser.decide(Decision::Accept).expect("decide");
    assert!(browser.complete_exit(ticket));
    assert!(!browser.complete_exit(ticket));
    assert_eq!(browser.cursor(), 1);

    let old = browser.decide(Decision::Reject).expect("decide");
    let refetch = browser.begin_fetch().expect("refetch");
    browser.finish_fetch(refetch, Ok(abc()));

    assert!(!browser.complete_exit(old));
    assert_eq!(browser.cursor(), 0);
    assert!(browser.render().decisions_enabled);
}

#[test]
fn cursor_never_decreases_or_overruns_within_a_batch() {
    let profiles: Vec<Profile> = (0..8).map(|n| profile(n, "P")).collect();
    let len = profiles.len();
    let mut browser = loaded(profiles);
    let mut seed: u32 = 0x2545_f491;
    let mut last_cursor = 0;

    for _ in 0..64 {
        seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        let decision = if seed & 0x100 == 0 {
            Decision::Accept
        } else {
            Decision::Reject
        };
        if let Some(ticket) = browser.decide(decision) {
            if seed & 0x200 == 0 {
                browser.decide(decision);
            }
            browser.complete_exit(ticket);
            browser.complete_exit(ticket);
        }

        assert!(browser.cursor() >= last_cursor);
        assert!(browser.cursor() <= len);
        last_cursor = browser.cursor();

        let mut ids: Vec<ProfileId> = browser.liked().iter().map(|p| p.id).collect();
        ids.sort_by_key(|id| id.0);
        ids.dedup();
        assert_eq!(ids.len(), browser.liked_count());
    }
    assert_eq!(browser.state(), BrowserState::Exhausted);
}
