mod common;

use std::time::Duration;

use cardflip_carousel::controller::CardEvent;
use cardflip_carousel::timeline::Side;
use cardflip_carousel::{CardController, CardVisualState, Carousel, Face};
use common::{config, deck, factory, ms, record_changes, run_frames};

#[test]
fn three_cards_auto_play_every_eight_seconds() {
    let mut c = Carousel::new(config(8000, true), factory(&[]));
    let seen = record_changes(&mut c);
    c.mount(deck(3), Duration::ZERO);

    run_frames(&mut c, ms(8000), ms(16));
    assert_eq!(*seen.borrow(), vec![1]);

    run_frames(&mut c, ms(16_000), ms(16));
    assert_eq!(*seen.borrow(), vec![1, 2]);

    run_frames(&mut c, ms(24_000), ms(16));
    assert_eq!(*seen.borrow(), vec![1, 2, 0]);
    assert_eq!(c.current_index(), 0);
}

#[test]
fn frame_rate_does_not_change_the_schedule() {
    let mut fast = Carousel::new(config(8000, true), factory(&[]));
    let mut slow = Carousel::new(config(8000, true), factory(&[]));
    let a = record_changes(&mut fast);
    let b = record_changes(&mut slow);
    fast.mount(deck(4), Duration::ZERO);
    slow.mount(deck(4), Duration::ZERO);

    run_frames(&mut fast, ms(40_000), ms(7));
    run_frames(&mut slow, ms(40_000), ms(3000));

    assert_eq!(*a.borrow(), *b.borrow());
    assert_eq!(fast.current_index(), slow.current_index());
}

#[test]
fn auto_play_without_flip_advance_uses_the_interval() {
    let mut c = Carousel::new(config(5000, false), factory(&[]));
    let seen = record_changes(&mut c);
    c.mount(deck(3), Duration::ZERO);

    // Advance fires at 5000 and the entrance lands 1300 ms later.
    run_frames(&mut c, ms(6299), ms(1));
    assert!(seen.borrow().is_empty());
    c.update(ms(6300));
    assert_eq!(*seen.borrow(), vec![1]);
}

#[test]
fn active_card_dwells_flips_and_reports_once() {
    let img = cardflip_carousel::FaceImage {
        width: 1,
        height: 1,
        pixels: std::sync::Arc::from(vec![255u8; 4]),
    };
    let faces = cardflip_carousel::texture::CardFaces { front: img.clone(), back: img };
    let mut card = CardController::new("solo", faces, &config(0, false));
    assert!(card.begin_entry(Duration::ZERO, Duration::ZERO, Side::Right));

    let notices = card.advance(ms(800));
    assert_eq!(notices.iter().map(|n| n.event).collect::<Vec<_>>(), vec![CardEvent::EntryComplete]);
    assert_eq!(card.state(), CardVisualState::ActiveFront);
    assert_eq!(card.object().unwrap().transform.facing(), Face::Front);

    assert!(card.advance(ms(2799)).is_empty());
    assert_eq!(card.state(), CardVisualState::ActiveFront);

    assert!(card.advance(ms(2801)).is_empty());
    assert_eq!(card.state(), CardVisualState::Flipping);

    let notices = card.advance(ms(4000));
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].event, CardEvent::FlipComplete);
    assert_eq!(notices[0].at, ms(4000));
    assert_eq!(card.state(), CardVisualState::ActiveBack);
    assert_eq!(card.object().unwrap().transform.facing(), Face::Back);

    assert!(card.advance(ms(60_000)).is_empty());
}

#[test]
fn broken_card_is_skipped_and_the_rest_play() {
    let mut c = Carousel::new(config(0, false), factory(&["Title 2"]));
    let seen = record_changes(&mut c);
    c.mount(deck(5), Duration::ZERO);

    assert_eq!(c.len(), 5);
    assert_eq!(c.live_count(), 4);
    assert_eq!(c.skipped().len(), 1);
    assert_eq!(c.skipped()[0].0, 2);
    assert!(c.card(2).is_none());

    c.update(ms(1000));
    for expected in [1, 3, 4, 0] {
        assert!(c.next());
        let until = c.now() + ms(1500);
        run_frames(&mut c, until, ms(16));
        assert_eq!(c.current_index(), expected);
        assert_eq!(c.card_state(expected), Some(CardVisualState::ActiveFront));
        assert!(c.card(expected).unwrap().is_visible());
    }

    assert_eq!(*seen.borrow(), vec![1, 3, 4, 0]);
}

#[test]
fn broken_card_never_shows_under_auto_play() {
    let mut c = Carousel::new(config(8000, true), factory(&["Title 2"]));
    let seen = record_changes(&mut c);
    c.mount(deck(5), Duration::ZERO);

    run_frames(&mut c, ms(60_000), ms(50));

    assert!(!seen.borrow().is_empty());
    assert!(!seen.borrow().contains(&2));
    assert!(seen.borrow().iter().all(|&i| i < 5));
}

#[test]
fn every_card_broken_mounts_without_cards() {
    let broken: Vec<String> = (0..3).map(|i| format!("Title {i}")).collect();
    let refs: Vec<&str> = broken.iter().map(String::as_str).collect();
    let mut c = Carousel::new(config(1000, true), factory(&refs));
    c.mount(deck(3), Duration::ZERO);

    assert_eq!(c.live_count(), 0);
    assert!(!c.next());
    assert!(!c.has_pending_advance());
    c.update(ms(10_000));
}
