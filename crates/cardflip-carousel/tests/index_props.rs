mod common;

use std::time::Duration;

use cardflip_carousel::Carousel;
use common::{config, deck, factory, ms, record_changes};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Next,
    Previous,
    Pause,
    Wait(u64),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => Just(Op::Next),
        2 => Just(Op::Previous),
        1 => Just(Op::Pause),
        4 => (1u64..5000).prop_map(Op::Wait),
    ]
}

proptest! {
    #[test]
    fn index_stays_in_range(n in 1usize..7, interval in 0i64..9000, ops in prop::collection::vec(op(), 0..40)) {
        let mut c = Carousel::new(config(interval, true), factory(&[]));
        let seen = record_changes(&mut c);
        c.mount(deck(n), Duration::ZERO);

        for op in ops {
            match op {
                Op::Next => { c.next(); }
                Op::Previous => { c.previous(); }
                Op::Pause => { c.pause_autoplay(); }
                Op::Wait(d) => {
                    let t = c.now() + ms(d);
                    c.update(t);
                }
            }
            prop_assert!(c.current_index() < n);
        }

        prop_assert!(seen.borrow().iter().all(|&i| i < n));
        if n == 1 {
            prop_assert!(seen.borrow().is_empty());
        }
    }

    #[test]
    fn each_completed_transition_reports_once(n in 2usize..6, steps in 1usize..12) {
        let mut c = Carousel::new(config(0, false), factory(&[]));
        let seen = record_changes(&mut c);
        c.mount(deck(n), Duration::ZERO);
        c.update(ms(1000));

        for _ in 0..steps {
            prop_assert!(c.next());
            // Reentrant calls are ignored.
            prop_assert!(!c.next());
            let t = c.now() + ms(1500);
            c.update(t);
        }

        let expected: Vec<usize> = (1..=steps).map(|k| k % n).collect();
        prop_assert_eq!(seen.borrow().clone(), expected);
        prop_assert_eq!(c.current_index(), steps % n);
    }
}
