//! Integration tests for the discrete-event queue.

use soc_pmu::pmu::{DomainId, Scheduler, TimerEvent};
use soc_pmu::sim::EventQueue;

/// Tests that events come out in time order.
#[test]
fn test_events_pop_in_time_order() {
    let mut queue = EventQueue::new();
    queue.push(30, "c");
    queue.push(10, "a");
    queue.push(20, "b");

    assert_eq!(queue.pop(), Some((10, "a")));
    assert_eq!(queue.now(), 10);
    assert_eq!(queue.pop(), Some((20, "b")));
    assert_eq!(queue.pop(), Some((30, "c")));
    assert_eq!(queue.pop(), None);
}

/// Tests that simultaneous events keep scheduling order.
#[test]
fn test_simultaneous_events_are_fifo() {
    let mut queue = EventQueue::new();
    for i in 0..5 {
        queue.push(7, i);
    }
    let order: Vec<i32> = std::iter::from_fn(|| queue.pop().map(|(_, e)| e)).collect();
    assert_eq!(order, vec![0, 1, 2, 3, 4]);
}

/// Tests that only events due by the limit are popped.
#[test]
fn test_pop_due_respects_limit() {
    let mut queue = EventQueue::new();
    queue.push(5, ());
    queue.push(15, ());

    assert_eq!(queue.pop_due(10), Some((5, ())));
    assert_eq!(queue.pop_due(10), None);
    assert_eq!(queue.len(), 1);
    assert_eq!(queue.next_time(), Some(15));
}

/// Tests that the clock never moves backwards.
#[test]
fn test_clock_is_monotonic() {
    let mut queue: EventQueue<()> = EventQueue::new();
    queue.advance_to(100);
    queue.advance_to(50);
    assert_eq!(queue.now(), 100);

    queue.push_at(20, ());
    assert_eq!(queue.next_time(), Some(100));
}

/// Tests the scheduler view used by the power manager.
#[test]
fn test_scheduler_delays_are_relative() {
    let mut queue: EventQueue<TimerEvent> = EventQueue::new();
    queue.advance_to(40);
    let event = TimerEvent {
        domain: DomainId::new(2),
        epoch: 0,
    };
    Scheduler::schedule(&mut queue, 60, event);

    assert_eq!(Scheduler::now(&queue), 40);
    assert_eq!(queue.pop(), Some((100, event)));
}
