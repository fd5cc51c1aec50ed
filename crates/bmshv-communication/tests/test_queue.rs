use bmshv_communication::BoundedQueue;
use bmshv_core::config::OverflowPolicy;
use bmshv_core::{Discarded, OutboundCommand, QueueError};
use proptest::prelude::*;
use std::thread;

#[test]
fn test_fifo_order() {
    let queue = BoundedQueue::new("test", 3, OverflowPolicy::DropNewest);
    for i in 0..3 {
        queue.try_push(i).unwrap();
    }
    assert!(queue.is_full());
    assert_eq!(queue.try_pop(), Some(0));
    assert_eq!(queue.try_pop(), Some(1));
    assert_eq!(queue.try_pop(), Some(2));
    assert_eq!(queue.try_pop(), None);
}

#[test]
fn test_second_command_keeps_the_first() {
    let queue = BoundedQueue::new("outbound", 1, OverflowPolicy::DropNewest);
    let first = OutboundCommand::parse("!C-ON@").unwrap();
    let second = OutboundCommand::parse("!B-ON@").unwrap();

    assert!(queue.try_push(first.clone()).is_ok());
    let err = queue.try_push(second).unwrap_err();
    assert_eq!(
        err,
        QueueError::Overflow {
            queue: "outbound".to_string(),
            capacity: 1,
            discarded: Discarded::Incoming,
        }
    );
    assert_eq!(queue.try_pop(), Some(first));
    assert!(queue.is_empty());
}

#[test]
fn test_displace_oldest_keeps_freshest() {
    let queue = BoundedQueue::new("inbound", 1, OverflowPolicy::DisplaceOldest);
    queue.try_push("old".to_string()).unwrap();
    let err = queue.try_push("new".to_string()).unwrap_err();

    assert!(matches!(
        err,
        QueueError::Overflow {
            discarded: Discarded::Stale,
            ..
        }
    ));
    assert_eq!(queue.len(), 1);
    assert_eq!(queue.try_pop().as_deref(), Some("new"));
}

#[test]
fn test_clones_share_storage() {
    let producer = BoundedQueue::new("inbound", 8, OverflowPolicy::DropNewest);
    let consumer = producer.clone();

    let worker = thread::spawn(move || {
        for i in 0..8 {
            producer.try_push(i).unwrap();
        }
    });
    worker.join().unwrap();

    let drained: Vec<i32> = std::iter::from_fn(|| consumer.try_pop()).collect();
    assert_eq!(drained, (0..8).collect::<Vec<_>>());
    assert!(consumer.is_empty());
}

#[derive(Debug, Clone)]
enum Op {
    Push(u8),
    Pop,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![any::<u8>().prop_map(Op::Push), Just(Op::Pop)]
}

proptest! {
    #[test]
    fn prop_never_exceeds_capacity(
        capacity in 1usize..4,
        displace in any::<bool>(),
        ops in proptest::collection::vec(op(), 0..64),
    ) {
        let policy = if displace {
            OverflowPolicy::DisplaceOldest
        } else {
            OverflowPolicy::DropNewest
        };
        let queue = BoundedQueue::new("prop", capacity, policy);

        for op in ops {
            match op {
                Op::Push(value) => {
                    let was_full = queue.is_full();
                    let result = queue.try_push(value);
                    prop_assert_eq!(result.is_err(), was_full);
                }
                Op::Pop => {
                    queue.try_pop();
                }
            }
            prop_assert!(queue.len() <= capacity);
        }
    }
}
