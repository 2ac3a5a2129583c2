use crate::{Conditional, ConditionalIdx, Mask};
use fixedbitset::FixedBitSet;
use std::collections::VecDeque;

pub(crate) struct Worklist {
    queue: VecDeque<ConditionalIdx>,
    queued: FixedBitSet,
}

impl Worklist {
    pub fn new(num_conditionals: usize) -> Self {
        Self {
            queue: VecDeque::with_capacity(num_conditionals),
            queued: FixedBitSet::with_capacity(num_conditionals),
        }
    }

    pub fn push(&mut self, idx: ConditionalIdx) -> bool {
        let fresh = !self.queued.put(idx);
        if fresh {
            self.queue.push_back(idx);
        }
        fresh
    }

    #[must_use]
    pub fn pop(&mut self) -> Option<ConditionalIdx> {
        let idx = self.queue.pop_front()?;
        self.queued.set(idx, false);
        Some(idx)
    }

    /// Queues every conditional with a positive world among the `raised` ones.
    pub fn invalidate(&mut self, raised: Option<Mask>, conditionals: &[Conditional]) -> usize {
        let raised = match raised {
            Some(mask) => mask,
            None => return 0,
        };

        conditionals
            .iter()
            .enumerate()
            .filter(|(_, conditional)| {
                conditional
                    .positive()
                    .map_or(false, |positive| positive.overlaps(raised))
            })
            .filter(|(idx, _)| self.push(*idx))
            .count()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.queue.len()
    }
}

#[test]
fn queued_once() {
    let mut worklist = Worklist::new(4);

    assert!(worklist.push(2));
    assert!(worklist.push(0));
    assert!(!worklist.push(2));
    assert_eq!(worklist.len(), 2);

    assert_eq!(worklist.pop(), Some(2));
    assert!(worklist.push(2));
    assert_eq!(worklist.pop(), Some(0));
    assert_eq!(worklist.pop(), Some(2));
    assert_eq!(worklist.pop(), None);
}

#[test]
fn invalidation_follows_positive_worlds() -> Result<(), crate::Error> {
    use crate::variables::declared;

    let vars = declared("a b c");
    let conditionals = vec![
        Conditional::parse("a => b", &vars)?,
        Conditional::parse("-a => c", &vars)?,
        Conditional::parse("b => false", &vars)?,
        Conditional::parse("c => a", &vars)?,
    ];
    let mut worklist = Worklist::new(conditionals.len());

    // raising `a and -b` touches the positive worlds of `c => a` only
    let raised = conditionals[0].exception();
    assert_eq!(worklist.invalidate(raised, &conditionals), 1);
    assert_eq!(worklist.pop(), Some(3));

    let raised = crate::Formula::parse("b", &vars)?.mask();
    assert_eq!(worklist.invalidate(raised, &conditionals), 3);
    assert_eq!(worklist.invalidate(None, &conditionals), 0);

    Ok(())
}
