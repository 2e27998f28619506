use std::cmp::Ordering;

/// Binary min-heap ordered by a caller-supplied comparator. The element for
/// which `compare` reports `Less` against every other is popped first.
pub struct PriorityQueue<T, F> {
    items: Vec<T>,
    compare: F,
}

impl<T, F> PriorityQueue<T, F>
where
    F: Fn(&T, &T) -> Ordering,
{
    pub fn new(compare: F) -> Self {
        Self {
            items: Vec::new(),
            compare,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn push(&mut self, item: T) {
        self.items.push(item);
        self.sift_up(self.items.len() - 1);
    }

    pub fn pop(&mut self) -> Option<T> {
        if self.items.is_empty() {
            return None;
        }
        let last = self.items.len() - 1;
        self.items.swap(0, last);
        let top = self.items.pop();
        if !self.items.is_empty() {
            self.sift_down(0);
        }
        top
    }

    fn less(&self, a: usize, b: usize) -> bool {
        (self.compare)(&self.items[a], &self.items[b]) == Ordering::Less
    }

    fn sift_up(&mut self, mut idx: usize) {
        while idx > 0 {
            let parent = (idx - 1) / 2;
            if !self.less(idx, parent) {
                break;
            }
            self.items.swap(idx, parent);
            idx = parent;
        }
    }

    fn sift_down(&mut self, mut idx: usize) {
        let len = self.items.len();
        loop {
            let left = 2 * idx + 1;
            let right = left + 1;
            let mut smallest = idx;
            if left < len && self.less(left, smallest) {
                smallest = left;
            }
            if right < len && self.less(right, smallest) {
                smallest = right;
            }
            if smallest == idx {
                break;
            }
            self.items.swap(idx, smallest);
            idx = smallest;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain<T, F: Fn(&T, &T) -> Ordering>(queue: &mut PriorityQueue<T, F>) -> Vec<T> {
        let mut out = Vec::new();
        while let Some(item) = queue.pop() {
            out.push(item);
        }
        out
    }

    #[test]
    fn test_pops_in_order() {
        let mut queue = PriorityQueue::new(|a: &i32, b: &i32| a.cmp(b));
        for value in [5, 3, 9, 1, 4, 1, 8, 2, 7] {
            queue.push(value);
        }
        assert_eq!(queue.len(), 9);
        assert_eq!(drain(&mut queue), vec![1, 1, 2, 3, 4, 5, 7, 8, 9]);
        assert!(queue.is_empty());
        assert_eq!(queue.pop(), None);
    }

    #[test]
    fn test_reversed_comparator() {
        let mut queue = PriorityQueue::new(|a: &i32, b: &i32| b.cmp(a));
        for value in [2, 7, 4, 9] {
            queue.push(value);
        }
        assert_eq!(drain(&mut queue), vec![9, 7, 4, 2]);
    }

    #[test]
    fn test_ties_follow_secondary_key() {
        let mut queue = PriorityQueue::new(|a: &(f64, u32), b: &(f64, u32)| {
            a.0.total_cmp(&b.0).then(a.1.cmp(&b.1))
        });
        for (seq, priority) in [2.5, 1.0, 2.5, 1.0, 0.5].into_iter().enumerate() {
            queue.push((priority, seq as u32));
        }
        let order: Vec<u32> = drain(&mut queue).into_iter().map(|(_, seq)| seq).collect();
        assert_eq!(order, vec![4, 1, 3, 0, 2]);
    }

    #[test]
    fn test_interleaved_push_pop() {
        let mut queue = PriorityQueue::new(|a: &u8, b: &u8| a.cmp(b));
        queue.push(4);
        queue.push(2);
        assert_eq!(queue.pop(), Some(2));
        queue.push(1);
        queue.push(3);
        assert_eq!(queue.pop(), Some(1));
        assert_eq!(drain(&mut queue), vec![3, 4]);
    }
}
