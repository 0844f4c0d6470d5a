/// Advances `index` by one slot, wrapping to zero at `capacity`.
#[inline]
pub fn wrap_inc(index: usize, capacity: usize) -> usize {
    debug_assert!(index < capacity);
    if index + 1 == capacity {
        0
    } else {
        index + 1
    }
}

/// Steps `index` back by one slot, wrapping to `capacity - 1` at zero.
#[inline]
pub fn wrap_dec(index: usize, capacity: usize) -> usize {
    debug_assert!(index < capacity);
    if index == 0 {
        capacity - 1
    } else {
        index - 1
    }
}

/// Number of occupied slots between `head` and `tail`.
///
/// `head == tail` is ambiguous on its own, so the caller passes the empty flag.
#[inline]
pub fn count(head: usize, tail: usize, empty: bool, capacity: usize) -> usize {
    if empty {
        return 0;
    }
    debug_assert!(head < capacity);
    debug_assert!(tail < capacity);
    if tail > head {
        tail - head
    } else {
        capacity + tail - head
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inc_wraps_at_capacity() {
        assert_eq!(wrap_inc(0, 3), 1);
        assert_eq!(wrap_inc(1, 3), 2);
        assert_eq!(wrap_inc(2, 3), 0);
        assert_eq!(wrap_inc(0, 1), 0);
    }

    #[test]
    fn dec_wraps_at_zero() {
        assert_eq!(wrap_dec(0, 3), 2);
        assert_eq!(wrap_dec(2, 3), 1);
        assert_eq!(wrap_dec(0, 1), 0);
    }

    #[test]
    fn count_uses_empty_flag() {
        assert_eq!(count(1, 1, true, 4), 0);
        assert_eq!(count(1, 1, false, 4), 4);
        assert_eq!(count(1, 3, false, 4), 2);
        assert_eq!(count(3, 1, false, 4), 2);
    }
}
