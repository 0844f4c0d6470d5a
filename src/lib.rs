//! A circular buffer with fixed capacity, and a small script interpreter
//! driving it.
//!
//! The buffer appends at the tail and removes from the head in `O(1)`. Slots
//! are allocated once, when the buffer is initialized, and never grow.
//!
//! # Capacity
//!
//! Unlike a sentinel-slot ring buffer, every slot is usable: `capacity()` is
//! exactly the number of slots requested. When head and tail meet, an empty
//! flag tells a full buffer from an empty one. A buffer of capacity 0 is
//! always full.
//!
//! # Errors
//!
//! Fallible operations return [`Result`], whose error carries an
//! [`ErrorKind`] and a message. Nothing in the buffer logs or retries.
//!
//! # Examples
//! ```
//! use circbuf::{ErrorKind, RingBuffer};
//!
//! let mut buf: RingBuffer<String> = RingBuffer::new(3).unwrap();
//! assert!(buf.is_empty());
//!
//! buf.append_many(vec!["a".to_string(), "b".to_string(), "c".to_string()]).unwrap();
//! assert!(buf.is_full());
//!
//! let err = buf.append_one("d".to_string()).unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::BufferFull);
//!
//! buf.remove_one().unwrap();
//! buf.append_one("d".to_string()).unwrap();
//!
//! let items: Vec<&str> = buf.iter().map(|s| s.as_str()).collect();
//! assert_eq!(items, ["b", "c", "d"]);
//! ```
//!
//! The [`script`] module reads a capacity and a list of commands from a
//! stream and applies them to a `RingBuffer<String>`:
//!
//! ```
//! use circbuf::script::Interpreter;
//!
//! let mut out = Vec::new();
//! let status = Interpreter::new(&mut out).run("3\nA 2\nx y\nL\nR 1\nL\nQ\n".as_bytes());
//! assert!(status.is_quit());
//! assert_eq!(out, b"x\ny\ny\n");
//! ```

#![deny(missing_docs)]

use std::fmt;
use std::iter::FusedIterator;
use std::mem;

mod utils;
pub mod error;
pub mod script;

pub use error::{Error, ErrorKind, Result, Status};
use utils::{count, wrap_dec, wrap_inc};

/// A fixed capacity ring buffer.
///
/// `append_one` adds to the tail and `remove_one` discards from the head, so
/// iterating goes from the oldest element to the newest.
///
/// The slot vector is allocated by [`RingBuffer::new`] or
/// [`RingBuffer::init`] and keeps its length until the next `init`.
pub struct RingBuffer<T> {
    slots: Vec<T>,
    head: usize,
    tail: usize,
    empty: bool,
}

impl<T> Default for RingBuffer<T> {
    /// A buffer with no slots. It is full until `init` gives it some.
    #[inline]
    fn default() -> Self {
        RingBuffer {
            slots: Vec::new(),
            head: 0,
            tail: 0,
            empty: true,
        }
    }
}

impl<T> RingBuffer<T> {
    #[inline]
    fn wrap_inc(&self, index: usize) -> usize {
        wrap_inc(index, self.slots.len())
    }

    /// Returns the number of slots.
    ///
    /// # Examples
    ///
    /// ```
    /// use circbuf::RingBuffer;
    ///
    /// let buf: RingBuffer<u32> = RingBuffer::new(5).unwrap();
    /// assert_eq!(buf.capacity(), 5);
    /// ```
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the number of stored elements.
    ///
    /// # Examples
    ///
    /// ```
    /// use circbuf::RingBuffer;
    ///
    /// let mut buf: RingBuffer<u32> = RingBuffer::new(4).unwrap();
    /// assert_eq!(buf.len(), 0);
    /// buf.append_one(1).unwrap();
    /// assert_eq!(buf.len(), 1);
    /// ```
    #[inline]
    pub fn len(&self) -> usize {
        count(self.head, self.tail, self.empty, self.capacity())
    }

    /// Returns true if the buffer contains no elements.
    ///
    /// # Examples
    ///
    /// ```
    /// use circbuf::RingBuffer;
    ///
    /// let mut buf: RingBuffer<u32> = RingBuffer::new(2).unwrap();
    /// assert!(buf.is_empty());
    /// buf.append_one(1).unwrap();
    /// assert!(!buf.is_empty());
    /// ```
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.empty
    }

    /// Returns true if no further element can be appended.
    ///
    /// A zero-capacity buffer is always full.
    ///
    /// # Examples
    ///
    /// ```
    /// use circbuf::RingBuffer;
    ///
    /// let mut buf: RingBuffer<u32> = RingBuffer::new(1).unwrap();
    /// assert!(!buf.is_full());
    /// buf.append_one(1).unwrap();
    /// assert!(buf.is_full());
    ///
    /// let none: RingBuffer<u32> = RingBuffer::new(0).unwrap();
    /// assert!(none.is_full());
    /// ```
    #[inline]
    pub fn is_full(&self) -> bool {
        self.slots.is_empty() || (!self.empty && self.head == self.tail)
    }

    /// Returns the oldest element, or `None` if the buffer is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use circbuf::RingBuffer;
    ///
    /// let mut buf: RingBuffer<u32> = RingBuffer::new(3).unwrap();
    /// assert_eq!(buf.front(), None);
    /// buf.append_many(vec![7, 8]).unwrap();
    /// assert_eq!(buf.front(), Some(&7));
    /// ```
    #[inline]
    pub fn front(&self) -> Option<&T> {
        if self.empty {
            None
        } else {
            Some(&self.slots[self.head])
        }
    }

    /// Appends an element at the tail.
    ///
    /// Fails with `BufferFull`, leaving the buffer untouched, if every slot
    /// is taken.
    ///
    /// # Examples
    ///
    /// ```
    /// use circbuf::{ErrorKind, RingBuffer};
    ///
    /// let mut buf: RingBuffer<u32> = RingBuffer::new(1).unwrap();
    /// assert!(buf.append_one(1).is_ok());
    /// assert_eq!(buf.append_one(2).unwrap_err().kind(), ErrorKind::BufferFull);
    /// ```
    pub fn append_one(&mut self, element: T) -> Result {
        if self.is_full() {
            return Err(Error::full("Buffer is full and cannot append any element"));
        }
        let tail = self.tail;
        self.slots[tail] = element;
        self.tail = self.wrap_inc(tail);
        self.empty = false;
        Ok(())
    }

    /// Appends every element of `elements` in order.
    ///
    /// Stops at the first failure and returns it. Elements appended before
    /// the failure stay in the buffer.
    ///
    /// # Examples
    ///
    /// ```
    /// use circbuf::{ErrorKind, RingBuffer};
    ///
    /// let mut buf: RingBuffer<u32> = RingBuffer::new(2).unwrap();
    /// let err = buf.append_many(vec![1, 2, 3]).unwrap_err();
    /// assert_eq!(err.kind(), ErrorKind::BufferFull);
    /// assert_eq!(buf.len(), 2);
    /// ```
    pub fn append_many<I>(&mut self, elements: I) -> Result
        where I: IntoIterator<Item = T>
    {
        for element in elements {
            self.append_one(element)?;
        }
        Ok(())
    }

    /// Visits the stored elements from oldest to newest.
    ///
    /// An empty buffer is not an error: the visitor is simply never called.
    ///
    /// # Examples
    ///
    /// ```
    /// use circbuf::RingBuffer;
    ///
    /// let mut buf: RingBuffer<u32> = RingBuffer::new(3).unwrap();
    /// buf.append_many(vec![1, 2, 3]).unwrap();
    ///
    /// let mut seen = Vec::new();
    /// buf.for_each_in_order(|x| seen.push(*x)).unwrap();
    /// assert_eq!(seen, [1, 2, 3]);
    /// ```
    pub fn for_each_in_order<F>(&self, visit: F) -> Result
        where F: FnMut(&T)
    {
        self.iter().for_each(visit);
        Ok(())
    }

    /// Like `for_each_in_order`, with a visitor that can fail.
    ///
    /// The walk stops at the first visitor error, which is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use circbuf::RingBuffer;
    ///
    /// let mut buf: RingBuffer<u32> = RingBuffer::new(3).unwrap();
    /// buf.append_many(vec![1, 2, 3]).unwrap();
    ///
    /// let mut seen = Vec::new();
    /// let res = buf.try_for_each_in_order(|x| {
    ///     if *x == 2 {
    ///         return Err("two");
    ///     }
    ///     seen.push(*x);
    ///     Ok(())
    /// });
    /// assert_eq!(res, Err("two"));
    /// assert_eq!(seen, [1]);
    /// ```
    pub fn try_for_each_in_order<F, E>(&self, mut visit: F) -> std::result::Result<(), E>
        where F: FnMut(&T) -> std::result::Result<(), E>
    {
        for element in self.iter() {
            visit(element)?;
        }
        Ok(())
    }

    /// Returns a front-to-back iterator.
    ///
    /// # Examples
    ///
    /// ```
    /// use circbuf::RingBuffer;
    ///
    /// let mut buf: RingBuffer<i32> = RingBuffer::new(4).unwrap();
    /// buf.append_many(vec![5, 3, 4]).unwrap();
    /// let b: &[_] = &[&5, &3, &4];
    /// let c: Vec<&i32> = buf.iter().collect();
    /// assert_eq!(&c[..], b);
    /// ```
    #[inline]
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            ring: &self.slots,
            head: self.head,
            tail: self.tail,
            len: self.len(),
        }
    }
}

impl<T: Default> RingBuffer<T> {
    /// Creates an empty buffer with `capacity` default-valued slots.
    ///
    /// Fails with `AllocationFault` if the slots cannot be allocated.
    ///
    /// # Examples
    ///
    /// ```
    /// use circbuf::RingBuffer;
    ///
    /// let buf: RingBuffer<String> = RingBuffer::new(3).unwrap();
    /// assert!(buf.is_empty());
    /// assert!(!buf.is_full());
    /// ```
    pub fn new(capacity: usize) -> Result<Self> {
        let mut buf = RingBuffer::default();
        buf.init(capacity)?;
        Ok(buf)
    }

    /// Reallocates the buffer with `capacity` default-valued slots.
    ///
    /// Any stored elements are dropped and the buffer becomes empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use circbuf::RingBuffer;
    ///
    /// let mut buf: RingBuffer<u32> = RingBuffer::default();
    /// assert!(buf.is_full());
    /// buf.init(2).unwrap();
    /// assert_eq!(buf.capacity(), 2);
    /// assert!(buf.is_empty());
    /// ```
    pub fn init(&mut self, capacity: usize) -> Result {
        let mut slots = Vec::new();
        slots.try_reserve_exact(capacity).map_err(|err| {
            Error::allocation(format!("cannot allocate {} slots: {}", capacity, err))
        })?;
        slots.resize_with(capacity, T::default);

        self.slots = slots;
        self.head = 0;
        self.tail = 0;
        self.empty = true;
        Ok(())
    }

    /// Discards the oldest element.
    ///
    /// Fails with `BufferEmpty` if there is nothing to remove. The removed
    /// value is dropped; use `front` first to look at it.
    ///
    /// # Examples
    ///
    /// ```
    /// use circbuf::{ErrorKind, RingBuffer};
    ///
    /// let mut buf: RingBuffer<u32> = RingBuffer::new(2).unwrap();
    /// buf.append_one(1).unwrap();
    /// assert!(buf.remove_one().is_ok());
    /// assert_eq!(buf.remove_one().unwrap_err().kind(), ErrorKind::BufferEmpty);
    /// ```
    pub fn remove_one(&mut self) -> Result {
        if self.is_empty() {
            return Err(Error::empty("Buffer is empty and cannot remove any element"));
        }
        let head = self.head;
        drop(mem::take(&mut self.slots[head]));
        self.head = self.wrap_inc(head);
        self.empty = self.head == self.tail;
        Ok(())
    }

    /// Discards the `n` oldest elements.
    ///
    /// Stops at the first failure and returns it. Elements removed before the
    /// failure stay removed.
    ///
    /// # Examples
    ///
    /// ```
    /// use circbuf::{ErrorKind, RingBuffer};
    ///
    /// let mut buf: RingBuffer<u32> = RingBuffer::new(3).unwrap();
    /// buf.append_many(vec![1, 2]).unwrap();
    /// assert_eq!(buf.remove_many(3).unwrap_err().kind(), ErrorKind::BufferEmpty);
    /// assert!(buf.is_empty());
    /// ```
    pub fn remove_many(&mut self, n: usize) -> Result {
        for _ in 0..n {
            self.remove_one()?;
        }
        Ok(())
    }
}

impl<T: Clone> Clone for RingBuffer<T> {
    fn clone(&self) -> Self {
        RingBuffer {
            slots: self.slots.clone(),
            head: self.head,
            tail: self.tail,
            empty: self.empty,
        }
    }
}

impl<T: PartialEq> PartialEq for RingBuffer<T> {
    /// Two buffers are equal when they store the same elements in the same
    /// order, whatever their capacities or index positions.
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for RingBuffer<T> {}

impl<T: fmt::Debug> fmt::Debug for RingBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<'a, T> IntoIterator for &'a RingBuffer<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// `RingBuffer` iterator
#[must_use = "iterator adaptors are lazy and do nothing unless consumed"]
#[derive(Clone)]
pub struct Iter<'a, T: 'a> {
    ring: &'a [T],
    head: usize,
    tail: usize,
    len: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<&'a T> {
        if self.len == 0 {
            return None;
        }
        let head = self.head;
        self.head = wrap_inc(head, self.ring.len());
        self.len -= 1;
        Some(&self.ring[head])
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    #[inline]
    fn next_back(&mut self) -> Option<&'a T> {
        if self.len == 0 {
            return None;
        }
        self.tail = wrap_dec(self.tail, self.ring.len());
        self.len -= 1;
        Some(&self.ring[self.tail])
    }
}

impl<'a, T> ExactSizeIterator for Iter<'a, T> {}

impl<'a, T> FusedIterator for Iter<'a, T> {}
