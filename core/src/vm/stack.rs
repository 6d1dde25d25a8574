use crate::Vec;
use crate::vm::VmError;
use alloc::fmt;

/// A fixed-capacity operand stack with an explicit stack pointer.
///
/// `sp` is the index of the next free slot, so `sp == 0` means empty. Popping
/// only moves `sp` down: the popped value stays in its slot until the next
/// push overwrites it, which is what [`Stack::last_popped`] reads.
///
/// # Examples
///
/// ```ignore
/// use goblin_core::vm::Stack;
///
/// let mut stack = Stack::new(100);
/// stack.push(42)?;
/// stack.push(17)?;
/// assert_eq!(stack.pop()?, 17);
/// assert_eq!(stack.peek(), Some(&42));
/// assert_eq!(stack.last_popped(), Some(&17));
/// ```
pub struct Stack<T> {
    /// Slots ever written; `items[sp..]` holds stale, already popped values.
    items: Vec<T>,
    sp: usize,
    max_size: usize,
}

impl<T: Clone> Stack<T> {
    /// Creates a new stack that holds at most `max_size` live values.
    ///
    /// The stack will pre-allocate a reasonable amount of space to avoid
    /// frequent reallocations during normal operation.
    pub fn new(max_size: usize) -> Self {
        let initial_capacity = max_size.min(256);

        Self {
            items: Vec::with_capacity(initial_capacity),
            sp: 0,
            max_size,
        }
    }

    /// Pushes a value onto the stack.
    ///
    /// # Errors
    ///
    /// [`VmError::StackOverflow`] if `max_size` values are already live. The
    /// stack is left unchanged.
    #[inline]
    pub fn push(&mut self, value: T) -> Result<(), VmError> {
        if self.sp >= self.max_size {
            return Err(VmError::StackOverflow {
                capacity: self.max_size,
            });
        }

        if self.sp < self.items.len() {
            self.items[self.sp] = value;
        } else {
            self.items.push(value);
        }
        self.sp += 1;
        Ok(())
    }

    /// Removes and returns the top value from the stack.
    ///
    /// # Errors
    ///
    /// [`VmError::StackUnderflow`] if the stack is empty.
    #[inline]
    pub fn pop(&mut self) -> Result<T, VmError> {
        if self.sp == 0 {
            return Err(VmError::StackUnderflow);
        }
        self.sp -= 1;
        Ok(self.items[self.sp].clone())
    }

    /// Pops the top two values, returning `(below, top)`.
    ///
    /// For a binary operator this is `(left, right)`.
    #[inline]
    pub fn pop_pair(&mut self) -> Result<(T, T), VmError> {
        let right = self.pop()?;
        let left = self.pop()?;
        Ok((left, right))
    }
}

impl<T> Stack<T> {
    /// Returns a reference to the top value without removing it.
    ///
    /// Returns `None` if the stack is empty.
    #[inline]
    pub fn peek(&self) -> Option<&T> {
        self.sp.checked_sub(1).map(|top| &self.items[top])
    }

    /// The value in slot `sp`: the most recently popped one, unless a push
    /// has overwritten it since.
    ///
    /// Returns `None` if no value was ever stored in that slot.
    #[inline]
    pub fn last_popped(&self) -> Option<&T> {
        self.items.get(self.sp)
    }

    /// Returns the current number of live elements (the stack pointer).
    #[inline]
    pub fn len(&self) -> usize {
        self.sp
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sp == 0
    }

    /// Returns the maximum number of live values.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.max_size
    }

    /// Returns an iterator over the live elements, bottom to top.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items[..self.sp].iter()
    }
}

impl<T: fmt::Debug> fmt::Debug for Stack<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stack")
            .field("items", &&self.items[..self.sp])
            .field("sp", &self.sp)
            .field("capacity", &self.max_size)
            .finish()
    }
}
