//! The dynamic value layer.
//!
//! The mapping engine is driven by runtime type tokens, so the values it
//! moves around are dynamically typed. [`ObjectRef`] is that value: a
//! shared, identity-bearing cell holding any mapped Rust value together
//! with its [`Token`](crate::token::Token).
//!
//! Identity is the load-bearing property. Extracting a typed value clones
//! it out of the cell, but extracting *as* `ObjectRef` aliases the same
//! cell, which is how object graphs with reference cycles are
//! representable in safe Rust: a cyclic field is declared as `ObjectRef`
//! and compared with [`ObjectRef::ptr_eq`].

use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::convert::ConversionError;
use crate::token::{Reflect, Token};

/// Marker value for the dynamic null.
///
/// `Scalar(Null)` mapped into an `Any` target produces an `ObjectRef`
/// wrapping this marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Null;

/// A shared, dynamically typed mapped value.
///
/// Cloning an `ObjectRef` clones the handle; both clones observe the same
/// cell. The cell records the token of the value it holds, which is what
/// serialization uses to pick signatures for `Any`-typed data.
#[derive(Clone)]
pub struct ObjectRef {
    token: Token,
    cell: Rc<RefCell<Box<dyn Any>>>,
}

impl ObjectRef {
    /// Wraps a value whose type is reflectable
    pub fn new<T: Reflect>(value: T) -> Self {
        Self {
            token: Token::of::<T>(),
            cell: Rc::new(RefCell::new(Box::new(value))),
        }
    }

    /// Wraps a value under an explicit token.
    ///
    /// Used where the token carries more information than the Rust type
    /// alone, such as dynamic containers built by the type resolver.
    pub fn with_token<T: Any>(value: T, token: Token) -> Self {
        Self {
            token,
            cell: Rc::new(RefCell::new(Box::new(value))),
        }
    }

    /// The dynamic null value
    pub fn null() -> Self {
        Self {
            token: Token::any(),
            cell: Rc::new(RefCell::new(Box::new(Null))),
        }
    }

    /// Returns true if this reference holds the dynamic null
    pub fn is_null(&self) -> bool {
        self.cell.borrow().as_ref().is::<Null>()
    }

    /// The token of the held value
    pub fn token(&self) -> &Token {
        &self.token
    }

    /// Returns true if the held value is a `T`
    pub fn holds<T: Any>(&self) -> bool {
        self.cell.borrow().as_ref().is::<T>()
    }

    /// Returns true if both references alias the same cell
    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        Rc::ptr_eq(&self.cell, &other.cell)
    }

    /// Stable identity of the cell, used by cycle tables
    pub(crate) fn ptr_id(&self) -> usize {
        Rc::as_ptr(&self.cell) as *const () as usize
    }

    /// Wraps a value, except that wrapping an `ObjectRef` is the identity.
    ///
    /// Container introspection hooks use this so that handing back the
    /// items of a `Vec<ObjectRef>` yields the stored handles rather than
    /// freshly wrapped clones of them.
    pub(crate) fn wrap<T: Reflect>(value: T) -> ObjectRef {
        let boxed: Box<dyn Any> = Box::new(value);
        match boxed.downcast::<ObjectRef>() {
            Ok(object) => *object,
            Err(boxed) => Self {
                token: Token::of::<T>(),
                cell: Rc::new(RefCell::new(boxed)),
            },
        }
    }

    /// Extracts the held value as a `T`.
    ///
    /// When `T` is `ObjectRef` itself this returns an alias of the handle,
    /// preserving identity; any other type is cloned out of the cell.
    pub fn take<T: Reflect>(&self) -> Result<T, ConversionError> {
        if TypeId::of::<T>() == TypeId::of::<ObjectRef>() {
            let boxed: Box<dyn Any> = Box::new(self.clone());
            return match boxed.downcast::<T>() {
                Ok(value) => Ok(*value),
                Err(_) => Err(ConversionError::mismatch(
                    std::any::type_name::<T>(),
                    self.token.name(),
                )),
            };
        }

        self.with_ref(|value: &T| value.clone())
    }

    /// Borrows the held value as a `&T`
    pub fn with_ref<T: Any, R>(&self, f: impl FnOnce(&T) -> R) -> Result<R, ConversionError> {
        let cell = self.cell.borrow();
        // `as_ref` reaches the contents; calling `downcast_ref` on the
        // box would test the box itself, which is also `Any`.
        match cell.as_ref().downcast_ref::<T>() {
            Some(value) => Ok(f(value)),
            None => Err(ConversionError::mismatch(
                std::any::type_name::<T>(),
                self.token.name(),
            )),
        }
    }

    /// Mutably borrows the held value as a `&mut T`
    pub fn with_mut<T: Any, R>(&self, f: impl FnOnce(&mut T) -> R) -> Result<R, ConversionError> {
        let mut cell = self.cell.borrow_mut();
        match cell.as_mut().downcast_mut::<T>() {
            Some(value) => Ok(f(value)),
            None => Err(ConversionError::mismatch(
                std::any::type_name::<T>(),
                self.token.name(),
            )),
        }
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectRef")
            .field("token", &self.token.name())
            .field("ptr", &(Rc::as_ptr(&self.cell) as *const ()))
            .finish()
    }
}
