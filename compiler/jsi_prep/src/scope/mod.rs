//! Scope classification of the traversal.
//!
//! A [`Scope`] is an immutable value passed down the recursion. Entering a
//! declaration body produces a new scope for the children; the parent keeps
//! its own copy, so leaving the body restores the previous classification
//! whichever way the subtree's rewrite returns.

use bitflags::bitflags;

bitflags! {
    /// Context flags. Several can hold at once, e.g. a class nested in an
    /// enumeration subclass is both `HOST_CLASS` and `ENUM_SUBCLASS`.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct ScopeFlags: u8 {
        /// Inside the body of an object extending js.Any.
        const JS_ANY_MODULE = 1 << 0;
        /// Inside the body of a class or trait extending js.Any.
        const JS_ANY_CLASS = 1 << 1;
        /// Inside the body of an ordinary class or trait.
        const HOST_CLASS = 1 << 2;
        /// Inside a subclass (or subobject) of `Enumeration`.
        const ENUM_SUBCLASS = 1 << 3;
        /// Inside `Enumeration` itself.
        const ENUM_IMPL = 1 << 4;
    }
}

/// Classification of the position the traversal is at.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct Scope {
    flags: ScopeFlags,
}

impl Scope {
    /// Top of a compilation unit: no flag set.
    pub const ROOT: Scope = Scope {
        flags: ScopeFlags::empty(),
    };

    /// The scope of a body nested in this one, with `flags` additionally set.
    #[must_use]
    pub fn enter(self, flags: ScopeFlags) -> Scope {
        Scope {
            flags: self.flags | flags,
        }
    }

    pub fn flags(self) -> ScopeFlags {
        self.flags
    }

    pub fn contains(self, flags: ScopeFlags) -> bool {
        self.flags.contains(flags)
    }

    /// Declarations extending js.Any may appear here.
    pub fn allow_js_any(self) -> bool {
        !self.contains(ScopeFlags::HOST_CLASS)
    }

    /// Only js.Any classes are expected here (top level, or an object
    /// extending js.Any).
    pub fn js_any_class_only(self) -> bool {
        !self.contains(ScopeFlags::JS_ANY_CLASS) && self.allow_js_any()
    }

    /// Inner classes, traits and objects may be declared here.
    pub fn allow_impl_def(self) -> bool {
        !self.in_js_any()
    }

    pub fn in_js_any(self) -> bool {
        self.flags
            .intersects(ScopeFlags::JS_ANY_CLASS | ScopeFlags::JS_ANY_MODULE)
    }

    /// Inside an enumeration subclass but not in `Enumeration` itself.
    pub fn in_enum_subclass(self) -> bool {
        self.contains(ScopeFlags::ENUM_SUBCLASS) && !self.contains(ScopeFlags::ENUM_IMPL)
    }

    pub fn in_enum_impl(self) -> bool {
        self.contains(ScopeFlags::ENUM_IMPL)
    }
}
