//! Per-request permission context.
//!
//! The current user is not global state: every check receives the
//! context of the request it belongs to. Contexts must not be shared
//! between concurrent requests.

use parking_lot::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::model::UserReference;

/// Identity and sudo state of one logical request or session.
#[derive(Debug)]
pub struct PermissionContext {
    current_user: RwLock<UserReference>,
    sudo_depth: AtomicUsize,
}

impl PermissionContext {
    /// Create a context acting as `user`.
    pub fn new(user: UserReference) -> Self {
        Self {
            current_user: RwLock::new(user),
            sudo_depth: AtomicUsize::new(0),
        }
    }

    /// Replace the user subsequent checks run for.
    pub fn set_current_user_reference(&self, user: UserReference) {
        *self.current_user.write() = user;
    }

    /// Snapshot of the current user.
    pub fn current_user_reference(&self) -> UserReference {
        self.current_user.read().clone()
    }

    /// Run `f` with permission checks bypassed.
    ///
    /// Scopes nest; checks are bypassed until the outermost scope ends,
    /// including when `f` panics.
    pub fn sudo<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Self) -> R,
    {
        let _guard = SudoGuard::enter(&self.sudo_depth);
        f(self)
    }

    /// Whether a sudo scope is active.
    pub fn in_sudo(&self) -> bool {
        self.sudo_depth.load(Ordering::Acquire) > 0
    }
}

impl Default for PermissionContext {
    fn default() -> Self {
        Self::new(UserReference::anonymous())
    }
}

struct SudoGuard<'a> {
    depth: &'a AtomicUsize,
}

impl<'a> SudoGuard<'a> {
    fn enter(depth: &'a AtomicUsize) -> Self {
        depth.fetch_add(1, Ordering::AcqRel);
        Self { depth }
    }
}

impl Drop for SudoGuard<'_> {
    fn drop(&mut self) {
        self.depth.fetch_sub(1, Ordering::AcqRel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic::{catch_unwind, AssertUnwindSafe};

    #[test]
    fn test_set_and_get_current_user() {
        let context = PermissionContext::new(UserReference::with_login("admin"));
        assert_eq!(context.current_user_reference().login, "admin");

        let editor = UserReference::with_login("editor");
        context.set_current_user_reference(editor.clone());
        assert_eq!(context.current_user_reference(), editor);
    }

    #[test]
    fn test_default_is_anonymous() {
        let context = PermissionContext::default();
        assert_eq!(context.current_user_reference().login, "anonymous");
    }

    #[test]
    fn test_sudo_nests() {
        let context = PermissionContext::default();
        assert!(!context.in_sudo());

        let depth = context.sudo(|ctx| {
            assert!(ctx.in_sudo());
            ctx.sudo(|inner| assert!(inner.in_sudo()));
            ctx.in_sudo()
        });

        assert!(depth);
        assert!(!context.in_sudo());
    }

    #[test]
    fn test_sudo_ends_on_panic() {
        let context = PermissionContext::default();
        let result = catch_unwind(AssertUnwindSafe(|| {
            context.sudo(|_| panic!("boom"));
        }));

        assert!(result.is_err());
        assert!(!context.in_sudo());
    }
}
