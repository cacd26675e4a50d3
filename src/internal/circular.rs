//! Cycle detection for wrapper unwrapping.

use std::cell::RefCell;

use smallvec::SmallVec;

use crate::descriptors::TypeDescriptor;
use crate::error::{DiError, DiResult};
use crate::provider::ScopeId;

// Each frame is a full recursive `can_locate` call; this keeps a 2 MB
// debug-build thread stack well clear of overflow.
pub(crate) const MAX_DEPTH: usize = 64;

type Frame = (ScopeId, TypeDescriptor);

// Thread-local unwrap state; frames are per scope so a parent may legitimately
// unwrap a type its child is already unwrapping.
thread_local! {
    static UNWRAP_TLS: RefCell<SmallVec<[Frame; 8]>> = RefCell::new(SmallVec::new());
}

/// Guard for one frame of the thread-local unwrap stack.
///
/// Entering a frame already on the stack is a configuration cycle; the
/// frame is popped when the guard drops, including on early `?` returns.
#[must_use]
pub(crate) struct UnwrapGuard {
    _private: (),
}

impl UnwrapGuard {
    pub(crate) fn enter(scope: ScopeId, ty: &TypeDescriptor) -> DiResult<Self> {
        UNWRAP_TLS.with(|tls| {
            let mut stack = tls.borrow_mut();

            // Cycle detection BEFORE pushing the new frame
            if stack.iter().any(|(s, t)| *s == scope && t == ty) {
                let mut path: Vec<String> = stack
                    .iter()
                    .filter(|(s, _)| *s == scope)
                    .map(|(_, t)| t.to_string())
                    .collect();
                path.push(ty.to_string());
                return Err(DiError::InvalidWrapperConfiguration { path });
            }

            if stack.len() >= MAX_DEPTH {
                return Err(DiError::DepthExceeded(stack.len()));
            }

            stack.push((scope, ty.clone()));
            Ok(Self { _private: () })
        })
    }
}

impl Drop for UnwrapGuard {
    fn drop(&mut self) {
        UNWRAP_TLS.with(|tls| {
            tls.borrow_mut().pop();
        });
    }
}

#[cfg(test)]
pub(crate) fn depth() -> usize {
    UNWRAP_TLS.with(|tls| tls.borrow().len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reentering_a_frame_is_a_cycle() {
        let scope = ScopeId::next();
        let ty = TypeDescriptor::class("app::Loop");
        let _outer = UnwrapGuard::enter(scope, &ty).unwrap();
        let err = UnwrapGuard::enter(scope, &ty).err().unwrap();
        match err {
            DiError::InvalidWrapperConfiguration { path } => {
                assert_eq!(path, vec!["app::Loop".to_string(), "app::Loop".to_string()]);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn same_type_in_another_scope_is_allowed() {
        let ty = TypeDescriptor::class("app::Shared");
        let _child = UnwrapGuard::enter(ScopeId::next(), &ty).unwrap();
        let _parent = UnwrapGuard::enter(ScopeId::next(), &ty).unwrap();
        assert_eq!(depth(), 2);
    }

    #[test]
    fn frames_pop_on_drop() {
        {
            let _guard = UnwrapGuard::enter(ScopeId::next(), &TypeDescriptor::class("app::A")).unwrap();
            assert_eq!(depth(), 1);
        }
        assert_eq!(depth(), 0);
    }

    #[test]
    fn distinct_frames_stop_at_max_depth() {
        let scope = ScopeId::next();
        let mut guards = Vec::new();
        for i in 0..MAX_DEPTH {
            guards.push(UnwrapGuard::enter(scope, &TypeDescriptor::class(format!("app::T{}", i))).unwrap());
        }
        let err = UnwrapGuard::enter(scope, &TypeDescriptor::class("app::Overflow")).err().unwrap();
        assert!(matches!(err, DiError::DepthExceeded(depth) if depth == MAX_DEPTH));
        drop(guards);
        assert_eq!(depth(), 0);
    }
}
