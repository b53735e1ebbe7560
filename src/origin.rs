use super::{exception::UNWIND_ROOT, in_flight, throw::is_throw_helper, trace::Frame};
use core::fmt;
use std::path::{Path, PathBuf};

/// Source location of the call that threw an exception.
///
/// This is where user code called [`throw`](crate::throw) or one of its conditional variants, not
/// a location inside this crate.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Origin {
    file: PathBuf,
    line: u32,
}

impl Origin {
    #[must_use]
    pub fn file(&self) -> &Path {
        &self.file
    }

    #[must_use]
    pub const fn line(&self) -> u32 {
        self.line
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file.display(), self.line)
    }
}

/// Find where the exception currently being handled was thrown.
///
/// Call this from a handler or finalizer of a [`Tryer`](crate::Tryer). It returns `None` when no
/// exception is being handled on this thread, when the exception is a plain panic rather than a
/// value thrown through this crate, or when the stack trace can't be symbolized (e.g. without debug
/// info, or with the `origin` feature disabled).
///
/// # Example
///
/// ```rust
/// use std::cell::Cell;
/// use tryer::{find_origin, r#try, throw};
///
/// let origin = Cell::new(None);
/// r#try(|| throw("bad input"))
///     .catch(|_: &'static str| origin.set(find_origin()))
///     .go();
/// # let _ = origin;
/// ```
#[must_use]
pub fn find_origin() -> Option<Origin> {
    in_flight::with_innermost(|trace| locate_origin(&trace?.frames()))
}

/// Scan a stack, innermost frame first, for the origin of a throw.
///
/// The scan has two phases. First, frames are skipped up to the unwind root. Then, frames of throw
/// helpers are skipped; the first frame after them is the origin. A stack without the root, or with
/// no helper right above the root, did not come from a throw helper and has no origin.
pub(crate) fn locate_origin(frames: &[Frame]) -> Option<Origin> {
    let mut frames = frames
        .iter()
        .skip_while(|frame| !is_unwind_root(frame))
        .filter(|frame| !is_unwind_root(frame))
        .peekable();

    frames.next_if(|frame| is_throw_helper(frame))?;
    let origin = frames.find(|frame| !is_throw_helper(frame))?;
    Some(Origin {
        file: origin.file.clone()?,
        line: origin.line?,
    })
}

fn is_unwind_root(frame: &Frame) -> bool {
    frame.function.as_deref() == Some(UNWIND_ROOT)
}
