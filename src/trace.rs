use std::path::PathBuf;

/// One logical stack frame. Inlined calls get a frame each.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    not(any(feature = "origin", test)),
    expect(dead_code, reason = "only built from a resolved backtrace")
)]
pub(crate) struct Frame {
    pub function: Option<String>,
    pub file: Option<PathBuf>,
    pub line: Option<u32>,
}

#[cfg(feature = "origin")]
mod imp {
    use super::Frame;
    use backtrace::Backtrace;
    use std::path::Path;

    /// A stack trace taken where an exception was raised.
    ///
    /// Capturing is unresolved and fairly cheap. Symbols are only resolved on the first call to
    /// [`Trace::frames`].
    #[derive(Clone, Debug)]
    pub(crate) struct Trace {
        backtrace: Backtrace,
    }

    impl Trace {
        pub fn capture() -> Option<Self> {
            Some(Self {
                backtrace: Backtrace::new_unresolved(),
            })
        }

        /// Frames from innermost to outermost.
        pub fn frames(&mut self) -> Vec<Frame> {
            self.backtrace.resolve();
            self.backtrace
                .frames()
                .iter()
                .flat_map(backtrace::BacktraceFrame::symbols)
                .map(|symbol| Frame {
                    // `#` drops the trailing hash of legacy-mangled names.
                    function: symbol.name().map(|name| format!("{name:#}")),
                    file: symbol.filename().map(Path::to_path_buf),
                    line: symbol.lineno(),
                })
                .collect()
        }
    }
}

#[cfg(not(feature = "origin"))]
mod imp {
    use super::Frame;

    /// A stack trace taken where an exception was raised.
    ///
    /// Stack capture is disabled without the `origin` feature, so this is never constructed.
    #[derive(Clone, Debug)]
    #[expect(dead_code, reason = "capture always returns `None`")]
    pub(crate) struct Trace;

    impl Trace {
        pub fn capture() -> Option<Self> {
            None
        }

        pub fn frames(&mut self) -> Vec<Frame> {
            Vec::new()
        }
    }
}

pub(crate) use imp::Trace;
