/// Generates `From<$source> for $wrapper` so that `?` lifts a library error into one of our error enums.
///
/// `$wrapper` arrives as a type, so the variant is reached through `<$wrapper>::` which turns it back into a path.
/// With `using_panic_feature` the conversion panics instead when `panic_on_error_propagation` is enabled,
/// which gives a backtrace at the failing call site rather than at `main`.
#[macro_export]
macro_rules! propagate {
    ($wrapper:ty, $variant:ident as $source:ty) => {
        impl std::convert::From<$source> for $wrapper {
            fn from(source: $source) -> Self {
                <$wrapper>::$variant(source)
            }
        }
    };
    ($wrapper:ty, $variant:ident as $source:ty, using_panic_feature) => {
        impl std::convert::From<$source> for $wrapper {
            fn from(source: $source) -> Self {
                if cfg!(feature = "panic_on_error_propagation") {
                    panic!("Error propagated from {}: {}", stringify!($source), source)
                } else {
                    <$wrapper>::$variant(source)
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use std::fmt;

    #[derive(Debug)]
    struct Inner(u32);

    impl fmt::Display for Inner {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "inner {}", self.0)
        }
    }

    #[derive(Debug)]
    enum Outer {
        Wrapped(Inner),
    }

    propagate!(Outer, Wrapped as Inner);

    fn fails() -> Result<(), Outer> {
        Err(Inner(7))?;
        Ok(())
    }

    #[test]
    fn question_mark_wraps_source_error() {
        match fails() {
            Err(Outer::Wrapped(Inner(code))) => assert_eq!(code, 7),
            other => panic!("unexpected {:?}", other),
        }
    }
}
