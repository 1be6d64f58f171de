//
// Copyright 2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

//! The callable capability wrapped by throttle and debounce.

use thiserror::Error;

/// Boxed error returned by a wrapped callable.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A wrapped callable failed.
///
/// # Examples
///
/// ```rust
/// use pacer::CallError;
///
/// let error = CallError::new("disk full");
/// assert_eq!(error.to_string(), "disk full");
/// ```
#[derive(Debug, Error)]
#[error("{source}")]
pub struct CallError {
    source: BoxError,
}

impl CallError {
    /// Wraps any error type.
    pub fn new(error: impl Into<BoxError>) -> Self {
        Self {
            source: error.into(),
        }
    }

    /// Returns the underlying error.
    pub fn into_inner(self) -> BoxError {
        self.source
    }
}

/// Return types a wrapped callable may use.
///
/// Implemented for `()` and for `Result<T, E>` with any error convertible
/// into a [`BoxError`]. The success value becomes the callable's output.
pub trait IntoCallResult {
    /// Value produced by a successful call.
    type Output;

    /// Converts the return value into the uniform result.
    fn into_call_result(self) -> Result<Self::Output, CallError>;
}

impl IntoCallResult for () {
    type Output = ();

    fn into_call_result(self) -> Result<(), CallError> {
        Ok(())
    }
}

impl<T, E> IntoCallResult for Result<T, E>
where
    E: Into<BoxError>,
{
    type Output = T;

    fn into_call_result(self) -> Result<T, CallError> {
        self.map_err(CallError::new)
    }
}

/// Something throttle and debounce can forward calls to.
///
/// Any `Fn(A)` closure returning `()` or `Result<T, E>` qualifies:
///
/// ```rust
/// use pacer::Callable;
///
/// let print = |line: String| println!("{}", line);
/// assert!(print.invoke("hello".to_string()).is_ok());
///
/// let check = |value: u32| -> Result<u32, String> {
///     if value > 10 { Err(format!("{} is too large", value)) } else { Ok(value * 2) }
/// };
/// assert_eq!(check.invoke(3).unwrap(), 6);
/// assert_eq!(check.invoke(11).unwrap_err().to_string(), "11 is too large");
/// ```
pub trait Callable<A>: Send + Sync + 'static {
    /// Value produced by a successful call.
    type Output: Send + 'static;

    /// Runs the callable with `args`.
    fn invoke(&self, args: A) -> Result<Self::Output, CallError>;
}

impl<A, F, R> Callable<A> for F
where
    F: Fn(A) -> R + Send + Sync + 'static,
    R: IntoCallResult,
    R::Output: Send + 'static,
{
    type Output = R::Output;

    fn invoke(&self, args: A) -> Result<R::Output, CallError> {
        (self)(args).into_call_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_unit_closure() {
        let callable = |_: ()| {};
        assert!(callable.invoke(()).is_ok());
    }

    #[test]
    fn test_result_closure_error_is_wrapped() {
        let callable = |_: u8| -> Result<(), io::Error> { Err(io::Error::other("denied")) };
        let error = callable.invoke(1).unwrap_err();
        assert_eq!(error.to_string(), "denied");

        let inner = error.into_inner();
        assert!(inner.downcast_ref::<io::Error>().is_some());
    }

    #[test]
    fn test_result_closure_output_is_returned() {
        let callable = |value: u32| -> Result<String, io::Error> { Ok(format!("#{}", value)) };
        assert_eq!(callable.invoke(7).unwrap(), "#7");
    }

    #[test]
    fn test_custom_callable() {
        struct Rejecting;

        impl Callable<u32> for Rejecting {
            type Output = ();

            fn invoke(&self, args: u32) -> Result<(), CallError> {
                Err(CallError::new(format!("rejected {}", args)))
            }
        }

        let target: Box<dyn Callable<u32, Output = ()>> = Box::new(Rejecting);
        assert_eq!(target.invoke(5).unwrap_err().to_string(), "rejected 5");
    }
}
